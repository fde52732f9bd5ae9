//! 🚀 SIMD-accelerated sorting, argsort and selection for slices of
//! fixed-width scalars.
//!
//! The engine combines three pieces: a branch-free bitonic sorting network
//! for ranges up to a few register loads, a vectorized compress-store
//! partition for everything larger, and a recursive quicksort/quickselect
//! driver with an iteration budget that falls back to a guaranteed
//! `O(n log n)` comparison sort on adversarial input. An index-carrying
//! variant of the same machinery produces permutations (`argsort`,
//! `argselect`) without mutating the values.
//!
//! # Supported element types
//!
//! `i16`, `u16`, `i32`, `u32`, `i64`, `u64`, `f32`, `f64`. The build script
//! detects AVX2 on the host and routes the 32-bit types through the AVX2
//! backend; everything else runs on a portable scalar implementation of the
//! same lane capability.
//!
//! # NaN handling
//!
//! Floats sort by their natural order with every NaN at the end of the
//! slice. NaN counts are preserved, payload bits are not.
//!
//! # Examples
//!
//! ```rust
//! let mut data = vec![5.0f32, f32::NAN, 1.5, -2.0];
//! simdsort::sort(&mut data);
//! assert_eq!(&data[..3], &[-2.0, 1.5, 5.0]);
//! assert!(data[3].is_nan());
//!
//! let indices = simdsort::argsort(&[30u64, 10, 20]);
//! assert_eq!(indices, vec![1, 2, 0]);
//! ```

pub mod simd;
pub mod sort;

pub use sort::{argselect, argsort, argsort_into, select, sort};
