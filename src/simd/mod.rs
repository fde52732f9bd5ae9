//! Vector lane backends and the capability traits they implement.
//!
//! The `fallback` backend is always compiled; `avx2` is enabled by the build
//! script when the host CPU supports it, and the [`traits::Sortable`] impls
//! pick the backend per element type at compile time.

#[cfg(avx2)]
pub mod avx2;

pub mod fallback;

pub mod traits;
