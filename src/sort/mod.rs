//! Sorting engine: public entry points and the passes behind them.
//!
//! Data flow: caller slice → NaN pre-pass (floats) → recursive driver →
//! network base case on small ranges / vectorized partition + recursion on
//! large ones → sorted slice (and, for argsort, a sorted index slice) → NaN
//! post-pass restoring the canonical NaN at the tail.
//!
//! Every call is single-threaded, synchronous and infallible: degenerate
//! inputs (`n <= 1`) are no-ops, pivot degeneracy skips the empty side, an
//! exhausted iteration budget silently falls back to a comparison sort.

use crate::simd::traits::Sortable;

pub(crate) mod argsort;
pub(crate) mod driver;
pub(crate) mod nan;
pub(crate) mod network;
pub(crate) mod partition;
pub(crate) mod pivot;

/// Sorts `values` in place in ascending order.
///
/// Stability is not guaranteed. For floating types every NaN ends up at the
/// tail of the slice (the count of NaNs is preserved, their payload bits are
/// not).
///
/// # Examples
///
/// ```rust
/// let mut data = vec![5, 3, 3, 1, 4, 1, 5, 9, 2, 6];
/// simdsort::sort(&mut data);
/// assert_eq!(data, vec![1, 1, 2, 3, 3, 4, 5, 5, 6, 9]);
/// ```
pub fn sort<T: Sortable>(values: &mut [T]) {
    if values.len() <= 1 {
        return;
    }
    let nan_count = nan::replace_nan_with_sentinel(values);
    driver::quicksort::<T, T::Vector>(values);
    nan::restore_nan(values, nan_count);
}

/// Returns the permutation that sorts `values`: reading `values` through the
/// returned indices in order yields a non-decreasing sequence. `values` is
/// not mutated.
///
/// # Examples
///
/// ```rust
/// let indices = simdsort::argsort(&[30, 10, 20]);
/// assert_eq!(indices, vec![1, 2, 0]);
/// ```
pub fn argsort<T: Sortable>(values: &[T]) -> Vec<i64> {
    let mut indices: Vec<i64> = (0..values.len() as i64).collect();
    argsort_into(values, &mut indices);
    indices
}

/// In-place variant of [`argsort`] for caller-owned index buffers.
///
/// `indices` must have the same length as `values` and hold the identity
/// permutation `0..n`.
///
/// If any value is NaN the whole call takes the comparison path with the
/// NaN-greatest ordering instead of the vectorized one.
pub fn argsort_into<T: Sortable>(values: &[T], indices: &mut [i64]) {
    debug_assert_eq!(
        values.len(),
        indices.len(),
        "values and indices must have the same length"
    );
    if values.len() <= 1 {
        return;
    }
    if nan::has_nan(values) {
        indices.sort_unstable_by(|a, b| T::compare(values[*a as usize], values[*b as usize]));
        return;
    }
    argsort::argsort_impl::<T>(values, indices);
}

/// Partially sorts `values` so that position `k` holds the k-th order
/// statistic, everything before it is `<=` and everything after it is `>=`.
/// Order within the two sides is unspecified.
///
/// `k` must be in `[0, values.len())` for non-empty input.
///
/// # Examples
///
/// ```rust
/// let mut data = vec![7, 2, 9, 4, 1];
/// simdsort::select(&mut data, 2);
/// assert_eq!(data[2], 4);
/// ```
pub fn select<T: Sortable>(values: &mut [T], k: usize) {
    let n = values.len();
    if n <= 1 {
        return;
    }
    debug_assert!(k < n, "selection rank must be < values.len()");
    // NaNs are the largest elements; once moved behind the prefix a rank
    // inside the tail is already satisfied.
    let real = nan::move_nans_to_end(values);
    if k < real {
        driver::quickselect::<T, T::Vector>(&mut values[..real], k);
    }
}

/// Index analogue of [`select`]: returns a permutation whose position `k`
/// indexes the k-th order statistic of `values`, with every earlier index
/// pointing at a `<=` value and every later one at a `>=` value. `values`
/// is not mutated.
pub fn argselect<T: Sortable>(values: &[T], k: usize) -> Vec<i64> {
    let n = values.len();
    let mut indices: Vec<i64> = (0..n as i64).collect();
    if n <= 1 {
        return indices;
    }
    debug_assert!(k < n, "selection rank must be < values.len()");
    if nan::has_nan(values) {
        indices.select_nth_unstable_by(k, |a, b| {
            T::compare(values[*a as usize], values[*b as usize])
        });
        return indices;
    }
    argsort::argselect_impl::<T>(values, &mut indices, k);
    indices
}
