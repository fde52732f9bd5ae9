//! NaN sentinel substitution.
//!
//! NaN has no place in a total order, so the vectorized paths never see one:
//! a pre-pass rewrites every NaN to the type's sentinel (`+inf`) and counts
//! them, the ordinary sort runs on the NaN-free data, and a post-pass
//! rewrites the trailing `count` positions to the canonical NaN. The
//! sentinels sorted to the tail by construction, so no re-sort is needed.
//! NaN payload bits are not preserved, only the count.

use crate::simd::traits::Scalar;

/// Replaces every NaN with the sentinel, returning how many were found.
/// A no-op returning 0 for integer types.
pub(crate) fn replace_nan_with_sentinel<T: Scalar>(arr: &mut [T]) -> usize {
    let mut count = 0;
    for value in arr.iter_mut() {
        if value.is_nan() {
            *value = T::nan_sentinel();
            count += 1;
        }
    }
    count
}

/// Rewrites the last `count` positions with the canonical NaN.
pub(crate) fn restore_nan<T: Scalar>(arr: &mut [T], count: usize) {
    if count == 0 {
        return;
    }
    let n = arr.len();
    for value in &mut arr[n - count..] {
        *value = T::canonical_nan();
    }
}

/// Pre-scan used by the read-only (argsort) paths to pick the NaN-aware
/// comparison fallback.
pub(crate) fn has_nan<T: Scalar>(arr: &[T]) -> bool {
    arr.iter().any(|v| v.is_nan())
}

/// Swaps every NaN behind the non-NaN prefix, payload bits intact, and
/// returns the prefix length. Selection runs on the prefix only: a partial
/// sort leaves no way to know where sentinels would have landed, so unlike
/// [`replace_nan_with_sentinel`] this really moves them.
pub(crate) fn move_nans_to_end<T: Scalar>(arr: &mut [T]) -> usize {
    let mut end = arr.len();
    let mut i = 0;
    while i < end {
        if arr[i].is_nan() {
            end -= 1;
            arr.swap(i, end);
        } else {
            i += 1;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_restore_roundtrip() {
        let mut data = vec![1.0f32, f32::NAN, 3.0, f32::NAN, 0.5];
        let count = replace_nan_with_sentinel(&mut data);
        assert_eq!(count, 2);
        assert!(data.iter().all(|v| !v.is_nan()));
        assert_eq!(data[1], f32::INFINITY);
        assert_eq!(data[3], f32::INFINITY);

        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        restore_nan(&mut data, count);
        assert_eq!(&data[..3], &[0.5, 1.0, 3.0]);
        assert!(data[3].is_nan() && data[4].is_nan());
    }

    #[test]
    fn test_negative_nan_is_replaced() {
        let mut data = vec![-f64::NAN, 2.0];
        assert!(has_nan(&data));
        let count = replace_nan_with_sentinel(&mut data);
        assert_eq!(count, 1);
        assert_eq!(data[0], f64::INFINITY);
    }

    #[test]
    fn test_move_nans_to_end_keeps_payloads() {
        let mut data = vec![f32::NAN, 1.0, -f32::NAN, 2.0, f32::NAN];
        let prefix = move_nans_to_end(&mut data);
        assert_eq!(prefix, 2);
        assert!(data[..2].iter().all(|v| !v.is_nan()));
        assert!(data[2..].iter().all(|v| v.is_nan()));
        // One of the moved NaNs must keep its negative sign bit.
        assert!(data[2..].iter().any(|v| v.is_sign_negative()));
    }

    #[test]
    fn test_integers_never_report_nan() {
        let mut data = vec![3i32, i32::MIN, i32::MAX];
        assert!(!has_nan(&data));
        assert_eq!(replace_nan_with_sentinel(&mut data), 0);
        assert_eq!(data, vec![3, i32::MIN, i32::MAX]);
    }
}
