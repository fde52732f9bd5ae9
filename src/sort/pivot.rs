//! Median-of-sample pivot selection.
//!
//! One register's worth of elements is sampled at evenly spaced offsets
//! across the range, sorted with the single-register network, and the middle
//! lane becomes the pivot. Cheap, and enough to break the sorted and
//! reverse-sorted patterns that defeat first/last-element pivoting.

use crate::simd::traits::{Scalar, SimdArg, SimdVec};

/// Largest lane count any backend exposes; size of the sampling buffer.
const MAX_LANES: usize = 64;

/// Picks a pivot for `arr[left..=right]`. Ranges narrower than one register
/// fall back to the last element.
pub(crate) fn get_pivot<T: Scalar, V: SimdVec<T>>(arr: &[T], left: usize, right: usize) -> T {
    if right - left >= V::LANES {
        let stride = (right - left) / V::LANES;
        let mut samples = [T::max_value(); MAX_LANES];
        for (i, sample) in samples.iter_mut().take(V::LANES).enumerate() {
            *sample = arr[left + stride * (i + 1)];
        }
        let reg = unsafe { V::loadu(samples.as_ptr()) };
        reg.sort_lanes().extract(V::LANES / 2)
    } else {
        arr[right]
    }
}

/// Key/value form: samples through the index stream and compares gathered
/// values; the pivot is still a value.
pub(crate) fn get_pivot_kv<T: Scalar, A: SimdArg<T>>(
    values: &[T],
    args: &[i64],
    left: usize,
    right: usize,
) -> T {
    if right - left >= A::LANES {
        let stride = (right - left) / A::LANES;
        let mut samples = [T::max_value(); MAX_LANES];
        for (i, sample) in samples.iter_mut().take(A::LANES).enumerate() {
            *sample = values[args[left + stride * (i + 1)] as usize];
        }
        let reg = unsafe { A::loadu(samples.as_ptr()) };
        reg.sort_lanes().extract(A::LANES / 2)
    } else {
        values[args[right] as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::ScalarVec;

    type V8 = ScalarVec<i32, 8>;

    #[test]
    fn test_pivot_of_sorted_range_is_central() {
        let data: Vec<i32> = (0..1000).collect();
        let pivot = get_pivot::<i32, V8>(&data, 0, 999);
        // The middle lane of an evenly spaced sample sits near the median.
        assert!((300..=700).contains(&pivot), "pivot {pivot} too far off-center");
    }

    #[test]
    fn test_pivot_short_range_takes_last_element() {
        let data = vec![9i32, 4, 7, 1];
        assert_eq!(get_pivot::<i32, V8>(&data, 0, 3), 1);
    }

    #[test]
    fn test_pivot_kv_reads_through_indices() {
        let values = vec![3i32, 50, 20];
        let args = vec![2i64, 0, 1];
        assert_eq!(get_pivot_kv::<i32, V8>(&values, &args, 0, 2), 50);
    }
}
