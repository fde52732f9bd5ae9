//! Vectorized Hoare-style partition around a pivot.
//!
//! Elements strictly below the pivot end up ahead of every element greater
//! or equal to it. Data is consumed one register block at a time from both
//! ends of the range with two converging cursors; each block's `>= pivot`
//! mask drives a pair of compress-stores, one packing the low group at the
//! left store cursor, one packing the high group below the right store
//! cursor. The running register min/max is folded at the end so the caller
//! can detect a pivot pinned at an extreme of the range.

use std::cmp::Ordering;

use crate::simd::traits::{Scalar, SimdVec};

#[inline(always)]
pub(crate) fn min_scalar<T: Scalar>(a: T, b: T) -> T {
    if T::compare(b, a) == Ordering::Less {
        b
    } else {
        a
    }
}

#[inline(always)]
pub(crate) fn max_scalar<T: Scalar>(a: T, b: T) -> T {
    if T::compare(b, a) == Ordering::Greater {
        b
    } else {
        a
    }
}

/// Partitions one register block into the store gap `[l_store, r_store_end)`.
///
/// Lanes below the pivot are packed at `l_store`, the rest right-aligned at
/// `r_store_end`; returns how many lanes went right. The caller shrinks the
/// gap by the two counts.
///
/// # Safety
///
/// The store gap must be large enough that both compress-stores stay clear
/// of data not yet loaded; the converging-cursor loops below maintain that
/// invariant by keeping exactly the held-back registers' worth of slack.
#[inline(always)]
unsafe fn partition_block<T: Scalar, V: SimdVec<T>>(
    ptr: *mut T,
    l_store: usize,
    r_store_end: usize,
    curr: V,
    pivot_vec: V,
    min_vec: &mut V,
    max_vec: &mut V,
) -> usize {
    let ge_mask = curr.ge(pivot_vec);
    let amount_ge = ge_mask.count_ones() as usize;
    curr.compress_storeu(!ge_mask & V::mask_all(), ptr.add(l_store));
    curr.compress_storeu(ge_mask, ptr.add(r_store_end - amount_ge));
    *min_vec = min_vec.min(curr);
    *max_vec = max_vec.max(curr);
    amount_ge
}

/// Partitions `arr[left..right)` around `pivot` one register block at a
/// time. Returns the boundary index together with the smallest and biggest
/// value seen in the range.
pub(crate) fn partition<T: Scalar, V: SimdVec<T>>(
    arr: &mut [T],
    mut left: usize,
    mut right: usize,
    pivot: T,
) -> (usize, T, T) {
    let mut smallest = T::max_value();
    let mut biggest = T::min_value();

    // Scalar head: shrink the span to a multiple of the register width,
    // swapping high elements to the back.
    let mut rem = (right - left) % V::LANES;
    while rem > 0 {
        let value = arr[left];
        smallest = min_scalar(smallest, value);
        biggest = max_scalar(biggest, value);
        if T::compare(value, pivot) != Ordering::Less {
            right -= 1;
            arr.swap(left, right);
        } else {
            left += 1;
        }
        rem -= 1;
    }

    if left == right {
        return (left, smallest, biggest);
    }

    let pivot_vec = V::splat(pivot);
    let mut min_vec = V::splat(smallest);
    let mut max_vec = V::splat(biggest);
    let ptr = arr.as_mut_ptr();

    if right - left == V::LANES {
        let curr = unsafe { V::loadu(ptr.add(left)) };
        let amount_ge =
            unsafe { partition_block(ptr, left, right, curr, pivot_vec, &mut min_vec, &mut max_vec) };
        return (
            right - amount_ge,
            min_vec.reduce_min(),
            max_vec.reduce_max(),
        );
    }

    // Hold one block from each end so every store lands on already-read
    // ground, then converge.
    let vec_left = unsafe { V::loadu(ptr.add(left)) };
    let vec_right = unsafe { V::loadu(ptr.add(right - V::LANES)) };
    let mut l_store = left;
    let mut r_store_end = right;
    left += V::LANES;
    right -= V::LANES;

    while right != left {
        let curr = if r_store_end - right < left - l_store {
            right -= V::LANES;
            unsafe { V::loadu(ptr.add(right)) }
        } else {
            let loaded = unsafe { V::loadu(ptr.add(left)) };
            left += V::LANES;
            loaded
        };
        let amount_ge = unsafe {
            partition_block(ptr, l_store, r_store_end, curr, pivot_vec, &mut min_vec, &mut max_vec)
        };
        l_store += V::LANES - amount_ge;
        r_store_end -= amount_ge;
    }

    let amount_ge = unsafe {
        partition_block(ptr, l_store, r_store_end, vec_left, pivot_vec, &mut min_vec, &mut max_vec)
    };
    l_store += V::LANES - amount_ge;
    r_store_end -= amount_ge;

    let amount_ge = unsafe {
        partition_block(ptr, l_store, r_store_end, vec_right, pivot_vec, &mut min_vec, &mut max_vec)
    };
    l_store += V::LANES - amount_ge;

    (l_store, min_vec.reduce_min(), max_vec.reduce_max())
}

/// Unrolled variant: consumes `UNROLL` register blocks per step to hide
/// load latency on large ranges. Small spans take the single-block path.
pub(crate) fn partition_unrolled<T: Scalar, V: SimdVec<T>, const UNROLL: usize>(
    arr: &mut [T],
    mut left: usize,
    mut right: usize,
    pivot: T,
) -> (usize, T, T) {
    if right - left <= 2 * UNROLL * V::LANES {
        return partition::<T, V>(arr, left, right, pivot);
    }

    let mut smallest = T::max_value();
    let mut biggest = T::min_value();

    let mut rem = (right - left) % (UNROLL * V::LANES);
    while rem > 0 {
        let value = arr[left];
        smallest = min_scalar(smallest, value);
        biggest = max_scalar(biggest, value);
        if T::compare(value, pivot) != Ordering::Less {
            right -= 1;
            arr.swap(left, right);
        } else {
            left += 1;
        }
        rem -= 1;
    }

    let pivot_vec = V::splat(pivot);
    let mut min_vec = V::splat(smallest);
    let mut max_vec = V::splat(biggest);
    let ptr = arr.as_mut_ptr();

    let mut vec_left = [V::max_vec(); UNROLL];
    let mut vec_right = [V::max_vec(); UNROLL];
    for i in 0..UNROLL {
        vec_left[i] = unsafe { V::loadu(ptr.add(left + i * V::LANES)) };
        vec_right[i] = unsafe { V::loadu(ptr.add(right - (UNROLL - i) * V::LANES)) };
    }
    let mut l_store = left;
    let mut r_store_end = right;
    left += UNROLL * V::LANES;
    right -= UNROLL * V::LANES;

    while right != left {
        let mut curr = [V::max_vec(); UNROLL];
        if r_store_end - right < left - l_store {
            right -= UNROLL * V::LANES;
            for (i, block) in curr.iter_mut().enumerate() {
                *block = unsafe { V::loadu(ptr.add(right + i * V::LANES)) };
            }
        } else {
            for (i, block) in curr.iter_mut().enumerate() {
                *block = unsafe { V::loadu(ptr.add(left + i * V::LANES)) };
            }
            left += UNROLL * V::LANES;
        }
        for block in curr {
            let amount_ge = unsafe {
                partition_block(ptr, l_store, r_store_end, block, pivot_vec, &mut min_vec, &mut max_vec)
            };
            l_store += V::LANES - amount_ge;
            r_store_end -= amount_ge;
        }
    }

    for block in vec_left {
        let amount_ge = unsafe {
            partition_block(ptr, l_store, r_store_end, block, pivot_vec, &mut min_vec, &mut max_vec)
        };
        l_store += V::LANES - amount_ge;
        r_store_end -= amount_ge;
    }
    for block in vec_right {
        let amount_ge = unsafe {
            partition_block(ptr, l_store, r_store_end, block, pivot_vec, &mut min_vec, &mut max_vec)
        };
        l_store += V::LANES - amount_ge;
        r_store_end -= amount_ge;
    }
    debug_assert_eq!(l_store, r_store_end);

    (l_store, min_vec.reduce_min(), max_vec.reduce_max())
}
