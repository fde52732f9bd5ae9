//! Index-carrying drivers: argsort and argselect.
//!
//! The same recursion as [`crate::sort::driver`], re-expressed over the
//! index stream: partition and network moves are applied to registers of
//! `i64` positions, while the values they point at are fetched transiently
//! by gather whenever a comparison mask is needed. The value slice is never
//! written.

use std::cmp::Ordering;

use crate::simd::traits::{Scalar, SimdArg, SimdVec, Sortable};
use crate::sort::driver::{iteration_budget, Policy};
use crate::sort::partition::{max_scalar, min_scalar};
use crate::sort::{network, pivot};

/// Runs argsort over a pre-filled index slice.
pub(crate) fn argsort_impl<T: Sortable>(values: &[T], args: &mut [i64]) {
    drive::<T, T::ArgVector, <T::ArgVector as SimdArg<T>>::Index>(values, args, Policy::Sort);
}

/// Runs argselect(k) over a pre-filled index slice.
pub(crate) fn argselect_impl<T: Sortable>(values: &[T], args: &mut [i64], k: usize) {
    drive::<T, T::ArgVector, <T::ArgVector as SimdArg<T>>::Index>(values, args, Policy::Select(k));
}

fn drive<T, A, I>(values: &[T], args: &mut [i64], policy: Policy)
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let n = args.len();
    if n <= 1 {
        return;
    }
    recurse_kv::<T, A, I>(values, args, 0, n - 1, iteration_budget(n), policy);
}

fn recurse_kv<T, A, I>(
    values: &[T],
    args: &mut [i64],
    left: usize,
    right: usize,
    budget: usize,
    policy: Policy,
) where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    if budget == 0 {
        match policy {
            Policy::Sort => args[left..=right]
                .sort_unstable_by(|a, b| T::compare(values[*a as usize], values[*b as usize])),
            Policy::Select(k) => {
                args[left..=right].select_nth_unstable_by(k - left, |a, b| {
                    T::compare(values[*a as usize], values[*b as usize])
                });
            }
        }
        return;
    }

    if right + 1 - left <= A::SORT_THRESHOLD {
        network::sort_small_kv::<T, A, I>(values, &mut args[left..=right]);
        return;
    }

    let pivot_value = pivot::get_pivot_kv::<T, A>(values, args, left, right);
    let (boundary, smallest, biggest) =
        partition_kv_dispatch::<T, A, I>(values, args, left, right + 1, pivot_value);

    let (go_left, go_right) = match policy {
        Policy::Sort => (true, true),
        Policy::Select(k) => (k < boundary, k >= boundary),
    };

    if go_left && T::compare(pivot_value, smallest) != Ordering::Equal {
        recurse_kv::<T, A, I>(values, args, left, boundary - 1, budget - 1, policy);
    }
    if go_right && T::compare(pivot_value, biggest) != Ordering::Equal {
        recurse_kv::<T, A, I>(values, args, boundary, right, budget - 1, policy);
    }
}

/// One index-register partition step: the `>= pivot` mask comes from the
/// gathered values, the compress-stores move the index lanes.
///
/// # Safety
///
/// Same store-gap contract as the plain partition; additionally every index
/// lane must be a valid position into `values`.
#[inline(always)]
unsafe fn partition_block_kv<T, A, I>(
    args_ptr: *mut i64,
    l_store: usize,
    r_store_end: usize,
    curr_args: I,
    curr_vals: A,
    pivot_vec: A,
    min_vec: &mut A,
    max_vec: &mut A,
) -> usize
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let ge_mask = curr_vals.ge(pivot_vec);
    let amount_ge = ge_mask.count_ones() as usize;
    curr_args.compress_storeu(!ge_mask & A::mask_all(), args_ptr.add(l_store));
    curr_args.compress_storeu(ge_mask, args_ptr.add(r_store_end - amount_ge));
    *min_vec = min_vec.min(curr_vals);
    *max_vec = max_vec.max(curr_vals);
    amount_ge
}

/// Partitions `args[left..right)` by the values the indices point at.
fn partition_kv<T, A, I>(
    values: &[T],
    args: &mut [i64],
    mut left: usize,
    mut right: usize,
    pivot_value: T,
) -> (usize, T, T)
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let mut smallest = T::max_value();
    let mut biggest = T::min_value();

    let mut rem = (right - left) % A::LANES;
    while rem > 0 {
        let value = values[args[left] as usize];
        smallest = min_scalar(smallest, value);
        biggest = max_scalar(biggest, value);
        if T::compare(value, pivot_value) != Ordering::Less {
            right -= 1;
            args.swap(left, right);
        } else {
            left += 1;
        }
        rem -= 1;
    }

    if left == right {
        return (left, smallest, biggest);
    }

    let pivot_vec = A::splat(pivot_value);
    let mut min_vec = A::splat(smallest);
    let mut max_vec = A::splat(biggest);
    let base = values.as_ptr();
    let args_ptr = args.as_mut_ptr();

    if right - left == A::LANES {
        let curr_args = unsafe { I::loadu(args_ptr.add(left)) };
        let curr_vals = unsafe { A::gather(base, curr_args) };
        let amount_ge = unsafe {
            partition_block_kv::<T, A, I>(
                args_ptr, left, right, curr_args, curr_vals, pivot_vec, &mut min_vec, &mut max_vec,
            )
        };
        return (
            right - amount_ge,
            min_vec.reduce_min(),
            max_vec.reduce_max(),
        );
    }

    let args_left = unsafe { I::loadu(args_ptr.add(left)) };
    let args_right = unsafe { I::loadu(args_ptr.add(right - A::LANES)) };
    let vals_left = unsafe { A::gather(base, args_left) };
    let vals_right = unsafe { A::gather(base, args_right) };
    let mut l_store = left;
    let mut r_store_end = right;
    left += A::LANES;
    right -= A::LANES;

    while right != left {
        let curr_args = if r_store_end - right < left - l_store {
            right -= A::LANES;
            unsafe { I::loadu(args_ptr.add(right)) }
        } else {
            let loaded = unsafe { I::loadu(args_ptr.add(left)) };
            left += A::LANES;
            loaded
        };
        let curr_vals = unsafe { A::gather(base, curr_args) };
        let amount_ge = unsafe {
            partition_block_kv::<T, A, I>(
                args_ptr, l_store, r_store_end, curr_args, curr_vals, pivot_vec, &mut min_vec,
                &mut max_vec,
            )
        };
        l_store += A::LANES - amount_ge;
        r_store_end -= amount_ge;
    }

    for (held_args, held_vals) in [(args_left, vals_left), (args_right, vals_right)] {
        let amount_ge = unsafe {
            partition_block_kv::<T, A, I>(
                args_ptr, l_store, r_store_end, held_args, held_vals, pivot_vec, &mut min_vec,
                &mut max_vec,
            )
        };
        l_store += A::LANES - amount_ge;
        r_store_end -= amount_ge;
    }
    debug_assert_eq!(l_store, r_store_end);

    (l_store, min_vec.reduce_min(), max_vec.reduce_max())
}

/// Unrolled variant of [`partition_kv`].
fn partition_kv_unrolled<T, A, I, const UNROLL: usize>(
    values: &[T],
    args: &mut [i64],
    mut left: usize,
    mut right: usize,
    pivot_value: T,
) -> (usize, T, T)
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    if right - left <= 2 * UNROLL * A::LANES {
        return partition_kv::<T, A, I>(values, args, left, right, pivot_value);
    }

    let mut smallest = T::max_value();
    let mut biggest = T::min_value();

    let mut rem = (right - left) % (UNROLL * A::LANES);
    while rem > 0 {
        let value = values[args[left] as usize];
        smallest = min_scalar(smallest, value);
        biggest = max_scalar(biggest, value);
        if T::compare(value, pivot_value) != Ordering::Less {
            right -= 1;
            args.swap(left, right);
        } else {
            left += 1;
        }
        rem -= 1;
    }

    let pivot_vec = A::splat(pivot_value);
    let mut min_vec = A::splat(smallest);
    let mut max_vec = A::splat(biggest);
    let base = values.as_ptr();
    let args_ptr = args.as_mut_ptr();

    let mut args_left = [I::splat(0); UNROLL];
    let mut args_right = [I::splat(0); UNROLL];
    for i in 0..UNROLL {
        args_left[i] = unsafe { I::loadu(args_ptr.add(left + i * A::LANES)) };
        args_right[i] = unsafe { I::loadu(args_ptr.add(right - (UNROLL - i) * A::LANES)) };
    }
    let mut l_store = left;
    let mut r_store_end = right;
    left += UNROLL * A::LANES;
    right -= UNROLL * A::LANES;

    while right != left {
        let mut curr_args = [I::splat(0); UNROLL];
        if r_store_end - right < left - l_store {
            right -= UNROLL * A::LANES;
            for (i, block) in curr_args.iter_mut().enumerate() {
                *block = unsafe { I::loadu(args_ptr.add(right + i * A::LANES)) };
            }
        } else {
            for (i, block) in curr_args.iter_mut().enumerate() {
                *block = unsafe { I::loadu(args_ptr.add(left + i * A::LANES)) };
            }
            left += UNROLL * A::LANES;
        }
        for block in curr_args {
            let curr_vals = unsafe { A::gather(base, block) };
            let amount_ge = unsafe {
                partition_block_kv::<T, A, I>(
                    args_ptr, l_store, r_store_end, block, curr_vals, pivot_vec, &mut min_vec,
                    &mut max_vec,
                )
            };
            l_store += A::LANES - amount_ge;
            r_store_end -= amount_ge;
        }
    }

    for held in [args_left, args_right] {
        for block in held {
            let curr_vals = unsafe { A::gather(base, block) };
            let amount_ge = unsafe {
                partition_block_kv::<T, A, I>(
                    args_ptr, l_store, r_store_end, block, curr_vals, pivot_vec, &mut min_vec,
                    &mut max_vec,
                )
            };
            l_store += A::LANES - amount_ge;
            r_store_end -= amount_ge;
        }
    }
    debug_assert_eq!(l_store, r_store_end);

    (l_store, min_vec.reduce_min(), max_vec.reduce_max())
}

#[inline(always)]
fn partition_kv_dispatch<T, A, I>(
    values: &[T],
    args: &mut [i64],
    left: usize,
    right: usize,
    pivot_value: T,
) -> (usize, T, T)
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    match A::PARTITION_UNROLL {
        n if n >= 4 => {
            partition_kv_unrolled::<T, A, I, 4>(values, args, left, right, pivot_value)
        }
        2 | 3 => partition_kv_unrolled::<T, A, I, 2>(values, args, left, right, pivot_value),
        _ => partition_kv::<T, A, I>(values, args, left, right, pivot_value),
    }
}
