//! Recursive quicksort/quickselect driver.
//!
//! One recursion, two policies: `Sort` descends into both sides of a
//! partition, `Select` only into the side holding the target rank. Every
//! level burns one unit of the iteration budget; when it runs out the range
//! goes to a comparison sort with a guaranteed worst case, so adversarial
//! pivot sequences degrade performance but never termination.

use std::cmp::Ordering;

use crate::simd::traits::{Scalar, SimdVec};
use crate::sort::{network, partition, pivot};

/// Which side(s) of a partition the driver descends into.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Policy {
    /// Full sort: both sides.
    Sort,
    /// Partial sort: only the side containing this rank.
    Select(usize),
}

/// Twice the balanced recursion depth: slack for uneven splits, small
/// enough to bound worst-case work before the fallback kicks in.
#[inline(always)]
pub(crate) fn iteration_budget(n: usize) -> usize {
    debug_assert!(n >= 2);
    2 * n.ilog2() as usize
}

/// Sorts `arr` in place. NaN-free input is the caller's contract; the NaN
/// pre-pass upstream guarantees it for floats.
pub(crate) fn quicksort<T: Scalar, V: SimdVec<T>>(arr: &mut [T]) {
    let n = arr.len();
    if n <= 1 {
        return;
    }
    recurse::<T, V>(arr, 0, n - 1, iteration_budget(n), Policy::Sort);
}

/// Moves the k-th order statistic of `arr` into position `k`, smaller
/// elements before it, larger after it.
pub(crate) fn quickselect<T: Scalar, V: SimdVec<T>>(arr: &mut [T], k: usize) {
    let n = arr.len();
    if n <= 1 {
        return;
    }
    debug_assert!(k < n, "selection rank must be < array length");
    recurse::<T, V>(arr, 0, n - 1, iteration_budget(n), Policy::Select(k));
}

fn recurse<T: Scalar, V: SimdVec<T>>(
    arr: &mut [T],
    left: usize,
    right: usize,
    budget: usize,
    policy: Policy,
) {
    // Out of budget: quicksort is not making progress on this input, hand
    // the range to a sort with a guaranteed worst case.
    if budget == 0 {
        match policy {
            Policy::Sort => arr[left..=right].sort_unstable_by(|a, b| T::compare(*a, *b)),
            Policy::Select(k) => {
                arr[left..=right].select_nth_unstable_by(k - left, |a, b| T::compare(*a, *b));
            }
        }
        return;
    }

    // Base case: a handful of register loads sorts branch-free.
    if right + 1 - left <= V::SORT_THRESHOLD {
        network::sort_small::<T, V>(&mut arr[left..=right]);
        return;
    }

    let pivot_value = pivot::get_pivot::<T, V>(arr, left, right);
    let (boundary, smallest, biggest) =
        partition_dispatch::<T, V>(arr, left, right + 1, pivot_value);

    let (go_left, go_right) = match policy {
        Policy::Sort => (true, true),
        Policy::Select(k) => (k < boundary, k >= boundary),
    };

    // A pivot equal to the range minimum leaves the low side empty, one
    // equal to the maximum leaves the high side all-equal; recursing into
    // either cannot make progress.
    if go_left && T::compare(pivot_value, smallest) != Ordering::Equal {
        recurse::<T, V>(arr, left, boundary - 1, budget - 1, policy);
    }
    if go_right && T::compare(pivot_value, biggest) != Ordering::Equal {
        recurse::<T, V>(arr, boundary, right, budget - 1, policy);
    }
}

#[inline(always)]
fn partition_dispatch<T: Scalar, V: SimdVec<T>>(
    arr: &mut [T],
    left: usize,
    right: usize,
    pivot_value: T,
) -> (usize, T, T) {
    match V::PARTITION_UNROLL {
        n if n >= 4 => partition::partition_unrolled::<T, V, 4>(arr, left, right, pivot_value),
        2 | 3 => partition::partition_unrolled::<T, V, 2>(arr, left, right, pivot_value),
        _ => partition::partition::<T, V>(arr, left, right, pivot_value),
    }
}
