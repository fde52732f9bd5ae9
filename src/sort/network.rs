//! Multi-register sorting network ladder.
//!
//! The base case of the drivers: up to eight register loads are sorted with
//! a fixed, data-independent sequence of compare-exchanges. Each register is
//! first sorted on its own by the backend's single-register network, then
//! sorted runs are merged pairwise, four-wise and eight-wise by recursive
//! doubling: reverse the upper run into the lower one, compare-exchange
//! across registers at halving distances, and finish with the per-register
//! bitonic half-cleaner. The same ladder runs in a key/value form where
//! every exchange routes index registers by value-comparison masks.

use crate::simd::traits::{Scalar, SimdArg, SimdVec};

/// Register loads the ladder tops out at.
pub(crate) const MAX_VECS: usize = 8;

/// Sorts `data` in place with the register ladder. `data` must fit the
/// backend's base-case threshold (eight register loads); tails shorter than
/// a register are padded with the type maximum through masked loads and
/// only the valid lanes are stored back.
pub(crate) fn sort_small<T: Scalar, V: SimdVec<T>>(data: &mut [T]) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    debug_assert!(
        n <= V::SORT_THRESHOLD,
        "base case holds at most {} elements",
        V::SORT_THRESHOLD
    );

    let nvecs = n.div_ceil(V::LANES).next_power_of_two();
    let mut regs = [V::max_vec(); MAX_VECS];
    let ptr = data.as_mut_ptr();

    for (i, reg) in regs.iter_mut().take(nvecs).enumerate() {
        let start = i * V::LANES;
        let valid = n.saturating_sub(start).min(V::LANES);
        let mask = V::mask_first(valid);
        *reg = unsafe { V::mask_loadu(V::max_vec(), mask, ptr.add(start.min(n))) };
    }

    sort_vectors::<T, V>(&mut regs[..nvecs]);

    for (i, reg) in regs.iter().take(nvecs).enumerate() {
        let start = i * V::LANES;
        if start >= n {
            break;
        }
        let valid = (n - start).min(V::LANES);
        unsafe { reg.mask_storeu(V::mask_first(valid), ptr.add(start)) };
    }
}

/// Sorts a power-of-two group of registers into one ascending run.
pub(crate) fn sort_vectors<T: Scalar, V: SimdVec<T>>(regs: &mut [V]) {
    debug_assert!(regs.len().is_power_of_two());

    for reg in regs.iter_mut() {
        *reg = reg.sort_lanes();
    }

    let mut width = 2;
    while width <= regs.len() {
        let mut start = 0;
        while start < regs.len() {
            bitonic_merge_vectors::<T, V>(&mut regs[start..start + width]);
            start += width;
        }
        width *= 2;
    }
}

/// Merges two ascending register runs (lower and upper half of `regs`)
/// into one.
fn bitonic_merge_vectors<T: Scalar, V: SimdVec<T>>(regs: &mut [V]) {
    let n = regs.len();

    // Fold the reversed upper run into the lower one; the reversed maxima
    // keep each half register-wise bitonic.
    for i in 0..n / 2 {
        let rev = regs[n - 1 - i].reverse();
        let mn = regs[i].min(rev);
        let mx = regs[i].max(rev);
        regs[i] = mn;
        regs[n - 1 - i] = mx.reverse();
    }

    let (lo, hi) = regs.split_at_mut(n / 2);
    half_clean_vectors::<T, V>(lo);
    half_clean_vectors::<T, V>(hi);

    for reg in regs.iter_mut() {
        *reg = reg.merge_lanes();
    }
}

/// Cross-register half-cleaner: compare-exchange whole registers at halving
/// distances.
fn half_clean_vectors<T: Scalar, V: SimdVec<T>>(regs: &mut [V]) {
    let n = regs.len();
    if n < 2 {
        return;
    }
    let (lo, hi) = regs.split_at_mut(n / 2);
    for i in 0..n / 2 {
        let mn = lo[i].min(hi[i]);
        let mx = lo[i].max(hi[i]);
        lo[i] = mn;
        hi[i] = mx;
    }
    half_clean_vectors::<T, V>(lo);
    half_clean_vectors::<T, V>(hi);
}

/// Key/value form of [`sort_small`]: sorts the index slice `args` by the
/// values it points at. Value registers are gathered for comparisons only;
/// every exchange moves the index registers.
pub(crate) fn sort_small_kv<T, A, I>(values: &[T], args: &mut [i64])
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let n = args.len();
    if n <= 1 {
        return;
    }
    debug_assert!(
        n <= A::SORT_THRESHOLD,
        "base case holds at most {} elements",
        A::SORT_THRESHOLD
    );

    let nvecs = n.div_ceil(A::LANES).next_power_of_two();
    let mut vregs = [A::max_vec(); MAX_VECS];
    // Padding lanes carry the key (type max, i64::MAX): strictly greater
    // than every genuine (value, index) pair, so they always sort behind
    // the valid lanes even when the data contains the type maximum.
    let mut aregs = [I::splat(i64::MAX); MAX_VECS];
    let aptr = args.as_mut_ptr();

    for i in 0..nvecs {
        let start = i * A::LANES;
        let valid = n.saturating_sub(start).min(A::LANES);
        let mask = A::mask_first(valid);
        aregs[i] = unsafe { I::mask_loadu(I::splat(i64::MAX), mask, aptr.add(start.min(n))) };
        vregs[i] = unsafe { A::mask_gather(A::max_vec(), mask, values.as_ptr(), aregs[i]) };
    }

    sort_vectors_kv::<T, A, I>(&mut vregs[..nvecs], &mut aregs[..nvecs]);

    for i in 0..nvecs {
        let start = i * A::LANES;
        if start >= n {
            break;
        }
        let valid = (n - start).min(A::LANES);
        unsafe { aregs[i].mask_storeu(A::mask_first(valid), aptr.add(start)) };
    }
}

/// Key/value form of [`sort_vectors`].
pub(crate) fn sort_vectors_kv<T, A, I>(vals: &mut [A], args: &mut [I])
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    debug_assert_eq!(vals.len(), args.len());
    debug_assert!(vals.len().is_power_of_two());

    for (val, arg) in vals.iter_mut().zip(args.iter_mut()) {
        *val = val.sort_lanes_kv(arg);
    }

    let mut width = 2;
    while width <= vals.len() {
        let mut start = 0;
        while start < vals.len() {
            bitonic_merge_vectors_kv::<T, A, I>(
                &mut vals[start..start + width],
                &mut args[start..start + width],
            );
            start += width;
        }
        width *= 2;
    }
}

/// Lane mask of `(av, aa) > (bv, ba)` under the strict (value, index) key.
/// The index tiebreak makes every key distinct, which pins equal values --
/// and in particular the masked-off padding lanes -- to one order.
#[inline(always)]
fn kv_gt<T, A, I>(av: A, aa: I, bv: A, ba: I) -> u64
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let v_eq = av.eq(bv);
    let v_gt = av.ge(bv) & !v_eq;
    let i_gt = aa.ge(ba) & !aa.eq(ba);
    v_gt | (v_eq & i_gt)
}

fn bitonic_merge_vectors_kv<T, A, I>(vals: &mut [A], args: &mut [I])
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let n = vals.len();

    for i in 0..n / 2 {
        let rev_val = vals[n - 1 - i].reverse();
        let rev_arg = args[n - 1 - i].reverse();
        // Swap the lanes where the lower operand holds the larger key; the
        // re-reversed maxima keep each half register-wise bitonic.
        let swap = kv_gt::<T, A, I>(vals[i], args[i], rev_val, rev_arg);
        let lo_val = vals[i].blend(swap, rev_val);
        let hi_val = rev_val.blend(swap, vals[i]);
        let lo_arg = args[i].blend(swap, rev_arg);
        let hi_arg = rev_arg.blend(swap, args[i]);
        vals[i] = lo_val;
        vals[n - 1 - i] = hi_val.reverse();
        args[i] = lo_arg;
        args[n - 1 - i] = hi_arg.reverse();
    }

    let (vlo, vhi) = vals.split_at_mut(n / 2);
    let (alo, ahi) = args.split_at_mut(n / 2);
    half_clean_vectors_kv::<T, A, I>(vlo, alo);
    half_clean_vectors_kv::<T, A, I>(vhi, ahi);

    for (val, arg) in vals.iter_mut().zip(args.iter_mut()) {
        *val = val.merge_lanes_kv(arg);
    }
}

fn half_clean_vectors_kv<T, A, I>(vals: &mut [A], args: &mut [I])
where
    T: Scalar,
    A: SimdArg<T, Index = I>,
    I: SimdVec<i64>,
{
    let n = vals.len();
    if n < 2 {
        return;
    }
    let (vlo, vhi) = vals.split_at_mut(n / 2);
    let (alo, ahi) = args.split_at_mut(n / 2);
    for i in 0..n / 2 {
        let swap = kv_gt::<T, A, I>(vlo[i], alo[i], vhi[i], ahi[i]);
        let lo_val = vlo[i].blend(swap, vhi[i]);
        let hi_val = vhi[i].blend(swap, vlo[i]);
        let lo_arg = alo[i].blend(swap, ahi[i]);
        let hi_arg = ahi[i].blend(swap, alo[i]);
        vlo[i] = lo_val;
        vhi[i] = hi_val;
        alo[i] = lo_arg;
        ahi[i] = hi_arg;
    }
    half_clean_vectors_kv::<T, A, I>(vlo, alo);
    half_clean_vectors_kv::<T, A, I>(vhi, ahi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::ScalarVec;

    type V8 = ScalarVec<i32, 8>;

    fn pseudo_random(len: usize, seed: u32) -> Vec<i32> {
        // Small xorshift so the unit tests stay deterministic without pulling
        // the dev-dependencies into doc builds.
        let mut state = seed | 1;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as i32 % 1000
            })
            .collect()
    }

    #[test]
    fn test_sort_small_every_size_up_to_threshold() {
        for n in 0..=64 {
            let mut data = pseudo_random(n, 0xC0FFEE ^ n as u32);
            let mut expected = data.clone();
            expected.sort_unstable();
            sort_small::<i32, V8>(&mut data);
            assert_eq!(data, expected, "size {n}");
        }
    }

    #[test]
    fn test_sort_small_descending_with_duplicates() {
        let mut data: Vec<i32> = (0..60).rev().map(|v| v / 3).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        sort_small::<i32, V8>(&mut data);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_sort_small_sixteen_lane_backend() {
        for n in [1usize, 15, 16, 17, 100, 127, 128] {
            let mut data: Vec<i16> = pseudo_random(n, 7 + n as u32)
                .into_iter()
                .map(|v| v as i16)
                .collect();
            let mut expected = data.clone();
            expected.sort_unstable();
            sort_small::<i16, ScalarVec<i16, 16>>(&mut data);
            assert_eq!(data, expected, "size {n}");
        }
    }

    #[test]
    fn test_sort_small_kv_with_type_maximum_keeps_bijection() {
        // Genuine i32::MAX elements tie with the padding fill; the index
        // tiebreak must keep every genuine index in the stored prefix.
        for n in [3usize, 9, 17, 63] {
            let mut values = vec![i32::MAX; n];
            values[0] = -5;
            let mut args: Vec<i64> = (0..n as i64).collect();
            sort_small_kv::<i32, V8, ScalarVec<i64, 8>>(&values, &mut args);

            let mut seen = vec![false; n];
            for &idx in &args {
                assert!(
                    (0..n as i64).contains(&idx),
                    "size {n}: padding index leaked into the result"
                );
                assert!(!seen[idx as usize], "size {n}: duplicate index {idx}");
                seen[idx as usize] = true;
            }
            assert_eq!(args[0], 0, "size {n}: the single small element sorts first");
        }
    }

    #[test]
    fn test_sort_small_kv_matches_value_order() {
        for n in [2usize, 8, 9, 24, 33, 64] {
            let values = pseudo_random(n, 0xBEEF ^ n as u32);
            let mut args: Vec<i64> = (0..n as i64).collect();
            sort_small_kv::<i32, V8, ScalarVec<i64, 8>>(&values, &mut args);

            let mut seen = vec![false; n];
            for &idx in &args {
                seen[idx as usize] = true;
            }
            assert!(seen.iter().all(|&s| s), "size {n}: args must stay a permutation");

            for pair in args.windows(2) {
                assert!(
                    values[pair[0] as usize] <= values[pair[1] as usize],
                    "size {n}: values read through args must be non-decreasing"
                );
            }
        }
    }
}
