//! AVX2 8-lane i32 SIMD vector implementation.
//!
//! `I32x8` wraps an AVX2 `__m256i` register holding eight packed signed
//! 32-bit integers and implements the lane capability the sorting engine
//! consumes: masked loads and stores, compress-store, compare masks, and the
//! fixed-stage bitonic network over eight lanes.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::avx2::{mask_to_m256i, COMPRESS_PERM, LANE_COUNT};
use crate::simd::traits::SimdVec;

/// AVX2 SIMD vector containing 8 packed i32 values.
#[derive(Copy, Clone, Debug)]
pub struct I32x8 {
    /// AVX2 256-bit vector register containing 8 packed i32 values
    pub elements: __m256i,
}

/// Compare-exchange step of the bitonic network: lanes of `a` meet the
/// permuted partner lanes in `b`; blend-mask bits mark the lanes that keep
/// the maximum.
#[inline(always)]
unsafe fn cmp_merge<const MASK: i32>(a: __m256i, b: __m256i) -> __m256i {
    let mn = _mm256_min_epi32(a, b);
    let mx = _mm256_max_epi32(a, b);
    _mm256_blend_epi32::<MASK>(mn, mx)
}

impl I32x8 {
    #[inline(always)]
    unsafe fn movemask(v: __m256i) -> u64 {
        _mm256_movemask_ps(_mm256_castsi256_ps(v)) as u64 & 0xFF
    }

    #[inline(always)]
    fn to_array(self) -> [i32; LANE_COUNT] {
        let mut buf = [0i32; LANE_COUNT];
        unsafe { self.storeu(buf.as_mut_ptr()) };
        buf
    }
}

impl SimdVec<i32> for I32x8 {
    const LANES: usize = LANE_COUNT;
    const SORT_THRESHOLD: usize = 8 * LANE_COUNT;
    const PARTITION_UNROLL: usize = 2;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_epi32(value) },
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const i32) -> Self {
        Self {
            elements: _mm256_loadu_si256(ptr as *const __m256i),
        }
    }

    /// Masked load built from `vpmaskmovd`; unselected lanes are taken from
    /// `fill` so padding can be forced to the type maximum.
    #[inline(always)]
    unsafe fn mask_loadu(fill: Self, mask: u64, ptr: *const i32) -> Self {
        let vmask = mask_to_m256i(mask);
        let loaded = _mm256_maskload_epi32(ptr, vmask);
        Self {
            elements: _mm256_blendv_epi8(fill.elements, loaded, vmask),
        }
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut i32) {
        _mm256_storeu_si256(ptr as *mut __m256i, self.elements);
    }

    #[inline(always)]
    unsafe fn mask_storeu(self, mask: u64, ptr: *mut i32) {
        _mm256_maskstore_epi32(ptr, mask_to_m256i(mask), self.elements);
    }

    /// Compress-store emulation: `vpermd` packs the selected lanes to the
    /// front using the precomputed permutation for `mask`, then a masked
    /// store writes exactly `count_ones(mask)` elements.
    #[inline(always)]
    unsafe fn compress_storeu(self, mask: u64, ptr: *mut i32) {
        let perm = _mm256_loadu_si256(
            COMPRESS_PERM[(mask & 0xFF) as usize].as_ptr() as *const __m256i
        );
        let packed = _mm256_permutevar8x32_epi32(self.elements, perm);
        let count = mask.count_ones() as usize;
        _mm256_maskstore_epi32(ptr, mask_to_m256i(Self::mask_first(count)), packed);
    }

    #[inline(always)]
    fn ge(self, other: Self) -> u64 {
        unsafe {
            let lt = _mm256_cmpgt_epi32(other.elements, self.elements);
            !Self::movemask(lt) & 0xFF
        }
    }

    #[inline(always)]
    fn eq(self, other: Self) -> u64 {
        unsafe { Self::movemask(_mm256_cmpeq_epi32(self.elements, other.elements)) }
    }

    #[inline(always)]
    fn blend(self, mask: u64, other: Self) -> Self {
        Self {
            elements: unsafe {
                _mm256_blendv_epi8(self.elements, other.elements, mask_to_m256i(mask))
            },
        }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epi32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn reverse(self) -> Self {
        Self {
            elements: unsafe {
                let swapped = _mm256_permute2x128_si256::<0x01>(self.elements, self.elements);
                _mm256_shuffle_epi32::<0x1B>(swapped)
            },
        }
    }

    /// Full 8-lane bitonic sorting network: six fixed compare-exchange
    /// stages (pairs, reversed quads, pairs, full reverse, distance-2,
    /// pairs), branch-free by construction.
    #[inline(always)]
    fn sort_lanes(self) -> Self {
        unsafe {
            let mut v = self.elements;
            v = cmp_merge::<0xAA>(v, _mm256_shuffle_epi32::<0xB1>(v));
            v = cmp_merge::<0xCC>(v, _mm256_shuffle_epi32::<0x1B>(v));
            v = cmp_merge::<0xAA>(v, _mm256_shuffle_epi32::<0xB1>(v));
            v = cmp_merge::<0xF0>(v, Self { elements: v }.reverse().elements);
            v = cmp_merge::<0xCC>(v, _mm256_shuffle_epi32::<0x4E>(v));
            v = cmp_merge::<0xAA>(v, _mm256_shuffle_epi32::<0xB1>(v));
            Self { elements: v }
        }
    }

    /// Bitonic half-cleaner: compare-exchange at distance 4, 2, 1.
    #[inline(always)]
    fn merge_lanes(self) -> Self {
        unsafe {
            let mut v = self.elements;
            v = cmp_merge::<0xF0>(v, _mm256_permute2x128_si256::<0x01>(v, v));
            v = cmp_merge::<0xCC>(v, _mm256_shuffle_epi32::<0x4E>(v));
            v = cmp_merge::<0xAA>(v, _mm256_shuffle_epi32::<0xB1>(v));
            Self { elements: v }
        }
    }

    #[inline(always)]
    fn reduce_min(self) -> i32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            acc = acc.min(v);
        }
        acc
    }

    #[inline(always)]
    fn reduce_max(self) -> i32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            acc = acc.max(v);
        }
        acc
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> i32 {
        debug_assert!(lane < LANE_COUNT, "lane index must be < {LANE_COUNT}");
        self.to_array()[lane]
    }
}
