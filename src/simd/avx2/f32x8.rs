//! AVX2 8-lane f32 SIMD vector implementation.
//!
//! This module provides `F32x8`, a SIMD vector type that wraps Intel's AVX2
//! `__m256` register to run the lane capability on 8 single-precision
//! floating-point values at a time. The sorting paths only ever see this type
//! after the NaN pre-pass has replaced NaN with `+inf`, so the ordered
//! compare and min/max forms are total here.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::avx2::{mask_to_m256i, COMPRESS_PERM, LANE_COUNT};
use crate::simd::traits::SimdVec;

/// AVX2 SIMD vector containing 8 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// AVX2 256-bit vector register containing 8 packed f32 values
    pub elements: __m256,
}

#[inline(always)]
unsafe fn cmp_merge<const MASK: i32>(a: __m256, b: __m256) -> __m256 {
    let mn = _mm256_min_ps(a, b);
    let mx = _mm256_max_ps(a, b);
    _mm256_blend_ps::<MASK>(mn, mx)
}

impl F32x8 {
    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut buf = [0f32; LANE_COUNT];
        unsafe { self.storeu(buf.as_mut_ptr()) };
        buf
    }
}

impl SimdVec<f32> for F32x8 {
    const LANES: usize = LANE_COUNT;
    const SORT_THRESHOLD: usize = 8 * LANE_COUNT;
    const PARTITION_UNROLL: usize = 2;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_ps(value) },
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_loadu_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn mask_loadu(fill: Self, mask: u64, ptr: *const f32) -> Self {
        let vmask = mask_to_m256i(mask);
        let loaded = _mm256_maskload_ps(ptr, vmask);
        Self {
            elements: _mm256_blendv_ps(fill.elements, loaded, _mm256_castsi256_ps(vmask)),
        }
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f32) {
        _mm256_storeu_ps(ptr, self.elements);
    }

    #[inline(always)]
    unsafe fn mask_storeu(self, mask: u64, ptr: *mut f32) {
        _mm256_maskstore_ps(ptr, mask_to_m256i(mask), self.elements);
    }

    #[inline(always)]
    unsafe fn compress_storeu(self, mask: u64, ptr: *mut f32) {
        let perm = _mm256_loadu_si256(
            COMPRESS_PERM[(mask & 0xFF) as usize].as_ptr() as *const __m256i
        );
        let packed = _mm256_permutevar8x32_ps(self.elements, perm);
        let count = mask.count_ones() as usize;
        _mm256_maskstore_ps(ptr, mask_to_m256i(Self::mask_first(count)), packed);
    }

    #[inline(always)]
    fn ge(self, other: Self) -> u64 {
        unsafe {
            let cmp = _mm256_cmp_ps::<_CMP_GE_OQ>(self.elements, other.elements);
            _mm256_movemask_ps(cmp) as u64 & 0xFF
        }
    }

    #[inline(always)]
    fn eq(self, other: Self) -> u64 {
        unsafe {
            let cmp = _mm256_cmp_ps::<_CMP_EQ_OQ>(self.elements, other.elements);
            _mm256_movemask_ps(cmp) as u64 & 0xFF
        }
    }

    #[inline(always)]
    fn blend(self, mask: u64, other: Self) -> Self {
        Self {
            elements: unsafe {
                _mm256_blendv_ps(
                    self.elements,
                    other.elements,
                    _mm256_castsi256_ps(mask_to_m256i(mask)),
                )
            },
        }
    }

    #[inline(always)]
    fn min(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_min_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_ps(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn reverse(self) -> Self {
        Self {
            elements: unsafe {
                let swapped = _mm256_permute2f128_ps::<0x01>(self.elements, self.elements);
                _mm256_permute_ps::<0x1B>(swapped)
            },
        }
    }

    #[inline(always)]
    fn sort_lanes(self) -> Self {
        unsafe {
            let mut v = self.elements;
            v = cmp_merge::<0xAA>(v, _mm256_permute_ps::<0xB1>(v));
            v = cmp_merge::<0xCC>(v, _mm256_permute_ps::<0x1B>(v));
            v = cmp_merge::<0xAA>(v, _mm256_permute_ps::<0xB1>(v));
            v = cmp_merge::<0xF0>(v, Self { elements: v }.reverse().elements);
            v = cmp_merge::<0xCC>(v, _mm256_permute_ps::<0x4E>(v));
            v = cmp_merge::<0xAA>(v, _mm256_permute_ps::<0xB1>(v));
            Self { elements: v }
        }
    }

    #[inline(always)]
    fn merge_lanes(self) -> Self {
        unsafe {
            let mut v = self.elements;
            v = cmp_merge::<0xF0>(v, _mm256_permute2f128_ps::<0x01>(v, v));
            v = cmp_merge::<0xCC>(v, _mm256_permute_ps::<0x4E>(v));
            v = cmp_merge::<0xAA>(v, _mm256_permute_ps::<0xB1>(v));
            Self { elements: v }
        }
    }

    #[inline(always)]
    fn reduce_min(self) -> f32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            if v < acc {
                acc = v;
            }
        }
        acc
    }

    #[inline(always)]
    fn reduce_max(self) -> f32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            if v > acc {
                acc = v;
            }
        }
        acc
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        debug_assert!(lane < LANE_COUNT, "lane index must be < {LANE_COUNT}");
        self.to_array()[lane]
    }
}
