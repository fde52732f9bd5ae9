//! AVX2 8-lane u32 SIMD vector implementation.
//!
//! Same layout and network as [`crate::simd::avx2::i32x8`], but with the
//! unsigned min/max forms, and ordered compares built by biasing both
//! operands with the sign bit (AVX2 only compares signed integers).

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::avx2::{mask_to_m256i, COMPRESS_PERM, LANE_COUNT};
use crate::simd::traits::SimdVec;

/// AVX2 SIMD vector containing 8 packed u32 values.
#[derive(Copy, Clone, Debug)]
pub struct U32x8 {
    /// AVX2 256-bit vector register containing 8 packed u32 values
    pub elements: __m256i,
}

#[inline(always)]
unsafe fn cmp_merge<const MASK: i32>(a: __m256i, b: __m256i) -> __m256i {
    let mn = _mm256_min_epu32(a, b);
    let mx = _mm256_max_epu32(a, b);
    _mm256_blend_epi32::<MASK>(mn, mx)
}

/// Unsigned `a < b` lane mask via sign-bias: flipping the top bit maps the
/// unsigned order onto the signed compare.
#[inline(always)]
unsafe fn lt_epu32(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi32(i32::MIN);
    _mm256_cmpgt_epi32(_mm256_xor_si256(b, bias), _mm256_xor_si256(a, bias))
}

impl U32x8 {
    #[inline(always)]
    unsafe fn movemask(v: __m256i) -> u64 {
        _mm256_movemask_ps(_mm256_castsi256_ps(v)) as u64 & 0xFF
    }

    #[inline(always)]
    fn to_array(self) -> [u32; LANE_COUNT] {
        let mut buf = [0u32; LANE_COUNT];
        unsafe { self.storeu(buf.as_mut_ptr()) };
        buf
    }
}

impl SimdVec<u32> for U32x8 {
    const LANES: usize = LANE_COUNT;
    const SORT_THRESHOLD: usize = 8 * LANE_COUNT;
    const PARTITION_UNROLL: usize = 2;

    #[inline(always)]
    fn splat(value: u32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_epi32(value as i32) },
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const u32) -> Self {
        Self {
            elements: _mm256_loadu_si256(ptr as *const __m256i),
        }
    }

    #[inline(always)]
    unsafe fn mask_loadu(fill: Self, mask: u64, ptr: *const u32) -> Self {
        let vmask = mask_to_m256i(mask);
        let loaded = _mm256_maskload_epi32(ptr as *const i32, vmask);
        Self {
            elements: _mm256_blendv_epi8(fill.elements, loaded, vmask),
        }
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut u32) {
        _mm256_storeu_si256(ptr as *mut __m256i, self.elements);
    }

    #[inline(always)]
    unsafe fn mask_storeu(self, mask: u64, ptr: *mut u32) {
        _mm256_maskstore_epi32(ptr as *mut i32, mask_to_m256i(mask), self.elements);
    }

    #[inline(always)]
    unsafe fn compress_storeu(self, mask: u64, ptr: *mut u32) {
        let perm = _mm256_loadu_si256(
            COMPRESS_PERM[(mask & 0xFF) as usize].as_ptr() as *const __m256i
        );
        let packed = _mm256_permutevar8x32_epi32(self.elements, perm);
        let count = mask.count_ones() as usize;
        _mm256_maskstore_epi32(ptr as *mut i32, mask_to_m256i(Self::mask_first(count)), packed);
    }

    #[inline(always)]
    fn ge(self, other: Self) -> u64 {
        unsafe { !Self::movemask(lt_epu32(self.elements, other.elements)) & 0xFF }
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
            elements: unsafe { _mm256_min_epu32(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn max(self, other: Self) -> Self {
        Self {
            elements: unsafe { _mm256_max_epu32(self.elements, other.elements) },
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
    fn reduce_min(self) -> u32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            acc = acc.min(v);
        }
        acc
    }

    #[inline(always)]
    fn reduce_max(self) -> u32 {
        let buf = self.to_array();
        let mut acc = buf[0];
        for &v in &buf[1..] {
            acc = acc.max(v);
        }
        acc
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> u32 {
        debug_assert!(lane < LANE_COUNT, "lane index must be < {LANE_COUNT}");
        self.to_array()[lane]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_array(data: [u32; 8]) -> U32x8 {
        unsafe { U32x8::loadu(data.as_ptr()) }
    }

    #[test]
    fn test_sort_lanes_handles_high_bit_values() {
        let sorted = from_array([u32::MAX, 3, 0x8000_0000, 0, 7, u32::MAX - 1, 1, 2]).sort_lanes();
        assert_eq!(
            sorted.to_array(),
            [0, 1, 2, 3, 7, 0x8000_0000, u32::MAX - 1, u32::MAX]
        );
    }

    #[test]
    fn test_ge_mask_is_unsigned() {
        let a = from_array([0, 1, 0x8000_0000, u32::MAX, 5, 6, 7, 8]);
        let b = U32x8::splat(6);
        assert_eq!(a.ge(b), 0b1110_1100);
    }

    #[test]
    fn test_compress_storeu_packs_selected_lanes() {
        let v = from_array([1, 2, 3, 4, 5, 6, 7, 8]);
        let mut out = [0u32; 8];
        unsafe { v.compress_storeu(0b0101_0101, out.as_mut_ptr()) };
        assert_eq!(&out[..4], &[1, 3, 5, 7]);
    }
}
