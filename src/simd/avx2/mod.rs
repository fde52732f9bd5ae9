//! AVX2 backend for 256-bit vector operations on 32-bit elements.
//!
//! This module implements the lane capability over Intel's Advanced Vector
//! Extensions 2 (AVX2) instruction set, available on most Intel processors
//! since Haswell (2013) and AMD processors since Excavator (2015). Each
//! register holds eight 32-bit lanes.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Compilation**: Must be compiled with AVX2 enabled (`-C target-feature=+avx2`)
//! - **Runtime Detection**: The build system automatically detects AVX2 availability
//!
//! # Available Types
//!
//! - [`i32x8::I32x8`]: 8 packed signed 32-bit integers
//! - [`u32x8::U32x8`]: 8 packed unsigned 32-bit integers
//! - [`f32x8::F32x8`]: 8 packed single-precision floats
//!
//! The 64-bit and 16-bit element types run on the portable
//! [`crate::simd::fallback`] backend: AVX2 has no masked-gather/compress
//! forms wide enough to carry them profitably.
//!
//! # Shared machinery
//!
//! AVX2 has no compress-store instruction, so the backend keeps a 256-entry
//! table of lane permutations (one per 8-bit lane mask) and packs selected
//! lanes with `vpermd` before a masked store. Lane masks travel as `u64`
//! bitmasks produced by `movemask`; [`mask_to_m256i`] expands them back into
//! full-lane vector masks for the masked load/store/blend forms.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

pub mod f32x8;
pub mod i32x8;
pub mod u32x8;

/// Number of 32-bit elements that fit in an AVX2 256-bit vector.
pub(crate) const LANE_COUNT: usize = 8;

/// Builds the compress permutation table: entry `m` lists the set lanes of
/// `m` in ascending order, packed to the front.
const fn build_compress_table() -> [[i32; 8]; 256] {
    let mut table = [[0i32; 8]; 256];
    let mut mask = 0usize;
    while mask < 256 {
        let mut packed = 0usize;
        let mut lane = 0usize;
        while lane < 8 {
            if mask & (1 << lane) != 0 {
                table[mask][packed] = lane as i32;
                packed += 1;
            }
            lane += 1;
        }
        mask += 1;
    }
    table
}

/// Lane permutations packing mask-selected lanes to the front, one entry per
/// 8-bit lane mask. Indexed by the `movemask` result of a compare.
pub(crate) static COMPRESS_PERM: [[i32; 8]; 256] = build_compress_table();

/// Expands a `u64` lane bitmask into a vector mask with all bits of each
/// selected lane set, the form `maskload`/`maskstore`/`blendv` consume.
#[inline(always)]
pub(crate) unsafe fn mask_to_m256i(mask: u64) -> __m256i {
    let bits = _mm256_set1_epi32(mask as i32);
    let lane_bits = _mm256_setr_epi32(1, 2, 4, 8, 16, 32, 64, 128);
    _mm256_cmpeq_epi32(_mm256_and_si256(bits, lane_bits), lane_bits)
}
