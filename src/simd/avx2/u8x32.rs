//! AVX2 256-bit register implementation.
//!
//! Most AVX2 integer instructions operate on two independent 128-bit halves.
//! None of the kernels depend on cross-lane order except the widening steps,
//! which convert each half separately and add the results, so the lane order
//! inside a widened register differs from memory order. Only lane *totals*
//! are ever observed, so this is harmless.

use std::arch::x86_64::*;

use crate::simd::sse::{hsum_epi64_128, hsum_pd_128, hsum_ps_128, load_low_128};
use crate::simd::SimdVector;
use crate::types::op;

/// Register width in bytes.
pub const AVX_BYTES: usize = 32;

/// AVX2 256-bit register viewed as 32 bytes.
#[derive(Copy, Clone, Debug)]
pub struct U8x32(pub(crate) __m256i);

#[inline(always)]
unsafe fn low(v: __m256i) -> __m128i {
    _mm256_castsi256_si128(v)
}

#[inline(always)]
unsafe fn high(v: __m256i) -> __m128i {
    _mm256_extracti128_si256(v, 1)
}

impl SimdVector for U8x32 {
    const BYTES: usize = AVX_BYTES;
    const MASK_BITS_PER_BYTE: u32 = 1;
    const FULL_MASK: u64 = 0xFFFF_FFFF;

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(_mm256_setzero_si256())
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Self(_mm256_loadu_si256(ptr as *const __m256i))
    }

    #[inline(always)]
    unsafe fn load_low(ptr: *const u8, bytes: usize) -> Self {
        debug_assert!(bytes < AVX_BYTES);
        Self(_mm256_set_m128i(_mm_setzero_si128(), load_low_128(ptr, bytes)))
    }

    #[inline(always)]
    unsafe fn splat8(value: u8) -> Self {
        Self(_mm256_set1_epi8(value as i8))
    }

    #[inline(always)]
    unsafe fn splat16(value: u16) -> Self {
        Self(_mm256_set1_epi16(value as i16))
    }

    #[inline(always)]
    unsafe fn splat32(value: u32) -> Self {
        Self(_mm256_set1_epi32(value as i32))
    }

    #[inline(always)]
    unsafe fn splat64(value: u64) -> Self {
        Self(_mm256_set1_epi64x(value as i64))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(_mm256_xor_si256(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn movemask(self) -> u64 {
        _mm256_movemask_epi8(self.0) as u32 as u64
    }

    #[inline(always)]
    unsafe fn cmpeq8(self, other: Self) -> Self {
        Self(_mm256_cmpeq_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq16(self, other: Self) -> Self {
        Self(_mm256_cmpeq_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq32(self, other: Self) -> Self {
        Self(_mm256_cmpeq_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq64(self, other: Self) -> Self {
        Self(_mm256_cmpeq_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i8(self, other: Self) -> Self {
        Self(_mm256_cmpgt_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i16(self, other: Self) -> Self {
        Self(_mm256_cmpgt_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i32(self, other: Self) -> Self {
        Self(_mm256_cmpgt_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i64(self, other: Self) -> Self {
        Self(_mm256_cmpgt_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmp_f32<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (_mm256_castsi256_ps(self.0), _mm256_castsi256_ps(other.0));
        // Ordered predicates are false on NaN, NEQ is unordered so NaN != x.
        let mask = match OP {
            op::EQ => _mm256_cmp_ps(a, b, _CMP_EQ_OQ),
            op::NE => _mm256_cmp_ps(a, b, _CMP_NEQ_UQ),
            op::GT => _mm256_cmp_ps(a, b, _CMP_GT_OQ),
            op::GE => _mm256_cmp_ps(a, b, _CMP_GE_OQ),
            op::LT => _mm256_cmp_ps(a, b, _CMP_LT_OQ),
            _ => _mm256_cmp_ps(a, b, _CMP_LE_OQ),
        };
        Self(_mm256_castps_si256(mask))
    }

    #[inline(always)]
    unsafe fn cmp_f64<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (_mm256_castsi256_pd(self.0), _mm256_castsi256_pd(other.0));
        let mask = match OP {
            op::EQ => _mm256_cmp_pd(a, b, _CMP_EQ_OQ),
            op::NE => _mm256_cmp_pd(a, b, _CMP_NEQ_UQ),
            op::GT => _mm256_cmp_pd(a, b, _CMP_GT_OQ),
            op::GE => _mm256_cmp_pd(a, b, _CMP_GE_OQ),
            op::LT => _mm256_cmp_pd(a, b, _CMP_LT_OQ),
            _ => _mm256_cmp_pd(a, b, _CMP_LE_OQ),
        };
        Self(_mm256_castpd_si256(mask))
    }

    #[inline(always)]
    unsafe fn add8(self, other: Self) -> Self {
        Self(_mm256_add_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add16(self, other: Self) -> Self {
        Self(_mm256_add_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add32(self, other: Self) -> Self {
        Self(_mm256_add_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add64(self, other: Self) -> Self {
        Self(_mm256_add_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add_f32(self, other: Self) -> Self {
        let sum = _mm256_add_ps(_mm256_castsi256_ps(self.0), _mm256_castsi256_ps(other.0));
        Self(_mm256_castps_si256(sum))
    }

    #[inline(always)]
    unsafe fn add_f64(self, other: Self) -> Self {
        let sum = _mm256_add_pd(_mm256_castsi256_pd(self.0), _mm256_castsi256_pd(other.0));
        Self(_mm256_castpd_si256(sum))
    }

    #[inline(always)]
    unsafe fn sum_bytes(self) -> Self {
        Self(_mm256_sad_epu8(self.0, _mm256_setzero_si256()))
    }

    #[inline(always)]
    unsafe fn widen_i8(self) -> Self {
        Self(_mm256_add_epi16(
            _mm256_cvtepi8_epi16(low(self.0)),
            _mm256_cvtepi8_epi16(high(self.0)),
        ))
    }

    #[inline(always)]
    unsafe fn widen_u16(self) -> Self {
        Self(_mm256_add_epi32(
            _mm256_cvtepu16_epi32(low(self.0)),
            _mm256_cvtepu16_epi32(high(self.0)),
        ))
    }

    #[inline(always)]
    unsafe fn widen_i16(self) -> Self {
        Self(_mm256_add_epi32(
            _mm256_cvtepi16_epi32(low(self.0)),
            _mm256_cvtepi16_epi32(high(self.0)),
        ))
    }

    #[inline(always)]
    unsafe fn widen_u32(self) -> Self {
        Self(_mm256_add_epi64(
            _mm256_cvtepu32_epi64(low(self.0)),
            _mm256_cvtepu32_epi64(high(self.0)),
        ))
    }

    #[inline(always)]
    unsafe fn widen_i32(self) -> Self {
        Self(_mm256_add_epi64(
            _mm256_cvtepi32_epi64(low(self.0)),
            _mm256_cvtepi32_epi64(high(self.0)),
        ))
    }

    #[inline(always)]
    unsafe fn hsum64(self) -> u64 {
        hsum_epi64_128(_mm_add_epi64(low(self.0), high(self.0)))
    }

    #[inline(always)]
    unsafe fn hsum_f32(self) -> f32 {
        let v = _mm256_castsi256_ps(self.0);
        hsum_ps_128(_mm_add_ps(
            _mm256_castps256_ps128(v),
            _mm256_extractf128_ps(v, 1),
        ))
    }

    #[inline(always)]
    unsafe fn hsum_f64(self) -> f64 {
        let v = _mm256_castsi256_pd(self.0);
        hsum_pd_128(_mm_add_pd(
            _mm256_castpd256_pd128(v),
            _mm256_extractf128_pd(v, 1),
        ))
    }
}
