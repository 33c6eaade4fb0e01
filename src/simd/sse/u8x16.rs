//! SSE4.2 128-bit register implementation.
//!
//! `U8x16` wraps an `__m128i`. Float lanes are reinterpreted with the
//! `_mm_cast*` intrinsics, which compile to nothing.
//!
//! - `_mm_cmpeq_epi64` needs SSE4.1, `_mm_cmpgt_epi64` needs SSE4.2.
//! - The widening steps use the SSE4.1 `_mm_cvtep*` family on both halves.
//! - Byte sums use SSE2 `_mm_sad_epu8`.

use std::arch::x86_64::*;
use std::ptr;

use crate::simd::SimdVector;
use crate::types::op;

/// Register width in bytes.
pub(crate) const SSE_BYTES: usize = 16;

/// SSE 128-bit register viewed as 16 bytes.
#[derive(Copy, Clone, Debug)]
pub struct U8x16(pub(crate) __m128i);

/// Loads `bytes` (1, 2, 4, 8 or 16) bytes into the low end of an `__m128i`,
/// zeroing the rest.
///
/// # Safety
/// `ptr` must be valid for `bytes` bytes of reads. Requires SSE2.
#[inline(always)]
pub(crate) unsafe fn load_low_128(ptr: *const u8, bytes: usize) -> __m128i {
    match bytes {
        16 => _mm_loadu_si128(ptr as *const __m128i),
        8 => _mm_loadl_epi64(ptr as *const __m128i),
        4 => _mm_cvtsi32_si128(ptr::read_unaligned(ptr as *const i32)),
        2 => _mm_cvtsi32_si128(ptr::read_unaligned(ptr as *const u16) as i32),
        _ => _mm_cvtsi32_si128(*ptr as i32),
    }
}

/// Horizontal `f32` sum of four lanes using SSE only.
#[inline(always)]
pub(crate) unsafe fn hsum_ps_128(v: __m128) -> f32 {
    // lanes (0 + 2, 1 + 3), then lane 0 + lane 1
    let pairs = _mm_add_ps(v, _mm_movehl_ps(v, v));
    let total = _mm_add_ss(pairs, _mm_shuffle_ps(pairs, pairs, 0b01));
    _mm_cvtss_f32(total)
}

#[inline(always)]
pub(crate) unsafe fn hsum_pd_128(v: __m128d) -> f64 {
    _mm_cvtsd_f64(_mm_add_sd(v, _mm_unpackhi_pd(v, v)))
}

#[inline(always)]
pub(crate) unsafe fn hsum_epi64_128(v: __m128i) -> u64 {
    let lo = _mm_cvtsi128_si64(v) as u64;
    let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(v, v)) as u64;
    lo.wrapping_add(hi)
}

impl SimdVector for U8x16 {
    const BYTES: usize = SSE_BYTES;
    const MASK_BITS_PER_BYTE: u32 = 1;
    const FULL_MASK: u64 = 0xFFFF;

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(_mm_setzero_si128())
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Self(_mm_loadu_si128(ptr as *const __m128i))
    }

    #[inline(always)]
    unsafe fn load_low(ptr: *const u8, bytes: usize) -> Self {
        debug_assert!(bytes < SSE_BYTES);
        Self(load_low_128(ptr, bytes))
    }

    #[inline(always)]
    unsafe fn splat8(value: u8) -> Self {
        Self(_mm_set1_epi8(value as i8))
    }

    #[inline(always)]
    unsafe fn splat16(value: u16) -> Self {
        Self(_mm_set1_epi16(value as i16))
    }

    #[inline(always)]
    unsafe fn splat32(value: u32) -> Self {
        Self(_mm_set1_epi32(value as i32))
    }

    #[inline(always)]
    unsafe fn splat64(value: u64) -> Self {
        Self(_mm_set1_epi64x(value as i64))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(_mm_xor_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn movemask(self) -> u64 {
        _mm_movemask_epi8(self.0) as u32 as u64
    }

    #[inline(always)]
    unsafe fn cmpeq8(self, other: Self) -> Self {
        Self(_mm_cmpeq_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq16(self, other: Self) -> Self {
        Self(_mm_cmpeq_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq32(self, other: Self) -> Self {
        Self(_mm_cmpeq_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq64(self, other: Self) -> Self {
        Self(_mm_cmpeq_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i8(self, other: Self) -> Self {
        Self(_mm_cmpgt_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i16(self, other: Self) -> Self {
        Self(_mm_cmpgt_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i32(self, other: Self) -> Self {
        Self(_mm_cmpgt_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_i64(self, other: Self) -> Self {
        Self(_mm_cmpgt_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmp_f32<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (_mm_castsi128_ps(self.0), _mm_castsi128_ps(other.0));
        let mask = match OP {
            op::EQ => _mm_cmpeq_ps(a, b),
            op::NE => _mm_cmpneq_ps(a, b),
            op::GT => _mm_cmpgt_ps(a, b),
            op::GE => _mm_cmpge_ps(a, b),
            op::LT => _mm_cmplt_ps(a, b),
            _ => _mm_cmple_ps(a, b),
        };
        Self(_mm_castps_si128(mask))
    }

    #[inline(always)]
    unsafe fn cmp_f64<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (_mm_castsi128_pd(self.0), _mm_castsi128_pd(other.0));
        let mask = match OP {
            op::EQ => _mm_cmpeq_pd(a, b),
            op::NE => _mm_cmpneq_pd(a, b),
            op::GT => _mm_cmpgt_pd(a, b),
            op::GE => _mm_cmpge_pd(a, b),
            op::LT => _mm_cmplt_pd(a, b),
            _ => _mm_cmple_pd(a, b),
        };
        Self(_mm_castpd_si128(mask))
    }

    #[inline(always)]
    unsafe fn add8(self, other: Self) -> Self {
        Self(_mm_add_epi8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add16(self, other: Self) -> Self {
        Self(_mm_add_epi16(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add32(self, other: Self) -> Self {
        Self(_mm_add_epi32(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add64(self, other: Self) -> Self {
        Self(_mm_add_epi64(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add_f32(self, other: Self) -> Self {
        let sum = _mm_add_ps(_mm_castsi128_ps(self.0), _mm_castsi128_ps(other.0));
        Self(_mm_castps_si128(sum))
    }

    #[inline(always)]
    unsafe fn add_f64(self, other: Self) -> Self {
        let sum = _mm_add_pd(_mm_castsi128_pd(self.0), _mm_castsi128_pd(other.0));
        Self(_mm_castpd_si128(sum))
    }

    #[inline(always)]
    unsafe fn sum_bytes(self) -> Self {
        Self(_mm_sad_epu8(self.0, _mm_setzero_si128()))
    }

    #[inline(always)]
    unsafe fn widen_i8(self) -> Self {
        let hi = _mm_srli_si128(self.0, 8);
        Self(_mm_add_epi16(_mm_cvtepi8_epi16(self.0), _mm_cvtepi8_epi16(hi)))
    }

    #[inline(always)]
    unsafe fn widen_u16(self) -> Self {
        let hi = _mm_srli_si128(self.0, 8);
        Self(_mm_add_epi32(_mm_cvtepu16_epi32(self.0), _mm_cvtepu16_epi32(hi)))
    }

    #[inline(always)]
    unsafe fn widen_i16(self) -> Self {
        let hi = _mm_srli_si128(self.0, 8);
        Self(_mm_add_epi32(_mm_cvtepi16_epi32(self.0), _mm_cvtepi16_epi32(hi)))
    }

    #[inline(always)]
    unsafe fn widen_u32(self) -> Self {
        let hi = _mm_srli_si128(self.0, 8);
        Self(_mm_add_epi64(_mm_cvtepu32_epi64(self.0), _mm_cvtepu32_epi64(hi)))
    }

    #[inline(always)]
    unsafe fn widen_i32(self) -> Self {
        let hi = _mm_srli_si128(self.0, 8);
        Self(_mm_add_epi64(_mm_cvtepi32_epi64(self.0), _mm_cvtepi32_epi64(hi)))
    }

    #[inline(always)]
    unsafe fn hsum64(self) -> u64 {
        hsum_epi64_128(self.0)
    }

    #[inline(always)]
    unsafe fn hsum_f32(self) -> f32 {
        hsum_ps_128(_mm_castsi128_ps(self.0))
    }

    #[inline(always)]
    unsafe fn hsum_f64(self) -> f64 {
        hsum_pd_128(_mm_castsi128_pd(self.0))
    }
}
