//! NEON 128-bit register implementation.
//!
//! NEON has no `movemask`. The usual replacement narrows every 16-bit lane by
//! 4 bits (`vshrn_n_u16`), leaving 4 mask bits per byte in a 64-bit scalar.
//! Search decodes indices with `MASK_BITS_PER_BYTE = 4` accordingly.
//!
//! Unsigned compares are native here, so the sign-flip defaults of
//! [`SimdVector`] are overridden.

use std::arch::aarch64::*;
use std::ptr;

use crate::simd::SimdVector;
use crate::types::op;

/// Register width in bytes.
pub const NEON_BYTES: usize = 16;

/// NEON 128-bit register viewed as 16 bytes.
#[derive(Copy, Clone, Debug)]
pub struct U8x16(pub(crate) uint8x16_t);

impl U8x16 {
    #[inline(always)]
    unsafe fn u16(self) -> uint16x8_t {
        vreinterpretq_u16_u8(self.0)
    }

    #[inline(always)]
    unsafe fn u32(self) -> uint32x4_t {
        vreinterpretq_u32_u8(self.0)
    }

    #[inline(always)]
    unsafe fn u64(self) -> uint64x2_t {
        vreinterpretq_u64_u8(self.0)
    }

    #[inline(always)]
    unsafe fn f32(self) -> float32x4_t {
        vreinterpretq_f32_u8(self.0)
    }

    #[inline(always)]
    unsafe fn f64(self) -> float64x2_t {
        vreinterpretq_f64_u8(self.0)
    }
}

impl SimdVector for U8x16 {
    const BYTES: usize = NEON_BYTES;
    const MASK_BITS_PER_BYTE: u32 = 4;
    const FULL_MASK: u64 = u64::MAX;

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(vdupq_n_u8(0))
    }

    #[inline(always)]
    unsafe fn load(ptr: *const u8) -> Self {
        Self(vld1q_u8(ptr))
    }

    #[inline(always)]
    unsafe fn load_low(ptr: *const u8, bytes: usize) -> Self {
        debug_assert!(bytes < NEON_BYTES);
        let bits = match bytes {
            8 => ptr::read_unaligned(ptr as *const u64),
            4 => ptr::read_unaligned(ptr as *const u32) as u64,
            2 => ptr::read_unaligned(ptr as *const u16) as u64,
            _ => *ptr as u64,
        };
        Self(vreinterpretq_u8_u64(vcombine_u64(
            vcreate_u64(bits),
            vcreate_u64(0),
        )))
    }

    #[inline(always)]
    unsafe fn splat8(value: u8) -> Self {
        Self(vdupq_n_u8(value))
    }

    #[inline(always)]
    unsafe fn splat16(value: u16) -> Self {
        Self(vreinterpretq_u8_u16(vdupq_n_u16(value)))
    }

    #[inline(always)]
    unsafe fn splat32(value: u32) -> Self {
        Self(vreinterpretq_u8_u32(vdupq_n_u32(value)))
    }

    #[inline(always)]
    unsafe fn splat64(value: u64) -> Self {
        Self(vreinterpretq_u8_u64(vdupq_n_u64(value)))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
        Self(veorq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn movemask(self) -> u64 {
        let nibbles = vshrn_n_u16(self.u16(), 4);
        vget_lane_u64(vreinterpret_u64_u8(nibbles), 0)
    }

    #[inline(always)]
    unsafe fn cmpeq8(self, other: Self) -> Self {
        Self(vceqq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq16(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u16(vceqq_u16(self.u16(), other.u16())))
    }

    #[inline(always)]
    unsafe fn cmpeq32(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u32(vceqq_u32(self.u32(), other.u32())))
    }

    #[inline(always)]
    unsafe fn cmpeq64(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u64(vceqq_u64(self.u64(), other.u64())))
    }

    #[inline(always)]
    unsafe fn cmpgt_i8(self, other: Self) -> Self {
        Self(vcgtq_s8(
            vreinterpretq_s8_u8(self.0),
            vreinterpretq_s8_u8(other.0),
        ))
    }

    #[inline(always)]
    unsafe fn cmpgt_i16(self, other: Self) -> Self {
        let gt = vcgtq_s16(vreinterpretq_s16_u8(self.0), vreinterpretq_s16_u8(other.0));
        Self(vreinterpretq_u8_u16(gt))
    }

    #[inline(always)]
    unsafe fn cmpgt_i32(self, other: Self) -> Self {
        let gt = vcgtq_s32(vreinterpretq_s32_u8(self.0), vreinterpretq_s32_u8(other.0));
        Self(vreinterpretq_u8_u32(gt))
    }

    #[inline(always)]
    unsafe fn cmpgt_i64(self, other: Self) -> Self {
        let gt = vcgtq_s64(vreinterpretq_s64_u8(self.0), vreinterpretq_s64_u8(other.0));
        Self(vreinterpretq_u8_u64(gt))
    }

    #[inline(always)]
    unsafe fn cmpgt_u8(self, other: Self) -> Self {
        Self(vcgtq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpgt_u16(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u16(vcgtq_u16(self.u16(), other.u16())))
    }

    #[inline(always)]
    unsafe fn cmpgt_u32(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u32(vcgtq_u32(self.u32(), other.u32())))
    }

    #[inline(always)]
    unsafe fn cmpgt_u64(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u64(vcgtq_u64(self.u64(), other.u64())))
    }

    #[inline(always)]
    unsafe fn cmp_f32<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (self.f32(), other.f32());
        let mask = match OP {
            op::EQ => vceqq_f32(a, b),
            // NaN != x holds, so NE is the complement of EQ.
            op::NE => vmvnq_u32(vceqq_f32(a, b)),
            op::GT => vcgtq_f32(a, b),
            op::GE => vcgeq_f32(a, b),
            op::LT => vcltq_f32(a, b),
            _ => vcleq_f32(a, b),
        };
        Self(vreinterpretq_u8_u32(mask))
    }

    #[inline(always)]
    unsafe fn cmp_f64<const OP: u8>(self, other: Self) -> Self {
        let (a, b) = (self.f64(), other.f64());
        let mask = match OP {
            op::EQ => vceqq_f64(a, b),
            op::NE => {
                let eq = vreinterpretq_u32_u64(vceqq_f64(a, b));
                vreinterpretq_u64_u32(vmvnq_u32(eq))
            }
            op::GT => vcgtq_f64(a, b),
            op::GE => vcgeq_f64(a, b),
            op::LT => vcltq_f64(a, b),
            _ => vcleq_f64(a, b),
        };
        Self(vreinterpretq_u8_u64(mask))
    }

    #[inline(always)]
    unsafe fn add8(self, other: Self) -> Self {
        Self(vaddq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn add16(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u16(vaddq_u16(self.u16(), other.u16())))
    }

    #[inline(always)]
    unsafe fn add32(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u32(vaddq_u32(self.u32(), other.u32())))
    }

    #[inline(always)]
    unsafe fn add64(self, other: Self) -> Self {
        Self(vreinterpretq_u8_u64(vaddq_u64(self.u64(), other.u64())))
    }

    #[inline(always)]
    unsafe fn add_f32(self, other: Self) -> Self {
        Self(vreinterpretq_u8_f32(vaddq_f32(self.f32(), other.f32())))
    }

    #[inline(always)]
    unsafe fn add_f64(self, other: Self) -> Self {
        Self(vreinterpretq_u8_f64(vaddq_f64(self.f64(), other.f64())))
    }

    #[inline(always)]
    unsafe fn sum_bytes(self) -> Self {
        let pairs = vpaddlq_u8(self.0);
        Self(vreinterpretq_u8_u64(vpaddlq_u32(vpaddlq_u16(pairs))))
    }

    #[inline(always)]
    unsafe fn widen_i8(self) -> Self {
        Self(vreinterpretq_u8_s16(vpaddlq_s8(vreinterpretq_s8_u8(self.0))))
    }

    #[inline(always)]
    unsafe fn widen_u16(self) -> Self {
        Self(vreinterpretq_u8_u32(vpaddlq_u16(self.u16())))
    }

    #[inline(always)]
    unsafe fn widen_i16(self) -> Self {
        Self(vreinterpretq_u8_s32(vpaddlq_s16(vreinterpretq_s16_u8(self.0))))
    }

    #[inline(always)]
    unsafe fn widen_u32(self) -> Self {
        Self(vreinterpretq_u8_u64(vpaddlq_u32(self.u32())))
    }

    #[inline(always)]
    unsafe fn widen_i32(self) -> Self {
        Self(vreinterpretq_u8_s64(vpaddlq_s32(vreinterpretq_s32_u8(self.0))))
    }

    #[inline(always)]
    unsafe fn hsum64(self) -> u64 {
        vaddvq_u64(self.u64())
    }

    #[inline(always)]
    unsafe fn hsum_f32(self) -> f32 {
        vaddvq_f32(self.f32())
    }

    #[inline(always)]
    unsafe fn hsum_f64(self) -> f64 {
        vaddvq_f64(self.f64())
    }
}
