//! Register abstraction shared by every vector tier.
//!
//! A [`SimdVector`] is an untyped register of `BYTES` bytes. The element width
//! is chosen per operation (`add16`, `cmpeq32`, ...), which lets one generic
//! kernel body serve every element type. Implementations mark every method
//! `#[inline(always)]` so that the bodies are compiled inside the
//! `#[target_feature]` entry points of their tier.

/// A SIMD register viewed as raw bytes.
///
/// # Safety
///
/// Every method executes ISA-specific instructions. Callers must only use an
/// implementation from code running on a CPU that supports its tier, which the
/// dispatch in [`crate::scanner`] guarantees.
pub trait SimdVector: Copy {
    /// Register width in bytes.
    const BYTES: usize;

    /// Number of bits [`SimdVector::movemask`] produces per byte lane.
    const MASK_BITS_PER_BYTE: u32;

    /// Movemask value with every byte lane set.
    const FULL_MASK: u64;

    /// # Safety
    /// See the trait documentation.
    unsafe fn zero() -> Self;

    /// Loads `BYTES` bytes from `ptr`, no alignment requirement.
    ///
    /// # Safety
    /// `ptr` must be valid for `BYTES` bytes of reads.
    unsafe fn load(ptr: *const u8) -> Self;

    /// Loads `bytes` bytes into the low end of the register and zeroes the rest.
    ///
    /// `bytes` is one of 1, 2, 4, 8, 16 and strictly less than `BYTES`.
    ///
    /// # Safety
    /// `ptr` must be valid for `bytes` bytes of reads.
    unsafe fn load_low(ptr: *const u8, bytes: usize) -> Self;

    /// # Safety
    /// See the trait documentation.
    unsafe fn splat8(value: u8) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn splat16(value: u16) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn splat32(value: u32) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn splat64(value: u64) -> Self;

    /// # Safety
    /// See the trait documentation.
    unsafe fn xor(self, other: Self) -> Self;

    /// Compresses the register into a bitmask, `MASK_BITS_PER_BYTE` bits per
    /// byte lane, lowest byte in the lowest bits. Only meaningful for
    /// registers whose bytes are all `0x00` or `0xFF`.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn movemask(self) -> u64;

    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpeq8(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpeq16(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpeq32(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpeq64(self, other: Self) -> Self;

    /// Signed `self > other`.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpgt_i8(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpgt_i16(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpgt_i32(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmpgt_i64(self, other: Self) -> Self;

    /// Unsigned `self > other`. The default flips the sign bit of both
    /// operands and reuses the signed compare.
    ///
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn cmpgt_u8(self, other: Self) -> Self {
        let bias = Self::splat8(0x80);
        self.xor(bias).cmpgt_i8(other.xor(bias))
    }
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn cmpgt_u16(self, other: Self) -> Self {
        let bias = Self::splat16(0x8000);
        self.xor(bias).cmpgt_i16(other.xor(bias))
    }
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn cmpgt_u32(self, other: Self) -> Self {
        let bias = Self::splat32(0x8000_0000);
        self.xor(bias).cmpgt_i32(other.xor(bias))
    }
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn cmpgt_u64(self, other: Self) -> Self {
        let bias = Self::splat64(0x8000_0000_0000_0000);
        self.xor(bias).cmpgt_i64(other.xor(bias))
    }

    /// Lane-wise `self <OP> other` on `f32` lanes with `PartialOrd` semantics.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmp_f32<const OP: u8>(self, other: Self) -> Self;
    /// Lane-wise `self <OP> other` on `f64` lanes with `PartialOrd` semantics.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn cmp_f64<const OP: u8>(self, other: Self) -> Self;

    /// Wrapping lane adds.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn add8(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn add16(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn add32(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn add64(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn add_f32(self, other: Self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn add_f64(self, other: Self) -> Self;

    /// Sums unsigned bytes into 64-bit lanes (sum of absolute differences
    /// against zero on x86).
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn sum_bytes(self) -> Self;

    /// Widening steps: the result has lanes twice as wide and half as many,
    /// and the total over all lanes is unchanged. Each output lane holds the
    /// sum of two input lanes, zero- or sign-extended.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn widen_i8(self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn widen_u16(self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn widen_i16(self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn widen_u32(self) -> Self;
    /// # Safety
    /// See the trait documentation.
    unsafe fn widen_i32(self) -> Self;

    /// Wrapping sum of the 64-bit lanes.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn hsum64(self) -> u64;
    /// # Safety
    /// See the trait documentation.
    unsafe fn hsum_f32(self) -> f32;
    /// # Safety
    /// See the trait documentation.
    unsafe fn hsum_f64(self) -> f64;

    /// Wrapping add on lanes of `bytes` bytes.
    ///
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn add_lanes(self, other: Self, bytes: usize) -> Self {
        match bytes {
            1 => self.add8(other),
            2 => self.add16(other),
            4 => self.add32(other),
            _ => self.add64(other),
        }
    }

    /// One widening step from `bytes`-byte lanes, sign-extending if `signed`.
    ///
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn widen(self, signed: bool, bytes: usize) -> Self {
        match (signed, bytes) {
            (true, 1) => self.widen_i8(),
            (false, 2) => self.widen_u16(),
            (true, 2) => self.widen_i16(),
            (false, 4) => self.widen_u32(),
            (true, 4) => self.widen_i32(),
            _ => self,
        }
    }

    /// Horizontal sum of `bytes`-byte lanes, exact modulo `2^(8 × bytes)`.
    ///
    /// # Safety
    /// See the trait documentation.
    #[inline(always)]
    unsafe fn hsum_lanes(self, bytes: usize) -> u64 {
        match bytes {
            1 => self.sum_bytes().hsum64(),
            2 => self.widen_u16().widen_u32().hsum64(),
            4 => self.widen_u32().hsum64(),
            _ => self.hsum64(),
        }
    }

    /// Bitmask selecting the first `bytes` byte lanes.
    #[inline(always)]
    fn valid_mask(bytes: usize) -> u64 {
        let bits = bytes as u32 * Self::MASK_BITS_PER_BYTE;
        if bits >= 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }
}
