//! ARM NEON implementations for the 128-bit NARROW tier on aarch64.
//!
//! NEON is mandatory on AArch64, but the entry points are still compiled with
//! `#[target_feature(enable = "neon")]` and the tier is still probed at
//! runtime, so the crate behaves the same way on every architecture.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: any AArch64 processor
//! - **Target Architecture**: aarch64
//! - **Runtime Detection**: `is_aarch64_feature_detected!("neon")`, see [`crate::Tier`]
//!
//! # Available Types
//!
//! - [`U8x16`]: 128-bit register viewed as 16 bytes
//!
//! # Platform Support
//!
//! - **Apple Silicon**: M1, M2, M3 processors (macOS, iOS)
//! - **AWS Graviton**: Graviton2, Graviton3 processors

mod u8x16;

pub use u8x16::U8x16;

use std::mem::size_of;

use crate::element::{ElementKind, FloatElement, SearchElement};
use crate::simd::search::dispatch_search;
use crate::simd::{reduce, search};
use crate::types::{AccumulatorWidth, Comparison, TraversalOrder};

/// Wrapping integer sum of `len` bytes of `kind` elements.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and the CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_integers(
    ptr: *const u8,
    len: usize,
    kind: ElementKind,
    width: AccumulatorWidth,
) -> u64 {
    reduce::sum_integers::<U8x16>(ptr, len, kind, width)
}

/// Parallel-lane float sum of `len` elements.
///
/// # Safety
/// `ptr` must be valid for `len` elements and the CPU must support NEON.
#[target_feature(enable = "neon")]
pub unsafe fn sum_floats<T: FloatElement>(ptr: *const T, len: usize) -> T {
    let size = size_of::<T>();
    T::hsum(reduce::sum_floats::<U8x16>(ptr as *const u8, len * size, size))
}

#[target_feature(enable = "neon")]
unsafe fn find_kernel<T: SearchElement, const OP: u8, const DESCENDING: bool>(
    ptr: *const T,
    len: usize,
    value: T,
) -> Option<usize> {
    search::find::<U8x16, T, OP, DESCENDING>(ptr, len, value)
}

/// Index of the first (or last) element satisfying `element <cmp> value`.
///
/// # Safety
/// `ptr` must be valid for `len` elements and the CPU must support NEON.
pub unsafe fn find<T: SearchElement>(
    ptr: *const T,
    len: usize,
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Option<usize> {
    dispatch_search!(find_kernel::<T>(ptr, len, value), cmp, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::SimdVector;

    #[test]
    fn test_movemask_has_four_bits_per_byte() {
        let mut bytes = [0u8; 16];
        bytes[3] = 9;
        unsafe {
            let v = U8x16::load(bytes.as_ptr());
            let mask = v.cmpeq8(U8x16::splat8(9)).movemask();
            assert_eq!(mask, 0xF << 12);
            assert_eq!(mask.trailing_zeros() / U8x16::MASK_BITS_PER_BYTE, 3);
        }
    }

    #[test]
    fn test_widen_keeps_lane_totals() {
        let bytes: Vec<u8> = (250..=255).chain(0..10).collect();
        let signed: [i8; 16] = [-128, 127, -1, 1, -2, 2, -3, 3, -100, -100, -100, -100, 5, 6, 7, 8];
        unsafe {
            let v = U8x16::load(bytes.as_ptr());
            let expected: u64 = bytes.iter().map(|&b| b as u64).sum();
            assert_eq!(v.sum_bytes().hsum64(), expected);

            let s = U8x16::load(signed.as_ptr() as *const u8);
            let expected: i64 = signed.iter().map(|&x| x as i64).sum();
            assert_eq!(s.widen_i8().widen_i16().widen_i32().hsum64() as i64, expected);
        }
    }
}
