//! AVX2 implementations for the 256-bit WIDE tier.
//!
//! This module instantiates the generic kernels of [`crate::simd::reduce`] and
//! [`crate::simd::search`] with [`U8x32`] inside `#[target_feature(enable =
//! "avx2")]` entry points. The kernels are `#[inline(always)]`, so their bodies
//! are compiled with AVX2 enabled even when the crate itself is not.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86_64
//! - **Runtime Detection**: `is_x86_feature_detected!("avx2")`, see [`crate::Tier`]
//!
//! # Available Types
//!
//! - [`U8x32`]: 256-bit register viewed as 32 bytes
//!
//! # Performance Characteristics
//!
//! - **Vector Width**: 256 bits (32 × u8, 16 × i16, 8 × f32, 4 × f64, etc.)
//! - **Unrolling**: four registers per loop iteration in every kernel
//! - **Tails**: partial loads of 16, 8, 4, 2 and 1 bytes, no scalar epilogue

mod u8x32;

pub use u8x32::U8x32;

use std::mem::size_of;

use crate::element::{ElementKind, FloatElement, SearchElement};
use crate::simd::search::dispatch_search;
use crate::simd::{reduce, search};
use crate::types::{AccumulatorWidth, Comparison, TraversalOrder};

/// Wrapping integer sum of `len` bytes of `kind` elements.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and the CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_integers(
    ptr: *const u8,
    len: usize,
    kind: ElementKind,
    width: AccumulatorWidth,
) -> u64 {
    reduce::sum_integers::<U8x32>(ptr, len, kind, width)
}

/// Parallel-lane float sum of `len` elements.
///
/// # Safety
/// `ptr` must be valid for `len` elements and the CPU must support AVX2.
#[target_feature(enable = "avx2")]
pub unsafe fn sum_floats<T: FloatElement>(ptr: *const T, len: usize) -> T {
    let size = size_of::<T>();
    T::hsum(reduce::sum_floats::<U8x32>(ptr as *const u8, len * size, size))
}

#[target_feature(enable = "avx2")]
unsafe fn find_kernel<T: SearchElement, const OP: u8, const DESCENDING: bool>(
    ptr: *const T,
    len: usize,
    value: T,
) -> Option<usize> {
    search::find::<U8x32, T, OP, DESCENDING>(ptr, len, value)
}

/// Index of the first (or last) element satisfying `element <cmp> value`.
///
/// # Safety
/// `ptr` must be valid for `len` elements and the CPU must support AVX2.
pub unsafe fn find<T: SearchElement>(
    ptr: *const T,
    len: usize,
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Option<usize> {
    dispatch_search!(find_kernel::<T>(ptr, len, value), cmp, order)
}
