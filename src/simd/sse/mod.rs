//! SSE4.2 implementations for the 128-bit NARROW tier on x86_64.
//!
//! Every entry point here is compiled with `sse2,ssse3,sse4.1,sse4.2` enabled
//! and instantiates the generic kernels of [`crate::simd::reduce`] and
//! [`crate::simd::search`] with [`U8x16`].
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Nehalem (2008+) or AMD Bulldozer (2011+)
//! - **Target Architecture**: x86_64
//! - **Runtime Detection**: `is_x86_feature_detected!("sse4.2")`, see [`crate::Tier`]
//!
//! # Available Types
//!
//! - [`U8x16`]: 128-bit register viewed as 16 bytes

mod u8x16;

pub use u8x16::U8x16;
pub(crate) use u8x16::{hsum_epi64_128, hsum_pd_128, hsum_ps_128, load_low_128};

use std::mem::size_of;

use crate::element::{ElementKind, FloatElement, SearchElement};
use crate::simd::search::dispatch_search;
use crate::simd::{reduce, search};
use crate::types::{AccumulatorWidth, Comparison, TraversalOrder};

/// Wrapping integer sum of `len` bytes of `kind` elements.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and the CPU must support SSE4.2.
#[target_feature(enable = "sse2,ssse3,sse4.1,sse4.2")]
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
/// `ptr` must be valid for `len` elements and the CPU must support SSE4.2.
#[target_feature(enable = "sse2,ssse3,sse4.1,sse4.2")]
pub unsafe fn sum_floats<T: FloatElement>(ptr: *const T, len: usize) -> T {
    let size = size_of::<T>();
    T::hsum(reduce::sum_floats::<U8x16>(ptr as *const u8, len * size, size))
}

#[target_feature(enable = "sse2,ssse3,sse4.1,sse4.2")]
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
/// `ptr` must be valid for `len` elements and the CPU must support SSE4.2.
pub unsafe fn find<T: SearchElement>(
    ptr: *const T,
    len: usize,
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Option<usize> {
    dispatch_search!(find_kernel::<T>(ptr, len, value), cmp, order)
}
