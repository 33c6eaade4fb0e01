//! Generic reduction kernels.
//!
//! Every kernel follows the same shape:
//!
//! 1. **Main loop**: four independent accumulators, each fed every fourth
//!    register, so that consecutive adds do not wait on each other.
//! 2. **Leftover registers**: whole registers that do not fill a block of four
//!    go into the first accumulator.
//! 3. **Tail**: the sub-register remainder is read with a descending cascade of
//!    partial loads ([`TailChunks`]). Partial loads zero the unused lanes, so
//!    they add nothing and need no masking.
//! 4. **Combine**: pairwise tree of the accumulators, then one horizontal sum.
//!
//! Integer kernels return the wrapping 64-bit sum of the sign- or
//! zero-extended elements, or a value congruent to it modulo `2^W` for the
//! accumulator width `W` they were selected for. The caller truncates to `W`.
//!
//! All lengths are in bytes.

use super::{SimdVector, TailChunks};
use crate::element::ElementKind;
use crate::types::AccumulatorWidth;

const UNROLL: usize = 4;

/// Registers a 16-bit-lane accumulator of widened `i8` pairs absorbs before it
/// must be widened: `127 × 256 = 32512 <= i16::MAX`.
const I8_FLUSH_16: usize = 127;

/// Flushes of four 16-bit accumulators a 32-bit accumulator absorbs:
/// `8000 × 4 × 2 × 32512 < 2^31`.
const I8_FLUSH_32: usize = 8000;

/// Registers a 32-bit-lane accumulator of widened 16-bit pairs absorbs:
/// `16384 × 2 × 65535 < 2^32` (and `16384 × 65536 <= 2^31` for `i16`),
/// leaving room for the leftover and tail registers.
const WIDE16_FLUSH_32: usize = 16_384;

/// Picks the kernel for an integer sum and runs it on `V`.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_integers<V: SimdVector>(
    ptr: *const u8,
    len: usize,
    kind: ElementKind,
    width: AccumulatorWidth,
) -> u64 {
    let bits = width.bits().unwrap_or(64);
    let signed = kind.is_signed();

    match kind.size() {
        1 if !signed => sum_bytes::<V>(ptr, len),
        1 if bits <= 16 => sum_widen_once::<V>(ptr, len, 1, true),
        1 => sum_i8_cascade::<V>(ptr, len),
        2 if bits == 16 => sum_native::<V>(ptr, len, 2),
        2 if bits == 32 => sum_widen_once::<V>(ptr, len, 2, signed),
        2 => sum_widen_twice::<V>(ptr, len, 2, signed, WIDE16_FLUSH_32),
        4 if bits == 32 => sum_native::<V>(ptr, len, 4),
        4 => sum_widen_once::<V>(ptr, len, 4, signed),
        _ => sum_native::<V>(ptr, len, 8),
    }
}

/// Sums unsigned bytes straight into 64-bit lanes.
///
/// Native 8-bit lane adds would wrap after one register, so each register is
/// collapsed with a sum-of-absolute-differences against zero instead.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_bytes<V: SimdVector>(ptr: *const u8, len: usize) -> u64 {
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut offset = 0;

    while offset < blocks_end {
        a0 = a0.add64(V::load(ptr.add(offset)).sum_bytes());
        a1 = a1.add64(V::load(ptr.add(offset + V::BYTES)).sum_bytes());
        a2 = a2.add64(V::load(ptr.add(offset + 2 * V::BYTES)).sum_bytes());
        a3 = a3.add64(V::load(ptr.add(offset + 3 * V::BYTES)).sum_bytes());
        offset += V::BYTES * UNROLL;
    }

    while offset < whole {
        a0 = a0.add64(V::load(ptr.add(offset)).sum_bytes());
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, 1) {
        a1 = a1.add64(V::load_low(ptr.add(at), chunk).sum_bytes());
    }

    a0.add64(a1).add64(a2.add64(a3)).hsum64()
}

/// Wrapping sum in lanes as wide as the element.
///
/// Exact modulo `2^(8 × lane)`, which is all a same-width accumulator promises.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_native<V: SimdVector>(ptr: *const u8, len: usize, lane: usize) -> u64 {
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut offset = 0;

    while offset < blocks_end {
        a0 = a0.add_lanes(V::load(ptr.add(offset)), lane);
        a1 = a1.add_lanes(V::load(ptr.add(offset + V::BYTES)), lane);
        a2 = a2.add_lanes(V::load(ptr.add(offset + 2 * V::BYTES)), lane);
        a3 = a3.add_lanes(V::load(ptr.add(offset + 3 * V::BYTES)), lane);
        offset += V::BYTES * UNROLL;
    }

    while offset < whole {
        a0 = a0.add_lanes(V::load(ptr.add(offset)), lane);
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, lane) {
        a1 = a1.add_lanes(V::load_low(ptr.add(at), chunk), lane);
    }

    a0.add_lanes(a1, lane)
        .add_lanes(a2.add_lanes(a3, lane), lane)
        .hsum_lanes(lane)
}

/// Widens every register once and accumulates in lanes twice the element
/// width, wrapping.
///
/// Used where the doubled lane is either wide enough outright (32 → 64) or is
/// exactly the requested accumulator width (8 → 16, 16 → 32).
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_widen_once<V: SimdVector>(
    ptr: *const u8,
    len: usize,
    lane: usize,
    signed: bool,
) -> u64 {
    let wide = lane * 2;
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut offset = 0;

    while offset < blocks_end {
        a0 = a0.add_lanes(V::load(ptr.add(offset)).widen(signed, lane), wide);
        a1 = a1.add_lanes(V::load(ptr.add(offset + V::BYTES)).widen(signed, lane), wide);
        a2 = a2.add_lanes(V::load(ptr.add(offset + 2 * V::BYTES)).widen(signed, lane), wide);
        a3 = a3.add_lanes(V::load(ptr.add(offset + 3 * V::BYTES)).widen(signed, lane), wide);
        offset += V::BYTES * UNROLL;
    }

    while offset < whole {
        a0 = a0.add_lanes(V::load(ptr.add(offset)).widen(signed, lane), wide);
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, lane) {
        a1 = a1.add_lanes(V::load_low(ptr.add(at), chunk).widen(signed, lane), wide);
    }

    a0.add_lanes(a1, wide)
        .add_lanes(a2.add_lanes(a3, wide), wide)
        .hsum_lanes(wide)
}

/// Two-stage widening: element → 2× lanes every register, 2× → 4× lanes every
/// `flush_every` blocks, before the 2× lanes can overflow.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_widen_twice<V: SimdVector>(
    ptr: *const u8,
    len: usize,
    lane: usize,
    signed: bool,
    flush_every: usize,
) -> u64 {
    let wide = lane * 2;
    let wider = lane * 4;
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let mut total = V::zero();
    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut pending = 0;
    let mut offset = 0;

    while offset < blocks_end {
        a0 = a0.add_lanes(V::load(ptr.add(offset)).widen(signed, lane), wide);
        a1 = a1.add_lanes(V::load(ptr.add(offset + V::BYTES)).widen(signed, lane), wide);
        a2 = a2.add_lanes(V::load(ptr.add(offset + 2 * V::BYTES)).widen(signed, lane), wide);
        a3 = a3.add_lanes(V::load(ptr.add(offset + 3 * V::BYTES)).widen(signed, lane), wide);
        offset += V::BYTES * UNROLL;

        pending += 1;
        if pending == flush_every {
            total = total.add_lanes(fold_widened(a0, a1, a2, a3, signed, wide), wider);
            (a0, a1, a2, a3) = (V::zero(), V::zero(), V::zero(), V::zero());
            pending = 0;
        }
    }

    total = total.add_lanes(fold_widened(a0, a1, a2, a3, signed, wide), wider);
    a0 = V::zero();

    while offset < whole {
        a0 = a0.add_lanes(V::load(ptr.add(offset)).widen(signed, lane), wide);
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, lane) {
        a0 = a0.add_lanes(V::load_low(ptr.add(at), chunk).widen(signed, lane), wide);
    }

    total
        .add_lanes(a0.widen(signed, wide), wider)
        .hsum_lanes(wider)
}

/// Signed byte sum through the full 8 → 16 → 32 → 64 cascade.
///
/// Pairs of `i8` are sign-extended into 16-bit lanes; those are flushed into
/// 32-bit lanes every [`I8_FLUSH_16`] blocks, and the 32-bit lanes into 64-bit
/// lanes every [`I8_FLUSH_32`] flushes.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_i8_cascade<V: SimdVector>(ptr: *const u8, len: usize) -> u64 {
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let mut acc64 = V::zero();
    let mut acc32 = V::zero();
    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut pending16 = 0;
    let mut pending32 = 0;
    let mut offset = 0;

    while offset < blocks_end {
        a0 = a0.add16(V::load(ptr.add(offset)).widen_i8());
        a1 = a1.add16(V::load(ptr.add(offset + V::BYTES)).widen_i8());
        a2 = a2.add16(V::load(ptr.add(offset + 2 * V::BYTES)).widen_i8());
        a3 = a3.add16(V::load(ptr.add(offset + 3 * V::BYTES)).widen_i8());
        offset += V::BYTES * UNROLL;

        pending16 += 1;
        if pending16 == I8_FLUSH_16 {
            acc32 = acc32.add32(fold_widened(a0, a1, a2, a3, true, 2));
            (a0, a1, a2, a3) = (V::zero(), V::zero(), V::zero(), V::zero());
            pending16 = 0;

            pending32 += 1;
            if pending32 == I8_FLUSH_32 {
                acc64 = acc64.add64(acc32.widen_i32());
                acc32 = V::zero();
                pending32 = 0;
            }
        }
    }

    acc32 = acc32.add32(fold_widened(a0, a1, a2, a3, true, 2));
    a0 = V::zero();

    while offset < whole {
        a0 = a0.add16(V::load(ptr.add(offset)).widen_i8());
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, 1) {
        a0 = a0.add16(V::load_low(ptr.add(at), chunk).widen_i8());
    }

    acc32 = acc32.add32(a0.widen_i16());
    acc64.add64(acc32.widen_i32()).hsum64()
}

/// Widens four accumulators separately, then adds them in the wider lanes.
#[inline(always)]
unsafe fn fold_widened<V: SimdVector>(a0: V, a1: V, a2: V, a3: V, signed: bool, lane: usize) -> V {
    let wide = lane * 2;
    let left = a0.widen(signed, lane).add_lanes(a1.widen(signed, lane), wide);
    let right = a2.widen(signed, lane).add_lanes(a3.widen(signed, lane), wide);
    left.add_lanes(right, wide)
}

/// Float sum over parallel lanes (`FloatMode::Fast`).
///
/// Returns the combined accumulator register; the caller performs the
/// horizontal sum for its lane type. Zero-filled tail lanes add `+0.0`.
///
/// # Safety
/// `ptr` must be valid for `len` bytes and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn sum_floats<V: SimdVector>(ptr: *const u8, len: usize, lane: usize) -> V {
    let whole = len - len % V::BYTES;
    let blocks_end = len - len % (V::BYTES * UNROLL);

    let (mut a0, mut a1, mut a2, mut a3) = (V::zero(), V::zero(), V::zero(), V::zero());
    let mut offset = 0;

    while offset < blocks_end {
        a0 = add_float(a0, V::load(ptr.add(offset)), lane);
        a1 = add_float(a1, V::load(ptr.add(offset + V::BYTES)), lane);
        a2 = add_float(a2, V::load(ptr.add(offset + 2 * V::BYTES)), lane);
        a3 = add_float(a3, V::load(ptr.add(offset + 3 * V::BYTES)), lane);
        offset += V::BYTES * UNROLL;
    }

    while offset < whole {
        a0 = add_float(a0, V::load(ptr.add(offset)), lane);
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, len - whole, V::BYTES, lane) {
        a1 = add_float(a1, V::load_low(ptr.add(at), chunk), lane);
    }

    add_float(add_float(a0, a1, lane), add_float(a2, a3, lane), lane)
}

#[inline(always)]
unsafe fn add_float<V: SimdVector>(a: V, b: V, lane: usize) -> V {
    if lane == 4 {
        a.add_f32(b)
    } else {
        a.add_f64(b)
    }
}
