//! Generic search kernel for `contains` and `index_of`.
//!
//! The needle is broadcast once. Each register is compared lane-wise, the
//! result is compressed to a bitmask with `MASK_BITS_PER_BYTE` bits per byte,
//! and the first (ascending) or last (descending) set bit is decoded back to
//! an element index. The scan stops at the first register with a match.
//!
//! Ascending scans read whole registers upward from the base and drain the
//! trailing remainder with descending-size partial loads. Descending scans
//! read whole registers downward from the end and drain the *leading*
//! remainder, highest chunk first. Partial-load masks are always ANDed with
//! the valid-lanes mask since the zero-filled lanes may compare true.

use std::mem::size_of;

use super::{SimdVector, TailChunks};
use crate::element::SearchElement;

const UNROLL: usize = 4;

/// Returns the element index of the first (or, with `DESCENDING`, the last)
/// element `e` with `e <OP> value`.
///
/// # Safety
/// `ptr` must be valid for `len` elements and `V` supported by the running CPU.
#[inline(always)]
pub unsafe fn find<V: SimdVector, T: SearchElement, const OP: u8, const DESCENDING: bool>(
    ptr: *const T,
    len: usize,
    value: T,
) -> Option<usize> {
    let size = size_of::<T>();
    let base = ptr as *const u8;
    let bytes = len * size;
    let needle = value.splat::<V>();

    let found = if DESCENDING {
        scan_descending::<V, T, OP>(base, bytes, needle)
    } else {
        scan_ascending::<V, T, OP>(base, bytes, needle)
    };
    found.map(|byte| byte / size)
}

#[inline(always)]
unsafe fn scan_ascending<V: SimdVector, T: SearchElement, const OP: u8>(
    base: *const u8,
    bytes: usize,
    needle: V,
) -> Option<usize> {
    let size = size_of::<T>();
    let whole = bytes - bytes % V::BYTES;
    let blocks_end = bytes - bytes % (V::BYTES * UNROLL);
    let mut offset = 0;

    while offset < blocks_end {
        let m0 = match_bits::<V, T, OP>(V::load(base.add(offset)), needle, V::FULL_MASK);
        let m1 = match_bits::<V, T, OP>(V::load(base.add(offset + V::BYTES)), needle, V::FULL_MASK);
        let m2 = match_bits::<V, T, OP>(
            V::load(base.add(offset + 2 * V::BYTES)),
            needle,
            V::FULL_MASK,
        );
        let m3 = match_bits::<V, T, OP>(
            V::load(base.add(offset + 3 * V::BYTES)),
            needle,
            V::FULL_MASK,
        );

        if (m0 | m1 | m2 | m3) != 0 {
            let (mask, at) = if m0 != 0 {
                (m0, offset)
            } else if m1 != 0 {
                (m1, offset + V::BYTES)
            } else if m2 != 0 {
                (m2, offset + 2 * V::BYTES)
            } else {
                (m3, offset + 3 * V::BYTES)
            };
            return Some(at + first_byte::<V>(mask));
        }
        offset += V::BYTES * UNROLL;
    }

    while offset < whole {
        let mask = match_bits::<V, T, OP>(V::load(base.add(offset)), needle, V::FULL_MASK);
        if mask != 0 {
            return Some(offset + first_byte::<V>(mask));
        }
        offset += V::BYTES;
    }

    for (at, chunk) in TailChunks::ascending(whole, bytes - whole, V::BYTES, size) {
        let mask =
            match_bits::<V, T, OP>(V::load_low(base.add(at), chunk), needle, V::valid_mask(chunk));
        if mask != 0 {
            return Some(at + first_byte::<V>(mask));
        }
    }

    None
}

#[inline(always)]
unsafe fn scan_descending<V: SimdVector, T: SearchElement, const OP: u8>(
    base: *const u8,
    bytes: usize,
    needle: V,
) -> Option<usize> {
    let size = size_of::<T>();
    let lead = bytes % V::BYTES;
    let mut end = bytes;

    while end - lead >= V::BYTES * UNROLL {
        end -= V::BYTES * UNROLL;

        let m3 = match_bits::<V, T, OP>(
            V::load(base.add(end + 3 * V::BYTES)),
            needle,
            V::FULL_MASK,
        );
        let m2 = match_bits::<V, T, OP>(
            V::load(base.add(end + 2 * V::BYTES)),
            needle,
            V::FULL_MASK,
        );
        let m1 = match_bits::<V, T, OP>(V::load(base.add(end + V::BYTES)), needle, V::FULL_MASK);
        let m0 = match_bits::<V, T, OP>(V::load(base.add(end)), needle, V::FULL_MASK);

        if (m0 | m1 | m2 | m3) != 0 {
            let (mask, at) = if m3 != 0 {
                (m3, end + 3 * V::BYTES)
            } else if m2 != 0 {
                (m2, end + 2 * V::BYTES)
            } else if m1 != 0 {
                (m1, end + V::BYTES)
            } else {
                (m0, end)
            };
            return Some(at + last_byte::<V>(mask));
        }
    }

    while end > lead {
        end -= V::BYTES;
        let mask = match_bits::<V, T, OP>(V::load(base.add(end)), needle, V::FULL_MASK);
        if mask != 0 {
            return Some(end + last_byte::<V>(mask));
        }
    }

    for (at, chunk) in TailChunks::descending(0, lead, V::BYTES, size) {
        let mask =
            match_bits::<V, T, OP>(V::load_low(base.add(at), chunk), needle, V::valid_mask(chunk));
        if mask != 0 {
            return Some(at + last_byte::<V>(mask));
        }
    }

    None
}

/// Bitmask of the lanes of `v` that satisfy `<OP> needle`, restricted to `valid`.
///
/// Compares that can only be formed as their complement (`!=`, `>=`, `<=` on
/// integer lanes) are inverted against `valid`, the all-lanes-true sentinel.
#[inline(always)]
unsafe fn match_bits<V: SimdVector, T: SearchElement, const OP: u8>(
    v: V,
    needle: V,
    valid: u64,
) -> u64 {
    let (mask, inverted) = T::compare::<V, OP>(v, needle);
    let bits = mask.movemask();
    if inverted {
        !bits & valid
    } else {
        bits & valid
    }
}

#[inline(always)]
fn first_byte<V: SimdVector>(mask: u64) -> usize {
    (mask.trailing_zeros() / V::MASK_BITS_PER_BYTE) as usize
}

#[inline(always)]
fn last_byte<V: SimdVector>(mask: u64) -> usize {
    ((63 - mask.leading_zeros()) / V::MASK_BITS_PER_BYTE) as usize
}

/// Expands to a `match` on `(Comparison, TraversalOrder)` that calls
/// `$kernel::<T, OP, DESCENDING>(args)` with both monomorphised.
macro_rules! dispatch_search {
    ($kernel:ident :: <$t:ty> ($($arg:expr),* $(,)?), $cmp:expr, $order:expr) => {{
        use $crate::types::{op, Comparison as C, TraversalOrder as O};
        match ($cmp, $order) {
            (C::EqualTo, O::Ascending) => $kernel::<$t, { op::EQ }, false>($($arg),*),
            (C::EqualTo, O::Descending) => $kernel::<$t, { op::EQ }, true>($($arg),*),
            (C::NotEqualTo, O::Ascending) => $kernel::<$t, { op::NE }, false>($($arg),*),
            (C::NotEqualTo, O::Descending) => $kernel::<$t, { op::NE }, true>($($arg),*),
            (C::GreaterThan, O::Ascending) => $kernel::<$t, { op::GT }, false>($($arg),*),
            (C::GreaterThan, O::Descending) => $kernel::<$t, { op::GT }, true>($($arg),*),
            (C::GreaterThanOrEqualTo, O::Ascending) => $kernel::<$t, { op::GE }, false>($($arg),*),
            (C::GreaterThanOrEqualTo, O::Descending) => $kernel::<$t, { op::GE }, true>($($arg),*),
            (C::LessThan, O::Ascending) => $kernel::<$t, { op::LT }, false>($($arg),*),
            (C::LessThan, O::Descending) => $kernel::<$t, { op::LT }, true>($($arg),*),
            (C::LessThanOrEqualTo, O::Ascending) => $kernel::<$t, { op::LE }, false>($($arg),*),
            (C::LessThanOrEqualTo, O::Descending) => $kernel::<$t, { op::LE }, true>($($arg),*),
        }
    }};
}

pub(crate) use dispatch_search;
