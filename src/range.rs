//! Overflow-safe accumulator width selection.
//!
//! Summing `n` elements of a narrow integer type needs an accumulator wide
//! enough for `n × max_magnitude`. Always using 64 bits would be correct but
//! forces the slowest widening cascade, so the advisor picks the narrowest
//! width that provably cannot overflow. Callers may ask for anything wider.
//!
//! Asking for something narrower is an `InvalidRange` error when the `checked`
//! feature is enabled. Without it the request is trusted and the sum wraps
//! modulo `2^W`.

use crate::element::ElementKind;
use crate::error::{invalid_configuration, invalid_range, Result};
use crate::types::AccumulatorWidth;

const WIDTHS: [AccumulatorWidth; 4] = [
    AccumulatorWidth::W8,
    AccumulatorWidth::W16,
    AccumulatorWidth::W32,
    AccumulatorWidth::W64,
];

/// Accumulator widths that are at least as wide as the element.
///
/// 64-bit element types have exactly one entry since nothing wider exists.
/// Non-integer kinds have none.
pub fn supported_widths(kind: ElementKind) -> &'static [AccumulatorWidth] {
    match kind.integer_bits() {
        Some(8) => &WIDTHS,
        Some(16) => &WIDTHS[1..],
        Some(32) => &WIDTHS[2..],
        Some(64) => &WIDTHS[3..],
        _ => &[],
    }
}

/// Narrowest width that cannot overflow when summing `len` elements of `kind`.
///
/// Falls back to `W64` when even that is not provably safe (64-bit elements,
/// or astronomically long 32-bit buffers).
pub fn minimal_width(kind: ElementKind, len: usize) -> AccumulatorWidth {
    let Some(bits) = kind.integer_bits() else {
        return AccumulatorWidth::W64;
    };
    let len = len as u128;

    supported_widths(kind)
        .iter()
        .copied()
        .find(|width| {
            let w = width.bits().unwrap_or(64);
            if kind.is_signed() {
                // The most negative element dominates: |MIN| = 2^(b-1) > MAX.
                (1u128 << (bits - 1)) * len <= 1u128 << (w - 1)
            } else {
                ((1u128 << bits) - 1) * len <= (1u128 << w) - 1
            }
        })
        .unwrap_or(AccumulatorWidth::W64)
}

/// Turns a requested width into the width the kernels will use.
pub fn resolve(
    kind: ElementKind,
    len: usize,
    requested: AccumulatorWidth,
) -> Result<AccumulatorWidth> {
    let required = minimal_width(kind, len);
    if requested == AccumulatorWidth::Auto {
        return Ok(required);
    }

    if !supported_widths(kind).contains(&requested) {
        return Err(invalid_configuration(
            "AccumulatorWidth",
            requested as i64,
            legal_widths(kind),
        ));
    }

    if cfg!(feature = "checked") && requested < required {
        return Err(invalid_range(kind.name(), requested, required, len));
    }

    Ok(requested)
}

fn legal_widths(kind: ElementKind) -> &'static str {
    match kind.integer_bits() {
        Some(8) => "Auto, W8, W16, W32, W64",
        Some(16) => "Auto, W16, W32, W64",
        Some(32) => "Auto, W32, W64",
        Some(64) => "Auto, W64",
        _ => "none (not an integer element type)",
    }
}
