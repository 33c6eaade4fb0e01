//! Scalar tier: plain loops with the same observable results as the vector
//! tiers.
//!
//! Also serves as the reference the vector tiers are tested against, and as
//! the strict float path on every tier.

use num::traits::AsPrimitive;

use crate::element::{FloatElement, IntegerElement, SearchElement};
use crate::types::{Comparison, TraversalOrder};

/// Wrapping 64-bit sum of the sign- or zero-extended elements.
///
/// Congruent to the true sum modulo `2^64`, hence modulo every narrower
/// accumulator width.
#[inline]
pub fn sum_integers<T: IntegerElement>(values: &[T]) -> u64 {
    values
        .iter()
        .fold(0u64, |acc, &x| acc.wrapping_add(AsPrimitive::<i64>::as_(x) as u64))
}

/// Exact sum in `i128`.
///
/// Used where the 64-bit lanes of [`sum_integers`] would drop the carry.
#[inline]
pub fn sum_integers_exact<T: IntegerElement>(values: &[T]) -> i128 {
    values
        .iter()
        .fold(0i128, |acc, &x| acc + AsPrimitive::<i128>::as_(x))
}

/// Left-to-right float sum, bit-reproducible across tiers.
#[inline]
pub fn sum_floats_strict<T: FloatElement>(values: &[T]) -> T {
    values.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// Float sum over four independent accumulators.
#[inline]
pub fn sum_floats_fast<T: FloatElement>(values: &[T]) -> T {
    let mut acc = [T::zero(); 4];
    let mut chunks = values.chunks_exact(4);
    for chunk in &mut chunks {
        for (a, &x) in acc.iter_mut().zip(chunk) {
            *a = *a + x;
        }
    }
    for (a, &x) in acc.iter_mut().zip(chunks.remainder()) {
        *a = *a + x;
    }
    (acc[0] + acc[1]) + (acc[2] + acc[3])
}

/// Index of the first (or last) element satisfying `element <cmp> value`.
#[inline]
pub fn find<T: SearchElement>(
    values: &[T],
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Option<usize> {
    match order {
        TraversalOrder::Ascending => values.iter().position(|&x| cmp.evaluate(x, value)),
        TraversalOrder::Descending => values.iter().rposition(|&x| cmp.evaluate(x, value)),
    }
}
