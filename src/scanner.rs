//! Validated, tier-dispatched entry points for Sum, Average, Contains and
//! IndexOf.
//!
//! A [`Scanner`] is bound to one [`Tier`]. Every call validates its
//! arguments once, logs the dispatch decision at `trace` level, then hands the
//! buffer to exactly one tier implementation. Nothing is allocated and nothing
//! is shared between calls, so a `Scanner` is `Copy` and can be used from any
//! number of threads at once.
//!
//! # Usage Examples
//!
//! ```rust
//! use simdscan::{AccumulatorWidth, Comparison, Scanner, Tier, TraversalOrder};
//!
//! let scanner = Scanner::new();
//! let values: Vec<u8> = vec![255; 3];
//! assert_eq!(scanner.sum(&values, AccumulatorWidth::Auto).unwrap(), 765);
//!
//! let data = [5, 3, 5, 3, 5];
//! assert_eq!(scanner.index_of(&data, 5, TraversalOrder::Descending).unwrap(), 4);
//! assert!(scanner
//!     .contains(&data, 4, Comparison::LessThan, TraversalOrder::Ascending)
//!     .unwrap());
//!
//! // The scalar tier is always available and gives identical answers.
//! let scalar = Scanner::with_tier(Tier::Scalar).unwrap();
//! assert_eq!(scalar.index_of(&data, 5, TraversalOrder::Descending).unwrap(), 4);
//! ```

use std::mem::{size_of, size_of_val};

use log::trace;
use num::traits::AsPrimitive;

use crate::element::{Element, ElementKind, FloatElement, IntegerElement, SearchElement};
use crate::error::{invalid_argument, Result};
use crate::range;
use crate::scalar;
use crate::tier::Tier;
use crate::types::{AccumulatorWidth, Comparison, FloatMode, TraversalOrder};

#[cfg(target_arch = "aarch64")]
use crate::simd::neon;
#[cfg(target_arch = "x86_64")]
use crate::simd::{avx2, sse};

/// Runs the scan operations on a fixed capability tier.
///
/// The tier is private and only ever set to one the running CPU supports,
/// which is what makes the `unsafe` tier calls below sound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scanner {
    tier: Tier,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Creates a scanner on the best tier for this process (see [`Tier::detect`]).
    #[inline]
    pub fn new() -> Self {
        Self {
            tier: Tier::detect(),
        }
    }

    /// Creates a scanner pinned to `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScanError::InvalidArgument`] if the running CPU cannot
    /// execute `tier`.
    pub fn with_tier(tier: Tier) -> Result<Self> {
        if !tier.supported() {
            return Err(invalid_argument(format!(
                "tier {tier} is not supported by this CPU (best available: {})",
                Tier::hardware()
            )));
        }
        Ok(Self { tier })
    }

    /// The tier every call on this scanner runs on.
    #[inline]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    // ============================================================================================
    // SUM
    // ============================================================================================

    /// Sums an integer buffer.
    ///
    /// # Arguments
    ///
    /// * `values` - Buffer to sum, may be empty
    /// * `width` - Accumulator width; `Auto` picks the narrowest width that
    ///   cannot overflow for this length
    ///
    /// # Returns
    ///
    /// The sum reduced modulo `2^W` for the resolved accumulator width `W`,
    /// zero-extended to `u64` for unsigned elements and sign-extended to
    /// `i64` for signed ones. With `Auto` (or any width at least as wide as
    /// the advisor's choice) this is the exact sum, except for 64-bit elements
    /// where no wider accumulator exists.
    ///
    /// # Errors
    ///
    /// - [`crate::ScanError::InvalidConfiguration`] if `width` is narrower than
    ///   the element type.
    /// - [`crate::ScanError::InvalidRange`] if `width` can overflow for this
    ///   length (only with the `checked` feature).
    pub fn sum<T: IntegerElement>(&self, values: &[T], width: AccumulatorWidth) -> Result<T::Wide> {
        let width = range::resolve(T::KIND, values.len(), width)?;
        trace!(
            "sum: {} x {} on {} tier, accumulator {:?}",
            T::KIND.name(),
            values.len(),
            self.tier,
            width
        );

        let bits = match self.vector_sum(
            values.as_ptr() as *const u8,
            size_of_val(values),
            T::KIND,
            width,
        ) {
            Some(bits) => bits,
            None => scalar::sum_integers(values),
        };
        Ok(T::wide_from_bits(bits, width.bits().unwrap_or(64)))
    }

    /// Sums a float buffer.
    ///
    /// [`FloatMode::Strict`] adds left to right and gives the same bits on every
    /// tier. [`FloatMode::Fast`] adds in parallel lanes, so rounding depends on
    /// the tier's register width.
    pub fn sum_float<T: FloatElement>(&self, values: &[T], mode: FloatMode) -> T {
        trace!(
            "sum_float: {} x {} on {} tier, {:?}",
            T::KIND.name(),
            values.len(),
            self.tier,
            mode
        );
        match mode {
            FloatMode::Strict => scalar::sum_floats_strict(values),
            FloatMode::Fast => match self.vector_sum_floats(values) {
                Some(sum) => sum,
                None => scalar::sum_floats_fast(values),
            },
        }
    }

    /// Number of `true` elements in a packed boolean buffer.
    ///
    /// Booleans are one byte each (`0` or `1`), so this is the byte sum.
    pub fn count_true(&self, values: &[bool]) -> u64 {
        trace!("count_true: {} on {} tier", values.len(), self.tier);
        match self.vector_sum(
            values.as_ptr() as *const u8,
            values.len(),
            ElementKind::U8,
            AccumulatorWidth::W64,
        ) {
            Some(count) => count,
            None => values.iter().filter(|&&b| b).count() as u64,
        }
    }

    // ============================================================================================
    // AVERAGE
    // ============================================================================================

    /// Integer mean, rounded half away from zero.
    ///
    /// The sum is taken with [`Scanner::sum`] and divided exactly in `i128`:
    /// `(sum + sign(sum) × ⌊len / 2⌋) / len` with truncating division. Both
    /// `[1, 2]` and `[-1, -2]` therefore average to `2` and `-2`.
    ///
    /// For `u64`/`i64` the 64-bit sum would wrap, so the sum is accumulated
    /// exactly in `i128` and the mean is always the true mean.
    ///
    /// # Errors
    ///
    /// - [`crate::ScanError::InvalidArgument`] for an empty buffer.
    /// - Any error of [`Scanner::sum`].
    pub fn average<T: IntegerElement>(&self, values: &[T], width: AccumulatorWidth) -> Result<T> {
        if values.is_empty() {
            return Err(invalid_argument("average of an empty buffer is undefined"));
        }
        let sum: i128 = if T::KIND.size() == size_of::<u64>() {
            // No accumulator wider than the element: sum exactly instead of wrapping.
            range::resolve(T::KIND, values.len(), width)?;
            trace!(
                "average: {} x {}, exact i128 sum",
                T::KIND.name(),
                values.len()
            );
            scalar::sum_integers_exact(values)
        } else {
            self.sum(values, width)?.as_()
        };
        let len = values.len() as i128;
        let bias = sum.signum() * (len / 2);
        Ok(T::from_average((sum + bias) / len))
    }

    /// Float mean computed as `sum × (1 / len)`.
    ///
    /// A single reciprocal multiply replaces the division. The result can
    /// differ from `sum / len` in the last bit; this is accepted for
    /// throughput.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScanError::InvalidArgument`] for an empty buffer.
    pub fn average_float<T: FloatElement>(&self, values: &[T], mode: FloatMode) -> Result<T> {
        if values.is_empty() {
            return Err(invalid_argument("average of an empty buffer is undefined"));
        }
        let reciprocal = T::one() / T::from_len(values.len());
        Ok(self.sum_float(values, mode) * reciprocal)
    }

    // ============================================================================================
    // SEARCH
    // ============================================================================================

    /// Whether any element satisfies `element <cmp> value`.
    ///
    /// `order` only changes which end the scan starts from; the answer is the
    /// same either way.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScanError::InvalidArgument`] for float buffers when
    /// `value` or any element is NaN (only with the `checked` feature).
    pub fn contains<T: SearchElement>(
        &self,
        values: &[T],
        value: T,
        cmp: Comparison,
        order: TraversalOrder,
    ) -> Result<bool> {
        T::check_search(values, value)?;
        trace!(
            "contains: {} x {} {:?} {:?} on {} tier",
            T::KIND.name(),
            values.len(),
            cmp,
            order,
            self.tier
        );
        Ok(self.find(values, value, cmp, order).is_some())
    }

    /// Position of the first (`Ascending`) or last (`Descending`) element
    /// equal to `value`, or `-1` if there is none.
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::contains`].
    pub fn index_of<T: SearchElement>(
        &self,
        values: &[T],
        value: T,
        order: TraversalOrder,
    ) -> Result<i64> {
        T::check_search(values, value)?;
        trace!(
            "index_of: {} x {} {:?} on {} tier",
            T::KIND.name(),
            values.len(),
            order,
            self.tier
        );
        Ok(self
            .find(values, value, Comparison::EqualTo, order)
            .map_or(-1, |index| index as i64))
    }

    // ============================================================================================
    // RAW POINTER ENTRY POINTS
    // ============================================================================================

    /// [`Scanner::sum`] over `length` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `length` elements for the duration of
    /// the call and not be written concurrently. With the `checked` feature a
    /// negative `length` or a null `ptr` is rejected; without it they are
    /// undefined behavior.
    pub unsafe fn sum_raw<T: IntegerElement>(
        &self,
        ptr: *const T,
        length: i64,
        width: AccumulatorWidth,
    ) -> Result<T::Wide> {
        self.sum(raw_slice(ptr, length)?, width)
    }

    /// [`Scanner::sum_float`] over `length` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Same as [`Scanner::sum_raw`].
    pub unsafe fn sum_float_raw<T: FloatElement>(
        &self,
        ptr: *const T,
        length: i64,
        mode: FloatMode,
    ) -> Result<T> {
        Ok(self.sum_float(raw_slice(ptr, length)?, mode))
    }

    /// [`Scanner::average`] over `length` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Same as [`Scanner::sum_raw`].
    pub unsafe fn average_raw<T: IntegerElement>(
        &self,
        ptr: *const T,
        length: i64,
        width: AccumulatorWidth,
    ) -> Result<T> {
        self.average(raw_slice(ptr, length)?, width)
    }

    /// [`Scanner::average_float`] over `length` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Same as [`Scanner::sum_raw`].
    pub unsafe fn average_float_raw<T: FloatElement>(
        &self,
        ptr: *const T,
        length: i64,
        mode: FloatMode,
    ) -> Result<T> {
        self.average_float(raw_slice(ptr, length)?, mode)
    }

    /// [`Scanner::contains`] over `length` elements starting at `ptr`.
    ///
    /// For `bool` buffers, debug builds reject any byte other than `0` or `1`
    /// before the buffer is read as booleans.
    ///
    /// # Safety
    ///
    /// Same as [`Scanner::sum_raw`]. In release builds a `bool` buffer must
    /// only hold the bytes `0` and `1`.
    pub unsafe fn contains_raw<T: SearchElement>(
        &self,
        ptr: *const T,
        length: i64,
        value: T,
        cmp: Comparison,
        order: TraversalOrder,
    ) -> Result<bool> {
        self.contains(raw_slice(ptr, length)?, value, cmp, order)
    }

    /// [`Scanner::index_of`] over `length` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// Same as [`Scanner::contains_raw`].
    pub unsafe fn index_of_raw<T: SearchElement>(
        &self,
        ptr: *const T,
        length: i64,
        value: T,
        order: TraversalOrder,
    ) -> Result<i64> {
        self.index_of(raw_slice(ptr, length)?, value, order)
    }

    // ============================================================================================
    // TIER DISPATCH
    // ============================================================================================

    /// Integer byte-buffer sum on a vector tier, `None` on the scalar tier.
    #[inline]
    #[cfg_attr(
        not(any(target_arch = "x86_64", target_arch = "aarch64")),
        allow(unused_variables)
    )]
    fn vector_sum(
        &self,
        ptr: *const u8,
        bytes: usize,
        kind: ElementKind,
        width: AccumulatorWidth,
    ) -> Option<u64> {
        // SAFETY: `self.tier` is supported by this CPU and `ptr` is valid for
        // `bytes` bytes since it comes from a slice.
        match self.tier {
            #[cfg(target_arch = "x86_64")]
            Tier::Wide => Some(unsafe { avx2::sum_integers(ptr, bytes, kind, width) }),
            #[cfg(target_arch = "x86_64")]
            Tier::Narrow => Some(unsafe { sse::sum_integers(ptr, bytes, kind, width) }),
            #[cfg(target_arch = "aarch64")]
            Tier::Narrow => Some(unsafe { neon::sum_integers(ptr, bytes, kind, width) }),
            _ => None,
        }
    }

    #[inline]
    #[cfg_attr(
        not(any(target_arch = "x86_64", target_arch = "aarch64")),
        allow(unused_variables)
    )]
    fn vector_sum_floats<T: FloatElement>(&self, values: &[T]) -> Option<T> {
        // SAFETY: see `vector_sum`.
        match self.tier {
            #[cfg(target_arch = "x86_64")]
            Tier::Wide => Some(unsafe { avx2::sum_floats(values.as_ptr(), values.len()) }),
            #[cfg(target_arch = "x86_64")]
            Tier::Narrow => Some(unsafe { sse::sum_floats(values.as_ptr(), values.len()) }),
            #[cfg(target_arch = "aarch64")]
            Tier::Narrow => Some(unsafe { neon::sum_floats(values.as_ptr(), values.len()) }),
            _ => None,
        }
    }

    #[inline]
    fn find<T: SearchElement>(
        &self,
        values: &[T],
        value: T,
        cmp: Comparison,
        order: TraversalOrder,
    ) -> Option<usize> {
        // SAFETY: see `vector_sum`.
        match self.tier {
            #[cfg(target_arch = "x86_64")]
            Tier::Wide => unsafe { avx2::find(values.as_ptr(), values.len(), value, cmp, order) },
            #[cfg(target_arch = "x86_64")]
            Tier::Narrow => unsafe { sse::find(values.as_ptr(), values.len(), value, cmp, order) },
            #[cfg(target_arch = "aarch64")]
            Tier::Narrow => unsafe { neon::find(values.as_ptr(), values.len(), value, cmp, order) },
            _ => scalar::find(values, value, cmp, order),
        }
    }
}

/// Turns a raw `(ptr, length)` pair into a slice after the precondition
/// checks.
///
/// # Safety
///
/// See [`Scanner::sum_raw`].
unsafe fn raw_slice<'a, T: SearchElement>(ptr: *const T, length: i64) -> Result<&'a [T]> {
    if cfg!(feature = "checked") {
        if length < 0 {
            return Err(invalid_argument(format!(
                "negative length {length} for a {} buffer",
                <T as Element>::KIND.name()
            )));
        }
        if ptr.is_null() && length > 0 {
            return Err(invalid_argument("null pointer with a non-zero length"));
        }
    }
    let len = length as usize;
    if len == 0 {
        return Ok(&[]);
    }
    T::check_encoding(ptr, len)?;
    Ok(std::slice::from_raw_parts(ptr, len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;

    fn scanners() -> Vec<Scanner> {
        Tier::available()
            .into_iter()
            .map(|tier| Scanner::with_tier(tier).unwrap())
            .collect()
    }

    #[test]
    fn test_new_uses_detected_tier() {
        assert_eq!(Scanner::new().tier(), Tier::detect());
        assert_eq!(Scanner::default(), Scanner::new());
    }

    #[test]
    fn test_unsupported_tier_is_rejected() {
        for tier in Tier::ALL {
            assert_eq!(Scanner::with_tier(tier).is_ok(), tier.supported());
        }
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        for scanner in scanners() {
            assert_eq!(scanner.average(&[1i32, 2], AccumulatorWidth::Auto), Ok(2));
            assert_eq!(scanner.average(&[-1i32, -2], AccumulatorWidth::Auto), Ok(-2));
            assert_eq!(scanner.average(&[1u8, 1, 2], AccumulatorWidth::Auto), Ok(1));
            assert_eq!(scanner.average(&[1u8, 2, 2], AccumulatorWidth::Auto), Ok(2));
            assert_eq!(scanner.average(&[-128i8; 40], AccumulatorWidth::Auto), Ok(-128));
        }
    }

    #[test]
    fn test_empty_average_is_an_error() {
        let scanner = Scanner::new();
        assert!(matches!(
            scanner.average::<u16>(&[], AccumulatorWidth::Auto),
            Err(ScanError::InvalidArgument { .. })
        ));
        assert!(scanner.average_float::<f64>(&[], FloatMode::Fast).is_err());
    }

    #[test]
    fn test_count_true_on_every_tier() {
        let values: Vec<bool> = (0..77).map(|i| i % 3 == 0).collect();
        for scanner in scanners() {
            assert_eq!(scanner.count_true(&values), 26);
            assert_eq!(scanner.count_true(&[]), 0);
        }
    }

    #[test]
    fn test_raw_zero_length_accepts_null() {
        let scanner = Scanner::new();
        let sum = unsafe { scanner.sum_raw::<u32>(std::ptr::null(), 0, AccumulatorWidth::Auto) };
        assert_eq!(sum, Ok(0));
        let found = unsafe {
            scanner.index_of_raw::<i16>(std::ptr::null(), 0, 7, TraversalOrder::Ascending)
        };
        assert_eq!(found, Ok(-1));
    }

    #[cfg(feature = "checked")]
    #[test]
    fn test_raw_negative_length_is_rejected() {
        let values = [1u8, 2, 3];
        let scanner = Scanner::new();
        let err = unsafe { scanner.sum_raw(values.as_ptr(), -1, AccumulatorWidth::Auto) }
            .unwrap_err();
        assert!(err.to_string().contains("negative length -1"));
        assert!(unsafe { scanner.sum_raw::<u8>(std::ptr::null(), 3, AccumulatorWidth::Auto) }
            .is_err());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_raw_bool_encoding_is_checked() {
        let bytes = [0u8, 1, 0, 5];
        let scanner = Scanner::new();
        let result = unsafe {
            scanner.contains_raw(
                bytes.as_ptr() as *const bool,
                bytes.len() as i64,
                true,
                Comparison::EqualTo,
                TraversalOrder::Ascending,
            )
        };
        assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));
    }
}
