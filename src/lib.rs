//! # simdscan
//!
//! Vectorized reductions and searches over contiguous buffers of primitive
//! numeric types: **Sum**, **Average**, **Contains** and **IndexOf**.
//!
//! Every call picks one of three capability tiers (256-bit AVX2, 128-bit
//! SSE4.2/NEON, or plain scalar loops), probed once per process, and returns
//! the same answer on all of them.
//!
//! # Features
//!
//! - **Overflow-safe sums**: integer sums pick the narrowest accumulator that
//!   cannot overflow, or honor an explicit wider one.
//! - **Short-circuit search**: six comparison operators, first or last match.
//! - **No allocation, no locks**: every operation is a pure function over a
//!   borrowed slice.
//!
//! # Quick Start
//!
//! ```rust
//! use simdscan::{AccumulatorWidth, Comparison, FloatMode, TraversalOrder};
//!
//! let data: Vec<i32> = vec![1, 2, 3, 4, 5];
//! assert_eq!(simdscan::sum(&data, AccumulatorWidth::Auto).unwrap(), 15);
//! assert_eq!(simdscan::average(&[1i32, 2], AccumulatorWidth::Auto).unwrap(), 2);
//!
//! let found = simdscan::contains(&data, 4, Comparison::GreaterThan, TraversalOrder::Ascending);
//! assert_eq!(found.unwrap(), true);
//!
//! let bytes = [5u8, 3, 5, 3, 5];
//! assert_eq!(simdscan::index_of(&bytes, 5, TraversalOrder::Ascending).unwrap(), 0);
//! assert_eq!(simdscan::index_of(&bytes, 5, TraversalOrder::Descending).unwrap(), 4);
//!
//! let floats = [0.5f64, 0.25, 0.25];
//! assert_eq!(simdscan::sum_float(&floats, FloatMode::Strict), 1.0);
//! ```
//!
//! # Configuration
//!
//! - Cargo feature `checked` (default): O(n) precondition checks such as the
//!   NaN scan and negative raw lengths, plus rejection of accumulators that
//!   can overflow. Disable it for the "fast" build that trusts the caller.
//! - `SIMDSCAN_TIER=scalar|narrow|wide` caps the detected tier.
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade: the detected tier at `debug`,
//! an ignored `SIMDSCAN_TIER` value at `warn`, and each dispatch at `trace`.

pub mod element;
pub mod error;
pub mod range;
mod scalar;
pub mod scanner;
pub mod simd;
pub mod tier;
pub mod types;

pub use element::{Element, ElementKind, FloatElement, IntegerElement, SearchElement};
pub use error::{Result, ScanError};
pub use scanner::Scanner;
pub use tier::{Tier, TIER_ENV_VAR};
pub use types::{AccumulatorWidth, Comparison, FloatMode, TraversalOrder};

/// Sums an integer buffer on the detected tier. See [`Scanner::sum`].
///
/// # Examples
///
/// ```rust
/// use simdscan::{AccumulatorWidth, ScanError};
///
/// let bytes = [255u8, 255, 255];
/// assert_eq!(simdscan::sum(&bytes, AccumulatorWidth::Auto).unwrap(), 765);
/// assert_eq!(simdscan::sum(&bytes, AccumulatorWidth::W16).unwrap(), 765);
///
/// // A u8 accumulator cannot hold 3 × 255.
/// # #[cfg(feature = "checked")]
/// assert!(matches!(
///     simdscan::sum(&bytes, AccumulatorWidth::W8),
///     Err(ScanError::InvalidRange { .. })
/// ));
/// ```
#[inline]
pub fn sum<T: IntegerElement>(values: &[T], width: AccumulatorWidth) -> Result<T::Wide> {
    Scanner::new().sum(values, width)
}

/// Sums a float buffer on the detected tier. See [`Scanner::sum_float`].
#[inline]
pub fn sum_float<T: FloatElement>(values: &[T], mode: FloatMode) -> T {
    Scanner::new().sum_float(values, mode)
}

/// Counts the `true` elements of a packed boolean buffer.
#[inline]
pub fn count_true(values: &[bool]) -> u64 {
    Scanner::new().count_true(values)
}

/// Integer mean rounded half away from zero. See [`Scanner::average`].
#[inline]
pub fn average<T: IntegerElement>(values: &[T], width: AccumulatorWidth) -> Result<T> {
    Scanner::new().average(values, width)
}

/// Float mean as `sum × (1 / len)`. See [`Scanner::average_float`].
#[inline]
pub fn average_float<T: FloatElement>(values: &[T], mode: FloatMode) -> Result<T> {
    Scanner::new().average_float(values, mode)
}

/// Whether any element satisfies `element <cmp> value`. See [`Scanner::contains`].
///
/// # Examples
///
/// ```rust
/// use simdscan::{Comparison, TraversalOrder};
///
/// # #[cfg(feature = "checked")]
/// assert!(simdscan::contains(
///     &[1.0, 2.0, f64::NAN],
///     2.0,
///     Comparison::EqualTo,
///     TraversalOrder::Ascending
/// )
/// .is_err());
/// ```
#[inline]
pub fn contains<T: SearchElement>(
    values: &[T],
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Result<bool> {
    Scanner::new().contains(values, value, cmp, order)
}

/// Position of the first or last element equal to `value`, `-1` if none.
/// See [`Scanner::index_of`].
#[inline]
pub fn index_of<T: SearchElement>(values: &[T], value: T, order: TraversalOrder) -> Result<i64> {
    Scanner::new().index_of(values, value, order)
}

/// Raw-pointer form of [`sum`].
///
/// # Safety
///
/// See [`Scanner::sum_raw`].
#[inline]
pub unsafe fn sum_raw<T: IntegerElement>(
    ptr: *const T,
    length: i64,
    width: AccumulatorWidth,
) -> Result<T::Wide> {
    Scanner::new().sum_raw(ptr, length, width)
}

/// Raw-pointer form of [`average`].
///
/// # Safety
///
/// See [`Scanner::sum_raw`].
#[inline]
pub unsafe fn average_raw<T: IntegerElement>(
    ptr: *const T,
    length: i64,
    width: AccumulatorWidth,
) -> Result<T> {
    Scanner::new().average_raw(ptr, length, width)
}

/// Raw-pointer form of [`contains`].
///
/// # Safety
///
/// See [`Scanner::contains_raw`].
#[inline]
pub unsafe fn contains_raw<T: SearchElement>(
    ptr: *const T,
    length: i64,
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> Result<bool> {
    Scanner::new().contains_raw(ptr, length, value, cmp, order)
}

/// Raw-pointer form of [`index_of`].
///
/// # Safety
///
/// See [`Scanner::contains_raw`].
#[inline]
pub unsafe fn index_of_raw<T: SearchElement>(
    ptr: *const T,
    length: i64,
    value: T,
    order: TraversalOrder,
) -> Result<i64> {
    Scanner::new().index_of_raw(ptr, length, value, order)
}
