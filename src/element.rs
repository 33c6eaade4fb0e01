//! Element types and the traits that bind them to the kernels.
//!
//! The traits are sealed: the set of supported types is fixed and every type
//! has a hand-picked kernel path. Methods marked `#[doc(hidden)]` are kernel
//! plumbing and not part of the stable API.

use std::fmt::Debug;

use num::traits::AsPrimitive;

use crate::error::{invalid_argument, Result};
use crate::simd::SimdVector;
use crate::types::op;

mod sealed {
    pub trait Sealed {}
}

/// Runtime description of an element type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Bool,
}

impl ElementKind {
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::U8 => "u8",
            ElementKind::I8 => "i8",
            ElementKind::U16 => "u16",
            ElementKind::I16 => "i16",
            ElementKind::U32 => "u32",
            ElementKind::I32 => "i32",
            ElementKind::U64 => "u64",
            ElementKind::I64 => "i64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
            ElementKind::Bool => "bool",
        }
    }

    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            ElementKind::U8 | ElementKind::I8 | ElementKind::Bool => 1,
            ElementKind::U16 | ElementKind::I16 => 2,
            ElementKind::U32 | ElementKind::I32 | ElementKind::F32 => 4,
            ElementKind::U64 | ElementKind::I64 | ElementKind::F64 => 8,
        }
    }

    /// Bit width for integer kinds, `None` for floats and booleans.
    pub const fn integer_bits(self) -> Option<u32> {
        match self {
            ElementKind::F32 | ElementKind::F64 | ElementKind::Bool => None,
            kind => Some(kind.size() as u32 * 8),
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            ElementKind::I8 | ElementKind::I16 | ElementKind::I32 | ElementKind::I64
        )
    }
}

/// A primitive type with a specialized kernel path.
pub trait Element: Copy + PartialOrd + Debug + Send + Sync + 'static + sealed::Sealed {
    const KIND: ElementKind;
}

/// Element types supported by `contains` and `index_of`.
pub trait SearchElement: Element {
    /// Rejects inputs for which "first match" is ill-defined.
    ///
    /// Floats refuse NaN (only with the `checked` feature).
    #[doc(hidden)]
    fn check_search(_values: &[Self], _value: Self) -> Result<()> {
        Ok(())
    }

    /// Validates the raw byte encoding of a buffer before a slice is formed.
    ///
    /// # Safety
    /// `ptr` must be valid for `len` elements of reads.
    #[doc(hidden)]
    unsafe fn check_encoding(_ptr: *const Self, _len: usize) -> Result<()> {
        Ok(())
    }

    /// # Safety
    /// `V` must be supported by the running CPU.
    #[doc(hidden)]
    unsafe fn splat<V: SimdVector>(self) -> V;

    /// Lane-wise `a <OP> b`. The flag is `true` when the returned mask holds
    /// the complement of the answer and must be inverted against the
    /// valid-lanes mask.
    ///
    /// # Safety
    /// `V` must be supported by the running CPU.
    #[doc(hidden)]
    unsafe fn compare<V: SimdVector, const OP: u8>(a: V, b: V) -> (V, bool);
}

/// Integer element types supported by `sum` and `average`.
pub trait IntegerElement: SearchElement + AsPrimitive<i64> + AsPrimitive<i128> {
    /// Type returned by `sum`: `u64` for unsigned elements, `i64` for signed.
    type Wide: Copy + Debug + PartialEq + Eq + Send + Sync + 'static + AsPrimitive<i128>;

    /// Reduces a wrapping 64-bit sum modulo `2^bits` and extends it back.
    #[doc(hidden)]
    fn wide_from_bits(bits: u64, width: u32) -> Self::Wide;

    #[doc(hidden)]
    fn from_average(average: i128) -> Self;
}

/// Floating-point element types supported by `sum_float` and `average_float`.
pub trait FloatElement: SearchElement + num::Float {
    #[doc(hidden)]
    fn from_len(len: usize) -> Self;

    /// # Safety
    /// `V` must be supported by the running CPU.
    #[doc(hidden)]
    unsafe fn hsum<V: SimdVector>(v: V) -> Self;
}

macro_rules! compare_integers {
    ($a:ident, $b:ident, $eq:ident, $gt:ident) => {
        match OP {
            op::EQ => ($a.$eq($b), false),
            op::NE => ($a.$eq($b), true),
            op::GT => ($a.$gt($b), false),
            // a >= b  <=>  !(b > a)
            op::GE => ($b.$gt($a), true),
            op::LT => ($b.$gt($a), false),
            // a <= b  <=>  !(a > b)
            _ => ($a.$gt($b), true),
        }
    };
}

macro_rules! impl_integer {
    ($t:ty, $kind:ident, $wide:ty, $splat:ident, $raw:ty, $eq:ident, $gt:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;
        }

        impl SearchElement for $t {
            #[inline(always)]
            unsafe fn splat<V: SimdVector>(self) -> V {
                V::$splat(self as $raw)
            }

            #[inline(always)]
            unsafe fn compare<V: SimdVector, const OP: u8>(a: V, b: V) -> (V, bool) {
                compare_integers!(a, b, $eq, $gt)
            }
        }

        impl IntegerElement for $t {
            type Wide = $wide;

            #[inline]
            fn wide_from_bits(bits: u64, width: u32) -> $wide {
                let shift = 64 - width.min(64);
                if ElementKind::$kind.is_signed() {
                    (((bits << shift) as i64) >> shift) as $wide
                } else {
                    ((bits << shift) >> shift) as $wide
                }
            }

            #[inline]
            fn from_average(average: i128) -> $t {
                average.as_()
            }
        }
    };
}

impl_integer!(u8, U8, u64, splat8, u8, cmpeq8, cmpgt_u8);
impl_integer!(i8, I8, i64, splat8, u8, cmpeq8, cmpgt_i8);
impl_integer!(u16, U16, u64, splat16, u16, cmpeq16, cmpgt_u16);
impl_integer!(i16, I16, i64, splat16, u16, cmpeq16, cmpgt_i16);
impl_integer!(u32, U32, u64, splat32, u32, cmpeq32, cmpgt_u32);
impl_integer!(i32, I32, i64, splat32, u32, cmpeq32, cmpgt_i32);
impl_integer!(u64, U64, u64, splat64, u64, cmpeq64, cmpgt_u64);
impl_integer!(i64, I64, i64, splat64, u64, cmpeq64, cmpgt_i64);

macro_rules! impl_float {
    ($t:ty, $kind:ident, $splat:ident, $raw:ty, $cmp:ident, $hsum:ident) => {
        impl sealed::Sealed for $t {}

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;
        }

        impl SearchElement for $t {
            fn check_search(values: &[$t], value: $t) -> Result<()> {
                if !cfg!(feature = "checked") {
                    return Ok(());
                }
                if value.is_nan() {
                    return Err(invalid_argument(
                        "NaN comparison value: IEEE NaN comparisons are not totally ordered",
                    ));
                }
                match values.iter().position(|x| x.is_nan()) {
                    Some(index) => Err(invalid_argument(format!(
                        "buffer contains NaN at index {index}: IEEE NaN comparisons are not totally ordered"
                    ))),
                    None => Ok(()),
                }
            }

            #[inline(always)]
            unsafe fn splat<V: SimdVector>(self) -> V {
                V::$splat(self.to_bits() as $raw)
            }

            #[inline(always)]
            unsafe fn compare<V: SimdVector, const OP: u8>(a: V, b: V) -> (V, bool) {
                (a.$cmp::<OP>(b), false)
            }
        }

        impl FloatElement for $t {
            #[inline]
            fn from_len(len: usize) -> $t {
                len as $t
            }

            #[inline(always)]
            unsafe fn hsum<V: SimdVector>(v: V) -> $t {
                v.$hsum()
            }
        }
    };
}

impl_float!(f32, F32, splat32, u32, cmp_f32, hsum_f32);
impl_float!(f64, F64, splat64, u64, cmp_f64, hsum_f64);

impl sealed::Sealed for bool {}

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bool;
}

impl SearchElement for bool {
    /// Any byte other than 0 or 1 is rejected in debug builds. Release builds
    /// trust the caller.
    unsafe fn check_encoding(ptr: *const bool, len: usize) -> Result<()> {
        if !cfg!(debug_assertions) || len == 0 {
            return Ok(());
        }
        let bytes = std::slice::from_raw_parts(ptr as *const u8, len);
        match bytes.iter().position(|&b| b > 1) {
            Some(index) => Err(invalid_argument(format!(
                "invalid boolean encoding {:#04x} at index {index} (expected 0 or 1)",
                bytes[index]
            ))),
            None => Ok(()),
        }
    }

    #[inline(always)]
    unsafe fn splat<V: SimdVector>(self) -> V {
        V::splat8(self as u8)
    }

    #[inline(always)]
    unsafe fn compare<V: SimdVector, const OP: u8>(a: V, b: V) -> (V, bool) {
        compare_integers!(a, b, cmpeq8, cmpgt_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_metadata() {
        assert_eq!(<i16 as Element>::KIND.size(), 2);
        assert_eq!(<u64 as Element>::KIND.integer_bits(), Some(64));
        assert_eq!(<f32 as Element>::KIND.integer_bits(), None);
        assert!(<i8 as Element>::KIND.is_signed());
        assert!(!<u32 as Element>::KIND.is_signed());
        assert_eq!(<bool as Element>::KIND.name(), "bool");
    }

    #[test]
    fn test_wide_from_bits_truncates_and_extends() {
        assert_eq!(u8::wide_from_bits(765, 8), 253);
        assert_eq!(u8::wide_from_bits(765, 16), 765);
        assert_eq!(i8::wide_from_bits((-3i64) as u64, 64), -3);
        assert_eq!(i8::wide_from_bits(0xFF, 8), -1);
        assert_eq!(i16::wide_from_bits(0x8000, 16), -32768);
        assert_eq!(u64::wide_from_bits(u64::MAX, 64), u64::MAX);
    }

    #[test]
    fn test_from_average_fits_element() {
        assert_eq!(i8::from_average(-128), -128);
        assert_eq!(u16::from_average(65_535), u16::MAX);
        assert_eq!(i64::from_average(i64::MIN as i128), i64::MIN);
    }

    #[cfg(feature = "checked")]
    #[test]
    fn test_nan_is_rejected() {
        assert!(f64::check_search(&[1.0, 2.0], f64::NAN).is_err());
        let err = f32::check_search(&[1.0, f32::NAN], 1.0).unwrap_err();
        assert!(err.to_string().contains("index 1"));
        assert!(f32::check_search(&[1.0, 2.0], 2.0).is_ok());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_bool_encoding_is_validated() {
        let bytes = [0u8, 1, 2, 1];
        let err = unsafe { bool::check_encoding(bytes.as_ptr() as *const bool, bytes.len()) }
            .unwrap_err();
        assert!(err.to_string().contains("index 2"));

        let good = [0u8, 1, 1, 0];
        assert!(unsafe { bool::check_encoding(good.as_ptr() as *const bool, 4) }.is_ok());
    }
}
