//! Call-time configuration values shared by every operation.
//!
//! All of these are plain `Copy` enums. Raw integer values coming from outside
//! the type system (FFI, config files) enter through `TryFrom<u8>`, which always
//! validates and names the legal set on failure.

use crate::error::{invalid_configuration, ScanError};

/// Relational operator applied as `element <op> value` by `contains`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Comparison {
    #[default]
    EqualTo = 0,
    NotEqualTo = 1,
    GreaterThan = 2,
    GreaterThanOrEqualTo = 3,
    LessThan = 4,
    LessThanOrEqualTo = 5,
}

/// Raw discriminants, used as const generic parameters by the kernels.
pub(crate) mod op {
    pub const EQ: u8 = 0;
    pub const NE: u8 = 1;
    pub const GT: u8 = 2;
    pub const GE: u8 = 3;
    pub const LT: u8 = 4;
    pub const LE: u8 = 5;
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::EqualTo,
        Comparison::NotEqualTo,
        Comparison::GreaterThan,
        Comparison::GreaterThanOrEqualTo,
        Comparison::LessThan,
        Comparison::LessThanOrEqualTo,
    ];

    /// Evaluates `element <op> value` with Rust's `PartialOrd` semantics.
    #[inline(always)]
    pub fn evaluate<T: PartialOrd>(self, element: T, value: T) -> bool {
        match self {
            Comparison::EqualTo => element == value,
            Comparison::NotEqualTo => element != value,
            Comparison::GreaterThan => element > value,
            Comparison::GreaterThanOrEqualTo => element >= value,
            Comparison::LessThan => element < value,
            Comparison::LessThanOrEqualTo => element <= value,
        }
    }
}

impl TryFrom<u8> for Comparison {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Comparison::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| {
                invalid_configuration(
                    "Comparison",
                    value as i64,
                    "0 (EqualTo), 1 (NotEqualTo), 2 (GreaterThan), 3 (GreaterThanOrEqualTo), 4 (LessThan), 5 (LessThanOrEqualTo)",
                )
            })
    }
}

/// Direction of a search scan.
///
/// `Ascending` reports the lowest matching index, `Descending` the highest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TraversalOrder {
    #[default]
    Ascending = 0,
    Descending = 1,
}

impl TryFrom<u8> for TraversalOrder {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TraversalOrder::Ascending),
            1 => Ok(TraversalOrder::Descending),
            _ => Err(invalid_configuration(
                "TraversalOrder",
                value as i64,
                "0 (Ascending), 1 (Descending)",
            )),
        }
    }
}

/// Width of the integer accumulator used by `sum` and `average`.
///
/// `Auto` asks the range advisor for the narrowest width that cannot overflow.
/// An explicit width wider than that is always accepted; see [`crate::range`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AccumulatorWidth {
    #[default]
    Auto = 0,
    W8 = 8,
    W16 = 16,
    W32 = 32,
    W64 = 64,
}

impl AccumulatorWidth {
    /// Number of bits, `None` for `Auto`.
    #[inline]
    pub fn bits(self) -> Option<u32> {
        match self {
            AccumulatorWidth::Auto => None,
            width => Some(width as u32),
        }
    }

    pub(crate) fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(AccumulatorWidth::W8),
            16 => Some(AccumulatorWidth::W16),
            32 => Some(AccumulatorWidth::W32),
            64 => Some(AccumulatorWidth::W64),
            _ => None,
        }
    }
}

impl TryFrom<u8> for AccumulatorWidth {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccumulatorWidth::Auto),
            bits => AccumulatorWidth::from_bits(bits as u32).ok_or_else(|| {
                invalid_configuration(
                    "AccumulatorWidth",
                    value as i64,
                    "0 (Auto), 8, 16, 32, 64",
                )
            }),
        }
    }
}

/// Accumulation order for floating-point `sum` and `average`.
///
/// `Strict` adds elements one by one from the lowest address, so the result is
/// identical on every tier. `Fast` spreads the additions over parallel vector
/// lanes; rounding then depends on the lane layout of the tier that ran.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FloatMode {
    #[default]
    Strict = 0,
    Fast = 1,
}

impl TryFrom<u8> for FloatMode {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FloatMode::Strict),
            1 => Ok(FloatMode::Fast),
            _ => Err(invalid_configuration(
                "FloatMode",
                value as i64,
                "0 (Strict), 1 (Fast)",
            )),
        }
    }
}
