//! Error types for simdscan operations.
//!
//! Every fallible entry point returns [`Result`]. Kernels themselves never fail:
//! all validation happens once per call, before the hot loop starts.

use std::fmt;

use crate::types::AccumulatorWidth;

/// Errors that can occur during simdscan operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A caller precondition was violated.
    InvalidArgument {
        /// Human-readable error message.
        message: String,
    },
    /// The requested accumulator cannot hold the sum of `length` elements.
    InvalidRange {
        /// Name of the element type being summed.
        element: &'static str,
        /// The accumulator width the caller asked for.
        requested: AccumulatorWidth,
        /// The narrowest width that cannot overflow.
        required: AccumulatorWidth,
        /// Number of elements in the buffer.
        length: usize,
    },
    /// A raw configuration value is outside its legal set.
    InvalidConfiguration {
        /// Name of the configuration type.
        name: &'static str,
        /// The rejected raw value.
        value: i64,
        /// Human-readable list of legal values.
        legal: &'static str,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            ScanError::InvalidRange {
                element,
                requested,
                required,
                length,
            } => write!(
                f,
                "Invalid accumulator range: {:?} can overflow when summing {} {} elements (needs at least {:?})",
                requested, length, element, required
            ),
            ScanError::InvalidConfiguration { name, value, legal } => write!(
                f,
                "Invalid {} value {} (legal values: {})",
                name, value, legal
            ),
        }
    }
}

impl std::error::Error for ScanError {}

/// Result type alias for simdscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Creates an invalid argument error.
pub fn invalid_argument(message: impl Into<String>) -> ScanError {
    ScanError::InvalidArgument {
        message: message.into(),
    }
}

/// Creates an invalid range error.
pub fn invalid_range(
    element: &'static str,
    requested: AccumulatorWidth,
    required: AccumulatorWidth,
    length: usize,
) -> ScanError {
    ScanError::InvalidRange {
        element,
        requested,
        required,
        length,
    }
}

/// Creates an invalid configuration error.
pub fn invalid_configuration(name: &'static str, value: i64, legal: &'static str) -> ScanError {
    ScanError::InvalidConfiguration { name, value, legal }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = invalid_argument("length must be >= 0, got -3");
        let display = format!("{}", error);
        assert!(display.contains("Invalid argument"));
        assert!(display.contains("got -3"));
    }

    #[test]
    fn test_invalid_range_display() {
        let error = invalid_range("u8", AccumulatorWidth::W8, AccumulatorWidth::W16, 3);
        let display = format!("{}", error);
        assert!(display.contains("Invalid accumulator range"));
        assert!(display.contains("W8"));
        assert!(display.contains("3 u8 elements"));
        assert!(display.contains("W16"));
    }

    #[test]
    fn test_invalid_configuration_display() {
        let error = invalid_configuration("Comparison", 9, "0..=5");
        let display = format!("{}", error);
        assert!(display.contains("Invalid Comparison value 9"));
        assert!(display.contains("0..=5"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = invalid_argument("test");
        let error2 = invalid_argument("test");
        let error3 = invalid_argument("other");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = invalid_configuration("FloatMode", 7, "0 (Strict), 1 (Fast)");

        let _: &dyn std::error::Error = &error;

        assert!(std::error::Error::source(&error).is_none());
    }
}
