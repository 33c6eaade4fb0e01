//! Contains / IndexOf tests.
//!
//! The reference is a plain `position`/`rposition` over the same data. Values
//! are drawn from a small range so that every operator sees both hits and
//! misses at every position, including the sub-register tails.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdscan::{Comparison, ScanError, Scanner, SearchElement, Tier, TraversalOrder};

const MAX_LEN: usize = 3 * 32 + 1;
const ORDERS: [TraversalOrder; 2] = [TraversalOrder::Ascending, TraversalOrder::Descending];

fn scanners() -> Vec<Scanner> {
    Tier::available()
        .into_iter()
        .map(|tier| Scanner::with_tier(tier).unwrap())
        .collect()
}

fn reference<T: SearchElement>(
    values: &[T],
    value: T,
    cmp: Comparison,
    order: TraversalOrder,
) -> i64 {
    let found = match order {
        TraversalOrder::Ascending => values.iter().position(|&x| cmp.evaluate(x, value)),
        TraversalOrder::Descending => values.iter().rposition(|&x| cmp.evaluate(x, value)),
    };
    found.map_or(-1, |i| i as i64)
}

/// Checks `contains` for every operator and order, and `index_of` for every
/// order, against the reference on every tier.
fn check_all<T: SearchElement>(values: &[T], value: T) {
    for scanner in scanners() {
        for order in ORDERS {
            for cmp in Comparison::ALL {
                let expected = reference(values, value, cmp, order) != -1;
                let got = scanner.contains(values, value, cmp, order).unwrap();
                assert_eq!(
                    got,
                    expected,
                    "{} {:?} {:?} value={:?} values={:?}",
                    scanner.tier(),
                    cmp,
                    order,
                    value,
                    values
                );
            }

            let expected = reference(values, value, Comparison::EqualTo, order);
            let got = scanner.index_of(values, value, order).unwrap();
            assert_eq!(
                got,
                expected,
                "{} index_of {:?} value={:?} values={:?}",
                scanner.tier(),
                order,
                value,
                values
            );
        }
    }
}

macro_rules! integer_search_tests {
    ($($name:ident: $t:ty => [$($pick:expr),*],)*) => {
        $(
            #[test]
            fn $name() {
                let picks: &[$t] = &[$($pick),*];
                let mut rng = StdRng::seed_from_u64(0xC0FFEE);
                for len in 0..=MAX_LEN {
                    let values: Vec<$t> =
                        (0..len).map(|_| picks[rng.random_range(0..picks.len())]).collect();
                    for &value in picks {
                        check_all(&values, value);
                    }
                }
            }
        )*
    };
}

integer_search_tests! {
    test_search_u8: u8 => [0, 1, 127, 128, 255],
    test_search_i8: i8 => [i8::MIN, -1, 0, 1, i8::MAX],
    test_search_u16: u16 => [0, 0x7FFF, 0x8000, u16::MAX],
    test_search_i16: i16 => [i16::MIN, -300, 0, 300, i16::MAX],
    test_search_u32: u32 => [0, 7, 0x8000_0000, u32::MAX],
    test_search_i32: i32 => [i32::MIN, -7, 0, 7, i32::MAX],
    test_search_u64: u64 => [0, 1 << 63, u64::MAX],
    test_search_i64: i64 => [i64::MIN, -1, 0, i64::MAX],
}

#[test]
fn test_search_floats() {
    let picks32 = [-1.5f32, -0.0, 0.0, 2.25, f32::INFINITY];
    let picks64 = [f64::NEG_INFINITY, -3.0, 0.0, 1e300];
    let mut rng = StdRng::seed_from_u64(21);
    for len in 0..=MAX_LEN {
        let values: Vec<f32> = (0..len).map(|_| picks32[rng.random_range(0..5)]).collect();
        for value in picks32 {
            check_all(&values, value);
        }
        let values: Vec<f64> = (0..len).map(|_| picks64[rng.random_range(0..4)]).collect();
        for value in picks64 {
            check_all(&values, value);
        }
    }
}

#[test]
fn test_search_bools() {
    let mut rng = StdRng::seed_from_u64(34);
    for len in 0..=MAX_LEN {
        let values: Vec<bool> = (0..len).map(|_| rng.random_bool(0.2)).collect();
        check_all(&values, true);
        check_all(&values, false);
    }
}

#[test]
fn test_index_of_concrete_scenarios() {
    let values = [5i32, 3, 5, 3, 5];
    for scanner in scanners() {
        assert_eq!(scanner.index_of(&values, 5, TraversalOrder::Ascending), Ok(0));
        assert_eq!(scanner.index_of(&values, 5, TraversalOrder::Descending), Ok(4));
        assert_eq!(scanner.index_of(&values, 3, TraversalOrder::Descending), Ok(3));
        assert_eq!(scanner.index_of(&values, 4, TraversalOrder::Ascending), Ok(-1));
    }
}

#[test]
fn test_empty_buffer_finds_nothing() {
    for scanner in scanners() {
        for order in ORDERS {
            assert_eq!(scanner.index_of::<u8>(&[], 0, order), Ok(-1));
            assert_eq!(scanner.index_of::<i16>(&[], 0, order), Ok(-1));
            assert_eq!(scanner.index_of::<u32>(&[], 0, order), Ok(-1));
            assert_eq!(scanner.index_of::<i64>(&[], 0, order), Ok(-1));
            assert_eq!(scanner.index_of::<f32>(&[], 0.0, order), Ok(-1));
            assert_eq!(scanner.index_of::<f64>(&[], 0.0, order), Ok(-1));
            assert_eq!(scanner.index_of::<bool>(&[], true, order), Ok(-1));
            for cmp in Comparison::ALL {
                assert_eq!(scanner.contains::<u16>(&[], 0, cmp, order), Ok(false));
            }
        }
    }
}

#[test]
fn test_contains_agrees_with_index_of() {
    let mut rng = StdRng::seed_from_u64(55);
    for len in [0usize, 1, 15, 16, 17, 31, 32, 33, 500, 4_097] {
        let values: Vec<i16> = (0..len).map(|_| rng.random_range(-20..20)).collect();
        for scanner in scanners() {
            for value in -21..21 {
                for order in ORDERS {
                    let found = scanner
                        .contains(&values, value, Comparison::EqualTo, order)
                        .unwrap();
                    let index = scanner.index_of(&values, value, order).unwrap();
                    assert_eq!(found, index != -1);
                }
            }
        }
    }
}

#[test]
fn test_single_match_is_found_from_both_ends() {
    for len in 1..=200usize {
        for at in [0, len / 2, len - 1] {
            let mut values = vec![0u64; len];
            values[at] = 42;
            for scanner in scanners() {
                let up = scanner.index_of(&values, 42, TraversalOrder::Ascending);
                let down = scanner.index_of(&values, 42, TraversalOrder::Descending);
                assert_eq!(up, Ok(at as i64), "{} len={}", scanner.tier(), len);
                assert_eq!(down, up);
            }
        }
    }
}

#[test]
fn test_multiple_matches_report_lowest_and_highest() {
    let mut rng = StdRng::seed_from_u64(89);
    for len in 2..=MAX_LEN * 3 {
        let mut values: Vec<u8> = (0..len).map(|_| rng.random_range(0..200)).collect();
        let first = rng.random_range(0..len - 1);
        let last = rng.random_range(first + 1..len);
        values[first] = 250;
        values[last] = 250;
        for scanner in scanners() {
            assert_eq!(
                scanner.index_of(&values, 250, TraversalOrder::Ascending),
                Ok(first as i64)
            );
            assert_eq!(
                scanner.index_of(&values, 250, TraversalOrder::Descending),
                Ok(last as i64)
            );
        }
    }
}

#[test]
fn test_zero_filled_tail_lanes_never_match() {
    // Partial loads zero the unused lanes; a zero needle must not see them.
    for len in 1..=MAX_LEN {
        let values = vec![9i32; len];
        for scanner in scanners() {
            for order in ORDERS {
                assert_eq!(scanner.index_of(&values, 0, order), Ok(-1));
                assert_eq!(
                    scanner.contains(&values, 1, Comparison::LessThanOrEqualTo, order),
                    Ok(false)
                );
                assert_eq!(
                    scanner.contains(&values, 9, Comparison::NotEqualTo, order),
                    Ok(false)
                );
            }
        }
    }
}

#[cfg(feature = "checked")]
#[test]
fn test_nan_is_a_precondition_error() {
    for scanner in scanners() {
        let result = scanner.contains(
            &[1.0, 2.0, f64::NAN],
            2.0,
            Comparison::EqualTo,
            TraversalOrder::Ascending,
        );
        assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));

        let result = scanner.index_of(&[1.0f32, 2.0], f32::NAN, TraversalOrder::Descending);
        assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));
    }
}

#[test]
fn test_search_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(144);
    let values: Vec<u32> = (0..9_999).map(|_| rng.random_range(0..1_000)).collect();
    for scanner in scanners() {
        let first = scanner.index_of(&values, 500, TraversalOrder::Descending);
        for _ in 0..3 {
            assert_eq!(scanner.index_of(&values, 500, TraversalOrder::Descending), first);
        }
    }
}

#[test]
fn test_raw_search_entry_points() {
    let values = [1i8, -4, 9, -4];
    let ptr = values.as_ptr();
    unsafe {
        assert_eq!(
            simdscan::index_of_raw(ptr, 4, -4, TraversalOrder::Descending),
            Ok(3)
        );
        assert_eq!(
            simdscan::index_of_raw(ptr, 2, 9, TraversalOrder::Ascending),
            Ok(-1)
        );
        assert_eq!(
            simdscan::contains_raw(ptr, 4, 8, Comparison::GreaterThan, TraversalOrder::Ascending),
            Ok(true)
        );
    }
}

#[cfg(feature = "checked")]
#[test]
fn test_raw_negative_length_is_rejected() {
    let values = [1u16, 2];
    let result = unsafe { simdscan::index_of_raw(values.as_ptr(), -2, 1, TraversalOrder::Ascending) };
    assert!(matches!(result, Err(ScanError::InvalidArgument { .. })));
}
