//! Average tests: the integer rounding law against an exact `i128`
//! reference, float averages, and the empty-buffer precondition.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdscan::{AccumulatorWidth, FloatMode, ScanError, Scanner, Tier};

fn scanners() -> Vec<Scanner> {
    Tier::available()
        .into_iter()
        .map(|tier| Scanner::with_tier(tier).unwrap())
        .collect()
}

/// `sum / len` rounded half away from zero, without going through the
/// crate's formula.
fn round_half_away(sum: i128, len: i128) -> i128 {
    let quotient = sum / len;
    let remainder = (sum % len).abs();
    if 2 * remainder >= len {
        quotient + sum.signum()
    } else {
        quotient
    }
}

macro_rules! average_law_tests {
    ($($name:ident: $t:ty,)*) => {
        $(
            #[test_log::test]
            fn $name() {
                let mut rng = StdRng::seed_from_u64(0xA7E ^ std::mem::size_of::<$t>() as u64);
                for len in 1..=200usize {
                    let values: Vec<$t> = (0..len).map(|_| rng.random::<$t>()).collect();
                    let sum: i128 = values.iter().map(|&x| x as i128).sum();
                    let expected = round_half_away(sum, len as i128) as $t;
                    for scanner in scanners() {
                        let got = scanner.average(&values, AccumulatorWidth::Auto).unwrap();
                        assert_eq!(got, expected, "{} len={}", scanner.tier(), len);
                    }
                }
            }
        )*
    };
}

average_law_tests! {
    test_average_law_u8: u8,
    test_average_law_i8: i8,
    test_average_law_u16: u16,
    test_average_law_i16: i16,
    test_average_law_u32: u32,
    test_average_law_i32: i32,
}

#[test]
fn test_average_law_64_bit_small_values() {
    // Values small enough that the 64-bit sum cannot wrap.
    let mut rng = StdRng::seed_from_u64(64);
    for len in 1..=200usize {
        let unsigned: Vec<u64> = (0..len).map(|_| rng.random_range(0..1u64 << 40)).collect();
        let signed: Vec<i64> = (0..len)
            .map(|_| rng.random_range(-(1i64 << 40)..1i64 << 40))
            .collect();
        let usum: i128 = unsigned.iter().map(|&x| x as i128).sum();
        let ssum: i128 = signed.iter().map(|&x| x as i128).sum();
        for scanner in scanners() {
            assert_eq!(
                scanner.average(&unsigned, AccumulatorWidth::Auto),
                Ok(round_half_away(usum, len as i128) as u64)
            );
            assert_eq!(
                scanner.average(&signed, AccumulatorWidth::W64),
                Ok(round_half_away(ssum, len as i128) as i64)
            );
        }
    }
}

#[test]
fn test_average_64_bit_sums_past_the_wrap() {
    for scanner in scanners() {
        assert_eq!(scanner.average(&[u64::MAX, u64::MAX], AccumulatorWidth::Auto), Ok(u64::MAX));
        assert_eq!(scanner.average(&[i64::MIN, i64::MIN], AccumulatorWidth::Auto), Ok(i64::MIN));
        assert_eq!(scanner.average(&[i64::MAX, i64::MAX, 1], AccumulatorWidth::W64), Ok(6148914691236517205));
        assert_eq!(scanner.average(&[u64::MAX, u64::MAX - 1], AccumulatorWidth::W64), Ok(u64::MAX));
    }

    let mut rng = StdRng::seed_from_u64(65);
    for len in [2usize, 31, 97] {
        let unsigned: Vec<u64> = (0..len).map(|_| rng.random()).collect();
        let signed: Vec<i64> = (0..len).map(|_| rng.random()).collect();
        let usum: i128 = unsigned.iter().map(|&x| x as i128).sum();
        let ssum: i128 = signed.iter().map(|&x| x as i128).sum();
        for scanner in scanners() {
            assert_eq!(
                scanner.average(&unsigned, AccumulatorWidth::Auto),
                Ok(round_half_away(usum, len as i128) as u64)
            );
            assert_eq!(
                scanner.average(&signed, AccumulatorWidth::Auto),
                Ok(round_half_away(ssum, len as i128) as i64)
            );
        }
    }

    let values = [i64::MIN, i64::MIN];
    let average = unsafe { simdscan::average_raw(values.as_ptr(), 2, AccumulatorWidth::Auto) };
    assert_eq!(average, Ok(i64::MIN));
}

#[test]
fn test_average_concrete_scenarios() {
    for scanner in scanners() {
        assert_eq!(scanner.average(&[1i32, 2], AccumulatorWidth::Auto), Ok(2));
        assert_eq!(scanner.average(&[-1i32, -2], AccumulatorWidth::Auto), Ok(-2));
        assert_eq!(scanner.average(&[1i32, 2, 3, 4], AccumulatorWidth::Auto), Ok(3));
        assert_eq!(scanner.average(&[-2i16, -3, -3], AccumulatorWidth::Auto), Ok(-3));
        assert_eq!(scanner.average(&[255u8; 1_000], AccumulatorWidth::Auto), Ok(255));
        assert_eq!(scanner.average(&[i64::MIN], AccumulatorWidth::Auto), Ok(i64::MIN));
    }
}

#[test]
fn test_average_of_empty_buffer_is_an_error() {
    for scanner in scanners() {
        assert!(matches!(
            scanner.average::<i32>(&[], AccumulatorWidth::Auto),
            Err(ScanError::InvalidArgument { .. })
        ));
        assert!(matches!(
            scanner.average_float::<f32>(&[], FloatMode::Strict),
            Err(ScanError::InvalidArgument { .. })
        ));
    }
}

#[cfg(feature = "checked")]
#[test]
fn test_average_propagates_range_errors() {
    let result = Scanner::new().average(&[200u8, 200], AccumulatorWidth::W8);
    assert!(matches!(result, Err(ScanError::InvalidRange { .. })));
}

#[test]
fn test_float_average_uses_reciprocal() {
    let values = [1.0f64, 2.0, 3.0, 4.0];
    for scanner in scanners() {
        for mode in [FloatMode::Strict, FloatMode::Fast] {
            assert_eq!(scanner.average_float(&values, mode), Ok(2.5));
        }
        // 10 × (1/3) rounds differently from 10 / 3 only in the last bit.
        let thirds = scanner.average_float(&[3.0f64, 3.0, 4.0], FloatMode::Strict).unwrap();
        assert_eq!(thirds, 10.0 * (1.0 / 3.0));
        assert!((thirds - 10.0 / 3.0).abs() <= f64::EPSILON * 4.0);
    }
}

#[test]
fn test_float_average_random() {
    let mut rng = StdRng::seed_from_u64(99);
    for len in 1..=97usize {
        let values: Vec<f32> = (0..len).map(|_| rng.random_range(-100.0..100.0)).collect();
        let strict: f32 = values.iter().fold(0.0, |acc, &x| acc + x) * (1.0 / len as f32);
        for scanner in scanners() {
            let got = scanner.average_float(&values, FloatMode::Strict).unwrap();
            assert_eq!(got.to_bits(), strict.to_bits());
            let fast = scanner.average_float(&values, FloatMode::Fast).unwrap();
            assert!((fast - strict).abs() <= 1e-3, "{} len={}", scanner.tier(), len);
        }
    }
}

#[test]
fn test_raw_average_entry_point() {
    let values = [10u16, 20, 31];
    let avg = unsafe { simdscan::average_raw(values.as_ptr(), 3, AccumulatorWidth::Auto) };
    assert_eq!(avg, Ok(20));
    let scanner = Scanner::new();
    let avg = unsafe { scanner.average_float_raw([1.0f32, 2.0].as_ptr(), 2, FloatMode::Fast) };
    assert_eq!(avg, Ok(1.5));
}
