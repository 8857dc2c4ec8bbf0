//! Render floating-point matrices as small fractions.
//!
//! Expected-visit counts of chains with rational transition probabilities
//! are themselves rational, so `2.142857142857143` reads better as `15/7`.
//! [`limit_denominator`] finds the closest fraction whose denominator does
//! not exceed a bound. It expands the exact binary value of the float as a
//! continued fraction in integer arithmetic and settles the last step with
//! an exact semiconvergent comparison.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]

use std::fmt;

use nalgebra::DMatrix;

/// A signed fraction in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: i64,
    denom: u64,
}

impl Fraction {
    #[must_use]
    pub const fn numer(self) -> i64 {
        self.numer
    }

    #[must_use]
    pub const fn denom(self) -> u64 {
        self.denom
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Closest fraction to `value` with denominator at most `max_denominator`.
///
/// `value` is taken at its exact binary value, so the result matches a
/// bounded best rational approximation of that dyadic rational. Ties go to
/// the continued-fraction convergent.
///
/// Returns `None` for NaN, infinities and magnitudes that do not fit an
/// `i64` numerator. A `max_denominator` of 0 is treated as 1.
#[must_use]
pub fn limit_denominator(value: f64, max_denominator: u64) -> Option<Fraction> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    let max_den = u128::from(max_denominator.max(1));

    let (mantissa, shift) = exact_dyadic(value.abs());
    let (numer, denom) = if shift == 0 {
        (u128::from(mantissa), 1)
    } else if shift > MAX_SHIFT {
        (0, 1)
    } else {
        best_rational(u128::from(mantissa), 1 << shift, max_den)
    };

    let numer = i64::try_from(numer).ok()?;
    let denom = u64::try_from(denom).ok()?;
    let numer = if value < 0.0 { -numer } else { numer };
    Some(Fraction { numer, denom })
}

// Below 2^-73 no fraction with a u64 denominator is closer than 0.
const MAX_SHIFT: u32 = 126;

/// Split a finite, non-negative `value` below 2^63 into `mantissa / 2^shift`
/// in lowest terms.
fn exact_dyadic(value: f64) -> (u64, u32) {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };

    if mantissa == 0 {
        return (0, 0);
    }
    if exponent >= 0 {
        return (mantissa << exponent, 0);
    }
    let shift = exponent.unsigned_abs();
    let zeros = mantissa.trailing_zeros().min(shift);
    (mantissa >> zeros, shift - zeros)
}

/// Best approximation of `numer / denom` (coprime) with denominator at most
/// `max_den`: continued-fraction convergents, then the best semiconvergent.
fn best_rational(numer: u128, denom: u128, max_den: u128) -> (u128, u128) {
    if denom <= max_den {
        return (numer, denom);
    }

    // Convergents p/q: (p0/q0) is the previous one, (p1/q1) the latest.
    let (mut p0, mut q0, mut p1, mut q1): (u128, u128, u128, u128) = (0, 1, 1, 0);
    let (mut n, mut d) = (numer, denom);
    while d != 0 {
        let a = n / d;
        let Some(q2) = a
            .checked_mul(q1)
            .and_then(|v| v.checked_add(q0))
            .filter(|&q| q <= max_den)
        else {
            break;
        };
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    let qk = q0 + k * q1;
    // p1/q1 is d/(q1 * denom) from the value; the candidates are 1/(q1 * qk)
    // apart.
    let convergent_wins = d
        .checked_mul(qk)
        .and_then(|v| v.checked_mul(2))
        .is_some_and(|v| v <= denom);
    if convergent_wins {
        (p1, q1)
    } else {
        (p0 + k * p1, qk)
    }
}

/// Render `matrix` one row per line, each entry as a bounded fraction.
///
/// Entries are left-aligned and padded to the widest entry, separated by
/// two spaces. Values that cannot be expressed as a fraction fall back to
/// their decimal form.
#[must_use]
pub fn format_matrix(matrix: &DMatrix<f64>, max_denominator: u64) -> String {
    let cells: Vec<Vec<String>> = matrix
        .row_iter()
        .map(|row| {
            row.iter()
                .map(|&v| {
                    limit_denominator(v, max_denominator)
                        .map_or_else(|| v.to_string(), |f| f.to_string())
                })
                .collect()
        })
        .collect();

    let width = cells
        .iter()
        .flatten()
        .map(String::len)
        .max()
        .unwrap_or(0);

    cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(value: f64) -> String {
        limit_denominator(value, 1_000_000)
            .expect("finite value")
            .to_string()
    }

    #[test]
    fn simple_fractions() {
        assert_eq!(frac(0.5), "1/2");
        assert_eq!(frac(1.0 / 3.0), "1/3");
        assert_eq!(frac(2.0 / 3.0), "2/3");
        assert_eq!(frac(0.1), "1/10");
        assert_eq!(frac(15.0 / 7.0), "15/7");
    }

    #[test]
    fn whole_numbers_and_zero() {
        assert_eq!(frac(0.0), "0");
        assert_eq!(frac(3.0), "3");
        assert_eq!(frac(-2.0), "-2");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(frac(-0.25), "-1/4");
        let f = limit_denominator(-4.0 / 5.0, 100).expect("finite");
        assert_eq!((f.numer(), f.denom()), (-4, 5));
    }

    #[test]
    fn bound_picks_closest_fraction() {
        // Best approximations of pi under small bounds.
        assert_eq!(
            limit_denominator(std::f64::consts::PI, 10).expect("finite").to_string(),
            "22/7"
        );
        assert_eq!(
            limit_denominator(std::f64::consts::PI, 1000).expect("finite").to_string(),
            "355/113"
        );
        assert_eq!(limit_denominator(0.3, 1).expect("finite").to_string(), "0");
        assert_eq!(limit_denominator(0.7, 1).expect("finite").to_string(), "1");
    }

    #[test]
    fn bound_uses_exact_binary_value() {
        let cases = [
            (33.062_577_453_316_564, "23984817/725437"),
            (39.537_281_680_185_37, "35180550/889807"),
            (42.086_684_412_414_99, "32191179/764878"),
        ];
        for (value, expected) in cases {
            assert_eq!(
                limit_denominator(value, 1_000_000).expect("finite").to_string(),
                expected,
                "value {value}"
            );
        }
    }

    #[test]
    fn exact_dyadic_values_are_kept() {
        assert_eq!(frac(0.375), "3/8");
        assert_eq!(limit_denominator(0.375, 4).expect("finite").to_string(), "1/3");
        assert_eq!(frac(1e-30), "0");
        assert_eq!(frac(f64::MIN_POSITIVE), "0");
        assert_eq!(frac(-1e-30), "0");
    }

    #[test]
    fn non_finite_values_have_no_fraction() {
        assert_eq!(limit_denominator(f64::NAN, 10), None);
        assert_eq!(limit_denominator(f64::INFINITY, 10), None);
        assert_eq!(limit_denominator(1e300, 10), None);
    }

    #[test]
    fn to_f64_round_trips_close_values() {
        let f = limit_denominator(0.125, 1000).expect("finite");
        assert!((f.to_f64() - 0.125).abs() < f64::EPSILON);
    }

    #[test]
    fn matrix_rows_are_padded() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 1.0 / 3.0, 2.0]);
        assert_eq!(format_matrix(&m, 1_000_000), "1    1/2\n1/3  2  ");
    }

    #[test]
    fn empty_matrix_renders_nothing() {
        assert_eq!(format_matrix(&DMatrix::zeros(0, 0), 10), "");
    }
}
