//! Decimal tier scalar
//!
//! Every result is rounded to [`DECIMAL_DIGITS`] significant digits, so a
//! value stays reproducible however long the session runs. Decimals cannot
//! represent infinities or NaN: lossy conversions saturate and log a warning,
//! [`Decimal::try_from_f64`] refuses instead.

use crate::constants::DECIMAL_DIGITS;
use crate::precision::{PreciseScalar, Quad};
use crate::{MathError, Result};
use bigdecimal::{num_bigint::BigInt, BigDecimal};
use lazy_static::lazy_static;
use log::warn;
use num_traits::{Float, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

lazy_static! {
    /// Largest magnitude a saturating conversion produces
    static ref SATURATION_LIMIT: BigDecimal = exact(f64::MAX).with_prec(DECIMAL_DIGITS);
}

/// Exact decimal expansion of a finite double
fn exact(value: f64) -> BigDecimal {
    let (mantissa, exponent, sign) = Float::integer_decode(value);
    let mantissa = BigInt::from(mantissa) * BigInt::from(sign);
    if exponent >= 0 {
        BigDecimal::new(mantissa * BigInt::from(2).pow(exponent as u32), 0)
    } else {
        // m·2^-k = m·5^k / 10^k
        let k = exponent.unsigned_abs() as u32;
        BigDecimal::new(mantissa * BigInt::from(5).pow(k), i64::from(k))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// Rounds an arbitrary `BigDecimal` into the tier's context
    pub fn from_big_decimal(value: BigDecimal) -> Self {
        Decimal(value.with_prec(DECIMAL_DIGITS))
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Widens a double, saturating non-finite input
    ///
    /// NaN becomes zero and infinities become the largest finite double with
    /// the same sign.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            warn!("Saturating NaN to zero in the decimal tier");
            return Decimal::from_big_decimal(BigDecimal::zero());
        }
        if value.is_infinite() {
            warn!("Saturating {} in the decimal tier", value);
            return Self::saturated(value < 0.0);
        }
        Decimal::from_f64_exact(value)
    }

    /// Widens a double, refusing non-finite input
    pub fn try_from_f64(value: f64) -> Result<Self> {
        if value.is_finite() {
            Ok(Decimal::from_f64_exact(value))
        } else {
            Err(MathError::NonFiniteConversion(value))
        }
    }

    pub(crate) fn from_f64_exact(value: f64) -> Self {
        Decimal::from_big_decimal(exact(value))
    }

    /// Widens a double-double without losing either part
    pub fn from_quad(value: &Quad) -> Self {
        if !value.is_finite() {
            return Decimal::from_f64(value.hi());
        }
        Decimal::from_big_decimal(exact(value.hi()) + exact(value.lo()))
    }

    /// Nearest double; magnitudes beyond the double range become infinities
    pub fn to_f64(&self) -> f64 {
        // The float parser rounds correctly from the full digit string
        self.0.to_string().parse::<f64>().unwrap_or_else(|_| {
            if self.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        })
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::zero()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Square root in the tier's context; negative input saturates to zero
    pub fn sqrt(&self) -> Self {
        match self.0.sqrt() {
            Some(root) => Decimal::from_big_decimal(root),
            None => {
                warn!("Square root of negative decimal {}, using zero", self.0);
                Decimal::from_big_decimal(BigDecimal::zero())
            }
        }
    }

    fn saturated(negative: bool) -> Self {
        if negative {
            Decimal(-SATURATION_LIMIT.clone())
        } else {
            Decimal(SATURATION_LIMIT.clone())
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal::from_big_decimal(BigDecimal::zero())
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Decimal::from_f64(value)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::from_big_decimal(BigDecimal::from(value))
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal::from_big_decimal(self.0 + rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal::from_big_decimal(self.0 - rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal::from_big_decimal(self.0 * rhs.0)
    }
}

impl Div for Decimal {
    type Output = Decimal;

    /// Division by zero saturates like the double overflow it mirrors:
    /// `0/0` is zero, anything else the signed saturation limit.
    fn div(self, rhs: Decimal) -> Decimal {
        if rhs.is_zero() {
            warn!("Decimal division of {} by zero", self.0);
            if self.is_zero() {
                return Decimal::default();
            }
            return Decimal::saturated(self.is_negative());
        }
        Decimal::from_big_decimal(self.0 / rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl FromStr for Decimal {
    type Err = MathError;

    fn from_str(literal: &str) -> Result<Self> {
        BigDecimal::from_str(literal.trim())
            .map(Decimal::from_big_decimal)
            .map_err(|e| MathError::Parse(format!("{}: {}", literal, e)))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalized())
    }
}

impl PreciseScalar for Decimal {
    fn zero() -> Self {
        Decimal::default()
    }

    fn one() -> Self {
        Decimal::from(1_i64)
    }

    fn from_f64(value: f64) -> Self {
        Decimal::from_f64(value)
    }

    fn to_f64(&self) -> f64 {
        Decimal::to_f64(self)
    }

    fn sqrt(&self) -> Self {
        Decimal::sqrt(self)
    }

    fn is_zero(&self) -> bool {
        Decimal::is_zero(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(literal: &str) -> Decimal {
        literal.parse().unwrap()
    }

    #[test]
    fn test_decimal_fractions_are_exact() {
        assert_eq!(dec("0.1") + dec("0.2"), dec("0.3"));
        assert_ne!(0.1 + 0.2, 0.3);
    }

    #[test]
    fn test_rounds_to_context() {
        let third = Decimal::from(1_i64) / Decimal::from(3_i64);
        let back = third.clone() * Decimal::from(3_i64);
        assert_ne!(back, Decimal::from(1_i64));
        assert_eq!(back.to_f64(), 1.0);
    }

    #[rstest]
    #[case(0.5)]
    #[case(-1.0e20)]
    #[case(3.0e-300)]
    fn test_double_round_trip(#[case] value: f64) {
        assert_eq!(Decimal::from_f64(value).to_f64(), value);
    }

    #[test]
    fn test_exact_widening() {
        assert_eq!(Decimal::from_f64(0.5), dec("0.5"));
        assert_eq!(Decimal::from_f64(-6.0), dec("-6"));
        // 0.1f64 is not a tenth
        assert_ne!(Decimal::from_f64(0.1), dec("0.1"));
    }

    #[test]
    fn test_non_finite_saturates_or_fails() {
        assert!(Decimal::from_f64(f64::NAN).is_zero());
        assert_eq!(Decimal::from_f64(f64::INFINITY).to_f64(), f64::MAX);
        assert_eq!(Decimal::from_f64(f64::NEG_INFINITY).to_f64(), -f64::MAX);
        assert!(matches!(
            Decimal::try_from_f64(f64::NAN),
            Err(MathError::NonFiniteConversion(_))
        ));
        assert!(Decimal::try_from_f64(2.0).is_ok());
    }

    #[test]
    fn test_division_by_zero_saturates() {
        assert!((Decimal::from(0_i64) / Decimal::from(0_i64)).is_zero());
        assert_eq!((Decimal::from(-2_i64) / Decimal::from(0_i64)).to_f64(), -f64::MAX);
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(Decimal::from(144_i64).sqrt(), Decimal::from(12_i64));
        assert!(Decimal::from(-4_i64).sqrt().is_zero());
    }

    #[test]
    fn test_quad_round_trip() {
        let tenth: Quad = "0.1".parse().unwrap();
        let widened = Decimal::from_quad(&tenth);
        let error = (widened - dec("0.1")).abs();
        assert!(error < dec("1e-30"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!("ten".parse::<Decimal>(), Err(MathError::Parse(_))));
    }
}
