//! 128-bit tier scalar
//!
//! A double-double float: an unevaluated sum `hi + lo` of two doubles giving
//! roughly 32 significant decimal digits over the full double exponent range.
//! Backed by `twofloat`.

use crate::precision::{Decimal, PreciseScalar};
use crate::{MathError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;
use twofloat::TwoFloat;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad(TwoFloat);

impl Quad {
    pub fn new(value: f64) -> Self {
        Quad(TwoFloat::from(value))
    }

    /// Rebuilds a value from its two parts; `lo` should be below half an ulp of `hi`
    pub fn from_parts(hi: f64, lo: f64) -> Self {
        Quad(TwoFloat::from(hi) + lo)
    }

    /// Leading double, the value rounded to double precision
    pub fn hi(&self) -> f64 {
        self.0.hi()
    }

    /// Trailing correction term
    pub fn lo(&self) -> f64 {
        self.0.lo()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.hi() + self.0.lo()
    }

    pub fn is_finite(&self) -> bool {
        self.0.hi().is_finite()
    }

    /// Narrows a decimal to the nearest double-double
    ///
    /// Values outside the double range come back as infinities.
    pub fn from_decimal(value: &Decimal) -> Self {
        let hi = value.to_f64();
        if !hi.is_finite() {
            return Quad::new(hi);
        }
        let remainder = value.clone() - Decimal::from_f64_exact(hi);
        Quad::from_parts(hi, remainder.to_f64())
    }

    /// Square root by one Newton step on the double estimate
    ///
    /// Negative input gives NaN.
    pub fn sqrt(&self) -> Quad {
        let hi = self.hi();
        if hi <= 0.0 {
            return if hi == 0.0 {
                Quad::new(0.0)
            } else {
                Quad::new(f64::NAN)
            };
        }
        let estimate = Quad::new(hi.sqrt());
        estimate + (*self - estimate * estimate) / (estimate * Quad::new(2.0))
    }

    pub fn abs(&self) -> Quad {
        if self.hi() < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl Default for Quad {
    fn default() -> Self {
        Quad::new(0.0)
    }
}

impl From<f64> for Quad {
    fn from(value: f64) -> Self {
        Quad::new(value)
    }
}

impl From<Quad> for f64 {
    fn from(value: Quad) -> Self {
        value.to_f64()
    }
}

impl PartialOrd for Quad {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Quad {
    type Output = Quad;

    fn add(self, rhs: Quad) -> Quad {
        Quad(self.0 + rhs.0)
    }
}

impl Sub for Quad {
    type Output = Quad;

    fn sub(self, rhs: Quad) -> Quad {
        Quad(self.0 - rhs.0)
    }
}

impl Mul for Quad {
    type Output = Quad;

    fn mul(self, rhs: Quad) -> Quad {
        Quad(self.0 * rhs.0)
    }
}

impl Div for Quad {
    type Output = Quad;

    fn div(self, rhs: Quad) -> Quad {
        Quad(self.0 / rhs.0)
    }
}

impl Neg for Quad {
    type Output = Quad;

    fn neg(self) -> Quad {
        Quad(-self.0)
    }
}

impl FromStr for Quad {
    type Err = MathError;

    /// Parses a decimal literal at full precision
    fn from_str(literal: &str) -> Result<Self> {
        let decimal: Decimal = literal.parse()?;
        Ok(Quad::from_decimal(&decimal))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            write!(f, "{}", Decimal::from_quad(self))
        } else {
            write!(f, "{}", self.hi())
        }
    }
}

impl PreciseScalar for Quad {
    fn zero() -> Self {
        Quad::new(0.0)
    }

    fn one() -> Self {
        Quad::new(1.0)
    }

    fn from_f64(value: f64) -> Self {
        Quad::new(value)
    }

    fn to_f64(&self) -> f64 {
        Quad::to_f64(self)
    }

    fn sqrt(&self) -> Self {
        Quad::sqrt(self)
    }

    fn is_zero(&self) -> bool {
        self.hi() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_digits_a_double_loses() {
        let big = Quad::new(1.0e20);
        let sum = big + Quad::new(1.5);
        assert_eq!((sum - big).to_f64(), 1.5);
        assert_eq!(1.0e20 + 1.5 - 1.0e20, 0.0);
    }

    #[test]
    fn test_sqrt_newton_step() {
        let root = Quad::new(2.0).sqrt();
        let error = root * root - Quad::new(2.0);
        assert!(error.to_f64().abs() < 1e-30);
        assert_eq!(Quad::new(0.0).sqrt(), Quad::new(0.0));
        assert!(Quad::new(-4.0).sqrt().hi().is_nan());
    }

    #[test]
    fn test_parse_tenth() {
        let tenth: Quad = "0.1".parse().unwrap();
        assert_eq!(tenth.hi(), 0.1);
        // The f64 0.1 is slightly above a tenth
        assert!(tenth.lo() < 0.0);
        let error = tenth * Quad::new(10.0) - Quad::new(1.0);
        assert!(error.to_f64().abs() < 1e-28);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("1.2.3".parse::<Quad>(), Err(MathError::Parse(_))));
    }

    #[test]
    fn test_ordering_and_abs() {
        let a = Quad::new(-3.0);
        let b = Quad::from_parts(-3.0, 1e-20);
        assert!(a < b);
        assert_eq!(a.abs(), Quad::new(3.0));
    }
}
