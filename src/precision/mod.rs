//! Extended precision tiers
//!
//! Absolute world coordinates live here. Two scalars are provided:
//!
//! - [`Quad`], a 128-bit double-double, fast enough to update every frame;
//! - [`Decimal`], 34 significant decimal digits, for origins that must not
//!   drift over a session.
//!
//! Both plug into the one generic [`PreciseVector3`].

use crate::Result;
use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

pub mod decimal;
pub mod quad;
pub mod vector;

pub use decimal::Decimal;
pub use quad::Quad;
pub use vector::{ArbitraryPrecisionVector3, HighPrecisionVector3, PreciseVector3};

/// Scalar of an extended precision tier
///
/// Conversions to and from `f64` are explicit methods; there is no `From`
/// bound so generic code cannot narrow by accident.
pub trait PreciseScalar:
    Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + FromStr<Err = crate::MathError>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(value: f64) -> Self;
    fn to_f64(&self) -> f64;
    fn sqrt(&self) -> Self;
    fn is_zero(&self) -> bool;

    fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Parses a decimal literal at the tier's precision
    fn parse_literal(literal: &str) -> Result<Self> {
        literal.parse()
    }
}
