//! # Angle Module
//!
//! Rotation, projection and spherical-coordinate APIs throughout the kernel take
//! an [`Angle`] instead of offering parallel degree/radian method pairs.
//!
//! ## Storage
//!
//! The `Angle` keeps the value in the unit it was created with:
//! - `Angle::from_degrees(60.0)` stores exactly `60.0` degrees
//! - `Angle::from_radians(PI)` stores exactly `PI` radians
//!
//! Conversion happens only when a consumer asks for the other unit, so a
//! field-of-view given in degrees reaches `tan` after a single multiplication.
//!
//! ## Examples
//!
//! ```rust
//! use starmath::Angle;
//!
//! let fov = Angle::from_degrees(60.0);
//! assert_eq!(fov.to_degrees(), 60.0);
//! assert!((fov.half().to_radians() - std::f64::consts::PI / 6.0).abs() < 1e-15);
//! ```

use crate::constants::{DEG2RAD, PI2, RAD2DEG};
use crate::scalar::ScalarOps;
use std::fmt;

/// Unit an [`Angle`] value is stored in
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AngleFormat {
    /// Angle stored in degrees
    Degrees(f64),
    /// Angle stored in radians
    Radians(f64),
}

/// An angular measurement that remembers its original unit
///
/// Two angles compare equal only when both unit and value match, so
/// `Angle::from_degrees(180.0) != Angle::from_radians(PI)`. Use
/// [`Angle::approx_eq`] to compare across units.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Angle {
    angle: AngleFormat,
}

impl Angle {
    /// A zero angle, stored in radians
    pub const ZERO: Angle = Angle {
        angle: AngleFormat::Radians(0.0),
    };

    /// Creates an angle from a value in degrees
    ///
    /// # Examples
    ///
    /// ```rust
    /// use starmath::Angle;
    ///
    /// let right_angle = Angle::from_degrees(90.0);
    /// assert_eq!(right_angle.to_degrees(), 90.0);
    /// ```
    pub const fn from_degrees(degrees: f64) -> Self {
        Angle {
            angle: AngleFormat::Degrees(degrees),
        }
    }

    /// Creates an angle from a value in radians
    pub const fn from_radians(radians: f64) -> Self {
        Angle {
            angle: AngleFormat::Radians(radians),
        }
    }

    /// Returns the angle in degrees, exact if it was stored in degrees
    pub fn to_degrees(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg,
            AngleFormat::Radians(rad) => rad * RAD2DEG,
        }
    }

    /// Returns the angle in radians, exact if it was stored in radians
    pub fn to_radians(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg * DEG2RAD,
            AngleFormat::Radians(rad) => rad,
        }
    }

    /// Returns the internal storage of this angle
    pub fn format(&self) -> AngleFormat {
        self.angle
    }

    /// True when the stored value is exactly zero, in either unit
    ///
    /// Rotation builders short-circuit to the identity on a zero angle.
    pub fn is_zero(&self) -> bool {
        match self.angle {
            AngleFormat::Degrees(v) | AngleFormat::Radians(v) => v == 0.0,
        }
    }

    /// Half of this angle, in the same unit
    pub fn half(&self) -> Angle {
        self.scaled(0.5)
    }

    /// This angle multiplied by `factor`, in the same unit
    pub fn scaled(&self, factor: f64) -> Angle {
        match self.angle {
            AngleFormat::Degrees(v) => Angle::from_degrees(v * factor),
            AngleFormat::Radians(v) => Angle::from_radians(v * factor),
        }
    }

    /// Wraps the angle into `[0, 360)` degrees or `[0, 2π)` radians
    pub fn normalized(&self) -> Angle {
        match self.angle {
            AngleFormat::Degrees(v) => Angle::from_degrees(v.rem_euclid(360.0)),
            AngleFormat::Radians(v) => Angle::from_radians(v.rem_euclid(PI2)),
        }
    }

    /// Sine of the angle under the given accuracy policy
    pub fn sin(&self, ops: &impl ScalarOps) -> f64 {
        ops.sin(self.to_radians())
    }

    /// Cosine of the angle under the given accuracy policy
    pub fn cos(&self, ops: &impl ScalarOps) -> f64 {
        ops.cos(self.to_radians())
    }

    /// Compares two angles in radians within `epsilon`, regardless of unit
    pub fn approx_eq(&self, other: &Angle, epsilon: f64) -> bool {
        (self.to_radians() - other.to_radians()).abs() <= epsilon
    }
}

impl std::ops::Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        self.scaled(-1.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle {
            AngleFormat::Degrees(v) => write!(f, "{}°", v),
            AngleFormat::Radians(v) => write!(f, "{} rad", v),
        }
    }
}
