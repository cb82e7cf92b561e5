//! Starmath: multi-precision spatial math for astronomical-scale rendering
//!
//! This crate provides the vector, matrix and geometry kernel of a renderer
//! whose scenes span from meters to galactic distances. Three numeric tiers
//! are available:
//!
//! - the double tier (`Vector2`, `Vector3`, `Vector4`, `Matrix3`, `Matrix4`,
//!   `Plane`, `Ray`, `BoundingBox`, `Frustum`), used for everything the camera
//!   sees once positions have been made camera-relative;
//! - the 128-bit tier (`HighPrecisionVector3`) for absolute world positions;
//! - the decimal tier (`ArbitraryPrecisionVector3`) for reference-frame
//!   origins that must not drift during a session.
//!
//! Conversions between tiers are always explicit method calls.

use thiserror::Error;

pub mod angle;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod interpolation;
pub mod intersector;
pub mod matrix;
pub mod precision;
pub mod quaternion;
pub mod scalar;
pub mod vector;

// Re-export commonly used types
pub use angle::Angle;
pub use config::KernelConfig;
pub use geometry::{BoundingBox, Frustum, Plane, PlaneSide, Ray};
pub use interpolation::Interpolation;
pub use matrix::{Matrix3, Matrix4};
pub use precision::{
    ArbitraryPrecisionVector3, Decimal, HighPrecisionVector3, PreciseScalar, PreciseVector3, Quad,
};
pub use quaternion::Quaternion;
pub use scalar::{Accuracy, AccuracySwitch, Fast, Precise, ScalarOps};
pub use vector::{Vector2, Vector3, Vector4};

/// Main error type for the starmath library
#[derive(Debug, Error)]
pub enum MathError {
    #[error("Singular matrix: determinant is {det}")]
    SingularMatrix { det: f64 },

    #[error("Bounce count must be within 2..=5, got {0}")]
    InvalidBounceCount(usize),

    #[error("Bounce table needs 1..=5 matching entries, got {widths} widths and {heights} heights")]
    MismatchedBounceTable { widths: usize, heights: usize },

    #[error("Cannot convert non-finite value {0} into the decimal tier")]
    NonFiniteConversion(f64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for starmath operations
pub type Result<T> = std::result::Result<T, MathError>;
