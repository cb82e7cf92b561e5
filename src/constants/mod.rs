//! Constants module for the math kernel

use std::f64::consts::PI;

// Tolerances
/// Rounding error of 32-bit floats, default tolerance of the `is_zero` family
pub const FLOAT_ROUNDING_ERROR: f64 = 0.000_001;
/// Default margin used by `is_unit`
pub const UNIT_MARGIN: f64 = 0.000_000_001;
/// Cosine threshold above which `slerp` degrades to `lerp`
pub const SLERP_LERP_THRESHOLD: f64 = 0.9995;

// Angles
/// Full circle in radians
pub const PI2: f64 = 2.0 * PI;
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;

// Lookup-table trigonometry
/// Bits of resolution of the fast sine table (16384 entries, 128 KiB)
pub const SIN_BITS: u32 = 14;
/// Mask applied to table indices
pub const SIN_MASK: usize = !(usize::MAX << SIN_BITS);
/// Number of entries in the fast sine table
pub const SIN_COUNT: usize = SIN_MASK + 1;
/// Radians to table index conversion factor
pub const RAD_TO_INDEX: f64 = SIN_COUNT as f64 / PI2;

// Precision tiers
/// Significant digits carried by the decimal tier
pub const DECIMAL_DIGITS: u64 = 34;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        assert_eq!(SIN_COUNT, 16384);
        assert_eq!(SIN_MASK, 16383);
        assert_eq!(SIN_COUNT & SIN_MASK, 0);
    }

    #[test]
    fn test_angle_factors() {
        assert!((90.0 * DEG2RAD - PI / 2.0).abs() < 1e-15);
        assert!((PI * RAD2DEG - 180.0).abs() < 1e-12);
    }
}
