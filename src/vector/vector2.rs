//! Two-component double vector
//!
//! Used for screen-space points and for longitude/latitude pairs returned by
//! [`Vector3::to_spherical`](crate::Vector3::to_spherical).

use crate::angle::Angle;
use crate::constants::{FLOAT_ROUNDING_ERROR, PI2, RAD2DEG, UNIT_MARGIN};
use crate::interpolation::Interpolation;
use crate::matrix::Matrix3;
use crate::scalar;
use crate::vector::impl_approx_eq;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const X: Vector2 = Vector2::new(1.0, 0.0);
    pub const Y: Vector2 = Vector2::new(0.0, 1.0);
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn set_from(&mut self, other: &Vector2) -> &mut Self {
        self.set(other.x, other.y)
    }

    pub fn set_zero(&mut self) -> &mut Self {
        self.set(0.0, 0.0)
    }

    pub fn set_to_random_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        let theta = rng.gen_range(0.0..PI2);
        self.set(theta.cos(), theta.sin())
    }

    pub fn cpy(&self) -> Vector2 {
        *self
    }

    pub fn add(&mut self, other: &Vector2) -> &mut Self {
        self.set(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&mut self, other: &Vector2) -> &mut Self {
        self.set(self.x - other.x, self.y - other.y)
    }

    pub fn scl(&mut self, scalar: f64) -> &mut Self {
        self.set(self.x * scalar, self.y * scalar)
    }

    /// Component-wise multiplication
    pub fn mul(&mut self, other: &Vector2) -> &mut Self {
        self.set(self.x * other.x, self.y * other.y)
    }

    pub fn mul_add(&mut self, other: &Vector2, scalar: f64) -> &mut Self {
        self.set(self.x + other.x * scalar, self.y + other.y * scalar)
    }

    pub fn len(&self) -> f64 {
        self.len2().sqrt()
    }

    pub fn len2(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn dst(&self, other: &Vector2) -> f64 {
        self.dst2(other).sqrt()
    }

    pub fn dst2(&self, other: &Vector2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Normalizes in place; zero and unit vectors are left untouched
    pub fn nor(&mut self) -> &mut Self {
        let len2 = self.len2();
        if len2 == 0.0 || len2 == 1.0 {
            return self;
        }
        self.scl(1.0 / len2.sqrt())
    }

    pub fn dot(&self, other: &Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z-component of the 3D cross product
    pub fn crs(&self, other: &Vector2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Transforms by a 2D affine matrix (`w = 1`)
    pub fn mul_matrix3(&mut self, matrix: &Matrix3) -> &mut Self {
        let m = &matrix.val;
        let (x, y) = (self.x, self.y);
        self.set(
            x * m[Matrix3::M00] + y * m[Matrix3::M01] + m[Matrix3::M02],
            x * m[Matrix3::M10] + y * m[Matrix3::M11] + m[Matrix3::M12],
        )
    }

    /// Angle to the x-axis in degrees, in `[0, 360)`
    pub fn angle(&self) -> f64 {
        let angle = self.angle_rad() * RAD2DEG;
        if angle < 0.0 {
            angle + 360.0
        } else {
            angle
        }
    }

    /// Angle to the x-axis in radians, in `(-π, π]`
    pub fn angle_rad(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Keeps the length and points the vector at `angle` from the x-axis
    pub fn set_angle(&mut self, angle: Angle) -> &mut Self {
        let len = self.len();
        self.set(len, 0.0).rotate(angle)
    }

    /// Counter-clockwise rotation, y-axis up
    pub fn rotate(&mut self, angle: Angle) -> &mut Self {
        let radians = angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        let (x, y) = (self.x, self.y);
        self.set(x * cos - y * sin, x * sin + y * cos)
    }

    /// Quarter turn, counter-clockwise for `dir >= 0`
    pub fn rotate90(&mut self, dir: i32) -> &mut Self {
        let (x, y) = (self.x, self.y);
        if dir >= 0 {
            self.set(-y, x)
        } else {
            self.set(y, -x)
        }
    }

    pub fn lerp(&mut self, target: &Vector2, alpha: f64) -> &mut Self {
        let inv = 1.0 - alpha;
        self.set(self.x * inv + target.x * alpha, self.y * inv + target.y * alpha)
    }

    pub fn interpolate(
        &mut self,
        target: &Vector2,
        alpha: f64,
        interpolation: &Interpolation,
    ) -> &mut Self {
        self.lerp(target, interpolation.apply(alpha))
    }

    pub fn limit(&mut self, limit: f64) -> &mut Self {
        let len2 = self.len2();
        if len2 > limit * limit {
            self.scl((limit * limit / len2).sqrt());
        }
        self
    }

    pub fn set_length(&mut self, len: f64) -> &mut Self {
        let old_len2 = self.len2();
        if old_len2 == 0.0 || old_len2 == len * len {
            return self;
        }
        self.scl((len * len / old_len2).sqrt())
    }

    pub fn is_unit(&self) -> bool {
        (self.len2() - 1.0).abs() < UNIT_MARGIN
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_on_line(&self, other: &Vector2) -> bool {
        self.is_on_line_within(other, FLOAT_ROUNDING_ERROR)
    }

    pub fn is_on_line_within(&self, other: &Vector2, epsilon: f64) -> bool {
        scalar::is_zero_within(self.crs(other), epsilon)
    }

    pub fn is_collinear(&self, other: &Vector2) -> bool {
        self.is_on_line(other) && self.dot(other) > 0.0
    }

    pub fn is_collinear_opposite(&self, other: &Vector2) -> bool {
        self.is_on_line(other) && self.dot(other) < 0.0
    }

    pub fn is_perpendicular(&self, other: &Vector2) -> bool {
        scalar::is_zero(self.dot(other))
    }

    pub fn epsilon_equals(&self, other: &Vector2, epsilon: f64) -> bool {
        (other.x - self.x).abs() <= epsilon && (other.y - self.y).abs() <= epsilon
    }

    pub fn values(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl_approx_eq!(Vector2; x, y);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cross_is_scalar() {
        assert_eq!(Vector2::X.crs(&Vector2::Y), 1.0);
        assert_eq!(Vector2::Y.crs(&Vector2::X), -1.0);
    }

    #[test]
    fn test_angles() {
        assert_eq!(Vector2::new(0.0, -1.0).angle(), 270.0);
        assert_eq!(Vector2::new(-1.0, 0.0).angle(), 180.0);

        let mut v = Vector2::new(2.0, 0.0);
        v.set_angle(Angle::from_degrees(90.0));
        assert_abs_diff_eq!(v, Vector2::new(0.0, 2.0), epsilon = 1e-15);

        v.rotate(Angle::from_degrees(-90.0));
        assert_abs_diff_eq!(v, Vector2::new(2.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_rotate90() {
        let mut v = Vector2::new(1.0, 2.0);
        v.rotate90(1);
        assert_eq!(v, Vector2::new(-2.0, 1.0));
        v.rotate90(-1);
        assert_eq!(v, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_affine_transform() {
        let mut matrix = Matrix3::new();
        matrix.set_to_translation(3.0, -1.0);
        let mut v = Vector2::new(1.0, 1.0);
        v.mul_matrix3(&matrix);
        assert_eq!(v, Vector2::new(4.0, 0.0));
    }

    #[test]
    fn test_nor_and_lines() {
        let mut zero = Vector2::ZERO;
        zero.nor();
        assert!(zero.is_zero());

        let mut v = Vector2::new(3.0, 4.0);
        v.nor();
        assert!(v.is_unit());
        assert!(v.is_collinear(&Vector2::new(6.0, 8.0)));
        assert!(v.is_collinear_opposite(&Vector2::new(-6.0, -8.0)));
        assert!(v.is_perpendicular(&Vector2::new(-4.0, 3.0)));
    }

    #[test]
    fn test_length_controls() {
        let mut v = Vector2::new(3.0, 4.0);
        v.limit(1.0);
        assert!((v.len() - 1.0).abs() < 1e-12);
        v.set_length(10.0);
        assert_abs_diff_eq!(v, Vector2::new(6.0, 8.0), epsilon = 1e-12);
        assert_eq!(Vector2::new(1.0, 1.0).dst2(&Vector2::new(4.0, 5.0)), 25.0);
    }
}
