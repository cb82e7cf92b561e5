//! Double-precision rotation quaternion
//!
//! Rotations follow the right-hand rule. Euler angles use the yaw (y axis),
//! pitch (x axis), roll (z axis) convention.

use crate::angle::Angle;
use crate::constants::FLOAT_ROUNDING_ERROR;
use crate::matrix::Matrix4;
use crate::scalar;
use crate::vector::{impl_approx_eq, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Tolerance under which `nor` considers the quaternion already normalized
const NORMALIZATION_TOLERANCE: f64 = 0.00001;

/// Above this `|dot|` slerp falls back to linear blending
const SLERP_LINEAR_DOT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Quaternion { x, y, z, w }
    }

    /// Rotation of `angle` around `axis`
    pub fn from_axis(axis: &Vector3, angle: Angle) -> Self {
        let mut q = Quaternion::IDENTITY;
        q.set_from_axis(axis, angle);
        q
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
        self
    }

    pub fn set_from(&mut self, other: &Quaternion) -> &mut Self {
        self.set(other.x, other.y, other.z, other.w)
    }

    pub fn cpy(&self) -> Quaternion {
        *self
    }

    pub fn idt(&mut self) -> &mut Self {
        self.set_from(&Quaternion::IDENTITY)
    }

    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.w == 1.0
    }

    pub fn is_identity_within(&self, tolerance: f64) -> bool {
        scalar::is_zero_within(self.x, tolerance)
            && scalar::is_zero_within(self.y, tolerance)
            && scalar::is_zero_within(self.z, tolerance)
            && scalar::is_equal_within(self.w, 1.0, tolerance)
    }

    pub fn len(&self) -> f64 {
        self.len2().sqrt()
    }

    pub fn len2(&self) -> f64 {
        self.dot(self)
    }

    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Normalizes unless the squared length is zero or already within tolerance of one
    pub fn nor(&mut self) -> &mut Self {
        let len2 = self.len2();
        if len2 != 0.0 && (len2 - 1.0).abs() > NORMALIZATION_TOLERANCE {
            let len = len2.sqrt();
            self.set(self.x / len, self.y / len, self.z / len, self.w / len);
        }
        self
    }

    pub fn conjugate(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    /// Multiplicative inverse; zero quaternions are left as they are
    pub fn inverse(&mut self) -> &mut Self {
        let len2 = self.len2();
        if len2 == 0.0 {
            return self;
        }
        self.conjugate();
        self.mul_scalar(1.0 / len2)
    }

    pub fn mul_scalar(&mut self, scalar: f64) -> &mut Self {
        self.set(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }

    /// `self = self·other`
    pub fn mul(&mut self, other: &Quaternion) -> &mut Self {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.set(
            w * other.x + x * other.w + y * other.z - z * other.y,
            w * other.y + y * other.w + z * other.x - x * other.z,
            w * other.z + z * other.w + x * other.y - y * other.x,
            w * other.w - x * other.x - y * other.y - z * other.z,
        )
    }

    /// `self = other·self`
    pub fn mul_left(&mut self, other: &Quaternion) -> &mut Self {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.set(
            other.w * x + other.x * w + other.y * z - other.z * y,
            other.w * y + other.y * w + other.z * x - other.x * z,
            other.w * z + other.z * w + other.x * y - other.y * x,
            other.w * w - other.x * x - other.y * y - other.z * z,
        )
    }

    /// `self = self·other⁻¹`
    pub fn mul_inverse(&mut self, other: &Quaternion) -> &mut Self {
        let mut inverse = *other;
        inverse.inverse();
        self.mul(&inverse)
    }

    /// Adds `other·scalar` component-wise
    pub fn mul_add(&mut self, other: &Quaternion, scalar: f64) -> &mut Self {
        self.set(
            self.x + other.x * scalar,
            self.y + other.y * scalar,
            self.z + other.z * scalar,
            self.w + other.w * scalar,
        )
    }

    /// Rotates `v` in place: `v' = q·v·q*`
    pub fn transform(&self, v: &mut Vector3) {
        let mut rotated = *self;
        rotated.conjugate();
        rotated
            .mul_left(&Quaternion::new(v.x, v.y, v.z, 0.0))
            .mul_left(self);
        v.set(rotated.x, rotated.y, rotated.z);
    }

    pub fn set_from_axis(&mut self, axis: &Vector3, angle: Angle) -> &mut Self {
        self.set_from_axis_xyz(axis.x, axis.y, axis.z, angle)
    }

    /// The axis does not need to be normalized; a zero axis yields the identity
    pub fn set_from_axis_xyz(&mut self, x: f64, y: f64, z: f64, angle: Angle) -> &mut Self {
        let d = Vector3::len_of(x, y, z);
        if d == 0.0 {
            return self.idt();
        }
        let d = 1.0 / d;
        let (sin, cos) = (angle.to_radians() / 2.0).sin_cos();
        self.set(d * x * sin, d * y * sin, d * z * sin, cos).nor()
    }

    /// Rotation part of a matrix
    ///
    /// `normalize_axes` divides each row by its length first, which removes
    /// any scaling.
    pub fn set_from_matrix(&mut self, matrix: &Matrix4, normalize_axes: bool) -> &mut Self {
        let m = &matrix.val;
        self.set_from_axes(
            normalize_axes,
            [m[Matrix4::M00], m[Matrix4::M01], m[Matrix4::M02]],
            [m[Matrix4::M10], m[Matrix4::M11], m[Matrix4::M12]],
            [m[Matrix4::M20], m[Matrix4::M21], m[Matrix4::M22]],
        )
    }

    /// Sets from the rows of a rotation matrix (Shoemake's trace method)
    pub fn set_from_axes(
        &mut self,
        normalize_axes: bool,
        x_axis: [f64; 3],
        y_axis: [f64; 3],
        z_axis: [f64; 3],
    ) -> &mut Self {
        let normalized = |axis: [f64; 3]| {
            if normalize_axes {
                let inv = 1.0 / Vector3::len_of(axis[0], axis[1], axis[2]);
                axis.map(|c| c * inv)
            } else {
                axis
            }
        };
        let [xx, xy, xz] = normalized(x_axis);
        let [yx, yy, yz] = normalized(y_axis);
        let [zx, zy, zz] = normalized(z_axis);

        let t = xx + yy + zz;
        if t >= 0.0 {
            let s = (t + 1.0).sqrt();
            let w = 0.5 * s;
            let s = 0.5 / s;
            self.set((zy - yz) * s, (xz - zx) * s, (yx - xy) * s, w)
        } else if xx > yy && xx > zz {
            let s = (1.0 + xx - yy - zz).sqrt();
            let x = s * 0.5;
            let s = 0.5 / s;
            self.set(x, (yx + xy) * s, (xz + zx) * s, (zy - yz) * s)
        } else if yy > zz {
            let s = (1.0 + yy - xx - zz).sqrt();
            let y = s * 0.5;
            let s = 0.5 / s;
            self.set((yx + xy) * s, y, (zy + yz) * s, (xz - zx) * s)
        } else {
            let s = (1.0 + zz - xx - yy).sqrt();
            let z = s * 0.5;
            let s = 0.5 / s;
            self.set((xz + zx) * s, (zy + yz) * s, z, (yx - xy) * s)
        }
    }

    /// Rotation taking unit vector `from` onto unit vector `to`
    pub fn set_from_cross(&mut self, from: &Vector3, to: &Vector3) -> &mut Self {
        let dot = scalar::clamp(from.dot(to), -1.0, 1.0);
        let angle = Angle::from_radians(dot.acos());
        let mut axis = *from;
        axis.crs(to);
        self.set_from_axis(&axis, angle)
    }

    pub fn set_euler_angles(&mut self, yaw: Angle, pitch: Angle, roll: Angle) -> &mut Self {
        let (shr, chr) = (roll.to_radians() * 0.5).sin_cos();
        let (shp, chp) = (pitch.to_radians() * 0.5).sin_cos();
        let (shy, chy) = (yaw.to_radians() * 0.5).sin_cos();
        let chy_shp = chy * shp;
        let shy_chp = shy * chp;
        let chy_chp = chy * chp;
        let shy_shp = shy * shp;

        self.set(
            chy_shp * chr + shy_chp * shr,
            shy_chp * chr - chy_shp * shr,
            chy_chp * shr - shy_shp * chr,
            chy_chp * chr + shy_shp * shr,
        )
    }

    /// +1 at the north gimbal pole, -1 at the south pole, 0 otherwise
    pub fn gimbal_pole(&self) -> i32 {
        let t = self.y * self.x + self.z * self.w;
        if t > 0.499 {
            1
        } else if t < -0.499 {
            -1
        } else {
            0
        }
    }

    /// Rotation around z, in `[-180°, 180°]`; requires a unit quaternion
    pub fn roll(&self) -> Angle {
        let pole = self.gimbal_pole();
        let radians = if pole == 0 {
            (2.0 * (self.w * self.z + self.y * self.x))
                .atan2(1.0 - 2.0 * (self.x * self.x + self.z * self.z))
        } else {
            pole as f64 * 2.0 * self.y.atan2(self.w)
        };
        Angle::from_radians(radians)
    }

    /// Rotation around x, in `[-90°, 90°]`; requires a unit quaternion
    pub fn pitch(&self) -> Angle {
        let pole = self.gimbal_pole();
        let radians = if pole == 0 {
            scalar::clamp(2.0 * (self.w * self.x - self.z * self.y), -1.0, 1.0).asin()
        } else {
            pole as f64 * FRAC_PI_2
        };
        Angle::from_radians(radians)
    }

    /// Rotation around y, in `[-180°, 180°]`; requires a unit quaternion
    pub fn yaw(&self) -> Angle {
        if self.gimbal_pole() != 0 {
            return Angle::ZERO;
        }
        Angle::from_radians(
            (2.0 * (self.y * self.w + self.x * self.z))
                .atan2(1.0 - 2.0 * (self.y * self.y + self.x * self.x)),
        )
    }

    /// Column-major rotation matrix values
    pub fn to_matrix(&self) -> [f64; 16] {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        let (xx, xy, xz, xw) = (x * x, x * y, x * z, x * w);
        let (yy, yz, yw) = (y * y, y * z, y * w);
        let (zz, zw) = (z * z, z * w);

        let mut m = [0.0; 16];
        m[Matrix4::M00] = 1.0 - 2.0 * (yy + zz);
        m[Matrix4::M01] = 2.0 * (xy - zw);
        m[Matrix4::M02] = 2.0 * (xz + yw);
        m[Matrix4::M10] = 2.0 * (xy + zw);
        m[Matrix4::M11] = 1.0 - 2.0 * (xx + zz);
        m[Matrix4::M12] = 2.0 * (yz - xw);
        m[Matrix4::M20] = 2.0 * (xz - yw);
        m[Matrix4::M21] = 2.0 * (yz + xw);
        m[Matrix4::M22] = 1.0 - 2.0 * (xx + yy);
        m[Matrix4::M33] = 1.0;
        m
    }

    /// Normalized linear interpolation along the shorter arc
    pub fn nlerp(&mut self, end: &Quaternion, alpha: f64) -> &mut Self {
        let sign = if self.dot(end) < 0.0 { -1.0 } else { 1.0 };
        let inv = 1.0 - alpha;
        self.set(
            inv * self.x + sign * alpha * end.x,
            inv * self.y + sign * alpha * end.y,
            inv * self.z + sign * alpha * end.z,
            inv * self.w + sign * alpha * end.w,
        )
        .nor()
    }

    /// Spherical linear interpolation along the shorter arc
    ///
    /// Nearly parallel quaternions are blended linearly.
    pub fn slerp(&mut self, end: &Quaternion, alpha: f64) -> &mut Self {
        let dot = self.dot(end);
        let abs_dot = dot.abs();

        let (scale0, mut scale1) = if abs_dot < SLERP_LINEAR_DOT {
            let angle = abs_dot.acos();
            let inv_sin = 1.0 / angle.sin();
            (
                ((1.0 - alpha) * angle).sin() * inv_sin,
                (alpha * angle).sin() * inv_sin,
            )
        } else {
            (1.0 - alpha, alpha)
        };
        if dot < 0.0 {
            scale1 = -scale1;
        }

        self.set(
            scale0 * self.x + scale1 * end.x,
            scale0 * self.y + scale1 * end.y,
            scale0 * self.z + scale1 * end.z,
            scale0 * self.w + scale1 * end.w,
        )
    }

    /// Rotation angle in `[0°, 360°]`
    pub fn angle(&self) -> Angle {
        let w = if self.w > 1.0 { self.w / self.len() } else { self.w };
        Angle::from_radians(2.0 * w.acos())
    }

    /// Axis and angle of the rotation
    ///
    /// For (near) identity rotations the axis is the raw vector part and may
    /// have zero length.
    pub fn axis_angle(&self) -> (Vector3, Angle) {
        let mut q = *self;
        if q.w > 1.0 {
            q.nor();
        }
        let angle = Angle::from_radians(2.0 * q.w.acos());
        let s = (1.0 - q.w * q.w).sqrt();
        let axis = if s < NORMALIZATION_TOLERANCE {
            Vector3::new(q.x, q.y, q.z)
        } else {
            Vector3::new(q.x / s, q.y / s, q.z / s)
        };
        (axis, angle)
    }

    pub fn epsilon_equals(&self, other: &Quaternion) -> bool {
        self.values()
            .into_iter()
            .zip(other.values())
            .all(|(a, b)| scalar::is_equal_within(a, b, FLOAT_ROUNDING_ERROR))
    }

    pub fn values(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}|{}|{}]", self.x, self.y, self.z, self.w)
    }
}

impl_approx_eq!(Quaternion; x, y, z, w);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    #[test]
    fn test_transform_follows_right_hand_rule() {
        let q = Quaternion::from_axis(&Vector3::Z, Angle::from_degrees(90.0));
        let mut v = Vector3::X;
        q.transform(&mut v);
        assert_abs_diff_eq!(v, Vector3::Y, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let q = Quaternion::from_axis(&Vector3::ZERO, Angle::from_degrees(45.0));
        assert!(q.is_identity());
    }

    #[test]
    fn test_mul_composes_rotations() {
        let a = Quaternion::from_axis(&Vector3::Z, Angle::from_degrees(90.0));
        let b = Quaternion::from_axis(&Vector3::X, Angle::from_degrees(90.0));

        // a·b applies b first: y goes to z, which the z rotation keeps
        let mut ab = a;
        ab.mul(&b);
        let mut v = Vector3::Y;
        ab.transform(&mut v);
        assert_abs_diff_eq!(v, Vector3::Z, epsilon = 1e-12);

        let mut ba = a;
        ba.mul_left(&b);
        let mut expected = b;
        expected.mul(&a);
        assert_abs_diff_eq!(ba, expected, epsilon = 1e-15);
    }

    #[test]
    fn test_inverse_undoes_rotation() {
        let q = Quaternion::from_axis(&Vector3::new(1.0, 1.0, 0.0), Angle::from_degrees(70.0));
        let mut product = q;
        product.mul_inverse(&q);
        assert!(product.is_identity_within(1e-12));
    }

    #[test]
    fn test_matrix_roundtrip() {
        let q = Quaternion::from_axis(&Vector3::new(0.3, -0.5, 0.8), Angle::from_degrees(123.0));
        let matrix = Matrix4::from_values(q.to_matrix());
        let mut back = Quaternion::IDENTITY;
        back.set_from_matrix(&matrix, false);
        assert_relative_eq!(back.dot(&q).abs(), 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(30.0, 0.0, 0.0)]
    #[case(0.0, 40.0, 0.0)]
    #[case(0.0, 0.0, -60.0)]
    #[case(20.0, 30.0, 40.0)]
    fn test_euler_roundtrip(#[case] yaw: f64, #[case] pitch: f64, #[case] roll: f64) {
        let mut q = Quaternion::IDENTITY;
        q.set_euler_angles(
            Angle::from_degrees(yaw),
            Angle::from_degrees(pitch),
            Angle::from_degrees(roll),
        );
        assert_relative_eq!(q.yaw().to_degrees(), yaw, epsilon = 1e-9);
        assert_relative_eq!(q.pitch().to_degrees(), pitch, epsilon = 1e-9);
        assert_relative_eq!(q.roll().to_degrees(), roll, epsilon = 1e-9);
    }

    #[test]
    fn test_gimbal_pole() {
        let mut q = Quaternion::IDENTITY;
        q.set_euler_angles(Angle::ZERO, Angle::from_degrees(90.0), Angle::ZERO);
        assert_eq!(q.gimbal_pole(), 0);
        q.set_from_axis(&Vector3::Z, Angle::from_degrees(90.0));
        assert_eq!(q.gimbal_pole(), 1);
        assert_relative_eq!(q.pitch().to_degrees(), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_from_cross() {
        let mut q = Quaternion::IDENTITY;
        q.set_from_cross(&Vector3::X, &Vector3::Y);
        let mut v = Vector3::X;
        q.transform(&mut v);
        assert_abs_diff_eq!(v, Vector3::Y, epsilon = 1e-12);
    }

    #[test]
    fn test_slerp_halfway() {
        let start = Quaternion::IDENTITY;
        let end = Quaternion::from_axis(&Vector3::Y, Angle::from_degrees(90.0));
        let mut q = start;
        q.slerp(&end, 0.5);
        assert_relative_eq!(q.angle().to_degrees(), 45.0, epsilon = 1e-9);

        let mut n = start;
        n.nlerp(&end, 0.5);
        assert_relative_eq!(n.angle().to_degrees(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slerp_takes_short_arc() {
        let start = Quaternion::IDENTITY;
        let mut end = Quaternion::from_axis(&Vector3::Y, Angle::from_degrees(90.0));
        end.mul_scalar(-1.0);
        let mut q = start;
        q.slerp(&end, 0.5);
        q.nor();
        let halfway = Quaternion::from_axis(&Vector3::Y, Angle::from_degrees(45.0));
        assert_relative_eq!(q.dot(&halfway).abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_axis_angle() {
        let q = Quaternion::from_axis(&Vector3::new(0.0, 0.0, 2.0), Angle::from_degrees(60.0));
        let (axis, angle) = q.axis_angle();
        assert_abs_diff_eq!(axis, Vector3::Z, epsilon = 1e-12);
        assert_relative_eq!(angle.to_degrees(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nor_tolerance() {
        let mut q = Quaternion::new(0.0, 0.0, 0.0, 1.000001);
        q.nor();
        assert_eq!(q.w, 1.000001);

        let mut q = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        q.nor();
        assert_eq!(q.w, 1.0);

        let mut zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        zero.nor();
        assert_eq!(zero.len2(), 0.0);
    }
}
