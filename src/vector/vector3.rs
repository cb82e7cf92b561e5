//! # Vector3
//!
//! Three-component double vector, the workhorse of the double tier. Positions
//! handed to the frustum and intersection code are always `Vector3`s relative
//! to the camera, produced from the high-precision tiers via
//! [`PreciseVector3::relative_to`](crate::precision::PreciseVector3::relative_to).
//!
//! ## Conventions
//!
//! - Mutating operations return `&mut Self` for chaining.
//! - Matrix products treat the vector as a column vector with `w = 1`
//!   ([`Vector3::mul_matrix4`]) or `w = 0` ([`Vector3::rot`]).
//! - Degenerate input never fails: normalizing a zero vector leaves it as is.
//!
//! ## Examples
//!
//! ```rust
//! use starmath::Vector3;
//!
//! let mut v = Vector3::new(3.0, 0.0, 4.0);
//! assert_eq!(v.len(), 5.0);
//! v.nor().scl(10.0);
//! assert_eq!(v, Vector3::new(6.0, 0.0, 8.0));
//! ```

use crate::angle::Angle;
use crate::constants::{FLOAT_ROUNDING_ERROR, PI2, RAD2DEG, SLERP_LERP_THRESHOLD, UNIT_MARGIN};
use crate::interpolation::Interpolation;
use crate::matrix::{Matrix3, Matrix4};
use crate::quaternion::Quaternion;
use crate::scalar::{self, Precise, ScalarOps};
use crate::vector::{impl_approx_eq, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Three-dimensional double-precision vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub const fn from_array(values: [f64; 3]) -> Self {
        Vector3::new(values[0], values[1], values[2])
    }

    /// Length of the vector `(x, y, z)`
    pub fn len_of(x: f64, y: f64, z: f64) -> f64 {
        (x * x + y * y + z * z).sqrt()
    }

    /// Squared length of the vector `(x, y, z)`
    pub fn len2_of(x: f64, y: f64, z: f64) -> f64 {
        x * x + y * y + z * z
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn set_from(&mut self, other: &Vector3) -> &mut Self {
        self.set(other.x, other.y, other.z)
    }

    pub fn set_zero(&mut self) -> &mut Self {
        self.set(0.0, 0.0, 0.0)
    }

    /// Sets this vector to the unit vector with the given spherical angles
    ///
    /// `azimuth` is measured from the x-axis in the xy-plane, `polar` from the
    /// z-axis.
    pub fn set_from_spherical(
        &mut self,
        azimuth: Angle,
        polar: Angle,
        ops: &impl ScalarOps,
    ) -> &mut Self {
        let (sin_polar, cos_polar) = (polar.sin(ops), polar.cos(ops));
        let (sin_azim, cos_azim) = (azimuth.sin(ops), azimuth.cos(ops));
        self.set(cos_azim * sin_polar, sin_azim * sin_polar, cos_polar)
    }

    /// Sets this vector to a direction uniformly distributed on the unit sphere
    pub fn set_to_random_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        let u: f64 = rng.gen();
        let v: f64 = rng.gen();
        let theta = Angle::from_radians(PI2 * u);
        let phi = Angle::from_radians((2.0 * v - 1.0).acos());
        self.set_from_spherical(theta, phi, &Precise)
    }

    /// Returns a copy of this vector
    pub fn cpy(&self) -> Vector3 {
        *self
    }

    pub fn add(&mut self, other: &Vector3) -> &mut Self {
        self.add_xyz(other.x, other.y, other.z)
    }

    pub fn add_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(self.x + x, self.y + y, self.z + z)
    }

    /// Adds `value` to every component
    pub fn add_scalar(&mut self, value: f64) -> &mut Self {
        self.add_xyz(value, value, value)
    }

    pub fn sub(&mut self, other: &Vector3) -> &mut Self {
        self.sub_xyz(other.x, other.y, other.z)
    }

    pub fn sub_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(self.x - x, self.y - y, self.z - z)
    }

    pub fn sub_scalar(&mut self, value: f64) -> &mut Self {
        self.sub_xyz(value, value, value)
    }

    pub fn scl(&mut self, scalar: f64) -> &mut Self {
        self.set(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    pub fn scl_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(self.x * x, self.y * y, self.z * z)
    }

    /// Component-wise multiplication, same as [`Vector3::scl_xyz`]
    pub fn mul(&mut self, other: &Vector3) -> &mut Self {
        self.scl_xyz(other.x, other.y, other.z)
    }

    /// Component-wise division
    pub fn div(&mut self, other: &Vector3) -> &mut Self {
        self.set(self.x / other.x, self.y / other.y, self.z / other.z)
    }

    /// `self += other * scalar`
    pub fn mul_add(&mut self, other: &Vector3, scalar: f64) -> &mut Self {
        self.add_xyz(other.x * scalar, other.y * scalar, other.z * scalar)
    }

    /// `self += other * factors`, component-wise
    pub fn mul_add_vec(&mut self, other: &Vector3, factors: &Vector3) -> &mut Self {
        self.add_xyz(other.x * factors.x, other.y * factors.y, other.z * factors.z)
    }

    /// `self += other * scale`; `other` is not modified
    pub fn scale_add(&mut self, scale: f64, other: &Vector3) -> &mut Self {
        self.mul_add(other, scale)
    }

    pub fn len(&self) -> f64 {
        Vector3::len_of(self.x, self.y, self.z)
    }

    pub fn len2(&self) -> f64 {
        Vector3::len2_of(self.x, self.y, self.z)
    }

    pub fn dst(&self, other: &Vector3) -> f64 {
        self.dst2(other).sqrt()
    }

    pub fn dst2(&self, other: &Vector3) -> f64 {
        self.dst2_xyz(other.x, other.y, other.z)
    }

    pub fn dst2_xyz(&self, x: f64, y: f64, z: f64) -> f64 {
        Vector3::len2_of(x - self.x, y - self.y, z - self.z)
    }

    /// Normalizes the vector in place
    ///
    /// A vector of length zero or exactly one is left untouched.
    pub fn nor(&mut self) -> &mut Self {
        let len2 = self.len2();
        if len2 == 0.0 || len2 == 1.0 {
            return self;
        }
        self.scl(1.0 / len2.sqrt())
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.dot_xyz(other.x, other.y, other.z)
    }

    pub fn dot_xyz(&self, x: f64, y: f64, z: f64) -> f64 {
        self.x * x + self.y * y + self.z * z
    }

    /// Sets this vector to `self × other`
    pub fn crs(&mut self, other: &Vector3) -> &mut Self {
        self.crs_xyz(other.x, other.y, other.z)
    }

    pub fn crs_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.set(
            self.y * z - self.z * y,
            self.z * x - self.x * z,
            self.x * y - self.y * x,
        )
    }

    /// Left-multiplies by an affine matrix, treating this as a point (`w = 1`)
    pub fn mul_matrix4(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix4::M00] + y * m[Matrix4::M01] + z * m[Matrix4::M02] + m[Matrix4::M03],
            x * m[Matrix4::M10] + y * m[Matrix4::M11] + z * m[Matrix4::M12] + m[Matrix4::M13],
            x * m[Matrix4::M20] + y * m[Matrix4::M21] + z * m[Matrix4::M22] + m[Matrix4::M23],
        )
    }

    /// Multiplies by the transpose of `matrix`, with `w = 1`
    pub fn tra_mul(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix4::M00] + y * m[Matrix4::M10] + z * m[Matrix4::M20] + m[Matrix4::M30],
            x * m[Matrix4::M01] + y * m[Matrix4::M11] + z * m[Matrix4::M21] + m[Matrix4::M31],
            x * m[Matrix4::M02] + y * m[Matrix4::M12] + z * m[Matrix4::M22] + m[Matrix4::M32],
        )
    }

    pub fn mul_matrix3(&mut self, matrix: &Matrix3) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix3::M00] + y * m[Matrix3::M01] + z * m[Matrix3::M02],
            x * m[Matrix3::M10] + y * m[Matrix3::M11] + z * m[Matrix3::M12],
            x * m[Matrix3::M20] + y * m[Matrix3::M21] + z * m[Matrix3::M22],
        )
    }

    pub fn tra_mul_matrix3(&mut self, matrix: &Matrix3) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix3::M00] + y * m[Matrix3::M10] + z * m[Matrix3::M20],
            x * m[Matrix3::M01] + y * m[Matrix3::M11] + z * m[Matrix3::M21],
            x * m[Matrix3::M02] + y * m[Matrix3::M12] + z * m[Matrix3::M22],
        )
    }

    /// Projective transform: multiplies with `w = 1` and divides by the
    /// resulting `w`. Used to project and unproject through perspective
    /// matrices.
    pub fn prj(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        let w = x * m[Matrix4::M30] + y * m[Matrix4::M31] + z * m[Matrix4::M32] + m[Matrix4::M33];
        let inv_w = 1.0 / w;
        self.set(
            (x * m[Matrix4::M00] + y * m[Matrix4::M01] + z * m[Matrix4::M02] + m[Matrix4::M03])
                * inv_w,
            (x * m[Matrix4::M10] + y * m[Matrix4::M11] + z * m[Matrix4::M12] + m[Matrix4::M13])
                * inv_w,
            (x * m[Matrix4::M20] + y * m[Matrix4::M21] + z * m[Matrix4::M22] + m[Matrix4::M23])
                * inv_w,
        )
    }

    /// Applies only the upper-left 3x3 block (rotation and scale)
    pub fn rot(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix4::M00] + y * m[Matrix4::M01] + z * m[Matrix4::M02],
            x * m[Matrix4::M10] + y * m[Matrix4::M11] + z * m[Matrix4::M12],
            x * m[Matrix4::M20] + y * m[Matrix4::M21] + z * m[Matrix4::M22],
        )
    }

    /// Applies the transpose of the upper-left 3x3 block
    ///
    /// Inverts [`Vector3::rot`] for pure rotations only. With scaling use `rot`
    /// with the inverted matrix.
    pub fn unrotate(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            x * m[Matrix4::M00] + y * m[Matrix4::M10] + z * m[Matrix4::M20],
            x * m[Matrix4::M01] + y * m[Matrix4::M11] + z * m[Matrix4::M21],
            x * m[Matrix4::M02] + y * m[Matrix4::M12] + z * m[Matrix4::M22],
        )
    }

    /// Removes the translation of a rigid transform, then unrotates
    pub fn untransform(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        self.sub_xyz(m[Matrix4::M03], m[Matrix4::M13], m[Matrix4::M23])
            .unrotate(matrix)
    }

    /// Rotates around `axis` by `angle`, counter-clockwise looking down the axis
    pub fn rotate(&mut self, axis: &Vector3, angle: Angle) -> &mut Self {
        let mut rotation = Matrix4::new();
        rotation.set_to_rotation(axis, angle);
        self.mul_matrix4(&rotation)
    }

    pub fn mul_quaternion(&mut self, quaternion: &Quaternion) -> &mut Self {
        quaternion.transform(self);
        self
    }

    /// A translation matrix moving the origin to this point
    pub fn to_translation_matrix(&self) -> Matrix4 {
        let mut matrix = Matrix4::new();
        matrix.set_to_translation(self);
        matrix
    }

    pub fn is_unit(&self) -> bool {
        self.is_unit_within(UNIT_MARGIN)
    }

    pub fn is_unit_within(&self, margin: f64) -> bool {
        (self.len2() - 1.0).abs() < margin
    }

    /// Exactly zero in every component
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Squared length below `margin`
    pub fn is_zero_within(&self, margin: f64) -> bool {
        self.len2() < margin
    }

    /// True when `self` and `other` are parallel, in either direction
    pub fn is_on_line(&self, other: &Vector3) -> bool {
        self.is_on_line_within(other, FLOAT_ROUNDING_ERROR)
    }

    pub fn is_on_line_within(&self, other: &Vector3, epsilon: f64) -> bool {
        Vector3::len2_of(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        ) <= epsilon
    }

    pub fn is_collinear(&self, other: &Vector3) -> bool {
        self.is_on_line(other) && self.has_same_direction(other)
    }

    pub fn is_collinear_within(&self, other: &Vector3, epsilon: f64) -> bool {
        self.is_on_line_within(other, epsilon) && self.has_same_direction(other)
    }

    pub fn is_collinear_opposite(&self, other: &Vector3) -> bool {
        self.is_on_line(other) && self.has_opposite_direction(other)
    }

    pub fn is_collinear_opposite_within(&self, other: &Vector3, epsilon: f64) -> bool {
        self.is_on_line_within(other, epsilon) && self.has_opposite_direction(other)
    }

    pub fn is_perpendicular(&self, other: &Vector3) -> bool {
        scalar::is_zero(self.dot(other))
    }

    pub fn is_perpendicular_within(&self, other: &Vector3, epsilon: f64) -> bool {
        scalar::is_zero_within(self.dot(other), epsilon)
    }

    pub fn has_same_direction(&self, other: &Vector3) -> bool {
        self.dot(other) > 0.0
    }

    pub fn has_opposite_direction(&self, other: &Vector3) -> bool {
        self.dot(other) < 0.0
    }

    pub fn lerp(&mut self, target: &Vector3, alpha: f64) -> &mut Self {
        self.set(
            self.x + alpha * (target.x - self.x),
            self.y + alpha * (target.y - self.y),
            self.z + alpha * (target.z - self.z),
        )
    }

    /// Linear interpolation with `alpha` first shaped by an easing curve
    pub fn interpolate(
        &mut self,
        target: &Vector3,
        alpha: f64,
        interpolation: &Interpolation,
    ) -> &mut Self {
        self.lerp(target, interpolation.apply_range(0.0, 1.0, alpha))
    }

    /// Spherical interpolation between two unit vectors
    ///
    /// Falls back to [`Vector3::lerp`] when the vectors are nearly parallel or
    /// antiparallel (|cos| above 0.9995).
    pub fn slerp(&mut self, target: &Vector3, alpha: f64) -> &mut Self {
        let dot = self.dot(target);
        if dot > SLERP_LERP_THRESHOLD || dot < -SLERP_LERP_THRESHOLD {
            return self.lerp(target, alpha);
        }

        let theta = dot.acos() * alpha;
        let st = theta.sin();
        let tx = target.x - self.x * dot;
        let ty = target.y - self.y * dot;
        let tz = target.z - self.z * dot;
        let l2 = tx * tx + ty * ty + tz * tz;
        let dl = st * if l2 < 0.0001 { 1.0 } else { 1.0 / l2.sqrt() };

        self.scl(theta.cos()).add_xyz(tx * dl, ty * dl, tz * dl).nor()
    }

    /// Caps the length at `limit`
    pub fn limit(&mut self, limit: f64) -> &mut Self {
        self.limit2(limit * limit)
    }

    pub fn limit2(&mut self, limit2: f64) -> &mut Self {
        let len2 = self.len2();
        if len2 > limit2 {
            self.scl((limit2 / len2).sqrt());
        }
        self
    }

    pub fn set_length(&mut self, len: f64) -> &mut Self {
        self.set_length2(len * len)
    }

    /// Rescales to squared length `len2`; a zero vector stays zero
    pub fn set_length2(&mut self, len2: f64) -> &mut Self {
        let old_len2 = self.len2();
        if old_len2 == 0.0 || old_len2 == len2 {
            return self;
        }
        self.scl((len2 / old_len2).sqrt())
    }

    /// Clamps the length into `[min, max]`
    pub fn clamp_length(&mut self, min: f64, max: f64) -> &mut Self {
        let len2 = self.len2();
        if len2 == 0.0 {
            return self;
        }
        if len2 > max * max {
            return self.nor().scl(max);
        }
        if len2 < min * min {
            return self.nor().scl(min);
        }
        self
    }

    /// Angle between the two vectors, in degrees
    pub fn angle(&self, other: &Vector3) -> f64 {
        let cos = scalar::clamp(self.dot(other) / (self.len() * other.len()), -1.0, 1.0);
        RAD2DEG * cos.acos()
    }

    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Component-wise comparison within `epsilon`
    pub fn epsilon_equals(&self, other: &Vector3, epsilon: f64) -> bool {
        (other.x - self.x).abs() <= epsilon
            && (other.y - self.y).abs() <= epsilon
            && (other.z - self.z).abs() <= epsilon
    }

    /// Longitude in `[0, 2π)` and latitude in `[-π/2, π/2]`, in radians
    ///
    /// Z points to the north pole and X to zero longitude.
    pub fn to_spherical(&self) -> Vector2 {
        let xy = (self.x * self.x + self.y * self.y).sqrt();
        if xy <= 0.0 {
            let lat = if self.z > 0.0 {
                0.5 * PI
            } else if self.z < 0.0 {
                -0.5 * PI
            } else {
                0.0
            };
            return Vector2::new(0.0, lat);
        }

        let mut lon = self.y.atan2(self.x);
        if lon < 0.0 {
            lon += PI2;
        }
        Vector2::new(lon, self.z.atan2(xy))
    }

    pub fn latitude(&self) -> f64 {
        self.to_spherical().y
    }

    pub fn longitude(&self) -> f64 {
        self.to_spherical().x
    }

    pub fn values(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Narrows to the single-precision graphics tier
    pub fn to_f32(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    pub fn to_nalgebra(&self) -> nalgebra::Vector3<f64> {
        nalgebra::Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_nalgebra(vector: &nalgebra::Vector3<f64>) -> Self {
        Vector3::new(vector.x, vector.y, vector.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(values: [f64; 3]) -> Self {
        Vector3::from_array(values)
    }
}

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(vector: nalgebra::Vector3<f64>) -> Self {
        Vector3::from_nalgebra(&vector)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(vector: Vector3) -> Self {
        vector.to_nalgebra()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl_approx_eq!(Vector3; x, y, z);
