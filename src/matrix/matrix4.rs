//! 4x4 double matrix for affine and projective transforms
//!
//! Values are stored column-major in `val`, so `val[Matrix4::M12]` is row 1,
//! column 2. Products follow the post-multiply convention: `a.mul(&b)` leaves
//! `a·b` in `a` and `a.mul_left(&b)` leaves `b·a`.

use crate::angle::Angle;
use crate::quaternion::Quaternion;
use crate::scalar;
use crate::vector::Vector3;
use crate::{MathError, Result};
use approx::{AbsDiffEq, RelativeEq};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

const M00: usize = 0;
const M01: usize = 4;
const M02: usize = 8;
const M03: usize = 12;
const M10: usize = 1;
const M11: usize = 5;
const M12: usize = 9;
const M13: usize = 13;
const M20: usize = 2;
const M21: usize = 6;
const M22: usize = 10;
const M23: usize = 14;
const M30: usize = 3;
const M31: usize = 7;
const M32: usize = 11;
const M33: usize = 15;

const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    pub val: [f64; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Matrix4::new()
    }
}

/// Column-major product `a·b`
fn mul_values(a: &[f64; 16], b: &[f64; 16]) -> [f64; 16] {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = a[row] * b[col * 4]
                + a[4 + row] * b[col * 4 + 1]
                + a[8 + row] * b[col * 4 + 2]
                + a[12 + row] * b[col * 4 + 3];
        }
    }
    out
}

impl Matrix4 {
    pub const M00: usize = M00;
    pub const M01: usize = M01;
    pub const M02: usize = M02;
    pub const M03: usize = M03;
    pub const M10: usize = M10;
    pub const M11: usize = M11;
    pub const M12: usize = M12;
    pub const M13: usize = M13;
    pub const M20: usize = M20;
    pub const M21: usize = M21;
    pub const M22: usize = M22;
    pub const M23: usize = M23;
    pub const M30: usize = M30;
    pub const M31: usize = M31;
    pub const M32: usize = M32;
    pub const M33: usize = M33;

    /// The identity matrix
    pub const fn new() -> Self {
        Matrix4 { val: IDENTITY }
    }

    /// Wraps sixteen column-major values
    pub const fn from_values(val: [f64; 16]) -> Self {
        Matrix4 { val }
    }

    pub fn from_quaternion(rotation: &Quaternion) -> Self {
        let mut matrix = Matrix4::new();
        matrix.set_from_quaternion(rotation);
        matrix
    }

    pub fn cpy(&self) -> Matrix4 {
        *self
    }

    pub fn set(&mut self, other: &Matrix4) -> &mut Self {
        self.val = other.val;
        self
    }

    pub fn set_values(&mut self, val: [f64; 16]) -> &mut Self {
        self.val = val;
        self
    }

    pub fn idt(&mut self) -> &mut Self {
        self.val = IDENTITY;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.val == IDENTITY
    }

    /// Upper-left 3x3 from a rotation/scale matrix, translation cleared
    pub fn set_from_matrix3(&mut self, matrix: &crate::matrix::Matrix3) -> &mut Self {
        let m = &matrix.val;
        self.val = [
            m[0], m[1], m[2], 0.0, m[3], m[4], m[5], 0.0, m[6], m[7], m[8], 0.0, 0.0, 0.0, 0.0,
            1.0,
        ];
        self
    }

    /// Post-multiplies: `self = self·other`
    pub fn mul(&mut self, other: &Matrix4) -> &mut Self {
        self.val = mul_values(&self.val, &other.val);
        self
    }

    /// Pre-multiplies: `self = other·self`
    pub fn mul_left(&mut self, other: &Matrix4) -> &mut Self {
        self.val = mul_values(&other.val, &self.val);
        self
    }

    /// Transposes in place
    pub fn tra(&mut self) -> &mut Self {
        let v = self.val;
        for row in 0..4 {
            for col in 0..4 {
                self.val[col * 4 + row] = v[row * 4 + col];
            }
        }
        self
    }

    pub fn det(&self) -> f64 {
        let v = &self.val;
        v[M30] * v[M21] * v[M12] * v[M03] - v[M20] * v[M31] * v[M12] * v[M03]
            - v[M30] * v[M11] * v[M22] * v[M03]
            + v[M10] * v[M31] * v[M22] * v[M03]
            + v[M20] * v[M11] * v[M32] * v[M03]
            - v[M10] * v[M21] * v[M32] * v[M03]
            - v[M30] * v[M21] * v[M02] * v[M13]
            + v[M20] * v[M31] * v[M02] * v[M13]
            + v[M30] * v[M01] * v[M22] * v[M13]
            - v[M00] * v[M31] * v[M22] * v[M13]
            - v[M20] * v[M01] * v[M32] * v[M13]
            + v[M00] * v[M21] * v[M32] * v[M13]
            + v[M30] * v[M11] * v[M02] * v[M23]
            - v[M10] * v[M31] * v[M02] * v[M23]
            - v[M30] * v[M01] * v[M12] * v[M23]
            + v[M00] * v[M31] * v[M12] * v[M23]
            + v[M10] * v[M01] * v[M32] * v[M23]
            - v[M00] * v[M11] * v[M32] * v[M23]
            - v[M20] * v[M11] * v[M02] * v[M33]
            + v[M10] * v[M21] * v[M02] * v[M33]
            + v[M20] * v[M01] * v[M12] * v[M33]
            - v[M00] * v[M21] * v[M12] * v[M33]
            - v[M10] * v[M01] * v[M22] * v[M33]
            + v[M00] * v[M11] * v[M22] * v[M33]
    }

    /// Determinant of the upper-left 3x3
    pub fn det3x3(&self) -> f64 {
        let v = &self.val;
        v[M00] * v[M11] * v[M22] + v[M01] * v[M12] * v[M20] + v[M02] * v[M10] * v[M21]
            - v[M00] * v[M12] * v[M21]
            - v[M01] * v[M10] * v[M22]
            - v[M02] * v[M11] * v[M20]
    }

    /// Inverts in place
    ///
    /// A determinant of exactly 0.0 is rejected with
    /// [`MathError::SingularMatrix`] and the matrix is left as it was.
    pub fn inv(&mut self) -> Result<&mut Self> {
        let det = self.det();
        if det == 0.0 {
            warn!("Refusing to invert a singular 4x4 matrix");
            return Err(MathError::SingularMatrix { det });
        }
        let v = &self.val;
        let m00 = v[M12] * v[M23] * v[M31] - v[M13] * v[M22] * v[M31] + v[M13] * v[M21] * v[M32]
            - v[M11] * v[M23] * v[M32]
            - v[M12] * v[M21] * v[M33]
            + v[M11] * v[M22] * v[M33];
        let m01 = v[M03] * v[M22] * v[M31] - v[M02] * v[M23] * v[M31] - v[M03] * v[M21] * v[M32]
            + v[M01] * v[M23] * v[M32]
            + v[M02] * v[M21] * v[M33]
            - v[M01] * v[M22] * v[M33];
        let m02 = v[M02] * v[M13] * v[M31] - v[M03] * v[M12] * v[M31] + v[M03] * v[M11] * v[M32]
            - v[M01] * v[M13] * v[M32]
            - v[M02] * v[M11] * v[M33]
            + v[M01] * v[M12] * v[M33];
        let m03 = v[M03] * v[M12] * v[M21] - v[M02] * v[M13] * v[M21] - v[M03] * v[M11] * v[M22]
            + v[M01] * v[M13] * v[M22]
            + v[M02] * v[M11] * v[M23]
            - v[M01] * v[M12] * v[M23];
        let m10 = v[M13] * v[M22] * v[M30] - v[M12] * v[M23] * v[M30] - v[M13] * v[M20] * v[M32]
            + v[M10] * v[M23] * v[M32]
            + v[M12] * v[M20] * v[M33]
            - v[M10] * v[M22] * v[M33];
        let m11 = v[M02] * v[M23] * v[M30] - v[M03] * v[M22] * v[M30] + v[M03] * v[M20] * v[M32]
            - v[M00] * v[M23] * v[M32]
            - v[M02] * v[M20] * v[M33]
            + v[M00] * v[M22] * v[M33];
        let m12 = v[M03] * v[M12] * v[M30] - v[M02] * v[M13] * v[M30] - v[M03] * v[M10] * v[M32]
            + v[M00] * v[M13] * v[M32]
            + v[M02] * v[M10] * v[M33]
            - v[M00] * v[M12] * v[M33];
        let m13 = v[M02] * v[M13] * v[M20] - v[M03] * v[M12] * v[M20] + v[M03] * v[M10] * v[M22]
            - v[M00] * v[M13] * v[M22]
            - v[M02] * v[M10] * v[M23]
            + v[M00] * v[M12] * v[M23];
        let m20 = v[M11] * v[M23] * v[M30] - v[M13] * v[M21] * v[M30] + v[M13] * v[M20] * v[M31]
            - v[M10] * v[M23] * v[M31]
            - v[M11] * v[M20] * v[M33]
            + v[M10] * v[M21] * v[M33];
        let m21 = v[M03] * v[M21] * v[M30] - v[M01] * v[M23] * v[M30] - v[M03] * v[M20] * v[M31]
            + v[M00] * v[M23] * v[M31]
            + v[M01] * v[M20] * v[M33]
            - v[M00] * v[M21] * v[M33];
        let m22 = v[M01] * v[M13] * v[M30] - v[M03] * v[M11] * v[M30] + v[M03] * v[M10] * v[M31]
            - v[M00] * v[M13] * v[M31]
            - v[M01] * v[M10] * v[M33]
            + v[M00] * v[M11] * v[M33];
        let m23 = v[M03] * v[M11] * v[M20] - v[M01] * v[M13] * v[M20] - v[M03] * v[M10] * v[M21]
            + v[M00] * v[M13] * v[M21]
            + v[M01] * v[M10] * v[M23]
            - v[M00] * v[M11] * v[M23];
        let m30 = v[M12] * v[M21] * v[M30] - v[M11] * v[M22] * v[M30] - v[M12] * v[M20] * v[M31]
            + v[M10] * v[M22] * v[M31]
            + v[M11] * v[M20] * v[M32]
            - v[M10] * v[M21] * v[M32];
        let m31 = v[M01] * v[M22] * v[M30] - v[M02] * v[M21] * v[M30] + v[M02] * v[M20] * v[M31]
            - v[M00] * v[M22] * v[M31]
            - v[M01] * v[M20] * v[M32]
            + v[M00] * v[M21] * v[M32];
        let m32 = v[M02] * v[M11] * v[M30] - v[M01] * v[M12] * v[M30] - v[M02] * v[M10] * v[M31]
            + v[M00] * v[M12] * v[M31]
            + v[M01] * v[M10] * v[M32]
            - v[M00] * v[M11] * v[M32];
        let m33 = v[M01] * v[M12] * v[M20] - v[M02] * v[M11] * v[M20] + v[M02] * v[M10] * v[M21]
            - v[M00] * v[M12] * v[M21]
            - v[M01] * v[M10] * v[M22]
            + v[M00] * v[M11] * v[M22];

        let inv_det = 1.0 / det;
        let mut out = [0.0; 16];
        out[M00] = m00;
        out[M01] = m01;
        out[M02] = m02;
        out[M03] = m03;
        out[M10] = m10;
        out[M11] = m11;
        out[M12] = m12;
        out[M13] = m13;
        out[M20] = m20;
        out[M21] = m21;
        out[M22] = m22;
        out[M23] = m23;
        out[M30] = m30;
        out[M31] = m31;
        out[M32] = m32;
        out[M33] = m33;
        for value in out.iter_mut() {
            *value *= inv_det;
        }
        self.val = out;
        Ok(self)
    }

    /// Perspective projection, OpenGL clip conventions
    ///
    /// `fov` is the full vertical field of view, `aspect` is width / height.
    pub fn set_to_projection(&mut self, near: f64, far: f64, fov: Angle, aspect: f64) -> &mut Self {
        let fd = 1.0 / fov.half().to_radians().tan();
        let a1 = (far + near) / (near - far);
        let a2 = 2.0 * far * near / (near - far);
        self.val = [0.0; 16];
        self.val[M00] = fd / aspect;
        self.val[M11] = fd;
        self.val[M22] = a1;
        self.val[M32] = -1.0;
        self.val[M23] = a2;
        self
    }

    /// Orthographic projection onto the box `[left, right]×[bottom, top]×[near, far]`
    pub fn set_to_ortho(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        self.idt();
        self.val[M00] = 2.0 / (right - left);
        self.val[M11] = 2.0 / (top - bottom);
        self.val[M22] = -2.0 / (far - near);
        self.val[M03] = -(right + left) / (right - left);
        self.val[M13] = -(top + bottom) / (top - bottom);
        self.val[M23] = -(far + near) / (far - near);
        self
    }

    /// 2D orthographic projection, depth range `[0, 1]`
    pub fn set_to_ortho_2d(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.set_to_ortho(x, x + width, y, y + height, 0.0, 1.0)
    }

    pub fn set_to_ortho_2d_depth(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        self.set_to_ortho(x, x + width, y, y + height, near, far)
    }

    /// Overwrites only the translation column
    pub fn set_translation(&mut self, translation: &Vector3) -> &mut Self {
        self.val[M03] = translation.x;
        self.val[M13] = translation.y;
        self.val[M23] = translation.z;
        self
    }

    pub fn set_to_translation(&mut self, translation: &Vector3) -> &mut Self {
        self.idt().set_translation(translation)
    }

    pub fn set_to_translation_and_scaling(
        &mut self,
        translation: &Vector3,
        scaling: &Vector3,
    ) -> &mut Self {
        self.idt().set_translation(translation);
        self.val[M00] = scaling.x;
        self.val[M11] = scaling.y;
        self.val[M22] = scaling.z;
        self
    }

    pub fn set_to_scaling(&mut self, scaling: &Vector3) -> &mut Self {
        self.idt();
        self.val[M00] = scaling.x;
        self.val[M11] = scaling.y;
        self.val[M22] = scaling.z;
        self
    }

    /// Rotation around `axis`, counter-clockwise looking down the axis
    pub fn set_to_rotation(&mut self, axis: &Vector3, angle: Angle) -> &mut Self {
        if angle.is_zero() {
            return self.idt();
        }
        self.set_from_quaternion(&Quaternion::from_axis(axis, angle))
    }

    /// The shortest rotation taking direction `from` onto direction `to`
    pub fn set_to_rotation_between(&mut self, from: &Vector3, to: &Vector3) -> &mut Self {
        let mut rotation = Quaternion::IDENTITY;
        rotation.set_from_cross(from, to);
        self.set_from_quaternion(&rotation)
    }

    pub fn set_from_euler_angles(&mut self, yaw: Angle, pitch: Angle, roll: Angle) -> &mut Self {
        let mut rotation = Quaternion::IDENTITY;
        rotation.set_euler_angles(yaw, pitch, roll);
        self.set_from_quaternion(&rotation)
    }

    /// Pure rotation matrix of a (unit) quaternion
    pub fn set_from_quaternion(&mut self, rotation: &Quaternion) -> &mut Self {
        self.compose(&Vector3::ZERO, rotation, &Vector3::new(1.0, 1.0, 1.0))
    }

    /// Translation · rotation · scale, in that order of application reversed
    pub fn compose(
        &mut self,
        translation: &Vector3,
        rotation: &Quaternion,
        scale: &Vector3,
    ) -> &mut Self {
        let (qx, qy, qz, qw) = (rotation.x, rotation.y, rotation.z, rotation.w);
        let (xs, ys, zs) = (qx * 2.0, qy * 2.0, qz * 2.0);
        let (wx, wy, wz) = (qw * xs, qw * ys, qw * zs);
        let (xx, xy, xz) = (qx * xs, qx * ys, qx * zs);
        let (yy, yz, zz) = (qy * ys, qy * zs, qz * zs);

        let v = &mut self.val;
        v[M00] = scale.x * (1.0 - (yy + zz));
        v[M01] = scale.y * (xy - wz);
        v[M02] = scale.z * (xz + wy);
        v[M03] = translation.x;

        v[M10] = scale.x * (xy + wz);
        v[M11] = scale.y * (1.0 - (xx + zz));
        v[M12] = scale.z * (yz - wx);
        v[M13] = translation.y;

        v[M20] = scale.x * (xz - wy);
        v[M21] = scale.y * (yz + wx);
        v[M22] = scale.z * (1.0 - (xx + yy));
        v[M23] = translation.z;

        v[M30] = 0.0;
        v[M31] = 0.0;
        v[M32] = 0.0;
        v[M33] = 1.0;
        self
    }

    /// Rows are the x and y axes and the negated z axis; `position` is the translation
    pub fn set_axes(
        &mut self,
        x_axis: &Vector3,
        y_axis: &Vector3,
        z_axis: &Vector3,
        position: &Vector3,
    ) -> &mut Self {
        let v = &mut self.val;
        v[M00] = x_axis.x;
        v[M01] = x_axis.y;
        v[M02] = x_axis.z;
        v[M10] = y_axis.x;
        v[M11] = y_axis.y;
        v[M12] = y_axis.z;
        v[M20] = -z_axis.x;
        v[M21] = -z_axis.y;
        v[M22] = -z_axis.z;
        v[M03] = position.x;
        v[M13] = position.y;
        v[M23] = position.z;
        v[M30] = 0.0;
        v[M31] = 0.0;
        v[M32] = 0.0;
        v[M33] = 1.0;
        self
    }

    /// View rotation looking along `direction` with the given `up`
    pub fn set_to_look_at(&mut self, direction: &Vector3, up: &Vector3) -> &mut Self {
        let mut z = *direction;
        z.nor();
        let mut x = z;
        x.crs(up).nor();
        let mut y = x;
        y.crs(&z).nor();

        self.idt();
        let v = &mut self.val;
        v[M00] = x.x;
        v[M01] = x.y;
        v[M02] = x.z;
        v[M10] = y.x;
        v[M11] = y.y;
        v[M12] = y.z;
        v[M20] = -z.x;
        v[M21] = -z.y;
        v[M22] = -z.z;
        self
    }

    /// View matrix of a camera at `position` looking at `target`
    pub fn set_to_look_at_target(
        &mut self,
        position: &Vector3,
        target: &Vector3,
        up: &Vector3,
    ) -> &mut Self {
        let mut direction = *target;
        direction.sub(position);
        let mut back = *position;
        back.scl(-1.0);
        let translation = back.to_translation_matrix();
        self.set_to_look_at(&direction, up).mul(&translation)
    }

    /// World transform of an object at `position` facing `forward`
    pub fn set_to_world(
        &mut self,
        position: &Vector3,
        forward: &Vector3,
        up: &Vector3,
    ) -> &mut Self {
        let mut f = *forward;
        f.nor();
        let mut right = f;
        right.crs(up).nor();
        let mut up2 = right;
        up2.crs(&f).nor();
        self.set_axes(&right, &up2, &f, position)
    }

    /// Element-wise linear interpolation towards `other`
    pub fn lerp(&mut self, other: &Matrix4, alpha: f64) -> &mut Self {
        for (value, target) in self.val.iter_mut().zip(other.val.iter()) {
            *value = *value * (1.0 - alpha) + target * alpha;
        }
        self
    }

    /// Scales the diagonal
    pub fn scl(&mut self, scale: &Vector3) -> &mut Self {
        self.val[M00] *= scale.x;
        self.val[M11] *= scale.y;
        self.val[M22] *= scale.z;
        self
    }

    /// Adds to the translation column
    pub fn trn(&mut self, offset: &Vector3) -> &mut Self {
        self.val[M03] += offset.x;
        self.val[M13] += offset.y;
        self.val[M23] += offset.z;
        self
    }

    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.val[M03], self.val[M13], self.val[M23])
    }

    /// Adds the translation column to `position`
    pub fn add_translation_to<'a>(&self, position: &'a mut Vector3) -> &'a mut Vector3 {
        position.add_xyz(self.val[M03], self.val[M13], self.val[M23])
    }

    /// The rotation part as a quaternion
    ///
    /// With `normalize_axes` the rotation is recovered even when the axes
    /// carry a scale.
    pub fn rotation(&self, normalize_axes: bool) -> Quaternion {
        let mut rotation = Quaternion::IDENTITY;
        rotation.set_from_matrix(self, normalize_axes);
        rotation
    }

    pub fn scale_x_squared(&self) -> f64 {
        let v = &self.val;
        v[M00] * v[M00] + v[M01] * v[M01] + v[M02] * v[M02]
    }

    pub fn scale_y_squared(&self) -> f64 {
        let v = &self.val;
        v[M10] * v[M10] + v[M11] * v[M11] + v[M12] * v[M12]
    }

    pub fn scale_z_squared(&self) -> f64 {
        let v = &self.val;
        v[M20] * v[M20] + v[M21] * v[M21] + v[M22] * v[M22]
    }

    pub fn scale_x(&self) -> f64 {
        if scalar::is_zero(self.val[M01]) && scalar::is_zero(self.val[M02]) {
            self.val[M00]
        } else {
            self.scale_x_squared().sqrt()
        }
    }

    pub fn scale_y(&self) -> f64 {
        if scalar::is_zero(self.val[M10]) && scalar::is_zero(self.val[M12]) {
            self.val[M11]
        } else {
            self.scale_y_squared().sqrt()
        }
    }

    pub fn scale_z(&self) -> f64 {
        if scalar::is_zero(self.val[M20]) && scalar::is_zero(self.val[M21]) {
            self.val[M22]
        } else {
            self.scale_z_squared().sqrt()
        }
    }

    pub fn scale(&self) -> Vector3 {
        Vector3::new(self.scale_x(), self.scale_y(), self.scale_z())
    }

    /// Inverse transpose of the rotation/scale part, for transforming normals
    ///
    /// A singular rotation/scale part leaves the matrix untouched.
    pub fn to_normal_matrix(&mut self) -> Result<&mut Self> {
        let mut normal = *self;
        normal.val[M03] = 0.0;
        normal.val[M13] = 0.0;
        normal.val[M23] = 0.0;
        normal.inv()?;
        normal.tra();
        *self = normal;
        Ok(self)
    }

    /// Post-multiplies by a translation
    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        let translation = Vector3::new(x, y, z).to_translation_matrix();
        self.mul(&translation)
    }

    /// Post-multiplies by a rotation around `axis`
    pub fn rotate(&mut self, axis: &Vector3, angle: Angle) -> &mut Self {
        if angle.is_zero() {
            return self;
        }
        let rotation = Matrix4::from_quaternion(&Quaternion::from_axis(axis, angle));
        self.mul(&rotation)
    }

    pub fn rotate_quaternion(&mut self, rotation: &Quaternion) -> &mut Self {
        let rotation = Matrix4::from_quaternion(rotation);
        self.mul(&rotation)
    }

    /// Post-multiplies by a scaling
    pub fn scale_by(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        let mut scaling = Matrix4::new();
        scaling.set_to_scaling(&Vector3::new(x, y, z));
        self.mul(&scaling)
    }

    /// Change of basis whose columns are the given basis vectors
    pub fn change_of_basis(x: &Vector3, y: &Vector3, z: &Vector3) -> Matrix4 {
        let mut matrix = Matrix4::from_values([
            x.x, y.x, z.x, 0.0, x.y, y.y, z.y, 0.0, x.z, y.z, z.z, 0.0, 0.0, 0.0, 0.0, 1.0,
        ]);
        matrix.tra();
        matrix
    }

    /// Projects every `stride`-spaced xyz triple of `points` in place
    ///
    /// `stride` counts doubles between consecutive points and must be at
    /// least 3; a trailing partial point is left untouched.
    pub fn project_points(&self, points: &mut [f64], stride: usize) {
        let stride = stride.max(3);
        let mut offset = 0;
        while offset + 3 <= points.len() {
            let mut point = Vector3::new(points[offset], points[offset + 1], points[offset + 2]);
            point.prj(self);
            points[offset] = point.x;
            points[offset + 1] = point.y;
            points[offset + 2] = point.z;
            offset += stride;
        }
    }

    /// Narrows to single precision for graphics APIs
    pub fn to_f32(&self) -> [f32; 16] {
        self.val.map(|v| v as f32)
    }

    pub fn to_nalgebra(&self) -> nalgebra::Matrix4<f64> {
        nalgebra::Matrix4::from_column_slice(&self.val)
    }

    pub fn from_nalgebra(matrix: &nalgebra::Matrix4<f64>) -> Self {
        let mut val = [0.0; 16];
        val.copy_from_slice(matrix.as_slice());
        Matrix4 { val }
    }
}

impl From<nalgebra::Matrix4<f64>> for Matrix4 {
    fn from(matrix: nalgebra::Matrix4<f64>) -> Self {
        Matrix4::from_nalgebra(&matrix)
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f64> {
    fn from(matrix: Matrix4) -> Self {
        matrix.to_nalgebra()
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.val;
        for row in 0..4 {
            writeln!(
                f,
                "[{}|{}|{}|{}]",
                v[row],
                v[4 + row],
                v[8 + row],
                v[12 + row]
            )?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.val
            .iter()
            .zip(other.val.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix4 {
    fn default_max_relative() -> f64 {
        f64::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.val
            .iter()
            .zip(other.val.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
