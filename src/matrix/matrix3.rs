//! 3x3 double matrix, mostly for 2D affine transforms

use crate::angle::Angle;
use crate::constants::RAD2DEG;
use crate::matrix::Matrix4;
use crate::vector::{Vector2, Vector3};
use crate::{MathError, Result};
use approx::{AbsDiffEq, RelativeEq};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

const M00: usize = 0;
const M01: usize = 3;
const M02: usize = 6;
const M10: usize = 1;
const M11: usize = 4;
const M12: usize = 7;
const M20: usize = 2;
const M21: usize = 5;
const M22: usize = 8;

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Column-major 3x3 matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    pub val: [f64; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Matrix3::new()
    }
}

fn mul_values(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut out = [0.0; 9];
    for col in 0..3 {
        for row in 0..3 {
            out[col * 3 + row] =
                a[row] * b[col * 3] + a[3 + row] * b[col * 3 + 1] + a[6 + row] * b[col * 3 + 2];
        }
    }
    out
}

impl Matrix3 {
    pub const M00: usize = M00;
    pub const M01: usize = M01;
    pub const M02: usize = M02;
    pub const M10: usize = M10;
    pub const M11: usize = M11;
    pub const M12: usize = M12;
    pub const M20: usize = M20;
    pub const M21: usize = M21;
    pub const M22: usize = M22;

    /// The identity matrix
    pub const fn new() -> Self {
        Matrix3 { val: IDENTITY }
    }

    pub const fn from_values(val: [f64; 9]) -> Self {
        Matrix3 { val }
    }

    pub fn cpy(&self) -> Matrix3 {
        *self
    }

    pub fn set(&mut self, other: &Matrix3) -> &mut Self {
        self.val = other.val;
        self
    }

    pub fn idt(&mut self) -> &mut Self {
        self.val = IDENTITY;
        self
    }

    /// Upper-left 3x3 of a 4x4 matrix
    pub fn set_from_matrix4(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = &matrix.val;
        self.val = [m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]];
        self
    }

    /// Post-multiplies: `self = self·other`
    pub fn mul(&mut self, other: &Matrix3) -> &mut Self {
        self.val = mul_values(&self.val, &other.val);
        self
    }

    /// Pre-multiplies: `self = other·self`
    pub fn mul_left(&mut self, other: &Matrix3) -> &mut Self {
        self.val = mul_values(&other.val, &self.val);
        self
    }

    /// 2D rotation, counter-clockwise
    pub fn set_to_rotation(&mut self, angle: Angle) -> &mut Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.val = [0.0; 9];
        self.val[M00] = cos;
        self.val[M10] = sin;
        self.val[M01] = -sin;
        self.val[M11] = cos;
        self.val[M22] = 1.0;
        self
    }

    /// 3D rotation around a unit `axis`
    pub fn set_to_rotation_axis(&mut self, axis: &Vector3, angle: Angle) -> &mut Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let oc = 1.0 - cos;
        let (x, y, z) = (axis.x, axis.y, axis.z);
        let v = &mut self.val;
        v[M00] = oc * x * x + cos;
        v[M01] = oc * x * y - z * sin;
        v[M02] = oc * z * x + y * sin;
        v[M10] = oc * x * y + z * sin;
        v[M11] = oc * y * y + cos;
        v[M12] = oc * y * z - x * sin;
        v[M20] = oc * z * x - y * sin;
        v[M21] = oc * y * z + x * sin;
        v[M22] = oc * z * z + cos;
        self
    }

    pub fn set_to_translation(&mut self, x: f64, y: f64) -> &mut Self {
        self.idt();
        self.val[M02] = x;
        self.val[M12] = y;
        self
    }

    pub fn set_to_scaling(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.idt();
        self.val[M00] = sx;
        self.val[M11] = sy;
        self
    }

    pub fn det(&self) -> f64 {
        let v = &self.val;
        v[M00] * v[M11] * v[M22] + v[M01] * v[M12] * v[M20] + v[M02] * v[M10] * v[M21]
            - v[M00] * v[M12] * v[M21]
            - v[M01] * v[M10] * v[M22]
            - v[M02] * v[M11] * v[M20]
    }

    /// Inverts in place; a zero determinant is an error and leaves `self` as is
    pub fn inv(&mut self) -> Result<&mut Self> {
        let det = self.det();
        if det == 0.0 {
            warn!("Refusing to invert a singular 3x3 matrix");
            return Err(MathError::SingularMatrix { det });
        }
        let inv_det = 1.0 / det;
        let v = &self.val;
        let mut out = [0.0; 9];
        out[M00] = v[M11] * v[M22] - v[M21] * v[M12];
        out[M10] = v[M20] * v[M12] - v[M10] * v[M22];
        out[M20] = v[M10] * v[M21] - v[M20] * v[M11];
        out[M01] = v[M21] * v[M02] - v[M01] * v[M22];
        out[M11] = v[M00] * v[M22] - v[M20] * v[M02];
        out[M21] = v[M20] * v[M01] - v[M00] * v[M21];
        out[M02] = v[M01] * v[M12] - v[M11] * v[M02];
        out[M12] = v[M10] * v[M02] - v[M00] * v[M12];
        out[M22] = v[M00] * v[M11] - v[M10] * v[M01];
        for value in out.iter_mut() {
            *value *= inv_det;
        }
        self.val = out;
        Ok(self)
    }

    pub fn transpose(&mut self) -> &mut Self {
        self.val.swap(M01, M10);
        self.val.swap(M02, M20);
        self.val.swap(M12, M21);
        self
    }

    /// Adds to the translation part
    pub fn trn(&mut self, x: f64, y: f64) -> &mut Self {
        self.val[M02] += x;
        self.val[M12] += y;
        self
    }

    /// Post-multiplies by a translation
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        let mut translation = Matrix3::new();
        translation.set_to_translation(x, y);
        self.mul(&translation)
    }

    /// Post-multiplies by a 2D rotation
    pub fn rotate(&mut self, angle: Angle) -> &mut Self {
        if angle.is_zero() {
            return self;
        }
        let mut rotation = Matrix3::new();
        rotation.set_to_rotation(angle);
        self.mul(&rotation)
    }

    /// Post-multiplies by a 2D scaling
    pub fn scale_by(&mut self, sx: f64, sy: f64) -> &mut Self {
        let mut scaling = Matrix3::new();
        scaling.set_to_scaling(sx, sy);
        self.mul(&scaling)
    }

    /// Scales the diagonal's 2D part
    pub fn scl(&mut self, scale: f64) -> &mut Self {
        self.val[M00] *= scale;
        self.val[M11] *= scale;
        self
    }

    pub fn translation(&self) -> Vector2 {
        Vector2::new(self.val[M02], self.val[M12])
    }

    pub fn scale(&self) -> Vector2 {
        let v = &self.val;
        Vector2::new(
            (v[M00] * v[M00] + v[M01] * v[M01]).sqrt(),
            (v[M10] * v[M10] + v[M11] * v[M11]).sqrt(),
        )
    }

    /// 2D rotation angle in degrees
    pub fn rotation(&self) -> f64 {
        self.rotation_rad() * RAD2DEG
    }

    pub fn rotation_rad(&self) -> f64 {
        self.val[M10].atan2(self.val[M00])
    }
}

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.val;
        for row in 0..3 {
            writeln!(f, "[{}|{}|{}]", v[row], v[3 + row], v[6 + row])?;
        }
        Ok(())
    }
}

impl AbsDiffEq for Matrix3 {
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

impl RelativeEq for Matrix3 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn from_rows(rows: [[f64; 3]; 3]) -> Matrix3 {
        let mut val = [0.0; 9];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                val[c * 3 + r] = *value;
            }
        }
        Matrix3::from_values(val)
    }

    #[test]
    fn test_mul_orderings() {
        let a = from_rows([[1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let b = from_rows([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);

        let mut ab = a;
        ab.mul(&b);
        assert_eq!(
            ab,
            from_rows([[2.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
        );

        let mut ba = a;
        ba.mul_left(&b);
        assert_eq!(
            ba,
            from_rows([[0.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 1.0]])
        );
    }

    #[test]
    fn test_inverse() {
        let original = from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 0.0], [0.0, 1.0, 1.0]]);
        assert_eq!(original.det(), 7.0);

        let mut m = original;
        m.inv().unwrap();
        let mut product = original;
        product.mul(&m);
        assert_abs_diff_eq!(product, Matrix3::new(), epsilon = 1e-12);

        m.inv().unwrap();
        assert_relative_eq!(m, original, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_inverse_is_an_error() {
        let mut m = from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        let before = m;
        assert!(matches!(m.inv(), Err(MathError::SingularMatrix { .. })));
        assert_eq!(m, before);
    }

    #[test]
    fn test_affine_2d() {
        let mut m = Matrix3::new();
        m.translate(10.0, 0.0)
            .rotate(Angle::from_degrees(90.0))
            .scale_by(2.0, 2.0);
        assert_eq!(m.translation(), Vector2::new(10.0, 0.0));
        assert_abs_diff_eq!(m.scale(), Vector2::new(2.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(m.rotation(), 90.0, epsilon = 1e-12);

        let mut p = Vector2::new(1.0, 0.0);
        p.mul_matrix3(&m);
        assert_abs_diff_eq!(p, Vector2::new(10.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_rotation_matches_matrix4() {
        let angle = Angle::from_degrees(40.0);
        let mut axis = Vector3::new(1.0, 2.0, 2.0);
        axis.nor();

        let mut m3 = Matrix3::new();
        m3.set_to_rotation_axis(&axis, angle);
        let mut m4 = Matrix4::new();
        m4.set_to_rotation(&axis, angle);
        let mut from4 = Matrix3::new();
        from4.set_from_matrix4(&m4);

        assert_abs_diff_eq!(m3, from4, epsilon = 1e-12);
    }

    #[test]
    fn test_transpose_and_trn() {
        let mut m = from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        m.transpose();
        assert_eq!(
            m,
            from_rows([[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]])
        );

        let mut t = Matrix3::new();
        t.trn(1.0, 2.0).trn(1.0, 2.0);
        assert_eq!(t.translation(), Vector2::new(2.0, 4.0));
    }
}
