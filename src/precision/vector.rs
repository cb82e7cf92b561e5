//! World-absolute vectors in the 128-bit and decimal tiers
//!
//! [`PreciseVector3`] carries the same in-place algebra as the double tier,
//! evaluated at the precision of its scalar. Nothing converts implicitly:
//! leaving the tier always goes through a named method such as
//! [`PreciseVector3::to_double`] or [`PreciseVector3::relative_to`].
//!
//! Lengths and distances come in two flavours. [`PreciseVector3::len`] and
//! [`PreciseVector3::dst`] stay in the tier, square root included, while
//! [`PreciseVector3::len_f64`] and [`PreciseVector3::dst_f64`] drop to double
//! arithmetic for the squaring and the root.

use crate::matrix::Matrix4;
use crate::precision::{Decimal, PreciseScalar, Quad};
use crate::quaternion::Quaternion;
use crate::vector::Vector3;
use crate::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct PreciseVector3<S> {
    pub x: S,
    pub y: S,
    pub z: S,
}

/// Absolute positions in double-double precision
pub type HighPrecisionVector3 = PreciseVector3<Quad>;

/// Reference-frame origins at 34 decimal digits
pub type ArbitraryPrecisionVector3 = PreciseVector3<Decimal>;

impl<S: PreciseScalar> Default for PreciseVector3<S> {
    fn default() -> Self {
        PreciseVector3::zero()
    }
}

impl<S: PreciseScalar> PreciseVector3<S> {
    pub fn new(x: S, y: S, z: S) -> Self {
        PreciseVector3 { x, y, z }
    }

    pub fn zero() -> Self {
        PreciseVector3::new(S::zero(), S::zero(), S::zero())
    }

    pub fn from_f64s(x: f64, y: f64, z: f64) -> Self {
        PreciseVector3::new(S::from_f64(x), S::from_f64(y), S::from_f64(z))
    }

    /// Widens a double-tier vector
    pub fn from_double(vector: &Vector3) -> Self {
        PreciseVector3::from_f64s(vector.x, vector.y, vector.z)
    }

    /// Parses three decimal literals at the tier's full precision
    pub fn from_strs(x: &str, y: &str, z: &str) -> Result<Self> {
        Ok(PreciseVector3::new(x.parse()?, y.parse()?, z.parse()?))
    }

    pub fn set(&mut self, x: S, y: S, z: S) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    pub fn set_from(&mut self, other: &Self) -> &mut Self {
        self.set(other.x.clone(), other.y.clone(), other.z.clone())
    }

    pub fn set_double(&mut self, vector: &Vector3) -> &mut Self {
        self.set(
            S::from_f64(vector.x),
            S::from_f64(vector.y),
            S::from_f64(vector.z),
        )
    }

    pub fn set_zero(&mut self) -> &mut Self {
        self.set(S::zero(), S::zero(), S::zero())
    }

    pub fn cpy(&self) -> Self {
        self.clone()
    }

    pub fn add(&mut self, other: &Self) -> &mut Self {
        self.x = self.x.clone() + other.x.clone();
        self.y = self.y.clone() + other.y.clone();
        self.z = self.z.clone() + other.z.clone();
        self
    }

    pub fn add_double(&mut self, vector: &Vector3) -> &mut Self {
        self.add_xyz(vector.x, vector.y, vector.z)
    }

    pub fn add_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = self.x.clone() + S::from_f64(x);
        self.y = self.y.clone() + S::from_f64(y);
        self.z = self.z.clone() + S::from_f64(z);
        self
    }

    pub fn sub(&mut self, other: &Self) -> &mut Self {
        self.x = self.x.clone() - other.x.clone();
        self.y = self.y.clone() - other.y.clone();
        self.z = self.z.clone() - other.z.clone();
        self
    }

    pub fn sub_double(&mut self, vector: &Vector3) -> &mut Self {
        self.sub_xyz(vector.x, vector.y, vector.z)
    }

    pub fn sub_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = self.x.clone() - S::from_f64(x);
        self.y = self.y.clone() - S::from_f64(y);
        self.z = self.z.clone() - S::from_f64(z);
        self
    }

    pub fn scl(&mut self, scalar: &S) -> &mut Self {
        self.x = self.x.clone() * scalar.clone();
        self.y = self.y.clone() * scalar.clone();
        self.z = self.z.clone() * scalar.clone();
        self
    }

    pub fn scl_f64(&mut self, scalar: f64) -> &mut Self {
        self.scl(&S::from_f64(scalar))
    }

    /// Component-wise product
    pub fn mul(&mut self, other: &Self) -> &mut Self {
        self.x = self.x.clone() * other.x.clone();
        self.y = self.y.clone() * other.y.clone();
        self.z = self.z.clone() * other.z.clone();
        self
    }

    pub fn div(&mut self, scalar: &S) -> &mut Self {
        self.x = self.x.clone() / scalar.clone();
        self.y = self.y.clone() / scalar.clone();
        self.z = self.z.clone() / scalar.clone();
        self
    }

    pub fn dot(&self, other: &Self) -> S {
        self.x.clone() * other.x.clone()
            + self.y.clone() * other.y.clone()
            + self.z.clone() * other.z.clone()
    }

    /// Dot product with a double vector, narrowed to a double
    pub fn dot_double(&self, vector: &Vector3) -> f64 {
        self.dot(&PreciseVector3::from_double(vector)).to_f64()
    }

    pub fn crs(&mut self, other: &Self) -> &mut Self {
        let x = self.y.clone() * other.z.clone() - self.z.clone() * other.y.clone();
        let y = self.z.clone() * other.x.clone() - self.x.clone() * other.z.clone();
        let z = self.x.clone() * other.y.clone() - self.y.clone() * other.x.clone();
        self.set(x, y, z)
    }

    pub fn len2(&self) -> S {
        self.dot(self)
    }

    pub fn len(&self) -> S {
        self.len2().sqrt()
    }

    /// Length computed in double arithmetic from the narrowed components
    pub fn len_f64(&self) -> f64 {
        Vector3::len_of(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }

    pub fn dst2(&self, other: &Self) -> S {
        let mut delta = other.clone();
        delta.sub(self);
        delta.len2()
    }

    pub fn dst(&self, other: &Self) -> S {
        self.dst2(other).sqrt()
    }

    /// Distance with the difference taken in the tier and the rest in doubles
    ///
    /// Exact enough for anything measured from near the camera, without the
    /// cost of an extended-precision square root.
    pub fn dst_f64(&self, other: &Self) -> f64 {
        let mut delta = other.clone();
        delta.sub(self);
        delta.len_f64()
    }

    /// Distance to a double-tier point, kept in the tier
    pub fn dst_double(&self, vector: &Vector3) -> S {
        self.dst(&PreciseVector3::from_double(vector))
    }

    /// Normalizes in place; zero and unit vectors are left alone
    pub fn nor(&mut self) -> &mut Self {
        let len2 = self.len2();
        let len2_f64 = len2.to_f64();
        if len2_f64 == 0.0 || len2_f64 == 1.0 {
            return self;
        }
        let len = len2.sqrt();
        self.div(&len)
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    pub fn is_unit_within(&self, margin: f64) -> bool {
        (self.len2().to_f64() - 1.0).abs() < margin
    }

    /// Affine transform with `w = 1`, evaluated at the tier's precision
    pub fn mul_matrix4(&mut self, matrix: &Matrix4) -> &mut Self {
        let m = |index: usize| S::from_f64(matrix.val[index]);
        let (x, y, z) = (self.x.clone(), self.y.clone(), self.z.clone());
        let row = |c0: usize, c1: usize, c2: usize, c3: usize| {
            x.clone() * m(c0) + y.clone() * m(c1) + z.clone() * m(c2) + m(c3)
        };
        let nx = row(Matrix4::M00, Matrix4::M01, Matrix4::M02, Matrix4::M03);
        let ny = row(Matrix4::M10, Matrix4::M11, Matrix4::M12, Matrix4::M13);
        let nz = row(Matrix4::M20, Matrix4::M21, Matrix4::M22, Matrix4::M23);
        self.set(nx, ny, nz)
    }

    /// Rotates by a quaternion at the tier's precision
    pub fn mul_quaternion(&mut self, quaternion: &Quaternion) -> &mut Self {
        let axis = PreciseVector3::<S>::from_f64s(quaternion.x, quaternion.y, quaternion.z);
        let w = S::from_f64(quaternion.w);
        // v' = v + w·t + q×t with t = 2·(q×v)
        let mut t = axis.clone();
        t.crs(self).scl_f64(2.0);
        let mut turn = axis;
        turn.crs(&t);
        t.scl(&w);
        self.add(&t).add(&turn)
    }

    /// Narrows to the double tier
    pub fn to_double(&self) -> Vector3 {
        Vector3::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }

    /// Narrows into an existing double vector
    pub fn put<'a>(&self, out: &'a mut Vector3) -> &'a mut Vector3 {
        out.set(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }

    /// Narrows to the single-precision graphics tier
    pub fn to_f32(&self) -> [f32; 3] {
        [self.x.to_f32(), self.y.to_f32(), self.z.to_f32()]
    }

    /// Position relative to `origin` as a double vector
    ///
    /// The difference is taken in the tier before narrowing, so large
    /// absolute coordinates cancel without losing the small offset.
    pub fn relative_to(&self, origin: &Self) -> Vector3 {
        let mut delta = self.clone();
        delta.sub(origin);
        delta.to_double()
    }

    pub fn values(&self) -> [S; 3] {
        [self.x.clone(), self.y.clone(), self.z.clone()]
    }
}

impl HighPrecisionVector3 {
    pub fn from_arbitrary(vector: &ArbitraryPrecisionVector3) -> Self {
        PreciseVector3::new(
            Quad::from_decimal(&vector.x),
            Quad::from_decimal(&vector.y),
            Quad::from_decimal(&vector.z),
        )
    }
}

impl ArbitraryPrecisionVector3 {
    pub fn from_high_precision(vector: &HighPrecisionVector3) -> Self {
        PreciseVector3::new(
            Decimal::from_quad(&vector.x),
            Decimal::from_quad(&vector.y),
            Decimal::from_quad(&vector.z),
        )
    }
}

impl<S: PreciseScalar> fmt::Display for PreciseVector3<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_relative_to_cancels_large_coordinates() {
        let mut object = HighPrecisionVector3::from_f64s(1.0e20, -3.0e19, 0.0);
        object.add_xyz(1.5, 0.25, -10.0);
        let camera = HighPrecisionVector3::from_f64s(1.0e20, -3.0e19, 0.0);
        assert_eq!(object.relative_to(&camera), Vector3::new(1.5, 0.25, -10.0));

        let mut naive = Vector3::new(1.0e20, -3.0e19, 0.0);
        naive.add_xyz(1.5, 0.25, -10.0).sub_xyz(1.0e20, -3.0e19, 0.0);
        assert_ne!(naive, Vector3::new(1.5, 0.25, -10.0));
    }

    #[test]
    fn test_decimal_tier_relative_to() {
        let origin = ArbitraryPrecisionVector3::from_strs("1e25", "0", "0").unwrap();
        let point =
            ArbitraryPrecisionVector3::from_strs("10000000000000000000000001.125", "2", "0")
                .unwrap();
        assert_eq!(point.relative_to(&origin), Vector3::new(1.125, 2.0, 0.0));
    }

    #[test]
    fn test_nor_zero_and_unit_are_noops() {
        let mut zero = HighPrecisionVector3::zero();
        zero.nor();
        assert!(zero.is_zero());

        let mut unit = ArbitraryPrecisionVector3::from_f64s(0.0, 1.0, 0.0);
        unit.nor();
        assert_eq!(unit, ArbitraryPrecisionVector3::from_f64s(0.0, 1.0, 0.0));

        let mut v = HighPrecisionVector3::from_f64s(3.0e18, 0.0, 4.0e18);
        v.nor();
        assert!(v.is_unit_within(1e-15));
        assert_abs_diff_eq!(v.to_double(), Vector3::new(0.6, 0.0, 0.8), epsilon = 1e-15);
    }

    #[test]
    fn test_len_and_dst_flavours() {
        let a = HighPrecisionVector3::from_f64s(1.0e20, 0.0, 0.0);
        let mut b = a.clone();
        b.add_xyz(3.0, 4.0, 0.0);

        assert_eq!(a.dst(&b).to_f64(), 5.0);
        assert_eq!(a.dst_f64(&b), 5.0);
        // Narrowing both absolute points first loses the offset entirely
        assert_eq!(a.to_double().dst(&b.to_double()), 4.0);

        let v = ArbitraryPrecisionVector3::from_f64s(2.0, 3.0, 6.0);
        assert_eq!(v.len(), Decimal::from(7_i64));
        assert_eq!(v.len_f64(), 7.0);
    }

    #[test]
    fn test_crs_and_dot() {
        let mut x = HighPrecisionVector3::from_f64s(1.0, 0.0, 0.0);
        let y = HighPrecisionVector3::from_f64s(0.0, 1.0, 0.0);
        assert!(x.dot(&y).is_zero());
        x.crs(&y);
        assert_eq!(x, HighPrecisionVector3::from_f64s(0.0, 0.0, 1.0));
        assert_eq!(x.dot_double(&Vector3::new(0.0, 0.0, 2.0)), 2.0);
    }

    #[test]
    fn test_matrix_transform_matches_double_tier() {
        let mut transform = Matrix4::new();
        transform
            .set_to_translation(&Vector3::new(10.0, -2.0, 0.5))
            .rotate(&Vector3::Z, Angle::from_degrees(90.0));

        let mut precise = HighPrecisionVector3::from_f64s(1.0, 2.0, 3.0);
        precise.mul_matrix4(&transform);
        let mut double = Vector3::new(1.0, 2.0, 3.0);
        double.mul_matrix4(&transform);
        assert_abs_diff_eq!(precise.to_double(), double, epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_rotation() {
        let rotation = Quaternion::from_axis(&Vector3::Z, Angle::from_degrees(90.0));
        let mut v = ArbitraryPrecisionVector3::from_f64s(1.0, 0.0, 0.0);
        v.mul_quaternion(&rotation);
        assert_abs_diff_eq!(v.to_double(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_tier_conversions() {
        let decimal = ArbitraryPrecisionVector3::from_strs("0.1", "-2.5", "1e20").unwrap();
        let quad = HighPrecisionVector3::from_arbitrary(&decimal);
        assert_eq!(quad.z.to_f64(), 1.0e20);
        let back = ArbitraryPrecisionVector3::from_high_precision(&quad);
        let error = (back.x.clone() - decimal.x.clone()).abs();
        assert!(error < "1e-30".parse().unwrap());
        assert_eq!(back.y, decimal.y);

        let mut out = Vector3::ZERO;
        quad.put(&mut out);
        assert_eq!(out, Vector3::new(0.1, -2.5, 1.0e20));
        assert_eq!(quad.to_f32(), [0.1_f32, -2.5, 1.0e20]);
    }

    #[test]
    fn test_display() {
        let v = ArbitraryPrecisionVector3::from_f64s(1.0, -2.0, 0.5);
        assert_eq!(v.to_string(), "(1, -2, 0.5)");
    }
}
