//! Four-component double vector, mostly homogeneous coordinates

use crate::constants::{FLOAT_ROUNDING_ERROR, UNIT_MARGIN};
use crate::interpolation::Interpolation;
use crate::scalar;
use crate::vector::{impl_approx_eq, Vector3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const X: Vector4 = Vector4::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Vector4 = Vector4::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Vector4 = Vector4::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Vector4 = Vector4::new(0.0, 0.0, 0.0, 1.0);
    pub const ZERO: Vector4 = Vector4::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Vector4 { x, y, z, w }
    }

    /// Extends a 3D vector with the given `w`
    pub fn from_vector3(v: &Vector3, w: f64) -> Self {
        Vector4::new(v.x, v.y, v.z, w)
    }

    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
        self
    }

    pub fn set_from(&mut self, other: &Vector4) -> &mut Self {
        self.set(other.x, other.y, other.z, other.w)
    }

    /// Sets a direction uniformly distributed on the 3-sphere
    ///
    /// Draws two pairs of normal deviates with the polar Box-Muller method and
    /// normalizes the result.
    pub fn set_to_random_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        let (x, y) = gaussian_pair(rng);
        let (z, w) = gaussian_pair(rng);
        self.set(x, y, z, w).nor()
    }

    pub fn cpy(&self) -> Vector4 {
        *self
    }

    pub fn add(&mut self, other: &Vector4) -> &mut Self {
        self.set(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }

    pub fn sub(&mut self, other: &Vector4) -> &mut Self {
        self.set(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }

    pub fn scl(&mut self, scalar: f64) -> &mut Self {
        self.set(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }

    pub fn mul_add(&mut self, other: &Vector4, scalar: f64) -> &mut Self {
        self.set(
            self.x + other.x * scalar,
            self.y + other.y * scalar,
            self.z + other.z * scalar,
            self.w + other.w * scalar,
        )
    }

    pub fn len(&self) -> f64 {
        self.len2().sqrt()
    }

    pub fn len2(&self) -> f64 {
        self.dot(self)
    }

    pub fn dst(&self, other: &Vector4) -> f64 {
        self.dst2(other).sqrt()
    }

    pub fn dst2(&self, other: &Vector4) -> f64 {
        let mut diff = *other;
        diff.sub(self);
        diff.len2()
    }

    /// Normalizes in place; zero and unit vectors are left untouched
    pub fn nor(&mut self) -> &mut Self {
        let len2 = self.len2();
        if len2 == 0.0 || len2 == 1.0 {
            return self;
        }
        self.scl(1.0 / len2.sqrt())
    }

    pub fn dot(&self, other: &Vector4) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn is_unit(&self) -> bool {
        (self.len2() - 1.0).abs() < UNIT_MARGIN
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0 && self.w == 0.0
    }

    pub fn is_on_line(&self, other: &Vector4) -> bool {
        self.is_on_line_within(other, FLOAT_ROUNDING_ERROR)
    }

    /// Parallel test by component ratios
    ///
    /// Components that are zero in `self` must be zero in `other`; the ratios
    /// of the remaining components must all agree within `epsilon`.
    pub fn is_on_line_within(&self, other: &Vector4, epsilon: f64) -> bool {
        let mut first_ratio: Option<f64> = None;
        for (a, b) in self.values().into_iter().zip(other.values()) {
            if scalar::is_zero_within(a, epsilon) {
                if !scalar::is_zero_within(b, epsilon) {
                    return false;
                }
                continue;
            }
            let ratio = a / b;
            match first_ratio {
                None => first_ratio = Some(ratio),
                Some(first) => {
                    if !scalar::is_equal_within(first, ratio, epsilon) {
                        return false;
                    }
                }
            }
        }
        true
    }

    pub fn is_collinear(&self, other: &Vector4) -> bool {
        self.is_on_line(other) && self.dot(other) > 0.0
    }

    pub fn is_collinear_opposite(&self, other: &Vector4) -> bool {
        self.is_on_line(other) && self.dot(other) < 0.0
    }

    pub fn is_perpendicular(&self, other: &Vector4) -> bool {
        scalar::is_zero(self.dot(other))
    }

    pub fn lerp(&mut self, target: &Vector4, alpha: f64) -> &mut Self {
        self.set(
            self.x + alpha * (target.x - self.x),
            self.y + alpha * (target.y - self.y),
            self.z + alpha * (target.z - self.z),
            self.w + alpha * (target.w - self.w),
        )
    }

    pub fn interpolate(
        &mut self,
        target: &Vector4,
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

    pub fn epsilon_equals(&self, other: &Vector4, epsilon: f64) -> bool {
        self.values()
            .into_iter()
            .zip(other.values())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// The `xyz` part, without perspective division
    pub fn xyz(&self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn values(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

fn gaussian_pair<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    loop {
        let v1 = (rng.gen::<f64>() - 0.5) * 2.0;
        let v2 = (rng.gen::<f64>() - 0.5) * 2.0;
        let s = v1 * v1 + v2 * v2;
        if s < 1.0 && s != 0.0 {
            let multiplier = (-2.0 * s.ln() / s).sqrt();
            return (v1 * multiplier, v2 * multiplier);
        }
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl_approx_eq!(Vector4; x, y, z, w);

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_basic_algebra() {
        let mut v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        v.add(&Vector4::W).scl(2.0);
        assert_eq!(v, Vector4::new(2.0, 4.0, 6.0, 10.0));
        assert_eq!(v.dot(&Vector4::X), 2.0);
        assert_eq!(Vector4::ZERO.dst(&Vector4::new(1.0, 1.0, 1.0, 1.0)), 2.0);
    }

    #[test]
    fn test_is_on_line_by_ratios() {
        let v = Vector4::new(1.0, 0.0, 2.0, -1.0);
        assert!(v.is_on_line(&Vector4::new(2.0, 0.0, 4.0, -2.0)));
        assert!(v.is_collinear_opposite(&Vector4::new(-3.0, 0.0, -6.0, 3.0)));
        assert!(!v.is_on_line(&Vector4::new(2.0, 1.0, 4.0, -2.0)));
        assert!(!v.is_on_line(&Vector4::new(2.0, 0.0, 5.0, -2.0)));
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut v = Vector4::ZERO;
        for _ in 0..50 {
            v.set_to_random_direction(&mut rng);
            assert!((v.len() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_nor_zero_is_noop() {
        let mut v = Vector4::ZERO;
        v.nor();
        assert!(v.is_zero());
    }

    #[test]
    fn test_xyz() {
        let v = Vector4::from_vector3(&Vector3::new(1.0, 2.0, 3.0), 1.0);
        assert_eq!(v.xyz(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v.w, 1.0);
    }
}
