//! Half-line with an origin and a unit direction

use crate::matrix::Matrix4;
use crate::vector::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            origin: Vector3::ZERO,
            direction: Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

impl Ray {
    /// A ray from `origin` along `direction`, which is normalized
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        let mut ray = Ray::default();
        ray.set(&origin, &direction);
        ray
    }

    pub fn set(&mut self, origin: &Vector3, direction: &Vector3) -> &mut Self {
        self.origin.set_from(origin);
        self.direction.set_from(direction).nor();
        self
    }

    pub fn cpy(&self) -> Ray {
        *self
    }

    /// The point `distance` units along the ray
    pub fn end_point(&self, distance: f64) -> Vector3 {
        let mut end = self.origin;
        end.mul_add(&self.direction, distance);
        end
    }

    /// Transforms origin and direction by `matrix`, renormalizing the direction
    pub fn mul(&mut self, matrix: &Matrix4) -> &mut Self {
        let mut tip = self.origin;
        tip.add(&self.direction).mul_matrix4(matrix);
        self.origin.mul_matrix4(matrix);
        self.direction.set_from(tip.sub(&self.origin)).nor();
        self
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ray [{}:{}]", self.origin, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(ray.direction, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(ray.end_point(4.0), Vector3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_mul_moves_and_turns() {
        let mut transform = Matrix4::new();
        transform
            .set_to_translation(&Vector3::new(1.0, 0.0, 0.0))
            .rotate(&Vector3::Y, Angle::from_degrees(90.0));

        let mut ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        ray.mul(&transform);
        assert_abs_diff_eq!(ray.origin, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(ray.direction, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
