//! Infinite plane in Hessian normal form

use crate::vector::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a plane a point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneSide {
    OnPlane,
    Back,
    Front,
}

/// Plane `normal·p + d = 0`
///
/// The normal is expected to be unit length; constructors that compute it
/// normalize, while [`Plane::new`] and [`Plane::set_components`] take the
/// caller's values as they are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3,
    pub d: f64,
}

impl Default for Plane {
    fn default() -> Self {
        Plane::new(Vector3::ZERO, 0.0)
    }
}

impl Plane {
    pub const fn new(normal: Vector3, d: f64) -> Self {
        Plane { normal, d }
    }

    /// Plane with the given normal through `point`
    pub fn from_normal_and_point(normal: &Vector3, point: &Vector3) -> Self {
        let mut plane = Plane::default();
        plane.set_normal_and_point(normal, point);
        plane
    }

    /// Plane through three points, see [`Plane::set`]
    pub fn from_points(point1: &Vector3, point2: &Vector3, point3: &Vector3) -> Self {
        let mut plane = Plane::default();
        plane.set(point1, point2, point3);
        plane
    }

    /// Plane through three points
    ///
    /// The normal is `(p1 - p2) × (p2 - p3)`, normalized, so counter-clockwise
    /// points seen from the front give a normal pointing at the viewer.
    pub fn set(&mut self, point1: &Vector3, point2: &Vector3, point3: &Vector3) -> &mut Self {
        let mut edge = *point2;
        edge.sub(point3);
        self.normal.set_from(point1).sub(point2).crs(&edge).nor();
        self.d = -point1.dot(&self.normal);
        self
    }

    pub fn set_components(&mut self, nx: f64, ny: f64, nz: f64, d: f64) -> &mut Self {
        self.normal.set(nx, ny, nz);
        self.d = d;
        self
    }

    pub fn set_normal_and_point(&mut self, normal: &Vector3, point: &Vector3) -> &mut Self {
        self.normal.set_from(normal);
        self.d = -normal.dot(point);
        self
    }

    pub fn set_from(&mut self, other: &Plane) -> &mut Self {
        *self = *other;
        self
    }

    /// Signed distance of `point`; positive on the front side
    pub fn distance(&self, point: &Vector3) -> f64 {
        self.normal.dot(point) + self.d
    }

    /// Classifies `point`; only an exact zero distance counts as on the plane
    pub fn test_point(&self, point: &Vector3) -> PlaneSide {
        self.test_point_xyz(point.x, point.y, point.z)
    }

    pub fn test_point_xyz(&self, x: f64, y: f64, z: f64) -> PlaneSide {
        let dist = self.normal.dot_xyz(x, y, z) + self.d;
        if dist == 0.0 {
            PlaneSide::OnPlane
        } else if dist < 0.0 {
            PlaneSide::Back
        } else {
            PlaneSide::Front
        }
    }

    /// Whether the front of the plane faces a viewer looking along `direction`
    ///
    /// A direction parallel to the plane counts as front facing.
    pub fn is_front_facing(&self, direction: &Vector3) -> bool {
        self.normal.dot(direction) <= 0.0
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.normal, self.d)
    }
}
