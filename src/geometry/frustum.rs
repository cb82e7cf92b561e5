//! Six-plane view volume used for per-object culling
//!
//! The frustum is rebuilt from the inverse of the combined projection·view
//! matrix: the eight corners of the clip-space cube are projected back into
//! world space and the six planes are spanned from them with every normal
//! pointing into the volume.

use crate::geometry::bounds::BoundingBox;
use crate::geometry::plane::{Plane, PlaneSide};
use crate::matrix::Matrix4;
use crate::vector::Vector3;
use log::trace;
use serde::{Deserialize, Serialize};

/// Clip-space cube corners: the near face counter-clockwise from the
/// bottom left, then the far face in the same order
const CLIP_SPACE_CORNERS: [Vector3; 8] = [
    Vector3::new(-1.0, -1.0, -1.0),
    Vector3::new(1.0, -1.0, -1.0),
    Vector3::new(1.0, 1.0, -1.0),
    Vector3::new(-1.0, 1.0, -1.0),
    Vector3::new(-1.0, -1.0, 1.0),
    Vector3::new(1.0, -1.0, 1.0),
    Vector3::new(1.0, 1.0, 1.0),
    Vector3::new(-1.0, 1.0, 1.0),
];

/// Corner triples spanning near, far, left, right, top and bottom
const PLANE_CORNERS: [[usize; 3]; 6] = [
    [1, 0, 2],
    [4, 5, 7],
    [0, 4, 3],
    [5, 1, 6],
    [2, 3, 6],
    [4, 0, 1],
];

pub const NEAR: usize = 0;
pub const FAR: usize = 1;
pub const LEFT: usize = 2;
pub const RIGHT: usize = 3;
pub const TOP: usize = 4;
pub const BOTTOM: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    planes: [Plane; 6],
    corners: [Vector3; 8],
}

impl Default for Frustum {
    fn default() -> Self {
        Frustum::new()
    }
}

impl Frustum {
    /// A frustum that has not seen a camera yet
    ///
    /// Its planes are all zero, so every query answers "inside" until the
    /// first [`Frustum::update`].
    pub fn new() -> Self {
        Frustum {
            planes: [Plane::default(); 6],
            corners: CLIP_SPACE_CORNERS,
        }
    }

    /// Rebuilds corners and planes from an inverse projection·view matrix
    pub fn update(&mut self, inverse_projection_view: &Matrix4) {
        for (corner, clip) in self.corners.iter_mut().zip(CLIP_SPACE_CORNERS.iter()) {
            corner.set_from(clip).prj(inverse_projection_view);
        }
        for (plane, [a, b, c]) in self.planes.iter_mut().zip(PLANE_CORNERS) {
            plane.set(&self.corners[a], &self.corners[b], &self.corners[c]);
        }
        trace!(
            "Frustum updated: near {} far {}",
            self.planes[NEAR],
            self.planes[FAR]
        );
    }

    /// Planes in the order near, far, left, right, top, bottom
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    /// World-space corners: near face first, then far face
    pub fn corners(&self) -> &[Vector3; 8] {
        &self.corners
    }

    pub fn point_in_frustum(&self, point: &Vector3) -> bool {
        self.point_in_frustum_xyz(point.x, point.y, point.z)
    }

    pub fn point_in_frustum_xyz(&self, x: f64, y: f64, z: f64) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.test_point_xyz(x, y, z) != PlaneSide::Back)
    }

    /// Whether a sphere is at least partly inside
    pub fn sphere_in_frustum(&self, center: &Vector3, radius: f64) -> bool {
        Self::sphere_inside(&self.planes, center, radius)
    }

    pub fn sphere_in_frustum_xyz(&self, x: f64, y: f64, z: f64, radius: f64) -> bool {
        self.sphere_in_frustum(&Vector3::new(x, y, z), radius)
    }

    /// Like [`Frustum::sphere_in_frustum`] with the near and far planes ignored
    pub fn sphere_in_frustum_without_near_far(&self, center: &Vector3, radius: f64) -> bool {
        Self::sphere_inside(&self.planes[LEFT..], center, radius)
    }

    fn sphere_inside(planes: &[Plane], center: &Vector3, radius: f64) -> bool {
        planes
            .iter()
            .all(|plane| plane.normal.dot(center) >= -radius - plane.d)
    }

    /// Conservative box test
    ///
    /// A box is rejected only when all eight corners lie behind one and the
    /// same plane. Boxes straddling the volume's edges may be accepted even
    /// though they are outside.
    pub fn bounds_in_frustum(&self, bounds: &BoundingBox) -> bool {
        let corners = bounds.corners();
        self.corners_in_frustum(&corners)
    }

    /// Box test for a box given by its center and full dimensions
    pub fn bounds_in_frustum_center(&self, center: &Vector3, dimensions: &Vector3) -> bool {
        let (hx, hy, hz) = (dimensions.x / 2.0, dimensions.y / 2.0, dimensions.z / 2.0);
        let mut corners = [Vector3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sx = if i & 4 == 0 { -hx } else { hx };
            let sy = if i & 2 == 0 { -hy } else { hy };
            let sz = if i & 1 == 0 { -hz } else { hz };
            corner.set(center.x + sx, center.y + sy, center.z + sz);
        }
        self.corners_in_frustum(&corners)
    }

    fn corners_in_frustum(&self, corners: &[Vector3; 8]) -> bool {
        !self.planes.iter().any(|plane| {
            corners
                .iter()
                .all(|corner| plane.test_point(corner) == PlaneSide::Back)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use approx::assert_abs_diff_eq;

    fn camera_frustum() -> Frustum {
        let mut projection = Matrix4::new();
        projection.set_to_projection(1.0, 100.0, Angle::from_degrees(60.0), 1.0);
        projection.inv().unwrap();
        let mut frustum = Frustum::new();
        frustum.update(&projection);
        frustum
    }

    #[test]
    fn test_fresh_frustum_accepts_everything() {
        let frustum = Frustum::new();
        assert_eq!(frustum.corners(), &CLIP_SPACE_CORNERS);
        assert!(frustum.point_in_frustum(&Vector3::new(1e9, -1e9, 3.0)));
        assert!(frustum.sphere_in_frustum(&Vector3::new(0.0, 0.0, 1e6), 1.0));
    }

    #[test]
    fn test_plane_normals_point_inwards() {
        let frustum = camera_frustum();
        let inside = Vector3::new(0.0, 0.0, -10.0);
        for plane in frustum.planes() {
            assert_eq!(plane.test_point(&inside), PlaneSide::Front);
        }
        assert_abs_diff_eq!(
            frustum.plane(NEAR).normal,
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            frustum.plane(FAR).normal,
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_world_corners() {
        let frustum = camera_frustum();
        let corners = frustum.corners();
        assert_abs_diff_eq!(corners[0].z, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corners[6].z, -100.0, epsilon = 1e-9);
        // tan(30°) at the far plane
        assert_abs_diff_eq!(corners[6].y, 100.0 / 3.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_sphere_in_front_and_behind() {
        let frustum = camera_frustum();
        assert!(frustum.sphere_in_frustum(&Vector3::new(0.0, 0.0, -10.0), 1.0));
        assert!(!frustum.sphere_in_frustum(&Vector3::new(0.0, 0.0, 10.0), 1.0));
        // Poking through the near plane from behind
        assert!(frustum.sphere_in_frustum(&Vector3::new(0.0, 0.0, -0.5), 1.0));
    }

    #[test]
    fn test_sphere_without_near_far() {
        let frustum = camera_frustum();
        let beyond_far = Vector3::new(0.0, 0.0, -500.0);
        assert!(!frustum.sphere_in_frustum(&beyond_far, 1.0));
        assert!(frustum.sphere_in_frustum_without_near_far(&beyond_far, 1.0));
        assert!(!frustum.sphere_in_frustum_without_near_far(&Vector3::new(500.0, 0.0, -10.0), 1.0));
    }

    #[test]
    fn test_bounds() {
        let frustum = camera_frustum();
        let inside =
            BoundingBox::new(&Vector3::new(-1.0, -1.0, -11.0), &Vector3::new(1.0, 1.0, -9.0));
        let behind =
            BoundingBox::new(&Vector3::new(-1.0, -1.0, 5.0), &Vector3::new(1.0, 1.0, 7.0));
        assert!(frustum.bounds_in_frustum(&inside));
        assert!(!frustum.bounds_in_frustum(&behind));

        let dimensions = Vector3::new(2.0, 2.0, 2.0);
        assert!(frustum.bounds_in_frustum_center(&Vector3::new(0.0, 0.0, -10.0), &dimensions));
        assert!(!frustum.bounds_in_frustum_center(&Vector3::new(0.0, 0.0, 6.0), &dimensions));
    }

    #[test]
    fn test_update_replaces_previous_state() {
        let mut ortho = Matrix4::new();
        ortho.set_to_ortho(-10.0, 10.0, -10.0, 10.0, 0.0, 50.0);
        ortho.inv().unwrap();

        let mut frustum = camera_frustum();
        frustum.update(&ortho);
        let mut fresh = Frustum::new();
        fresh.update(&ortho);
        assert_eq!(frustum, fresh);

        // Outside the perspective cone but inside the box
        assert!(frustum.point_in_frustum(&Vector3::new(9.0, 9.0, -2.0)));
    }
}
