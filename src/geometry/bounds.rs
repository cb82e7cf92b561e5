//! Axis-aligned bounding box
//!
//! The box caches its center and dimensions. Every mutation goes through
//! [`BoundingBox::set`], which recomputes both, so the cached values never
//! lag behind `min`/`max`.

use crate::matrix::Matrix4;
use crate::vector::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min: Vector3,
    max: Vector3,
    center: Vector3,
    dimensions: Vector3,
}

impl Default for BoundingBox {
    /// A degenerate box at the origin, see [`BoundingBox::clr`]
    fn default() -> Self {
        BoundingBox::new(&Vector3::ZERO, &Vector3::ZERO)
    }
}

impl BoundingBox {
    /// Box spanning two opposite corners, in any order
    pub fn new(minimum: &Vector3, maximum: &Vector3) -> Self {
        let mut bounds = BoundingBox {
            min: Vector3::ZERO,
            max: Vector3::ZERO,
            center: Vector3::ZERO,
            dimensions: Vector3::ZERO,
        };
        bounds.set(minimum, maximum);
        bounds
    }

    /// The invalid box that every `ext` starts from
    pub fn empty() -> Self {
        let mut bounds = BoundingBox::default();
        bounds.inf();
        bounds
    }

    /// Smallest box holding all `points`; invalid if `points` is empty
    pub fn from_points(points: &[Vector3]) -> Self {
        let mut bounds = BoundingBox::default();
        bounds.set_points(points);
        bounds
    }

    pub fn min(&self) -> Vector3 {
        self.min
    }

    pub fn max(&self) -> Vector3 {
        self.max
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn dimensions(&self) -> Vector3 {
        self.dimensions
    }

    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    pub fn height(&self) -> f64 {
        self.dimensions.y
    }

    pub fn depth(&self) -> f64 {
        self.dimensions.z
    }

    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    pub fn greatest_dimension(&self) -> f64 {
        self.width().max(self.height()).max(self.depth())
    }

    /// Sets the box from two opposite corners
    ///
    /// The corners may come in any order; `min`/`max` are sorted per axis.
    pub fn set(&mut self, minimum: &Vector3, maximum: &Vector3) -> &mut Self {
        self.min.set(
            minimum.x.min(maximum.x),
            minimum.y.min(maximum.y),
            minimum.z.min(maximum.z),
        );
        self.max.set(
            minimum.x.max(maximum.x),
            minimum.y.max(maximum.y),
            minimum.z.max(maximum.z),
        );
        self.update_derived();
        self
    }

    pub fn set_from(&mut self, other: &BoundingBox) -> &mut Self {
        self.set(&other.min, &other.max)
    }

    pub fn set_points(&mut self, points: &[Vector3]) -> &mut Self {
        self.inf();
        for point in points {
            self.ext_point(point);
        }
        self
    }

    /// Makes the box invalid: `min` is +∞ and `max` is -∞
    ///
    /// Center and dimensions read as zero until the first `ext`.
    pub fn inf(&mut self) -> &mut Self {
        let inf = f64::INFINITY;
        self.min.set(inf, inf, inf);
        self.max.set(-inf, -inf, -inf);
        self.center.set_zero();
        self.dimensions.set_zero();
        self
    }

    /// Collapses the box onto the origin
    pub fn clr(&mut self) -> &mut Self {
        self.set(&Vector3::ZERO, &Vector3::ZERO)
    }

    fn update_derived(&mut self) {
        self.center.set_from(&self.min).add(&self.max).scl(0.5);
        self.dimensions.set_from(&self.max).sub(&self.min);
    }

    /// Grows the box to include `point`
    pub fn ext_point(&mut self, point: &Vector3) -> &mut Self {
        self.ext_xyz(point.x, point.y, point.z)
    }

    pub fn ext_xyz(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        let min = Vector3::new(self.min.x.min(x), self.min.y.min(y), self.min.z.min(z));
        let max = Vector3::new(self.max.x.max(x), self.max.y.max(y), self.max.z.max(z));
        self.set(&min, &max)
    }

    /// Grows the box to include `other`
    pub fn ext_box(&mut self, other: &BoundingBox) -> &mut Self {
        let min = Vector3::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.min.z.min(other.min.z),
        );
        let max = Vector3::new(
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
            self.max.z.max(other.max.z),
        );
        self.set(&min, &max)
    }

    /// Grows the box to include the eight corners of `other` transformed by `transform`
    ///
    /// A never-extended `other` adds nothing.
    pub fn ext_transformed(&mut self, other: &BoundingBox, transform: &Matrix4) -> &mut Self {
        for corner in transformed_corners(other, transform) {
            self.ext_point(&corner);
        }
        self
    }

    /// Transforms the box and refits it axis-aligned around the result
    ///
    /// A never-extended box stays never-extended.
    pub fn mul(&mut self, transform: &Matrix4) -> &mut Self {
        let source = *self;
        self.inf();
        for corner in transformed_corners(&source, transform) {
            self.ext_point(&corner);
        }
        self
    }

    /// Valid once extended: strictly positive size on every axis
    pub fn is_valid(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z
    }

    /// Whether `other` lies inside this box
    ///
    /// An invalid box stands for an undefined extent and contains every box;
    /// an invalid `other` is contained in nothing else.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        if !self.is_valid() {
            return true;
        }
        other.is_valid()
            && self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    /// Whether `point` lies inside or on the surface of the box
    pub fn contains_point(&self, point: &Vector3) -> bool {
        self.contains_xyz(point.x, point.y, point.z)
    }

    pub fn contains_xyz(&self, x: f64, y: f64, z: f64) -> bool {
        self.min.x <= x
            && self.max.x >= x
            && self.min.y <= y
            && self.max.y >= y
            && self.min.z <= z
            && self.max.z >= z
    }

    /// Overlap test on the three axes; touching boxes intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        let overlaps = |c1: f64, c2: f64, d1: f64, d2: f64| (c1 - c2).abs() <= d1 / 2.0 + d2 / 2.0;
        overlaps(
            self.center.x,
            other.center.x,
            self.dimensions.x,
            other.dimensions.x,
        ) && overlaps(
            self.center.y,
            other.center.y,
            self.dimensions.y,
            other.dimensions.y,
        ) && overlaps(
            self.center.z,
            other.center.z,
            self.dimensions.z,
            other.dimensions.z,
        )
    }

    /// The eight corners, indexed by the bits `xyz` (0 = min, 1 = max)
    pub fn corners(&self) -> [Vector3; 8] {
        [
            self.corner000(),
            self.corner001(),
            self.corner010(),
            self.corner011(),
            self.corner100(),
            self.corner101(),
            self.corner110(),
            self.corner111(),
        ]
    }

    pub fn corner000(&self) -> Vector3 {
        Vector3::new(self.min.x, self.min.y, self.min.z)
    }

    pub fn corner001(&self) -> Vector3 {
        Vector3::new(self.min.x, self.min.y, self.max.z)
    }

    pub fn corner010(&self) -> Vector3 {
        Vector3::new(self.min.x, self.max.y, self.min.z)
    }

    pub fn corner011(&self) -> Vector3 {
        Vector3::new(self.min.x, self.max.y, self.max.z)
    }

    pub fn corner100(&self) -> Vector3 {
        Vector3::new(self.max.x, self.min.y, self.min.z)
    }

    pub fn corner101(&self) -> Vector3 {
        Vector3::new(self.max.x, self.min.y, self.max.z)
    }

    pub fn corner110(&self) -> Vector3 {
        Vector3::new(self.max.x, self.max.y, self.min.z)
    }

    pub fn corner111(&self) -> Vector3 {
        Vector3::new(self.max.x, self.max.y, self.max.z)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]", self.min, self.max)
    }
}

/// Transformed corners of `bounds`, without the non-finite ones
///
/// The corners of a never-extended box are infinite and transform into NaN
/// or infinities, which must not leak into a refit.
fn transformed_corners<'a>(
    bounds: &BoundingBox,
    transform: &'a Matrix4,
) -> impl Iterator<Item = Vector3> + 'a {
    bounds.corners().into_iter().filter_map(move |mut corner| {
        corner.mul_matrix4(transform);
        let finite = corner.x.is_finite() && corner.y.is_finite() && corner.z.is_finite();
        finite.then_some(corner)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::Angle;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(&Vector3::new(-1.0, -1.0, -1.0), &Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_set_sorts_corners_and_caches() {
        let bounds = BoundingBox::new(&Vector3::new(2.0, -1.0, 4.0), &Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(bounds.min(), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(bounds.max(), Vector3::new(2.0, 1.0, 4.0));
        assert_eq!(bounds.center(), Vector3::new(1.0, 0.0, 2.0));
        assert_eq!(bounds.dimensions(), Vector3::new(2.0, 2.0, 4.0));
        assert_eq!(bounds.volume(), 16.0);
        assert_eq!(bounds.greatest_dimension(), 4.0);
    }

    #[test]
    fn test_set_is_idempotent() {
        let min = Vector3::new(-3.0, 0.5, 2.0);
        let max = Vector3::new(1.0, 4.5, 7.0);
        let mut bounds = BoundingBox::default();
        bounds.set(&min, &max);
        let first = bounds;
        bounds.set(&min, &max);
        assert_eq!(bounds, first);
    }

    #[test]
    fn test_infinite_box_conventions() {
        let empty = BoundingBox::empty();
        assert!(!empty.is_valid());
        assert!(!empty.contains_point(&Vector3::ZERO));
        assert!(!empty.contains_point(&Vector3::new(1e300, -1e300, 0.0)));
        assert!(empty.contains(&unit_box()));
        assert!(empty.contains(&BoundingBox::empty()));
        assert!(!empty.intersects(&unit_box()));
        assert!(!unit_box().intersects(&empty));
        assert!(!unit_box().contains(&empty));
    }

    #[test]
    fn test_ext_recomputes_derived() {
        let mut bounds = BoundingBox::empty();
        bounds.ext_point(&Vector3::new(1.0, 2.0, 3.0));
        assert!(!bounds.is_valid());
        assert_eq!(bounds.center(), Vector3::new(1.0, 2.0, 3.0));

        bounds.ext_xyz(-1.0, 0.0, 1.0);
        assert!(bounds.is_valid());
        assert_eq!(bounds.center(), Vector3::new(0.0, 1.0, 2.0));
        assert_eq!(bounds.dimensions(), Vector3::new(2.0, 2.0, 2.0));

        bounds.ext_box(&unit_box());
        assert_eq!(bounds.min(), Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_intersects_touching_and_disjoint() {
        let a = unit_box();
        let touching =
            BoundingBox::new(&Vector3::new(1.0, -1.0, -1.0), &Vector3::new(3.0, 1.0, 1.0));
        let apart =
            BoundingBox::new(&Vector3::new(1.5, -1.0, -1.0), &Vector3::new(3.0, 1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_contains() {
        let outer = unit_box();
        let inner = BoundingBox::new(&Vector3::new(-0.5, -0.5, -0.5), &Vector3::new(0.5, 0.5, 0.5));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains_point(&Vector3::new(1.0, 1.0, 1.0)));
        assert!(!outer.contains_point(&Vector3::new(1.0, 1.0, 1.01)));
    }

    #[test]
    fn test_mul_refits_rotated_box() {
        let mut rotation = Matrix4::new();
        rotation.set_to_rotation(&Vector3::Z, Angle::from_degrees(45.0));
        let mut bounds = unit_box();
        bounds.mul(&rotation);
        let half_diagonal = 2.0_f64.sqrt();
        assert_abs_diff_eq!(
            bounds.max(),
            Vector3::new(half_diagonal, half_diagonal, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ext_transformed() {
        let mut translation = Matrix4::new();
        translation.set_to_translation(&Vector3::new(10.0, 0.0, 0.0));
        let mut bounds = unit_box();
        bounds.ext_transformed(&unit_box(), &translation);
        assert_eq!(bounds.min(), Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max(), Vector3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_transforming_empty_box_stays_empty() {
        let mut translation = Matrix4::new();
        translation.set_to_translation(&Vector3::new(1.0, 2.0, 3.0));

        let mut moved = BoundingBox::empty();
        moved.mul(&translation);
        assert!(!moved.is_valid());
        assert!(!moved.contains_point(&Vector3::ZERO));
        assert!(!moved.contains_point(&Vector3::new(1.0, 2.0, 3.0)));

        let mut grown = BoundingBox::empty();
        grown.ext_transformed(&BoundingBox::empty(), &translation);
        assert!(!grown.is_valid());
        assert!(!grown.contains_point(&Vector3::ZERO));

        let mut bounds = unit_box();
        bounds.ext_transformed(&BoundingBox::empty(), &translation);
        assert_eq!(bounds, unit_box());
    }

    #[test]
    fn test_from_points_and_clr() {
        let mut bounds = BoundingBox::from_points(&[
            Vector3::new(1.0, 5.0, -2.0),
            Vector3::new(-3.0, 2.0, 0.0),
        ]);
        assert_eq!(bounds.min(), Vector3::new(-3.0, 2.0, -2.0));
        bounds.clr();
        assert_eq!(bounds.max(), Vector3::ZERO);
        assert!(!bounds.is_valid());
    }
}
