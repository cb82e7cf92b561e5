//! Intersection and distance queries on double-tier primitives
//!
//! Everything here is a free function working on stack temporaries, so the
//! queries can run from any number of threads at once. Degenerate inputs
//! (parallel lines, empty root sets) are answered with `false`, `None` or an
//! empty result rather than an error.

use crate::geometry::{BoundingBox, Plane, PlaneSide, Ray};
use crate::vector::Vector3;
use smallvec::SmallVec;

/// Up to two intersection points, stored inline
pub type Intersections = SmallVec<[Vector3; 2]>;

/// Quadratic coefficients of `|p + t·v - c|² = r²`
fn sphere_quadratic(p: &Vector3, v: &Vector3, c: &Vector3, radius: f64) -> (f64, f64, f64) {
    let a = v.x * v.x + v.y * v.y + v.z * v.z;
    let b = 2.0 * (p.x * v.x + p.y * v.y + p.z * v.z - v.x * c.x - v.y * c.y - v.z * c.z);
    let c = p.x * p.x - 2.0 * p.x * c.x + c.x * c.x + p.y * p.y - 2.0 * p.y * c.y
        + c.y * c.y
        + p.z * p.z
        - 2.0 * p.z * c.z
        + c.z * c.z
        - radius * radius;
    (a, b, c)
}

/// Whether the line through `origin` along `direction` touches the sphere
///
/// Only the discriminant is evaluated; hits behind the origin count.
pub fn check_intersect_ray_sphere(
    origin: &Vector3,
    direction: &Vector3,
    center: &Vector3,
    radius: f64,
) -> bool {
    let (a, b, c) = sphere_quadratic(origin, direction, center, radius);
    b * b - 4.0 * a * c >= 0.0
}

/// Intersections of the line through `p0` and `p1` with a sphere
///
/// Points are parameterized as `p0·(1 - t) + p1·t`. With two roots, the one
/// whose `t` is closer to the segment midpoint `0.5` comes first. A tangent
/// line yields one point and a miss yields none.
pub fn intersect_ray_sphere(
    p0: &Vector3,
    p1: &Vector3,
    center: &Vector3,
    radius: f64,
) -> Intersections {
    let mut result = Intersections::new();
    let mut v = *p1;
    v.sub(p0);
    let (a, b, c) = sphere_quadratic(p0, &v, center, radius);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return result;
    }

    let point_at = |t: f64| {
        Vector3::new(
            p0.x * (1.0 - t) + t * p1.x,
            p0.y * (1.0 - t) + t * p1.y,
            p0.z * (1.0 - t) + t * p1.z,
        )
    };

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    if discriminant == 0.0 {
        result.push(point_at(t1));
        return result;
    }
    let t2 = (-b + sqrt_d) / (2.0 * a);
    if (t1 - 0.5).abs() < (t2 - 0.5).abs() {
        result.push(point_at(t1));
        result.push(point_at(t2));
    } else {
        result.push(point_at(t2));
        result.push(point_at(t1));
    }
    result
}

/// Whether the segment from `p0` to `p1` crosses the sphere's surface
pub fn check_intersect_segment_sphere(
    p0: &Vector3,
    p1: &Vector3,
    center: &Vector3,
    radius: f64,
) -> bool {
    intersect_ray_sphere(p0, p1, center, radius)
        .iter()
        .any(|point| is_between(p0, p1, point))
}

/// Whether `c` lies on the segment `ab`, to a relative precision of 1e-6
fn is_between(a: &Vector3, b: &Vector3, c: &Vector3) -> bool {
    let ab = a.dst(b);
    let epsilon = ab * 1e-6 / 2.0;
    let value = a.dst(c) + c.dst(b) - ab;
    -epsilon < value && value < epsilon
}

/// Slab test of a ray against a box given by center and dimensions
///
/// Cheaper than [`intersect_ray_bounds`] and does not report the hit point. A ray
/// parallel to a slab whose origin lies exactly on one of its faces misses.
pub fn intersect_ray_bounds_fast(ray: &Ray, center: &Vector3, dimensions: &Vector3) -> bool {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    let origin = ray.origin.values();
    let direction = ray.direction.values();
    let center = center.values();
    let dimensions = dimensions.values();
    for axis in 0..3 {
        let inv = 1.0 / direction[axis];
        let mut near = (center[axis] - dimensions[axis] * 0.5 - origin[axis]) * inv;
        let mut far = (center[axis] + dimensions[axis] * 0.5 - origin[axis]) * inv;
        // 0·∞ when a parallel ray starts on a slab face: counts as a miss
        if near.is_nan() || far.is_nan() {
            return false;
        }
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t_min = t_min.max(near);
        t_max = t_max.min(far);
    }
    t_max >= 0.0 && t_max >= t_min
}

/// First point where `ray` enters `bounds`
///
/// A ray starting inside the box hits at its own origin.
pub fn intersect_ray_bounds(ray: &Ray, bounds: &BoundingBox) -> Option<Vector3> {
    if bounds.contains_point(&ray.origin) {
        return Some(ray.origin);
    }
    let origin = ray.origin.values();
    let direction = ray.direction.values();
    let min = bounds.min().values();
    let max = bounds.max().values();

    let mut lowest: Option<f64> = None;
    for axis in 0..3 {
        let faces = [
            (origin[axis] <= min[axis] && direction[axis] > 0.0, min[axis]),
            (origin[axis] >= max[axis] && direction[axis] < 0.0, max[axis]),
        ];
        for (facing, plane) in faces {
            if !facing {
                continue;
            }
            let t = (plane - origin[axis]) / direction[axis];
            if t < 0.0 {
                continue;
            }
            let hit = ray.end_point(t).values();
            let on_face = (0..3)
                .filter(|&other| other != axis)
                .all(|other| hit[other] >= min[other] && hit[other] <= max[other]);
            if on_face && lowest.map_or(true, |best| t < best) {
                lowest = Some(t);
            }
        }
    }
    lowest.map(|t| ray.end_point(t))
}

/// Where `ray` meets `plane`
///
/// A ray lying in the plane hits at its origin; a parallel ray off the plane
/// or a plane behind the origin is a miss.
pub fn intersect_ray_plane(ray: &Ray, plane: &Plane) -> Option<Vector3> {
    let denom = ray.direction.dot(&plane.normal);
    if denom != 0.0 {
        let t = -(ray.origin.dot(&plane.normal) + plane.d) / denom;
        if t < 0.0 {
            return None;
        }
        return Some(ray.end_point(t));
    }
    if plane.test_point(&ray.origin) == PlaneSide::OnPlane {
        Some(ray.origin)
    } else {
        None
    }
}

/// Distance from `point` to the infinite line through `x1` and `x2`
///
/// A zero-length line degenerates to the distance from `x1`.
pub fn distance_line_point(x1: &Vector3, x2: &Vector3, point: &Vector3) -> f64 {
    let mut along = *x2;
    along.sub(x1);
    let denominator = along.len();
    if denominator == 0.0 {
        return point.dst(x1);
    }
    let mut to_x2 = *point;
    to_x2.sub(x2);
    let mut to_x1 = *point;
    to_x1.sub(x1).crs(&to_x2);
    to_x1.len() / denominator
}

/// Closest point to `point` on the infinite line through `x1` and `x2`
pub fn closest_point_on_line(x1: &Vector3, x2: &Vector3, point: &Vector3) -> Vector3 {
    let mut along = *x2;
    along.sub(x1);
    let len2 = along.len2();
    if len2 == 0.0 {
        return *x1;
    }
    let mut to_point = *point;
    to_point.sub(x1);
    let t = to_point.dot(&along) / len2;
    let mut closest = *x1;
    closest.mul_add(&along, t);
    closest
}

/// Distance from `point` to the segment `ab`
///
/// The perpendicular distance when `point` projects inside the segment,
/// otherwise the distance to the nearer endpoint.
pub fn distance_segment_point(a: &Vector3, b: &Vector3, point: &Vector3) -> f64 {
    let mut ab = *b;
    ab.sub(a);
    let mut av = *point;
    av.sub(a);
    if av.dot(&ab) <= 0.0 {
        return av.len();
    }
    let mut bv = *point;
    bv.sub(b);
    if bv.dot(&ab) >= 0.0 {
        return bv.len();
    }
    let ab_len = ab.len();
    ab.crs(&av).len() / ab_len
}

/// Intersection of the line through `line_point` along `line_direction` with a plane
///
/// `None` when the line is parallel to the plane.
pub fn line_intersection(
    plane_point: &Vector3,
    plane_normal: &Vector3,
    line_point: &Vector3,
    line_direction: &Vector3,
) -> Option<Vector3> {
    let mut direction = *line_direction;
    direction.nor();
    let denom = plane_normal.dot(&direction);
    if denom == 0.0 {
        return None;
    }
    let t = (plane_normal.dot(plane_point) - plane_normal.dot(line_point)) / denom;
    let mut out = *line_point;
    out.mul_add(&direction, t);
    Some(out)
}

/// Signed distance from `point` to the plane through `plane_point` with `plane_normal`
///
/// The normal does not need to be unit length.
pub fn distance_point_plane(point: &Vector3, plane_normal: &Vector3, plane_point: &Vector3) -> f64 {
    let d = -plane_normal.dot(plane_point);
    distance_point_plane_equation(point, plane_normal.x, plane_normal.y, plane_normal.z, d)
}

/// Signed distance from `point` to the plane `a·x + b·y + c·z + d = 0`
pub fn distance_point_plane_equation(point: &Vector3, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let denom = Vector3::len_of(a, b, c);
    (a * point.x + b * point.y + c * point.z + d) / denom
}

/// Where the segment `p0`–`p1` crosses the plane through `plane_point`
pub fn intersect_segment_plane(
    p0: &Vector3,
    p1: &Vector3,
    plane_normal: &Vector3,
    plane_point: &Vector3,
) -> Option<Vector3> {
    let d = -plane_normal.dot(plane_point);
    intersect_segment_plane_equation(p0, p1, plane_normal.x, plane_normal.y, plane_normal.z, d)
}

/// Where the segment `p0`–`p1` crosses the plane `a·x + b·y + c·z + d = 0`
///
/// `None` for a parallel segment or a crossing outside the segment.
pub fn intersect_segment_plane_equation(
    p0: &Vector3,
    p1: &Vector3,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
) -> Option<Vector3> {
    let mut direction = *p1;
    direction.sub(p0);
    let denominator = direction.dot_xyz(a, b, c);
    if denominator == 0.0 {
        return None;
    }
    let t = -(p0.dot_xyz(a, b, c) + d) / denominator;
    if (0.0..=1.0).contains(&t) {
        let mut out = *p0;
        out.mul_add(&direction, t);
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    #[test]
    fn test_ray_sphere_two_hits_ordered_by_midpoint() {
        let hits = intersect_ray_sphere(
            &Vector3::ZERO,
            &Vector3::new(0.0, 0.0, -1.0),
            &Vector3::new(0.0, 0.0, -5.0),
            1.0,
        );
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0], Vector3::new(0.0, 0.0, -4.0), epsilon = 1e-12);
        assert_abs_diff_eq!(hits[1], Vector3::new(0.0, 0.0, -6.0), epsilon = 1e-12);
        assert_relative_eq!(hits[0].len(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(hits[1].len(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_sphere_prefers_root_near_midpoint() {
        // Segment spans the whole sphere; the far root t=0.75 is nearer 0.5
        // than the near root t=0.125
        let hits = intersect_ray_sphere(
            &Vector3::ZERO,
            &Vector3::new(0.0, 0.0, -8.0),
            &Vector3::new(0.0, 0.0, -3.5),
            2.5,
        );
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0], Vector3::new(0.0, 0.0, -6.0), epsilon = 1e-12);
        assert_abs_diff_eq!(hits[1], Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_sphere_miss_and_tangent() {
        let miss = intersect_ray_sphere(
            &Vector3::ZERO,
            &Vector3::new(0.0, 0.0, -1.0),
            &Vector3::new(3.0, 0.0, -5.0),
            1.0,
        );
        assert!(miss.is_empty());

        let tangent = intersect_ray_sphere(
            &Vector3::ZERO,
            &Vector3::new(0.0, 0.0, -1.0),
            &Vector3::new(1.0, 0.0, -5.0),
            1.0,
        );
        assert_eq!(tangent.len(), 1);
        assert_abs_diff_eq!(tangent[0], Vector3::new(0.0, 0.0, -5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_check_ray_sphere_uses_direction() {
        let center = Vector3::new(0.0, 0.0, -5.0);
        let forward = Vector3::new(0.0, 0.0, -1.0);
        assert!(check_intersect_ray_sphere(&Vector3::ZERO, &forward, &center, 1.0));
        assert!(!check_intersect_ray_sphere(&Vector3::ZERO, &Vector3::X, &center, 1.0));
    }

    #[test]
    fn test_segment_sphere() {
        let center = Vector3::new(0.0, 0.0, -5.0);
        let through = Vector3::new(0.0, 0.0, -10.0);
        assert!(check_intersect_segment_sphere(&Vector3::ZERO, &through, &center, 1.0));
        // Line hits, segment stops short
        let short = Vector3::new(0.0, 0.0, -2.0);
        assert!(!check_intersect_segment_sphere(&Vector3::ZERO, &short, &center, 1.0));
    }

    #[rstest]
    #[case(Vector3::new(0.0, 5.0, 0.0), 5.0)]
    #[case(Vector3::new(0.0, -5.0, 0.0), -5.0)]
    #[case(Vector3::new(7.0, 0.0, -3.0), 0.0)]
    fn test_distance_point_plane(#[case] point: Vector3, #[case] expected: f64) {
        assert_eq!(distance_point_plane(&point, &Vector3::Y, &Vector3::ZERO), expected);
    }

    #[test]
    fn test_distance_point_plane_equation_normalizes() {
        // 2y - 4 = 0 is the plane y = 2
        let d = distance_point_plane_equation(&Vector3::new(1.0, 5.0, 1.0), 0.0, 2.0, 0.0, -4.0);
        assert_eq!(d, 3.0);
    }

    #[test]
    fn test_distance_line_point() {
        let x1 = Vector3::ZERO;
        let x2 = Vector3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(distance_line_point(&x1, &x2, &Vector3::new(-5.0, 3.0, 4.0)), 5.0);
        assert_eq!(distance_line_point(&x1, &x1, &Vector3::new(0.0, 3.0, 4.0)), 5.0);
        assert_eq!(
            closest_point_on_line(&x1, &x2, &Vector3::new(-5.0, 3.0, 4.0)),
            Vector3::new(-5.0, 0.0, 0.0)
        );
    }

    #[rstest]
    #[case(Vector3::new(5.0, 3.0, 0.0), 3.0)]
    #[case(Vector3::new(-4.0, 3.0, 0.0), 5.0)]
    #[case(Vector3::new(13.0, 4.0, 0.0), 5.0)]
    fn test_distance_segment_point(#[case] point: Vector3, #[case] expected: f64) {
        let a = Vector3::ZERO;
        let b = Vector3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(distance_segment_point(&a, &b, &point), expected);
    }

    #[test]
    fn test_line_intersection() {
        let hit = line_intersection(
            &Vector3::new(0.0, 2.0, 0.0),
            &Vector3::Y,
            &Vector3::ZERO,
            &Vector3::new(0.0, 4.0, 4.0),
        );
        assert_abs_diff_eq!(hit.unwrap(), Vector3::new(0.0, 2.0, 2.0), epsilon = 1e-12);

        let parallel = line_intersection(
            &Vector3::new(0.0, 2.0, 0.0),
            &Vector3::Y,
            &Vector3::ZERO,
            &Vector3::X,
        );
        assert!(parallel.is_none());
    }

    #[test]
    fn test_segment_plane() {
        let normal = Vector3::Z;
        let point = Vector3::new(0.0, 0.0, 1.0);
        let end = Vector3::new(2.0, 0.0, 2.0);
        let hit = intersect_segment_plane(&Vector3::ZERO, &end, &normal, &point);
        assert_eq!(hit, Some(Vector3::new(1.0, 0.0, 1.0)));

        let end = Vector3::new(0.0, 0.0, 0.5);
        let short = intersect_segment_plane(&Vector3::ZERO, &end, &normal, &point);
        assert!(short.is_none());

        let parallel = intersect_segment_plane(&Vector3::ZERO, &Vector3::X, &normal, &point);
        assert!(parallel.is_none());
    }

    #[test]
    fn test_ray_bounds() {
        let bounds =
            BoundingBox::new(&Vector3::new(-1.0, -1.0, -6.0), &Vector3::new(1.0, 1.0, -4.0));
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(intersect_ray_bounds(&ray, &bounds), Some(Vector3::new(0.0, 0.0, -4.0)));
        assert!(intersect_ray_bounds_fast(&ray, &bounds.center(), &bounds.dimensions()));

        let away = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(intersect_ray_bounds(&away, &bounds), None);
        assert!(!intersect_ray_bounds_fast(&away, &bounds.center(), &bounds.dimensions()));

        let inside = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::X);
        assert_eq!(intersect_ray_bounds(&inside, &bounds), Some(inside.origin));
    }

    #[test]
    fn test_ray_bounds_fast_parallel_to_slab() {
        let center = Vector3::new(0.0, 0.0, -5.0);
        let dimensions = Vector3::new(2.0, 2.0, 2.0);
        let within = Ray::new(Vector3::new(0.5, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(intersect_ray_bounds_fast(&within, &center, &dimensions));

        let on_face = Ray::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(!intersect_ray_bounds_fast(&on_face, &center, &dimensions));

        let outside = Ray::new(Vector3::new(1.5, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(!intersect_ray_bounds_fast(&outside, &center, &dimensions));
    }

    #[test]
    fn test_ray_plane() {
        let plane = Plane::new(Vector3::Y, -2.0);
        let up = Ray::new(Vector3::ZERO, Vector3::Y);
        assert_eq!(intersect_ray_plane(&up, &plane), Some(Vector3::new(0.0, 2.0, 0.0)));

        let down = Ray::new(Vector3::ZERO, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(intersect_ray_plane(&down, &plane), None);

        let along = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::X);
        assert_eq!(intersect_ray_plane(&along, &plane), Some(along.origin));
        let parallel = Ray::new(Vector3::ZERO, Vector3::X);
        assert_eq!(intersect_ray_plane(&parallel, &plane), None);
    }
}
