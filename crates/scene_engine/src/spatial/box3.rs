//! Axis-aligned bounding box
//!
//! The canonical empty box has `min = +inf` and `max = -inf` on every axis, so
//! expanding it by any point yields a zero-volume box around that point and
//! every containment or intersection predicate on it is false.

use serde::{Deserialize, Serialize};

use super::{Plane, Sphere, Triangle};
use crate::foundation::math::{Mat4, Vec3, Vec3Ext};
use crate::foundation::collections::ObjectId;
use crate::scene::{BufferAttribute, SceneGraph};

/// Cross products shorter than this are treated as degenerate separating axes
const DEGENERATE_AXIS_SQ: f32 = 1e-20;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box3 {
    /// Create a new box from min and max corners, without validation
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The canonical empty box
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing all points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut result = Self::empty();
        result.set_from_points(points);
        result
    }

    /// Smallest box containing all `(x, y, z)` triples of a flat array
    pub fn from_array(array: &[f32]) -> Self {
        let mut result = Self::empty();
        result.set_from_array(array);
        result
    }

    /// Box centered at `center` with the given full size
    pub fn from_center_and_size(center: Vec3, size: Vec3) -> Self {
        let mut result = Self::empty();
        result.set_from_center_and_size(center, size);
        result
    }

    /// Assign both corners directly. An inverted box is allowed and is empty.
    pub fn set(&mut self, min: Vec3, max: Vec3) -> &mut Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Reduce a flat coordinate array, read as consecutive `(x, y, z)` triples.
    ///
    /// The length should be a multiple of three; a trailing partial triple is
    /// ignored. An empty array yields the empty box.
    pub fn set_from_array(&mut self, array: &[f32]) -> &mut Self {
        self.make_empty();
        for triple in array.chunks_exact(3) {
            self.expand_by_point(&Vec3::new(triple[0], triple[1], triple[2]));
        }
        self
    }

    /// Reduce the items of a vertex attribute (first three components of each item)
    pub fn set_from_buffer_attribute(&mut self, attribute: &BufferAttribute) -> &mut Self {
        self.make_empty();
        for i in 0..attribute.count() {
            self.expand_by_point(&attribute.vec3(i));
        }
        self
    }

    /// Reduce a sequence of points
    pub fn set_from_points<'a>(&mut self, points: impl IntoIterator<Item = &'a Vec3>) -> &mut Self {
        self.make_empty();
        for point in points {
            self.expand_by_point(point);
        }
        self
    }

    /// `min = center - size / 2`, `max = center + size / 2`
    pub fn set_from_center_and_size(&mut self, center: Vec3, size: Vec3) -> &mut Self {
        let half = size * 0.5;
        self.min = center - half;
        self.max = center + half;
        self
    }

    /// Reset to the canonical empty box
    pub fn make_empty(&mut self) -> &mut Self {
        *self = Self::empty();
        self
    }

    /// True iff some `max` component is strictly below its `min` component.
    ///
    /// A zero-volume box with `min == max` is not empty.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Center of the box, or the zero vector if empty
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Full extent of the box, or the zero vector if empty
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Grow to include a point
    pub fn expand_by_point(&mut self, point: &Vec3) -> &mut Self {
        self.min = self.min.min_by_component(point);
        self.max = self.max.max_by_component(point);
        self
    }

    /// Grow by `vector` on both sides of each axis
    pub fn expand_by_vector(&mut self, vector: &Vec3) -> &mut Self {
        self.min -= vector;
        self.max += vector;
        self
    }

    /// Grow by `scalar` on every side
    pub fn expand_by_scalar(&mut self, scalar: f32) -> &mut Self {
        self.min.add_scalar_mut(-scalar);
        self.max.add_scalar_mut(scalar);
        self
    }

    /// World-space box around every geometry in an object subtree.
    ///
    /// Reads cached world matrices; update them first.
    pub fn set_from_object(&mut self, graph: &SceneGraph, id: ObjectId) -> &mut Self {
        self.make_empty();
        self.expand_by_object(graph, id)
    }

    /// Grow to include the world-space geometry bounds of an object subtree
    pub fn expand_by_object(&mut self, graph: &SceneGraph, id: ObjectId) -> &mut Self {
        graph.traverse(id, |_, node| {
            let Some(geometry) = node.geometry().and_then(|g| graph.geometry(g)) else { return };
            let mut bounds = geometry.bounding_box();
            if !bounds.is_empty() {
                bounds.apply_matrix4(node.matrix_world());
                self.union(&bounds);
            }
        });
        self
    }

    /// Inclusive point containment; always false for an empty box
    pub fn contains_point(&self, point: &Vec3) -> bool {
        !(point.x < self.min.x || point.x > self.max.x
            || point.y < self.min.y || point.y > self.max.y
            || point.z < self.min.z || point.z > self.max.z)
    }

    /// True iff `other` lies entirely within this box.
    ///
    /// An empty box contains nothing. An empty `other` is contained by any
    /// non-empty box.
    pub fn contains_box(&self, other: &Box3) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.is_empty() {
            return true;
        }

        self.min.x <= other.min.x && other.max.x <= self.max.x
            && self.min.y <= other.min.y && other.max.y <= self.max.y
            && self.min.z <= other.min.z && other.max.z <= self.max.z
    }

    /// Fractional position of `point` inside the box, per axis.
    ///
    /// Values leave `[0, 1]` when the point is outside. Axes with zero extent
    /// report 0, as does every axis of an empty box.
    pub fn parameter(&self, point: &Vec3) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        let extent = self.max - self.min;
        (point - self.min).zip_map(&extent, |offset, extent| if extent == 0.0 { 0.0 } else { offset / extent })
    }

    /// Standard AABB overlap test; touching faces count as intersecting.
    /// Empty or inverted boxes intersect nothing.
    pub fn intersects_box(&self, other: &Box3) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(other.max.x < self.min.x || other.min.x > self.max.x
            || other.max.y < self.min.y || other.min.y > self.max.y
            || other.max.z < self.min.z || other.min.z > self.max.z)
    }

    /// True iff the closest point of the box lies within the sphere
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        if self.is_empty() || sphere.is_empty() {
            return false;
        }
        let closest = self.clamp_point(&sphere.center);
        (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
    }

    /// True iff the plane passes through or touches the box
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        if self.is_empty() {
            return false;
        }

        // Project the two corners extremal along the plane normal.
        let mut min = 0.0;
        let mut max = 0.0;
        for axis in 0..3 {
            let n = plane.normal[axis];
            if n > 0.0 {
                min += n * self.min[axis];
                max += n * self.max[axis];
            } else {
                min += n * self.max[axis];
                max += n * self.min[axis];
            }
        }

        min <= -plane.constant && max >= -plane.constant
    }

    /// Separating-axis test between the box and a triangle.
    ///
    /// Candidate axes are the nine edge/box-axis cross products, the three box
    /// face normals and the triangle normal. Degenerate cross products are
    /// skipped; a degenerate triangle is still tested against the remaining
    /// axes.
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        if self.is_empty() {
            return false;
        }

        let center = self.center();
        let extents = self.max - center;

        let v0 = triangle.a - center;
        let v1 = triangle.b - center;
        let v2 = triangle.c - center;

        let f0 = v1 - v0;
        let f1 = v2 - v1;
        let f2 = v0 - v2;

        let edge_axes = [
            Vec3::new(0.0, -f0.z, f0.y), Vec3::new(0.0, -f1.z, f1.y), Vec3::new(0.0, -f2.z, f2.y),
            Vec3::new(f0.z, 0.0, -f0.x), Vec3::new(f1.z, 0.0, -f1.x), Vec3::new(f2.z, 0.0, -f2.x),
            Vec3::new(-f0.y, f0.x, 0.0), Vec3::new(-f1.y, f1.x, 0.0), Vec3::new(-f2.y, f2.x, 0.0),
        ];
        if !sat_for_axes(&edge_axes, &v0, &v1, &v2, &extents) {
            return false;
        }

        let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];
        if !sat_for_axes(&box_axes, &v0, &v1, &v2, &extents) {
            return false;
        }

        let triangle_normal = f0.cross(&f1);
        sat_for_axes(&[triangle_normal], &v0, &v1, &v2, &extents)
    }

    /// Clamp each axis of `point` into the box.
    ///
    /// An empty box has nothing to clamp into and returns the point unchanged.
    pub fn clamp_point(&self, point: &Vec3) -> Vec3 {
        if self.is_empty() {
            return *point;
        }
        point.max_by_component(&self.min).min_by_component(&self.max)
    }

    /// Euclidean distance to the box, zero inside; infinite for an empty box
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        if self.is_empty() {
            return f32::INFINITY;
        }
        (self.clamp_point(point) - point).magnitude()
    }

    /// Sphere through the corners, centered on the box
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.center(), self.size().magnitude() * 0.5)
    }

    /// Shrink to the overlap with `other`; disjoint boxes give the empty box
    pub fn intersect(&mut self, other: &Box3) -> &mut Self {
        self.min = self.min.max_by_component(&other.min);
        self.max = self.max.min_by_component(&other.max);
        if self.is_empty() {
            self.make_empty();
        }
        self
    }

    /// Grow to include `other`
    pub fn union(&mut self, other: &Box3) -> &mut Self {
        self.min = self.min.min_by_component(&other.min);
        self.max = self.max.max_by_component(&other.max);
        self
    }

    /// Replace with the axis-aligned box around the eight transformed corners
    pub fn apply_matrix4(&mut self, matrix: &Mat4) -> &mut Self {
        if self.is_empty() {
            return self;
        }

        let corners = self.corners();
        self.make_empty();
        for corner in &corners {
            self.expand_by_point(&corner.apply_matrix4(matrix));
        }
        self
    }

    /// Move both corners by `offset`
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.min += offset;
        self.max += offset;
        self
    }

    /// The eight corners, `min` first and `max` last
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// Returns false as soon as one axis separates the triangle from the box.
fn sat_for_axes(axes: &[Vec3], v0: &Vec3, v1: &Vec3, v2: &Vec3, extents: &Vec3) -> bool {
    for axis in axes {
        if axis.magnitude_squared() < DEGENERATE_AXIS_SQ {
            continue;
        }

        // Projected half-width of the box onto the axis.
        let r = extents.x * axis.x.abs() + extents.y * axis.y.abs() + extents.z * axis.z.abs();

        let p0 = v0.dot(axis);
        let p1 = v1.dot(axis);
        let p2 = v2.dot(axis);

        if (-p0.max(p1).max(p2)).max(p0.min(p1).min(p2)) > r {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn unit_box() -> Box3 {
        Box3::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0))
    }

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = unit_box();
        let b = Box3::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let c = Box3::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(a.intersects_box(&b));
        assert!(!a.intersects_box(&c));
        assert_relative_eq!(a.center(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_box_predicates_are_false() {
        let empty = Box3::empty();
        let sphere = Sphere::new(Vec3::zeros(), 100.0);
        let plane = Plane::new(Vec3::y(), 0.0);
        let triangle = Triangle::new(Vec3::zeros(), Vec3::x(), Vec3::y());

        assert!(empty.is_empty());
        assert!(!empty.contains_point(&Vec3::zeros()));
        assert!(!empty.intersects_box(&unit_box()));
        assert!(!unit_box().intersects_box(&empty));
        assert!(!empty.intersects_sphere(&sphere));
        assert!(!empty.intersects_plane(&plane));
        assert!(!empty.intersects_triangle(&triangle));
        assert_eq!(empty.center(), Vec3::zeros());
        assert_eq!(empty.size(), Vec3::zeros());
        assert_eq!(empty.distance_to_point(&Vec3::zeros()), f32::INFINITY);
    }

    #[test]
    fn test_zero_volume_box_is_not_empty() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        let b = Box3::new(point, point);

        assert!(!b.is_empty());
        assert!(b.contains_point(&point));
        assert_eq!(b.size(), Vec3::zeros());
    }

    #[test]
    fn test_contains_box_empty_conventions() {
        assert!(unit_box().contains_box(&Box3::empty()));
        assert!(!Box3::empty().contains_box(&Box3::empty()));
        assert!(!Box3::empty().contains_box(&unit_box()));

        let inner = Box3::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 1.0));
        assert!(unit_box().contains_box(&inner));
        assert!(!inner.contains_box(&unit_box()));
    }

    #[test]
    fn test_set_from_array_ignores_trailing_partial_triple() {
        let b = Box3::from_array(&[1.0, -2.0, 3.0, -1.0, 2.0, 0.0, 99.0]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));

        assert!(Box3::from_array(&[]).is_empty());
    }

    #[test]
    fn test_center_and_size_roundtrip() {
        let b = Box3::from_center_and_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_expand_operations() {
        let mut b = Box3::empty();
        b.expand_by_point(&Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(b.min, b.max);

        b.expand_by_scalar(1.0);
        assert_eq!(b.min, Vec3::zeros());
        assert_eq!(b.max, Vec3::new(2.0, 2.0, 2.0));

        b.expand_by_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_sphere_intersection() {
        let b = unit_box();
        assert!(b.intersects_sphere(&Sphere::new(Vec3::new(3.0, 1.0, 1.0), 1.0)));
        assert!(!b.intersects_sphere(&Sphere::new(Vec3::new(3.0, 3.0, 3.0), 1.0)));
        assert!(b.intersects_sphere(&Sphere::new(Vec3::new(1.0, 1.0, 1.0), 0.1)));
    }

    #[test]
    fn test_plane_intersection() {
        let b = unit_box();
        assert!(b.intersects_plane(&Plane::new(Vec3::x(), -1.0)));
        assert!(b.intersects_plane(&Plane::new(Vec3::x(), -2.0)));
        assert!(!b.intersects_plane(&Plane::new(Vec3::x(), -3.0)));
        assert!(!b.intersects_plane(&Plane::new(-Vec3::y(), -1.0)));
        assert!(b.intersects_plane(&Plane::new(-Vec3::y(), 1.0)));
    }

    #[test]
    fn test_triangle_inside_box_intersects() {
        let b = unit_box();
        let inside = Triangle::new(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(1.5, 0.5, 0.5),
            Vec3::new(0.5, 1.5, 0.5),
        );
        assert!(b.intersects_triangle(&inside));
    }

    #[test]
    fn test_triangle_outside_on_one_axis_does_not_intersect() {
        let b = unit_box();
        let outside = Triangle::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(-0.5, 2.0, 0.0),
            Vec3::new(-2.0, 1.0, 2.0),
        );
        assert!(!b.intersects_triangle(&outside));
    }

    #[test]
    fn test_triangle_crossing_box_without_vertices_inside() {
        let b = unit_box();
        let crossing = Triangle::new(
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(5.0, 1.0, -5.0),
            Vec3::new(0.0, 1.0, 10.0),
        );
        assert!(b.intersects_triangle(&crossing));
    }

    #[test]
    fn test_triangle_separated_only_by_its_normal() {
        // Large triangle whose plane x + y + z = 10 passes beyond the box corner.
        let b = unit_box();
        let tilted = Triangle::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        );
        assert!(!b.intersects_triangle(&tilted));
    }

    #[test]
    fn test_triangle_separated_by_edge_axis() {
        // Bounding intervals overlap on every box axis, but the edge x + y = 5 misses the box.
        let b = unit_box();
        let diagonal = Triangle::new(
            Vec3::new(5.0, 0.0, -1.0),
            Vec3::new(0.0, 5.0, -1.0),
            Vec3::new(5.0, 0.0, 3.0),
        );
        assert!(!b.intersects_triangle(&diagonal));
    }

    #[test]
    fn test_degenerate_triangle_does_not_panic() {
        let b = unit_box();
        let point = Triangle::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        let line_inside = Triangle::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.5, 1.5, 1.5));
        let far_point = Triangle::new(Vec3::new(9.0, 9.0, 9.0), Vec3::new(9.0, 9.0, 9.0), Vec3::new(9.0, 9.0, 9.0));

        assert!(b.intersects_triangle(&point));
        assert!(b.intersects_triangle(&line_inside));
        assert!(!b.intersects_triangle(&far_point));
    }

    #[test]
    fn test_clamp_and_distance() {
        let b = unit_box();
        assert_eq!(b.clamp_point(&Vec3::new(3.0, 1.0, -1.0)), Vec3::new(2.0, 1.0, 0.0));
        assert_relative_eq!(b.distance_to_point(&Vec3::new(5.0, 1.0, 1.0)), 3.0);
        assert_eq!(b.distance_to_point(&Vec3::new(1.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_parameter() {
        let b = Box3::new(Vec3::zeros(), Vec3::new(2.0, 4.0, 0.0));
        let p = b.parameter(&Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p, Vec3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn test_parameter_of_empty_box_is_zero() {
        let p = Box3::empty().parameter(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::zeros());
        assert!(p.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_inverted_box_never_intersects() {
        let a = Box3::new(Vec3::zeros(), Vec3::new(3.0, 3.0, 3.0));
        let inverted = Box3::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 2.0));
        assert!(inverted.is_empty());
        assert!(!a.intersects_box(&inverted));
        assert!(!inverted.intersects_box(&a));
        assert!(!inverted.intersects_box(&inverted));
        assert!(!a.intersects_box(&Box3::empty()));
    }

    #[test]
    fn test_empty_sphere_never_intersects_box() {
        assert!(!unit_box().intersects_sphere(&Sphere::empty()));
        assert!(!unit_box().intersects_sphere(&Sphere::new(Vec3::new(1.0, 1.0, 1.0), -0.5)));
        assert!(!Sphere::empty().intersects_box(&unit_box()));
    }

    #[test]
    fn test_intersect_and_union() {
        let mut a = unit_box();
        a.intersect(&Box3::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0)));
        assert_eq!(a, Box3::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0)));

        let mut disjoint = unit_box();
        disjoint.intersect(&Box3::new(Vec3::repeat(5.0), Vec3::repeat(6.0)));
        assert_eq!(disjoint, Box3::empty());

        let mut u = Box3::empty();
        u.union(&unit_box());
        assert_eq!(u, unit_box());
    }

    #[test]
    fn test_apply_matrix4_rotation_grows_box() {
        let mut b = Box3::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let rotation = Mat4::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4);
        b.apply_matrix4(&rotation);

        let r = 2.0_f32.sqrt();
        assert_relative_eq!(b.max, Vec3::new(r, r, 1.0), epsilon = 1e-5);
        assert_relative_eq!(b.min, Vec3::new(-r, -r, -1.0), epsilon = 1e-5);

        let mut empty = Box3::empty();
        empty.apply_matrix4(&rotation);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_bounding_sphere_touches_corners() {
        let sphere = unit_box().bounding_sphere();
        assert_eq!(sphere.center, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(sphere.radius, 3.0_f32.sqrt(), epsilon = 1e-6);
    }

    fn coord() -> impl Strategy<Value = f32> {
        -100.0f32..100.0
    }

    fn point() -> impl Strategy<Value = Vec3> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn any_box() -> impl Strategy<Value = Box3> {
        (point(), point()).prop_map(|(a, b)| Box3::new(a, b))
    }

    proptest! {
        #[test]
        fn prop_intersects_box_is_symmetric(a in any_box(), b in any_box()) {
            prop_assert_eq!(a.intersects_box(&b), b.intersects_box(&a));
        }

        #[test]
        fn prop_empty_box_contains_nothing(b in any_box(), p in point()) {
            let mut b = b;
            b.make_empty();
            prop_assert!(b.is_empty());
            prop_assert!(!b.contains_point(&p));
        }

        #[test]
        fn prop_empty_box_intersects_no_box(a in any_box(), b in any_box()) {
            prop_assume!(a.is_empty());
            prop_assert!(!a.intersects_box(&b));
            prop_assert!(!b.intersects_box(&a));
        }

        #[test]
        fn prop_generating_points_are_contained(points in prop::collection::vec(point(), 1..20)) {
            let b = Box3::from_points(&points);
            for p in &points {
                prop_assert!(b.contains_point(p));
                prop_assert_eq!(b.distance_to_point(p), 0.0);
            }
        }

        #[test]
        fn prop_clamped_point_is_contained(points in prop::collection::vec(point(), 1..8), p in point()) {
            let b = Box3::from_points(&points);
            prop_assert!(b.contains_point(&b.clamp_point(&p)));
        }

        #[test]
        fn prop_triangle_of_interior_points_intersects(points in prop::collection::vec(point(), 3..4), extra in point()) {
            let mut b = Box3::from_points(&points);
            b.expand_by_point(&extra);
            let triangle = Triangle::new(points[0], points[1], points[2]);
            prop_assert!(b.intersects_triangle(&triangle));
        }
    }
}
