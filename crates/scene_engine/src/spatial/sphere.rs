//! Bounding sphere

use serde::{Deserialize, Serialize};

use super::{Box3, Plane};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext};

/// A bounding sphere. A negative radius marks the empty sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 0.0)
    }
}

impl Sphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// The empty sphere (radius -1)
    pub fn empty() -> Self {
        Self::new(Vec3::zeros(), -1.0)
    }

    /// Assign center and radius
    pub fn set(&mut self, center: Vec3, radius: f32) -> &mut Self {
        self.center = center;
        self.radius = radius;
        self
    }

    /// Smallest sphere around `center` containing every point.
    ///
    /// Without an explicit center the center of the points' bounding box is
    /// used. No points leaves a zero-radius sphere at that center.
    pub fn set_from_points(&mut self, points: &[Vec3], center: Option<Vec3>) -> &mut Self {
        self.center = center.unwrap_or_else(|| Box3::from_points(points).center());
        let max_radius_sq = points
            .iter()
            .map(|p| (p - self.center).magnitude_squared())
            .fold(0.0_f32, f32::max);
        self.radius = max_radius_sq.sqrt();
        self
    }

    /// True iff the radius is negative
    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    /// Reset to the empty sphere
    pub fn make_empty(&mut self) -> &mut Self {
        *self = Self::empty();
        self
    }

    /// Inclusive point containment; the empty sphere contains nothing
    pub fn contains_point(&self, point: &Vec3) -> bool {
        !self.is_empty() && (point - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Signed distance from the surface; negative inside
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        (point - self.center).magnitude() - self.radius
    }

    /// Check if this sphere intersects with another
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let radius_sum = self.radius + other.radius;
        (self.center - other.center).magnitude_squared() <= radius_sum * radius_sum
    }

    /// Reciprocal of [`Box3::intersects_sphere`]
    pub fn intersects_box(&self, bounds: &Box3) -> bool {
        bounds.intersects_sphere(self)
    }

    /// True iff the plane passes within `radius` of the center
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        !self.is_empty() && plane.distance_to_point(&self.center).abs() <= self.radius
    }

    /// Closest point of the ball to `point`
    pub fn clamp_point(&self, point: &Vec3) -> Vec3 {
        let offset = point - self.center;
        if offset.magnitude_squared() > self.radius * self.radius {
            self.center + offset.normalize_or_zero() * self.radius
        } else {
            *point
        }
    }

    /// Axis-aligned box around the sphere; empty for an empty sphere
    pub fn bounding_box(&self) -> Box3 {
        if self.is_empty() {
            return Box3::empty();
        }
        let mut result = Box3::new(self.center, self.center);
        result.expand_by_scalar(self.radius);
        result
    }

    /// Transform the center and scale the radius by the largest axis scale
    pub fn apply_matrix4(&mut self, matrix: &Mat4) -> &mut Self {
        self.center = self.center.apply_matrix4(matrix);
        self.radius *= matrix.max_scale_on_axis();
        self
    }

    /// Move the center by `offset`
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.center += offset;
        self
    }

    /// Grow minimally so the sphere contains `point`
    pub fn expand_by_point(&mut self, point: &Vec3) -> &mut Self {
        if self.is_empty() {
            self.center = *point;
            self.radius = 0.0;
            return self;
        }

        let offset = point - self.center;
        let length_sq = offset.magnitude_squared();
        if length_sq > self.radius * self.radius {
            let length = length_sq.sqrt();
            let missing = (length - self.radius) * 0.5;
            self.center += offset * (missing / length);
            self.radius += missing;
        }
        self
    }

    /// Grow minimally so the sphere contains `other`
    pub fn union(&mut self, other: &Sphere) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            *self = *other;
            return self;
        }

        let offset = other.center - self.center;
        if offset.magnitude() + other.radius <= self.radius {
            return self;
        }
        if offset == Vec3::zeros() {
            self.radius = self.radius.max(other.radius);
            return self;
        }

        let direction = offset.normalize();
        self.expand_by_point(&(other.center + direction * other.radius));
        self.expand_by_point(&(other.center - direction * other.radius));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_contains_and_distance() {
        let s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(s.contains_point(&Vec3::new(3.0, 0.0, 0.0)));
        assert!(!s.contains_point(&Vec3::new(3.1, 0.0, 0.0)));
        assert_relative_eq!(s.distance_to_point(&Vec3::new(5.0, 0.0, 0.0)), 2.0);
        assert_relative_eq!(s.distance_to_point(&Vec3::new(1.0, 0.0, 0.0)), -2.0);
    }

    #[test]
    fn test_sphere_sphere_touching_counts() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let c = Sphere::new(Vec3::new(2.1, 0.0, 0.0), 1.0);
        assert!(a.intersects_sphere(&b));
        assert!(!a.intersects_sphere(&c));
    }

    #[test]
    fn test_empty_sphere_predicates_are_false() {
        let empty = Sphere::empty();
        let unit = Sphere::new(Vec3::zeros(), 1.0);
        assert!(!empty.contains_point(&Vec3::zeros()));
        assert!(!empty.contains_point(&empty.center));
        assert!(!empty.intersects_sphere(&unit));
        assert!(!unit.intersects_sphere(&empty));
        assert!(!empty.intersects_sphere(&empty));
        assert!(!empty.intersects_plane(&Plane::new(Vec3::y(), 0.0)));
        assert!(!Plane::new(Vec3::y(), 0.0).intersects_sphere(&empty));

        // Overlapping radii would sum positive without the guard
        let negative = Sphere::new(Vec3::new(1.5, 0.0, 0.0), -0.4);
        assert!(!Sphere::new(Vec3::zeros(), 2.0).intersects_sphere(&negative));
    }

    #[test]
    fn test_set_from_points_uses_box_center() {
        let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let mut s = Sphere::default();
        s.set_from_points(&points, None);
        assert_relative_eq!(s.center, Vec3::new(1.0, 0.5, 0.0));
        assert!(points.iter().all(|p| s.contains_point(p) || s.distance_to_point(p) < 1e-5));
    }

    #[test]
    fn test_apply_matrix4_uses_max_scale() {
        let mut s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let m = Mat4::new_translation(&Vec3::new(0.0, 5.0, 0.0)) * Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 3.0, 2.0));
        s.apply_matrix4(&m);
        assert_relative_eq!(s.center, Vec3::new(1.0, 5.0, 0.0));
        assert_relative_eq!(s.radius, 3.0);
    }

    #[test]
    fn test_expand_and_union() {
        let mut s = Sphere::empty();
        s.expand_by_point(&Vec3::zeros());
        assert_eq!(s, Sphere::new(Vec3::zeros(), 0.0));

        s.expand_by_point(&Vec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(s.center, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(s.radius, 1.0);

        s.union(&Sphere::new(Vec3::new(-3.0, 0.0, 0.0), 1.0));
        assert_relative_eq!(s.center, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(s.radius, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bounding_box_of_empty_sphere_is_empty() {
        assert!(Sphere::empty().bounding_box().is_empty());
        let b = Sphere::new(Vec3::zeros(), 1.0).bounding_box();
        assert_eq!(b.min, Vec3::repeat(-1.0));
        assert_eq!(b.max, Vec3::repeat(1.0));
    }
}
