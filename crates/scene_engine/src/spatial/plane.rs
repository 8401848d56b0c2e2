//! Infinite plane in Hessian normal form

use serde::{Deserialize, Serialize};

use super::{Box3, Sphere, Triangle};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext};

/// Plane `normal . p + constant = 0`
///
/// `normal` is expected to be unit length; distances are only Euclidean when
/// it is. Use [`Plane::normalize`] after building one from raw coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Normal vector
    pub normal: Vec3,
    /// Signed distance from the origin, measured against the normal
    pub constant: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(Vec3::x(), 0.0)
    }
}

impl Plane {
    /// Create a new plane from normal and constant
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Assign normal and constant
    pub fn set(&mut self, normal: Vec3, constant: f32) -> &mut Self {
        self.normal = normal;
        self.constant = constant;
        self
    }

    /// Assign from raw `ax + by + cz + w = 0` coefficients
    pub fn set_components(&mut self, x: f32, y: f32, z: f32, w: f32) -> &mut Self {
        self.normal = Vec3::new(x, y, z);
        self.constant = w;
        self
    }

    /// Plane through `point` with the given normal
    pub fn set_from_normal_and_coplanar_point(&mut self, normal: Vec3, point: &Vec3) -> &mut Self {
        self.constant = -point.dot(&normal);
        self.normal = normal;
        self
    }

    /// Plane through three points, counter-clockwise winding facing the normal.
    ///
    /// Collinear points give a zero normal.
    pub fn set_from_coplanar_points(&mut self, a: &Vec3, b: &Vec3, c: &Vec3) -> &mut Self {
        let normal = (c - b).cross(&(a - b)).normalize_or_zero();
        self.set_from_normal_and_coplanar_point(normal, a)
    }

    /// Scale normal and constant so the normal is unit length.
    ///
    /// A zero normal is left unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.normal.magnitude();
        if length > 0.0 {
            self.normal /= length;
            self.constant /= length;
        }
        self
    }

    /// Flip the plane orientation
    pub fn negate(&mut self) -> &mut Self {
        self.normal = -self.normal;
        self.constant = -self.constant;
        self
    }

    /// Signed distance from plane to point
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Signed distance from the plane to the sphere surface
    pub fn distance_to_sphere(&self, sphere: &Sphere) -> f32 {
        self.distance_to_point(&sphere.center) - sphere.radius
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.distance_to_point(point)
    }

    /// The point of the plane closest to the origin
    pub fn coplanar_point(&self) -> Vec3 {
        self.normal * -self.constant
    }

    /// Reciprocal of [`Box3::intersects_plane`]
    pub fn intersects_box(&self, bounds: &Box3) -> bool {
        bounds.intersects_plane(self)
    }

    /// Reciprocal of [`Sphere::intersects_plane`]
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        sphere.intersects_plane(self)
    }

    /// True iff the triangle has vertices on both sides of, or on, the plane
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        let da = self.distance_to_point(&triangle.a);
        let db = self.distance_to_point(&triangle.b);
        let dc = self.distance_to_point(&triangle.c);
        da.min(db).min(dc) <= 0.0 && da.max(db).max(dc) >= 0.0
    }

    /// Transform by an affine matrix
    pub fn apply_matrix4(&mut self, matrix: &Mat4) -> &mut Self {
        let reference = self.coplanar_point().apply_matrix4(matrix);
        let normal = (matrix.normal_matrix() * self.normal).normalize_or_zero();
        self.set_from_normal_and_coplanar_point(normal, &reference)
    }

    /// Move the plane by `offset`
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.constant -= offset.dot(&self.normal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signed_distance() {
        let plane = Plane::new(Vec3::y(), -2.0);
        assert_relative_eq!(plane.distance_to_point(&Vec3::new(5.0, 3.0, 1.0)), 1.0);
        assert_relative_eq!(plane.distance_to_point(&Vec3::new(0.0, 0.0, 0.0)), -2.0);
        assert_relative_eq!(plane.distance_to_sphere(&Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0)), 2.0);
    }

    #[test]
    fn test_from_coplanar_points() {
        let mut plane = Plane::default();
        plane.set_from_coplanar_points(&Vec3::new(0.0, 1.0, 0.0), &Vec3::new(1.0, 1.0, 0.0), &Vec3::new(0.0, 1.0, -1.0));
        assert_relative_eq!(plane.normal.dot(&Vec3::y()).abs(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(plane.distance_to_point(&Vec3::new(3.0, 1.0, 7.0)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_zero_normal_unchanged() {
        let mut plane = Plane::new(Vec3::zeros(), 3.0);
        plane.normalize();
        assert_eq!(plane, Plane::new(Vec3::zeros(), 3.0));

        let mut scaled = Plane::new(Vec3::new(0.0, 2.0, 0.0), 4.0);
        scaled.normalize();
        assert_eq!(scaled, Plane::new(Vec3::y(), 2.0));
    }

    #[test]
    fn test_project_and_coplanar_point() {
        let plane = Plane::new(Vec3::z(), -1.0);
        assert_relative_eq!(plane.project_point(&Vec3::new(2.0, 3.0, 9.0)), Vec3::new(2.0, 3.0, 1.0));
        assert_relative_eq!(plane.coplanar_point(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_apply_matrix4_and_translate() {
        let mut plane = Plane::new(Vec3::y(), 0.0);
        plane.apply_matrix4(&Mat4::new_translation(&Vec3::new(0.0, 3.0, 0.0)));
        assert_relative_eq!(plane.constant, -3.0, epsilon = 1e-6);

        plane.translate(&Vec3::new(10.0, -3.0, 0.0));
        assert_relative_eq!(plane.constant, 0.0, epsilon = 1e-6);

        let mut rotated = Plane::new(Vec3::x(), -1.0);
        rotated.apply_matrix4(&Mat4::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2));
        assert_relative_eq!(rotated.normal, Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(rotated.constant, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_triangle_straddling() {
        let plane = Plane::new(Vec3::y(), 0.0);
        let straddling = Triangle::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        let above = Triangle::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        assert!(plane.intersects_triangle(&straddling));
        assert!(!plane.intersects_triangle(&above));
    }
}
