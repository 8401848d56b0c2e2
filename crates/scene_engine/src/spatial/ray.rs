//! Rays for picking and intersection queries
//!
//! The `intersect_*` methods return the hit point; `intersects_*` only answer
//! whether a hit exists. Only hits at non-negative ray parameters count.

use serde::{Deserialize, Serialize};

use super::{Box3, Plane, Sphere};
use crate::foundation::math::{Mat4, Vec3, Vec3Ext};

/// A half-line `origin + t * direction`, `t >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray (should be normalized)
    pub direction: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::zeros(),
            direction: -Vec3::z(),
        }
    }
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Assign origin and direction as given
    pub fn set(&mut self, origin: Vec3, direction: Vec3) -> &mut Self {
        self.origin = origin;
        self.direction = direction;
        self
    }

    /// Get a point along the ray at distance t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point the ray at `target`
    pub fn look_at(&mut self, target: &Vec3) -> &mut Self {
        self.direction = (target - self.origin).normalize_or_zero();
        self
    }

    /// Move the origin to `at(t)`
    pub fn recast(&mut self, t: f32) -> &mut Self {
        self.origin = self.at(t);
        self
    }

    /// Closest point of the ray to `point`; the origin if `point` is behind it
    pub fn closest_point_to_point(&self, point: &Vec3) -> Vec3 {
        let t = (point - self.origin).dot(&self.direction);
        if t < 0.0 {
            self.origin
        } else {
            self.at(t)
        }
    }

    /// Squared distance between the ray and `point`
    pub fn distance_sq_to_point(&self, point: &Vec3) -> f32 {
        (self.closest_point_to_point(point) - point).magnitude_squared()
    }

    /// Ray parameter at which the plane is crossed.
    ///
    /// A ray lying in the plane reports 0. Parallel rays off the plane and
    /// planes behind the origin report `None`.
    pub fn distance_to_plane(&self, plane: &Plane) -> Option<f32> {
        let denominator = plane.normal.dot(&self.direction);
        if denominator == 0.0 {
            return (plane.distance_to_point(&self.origin) == 0.0).then_some(0.0);
        }

        let t = -(self.origin.dot(&plane.normal) + plane.constant) / denominator;
        (t >= 0.0).then_some(t)
    }

    /// Point where the ray crosses the plane
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        self.distance_to_plane(plane).map(|t| self.at(t))
    }

    /// True iff the origin lies on the plane or the ray heads towards it
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        let distance = plane.distance_to_point(&self.origin);
        if distance == 0.0 {
            return true;
        }
        plane.normal.dot(&self.direction) * distance < 0.0
    }

    /// First point where the ray enters the sphere, or the exit point if the
    /// origin is inside
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<Vec3> {
        if sphere.is_empty() {
            return None;
        }
        let to_center = sphere.center - self.origin;
        let tca = to_center.dot(&self.direction);
        let d2 = to_center.dot(&to_center) - tca * tca;
        let radius2 = sphere.radius * sphere.radius;
        if d2 > radius2 {
            return None;
        }

        let thc = (radius2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t0 < 0.0 && t1 < 0.0 {
            return None;
        }
        Some(self.at(if t0 < 0.0 { t1 } else { t0 }))
    }

    /// True iff the ray passes within the sphere
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        !sphere.is_empty() && self.distance_sq_to_point(&sphere.center) <= sphere.radius * sphere.radius
    }

    /// Entry point into the box (slab method); the exit point if the origin
    /// is inside
    pub fn intersect_box(&self, bounds: &Box3) -> Option<Vec3> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let inv_dir = 1.0 / self.direction[axis];
            let (near, far) = if inv_dir >= 0.0 {
                (bounds.min[axis], bounds.max[axis])
            } else {
                (bounds.max[axis], bounds.min[axis])
            };
            let slab_min = (near - self.origin[axis]) * inv_dir;
            let slab_max = (far - self.origin[axis]) * inv_dir;

            if t_min > slab_max || slab_min > t_max {
                return None;
            }
            // NaN bounds (origin on a face, zero direction) leave the interval as is
            if slab_min > t_min {
                t_min = slab_min;
            }
            if slab_max < t_max {
                t_max = slab_max;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(self.at(if t_min >= 0.0 { t_min } else { t_max }))
    }

    /// True iff the ray touches the box
    pub fn intersects_box(&self, bounds: &Box3) -> bool {
        self.intersect_box(bounds).is_some()
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    ///
    /// With `backface_culling` set, triangles whose counter-clockwise side
    /// faces away from the ray are ignored.
    pub fn intersect_triangle(&self, a: &Vec3, b: &Vec3, c: &Vec3, backface_culling: bool) -> Option<Vec3> {
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = edge1.cross(&edge2);

        let mut d_dot_n = self.direction.dot(&normal);
        let sign = if d_dot_n > 0.0 {
            if backface_culling {
                return None;
            }
            1.0
        } else if d_dot_n < 0.0 {
            d_dot_n = -d_dot_n;
            -1.0
        } else {
            return None;
        };

        let diff = self.origin - a;
        let u = sign * self.direction.dot(&diff.cross(&edge2));
        if u < 0.0 {
            return None;
        }
        let v = sign * self.direction.dot(&edge1.cross(&diff));
        if v < 0.0 || u + v > d_dot_n {
            return None;
        }

        // Behind the origin?
        let q_dot_n = -sign * diff.dot(&normal);
        if q_dot_n < 0.0 {
            return None;
        }
        Some(self.at(q_dot_n / d_dot_n))
    }

    /// Transform origin as a point and direction as a direction
    pub fn apply_matrix4(&mut self, matrix: &Mat4) -> &mut Self {
        self.origin = self.origin.apply_matrix4(matrix);
        self.direction = self.direction.transform_direction(matrix);
        self
    }
}
