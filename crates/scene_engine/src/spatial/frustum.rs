//! View frustum for visibility culling

use serde::{Deserialize, Serialize};

use super::{Box3, Plane, Sphere};
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::SceneGraph;

/// Six inward-facing planes (right, left, bottom, top, far, near)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frustum {
    /// Frustum planes, normals pointing inside
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from a view-projection matrix
    ///
    /// This uses the Gribb-Hartmann method on a GL-style clip space
    /// (`-w <= x, y, z <= w`).
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let row = |i: usize| matrix.row(i).transpose();
        let w = row(3);
        let combos = [w - row(0), w + row(0), w + row(1), w - row(1), w - row(2), w + row(2)];

        let mut planes = [Plane::default(); 6];
        for (plane, coefficients) in planes.iter_mut().zip(combos) {
            plane
                .set_components(coefficients.x, coefficients.y, coefficients.z, coefficients.w)
                .normalize();
        }
        Self { planes }
    }

    /// True iff the point is on the inner side of every plane
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Check if a box is inside or intersects the frustum
    ///
    /// Conservative: boxes near a frustum corner may report `true` while
    /// lying just outside.
    pub fn intersects_box(&self, bounds: &Box3) -> bool {
        if bounds.is_empty() {
            return false;
        }
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal
            let p = Vec3::new(
                if plane.normal.x > 0.0 { bounds.max.x } else { bounds.min.x },
                if plane.normal.y > 0.0 { bounds.max.y } else { bounds.min.y },
                if plane.normal.z > 0.0 { bounds.max.z } else { bounds.min.z },
            );
            plane.distance_to_point(&p) >= 0.0
        })
    }

    /// True iff the sphere is not fully behind any plane
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        !sphere.is_empty()
            && self
                .planes
                .iter()
                .all(|plane| plane.distance_to_point(&sphere.center) >= -sphere.radius)
    }

    /// Test the world-space bounding sphere of an object's geometry.
    ///
    /// Objects without geometry, and unknown ids, never intersect.
    pub fn intersects_object(&self, graph: &SceneGraph, id: ObjectId) -> bool {
        graph
            .world_bounding_sphere(id)
            .is_some_and(|sphere| self.intersects_sphere(&sphere))
    }
}
