//! Triangle primitive
//!
//! Degenerate triangles (coincident or collinear vertices) are valid values:
//! their normal is zero, their area is zero and they contain no points.

use serde::{Deserialize, Serialize};

use super::{Box3, Plane};
use crate::foundation::math::{Vec3, Vec3Ext};

/// A triangle with counter-clockwise front face
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Assign all three vertices
    pub fn set(&mut self, a: Vec3, b: Vec3, c: Vec3) -> &mut Self {
        self.a = a;
        self.b = b;
        self.c = c;
        self
    }

    /// Unit normal (right-hand rule), or zero for a degenerate triangle
    pub fn normal(&self) -> Vec3 {
        (self.c - self.b).cross(&(self.a - self.b)).normalize_or_zero()
    }

    /// Surface area
    pub fn area(&self) -> f32 {
        (self.c - self.b).cross(&(self.a - self.b)).magnitude() * 0.5
    }

    /// Calculates the centroid of the triangle
    pub fn midpoint(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Supporting plane
    pub fn plane(&self) -> Plane {
        let mut plane = Plane::default();
        plane.set_from_coplanar_points(&self.a, &self.b, &self.c);
        plane
    }

    /// Barycentric weights of `point` for `(a, b, c)`, or `None` if degenerate
    pub fn barycoord(&self, point: &Vec3) -> Option<Vec3> {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = point - self.a;

        let dot00 = v0.dot(&v0);
        let dot01 = v0.dot(&v1);
        let dot02 = v0.dot(&v2);
        let dot11 = v1.dot(&v1);
        let dot12 = v1.dot(&v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom == 0.0 {
            return None;
        }

        let inv_denom = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

        Some(Vec3::new(1.0 - u - v, v, u))
    }

    /// True iff `point`, projected onto the triangle's plane, falls inside it
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.barycoord(point)
            .is_some_and(|bary| bary.x >= 0.0 && bary.y >= 0.0 && bary.x + bary.y <= 1.0)
    }

    /// Reciprocal of [`Box3::intersects_triangle`]
    pub fn intersects_box(&self, bounds: &Box3) -> bool {
        bounds.intersects_triangle(self)
    }

    /// True iff the triangle faces against `direction`
    pub fn is_front_facing(&self, direction: &Vec3) -> bool {
        self.normal().dot(direction) < 0.0
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let edge_ab = self.b - self.a;
        let edge_ac = self.c - self.a;

        // Vertex region outside a
        let ap = point - self.a;
        let d1 = edge_ab.dot(&ap);
        let d2 = edge_ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.a;
        }

        // Vertex region outside b
        let bp = point - self.b;
        let d3 = edge_ab.dot(&bp);
        let d4 = edge_ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.b;
        }

        // Edge region ab
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.a + edge_ab * v;
        }

        // Vertex region outside c
        let cp = point - self.c;
        let d5 = edge_ab.dot(&cp);
        let d6 = edge_ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.c;
        }

        // Edge region ac
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.a + edge_ac * w;
        }

        // Edge region bc
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.b + (self.c - self.b) * w;
        }

        // Face region
        let denom = va + vb + vc;
        if denom == 0.0 {
            // collinear: one of the edge regions above already matched unless all vertices coincide
            return self.a;
        }
        let v = vb / denom;
        let w = vc / denom;
        self.a + edge_ab * v + edge_ac * w
    }
}
