//! Ray picking against meshes and point clouds
//!
//! Hits are reported in world space and sorted by distance from the ray
//! origin. Both object kinds first reject against the world-space bounding
//! sphere, then test their vertices in the object's local space.

use log::trace;

use crate::core::config::RaycastConfig;
use crate::foundation::collections::ObjectId;
use crate::foundation::math::{Mat4Ext, Vec3, Vec3Ext};
use crate::spatial::Ray;

use super::{BufferGeometry, Material, Object3D, ObjectKind, SceneError, SceneGraph, Side};

/// Per-kind picking tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastParams {
    /// World-space radius around each point that counts as a hit
    pub points_threshold: f32,
}

impl Default for RaycastParams {
    fn default() -> Self {
        Self { points_threshold: 1.0 }
    }
}

/// Triangle that was hit, by vertex index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
    /// Local-space face normal
    pub normal: Vec3,
}

/// A single ray hit
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// World-space distance from the ray origin
    pub distance: f32,
    /// For points: distance between the ray and the point
    pub distance_to_ray: Option<f32>,
    /// World-space hit point
    pub point: Vec3,
    /// Object that was hit
    pub object: ObjectId,
    /// For meshes: the triangle that was hit
    pub face: Option<Face>,
    /// For meshes: index of that triangle
    pub face_index: Option<usize>,
    /// For points: vertex index of the point
    pub index: Option<usize>,
}

/// World-space ray with a distance window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    /// Ray in world space
    pub ray: Ray,
    /// Hits closer than this are dropped
    pub near: f32,
    /// Hits further than this are dropped
    pub far: f32,
    /// Picking tolerances
    pub params: RaycastParams,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::from_config(&RaycastConfig::default())
    }
}

impl Raycaster {
    /// Create a raycaster; `direction` is normalized
    pub fn new(origin: Vec3, direction: Vec3, near: f32, far: f32) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            near,
            far,
            params: RaycastParams::default(),
        }
    }

    /// Raycaster with configured range and thresholds
    pub fn from_config(config: &RaycastConfig) -> Self {
        Self {
            ray: Ray::default(),
            near: config.near,
            far: config.far,
            params: RaycastParams {
                points_threshold: config.points_threshold,
            },
        }
    }

    /// Re-aim the ray; `direction` is normalized
    pub fn set(&mut self, origin: Vec3, direction: Vec3) {
        self.ray = Ray::new(origin, direction);
    }

    /// Aim from a camera through normalized device coordinates (`-1..=1` on
    /// both axes, +y up), using the camera's cached world matrix
    pub fn set_from_camera(&mut self, graph: &SceneGraph, camera: ObjectId, ndc_x: f32, ndc_y: f32) -> Result<(), SceneError> {
        let node = graph.get(camera).ok_or(SceneError::UnknownObject(camera))?;
        let projection = node.camera().ok_or(SceneError::NotACamera(camera))?;

        let origin = node.world_position();
        let through = Vec3::new(ndc_x, ndc_y, 0.5)
            .apply_matrix4(&projection.projection_matrix_inverse())
            .apply_matrix4(node.matrix_world());
        self.set(origin, through - origin);
        Ok(())
    }

    /// Hits on one object, and with `recursive` on its descendants
    pub fn intersect_object(&self, graph: &SceneGraph, id: ObjectId, recursive: bool) -> Vec<Intersection> {
        let mut intersections = Vec::new();
        self.collect(graph, id, recursive, &mut intersections);
        sort_by_distance(&mut intersections);
        intersections
    }

    /// Hits on several objects, merged and sorted
    pub fn intersect_objects(&self, graph: &SceneGraph, ids: &[ObjectId], recursive: bool) -> Vec<Intersection> {
        let mut intersections = Vec::new();
        for &id in ids {
            self.collect(graph, id, recursive, &mut intersections);
        }
        sort_by_distance(&mut intersections);
        intersections
    }

    fn collect(&self, graph: &SceneGraph, id: ObjectId, recursive: bool, out: &mut Vec<Intersection>) {
        if recursive {
            graph.traverse(id, |current, node| self.raycast(graph, current, node, out));
        } else if let Some(node) = graph.get(id) {
            self.raycast(graph, id, node, out);
        }
    }

    fn raycast(&self, graph: &SceneGraph, id: ObjectId, node: &Object3D, out: &mut Vec<Intersection>) {
        let (geometry, material, is_points) = match node.kind {
            ObjectKind::Mesh { geometry, material } => (geometry, material, false),
            ObjectKind::Points { geometry, material } => (geometry, material, true),
            ObjectKind::Group | ObjectKind::Camera(_) => return,
        };
        let (Some(geometry), Some(material)) = (graph.geometry(geometry), graph.material(material)) else {
            return;
        };

        let before = out.len();
        if is_points {
            self.raycast_points(id, node, geometry, out);
        } else {
            self.raycast_mesh(id, node, geometry, material, out);
        }
        trace!("Raycast {:?}: {} hits", id, out.len() - before);
    }

    fn raycast_mesh(&self, id: ObjectId, node: &Object3D, geometry: &BufferGeometry, material: &Material, out: &mut Vec<Intersection>) {
        let mut sphere = geometry.bounding_sphere();
        if sphere.is_empty() {
            return;
        }
        sphere.apply_matrix4(node.matrix_world());
        if !self.ray.intersects_sphere(&sphere) {
            return;
        }

        let mut local_ray = self.ray;
        local_ray.apply_matrix4(&node.matrix_world().inverse_or_zero());
        if !local_ray.intersects_box(&geometry.bounding_box()) {
            return;
        }

        for face_index in 0..geometry.face_count() {
            let (Some([a, b, c]), Some(triangle)) = (geometry.face_indices(face_index), geometry.triangle(face_index)) else {
                continue;
            };

            let hit = match material.side {
                Side::Back => local_ray.intersect_triangle(&triangle.c, &triangle.b, &triangle.a, true),
                Side::Front => local_ray.intersect_triangle(&triangle.a, &triangle.b, &triangle.c, true),
                Side::Double => local_ray.intersect_triangle(&triangle.a, &triangle.b, &triangle.c, false),
            };
            let Some(local_point) = hit else { continue };

            let point = local_point.apply_matrix4(node.matrix_world());
            let distance = (point - self.ray.origin).magnitude();
            if distance < self.near || distance > self.far {
                continue;
            }

            out.push(Intersection {
                distance,
                distance_to_ray: None,
                point,
                object: id,
                face: Some(Face { a, b, c, normal: triangle.normal() }),
                face_index: Some(face_index),
                index: None,
            });
        }
    }

    fn raycast_points(&self, id: ObjectId, node: &Object3D, geometry: &BufferGeometry, out: &mut Vec<Intersection>) {
        let threshold = self.params.points_threshold;
        let mut sphere = geometry.bounding_sphere();
        if sphere.is_empty() {
            return;
        }
        sphere.apply_matrix4(node.matrix_world());
        sphere.radius += threshold;
        if !self.ray.intersects_sphere(&sphere) {
            return;
        }

        let mut local_ray = self.ray;
        local_ray.apply_matrix4(&node.matrix_world().inverse_or_zero());
        // Threshold is in world units; approximate local units by the mean local scale
        let local_threshold = threshold / ((node.scale.x + node.scale.y + node.scale.z) / 3.0);
        let local_threshold_sq = local_threshold * local_threshold;

        let Some(positions) = geometry.positions() else { return };
        for i in 0..geometry.vertex_count() {
            let index = geometry.index().map_or(i, |indices| indices[i] as usize);
            if index >= positions.count() {
                continue;
            }

            let vertex = positions.vec3(index);
            let ray_distance_sq = local_ray.distance_sq_to_point(&vertex);
            if ray_distance_sq >= local_threshold_sq {
                continue;
            }

            let point = local_ray.closest_point_to_point(&vertex).apply_matrix4(node.matrix_world());
            let distance = (point - self.ray.origin).magnitude();
            if distance < self.near || distance > self.far {
                continue;
            }

            out.push(Intersection {
                distance,
                distance_to_ray: Some(ray_distance_sq.sqrt()),
                point,
                object: id,
                face: None,
                face_index: None,
                index: Some(index),
            });
        }
    }
}

fn sort_by_distance(intersections: &mut [Intersection]) {
    intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PerspectiveCamera;
    use approx::assert_relative_eq;

    fn quad() -> BufferGeometry {
        BufferGeometry::from_positions(vec![
            -1.0, -1.0, 0.0, //
            1.0, -1.0, 0.0, //
            1.0, 1.0, 0.0, //
            -1.0, 1.0, 0.0,
        ])
        .with_index(vec![0, 1, 2, 0, 2, 3])
    }

    fn quad_scene(side: Side) -> (SceneGraph, ObjectId) {
        let mut graph = SceneGraph::new();
        let geometry = graph.add_geometry(quad());
        let material = graph.add_material(Material::basic().with_side(side));
        let mesh = graph.create_mesh("quad", geometry, material).unwrap();
        graph.get_mut(mesh).unwrap().position = Vec3::new(0.0, 0.0, -5.0);
        graph.update_all();
        (graph, mesh)
    }

    #[test]
    fn test_mesh_front_face_hit() {
        let (graph, mesh) = quad_scene(Side::Front);
        let raycaster = Raycaster::new(Vec3::new(0.5, -0.2, 0.0), -Vec3::z(), 0.0, f32::INFINITY);

        let hits = raycaster.intersect_object(&graph, mesh, false);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].distance, 5.0, epsilon = 1e-5);
        assert_relative_eq!(hits[0].point, Vec3::new(0.5, -0.2, -5.0), epsilon = 1e-5);
        assert_eq!(hits[0].face_index, Some(0));
        assert_eq!(hits[0].face.map(|f| [f.a, f.b, f.c]), Some([0, 1, 2]));
        assert_relative_eq!(hits[0].face.unwrap().normal, Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_mesh_side_controls_back_hits() {
        let from_behind = Raycaster::new(Vec3::new(0.5, -0.2, -10.0), Vec3::z(), 0.0, f32::INFINITY);

        let (graph, mesh) = quad_scene(Side::Front);
        assert!(from_behind.intersect_object(&graph, mesh, false).is_empty());

        let (graph, mesh) = quad_scene(Side::Back);
        assert_eq!(from_behind.intersect_object(&graph, mesh, false).len(), 1);

        let (graph, mesh) = quad_scene(Side::Double);
        let hits = from_behind.intersect_object(&graph, mesh, false);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].distance, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_far_limit_drops_hits() {
        let (graph, mesh) = quad_scene(Side::Front);
        let raycaster = Raycaster::new(Vec3::new(0.5, -0.2, 0.0), -Vec3::z(), 0.0, 4.0);
        assert!(raycaster.intersect_object(&graph, mesh, false).is_empty());
    }

    #[test]
    fn test_points_threshold_and_sorting() {
        let mut graph = SceneGraph::new();
        let geometry = graph.add_geometry(BufferGeometry::from_positions(vec![
            0.0, 0.0, 0.0, //
            5.0, 0.0, 0.0, //
            0.0, 0.3, -3.0,
        ]));
        let material = graph.add_material(Material::points());
        let cloud = graph.create_points("cloud", geometry, material).unwrap();
        graph.update_all();

        let mut raycaster = Raycaster::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::z(), 0.0, f32::INFINITY);
        raycaster.params.points_threshold = 0.5;
        let hits = raycaster.intersect_object(&graph, cloud, false);

        assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![Some(0), Some(2)]);
        assert_relative_eq!(hits[0].distance, 5.0, epsilon = 1e-5);
        assert_relative_eq!(hits[1].distance, 8.0, epsilon = 1e-5);
        assert_relative_eq!(hits[1].distance_to_ray.unwrap(), 0.3, epsilon = 1e-5);
    }

    #[test]
    fn test_recursive_descends_into_children() {
        let (mut graph, mesh) = quad_scene(Side::Front);
        let group = graph.create_group("group");
        graph.add(group, mesh).unwrap();
        graph.update_all();

        let raycaster = Raycaster::new(Vec3::new(0.5, -0.2, 0.0), -Vec3::z(), 0.0, f32::INFINITY);
        assert!(raycaster.intersect_object(&graph, group, false).is_empty());
        assert_eq!(raycaster.intersect_object(&graph, group, true).len(), 1);
        assert_eq!(raycaster.intersect_objects(&graph, &[group, mesh], true).len(), 2);
    }

    #[test]
    fn test_set_from_camera_center_looks_down_minus_z() {
        let mut graph = SceneGraph::new();
        let camera = graph.create_camera("camera", PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0));
        graph.get_mut(camera).unwrap().position = Vec3::new(0.0, 0.0, 10.0);
        graph.update_all();

        let mut raycaster = Raycaster::default();
        raycaster.set_from_camera(&graph, camera, 0.0, 0.0).unwrap();
        assert_relative_eq!(raycaster.ray.origin, Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-5);
        assert_relative_eq!(raycaster.ray.direction, -Vec3::z(), epsilon = 1e-4);

        let group = graph.create_group("not a camera");
        assert_eq!(raycaster.set_from_camera(&graph, group, 0.0, 0.0), Err(SceneError::NotACamera(group)));
    }
}
