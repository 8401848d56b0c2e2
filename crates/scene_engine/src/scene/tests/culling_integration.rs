//! Bounds, frustum culling and proximity queries over a small scene

use approx::assert_relative_eq;

use crate::core::config::SceneConfig;
use crate::foundation::collections::ObjectId;
use crate::foundation::math::Vec3;
use crate::scene::{BufferGeometry, Material, PerspectiveCamera, SceneGraph, POSITION};
use crate::spatial::{Box3, Sphere};

/// Unit cube corners as a point soup
fn cube_geometry() -> BufferGeometry {
    let mut positions = Vec::new();
    for &x in &[-1.0, 1.0] {
        for &y in &[-1.0, 1.0] {
            for &z in &[-1.0, 1.0] {
                positions.extend([x, y, z]);
            }
        }
    }
    BufferGeometry::from_positions(positions)
}

struct Scene {
    graph: SceneGraph,
    camera: ObjectId,
    ahead: ObjectId,
    behind: ObjectId,
    group: ObjectId,
    nested: ObjectId,
}

fn build(config: SceneConfig) -> Scene {
    let mut graph = SceneGraph::with_config(config);
    let geometry = graph.add_geometry(cube_geometry());
    let material = graph.add_material(Material::lambert());

    let camera = graph.create_camera("camera", PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0));
    let ahead = graph.create_mesh("ahead", geometry, material).unwrap();
    let behind = graph.create_mesh("behind", geometry, material).unwrap();
    let group = graph.create_group("group");
    let nested = graph.create_mesh("nested", geometry, material).unwrap();
    graph.add(group, nested).unwrap();

    graph.get_mut(ahead).unwrap().position = Vec3::new(0.0, 0.0, -10.0);
    graph.get_mut(behind).unwrap().position = Vec3::new(0.0, 0.0, 10.0);
    graph.get_mut(group).unwrap().position = Vec3::new(3.0, 0.0, -20.0);
    graph.get_mut(nested).unwrap().scale = Vec3::new(2.0, 2.0, 2.0);
    graph.update_all();

    Scene { graph, camera, ahead, behind, group, nested }
}

#[test]
fn test_query_visible_culls_objects_behind_camera() {
    let scene = build(SceneConfig::default());
    let frustum = scene.graph.camera_frustum(scene.camera).unwrap();

    assert!(frustum.intersects_object(&scene.graph, scene.ahead));
    assert!(!frustum.intersects_object(&scene.graph, scene.behind));
    assert!(!frustum.intersects_object(&scene.graph, scene.group));

    assert_eq!(scene.graph.query_visible(&frustum), vec![scene.ahead, scene.nested]);
}

#[test]
fn test_hidden_parents_and_culling_flags() {
    let mut scene = build(SceneConfig::default());
    let frustum = scene.graph.camera_frustum(scene.camera).unwrap();

    scene.graph.get_mut(scene.group).unwrap().visible = false;
    scene.graph.get_mut(scene.behind).unwrap().frustum_culled = false;
    assert_eq!(scene.graph.query_visible(&frustum), vec![scene.ahead, scene.behind]);

    let unculled = build(SceneConfig::default().with_frustum_culling(false));
    let frustum = unculled.graph.camera_frustum(unculled.camera).unwrap();
    assert_eq!(unculled.graph.query_visible(&frustum).len(), 3);
}

#[test]
fn test_compute_bounds_covers_subtree_in_world_space() {
    let scene = build(SceneConfig::default());

    let bounds = scene.graph.compute_bounds(scene.group);
    assert_relative_eq!(bounds.min, Vec3::new(1.0, -2.0, -22.0), epsilon = 1e-5);
    assert_relative_eq!(bounds.max, Vec3::new(5.0, 2.0, -18.0), epsilon = 1e-5);

    let mut everything = Box3::empty();
    for &root in scene.graph.roots() {
        everything.expand_by_object(&scene.graph, root);
    }
    assert_relative_eq!(everything.min, Vec3::new(-1.0, -2.0, -22.0), epsilon = 1e-5);
    assert_relative_eq!(everything.max, Vec3::new(5.0, 2.0, 11.0), epsilon = 1e-5);

    assert!(scene.graph.compute_bounds(scene.camera).is_empty());
}

#[test]
fn test_query_radius_uses_world_bounds() {
    let scene = build(SceneConfig::default());

    let near_origin = scene.graph.query_radius(&Vec3::zeros(), 1.0);
    assert_eq!(near_origin, vec![scene.camera]);

    let around_ahead = scene.graph.query_radius(&Vec3::new(0.0, 0.0, -7.0), 1.5);
    assert_eq!(around_ahead, vec![scene.ahead]);

    let sphere = scene.graph.world_bounding_sphere(scene.nested).unwrap();
    assert_relative_eq!(sphere.center, Vec3::new(3.0, 0.0, -20.0), epsilon = 1e-5);
    assert_relative_eq!(sphere.radius, 2.0 * 3.0_f32.sqrt(), epsilon = 1e-5);
    assert_eq!(scene.graph.world_bounding_sphere(scene.group), None::<Sphere>);
}

#[test]
fn test_geometry_edits_refresh_cached_bounds() {
    let mut scene = build(SceneConfig::default());
    let geometry = scene.graph.get(scene.ahead).unwrap().geometry().unwrap();

    scene
        .graph
        .geometry_mut(geometry)
        .unwrap()
        .attribute_mut(POSITION)
        .unwrap()
        .set_xyz(7, &Vec3::new(1.0, 1.0, 4.0));

    let bounds = scene.graph.compute_bounds(scene.ahead);
    assert_relative_eq!(bounds.max, Vec3::new(1.0, 1.0, -6.0), epsilon = 1e-5);
}
