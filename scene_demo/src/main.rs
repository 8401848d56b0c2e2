//! Scene engine demo
//!
//! Builds a small scene (a cube, a point cloud and a camera), then runs the
//! per-frame queries a renderer would: world matrix update, frustum culling
//! and a pick ray through the center of the screen.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),
}

/// Twelve triangles of a cube with the given half extent
fn cube(half: f32) -> BufferGeometry {
    let corners: Vec<Vec3> = (0..8)
        .map(|i| {
            let pick = |bit: u32| if i & bit == 0 { -half } else { half };
            Vec3::new(pick(1), pick(2), pick(4))
        })
        .collect();

    #[rustfmt::skip]
    let index = vec![
        0, 4, 6,  0, 6, 2, // -x
        1, 3, 7,  1, 7, 5, // +x
        0, 1, 5,  0, 5, 4, // -y
        2, 6, 7,  2, 7, 3, // +y
        0, 2, 3,  0, 3, 1, // -z
        4, 5, 7,  4, 7, 6, // +z
    ];

    let mut geometry = BufferGeometry::new().with_index(index);
    geometry.set_attribute(scene_engine::scene::POSITION, BufferAttribute::from_vec3s(&corners));
    geometry
}

/// A flat grid of points in the XZ plane
fn grid(count: usize, spacing: f32) -> BufferGeometry {
    let offset = (count as f32 - 1.0) * spacing * 0.5;
    let points: Vec<Vec3> = (0..count * count)
        .map(|i| Vec3::new((i % count) as f32 * spacing - offset, 0.0, (i / count) as f32 * spacing - offset))
        .collect();

    let mut geometry = BufferGeometry::new();
    geometry.set_attribute(scene_engine::scene::POSITION, BufferAttribute::from_vec3s(&points));
    geometry
}

fn load_config() -> Result<ApplicationConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &ApplicationConfig) -> Result<(), DemoError> {
    let mut graph = SceneGraph::with_config(config.scene.clone());

    let cube_geometry = graph.add_geometry(cube(0.5));
    let grid_geometry = graph.add_geometry(grid(8, 0.5));
    let cube_material = graph.add_material(Material::phong().with_name("cube").with_color(Vec3::new(0.8, 0.3, 0.2)));
    let grid_material = graph.add_material(Material::points().with_name("grid"));

    let world = graph.create_group("world");
    let cube = graph.create_mesh("cube", cube_geometry, cube_material)?;
    let floor = graph.create_points("floor", grid_geometry, grid_material)?;
    let hidden = graph.create_mesh("behind camera", cube_geometry, cube_material)?;
    graph.add(world, cube)?;
    graph.add(world, floor)?;
    graph.add(world, hidden)?;

    graph.get_mut(cube).ok_or(SceneError::UnknownObject(cube))?.rotate_y(0.5);
    graph.get_mut(floor).ok_or(SceneError::UnknownObject(floor))?.position = Vec3::new(0.0, -1.0, 0.0);
    graph.get_mut(hidden).ok_or(SceneError::UnknownObject(hidden))?.position = Vec3::new(0.0, 0.0, 12.0);

    let camera = graph.create_camera("camera", PerspectiveCamera::new(45.0, 16.0 / 9.0, 0.1, 100.0));
    graph.get_mut(camera).ok_or(SceneError::UnknownObject(camera))?.position = Vec3::new(0.0, 0.0, 5.0);
    graph.look_at(camera, &Vec3::zeros())?;

    graph.update_all();

    let bounds = graph.compute_bounds(world);
    log::info!("World bounds: min {:?} max {:?}", bounds.min, bounds.max);

    let frustum = graph.camera_frustum(camera)?;
    for id in graph.query_visible(&frustum) {
        if let Some(node) = graph.get(id) {
            log::info!("Visible: {}", node.name);
        }
    }

    let mut raycaster = Raycaster::from_config(&config.raycast);
    raycaster.set_from_camera(&graph, camera, 0.0, 0.0)?;
    let hits = raycaster.intersect_object(&graph, world, true);
    log::info!("Center pick ray hit {} objects", hits.len());
    for hit in &hits {
        let name = graph.get(hit.object).map_or("?", |node| node.name.as_str());
        log::info!("  {} at distance {:.3}, point {:?}", name, hit.distance, hit.point);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.engine.log_level);
    log::info!("Starting scene demo");

    run(&config)?;

    log::info!("Scene demo finished");
    Ok(())
}
