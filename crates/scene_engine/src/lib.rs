//! # Scene Engine
//!
//! The scene-graph core of a 3D renderer: bounding volumes, a transform
//! hierarchy and the queries a renderer runs against them.
//!
//! ## Features
//!
//! - **Bounding volumes**: [`Box3`](spatial::Box3), [`Sphere`](spatial::Sphere),
//!   [`Plane`](spatial::Plane) and [`Triangle`](spatial::Triangle), with
//!   separating-axis triangle/box tests
//! - **Transform hierarchy**: an arena-backed forest of
//!   [`Object3D`](scene::Object3D) nodes with explicit world-matrix updates
//! - **Queries**: frustum culling, radius queries and raycasting against
//!   meshes and point clouds
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let parent = graph.create_group("parent");
//! let child = graph.create_group("child");
//! graph.add(parent, child).unwrap();
//!
//! graph.get_mut(parent).unwrap().position = Vec3::new(1.0, 0.0, 0.0);
//! graph.get_mut(child).unwrap().position = Vec3::new(0.0, 2.0, 0.0);
//! graph.update_all();
//!
//! let world = graph.get(child).unwrap().world_position();
//! assert!((world - Vec3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod spatial;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            collections::{GeometryId, MaterialId, ObjectId},
            math::{Mat4, Quat, Transform, Vec3},
        },
        spatial::{Box3, Frustum, Plane, Ray, Sphere, Triangle},
        scene::{
            BufferAttribute, BufferGeometry, Intersection, Material, MaterialKind, Object3D,
            ObjectKind, PerspectiveCamera, Raycaster, SceneError, SceneGraph, Side,
        },
        config::{Config, ConfigError},
        core::config::{ApplicationConfig, EngineConfig, RaycastConfig, SceneConfig},
    };
}
