//! Scene graph
//!
//! Provides the object hierarchy and the resources its nodes render with.
//!
//! ## Update protocol
//!
//! ```text
//! edit local transforms (position / quaternion / scale)
//!      ↓
//! SceneGraph::update_all / update_matrix_world
//!      ↓
//! culling, bounds and raycasting read cached world matrices
//! ```
//!
//! Nothing recomposes world matrices implicitly. Queries issued between an
//! edit and the next update see the previous frame's transforms.

mod camera;
mod geometry;
mod material;
mod object3d;
mod raycaster;
mod scene_graph;

#[cfg(test)]
mod tests;

pub use camera::PerspectiveCamera;
pub use geometry::{BufferAttribute, BufferGeometry, NORMAL, POSITION};
pub use material::{Material, MaterialFeatures, MaterialKind, Side};
pub use object3d::{Object3D, ObjectKind};
pub use raycaster::{Face, Intersection, RaycastParams, Raycaster};
pub use scene_graph::{SceneError, SceneGraph};
