//! Bounding volumes and geometric primitives
//!
//! Provides boxes, spheres, planes, triangles, rays and frusta with the
//! intersection tests used for culling, picking and proximity queries.

mod box3;
mod frustum;
mod plane;
mod ray;
mod sphere;
mod triangle;

pub use box3::Box3;
pub use frustum::Frustum;
pub use plane::Plane;
pub use ray::Ray;
pub use sphere::Sphere;
pub use triangle::Triangle;
