//! Arena key types
//!
//! Scene nodes, geometries and materials live in slot maps owned by the
//! scene graph. Keys are generational, so a key that outlives its node is
//! detected instead of aliasing a newer node in the same slot.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle of an [`Object3D`](crate::scene::Object3D) in a scene graph
    pub struct ObjectId;

    /// Handle of a [`BufferGeometry`](crate::scene::BufferGeometry) shared between objects
    pub struct GeometryId;

    /// Handle of a [`Material`](crate::scene::Material) shared between objects
    pub struct MaterialId;
}
