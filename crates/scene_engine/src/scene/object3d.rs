//! Scene graph nodes
//!
//! Local transform edits do not touch the world matrix. The owning
//! [`SceneGraph`](super::SceneGraph) recomposes world matrices when asked to
//! (`update_matrix_world` and friends), so a frame can batch any number of
//! edits before one top-down update.

use crate::foundation::collections::{GeometryId, MaterialId, ObjectId};
use crate::foundation::math::{Euler, EulerOrder, Mat4, Mat4Ext, Quat, Rotation3, Unit, Vec3, Vec3Ext};

use super::PerspectiveCamera;

/// What a node renders as
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Pure transform node
    Group,
    /// Triangle mesh
    Mesh {
        /// Shared vertex data
        geometry: GeometryId,
        /// Shared material
        material: MaterialId,
    },
    /// Point cloud
    Points {
        /// Shared vertex data
        geometry: GeometryId,
        /// Shared material
        material: MaterialId,
    },
    /// Perspective camera looking down local -Z
    Camera(PerspectiveCamera),
}

/// A node of the transform hierarchy
#[derive(Debug, Clone)]
pub struct Object3D {
    /// Debug name, also used by `object_by_name`
    pub name: String,
    /// Render payload
    pub kind: ObjectKind,
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub quaternion: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Up direction used by `look_at`
    pub up: Vec3,
    /// Hidden nodes and their subtrees are skipped by visibility queries
    pub visible: bool,
    /// Whether visibility queries test this node's bounds against the frustum
    pub frustum_culled: bool,
    /// Sort key for renderers
    pub render_order: i32,
    /// Recompute the local matrix from position/quaternion/scale on world updates
    pub matrix_auto_update: bool,
    /// Forces the next `update_matrix_world` to recompose this node
    pub matrix_world_needs_update: bool,
    pub(super) matrix: Mat4,
    pub(super) matrix_world: Mat4,
    pub(super) parent: Option<ObjectId>,
    pub(super) children: Vec<ObjectId>,
}

impl Default for Object3D {
    fn default() -> Self {
        Self::new(ObjectKind::Group)
    }
}

impl Object3D {
    /// Detached node with identity transform
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            name: String::new(),
            kind,
            position: Vec3::zeros(),
            quaternion: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            up: Vec3::y(),
            visible: true,
            frustum_culled: true,
            render_order: 0,
            matrix_auto_update: true,
            matrix_world_needs_update: false,
            matrix: Mat4::identity(),
            matrix_world: Mat4::identity(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder pattern: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder pattern: set the local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: set the local rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.quaternion = rotation;
        self
    }

    /// Builder pattern: set the local scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Local matrix as of the last `update_matrix`
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// World matrix as of the last world update
    pub fn matrix_world(&self) -> &Mat4 {
        &self.matrix_world
    }

    /// Geometry of meshes and point clouds
    pub fn geometry(&self) -> Option<GeometryId> {
        match self.kind {
            ObjectKind::Mesh { geometry, .. } | ObjectKind::Points { geometry, .. } => Some(geometry),
            ObjectKind::Group | ObjectKind::Camera(_) => None,
        }
    }

    /// Material of meshes and point clouds
    pub fn material(&self) -> Option<MaterialId> {
        match self.kind {
            ObjectKind::Mesh { material, .. } | ObjectKind::Points { material, .. } => Some(material),
            ObjectKind::Group | ObjectKind::Camera(_) => None,
        }
    }

    /// Camera parameters, if this node is a camera
    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        match &self.kind {
            ObjectKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera parameters, if this node is a camera
    pub fn camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        match &mut self.kind {
            ObjectKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// True for camera nodes
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, ObjectKind::Camera(_))
    }

    /// Recompute the local matrix from position, quaternion and scale
    pub fn update_matrix(&mut self) {
        self.matrix = Mat4::compose(&self.position, &self.quaternion, &self.scale);
        self.matrix_world_needs_update = true;
    }

    /// Replace the local matrix and decompose it into position, quaternion and scale
    pub fn set_matrix(&mut self, matrix: Mat4) {
        let transform = matrix.decompose();
        self.position = transform.position;
        self.quaternion = transform.rotation;
        self.scale = transform.scale;
        self.matrix = matrix;
        self.matrix_world_needs_update = true;
    }

    /// Premultiply the local transform by `matrix`
    pub fn apply_matrix4(&mut self, matrix: &Mat4) {
        if self.matrix_auto_update {
            self.update_matrix();
        }
        self.set_matrix(matrix * self.matrix);
    }

    /// Premultiply the local rotation by `rotation`
    pub fn apply_quaternion(&mut self, rotation: &Quat) {
        self.quaternion = rotation * self.quaternion;
    }

    /// Local rotation as Euler angles in the given order
    pub fn rotation_euler(&self, order: EulerOrder) -> Euler {
        Euler::from_quaternion(&self.quaternion, order)
    }

    /// Set the local rotation from Euler angles
    pub fn set_rotation_from_euler(&mut self, euler: &Euler) {
        self.quaternion = euler.to_quaternion();
    }

    /// Set the local rotation from a normalized axis and an angle in radians
    pub fn set_rotation_from_axis_angle(&mut self, axis: &Vec3, angle: f32) {
        self.quaternion = Quat::from_axis_angle(&Unit::new_unchecked(*axis), angle);
    }

    /// Rotate around a normalized axis in local space
    pub fn rotate_on_axis(&mut self, axis: &Vec3, angle: f32) {
        self.quaternion *= Quat::from_axis_angle(&Unit::new_unchecked(*axis), angle);
    }

    /// Rotate around a normalized axis in world space.
    ///
    /// Assumes no rotated ancestors.
    pub fn rotate_on_world_axis(&mut self, axis: &Vec3, angle: f32) {
        self.quaternion = Quat::from_axis_angle(&Unit::new_unchecked(*axis), angle) * self.quaternion;
    }

    /// Rotate around the local X axis
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::x(), angle);
    }

    /// Rotate around the local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::y(), angle);
    }

    /// Rotate around the local Z axis
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::z(), angle);
    }

    /// Move along a normalized axis given in local space
    pub fn translate_on_axis(&mut self, axis: &Vec3, distance: f32) {
        self.position += self.quaternion * axis * distance;
    }

    /// Move along the local X axis
    pub fn translate_x(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::x(), distance);
    }

    /// Move along the local Y axis
    pub fn translate_y(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::y(), distance);
    }

    /// Move along the local Z axis
    pub fn translate_z(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::z(), distance);
    }

    /// Local point to world space, using the cached world matrix
    pub fn local_to_world(&self, point: &Vec3) -> Vec3 {
        point.apply_matrix4(&self.matrix_world)
    }

    /// World point to local space; singular world matrices collapse to zero
    pub fn world_to_local(&self, point: &Vec3) -> Vec3 {
        point.apply_matrix4(&self.matrix_world.inverse_or_zero())
    }

    /// Translation of the cached world matrix
    pub fn world_position(&self) -> Vec3 {
        self.matrix_world.position()
    }

    /// Rotation of the cached world matrix
    pub fn world_quaternion(&self) -> Quat {
        self.matrix_world.decompose().rotation
    }

    /// Scale of the cached world matrix
    pub fn world_scale(&self) -> Vec3 {
        self.matrix_world.decompose().scale
    }

    /// World-space +Z axis of the node, normalized
    pub fn world_direction(&self) -> Vec3 {
        Vec3::z().transform_direction(&self.matrix_world)
    }

    /// Rotation that turns this node towards `target`, given its world position.
    ///
    /// Cameras aim their -Z axis at the target; everything else aims +Z.
    pub(super) fn look_at_quaternion(&self, world_position: &Vec3, target: &Vec3) -> Quat {
        let rotation = if self.is_camera() {
            Mat4::look_at_rotation(world_position, target, &self.up)
        } else {
            Mat4::look_at_rotation(target, world_position, &self.up)
        };
        let basis = rotation.fixed_view::<3, 3>(0, 0).into_owned();
        Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
    }
}
