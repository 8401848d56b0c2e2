//! Arena-backed transform hierarchy
//!
//! Nodes live in a slot map and refer to each other by [`ObjectId`]. Each node
//! has at most one parent, so the graph is a forest; `add` and `attach`
//! refuse edits that would close a cycle. Roots are kept in creation order
//! and children in insertion order, which fixes the pre-order traversal order.
//!
//! World matrices are only recomposed by the `update_*` methods. Queries
//! (`query_visible`, `compute_bounds`, raycasts) read the cached values.

use log::{debug, trace, warn};
use thiserror::Error;

use crate::core::config::SceneConfig;
use crate::foundation::collections::{GeometryId, MaterialId, ObjectId, SlotMap};
use crate::foundation::math::{Mat4Ext, Vec3};
use crate::spatial::{Box3, Frustum, Sphere};

use super::{BufferGeometry, Material, Object3D, ObjectKind, PerspectiveCamera};

/// Rejected structural edits and lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The object id is stale or from another graph
    #[error("Unknown object: {0:?}")]
    UnknownObject(ObjectId),

    /// The geometry id is stale or from another graph
    #[error("Unknown geometry: {0:?}")]
    UnknownGeometry(GeometryId),

    /// The material id is stale or from another graph
    #[error("Unknown material: {0:?}")]
    UnknownMaterial(MaterialId),

    /// The child is the parent or one of its ancestors
    #[error("Adding {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested parent
        parent: ObjectId,
        /// Requested child
        child: ObjectId,
    },

    /// The child already has a parent; use `attach` to move it
    #[error("{child:?} is already attached to {parent:?}")]
    AlreadyAttached {
        /// Node that was to be added
        child: ObjectId,
        /// Its current parent
        parent: ObjectId,
    },

    /// The node is not a direct child of the given parent
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Given parent
        parent: ObjectId,
        /// Given child
        child: ObjectId,
    },

    /// The node carries no camera
    #[error("{0:?} is not a camera")]
    NotACamera(ObjectId),
}

/// Scene graph owning nodes, geometries and materials
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: SlotMap<ObjectId, Object3D>,
    geometries: SlotMap<GeometryId, BufferGeometry>,
    materials: SlotMap<MaterialId, Material>,
    roots: Vec<ObjectId>,
    config: SceneConfig,
}

impl SceneGraph {
    /// Create an empty scene graph with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene graph whose new nodes follow `config`
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    // Shared resources

    /// Store a geometry for use by meshes and point clouds
    pub fn add_geometry(&mut self, geometry: BufferGeometry) -> GeometryId {
        self.geometries.insert(geometry)
    }

    /// Look up a geometry
    pub fn geometry(&self, id: GeometryId) -> Option<&BufferGeometry> {
        self.geometries.get(id)
    }

    /// Mutable geometry access
    pub fn geometry_mut(&mut self, id: GeometryId) -> Option<&mut BufferGeometry> {
        self.geometries.get_mut(id)
    }

    /// Store a material for use by meshes and point clouds
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    /// Look up a material
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Mutable material access
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    // Node creation

    /// Insert a node as a new root. Hierarchy links on `object` are discarded.
    pub fn create(&mut self, mut object: Object3D) -> ObjectId {
        object.parent = None;
        object.children.clear();
        let id = self.objects.insert(object);
        self.roots.push(id);
        debug!("Created {:?} '{}'", id, self.objects[id].name);
        id
    }

    fn new_object(&self, name: &str, kind: ObjectKind) -> Object3D {
        let mut object = Object3D::new(kind).with_name(name);
        object.matrix_auto_update = self.config.matrix_auto_update;
        object.up = Vec3::from(self.config.default_up);
        object
    }

    /// Create an empty group
    pub fn create_group(&mut self, name: &str) -> ObjectId {
        let object = self.new_object(name, ObjectKind::Group);
        self.create(object)
    }

    /// Create a triangle mesh over stored resources
    pub fn create_mesh(&mut self, name: &str, geometry: GeometryId, material: MaterialId) -> Result<ObjectId, SceneError> {
        self.check_resources(geometry, material)?;
        let object = self.new_object(name, ObjectKind::Mesh { geometry, material });
        Ok(self.create(object))
    }

    /// Create a point cloud over stored resources
    pub fn create_points(&mut self, name: &str, geometry: GeometryId, material: MaterialId) -> Result<ObjectId, SceneError> {
        self.check_resources(geometry, material)?;
        let object = self.new_object(name, ObjectKind::Points { geometry, material });
        Ok(self.create(object))
    }

    /// Create a perspective camera
    pub fn create_camera(&mut self, name: &str, camera: PerspectiveCamera) -> ObjectId {
        let object = self.new_object(name, ObjectKind::Camera(camera));
        self.create(object)
    }

    /// Copy a node, and with `recursive` its whole subtree, as a new root.
    ///
    /// Copies share geometries and materials with the originals.
    pub fn clone_object(&mut self, id: ObjectId, recursive: bool) -> Result<ObjectId, SceneError> {
        let source = self.node(id)?;
        let children = if recursive { source.children.clone() } else { Vec::new() };
        let copy = source.clone();
        let copy = self.create(copy);

        for child in children {
            let child_copy = self.clone_object(child, true)?;
            self.link(copy, child_copy);
        }
        Ok(copy)
    }

    fn check_resources(&self, geometry: GeometryId, material: MaterialId) -> Result<(), SceneError> {
        if !self.geometries.contains_key(geometry) {
            return Err(SceneError::UnknownGeometry(geometry));
        }
        if !self.materials.contains_key(material) {
            return Err(SceneError::UnknownMaterial(material));
        }
        Ok(())
    }

    // Node access

    /// Look up a node
    pub fn get(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    /// Mutable node access. Hierarchy links stay read-only.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    /// True iff the id refers to a live node
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True iff the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All nodes in arena order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> {
        self.objects.iter()
    }

    fn node(&self, id: ObjectId) -> Result<&Object3D, SceneError> {
        self.objects.get(id).ok_or(SceneError::UnknownObject(id))
    }

    fn node_mut(&mut self, id: ObjectId) -> Result<&mut Object3D, SceneError> {
        self.objects.get_mut(id).ok_or(SceneError::UnknownObject(id))
    }

    // Structure

    /// Nodes without a parent, in creation order
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Parent of a node
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).and_then(Object3D::parent)
    }

    /// Children of a node in insertion order; empty for unknown ids
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.objects.get(id).map(Object3D::children).unwrap_or_default()
    }

    /// True iff `ancestor` is a strict ancestor of `id`
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn check_acyclic(&self, parent: ObjectId, child: ObjectId) -> Result<(), SceneError> {
        if parent == child || self.is_ancestor(child, parent) {
            warn!("Rejected parenting {:?} under {:?}: cycle", child, parent);
            return Err(SceneError::Cycle { parent, child });
        }
        Ok(())
    }

    fn link(&mut self, parent: ObjectId, child: ObjectId) {
        self.roots.retain(|&root| root != child);
        self.objects[child].parent = Some(parent);
        self.objects[parent].children.push(child);
    }

    fn unlink(&mut self, child: ObjectId) {
        if let Some(parent) = self.objects[child].parent.take() {
            self.objects[parent].children.retain(|&c| c != child);
            self.roots.push(child);
        }
    }

    /// Append `child` to the children of `parent`.
    ///
    /// Fails if either node is unknown, if `child` is `parent` or one of its
    /// ancestors, or if `child` already has a parent. On failure the graph is
    /// unchanged.
    pub fn add(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), SceneError> {
        self.node(parent)?;
        let current_parent = self.node(child)?.parent;
        self.check_acyclic(parent, child)?;
        if let Some(current_parent) = current_parent {
            warn!("Rejected adding {:?} under {:?}: already under {:?}", child, parent, current_parent);
            return Err(SceneError::AlreadyAttached { child, parent: current_parent });
        }

        self.link(parent, child);
        debug!("Added {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Detach `child` from `parent`; the child becomes a root
    pub fn remove(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), SceneError> {
        if !self.node(parent)?.children.contains(&child) {
            warn!("Rejected removing {:?} from {:?}: not a child", child, parent);
            return Err(SceneError::NotAChild { parent, child });
        }

        self.unlink(child);
        debug!("Removed {:?} from {:?}", child, parent);
        Ok(())
    }

    /// Detach a node from its parent, if it has one
    pub fn remove_from_parent(&mut self, id: ObjectId) -> Result<(), SceneError> {
        match self.node(id)?.parent {
            Some(parent) => self.remove(parent, id),
            None => Ok(()),
        }
    }

    /// Detach every child of `parent`
    pub fn clear(&mut self, parent: ObjectId) -> Result<(), SceneError> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for &child in &children {
            self.objects[child].parent = None;
        }
        debug!("Cleared {} children of {:?}", children.len(), parent);
        self.roots.extend(children);
        Ok(())
    }

    /// Move `child` under `parent` while keeping its world transform.
    ///
    /// Unlike [`SceneGraph::add`], the child may already have a parent.
    pub fn attach(&mut self, parent: ObjectId, child: ObjectId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;
        self.check_acyclic(parent, child)?;

        self.update_world_matrix(parent, true, false)?;
        let mut to_parent_space = self.objects[parent].matrix_world.inverse_or_zero();
        if let Some(old_parent) = self.objects[child].parent {
            self.update_world_matrix(old_parent, true, false)?;
            to_parent_space *= self.objects[old_parent].matrix_world;
            self.unlink(child);
        }

        self.objects[child].apply_matrix4(&to_parent_space);
        self.link(parent, child);
        self.update_world_matrix(child, false, true)?;
        debug!("Attached {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Remove a node and its whole subtree from the graph.
    ///
    /// Returns the number of nodes dropped. Ids into the subtree go stale.
    pub fn destroy(&mut self, id: ObjectId) -> Result<usize, SceneError> {
        self.node(id)?;
        self.unlink(id);
        self.roots.retain(|&root| root != id);

        let doomed = self.subtree(id);
        for &node in &doomed {
            self.objects.remove(node);
        }
        debug!("Destroyed {} nodes under {:?}", doomed.len(), id);
        Ok(doomed.len())
    }

    // Transforms

    /// Recompute one node's local matrix
    pub fn update_matrix(&mut self, id: ObjectId) -> Result<(), SceneError> {
        self.node_mut(id)?.update_matrix();
        Ok(())
    }

    /// Bring the world matrices of a subtree up to date.
    ///
    /// Nodes with `matrix_auto_update` recompute their local matrix first.
    /// A node is recomposed with its parent's world matrix when it is flagged
    /// or `force` is set; recomposing a node forces its whole subtree.
    pub fn update_matrix_world(&mut self, id: ObjectId, force: bool) -> Result<(), SceneError> {
        self.node(id)?;
        self.update_matrix_world_recursive(id, force);
        Ok(())
    }

    fn update_matrix_world_recursive(&mut self, id: ObjectId, force: bool) {
        let parent_world = self.objects[id].parent.map(|parent| self.objects[parent].matrix_world);
        let node = &mut self.objects[id];
        if node.matrix_auto_update {
            node.update_matrix();
        }

        let mut force = force;
        if node.matrix_world_needs_update || force {
            node.matrix_world = parent_world.map_or(node.matrix, |world| world * node.matrix);
            node.matrix_world_needs_update = false;
            force = true;
        }

        for i in 0..self.objects[id].children.len() {
            let child = self.objects[id].children[i];
            self.update_matrix_world_recursive(child, force);
        }
    }

    /// Recompose one node's world matrix, optionally refreshing its ancestors
    /// first and its descendants afterwards
    pub fn update_world_matrix(&mut self, id: ObjectId, update_parents: bool, update_children: bool) -> Result<(), SceneError> {
        let parent = self.node(id)?.parent;
        if update_parents {
            if let Some(parent) = parent {
                self.update_world_matrix(parent, true, false)?;
            }
        }

        let parent_world = parent.map(|parent| self.objects[parent].matrix_world);
        let node = &mut self.objects[id];
        if node.matrix_auto_update {
            node.update_matrix();
        }
        node.matrix_world = parent_world.map_or(node.matrix, |world| world * node.matrix);

        if update_children {
            for i in 0..self.objects[id].children.len() {
                let child = self.objects[id].children[i];
                self.update_world_matrix(child, false, true)?;
            }
        }
        Ok(())
    }

    /// Update every tree of the forest
    pub fn update_all(&mut self) {
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.update_matrix_world_recursive(root, false);
        }
        trace!("Updated world matrices of {} trees", self.roots.len());
    }

    /// Rotate a node so it faces a world-space point.
    ///
    /// Cameras turn their -Z axis towards the target, other nodes +Z.
    pub fn look_at(&mut self, id: ObjectId, target: &Vec3) -> Result<(), SceneError> {
        self.update_world_matrix(id, true, false)?;

        let node = &self.objects[id];
        let mut rotation = node.look_at_quaternion(&node.world_position(), target);
        if let Some(parent) = node.parent {
            rotation = self.objects[parent].world_quaternion().inverse() * rotation;
        }
        self.objects[id].quaternion = rotation;
        Ok(())
    }

    // Traversal

    /// Visit a subtree in pre-order, children in insertion order
    pub fn traverse<F>(&self, id: ObjectId, mut visitor: F)
    where
        F: FnMut(ObjectId, &Object3D),
    {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.objects.get(current) else { continue };
            visitor(current, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// Like [`SceneGraph::traverse`], skipping hidden nodes and their subtrees
    pub fn traverse_visible<F>(&self, id: ObjectId, mut visitor: F)
    where
        F: FnMut(ObjectId, &Object3D),
    {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.objects.get(current) else { continue };
            if !node.visible {
                continue;
            }
            visitor(current, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// Visit the strict ancestors of a node, nearest first
    pub fn traverse_ancestors<F>(&self, id: ObjectId, mut visitor: F)
    where
        F: FnMut(ObjectId, &Object3D),
    {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            let Some(node) = self.objects.get(ancestor) else { break };
            visitor(ancestor, node);
            current = node.parent;
        }
    }

    /// Visit a subtree in pre-order with mutable access to each node.
    ///
    /// The visitor cannot restructure the tree; hierarchy links are private.
    pub fn traverse_mut<F>(&mut self, id: ObjectId, mut visitor: F)
    where
        F: FnMut(ObjectId, &mut Object3D),
    {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.objects.get_mut(current) else { continue };
            visitor(current, &mut *node);
            stack.extend(node.children.iter().rev());
        }
    }

    fn subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut nodes = Vec::new();
        self.traverse(id, |node, _| nodes.push(node));
        nodes
    }

    /// All strict descendants in pre-order
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut nodes = self.subtree(id);
        if !nodes.is_empty() {
            nodes.remove(0);
        }
        nodes
    }

    /// First node with this name in pre-order over all roots
    pub fn object_by_name(&self, name: &str) -> Option<ObjectId> {
        let mut stack: Vec<ObjectId> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.objects.get(current) else { continue };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    // Spatial queries

    /// World-space bounding sphere of a node's geometry
    pub fn world_bounding_sphere(&self, id: ObjectId) -> Option<Sphere> {
        let node = self.objects.get(id)?;
        let geometry = self.geometries.get(node.geometry()?)?;
        let mut sphere = geometry.bounding_sphere();
        if sphere.is_empty() {
            return None;
        }
        sphere.apply_matrix4(&node.matrix_world);
        Some(sphere)
    }

    /// Renderable nodes on visible paths whose bounds touch the frustum
    pub fn query_visible(&self, frustum: &Frustum) -> Vec<ObjectId> {
        let mut visible = Vec::new();
        for &root in &self.roots {
            self.traverse_visible(root, |id, node| {
                let Some(material) = node.material().and_then(|m| self.materials.get(m)) else { return };
                if !material.visible {
                    return;
                }
                if !self.config.frustum_culling || !node.frustum_culled || frustum.intersects_object(self, id) {
                    visible.push(id);
                }
            });
        }
        trace!("Frustum query: {} of {} nodes visible", visible.len(), self.objects.len());
        visible
    }

    /// Nodes whose world bounds (or, without geometry, world position) lie
    /// within `radius` of `center`
    pub fn query_radius(&self, center: &Vec3, radius: f32) -> Vec<ObjectId> {
        let probe = Sphere::new(*center, radius);
        let mut found = Vec::new();
        for &root in &self.roots {
            self.traverse(root, |id, node| {
                let hit = match self.world_bounding_sphere(id) {
                    Some(bounds) => bounds.intersects_sphere(&probe),
                    None => probe.contains_point(&node.world_position()),
                };
                if hit {
                    found.push(id);
                }
            });
        }
        found
    }

    /// World-space box around all geometry in a subtree
    pub fn compute_bounds(&self, id: ObjectId) -> Box3 {
        let mut bounds = Box3::empty();
        bounds.set_from_object(self, id);
        bounds
    }

    /// View frustum of a camera node, from its cached world matrix
    pub fn camera_frustum(&self, id: ObjectId) -> Result<Frustum, SceneError> {
        let node = self.node(id)?;
        let camera = node.camera().ok_or(SceneError::NotACamera(id))?;
        let view = node.matrix_world.inverse_or_zero();
        Ok(Frustum::from_matrix(&(camera.projection_matrix() * view)))
    }
}
