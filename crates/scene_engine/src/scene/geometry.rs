//! Vertex buffers and geometry with cached bounding volumes
//!
//! Bounds are computed on first query and cached until vertex data changes.
//! Every mutating accessor on [`BufferGeometry`] drops the cache; code that
//! edits vertices through some other path calls
//! [`BufferGeometry::invalidate_bounds`] itself.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use log::trace;

use crate::foundation::math::{Mat3, Mat4, Vec3, Vec3Ext, Mat4Ext};
use crate::spatial::{Box3, Sphere, Triangle};

/// Name of the vertex position attribute
pub const POSITION: &str = "position";
/// Name of the vertex normal attribute
pub const NORMAL: &str = "normal";

/// Flat vertex data, `item_size` components per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct BufferAttribute {
    array: Vec<f32>,
    item_size: usize,
}

impl BufferAttribute {
    /// Wrap a flat array. A trailing partial item is ignored by `count`.
    pub fn new(array: Vec<f32>, item_size: usize) -> Self {
        Self {
            array,
            item_size: item_size.max(1),
        }
    }

    /// Three-component attribute from a list of vectors
    pub fn from_vec3s(vectors: &[Vec3]) -> Self {
        Self::new(vectors.iter().flat_map(|v| [v.x, v.y, v.z]).collect(), 3)
    }

    /// Number of complete items
    pub fn count(&self) -> usize {
        self.array.len() / self.item_size
    }

    /// Components per item
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Raw components
    pub fn array(&self) -> &[f32] {
        &self.array
    }

    /// Mutable raw components
    pub fn array_mut(&mut self) -> &mut [f32] {
        &mut self.array
    }

    /// Component `component` of item `index`, zero when out of range
    pub fn component(&self, index: usize, component: usize) -> f32 {
        if component >= self.item_size {
            return 0.0;
        }
        self.array.get(index * self.item_size + component).copied().unwrap_or(0.0)
    }

    /// First three components of item `index`; missing components read as zero
    pub fn vec3(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.component(index, 0),
            self.component(index, 1),
            self.component(index, 2),
        )
    }

    /// Overwrite the first three components of item `index`
    pub fn set_xyz(&mut self, index: usize, value: &Vec3) {
        let base = index * self.item_size;
        for (component, v) in value.iter().enumerate().take(self.item_size) {
            if let Some(slot) = self.array.get_mut(base + component) {
                *slot = *v;
            }
        }
    }

    /// Transform every item as a point
    pub fn apply_matrix4(&mut self, matrix: &Mat4) {
        for i in 0..self.count() {
            let transformed = self.vec3(i).apply_matrix4(matrix);
            self.set_xyz(i, &transformed);
        }
    }

    /// Transform every item by a normal matrix and renormalize
    pub fn apply_normal_matrix(&mut self, matrix: &Mat3) {
        for i in 0..self.count() {
            let transformed = (matrix * self.vec3(i)).normalize_or_zero();
            self.set_xyz(i, &transformed);
        }
    }
}

/// Named vertex attributes, optional triangle index and cached bounds
#[derive(Debug, Clone, Default)]
pub struct BufferGeometry {
    attributes: BTreeMap<String, BufferAttribute>,
    index: Option<Vec<u32>>,
    bounding_box: OnceCell<Box3>,
    bounding_sphere: OnceCell<Sphere>,
}

impl BufferGeometry {
    /// Create an empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry with a flat `(x, y, z)` position buffer
    pub fn from_positions(positions: Vec<f32>) -> Self {
        let mut geometry = Self::new();
        geometry.set_attribute(POSITION, BufferAttribute::new(positions, 3));
        geometry
    }

    /// Builder pattern: set the triangle index
    pub fn with_index(mut self, index: Vec<u32>) -> Self {
        self.set_index(Some(index));
        self
    }

    /// Insert or replace an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) {
        self.attributes.insert(name.into(), attribute);
        self.invalidate_bounds();
    }

    /// Remove an attribute, returning it
    pub fn delete_attribute(&mut self, name: &str) -> Option<BufferAttribute> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.invalidate_bounds();
        }
        removed
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    /// Mutable attribute access; drops cached bounds
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut BufferAttribute> {
        self.invalidate_bounds();
        self.attributes.get_mut(name)
    }

    /// True iff an attribute with this name exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The position attribute, if any
    pub fn positions(&self) -> Option<&BufferAttribute> {
        self.attribute(POSITION)
    }

    /// Triangle index, if the geometry is indexed
    pub fn index(&self) -> Option<&[u32]> {
        self.index.as_deref()
    }

    /// Set or clear the triangle index
    pub fn set_index(&mut self, index: Option<Vec<u32>>) {
        self.index = index;
    }

    /// Number of vertices the draw covers: index length, or position count
    pub fn vertex_count(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.positions().map_or(0, BufferAttribute::count),
        }
    }

    /// Vertex indices of triangle `face`
    pub fn face_indices(&self, face: usize) -> Option<[usize; 3]> {
        let first = face * 3;
        if first + 3 > self.vertex_count() {
            return None;
        }
        Some(match &self.index {
            Some(index) => [index[first] as usize, index[first + 1] as usize, index[first + 2] as usize],
            None => [first, first + 1, first + 2],
        })
    }

    /// Triangle `face` in local space
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let positions = self.positions()?;
        let [a, b, c] = self.face_indices(face)?;
        let count = positions.count();
        if a >= count || b >= count || c >= count {
            return None;
        }
        Some(Triangle::new(positions.vec3(a), positions.vec3(b), positions.vec3(c)))
    }

    /// Number of complete triangles
    pub fn face_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Drop cached bounds; they are recomputed on the next query
    pub fn invalidate_bounds(&mut self) {
        self.bounding_box.take();
        self.bounding_sphere.take();
    }

    /// Local-space bounding box; empty without positions
    pub fn bounding_box(&self) -> Box3 {
        *self.bounding_box.get_or_init(|| {
            let mut bounds = Box3::empty();
            if let Some(positions) = self.positions() {
                bounds.set_from_buffer_attribute(positions);
            }
            trace!("Computed geometry bounding box {:?} .. {:?}", bounds.min, bounds.max);
            bounds
        })
    }

    /// Local-space bounding sphere around the box center; empty without positions
    pub fn bounding_sphere(&self) -> Sphere {
        *self.bounding_sphere.get_or_init(|| {
            let Some(positions) = self.positions().filter(|p| p.count() > 0) else {
                return Sphere::empty();
            };

            let center = self.bounding_box().center();
            let max_radius_sq = (0..positions.count())
                .map(|i| (positions.vec3(i) - center).magnitude_squared())
                .fold(0.0_f32, f32::max);
            let sphere = Sphere::new(center, max_radius_sq.sqrt());
            trace!("Computed geometry bounding sphere {:?} r={}", sphere.center, sphere.radius);
            sphere
        })
    }

    /// Bake a transform into positions and normals
    pub fn apply_matrix4(&mut self, matrix: &Mat4) {
        if let Some(positions) = self.attributes.get_mut(POSITION) {
            positions.apply_matrix4(matrix);
        }
        if let Some(normals) = self.attributes.get_mut(NORMAL) {
            normals.apply_normal_matrix(&matrix.normal_matrix());
        }
        self.invalidate_bounds();
    }

    /// Bake a translation into positions
    pub fn translate(&mut self, offset: &Vec3) {
        self.apply_matrix4(&Mat4::new_translation(offset));
    }
}
