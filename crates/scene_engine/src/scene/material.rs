//! Surface materials
//!
//! A single material value describes every shading model. Which properties a
//! model uses is declared by its [`MaterialFeatures`]; setters for properties
//! outside that set are rejected.

use bitflags::bitflags;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

bitflags! {
    /// Properties a material kind understands
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFeatures: u32 {
        /// Diffuse color
        const COLOR = 1 << 0;
        /// Color texture
        const MAP = 1 << 1;
        /// Baked light map
        const LIGHT_MAP = 1 << 2;
        /// Ambient occlusion map
        const AO_MAP = 1 << 3;
        /// Emissive color and intensity
        const EMISSIVE = 1 << 4;
        /// Specular map
        const SPECULAR_MAP = 1 << 5;
        /// Alpha map
        const ALPHA_MAP = 1 << 6;
        /// Environment map
        const ENV_MAP = 1 << 7;
        /// Environment reflectivity
        const REFLECTIVITY = 1 << 8;
        /// Wireframe rendering
        const WIREFRAME = 1 << 9;
        /// Point size
        const SIZE = 1 << 10;
    }
}

/// Shading model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Unlit
    #[default]
    MeshBasic,
    /// Per-vertex diffuse lighting
    MeshLambert,
    /// Per-fragment specular lighting
    MeshPhong,
    /// Sized, unlit points
    Points,
}

impl MaterialKind {
    /// Properties this shading model understands
    pub fn features(self) -> MaterialFeatures {
        use MaterialFeatures as F;
        match self {
            Self::MeshBasic => {
                F::COLOR | F::MAP | F::LIGHT_MAP | F::AO_MAP | F::SPECULAR_MAP | F::ALPHA_MAP
                    | F::ENV_MAP | F::REFLECTIVITY | F::WIREFRAME
            }
            Self::MeshLambert | Self::MeshPhong => {
                F::COLOR | F::MAP | F::LIGHT_MAP | F::AO_MAP | F::EMISSIVE | F::SPECULAR_MAP
                    | F::ALPHA_MAP | F::ENV_MAP | F::REFLECTIVITY | F::WIREFRAME
            }
            Self::Points => F::COLOR | F::MAP | F::ALPHA_MAP | F::SIZE,
        }
    }
}

/// Which triangle faces render and take raycast hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// Counter-clockwise faces only
    #[default]
    Front,
    /// Clockwise faces only
    Back,
    /// Both faces
    Double,
}

/// Material parameters shared by any number of objects
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Debug name
    pub name: String,
    /// Face culling mode
    pub side: Side,
    /// Global alpha
    pub opacity: f32,
    /// Whether the material blends with what is behind it
    pub transparent: bool,
    /// Whether objects using this material are drawn
    pub visible: bool,
    kind: MaterialKind,
    color: Vec3,
    emissive: Vec3,
    emissive_intensity: f32,
    reflectivity: f32,
    wireframe: bool,
    size: f32,
    size_attenuation: bool,
}

impl Material {
    /// Create a material with the defaults of its kind
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            name: String::new(),
            side: Side::Front,
            opacity: 1.0,
            transparent: false,
            visible: true,
            kind,
            color: Vec3::new(1.0, 1.0, 1.0),
            emissive: Vec3::zeros(),
            emissive_intensity: 1.0,
            reflectivity: 1.0,
            wireframe: false,
            size: 1.0,
            size_attenuation: true,
        }
    }

    /// Unlit mesh material
    pub fn basic() -> Self {
        Self::new(MaterialKind::MeshBasic)
    }

    /// Lambert mesh material
    pub fn lambert() -> Self {
        Self::new(MaterialKind::MeshLambert)
    }

    /// Phong mesh material
    pub fn phong() -> Self {
        Self::new(MaterialKind::MeshPhong)
    }

    /// Point cloud material
    pub fn points() -> Self {
        Self::new(MaterialKind::Points)
    }

    /// Builder pattern: set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder pattern: set the face culling mode
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Builder pattern: set the color if supported
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.set_color(color);
        self
    }

    /// Shading model
    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// Properties this material understands
    pub fn features(&self) -> MaterialFeatures {
        self.kind.features()
    }

    /// True iff every property in `features` is understood
    pub fn supports(&self, features: MaterialFeatures) -> bool {
        self.features().contains(features)
    }

    fn check(&self, feature: MaterialFeatures) -> bool {
        let supported = self.supports(feature);
        if !supported {
            warn!("{:?} material '{}' has no {:?} property", self.kind, self.name, feature);
        }
        supported
    }

    /// Diffuse color (linear RGB)
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Set the diffuse color. Returns `false` if unsupported.
    pub fn set_color(&mut self, color: Vec3) -> bool {
        if !self.check(MaterialFeatures::COLOR) {
            return false;
        }
        self.color = color;
        true
    }

    /// Emissive color, or `None` if unsupported
    pub fn emissive(&self) -> Option<Vec3> {
        self.supports(MaterialFeatures::EMISSIVE).then_some(self.emissive)
    }

    /// Emissive intensity
    pub fn emissive_intensity(&self) -> f32 {
        self.emissive_intensity
    }

    /// Set emissive color and intensity. Returns `false` if unsupported.
    pub fn set_emissive(&mut self, color: Vec3, intensity: f32) -> bool {
        if !self.check(MaterialFeatures::EMISSIVE) {
            return false;
        }
        self.emissive = color;
        self.emissive_intensity = intensity;
        true
    }

    /// Environment reflectivity
    pub fn reflectivity(&self) -> f32 {
        self.reflectivity
    }

    /// Set environment reflectivity. Returns `false` if unsupported.
    pub fn set_reflectivity(&mut self, reflectivity: f32) -> bool {
        if !self.check(MaterialFeatures::REFLECTIVITY) {
            return false;
        }
        self.reflectivity = reflectivity;
        true
    }

    /// Wireframe flag; always `false` where unsupported
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Toggle wireframe rendering. Returns `false` if unsupported.
    pub fn set_wireframe(&mut self, wireframe: bool) -> bool {
        if !self.check(MaterialFeatures::WIREFRAME) {
            return false;
        }
        self.wireframe = wireframe;
        true
    }

    /// Point size, or `None` if unsupported
    pub fn size(&self) -> Option<f32> {
        self.supports(MaterialFeatures::SIZE).then_some(self.size)
    }

    /// Whether point size shrinks with distance
    pub fn size_attenuation(&self) -> bool {
        self.size_attenuation
    }

    /// Set point size and attenuation. Returns `false` if unsupported.
    pub fn set_size(&mut self, size: f32, attenuation: bool) -> bool {
        if !self.check(MaterialFeatures::SIZE) {
            return false;
        }
        self.size = size;
        self.size_attenuation = attenuation;
        true
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambert_capabilities() {
        let mut material = Material::lambert();
        assert!(material.supports(MaterialFeatures::COLOR | MaterialFeatures::EMISSIVE | MaterialFeatures::WIREFRAME));
        assert!(material.set_emissive(Vec3::new(1.0, 0.0, 0.0), 2.0));
        assert_eq!(material.emissive(), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!(!material.set_size(4.0, false));
        assert_eq!(material.size(), None);
    }

    #[test]
    fn test_unsupported_setters_leave_state() {
        let mut material = Material::points().with_color(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(material.color(), Vec3::new(0.5, 0.5, 0.5));
        assert!(!material.set_wireframe(true));
        assert!(!material.wireframe());
        assert!(!material.set_emissive(Vec3::new(1.0, 1.0, 1.0), 1.0));
        assert_eq!(material.emissive(), None);
        assert!(material.set_size(3.0, false));
        assert_eq!(material.size(), Some(3.0));
    }

    #[test]
    fn test_basic_has_no_emissive() {
        let material = Material::default();
        assert_eq!(material.kind(), MaterialKind::MeshBasic);
        assert!(!material.supports(MaterialFeatures::EMISSIVE));
        assert_eq!(material.side, Side::Front);
    }
}
