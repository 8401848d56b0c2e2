//! Perspective camera parameters

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants::DEG_TO_RAD, Mat4, Mat4Ext};

/// Perspective projection parameters.
///
/// The camera's placement comes from the [`Object3D`](super::Object3D) that
/// carries it; it looks down its local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Zoom factor; narrows the effective field of view
    pub zoom: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    /// Create a camera with unit zoom
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self { fov, aspect, near, far, zoom: 1.0 }
    }

    /// Vertical field of view in radians after zoom
    pub fn effective_fov(&self) -> f32 {
        2.0 * ((self.fov * DEG_TO_RAD * 0.5).tan() / self.zoom).atan()
    }

    /// GL-style projection matrix (clip-space depth in [-1, 1])
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.effective_fov(), self.aspect, self.near, self.far)
    }

    /// Inverse projection, for unprojecting normalized device coordinates
    pub fn projection_matrix_inverse(&self) -> Mat4 {
        self.projection_matrix().inverse_or_zero()
    }
}
