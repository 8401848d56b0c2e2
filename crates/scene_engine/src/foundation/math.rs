//! Math utilities and types
//!
//! Provides the fundamental vector, matrix and rotation types the scene graph
//! and bounding volumes are built on. Storage is delegated to `nalgebra`; the
//! extension traits add the handful of operations a scene graph needs that
//! `nalgebra` spells differently (homogeneous point transforms, TRS
//! composition and decomposition, Euler conversions).

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::compose(&self.position, &self.rotation, &self.scale)
    }

    /// Decompose a transformation matrix into position, rotation and scale.
    ///
    /// A negative determinant is folded into the x scale. If any scale
    /// component is zero the rotation cannot be recovered and is identity.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let mut sx = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        let sy = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let sz = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();

        if matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            sx = -sx;
        }

        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);
        let scale = Vec3::new(sx, sy, sz);

        let rotation = if sx == 0.0 || sy == 0.0 || sz == 0.0 {
            Quat::identity()
        } else {
            let rotation_matrix = Mat3::new(
                matrix.m11 / sx, matrix.m12 / sy, matrix.m13 / sz,
                matrix.m21 / sx, matrix.m22 / sy, matrix.m23 / sz,
                matrix.m31 / sx, matrix.m32 / sy, matrix.m33 / sz,
            );
            Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix))
        };

        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Combine this transform with another (`self` is the parent)
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Transform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_scale.component_mul(&(inv_rotation * -self.position));

        Transform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

/// Axis order in which Euler angles are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    /// Rotate about X, then Y, then Z (intrinsic)
    #[default]
    XYZ,
    /// Rotate about Y, then X, then Z
    YXZ,
    /// Rotate about Z, then X, then Y
    ZXY,
    /// Rotate about Z, then Y, then X
    ZYX,
    /// Rotate about Y, then Z, then X
    YZX,
    /// Rotate about X, then Z, then Y
    XZY,
}

impl EulerOrder {
    fn axes(self) -> [usize; 3] {
        match self {
            Self::XYZ => [0, 1, 2],
            Self::YXZ => [1, 0, 2],
            Self::ZXY => [2, 0, 1],
            Self::ZYX => [2, 1, 0],
            Self::YZX => [1, 2, 0],
            Self::XZY => [0, 2, 1],
        }
    }
}

/// Rotation expressed as three angles (radians) and an axis order
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    /// Angle about the X axis
    pub x: f32,
    /// Angle about the Y axis
    pub y: f32,
    /// Angle about the Z axis
    pub z: f32,
    /// Application order
    pub order: EulerOrder,
}

impl Euler {
    /// Create Euler angles with the default `XYZ` order
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            order: EulerOrder::XYZ,
        }
    }

    /// Create Euler angles with an explicit order
    pub fn with_order(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Convert to a unit quaternion.
    pub fn to_quaternion(&self) -> Quat {
        let angles = [self.x, self.y, self.z];
        let axes = [Vec3::x_axis(), Vec3::y_axis(), Vec3::z_axis()];

        self.order
            .axes()
            .iter()
            .fold(Quat::identity(), |acc, &axis| acc * Quat::from_axis_angle(&axes[axis], angles[axis]))
    }

    /// Recover Euler angles from a quaternion in the requested order
    pub fn from_quaternion(quaternion: &Quat, order: EulerOrder) -> Self {
        Self::from_rotation_matrix(quaternion.to_rotation_matrix().matrix(), order)
    }

    /// Recover Euler angles from the upper 3x3 of a pure rotation matrix.
    pub fn from_rotation_matrix(m: &Mat3, order: EulerOrder) -> Self {
        const GIMBAL: f32 = 0.999_999_9;

        let (m11, m12, m13) = (m.m11, m.m12, m.m13);
        let (m21, m22, m23) = (m.m21, m.m22, m.m23);
        let (m31, m32, m33) = (m.m31, m.m32, m.m33);

        let (x, y, z) = match order {
            EulerOrder::XYZ => {
                let y = m13.clamp(-1.0, 1.0).asin();
                if m13.abs() < GIMBAL {
                    ((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    (m32.atan2(m22), y, 0.0)
                }
            }
            EulerOrder::YXZ => {
                let x = (-m23.clamp(-1.0, 1.0)).asin();
                if m23.abs() < GIMBAL {
                    (x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    (x, (-m31).atan2(m11), 0.0)
                }
            }
            EulerOrder::ZXY => {
                let x = m32.clamp(-1.0, 1.0).asin();
                if m32.abs() < GIMBAL {
                    (x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    (x, 0.0, m21.atan2(m11))
                }
            }
            EulerOrder::ZYX => {
                let y = (-m31.clamp(-1.0, 1.0)).asin();
                if m31.abs() < GIMBAL {
                    (m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    (0.0, y, (-m12).atan2(m22))
                }
            }
            EulerOrder::YZX => {
                let z = m21.clamp(-1.0, 1.0).asin();
                if m21.abs() < GIMBAL {
                    ((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    (0.0, m13.atan2(m33), z)
                }
            }
            EulerOrder::XZY => {
                let z = (-m12.clamp(-1.0, 1.0)).asin();
                if m12.abs() < GIMBAL {
                    (m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    ((-m23).atan2(m33), 0.0, z)
                }
            }
        };

        Self { x, y, z, order }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Extension trait for Vec3
pub trait Vec3Ext {
    /// Normalize, leaving a zero-length vector as the zero vector
    fn normalize_or_zero(&self) -> Vec3;

    /// Transform as a point, including translation and the perspective divide
    fn apply_matrix4(&self, matrix: &Mat4) -> Vec3;

    /// Transform as a direction (upper 3x3 only) and normalize
    fn transform_direction(&self, matrix: &Mat4) -> Vec3;

    /// Componentwise minimum
    fn min_by_component(&self, other: &Vec3) -> Vec3;

    /// Componentwise maximum
    fn max_by_component(&self, other: &Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn normalize_or_zero(&self) -> Vec3 {
        let length = self.magnitude();
        if length > 0.0 { self / length } else { *self }
    }

    fn apply_matrix4(&self, m: &Mat4) -> Vec3 {
        let w = m.m41 * self.x + m.m42 * self.y + m.m43 * self.z + m.m44;
        let w = if w == 0.0 { 1.0 } else { 1.0 / w };

        Vec3::new(
            (m.m11 * self.x + m.m12 * self.y + m.m13 * self.z + m.m14) * w,
            (m.m21 * self.x + m.m22 * self.y + m.m23 * self.z + m.m24) * w,
            (m.m31 * self.x + m.m32 * self.y + m.m33 * self.z + m.m34) * w,
        )
    }

    fn transform_direction(&self, m: &Mat4) -> Vec3 {
        (m.fixed_view::<3, 3>(0, 0) * self).normalize_or_zero()
    }

    fn min_by_component(&self, other: &Vec3) -> Vec3 {
        self.zip_map(other, f32::min)
    }

    fn max_by_component(&self, other: &Vec3) -> Vec3 {
        self.zip_map(other, f32::max)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Compose a matrix from position, rotation and scale
    fn compose(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4;

    /// Decompose into position, rotation and scale
    fn decompose(&self) -> Transform;

    /// Translation column
    fn position(&self) -> Vec3;

    /// Largest scale factor over the three basis columns
    fn max_scale_on_axis(&self) -> f32;

    /// Inverse, or the zero matrix if the matrix is singular
    fn inverse_or_zero(&self) -> Mat4;

    /// Inverse transpose of the upper 3x3, for transforming normals
    fn normal_matrix(&self) -> Mat3;

    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a perspective projection matrix with clip-space depth in [-1, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix with clip-space depth in [-1, 1]
    fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4;

    /// Rotation whose +Z axis points from `target` towards `eye`, keeping `up` upright
    fn look_at_rotation(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn compose(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
        Mat4::new_translation(position)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(scale)
    }

    fn decompose(&self) -> Transform {
        Transform::from_matrix(self)
    }

    fn position(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }

    fn max_scale_on_axis(&self) -> f32 {
        let sx = self.m11 * self.m11 + self.m21 * self.m21 + self.m31 * self.m31;
        let sy = self.m12 * self.m12 + self.m22 * self.m22 + self.m32 * self.m32;
        let sz = self.m13 * self.m13 + self.m23 * self.m23 + self.m33 * self.m33;
        sx.max(sy).max(sz).sqrt()
    }

    fn inverse_or_zero(&self) -> Mat4 {
        self.try_inverse().unwrap_or_else(Mat4::zeros)
    }

    fn normal_matrix(&self) -> Mat3 {
        let upper = self.fixed_view::<3, 3>(0, 0).into_owned();
        upper.try_inverse().unwrap_or_else(Mat3::zeros).transpose()
    }

    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -2.0 * far * near / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
        let w = 1.0 / (right - left);
        let h = 1.0 / (top - bottom);
        let p = 1.0 / (far - near);

        Mat4::new(
            2.0 * w, 0.0, 0.0, -(right + left) * w,
            0.0, 2.0 * h, 0.0, -(top + bottom) * h,
            0.0, 0.0, -2.0 * p, -(far + near) * p,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn look_at_rotation(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let mut z = eye - target;
        if z.magnitude_squared() == 0.0 {
            // eye and target coincide
            z.z = 1.0;
        }
        let z = z.normalize();

        let mut x = up.cross(&z);
        if x.magnitude_squared() == 0.0 {
            // up and z are parallel, nudge z off the up axis
            let mut nudged = z;
            if up.z.abs() == 1.0 {
                nudged.x += 0.0001;
            } else {
                nudged.z += 0.0001;
            }
            x = up.cross(&nudged.normalize());
        }
        let x = x.normalize();
        let y = z.cross(&x);

        Mat4::new(
            x.x, y.x, z.x, 0.0,
            x.y, y.y, z.y, 0.0,
            x.z, y.z, z.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}
