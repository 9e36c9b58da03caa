/// Translation, rotation and scale builders, plus TRS composition
use crate::error::{Error, Result};
use crate::matrix::Mat4;
use crate::vector::{Vec3, NORMALIZE_EPSILON};
use std::f32::consts::TAU;
use tracing::warn;

impl Mat4 {
    /// Identity with the translation column set to `(x, y, z, 1)`.
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_cols_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    /// Identity with the diagonal set to `(sx, sy, sz, 1)`.
    pub const fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_cols_array([
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed rotation about +X.
    pub fn rotation_x(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about +Y.
    pub fn rotation_y(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed rotation about +Z.
    pub fn rotation_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation of `radians` about an arbitrary axis (Rodrigues' formula).
    ///
    /// The axis does not need to be unit length. For `X`, `Y` and `Z` the
    /// result equals [`Mat4::rotation_x`], [`Mat4::rotation_y`] and
    /// [`Mat4::rotation_z`].
    ///
    /// Fails with [`Error::DegenerateAxis`] when the axis has (near) zero
    /// length.
    pub fn try_rotation(radians: f32, axis: Vec3) -> Result<Self> {
        if axis.length() <= NORMALIZE_EPSILON {
            return Err(Error::DegenerateAxis {
                context: "rotation axis has zero length",
            });
        }
        let Vec3 { x, y, z } = axis.normalize();
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;

        Ok(Self::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Like [`Mat4::try_rotation`], but a degenerate axis yields the
    /// identity matrix and a warning on the `tracing` channel.
    pub fn rotation(radians: f32, axis: Vec3) -> Self {
        match Self::try_rotation(radians, axis) {
            Ok(m) => m,
            Err(err) => {
                warn!(?axis, radians, "{err}; using identity");
                Self::IDENTITY
            }
        }
    }
}

/// Rotation state around three axes (in radians)
///
/// Angles are kept in `(-2π, 2π)` so long interactive sessions do not lose
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x = (self.x + dx) % TAU;
        self.y = (self.y + dy) % TAU;
        self.z = (self.z + dz) % TAU;
    }

    /// `Rz * Ry * Rx`: X is applied first.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::rotation_z(self.z) * Mat4::rotation_y(self.y) * Mat4::rotation_x(self.x)
    }
}

/// Local transform made of translation, rotation and scale.
///
/// The matrix is assembled as `T * R * S`: scale about the local origin,
/// then rotate, then translate. Every node in a scene uses this order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: RotationState,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: RotationState {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let t = self.translation;
        let s = self.scale;
        Mat4::translation(t.x, t.y, t.z) * self.rotation.to_matrix() * Mat4::scale(s.x, s.y, s.z)
    }

    /// Create a model-view-projection matrix
    ///
    /// `projection * (view * model)`, so the model matrix is applied first.
    pub fn mvp_matrix(model: &Mat4, view: &Mat4, projection: &Mat4) -> Mat4 {
        projection * &(view * model)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
