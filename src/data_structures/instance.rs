//! Placement of a model instance in the world.
//!
//! The model-to-world matrix is always composed as `T(position) · R · S(scale)`.

use cgmath::{Matrix3, Matrix4, SquareMatrix, Vector3};

/// World placement: translation, rotation matrix and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Only the upper-left 3x3 block is used and expected to be orthonormal.
    pub rotation: Matrix4<f32>,
    pub scale: f32,
}

impl Transform {
    /// Create a new transform with identity rotation and unit scale at `position`.
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: Matrix4::identity(),
            scale: 1.0,
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * self.rotation * Matrix4::from_scale(self.scale)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        let r = self.rotation;
        InstanceRaw {
            model: self.to_matrix().into(),
            // uniform scale keeps the rotation valid as normal matrix
            normal: Matrix3::from_cols(r.x.truncate(), r.y.truncate(), r.z.truncate()).into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 0.0))
    }
}

/**
 * The raw transform is the data draw code writes to the GPU per model.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
}
