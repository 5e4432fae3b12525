//! Base poses of scene props.
//!
//! An [`Instance`] is the persistent placement of a prop: where it stands, how it is turned and
//! how large it is. Rendering never writes to it; transient motion is layered on top per draw
//! (see [`crate::animation`]).

use cgmath::{Matrix4, One, Quaternion, Vector3};

/// Position, rotation (as quaternion), and scale of a prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn placed(position: Vector3<f32>, uniform_scale: f32) -> Self {
        Self {
            position,
            scale: Vector3::new(uniform_scale, uniform_scale, uniform_scale),
            ..Self::new()
        }
    }

    /// Model matrix `T * R * S`.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}
