//! Object transforms expressed the way scenes are authored.
//!
//! A [`Transform`] keeps rotation as three independent angles so that an
//! animation can overwrite a single axis without touching the others. The
//! angles are composed in XYZ order (`Rx * Ry * Rz`) when the transform is
//! turned into an [`Instance`](crate::data_structures::instance::Instance) for
//! the GPU.

use cgmath::{Euler, Rad, Rotation3, Vector3};

/// Position, rotation (XYZ Euler angles in radians) and scale of a scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// The identity transform: at the origin, unrotated, unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    pub fn with_uniform_scale(mut self, factor: f32) -> Self {
        self.scale = Vector3::new(factor, factor, factor);
        self
    }

    /// Combined rotation in XYZ order, `Rx * Ry * Rz`.
    pub fn quaternion(&self) -> cgmath::Quaternion<f32> {
        cgmath::Quaternion::from_angle_x(self.rotation.x)
            * cgmath::Quaternion::from_angle_y(self.rotation.y)
            * cgmath::Quaternion::from_angle_z(self.rotation.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
