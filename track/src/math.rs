//! Rigid transforms used to chain sections
//!
//! Section exits are authored relative to the section's own entry frame, so
//! the whole track is built by concatenating local transforms.

use glam::{EulerRot, Quat, Vec3};

/// Position + orientation frame (no scale).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Origin frame facing +Z
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pure translation
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Build from authored POD values: position and Euler angles in degrees
    /// (yaw about Y, pitch about X, roll about Z).
    pub fn from_pod(position: [f32; 3], euler_degrees: [f32; 3]) -> Self {
        let [yaw, pitch, roll] = euler_degrees;
        Self {
            position: Vec3::from_array(position),
            rotation: Quat::from_euler(
                EulerRot::YXZ,
                yaw.to_radians(),
                pitch.to_radians(),
                roll.to_radians(),
            ),
        }
    }

    /// Compose a transform expressed in this frame's local space.
    ///
    /// `rotation' = self.rotation * local.rotation`,
    /// `position' = self.position + self.rotation * local.position`.
    /// The resulting rotation is renormalized so long chains do not drift.
    pub fn then(&self, local: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Map a point from this frame's local space into the parent space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}
