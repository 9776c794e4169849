//! Rigid transform built from a yaw/pitch pose.

use glam::{Mat4, Quat, Vec3};

/// Position plus rotation. Yaw is applied about world +Y, pitch about the
/// resulting local X, matching a first-person camera (rotation order YXZ).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Build from angles in degrees.
    pub fn from_yaw_pitch_degrees(position: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        Self {
            position,
            rotation: yaw_rotation(yaw_degrees) * Quat::from_rotation_x(pitch_degrees.to_radians()),
        }
    }

    /// Model matrix (camera-to-world for a camera transform).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// Rotation about world +Y only. Horizontal movement uses this so that
/// looking up or down never tilts the walking plane.
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(yaw_degrees.to_radians())
}
