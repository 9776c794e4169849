//! Player pose integration: mouse look, WASD movement and arena bounds.

use engine_core::{yaw_rotation, PlayerPose, PITCH_LIMIT_DEGREES};
use glam::{Vec2, Vec3};
use input::InputFrame;

/// Tuning for look and movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParams {
    /// Degrees of rotation per mouse count.
    pub sensitivity: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Half-extent of the square arena on X and Z.
    pub boundary_radius: f32,
    pub eye_height: f32,
    /// Scale diagonal input back to unit length.
    pub normalize_diagonal: bool,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            sensitivity: 0.2,
            move_speed: 6.25,
            boundary_radius: 10.0,
            eye_height: 1.6,
            normalize_diagonal: true,
        }
    }
}

impl MovementParams {
    /// Clamp a position into the arena and pin it to eye height.
    pub fn confine(&self, position: Vec3) -> Vec3 {
        let r = self.boundary_radius;
        Vec3::new(position.x.clamp(-r, r), self.eye_height, position.z.clamp(-r, r))
    }
}

/// Wrap an angle into `[-180, 180)`.
fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Apply a mouse delta to yaw/pitch. Non-finite deltas are ignored.
pub fn look(pose: PlayerPose, delta: Vec2, sensitivity: f32) -> PlayerPose {
    if !delta.is_finite() {
        log::warn!("Ignoring non-finite mouse delta {:?}", delta);
        return pose;
    }
    PlayerPose {
        yaw_degrees: wrap_degrees(pose.yaw_degrees - delta.x * sensitivity),
        pitch_degrees: (pose.pitch_degrees - delta.y * sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES),
        ..pose
    }
}

/// World-space displacement for held keys over `dt` seconds. Only yaw
/// matters; the walking plane never tilts with pitch.
pub fn displacement(pose: &PlayerPose, axes: Vec2, dt: f32, params: &MovementParams) -> Vec3 {
    // Forward is local -Z, strafe right is local +X.
    let mut local = Vec3::new(axes.x, 0.0, -axes.y);
    if params.normalize_diagonal && local.length_squared() > 1.0 {
        local = local.normalize();
    }
    yaw_rotation(pose.yaw_degrees) * local * params.move_speed * dt
}

/// Next pose from the current one and this tick's input.
pub fn integrate(pose: PlayerPose, frame: &InputFrame, dt: f32, params: &MovementParams) -> PlayerPose {
    let mut next = pose;
    if frame.pointer_locked {
        next = look(next, frame.mouse_delta, params.sensitivity);
    }

    let axes = frame.move_keys.axes();
    let step = if axes == Vec2::ZERO || dt <= 0.0 {
        Vec3::ZERO
    } else {
        displacement(&next, axes, dt, params)
    };
    next.position = params.confine(next.position + step);
    next
}
