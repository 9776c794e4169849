//! Published simulation state shared between the simulation and renderers.
//!
//! Everything here is `Copy`: a renderer receives its own value and cannot
//! alias or mutate simulation state.

use std::time::Duration;

use glam::{Vec2, Vec3};

use crate::transform::Transform;

/// Pitch is clamped to this many degrees either side of level.
pub const PITCH_LIMIT_DEGREES: f32 = 90.0;

/// Maximum crosshair displacement from centre, in viewport percent.
pub const CROSSHAIR_LIMIT: f32 = 5.0;

/// Player position and view orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    /// World position; `y` is always the eye height.
    pub position: Vec3,
    /// Heading in degrees. Positive turns left (counter-clockwise from above).
    pub yaw_degrees: f32,
    /// Look angle in degrees, positive up, within `±PITCH_LIMIT_DEGREES`.
    pub pitch_degrees: f32,
}

impl PlayerPose {
    /// Level pose at the arena centre.
    pub fn spawn(eye_height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, eye_height, 0.0),
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_yaw_pitch_degrees(self.position, self.yaw_degrees, self.pitch_degrees)
    }

    /// Heading wrapped to `[0, 360)` for display.
    pub fn heading_degrees(&self) -> f32 {
        self.yaw_degrees.rem_euclid(360.0)
    }
}

/// Fire/reload state of the equipped weapon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeaponPhase {
    #[default]
    Idle,
    /// Recoil window open after a shot.
    Firing,
    /// Timed reload in progress (only with a non-zero reload duration).
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub ammo: u32,
    pub capacity: u32,
    pub phase: WeaponPhase,
}

/// Player bookkeeping shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub health: u32,
    pub armor: u32,
    pub money: u32,
    pub kills: u32,
    pub deaths: u32,
}

/// Cosmetic weapon attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Scope,
    Silencer,
    Grip,
    Laser,
}

impl Attachment {
    pub const ALL: [Attachment; 4] = [
        Attachment::Scope,
        Attachment::Silencer,
        Attachment::Grip,
        Attachment::Laser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Attachment::Scope => "Scope",
            Attachment::Silencer => "Silencer",
            Attachment::Grip => "Grip",
            Attachment::Laser => "Laser",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attachments {
    pub scope: bool,
    pub silencer: bool,
    pub grip: bool,
    pub laser: bool,
}

impl Attachments {
    pub fn is_fitted(&self, attachment: Attachment) -> bool {
        match attachment {
            Attachment::Scope => self.scope,
            Attachment::Silencer => self.silencer,
            Attachment::Grip => self.grip,
            Attachment::Laser => self.laser,
        }
    }

    /// Flip one attachment, returning its new state.
    pub fn toggle(&mut self, attachment: Attachment) -> bool {
        let slot = match attachment {
            Attachment::Scope => &mut self.scope,
            Attachment::Silencer => &mut self.silencer,
            Attachment::Grip => &mut self.grip,
            Attachment::Laser => &mut self.laser,
        };
        *slot = !*slot;
        *slot
    }
}

/// Result of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSnapshot {
    /// Number of ticks completed, starting at 1 for the first tick.
    pub tick: u64,
    /// Simulation clock at the end of the tick.
    pub time: Duration,
    pub pose: PlayerPose,
    pub weapon: WeaponStatus,
    pub vitals: Vitals,
    pub attachments: Attachments,
    /// Visual recoil kick in viewport percent, relative to screen centre.
    pub crosshair_offset: Vec2,
    /// True while the post-shot recoil window is open.
    pub is_aiming: bool,
    pub pointer_locked: bool,
}

impl SimulationSnapshot {
    /// State before the first tick.
    pub fn initial(pose: PlayerPose, weapon: WeaponStatus, vitals: Vitals) -> Self {
        Self {
            tick: 0,
            time: Duration::ZERO,
            pose,
            weapon,
            vitals,
            attachments: Attachments::default(),
            crosshair_offset: Vec2::ZERO,
            is_aiming: false,
            pointer_locked: false,
        }
    }

    /// Check the published invariants against an arena of half-extent
    /// `boundary_radius`.
    pub fn is_consistent(&self, boundary_radius: f32) -> bool {
        let p = self.pose.position;
        self.weapon.ammo <= self.weapon.capacity
            && self.pose.pitch_degrees.abs() <= PITCH_LIMIT_DEGREES
            && p.x.abs() <= boundary_radius
            && p.z.abs() <= boundary_radius
            && self.crosshair_offset.x.abs() <= CROSSHAIR_LIMIT
            && self.crosshair_offset.y.abs() <= CROSSHAIR_LIMIT
            && p.is_finite()
    }
}
