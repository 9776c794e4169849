//! Faked 3D: express the camera as CSS 3D transforms on a scene container.
//!
//! CSS space has +Y pointing down, so world Y and rotations about X are
//! mirrored. Rotations about Y keep their sign.

use engine_core::SimulationSnapshot;
use glam::Vec2;

use crate::RenderAdapter;

/// Weapon model offset (view space, metres) at the hip and while aiming.
const WEAPON_HIP: Vec2 = Vec2::new(0.3, -0.3);
const WEAPON_AIM: Vec2 = Vec2::new(0.2, -0.2);

#[derive(Debug, Clone)]
pub struct CssProjector {
    /// CSS `perspective` distance in pixels.
    pub perspective_px: f32,
    /// Pixels per world unit.
    pub pixels_per_unit: f32,
}

impl Default for CssProjector {
    fn default() -> Self {
        Self {
            perspective_px: 800.0,
            pixels_per_unit: 100.0,
        }
    }
}

/// Style values for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CssFrame {
    /// Value for the viewport's `perspective` property.
    pub perspective: String,
    /// Value for the scene container's `transform` property.
    pub scene_transform: String,
    /// Crosshair centre as `left`/`top` percentages.
    pub crosshair_left_percent: f32,
    pub crosshair_top_percent: f32,
    /// Crosshair grows slightly during the recoil window.
    pub crosshair_scale: f32,
    pub show_scope_dot: bool,
    pub weapon_offset: Vec2,
}

impl CssProjector {
    fn px(&self, units: f32) -> f32 {
        units * self.pixels_per_unit
    }

    pub fn scene_transform(&self, snapshot: &SimulationSnapshot) -> String {
        let pose = &snapshot.pose;
        let p = pose.position;
        format!(
            "translateZ({:.3}px) rotateX({:.3}deg) rotateY({:.3}deg) translate3d({:.3}px, {:.3}px, {:.3}px)",
            self.perspective_px,
            pose.pitch_degrees,
            -pose.yaw_degrees,
            -self.px(p.x),
            self.px(p.y),
            -self.px(p.z),
        )
    }
}

impl RenderAdapter for CssProjector {
    type Output = CssFrame;

    fn present(&mut self, snapshot: &SimulationSnapshot) -> CssFrame {
        let frame = CssFrame {
            perspective: format!("{:.3}px", self.perspective_px),
            scene_transform: self.scene_transform(snapshot),
            crosshair_left_percent: 50.0 + snapshot.crosshair_offset.x,
            crosshair_top_percent: 50.0 + snapshot.crosshair_offset.y,
            crosshair_scale: if snapshot.is_aiming { 1.1 } else { 1.0 },
            show_scope_dot: snapshot.attachments.scope,
            weapon_offset: if snapshot.is_aiming { WEAPON_AIM } else { WEAPON_HIP },
        };
        log::trace!("css transform: {}", frame.scene_transform);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{PlayerPose, Vec3, Vitals, WeaponPhase, WeaponStatus};

    fn snapshot() -> SimulationSnapshot {
        let mut pose = PlayerPose::spawn(1.6);
        pose.position = Vec3::new(2.0, 1.6, -3.5);
        pose.yaw_degrees = 45.0;
        pose.pitch_degrees = 10.0;
        SimulationSnapshot::initial(
            pose,
            WeaponStatus {
                id: "glock",
                name: "Glock-18",
                ammo: 20,
                capacity: 20,
                phase: WeaponPhase::Idle,
            },
            Vitals {
                health: 100,
                armor: 100,
                money: 0,
                kills: 0,
                deaths: 0,
            },
        )
    }

    #[test]
    fn scene_transform_inverts_camera() {
        let css = CssProjector::default();
        assert_eq!(
            css.scene_transform(&snapshot()),
            "translateZ(800.000px) rotateX(10.000deg) rotateY(-45.000deg) \
             translate3d(-200.000px, 160.000px, 350.000px)"
        );
    }

    #[test]
    fn crosshair_follows_offset_and_aim() {
        let mut snap = snapshot();
        snap.crosshair_offset = Vec2::new(-2.5, 1.0);
        snap.is_aiming = true;
        snap.attachments.scope = true;
        let frame = CssProjector::default().present(&snap);
        assert_eq!(frame.crosshair_left_percent, 47.5);
        assert_eq!(frame.crosshair_top_percent, 51.0);
        assert_eq!(frame.crosshair_scale, 1.1);
        assert!(frame.show_scope_dot);
        assert_eq!(frame.weapon_offset, WEAPON_AIM);
    }

    #[test]
    fn presenting_same_snapshot_twice_is_identical() {
        let snap = snapshot();
        let mut css = CssProjector::default();
        let first = css.present(&snap);
        let second = css.present(&snap);
        assert_eq!(first, second);
        // The snapshot itself is untouched.
        assert_eq!(snap, snapshot());
    }
}
