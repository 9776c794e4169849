//! HUD (heads-up display): health, armor, money, ammo and the minimap.

use engine_core::{SimulationSnapshot, WeaponPhase};
use glam::Vec2;
use renderer::RenderAdapter;

use crate::map::{Prop, PROPS};

/// HUD configuration
#[derive(Debug, Clone)]
pub struct HudConfig {
    pub show_minimap: bool,
    /// Minimap edge length in pixels.
    pub minimap_size: f32,
    /// Arena half-extent the minimap covers.
    pub boundary_radius: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            show_minimap: true,
            minimap_size: 128.0,
            boundary_radius: 10.0,
        }
    }
}

/// Player marker on the minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapMarker {
    /// Pixels from the minimap's top-left corner (+Z is down).
    pub position: Vec2,
    /// Compass heading in degrees, clockwise from map-up (-Z).
    pub heading_degrees: f32,
}

/// All HUD data for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudFrame {
    pub health: u32,
    pub armor: u32,
    pub money: u32,
    pub weapon_name: &'static str,
    pub ammo_text: String,
    /// Remaining rounds as a 0..1 fraction for the ammo bar.
    pub ammo_fraction: f32,
    pub minimap: Option<MinimapMarker>,
    /// Shown while the pointer is free.
    pub lock_hint: Option<&'static str>,
    /// One-line summary for window titles and logs.
    pub title: String,
}

/// HUD system that generates display data
#[derive(Debug, Default)]
pub struct HudSystem {
    pub config: HudConfig,
}

impl HudSystem {
    pub fn new(config: HudConfig) -> Self {
        Self { config }
    }

    /// Map a world X/Z onto the minimap, clamped to its edges.
    pub fn to_minimap(&self, x: f32, z: f32) -> Vec2 {
        let r = self.config.boundary_radius.max(f32::EPSILON);
        let size = self.config.minimap_size;
        let u = ((x + r) / (2.0 * r)).clamp(0.0, 1.0);
        let v = ((z + r) / (2.0 * r)).clamp(0.0, 1.0);
        Vec2::new(u * size, v * size)
    }

    /// Static prop positions on the minimap.
    pub fn minimap_props(&self) -> Vec<(Prop, Vec2)> {
        PROPS
            .iter()
            .map(|p| (*p, self.to_minimap(p.position.x, p.position.z)))
            .collect()
    }
}

impl RenderAdapter for HudSystem {
    type Output = HudFrame;

    fn present(&mut self, snapshot: &SimulationSnapshot) -> HudFrame {
        let weapon = &snapshot.weapon;
        let vitals = &snapshot.vitals;

        let ammo_text = match weapon.phase {
            WeaponPhase::Reloading => format!("RELOADING {}/{}", weapon.ammo, weapon.capacity),
            _ => format!("{}/{}", weapon.ammo, weapon.capacity),
        };
        let ammo_fraction = if weapon.capacity > 0 {
            weapon.ammo as f32 / weapon.capacity as f32
        } else {
            0.0
        };

        let minimap = self.config.show_minimap.then(|| {
            let p = snapshot.pose.position;
            MinimapMarker {
                position: self.to_minimap(p.x, p.z),
                // Yaw is counter-clockwise; compass headings run clockwise.
                heading_degrees: (-snapshot.pose.yaw_degrees).rem_euclid(360.0),
            }
        });

        let lock_hint = (!snapshot.pointer_locked).then_some("Click to capture the mouse");

        let title = format!(
            "HP {} | AR {} | ${} | {} {} | X {:.1} Z {:.1}",
            vitals.health,
            vitals.armor,
            vitals.money,
            weapon.name,
            ammo_text,
            snapshot.pose.position.x,
            snapshot.pose.position.z,
        );

        HudFrame {
            health: vitals.health,
            armor: vitals.armor,
            money: vitals.money,
            weapon_name: weapon.name,
            ammo_text,
            ammo_fraction,
            minimap,
            lock_hint,
            title,
        }
    }
}
