//! Arena configuration (window, input, movement, weapon timing). Loaded from
//! config.ron at startup.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::player::MovementParams;
use crate::sim::SimParams;
use crate::weapons::WeaponTiming;

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Degrees of turn per mouse count.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Walking speed in units per second.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Half-extent of the square arena.
    #[serde(default = "default_boundary_radius")]
    pub boundary_radius: f32,
    #[serde(default = "default_eye_height")]
    pub eye_height: f32,
    /// Keep diagonal movement at walking speed.
    #[serde(default = "default_true")]
    pub normalize_diagonal: bool,
    #[serde(default = "default_recoil_ms")]
    pub recoil_ms: u64,
    #[serde(default = "default_crosshair_reset_ms")]
    pub crosshair_reset_ms: u64,
    /// 0 = instant reload.
    #[serde(default)]
    pub reload_ms: u64,
    #[serde(default = "default_starting_money")]
    pub starting_money: u32,
    #[serde(default = "default_starting_weapon")]
    pub starting_weapon: String,
    /// Run the simulation at a fixed rate instead of once per redraw.
    #[serde(default)]
    pub fixed_tick_hz: Option<f64>,
    /// Seed for recoil randomisation.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_sensitivity() -> f32 {
    0.2
}
fn default_move_speed() -> f32 {
    6.25
}
fn default_boundary_radius() -> f32 {
    10.0
}
fn default_eye_height() -> f32 {
    1.6
}
fn default_true() -> bool {
    true
}
fn default_recoil_ms() -> u64 {
    200
}
fn default_crosshair_reset_ms() -> u64 {
    300
}
fn default_starting_money() -> u32 {
    16_000
}
fn default_starting_weapon() -> String {
    "ak47".to_string()
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            sensitivity: default_sensitivity(),
            move_speed: default_move_speed(),
            boundary_radius: default_boundary_radius(),
            eye_height: default_eye_height(),
            normalize_diagonal: default_true(),
            recoil_ms: default_recoil_ms(),
            crosshair_reset_ms: default_crosshair_reset_ms(),
            reload_ms: 0,
            starting_money: default_starting_money(),
            starting_weapon: default_starting_weapon(),
            fixed_tick_hz: None,
            rng_seed: None,
        }
    }
}

impl ArenaConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_ron_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::debug!("No config at {:?} ({}), using defaults", path, e),
        }
        Self::default()
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialise config: {}", e),
        }
    }

    /// Simulation parameters. Tuning values that are not finite and positive
    /// are replaced by their defaults with a warning.
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            movement: MovementParams {
                sensitivity: positive_or_default("sensitivity", self.sensitivity, default_sensitivity()),
                move_speed: positive_or_default("move_speed", self.move_speed, default_move_speed()),
                boundary_radius: positive_or_default(
                    "boundary_radius",
                    self.boundary_radius,
                    default_boundary_radius(),
                ),
                eye_height: positive_or_default("eye_height", self.eye_height, default_eye_height()),
                normalize_diagonal: self.normalize_diagonal,
            },
            timing: WeaponTiming {
                recoil_window: Duration::from_millis(self.recoil_ms),
                crosshair_reset: Duration::from_millis(self.crosshair_reset_ms),
                reload_duration: Duration::from_millis(self.reload_ms),
            },
            starting_money: self.starting_money,
            seed: self.rng_seed,
        }
    }
}

fn positive_or_default(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("Invalid {} {} in config, using {}", name, value, default);
        default
    }
}

pub(crate) fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}
