//! Equipped weapon: ammo, fire/reload state and timed recoil effects.

use std::time::Duration;

use engine_core::{Generation, TimerQueue, WeaponPhase, WeaponStatus, CROSSHAIR_LIMIT};
use glam::Vec2;
use rand::Rng;

use crate::catalog::WeaponArchetype;

/// Crosshair kick per shot at 100% recoil, in viewport percent.
const RECOIL_KICK_SCALE: f32 = 10.0;

/// Durations of the timed weapon effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponTiming {
    /// How long `Firing` (and the aiming flag) lasts after a shot.
    pub recoil_window: Duration,
    /// How long the crosshair takes to return to centre.
    pub crosshair_reset: Duration,
    /// Zero means reloads complete instantly.
    pub reload_duration: Duration,
}

impl Default for WeaponTiming {
    fn default() -> Self {
        Self {
            recoil_window: Duration::from_millis(200),
            crosshair_reset: Duration::from_millis(300),
            reload_duration: Duration::ZERO,
        }
    }
}

/// Effects scheduled by a shot, tagged with that shot's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShotEffect {
    RecoilEnd,
    CrosshairReset,
}

/// Scheduled by a timed reload, tagged with that reload's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReloadComplete;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    /// Magazine empty; nothing changed.
    DryFire,
    /// Blocked by a timed reload.
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Magazine refilled immediately.
    Refilled,
    /// Timed reload started.
    Started,
    AlreadyFull,
    InProgress,
}

/// The currently equipped weapon. Replaced wholesale on switch, which also
/// drops any pending timed effects.
#[derive(Debug)]
pub struct WeaponInstance {
    archetype: &'static WeaponArchetype,
    ammo: u32,
    phase: WeaponPhase,
    timing: WeaponTiming,
    /// Bumped on every shot; recoil/crosshair timers from earlier shots go stale.
    shot_gen: Generation,
    reload_gen: Generation,
    shot_timers: TimerQueue<ShotEffect>,
    reload_timers: TimerQueue<ReloadComplete>,
    /// Crosshair offset as of `kicked_at`; fades linearly to zero.
    crosshair: Vec2,
    kicked_at: Duration,
}

impl WeaponInstance {
    /// New instance with a full magazine.
    pub fn new(archetype: &'static WeaponArchetype, timing: WeaponTiming) -> Self {
        Self {
            archetype,
            ammo: archetype.capacity,
            phase: WeaponPhase::Idle,
            timing,
            shot_gen: Generation::default(),
            reload_gen: Generation::default(),
            shot_timers: TimerQueue::new(),
            reload_timers: TimerQueue::new(),
            crosshair: Vec2::ZERO,
            kicked_at: Duration::ZERO,
        }
    }

    pub fn is_recoiling(&self) -> bool {
        self.phase == WeaponPhase::Firing
    }

    /// Fire one round. Empty or reloading weapons are left untouched.
    pub fn fire(&mut self, now: Duration, rng: &mut impl Rng) -> FireOutcome {
        if self.phase == WeaponPhase::Reloading {
            return FireOutcome::Reloading;
        }
        if self.ammo == 0 {
            log::debug!("{}: dry fire", self.archetype.name);
            return FireOutcome::DryFire;
        }

        self.ammo -= 1;
        self.phase = WeaponPhase::Firing;
        self.shot_gen = self.shot_gen.next();

        let intensity = f32::from(self.archetype.recoil) / 100.0;
        let kick = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5)
            * intensity
            * RECOIL_KICK_SCALE;
        let limit = Vec2::splat(CROSSHAIR_LIMIT);
        self.crosshair = (self.crosshair_offset(now) + kick).clamp(-limit, limit);
        self.kicked_at = now;

        self.shot_timers
            .schedule(now + self.timing.recoil_window, self.shot_gen, ShotEffect::RecoilEnd);
        self.shot_timers.schedule(
            now + self.timing.crosshair_reset,
            self.shot_gen,
            ShotEffect::CrosshairReset,
        );
        FireOutcome::Fired
    }

    /// Refill the magazine. Calling it again while full (or while a timed
    /// reload runs) changes nothing.
    pub fn reload(&mut self, now: Duration) -> ReloadOutcome {
        if self.phase == WeaponPhase::Reloading {
            return ReloadOutcome::InProgress;
        }
        if self.ammo == self.archetype.capacity {
            return ReloadOutcome::AlreadyFull;
        }
        if self.timing.reload_duration.is_zero() {
            self.ammo = self.archetype.capacity;
            log::debug!("{}: reloaded", self.archetype.name);
            return ReloadOutcome::Refilled;
        }

        self.phase = WeaponPhase::Reloading;
        self.reload_gen = self.reload_gen.next();
        self.reload_timers
            .schedule(now + self.timing.reload_duration, self.reload_gen, ReloadComplete);
        log::debug!(
            "{}: reload started ({:?})",
            self.archetype.name,
            self.timing.reload_duration
        );
        ReloadOutcome::Started
    }

    /// Apply timed effects that have come due. Effects from superseded shots
    /// or reloads are dropped by the queues.
    pub fn update(&mut self, now: Duration) {
        for effect in self.shot_timers.drain_current(now, self.shot_gen) {
            match effect {
                ShotEffect::RecoilEnd => {
                    if self.phase == WeaponPhase::Firing {
                        self.phase = WeaponPhase::Idle;
                    }
                }
                ShotEffect::CrosshairReset => self.crosshair = Vec2::ZERO,
            }
        }
        let reloaded = !self
            .reload_timers
            .drain_current(now, self.reload_gen)
            .is_empty();
        if reloaded && self.phase == WeaponPhase::Reloading {
            self.ammo = self.archetype.capacity;
            self.phase = WeaponPhase::Idle;
            log::debug!("{}: reload finished", self.archetype.name);
        }
    }

    /// Current crosshair kick, fading linearly over the reset window.
    pub fn crosshair_offset(&self, now: Duration) -> Vec2 {
        if self.crosshair == Vec2::ZERO || self.timing.crosshair_reset.is_zero() {
            return Vec2::ZERO;
        }
        let since = now.saturating_sub(self.kicked_at).as_secs_f32();
        let remaining = 1.0 - since / self.timing.crosshair_reset.as_secs_f32();
        self.crosshair * remaining.clamp(0.0, 1.0)
    }

    /// Drop every pending timed effect.
    pub fn cancel_timers(&mut self) {
        self.shot_timers.clear();
        self.reload_timers.clear();
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.shot_timers.len() + self.reload_timers.len()
    }

    pub fn status(&self) -> WeaponStatus {
        WeaponStatus {
            id: self.archetype.id,
            name: self.archetype.name,
            ammo: self.ammo,
            capacity: self.archetype.capacity,
            phase: self.phase,
        }
    }
}
