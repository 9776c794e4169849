//! Simulation tick driver.
//!
//! [`Simulation`] owns all mutable gameplay state. Each tick polls the input
//! sampler, applies fire and reload, integrates the player pose and publishes
//! an immutable [`SimulationSnapshot`]. Nothing else writes pose or weapon
//! state.

use std::time::Duration;

use engine_core::{Attachment, Attachments, PlayerPose, SimulationSnapshot, MAX_FRAME_DELTA};
use input::InputSampler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::catalog::{self, CatalogError, WeaponArchetype};
use crate::ledger::{Ledger, LedgerError};
use crate::player::{self, MovementParams};
use crate::weapons::{FireOutcome, WeaponInstance, WeaponTiming};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("simulation has been shut down")]
    Disposed,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub movement: MovementParams,
    pub timing: WeaponTiming,
    pub starting_money: u32,
    /// Fixed RNG seed for reproducible recoil; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            movement: MovementParams::default(),
            timing: WeaponTiming::default(),
            starting_money: 16_000,
            seed: None,
        }
    }
}

pub struct Simulation {
    params: SimParams,
    /// Simulation clock: sum of all tick deltas.
    now: Duration,
    tick: u64,
    pose: PlayerPose,
    weapon: WeaponInstance,
    ledger: Ledger,
    attachments: Attachments,
    rng: StdRng,
    last: SimulationSnapshot,
    disposed: bool,
}

impl Simulation {
    pub fn new(params: SimParams, starting_weapon: &'static WeaponArchetype) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let pose = PlayerPose::spawn(params.movement.eye_height);
        let weapon = WeaponInstance::new(starting_weapon, params.timing);
        let ledger = Ledger::new(params.starting_money);
        let last = SimulationSnapshot::initial(pose, weapon.status(), ledger.vitals());
        log::info!(
            "Simulation ready: {} equipped, ${} in the bank",
            starting_weapon.name,
            ledger.money()
        );
        Self {
            params,
            now: Duration::ZERO,
            tick: 0,
            pose,
            weapon,
            ledger,
            attachments: Attachments::default(),
            rng,
            last,
            disposed: false,
        }
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.last
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), SimulationError> {
        if self.disposed {
            Err(SimulationError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Advance by `dt` (capped to [`MAX_FRAME_DELTA`]) and publish.
    pub fn tick(
        &mut self,
        input: &mut InputSampler,
        dt: Duration,
    ) -> Result<SimulationSnapshot, SimulationError> {
        self.ensure_live()?;
        let dt = dt.min(MAX_FRAME_DELTA);
        self.now += dt;
        self.tick += 1;

        // Timers due by now land before this tick's actions.
        self.weapon.update(self.now);

        let frame = input.poll();
        for _ in 0..frame.fire_presses {
            if self.weapon.fire(self.now, &mut self.rng) != FireOutcome::Fired {
                break;
            }
        }
        if frame.reload_triggered {
            self.weapon.reload(self.now);
        }
        self.pose = player::integrate(self.pose, &frame, dt.as_secs_f32(), &self.params.movement);

        self.last = self.compose(frame.pointer_locked);
        debug_assert!(self.last.is_consistent(self.params.movement.boundary_radius));
        log::trace!(
            "tick {}: pos {:?} yaw {:.1} pitch {:.1} ammo {}/{}",
            self.tick,
            self.last.pose.position,
            self.last.pose.yaw_degrees,
            self.last.pose.pitch_degrees,
            self.last.weapon.ammo,
            self.last.weapon.capacity
        );
        Ok(self.last)
    }

    fn compose(&self, pointer_locked: bool) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            time: self.now,
            pose: self.pose,
            weapon: self.weapon.status(),
            vitals: self.ledger.vitals(),
            attachments: self.attachments,
            crosshair_offset: self.weapon.crosshair_offset(self.now),
            is_aiming: self.weapon.is_recoiling(),
            pointer_locked,
        }
    }

    /// Equip `archetype` with a full magazine. Pending recoil/reload effects
    /// of the old weapon are cancelled.
    pub fn switch_weapon(&mut self, archetype: &'static WeaponArchetype) -> Result<(), SimulationError> {
        self.ensure_live()?;
        self.weapon.cancel_timers();
        self.weapon = WeaponInstance::new(archetype, self.params.timing);
        log::info!(
            "Equipped {} ({:?}: damage {}, accuracy {}%, range {}%, fire rate {})",
            archetype.name,
            archetype.class,
            archetype.damage,
            archetype.accuracy,
            archetype.range,
            archetype.fire_rate
        );
        Ok(())
    }

    /// Free pick from the armoury.
    pub fn select(&mut self, id: &str) -> Result<&'static WeaponArchetype, SimulationError> {
        self.ensure_live()?;
        let archetype = catalog::lookup(id)?;
        self.switch_weapon(archetype)?;
        Ok(archetype)
    }

    /// Buy and equip. Nothing changes unless the debit succeeds.
    pub fn purchase(&mut self, id: &str) -> Result<&'static WeaponArchetype, SimulationError> {
        self.ensure_live()?;
        let archetype = catalog::lookup(id)?;
        match self.ledger.debit(archetype.price) {
            Ok(remaining) => {
                log::info!("Bought {} for ${} (${} left)", archetype.name, archetype.price, remaining);
            }
            Err(e) => {
                log::info!("Cannot buy {}: {}", archetype.name, e);
                return Err(e.into());
            }
        }
        self.switch_weapon(archetype)?;
        Ok(archetype)
    }

    pub fn toggle_attachment(&mut self, attachment: Attachment) -> Result<bool, SimulationError> {
        self.ensure_live()?;
        let fitted = self.attachments.toggle(attachment);
        log::debug!("{} {}", attachment.label(), if fitted { "fitted" } else { "removed" });
        Ok(fitted)
    }

    /// Tear down: cancel pending timed effects, drop buffered input and refuse
    /// further ticks.
    pub fn shutdown(&mut self, input: &mut InputSampler) {
        if self.disposed {
            return;
        }
        self.weapon.cancel_timers();
        input.reset();
        self.disposed = true;
        log::info!("Simulation shut down after {} ticks", self.tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::WeaponPhase;
    use input::{ElementState, KeyCode, MouseButton};

    const TICK: Duration = Duration::from_micros(16_667);

    fn sim() -> Simulation {
        let params = SimParams {
            seed: Some(42),
            ..SimParams::default()
        };
        Simulation::new(params, catalog::lookup("ak47").unwrap())
    }

    fn tap(input: &mut InputSampler, key: KeyCode) {
        input.process_keyboard(key, ElementState::Pressed);
        input.process_keyboard(key, ElementState::Released);
    }

    #[test]
    fn thirty_presses_empty_the_rifle_and_the_31st_is_a_no_op() {
        let mut s = sim();
        let mut input = InputSampler::new();
        let mut snap = s.snapshot();
        for _ in 0..30 {
            tap(&mut input, KeyCode::Space);
            snap = s.tick(&mut input, TICK).unwrap();
        }
        assert_eq!(snap.weapon.ammo, 0);
        tap(&mut input, KeyCode::Space);
        snap = s.tick(&mut input, TICK).unwrap();
        assert_eq!(snap.weapon.ammo, 0);
    }

    #[test]
    fn reload_key_refills_empty_magazine() {
        let mut s = sim();
        let mut input = InputSampler::new();
        for _ in 0..30 {
            tap(&mut input, KeyCode::Space);
        }
        assert_eq!(s.tick(&mut input, TICK).unwrap().weapon.ammo, 0);
        tap(&mut input, KeyCode::KeyR);
        assert_eq!(s.tick(&mut input, TICK).unwrap().weapon.ammo, 30);
        tap(&mut input, KeyCode::KeyR);
        assert_eq!(s.tick(&mut input, TICK).unwrap().weapon.ammo, 30);
    }

    #[test]
    fn fire_then_reload_in_same_tick_leaves_full_magazine() {
        let mut s = sim();
        let mut input = InputSampler::new();
        tap(&mut input, KeyCode::Space);
        tap(&mut input, KeyCode::KeyR);
        let snap = s.tick(&mut input, TICK).unwrap();
        assert_eq!(snap.weapon.ammo, 30);
        assert!(snap.is_aiming);
    }

    #[test]
    fn holding_forward_moves_along_negative_z_then_clamps() {
        let mut s = sim();
        let mut input = InputSampler::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        let n = 20;
        let mut snap = s.snapshot();
        for _ in 0..n {
            snap = s.tick(&mut input, TICK).unwrap();
        }
        let speed = s.params().movement.move_speed;
        let expected = -(n as f32) * speed * TICK.as_secs_f32();
        assert!((snap.pose.position.z - expected).abs() < 1e-3);

        for _ in 0..600 {
            snap = s.tick(&mut input, TICK).unwrap();
        }
        assert_eq!(snap.pose.position.z, -s.params().movement.boundary_radius);
        assert!(snap.is_consistent(s.params().movement.boundary_radius));
    }

    #[test]
    fn mouse_look_only_while_locked() {
        let mut s = sim();
        let mut input = InputSampler::new();
        input.process_mouse_motion((100.0, 0.0));
        assert_eq!(s.tick(&mut input, TICK).unwrap().pose.yaw_degrees, 0.0);

        input.set_pointer_locked(true);
        input.process_mouse_motion((100.0, 0.0));
        let snap = s.tick(&mut input, TICK).unwrap();
        let sens = s.params().movement.sensitivity;
        assert!((snap.pose.yaw_degrees + 100.0 * sens).abs() < 1e-4);
        assert!(snap.pointer_locked);
    }

    #[test]
    fn purchase_above_funds_changes_nothing() {
        let params = SimParams {
            starting_money: 1000,
            seed: Some(1),
            ..SimParams::default()
        };
        let mut s = Simulation::new(params, catalog::lookup("glock").unwrap());
        let mut input = InputSampler::new();
        let err = s.purchase("awp").unwrap_err();
        assert_eq!(
            err,
            SimulationError::Ledger(LedgerError::InsufficientFunds {
                price: 4750,
                available: 1000
            })
        );
        let snap = s.tick(&mut input, TICK).unwrap();
        assert_eq!(snap.vitals.money, 1000);
        assert_eq!(snap.weapon.id, "glock");
    }

    #[test]
    fn purchase_debits_and_equips_full_magazine() {
        let mut s = sim();
        let mut input = InputSampler::new();
        tap(&mut input, KeyCode::Space);
        s.tick(&mut input, TICK).unwrap();
        assert_eq!(s.purchase("awp").unwrap().id, "awp");
        let snap = s.tick(&mut input, TICK).unwrap();
        assert_eq!(snap.vitals.money, 16_000 - 4750);
        assert_eq!(snap.weapon.id, "awp");
        assert_eq!(snap.weapon.ammo, 10);
        assert!(!snap.is_aiming);
    }

    #[test]
    fn unknown_weapon_is_reported() {
        let mut s = sim();
        assert!(matches!(s.select("bazooka"), Err(SimulationError::Catalog(_))));
        assert!(matches!(s.purchase("bazooka"), Err(SimulationError::Catalog(_))));
        assert_eq!(s.snapshot().vitals.money, 16_000);
    }

    #[test]
    fn switch_cancels_recoil_from_previous_weapon() {
        let mut s = sim();
        let mut input = InputSampler::new();
        tap(&mut input, KeyCode::Space);
        let snap = s.tick(&mut input, TICK).unwrap();
        assert!(snap.is_aiming);
        assert_eq!(snap.weapon.phase, WeaponPhase::Firing);

        s.select("m4a4").unwrap();
        let snap = s.tick(&mut input, TICK).unwrap();
        assert!(!snap.is_aiming);
        assert_eq!(snap.crosshair_offset, glam::Vec2::ZERO);

        // Well past the old recoil/crosshair deadlines nothing resurfaces.
        let mut last = snap;
        for _ in 0..30 {
            last = s.tick(&mut input, TICK).unwrap();
        }
        assert_eq!(last.weapon.phase, WeaponPhase::Idle);
        assert_eq!(last.weapon.ammo, 30);
    }

    #[test]
    fn recoil_flag_clears_after_window() {
        let mut s = sim();
        let mut input = InputSampler::new();
        input.set_pointer_locked(true);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(s.tick(&mut input, TICK).unwrap().is_aiming);
        let mut snap = s.snapshot();
        for _ in 0..13 {
            snap = s.tick(&mut input, TICK).unwrap();
        }
        // 14 ticks * 16.667 ms > 200 ms
        assert!(!snap.is_aiming);
        assert_eq!(snap.weapon.ammo, 29);
    }

    #[test]
    fn attachments_are_published() {
        let mut s = sim();
        let mut input = InputSampler::new();
        assert_eq!(s.toggle_attachment(Attachment::Scope), Ok(true));
        assert!(s.tick(&mut input, TICK).unwrap().attachments.scope);
    }

    #[test]
    fn shutdown_refuses_further_work() {
        let mut s = sim();
        let mut input = InputSampler::new();
        input.set_pointer_locked(true);
        tap(&mut input, KeyCode::Space);
        s.shutdown(&mut input);
        assert!(s.is_disposed());
        assert!(!input.is_pointer_locked());
        assert_eq!(s.tick(&mut input, TICK), Err(SimulationError::Disposed));
        assert_eq!(s.purchase("glock"), Err(SimulationError::Disposed));
        assert_eq!(s.snapshot().weapon.ammo, 30);
    }

    #[test]
    fn disposed_wins_over_unknown_weapon() {
        let mut s = sim();
        s.shutdown(&mut InputSampler::new());
        assert_eq!(s.select("bogus"), Err(SimulationError::Disposed));
        assert_eq!(s.purchase("bogus"), Err(SimulationError::Disposed));
        assert_eq!(s.select("awp"), Err(SimulationError::Disposed));
    }

    #[test]
    fn long_frame_is_capped() {
        let mut s = sim();
        let mut input = InputSampler::new();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        let snap = s.tick(&mut input, Duration::from_secs(5)).unwrap();
        assert_eq!(snap.time, MAX_FRAME_DELTA);
        let expected = s.params().movement.move_speed * MAX_FRAME_DELTA.as_secs_f32();
        assert!((snap.pose.position.x - expected).abs() < 1e-4);
    }

    #[test]
    fn every_snapshot_is_consistent_under_random_input() {
        use rand::Rng;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut s = sim();
        let mut input = InputSampler::new();
        input.set_pointer_locked(true);
        let keys = [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::Space,
            KeyCode::KeyR,
        ];
        let radius = s.params().movement.boundary_radius;
        let mut last_ammo = s.snapshot().weapon.ammo;
        for _ in 0..3000 {
            let key = keys[rng.gen_range(0..keys.len())];
            let state = if rng.gen_bool(0.5) {
                ElementState::Pressed
            } else {
                ElementState::Released
            };
            let reloading = key == KeyCode::KeyR && state == ElementState::Pressed;
            input.process_keyboard(key, state);
            input.process_mouse_motion((rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)));
            let dt = Duration::from_millis(rng.gen_range(1..40));
            let snap = s.tick(&mut input, dt).unwrap();
            assert!(snap.is_consistent(radius));
            if !reloading {
                assert!(snap.weapon.ammo <= last_ammo);
            }
            last_ammo = snap.weapon.ammo;
        }
    }
}
