//! Frame timing for the host loop.

use std::time::{Duration, Instant};

/// Longest frame delta handed to the simulation. A stalled window (drag,
/// breakpoint, minimise) must not teleport the player across the arena.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Shortest fixed step accepted by [`Time::set_fixed_rate`].
pub const MIN_FIXED_TIMESTEP: Duration = Duration::from_micros(1);

/// Measures per-frame deltas and optionally meters out fixed steps.
#[derive(Debug)]
pub struct Time {
    /// Wall-clock instant of the previous `update`.
    last_frame: Instant,
    /// Delta of the last frame, already capped to `MAX_FRAME_DELTA`.
    delta: Duration,
    /// Total time fed through `update`/`advance`.
    elapsed: Duration,
    frame_count: u64,
    /// Fixed step length when running a fixed cadence.
    fixed_timestep: Duration,
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager with a 60 Hz fixed step.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Sample the wall clock at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw);
    }

    /// Feed an explicit delta. Used by `update` and by deterministic drivers.
    pub fn advance(&mut self, raw: Duration) {
        if raw > MAX_FRAME_DELTA {
            log::debug!("Frame delta {:?} capped to {:?}", raw, MAX_FRAME_DELTA);
        }
        self.delta = raw.min(MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.accumulator += self.delta;
    }

    /// Delta of the last frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Consume one fixed step from the accumulator if enough time has built up.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Get the current FPS (from the last frame only).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed timestep rate in Hz. Rates that are not finite, not
    /// positive, or give a step shorter than [`MIN_FIXED_TIMESTEP`] are
    /// ignored. Returns whether the rate was applied.
    pub fn set_fixed_rate(&mut self, hz: f64) -> bool {
        let step = if hz.is_finite() && hz > 0.0 {
            Duration::try_from_secs_f64(1.0 / hz).ok()
        } else {
            None
        };
        match step {
            Some(step) if step >= MIN_FIXED_TIMESTEP => {
                self.fixed_timestep = step;
                true
            }
            _ => {
                log::warn!("Ignoring unusable fixed tick rate {} Hz", hz);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_caps_long_frames() {
        let mut time = Time::new();
        time.advance(Duration::from_secs(3));
        assert_eq!(time.delta(), MAX_FRAME_DELTA);
        assert_eq!(time.elapsed(), MAX_FRAME_DELTA);
        assert_eq!(time.frame_count(), 1);
    }

    #[test]
    fn fixed_steps_drain_accumulator() {
        let mut time = Time::new();
        time.set_fixed_rate(100.0);
        time.advance(Duration::from_millis(35));
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        // 5 ms left over carries into the next frame.
        time.advance(Duration::from_millis(5));
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
    }

    #[test]
    fn zero_rate_keeps_previous_step() {
        let mut time = Time::new();
        let before = time.fixed_timestep();
        assert!(!time.set_fixed_rate(0.0));
        assert_eq!(time.fixed_timestep(), before);
    }

    #[test]
    fn unusable_rates_are_rejected() {
        let mut time = Time::new();
        let before = time.fixed_timestep();
        for hz in [f64::INFINITY, f64::NAN, -60.0, 1e-300, 1e9] {
            assert!(!time.set_fixed_rate(hz), "{hz} Hz accepted");
            assert_eq!(time.fixed_timestep(), before);
        }
        assert!(time.set_fixed_rate(120.0));
        assert_eq!(time.fixed_timestep(), Duration::from_secs_f64(1.0 / 120.0));
    }
}
