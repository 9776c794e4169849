//! Generation-tagged timed effects.
//!
//! Every scheduled effect carries the [`Generation`] that was current when it
//! was scheduled. The owner bumps its generation whenever an action supersedes
//! earlier effects; stale entries are then dropped instead of applied, so a
//! late timer can never resurrect state that has since been replaced.

use std::time::Duration;

/// Monotonic token identifying one "version" of some piece of state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    due: Duration,
    token: Generation,
    effect: T,
}

/// Pending effects keyed by due time on the simulation clock.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Queue `effect` to fire once the clock reaches `due`.
    pub fn schedule(&mut self, due: Duration, token: Generation, effect: T) {
        self.pending.push(Scheduled { due, token, effect });
    }

    /// Remove and return every effect due at `now`, earliest first. Effects
    /// with equal due times keep scheduling order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(Generation, T)> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|s| s.due <= now);
        self.pending = rest;
        due.sort_by_key(|s| s.due);
        due.into_iter().map(|s| (s.token, s.effect)).collect()
    }

    /// Like [`drain_due`](Self::drain_due) but discards effects whose
    /// token no longer matches `current`.
    pub fn drain_current(&mut self, now: Duration, current: Generation) -> Vec<T> {
        self.drain_due(now)
            .into_iter()
            .filter_map(|(token, effect)| {
                if token == current {
                    Some(effect)
                } else {
                    log::trace!(
                        "Dropping stale timed effect (gen {} != {})",
                        token.value(),
                        current.value()
                    );
                    None
                }
            })
            .collect()
    }

    /// Cancel everything still pending.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
