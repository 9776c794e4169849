//! Input sampling for the arena: raw keyboard/mouse/pointer-lock events in,
//! one [`InputFrame`] per simulation tick out.

use glam::Vec2;
use std::collections::HashSet;

/// Held movement directions as a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MoveKeys(u8);

impl MoveKeys {
    pub const NONE: MoveKeys = MoveKeys(0);
    pub const FORWARD: MoveKeys = MoveKeys(1 << 0);
    pub const BACK: MoveKeys = MoveKeys(1 << 1);
    pub const LEFT: MoveKeys = MoveKeys(1 << 2);
    pub const RIGHT: MoveKeys = MoveKeys(1 << 3);

    pub fn contains(self, other: MoveKeys) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: MoveKeys) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Movement axes in player-local space: `x` strafe (+right),
    /// `y` forward (+forward). Opposing keys cancel.
    pub fn axes(self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.contains(Self::FORWARD) {
            axes.y += 1.0;
        }
        if self.contains(Self::BACK) {
            axes.y -= 1.0;
        }
        if self.contains(Self::LEFT) {
            axes.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            axes.x += 1.0;
        }
        axes
    }
}

impl std::ops::BitOr for MoveKeys {
    type Output = MoveKeys;

    fn bitor(self, rhs: MoveKeys) -> MoveKeys {
        MoveKeys(self.0 | rhs.0)
    }
}

/// Key assignments for the simulation's actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub fire: KeyCode,
    pub reload: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            fire: KeyCode::Space,
            reload: KeyCode::KeyR,
        }
    }
}

impl KeyBindings {
    fn movement(&self, key: KeyCode) -> Option<MoveKeys> {
        if key == self.forward {
            Some(MoveKeys::FORWARD)
        } else if key == self.back {
            Some(MoveKeys::BACK)
        } else if key == self.left {
            Some(MoveKeys::LEFT)
        } else if key == self.right {
            Some(MoveKeys::RIGHT)
        } else {
            None
        }
    }
}

/// Everything the simulation needs from input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Movement keys held at poll time.
    pub move_keys: MoveKeys,
    /// Sum of mouse motion since the previous poll (zero unless locked).
    pub mouse_delta: Vec2,
    /// Physical fire presses since the previous poll.
    pub fire_presses: u32,
    /// Reload was pressed since the previous poll.
    pub reload_triggered: bool,
    pub pointer_locked: bool,
}

impl InputFrame {
    pub fn fire_triggered(&self) -> bool {
        self.fire_presses > 0
    }
}

/// Accumulates raw events between polls.
#[derive(Debug, Default)]
pub struct InputSampler {
    bindings: KeyBindings,
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse delta since last poll (only while locked).
    accumulated_delta: Vec2,
    fire_presses: u32,
    reload_pending: bool,
    pointer_locked: bool,
    /// A click landed on the viewport while unlocked.
    lock_requested: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Process a keyboard event. Auto-repeat presses of an already-held key
    /// are ignored, so one-shot actions trigger once per physical press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.insert(key) {
                    return;
                }
                if key == self.bindings.fire {
                    self.fire_presses = self.fire_presses.saturating_add(1);
                } else if key == self.bindings.reload {
                    self.reload_pending = true;
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event. A primary click while unlocked asks for
    /// pointer lock instead of firing.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.insert(button) {
                    return;
                }
                if button == MouseButton::Left {
                    if self.pointer_locked {
                        self.fire_presses = self.fire_presses.saturating_add(1);
                    } else {
                        self.lock_requested = true;
                    }
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process relative mouse motion. Dropped unless the pointer is locked.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.pointer_locked {
            return;
        }
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Record the outcome of a pointer-lock change (granted, released, or
    /// denied by the platform).
    pub fn set_pointer_locked(&mut self, locked: bool) {
        if self.pointer_locked != locked {
            log::info!("Pointer lock {}", if locked { "engaged" } else { "released" });
        }
        self.pointer_locked = locked;
        if !locked {
            self.accumulated_delta = Vec2::ZERO;
        }
    }

    pub fn is_pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Forget held keys and buttons, e.g. when the window loses focus and
    /// key-up events would otherwise be missed.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
    }

    /// Drop all buffered input and lock state. Used on teardown.
    pub fn reset(&mut self) {
        let bindings = std::mem::take(&mut self.bindings);
        *self = Self::with_bindings(bindings);
    }

    fn held_move_keys(&self) -> MoveKeys {
        let mut keys = MoveKeys::NONE;
        for &key in &self.keys_held {
            if let Some(k) = self.bindings.movement(key) {
                keys.insert(k);
            }
        }
        keys
    }

    /// Produce the frame for this tick and clear edge-triggered state.
    pub fn poll(&mut self) -> InputFrame {
        let frame = InputFrame {
            move_keys: self.held_move_keys(),
            mouse_delta: self.accumulated_delta,
            fire_presses: self.fire_presses,
            reload_triggered: self.reload_pending,
            pointer_locked: self.pointer_locked,
        };
        self.accumulated_delta = Vec2::ZERO;
        self.fire_presses = 0;
        self.reload_pending = false;
        frame
    }

    /// Whether the host should try to grab the pointer. Clears the request.
    pub fn take_lock_request(&mut self) -> bool {
        std::mem::take(&mut self.lock_requested)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    fn press(s: &mut InputSampler, key: KeyCode) {
        s.process_keyboard(key, ElementState::Pressed);
    }

    fn release(s: &mut InputSampler, key: KeyCode) {
        s.process_keyboard(key, ElementState::Released);
    }

    #[test]
    fn movement_keys_are_level_triggered() {
        let mut s = InputSampler::new();
        press(&mut s, KeyCode::KeyW);
        press(&mut s, KeyCode::KeyD);
        for _ in 0..3 {
            let f = s.poll();
            assert!(f.move_keys.contains(MoveKeys::FORWARD | MoveKeys::RIGHT));
            assert_eq!(f.move_keys.axes(), Vec2::new(1.0, 1.0));
        }
        release(&mut s, KeyCode::KeyW);
        assert_eq!(s.poll().move_keys, MoveKeys::RIGHT);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut s = InputSampler::new();
        press(&mut s, KeyCode::KeyA);
        press(&mut s, KeyCode::KeyD);
        assert_eq!(s.poll().move_keys.axes(), Vec2::ZERO);
    }

    #[test]
    fn fire_triggers_once_per_press_despite_repeat() {
        let mut s = InputSampler::new();
        press(&mut s, KeyCode::Space);
        press(&mut s, KeyCode::Space); // auto-repeat
        let f = s.poll();
        assert_eq!(f.fire_presses, 1);
        assert!(!s.poll().fire_triggered());

        release(&mut s, KeyCode::Space);
        press(&mut s, KeyCode::Space);
        release(&mut s, KeyCode::Space);
        press(&mut s, KeyCode::Space);
        assert_eq!(s.poll().fire_presses, 2);
    }

    #[test]
    fn reload_is_one_shot() {
        let mut s = InputSampler::new();
        press(&mut s, KeyCode::KeyR);
        assert!(s.poll().reload_triggered);
        assert!(!s.poll().reload_triggered);
    }

    #[test]
    fn mouse_delta_requires_lock_and_resets_on_poll() {
        let mut s = InputSampler::new();
        s.process_mouse_motion((10.0, 5.0));
        assert_eq!(s.poll().mouse_delta, Vec2::ZERO);

        s.set_pointer_locked(true);
        s.process_mouse_motion((10.0, 5.0));
        s.process_mouse_motion((-4.0, 1.0));
        let f = s.poll();
        assert_eq!(f.mouse_delta, Vec2::new(6.0, 6.0));
        assert!(f.pointer_locked);
        assert_eq!(s.poll().mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn losing_lock_discards_pending_delta() {
        let mut s = InputSampler::new();
        s.set_pointer_locked(true);
        s.process_mouse_motion((50.0, 0.0));
        s.set_pointer_locked(false);
        let f = s.poll();
        assert_eq!(f.mouse_delta, Vec2::ZERO);
        assert!(!f.pointer_locked);
    }

    #[test]
    fn click_requests_lock_when_unlocked_and_fires_when_locked() {
        let mut s = InputSampler::new();
        s.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        s.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(s.poll().fire_presses, 0);
        assert!(s.take_lock_request());
        assert!(!s.take_lock_request());

        s.set_pointer_locked(true);
        s.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        s.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(s.poll().fire_presses, 1);
        assert!(!s.take_lock_request());
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut s = InputSampler::new();
        press(&mut s, KeyCode::KeyW);
        s.release_all();
        assert!(s.poll().move_keys.is_empty());
        // A fresh press after focus returns triggers again.
        press(&mut s, KeyCode::Space);
        assert!(s.poll().fire_triggered());
    }

    #[test]
    fn custom_bindings() {
        let mut s = InputSampler::with_bindings(KeyBindings {
            forward: KeyCode::ArrowUp,
            ..KeyBindings::default()
        });
        press(&mut s, KeyCode::KeyW);
        press(&mut s, KeyCode::ArrowUp);
        assert_eq!(s.poll().move_keys, MoveKeys::FORWARD);
    }

    #[test]
    fn reset_keeps_bindings_but_drops_state() {
        let mut s = InputSampler::with_bindings(KeyBindings {
            fire: KeyCode::KeyF,
            ..KeyBindings::default()
        });
        s.set_pointer_locked(true);
        press(&mut s, KeyCode::KeyW);
        s.reset();
        assert!(!s.is_pointer_locked());
        assert!(s.poll().move_keys.is_empty());
        press(&mut s, KeyCode::KeyF);
        assert_eq!(s.poll().fire_presses, 1);
    }
}
