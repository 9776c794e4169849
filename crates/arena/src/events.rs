//! Window and device event handling for ArenaState.
//! Keeps winit plumbing out of the simulation: raw events go to the input
//! sampler, hotkeys become [`Command`]s, and pointer lock is negotiated here.

use engine_core::Attachment;
use input::InputSampler;
use winit::event::{DeviceEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::CursorGrabMode;

use crate::catalog;

/// Discrete actions bound to hotkeys outside the per-tick input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Free pick from the armoury (1-4).
    Select(&'static str),
    /// Buy and equip (F1-F4).
    Purchase(&'static str),
    /// F5-F8.
    ToggleAttachment(Attachment),
    /// Escape.
    ReleasePointer,
}

/// Map a key press to a host command, if it has one.
pub fn command_for(key: KeyCode) -> Option<Command> {
    let slot = match key {
        KeyCode::Digit1 | KeyCode::F1 | KeyCode::F5 => 0,
        KeyCode::Digit2 | KeyCode::F2 | KeyCode::F6 => 1,
        KeyCode::Digit3 | KeyCode::F3 | KeyCode::F7 => 2,
        KeyCode::Digit4 | KeyCode::F4 | KeyCode::F8 => 3,
        KeyCode::Escape => return Some(Command::ReleasePointer),
        _ => return None,
    };
    match key {
        KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 | KeyCode::Digit4 => {
            catalog::by_slot(slot).map(|w| Command::Select(w.id))
        }
        KeyCode::F1 | KeyCode::F2 | KeyCode::F3 | KeyCode::F4 => {
            catalog::by_slot(slot).map(|w| Command::Purchase(w.id))
        }
        _ => Attachment::ALL.get(slot).copied().map(Command::ToggleAttachment),
    }
}

/// Record the platform's answer to a grab request. A denied grab leaves the
/// sampler unlocked. Returns whether the pointer is now locked.
pub fn settle_pointer_lock<E: std::fmt::Display>(
    input: &mut InputSampler,
    grabbed: Result<(), E>,
) -> bool {
    match grabbed {
        Ok(()) => {
            input.set_pointer_locked(true);
            true
        }
        Err(e) => {
            log::warn!("Pointer lock denied: {}", e);
            input.set_pointer_locked(false);
            false
        }
    }
}

impl crate::ArenaState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                true
            }
            WindowEvent::Resized(size) => {
                self.camera.set_viewport(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused.
                self.input.release_all();
                self.release_pointer();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let fresh = event.state.is_pressed() && !self.input.is_key_held(key);
                    self.input.process_keyboard(key, event.state);
                    if fresh {
                        if let Some(command) = command_for(key) {
                            self.run_command(command);
                        }
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                if self.input.take_lock_request() {
                    self.grab_pointer();
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.window.request_redraw();
                false
            }
            _ => false,
        }
    }

    /// Handle device events (raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    fn run_command(&mut self, command: Command) {
        let result = match command {
            Command::Select(id) => self.sim.select(id).map(|_| ()),
            Command::Purchase(id) => self.sim.purchase(id).map(|_| ()),
            Command::ToggleAttachment(a) => self.sim.toggle_attachment(a).map(|_| ()),
            Command::ReleasePointer => {
                self.release_pointer();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("{:?} failed: {}", command, e);
        }
    }

    fn grab_pointer(&mut self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        if settle_pointer_lock(&mut self.input, grabbed) {
            self.window.set_cursor_visible(false);
        }
    }

    fn release_pointer(&mut self) {
        if !self.input.is_pointer_locked() {
            return;
        }
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.input.set_pointer_locked(false);
    }
}
