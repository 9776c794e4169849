//! Arena - first-person arena shooter sandbox: move, look, fire, reload.

mod catalog;
mod config;
mod events;
mod hud;
mod ledger;
mod map;
mod player;
mod sim;
mod weapons;

use std::sync::Arc;

use anyhow::Result;
use engine_core::Time;
use input::InputSampler;
use renderer::{Camera, CssProjector, RenderAdapter};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::ArenaConfig;
use hud::{HudConfig, HudSystem};
use sim::Simulation;

/// Everything the running arena owns.
pub struct ArenaState {
    pub(crate) window: Arc<Window>,
    pub(crate) input: InputSampler,
    pub(crate) sim: Simulation,
    pub(crate) time: Time,
    pub(crate) camera: Camera,
    pub(crate) css: CssProjector,
    pub(crate) hud: HudSystem,
    fixed_step: bool,
    last_title: String,
}

impl ArenaState {
    fn new(window: Arc<Window>, config: &ArenaConfig) -> Self {
        let starting = match catalog::lookup(&config.starting_weapon) {
            Ok(w) => w,
            Err(e) => {
                log::warn!("{}, falling back to {}", e, catalog::WEAPONS[0].name);
                &catalog::WEAPONS[0]
            }
        };
        let sim = Simulation::new(config.sim_params(), starting);

        let mut time = Time::new();
        let fixed_step = match config.fixed_tick_hz {
            Some(hz) if time.set_fixed_rate(hz) => {
                log::info!("Fixed simulation rate: {} Hz", hz);
                true
            }
            _ => false,
        };

        let size = window.inner_size();
        let hud = HudSystem::new(HudConfig {
            boundary_radius: sim.params().movement.boundary_radius,
            ..HudConfig::default()
        });
        log::debug!("Arena layout: {} props", hud.minimap_props().len());

        Self {
            window,
            input: InputSampler::new(),
            sim,
            time,
            camera: Camera::new(size.width, size.height),
            css: CssProjector::default(),
            hud,
            fixed_step,
            last_title: String::new(),
        }
    }

    /// One frame: advance the simulation and hand the snapshot to every adapter.
    fn update(&mut self) {
        if self.sim.is_disposed() {
            return;
        }
        self.time.update();

        let result = if self.fixed_step {
            let mut latest = Ok(self.sim.snapshot());
            while self.time.should_fixed_update() {
                latest = self.sim.tick(&mut self.input, self.time.fixed_timestep());
                if latest.is_err() {
                    break;
                }
            }
            latest
        } else {
            self.sim.tick(&mut self.input, self.time.delta())
        };

        let snapshot = match result {
            Ok(s) => s,
            Err(e) => {
                log::error!("Simulation tick failed: {}", e);
                return;
            }
        };

        let frame = self.camera.present(&snapshot);
        let css = self.css.present(&snapshot);
        let hud = self.hud.present(&snapshot);
        log::trace!(
            "eye {:?} forward {:?} css {}",
            frame.eye,
            frame.forward,
            css.scene_transform
        );

        let title = match hud.lock_hint {
            Some(hint) => format!("Arena | {} | {}", hud.title, hint),
            None => format!("Arena | {}", hud.title),
        };
        if title != self.last_title {
            self.window.set_title(&title);
            self.last_title = title;
        }
    }

    fn shutdown(&mut self) {
        self.sim.shutdown(&mut self.input);
    }
}

/// Application handler for winit.
struct App {
    config: ArenaConfig,
    state: Option<ArenaState>,
}

impl App {
    fn new(config: ArenaConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Arena")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.state = Some(ArenaState::new(window.clone(), &self.config));
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }

    fn exiting(&mut self, _: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.shutdown();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                          Arena                           ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                               ║");
    println!("║    Click       - Capture mouse │  Escape  - Release      ║");
    println!("║    WASD        - Move          │  Mouse   - Look around  ║");
    println!("║    Left Click  - Fire          │  Space   - Fire         ║");
    println!("║    R           - Reload        │  1-4     - Pick weapon  ║");
    println!("║    F1-F4       - Buy weapon    │  F5-F8   - Attachments  ║");
    println!("╚══════════════════════════════════════════════════════════╝");

    let config = ArenaConfig::load();
    if !config::config_path().exists() {
        config.save();
    }
    log::info!("Starting Arena ({}x{})", config.window_width, config.window_height);

    let event_loop = EventLoop::new()?;
    // Poll so redraws (and therefore ticks) run back to back.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
