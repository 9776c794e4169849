//! Render adapters for the arena.
//!
//! Adapters consume published [`SimulationSnapshot`]s and turn them into
//! something drawable. They never feed anything back into the simulation.

pub mod camera;
pub mod css;

pub use camera::*;
pub use css::*;

use engine_core::SimulationSnapshot;

/// A consumer of published snapshots.
///
/// `present` must be a function of the snapshot (and the adapter's fixed
/// configuration) only: presenting the same snapshot twice yields the same
/// output.
pub trait RenderAdapter {
    type Output;

    fn present(&mut self, snapshot: &SimulationSnapshot) -> Self::Output;
}
