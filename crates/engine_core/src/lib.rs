//! Core types shared by the arena simulation, input and renderers.
//!
//! This crate provides:
//! - Frame timing
//! - Yaw/pitch transforms
//! - Generation-tagged timed effects
//! - The published snapshot types

pub mod snapshot;
pub mod time;
pub mod timer;
pub mod transform;

pub use snapshot::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
