//! Perspective camera driven by the published pose.

use engine_core::{SimulationSnapshot, Transform};
use glam::{Mat4, Vec2, Vec3};

use crate::RenderAdapter;

/// FPS camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation), copied from the last snapshot.
    pub transform: Transform,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

/// Matrices for one presented frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub eye: Vec3,
    pub forward: Vec3,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.set_viewport(width, height);
        camera
    }

    /// Update viewport size (call on window resize).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.transform.position;
        Mat4::look_to_rh(eye, self.transform.forward(), self.transform.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to viewport pixels (origin top-left). Returns
    /// `None` for points behind the camera or outside the clip volume.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z < 0.0 || ndc.z > 1.0 {
            return None;
        }
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

impl RenderAdapter for Camera {
    type Output = CameraFrame;

    fn present(&mut self, snapshot: &SimulationSnapshot) -> CameraFrame {
        self.transform = snapshot.pose.transform();
        CameraFrame {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
            view_projection: self.view_projection_matrix(),
            eye: self.transform.position,
            forward: self.transform.forward(),
        }
    }
}
