//! Perspective camera

use glam::{EulerRot, Mat4, Quat};
use shard_core::Vec3;
use shard_runtime::{Camera, Viewport};

/// Perspective camera posed by position and Euler rotation.
///
/// With zero rotation it looks down -z; a yaw of π faces the course (+z).
pub struct PerspectiveCamera {
    position: Vec3,
    rotation: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(viewport: &Viewport, yaw: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Vec3::new(0.0, yaw, 0.0),
            fov: 75.0,
            near: 0.1,
            far: 500.0,
            aspect: viewport.aspect(),
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        let orientation = Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
        );
        let forward = orientation * glam::Vec3::NEG_Z;
        Vec3::new(forward.x, forward.y, forward.z)
    }

    fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
        self.update_projection();
    }

    fn projection_matrix(&self) -> [[f32; 4]; 4] {
        self.projection.to_cols_array_2d()
    }
}
