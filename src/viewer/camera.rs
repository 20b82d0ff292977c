//! Orbit camera for the viewer.

use glam::{Mat4, Vec3};

/// Orbit camera looking at the tree.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Idle orbit speed in radians per second.
    pub auto_rotate_speed: f32,
}

impl Camera {
    /// Camera at `(0, 1.5, 18)` looking at `(0, 1.5, 0)`.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 18.0,
            target: Vec3::new(0.0, 1.5, 0.0),
            fov_y: 40.0_f32.to_radians(),
            min_distance: 8.0,
            max_distance: 25.0,
            // 0.5 turns per minute
            auto_rotate_speed: 0.5 * std::f32::consts::TAU / 60.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, 0.1, 200.0)
    }

    /// Drag by a mouse delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Move closer (positive) or further away (negative).
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(self.min_distance, self.max_distance);
    }

    /// Idle orbit for one frame.
    pub fn auto_rotate(&mut self, dt: f32) {
        self.yaw += self.auto_rotate_speed * dt;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
