//! Fly camera driven by keyboard and mouse

use nalgebra::{Matrix4, Orthographic3, Perspective3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Movement directions accepted by [`FlyCamera::process_keyboard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Projection applied on top of the view matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_FOV: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const SPEED_STEP: f32 = 0.5;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 20.0;

pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;
/// Pixels per world unit of the orthographic view volume
pub const ORTHO_PIXELS_PER_UNIT: f32 = 120.0;
pub const ORTHO_NEAR: f32 = -2.5;
pub const ORTHO_FAR: f32 = 6.5;

/// nalgebra builds OpenGL clip space (z in [-1, 1]); wgpu wants z in [0, 1].
pub fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.5, 0.5, //
        0.0, 0.0, 0.0, 1.0, //
    )
}

/// A first-person camera described by position and Euler angles in degrees
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    pub world_up: Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub fov: f32,
    pub projection: ProjectionMode,
    front: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

impl FlyCamera {
    /// Create a camera at `position` looking down -Z
    pub fn new(position: Point3<f32>) -> Self {
        let mut camera = Self {
            position,
            world_up: Vector3::y(),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            fov: DEFAULT_FOV,
            projection: ProjectionMode::Perspective,
            front: -Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Move along the camera basis, scaled by speed and frame time
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.up,
            CameraMovement::Down => -self.up,
        };
        self.position += offset * velocity;
    }

    /// Turn by a mouse delta; positive `y_offset` looks up
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scroll up speeds the camera up, scroll down slows it down
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.movement_speed = (self.movement_speed + y_offset * SPEED_STEP).clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn toggle_projection(&mut self) -> ProjectionMode {
        self.projection = self.projection.toggled();
        self.projection
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.front;
        Matrix4::look_at_rh(&self.position, &target, &self.up)
    }

    /// Projection for a viewport of `width` x `height` pixels, in wgpu clip space
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let projection = match self.projection {
            ProjectionMode::Perspective => {
                Perspective3::new(w / h, self.fov.to_radians(), NEAR, FAR).into_inner()
            }
            ProjectionMode::Orthographic => {
                let half_w = w / ORTHO_PIXELS_PER_UNIT;
                let half_h = h / ORTHO_PIXELS_PER_UNIT;
                Orthographic3::new(-half_w, half_w, -half_h, half_h, ORTHO_NEAR, ORTHO_FAR).into_inner()
            }
        };
        opengl_to_wgpu() * projection
    }

    /// Combined projection * view, as the vertex shader applies it
    pub fn view_projection(&self, width: u32, height: u32) -> Matrix4<f32> {
        self.projection_matrix(width, height) * self.view_matrix()
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 3.0))
    }
}
