//! Orbit camera with damped mouse and keyboard controls.
//!
//! [`OrbitControls`] collects rotate/pan/zoom requests from input as pending
//! deltas and eases the camera towards them in [`OrbitControls::update`],
//! which the animation loop calls once per tick. With damping enabled each
//! update applies `damping_factor` of the remaining delta, so motion keeps
//! gliding for a few frames after the mouse stops.

use glam::{Mat4, Vec2, Vec3};

use crate::animator::CameraController;
use crate::input::{Input, KeyCode, MouseButton};

/// Keeps the camera from flipping over the poles.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 1e-4;
/// Pixels panned per arrow key press.
const KEY_PAN_PIXELS: f32 = 7.0;
/// Remaining deltas below this are dropped.
const EPSILON: f32 = 1e-6;

/// Orbit camera for viewing the field.
#[derive(Debug, Clone, Copy, PartialEq)]
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
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera at `(0, 0, 7)` looking at the origin with a 75° field of view.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 7.0,
            target: Vec3::ZERO,
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Camera-space right axis in world coordinates.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Camera-space up axis in world coordinates.
    pub fn up(&self) -> Vec3 {
        let forward = (self.target - self.position()).normalize_or_zero();
        self.right().cross(forward)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Tuning for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    pub damping_enabled: bool,
    /// Fraction of the pending motion applied per update, in `(0, 1]`.
    pub damping_factor: f32,
    /// Pan in the screen plane instead of along the ground plane.
    pub screen_space_panning: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            damping_enabled: true,
            damping_factor: 0.25,
            screen_space_panning: false,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }
}

/// Mouse/keyboard driven orbit controls around a [`Camera`].
#[derive(Debug, Clone)]
pub struct OrbitControls {
    camera: Camera,
    config: OrbitConfig,
    /// Pending (yaw, pitch) rotation.
    rotate_delta: Vec2,
    /// Pending target translation.
    pan_offset: Vec3,
    /// Pending distance multiplier.
    scale: f32,
}

impl OrbitControls {
    pub fn new(camera: Camera, config: OrbitConfig) -> Self {
        let mut config = config;
        config.damping_factor = config.damping_factor.clamp(EPSILON, 1.0);
        Self {
            camera,
            config,
            rotate_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Whether any rotation or pan is still being eased in.
    pub fn is_settling(&self) -> bool {
        self.rotate_delta.length_squared() > EPSILON * EPSILON
            || self.pan_offset.length_squared() > EPSILON * EPSILON
            || (self.scale - 1.0).abs() > EPSILON
    }

    /// Orbit by a mouse drag of `(dx, dy)` pixels in a viewport `height` pixels tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        let height = height.max(1.0);
        let turn = std::f32::consts::TAU * self.config.rotate_speed / height;
        self.rotate_delta.x -= dx * turn;
        self.rotate_delta.y += dy * turn;
    }

    /// Pan by a drag of `(dx, dy)` pixels in a viewport `height` pixels tall.
    pub fn pan(&mut self, dx: f32, dy: f32, height: f32) {
        let height = height.max(1.0);
        // World units covered by one pixel at the target's depth.
        let target_distance = self.camera.distance * (self.camera.fov_y * 0.5).tan();
        let per_pixel = 2.0 * target_distance / height * self.config.pan_speed;

        let right = self.camera.right();
        let up = if self.config.screen_space_panning {
            self.camera.up()
        } else {
            Vec3::Y.cross(right)
        };

        self.pan_offset += -right * dx * per_pixel + up * dy * per_pixel;
    }

    /// Dolly towards (`steps > 0`) or away from (`steps < 0`) the target.
    pub fn zoom(&mut self, steps: f32) {
        let dolly = 0.95_f32.powf(self.config.zoom_speed);
        self.scale *= dolly.powf(steps);
    }

    /// Translate this frame's input into pending camera motion.
    pub fn handle_input(&mut self, input: &Input, viewport_height: f32) {
        let drag = input.mouse_delta();
        if drag != Vec2::ZERO {
            if input.mouse_held(MouseButton::Left) {
                self.rotate(drag.x, drag.y, viewport_height);
            } else if input.mouse_held(MouseButton::Right) || input.mouse_held(MouseButton::Middle) {
                self.pan(drag.x, drag.y, viewport_height);
            }
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.zoom(scroll);
        }

        let keys = [
            (KeyCode::Up, 0.0, KEY_PAN_PIXELS),
            (KeyCode::Down, 0.0, -KEY_PAN_PIXELS),
            (KeyCode::Left, KEY_PAN_PIXELS, 0.0),
            (KeyCode::Right, -KEY_PAN_PIXELS, 0.0),
        ];
        for (key, dx, dy) in keys {
            if input.key_pressed(key) {
                self.pan(dx, dy, viewport_height);
            }
        }
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Camera::new(), OrbitConfig::default())
    }
}

impl CameraController for OrbitControls {
    fn update(&mut self) {
        let f = if self.config.damping_enabled {
            self.config.damping_factor
        } else {
            1.0
        };

        self.camera.yaw += self.rotate_delta.x * f;
        self.camera.pitch = (self.camera.pitch + self.rotate_delta.y * f).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.camera.distance = (self.camera.distance * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);
        self.camera.target += self.pan_offset * f;

        self.scale = 1.0;
        self.rotate_delta *= 1.0 - f;
        self.pan_offset *= 1.0 - f;

        if self.rotate_delta.length_squared() < EPSILON * EPSILON {
            self.rotate_delta = Vec2::ZERO;
        }
        if self.pan_offset.length_squared() < EPSILON * EPSILON {
            self.pan_offset = Vec3::ZERO;
        }
    }

    fn view_proj(&self, aspect: f32) -> Mat4 {
        self.camera.projection_matrix(aspect) * self.camera.view_matrix()
    }
}
