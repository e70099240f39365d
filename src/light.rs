//! The flickering point light that orbits the field.

use glam::Vec3;

/// Shape of the flicker: intensity and orbit as sine/cosine of time.
///
/// ```text
/// intensity  = sin(t * intensity_rate) * intensity_swing + intensity_swing
/// position.x = sin(t * rate.x) * radius
/// position.y = cos(t * rate.y) * radius
/// position.z = cos(t * rate.z) * radius
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flicker {
    pub intensity_rate: f64,
    pub intensity_swing: f64,
    pub orbit_rate: [f64; 3],
    pub orbit_radius: f64,
}

impl Default for Flicker {
    fn default() -> Self {
        Self {
            intensity_rate: 0.5,
            intensity_swing: 1.5,
            orbit_rate: [0.3, 0.4, 0.5],
            orbit_radius: 5.0,
        }
    }
}

impl Flicker {
    /// Largest intensity this flicker can produce.
    pub fn max_intensity(&self) -> f32 {
        (self.intensity_swing * 2.0) as f32
    }
}

/// A point light descriptor.
///
/// `intensity` and `position` are recomputed every tick; `color` and `range`
/// are fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub intensity: f32,
    pub position: Vec3,
    /// Linear RGB, 0.0-1.0.
    pub color: Vec3,
    /// Distance at which the light's contribution reaches zero.
    pub range: f32,
}

impl LightState {
    /// Orange light at the origin, matching the field's default look.
    pub fn new() -> Self {
        Self {
            intensity: 2.0,
            position: Vec3::ZERO,
            color: rgb_hex(0xFFAA00),
            range: 20.0,
        }
    }

    /// Light with a custom color and range.
    pub fn with_color(color: Vec3, range: f32) -> Self {
        Self {
            color,
            range,
            ..Self::new()
        }
    }

    /// Overwrite intensity and position with the flicker at time `t`.
    ///
    /// Depends on nothing but `t`: applying the same `t` twice gives
    /// bit-identical results.
    pub fn apply_flicker(&mut self, flicker: &Flicker, t: f64) {
        self.intensity =
            ((t * flicker.intensity_rate).sin() * flicker.intensity_swing + flicker.intensity_swing) as f32;

        let [rx, ry, rz] = flicker.orbit_rate;
        let r = flicker.orbit_radius;
        self.position = Vec3::new(
            ((t * rx).sin() * r) as f32,
            ((t * ry).cos() * r) as f32,
            ((t * rz).cos() * r) as f32,
        );
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a `0xRRGGBB` color to a linear 0.0-1.0 triple.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}
