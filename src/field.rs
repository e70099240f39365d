//! Field configuration and the builder that runs it in a window.

use glam::Vec3;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::animator::DEFAULT_ROTATION_STEP;
use crate::camera::OrbitConfig;
use crate::error::RunError;
use crate::light::{rgb_hex, Flicker};
use crate::window::App;

/// Every tunable of the effect.
///
/// `Default` reproduces the stock look: 15 000 dim purple-blue points in a
/// 15-unit cube, waving with amplitude 2 and slowly tumbling, lit by an
/// orange light that orbits at radius 5.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Number of points. Fixed for the lifetime of the field.
    pub particle_count: usize,
    /// Side length of the cube particles start in.
    pub extent: f32,
    /// Lowest value of each color channel.
    pub color_base: f32,
    /// Random range added on top of `color_base`.
    pub color_spread: f32,
    /// Seed for positions and colors; `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Peak height of each of the two wave terms.
    pub wave_amplitude: f32,
    /// Radians added to each rotation axis per tick.
    pub rotation_step: f32,

    pub light_color: Vec3,
    pub light_range: f32,
    pub flicker: Flicker,

    /// Point size in world units at unit distance.
    pub point_size: f32,
    pub opacity: f32,
    /// Size of the light halo, same units as `point_size`. The light itself
    /// is invisible on the unlit points; zero draws no halo.
    pub light_size: f32,

    pub orbit: OrbitConfig,

    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 15_000,
            extent: 15.0,
            color_base: 0.2,
            color_spread: 0.3,
            seed: None,
            wave_amplitude: 2.0,
            rotation_step: DEFAULT_ROTATION_STEP,
            light_color: rgb_hex(0xFFAA00),
            light_range: 20.0,
            flicker: Flicker::default(),
            point_size: 0.1,
            opacity: 0.8,
            light_size: 0.0,
            orbit: OrbitConfig::default(),
            title: "Cosmic Field".to_string(),
            window_size: (1280, 720),
        }
    }
}

/// Builder for a windowed particle field.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// use cosmic_field::CosmicField;
///
/// CosmicField::new()
///     .with_particle_count(20_000)
///     .with_seed(7)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CosmicField {
    config: FieldConfig,
}

impl CosmicField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit configuration.
    pub fn from_config(config: FieldConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the side length of the starting cube.
    pub fn with_extent(mut self, extent: f32) -> Self {
        self.config.extent = extent;
        self
    }

    /// Make the particle layout and colors reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_wave_amplitude(mut self, amplitude: f32) -> Self {
        self.config.wave_amplitude = amplitude;
        self
    }

    pub fn with_rotation_step(mut self, step: f32) -> Self {
        self.config.rotation_step = step;
        self
    }

    /// Set the point size and opacity.
    pub fn with_point_style(mut self, size: f32, opacity: f32) -> Self {
        self.config.point_size = size;
        self.config.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the light color as `0xRRGGBB`.
    pub fn with_light_color(mut self, hex: u32) -> Self {
        self.config.light_color = rgb_hex(hex);
        self
    }

    /// Draw the light as a glowing halo of the given size; zero hides it.
    pub fn with_light_halo(mut self, size: f32) -> Self {
        self.config.light_size = size.max(0.0);
        self
    }

    pub fn with_flicker(mut self, flicker: Flicker) -> Self {
        self.config.flicker = flicker;
        self
    }

    pub fn with_orbit(mut self, orbit: OrbitConfig) -> Self {
        self.config.orbit = orbit;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_size = (width, height);
        self
    }

    /// Open the window and animate until it is closed or Escape is pressed.
    pub fn run(self) -> Result<(), RunError> {
        log::info!(
            "starting field: {} particles, seed {:?}",
            self.config.particle_count,
            self.config.seed
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
