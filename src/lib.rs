//! # cosmic-field
//!
//! A real-time animated particle field: a cloud of softly colored points
//! that ripple on a trigonometric wave, tumble slowly, and are circled by a
//! flickering orange light, viewed through a damped orbit camera.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cosmic_field::CosmicField;
//!
//! fn main() -> Result<(), cosmic_field::RunError> {
//!     env_logger::init();
//!     CosmicField::new()
//!         .with_particle_count(15_000)
//!         .run()
//! }
//! ```
//!
//! ## The animation core
//!
//! Everything that moves lives in [`ParticleFieldAnimator`]. One tick at
//! time `t` seconds:
//!
//! | State    | Update                                          | Depends on   |
//! |----------|-------------------------------------------------|--------------|
//! | Y        | `sin(x + t) * 2 + cos(z + t) * 2`               | `x`, `z`, `t` |
//! | Rotation | `+0.002` rad about X and Y                      | tick count   |
//! | Light    | intensity `sin(t/2) * 1.5 + 1.5`, orbit radius 5 | `t`          |
//!
//! [`AnimationLoop`] samples its [`Clock`](time::Clock) once per tick and
//! feeds the same `t` to both the wave and the light. It runs headless with
//! any [`FrameRenderer`], [`CameraController`] and [`FrameScheduler`], which
//! is how the tests drive it; [`CosmicField::run`] plugs in the wgpu
//! renderer, the orbit controls and the winit event loop.
//!
//! ## Controls
//!
//! | Input              | Action                |
//! |--------------------|-----------------------|
//! | Left drag          | Orbit                 |
//! | Right/middle drag  | Pan                   |
//! | Wheel              | Zoom                  |
//! | Arrow keys         | Pan                   |
//! | Double click       | Toggle fullscreen     |
//! | Escape             | Quit                  |

pub mod animator;
pub mod camera;
mod error;
mod field;
mod gpu;
pub mod input;
pub mod light;
pub mod particles;
pub mod time;
pub mod viewport;
mod window;

pub use animator::{
    AnimationLoop, CameraController, FieldFrame, FrameRenderer, FrameScheduler, LoopState,
    ParticleFieldAnimator, RotationState, StopHandle,
};
pub use camera::{Camera, OrbitConfig, OrbitControls};
pub use error::{GpuError, RunError};
pub use field::{CosmicField, FieldConfig};
pub use glam::{Mat4, Vec3};
pub use light::{Flicker, LightState};
pub use particles::ParticleSet;
pub use viewport::Viewport;
