//! The per-frame animation core.
//!
//! [`ParticleFieldAnimator`] owns every piece of time-dependent state:
//! the particle buffers, the point light and the accumulated rotation.
//! [`AnimationLoop`] drives it: each frame samples the clock once, ticks the
//! animator, lets the camera ease, hands a read-only [`FieldFrame`] to the
//! renderer and asks the scheduler for the next frame, until its
//! [`StopHandle`] is triggered.
//!
//! # Frame contract
//!
//! Within a frame the animator is the only writer and the renderer the only
//! reader, strictly one after the other: [`ParticleFieldAnimator::tick`]
//! takes `&mut self`, and [`FieldFrame`] borrows the animator immutably, so
//! the two can never overlap. A renderer that wants to keep data past
//! [`FrameRenderer::draw`] must copy it (the GPU renderer uploads it).
//!
//! # Example
//!
//! ```
//! use cosmic_field::animator::{AnimationLoop, CameraController, FieldFrame, FrameRenderer,
//!     FrameScheduler, ParticleFieldAnimator, StopHandle};
//! use cosmic_field::time::FixedStepClock;
//! use cosmic_field::viewport::Viewport;
//! use cosmic_field::FieldConfig;
//! use glam::Mat4;
//!
//! struct Fixed;
//! impl CameraController for Fixed {
//!     fn update(&mut self) {}
//!     fn view_proj(&self, _aspect: f32) -> Mat4 { Mat4::IDENTITY }
//! }
//!
//! struct Count(u32);
//! impl FrameRenderer for Count {
//!     type Error = std::convert::Infallible;
//!     fn configure(&mut self, _viewport: &Viewport) {}
//!     fn draw(&mut self, _frame: &FieldFrame<'_>, _view_proj: Mat4) -> Result<(), Self::Error> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! struct StopAfter(u32, StopHandle);
//! impl FrameScheduler for StopAfter {
//!     fn request_frame(&mut self) {
//!         self.0 -= 1;
//!         if self.0 == 0 {
//!             self.1.stop();
//!         }
//!     }
//! }
//!
//! let config = FieldConfig { particle_count: 100, seed: Some(1), ..Default::default() };
//! let stop = StopHandle::new();
//! let mut anim = AnimationLoop::new(ParticleFieldAnimator::new(&config), FixedStepClock::new(0.0, 1.0 / 60.0), stop.clone());
//! let mut renderer = Count(0);
//! let frames = anim.run(&mut Fixed, &mut renderer, &mut StopAfter(3, stop)).unwrap();
//! assert_eq!(frames, 3);
//! assert_eq!(renderer.0, 3);
//! ```

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Mat4, Quat};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::field::FieldConfig;
use crate::light::{Flicker, LightState};
use crate::particles::ParticleSet;
use crate::time::Clock;
use crate::viewport::Viewport;

/// Angle added to each rotation axis per tick.
pub const DEFAULT_ROTATION_STEP: f32 = 0.002;

/// Rotation of the whole particle set about its X and Y axes.
///
/// Advanced by a fixed step per tick, so the spin speed follows the frame
/// rate rather than the clock. Angles are kept in `[0, TAU)` as `f64`, so
/// after `k` ticks each equals `k * step` modulo one full turn, however long
/// the field runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
}

impl RotationState {
    pub fn advance(&mut self, step: f32) {
        let step = step as f64;
        self.x = (self.x + step).rem_euclid(TAU);
        self.y = (self.y + step).rem_euclid(TAU);
    }

    /// Model matrix: rotation about X, then about Y.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(
            glam::EulerRot::XYZ,
            self.x as f32,
            self.y as f32,
            0.0,
        ))
    }
}

/// Read-only view of one frame's state, handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FieldFrame<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub rotation: RotationState,
    pub light: &'a LightState,
    /// Time the frame was computed for.
    pub time: f64,
    /// Number of ticks executed so far, including this one.
    pub tick: u64,
}

impl FieldFrame<'_> {
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.rotation.matrix()
    }
}

/// Draws frames. Configured on resize, asked to draw once per tick.
pub trait FrameRenderer {
    type Error;

    /// React to a new viewport size or pixel ratio.
    fn configure(&mut self, viewport: &Viewport);

    /// Draw `frame` as seen through `view_proj`.
    fn draw(&mut self, frame: &FieldFrame<'_>, view_proj: Mat4) -> Result<(), Self::Error>;
}

/// Maps user input to a camera. `update` runs once per tick.
pub trait CameraController {
    /// Ease the camera towards its latest requested orientation.
    fn update(&mut self);

    fn view_proj(&self, aspect: f32) -> Mat4;
}

/// Requests that the host run another frame after the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Shared stop flag for an [`AnimationLoop`].
///
/// Cloning yields another handle to the same flag, so a window or another
/// thread can end the loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owns and advances all time-dependent state of the field.
#[derive(Debug, Clone)]
pub struct ParticleFieldAnimator {
    particles: ParticleSet,
    light: LightState,
    rotation: RotationState,
    flicker: Flicker,
    wave_amplitude: f32,
    rotation_step: f32,
    ticks: u64,
    last_time: f64,
}

impl ParticleFieldAnimator {
    /// Generate the particle set described by `config`.
    pub fn new(config: &FieldConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = ParticleSet::random(
            config.particle_count,
            config.extent,
            config.color_base,
            config.color_spread,
            &mut rng,
        );
        Self::with_particles(particles, config)
    }

    /// Animate an existing particle set with the tuning from `config`.
    pub fn with_particles(particles: ParticleSet, config: &FieldConfig) -> Self {
        Self {
            particles,
            light: LightState::with_color(config.light_color, config.light_range),
            rotation: RotationState::default(),
            flicker: config.flicker,
            wave_amplitude: config.wave_amplitude,
            rotation_step: config.rotation_step,
            ticks: 0,
            last_time: 0.0,
        }
    }

    /// Advance every piece of state by one frame at time `t` (seconds).
    ///
    /// Y of each particle and the light are pure functions of `t`; the
    /// rotation grows by one step regardless of `t`.
    pub fn tick(&mut self, t: f64) {
        self.particles.apply_wave(t, self.wave_amplitude);
        self.rotation.advance(self.rotation_step);
        self.light.apply_flicker(&self.flicker, t);
        self.ticks += 1;
        self.last_time = t;
    }

    /// Borrow the state produced by the latest tick.
    pub fn frame(&self) -> FieldFrame<'_> {
        FieldFrame {
            positions: self.particles.positions(),
            colors: self.particles.colors(),
            rotation: self.rotation,
            light: &self.light,
            time: self.last_time,
            tick: self.ticks,
        }
    }

    #[inline]
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    #[inline]
    pub fn light(&self) -> &LightState {
        &self.light
    }

    #[inline]
    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Ticks executed since creation.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Result of one [`AnimationLoop::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Explicit frame loop around a [`ParticleFieldAnimator`].
#[derive(Debug)]
pub struct AnimationLoop<C: Clock> {
    animator: ParticleFieldAnimator,
    clock: C,
    stop: StopHandle,
}

impl<C: Clock> AnimationLoop<C> {
    pub fn new(animator: ParticleFieldAnimator, clock: C, stop: StopHandle) -> Self {
        Self { animator, clock, stop }
    }

    #[inline]
    pub fn animator(&self) -> &ParticleFieldAnimator {
        &self.animator
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn stop_handle(&self) -> &StopHandle {
        &self.stop
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Run one frame: tick, ease the camera, draw.
    ///
    /// Returns [`LoopState::Stopped`] without touching any state once the
    /// stop handle has fired. The clock is sampled exactly once.
    pub fn frame<Cam, R>(&mut self, camera: &mut Cam, renderer: &mut R, aspect: f32) -> Result<LoopState, R::Error>
    where
        Cam: CameraController + ?Sized,
        R: FrameRenderer + ?Sized,
    {
        if self.stop.is_stopped() {
            return Ok(LoopState::Stopped);
        }

        let t = self.clock.now();
        self.animator.tick(t);
        camera.update();
        renderer.draw(&self.animator.frame(), camera.view_proj(aspect))?;

        Ok(LoopState::Running)
    }

    /// Run frames back to back until stopped or the renderer fails.
    ///
    /// The scheduler is asked for a new frame after each one unless the stop
    /// handle fired during it. Returns the number of frames drawn.
    pub fn run<Cam, R, S>(&mut self, camera: &mut Cam, renderer: &mut R, scheduler: &mut S) -> Result<u64, R::Error>
    where
        Cam: CameraController + ?Sized,
        R: FrameRenderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.run_with_viewport(camera, renderer, scheduler, &Viewport::default())
    }

    /// [`AnimationLoop::run`] with an explicit viewport for the projection.
    pub fn run_with_viewport<Cam, R, S>(
        &mut self,
        camera: &mut Cam,
        renderer: &mut R,
        scheduler: &mut S,
        viewport: &Viewport,
    ) -> Result<u64, R::Error>
    where
        Cam: CameraController + ?Sized,
        R: FrameRenderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        renderer.configure(viewport);

        let mut frames = 0;
        while self.frame(camera, renderer, viewport.aspect())? == LoopState::Running {
            frames += 1;
            if self.stop.is_stopped() {
                break;
            }
            scheduler.request_frame();
        }

        log::debug!("animation loop stopped after {} frames", frames);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::wave_height;
    use crate::time::FixedStepClock;

    fn config(count: usize) -> FieldConfig {
        FieldConfig {
            particle_count: count,
            seed: Some(9),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_rewrites_only_y() {
        let mut animator = ParticleFieldAnimator::new(&config(300));
        let original = animator.particles().clone();

        animator.tick(4.0);
        for i in 0..original.len() {
            let before = original.position(i).unwrap();
            let after = animator.particles().position(i).unwrap();
            assert_eq!(before.x, after.x);
            assert_eq!(before.z, after.z);
            assert_eq!(after.y, wave_height(before.x, before.z, 4.0, 2.0));
        }
    }

    #[test]
    fn test_y_independent_of_history() {
        let mut a = ParticleFieldAnimator::new(&config(200));
        let mut b = a.clone();

        a.tick(7.5);
        for i in 0..25 {
            b.tick(i as f64 * 0.9);
        }
        b.tick(7.5);

        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.light(), b.light());
        assert_ne!(a.rotation(), b.rotation());
    }

    #[test]
    fn test_rotation_counts_ticks() {
        let mut animator = ParticleFieldAnimator::new(&config(10));
        for i in 0..50 {
            animator.tick(1_000.0 - i as f64 * 13.0);
        }
        let rotation = animator.rotation();
        assert!((rotation.x - 50.0 * DEFAULT_ROTATION_STEP as f64).abs() < 1e-9);
        assert_eq!(rotation.x, rotation.y);
        assert_eq!(animator.ticks(), 50);
    }

    #[test]
    fn test_buffers_keep_allocation() {
        let mut animator = ParticleFieldAnimator::new(&config(1_000));
        let ptr = animator.particles().positions().as_ptr();
        for i in 0..100 {
            animator.tick(i as f64);
        }
        assert_eq!(animator.particles().positions().as_ptr(), ptr);
        assert_eq!(animator.particles().positions().len(), 3_000);
        assert_eq!(animator.particles().colors().len(), 3_000);
    }

    #[test]
    fn test_zero_particles() {
        let mut animator = ParticleFieldAnimator::new(&config(0));
        animator.tick(1.0);
        assert_eq!(animator.frame().particle_count(), 0);
        assert_eq!(animator.ticks(), 1);
    }

    /// Shortest distance between two angles.
    fn angle_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn test_rotation_keeps_advancing_after_long_runs() {
        let step = DEFAULT_ROTATION_STEP;
        let mut rotation = RotationState::default();
        let mut k: u64 = 0;

        for target in [1_000_000u64, 10_000_000, 40_000_000] {
            while k < target {
                rotation.advance(step);
                k += 1;
            }
            let expected = (k as f64 * step as f64).rem_euclid(TAU);
            assert!(
                angle_gap(rotation.x, expected) < 1e-6,
                "k={} angle={} expected={}",
                k,
                rotation.x,
                expected
            );
            assert!((0.0..TAU).contains(&rotation.x));
            assert_eq!(rotation.x, rotation.y);
        }

        let before = rotation;
        rotation.advance(step);
        assert!((angle_gap(rotation.x, before.x) - step as f64).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_wrap_keeps_matrix() {
        let near_turn = RotationState { x: TAU - 0.001, y: TAU - 0.001 };
        let mut wrapped = near_turn;
        wrapped.advance(0.002);
        assert!(wrapped.x < 0.01);

        let unwrapped = RotationState {
            x: near_turn.x + 0.002_f32 as f64,
            y: near_turn.y + 0.002_f32 as f64,
        };
        assert!(wrapped.matrix().abs_diff_eq(unwrapped.matrix(), 1e-5));
    }

    #[test]
    fn test_rotation_matrix_identity_at_rest() {
        assert!(RotationState::default().matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_stop_handle_shared() {
        let a = StopHandle::new();
        let b = a.clone();
        assert!(!a.is_stopped());
        b.stop();
        assert!(a.is_stopped());
    }

    #[test]
    fn test_frame_skips_when_stopped() {
        struct Cam;
        impl CameraController for Cam {
            fn update(&mut self) {
                panic!("camera updated after stop");
            }
            fn view_proj(&self, _aspect: f32) -> Mat4 {
                Mat4::IDENTITY
            }
        }
        struct NoDraw;
        impl FrameRenderer for NoDraw {
            type Error = ();
            fn configure(&mut self, _viewport: &Viewport) {}
            fn draw(&mut self, _frame: &FieldFrame<'_>, _view_proj: Mat4) -> Result<(), ()> {
                panic!("drawn after stop");
            }
        }

        let stop = StopHandle::new();
        let mut anim = AnimationLoop::new(
            ParticleFieldAnimator::new(&config(5)),
            FixedStepClock::new(0.0, 1.0),
            stop.clone(),
        );
        stop.stop();

        assert_eq!(anim.frame(&mut Cam, &mut NoDraw, 1.0), Ok(LoopState::Stopped));
        assert_eq!(anim.animator().ticks(), 0);
        assert_eq!(anim.clock().samples(), 0);
    }
}
