//! Integration tests for the animation loop.
//!
//! These drive `AnimationLoop` without a window: a fixed-step clock, a
//! renderer that records what it was shown, and schedulers that stop the
//! loop after a set number of frames.

use cosmic_field::light::Flicker;
use cosmic_field::particles::wave_height;
use cosmic_field::time::{Clock, FixedStepClock};
use cosmic_field::{
    AnimationLoop, CameraController, FieldConfig, FieldFrame, FrameRenderer, FrameScheduler,
    LightState, LoopState, Mat4, OrbitControls, ParticleFieldAnimator, ParticleSet, StopHandle,
    Viewport,
};

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Drawn {
    time: f64,
    tick: u64,
    first_y: Option<f32>,
    light: LightState,
    particles: usize,
}

#[derive(Default)]
struct RecordingRenderer {
    configured: Vec<(u32, u32, f64)>,
    frames: Vec<Drawn>,
    fail_on: Option<usize>,
}

impl FrameRenderer for RecordingRenderer {
    type Error = String;

    fn configure(&mut self, viewport: &Viewport) {
        self.configured
            .push((viewport.width(), viewport.height(), viewport.pixel_ratio()));
    }

    fn draw(&mut self, frame: &FieldFrame<'_>, _view_proj: Mat4) -> Result<(), String> {
        if self.fail_on == Some(self.frames.len()) {
            return Err("surface lost".to_string());
        }
        self.frames.push(Drawn {
            time: frame.time,
            tick: frame.tick,
            first_y: frame.positions.get(1).copied(),
            light: *frame.light,
            particles: frame.particle_count(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct CountingCamera {
    updates: u32,
}

impl CameraController for CountingCamera {
    fn update(&mut self) {
        self.updates += 1;
    }

    fn view_proj(&self, _aspect: f32) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// Stops the loop once `remaining` frames have been requested.
struct StopAfter {
    remaining: u32,
    stop: StopHandle,
    requests: u32,
}

impl StopAfter {
    fn new(frames: u32, stop: &StopHandle) -> Self {
        Self {
            remaining: frames,
            stop: stop.clone(),
            requests: 0,
        }
    }
}

impl FrameScheduler for StopAfter {
    fn request_frame(&mut self) {
        self.requests += 1;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop.stop();
        }
    }
}

/// Clock that counts how often it is read.
struct CountingClock {
    inner: FixedStepClock,
    reads: u64,
}

impl Clock for CountingClock {
    fn now(&mut self) -> f64 {
        self.reads += 1;
        self.inner.now()
    }
}

fn config(count: usize) -> FieldConfig {
    FieldConfig {
        particle_count: count,
        seed: Some(2024),
        ..Default::default()
    }
}

fn new_loop(count: usize, start: f64, step: f64) -> (AnimationLoop<FixedStepClock>, StopHandle) {
    let stop = StopHandle::new();
    let anim = AnimationLoop::new(
        ParticleFieldAnimator::new(&config(count)),
        FixedStepClock::new(start, step),
        stop.clone(),
    );
    (anim, stop)
}

// ============================================================================
// Loop behaviour
// ============================================================================

#[test]
fn test_run_stops_on_handle() {
    let (mut anim, stop) = new_loop(50, 0.0, 1.0 / 60.0);
    let mut renderer = RecordingRenderer::default();
    let mut camera = CountingCamera::default();
    let mut scheduler = StopAfter::new(10, &stop);

    let frames = anim.run(&mut camera, &mut renderer, &mut scheduler).unwrap();

    assert_eq!(frames, 10);
    assert_eq!(renderer.frames.len(), 10);
    assert_eq!(camera.updates, 10);
    assert_eq!(anim.animator().ticks(), 10);
    assert!(anim.is_stopped());
}

#[test]
fn test_no_request_after_stop() {
    let (mut anim, stop) = new_loop(5, 0.0, 0.1);
    let mut renderer = RecordingRenderer::default();
    let mut scheduler = StopAfter::new(3, &stop);

    anim.run(&mut CountingCamera::default(), &mut renderer, &mut scheduler)
        .unwrap();
    assert_eq!(scheduler.requests, 3);

    // Further frames are refused without ticking.
    let state = anim
        .frame(&mut CountingCamera::default(), &mut renderer, 1.0)
        .unwrap();
    assert_eq!(state, LoopState::Stopped);
    assert_eq!(anim.animator().ticks(), 3);
}

#[test]
fn test_stopped_before_start_runs_nothing() {
    let (mut anim, stop) = new_loop(5, 0.0, 0.1);
    stop.stop();
    let mut renderer = RecordingRenderer::default();
    let frames = anim
        .run(
            &mut CountingCamera::default(),
            &mut renderer,
            &mut StopAfter::new(100, &stop),
        )
        .unwrap();
    assert_eq!(frames, 0);
    assert!(renderer.frames.is_empty());
    assert_eq!(anim.clock().samples(), 0);
}

#[test]
fn test_renderer_error_ends_run() {
    let (mut anim, stop) = new_loop(5, 0.0, 0.1);
    let mut renderer = RecordingRenderer {
        fail_on: Some(4),
        ..Default::default()
    };
    let result = anim.run(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(100, &stop),
    );
    assert_eq!(result, Err("surface lost".to_string()));
    assert_eq!(renderer.frames.len(), 4);
}

#[test]
fn test_configure_receives_viewport() {
    let (mut anim, stop) = new_loop(5, 0.0, 0.1);
    let mut renderer = RecordingRenderer::default();
    let viewport = Viewport::new(0, 600, 3.0);
    anim.run_with_viewport(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(1, &stop),
        &viewport,
    )
    .unwrap();
    assert_eq!(renderer.configured, vec![(1, 600, 2.0)]);
}

#[test]
fn test_clock_sampled_once_per_tick() {
    let stop = StopHandle::new();
    let clock = CountingClock {
        inner: FixedStepClock::new(0.0, 0.5),
        reads: 0,
    };
    let mut anim = AnimationLoop::new(ParticleFieldAnimator::new(&config(20)), clock, stop.clone());
    let mut renderer = RecordingRenderer::default();

    anim.run(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(7, &stop),
    )
    .unwrap();

    assert_eq!(anim.clock().reads, 7);
    let times: Vec<f64> = renderer.frames.iter().map(|f| f.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
}

// ============================================================================
// What the renderer sees
// ============================================================================

#[test]
fn test_renderer_sees_same_tick_state() {
    let (mut anim, stop) = new_loop(30, 3.0, 0.25);
    let original = ParticleFieldAnimator::new(&config(30)).particles().clone();
    let mut renderer = RecordingRenderer::default();

    anim.run(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(4, &stop),
    )
    .unwrap();

    let first = original.position(0).unwrap();
    let flicker = Flicker::default();
    for (i, drawn) in renderer.frames.iter().enumerate() {
        let t = 3.0 + i as f64 * 0.25;
        assert_eq!(drawn.tick, i as u64 + 1);
        assert_eq!(drawn.time, t);
        assert_eq!(drawn.first_y, Some(wave_height(first.x, first.z, t, 2.0)));

        let mut expected = LightState::new();
        expected.apply_flicker(&flicker, t);
        assert_eq!(drawn.light.intensity, expected.intensity);
        assert_eq!(drawn.light.position, expected.position);
    }
}

#[test]
fn test_zero_particles_still_ticks_light() {
    let (mut anim, stop) = new_loop(0, 10.0, 0.1);
    let mut renderer = RecordingRenderer::default();
    anim.run(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(3, &stop),
    )
    .unwrap();

    assert_eq!(renderer.frames.len(), 3);
    assert!(renderer.frames.iter().all(|f| f.particles == 0 && f.first_y.is_none()));
    assert!((renderer.frames[0].light.intensity - 0.0616).abs() < 1e-3);
}

// ============================================================================
// Light is time driven, rotation is tick driven
// ============================================================================

#[test]
fn test_hundred_ticks_fixed_step() {
    let dt = 1.0 / 60.0;
    let (mut anim, stop) = new_loop(100, 0.0, dt);
    let mut renderer = RecordingRenderer::default();
    anim.run(
        &mut CountingCamera::default(),
        &mut renderer,
        &mut StopAfter::new(100, &stop),
    )
    .unwrap();

    let step = FieldConfig::default().rotation_step as f64;
    let rotation = anim.animator().rotation();
    assert!((rotation.x - 100.0 * step).abs() < 1e-9);
    assert!((rotation.y - 100.0 * step).abs() < 1e-9);

    // Light after tick 100 depends only on the elapsed time of that tick.
    let mut expected = LightState::new();
    expected.apply_flicker(&Flicker::default(), 99.0 * dt);
    assert_eq!(*anim.animator().light(), expected);
}

#[test]
fn test_rotation_ignores_time_values() {
    let slow = {
        let (mut anim, stop) = new_loop(10, 0.0, 0.001);
        anim.run(
            &mut CountingCamera::default(),
            &mut RecordingRenderer::default(),
            &mut StopAfter::new(100, &stop),
        )
        .unwrap();
        anim.animator().rotation()
    };
    let fast = {
        let (mut anim, stop) = new_loop(10, 5_000.0, 3.0);
        anim.run(
            &mut CountingCamera::default(),
            &mut RecordingRenderer::default(),
            &mut StopAfter::new(100, &stop),
        )
        .unwrap();
        anim.animator().rotation()
    };
    assert_eq!(slow, fast);
}

#[test]
fn test_positions_pure_in_time() {
    let mut a = ParticleFieldAnimator::new(&config(256));
    let mut b = a.clone();

    a.tick(42.0);
    for i in 0..60 {
        b.tick(i as f64 * 0.7 + 100.0);
    }
    b.tick(42.0);

    assert_eq!(a.particles(), b.particles());
}

#[test]
fn test_buffer_lengths_stable() {
    for count in [0usize, 1, 7, 1_500] {
        let mut animator = ParticleFieldAnimator::new(&config(count));
        for i in 0..20 {
            animator.tick(i as f64);
            let frame = animator.frame();
            assert_eq!(frame.positions.len(), 3 * count);
            assert_eq!(frame.colors.len(), 3 * count);
        }
    }
}

#[test]
fn test_custom_particle_set() {
    let set = ParticleSet::from_buffers(vec![0.0, 9.0, 0.0], vec![0.3, 0.3, 0.3]).unwrap();
    let mut animator = ParticleFieldAnimator::with_particles(set, &config(1));
    animator.tick(0.0);
    // sin(0) * 2 + cos(0) * 2
    assert_eq!(animator.particles().position(0).unwrap().y, 2.0);
}

// ============================================================================
// With the real orbit controls
// ============================================================================

#[test]
fn test_orbit_controls_settle_during_loop() {
    let (mut anim, stop) = new_loop(10, 0.0, 0.1);
    let mut controls = OrbitControls::default();
    controls.rotate(120.0, 30.0, 720.0);
    assert!(controls.is_settling());

    anim.run(
        &mut controls,
        &mut RecordingRenderer::default(),
        &mut StopAfter::new(200, &stop),
    )
    .unwrap();

    assert!(!controls.is_settling());
    assert!(controls.camera().yaw < 0.0);
    assert!(controls.camera().pitch > 0.0);
}
