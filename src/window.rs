//! winit application driving the field.
//!
//! The event loop is the frame scheduler: every `RedrawRequested` runs one
//! [`AnimationLoop::frame`] and, unless the loop was stopped, requests the
//! next redraw. Resize and double-click are handled here, outside the
//! animation core.

use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window, WindowId},
};

use crate::animator::{AnimationLoop, FrameRenderer, FrameScheduler, LoopState, ParticleFieldAnimator, StopHandle};
use crate::camera::{Camera, OrbitControls};
use crate::error::RunError;
use crate::field::FieldConfig;
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode};
use crate::time::Time;
use crate::viewport::Viewport;

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Schedules frames by asking the window for a redraw.
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

pub(crate) struct App {
    config: FieldConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    animation: AnimationLoop<Time>,
    controls: OrbitControls,
    input: Input,
    viewport: Viewport,
    stop: StopHandle,
    error: Option<RunError>,
}

impl App {
    pub(crate) fn new(config: FieldConfig) -> Self {
        let stop = StopHandle::new();
        let mut time = Time::new();
        time.set_fps_interval(FPS_LOG_INTERVAL);

        let animation = AnimationLoop::new(ParticleFieldAnimator::new(&config), time, stop.clone());
        let controls = OrbitControls::new(Camera::new(), config.orbit);
        let (width, height) = config.window_size;

        Self {
            window: None,
            gpu_state: None,
            animation,
            controls,
            input: Input::new(),
            viewport: Viewport::new(width, height, 1.0),
            stop,
            error: None,
            config,
        }
    }

    /// The error that ended the event loop, if any.
    pub(crate) fn into_error(self) -> Option<RunError> {
        self.error
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());

        let colors = self.animation.animator().particles().colors();
        let mut gpu_state = pollster::block_on(GpuState::new(window.clone(), colors, &self.config))?;
        gpu_state.configure(&self.viewport);

        window.request_redraw();
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        // The user may have left fullscreen through the window manager.
        self.viewport.set_fullscreen(window.fullscreen().is_some());
        let fullscreen = self.viewport.toggle_fullscreen();
        window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        log::debug!("fullscreen: {}", fullscreen);
    }

    /// Tear down GPU state and leave the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.stop.stop();
        self.gpu_state = None;
        log::info!("stopped after {} frames", self.animation.animator().ticks());
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            self.stop.stop();
        }
        if self.input.double_clicked() {
            self.toggle_fullscreen();
        }

        let (_, physical_height) = self.viewport.physical_size();
        self.controls.handle_input(&self.input, physical_height as f32);
        self.input.begin_frame();

        // Resumed by the next non-zero resize.
        if self.viewport.is_minimized() {
            return;
        }

        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        match self.animation.frame(&mut self.controls, gpu_state, self.viewport.aspect()) {
            Ok(LoopState::Running) => {
                let time = self.animation.clock();
                if time.fps_refreshed() {
                    log::info!("{:.1} fps", time.fps());
                }
                if !self.animation.is_stopped() {
                    RedrawScheduler(window).request_frame();
                }
            }
            Ok(LoopState::Stopped) => self.shutdown(event_loop),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
                RedrawScheduler(window).request_frame();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.shutdown(event_loop);
            }
            Err(e) => {
                log::warn!("render error: {:?}", e);
                RedrawScheduler(window).request_frame();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                let was_minimized = self.viewport.is_minimized();
                self.viewport
                    .resize_physical(physical_size.width, physical_size.height);
                if self.viewport.is_minimized() {
                    log::debug!("window minimised, pausing redraws");
                    return;
                }
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.configure(&self.viewport);
                }
                if was_minimized {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.viewport.set_scale_factor(scale_factor);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.input.handle_event(&other),
        }
    }
}
