//! Input handling for the field window.
//!
//! The `Input` struct provides a clean abstraction over raw window events,
//! tracking both instantaneous events (key just pressed, double click) and
//! continuous state (button held down). The window feeds it every
//! [`WindowEvent`]; once per frame the orbit controls read it and then
//! [`Input::begin_frame`] clears the per-frame parts.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Maximum gap between the two presses of a double click.
pub const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(400);
/// Maximum cursor travel between the two presses of a double click.
pub const DOUBLE_CLICK_DISTANCE: f32 = 4.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Keys the field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    // Key state
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    // Mouse button state
    mouse_held: HashSet<MouseButton>,
    mouse_pressed: HashSet<MouseButton>,

    // Mouse position
    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,

    // Scroll, in wheel lines; positive is away from the user
    scroll_delta: f32,

    // Double click tracking
    last_click: Option<(Instant, Vec2)>,
    double_clicked: bool,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Key Queries ==========

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    // ========== Mouse Queries ==========

    /// Check if a mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Last known cursor position in physical pixels.
    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    /// Total cursor movement this frame in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll this frame in wheel lines.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Whether the left button completed a double click this frame.
    pub fn double_clicked(&self) -> bool {
        self.double_clicked
    }

    // ========== Frame Lifecycle ==========

    /// Clear per-frame state. Call after the frame has consumed its input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        self.double_clicked = false;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    self.key_event(KeyCode::from(keycode), event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.button_event(MouseButton::from(*button), *state, Instant::now());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered to unfocused windows.
                self.keys_held.clear();
                self.mouse_held.clear();
            }
            _ => {}
        }
    }

    fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Only fire pressed event if not already held (no repeat)
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    fn button_event(&mut self, button: MouseButton, state: ElementState, at: Instant) {
        match state {
            ElementState::Pressed => {
                self.mouse_pressed.insert(button);
                self.mouse_held.insert(button);
                if button == MouseButton::Left {
                    self.register_click(at);
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    fn register_click(&mut self, at: Instant) {
        let pos = self.mouse_position.unwrap_or(Vec2::ZERO);
        let is_double = self.last_click.is_some_and(|(prev_at, prev_pos)| {
            at.saturating_duration_since(prev_at) <= DOUBLE_CLICK_TIME
                && prev_pos.distance(pos) <= DOUBLE_CLICK_DISTANCE
        });

        if is_double {
            self.double_clicked = true;
            // A third click starts a new pair.
            self.last_click = None;
        } else {
            self.last_click = Some((at, pos));
        }
    }

    fn cursor_moved(&mut self, pos: Vec2) {
        if let Some(prev) = self.mouse_position {
            self.mouse_delta += pos - prev;
        }
        self.mouse_position = Some(pos);
    }
}
