//! Window size, pixel ratio and fullscreen bookkeeping.

/// Pixel ratios above this are rendered at this ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Current drawable area of the window.
///
/// The physical size is stored exactly as the windowing system reports it;
/// logical sizes derive from it. Every dimension is at least 1, so
/// [`Viewport::aspect`] is always finite. A minimised window reports a zero
/// side; the last drawable size is kept and [`Viewport::is_minimized`] is set
/// until a non-zero size arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    fullscreen: bool,
    minimized: bool,
}

impl Viewport {
    /// Viewport of `width x height` logical pixels.
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        let mut viewport = Self {
            physical_width: 1,
            physical_height: 1,
            scale_factor: 1.0,
            fullscreen: false,
            minimized: false,
        };
        viewport.set_scale_factor(scale_factor);
        viewport.resize(width, height);
        viewport
    }

    /// Build from a physical size, as reported by the windowing system.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let mut viewport = Self::new(1, 1, scale_factor);
        viewport.resize_physical(width, height);
        viewport
    }

    /// Logical width, at least 1.
    #[inline]
    pub fn width(&self) -> u32 {
        unscale_dimension(self.physical_width, self.scale_factor)
    }

    /// Logical height, at least 1.
    #[inline]
    pub fn height(&self) -> u32 {
        unscale_dimension(self.physical_height, self.scale_factor)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.physical_width as f32 / self.physical_height as f32
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Device pixel ratio used for rendering, capped at [`MAX_PIXEL_RATIO`].
    #[inline]
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Size in physical pixels.
    #[inline]
    pub fn physical_size(&self) -> (u32, u32) {
        (self.physical_width, self.physical_height)
    }

    /// Whether the window last reported a zero width or height.
    ///
    /// Nothing should be drawn or reconfigured while this is set.
    #[inline]
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Set the logical size, clamping each side to at least 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.physical_width = scale_dimension(width.max(1), self.scale_factor);
        self.physical_height = scale_dimension(height.max(1), self.scale_factor);
    }

    /// Set the size from physical pixels, as reported by the window.
    ///
    /// A zero side marks the viewport minimised and keeps the previous size.
    pub fn resize_physical(&mut self, width: u32, height: u32) {
        self.minimized = width == 0 || height == 0;
        if !self.minimized {
            self.physical_width = width;
            self.physical_height = height;
        }
    }

    /// Non-finite or non-positive factors fall back to 1. The physical size
    /// is kept; the windowing system follows up with a resize.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
    }

    /// Flip the fullscreen flag and return the new state.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Record a fullscreen change made outside the viewport.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

fn scale_dimension(value: u32, scale: f64) -> u32 {
    ((value as f64 * scale).round() as u32).max(1)
}

fn unscale_dimension(value: u32, scale: f64) -> u32 {
    ((value as f64 / scale).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_clamps() {
        let viewport = Viewport::new(0, 0, 1.0);
        assert_eq!(viewport.width(), 1);
        assert_eq!(viewport.height(), 1);
        assert_eq!(viewport.aspect(), 1.0);
    }

    #[test]
    fn test_aspect() {
        let viewport = Viewport::new(1920, 1080, 1.0);
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_ratio_caps() {
        assert_eq!(Viewport::new(10, 10, 1.5).pixel_ratio(), 1.5);
        assert_eq!(Viewport::new(10, 10, 3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(10, 10, 0.0).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(10, 10, f64::NAN).pixel_ratio(), 1.0);
    }

    #[test]
    fn test_logical_scaled_to_physical() {
        let viewport = Viewport::new(800, 600, 1.5);
        assert_eq!(viewport.physical_size(), (1200, 900));
        assert_eq!((viewport.width(), viewport.height()), (800, 600));
    }

    #[test]
    fn test_physical_round_trip() {
        let viewport = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!((viewport.width(), viewport.height()), (1280, 720));
        assert_eq!(viewport.physical_size(), (2560, 1440));
    }

    #[test]
    fn test_minimised_window() {
        let mut viewport = Viewport::from_physical(1600, 900, 1.0);
        assert!(!viewport.is_minimized());

        viewport.resize_physical(0, 0);
        assert!(viewport.is_minimized());
        assert_eq!(viewport.physical_size(), (1600, 900));
        assert!(viewport.aspect().is_finite());

        viewport.resize_physical(800, 0);
        assert!(viewport.is_minimized());
        assert_eq!(viewport.physical_size(), (1600, 900));

        viewport.resize_physical(1024, 768);
        assert!(!viewport.is_minimized());
        assert_eq!(viewport.physical_size(), (1024, 768));
    }

    #[test]
    fn test_created_minimised() {
        let viewport = Viewport::from_physical(0, 0, 1.0);
        assert!(viewport.is_minimized());
        assert_eq!(viewport.physical_size(), (1, 1));
    }

    #[test]
    fn test_toggle_fullscreen() {
        let mut viewport = Viewport::default();
        assert!(!viewport.is_fullscreen());
        assert!(viewport.toggle_fullscreen());
        assert!(!viewport.toggle_fullscreen());
    }
}
