//! The particle buffers animated by the field.
//!
//! A [`ParticleSet`] is a flat, index-aligned pair of `f32` buffers laid out
//! exactly as the GPU consumes them: particle `i` owns `positions[3i..3i+3]`
//! and `colors[3i..3i+3]`. Both buffers are allocated once and never resized.
//!
//! # Example
//!
//! ```
//! use cosmic_field::particles::ParticleSet;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut set = ParticleSet::random(1_000, 15.0, 0.2, 0.3, &mut rng);
//! set.apply_wave(10.0, 2.0);
//! assert_eq!(set.positions().len(), 3_000);
//! ```

use glam::Vec3;
use rand::Rng;

/// Evaluate the wave field at a particle's fixed X/Z coordinates.
///
/// `y = sin(x + t) * a + cos(z + t) * a`. Evaluated in `f64` so that large
/// wall-clock values of `t` do not lose phase precision.
#[inline]
pub fn wave_height(x: f32, z: f32, t: f64, amplitude: f32) -> f32 {
    let a = amplitude as f64;
    ((x as f64 + t).sin() * a + (z as f64 + t).cos() * a) as f32
}

/// Positions and colors of every point in the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl ParticleSet {
    /// Scatter `count` particles uniformly inside a cube of side `extent`
    /// centred on the origin.
    ///
    /// Each color channel is drawn from `[color_base, color_base + color_spread)`.
    pub fn random<R: Rng + ?Sized>(
        count: usize,
        extent: f32,
        color_base: f32,
        color_spread: f32,
        rng: &mut R,
    ) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut colors = Vec::with_capacity(count * 3);

        for _ in 0..count {
            for _ in 0..3 {
                positions.push((rng.gen::<f32>() - 0.5) * extent);
            }
            for _ in 0..3 {
                colors.push(rng.gen::<f32>() * color_spread + color_base);
            }
        }

        Self { positions, colors }
    }

    /// Build a set from explicit buffers.
    ///
    /// Returns `None` unless both buffers have the same length and that
    /// length is a multiple of three.
    pub fn from_buffers(positions: Vec<f32>, colors: Vec<f32>) -> Option<Self> {
        if positions.len() != colors.len() || positions.len() % 3 != 0 {
            return None;
        }
        Some(Self { positions, colors })
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the set holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `[x0, y0, z0, x1, ...]` position buffer.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `[r0, g0, b0, r1, ...]` color buffer.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Position of particle `i`.
    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.positions
            .get(i * 3..i * 3 + 3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }

    /// Color of particle `i`.
    pub fn color(&self, i: usize) -> Option<Vec3> {
        self.colors
            .get(i * 3..i * 3 + 3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }

    /// Rewrite every particle's Y from the wave field at time `t`.
    ///
    /// X and Z are read but never written, so the result depends only on
    /// `(x, z, t)` and not on any previous Y. Works in place.
    pub fn apply_wave(&mut self, t: f64, amplitude: f32) {
        for p in self.positions.chunks_exact_mut(3) {
            p[1] = wave_height(p[0], p[2], t, amplitude);
        }
    }
}
