//! Constructor-time configuration for a particle effect.
use glam::Vec2;
use mint::Vector2;

use crate::error::{Error, Result};
use crate::sampling::{CanvasSize, DEFAULT_GRID_SPACING};

/// Default edge length of a particle square in device pixels.
pub const DEFAULT_PARTICLE_SIZE: f32 = 30.0;

/// Default per-axis range for initial velocities.
pub const DEFAULT_VELOCITY_RANGE: (f32, f32) = (-1.0, 1.0);

/// Configuration for sampling an image and building its particle field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectConfig {
    /// Viewport size supplied by the host at startup.
    pub canvas_extent: Vec2,
    /// Lattice spacing in pixels; lower values give denser, more expensive fields.
    pub grid_spacing: u32,
    /// Edge length of each particle square. Not tied to `grid_spacing`.
    pub particle_size: f32,
    /// Uniform range `(min, max)` for each initial velocity component.
    pub initial_velocity_range: (f32, f32),
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            canvas_extent: Vec2::ZERO,
            grid_spacing: DEFAULT_GRID_SPACING,
            particle_size: DEFAULT_PARTICLE_SIZE,
            initial_velocity_range: DEFAULT_VELOCITY_RANGE,
        }
    }
}

impl EffectConfig {
    /// Creates a new [`EffectConfig`] with the specified canvas extent.
    pub fn new(canvas_extent: impl Into<Vector2<f32>>) -> Self {
        Self {
            canvas_extent: Vec2::from(canvas_extent.into()),
            ..Default::default()
        }
    }

    /// Sets the canvas extent.
    pub fn with_canvas_extent(mut self, canvas_extent: impl Into<Vector2<f32>>) -> Self {
        self.canvas_extent = Vec2::from(canvas_extent.into());
        self
    }

    /// Sets the lattice spacing.
    pub fn with_grid_spacing(mut self, grid_spacing: u32) -> Self {
        self.grid_spacing = grid_spacing;
        self
    }

    /// Sets the particle square size.
    pub fn with_particle_size(mut self, particle_size: f32) -> Self {
        self.particle_size = particle_size;
        self
    }

    /// Sets the initial velocity range.
    pub fn with_initial_velocity_range(mut self, min: f32, max: f32) -> Self {
        self.initial_velocity_range = (min, max);
        self
    }

    /// Whole-pixel canvas size derived from `canvas_extent`.
    pub fn canvas(&self) -> Result<CanvasSize> {
        CanvasSize::from_extent(self.canvas_extent)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.canvas()?;
        if self.grid_spacing < 1 {
            return Err(Error::InvalidConfig("grid_spacing must be >= 1".into()));
        }
        if !self.particle_size.is_finite() || self.particle_size < 0.0 {
            return Err(Error::InvalidConfig(
                "particle_size must be finite and >= 0".into(),
            ));
        }
        let (min, max) = self.initial_velocity_range;
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidConfig(
                "initial_velocity_range bounds must be finite".into(),
            ));
        }
        if min > max {
            return Err(Error::InvalidConfig(format!(
                "initial_velocity_range min {min} exceeds max {max}"
            )));
        }

        Ok(())
    }
}
