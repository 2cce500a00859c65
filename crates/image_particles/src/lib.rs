#![forbid(unsafe_code)]
//! image_particles: image-to-particle disintegration effect.
//!
//! Modules:
//! - sampling: lattice sampling of a centered source image into seed points
//! - field: particles, initialization, per-frame update and draw
//! - animation: tick (clear, draw, update) and cancellable frame scheduling
//! - surface, source: raster surface and decode-aware source images
//! - effect: the sample-then-initialize pipeline
//!
//! For examples and docs, see README and docs.rs.
pub mod animation;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod events;
pub mod field;
mod random;
pub mod sampling;
pub mod source;
pub mod surface;

/// Convenient re-exports for common types. Import with `use image_particles::prelude::*;`.
pub mod prelude {
    pub use crate::animation::{Animation, FnTick, FrameHandle, FrameLoop, FrameScheduler, Tick};
    pub use crate::color::Rgb;
    pub use crate::config::EffectConfig;
    pub use crate::effect::ParticleEffect;
    pub use crate::error::{Error, Result};
    pub use crate::events::{EffectEvent, EventSink, FnSink, VecSink};
    pub use crate::field::{
        draw, initialize, update, update_with, Field, LinearDrift, Motion, Particle,
    };
    pub use crate::sampling::{sample, sample_onto, CanvasSize, Lattice, SeedPoint};
    pub use crate::source::{DecodedImage, DeferredImage, SourceImage};
    pub use crate::surface::{PixelBuffer, RasterSurface};
}
