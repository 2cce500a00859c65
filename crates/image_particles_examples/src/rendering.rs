//! Shared helpers for the example binaries: tracing setup, image and config loading,
//! procedural source images, and PNG frame output.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgba, RgbaImage};
use image_particles::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Decodes an image file into RGBA8.
pub fn load_rgba(path: impl AsRef<Path>) -> anyhow::Result<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_rgba8();
    info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Reads an [`EffectConfig`] from a RON file. Missing fields take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EffectConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: EffectConfig =
        ron::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// A hue ring on a transparent background; the hole and corners sample to nothing.
pub fn ring_image(size: u32) -> RgbaImage {
    let c = size as f32 * 0.5;
    let outer = c;
    let inner = c * 0.55;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - c;
        let dy = y as f32 + 0.5 - c;
        let r = (dx * dx + dy * dy).sqrt();
        if r > outer || r < inner {
            return Rgba([0, 0, 0, 0]);
        }
        let hue = (dy.atan2(dx) / std::f32::consts::TAU + 0.5) * 6.0;
        let [red, green, blue] = hue_to_rgb(hue);
        Rgba([red, green, blue, 255])
    })
}

/// Maps `h` in [0, 6) onto a fully saturated RGB color.
fn hue_to_rgb(h: f32) -> [u8; 3] {
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Where and how rendered frames are written.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub dir: PathBuf,
    pub prefix: String,
    /// Color shown where the surface is transparent.
    pub background: [u8; 3],
}

impl FrameOutput {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            background: [18, 18, 24],
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn path_for(&self, frame: u64) -> PathBuf {
        self.dir.join(format!("{}-{frame:04}.png", self.prefix))
    }
}

/// Writes `surface` as a PNG with transparent pixels flattened onto the background.
pub fn write_frame_png(
    surface: &PixelBuffer,
    output: &FrameOutput,
    frame: u64,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(&output.dir)
        .with_context(|| format!("failed to create {}", output.dir.display()))?;

    let (width, height) = surface.size();
    let mut flattened = PixelBuffer::filled(
        width,
        height,
        [
            output.background[0],
            output.background[1],
            output.background[2],
            255,
        ],
    );
    flattened.draw_image(&surface.view(), 0, 0);

    let image = RgbaImage::from_raw(width, height, flattened.into_raw())
        .context("pixel buffer does not match its dimensions")?;
    let path = output.path_for(frame);
    image
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(path)
}
