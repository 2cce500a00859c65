//! Lattice sampling of a source image into seed points.
//!
//! The image is drawn once, centered, onto a raster surface the size of the canvas.
//! The surface is read back and visited on a regular lattice spaced by `grid_spacing`
//! in both axes. Every lattice pixel with non-zero alpha becomes a [`SeedPoint`].
use glam::IVec2;
use mint::Vector2;
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::source::SourceImage;
use crate::surface::{PixelBuffer, RasterSurface};

/// Default lattice spacing in pixels.
pub const DEFAULT_GRID_SPACING: u32 = 5;

/// A sampled lattice pixel: integer canvas position and its RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedPoint {
    pub origin: IVec2,
    pub color: Rgb,
}

impl SeedPoint {
    pub fn new(x: i32, y: i32, color: Rgb) -> Self {
        Self {
            origin: IVec2::new(x, y),
            color,
        }
    }
}

/// Integer canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts a host viewport extent to whole pixels, rounding down.
    ///
    /// Rejects non-finite or negative components.
    pub fn from_extent(extent: impl Into<Vector2<f32>>) -> Result<Self> {
        let extent = extent.into();
        for (axis, v) in [("width", extent.x), ("height", extent.y)] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "canvas {axis} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(Self::new(extent.x.floor() as u32, extent.y.floor() as u32))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Top-left position that places an image of the given size at the canvas center.
    ///
    /// Rounds down when the size difference is odd; negative when the image is larger.
    pub fn centered_offset(&self, image_width: u32, image_height: u32) -> (i64, i64) {
        let dx = self.width as i64 - image_width as i64;
        let dy = self.height as i64 - image_height as i64;
        (dx.div_euclid(2), dy.div_euclid(2))
    }
}

/// Row-major lattice of canvas coordinates spaced by `spacing` in both axes.
///
/// Both coordinates advance by `spacing`, so each coordinate is visited exactly once
/// and iteration finishes after [`Lattice::len`] steps.
#[derive(Clone, Debug)]
pub struct Lattice {
    width: u32,
    height: u32,
    spacing: u32,
    x: u32,
    y: u32,
    remaining: usize,
}

impl Lattice {
    /// Creates a lattice over `canvas`. Fails when `spacing` is zero.
    pub fn new(canvas: CanvasSize, spacing: u32) -> Result<Self> {
        if spacing < 1 {
            return Err(Error::InvalidConfig("grid_spacing must be >= 1".into()));
        }
        let remaining = if canvas.is_empty() {
            0
        } else {
            canvas.width.div_ceil(spacing) as usize * canvas.height.div_ceil(spacing) as usize
        };
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            spacing,
            x: 0,
            y: 0,
            remaining,
        })
    }

    pub fn spacing(&self) -> u32 {
        self.spacing
    }
}

impl Iterator for Lattice {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = (self.x, self.y);
        self.remaining -= 1;
        self.x = self.x.saturating_add(self.spacing);
        if self.x >= self.width {
            self.x = 0;
            self.y = self.y.saturating_add(self.spacing);
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Lattice {}

/// Samples `image` centered on an offscreen canvas of the given size.
///
/// Returns seeds in row-major lattice order. A fully transparent image yields an empty
/// vector. Fails with [`Error::ImageNotReady`] if the image is still decoding and with
/// [`Error::InvalidConfig`] if `grid_spacing` is zero.
pub fn sample<I>(image: &I, canvas: CanvasSize, grid_spacing: u32) -> Result<Vec<SeedPoint>>
where
    I: SourceImage + ?Sized,
{
    let mut surface = PixelBuffer::new(canvas.width, canvas.height);
    sample_onto(&mut surface, image, grid_spacing)
}

/// Like [`sample`], but draws onto a caller-provided surface sized to the canvas.
///
/// The surface is cleared before drawing; its contents afterwards are the centered image.
pub fn sample_onto<S, I>(surface: &mut S, image: &I, grid_spacing: u32) -> Result<Vec<SeedPoint>>
where
    S: RasterSurface + ?Sized,
    I: SourceImage + ?Sized,
{
    let decoded = image.decoded().ok_or(Error::ImageNotReady)?;
    let canvas = CanvasSize::new(surface.width(), surface.height());
    let lattice = Lattice::new(canvas, grid_spacing)?;

    if grid_spacing > canvas.width || grid_spacing > canvas.height {
        warn!(
            "grid_spacing {} exceeds canvas {}x{}; at most one lattice point per axis",
            grid_spacing, canvas.width, canvas.height
        );
    }

    let (ox, oy) = canvas.centered_offset(decoded.width, decoded.height);
    surface.clear();
    surface.draw_image(&decoded, ox, oy);
    let pixels = surface.read_pixels();

    let lattice_points = lattice.len();
    let mut seeds = Vec::new();
    for (x, y) in lattice {
        let Some([r, g, b, a]) = pixels.pixel(x, y) else {
            continue;
        };
        if a > 0 {
            seeds.push(SeedPoint::new(x as i32, y as i32, Rgb::new(r, g, b)));
        }
    }

    debug!(
        lattice_points,
        seeds = seeds.len(),
        grid_spacing,
        "sampled {}x{} image onto {}x{} canvas",
        decoded.width,
        decoded.height,
        canvas.width,
        canvas.height
    );
    Ok(seeds)
}
