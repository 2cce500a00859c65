//! Source images for sampling.
//!
//! A source image exposes its decoded RGBA8 pixels only once decoding has completed:
//! - Implement [`SourceImage`] for custom decoders or host-owned images.
//! - Use [`DeferredImage`] when pixels arrive after the effect is wired up.
//! - [`PixelBuffer`](crate::surface::PixelBuffer) is always ready.
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::surface::PixelBuffer;

/// Borrowed view of a decoded RGBA8 image (row-major, 4 bytes per pixel).
#[derive(Clone, Copy, Debug)]
pub struct DecodedImage<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: &'a [u8],
}

impl<'a> DecodedImage<'a> {
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> Self {
        debug_assert_eq!(
            rgba.len(),
            width as usize * height as usize * 4,
            "rgba buffer does not match dimensions"
        );
        Self {
            width,
            height,
            rgba,
        }
    }

    /// RGBA at `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// An image that may still be decoding.
pub trait SourceImage {
    /// Returns the decoded pixels, or `None` while decoding is in flight.
    fn decoded(&self) -> Option<DecodedImage<'_>>;

    fn is_ready(&self) -> bool {
        self.decoded().is_some()
    }
}

impl SourceImage for PixelBuffer {
    fn decoded(&self) -> Option<DecodedImage<'_>> {
        Some(self.view())
    }
}

/// An image whose pixels are supplied once decoding completes.
#[derive(Debug, Default)]
pub struct DeferredImage {
    pixels: OnceLock<PixelBuffer>,
}

impl DeferredImage {
    pub fn new() -> Self {
        Self {
            pixels: OnceLock::new(),
        }
    }

    /// Marks decoding as complete. Fails if pixels were already supplied.
    pub fn complete(&self, pixels: PixelBuffer) -> Result<()> {
        self.pixels
            .set(pixels)
            .map_err(|_| Error::Other("deferred image already completed".into()))
    }
}

impl SourceImage for DeferredImage {
    fn decoded(&self) -> Option<DecodedImage<'_>> {
        self.pixels.get().map(PixelBuffer::view)
    }
}

#[cfg(feature = "image")]
impl SourceImage for image::RgbaImage {
    fn decoded(&self) -> Option<DecodedImage<'_>> {
        Some(DecodedImage::new(self.width(), self.height(), self.as_raw()))
    }
}

#[cfg(feature = "image")]
impl From<image::RgbaImage> for PixelBuffer {
    fn from(value: image::RgbaImage) -> Self {
        let (width, height) = value.dimensions();
        PixelBuffer::from_raw_unchecked(width, height, value.into_raw())
    }
}
