//! Raster drawing surfaces.
//!
//! [`RasterSurface`] is the single rendering target of the effect. It supports the four
//! operations the pipeline needs: clearing a region, drawing an image at a position,
//! reading the pixel buffer back, and filling rectangles. [`PixelBuffer`] is an in-memory
//! RGBA8 implementation used for sampling and for offscreen rendering.
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::source::DecodedImage;

/// A 2D raster drawing surface.
pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resets the given region to fully transparent black. The region is clipped to the surface.
    fn clear_rect(&mut self, x: i64, y: i64, width: u32, height: u32);

    /// Resets the whole surface.
    fn clear(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.clear_rect(0, 0, w, h);
    }

    /// Composites `image` with its top-left corner at `(x, y)` using source-over.
    fn draw_image(&mut self, image: &DecodedImage<'_>, x: i64, y: i64);

    /// Reads back the full pixel buffer.
    fn read_pixels(&self) -> DecodedImage<'_>;

    /// Fills an axis-aligned rectangle with an opaque color.
    ///
    /// A pixel is covered when its center lies inside `[x, x + width) x [y, y + height)`.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb);
}

/// An owned RGBA8 pixel buffer, transparent on creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Creates a buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps raw row-major RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "pixel buffer of {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self::from_raw_unchecked(width, height, data))
    }

    pub(crate) fn from_raw_unchecked(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Get the size of the buffer as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn view(&self) -> DecodedImage<'_> {
        DecodedImage::new(self.width, self.height, &self.data)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.view().pixel(x, y)
    }

    /// Overwrites the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Clips `[start, start + len)` to `[0, limit)`.
    fn clip_span(start: i64, len: i64, limit: u32) -> Option<(u32, u32)> {
        let lo = start.max(0);
        let hi = start.saturating_add(len).min(limit as i64);
        (lo < hi).then_some((lo as u32, hi as u32))
    }

    /// Pixel indices whose centers fall in `[start, start + len)`, clipped to `[0, limit)`.
    fn covered_span(start: f32, len: f32, limit: u32) -> Option<(u32, u32)> {
        if !start.is_finite() || !len.is_finite() || len <= 0.0 {
            return None;
        }
        let lo = (start - 0.5).ceil().max(0.0);
        let hi = (start + len - 0.5).ceil().min(limit as f32);
        (lo < hi).then_some((lo as u32, hi as u32))
    }
}

/// Straight-alpha source-over of `src` onto `dst`.
#[inline]
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let sa = sa as f32 / 255.0;
            let da = dst[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let mut out = [0u8; 4];
            for c in 0..3 {
                let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
                out[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            out
        }
    }
}

impl RasterSurface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: i64, y: i64, width: u32, height: u32) {
        let Some((x0, x1)) = Self::clip_span(x, width as i64, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::clip_span(y, height as i64, self.height) else {
            return;
        };
        for py in y0..y1 {
            let start = self.index(x0, py);
            let end = self.index(x1, py);
            self.data[start..end].fill(0);
        }
    }

    fn draw_image(&mut self, image: &DecodedImage<'_>, x: i64, y: i64) {
        let Some((x0, x1)) = Self::clip_span(x, image.width as i64, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::clip_span(y, image.height as i64, self.height) else {
            return;
        };
        for py in y0..y1 {
            let sy = (py as i64 - y) as u32;
            for px in x0..x1 {
                let sx = (px as i64 - x) as u32;
                let Some(src) = image.pixel(sx, sy) else {
                    continue;
                };
                let i = self.index(px, py);
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                self.data[i..i + 4].copy_from_slice(&blend_over(src, dst));
            }
        }
    }

    fn read_pixels(&self) -> DecodedImage<'_> {
        self.view()
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let Some((x0, x1)) = Self::covered_span(x, width, self.width) else {
            return;
        };
        let Some((y0, y1)) = Self::covered_span(y, height, self.height) else {
            return;
        };
        let rgba = color.to_rgba();
        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px, py);
                self.data[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn new_buffer_is_transparent() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.size(), (3, 2));
        assert_eq!(buf.as_raw().len(), 24);
        assert!(buf.as_raw().iter().all(|b| *b == 0));
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn clear_rect_is_clipped() {
        let mut buf = PixelBuffer::filled(4, 4, RED);
        buf.clear_rect(-2, -2, 4, 4);
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(2, 2), Some(RED));
        assert_eq!(buf.pixel(2, 0), Some(RED));

        buf.clear();
        assert!(buf.as_raw().iter().all(|b| *b == 0));
    }

    #[test]
    fn draw_image_reproduces_source_on_cleared_surface() {
        let src = PixelBuffer::from_raw(
            2,
            1,
            vec![10, 20, 30, 255, 40, 50, 60, 128],
        )
        .expect("valid buffer");
        let mut buf = PixelBuffer::new(4, 4);
        buf.draw_image(&src.view(), 1, 2);
        assert_eq!(buf.pixel(1, 2), Some([10, 20, 30, 255]));
        assert_eq!(buf.pixel(2, 2), Some([40, 50, 60, 128]));
        assert_eq!(buf.pixel(0, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_image_clips_negative_offsets() {
        let src = PixelBuffer::filled(4, 4, RED);
        let mut buf = PixelBuffer::new(2, 2);
        buf.draw_image(&src.view(), -3, -3);
        assert_eq!(buf.pixel(0, 0), Some(RED));
        assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_image_transparent_pixels_keep_destination() {
        let mut buf = PixelBuffer::filled(1, 1, RED);
        let src = PixelBuffer::new(1, 1);
        buf.draw_image(&src.view(), 0, 0);
        assert_eq!(buf.pixel(0, 0), Some(RED));
    }

    #[test]
    fn fill_rect_covers_pixel_centers() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.fill_rect(2.0, 3.0, 3.0, 2.0, Rgb::new(0, 255, 0));
        let painted: Vec<(u32, u32)> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.pixel(x, y) == Some([0, 255, 0, 255]))
            .collect();
        assert_eq!(
            painted,
            vec![(2, 3), (3, 3), (4, 3), (2, 4), (3, 4), (4, 4)]
        );
    }

    #[test]
    fn fill_rect_handles_fractional_and_offscreen_rects() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(0.6, 0.0, 1.0, 1.0, Rgb::WHITE);
        // Only pixel 1 has its center (1.5) inside [0.6, 1.6).
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(1, 0), Some([255, 255, 255, 255]));

        let before = buf.clone();
        buf.fill_rect(-100.0, -100.0, 30.0, 30.0, Rgb::WHITE);
        buf.fill_rect(f32::NAN, 0.0, 30.0, 30.0, Rgb::WHITE);
        buf.fill_rect(0.0, 0.0, 0.0, 30.0, Rgb::WHITE);
        assert_eq!(buf, before);
    }

    #[test]
    fn blend_over_partial_alpha_on_opaque_destination() {
        let out = blend_over([255, 255, 255, 128], [0, 0, 0, 255]);
        assert_eq!(out[3], 255);
        assert!((out[0] as i32 - 128).abs() <= 1);
    }
}
