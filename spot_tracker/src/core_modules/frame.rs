// THEORY:
// A `Frame` is a borrowed, read-only view over one captured video image. Capture
// collaborators hand us packed byte buffers in whatever layout their platform
// produces (a canvas readback is RGBA, most decoders emit RGB), so the view records
// the layout and exposes a uniform stream of `Pixel`s to the analysis layer.
//
// The view never copies the buffer. The only validation is the length check in the
// constructor: once a `Frame` exists, every `width * height` pixel is addressable.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::AnalyzerError;
use image::{RgbImage, RgbaImage};

/// Byte layout of a packed frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    /// Alpha is carried but ignored.
    Rgba,
}

impl PixelLayout {
    pub const fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: &'a [u8]) -> Result<Self, AnalyzerError> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(AnalyzerError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn rgb(width: u32, height: u32, data: &'a [u8]) -> Result<Self, AnalyzerError> {
        Self::new(width, height, PixelLayout::Rgb, data)
    }

    pub fn rgba(width: u32, height: u32, data: &'a [u8]) -> Result<Self, AnalyzerError> {
        Self::new(width, height, PixelLayout::Rgba, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Row-major iterator over every pixel of the frame.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + 'a {
        self.data
            .chunks_exact(self.layout.channels())
            .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2]))
    }
}

impl<'a> From<&'a RgbImage> for Frame<'a> {
    fn from(image: &'a RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            layout: PixelLayout::Rgb,
            data: image.as_raw(),
        }
    }
}

impl<'a> From<&'a RgbaImage> for Frame<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            layout: PixelLayout::Rgba,
            data: image.as_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_and_long_buffers() {
        let short = vec![0u8; 2 * 2 * 3 - 1];
        let long = vec![0u8; 2 * 2 * 4 + 4];
        assert_eq!(
            Frame::rgb(2, 2, &short).unwrap_err(),
            AnalyzerError::BufferLength { expected: 12, actual: 11 }
        );
        assert_eq!(
            Frame::rgba(2, 2, &long).unwrap_err(),
            AnalyzerError::BufferLength { expected: 16, actual: 20 }
        );
    }

    #[test]
    fn rgb_and_rgba_views_yield_the_same_pixels() {
        let rgb = [1, 2, 3, 4, 5, 6];
        let rgba = [1, 2, 3, 255, 4, 5, 6, 0];
        let from_rgb: Vec<Pixel> = Frame::rgb(2, 1, &rgb).unwrap().pixels().collect();
        let from_rgba: Vec<Pixel> = Frame::rgba(2, 1, &rgba).unwrap().pixels().collect();
        assert_eq!(from_rgb, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]);
        assert_eq!(from_rgb, from_rgba);
    }

    #[test]
    fn image_buffers_convert_without_copying() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]));
        let frame = Frame::from(&image);
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.layout(), PixelLayout::Rgba);
        assert_eq!(frame.pixels().count(), 6);
        assert!(frame.pixels().all(|p| p == Pixel::new(9, 8, 7)));
    }
}
