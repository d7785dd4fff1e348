// THEORY:
// The `motion_locator` is the engine of the tracker. It compares the bright mask of
// the current frame against the one from the previous frame and answers two
// questions: which pixels *became* bright, and where is the centre of that newly
// bright area?
//
// Algorithm steps:
// 1.  **Differencing**: A cell is "active" when its value changed by strictly more
//     than the difference threshold AND it is bright now. A light that switches
//     off, or a bright spot that stays put, produces no active cells. Only leading
//     edges of bright regions register as motion.
// 2.  **Overlay**: Active cells are written as opaque into an alpha plane the same
//     size as the frame; everything else is transparent. The rendering layer paints
//     this plane in a highlight colour over the live video.
// 3.  **Centroid**: Coordinates of active cells are summed during the same scan. If
//     the active area exceeds the minimum movement size, the mean position becomes
//     the centroid. Means are rounded half-to-even, so a 10-row block spanning rows
//     0..=9 lands on row 4.
// 4.  **Stateless Utility**: Like thresholding, this is a pure function of its
//     inputs. The analyzer owns the only copy of the previous mask.

use crate::core_modules::bright_mask::bright_mask::{BRIGHT, BrightMask};
use crate::error::AnalyzerError;
use image::{GrayImage, Rgba, RgbaImage};

/// Mean position of the active cells in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Centroid {
    pub x: u32,
    pub y: u32,
}

/// Alpha plane marking the cells that newly became bright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMask {
    alpha: GrayImage,
    active_pixels: usize,
}

impl OverlayMask {
    pub const OPAQUE: u8 = 255;
    pub const TRANSPARENT: u8 = 0;

    pub fn width(&self) -> u32 {
        self.alpha.width()
    }

    pub fn height(&self) -> u32 {
        self.alpha.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.alpha.dimensions()
    }

    pub fn active_pixels(&self) -> usize {
        self.active_pixels
    }

    pub fn is_active(&self, x: u32, y: u32) -> bool {
        self.alpha
            .get_pixel_checked(x, y)
            .is_some_and(|a| a.0[0] == Self::OPAQUE)
    }

    /// Row-major coordinates of every active cell.
    pub fn active_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.alpha
            .enumerate_pixels()
            .filter(|(_, _, a)| a.0[0] == Self::OPAQUE)
            .map(|(x, y, _)| (x, y))
    }

    /// Paints active cells in `color`, keeping its alpha; inactive cells are fully
    /// transparent. The result is meant to be alpha-blended over the frame.
    pub fn to_rgba(&self, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            if self.alpha.get_pixel(x, y).0[0] == Self::OPAQUE {
                color
            } else {
                Rgba([0, 0, 0, Self::TRANSPARENT])
            }
        })
    }
}

pub mod motion_locator {
    use super::*;

    /// Differences two masks of equal size and locates the newly bright area.
    ///
    /// Returns the overlay for every tick, and a centroid only when the number of
    /// active cells is strictly greater than `min_pixels`.
    pub fn diff_and_locate(
        current: &BrightMask,
        previous: &BrightMask,
        diff_threshold: u8,
        min_pixels: usize,
    ) -> Result<(OverlayMask, Option<Centroid>), AnalyzerError> {
        if current.dimensions() != previous.dimensions() {
            return Err(AnalyzerError::DimensionMismatch {
                expected: previous.dimensions(),
                actual: current.dimensions(),
            });
        }

        let (width, height) = current.dimensions();
        let mut alpha = GrayImage::new(width, height);
        let mut sum_x = 0u64;
        let mut sum_y = 0u64;
        let mut active_pixels = 0usize;

        let cells = current.cells().iter().zip(previous.cells());
        for ((x, y, out), (&now, &before)) in alpha.enumerate_pixels_mut().zip(cells) {
            if now.abs_diff(before) > diff_threshold && now == BRIGHT {
                out.0[0] = OverlayMask::OPAQUE;
                sum_x += x as u64;
                sum_y += y as u64;
                active_pixels += 1;
            }
        }

        let centroid = (active_pixels > min_pixels).then(|| Centroid {
            x: mean_coordinate(sum_x, active_pixels),
            y: mean_coordinate(sum_y, active_pixels),
        });

        tracing::trace!(active_pixels, ?centroid, "mask difference scanned");

        Ok((OverlayMask { alpha, active_pixels }, centroid))
    }

    fn mean_coordinate(sum: u64, count: usize) -> u32 {
        (sum as f64 / count as f64).round_ties_even() as u32
    }
}
