// THEORY:
// The `BrightMask` is the binary summary of a single frame: every pixel is either
// bright (255) or not (0), judged against a fixed luminance threshold. It is the
// only thing the analyzer remembers between ticks, so it is deliberately small (one
// byte per pixel) and carries no history of its own.
//
// Key architectural principles:
// 1.  **Pure Classification**: `threshold` is a pure function of the frame and the
//     threshold value. Calling it twice on the same frame yields identical masks.
// 2.  **Binary Cells**: A cell is never anything other than 0 or 255. Masks built
//     from raw cell data are normalised on the way in (any non-zero cell is
//     bright), so the differencing layer can compare cells directly.
// 3.  **Image-Backed**: The cells live in an `image::GrayImage`, so rows, bounds
//     checks and iteration come from the image crate rather than index math.

pub mod bright_mask {
    use crate::core_modules::frame::Frame;
    use crate::core_modules::pixel::pixel::Luminance;
    use crate::error::AnalyzerError;
    use image::GrayImage;

    pub type Cell = u8;

    pub const BRIGHT: Cell = 255;
    pub const DARK: Cell = 0;

    /// Per-pixel bright/not-bright classification of one frame.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BrightMask {
        cells: GrayImage,
    }

    impl BrightMask {
        /// Classifies every pixel of `frame` against `threshold` (strictly greater is bright).
        pub fn threshold(frame: &Frame<'_>, threshold: Luminance) -> Self {
            let mut cells = GrayImage::new(frame.width(), frame.height());
            for (cell, pixel) in cells.pixels_mut().zip(frame.pixels()) {
                cell.0[0] = if pixel.is_brighter_than(threshold) { BRIGHT } else { DARK };
            }
            Self { cells }
        }

        /// Builds a mask from row-major cell values. Any non-zero cell counts as bright.
        pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, AnalyzerError> {
            let expected = width as usize * height as usize;
            if cells.len() != expected {
                return Err(AnalyzerError::BufferLength {
                    expected,
                    actual: cells.len(),
                });
            }
            let mut image = GrayImage::new(width, height);
            for (cell, value) in image.pixels_mut().zip(cells) {
                cell.0[0] = if value == DARK { DARK } else { BRIGHT };
            }
            Ok(Self { cells: image })
        }

        /// An all-dark mask of the given size.
        pub fn empty(width: u32, height: u32) -> Self {
            Self {
                cells: GrayImage::new(width, height),
            }
        }

        pub fn width(&self) -> u32 {
            self.cells.width()
        }

        pub fn height(&self) -> u32 {
            self.cells.height()
        }

        pub fn dimensions(&self) -> (u32, u32) {
            self.cells.dimensions()
        }

        /// Out-of-bounds coordinates are reported as not bright.
        pub fn is_bright(&self, x: u32, y: u32) -> bool {
            self.cells
                .get_pixel_checked(x, y)
                .is_some_and(|cell| cell.0[0] == BRIGHT)
        }

        pub fn bright_count(&self) -> usize {
            self.cells.as_raw().iter().filter(|&&c| c == BRIGHT).count()
        }

        /// Row-major cell values, one byte per pixel.
        pub fn cells(&self) -> &[Cell] {
            self.cells.as_raw()
        }
    }

    pub fn threshold(frame: &Frame<'_>, threshold: Luminance) -> BrightMask {
        BrightMask::threshold(frame, threshold)
    }
}
