// THEORY:
// The `analyzer` module is the top-level API for the tracker. It wraps the two
// analysis stages (thresholding and mask differencing) in a single stateful object
// that a capture loop can drive one frame at a time.
//
// The only state carried between ticks is the bright mask of the previous frame.
// It is an owned field of `FrameAnalyzer`, replaced at the end of every successful
// tick, so two analyzers fed from two cameras never interfere and a frame that is
// rejected for having the wrong size leaves the state untouched.

use crate::core_modules::bright_mask::bright_mask::BrightMask;
use crate::core_modules::frame::Frame;
use crate::core_modules::motion_locator::motion_locator;
use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// Re-export key data structures for the public API.
pub use crate::core_modules::motion_locator::{Centroid, OverlayMask};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_BRIGHTNESS_THRESHOLD: f64 = 200.0;
pub const DEFAULT_DIFF_THRESHOLD: u8 = 20;
pub const DEFAULT_MIN_MOVEMENT_PIXELS: usize = 100;

/// Configuration for the FrameAnalyzer. Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Nominal capture rate. The analyzer does not schedule itself; drivers use
    /// `tick_interval` to pace their calls.
    pub fps: u32,
    /// Luminance (0..255) a pixel must strictly exceed to count as bright.
    pub brightness_threshold: f64,
    /// Mask cells must differ by strictly more than this to count as changed.
    pub diff_threshold: u8,
    /// Active cells must strictly exceed this count before a centroid is reported.
    pub min_movement_pixels: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            image_width: DEFAULT_WIDTH,
            image_height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            min_movement_pixels: DEFAULT_MIN_MOVEMENT_PIXELS,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(AnalyzerError::InvalidConfig(format!(
                "frame size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.fps == 0 {
            return Err(AnalyzerError::InvalidConfig("fps must be non-zero".to_string()));
        }
        if !self.brightness_threshold.is_finite() {
            return Err(AnalyzerError::InvalidConfig(format!(
                "brightness threshold must be finite, got {}",
                self.brightness_threshold
            )));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Time between two ticks at the configured frame rate.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Classification of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStatus {
    /// First tick since construction or reset; there was nothing to compare against.
    NoPrevious,
    /// Enough pixels became bright to locate a centroid.
    MovementDetected,
    /// The active area was at or below the minimum movement size.
    NoMovement,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalysisStatus::NoPrevious => "Calibrating",
            AnalysisStatus::MovementDetected => "Movement detected",
            AnalysisStatus::NoMovement => "No movement",
        };
        f.write_str(label)
    }
}

/// The output of the analyzer for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Zero-based index of this frame since construction or the last reset.
    pub frame_index: u64,
    pub status: AnalysisStatus,
    /// Absent on the first tick.
    pub overlay: Option<OverlayMask>,
    pub centroid: Option<Centroid>,
    pub active_pixels: usize,
}

impl AnalysisResult {
    /// Human-readable line for a status display, led by the status label.
    pub fn status_text(&self) -> String {
        match (self.status, self.centroid) {
            (AnalysisStatus::NoPrevious, _) => format!("{}: waiting for a second frame", self.status),
            (AnalysisStatus::MovementDetected, Some(c)) => format!("{} at ({}, {})", self.status, c.x, c.y),
            _ => format!("{} ({} new bright pixels)", self.status, self.active_pixels),
        }
    }

    pub fn movement_detected(&self) -> bool {
        self.status == AnalysisStatus::MovementDetected
    }
}

/// Locates a moving bright spot across consecutive frames.
#[derive(Debug, Clone)]
pub struct FrameAnalyzer {
    config: AnalyzerConfig,
    previous_mask: Option<BrightMask>,
    frames_processed: u64,
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            previous_mask: None,
            frames_processed: 0,
        }
    }
}

impl FrameAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self {
            config,
            previous_mask: None,
            frames_processed: 0,
        })
    }

    /// Runs both analysis stages on `frame` and stores its mask for the next call.
    pub fn tick(&mut self, frame: &Frame<'_>) -> Result<AnalysisResult, AnalyzerError> {
        if frame.dimensions() != self.config.dimensions() {
            return Err(AnalyzerError::DimensionMismatch {
                expected: self.config.dimensions(),
                actual: frame.dimensions(),
            });
        }

        // Stage 1: Thresholding
        let current_mask = BrightMask::threshold(frame, self.config.brightness_threshold);

        // Stage 2: Differencing against the previous tick
        let frame_index = self.frames_processed;
        let result = match &self.previous_mask {
            None => AnalysisResult {
                frame_index,
                status: AnalysisStatus::NoPrevious,
                overlay: None,
                centroid: None,
                active_pixels: 0,
            },
            Some(previous_mask) => {
                let (overlay, centroid) = motion_locator::diff_and_locate(
                    &current_mask,
                    previous_mask,
                    self.config.diff_threshold,
                    self.config.min_movement_pixels,
                )?;
                let status = if centroid.is_some() {
                    AnalysisStatus::MovementDetected
                } else {
                    AnalysisStatus::NoMovement
                };
                AnalysisResult {
                    frame_index,
                    status,
                    active_pixels: overlay.active_pixels(),
                    overlay: Some(overlay),
                    centroid,
                }
            }
        };

        self.previous_mask = Some(current_mask);
        self.frames_processed += 1;

        tracing::debug!(
            frame_index,
            status = %result.status,
            active_pixels = result.active_pixels,
            "frame analyzed"
        );
        Ok(result)
    }

    /// Forgets the previous frame. The next tick reports `NoPrevious`.
    pub fn reset(&mut self) {
        tracing::info!(frames_processed = self.frames_processed, "analyzer reset");
        self.previous_mask = None;
        self.frames_processed = 0;
    }

    pub fn has_previous(&self) -> bool {
        self.previous_mask.is_some()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
