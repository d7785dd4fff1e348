// THEORY:
// This file is the entry point for the `spot_tracker` library crate. It exposes the
// `FrameAnalyzer` and its associated data structures (`AnalyzerConfig`,
// `AnalysisResult`, `AnalysisStatus`) as the high-level interface for locating a
// moving bright spot in a stream of video frames.
//
// The per-pixel and per-mask building blocks live in `core_modules` and are public
// so that callers (and tests) can run a single stage in isolation, but a typical
// consumer only needs to construct one analyzer and feed it a frame per tick.

pub mod analyzer;
pub mod core_modules;
pub mod error;

pub use analyzer::{AnalysisResult, AnalysisStatus, AnalyzerConfig, FrameAnalyzer};
pub use core_modules::bright_mask::bright_mask::BrightMask;
pub use core_modules::frame::{Frame, PixelLayout};
pub use core_modules::motion_locator::{Centroid, OverlayMask};
pub use error::AnalyzerError;
