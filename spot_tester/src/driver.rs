// THEORY:
// The `Driver` plays the role of the capture loop: a fixed-rate timer pulls one
// frame from the source, hands it to the analyzer, renders the result and writes
// it out. Each step runs to completion before the next timer tick is awaited, and
// missed ticks are skipped rather than bunched, so the analyzer never sees two
// overlapping calls.

use crate::render;
use crate::settings::RenderSettings;
use crate::source::FrameSource;
use anyhow::Context;
use spot_tracker::{AnalysisResult, Centroid, Frame, FrameAnalyzer};
use std::future::Future;
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Resolves when `signal` fires. A signal that cannot be installed is logged and
/// never resolves, so the run continues until the source is exhausted.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(error) = signal.await {
        warn!(%error, "cannot listen for shutdown signal; running until input ends");
        std::future::pending::<()>().await;
    }
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub movement_frames: u64,
    pub last_centroid: Option<Centroid>,
}

impl RunSummary {
    fn record(&mut self, result: &AnalysisResult) {
        self.frames += 1;
        if result.movement_detected() {
            self.movement_frames += 1;
            self.last_centroid = result.centroid;
        }
    }
}

pub struct Driver<S> {
    analyzer: FrameAnalyzer,
    source: S,
    style: RenderSettings,
    output_dir: Option<PathBuf>,
    summary: RunSummary,
}

impl<S: FrameSource> Driver<S> {
    pub fn new(analyzer: FrameAnalyzer, source: S, style: RenderSettings) -> Self {
        Self {
            analyzer,
            source,
            style,
            output_dir: None,
            summary: RunSummary::default(),
        }
    }

    /// Annotated frames are written here as `frame_00000.png`, `frame_00001.png`, ...
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Processes one frame. `Ok(None)` once the source is exhausted.
    pub fn step(&mut self) -> anyhow::Result<Option<AnalysisResult>> {
        let Some(next) = self.source.next_frame() else {
            return Ok(None);
        };
        let image = next?;
        let result = self.analyzer.tick(&Frame::from(&image))?;
        info!(frame = result.frame_index, "{}", result.status_text());

        if let Some(dir) = &self.output_dir {
            let annotated = render::annotate(&image, &result, &self.style);
            let path = dir.join(format!("frame_{:05}.png", result.frame_index));
            render::save_png(&path, &annotated).with_context(|| format!("cannot write {}", path.display()))?;
        }

        self.summary.record(&result);
        Ok(Some(result))
    }

    /// Steps at the analyzer's configured frame rate until the source runs dry or
    /// `shutdown` resolves.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<RunSummary> {
        let mut interval = tokio::time::interval(self.analyzer.config().tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    if self.step()?.is_none() {
                        break;
                    }
                }
            }
        }

        info!(
            frames = self.summary.frames,
            movement_frames = self.summary.movement_frames,
            "run finished"
        );
        Ok(self.summary)
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use image::{Rgba, RgbaImage};
    use spot_tracker::{AnalysisStatus, AnalyzerConfig};

    const SIZE: (u32, u32) = (40, 30);

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            image_width: SIZE.0,
            image_height: SIZE.1,
            fps: 1000,
            ..AnalyzerConfig::default()
        }
    }

    fn frame_with_spot(x0: u32) -> RgbaImage {
        RgbaImage::from_fn(SIZE.0, SIZE.1, |x, y| {
            if (x0..x0 + 11).contains(&x) && y < 11 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    fn dark() -> RgbaImage {
        RgbaImage::from_pixel(SIZE.0, SIZE.1, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn steps_until_the_source_is_empty() {
        let source = MemorySource::new(vec![dark(), frame_with_spot(0)], SIZE);
        let mut driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());

        assert_eq!(driver.step().unwrap().unwrap().status, AnalysisStatus::NoPrevious);
        let second = driver.step().unwrap().unwrap();
        assert_eq!(second.centroid, Some(Centroid { x: 5, y: 5 }));
        assert!(driver.step().unwrap().is_none());
        assert_eq!(driver.summary().frames, 2);
    }

    #[test]
    fn oversized_frames_are_scaled_to_the_configured_size() {
        let big = RgbaImage::from_pixel(SIZE.0 * 2, SIZE.1 * 2, Rgba([0, 0, 0, 255]));
        let source = MemorySource::new(vec![big], SIZE);
        let mut driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());

        assert_eq!(driver.step().unwrap().unwrap().status, AnalysisStatus::NoPrevious);
    }

    #[tokio::test]
    async fn run_summarises_a_moving_spot() {
        let frames = vec![dark(), frame_with_spot(0), frame_with_spot(11), frame_with_spot(11)];
        let source = MemorySource::new(frames, SIZE);
        let driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());

        let summary = driver.run(std::future::pending()).await.unwrap();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.movement_frames, 2);
        assert_eq!(summary.last_centroid, Some(Centroid { x: 16, y: 5 }));
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop() {
        let source = MemorySource::new(vec![dark(); 3], SIZE);
        let driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());

        let summary = driver.run(std::future::ready(())).await.unwrap();

        assert_eq!(summary.frames, 0);
    }

    #[tokio::test]
    async fn failed_signal_install_does_not_end_the_run() {
        let source = MemorySource::new(vec![dark(), frame_with_spot(0), dark()], SIZE);
        let driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());
        let signal = std::future::ready(Err(std::io::Error::other("no signal handler")));

        let summary = driver.run(shutdown_on(signal)).await.unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.movement_frames, 1);
    }

    #[tokio::test]
    async fn delivered_signal_ends_the_run() {
        let source = MemorySource::new(vec![dark(); 3], SIZE);
        let driver = Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default());

        let summary = driver.run(shutdown_on(std::future::ready(Ok(())))).await.unwrap();

        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn annotated_frames_are_written_to_the_output_dir() {
        let dir = std::env::temp_dir().join(format!("spot_tester_driver_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let source = MemorySource::new(vec![dark(), frame_with_spot(3)], SIZE);
        let mut driver =
            Driver::new(FrameAnalyzer::new(config()).unwrap(), source, RenderSettings::default()).with_output_dir(dir.clone());

        while driver.step().unwrap().is_some() {}

        assert!(dir.join("frame_00000.png").is_file());
        assert!(dir.join("frame_00001.png").is_file());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
