// THEORY:
// A `FrameSource` stands in for the capture device. The analyzer only needs "the
// next frame, at the configured size", so sources are responsible for conforming
// whatever they decode to that size, the same way a camera is asked for an ideal
// resolution and the stream is scaled to fit.

use anyhow::Context;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub trait FrameSource {
    /// `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<anyhow::Result<RgbaImage>>;
}

/// Replays image files from a directory in lexical file-name order.
pub struct DirectorySource {
    paths: VecDeque<PathBuf>,
    size: (u32, u32),
}

impl DirectorySource {
    pub fn open(dir: &Path, size: (u32, u32)) -> anyhow::Result<Self> {
        let entries = std::fs::read_dir(dir).with_context(|| format!("cannot read frame directory {}", dir.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        tracing::info!(frames = paths.len(), dir = %dir.display(), "frame directory opened");
        Ok(Self {
            paths: paths.into(),
            size,
        })
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for DirectorySource {
    fn next_frame(&mut self) -> Option<anyhow::Result<RgbaImage>> {
        let path = self.paths.pop_front()?;
        let decoded = image::open(&path)
            .with_context(|| format!("cannot decode frame {}", path.display()))
            .map(|image| conform(image.to_rgba8(), self.size));
        Some(decoded)
    }
}

/// In-memory source, mostly for driving the analyzer from generated frames.
pub struct MemorySource {
    frames: VecDeque<RgbaImage>,
    size: (u32, u32),
}

impl MemorySource {
    pub fn new(frames: Vec<RgbaImage>, size: (u32, u32)) -> Self {
        Self {
            frames: frames.into(),
            size,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<anyhow::Result<RgbaImage>> {
        self.frames.pop_front().map(|frame| Ok(conform(frame, self.size)))
    }
}

/// Rescales `image` to `size` unless it already matches.
pub fn conform(image: RgbaImage, size: (u32, u32)) -> RgbaImage {
    if image.dimensions() == size {
        return image;
    }
    tracing::trace!(from = ?image.dimensions(), to = ?size, "resizing frame");
    imageops::resize(&image, size.0, size.1, FilterType::Triangle)
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spot_tester_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn conform_leaves_matching_frames_alone() {
        let image = RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255]));
        assert_eq!(conform(image.clone(), (8, 6)), image);
        assert_eq!(conform(image, (4, 3)).dimensions(), (4, 3));
    }

    #[test]
    fn directory_frames_are_replayed_in_name_order_and_resized() {
        let dir = scratch_dir("replay");
        RgbaImage::from_pixel(8, 8, Rgba([200, 0, 0, 255]))
            .save(dir.join("b.png"))
            .unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([0, 200, 0, 255]))
            .save(dir.join("a.png"))
            .unwrap();
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut source = DirectorySource::open(&dir, (4, 4)).unwrap();
        assert_eq!(source.remaining(), 2);

        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert!(source.next_frame().is_none());

        assert_eq!(first.get_pixel(0, 0), &Rgba([0, 200, 0, 255]));
        assert_eq!(second.dimensions(), (4, 4));
        assert_eq!(second.get_pixel(2, 2), &Rgba([200, 0, 0, 255]));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("spot_tester_definitely_missing_dir");
        assert!(DirectorySource::open(&missing, (4, 4)).is_err());
    }

    #[test]
    fn undecodable_file_surfaces_an_error() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("frame.png"), b"not really a png").unwrap();

        let mut source = DirectorySource::open(&dir, (4, 4)).unwrap();
        assert!(source.next_frame().unwrap().is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
