// Layered settings for the tester: built-in defaults, then an optional TOML file,
// then `SPOT_*` environment variables (nested keys joined with `__`, e.g.
// `SPOT_ANALYZER__FPS=15`).

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use spot_tracker::AnalyzerConfig;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

const DEFAULT_CONFIG_NAME: &str = "spot_tester";
const ENV_PREFIX: &str = "SPOT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Colour painted over newly bright pixels.
    pub highlight: [u8; 3],
    /// Alpha of the highlight; 255 covers the pixel, lower values let the frame show through.
    pub highlight_opacity: u8,
    /// Colour of the cross-hair drawn at the centroid.
    pub marker: [u8; 3],
    /// Arm length of the cross-hair in pixels.
    pub marker_radius: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            highlight: [255, 0, 0],
            highlight_opacity: 255,
            marker: [0, 255, 0],
            marker_radius: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analyzer: AnalyzerConfig,
    pub render: RenderSettings,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            render: RenderSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads `path` if given (it must exist), otherwise `spot_tester.toml` from the
    /// working directory when present. Environment variables override both.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read tester configuration")?
            .try_deserialize()
            .context("invalid tester configuration")?;
        Ok(settings)
    }

    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn log_level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.log_level).with_context(|| format!("unknown log level {:?}", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_analyzer_section_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            log_level = "debug"

            [analyzer]
            image_width = 320
            image_height = 240
            min_movement_pixels = 25

            [render]
            marker_radius = 4
            highlight_opacity = 96
            "#,
        )
        .unwrap();

        assert_eq!(settings.analyzer.dimensions(), (320, 240));
        assert_eq!(settings.analyzer.min_movement_pixels, 25);
        assert_eq!(settings.analyzer.fps, 30);
        assert_eq!(settings.analyzer.diff_threshold, 20);
        assert_eq!(settings.render.marker_radius, 4);
        assert_eq!(settings.render.highlight, [255, 0, 0]);
        assert_eq!(settings.render.highlight_opacity, 96);
        assert_eq!(settings.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn unknown_log_level_is_an_error() {
        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert!(settings.log_level().is_err());
    }
}
