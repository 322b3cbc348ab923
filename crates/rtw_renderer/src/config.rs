//! Render configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::{DepthLimits, SkyGradient};

/// Render configuration.
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Bounce cap for Lambertian and Metal
    pub max_depth_solid: u32,
    /// Bounce cap for Dielectric
    pub max_depth_transparent: u32,
    /// Rows per dispatch task
    pub chunk_rows: u32,
    /// Worker threads; `None` uses the rayon default
    pub threads: Option<usize>,
    /// Base seed for the per-row random generators
    pub seed: u64,
    /// Background gradient
    pub sky: SkyGradient,
    /// Print a progress bar to stderr while rendering
    pub report_progress: bool,
    pub progress_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let limits = DepthLimits::default();
        Self {
            width: 1280,
            height: 720,
            samples_per_pixel: 64,
            max_depth_solid: limits.solid,
            max_depth_transparent: limits.transparent,
            chunk_rows: 8,
            threads: None,
            seed: 0,
            sky: SkyGradient::default(),
            report_progress: true,
            progress_interval_ms: 100,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading render config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Reject unusable values and clamp recoverable ones.
    pub fn validate(&mut self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("threads must be at least 1".to_string()));
        }
        if self.chunk_rows == 0 {
            log::warn!("chunk_rows = 0 is not a valid granularity, using 1");
            self.chunk_rows = 1;
        }
        if self.progress_interval_ms == 0 {
            log::warn!("progress_interval_ms = 0 would spin, using 1");
            self.progress_interval_ms = 1;
        }
        Ok(())
    }

    pub fn depth_limits(&self) -> DepthLimits {
        DepthLimits {
            solid: self.max_depth_solid,
            transparent: self.max_depth_transparent,
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.depth_limits(), DepthLimits { solid: 6, transparent: 10 });
        assert_eq!(config.chunk_rows, 8);
        assert_eq!(config.progress_interval(), Duration::from_millis(100));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json_str(
            r#"{ "width": 200, "height": 100, "seed": 7, "sky": { "horizon": [1.0, 0.0, 0.0], "zenith": [0.0, 0.0, 1.0] } }"#,
        )
        .expect("valid config");
        assert_eq!((config.width, config.height), (200, 100));
        assert_eq!(config.seed, 7);
        assert_eq!(config.sky.horizon, Color::new(1.0, 0.0, 0.0));
        assert_eq!(config.samples_per_pixel, 64);
        assert_eq!(config.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_validate_rejects_and_clamps() {
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(RenderError::InvalidDimensions { width: 0, .. })
        ));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "samples_per_pixel": 0 }"#),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "threads": 0 }"#),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_str("not json"),
            Err(RenderError::ConfigParse(_))
        ));

        let config = RenderConfig::from_json_str(r#"{ "chunk_rows": 0, "progress_interval_ms": 0 }"#)
            .expect("clamped");
        assert_eq!(config.chunk_rows, 1);
        assert_eq!(config.progress_interval_ms, 1);
    }

    #[test]
    fn test_missing_file_reports_path() {
        match RenderConfig::from_json_file("/no/such/render.json") {
            Err(RenderError::Io { path, .. }) => assert!(path.ends_with("render.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
