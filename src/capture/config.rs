//! Widget and application configuration.
//!
//! Defaults reproduce the stock widget: rear camera, 1920x1080 hint,
//! JPEG quality 90, six gallery thumbnails.

use super::{FacingMode, IDEAL_HEIGHT, IDEAL_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for camera acquisition and still capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera tried first on start.
    pub preferred_facing: FacingMode,
    /// Resolution hint sent with every request.
    pub ideal_width: u32,
    /// Ideal frame height requested from the platform.
    pub ideal_height: u32,
    /// JPEG quality for stills (1-100).
    pub jpeg_quality: u8,
    /// Retry once with the other camera when the preferred one is rejected.
    pub fallback_to_opposite: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            preferred_facing: FacingMode::Environment,
            ideal_width: IDEAL_WIDTH,
            ideal_height: IDEAL_HEIGHT,
            jpeg_quality: 90,
            fallback_to_opposite: true,
        }
    }
}

impl CaptureConfig {
    /// Creates a configuration that prefers the given camera.
    pub fn with_facing(preferred_facing: FacingMode) -> Self {
        Self {
            preferred_facing,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ideal_width == 0 || self.ideal_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid ideal resolution")]
    InvalidDimensions,
    #[error("invalid JPEG quality {0} (must be 1-100)")]
    InvalidQuality(u8),
    #[error("gallery must show at least one thumbnail")]
    InvalidThumbnailCount,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Stream acquisition and capture settings.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Where stills are saved.
    #[serde(default)]
    pub photo: PhotoConfig,
    /// Gallery rendering settings.
    #[serde(default)]
    pub gallery: GalleryConfig,
    /// Device indices for the native backend.
    #[serde(default)]
    pub native: NativeConfig,
}

/// Where downloaded stills land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Directory that receives downloads. Created on first save.
    pub download_dir: PathBuf,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
        }
    }
}

/// Gallery display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Thumbnails rendered; older photos stay in the list.
    pub max_thumbnails: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { max_thumbnails: 6 }
    }
}

/// Device indices used by the native backend for each facing mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// Device index used for the rear camera.
    pub environment_index: u32,
    /// Device index used for the front camera.
    pub user_index: u32,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            environment_index: 0,
            user_index: 1,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        if self.gallery.max_thumbnails == 0 {
            return Err(ConfigError::InvalidThumbnailCount);
        }
        Ok(())
    }
}
