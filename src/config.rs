//! Configuration persistence for jawframe settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{DEFAULT_ALBUM_PATH, MarkerColor};

/// Longest a capture notification may stay on screen
const MAX_NOTIFICATION_SECONDS: f32 = 60.0;

/// Where camera frames come from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSource {
    /// Ask xdg-desktop-portal for access and read from PipeWire
    #[default]
    Portal,
    /// Open a V4L2 device node directly
    Device(PathBuf),
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JawFrameConfig {
    /// Camera to preview and capture from
    pub camera_source: CameraSource,
    /// Album directory for captures, relative to the home directory
    pub album_path: PathBuf,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// How long the capture notification stays visible
    pub notification_seconds: f32,
    pub primary_color: MarkerColor,
    pub secondary_color: MarkerColor,
    /// Color of the line joining the two markers
    pub guide_color: MarkerColor,
    /// Instructional caption shown under the markers
    pub caption: String,
    /// Size of the message screen shown before any camera frame arrives
    pub fallback_width: u32,
    pub fallback_height: u32,
}

impl Default for JawFrameConfig {
    fn default() -> Self {
        Self {
            camera_source: CameraSource::Portal,
            album_path: PathBuf::from(DEFAULT_ALBUM_PATH),
            jpeg_quality: 90,
            notification_seconds: 2.0,
            primary_color: MarkerColor::RED,
            secondary_color: MarkerColor::BLUE,
            guide_color: MarkerColor::GREEN,
            caption: "Red circle is 6th tooth.\nBlue circle is 1st tooth.".to_string(),
            fallback_width: 640,
            fallback_height: 480,
        }
    }
}

impl JawFrameConfig {
    /// Directory name under the XDG config dir
    pub const ID: &'static str = "jawframe";

    /// Path of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                // First run, leave an editable file behind
                let config = Self::default();
                config.save();
                config
            }
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file, `None` if it does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: JawFrameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(Some(config.sanitized()))
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Notification lifetime as a duration
    pub fn notification_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.notification_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f32(Self::default().notification_seconds))
    }

    /// Pull out-of-range values back to something usable
    fn sanitized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.notification_seconds.is_finite() {
            self.notification_seconds = self
                .notification_seconds
                .clamp(0.0, MAX_NOTIFICATION_SECONDS);
        } else {
            self.notification_seconds = Self::default().notification_seconds;
        }
        if self.fallback_width == 0 || self.fallback_height == 0 {
            let defaults = Self::default();
            self.fallback_width = defaults.fallback_width;
            self.fallback_height = defaults.fallback_height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_capture_layout() {
        let config = JawFrameConfig::default();
        assert_eq!(config.album_path, PathBuf::from("Pictures/JawImages"));
        assert_eq!(config.primary_color, MarkerColor::RED);
        assert_eq!(config.secondary_color, MarkerColor::BLUE);
        assert_eq!(config.guide_color, MarkerColor::GREEN);
        assert_eq!(config.caption.lines().count(), 2);
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = JawFrameConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = JawFrameConfig {
            camera_source: CameraSource::Device(PathBuf::from("/dev/video2")),
            jpeg_quality: 75,
            ..JawFrameConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = JawFrameConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "jpeg_quality": 0, "fallback_width": 0 }"#).unwrap();

        let loaded = JawFrameConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.jpeg_quality, 1);
        assert_eq!(loaded.fallback_width, 640);
        assert_eq!(loaded.camera_source, CameraSource::Portal);
    }

    #[test]
    fn test_huge_notification_time_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "notification_seconds": 1e30 }"#).unwrap();

        let loaded = JawFrameConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.notification_seconds, MAX_NOTIFICATION_SECONDS);
        assert_eq!(loaded.notification_duration(), Duration::from_secs(60));
    }

    #[test]
    fn test_negative_notification_time_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "notification_seconds": -3.0 }"#).unwrap();

        let loaded = JawFrameConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.notification_duration(), Duration::ZERO);
    }

    #[test]
    fn test_unsanitized_notification_time_falls_back_to_default() {
        let config = JawFrameConfig {
            notification_seconds: 1e30,
            ..JawFrameConfig::default()
        };
        assert_eq!(config.notification_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(JawFrameConfig::load_from(&path).is_err());
    }
}
