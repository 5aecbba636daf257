//! Capture request and result types
//!
//! One request is created per capture press; the result is delivered back to
//! the session as a single value.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// MIME type of every captured still
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// File extension matching [`JPEG_MIME_TYPE`]
pub const JPEG_EXTENSION: &str = "jpg";

/// `yyyyMMdd_HHmmss`; chrono renders these fields without locale data
pub const CAPTURE_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default album directory, relative to the home directory
pub const DEFAULT_ALBUM_PATH: &str = "Pictures/JawImages";

/// Everything the capture sink needs to name and place a still
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Display name without extension
    pub name: String,
    pub mime_type: &'static str,
    /// Album directory relative to the storage root
    pub album_path: PathBuf,
}

impl CaptureRequest {
    /// Build a request named after the given timestamp
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>, album_path: impl AsRef<Path>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            name: time.format(CAPTURE_NAME_FORMAT).to_string(),
            mime_type: JPEG_MIME_TYPE,
            album_path: album_path.as_ref().to_path_buf(),
        }
    }

    /// Build a request named after the current local time
    pub fn now(album_path: impl AsRef<Path>) -> Self {
        Self::at(&chrono::Local::now(), album_path)
    }

    /// File name including the extension
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, JPEG_EXTENSION)
    }
}

/// Locator of a saved capture (a `file://` URI)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLocator(String);

impl FileLocator {
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single capture
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureResult {
    Saved(FileLocator),
    /// Failure carries no detail; the cause is only logged
    Failed,
}

impl CaptureResult {
    pub fn locator(&self) -> Option<&FileLocator> {
        match self {
            CaptureResult::Saved(locator) => Some(locator),
            CaptureResult::Failed => None,
        }
    }

    /// Text shown in the transient notification
    pub fn notification_text(&self) -> String {
        match self {
            CaptureResult::Saved(locator) => format!("Image saved: {}", locator),
            CaptureResult::Failed => "Failed to save image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_request_name_uses_timestamp() {
        let time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        let request = CaptureRequest::at(&time, DEFAULT_ALBUM_PATH);
        assert_eq!(request.name, "20240101_120000");
        assert_eq!(request.file_name(), "20240101_120000.jpg");
        assert_eq!(request.mime_type, "image/jpeg");
        assert_eq!(request.album_path, PathBuf::from("Pictures/JawImages"));
    }

    #[test]
    fn test_request_name_is_zero_padded() {
        let time = Utc.with_ymd_and_hms(2025, 3, 7, 4, 5, 9).unwrap();
        assert_eq!(CaptureRequest::at(&time, "x").name, "20250307_040509");
    }

    #[test]
    fn test_result_notification_text() {
        let saved = CaptureResult::Saved(FileLocator::from_path(Path::new("/tmp/a.jpg")));
        assert_eq!(saved.notification_text(), "Image saved: file:///tmp/a.jpg");
        assert_eq!(saved.locator().map(|l| l.as_str()), Some("file:///tmp/a.jpg"));

        assert_eq!(CaptureResult::Failed.notification_text(), "Failed to save image.");
        assert!(CaptureResult::Failed.locator().is_none());
    }
}
