//! Session-wide state
//!
//! Permission and camera binding live here instead of in globals, and the
//! session passes this context to the parts that need it.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::JawFrameConfig;
use crate::domain::SurfaceSize;
use crate::overlay::MarkerPalette;

/// Shown while permission is unresolved or denied
pub const PERMISSION_MESSAGE: &str = "Camera permission is required to use this app.";

/// Shown when permission was granted but the camera would not start
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "The camera could not be started.";

/// Permission gate as seen by the session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    Unresolved,
    Granted,
    Denied,
}

/// Whether the camera pipeline is running
#[derive(Clone, Debug, Default)]
pub enum CameraBinding<H> {
    #[default]
    Unbound,
    Bound(H),
    Failed,
}

impl<H> CameraBinding<H> {
    pub fn handle(&self) -> Option<&H> {
        match self {
            CameraBinding::Bound(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Explicit per-session context
#[derive(Debug)]
pub struct SessionContext<H> {
    pub permission: PermissionState,
    pub camera: CameraBinding<H>,
    pub surface_size: Option<SurfaceSize>,
    /// Captures issued and not yet finished
    pub captures_in_flight: usize,
    /// Sequence number of the notification currently shown
    pub notification_seq: u64,
}

impl<H> Default for SessionContext<H> {
    fn default() -> Self {
        Self {
            permission: PermissionState::default(),
            camera: CameraBinding::Unbound,
            surface_size: None,
            captures_in_flight: 0,
            notification_seq: 0,
        }
    }
}

/// Settings the session reads from the config
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub album_path: PathBuf,
    pub jpeg_quality: u8,
    pub notification_duration: Duration,
    pub palette: MarkerPalette,
}

impl From<&JawFrameConfig> for SessionSettings {
    fn from(config: &JawFrameConfig) -> Self {
        Self {
            album_path: config.album_path.clone(),
            jpeg_quality: config.jpeg_quality,
            notification_duration: config.notification_duration(),
            palette: MarkerPalette::from(config),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&JawFrameConfig::default())
    }
}
