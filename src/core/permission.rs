//! Camera permission gate
//!
//! The session must not start the camera until a gate resolves to
//! [`GrantedState::Granted`]. The grant carries the capability the camera
//! pipeline opens.

use std::future::Future;
use std::os::fd::OwnedFd;
use std::path::PathBuf;

use super::portal;

/// What a granted permission gives access to
#[derive(Debug)]
pub enum CameraAccess {
    /// V4L2 device node
    Device(PathBuf),
    /// PipeWire remote handed out by the camera portal
    PipeWire(OwnedFd),
}

/// Resolved permission state
#[derive(Debug)]
pub enum GrantedState {
    Granted(CameraAccess),
    Denied,
}

impl GrantedState {
    pub fn is_granted(&self) -> bool {
        matches!(self, GrantedState::Granted(_))
    }
}

/// Checks for camera access and asks for it when needed
pub trait PermissionGate: Send + Sync + 'static {
    fn check_or_request(&self) -> impl Future<Output = GrantedState> + Send;
}

/// Gate backed by the xdg-desktop-portal camera interface
#[derive(Clone, Copy, Debug, Default)]
pub struct PortalGate;

impl PermissionGate for PortalGate {
    async fn check_or_request(&self) -> GrantedState {
        match portal::request_camera_access().await {
            Ok(Some(remote)) => {
                log::info!("Camera access granted by portal");
                GrantedState::Granted(CameraAccess::PipeWire(remote))
            }
            Ok(None) => GrantedState::Denied,
            Err(err) => {
                log::warn!("Camera portal unavailable: {:?}", err);
                GrantedState::Denied
            }
        }
    }
}

/// Gate for a directly opened V4L2 device
#[derive(Clone, Debug)]
pub struct DeviceGate {
    device: PathBuf,
}

impl DeviceGate {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl PermissionGate for DeviceGate {
    async fn check_or_request(&self) -> GrantedState {
        match std::fs::OpenOptions::new().read(true).open(&self.device) {
            Ok(_) => GrantedState::Granted(CameraAccess::Device(self.device.clone())),
            Err(err) => {
                log::warn!(
                    "Cannot open camera device {}: {}",
                    self.device.display(),
                    err
                );
                GrantedState::Denied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_device_gate_grants_readable_device() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let gate = DeviceGate::new(file.path());

        match gate.check_or_request().await {
            GrantedState::Granted(CameraAccess::Device(path)) => assert_eq!(path, file.path()),
            other => panic!("expected device grant, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_device_gate_denies_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let gate = DeviceGate::new(dir.path().join("video9"));
        assert!(!gate.check_or_request().await.is_granted());
    }
}
