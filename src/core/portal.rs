//! Camera access through xdg-desktop-portal
//!
//! This module contains the D-Bus proxies for `org.freedesktop.portal.Camera`
//! and the request object the portal answers on.

use anyhow::{Context, Result};
use futures::StreamExt;
use std::collections::HashMap;
use std::os::fd::OwnedFd;
use std::sync::atomic::{AtomicU32, Ordering};
use zbus::zvariant::{self, OwnedObjectPath, OwnedValue, Value};

/// Portal response status codes
pub const PORTAL_RESPONSE_SUCCESS: u32 = 0;
pub const PORTAL_RESPONSE_CANCELLED: u32 = 1;
pub const PORTAL_RESPONSE_OTHER: u32 = 2;

/// D-Bus object path of the portal frontend
pub const DBUS_PATH: &str = "/org/freedesktop/portal/desktop";

/// Outcome of a portal request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalResponse {
    Success,
    Cancelled,
    Other,
}

impl PortalResponse {
    pub fn from_code(code: u32) -> Self {
        match code {
            PORTAL_RESPONSE_SUCCESS => Self::Success,
            PORTAL_RESPONSE_CANCELLED => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

#[zbus::proxy(
    interface = "org.freedesktop.portal.Camera",
    default_service = "org.freedesktop.portal.Desktop",
    default_path = "/org/freedesktop/portal/desktop"
)]
pub trait Camera {
    /// Ask the user for camera access; the answer arrives on the returned request
    fn access_camera(&self, options: HashMap<&str, Value<'_>>) -> zbus::Result<OwnedObjectPath>;

    /// PipeWire remote restricted to the camera nodes this app may use
    #[zbus(name = "OpenPipeWireRemote")]
    fn open_pipe_wire_remote(
        &self,
        options: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<zvariant::OwnedFd>;

    #[zbus(property)]
    fn is_camera_present(&self) -> zbus::Result<bool>;
}

#[zbus::proxy(
    interface = "org.freedesktop.portal.Request",
    default_service = "org.freedesktop.portal.Desktop"
)]
pub trait Request {
    #[zbus(signal)]
    fn response(&self, response: u32, results: HashMap<String, OwnedValue>) -> zbus::Result<()>;
}

static TOKEN_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique `handle_token` for one request
fn handle_token() -> String {
    format!(
        "jawframe_{}_{}",
        std::process::id(),
        TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Object path the portal will use for a request from `sender` with `token`
pub fn request_path(sender: &str, token: &str) -> String {
    let sender = sender.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", DBUS_PATH, sender, token)
}

/// Ask the portal for camera access
///
/// Returns the PipeWire remote on success, `None` when there is no camera or
/// the user declined.
pub async fn request_camera_access() -> Result<Option<OwnedFd>> {
    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to the session bus")?;
    let camera = CameraProxy::new(&connection)
        .await
        .context("Failed to create camera portal proxy")?;

    if !camera
        .is_camera_present()
        .await
        .context("Failed to query IsCameraPresent")?
    {
        log::info!("Camera portal reports no camera");
        return Ok(None);
    }

    let token = handle_token();
    let sender = connection
        .unique_name()
        .context("Session bus connection has no unique name")?;
    let expected = request_path(sender.as_str(), &token);

    // Subscribe before calling so the response cannot be missed
    let request = RequestProxy::builder(&connection)
        .path(expected.as_str())?
        .build()
        .await?;
    let mut responses = request.receive_response().await?;

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("handle_token", Value::from(token.as_str()));
    let handle = camera
        .access_camera(options)
        .await
        .context("AccessCamera call failed")?;
    log::debug!("Camera access requested, handle {}", handle.as_str());

    let response = if handle.as_str() == expected {
        responses.next().await
    } else {
        log::debug!(
            "Portal used request handle {} instead of {}",
            handle.as_str(),
            expected
        );
        let late = RequestProxy::builder(&connection)
            .path(handle.as_str())?
            .build()
            .await?;
        let mut late_responses = late.receive_response().await?;
        late_responses.next().await
    };
    let response = response.context("Portal request ended without a response")?;

    let code = *response.args()?.response();
    match PortalResponse::from_code(code) {
        PortalResponse::Success => {}
        PortalResponse::Cancelled => {
            log::info!("Camera access declined");
            return Ok(None);
        }
        PortalResponse::Other => {
            log::warn!("Camera access request failed (response {})", code);
            return Ok(None);
        }
    }

    let remote = camera
        .open_pipe_wire_remote(HashMap::new())
        .await
        .context("OpenPipeWireRemote call failed")?;
    Ok(Some(remote.into()))
}
