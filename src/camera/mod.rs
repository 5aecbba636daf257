//! Camera preview and still capture
//!
//! This module contains:
//! - The display surface and camera pipeline traits the session drives
//! - Frame conversion from GStreamer samples (frame.rs)
//! - The GStreamer camera pipeline (pipeline.rs)
//! - The GStreamer preview window (preview.rs)

pub mod frame;
pub mod pipeline;
pub mod preview;

use anyhow::Result;
use image::RgbaImage;
use std::future::Future;
use std::sync::Arc;

use crate::capture::{CaptureSink, encode_jpeg};
use crate::core::permission::CameraAccess;
use crate::domain::{CaptureRequest, CaptureResult};
use crate::render::DrawCommand;

pub use pipeline::GstCamera;
pub use preview::PreviewWindow;

/// Where the live preview, the overlay and user-facing messages are shown
pub trait DisplaySurface: Send + Sync + 'static {
    /// Show one camera frame (with the current overlay on top)
    fn present(&self, frame: &RgbaImage);
    /// Replace the overlay drawn on subsequent frames
    fn set_overlay(&self, commands: Vec<DrawCommand>);
    /// Replace the preview with a static message
    fn show_message(&self, text: &str);
    /// Show a transient notification
    fn notify(&self, text: &str);
    fn clear_notification(&self);
}

/// Live camera feed bound to a display surface
pub trait CameraPipeline: Send + 'static {
    type Handle: CaptureHandle;

    /// Start streaming frames from `access` into `surface`
    fn start(&mut self, access: CameraAccess, surface: Arc<dyn DisplaySurface>)
    -> Result<Self::Handle>;

    fn stop(&mut self);
}

/// Handle to a running pipeline that can grab stills
pub trait CaptureHandle: Clone + Send + Sync + 'static {
    /// Wait for the next frame and return it
    fn grab_still(&self) -> impl Future<Output = Result<RgbaImage>> + Send;
}

/// Capture one still and hand it to the sink
///
/// Encoding and file I/O run on the blocking pool. There is no retry; every
/// failure collapses into [`CaptureResult::Failed`].
pub async fn capture<H: CaptureHandle>(
    handle: &H,
    sink: Arc<dyn CaptureSink>,
    request: CaptureRequest,
    quality: u8,
) -> CaptureResult {
    let frame = match handle.grab_still().await {
        Ok(frame) => frame,
        Err(err) => {
            log::warn!("Failed to grab still frame: {:?}", err);
            return CaptureResult::Failed;
        }
    };

    let saved = tokio::task::spawn_blocking(move || {
        let bytes = encode_jpeg(&frame, quality)?;
        sink.save(&request, &bytes)
    })
    .await;

    match saved {
        Ok(Ok(locator)) => CaptureResult::Saved(locator),
        Ok(Err(err)) => {
            log::warn!("Failed to save capture: {:?}", err);
            CaptureResult::Failed
        }
        Err(err) => {
            log::error!("Capture task panicked: {}", err);
            CaptureResult::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::AlbumSink;
    use image::Rgba;

    #[derive(Clone)]
    struct StillHandle(Option<RgbaImage>);

    impl CaptureHandle for StillHandle {
        async fn grab_still(&self) -> Result<RgbaImage> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("no frame"))
        }
    }

    fn request() -> CaptureRequest {
        CaptureRequest {
            name: "20240101_120000".to_string(),
            mime_type: crate::domain::JPEG_MIME_TYPE,
            album_path: "Pictures/JawImages".into(),
        }
    }

    #[tokio::test]
    async fn test_capture_saves_jpeg() {
        let root = tempfile::tempdir().unwrap();
        let sink: Arc<dyn CaptureSink> = Arc::new(AlbumSink::new(root.path()));
        let handle = StillHandle(Some(RgbaImage::from_pixel(16, 16, Rgba([9, 9, 9, 255]))));

        let result = capture(&handle, sink, request(), 90).await;

        let path = root.path().join("Pictures/JawImages/20240101_120000.jpg");
        assert_eq!(
            result.locator().map(|l| l.as_str().to_string()),
            Some(format!("file://{}", path.display()))
        );
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_capture_without_frame_fails() {
        let root = tempfile::tempdir().unwrap();
        let sink: Arc<dyn CaptureSink> = Arc::new(AlbumSink::new(root.path()));

        let result = capture(&StillHandle(None), sink, request(), 90).await;
        assert_eq!(result, CaptureResult::Failed);
        assert!(!root.path().join("Pictures").exists());
    }

    #[tokio::test]
    async fn test_capture_with_failing_sink_fails() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let sink: Arc<dyn CaptureSink> = Arc::new(AlbumSink::new(&blocker));
        let handle = StillHandle(Some(RgbaImage::new(4, 4)));

        assert_eq!(capture(&handle, sink, request(), 90).await, CaptureResult::Failed);
    }
}
