//! GStreamer camera pipeline construction and management

use anyhow::{Context, Result};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use image::RgbaImage;
use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::frame::frame_from_sample;
use super::{CameraPipeline, CaptureHandle, DisplaySurface};
use crate::core::permission::CameraAccess;

/// How long a capture waits for the next frame before giving up
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Latest camera frame, shared between the streaming thread and capture handles
type FrameSlot = Option<Arc<RgbaImage>>;

/// Camera source feeding an appsink with RGBA frames
#[derive(Default)]
pub struct GstCamera {
    pipeline: Option<gst::Pipeline>,
    /// Kept open for as long as pipewiresrc reads from it
    remote: Option<OwnedFd>,
}

impl GstCamera {
    pub fn new() -> Self {
        Self::default()
    }

    fn source_element(&mut self, access: CameraAccess) -> Result<gst::Element> {
        match access {
            CameraAccess::Device(path) => {
                log::info!("Opening camera device {}", path.display());
                gst::ElementFactory::make("v4l2src")
                    .property("device", path.to_string_lossy().into_owned())
                    .build()
                    .context("Failed to create v4l2src element")
            }
            CameraAccess::PipeWire(remote) => {
                log::info!("Opening camera through PipeWire remote");
                let element = gst::ElementFactory::make("pipewiresrc")
                    .property("fd", remote.as_raw_fd())
                    .build()
                    .context("Failed to create pipewiresrc element")?;
                self.remote = Some(remote);
                Ok(element)
            }
        }
    }
}

impl CameraPipeline for GstCamera {
    type Handle = GstCaptureHandle;

    fn start(
        &mut self,
        access: CameraAccess,
        surface: Arc<dyn DisplaySurface>,
    ) -> Result<GstCaptureHandle> {
        gst::init().context("Failed to initialize GStreamer")?;
        self.stop();

        let pipeline = gst::Pipeline::new();

        // Create elements
        let source = self.source_element(access)?;

        let videoconvert = gst::ElementFactory::make("videoconvert")
            .build()
            .context("Failed to create videoconvert element")?;

        let caps = gst::Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .build();
        let appsink = gst_app::AppSink::builder()
            .caps(&caps)
            .max_buffers(1)
            .drop(true)
            .build();

        // Add elements to pipeline
        pipeline.add_many([&source, &videoconvert, appsink.upcast_ref()])?;

        // Link elements
        gst::Element::link_many([&source, &videoconvert, appsink.upcast_ref()])?;

        let (frames_tx, frames_rx) = watch::channel::<FrameSlot>(None);
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    let frame = match frame_from_sample(&sample) {
                        Ok(frame) => Arc::new(frame),
                        Err(err) => {
                            log::warn!("Dropping camera frame: {:?}", err);
                            return Err(gst::FlowError::Error);
                        }
                    };
                    surface.present(&frame);
                    frames_tx.send_replace(Some(frame));
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );

        if let Some(bus) = pipeline.bus() {
            bus.set_sync_handler(|_bus, msg| {
                use gst::MessageView;
                match msg.view() {
                    MessageView::Error(err) => {
                        log::error!(
                            "Camera pipeline error: {} ({})",
                            err.error(),
                            err.debug().unwrap_or_default()
                        );
                    }
                    MessageView::Warning(warning) => {
                        log::warn!("Camera pipeline warning: {}", warning.error());
                    }
                    _ => {}
                }
                gst::BusSyncReply::Drop
            });
        }

        pipeline
            .set_state(gst::State::Playing)
            .context("Failed to start camera pipeline")?;
        log::info!("Camera pipeline started");

        self.pipeline = Some(pipeline);
        Ok(GstCaptureHandle { frames: frames_rx })
    }

    fn stop(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(err) = pipeline.set_state(gst::State::Null) {
                log::error!("Failed to stop camera pipeline: {:?}", err);
            } else {
                log::info!("Camera pipeline stopped");
            }
        }
        self.remote = None;
    }
}

impl Drop for GstCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Capture handle reading frames published by the appsink callback
#[derive(Clone, Debug)]
pub struct GstCaptureHandle {
    frames: watch::Receiver<FrameSlot>,
}

impl GstCaptureHandle {
    /// Wait for a frame published after this call
    pub async fn next_frame(&self, timeout: Duration) -> Result<RgbaImage> {
        let mut frames = self.frames.clone();
        frames.mark_unchanged();
        tokio::time::timeout(timeout, frames.changed())
            .await
            .context("Timed out waiting for a camera frame")?
            .context("Camera pipeline stopped")?;
        let frame = frames
            .borrow_and_update()
            .clone()
            .context("Camera produced no frame")?;
        Ok(Arc::unwrap_or_clone(frame))
    }
}

impl CaptureHandle for GstCaptureHandle {
    async fn grab_still(&self) -> Result<RgbaImage> {
        self.next_frame(FRAME_TIMEOUT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn handle() -> (watch::Sender<FrameSlot>, GstCaptureHandle) {
        let (tx, rx) = watch::channel(None);
        (tx, GstCaptureHandle { frames: rx })
    }

    #[tokio::test]
    async fn test_next_frame_waits_for_a_new_frame() {
        let (tx, handle) = handle();
        tx.send_replace(Some(Arc::new(RgbaImage::from_pixel(1, 1, Rgba([1, 1, 1, 255])))));

        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.next_frame(Duration::from_secs(5)).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send_replace(Some(Arc::new(RgbaImage::from_pixel(1, 1, Rgba([2, 2, 2, 255])))));

        let frame = waiter.await.unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [2, 2, 2, 255]);
    }

    #[tokio::test]
    async fn test_next_frame_times_out_without_frames() {
        let (_tx, handle) = handle();
        assert!(handle.next_frame(Duration::from_millis(10)).await.is_err());
    }

    #[tokio::test]
    async fn test_next_frame_fails_when_pipeline_gone() {
        let (tx, handle) = handle();
        drop(tx);
        assert!(handle.next_frame(Duration::from_secs(5)).await.is_err());
    }
}
