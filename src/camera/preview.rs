//! GStreamer preview window
//!
//! Frames are composited with the marker overlay and pushed into
//! `appsrc ! videoconvert ! textoverlay ! textoverlay ! textoverlay ! videoconvert ! autovideosink`.
//! The first text overlay carries the caption (or the static message), the
//! second one the transient notification and the third one the capture
//! button label. Pointer and key input come back
//! upstream as navigation events and are forwarded to the session.

use anyhow::{Context, Result};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use image::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use super::DisplaySurface;
use crate::config::JawFrameConfig;
use crate::domain::{Point, SurfaceSize};
use crate::overlay::{CAPTURE_BUTTON_LABEL, PointerEvent};
use crate::render::DrawCommand;
use crate::render::geometry::button;
use crate::render::image::{blank_frame, composite};
use crate::session::messages::Event;
use crate::session::shortcuts::handle_key_event;

/// Only the primary button drags markers
const DRAG_BUTTON: i32 = 1;

#[derive(Default)]
struct PreviewState {
    overlay: Vec<DrawCommand>,
    /// Size the appsrc caps are currently negotiated for
    caps_size: Option<(u32, u32)>,
    /// Size of the last camera frame
    frame_size: Option<(u32, u32)>,
    /// Last frame size the session accepted
    reported_size: Option<(u32, u32)>,
    showing_message: bool,
}

/// Preview window fed from camera frames
pub struct PreviewWindow {
    pipeline: gst::Pipeline,
    appsrc: gst_app::AppSrc,
    caption: gst::Element,
    notice: gst::Element,
    button_label: gst::Element,
    caption_text: String,
    fallback_size: (u32, u32),
    state: Mutex<PreviewState>,
    events: mpsc::Sender<Event>,
}

impl PreviewWindow {
    /// Build the preview pipeline; call [`PreviewWindow::start`] to open the window
    pub fn new(config: &JawFrameConfig, events: mpsc::Sender<Event>) -> Result<Arc<Self>> {
        gst::init().context("Failed to initialize GStreamer")?;

        let pipeline = gst::Pipeline::new();

        // Create elements
        let appsrc = gst_app::AppSrc::builder()
            .name("preview-source")
            .is_live(true)
            .format(gst::Format::Time)
            .build();
        appsrc.set_property("do-timestamp", true);

        let convert_in = gst::ElementFactory::make("videoconvert")
            .build()
            .context("Failed to create videoconvert element")?;

        let caption = gst::ElementFactory::make("textoverlay")
            .property("text", config.caption.as_str())
            .property("font-desc", "Sans 16")
            .property("shaded-background", true)
            .property_from_str("valignment", "bottom")
            .property_from_str("halignment", "center")
            .build()
            .context("Failed to create caption textoverlay element")?;

        let notice = gst::ElementFactory::make("textoverlay")
            .property("text", "")
            .property("font-desc", "Sans 14")
            .property("shaded-background", true)
            .property_from_str("valignment", "top")
            .property_from_str("halignment", "center")
            .build()
            .context("Failed to create notification textoverlay element")?;

        // Right/bottom aligned so the label sits inside the button's corner
        let button_label = gst::ElementFactory::make("textoverlay")
            .property("text", "")
            .property("font-desc", "Sans Bold 13")
            .property("xpad", (button::MARGIN + button::LABEL_INSET) as i32)
            .property("ypad", (button::MARGIN + button::HEIGHT / 4.0) as i32)
            .property_from_str("valignment", "bottom")
            .property_from_str("halignment", "right")
            .build()
            .context("Failed to create button textoverlay element")?;

        let convert_out = gst::ElementFactory::make("videoconvert")
            .build()
            .context("Failed to create videoconvert element")?;

        let videosink = gst::ElementFactory::make("autovideosink")
            .build()
            .context("Failed to create autovideosink element")?;

        // Add elements to pipeline
        pipeline.add_many([
            appsrc.upcast_ref(),
            &convert_in,
            &caption,
            &notice,
            &button_label,
            &convert_out,
            &videosink,
        ])?;

        // Link elements
        gst::Element::link_many([
            appsrc.upcast_ref(),
            &convert_in,
            &caption,
            &notice,
            &button_label,
            &convert_out,
            &videosink,
        ])?;

        let src_pad = appsrc
            .static_pad("src")
            .context("appsrc has no src pad")?;
        let nav_events = events.clone();
        src_pad.add_probe(gst::PadProbeType::EVENT_UPSTREAM, move |_pad, info| {
            if let Some(gst::PadProbeData::Event(ref event)) = info.data
                && let Some(ev) = translate_navigation(event)
            {
                forward(&nav_events, ev);
            }
            gst::PadProbeReturn::Ok
        });

        if let Some(bus) = pipeline.bus() {
            let bus_events = events.clone();
            bus.set_sync_handler(move |_bus, msg| {
                use gst::MessageView;
                match msg.view() {
                    MessageView::Error(err) => {
                        // Closing the window surfaces as an error from the sink
                        log::info!(
                            "Preview window stopped: {} ({})",
                            err.error(),
                            err.debug().unwrap_or_default()
                        );
                        forward(&bus_events, Event::Quit);
                    }
                    MessageView::Eos(..) => {
                        forward(&bus_events, Event::Quit);
                    }
                    _ => {}
                }
                gst::BusSyncReply::Drop
            });
        }

        Ok(Arc::new(Self {
            pipeline,
            appsrc,
            caption,
            notice,
            button_label,
            caption_text: config.caption.clone(),
            fallback_size: (config.fallback_width, config.fallback_height),
            state: Mutex::new(PreviewState::default()),
            events,
        }))
    }

    /// Open the window
    pub fn start(&self) -> Result<()> {
        self.pipeline
            .set_state(gst::State::Playing)
            .context("Failed to start preview pipeline")?;
        Ok(())
    }

    pub fn stop(&self) {
        if let Err(err) = self.pipeline.set_state(gst::State::Null) {
            log::error!("Failed to stop preview pipeline: {:?}", err);
        }
    }

    fn state(&self) -> MutexGuard<'_, PreviewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Renegotiate appsrc caps when the frame size changes
    fn ensure_caps(&self, state: &mut PreviewState, width: u32, height: u32) {
        if state.caps_size == Some((width, height)) {
            return;
        }
        let caps = gst::Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .field("width", width as i32)
            .field("height", height as i32)
            .field("framerate", gst::Fraction::new(0, 1))
            .build();
        self.appsrc.set_caps(Some(&caps));
        state.caps_size = Some((width, height));
        log::debug!("Preview caps set to {}x{}", width, height);
    }

    fn update_button_label(&self, commands: &[DrawCommand]) {
        self.button_label
            .set_property("text", button_label_text(commands));
    }

    fn push(&self, frame: RgbaImage) {
        let buffer = gst::Buffer::from_mut_slice(frame.into_raw());
        if let Err(err) = self.appsrc.push_buffer(buffer) {
            log::debug!("Preview dropped a frame: {:?}", err);
        }
    }
}

impl DisplaySurface for PreviewWindow {
    fn present(&self, frame: &RgbaImage) {
        let (width, height) = frame.dimensions();
        let (commands, resized) = {
            let mut state = self.state();
            if state.showing_message {
                state.showing_message = false;
                self.caption.set_property("text", self.caption_text.as_str());
                self.caption.set_property_from_str("valignment", "bottom");
                self.update_button_label(&state.overlay);
            }
            self.ensure_caps(&mut state, width, height);
            state.frame_size = Some((width, height));
            let resized = state.reported_size != Some((width, height));
            (state.overlay.clone(), resized)
        };

        // Keep reporting until the session queue takes the size
        if resized
            && forward(
                &self.events,
                Event::SurfaceResized(SurfaceSize::new(width as f32, height as f32)),
            )
        {
            self.state().reported_size = Some((width, height));
        }
        self.push(composite(frame, &commands));
    }

    fn set_overlay(&self, commands: Vec<DrawCommand>) {
        let mut state = self.state();
        if !state.showing_message {
            self.update_button_label(&commands);
        }
        state.overlay = commands;
    }

    fn show_message(&self, text: &str) {
        let (width, height) = {
            let mut state = self.state();
            state.showing_message = true;
            let (width, height) = state.frame_size.unwrap_or(self.fallback_size);
            self.ensure_caps(&mut state, width, height);
            (width, height)
        };
        self.caption.set_property("text", text);
        self.caption.set_property_from_str("valignment", "center");
        self.button_label.set_property("text", "");
        self.push(blank_frame(width, height));
    }

    fn notify(&self, text: &str) {
        self.notice.set_property("text", text);
    }

    fn clear_notification(&self) {
        self.notice.set_property("text", "");
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Hand an event to the session without blocking a streaming thread
///
/// Returns false when the queue was full or closed and the event was dropped.
fn forward(events: &mpsc::Sender<Event>, event: Event) -> bool {
    match events.try_send(event) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("Session queue rejected event: {}", err);
            false
        }
    }
}

/// Label text for an overlay: shown only when it contains the button
fn button_label_text(commands: &[DrawCommand]) -> &'static str {
    if commands
        .iter()
        .any(|command| matches!(command, DrawCommand::Rect { .. }))
    {
        CAPTURE_BUTTON_LABEL
    } else {
        ""
    }
}

/// Map an upstream navigation event to a session event
fn translate_navigation(event: &gst::Event) -> Option<Event> {
    use gst_video::NavigationEvent;

    let nav = NavigationEvent::parse(event).ok()?;
    match nav {
        NavigationEvent::MouseButtonPress { button, x, y, .. } if button == DRAG_BUTTON => Some(
            Event::Pointer(PointerEvent::Press(Point::new(x as f32, y as f32))),
        ),
        NavigationEvent::MouseMove { x, y, .. } => Some(Event::Pointer(PointerEvent::Motion(
            Point::new(x as f32, y as f32),
        ))),
        NavigationEvent::MouseButtonRelease { button, .. } if button == DRAG_BUTTON => {
            Some(Event::Pointer(PointerEvent::Release))
        }
        NavigationEvent::KeyPress { key, .. } => handle_key_event(&key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarkerColor, Rect};

    #[test]
    fn test_forward_reports_dropped_events() {
        let (tx, mut rx) = mpsc::channel(1);
        assert!(forward(&tx, Event::CaptureRequested));
        assert!(!forward(
            &tx,
            Event::SurfaceResized(SurfaceSize::new(640.0, 480.0))
        ));

        assert!(matches!(rx.try_recv(), Ok(Event::CaptureRequested)));
        assert!(forward(
            &tx,
            Event::SurfaceResized(SurfaceSize::new(640.0, 480.0))
        ));
    }

    #[test]
    fn test_forward_to_closed_session() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        assert!(!forward(&tx, Event::Quit));
    }

    #[test]
    fn test_button_label_follows_button() {
        let circle = DrawCommand::Circle {
            center: Point::new(1.0, 1.0),
            radius: 1.0,
            color: MarkerColor::RED,
        };
        assert_eq!(button_label_text(&[]), "");
        assert_eq!(button_label_text(&[circle]), "");

        let rect = DrawCommand::Rect {
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: MarkerColor::GREEN,
        };
        assert_eq!(button_label_text(&[circle, rect]), CAPTURE_BUTTON_LABEL);
    }
}
