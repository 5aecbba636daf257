//! Session host
//!
//! Owns the marker overlay and the session context and handles one [`Event`]
//! at a time. Camera frames, permission requests and captures run elsewhere
//! and report back through the event channel.

use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::Event;
use super::state::{
    CAMERA_UNAVAILABLE_MESSAGE, CameraBinding, PERMISSION_MESSAGE, PermissionState,
    SessionContext, SessionSettings,
};
use crate::camera::{self, CameraPipeline, DisplaySurface};
use crate::capture::CaptureSink;
use crate::core::permission::{GrantedState, PermissionGate};
use crate::domain::{CaptureRequest, CaptureResult, SurfaceSize};
use crate::overlay::{CaptureButton, GestureTracker, MarkerOverlay, PointerEvent};

/// The single-threaded heart of the application
pub struct Session<C: CameraPipeline> {
    context: SessionContext<C::Handle>,
    settings: SessionSettings,
    overlay: Option<MarkerOverlay>,
    button: Option<CaptureButton>,
    gesture: GestureTracker,
    camera: C,
    surface: Arc<dyn DisplaySurface>,
    sink: Arc<dyn CaptureSink>,
    events: mpsc::Sender<Event>,
}

impl<C: CameraPipeline> Session<C> {
    pub fn new(
        settings: SessionSettings,
        camera: C,
        surface: Arc<dyn DisplaySurface>,
        sink: Arc<dyn CaptureSink>,
        events: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            context: SessionContext::default(),
            settings,
            overlay: None,
            button: None,
            gesture: GestureTracker::new(),
            camera,
            surface,
            sink,
            events,
        }
    }

    pub fn context(&self) -> &SessionContext<C::Handle> {
        &self.context
    }

    pub fn overlay(&self) -> Option<&MarkerOverlay> {
        self.overlay.as_ref()
    }

    pub fn button(&self) -> Option<&CaptureButton> {
        self.button.as_ref()
    }

    /// Ask for permission, then handle events until quit or the channel closes
    pub async fn run<P: PermissionGate>(mut self, mut rx: mpsc::Receiver<Event>, gate: P) {
        self.surface.show_message(PERMISSION_MESSAGE);

        let events = self.events.clone();
        tokio::spawn(async move {
            let state = gate.check_or_request().await;
            if events.send(Event::Permission(state)).await.is_err() {
                log::debug!("Session ended before permission resolved");
            }
        });

        while let Some(event) = rx.recv().await {
            if self.update(event).is_break() {
                break;
            }
        }

        self.camera.stop();
    }

    /// Handle one event
    pub fn update(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Permission(state) => self.on_permission(state),
            Event::SurfaceResized(size) => self.on_surface_resized(size),
            Event::Pointer(pointer) => self.on_pointer(pointer),
            Event::CaptureRequested => self.on_capture_requested(),
            Event::CaptureFinished(result) => self.on_capture_finished(result),
            Event::NotificationExpired(seq) => self.on_notification_expired(seq),
            Event::Quit => {
                log::info!("Session quitting");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn on_permission(&mut self, state: GrantedState) {
        log::debug!("Permission resolved, granted: {}", state.is_granted());
        match state {
            GrantedState::Granted(access) => {
                if self.context.permission == PermissionState::Granted {
                    log::debug!("Ignoring repeated camera grant");
                    return;
                }
                self.context.permission = PermissionState::Granted;
                match self.camera.start(access, self.surface.clone()) {
                    Ok(handle) => {
                        self.context.camera = CameraBinding::Bound(handle);
                        // The size may have been reported before the grant
                        if let Some(size) = self.context.surface_size {
                            self.place_markers(size);
                        }
                    }
                    Err(err) => {
                        log::error!("Failed to start camera: {:?}", err);
                        self.context.camera = CameraBinding::Failed;
                        self.surface.show_message(CAMERA_UNAVAILABLE_MESSAGE);
                    }
                }
            }
            GrantedState::Denied => {
                log::info!("Camera permission denied");
                self.context.permission = PermissionState::Denied;
                self.surface.show_message(PERMISSION_MESSAGE);
            }
        }
    }

    fn on_surface_resized(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.context.surface_size = Some(size);
        if self.context.camera.handle().is_some() {
            self.place_markers(size);
        }
    }

    /// Markers are placed once, on the first real surface size
    fn place_markers(&mut self, size: SurfaceSize) {
        if self.overlay.is_some() {
            return;
        }
        log::debug!("Placing markers on {}x{} surface", size.width, size.height);
        self.overlay = Some(MarkerOverlay::new(size, self.settings.palette));
        self.button = Some(CaptureButton::new(size));
        self.publish_overlay();
    }

    fn on_pointer(&mut self, pointer: PointerEvent) {
        // The button is checked before the markers
        if let PointerEvent::Press(position) = pointer
            && self.button.is_some_and(|button| button.contains(position))
        {
            self.on_capture_requested();
            return;
        }

        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if self.gesture.handle(pointer, overlay) {
            self.publish_overlay();
        }
    }

    fn on_capture_requested(&mut self) {
        let Some(handle) = self.context.camera.handle().cloned() else {
            log::debug!("Capture ignored: camera is not running");
            return;
        };

        let request = CaptureRequest::now(&self.settings.album_path);
        self.context.captures_in_flight += 1;
        log::info!(
            "Capturing {} ({} in flight)",
            request.file_name(),
            self.context.captures_in_flight
        );

        let sink = self.sink.clone();
        let quality = self.settings.jpeg_quality;
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = camera::capture(&handle, sink, request, quality).await;
            if events.send(Event::CaptureFinished(result)).await.is_err() {
                log::debug!("Session ended before capture finished");
            }
        });
    }

    fn on_capture_finished(&mut self, result: CaptureResult) {
        self.context.captures_in_flight = self.context.captures_in_flight.saturating_sub(1);
        match result.locator() {
            Some(locator) => log::info!("Capture saved to {}", locator),
            None => log::warn!("Capture failed"),
        }
        log::debug!("{} captures still in flight", self.context.captures_in_flight);

        self.surface.notify(&result.notification_text());
        self.context.notification_seq += 1;

        let seq = self.context.notification_seq;
        let duration = self.settings.notification_duration;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = events.send(Event::NotificationExpired(seq)).await;
        });
    }

    fn on_notification_expired(&mut self, seq: u64) {
        // A newer notification replaced this one
        if seq == self.context.notification_seq {
            self.surface.clear_notification();
        }
    }

    fn publish_overlay(&self) {
        if let Some(overlay) = &self.overlay {
            let mut commands = overlay.render();
            commands.extend(self.button.map(|button| button.render()));
            self.surface.set_overlay(commands);
        }
    }
}
