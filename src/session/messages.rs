//! Message types for the capture session
//!
//! Every input the session reacts to arrives as one [`Event`] on its channel:
//! window input, permission resolution and completions of background work.

use crate::core::permission::GrantedState;
use crate::domain::{CaptureResult, SurfaceSize};
use crate::overlay::PointerEvent;

/// Events handled by the session loop, one at a time
#[derive(Debug)]
pub enum Event {
    /// The permission gate resolved
    Permission(GrantedState),
    /// The preview surface got its first frame or changed size
    SurfaceResized(SurfaceSize),
    /// Pointer input over the preview
    Pointer(PointerEvent),
    /// The capture key was pressed
    CaptureRequested,
    /// A capture started earlier finished
    CaptureFinished(CaptureResult),
    /// The notification with this sequence number timed out
    NotificationExpired(u64),
    /// Window closed or quit requested
    Quit,
}
