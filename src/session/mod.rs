//! Capture session management module
//!
//! This module contains:
//! - Session state (permission, camera binding, notifications)
//! - Event types delivered to the session loop
//! - Keyboard shortcuts
//! - The session host that owns the overlay and reacts to events

pub mod host;
pub mod messages;
pub mod shortcuts;
pub mod state;

pub use host::Session;
pub use messages::Event;
