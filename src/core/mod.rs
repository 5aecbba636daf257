//! Core application module
//!
//! This module contains:
//! - Application entry point wiring the session to GStreamer and the portal
//! - Camera permission gates
//! - D-Bus camera portal proxies and response types

pub mod app;
pub mod permission;
pub mod portal;
