//! Still capture persistence module
//!
//! This module consolidates:
//! - JPEG encoding of captured frames (encode.rs)
//! - The capture sink that writes stills into the album directory (sink.rs)

pub mod encode;
pub mod sink;

pub use encode::encode_jpeg;
pub use sink::{AlbumSink, CaptureSink};
