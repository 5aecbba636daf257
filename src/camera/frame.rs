//! Conversion of GStreamer samples into RGBA frames

use anyhow::{Context, Result, bail};
use gstreamer as gst;
use gstreamer_video as gst_video;
use image::RgbaImage;

/// Bytes per RGBA pixel
const BPP: usize = 4;

/// Copy a tightly packed RGBA image out of a buffer whose rows may be padded
pub fn rgba_from_strided(data: &[u8], width: u32, height: u32, stride: usize) -> Result<RgbaImage> {
    let row_len = width as usize * BPP;
    if stride < row_len {
        bail!("Stride {} shorter than row length {}", stride, row_len);
    }
    let needed = stride * (height as usize).saturating_sub(1) + row_len;
    if height > 0 && data.len() < needed {
        bail!(
            "Frame buffer too small: {} bytes for {}x{} (stride {})",
            data.len(),
            width,
            height,
            stride
        );
    }

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(stride).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }
    RgbaImage::from_raw(width, height, pixels).context("Frame size does not match pixel data")
}

/// Extract an RGBA frame from an appsink sample negotiated as `video/x-raw,format=RGBA`
pub fn frame_from_sample(sample: &gst::Sample) -> Result<RgbaImage> {
    let caps = sample.caps().context("Sample has no caps")?;
    let info = gst_video::VideoInfo::from_caps(caps).context("Sample caps are not raw video")?;
    if info.format() != gst_video::VideoFormat::Rgba {
        bail!("Unexpected frame format {:?}", info.format());
    }
    let buffer = sample.buffer().context("Sample has no buffer")?;
    let map = buffer
        .map_readable()
        .context("Failed to map frame buffer for reading")?;
    let stride = info.stride()[0].max(0) as usize;
    rgba_from_strided(map.as_slice(), info.width(), info.height(), stride)
}
