//! JPEG encoding for captured frames

use anyhow::{Context, Result};
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;

/// Encode an RGBA frame as JPEG; alpha is dropped
pub fn encode_jpeg(frame: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .context("Failed to encode JPEG")?;
    log::debug!(
        "Encoded {}x{} frame as JPEG ({} bytes)",
        frame.width(),
        frame.height(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encoded_bytes_are_jpeg() {
        let frame = RgbaImage::from_pixel(32, 24, Rgba([200, 30, 30, 255]));
        let bytes = encode_jpeg(&frame, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }
}
