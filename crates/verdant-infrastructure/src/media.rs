//! Image acquisition backends.
//!
//! Normalizes both acquisition paths into an [`ImagePayload`]: uploaded
//! files are read and MIME-checked, captured camera frames are rasterized
//! to JPEG at their native resolution. Either way the detection stage
//! receives the same input shape.

use std::io::Cursor;
use std::path::Path;
use verdant_core::camera::RasterFrame;
use verdant_core::error::{Result, VerdantError};
use verdant_core::image::{ImageFormat, ImagePayload};

/// Loads an image file from disk (the upload path).
///
/// The MIME type is resolved from the file extension and must be one of the
/// supported raster formats.
pub fn load_image_file(path: &Path) -> Result<ImagePayload> {
    let mime = mime_guess::from_path(path)
        .first_raw()
        .ok_or_else(|| VerdantError::invalid_image(format!("{}: unknown file type", path.display())))?;

    if ImageFormat::from_mime(mime).is_none() {
        return Err(VerdantError::invalid_image(format!(
            "{}: not a supported raster image ({mime})",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)?;
    ImagePayload::from_bytes(bytes, mime)
}

/// Serializes a captured camera frame to JPEG (the capture path).
pub fn encode_frame(frame: &RasterFrame) -> Result<ImagePayload> {
    let buffer = image::ImageBuffer::<image::Rgb<u8>, Vec<u8>>::from_raw(
        frame.width,
        frame.height,
        frame.pixels.clone(),
    )
    .ok_or_else(|| VerdantError::invalid_image("frame buffer does not match its dimensions"))?;

    let mut encoded = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(buffer)
        .write_to(&mut encoded, image::ImageFormat::Jpeg)
        .map_err(|e| VerdantError::invalid_image(format!("failed to encode frame: {e}")))?;

    ImagePayload::from_bytes(encoded.into_inner(), "image/jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn encode_frame_produces_a_jpeg_payload() {
        let frame = RasterFrame::new(2, 2, vec![0u8; 12]).unwrap();
        let payload = encode_frame(&frame).unwrap();

        assert_eq!(payload.mime_type(), "image/jpeg");
        // JPEG start-of-image marker
        assert_eq!(&payload.bytes()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn load_image_file_resolves_mime_from_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("leaf.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let payload = load_image_file(&path).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn load_image_file_rejects_non_raster_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(load_image_file(&path).is_err());
    }

    #[test]
    fn load_image_file_rejects_unknown_extensions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mystery");
        std::fs::write(&path, "data").unwrap();

        assert!(load_image_file(&path).is_err());
    }
}
