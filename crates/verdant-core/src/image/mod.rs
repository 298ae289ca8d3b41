//! Image payload normalization.
//!
//! Both acquisition paths (uploaded file, captured camera frame) are
//! normalized into a single [`ImagePayload`] so the detection stage always
//! receives an identical input shape: raw bytes plus a declared raster MIME
//! type, convertible to the `data:` URI form used on the wire.

use crate::error::{Result, VerdantError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

/// Raster image formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Resolves a format from a declared MIME type.
    ///
    /// Returns `None` for anything that is not a supported raster type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// The canonical MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }
}

/// One encoded image, produced once per analysis attempt.
///
/// The payload is created by image acquisition, consumed read-only by the
/// detection stage, and snapshotted into the history record of a completed
/// run. It is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// Creates a payload from raw encoded bytes and a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::InvalidImage`] if the bytes are empty or the
    /// MIME type is not a supported raster format. No content validation
    /// beyond that is performed; misclassification is a model concern.
    pub fn from_bytes(bytes: Vec<u8>, mime: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(VerdantError::invalid_image("image payload is empty"));
        }

        let format = ImageFormat::from_mime(mime).ok_or_else(|| {
            VerdantError::invalid_image(format!("unsupported image type: {mime}"))
        })?;

        Ok(Self { format, bytes })
    }

    /// Parses a `data:` URI (e.g. `data:image/jpeg;base64,...`) into a payload.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| VerdantError::invalid_image("not a data URI"))?;

        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| VerdantError::invalid_image("data URI has no payload section"))?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| VerdantError::invalid_image("data URI is not base64-encoded"))?;

        let bytes = BASE64_STANDARD
            .decode(data)
            .map_err(|e| VerdantError::invalid_image(format!("invalid base64 payload: {e}")))?;

        Self::from_bytes(bytes, mime)
    }

    /// Serializes the payload to its `data:` URI wire form.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            BASE64_STANDARD.encode(&self.bytes)
        )
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
