//! Camera abstractions.
//!
//! The camera is the only exclusive hardware resource in the system. The
//! traits here let the application layer own its lifecycle (open, grab one
//! frame, stop every track) without binding to a concrete device; the
//! presentation surface supplies the real device, tests supply mocks.

use thiserror::Error;

/// Which way the camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera (the default for a fresh controller).
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

/// One captured frame at the camera's native resolution, tightly packed RGB8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterFrame {
    /// Validates that the pixel buffer matches the declared dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(CameraError::Unavailable(format!(
                "frame buffer mismatch: {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}

/// Camera acquisition errors.
///
/// These are recoverable: the pipeline is never started, and the system
/// stays ready to accept an upload or another camera attempt.
#[derive(Error, Debug, Clone)]
pub enum CameraError {
    /// The user denied camera access.
    #[error("camera permission denied")]
    PermissionDenied,
    /// No usable device, or the device failed mid-capture.
    #[error("camera unavailable: {0}")]
    Unavailable(String),
}

/// An open media stream whose hardware tracks must be stopped when the
/// stream is released.
pub trait CameraStream: Send {
    /// Grabs the current frame at the stream's native resolution.
    fn grab_frame(&mut self) -> Result<RasterFrame, CameraError>;

    /// Stops every underlying hardware track.
    ///
    /// Called exactly once per acquisition cycle by the owning controller.
    fn stop_tracks(&mut self);
}

/// A camera device that can open at most one stream at a time.
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// Opens a stream with the requested facing mode.
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_mode_toggles_both_ways() {
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
    }

    #[test]
    fn raster_frame_rejects_mismatched_buffers() {
        assert!(RasterFrame::new(2, 2, vec![0; 12]).is_ok());
        assert!(RasterFrame::new(2, 2, vec![0; 11]).is_err());
        assert!(RasterFrame::new(0, 2, vec![]).is_err());
    }
}
