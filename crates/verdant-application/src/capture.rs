//! Camera capture controller.
//!
//! Owns the exclusive camera stream on behalf of the presentation surface.
//! Every opened stream has its tracks stopped exactly once: after a capture,
//! on navigation away, before reopening with a different facing mode, and on
//! drop. Permission failures are recoverable and never start the pipeline.

use std::sync::Arc;
use verdant_core::camera::{CameraDevice, CameraError, CameraStream, FacingMode};
use verdant_core::image::ImagePayload;
use verdant_infrastructure::media;

/// Manages the lifecycle of at most one open camera stream.
pub struct CaptureController {
    device: Arc<dyn CameraDevice>,
    stream: Option<Box<dyn CameraStream>>,
    facing: FacingMode,
}

impl CaptureController {
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self {
            device,
            stream: None,
            facing: FacingMode::default(),
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Opens a stream with the current facing mode.
    ///
    /// Any previously open stream is released first, so the device is never
    /// held twice.
    pub async fn open(&mut self) -> Result<(), CameraError> {
        self.release();

        match self.device.open(self.facing).await {
            Ok(stream) => {
                tracing::debug!(facing = ?self.facing, "camera stream opened");
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera acquisition failed");
                Err(e)
            }
        }
    }

    /// Switches between front and rear camera.
    ///
    /// If a stream is open it is released before the new one is opened with
    /// the other facing mode; a closed controller just flips the preference.
    pub async fn toggle_facing(&mut self) -> Result<(), CameraError> {
        let was_open = self.stream.is_some();
        self.release();
        self.facing = self.facing.toggled();

        if was_open {
            self.open().await?;
        }
        Ok(())
    }

    /// Captures one frame and releases the stream.
    ///
    /// The frame is taken at the stream's native resolution and serialized
    /// to the same encoded form as an uploaded file. The stream's tracks are
    /// stopped whether or not the grab succeeds, so a failed capture never
    /// leaks the camera.
    pub fn capture(&mut self) -> Result<ImagePayload, CameraError> {
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| CameraError::Unavailable("no active camera stream".to_string()))?;

        let result = stream.grab_frame().and_then(|frame| {
            media::encode_frame(&frame)
                .map_err(|e| CameraError::Unavailable(format!("could not encode captured frame: {e}")))
        });

        stream.stop_tracks();
        result
    }

    /// Releases the active stream, if any (the navigate-away hook).
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            tracing::debug!("camera stream released");
        }
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use verdant_core::camera::RasterFrame;

    struct MockStream {
        stops: Arc<AtomicUsize>,
        fail_grab: bool,
    }

    impl CameraStream for MockStream {
        fn grab_frame(&mut self) -> Result<RasterFrame, CameraError> {
            if self.fail_grab {
                return Err(CameraError::Unavailable("sensor fault".to_string()));
            }
            RasterFrame::new(2, 2, vec![10u8; 12])
        }

        fn stop_tracks(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records every opened stream's facing mode and stop counter.
    struct MockDevice {
        deny_permission: bool,
        fail_grab: bool,
        opened: Mutex<Vec<(FacingMode, Arc<AtomicUsize>)>>,
    }

    impl MockDevice {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                deny_permission: false,
                fail_grab: false,
                opened: Mutex::new(Vec::new()),
            })
        }

        fn denying() -> Arc<Self> {
            Arc::new(Self {
                deny_permission: true,
                fail_grab: false,
                opened: Mutex::new(Vec::new()),
            })
        }

        fn with_failing_grab() -> Arc<Self> {
            Arc::new(Self {
                deny_permission: false,
                fail_grab: true,
                opened: Mutex::new(Vec::new()),
            })
        }

        fn stops(&self, index: usize) -> usize {
            self.opened.lock().unwrap()[index].1.load(Ordering::SeqCst)
        }

        fn opened_count(&self) -> usize {
            self.opened.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl CameraDevice for MockDevice {
        async fn open(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CameraError> {
            if self.deny_permission {
                return Err(CameraError::PermissionDenied);
            }
            let stops = Arc::new(AtomicUsize::new(0));
            self.opened.lock().unwrap().push((facing, stops.clone()));
            Ok(Box::new(MockStream {
                stops,
                fail_grab: self.fail_grab,
            }))
        }
    }

    #[tokio::test]
    async fn capture_returns_a_jpeg_payload_and_stops_tracks_once() {
        let device = MockDevice::new();
        let mut controller = CaptureController::new(device.clone());

        controller.open().await.unwrap();
        let payload = controller.capture().unwrap();

        assert_eq!(payload.mime_type(), "image/jpeg");
        assert!(!controller.is_open());
        assert_eq!(device.stops(0), 1);

        // A later release must not stop the same tracks again.
        controller.release();
        assert_eq!(device.stops(0), 1);
    }

    #[tokio::test]
    async fn navigate_away_releases_the_stream_once() {
        let device = MockDevice::new();
        let mut controller = CaptureController::new(device.clone());

        controller.open().await.unwrap();
        controller.release();
        controller.release();

        assert_eq!(device.stops(0), 1);
    }

    #[tokio::test]
    async fn toggle_facing_reopens_with_the_other_mode() {
        let device = MockDevice::new();
        let mut controller = CaptureController::new(device.clone());
        assert_eq!(controller.facing(), FacingMode::User);

        controller.open().await.unwrap();
        controller.toggle_facing().await.unwrap();

        assert_eq!(controller.facing(), FacingMode::Environment);
        assert_eq!(device.opened_count(), 2);
        // The first stream was stopped before the second was opened.
        assert_eq!(device.stops(0), 1);
        assert_eq!(device.stops(1), 0);
        {
            let opened = device.opened.lock().unwrap();
            assert_eq!(opened[0].0, FacingMode::User);
            assert_eq!(opened[1].0, FacingMode::Environment);
        }
    }

    #[tokio::test]
    async fn toggle_facing_on_a_closed_controller_only_flips_the_preference() {
        let device = MockDevice::new();
        let mut controller = CaptureController::new(device.clone());

        controller.toggle_facing().await.unwrap();

        assert_eq!(controller.facing(), FacingMode::Environment);
        assert_eq!(device.opened_count(), 0);
        assert!(!controller.is_open());
    }

    #[tokio::test]
    async fn permission_denied_is_recoverable_and_leaves_nothing_open() {
        let device = MockDevice::denying();
        let mut controller = CaptureController::new(device.clone());

        let err = controller.open().await.unwrap_err();
        assert!(matches!(err, CameraError::PermissionDenied));
        assert!(!controller.is_open());
        assert_eq!(device.opened_count(), 0);
    }

    #[tokio::test]
    async fn failed_grab_still_stops_tracks() {
        let device = MockDevice::with_failing_grab();
        let mut controller = CaptureController::new(device.clone());

        controller.open().await.unwrap();
        assert!(controller.capture().is_err());

        assert_eq!(device.stops(0), 1);
        assert!(!controller.is_open());
    }

    #[tokio::test]
    async fn capture_without_an_open_stream_is_an_error() {
        let device = MockDevice::new();
        let mut controller = CaptureController::new(device);

        assert!(matches!(
            controller.capture(),
            Err(CameraError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn drop_releases_an_open_stream() {
        let device = MockDevice::new();
        {
            let mut controller = CaptureController::new(device.clone());
            controller.open().await.unwrap();
        }
        assert_eq!(device.stops(0), 1);
    }
}
