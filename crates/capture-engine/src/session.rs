//! Camera session management.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use photobooth_common::error::CameraError;
use photobooth_model::filter::CaptureTransform;
use photobooth_model::frame::Frame;
use photobooth_model::template::{DeviceClass, Resolution};

use crate::backend::{CameraBackend, LiveSource, StreamRequest};
use crate::transform::{apply_transform, fit_to_resolution};

/// State of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Device held, frames available on demand.
    Live,
    /// Device released.
    Closed,
}

/// An open camera, owned for the duration of the capture phase.
///
/// The device handle is released by [`CaptureSession::close`] or, at the
/// latest, when the session is dropped.
pub struct CaptureSession {
    backend_name: String,
    resolution: Resolution,
    source: Option<Box<dyn LiveSource>>,
}

/// A session shared between the UI owner and the shot sequencer.
pub type SharedSession = Arc<Mutex<CaptureSession>>;

impl CaptureSession {
    /// Open the front-facing camera with a resolution hint.
    ///
    /// Snapshots are always delivered at `preferred_resolution`, whatever
    /// the stream's native size.
    pub fn open(
        backend: &dyn CameraBackend,
        preferred_resolution: Resolution,
    ) -> Result<Self, CameraError> {
        tracing::info!(
            backend = backend.name(),
            resolution = %preferred_resolution,
            "Opening camera"
        );

        let request = StreamRequest::front_facing(preferred_resolution);
        let source = backend.acquire(&request).map_err(|e| {
            tracing::warn!(backend = backend.name(), error = %e, "Camera open failed");
            e
        })?;

        tracing::info!(native = %source.resolution(), "Camera stream started");

        Ok(Self {
            backend_name: backend.name().to_string(),
            resolution: preferred_resolution,
            source: Some(source),
        })
    }

    /// Open the camera at the capture resolution of a device class.
    pub fn open_for_device(
        backend: &dyn CameraBackend,
        device: DeviceClass,
    ) -> Result<Self, CameraError> {
        Self::open(backend, device.capture_resolution())
    }

    /// Wrap the session for sharing with a sequencer.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> SessionState {
        if self.source.is_some() {
            SessionState::Live
        } else {
            SessionState::Closed
        }
    }

    pub fn is_live(&self) -> bool {
        self.state() == SessionState::Live
    }

    /// Resolution snapshots are delivered at.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Release the device. Safe to call any number of times.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
            tracing::info!(backend = %self.backend_name, "Camera released");
        }
    }

    /// Grab the current frame, scaled to the session resolution, mirrored
    /// and filtered per `transform`.
    ///
    /// Returns an empty 0x0 frame if the stream has not produced a frame
    /// yet or the session is closed; callers should not store it.
    pub fn snapshot(&self, transform: CaptureTransform) -> Frame {
        let Some(raw) = self.source.as_ref().and_then(|s| s.current_frame()) else {
            tracing::debug!("Snapshot requested before the stream produced a frame");
            return Frame::empty();
        };

        let image = fit_to_resolution(raw, self.resolution);
        let frame = Frame::new(apply_transform(image, transform));
        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            mirrored = transform.mirrored,
            filter = %transform.filter,
            "Snapshot taken"
        );
        frame
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Lock a shared value, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::synthetic::Availability;
    use crate::backend::SyntheticCamera;
    use image::{Rgb, RgbImage};
    use photobooth_model::filter::FilterKind;

    #[test]
    fn open_and_close_release_device() {
        let camera = SyntheticCamera::new();
        let mut session = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
        assert!(session.is_live());
        assert!(camera.is_in_use());

        session.close();
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!camera.is_in_use());
    }

    #[test]
    fn drop_releases_device() {
        let camera = SyntheticCamera::new();
        {
            let _session = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
            assert!(camera.is_in_use());
        }
        assert!(!camera.is_in_use());
    }

    #[test]
    fn second_session_fails_while_first_is_open() {
        let camera = SyntheticCamera::new();
        let _first = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
        let second = CaptureSession::open(&camera, Resolution::new(64, 36));
        assert!(matches!(second, Err(CameraError::DeviceUnavailable { .. })));
    }

    #[test]
    fn permission_denied_is_surfaced() {
        let camera = SyntheticCamera::new().with_availability(Availability::PermissionDenied);
        let result = CaptureSession::open_for_device(&camera, DeviceClass::Compact);
        assert!(matches!(result, Err(CameraError::PermissionDenied { .. })));
        assert!(!camera.is_in_use());
    }

    #[test]
    fn snapshot_before_first_frame_is_empty() {
        let camera = SyntheticCamera::new().with_warmup_reads(1);
        let session = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
        assert!(session.snapshot(CaptureTransform::default()).is_empty());
        assert!(!session.snapshot(CaptureTransform::default()).is_empty());
    }

    #[test]
    fn snapshot_after_close_is_empty() {
        let camera = SyntheticCamera::new();
        let mut session = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
        session.close();
        assert!(session.snapshot(CaptureTransform::default()).is_empty());
    }

    #[test]
    fn snapshot_is_scaled_to_session_resolution() {
        let camera = SyntheticCamera::new().with_native_resolution(Resolution::new(32, 18));
        let session = CaptureSession::open(&camera, Resolution::new(64, 36)).unwrap();
        let frame = session.snapshot(CaptureTransform::identity());
        assert_eq!(frame.dimensions(), (64, 36));
    }

    #[test]
    fn snapshot_applies_mirror_and_filter() {
        let src = RgbImage::from_fn(4, 1, |x, _| {
            if x == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let camera = SyntheticCamera::new().with_feed(vec![src]);
        let session = CaptureSession::open(&camera, Resolution::new(4, 1)).unwrap();

        let frame = session.snapshot(CaptureTransform::new(true, FilterKind::Invert));
        assert_eq!(frame.image().get_pixel(3, 0).0, [0, 0, 0]);
        assert_eq!(frame.image().get_pixel(0, 0).0, [255, 255, 255]);
    }
}
