use image::RgbImage;
use photobooth_common::error::CameraError;
use photobooth_model::template::Resolution;

pub mod synthetic;

pub use synthetic::SyntheticCamera;

/// Parameters for acquiring the front-facing video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    /// Resolution hint; backends may deliver something else.
    pub resolution: Resolution,
}

impl StreamRequest {
    pub fn front_facing(resolution: Resolution) -> Self {
        Self { resolution }
    }
}

/// A running video stream with a continuously updated current frame.
pub trait LiveSource: Send {
    /// Copy of the most recent frame, or `None` before the first frame
    /// arrives or after the source is stopped.
    fn current_frame(&self) -> Option<RgbImage>;

    /// Native resolution of the stream.
    fn resolution(&self) -> Resolution;

    /// Stop streaming and release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Platform camera access.
///
/// A backend hands out at most one live source at a time; acquiring a
/// second one while the first is still running fails with
/// [`CameraError::DeviceUnavailable`].
pub trait CameraBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Open the camera.
    fn acquire(&self, request: &StreamRequest) -> Result<Box<dyn LiveSource>, CameraError>;
}
