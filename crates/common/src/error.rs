//! Error types shared across Photobooth crates.
//!
//! Each failure class has its own enum so callers can match on the
//! concern they care about; [`BoothError`] wraps all of them for code
//! that only needs to propagate.

/// Camera acquisition failures. Fatal to the capture phase: the user has
/// to re-grant access or reconnect the device and open the camera again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Camera unavailable: {message}")]
    DeviceUnavailable { message: String },
}

impl CameraError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable {
            message: msg.into(),
        }
    }
}

/// An image resource (texture or stored photo) could not be decoded.
/// Fatal to a single render attempt only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to decode {source_label}: {message}")]
pub struct DecodeError {
    /// Human-readable description of the image reference.
    pub source_label: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(source_label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            message: message.into(),
        }
    }
}

/// Render was requested before every slot held a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Photo set incomplete: {filled} of {total} slots filled")]
pub struct IncompleteSetError {
    pub filled: usize,
    pub total: usize,
}

/// Top-level error type for Photobooth operations.
#[derive(Debug, thiserror::Error)]
pub enum BoothError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    IncompleteSet(#[from] IncompleteSetError),

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using BoothError.
pub type BoothResult<T> = Result<T, BoothError>;

impl BoothError {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
