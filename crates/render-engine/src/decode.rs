//! Image decode service.

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageReader, RgbImage};
use photobooth_common::error::DecodeError;
use photobooth_model::background::ImageSource;
use photobooth_model::frame::Frame;

/// Decodes encoded images into RGB rasters.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, source: &ImageSource) -> Result<RgbImage, DecodeError>;
}

/// Decoder backed by the `image` crate. Decoding runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageDecoder for ImageCrateDecoder {
    async fn decode(&self, source: &ImageSource) -> Result<RgbImage, DecodeError> {
        let source = source.clone();
        let label = source.label();
        tokio::task::spawn_blocking(move || decode_blocking(&source))
            .await
            .map_err(|e| DecodeError::new(label, format!("decode task failed: {e}")))?
    }
}

fn decode_blocking(source: &ImageSource) -> Result<RgbImage, DecodeError> {
    let fail = |e: &dyn std::fmt::Display| DecodeError::new(source.label(), e.to_string());

    let image = match source {
        ImageSource::Memory { bytes, .. } => ImageReader::new(Cursor::new(&bytes[..]))
            .with_guessed_format()
            .map_err(|e| fail(&e))?
            .decode()
            .map_err(|e| fail(&e))?,
        ImageSource::Path(path) => ImageReader::open(path)
            .map_err(|e| fail(&e))?
            .decode()
            .map_err(|e| fail(&e))?,
    };

    let image = image.to_rgb8();
    tracing::debug!(
        source = %source.label(),
        width = image.width(),
        height = image.height(),
        "Image decoded"
    );
    Ok(image)
}

/// Decode a source straight into a [`Frame`].
pub async fn decode_frame(
    decoder: &dyn ImageDecoder,
    source: &ImageSource,
) -> Result<Frame, DecodeError> {
    decoder.decode(source).await.map(Frame::new)
}
