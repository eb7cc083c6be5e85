//! Captured frames.

use std::fmt;
use std::sync::Arc;

use image::RgbImage;

/// An immutable, opaque RGB8 pixel buffer.
///
/// The pixel storage is shared, so cloning a `Frame` is cheap and never
/// copies pixels. There is no way to mutate a frame after creation.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pixels: Arc<RgbImage>,
}

impl Frame {
    /// Wrap a decoded image.
    pub fn new(image: RgbImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    /// A 0x0 frame, returned when a source has not produced a frame yet.
    pub fn empty() -> Self {
        Self::new(RgbImage::new(0, 0))
    }

    /// Create a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// True for a 0-area frame.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Read-only access to the pixels.
    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Whether two frames share the same pixel storage.
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        Self::new(image)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
