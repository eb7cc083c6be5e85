//! Canvas backgrounds: a solid frame color or a texture image.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An opaque RGB frame color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FrameColor {
    pub const WHITE: FrameColor = FrameColor::new(0xff, 0xff, 0xff);
    pub const BLACK: FrameColor = FrameColor::new(0x00, 0x00, 0x00);

    /// Frame colors offered in the booth UI.
    pub const PALETTE: [FrameColor; 6] = [
        FrameColor::WHITE,
        FrameColor::BLACK,
        FrameColor::new(0x4d, 0x00, 0x00),
        FrameColor::new(0x0e, 0x1b, 0x45),
        FrameColor::new(0x1e, 0x3d, 0x1b),
        FrameColor::new(0xfc, 0xe6, 0xf2),
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for FrameColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color string that is not `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color {0:?}, expected #rrggbb")]
pub struct InvalidColor(pub String);

impl FromStr for FrameColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| InvalidColor(s.to_string()))
        };
        Ok(FrameColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Reference to an encoded image for the decode service.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded bytes already in memory.
    Memory { label: String, bytes: Arc<[u8]> },
    /// An image file on disk.
    Path(PathBuf),
}

impl ImageSource {
    pub fn memory(label: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            label: label.into(),
            bytes: bytes.into(),
        }
    }

    /// Short description used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            ImageSource::Memory { label, .. } => label.clone(),
            ImageSource::Path(path) => path.display().to_string(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Memory { label, bytes } => f
                .debug_struct("Memory")
                .field("label", label)
                .field("len", &bytes.len())
                .finish(),
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// What is painted behind the photos.
///
/// Color and texture are mutually exclusive: choosing one replaces the
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Solid(FrameColor),
    /// Texture stretched over the whole canvas.
    Texture(ImageSource),
}

impl Background {
    /// Switch to a solid color, dropping any texture.
    pub fn select_color(&mut self, color: FrameColor) {
        *self = Background::Solid(color);
    }

    /// Switch to a texture, dropping the solid color.
    pub fn select_texture(&mut self, texture: ImageSource) {
        *self = Background::Texture(texture);
    }

    pub fn color(&self) -> Option<FrameColor> {
        match self {
            Background::Solid(color) => Some(*color),
            Background::Texture(_) => None,
        }
    }

    pub fn texture(&self) -> Option<&ImageSource> {
        match self {
            Background::Solid(_) => None,
            Background::Texture(source) => Some(source),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(FrameColor::WHITE)
    }
}
