//! Templates and device classes chosen before the capture phase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Photo arrangement for a session. Fixed once capture begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Three photos stacked in a single column.
    #[default]
    Diagonal,
    /// Four photos in a 2x2 grid.
    Grid,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::Diagonal, Template::Grid];

    /// Number of photos (slots) this template holds.
    pub fn photo_count(self) -> usize {
        match self {
            Template::Diagonal => 3,
            Template::Grid => 4,
        }
    }

    /// The template holding exactly `n` photos.
    pub fn from_photo_count(n: usize) -> Option<Self> {
        Template::ALL.into_iter().find(|t| t.photo_count() == n)
    }

    pub fn name(self) -> &'static str {
        match self {
            Template::Diagonal => "diagonal",
            Template::Grid => "grid",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown template or device class name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Template {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diagonal" | "3" => Ok(Template::Diagonal),
            "grid" | "4" => Ok(Template::Grid),
            _ => Err(UnknownChoice {
                kind: "template",
                value: s.to_string(),
            }),
        }
    }
}

/// Pixel dimensions of a video stream or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Form factor of the device running the booth. Drives cell sizes,
/// capture resolution and output pixel density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Phones and other narrow screens.
    Compact,
    #[default]
    Standard,
}

impl DeviceClass {
    /// Camera resolution requested when opening the capture session.
    pub fn capture_resolution(self) -> Resolution {
        match self {
            DeviceClass::Compact => Resolution::new(1280, 720),
            DeviceClass::Standard => Resolution::new(1920, 1080),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceClass::Compact => "compact",
            DeviceClass::Standard => "standard",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceClass {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "mobile" => Ok(DeviceClass::Compact),
            "standard" | "desktop" => Ok(DeviceClass::Standard),
            _ => Err(UnknownChoice {
                kind: "device class",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_counts() {
        assert_eq!(Template::Diagonal.photo_count(), 3);
        assert_eq!(Template::Grid.photo_count(), 4);
        assert_eq!(Template::from_photo_count(4), Some(Template::Grid));
        assert_eq!(Template::from_photo_count(5), None);
    }

    #[test]
    fn parse_choices() {
        assert_eq!("Grid".parse::<Template>().unwrap(), Template::Grid);
        assert_eq!("3".parse::<Template>().unwrap(), Template::Diagonal);
        assert_eq!("mobile".parse::<DeviceClass>().unwrap(), DeviceClass::Compact);
        let err = "tablet".parse::<DeviceClass>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown device class: tablet");
    }

    #[test]
    fn capture_resolution_by_device() {
        assert_eq!(
            DeviceClass::Compact.capture_resolution(),
            Resolution::new(1280, 720)
        );
        assert_eq!(DeviceClass::Standard.capture_resolution().to_string(), "1920x1080");
    }
}
