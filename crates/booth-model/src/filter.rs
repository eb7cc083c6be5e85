//! Capture-time transforms: mirroring and stylistic filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stylistic filter applied to a snapshot before it is stored.
///
/// Every variant has a fixed strength, see [`FilterKind::intensity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Blur,
    Invert,
    Brighten,
    HighContrast,
    Saturate,
    HueRotate,
}

impl FilterKind {
    /// All filters in menu order.
    pub const ALL: [FilterKind; 9] = [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Blur,
        FilterKind::Invert,
        FilterKind::Brighten,
        FilterKind::HighContrast,
        FilterKind::Saturate,
        FilterKind::HueRotate,
    ];

    /// Filter strength, in the unit of [`FilterKind::unit`].
    ///
    /// Amounts are fractions (1.0 = 100%), blur is a radius in pixels,
    /// hue rotation is in degrees.
    pub fn intensity(self) -> f32 {
        match self {
            FilterKind::None => 0.0,
            FilterKind::Grayscale => 1.0,
            FilterKind::Sepia => 1.0,
            FilterKind::Blur => 5.0,
            FilterKind::Invert => 1.0,
            FilterKind::Brighten => 1.5,
            FilterKind::HighContrast => 1.5,
            FilterKind::Saturate => 2.0,
            FilterKind::HueRotate => 90.0,
        }
    }

    /// Unit of [`FilterKind::intensity`].
    pub fn unit(self) -> IntensityUnit {
        match self {
            FilterKind::Blur => IntensityUnit::Pixels,
            FilterKind::HueRotate => IntensityUnit::Degrees,
            _ => IntensityUnit::Fraction,
        }
    }

    /// Machine name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Blur => "blur",
            FilterKind::Invert => "invert",
            FilterKind::Brighten => "brighten",
            FilterKind::HighContrast => "high-contrast",
            FilterKind::Saturate => "saturate",
            FilterKind::HueRotate => "hue-rotate",
        }
    }

    /// Menu label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::None => "None",
            FilterKind::Grayscale => "Black & White",
            FilterKind::Sepia => "Vintage",
            FilterKind::Blur => "Blur",
            FilterKind::Invert => "Invert",
            FilterKind::Brighten => "Bright",
            FilterKind::HighContrast => "High Contrast",
            FilterKind::Saturate => "Vibrant",
            FilterKind::HueRotate => "Retro",
        }
    }

    /// Equivalent CSS filter function, for UI previews of the live feed.
    pub fn css(self) -> String {
        let amount = self.intensity();
        match self {
            FilterKind::None => "none".to_string(),
            FilterKind::Grayscale => format!("grayscale({}%)", amount * 100.0),
            FilterKind::Sepia => format!("sepia({}%)", amount * 100.0),
            FilterKind::Blur => format!("blur({amount}px)"),
            FilterKind::Invert => format!("invert({}%)", amount * 100.0),
            FilterKind::Brighten => format!("brightness({}%)", amount * 100.0),
            FilterKind::HighContrast => format!("contrast({}%)", amount * 100.0),
            FilterKind::Saturate => format!("saturate({}%)", amount * 100.0),
            FilterKind::HueRotate => format!("hue-rotate({amount}deg)"),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        FilterKind::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Unit of a filter's intensity constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityUnit {
    Fraction,
    Pixels,
    Degrees,
}

/// How a raw frame is transformed before it is stored in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTransform {
    /// Flip horizontally about the vertical center axis.
    pub mirrored: bool,
    pub filter: FilterKind,
}

impl CaptureTransform {
    pub fn new(mirrored: bool, filter: FilterKind) -> Self {
        Self { mirrored, filter }
    }

    /// No mirroring, no filter.
    pub fn identity() -> Self {
        Self::new(false, FilterKind::None)
    }
}

impl Default for CaptureTransform {
    /// Mirrored, like a front-facing camera preview.
    fn default() -> Self {
        Self::new(true, FilterKind::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for filter in FilterKind::ALL {
            assert_eq!(filter.name().parse::<FilterKind>().unwrap(), filter);
        }
        assert_eq!("High_Contrast".parse::<FilterKind>().unwrap(), FilterKind::HighContrast);
        assert!("vaporwave".parse::<FilterKind>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&FilterKind::HueRotate).unwrap();
        assert_eq!(json, "\"hue-rotate\"");
        let parsed: FilterKind = serde_json::from_str("\"high-contrast\"").unwrap();
        assert_eq!(parsed, FilterKind::HighContrast);
    }

    #[test]
    fn css_matches_intensity_constants() {
        assert_eq!(FilterKind::Grayscale.css(), "grayscale(100%)");
        assert_eq!(FilterKind::Blur.css(), "blur(5px)");
        assert_eq!(FilterKind::Brighten.css(), "brightness(150%)");
        assert_eq!(FilterKind::Saturate.css(), "saturate(200%)");
        assert_eq!(FilterKind::HueRotate.css(), "hue-rotate(90deg)");
        assert_eq!(FilterKind::HueRotate.unit(), IntensityUnit::Degrees);
    }

    #[test]
    fn default_transform_is_mirrored_without_filter() {
        let t = CaptureTransform::default();
        assert!(t.mirrored);
        assert_eq!(t.filter, FilterKind::None);
    }
}
