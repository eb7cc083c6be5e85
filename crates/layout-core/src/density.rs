//! Output pixel density.

use photobooth_model::template::DeviceClass;

/// Lowest density ever used for output rasters.
pub const MIN_PIXEL_DENSITY: f64 = 2.0;

/// Highest density the renderer accepts.
pub const MAX_PIXEL_DENSITY: f64 = 8.0;

/// Density for the output raster.
///
/// Compact devices always render at [`MIN_PIXEL_DENSITY`]. Elsewhere the
/// device-reported density is used, clamped to
/// [`MIN_PIXEL_DENSITY`]..=[`MAX_PIXEL_DENSITY`]; a missing or invalid
/// report counts as 1.
pub fn pixel_density(device: DeviceClass, reported: Option<f64>) -> f64 {
    match device {
        DeviceClass::Compact => MIN_PIXEL_DENSITY,
        DeviceClass::Standard => {
            let reported = reported
                .filter(|d| d.is_finite() && *d > 0.0)
                .unwrap_or(1.0);
            reported.clamp(MIN_PIXEL_DENSITY, MAX_PIXEL_DENSITY)
        }
    }
}
