pub mod compose;
pub mod filters;
pub mod layout;
pub mod shoot;

use std::path::PathBuf;

use photobooth_common::config::AppConfig;
use photobooth_common::error::{BoothError, BoothResult};
use photobooth_model::background::{Background, FrameColor, ImageSource};
use photobooth_model::template::DeviceClass;

/// Command-line device class, else the configured one.
pub fn resolve_device(flag: Option<DeviceClass>, config: &AppConfig) -> BoothResult<DeviceClass> {
    match flag {
        Some(device) => Ok(device),
        None => config
            .capture
            .device_class
            .parse()
            .map_err(|e| BoothError::config(format!("capture.device_class: {e}"))),
    }
}

/// Background from the command line, falling back to the configured frame.
pub fn resolve_background(
    color: Option<FrameColor>,
    texture: Option<PathBuf>,
    config: &AppConfig,
) -> BoothResult<Background> {
    if let Some(path) = texture {
        return Ok(Background::Texture(ImageSource::Path(path)));
    }
    if let Some(color) = color {
        return Ok(Background::Solid(color));
    }
    if let Some(path) = &config.frame.texture {
        return Ok(Background::Texture(ImageSource::Path(path.clone())));
    }
    let color = config
        .frame
        .color
        .parse()
        .map_err(|e| BoothError::config(format!("frame.color: {e}")))?;
    Ok(Background::Solid(color))
}

/// Output path from the command line, else the configured export path.
pub fn resolve_output(output: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    output.unwrap_or_else(|| config.export_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        config.frame.texture = Some(PathBuf::from("paper.jpg"));

        let bg = resolve_background(Some(FrameColor::BLACK), None, &config).unwrap();
        assert_eq!(bg, Background::Solid(FrameColor::BLACK));
        assert_eq!(
            resolve_device(Some(DeviceClass::Compact), &config).unwrap(),
            DeviceClass::Compact
        );
        assert_eq!(
            resolve_output(Some(PathBuf::from("out.png")), &config),
            PathBuf::from("out.png")
        );
    }

    #[test]
    fn config_supplies_defaults() {
        let mut config = AppConfig::default();
        assert_eq!(resolve_device(None, &config).unwrap(), DeviceClass::Standard);
        assert_eq!(
            resolve_background(None, None, &config).unwrap(),
            Background::Solid(FrameColor::WHITE)
        );

        config.frame.texture = Some(PathBuf::from("paper.jpg"));
        assert_eq!(
            resolve_background(None, None, &config).unwrap().texture(),
            Some(&ImageSource::Path(PathBuf::from("paper.jpg")))
        );
    }

    #[test]
    fn bad_config_values_are_reported() {
        let mut config = AppConfig::default();
        config.capture.device_class = "tablet".into();
        config.frame.color = "pink".into();
        assert!(matches!(
            resolve_device(None, &config),
            Err(BoothError::Config { .. })
        ));
        let err = resolve_background(None, None, &config).unwrap_err();
        assert!(matches!(err, BoothError::Config { .. }));
        assert!(err.to_string().contains("frame.color"));
    }
}
