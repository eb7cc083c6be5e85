//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::BoothResult;

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default capture settings.
    pub capture: CaptureDefaults,

    /// Default frame decoration.
    pub frame: FrameDefaults,

    /// Where exports are written.
    pub output: OutputDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default capture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Device class ("standard" or "compact").
    pub device_class: String,

    /// Countdown length before each shot, in seconds.
    pub countdown_secs: u32,

    /// Flash pulse length in milliseconds.
    pub flash_ms: u64,

    /// Whether snapshots are mirrored like the live preview.
    pub mirrored: bool,

    /// Filter name (e.g. "none", "sepia", "hue-rotate").
    pub filter: String,
}

/// Default frame decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameDefaults {
    /// Solid frame color as `#rrggbb`.
    pub color: String,

    /// Optional texture image; takes precedence over `color`.
    pub texture: Option<PathBuf>,
}

/// Export destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefaults {
    /// Directory exports are written to.
    pub export_dir: PathBuf,

    /// File name of the exported composite.
    pub file_name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "photobooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Countdown lengths offered to the user.
pub const COUNTDOWN_CHOICES_SECS: [u32; 3] = [3, 5, 10];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture: CaptureDefaults::default(),
            frame: FrameDefaults::default(),
            output: OutputDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            device_class: "standard".to_string(),
            countdown_secs: COUNTDOWN_CHOICES_SECS[0],
            flash_ms: 300,
            mirrored: true,
            filter: "none".to_string(),
        }
    }
}

impl Default for FrameDefaults {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            texture: None,
        }
    }
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            file_name: "photobooth.png".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> BoothResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }

    /// Full path of the default export file.
    pub fn export_path(&self) -> PathBuf {
        self.output.export_dir.join(&self.output.file_name)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("photobooth").join("config.json")
}
