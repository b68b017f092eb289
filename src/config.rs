//! Configuration for the terminal view

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::FontSpec;

/// View configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Font the grid is drawn with
    pub font: FontSpec,
    /// Smallest size ctrl+wheel zoom may reach
    pub font_size_min: f64,
    /// Largest size ctrl+wheel zoom may reach
    pub font_size_max: f64,
    /// Size factor per wheel notch when zooming in
    pub zoom_step: f64,
    /// Wheel units per scrolled row
    pub wheel_divisor: f64,
    /// Pixels left empty around the grid
    pub padding: f64,
    /// Glyph measured to size a cell
    pub reference_glyph: String,
    pub blink: BlinkConfig,
    /// Keep a log of all rendered text
    pub raw_text_capture: bool,
    /// Character capacity the raw-text log grows by
    pub raw_text_batch: usize,
    pub debug: DebugConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            font_size_min: 2.0,
            font_size_max: 20.0,
            zoom_step: 0.9,
            wheel_divisor: 40.0,
            padding: 0.0,
            reference_glyph: "Q".to_string(),
            blink: BlinkConfig::default(),
            raw_text_capture: true,
            raw_text_batch: 1_000_000,
            debug: DebugConfig::default(),
        }
    }
}

/// Blink phase lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub show_ms: u64,
    pub hide_ms: u64,
    /// Upper bound on the tick period
    pub tick_cap_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            show_ms: 600,
            hide_ms: 300,
            tick_cap_ms: 150,
        }
    }
}

/// Diagnostic switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log pointer handling at debug level
    pub mouse: bool,
    /// Log selection changes at debug level
    pub select: bool,
    /// Draw row guides and numbers
    pub view: bool,
}

impl ViewConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ViewConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config")
                    }
                }
            }
        }
        Self::default()
    }

    /// Clamp a font size into the zoom bounds
    pub fn clamp_font_size(&self, size: f64) -> f64 {
        size.clamp(self.font_size_min, self.font_size_max)
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("termview"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
