use crate::error::{LabelError, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs, path::Path};
use toml_edit::{DocumentMut, value};
use tracing::debug;

/// Tool configuration. Every field has a default, and a missing file means
/// all defaults — shipment data itself is never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default shipper name for the BOL signature stamp; overridable per
    /// run with `--shipper`. Blank stamps a signature line instead.
    pub shipper_name: String,
    /// IANA zone used for the stamp date and output-file timestamps.
    pub time_zone: String,
    pub output_dir: PathBuf,
    pub stamp: StampConfig,
}

/// Placement of the signature overlay on BOL pages, in PDF points from the
/// bottom-left corner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub font_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shipper_name: String::new(),
            time_zone: "America/Chicago".to_string(),
            output_dir: PathBuf::from("."),
            stamp: StampConfig::default(),
        }
    }
}

impl Default for StampConfig {
    fn default() -> Self {
        // Signature box position on a letter-portrait BOL.
        StampConfig {
            anchor_x: 88.0,
            anchor_y: 47.0,
            font_size: 11.0,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LabelError::Config(e.to_string()))
    }

    pub fn zone(&self) -> Result<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| LabelError::Zone(self.time_zone.clone()))
    }

    /// Persist a default shipper name, preserving whatever else (including
    /// comments) the config file holds.
    pub fn set_shipper(path: impl AsRef<Path>, name: &str) -> Result<()> {
        let content = fs::read_to_string(&path).unwrap_or_default();
        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|e| LabelError::Config(e.to_string()))?;

        doc["shipper_name"] = value(name);

        fs::write(&path, doc.to_string())?;
        Ok(())
    }
}
