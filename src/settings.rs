//! Session settings
//!
//! Immutable for the lifetime of a session. Loaded from JSON (all fields
//! optional) and validated before a session is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Descent timing and heights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallSettings {
    /// Height the stick starts falling from
    pub start_height: f32,
    /// Height of the burner surface
    pub target_height: f32,
    /// Total fall time in seconds
    pub duration: f32,
}

impl Default for FallSettings {
    fn default() -> Self {
        Self {
            start_height: 2.0,
            target_height: 0.5,
            duration: 30.0,
        }
    }
}

/// Wind envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindSettings {
    /// Lower bound of the nominal wind force (degrees/s)
    pub force_min: f32,
    /// Nominal wind ceiling (degrees/s)
    pub force_max: f32,
    /// Relaxation rate of the tilt toward the wind attractor (1/s)
    pub change_rate: f32,
}

impl Default for WindSettings {
    fn default() -> Self {
        Self {
            force_min: 20.0,
            force_max: 60.0,
            change_rate: 5.0,
        }
    }
}

/// Player steering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Degrees per second per unit of steering axis
    pub strength: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self { strength: 100.0 }
    }
}

/// Outbound OSC telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Address prefix for every metric (e.g. "/incense")
    pub prefix: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8000,
            prefix: "/incense".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// "host:port" target string
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fall: FallSettings,
    pub wind: WindSettings,
    pub control: ControlSettings,
    pub telemetry: TelemetrySettings,
    /// Fixed seed for deterministic replay (random when absent)
    pub seed: Option<u64>,
}

impl Settings {
    /// Parse settings from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject contract violations up front so no session runs on them
    pub fn validate(&self) -> Result<(), SettingsError> {
        let finite = [
            ("fall.start_height", self.fall.start_height),
            ("fall.target_height", self.fall.target_height),
            ("fall.duration", self.fall.duration),
            ("wind.force_min", self.wind.force_min),
            ("wind.force_max", self.wind.force_max),
            ("wind.change_rate", self.wind.change_rate),
            ("control.strength", self.control.strength),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { name });
            }
        }

        if self.fall.duration <= 0.0 {
            return Err(SettingsError::NonPositiveDuration(self.fall.duration));
        }

        let rates = [
            ("wind.force_min", self.wind.force_min),
            ("wind.force_max", self.wind.force_max),
            ("wind.change_rate", self.wind.change_rate),
            ("control.strength", self.control.strength),
        ];
        for (name, value) in rates {
            if value < 0.0 {
                return Err(SettingsError::NegativeRate { name, value });
            }
        }

        if self.wind.force_min > self.wind.force_max {
            return Err(SettingsError::InvertedWindRange {
                min: self.wind.force_min,
                max: self.wind.force_max,
            });
        }

        Ok(())
    }

    /// Settings with the wind switched off entirely
    pub fn calm(mut self) -> Self {
        self.wind.force_min = 0.0;
        self.wind.force_max = 0.0;
        self
    }
}
