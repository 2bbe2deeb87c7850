//! Error types
//!
//! The simulation tick itself never fails. Errors only surface at
//! construction time (bad settings, unusable telemetry target).

use thiserror::Error;

/// Settings rejected at construction time
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Fall duration must be strictly positive
    #[error("Fall duration must be positive, got {0}")]
    NonPositiveDuration(f32),

    /// A rate or strength was negative
    #[error("{name} must not be negative, got {value}")]
    NegativeRate {
        /// Setting name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Wind minimum exceeds wind maximum
    #[error("Wind range inverted: min {min} > max {max}")]
    InvertedWindRange {
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// NaN or infinite value
    #[error("{name} must be finite")]
    NonFinite {
        /// Setting name
        name: &'static str,
    },

    /// Settings file could not be read
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Telemetry sink could not be set up
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Target could not be resolved to a socket address
    #[error("Invalid telemetry address: {0}")]
    InvalidAddress(String),

    /// Network I/O error
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// OSC encoding error
    #[error("OSC encoding error: {0}")]
    Encoding(String),
}
