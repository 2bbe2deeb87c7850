//! Incense Sim - a falling, wind-buffeted incense stick
//!
//! Core modules:
//! - `sim`: Deterministic simulation (descent, wind, steering, scoring)
//! - `session`: Orchestrates one live simulation and its observers
//! - `telemetry`: Best-effort OSC publication of per-tick metrics
//! - `presentation`: Pure visual cues derived from the end-of-tick snapshot
//! - `settings`: Session configuration

pub mod error;
pub mod presentation;
pub mod session;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use error::{SettingsError, TelemetryError};
pub use session::Session;
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Default frame timestep for headless runs (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Legal tilt range (degrees). 90 is perfectly vertical.
    pub const ANGLE_MIN: f32 = 30.0;
    pub const ANGLE_MAX: f32 = 150.0;
    pub const ANGLE_CENTER: f32 = 90.0;

    /// Range the starting tilt is drawn from
    pub const INITIAL_ANGLE_MIN: f32 = 60.0;
    pub const INITIAL_ANGLE_MAX: f32 = 120.0;

    /// Single-tick swing (degrees) that drives stability to zero
    pub const STABILITY_SWING: f32 = 10.0;

    /// Deviation (degrees) at which each sincerity variant reaches zero
    pub const DISPLAY_TOLERANCE: f32 = 30.0;
    pub const TELEMETRY_TOLERANCE: f32 = 20.0;
    pub const LANDING_TOLERANCE: f32 = 60.0;

    /// Share of nominal wind lost by the time the stick reaches the target
    pub const WIND_DECAY_SHARE: f32 = 0.5;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Linear interpolation with the factor clamped to [0, 1]
#[inline]
pub fn lerp_clamped(from: f32, to: f32, t: f32) -> f32 {
    glam::FloatExt::lerp(from, to, clamp01(t))
}

/// Clamp a tilt to the legal angle range
#[inline]
pub fn clamp_angle(angle: f32) -> f32 {
    angle.clamp(consts::ANGLE_MIN, consts::ANGLE_MAX)
}
