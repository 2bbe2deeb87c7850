//! Tilt dynamics and scoring
//!
//! Each tick the wind attractor takes a random-walk step bounded by the
//! current wind ceiling, the tilt relaxes toward it, and player steering is
//! added on top. Every stage clamps to [30, 150] degrees.
//!
//! Three sincerity scores are derived from the tilt, each with its own
//! tolerance:
//!
//! | score     | tolerance | shape   | consumer            |
//! |-----------|-----------|---------|---------------------|
//! | display   | 30°       | squared | on-screen feedback  |
//! | telemetry | 20°       | squared | OSC listener        |
//! | final     | 60°       | linear  | frozen at landing   |

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::{clamp01, clamp_angle, lerp_clamped};

/// Live tilt update rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleProcess {
    /// Nominal wind ceiling (degrees/s) before descent decay
    pub wind_force_max: f32,
    /// Relaxation rate toward the wind attractor (1/s)
    pub wind_change_rate: f32,
    /// Steering gain (degrees/s per axis unit)
    pub control_strength: f32,
}

impl AngleProcess {
    pub fn new(settings: &Settings) -> Self {
        Self {
            wind_force_max: settings.wind.force_max,
            wind_change_rate: settings.wind.change_rate,
            control_strength: settings.control.strength,
        }
    }

    /// Random-walk the wind attractor. Returns the new attractor.
    pub fn gust<R: Rng>(
        &self,
        target_wind_angle: f32,
        ceiling_multiplier: f32,
        dt: f32,
        rng: &mut R,
    ) -> f32 {
        let ceiling = (self.wind_force_max * ceiling_multiplier).max(0.0);
        let wind_change = rng.random_range(-ceiling..=ceiling) * dt;
        clamp_angle(target_wind_angle + wind_change)
    }

    /// Relax the tilt toward the attractor
    pub fn relax(&self, current: f32, target_wind_angle: f32, dt: f32) -> f32 {
        clamp_angle(lerp_clamped(
            current,
            target_wind_angle,
            self.wind_change_rate * dt,
        ))
    }

    /// Additive player steering
    pub fn steer(&self, current: f32, axis: f32, dt: f32) -> f32 {
        clamp_angle(current + axis * self.control_strength * dt)
    }
}

/// Per-tick smoothness: 1 when still, 0 at a 10° swing or more
#[inline]
pub fn stability(last_angle: f32, current_angle: f32) -> f32 {
    let angle_change = (current_angle - last_angle).abs();
    clamp01(1.0 - angle_change / STABILITY_SWING)
}

#[inline]
fn deviation(angle: f32) -> f32 {
    (angle - ANGLE_CENTER).abs()
}

/// Linear closeness to vertical within `tolerance` degrees
#[inline]
pub fn linear_sincerity(angle: f32, tolerance: f32) -> f32 {
    clamp01(1.0 - deviation(angle) / tolerance)
}

/// On-screen sincerity (30° band, squared)
#[inline]
pub fn display_sincerity(angle: f32) -> f32 {
    let lin = linear_sincerity(angle, DISPLAY_TOLERANCE);
    lin * lin
}

/// Telemetry sincerity (20° band, squared)
#[inline]
pub fn telemetry_sincerity(angle: f32) -> f32 {
    let lin = linear_sincerity(angle, TELEMETRY_TOLERANCE);
    lin * lin
}

/// Sincerity frozen at landing (60° band, linear)
#[inline]
pub fn final_sincerity(angle: f32) -> f32 {
    linear_sincerity(angle, LANDING_TOLERANCE)
}
