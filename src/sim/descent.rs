//! Descent: elapsed time to virtual height and wind envelope
//!
//! The stick drops linearly from `start_height` to `target_height` over the
//! fall duration. Wind weakens as it nears the burner, bottoming out at half
//! of nominal strength on contact.

use serde::{Deserialize, Serialize};

use crate::consts::WIND_DECAY_SHARE;
use crate::lerp_clamped;
use crate::settings::FallSettings;

/// Result of advancing the descent by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentSample {
    /// Elapsed time after this tick (clamped to the duration)
    pub elapsed: f32,
    /// `elapsed / duration` in [0, 1]
    pub height_fraction: f32,
    /// Interpolated height, for the renderer only
    pub height: f32,
    /// Scale applied to the nominal wind ceiling
    pub wind_ceiling_multiplier: f32,
    /// True on the tick the fall completes
    pub landed_now: bool,
}

/// Maps elapsed time to height and wind envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescentProcess {
    pub start_height: f32,
    pub target_height: f32,
    pub duration: f32,
}

impl DescentProcess {
    pub fn new(settings: &FallSettings) -> Self {
        Self {
            start_height: settings.start_height,
            target_height: settings.target_height,
            duration: settings.duration,
        }
    }

    /// Fraction of the fall completed at `elapsed`
    #[inline]
    pub fn height_fraction(&self, elapsed: f32) -> f32 {
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Virtual height at a given fraction
    #[inline]
    pub fn height_at(&self, fraction: f32) -> f32 {
        lerp_clamped(self.start_height, self.target_height, fraction)
    }

    /// Wind ceiling multiplier at a given fraction (1.0 at the top, 0.5 at the bottom)
    #[inline]
    pub fn wind_ceiling_multiplier(fraction: f32) -> f32 {
        1.0 - fraction * WIND_DECAY_SHARE
    }

    /// Advance the descent by `dt`.
    ///
    /// Only called while falling: the caller's phase machine makes
    /// `landed_now` a one-shot edge. `dt` must be non-negative.
    pub fn advance(&self, elapsed: f32, dt: f32) -> DescentSample {
        let next = elapsed + dt;
        let landed_now = next >= self.duration;
        let elapsed = next.min(self.duration);
        let height_fraction = self.height_fraction(elapsed);

        DescentSample {
            elapsed,
            height_fraction,
            height: self.height_at(height_fraction),
            wind_ceiling_multiplier: Self::wind_ceiling_multiplier(height_fraction),
            landed_now,
        }
    }
}
