//! Simulation state and the read-only snapshot handed to observers
//!
//! One live `SimulationState` per session. It is mutated only by
//! [`tick`](super::tick::tick) and replaced wholesale on reset.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::angle::{display_sincerity, telemetry_sincerity};
use super::descent::DescentProcess;
use crate::consts::*;

/// Current phase of the fall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Stick in the air, wind and steering active
    Falling,
    /// Stick has reached the burner; everything is frozen
    Landed { final_sincerity: f32 },
}

/// Complete live state (deterministic given the RNG stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Seconds since the fall started, clamped to the duration on landing
    pub elapsed: f32,
    /// Total fall time (copied from settings, never changes)
    pub duration: f32,
    /// Live tilt in degrees; 90 is vertical
    pub current_angle: f32,
    /// Wind attractor the tilt relaxes toward
    pub target_wind_angle: f32,
    /// Tilt at the end of the previous tick
    pub last_angle: f32,
    /// Smoothness of the most recent tick
    pub stability: f32,
    /// Virtual height, for the renderer
    pub height: f32,
    pub phase: Phase,
}

impl SimulationState {
    /// Fresh state with a random starting tilt in [60, 120]
    pub fn new<R: Rng>(descent: &DescentProcess, rng: &mut R) -> Self {
        let angle = rng.random_range(INITIAL_ANGLE_MIN..=INITIAL_ANGLE_MAX);
        Self::with_angle(descent, angle)
    }

    /// Fresh state with a chosen starting tilt
    pub fn with_angle(descent: &DescentProcess, angle: f32) -> Self {
        let angle = crate::clamp_angle(angle);
        Self {
            elapsed: 0.0,
            duration: descent.duration,
            current_angle: angle,
            target_wind_angle: angle,
            last_angle: angle,
            stability: 1.0,
            height: descent.start_height,
            phase: Phase::Falling,
        }
    }

    #[inline]
    pub fn landed(&self) -> bool {
        matches!(self.phase, Phase::Landed { .. })
    }

    /// Frozen landing score, if landed
    #[inline]
    pub fn final_sincerity(&self) -> Option<f32> {
        match self.phase {
            Phase::Landed { final_sincerity } => Some(final_sincerity),
            Phase::Falling => None,
        }
    }

    /// Fraction of the fall completed
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Read-only view for renderers and telemetry
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            height: self.height,
            height_fraction: self.progress(),
            angle: self.current_angle,
            stability: self.stability,
            display_sincerity: display_sincerity(self.current_angle),
            telemetry_sincerity: telemetry_sincerity(self.current_angle),
            elapsed: self.elapsed,
            remaining: self.remaining(),
            landed: self.landed(),
            final_sincerity: self.final_sincerity(),
        }
    }
}

/// End-of-tick view published to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub height: f32,
    pub height_fraction: f32,
    /// Tilt in degrees
    pub angle: f32,
    pub stability: f32,
    pub display_sincerity: f32,
    pub telemetry_sincerity: f32,
    pub elapsed: f32,
    pub remaining: f32,
    pub landed: bool,
    pub final_sincerity: Option<f32>,
}

impl Snapshot {
    /// Tilt normalized to [0, 1] (angle / 180)
    #[inline]
    pub fn normalized_angle(&self) -> f32 {
        self.angle / 180.0
    }
}
