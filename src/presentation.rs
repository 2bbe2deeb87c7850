//! Presentation cues
//!
//! Pure functions over a [`Snapshot`] for whatever renders the stick: pivot
//! transform, glow, smoke density, feedback tiers and timer urgency. Nothing
//! here feeds back into the simulation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{ANGLE_CENTER, DISPLAY_TOLERANCE};
use crate::lerp_clamped;
use crate::sim::Snapshot;
use crate::sim::angle::linear_sincerity;

/// Peak glow intensity
pub const MAX_GLOW: f32 = 5.0;
/// Smoke emission (particles/s) for a perfectly still and a wildly swinging stick
pub const SMOKE_CALM: f32 = 5.0;
pub const SMOKE_AGITATED: f32 = 50.0;

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const YELLOW: Vec3 = Vec3::new(1.0, 0.92, 0.016);

/// Where the stick's pivot sits and how it is tilted
pub fn pivot_transform(snapshot: &Snapshot) -> (Vec3, Quat) {
    let position = Vec3::new(0.0, snapshot.height, 0.0);
    let rotation = Quat::from_rotation_z((snapshot.angle - ANGLE_CENTER).to_radians());
    (position, rotation)
}

/// Glow color (red to yellow) and intensity.
///
/// `time` only drives the post-landing flicker.
pub fn glow(snapshot: &Snapshot, time: f32) -> (Vec3, f32) {
    let color = RED.lerp(YELLOW, snapshot.display_sincerity.clamp(0.0, 1.0));
    match snapshot.final_sincerity {
        Some(final_sincerity) => {
            let flicker = 0.8 + (time * 3.0).sin() * 0.2;
            (color, MAX_GLOW * final_sincerity * flicker)
        }
        None => (
            color,
            lerp_clamped(1.0, MAX_GLOW, snapshot.display_sincerity),
        ),
    }
}

/// Smoke emission rate; shakier sticks smoke more
pub fn smoke_rate(snapshot: &Snapshot) -> f32 {
    lerp_clamped(SMOKE_CALM, SMOKE_AGITATED, 1.0 - snapshot.stability)
}

/// Live feedback tier from display sincerity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Perfect,
    Good,
    Fair,
    Weak,
    Crooked,
}

impl Tier {
    pub fn from_sincerity(sincerity: f32) -> Self {
        if sincerity >= 0.95 {
            Tier::Perfect
        } else if sincerity >= 0.75 {
            Tier::Good
        } else if sincerity >= 0.60 {
            Tier::Fair
        } else if sincerity >= 0.40 {
            Tier::Weak
        } else {
            Tier::Crooked
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Perfect => "Perfect! Utmost sincerity!",
            Tier::Good => "Not bad, quite devout",
            Tier::Fair => "Average, could be better",
            Tier::Weak => "Lacking sincerity... keep trying",
            Tier::Crooked => "Far too crooked! Reflect on it",
        }
    }

    /// Message color (RGB)
    pub fn color(&self) -> Vec3 {
        match self {
            Tier::Perfect => Vec3::new(0.2, 1.0, 0.2),
            Tier::Good => Vec3::new(0.5, 1.0, 0.5),
            Tier::Fair => Vec3::new(1.0, 1.0, 0.3),
            Tier::Weak => Vec3::new(1.0, 0.6, 0.2),
            Tier::Crooked => Vec3::new(1.0, 0.2, 0.2),
        }
    }
}

/// Countdown styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

impl Urgency {
    pub fn from_remaining(remaining: f32) -> Self {
        if remaining <= 5.0 {
            Urgency::Critical
        } else if remaining <= 10.0 {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }
}

/// Result-screen verdict after landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Perfect,
    Good { percent: u32 },
    Regret { percent: u32 },
}

impl Verdict {
    /// Graded on a linear 30 degree band, independent of the frozen final score
    pub fn from_angle(angle: f32) -> Self {
        let score = linear_sincerity(angle, DISPLAY_TOLERANCE);
        let percent = (score * 100.0).round() as u32;
        if score >= 0.95 {
            Verdict::Perfect
        } else if score >= 0.75 {
            Verdict::Good { percent }
        } else {
            Verdict::Regret { percent }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Verdict::Perfect => "Perfect placement! Utmost sincerity!".to_string(),
            Verdict::Good { percent } => format!("Well done! Sincerity: {}%", percent),
            Verdict::Regret { percent } => format!("Pity! Sincerity: {}%", percent),
        }
    }
}

/// Everything a HUD needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub angle_text: String,
    pub timer_text: String,
    pub message: String,
    pub urgency: Option<Urgency>,
}

impl Hud {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        if snapshot.landed {
            let verdict = Verdict::from_angle(snapshot.angle);
            Self {
                angle_text: format!("Final angle: {:.0}°", snapshot.angle),
                timer_text: "Time's up!".to_string(),
                message: verdict.message(),
                urgency: None,
            }
        } else {
            let tier = Tier::from_sincerity(snapshot.display_sincerity);
            Self {
                angle_text: format!("Angle: {:.0}°", snapshot.angle),
                timer_text: format!("{:.1}s left", snapshot.remaining),
                message: tier.message().to_string(),
                urgency: Some(Urgency::from_remaining(snapshot.remaining)),
            }
        }
    }
}
