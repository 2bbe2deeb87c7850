//! Outbound telemetry
//!
//! Observers receive the end-of-tick snapshot and never feed back into the
//! simulation. Four float metrics go out once per falling tick:
//!
//! ```text
//! <prefix>/angle       - tilt normalized to [0, 1] (angle / 180)
//! <prefix>/sincerity   - telemetry sincerity (20 degree band)
//! <prefix>/stability   - per-tick smoothness
//! <prefix>/wind        - fall progress (elapsed / duration)
//! ```

pub mod osc;

pub use osc::OscTelemetry;

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::{Snapshot, TickEvent};

/// Anything that watches the simulation from the outside
pub trait TickObserver {
    /// Called once after every tick with the resulting snapshot
    fn on_tick(&mut self, snapshot: &Snapshot, event: TickEvent);
}

/// A shared observer stays readable by its owner after being attached
impl<T: TickObserver> TickObserver for Rc<RefCell<T>> {
    fn on_tick(&mut self, snapshot: &Snapshot, event: TickEvent) {
        self.borrow_mut().on_tick(snapshot, event);
    }
}

/// Metric identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Angle,
    Sincerity,
    Stability,
    Progress,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Angle,
        Metric::Sincerity,
        Metric::Stability,
        Metric::Progress,
    ];

    /// Address suffix the listener subscribes to
    pub fn suffix(&self) -> &'static str {
        match self {
            Metric::Angle => "angle",
            Metric::Sincerity => "sincerity",
            Metric::Stability => "stability",
            // Listener patches map progress onto the wind control
            Metric::Progress => "wind",
        }
    }

    pub fn address(&self, prefix: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), self.suffix())
    }
}

/// One tick's worth of metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFrame {
    pub angle: f32,
    pub sincerity: f32,
    pub stability: f32,
    pub progress: f32,
}

impl TelemetryFrame {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            angle: snapshot.normalized_angle(),
            sincerity: snapshot.telemetry_sincerity,
            stability: snapshot.stability,
            progress: snapshot.height_fraction,
        }
    }

    pub fn value(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Angle => self.angle,
            Metric::Sincerity => self.sincerity,
            Metric::Stability => self.stability,
            Metric::Progress => self.progress,
        }
    }
}

/// Whether a tick should be published (it started while falling)
#[inline]
pub fn publishes(event: TickEvent) -> bool {
    matches!(event, TickEvent::Advanced | TickEvent::Landed { .. })
}

/// Keeps every published frame in memory
#[derive(Debug, Default)]
pub struct Recorder {
    pub frames: Vec<TelemetryFrame>,
}

impl TickObserver for Recorder {
    fn on_tick(&mut self, snapshot: &Snapshot, event: TickEvent) {
        if publishes(event) {
            self.frames.push(TelemetryFrame::from_snapshot(snapshot));
        }
    }
}
