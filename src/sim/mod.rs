//! Deterministic simulation module
//!
//! All falling/steering logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, no clocks
//! - Injected, seedable RNG only
//! - No rendering, telemetry or platform dependencies

pub mod angle;
pub mod descent;
pub mod state;
pub mod tick;

pub use angle::{AngleProcess, display_sincerity, final_sincerity, stability, telemetry_sincerity};
pub use descent::{DescentProcess, DescentSample};
pub use state::{Phase, SimulationState, Snapshot};
pub use tick::{Model, TickEvent, TickInput, tick};
