//! Per-frame simulation tick
//!
//! Advances the state by one caller-supplied timestep. Order within a
//! falling tick is fixed: descent, wind gust, relaxation, steering,
//! stability. Scores are pure functions of the resulting angle.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::angle::{AngleProcess, final_sincerity, stability};
use super::descent::DescentProcess;
use super::state::{Phase, SimulationState};
use crate::consts::*;
use crate::settings::Settings;

/// Largest axis the autopilot will apply in one tick
pub const AUTOPILOT_MAX_AXIS: f32 = 4.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering held (mouse button / touch)
    pub steer_active: bool,
    /// Steering axis, typically [-1, 1] from pointer delta
    pub steer_axis: f32,
    /// Full re-initialization (one-shot)
    pub reset: bool,
    /// Demo mode - steer back to vertical every tick
    pub autopilot: bool,
}

impl TickInput {
    /// Steering input held at a fixed axis value
    pub fn steering(axis: f32) -> Self {
        Self {
            steer_active: true,
            steer_axis: axis,
            ..Default::default()
        }
    }

    /// Effective steering axis for this tick, if any.
    ///
    /// `reach` is how far (degrees) one unit of axis moves the stick this tick.
    fn axis_for(&self, angle: f32, reach: f32) -> Option<f32> {
        if self.autopilot {
            if reach <= 0.0 {
                return None;
            }
            // Cancels whatever the wind just did, up to a hard flick
            let axis = (ANGLE_CENTER - angle) / reach;
            Some(axis.clamp(-AUTOPILOT_MAX_AXIS, AUTOPILOT_MAX_AXIS))
        } else if self.steer_active {
            Some(self.steer_axis)
        } else {
            None
        }
    }
}

/// The fixed rules a session runs under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub descent: DescentProcess,
    pub angle: AngleProcess,
}

impl Model {
    pub fn new(settings: &Settings) -> Self {
        Self {
            descent: DescentProcess::new(&settings.fall),
            angle: AngleProcess::new(settings),
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickEvent {
    /// Falling state advanced
    Advanced,
    /// The fall completed on this tick
    Landed { final_sincerity: f32 },
    /// State was re-initialized
    Reset,
    /// Already landed; nothing changed
    Frozen,
}

/// Advance the simulation by `dt` seconds
pub fn tick<R: Rng>(
    state: &mut SimulationState,
    model: &Model,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
) -> TickEvent {
    debug_assert!(dt >= 0.0, "negative timestep");

    if input.reset {
        *state = SimulationState::new(&model.descent, rng);
        return TickEvent::Reset;
    }

    if state.landed() {
        return TickEvent::Frozen;
    }

    let sample = model.descent.advance(state.elapsed, dt);
    state.elapsed = sample.elapsed;
    state.height = sample.height;

    if sample.landed_now {
        // Scored on the angle the stick touched down with
        let final_sincerity = final_sincerity(state.current_angle);
        state.stability = stability(state.last_angle, state.current_angle);
        state.last_angle = state.current_angle;
        state.phase = Phase::Landed { final_sincerity };
        return TickEvent::Landed { final_sincerity };
    }

    // Wind
    state.target_wind_angle = model.angle.gust(
        state.target_wind_angle,
        sample.wind_ceiling_multiplier,
        dt,
        rng,
    );
    state.current_angle = model
        .angle
        .relax(state.current_angle, state.target_wind_angle, dt);

    // Steering
    let reach = model.angle.control_strength * dt;
    if let Some(axis) = input.axis_for(state.current_angle, reach) {
        state.current_angle = model.angle.steer(state.current_angle, axis, dt);
    }

    state.stability = stability(state.last_angle, state.current_angle);
    state.last_angle = state.current_angle;

    TickEvent::Advanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(settings: &Settings, seed: u64) -> (SimulationState, Model, Pcg32) {
        let model = Model::new(settings);
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = SimulationState::new(&model.descent, &mut rng);
        (state, model, rng)
    }

    #[test]
    fn test_tick_falls_then_lands() {
        let mut settings = Settings::default();
        settings.fall.duration = 1.0;
        let (mut state, model, mut rng) = setup(&settings, 12345);

        let input = TickInput::default();
        for _ in 0..9 {
            let event = tick(&mut state, &model, &input, 0.1, &mut rng);
            assert_eq!(event, TickEvent::Advanced);
        }
        // Float accumulation may need one extra tick
        let mut event = tick(&mut state, &model, &input, 0.1, &mut rng);
        if event == TickEvent::Advanced {
            event = tick(&mut state, &model, &input, 0.1, &mut rng);
        }
        assert!(matches!(event, TickEvent::Landed { .. }));
        assert!(state.landed());
        assert_eq!(state.elapsed, 1.0);
    }

    #[test]
    fn test_landed_state_is_frozen() {
        let mut settings = Settings::default();
        settings.fall.duration = 0.5;
        let (mut state, model, mut rng) = setup(&settings, 7);

        let event = tick(&mut state, &model, &TickInput::default(), 1.0, &mut rng);
        assert!(matches!(event, TickEvent::Landed { .. }));
        let frozen = state.clone();

        let input = TickInput::steering(1.0);
        for _ in 0..20 {
            let event = tick(&mut state, &model, &input, 0.1, &mut rng);
            assert_eq!(event, TickEvent::Frozen);
        }
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_final_sincerity_uses_touchdown_angle() {
        let settings = Settings::default();
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = SimulationState::with_angle(&model.descent, 105.0);

        let event = tick(&mut state, &model, &TickInput::steering(1.0), 60.0, &mut rng);
        match event {
            TickEvent::Landed { final_sincerity } => {
                assert!((final_sincerity - 0.75).abs() < 1e-6);
            }
            other => panic!("expected landing, got {other:?}"),
        }
        assert_eq!(state.current_angle, 105.0);
        assert_eq!(state.final_sincerity(), Some(final_sincerity(105.0)));
    }

    #[test]
    fn test_calm_session_keeps_initial_angle() {
        let settings = Settings::default().calm();
        let (mut state, model, mut rng) = setup(&settings, 99);
        let initial = state.current_angle;

        while !state.landed() {
            tick(&mut state, &model, &TickInput::default(), 1.0 / 60.0, &mut rng);
            assert_eq!(state.current_angle, initial);
            assert_eq!(state.stability, 1.0);
        }
        assert_eq!(state.final_sincerity(), Some(final_sincerity(initial)));
    }

    #[test]
    fn test_steering_pushes_angle() {
        let settings = Settings::default().calm();
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = SimulationState::with_angle(&model.descent, 90.0);

        tick(&mut state, &model, &TickInput::steering(1.0), 0.05, &mut rng);
        assert!((state.current_angle - 95.0).abs() < 1e-4);
        assert!((state.stability - 0.5).abs() < 1e-4);

        // Released: the axis is ignored and the tilt relaxes back toward
        // the wind attractor (factor 5 * 0.05 = 0.25 of the 5 degree gap)
        let released = TickInput {
            steer_active: false,
            steer_axis: 1.0,
            ..Default::default()
        };
        tick(&mut state, &model, &released, 0.05, &mut rng);
        assert_eq!(state.target_wind_angle, 90.0);
        assert!((state.current_angle - 93.75).abs() < 1e-4);
        assert!((state.stability - 0.875).abs() < 1e-4);
    }

    #[test]
    fn test_steering_never_escapes_clamp() {
        let settings = Settings::default();
        let (mut state, model, mut rng) = setup(&settings, 2024);
        let input = TickInput::steering(50.0);
        for _ in 0..600 {
            tick(&mut state, &model, &input, 1.0 / 60.0, &mut rng);
            assert!((ANGLE_MIN..=ANGLE_MAX).contains(&state.current_angle));
            assert!((ANGLE_MIN..=ANGLE_MAX).contains(&state.target_wind_angle));
        }
    }

    #[test]
    fn test_autopilot_steers_toward_center() {
        let settings = Settings::default().calm();
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = SimulationState::with_angle(&model.descent, 120.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &model, &input, 1.0 / 60.0, &mut rng);
        }
        // The attractor never moves, so the autopilot has to hold against it
        assert_eq!(state.target_wind_angle, 120.0);
        assert!((state.current_angle - ANGLE_CENTER).abs() < 1e-3);
        assert!(state.stability > 0.999);
    }

    #[test]
    fn test_autopilot_lands_vertical() {
        let mut settings = Settings::default().calm();
        settings.fall.duration = 2.0;
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = SimulationState::with_angle(&model.descent, 60.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        while !state.landed() {
            tick(&mut state, &model, &input, 1.0 / 60.0, &mut rng);
        }
        let score = state.final_sincerity().unwrap();
        assert!(score > 0.999, "final sincerity {score}");
    }

    #[test]
    fn test_autopilot_without_reach_does_nothing() {
        let mut settings = Settings::default().calm();
        settings.control.strength = 0.0;
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = SimulationState::with_angle(&model.descent, 110.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &model, &input, 1.0 / 60.0, &mut rng);
        assert_eq!(state.current_angle, 110.0);
    }

    #[test]
    fn test_landing_tick_refreshes_stability() {
        let mut settings = Settings::default().calm();
        settings.fall.duration = 1.0;
        let model = Model::new(&settings);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = SimulationState::with_angle(&model.descent, 90.0);

        // Hard swing to the clamp leaves no stability
        tick(&mut state, &model, &TickInput::steering(10.0), 0.5, &mut rng);
        assert_eq!(state.current_angle, ANGLE_MAX);
        assert_eq!(state.stability, 0.0);

        // Touchdown does not move the stick, so the tick is perfectly still
        let event = tick(&mut state, &model, &TickInput::default(), 0.5, &mut rng);
        assert_eq!(event, TickEvent::Landed { final_sincerity: 0.0 });
        assert_eq!(state.stability, 1.0);
        assert_eq!(state.last_angle, ANGLE_MAX);
        assert_eq!(state.snapshot().stability, 1.0);
    }

    #[test]
    fn test_reset_reinitializes() {
        let mut settings = Settings::default();
        settings.fall.duration = 0.2;
        let (mut state, model, mut rng) = setup(&settings, 31);
        tick(&mut state, &model, &TickInput::default(), 1.0, &mut rng);
        assert!(state.landed());

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        assert_eq!(
            tick(&mut state, &model, &reset, 0.1, &mut rng),
            TickEvent::Reset
        );
        assert!(!state.landed());
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.final_sincerity(), None);
        assert!((INITIAL_ANGLE_MIN..=INITIAL_ANGLE_MAX).contains(&state.current_angle));
    }

    #[test]
    fn test_determinism() {
        let settings = Settings::default();
        let (mut state1, model, mut rng1) = setup(&settings, 99999);
        let (mut state2, _, mut rng2) = setup(&settings, 99999);

        let inputs = [
            TickInput::default(),
            TickInput::steering(0.4),
            TickInput::steering(-0.7),
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, &model, input, 1.0 / 60.0, &mut rng1);
                tick(&mut state2, &model, input, 1.0 / 60.0, &mut rng2);
            }
        }

        assert_eq!(state1, state2);
    }
}
