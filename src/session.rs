//! Simulation session
//!
//! Owns the live state, the fixed model, the seeded RNG stream and the
//! observers. One tick per host frame; observers see the snapshot after
//! every tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::SettingsError;
use crate::settings::Settings;
use crate::sim::{Model, SimulationState, Snapshot, TickEvent, TickInput, tick};
use crate::telemetry::{OscTelemetry, TickObserver};

pub struct Session {
    settings: Settings,
    model: Model,
    state: SimulationState,
    seed: u64,
    rng: Pcg32,
    observers: Vec<Box<dyn TickObserver>>,
    ticks: u64,
}

impl Session {
    /// Validate settings and start a fresh fall
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let model = Model::new(&settings);
        let state = SimulationState::new(&model.descent, &mut rng);

        log::info!(
            "Session started with seed {}: initial angle {:.1}°, fall {:.1}s",
            seed,
            state.current_angle,
            state.duration
        );

        Ok(Self {
            settings,
            model,
            state,
            seed,
            rng,
            observers: Vec::new(),
            ticks: 0,
        })
    }

    /// Register an observer for end-of-tick snapshots
    pub fn attach(&mut self, observer: Box<dyn TickObserver>) {
        self.observers.push(observer);
    }

    /// Attach OSC telemetry per settings. An unusable target disables
    /// telemetry for this session instead of failing it.
    pub fn attach_telemetry(&mut self) -> bool {
        if !self.settings.telemetry.enabled {
            log::info!("Telemetry disabled");
            return false;
        }
        match OscTelemetry::from_settings(&self.settings.telemetry) {
            Ok(sink) => {
                self.attach(Box::new(sink));
                true
            }
            Err(e) => {
                log::warn!("Telemetry unavailable, continuing without it: {}", e);
                false
            }
        }
    }

    /// Advance one frame
    pub fn step(&mut self, input: &TickInput, dt: f32) -> TickEvent {
        let event = tick(&mut self.state, &self.model, input, dt, &mut self.rng);
        self.ticks += 1;

        match event {
            TickEvent::Advanced => {
                log::debug!(
                    "{:.1}s left, angle {:.1}°",
                    self.state.remaining(),
                    self.state.current_angle
                );
            }
            TickEvent::Landed { final_sincerity } => {
                log::info!(
                    "Landed! Final angle {:.1}°, sincerity {:.1}%",
                    self.state.current_angle,
                    final_sincerity * 100.0
                );
            }
            TickEvent::Reset => {
                log::info!("Reset: new initial angle {:.1}°", self.state.current_angle);
            }
            TickEvent::Frozen => {}
        }

        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_tick(&snapshot, event);
        }
        event
    }

    /// Full re-initialization, continuing the RNG stream
    pub fn reset(&mut self) {
        let input = TickInput {
            reset: true,
            ..Default::default()
        };
        self.step(&input, 0.0);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks stepped since the session was created
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn landed(&self) -> bool {
        self.state.landed()
    }
}
