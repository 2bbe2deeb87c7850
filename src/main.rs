//! Incense Sim entry point
//!
//! Runs one fall to landing, headless at a fixed timestep or paced in real
//! time, publishing OSC telemetry as it goes.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use incense_sim::consts::FRAME_DT;
use incense_sim::presentation::{Hud, Verdict};
use incense_sim::sim::TickInput;
use incense_sim::{Session, Settings};

/// Wind-buffeted falling incense stick
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fall duration in seconds
    #[arg(short, long)]
    duration: Option<f32>,

    /// OSC telemetry target (host:port)
    #[arg(long)]
    osc: Option<String>,

    /// Do not send telemetry
    #[arg(long)]
    no_telemetry: bool,

    /// Pace ticks with the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Ticks per second (default 60)
    #[arg(long)]
    fps: Option<u32>,

    /// Let the demo player steer toward vertical
    #[arg(long)]
    autopilot: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings, incense_sim::SettingsError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(duration) = self.duration {
            settings.fall.duration = duration;
        }
        if let Some(target) = &self.osc {
            match target.rsplit_once(':').map(|(h, p)| (h, p.parse::<u16>())) {
                Some((host, Ok(port))) => {
                    settings.telemetry.host = host.to_string();
                    settings.telemetry.port = port;
                }
                _ => log::warn!("Ignoring malformed --osc target {:?}", target),
            }
        }
        if self.no_telemetry {
            settings.telemetry.enabled = false;
        }
        Ok(settings)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::new(settings) {
        Ok(session) => session,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    session.attach_telemetry();

    let input = TickInput {
        autopilot: args.autopilot,
        ..Default::default()
    };
    let fixed_dt = args
        .fps
        .map(|fps| 1.0 / fps.max(1) as f32)
        .unwrap_or(FRAME_DT);
    let frame = Duration::from_secs_f32(fixed_dt);

    let mut last = Instant::now();
    while !session.landed() {
        let dt = if args.realtime {
            std::thread::sleep(frame.saturating_sub(last.elapsed()));
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32().min(0.1);
            last = now;
            dt
        } else {
            fixed_dt
        };
        session.step(&input, dt);
    }

    let snapshot = session.snapshot();
    let hud = Hud::from_snapshot(&snapshot);
    println!("seed: {}", session.seed());
    println!("{}", hud.angle_text);
    if let Some(final_sincerity) = snapshot.final_sincerity {
        println!("Final sincerity: {:.1}%", final_sincerity * 100.0);
    }
    println!("{}", Verdict::from_angle(snapshot.angle).message());

    ExitCode::SUCCESS
}
