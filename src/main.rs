//! Petri Virus headless driver
//!
//! Runs matches without a renderer: the autopilot supplies input, a fixed
//! timestep accumulator drives the simulation, audio cues go to the log.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use petri_virus::MatchSettings;
    use petri_virus::audio::{AudioManager, LogCueSink};
    use petri_virus::consts::*;
    use petri_virus::sim::{FrameTime, GamePhase, GameState, Snapshot, autopilot, tick};

    #[derive(Parser, Debug)]
    #[command(name = "petri-virus")]
    #[command(about = "Run a headless Petri Virus match driven by the autopilot")]
    struct Cli {
        /// JSON match settings (missing fields use defaults)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Override the settings seed
        #[arg(long)]
        seed: Option<u64>,
        /// Render frames to simulate before giving up
        #[arg(long, default_value_t = 10_800)]
        frames: u32,
        /// Simulated display refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Music volume (0.0 - 1.0)
        #[arg(long, default_value_t = 0.7)]
        music_volume: f32,
        /// Sound effect volume (0.0 - 1.0)
        #[arg(long, default_value_t = 1.0)]
        sfx_volume: f32,
        /// Silence every cue
        #[arg(long)]
        mute: bool,
    }

    /// Fixed timestep driver, fed by variable-length display frames
    struct Game {
        state: GameState,
        audio: AudioManager<LogCueSink>,
        accumulator: f32,
        clock: f32,
        last_phase: GamePhase,
        last_snapshot: Snapshot,
    }

    impl Game {
        fn new(state: GameState, cli: &Cli) -> Self {
            let mut audio = AudioManager::new(LogCueSink::default());
            audio.set_music_volume(cli.music_volume);
            audio.set_sfx_volume(cli.sfx_volume);
            audio.set_muted(cli.mute);
            audio.enter_lobby();
            let last_snapshot = Snapshot::capture(&state);
            Self {
                last_phase: state.phase,
                state,
                audio,
                accumulator: 0.0,
                clock: 0.0,
                last_snapshot,
            }
        }

        /// Run simulation ticks for one display frame
        fn update(&mut self, frame_dt: f32) {
            let frame_dt = frame_dt.min(0.1);
            self.accumulator += frame_dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // Fresh intents every substep so fire/start stay one-shot
                let input = autopilot::drive(&self.state);
                self.clock += SIM_DT;
                let time = FrameTime::new(self.clock, SIM_DT);
                self.last_snapshot = tick(&mut self.state, &input, time);
                log::trace!("tick at {:.3}s (+{:.4}s)", time.elapsed, time.dt);
                self.accumulator -= SIM_DT;
                substeps += 1;

                let events = self.state.drain_events();
                self.audio.handle_events(&events);
            }

            if self.state.phase != self.last_phase {
                log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
                self.last_phase = self.state.phase;
            }
        }
    }

    pub fn run() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let cli = Cli::parse();
        let mut settings = MatchSettings::load_or_default(cli.settings.as_deref());
        if let Some(seed) = cli.seed {
            settings.seed = seed;
        }

        let state = match GameState::new(settings) {
            Ok(state) => state,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        };

        let frame_dt = 1.0 / cli.fps.max(1.0);
        let mut game = Game::new(state, &cli);
        for _ in 0..cli.frames {
            game.update(frame_dt);
            if game.state.phase.is_terminal() {
                break;
            }
        }

        let snapshot = &game.last_snapshot;
        log::info!(
            "Finished: {:?}, score {}, {} cells left, {:.2}s on the clock",
            snapshot.phase,
            snapshot.score,
            snapshot.cells_remaining,
            snapshot.end_time_remaining.unwrap_or(snapshot.time_remaining)
        );

        if cli.json {
            match snapshot.to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    log::error!("failed to serialize snapshot: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }

        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
