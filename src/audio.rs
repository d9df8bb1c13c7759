//! Sound cue hooks
//!
//! The simulation never touches audio. The driver drains [`GameEvent`]s
//! after each tick and hands them to an [`AudioManager`], which turns them
//! into play/stop commands for whatever [`CueSink`] the platform provides.

use crate::sim::GameEvent;

/// Named sounds the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Title screen loop
    LobbyMusic,
    /// In-match loop
    MatchMusic,
    /// Projectile fired
    Blaster,
    /// Cell infected
    Infect,
    /// Infected cell eaten
    Gulp,
    /// Projectile bounced an antibody
    AntibodyThud,
    /// All cells infected
    Victory,
    /// Caught or out of time
    Defeat,
}

impl SoundCue {
    /// Asset name the platform layer resolves
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundCue::LobbyMusic => "minor_circuit",
            SoundCue::MatchMusic => "petri_groove",
            SoundCue::Blaster => "blaster",
            SoundCue::Infect => "infect",
            SoundCue::Gulp => "gulp",
            SoundCue::AntibodyThud => "thud",
            SoundCue::Victory => "victory",
            SoundCue::Defeat => "defeat",
        }
    }

    /// Music loops; everything else is a one-shot
    pub fn is_music(self) -> bool {
        matches!(self, SoundCue::LobbyMusic | SoundCue::MatchMusic)
    }

    /// Base gain before master/channel volume
    pub fn base_gain(self) -> f32 {
        match self {
            SoundCue::LobbyMusic | SoundCue::MatchMusic => 0.2,
            SoundCue::Blaster => 0.2,
            SoundCue::Victory | SoundCue::Defeat => 0.5,
            _ => 0.3,
        }
    }
}

/// A single instruction for the platform audio layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CueCommand {
    /// Start (or restart) a cue at the given gain
    Play { cue: SoundCue, gain: f32 },
    Stop(SoundCue),
}

/// Platform audio backend
pub trait CueSink {
    fn execute(&mut self, command: CueCommand);
}

/// Sink that only logs, for headless runs and tests
#[derive(Debug, Default)]
pub struct LogCueSink {
    pub history: Vec<CueCommand>,
}

impl CueSink for LogCueSink {
    fn execute(&mut self, command: CueCommand) {
        match command {
            CueCommand::Play { cue, gain } => {
                log::debug!("play {} (gain {:.2})", cue.asset_name(), gain)
            }
            CueCommand::Stop(cue) => log::debug!("stop {}", cue.asset_name()),
        }
        self.history.push(command);
    }
}

/// Cues an event asks for, in order, before volume is applied
pub fn cues_for(event: &GameEvent) -> Vec<(SoundCue, bool)> {
    // (cue, play) - false means stop
    match event {
        GameEvent::MatchStarted => vec![
            (SoundCue::LobbyMusic, false),
            (SoundCue::MatchMusic, true),
        ],
        GameEvent::ProjectileFired { .. } => vec![(SoundCue::Blaster, true)],
        GameEvent::CellInfected { .. } => vec![(SoundCue::Infect, true)],
        GameEvent::CellEaten { .. } => vec![(SoundCue::Gulp, true)],
        GameEvent::AntibodyStruck { .. } => vec![(SoundCue::AntibodyThud, true)],
        GameEvent::JumpStarted => Vec::new(),
        GameEvent::Won { .. } => vec![(SoundCue::MatchMusic, false), (SoundCue::Victory, true)],
        GameEvent::Lost { .. } => vec![(SoundCue::MatchMusic, false), (SoundCue::Defeat, true)],
    }
}

/// Applies volume settings and forwards cue commands to a sink
pub struct AudioManager<S: CueSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_gain(&self, cue: SoundCue) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        cue.base_gain() * self.master_volume * channel
    }

    /// Title screen is up
    pub fn enter_lobby(&mut self) {
        self.play(SoundCue::LobbyMusic);
    }

    /// Forward every cue for a batch of drained events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            for (cue, play) in cues_for(event) {
                if play {
                    self.play(cue);
                } else {
                    self.sink.execute(CueCommand::Stop(cue));
                }
            }
        }
    }

    fn play(&mut self, cue: SoundCue) {
        let gain = self.effective_gain(cue);
        // Stops still go through when muted so loops do not linger
        if gain <= 0.0 {
            return;
        }
        self.sink.execute(CueCommand::Play { cue, gain });
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
