//! Per-frame simulation tick
//!
//! Core game loop: movement, then collisions, then the lifecycle check, in
//! that order, once per frame.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionOutcome, resolve_collisions};
use super::movement;
use super::snapshot::Snapshot;
use super::state::{Direction, GameEvent, GamePhase, GameState, LossCause};
use crate::consts::TIMER_EPSILON;
use crate::normalize_angle;

/// Input intents for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement keys
    pub move_forward: bool,
    pub move_left: bool,
    pub move_back: bool,
    pub move_right: bool,
    /// Held jump key
    pub jump: bool,
    /// Fire one projectile (edge-triggered, cleared by the driver)
    pub fire: bool,
    /// Start the match (edge-triggered)
    pub start: bool,
    /// Heading change from pointer drag (radians this tick)
    pub heading_delta: f32,
}

impl TickInput {
    pub fn held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Forward => self.move_forward,
            Direction::Left => self.move_left,
            Direction::Back => self.move_back,
            Direction::Right => self.move_right,
        }
    }
}

/// Driver clock for one frame.
///
/// Movement steps are fixed per tick, so only `elapsed` feeds the
/// simulation. `dt` is carried for the driver's own bookkeeping and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds on the driver clock
    pub elapsed: f32,
    /// Seconds since the previous frame (informational)
    pub dt: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, dt: f32) -> Self {
        Self { elapsed, dt }
    }
}

/// Advance the game state by one frame and return what the renderer draws
pub fn tick(state: &mut GameState, input: &TickInput, time: FrameTime) -> Snapshot {
    match state.phase {
        GamePhase::Waiting => {
            if input.start {
                start_match(state, time.elapsed);
            }
        }
        GamePhase::Playing => {
            state.time_ticks += 1;
            advance_clock(state, time.elapsed);
            advance_entities(state, input);
            let outcome = resolve_collisions(state);
            check_lifecycle(state, &outcome);
        }
        GamePhase::Won | GamePhase::Lost => {}
    }

    Snapshot::capture(state)
}

/// Waiting -> Playing. Score and match clock restart from zero.
pub fn start_match(state: &mut GameState, driver_elapsed: f32) {
    if state.phase != GamePhase::Waiting {
        return;
    }
    state.phase = GamePhase::Playing;
    state.score = 0;
    state.started_at = Some(driver_elapsed);
    state.elapsed = 0.0;
    state.time_remaining = state.settings.time_budget;
    state.end_time_remaining = None;
    state.events.push(GameEvent::MatchStarted);
    log::info!("Match started ({}s on the clock)", state.settings.time_budget);
}

/// Match time never runs backwards, even if the driver clock does
fn advance_clock(state: &mut GameState, driver_elapsed: f32) {
    let since_start = driver_elapsed - state.started_at.unwrap_or(0.0);
    state.elapsed = since_start.max(state.elapsed);
    state.time_remaining = (state.settings.time_budget - state.elapsed).max(0.0);
}

fn advance_entities(state: &mut GameState, input: &TickInput) {
    let now = state.elapsed;

    let player = &mut state.player;
    player.heading = normalize_angle(player.heading + input.heading_delta);
    movement::update_player_velocity(player, input, now);
    movement::move_player(player);
    if movement::update_jump(player, input.jump, now) {
        state.events.push(GameEvent::JumpStarted);
    }

    if input.fire {
        let id = state.spawn_projectile();
        state.events.push(GameEvent::ProjectileFired { id });
    }

    movement::move_cells(&mut state.cells);
    movement::move_antibodies(&mut state.antibodies);
    movement::move_projectiles(&mut state.projectiles, now);
}

/// Playing -> Won | Lost.
///
/// Winning takes priority when the last infection and a loss condition land
/// on the same tick.
pub fn check_lifecycle(state: &mut GameState, outcome: &CollisionOutcome) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if state.all_cells_infected() {
        end_match(state, GamePhase::Won, None);
    } else if let Some(id) = outcome.lethal_contact {
        end_match(state, GamePhase::Lost, Some(LossCause::Antibody { id }));
    } else if state.time_remaining <= TIMER_EPSILON {
        end_match(state, GamePhase::Lost, Some(LossCause::TimerExpired));
    }
}

fn end_match(state: &mut GameState, phase: GamePhase, cause: Option<LossCause>) {
    // A long frame gap can push elapsed past the budget
    let time_remaining = (state.settings.time_budget - state.elapsed).max(0.0);
    state.phase = phase;
    state.end_time_remaining = Some(time_remaining);

    match cause {
        None => {
            log::info!(
                "Match won with {:.2}s left, score {}",
                time_remaining,
                state.score
            );
            state.events.push(GameEvent::Won { time_remaining });
        }
        Some(cause) => {
            log::info!("Match lost ({cause:?}) with {time_remaining:.2}s left");
            state.events.push(GameEvent::Lost {
                cause,
                time_remaining,
            });
        }
    }
}
