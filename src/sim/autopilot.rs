//! Demo mode - the simulation plays itself
//!
//! Produces the same intents a human would, so attract screens and the
//! headless driver exercise the real tick.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::{CELL_STEP, PROJECTILE_STEP};
use crate::{direction_from_angle, normalize_angle};

/// Max heading change per tick (radians)
const MAX_TURN: f32 = 0.12;
/// Heading error under which a shot is taken
const AIM_TOLERANCE: f32 = 0.05;
/// Stop closing in on an uninfected cell inside this range and shoot instead
const STANDOFF_DISTANCE: f32 = 6.0;
/// Hop over antibodies that get this close
const DANGER_RADIUS: f32 = 3.0;

/// Heading that faces from `from` toward `to` (heading 0 faces +y)
pub fn heading_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.x).atan2(d.y)
}

/// Pick intents for this tick
pub fn drive(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Waiting => {
            return TickInput {
                start: true,
                ..Default::default()
            };
        }
        GamePhase::Won | GamePhase::Lost => return TickInput::default(),
        GamePhase::Playing => {}
    }

    let player = &state.player;
    let mut input = TickInput::default();

    // Eat what is ready before tagging more
    let nearest = |want_edible: bool| {
        state
            .cells
            .iter()
            .filter(|c| if want_edible { c.is_edible() } else { !c.infected })
            .min_by(|a, b| {
                a.pos
                    .distance(player.pos)
                    .partial_cmp(&b.pos.distance(player.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    };

    if let Some(cell) = nearest(true) {
        input.heading_delta = turn_toward(player.heading, heading_toward(player.pos, cell.pos));
        input.move_forward = true;
    } else if let Some(cell) = nearest(false) {
        // Lead the target by its drift over the projectile's flight time
        let flight_ticks = cell.pos.distance(player.pos) / PROJECTILE_STEP;
        let aim = cell.pos + direction_from_angle(cell.heading) * CELL_STEP * flight_ticks;
        let error = normalize_angle(heading_toward(player.pos, aim) - player.heading);
        input.heading_delta = error.clamp(-MAX_TURN, MAX_TURN);
        input.move_forward = cell.pos.distance(player.pos) > STANDOFF_DISTANCE;
        input.fire = error.abs() < AIM_TOLERANCE && state.projectiles.is_empty();
    }

    input.jump = !player.is_airborne()
        && state
            .antibodies
            .iter()
            .any(|a| a.pos.distance(player.pos) < DANGER_RADIUS);

    input
}

fn turn_toward(heading: f32, target: f32) -> f32 {
    normalize_angle(target - heading).clamp(-MAX_TURN, MAX_TURN)
}
