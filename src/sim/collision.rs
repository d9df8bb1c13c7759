//! Collision detection and response
//!
//! Projectiles use an axis-aligned box against cell and antibody centers;
//! the player uses a plain distance test. Resolution is idempotent: running
//! it again on an unchanged state changes nothing.

use glam::Vec2;

use super::arena::beyond_kill_radius;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// What the tick needs to know after collisions are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Antibody that touched a grounded player after the grace period
    pub lethal_contact: Option<u32>,
}

/// Box overlap test with [`PROJECTILE_HALF_WIDTH`] (edges inclusive)
#[inline]
pub fn box_overlap(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() <= PROJECTILE_HALF_WIDTH && (a.y - b.y).abs() <= PROJECTILE_HALF_WIDTH
}

/// Distance test against the player's contact radius (edge inclusive)
#[inline]
pub fn player_contact(player: Vec2, other: Vec2) -> bool {
    player.distance(other) <= PLAYER_CONTACT_RADIUS
}

/// Run every collision pass against the current positions
pub fn resolve_collisions(state: &mut GameState) -> CollisionOutcome {
    resolve_projectiles(state);
    resolve_player_cells(state);
    CollisionOutcome {
        lethal_contact: player_antibody_contact(state),
    }
}

/// Projectile hits and despawns.
///
/// Each projectile is tested against antibodies first, then cells, so it can
/// claim at most one target. Only grounded projectiles hit anything; a
/// projectile still dropping from a jump flies over. Removal goes through a
/// single `retain`, keeping every per-projectile field together.
pub fn resolve_projectiles(state: &mut GameState) {
    let GameState {
        projectiles,
        cells,
        antibodies,
        score,
        events,
        ..
    } = state;

    projectiles.retain(|projectile| {
        if projectile.is_grounded() {
            if let Some(antibody) = antibodies
                .iter_mut()
                .find(|a| box_overlap(projectile.pos, a.pos))
            {
                antibody.absorb_impact(PROJECTILE_MASS, PROJECTILE_STEP);
                log::debug!("Antibody {} struck, speed {:.3}", antibody.id, antibody.speed);
                events.push(GameEvent::AntibodyStruck {
                    id: antibody.id,
                    speed: antibody.speed,
                });
                return false;
            }

            if let Some(cell) = cells
                .iter_mut()
                .find(|c| !c.eaten && box_overlap(projectile.pos, c.pos))
            {
                if !cell.infected {
                    cell.infected = true;
                    *score += 1;
                    log::debug!("Cell {} infected, score {}", cell.id, score);
                    events.push(GameEvent::CellInfected { id: cell.id });
                }
                return false;
            }
        }

        !beyond_kill_radius(projectile.pos)
    });

    debug_assert!(
        projectiles.iter().all(|p| !beyond_kill_radius(p.pos)),
        "projectile left alive past the kill radius"
    );
}

/// Eat infected cells the player touches
pub fn resolve_player_cells(state: &mut GameState) {
    let now = state.elapsed;
    let player_pos = state.player.pos;
    for cell in state
        .cells
        .iter_mut()
        .filter(|c| c.is_edible() && player_contact(player_pos, c.pos))
    {
        cell.eaten = true;
        state.player.last_ate = Some(now);
        log::debug!("Cell {} eaten at {:.2}s", cell.id, now);
        state.events.push(GameEvent::CellEaten { id: cell.id });
    }
}

/// First antibody touching the player, if that contact is lethal.
///
/// Contact is harmless while the player is airborne or during the grace
/// period after the start.
pub fn player_antibody_contact(state: &GameState) -> Option<u32> {
    if state.player.is_airborne() || state.elapsed <= state.settings.grace_period {
        return None;
    }
    state
        .antibodies
        .iter()
        .find(|a| player_contact(state.player.pos, a.pos))
        .map(|a| a.id)
}
