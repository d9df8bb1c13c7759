//! Read-only view of the match for the renderer and HUD

use serde::Serialize;

use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub heading: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub infected: bool,
    pub eaten: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AntibodyView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub heading: f32,
}

/// Everything a frame needs to draw, copied out after the tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: PlayerPose,
    pub cells: Vec<CellView>,
    pub antibodies: Vec<AntibodyView>,
    pub projectiles: Vec<ProjectileView>,
    pub score: u32,
    pub time_remaining: f32,
    /// Cells not yet eaten
    pub cells_remaining: usize,
    /// Clock reading when the match ended, for the end screen
    pub end_time_remaining: Option<f32>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            player: PlayerPose {
                x: player.pos.x,
                y: player.pos.y,
                z: player.z,
                heading: player.heading,
            },
            cells: state
                .cells
                .iter()
                .map(|c| CellView {
                    id: c.id,
                    x: c.pos.x,
                    y: c.pos.y,
                    heading: c.heading,
                    infected: c.infected,
                    eaten: c.eaten,
                })
                .collect(),
            antibodies: state
                .antibodies
                .iter()
                .map(|a| AntibodyView {
                    id: a.id,
                    x: a.pos.x,
                    y: a.pos.y,
                    heading: a.heading,
                    speed: a.speed,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    x: p.pos.x,
                    y: p.pos.y,
                    z: p.z,
                    heading: p.heading,
                })
                .collect(),
            score: state.score,
            time_remaining: state.time_remaining,
            cells_remaining: state.cells_remaining(),
            end_time_remaining: state.end_time_remaining,
        }
    }

    /// Serialize for external tooling
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
