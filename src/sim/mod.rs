//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, and only while building the match
//! - Fixed per-tick order: movement, collisions, lifecycle
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod movement;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve_collisions};
pub use snapshot::Snapshot;
pub use state::{
    Antibody, Ballistic, Cell, Direction, GameEvent, GamePhase, GameState, LossCause, Player,
    Projectile, place_separated,
};
pub use tick::{FrameTime, TickInput, tick};
