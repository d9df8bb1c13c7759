//! Petri Virus - simulation core for a petri-dish arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, match lifecycle)
//! - `audio`: Sound cue hooks driven by simulation events
//! - `settings`: Match configuration
//! - `error`: Construction and configuration failures

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::MatchSettings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the per-tick step lengths were tuned for
    pub const SIM_HZ: f32 = 60.0;
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_RADIUS: f32 = 63.0;
    /// Projectiles live one unit past the containment wall
    pub const PROJECTILE_KILL_RADIUS: f32 = 64.0;

    /// Spawn layout
    pub const DEFAULT_CELLS: usize = 10;
    pub const DEFAULT_ANTIBODIES: usize = 5;
    pub const CELL_SPAWN_EXTENT: f32 = 10.0;
    pub const ANTIBODY_SPAWN_EXTENT: f32 = 15.0;
    pub const MIN_SPAWN_SEPARATION: f32 = 0.6;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 256;

    /// Autonomous movement (units per tick)
    pub const CELL_STEP: f32 = 0.1;
    pub const ANTIBODY_BASE_STEP: f32 = 0.1;
    pub const ANTIBODY_MIN_STEP: f32 = 0.1;
    pub const ANTIBODY_FRICTION: f32 = 0.002;
    pub const ANTIBODY_MASS: f32 = 5.0;

    /// Projectiles
    pub const PROJECTILE_STEP: f32 = 1.5;
    pub const PROJECTILE_MASS: f32 = 1.0;
    pub const PROJECTILE_HALF_WIDTH: f32 = 0.5;
    pub const PROJECTILE_DROP_COEFF: f32 = 25.0;
    pub const PROJECTILE_GROUND_EPSILON: f32 = 0.01;

    /// Player ("virus")
    pub const PLAYER_CONTACT_RADIUS: f32 = 1.25;
    pub const PLAYER_NORMAL_SPEED: f32 = 0.15;
    pub const PLAYER_EAT_SPEED: f32 = 0.3;
    pub const PLAYER_ACCEL: f32 = 0.01;
    pub const PLAYER_FRICTION: f32 = 0.01;
    /// Seconds of eat speed after consuming a cell
    pub const EAT_SPEED_WINDOW: f32 = 5.0;

    /// Jump arc: h(t) = k*t - g*t^2/2
    pub const JUMP_LAUNCH: f32 = 5.0;
    pub const GRAVITY: f32 = 9.8;

    /// Match timing (seconds)
    pub const MATCH_TIME_BUDGET: f32 = 60.0;
    pub const HAZARD_GRACE_PERIOD: f32 = 3.0;
    pub const TIMER_EPSILON: f32 = 0.01;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a travel angle measured from +x (cells, antibodies)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Forward unit vector for a facing heading (heading 0 faces +y)
#[inline]
pub fn forward_from_heading(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), heading.cos())
}

/// Right-hand unit vector for a facing heading
#[inline]
pub fn right_from_heading(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}
