//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`], which is owned by the
//! frame driver and passed into [`super::tick`] by exclusive reference.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError, SpawnKind};
use crate::settings::MatchSettings;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Waiting,
    /// Active gameplay
    Playing,
    /// Every cell infected
    Won,
    /// Timer ran out or an antibody caught the virus
    Lost,
}

impl GamePhase {
    /// Won and Lost end the match
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Why a match was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    TimerExpired,
    Antibody { id: u32 },
}

/// Things that happened during a tick, drained by the driver for audio/HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    MatchStarted,
    ProjectileFired { id: u32 },
    JumpStarted,
    CellInfected { id: u32 },
    CellEaten { id: u32 },
    AntibodyStruck { id: u32, speed: f32 },
    Won { time_remaining: f32 },
    Lost { cause: LossCause, time_remaining: f32 },
}

/// Player movement directions, relative to heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward = 0,
    Left = 1,
    Back = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Left,
        Direction::Back,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Back,
            Direction::Back => Direction::Forward,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit displacement for this direction at the given heading
    pub fn unit(self, heading: f32) -> Vec2 {
        let forward = crate::forward_from_heading(heading);
        let right = crate::right_from_heading(heading);
        match self {
            Direction::Forward => forward,
            Direction::Back => -forward,
            Direction::Right => right,
            Direction::Left => -right,
        }
    }
}

/// Speed along one direction, ramped and bled independently
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionalVelocity {
    pub speed: f32,
    /// Set while accelerating, cleared once friction brings speed to zero
    pub active: bool,
}

impl DirectionalVelocity {
    /// Accelerate toward `max`, landing on it exactly once within rounding
    /// distance so the cap is reached on the expected tick
    pub fn ramp(&mut self, accel: f32, max: f32) {
        self.active = true;
        let next = self.speed + accel;
        self.speed = if max - next <= accel * 1e-3 {
            max
        } else {
            next.max(0.0)
        };
    }

    /// Bleed speed toward zero
    pub fn decay(&mut self, friction: f32) {
        self.speed = (self.speed - friction).max(0.0);
        if self.speed == 0.0 {
            self.active = false;
        }
    }
}

/// In-progress jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    /// Match time the jump began
    pub started_at: f32,
    /// Arc height reached at the previous tick
    pub last_height: f32,
}

/// The player's virus
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Rendered vertical offset
    pub z: f32,
    /// Height above the dish floor; gates hazard immunity and projectile drop
    pub actual_z: f32,
    /// Facing angle (radians, 0 faces +y)
    pub heading: f32,
    /// Indexed by [`Direction`]
    pub velocity: [DirectionalVelocity; 4],
    pub jump: Option<Jump>,
    /// Match time of the last cell eaten
    pub last_ate: Option<f32>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            z: 0.0,
            actual_z: 0.0,
            heading: 0.0,
            velocity: [DirectionalVelocity::default(); 4],
            jump: None,
            last_ate: None,
        }
    }
}

impl Player {
    pub fn velocity(&self, dir: Direction) -> &DirectionalVelocity {
        &self.velocity[dir as usize]
    }

    pub fn velocity_mut(&mut self, dir: Direction) -> &mut DirectionalVelocity {
        &mut self.velocity[dir as usize]
    }

    /// Off the dish floor (immune to antibodies)
    pub fn is_airborne(&self) -> bool {
        self.actual_z > 0.0
    }

    /// Speed cap, raised for a while after eating
    pub fn max_speed(&self, now: f32) -> f32 {
        match self.last_ate {
            Some(t) if now - t < EAT_SPEED_WINDOW => PLAYER_EAT_SPEED,
            _ => PLAYER_NORMAL_SPEED,
        }
    }
}

/// A target cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: u32,
    pub pos: Vec2,
    /// Travel angle (radians from +x)
    pub heading: f32,
    pub infected: bool,
    /// Only ever set after `infected`
    pub eaten: bool,
}

impl Cell {
    /// Infected and waiting to be eaten
    pub fn is_edible(&self) -> bool {
        self.infected && !self.eaten
    }
}

/// A roaming hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Antibody {
    pub id: u32,
    pub pos: Vec2,
    pub heading: f32,
    /// Step length per tick
    pub speed: f32,
}

impl Antibody {
    /// Inelastic push from a projectile impact
    pub fn absorb_impact(&mut self, projectile_mass: f32, projectile_speed: f32) {
        self.speed =
            (ANTIBODY_MASS * self.speed + projectile_mass * projectile_speed) / ANTIBODY_MASS;
    }

    /// Friction toward the minimum cruising speed
    pub fn apply_friction(&mut self) {
        self.speed = (self.speed - ANTIBODY_FRICTION).max(ANTIBODY_MIN_STEP);
    }
}

/// Drop state for a projectile fired mid-jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistic {
    /// Zeroed once the projectile reaches the floor
    pub drop_coeff: f32,
    pub spawned_at: f32,
    pub spawn_z: f32,
}

/// A fired projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Height above the floor
    pub z: f32,
    /// Facing heading at fire time; fixed for the projectile's life
    pub heading: f32,
    pub ballistic: Option<Ballistic>,
}

impl Projectile {
    /// At floor level, where it can hit things
    pub fn is_grounded(&self) -> bool {
        self.z <= PROJECTILE_GROUND_EPSILON
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: MatchSettings,
    pub phase: GamePhase,
    /// One point per cell infected
    pub score: u32,
    /// Seconds since the start input
    pub elapsed: f32,
    /// Driver clock reading when the match started
    pub started_at: Option<f32>,
    /// Countdown, frozen outside Playing
    pub time_remaining: f32,
    /// Time left on the clock when the match ended
    pub end_time_remaining: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Sorted by id
    pub cells: Vec<Cell>,
    /// Sorted by id
    pub antibodies: Vec<Antibody>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    /// Events since the driver last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build a fresh match in the Waiting phase
    pub fn new(settings: MatchSettings) -> Result<Self> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let mut state = Self {
            phase: GamePhase::Waiting,
            score: 0,
            elapsed: 0.0,
            started_at: None,
            time_remaining: settings.time_budget,
            end_time_remaining: None,
            time_ticks: 0,
            player: Player::default(),
            cells: Vec::with_capacity(settings.num_cells),
            antibodies: Vec::with_capacity(settings.num_antibodies),
            projectiles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            settings,
        };

        state.spawn_cells(&mut rng)?;
        state.spawn_antibodies(&mut rng)?;

        log::info!(
            "Match ready: seed={}, cells={}, antibodies={}, budget={}s",
            state.settings.seed,
            state.cells.len(),
            state.antibodies.len(),
            state.settings.time_budget
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_cells(&mut self, rng: &mut Pcg32) -> Result<()> {
        let count = self.settings.num_cells;
        let mut placed = Vec::with_capacity(count);
        for index in 0..count {
            let positive = index < count / 2;
            let pos = place_separated(&placed, || {
                quadrant_point(rng, CELL_SPAWN_EXTENT, positive)
            })
            .ok_or(SimError::PlacementExhausted {
                kind: SpawnKind::Cell,
                index,
                attempts: MAX_PLACEMENT_ATTEMPTS,
            })?;
            placed.push(pos);
            let heading = rng.random_range(0.0..std::f32::consts::TAU);
            let id = self.next_entity_id();
            self.cells.push(Cell {
                id,
                pos,
                heading,
                infected: false,
                eaten: false,
            });
        }
        Ok(())
    }

    fn spawn_antibodies(&mut self, rng: &mut Pcg32) -> Result<()> {
        let count = self.settings.num_antibodies;
        let mut placed = Vec::with_capacity(count);
        for index in 0..count {
            let positive = index < count / 2;
            let pos = place_separated(&placed, || {
                quadrant_point(rng, ANTIBODY_SPAWN_EXTENT, positive)
            })
            .ok_or(SimError::PlacementExhausted {
                kind: SpawnKind::Antibody,
                index,
                attempts: MAX_PLACEMENT_ATTEMPTS,
            })?;
            placed.push(pos);
            let heading = rng.random_range(0.0..std::f32::consts::TAU);
            let id = self.next_entity_id();
            self.antibodies.push(Antibody {
                id,
                pos,
                heading,
                speed: ANTIBODY_BASE_STEP,
            });
        }
        Ok(())
    }

    /// Spawn a projectile from the player's current pose
    pub fn spawn_projectile(&mut self) -> u32 {
        let id = self.next_entity_id();
        let ballistic = self.player.is_airborne().then(|| Ballistic {
            drop_coeff: PROJECTILE_DROP_COEFF,
            spawned_at: self.elapsed,
            spawn_z: self.player.actual_z,
        });
        self.projectiles.push(Projectile {
            id,
            pos: self.player.pos,
            z: ballistic.map_or(0.0, |b| b.spawn_z),
            heading: self.player.heading,
            ballistic,
        });
        id
    }

    /// Cells not yet eaten
    pub fn cells_remaining(&self) -> usize {
        self.cells.iter().filter(|c| !c.eaten).count()
    }

    /// Win rule: every cell carries the infection
    pub fn all_cells_infected(&self) -> bool {
        self.cells.iter().all(|c| c.infected)
    }

    /// Take the events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Roll candidates until one keeps [`MIN_SPAWN_SEPARATION`] from every
/// already placed point, giving up after [`MAX_PLACEMENT_ATTEMPTS`].
pub fn place_separated<F>(placed: &[Vec2], mut roll: F) -> Option<Vec2>
where
    F: FnMut() -> Vec2,
{
    (0..MAX_PLACEMENT_ATTEMPTS)
        .map(|_| roll())
        .find(|candidate| {
            placed
                .iter()
                .all(|p| p.distance(*candidate) >= MIN_SPAWN_SEPARATION)
        })
}

/// Random point in the positive or negative quadrant of a square
fn quadrant_point(rng: &mut Pcg32, extent: f32, positive: bool) -> Vec2 {
    let sign = if positive { 1.0 } else { -1.0 };
    Vec2::new(
        sign * extent * rng.random::<f32>(),
        sign * extent * rng.random::<f32>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_layout() {
        let state = GameState::new(MatchSettings::with_seed(42)).unwrap();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.cells.len(), DEFAULT_CELLS);
        assert_eq!(state.antibodies.len(), DEFAULT_ANTIBODIES);
        assert_eq!(state.cells_remaining(), DEFAULT_CELLS);
        assert!(!state.all_cells_infected());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_spawns_respect_separation() {
        let state = GameState::new(MatchSettings::with_seed(7)).unwrap();
        for (i, a) in state.cells.iter().enumerate() {
            for b in &state.cells[i + 1..] {
                assert!(a.pos.distance(b.pos) >= MIN_SPAWN_SEPARATION);
            }
        }
        for (i, a) in state.antibodies.iter().enumerate() {
            for b in &state.antibodies[i + 1..] {
                assert!(a.pos.distance(b.pos) >= MIN_SPAWN_SEPARATION);
            }
        }
    }

    #[test]
    fn test_cells_split_between_quadrants() {
        let state = GameState::new(MatchSettings::with_seed(3)).unwrap();
        let half = state.cells.len() / 2;
        assert!(state.cells[..half].iter().all(|c| c.pos.x >= 0.0 && c.pos.y >= 0.0));
        assert!(state.cells[half..].iter().all(|c| c.pos.x <= 0.0 && c.pos.y <= 0.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(MatchSettings::with_seed(99)).unwrap();
        let b = GameState::new(MatchSettings::with_seed(99)).unwrap();
        for (ca, cb) in a.cells.iter().zip(&b.cells) {
            assert_eq!(ca.pos, cb.pos);
            assert_eq!(ca.heading, cb.heading);
        }
    }

    #[test]
    fn test_place_separated_rerolls_overlap() {
        let placed = [Vec2::new(5.0, 5.0)];
        let mut rolls = vec![
            Vec2::new(5.05, 5.05),
            Vec2::new(5.1, 4.9),
            Vec2::new(8.0, 1.0),
        ]
        .into_iter();
        let pos = place_separated(&placed, || rolls.next().unwrap()).unwrap();
        assert_eq!(pos, Vec2::new(8.0, 1.0));
        assert!(pos.distance(placed[0]) >= MIN_SPAWN_SEPARATION);
    }

    #[test]
    fn test_place_separated_gives_up() {
        let placed = [Vec2::ZERO];
        assert!(place_separated(&placed, || Vec2::new(0.1, 0.1)).is_none());
    }

    #[test]
    fn test_crowded_dish_is_a_placement_error() {
        // 0.6 spacing cannot fit thousands of cells in a 10x10 quadrant
        let settings = MatchSettings {
            num_cells: 5000,
            ..MatchSettings::default()
        };
        let err = GameState::new(settings).unwrap_err();
        assert!(matches!(
            err,
            SimError::PlacementExhausted {
                kind: SpawnKind::Cell,
                ..
            }
        ));
    }

    #[test]
    fn test_projectile_from_floor_is_flat() {
        let mut state = GameState::new(MatchSettings::with_seed(42)).unwrap();
        state.player.heading = 0.7;
        let id = state.spawn_projectile();
        let projectile = state.projectiles.last().unwrap();
        assert_eq!(projectile.id, id);
        assert_eq!(projectile.heading, 0.7);
        assert_eq!(projectile.z, 0.0);
        assert!(projectile.ballistic.is_none());
        assert!(projectile.is_grounded());
    }

    #[test]
    fn test_projectile_from_jump_is_ballistic() {
        let mut state = GameState::new(MatchSettings::with_seed(42)).unwrap();
        state.elapsed = 1.5;
        state.player.actual_z = 0.8;
        state.player.z = 0.8;
        state.spawn_projectile();
        let projectile = state.projectiles.last().unwrap();
        let ballistic = projectile.ballistic.unwrap();
        assert_eq!(ballistic.spawn_z, 0.8);
        assert_eq!(ballistic.spawned_at, 1.5);
        assert_eq!(ballistic.drop_coeff, PROJECTILE_DROP_COEFF);
        assert_eq!(projectile.z, 0.8);
        assert!(!projectile.is_grounded());
    }

    #[test]
    fn test_directional_velocity_ramp_and_decay() {
        let mut v = DirectionalVelocity::default();
        v.ramp(0.1, 0.15);
        v.ramp(0.1, 0.15);
        assert_eq!(v.speed, 0.15);
        assert!(v.active);
        v.decay(0.1);
        v.decay(0.1);
        assert_eq!(v.speed, 0.0);
        assert!(!v.active);
    }

    #[test]
    fn test_antibody_impact_formula() {
        let mut ab = Antibody {
            id: 1,
            pos: Vec2::ZERO,
            heading: 0.0,
            speed: 0.1,
        };
        ab.absorb_impact(PROJECTILE_MASS, PROJECTILE_STEP);
        let expected = (ANTIBODY_MASS * 0.1 + PROJECTILE_MASS * PROJECTILE_STEP) / ANTIBODY_MASS;
        assert!((ab.speed - expected).abs() < 1e-6);
        for _ in 0..10_000 {
            ab.apply_friction();
        }
        assert_eq!(ab.speed, ANTIBODY_MIN_STEP);
    }

    #[test]
    fn test_eat_speed_window() {
        let mut player = Player::default();
        assert_eq!(player.max_speed(10.0), PLAYER_NORMAL_SPEED);
        player.last_ate = Some(10.0);
        assert_eq!(player.max_speed(12.0), PLAYER_EAT_SPEED);
        assert_eq!(player.max_speed(15.5), PLAYER_NORMAL_SPEED);
    }
}
