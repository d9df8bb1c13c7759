//! Per-tick movement rules
//!
//! Step lengths are per tick, not per second: the dish was tuned against a
//! fixed frame rate (see [`crate::consts::SIM_HZ`]). Time only feeds the jump
//! arc, projectile drop and the eat-speed window.

use glam::Vec2;

use super::arena::{bounce_heading, within_containment};
use super::state::{Antibody, Cell, Direction, Jump, Player, Projectile};
use super::tick::TickInput;
use crate::consts::*;
use crate::direction_from_angle;

/// Drift uninfected cells along their heading, bouncing off the wall.
/// Infected cells hold still until eaten.
pub fn move_cells(cells: &mut [Cell]) {
    for cell in cells.iter_mut().filter(|c| !c.infected) {
        cell.heading = bounce_heading(cell.pos, cell.heading, CELL_STEP);
        cell.pos += direction_from_angle(cell.heading) * CELL_STEP;
    }
}

/// Move antibodies at their current speed, then bleed off impact momentum
pub fn move_antibodies(antibodies: &mut [Antibody]) {
    for antibody in antibodies.iter_mut() {
        antibody.heading = bounce_heading(antibody.pos, antibody.heading, antibody.speed);
        antibody.pos += direction_from_angle(antibody.heading) * antibody.speed;
        antibody.apply_friction();
    }
}

/// Ramp or bleed the four directional speeds from the held inputs.
///
/// Along each axis a held direction only accelerates once the opposite
/// direction's residual speed has been bled to zero. Holding both directions
/// of an axis cancels and both decay.
pub fn update_player_velocity(player: &mut Player, input: &TickInput, now: f32) {
    let max = player.max_speed(now);
    for (pos, neg) in [
        (Direction::Forward, Direction::Back),
        (Direction::Right, Direction::Left),
    ] {
        match (input.held(pos), input.held(neg)) {
            (true, false) => drive_axis(player, pos, max),
            (false, true) => drive_axis(player, neg, max),
            _ => {
                player.velocity_mut(pos).decay(PLAYER_FRICTION);
                player.velocity_mut(neg).decay(PLAYER_FRICTION);
            }
        }
    }
}

fn drive_axis(player: &mut Player, held: Direction, max: f32) {
    let opposing = player.velocity_mut(held.opposite());
    if opposing.speed > 0.0 {
        opposing.decay(PLAYER_FRICTION);
    } else {
        player.velocity_mut(held).ramp(PLAYER_ACCEL, max);
    }
}

/// Apply the directional speeds against the current heading.
///
/// Each direction's step is checked against the wall on its own, from the
/// start-of-tick position, and vetoed if it would leave the dish. Accepted
/// steps are then summed, so a diagonal can end slightly past the wall.
/// Returns the displacement actually applied.
pub fn move_player(player: &mut Player) -> Vec2 {
    let origin = player.pos;
    let mut delta = Vec2::ZERO;
    for dir in Direction::ALL {
        let speed = player.velocity(dir).speed;
        if speed <= 0.0 {
            continue;
        }
        let step = dir.unit(player.heading) * speed;
        if within_containment(origin + step) {
            delta += step;
        }
    }
    player.pos = origin + delta;
    delta
}

/// Advance the jump arc `h(t) = k*t - g*t^2/2`.
///
/// A jump starts when `jump_held` and the player is on the floor; it ends
/// when the arc takes `actual_z` below zero, which resets both heights.
/// Returns true if a jump started this tick.
pub fn update_jump(player: &mut Player, jump_held: bool, now: f32) -> bool {
    let mut started = false;
    if player.jump.is_none() && jump_held && !player.is_airborne() {
        player.jump = Some(Jump {
            started_at: now,
            last_height: 0.0,
        });
        started = true;
    }

    let Some(jump) = player.jump.as_mut() else {
        return false;
    };

    let t = (now - jump.started_at).max(0.0);
    let height = JUMP_LAUNCH * t - 0.5 * GRAVITY * t * t;
    let increment = height - jump.last_height;
    jump.last_height = height;

    player.z += increment;
    player.actual_z += increment;
    if player.actual_z < 0.0 {
        player.jump = None;
        player.z = 0.0;
        player.actual_z = 0.0;
    }
    started
}

/// Fly projectiles along their fire heading and apply ballistic drop
pub fn move_projectiles(projectiles: &mut [Projectile], now: f32) {
    for projectile in projectiles.iter_mut() {
        projectile.pos += crate::forward_from_heading(projectile.heading) * PROJECTILE_STEP;
        apply_drop(projectile, now);
    }
}

/// Lower a mid-air projectile by `coeff * (age / 10)^2`, landing it on the
/// floor once the next drop would take it under the ground threshold.
fn apply_drop(projectile: &mut Projectile, now: f32) {
    let Some(ballistic) = projectile.ballistic.as_mut() else {
        return;
    };
    if ballistic.drop_coeff == 0.0 || ballistic.spawn_z <= 0.0 {
        return;
    }

    let age = ((now - ballistic.spawned_at) / 10.0).max(0.0);
    let drop = ballistic.drop_coeff * age * age;
    if projectile.z - drop < PROJECTILE_GROUND_EPSILON {
        projectile.z = 0.0;
        ballistic.drop_coeff = 0.0;
    } else {
        projectile.z -= drop;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::radius_of;
    use crate::sim::state::Ballistic;

    fn forward_input() -> TickInput {
        TickInput {
            move_forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_forward_ramps_to_normal_speed_in_15_ticks() {
        let mut player = Player::default();
        let input = forward_input();
        for _ in 0..14 {
            update_player_velocity(&mut player, &input, 0.0);
        }
        assert!(player.velocity(Direction::Forward).speed < PLAYER_NORMAL_SPEED);

        update_player_velocity(&mut player, &input, 0.0);
        let v = player.velocity(Direction::Forward);
        assert_eq!(v.speed, PLAYER_NORMAL_SPEED);
        assert!(v.active);

        // Capped from here on
        update_player_velocity(&mut player, &input, 0.0);
        assert_eq!(player.velocity(Direction::Forward).speed, PLAYER_NORMAL_SPEED);
    }

    #[test]
    fn test_opposing_residual_bleeds_before_ramp() {
        let mut player = Player::default();
        player.velocity_mut(Direction::Back).speed = 0.03;
        player.velocity_mut(Direction::Back).active = true;
        let input = forward_input();

        update_player_velocity(&mut player, &input, 0.0);
        assert_eq!(player.velocity(Direction::Forward).speed, 0.0);
        assert!(player.velocity(Direction::Back).speed > 0.0);

        for _ in 0..5 {
            update_player_velocity(&mut player, &input, 0.0);
        }
        assert_eq!(player.velocity(Direction::Back).speed, 0.0);
        assert!(!player.velocity(Direction::Back).active);
        assert!(player.velocity(Direction::Forward).speed > 0.0);
    }

    #[test]
    fn test_release_decays_to_zero() {
        let mut player = Player::default();
        player.velocity_mut(Direction::Left).ramp(0.05, 0.15);
        let idle = TickInput::default();
        for _ in 0..10 {
            update_player_velocity(&mut player, &idle, 0.0);
        }
        assert_eq!(player.velocity(Direction::Left).speed, 0.0);
        assert!(!player.velocity(Direction::Left).active);
    }

    #[test]
    fn test_eat_speed_raises_cap() {
        let mut player = Player::default();
        player.last_ate = Some(1.0);
        let input = forward_input();
        for _ in 0..40 {
            update_player_velocity(&mut player, &input, 2.0);
        }
        assert_eq!(player.velocity(Direction::Forward).speed, PLAYER_EAT_SPEED);
    }

    #[test]
    fn test_move_player_follows_heading() {
        let mut player = Player::default();
        player.velocity_mut(Direction::Forward).speed = 0.1;
        move_player(&mut player);
        assert!(player.pos.x.abs() < 1e-6);
        assert!((player.pos.y - 0.1).abs() < 1e-6);

        let mut player = Player {
            heading: -std::f32::consts::FRAC_PI_2,
            ..Player::default()
        };
        player.velocity_mut(Direction::Forward).speed = 0.1;
        move_player(&mut player);
        assert!((player.pos.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_move_player_vetoed_at_wall() {
        let mut player = Player {
            pos: Vec2::new(0.0, 62.95),
            ..Player::default()
        };
        player.velocity_mut(Direction::Forward).speed = 0.1;
        let applied = move_player(&mut player);
        assert_eq!(applied, Vec2::ZERO);
        assert_eq!(player.pos, Vec2::new(0.0, 62.95));
    }

    #[test]
    fn test_cells_bounce_and_stay_near_dish() {
        let mut cells = vec![Cell {
            id: 1,
            pos: Vec2::new(62.95, 0.0),
            heading: 0.0,
            infected: false,
            eaten: false,
        }];
        for _ in 0..100 {
            move_cells(&mut cells);
            assert!(radius_of(cells[0].pos) < ARENA_RADIUS + CELL_STEP);
        }
        assert!(cells[0].pos.x < 62.95);
    }

    #[test]
    fn test_infected_cells_hold_still() {
        let mut cells = vec![Cell {
            id: 1,
            pos: Vec2::new(1.0, 1.0),
            heading: 0.3,
            infected: true,
            eaten: false,
        }];
        move_cells(&mut cells);
        assert_eq!(cells[0].pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_antibody_slows_to_floor() {
        let mut antibodies = vec![Antibody {
            id: 1,
            pos: Vec2::ZERO,
            heading: 0.0,
            speed: 0.4,
        }];
        for _ in 0..1000 {
            move_antibodies(&mut antibodies);
        }
        assert_eq!(antibodies[0].speed, ANTIBODY_MIN_STEP);
        assert!(radius_of(antibodies[0].pos) < ARENA_RADIUS + 0.4);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut player = Player::default();
        assert!(update_jump(&mut player, true, 0.0));
        let mut peak: f32 = 0.0;
        let mut landed_at = None;
        for i in 1..200 {
            let now = i as f32 * SIM_DT;
            update_jump(&mut player, false, now);
            assert!(player.actual_z >= 0.0);
            peak = peak.max(player.actual_z);
            if player.jump.is_none() {
                landed_at = Some(now);
                break;
            }
        }
        let landed_at = landed_at.expect("jump never landed");
        // Arc returns to zero at t = 2k/g
        assert!((landed_at - 2.0 * JUMP_LAUNCH / GRAVITY).abs() < 2.0 * SIM_DT);
        assert!(peak > 1.0);
        assert_eq!(player.z, 0.0);
        assert_eq!(player.actual_z, 0.0);
    }

    #[test]
    fn test_no_double_jump() {
        let mut player = Player::default();
        update_jump(&mut player, true, 0.0);
        update_jump(&mut player, true, 0.1);
        let started_at = player.jump.map(|j| j.started_at);
        assert!(!update_jump(&mut player, true, 0.2));
        assert_eq!(player.jump.map(|j| j.started_at), started_at);
    }

    #[test]
    fn test_projectile_travels_straight() {
        let mut projectiles = vec![Projectile {
            id: 1,
            pos: Vec2::ZERO,
            z: 0.0,
            heading: 0.0,
            ballistic: None,
        }];
        move_projectiles(&mut projectiles, 0.0);
        move_projectiles(&mut projectiles, 0.1);
        assert!((projectiles[0].pos.y - 2.0 * PROJECTILE_STEP).abs() < 1e-5);
        assert_eq!(projectiles[0].z, 0.0);
    }

    #[test]
    fn test_ballistic_projectile_lands_and_stays_down() {
        let mut projectiles = vec![Projectile {
            id: 1,
            pos: Vec2::ZERO,
            z: 0.5,
            heading: 0.0,
            ballistic: Some(Ballistic {
                drop_coeff: PROJECTILE_DROP_COEFF,
                spawned_at: 0.0,
                spawn_z: 0.5,
            }),
        }];
        let mut last_z = 0.5;
        for i in 1..120 {
            move_projectiles(&mut projectiles, i as f32 * SIM_DT);
            let z = projectiles[0].z;
            assert!(z <= last_z);
            assert!(z >= 0.0);
            last_z = z;
        }
        assert_eq!(projectiles[0].z, 0.0);
        assert!(projectiles[0].is_grounded());
        assert_eq!(projectiles[0].ballistic.unwrap().drop_coeff, 0.0);
    }
}
