//! Fixed timestep integration and the tick scheduler
//!
//! One tick is a fixed slice of match time integrated as a sequence of
//! microticks. Every microtick runs the same strict order: commanded robot
//! kinematics, free motion, robot-robot pairs, robot-ball and robot-arena,
//! ball-arena, goal check, nitro pickup. Each phase depends on the previous
//! one's resolved positions, so nothing here is reorderable.

use super::collision::{
    BALL_PROPS, CollisionEvent, ROBOT_PROPS, Restitution, collide_bodies, collide_with_arena,
};
use super::state::{MatchState, Robot, Team};
use crate::consts::*;

/// Advance every entity by one microtick and resolve all interactions.
pub(crate) fn microtick(state: &mut MatchState, dt: f64) {
    let deterministic = state.deterministic;

    // Commanded kinematics, in id order
    for robot in state.robots.iter_mut() {
        if let Some(normal) = robot.touch_normal {
            // Ground drive: the commanded velocity change, projected
            // tangential to the contact surface
            let mut target = robot
                .action
                .target_velocity
                .clamp_length_max(ROBOT_MAX_GROUND_SPEED);
            target -= normal * normal.dot(target) + robot.body.velocity;

            let len2 = target.length_squared();
            if len2 > 0.0 {
                // Traction scales with how upright the contact is; none at
                // all on walls and ceilings
                let acceleration = if normal.y <= 0.0 {
                    0.0
                } else {
                    ROBOT_ACCELERATION * dt * normal.y
                };
                if acceleration * acceleration < len2 {
                    target *= acceleration / len2.sqrt();
                }
                robot.body.velocity += target;
            }
        }

        if robot.action.use_nitro {
            // One unit of charge buys NITRO_POINT_VELOCITY_CHANGE units of
            // velocity change; deplete in proportion to what was applied
            let target_change = (robot.action.target_velocity - robot.body.velocity)
                .clamp_length_max(robot.nitro * NITRO_POINT_VELOCITY_CHANGE);
            if target_change.length_squared() > 0.0 {
                let acceleration = target_change.normalize() * ROBOT_NITRO_ACCELERATION;
                let velocity_change = (acceleration * dt).clamp_length_max(target_change.length());
                robot.body.velocity += velocity_change;
                robot.nitro -= velocity_change.length() / NITRO_POINT_VELOCITY_CHANGE;
            }
        }

        robot.body.advance(dt);
        // Shape follows the commanded jump before any collision below sees it
        robot.body.radius = Robot::radius_for_jump_speed(robot.action.jump_speed);
        robot.body.radius_change_speed = robot.action.jump_speed;
    }

    state.ball.body.advance(dt);

    // Robot-robot pairs, stable order over sorted ids
    let n = state.robots.len();
    for i in 0..n {
        for j in 0..i {
            let (left, right) = state.robots.split_at_mut(i);
            let a = &mut right[0];
            let b = &mut left[j];
            if collide_bodies(
                &mut a.body,
                ROBOT_PROPS,
                &mut b.body,
                ROBOT_PROPS,
                Restitution::Fixed(MAX_HIT_E),
                deterministic,
                &mut state.rng,
            )
            .is_some()
            {
                state.robot_collisions.push(CollisionEvent {
                    id_a: a.id,
                    id_b: Some(b.id),
                    velocity: b.body.velocity,
                });
            }
        }
    }

    // Robot-ball and robot-arena
    for robot in state.robots.iter_mut() {
        if let Some(outcome) = collide_bodies(
            &mut robot.body,
            ROBOT_PROPS,
            &mut state.ball.body,
            BALL_PROPS,
            Restitution::Range(MIN_HIT_E, MAX_HIT_E),
            deterministic,
            &mut state.rng,
        ) {
            state.had_random_collision |= outcome.used_random_draw;
            state.robot_ball_collisions.push(CollisionEvent {
                id_a: robot.id,
                id_b: None,
                velocity: state.ball.body.velocity,
            });
        }
        robot.touch_normal = collide_with_arena(&mut robot.body, ROBOT_ARENA_E);
    }

    collide_with_arena(&mut state.ball.body, BALL_ARENA_E);
    state.check_goal();

    // Nitro pickup: a robot below max charge drains any available pack it
    // overlaps
    for robot in state.robots.iter_mut() {
        if robot.nitro == MAX_NITRO_AMOUNT {
            continue;
        }
        for pack in state.nitro_packs.iter_mut() {
            if pack.respawn_ticks > 0 {
                continue;
            }
            let range = robot.body.radius + pack.radius;
            if robot.body.position.distance_squared(pack.position) <= range * range {
                robot.nitro = MAX_NITRO_AMOUNT;
                pack.respawn_ticks = NITRO_PACK_RESPAWN_TICKS;
            }
        }
    }
}

/// Default action for opposing robots the engine must animate itself: keep
/// current velocity, jump the moment the ground is lost.
fn synthesize_opponent_actions(state: &mut MatchState) {
    for robot in state
        .robots
        .iter_mut()
        .filter(|r| r.team == Team::Opposing)
    {
        robot.action.jump_speed = if robot.grounded() {
            0.0
        } else {
            ROBOT_MAX_JUMP_SPEED
        };
        robot.action.target_velocity = robot.body.velocity;
    }
}

impl MatchState {
    /// Advance one tick at the full microtick resolution.
    pub fn advance_tick(&mut self) {
        self.advance_tick_with(MICROTICKS_PER_TICK);
    }

    /// Advance one tick integrated as `microticks` equal sub-steps.
    ///
    /// Search callers drop the count for cheap long-horizon rollouts; when a
    /// robot radius is about to change under a reduced count, the first
    /// slice of the tick runs at full resolution so the shape change cannot
    /// tunnel through a contact.
    pub fn advance_tick_with(&mut self, microticks: usize) {
        let microticks = microticks.max(1);

        if self.deduce_opponent_actions {
            synthesize_opponent_actions(self);
        }

        let radius_about_to_change = self.robots.iter().any(|r| {
            (r.body.radius - Robot::radius_for_jump_speed(r.action.jump_speed)).abs() > EPS
        });
        let first_microtick_separate = radius_about_to_change && microticks < MICROTICKS_PER_TICK;

        self.had_random_collision = false;
        self.robot_ball_collisions.clear();
        self.robot_collisions.clear();

        let tick_dt = 1.0 / TICKS_PER_SECOND as f64;
        if self.tick < self.max_tick && self.scored() == 0 {
            let mut dt = tick_dt / microticks as f64;
            if first_microtick_separate {
                const ISOLATED: usize = 2;
                let fine_dt = tick_dt / MICROTICKS_PER_TICK as f64;
                for _ in 0..ISOLATED {
                    if self.scored() != 0 {
                        break;
                    }
                    microtick(self, fine_dt);
                }
                dt = (tick_dt - ISOLATED as f64 * fine_dt) / microticks as f64;
            }
            for _ in 0..microticks {
                if self.scored() != 0 {
                    break;
                }
                microtick(self, dt);
            }
            // Pack cooldowns count whole ticks, not microticks
            for pack in self.nitro_packs.iter_mut() {
                if pack.respawn_ticks > 0 {
                    pack.respawn_ticks -= 1;
                }
            }
        }

        self.tick += 1;
        self.round_tick += 1;
    }
}
