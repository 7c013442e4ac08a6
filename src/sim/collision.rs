//! Impulse-based collision response
//!
//! One generic pairwise routine serves every entity pairing; the per-type
//! differences (mass, restitution behavior) travel in a small capability
//! struct instead of per-type specializations. Entity-arena response goes
//! through the boundary query in [`super::arena`].

use glam::DVec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::arena::collide_sphere_with_arena;
use super::state::Body;
use crate::consts::*;

/// Collision capabilities of one body: what the pairwise routine needs to
/// know beyond the kinematic state.
#[derive(Debug, Clone, Copy)]
pub struct BodyProps {
    pub mass: f64,
}

pub const ROBOT_PROPS: BodyProps = BodyProps { mass: ROBOT_MASS };
pub const BALL_PROPS: BodyProps = BodyProps { mass: BALL_MASS };

/// How the restitution coefficient for a pair is chosen.
#[derive(Debug, Clone, Copy)]
pub enum Restitution {
    /// Always the given coefficient (robot-robot uses the range maximum)
    Fixed(f64),
    /// Uniform draw from [min, max]; replaced by max in deterministic mode
    Range(f64, f64),
}

/// One resolved collision, recorded for the surrounding layer (e.g. to
/// detect "I touched the ball this tick").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub id_a: i32,
    /// `None` when the second participant is the ball
    pub id_b: Option<i32>,
    /// Velocity of the second participant after resolution
    pub velocity: DVec3,
}

/// Outcome of a resolved pair, for bookkeeping by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PairOutcome {
    /// An impulse was applied using a randomized restitution draw
    pub used_random_draw: bool,
}

/// Resolve interpenetration and exchange impulses between two bodies.
///
/// Separation is split in inverse proportion to mass, so the heavier body
/// moves less. The impulse fires only when the pair is still closing along
/// the contact normal, net of both radius growth rates; a separating or
/// tangent pair gets position correction only. Returns `None` when the
/// bodies do not overlap.
pub(crate) fn collide_bodies(
    a: &mut Body,
    a_props: BodyProps,
    b: &mut Body,
    b_props: BodyProps,
    restitution: Restitution,
    deterministic: bool,
    rng: &mut Pcg32,
) -> Option<PairOutcome> {
    let sum_radius = a.radius + b.radius;
    let dist2 = a.distance_squared_to(b);
    if dist2 >= sum_radius * sum_radius {
        return None;
    }

    let distance = dist2.sqrt();
    let penetration = sum_radius - distance;

    let inv_a = 1.0 / a_props.mass;
    let inv_b = 1.0 / b_props.mass;
    let k_a = inv_a / (inv_a + inv_b);
    let k_b = inv_b / (inv_a + inv_b);

    let normal = (b.position - a.position) / distance;
    a.position -= normal * (penetration * k_a);
    b.position += normal * (penetration * k_b);

    let mut used_random_draw = false;
    let delta_velocity =
        (b.velocity - a.velocity).dot(normal) - b.radius_change_speed - a.radius_change_speed;
    if delta_velocity < 0.0 {
        let e = match restitution {
            Restitution::Fixed(e) => e,
            Restitution::Range(min, max) => {
                if deterministic {
                    max
                } else {
                    used_random_draw = true;
                    rng.random_range(min..=max)
                }
            }
        };
        let impulse = normal * ((1.0 + e) * delta_velocity);
        a.velocity += impulse * k_a;
        b.velocity -= impulse * k_b;
    }

    Some(PairOutcome { used_random_draw })
}

/// Resolve a body against the arena surface.
///
/// Pushes the body out along the correction normal, then reflects and damps
/// the normal velocity (net of the body's own radius growth) when it points
/// into the surface. Returns the contact normal when the body ends the step
/// pressed against the arena, which feeds the robot grounded state.
pub(crate) fn collide_with_arena(body: &mut Body, arena_e: f64) -> Option<DVec3> {
    let contact = collide_sphere_with_arena(body.position, body.radius)?;
    body.position += contact.normal * contact.penetration;
    let velocity = body.velocity.dot(contact.normal) - body.radius_change_speed;
    if velocity < 0.0 {
        body.velocity -= contact.normal * ((1.0 + arena_e) * velocity);
        return Some(contact.normal);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;

    fn body_at(x: f64, radius: f64, vx: f64) -> Body {
        Body {
            position: DVec3::new(x, 5.0, 0.0),
            velocity: DVec3::new(vx, 0.0, 0.0),
            radius,
            radius_change_speed: 0.0,
        }
    }

    #[test]
    fn separation_is_mass_weighted_for_robot_ball() {
        // Robot mass 2, ball mass 1: the ball takes 2/3 of the separation
        let mut robot = body_at(0.0, 1.0, 0.0);
        let mut ball = body_at(2.4, 2.0, 0.0);
        let overlap = 0.6;
        let mut rng = Pcg32::seed_from_u64(0);

        collide_bodies(
            &mut robot,
            ROBOT_PROPS,
            &mut ball,
            BALL_PROPS,
            Restitution::Range(MIN_HIT_E, MAX_HIT_E),
            true,
            &mut rng,
        )
        .unwrap();

        assert_approx_eq!(robot.position.x, -overlap / 3.0);
        assert_approx_eq!(ball.position.x, 2.4 + overlap * 2.0 / 3.0);
        // Fully separated
        assert_approx_eq!(ball.position.x - robot.position.x, 3.0);
    }

    #[test]
    fn separation_is_symmetric_for_equal_masses() {
        let mut a = body_at(0.0, 1.0, 0.0);
        let mut b = body_at(1.5, 1.0, 0.0);
        let mut rng = Pcg32::seed_from_u64(0);

        collide_bodies(
            &mut a,
            ROBOT_PROPS,
            &mut b,
            ROBOT_PROPS,
            Restitution::Fixed(MAX_HIT_E),
            false,
            &mut rng,
        )
        .unwrap();

        assert_approx_eq!(a.position.x, -0.25);
        assert_approx_eq!(b.position.x, 1.75);
    }

    #[test]
    fn head_on_impulse_matches_max_restitution_exactly() {
        // Equal masses closing at 10: post-collision relative normal speed
        // must be exactly e_max * 10
        let mut a = body_at(0.0, 1.0, 5.0);
        let mut b = body_at(1.9, 1.0, -5.0);
        let mut rng = Pcg32::seed_from_u64(0);

        collide_bodies(
            &mut a,
            ROBOT_PROPS,
            &mut b,
            ROBOT_PROPS,
            Restitution::Fixed(MAX_HIT_E),
            false,
            &mut rng,
        )
        .unwrap();

        let closing_after = b.velocity.x - a.velocity.x;
        assert_approx_eq!(closing_after, MAX_HIT_E * 10.0);
    }

    #[test]
    fn random_restitution_stays_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let mut a = body_at(0.0, 1.0, 5.0);
            let mut b = body_at(1.9, 2.0, -5.0);
            let outcome = collide_bodies(
                &mut a,
                ROBOT_PROPS,
                &mut b,
                BALL_PROPS,
                Restitution::Range(MIN_HIT_E, MAX_HIT_E),
                false,
                &mut rng,
            )
            .unwrap();
            assert!(outcome.used_random_draw);

            let closing_after = b.velocity.x - a.velocity.x;
            assert!(closing_after >= MIN_HIT_E * 10.0 - 1e-9);
            assert!(closing_after <= MAX_HIT_E * 10.0 + 1e-9);
        }
    }

    #[test]
    fn deterministic_mode_skips_the_rng() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut a = body_at(0.0, 1.0, 5.0);
        let mut b = body_at(1.9, 2.0, -5.0);
        let outcome = collide_bodies(
            &mut a,
            ROBOT_PROPS,
            &mut b,
            BALL_PROPS,
            Restitution::Range(MIN_HIT_E, MAX_HIT_E),
            true,
            &mut rng,
        )
        .unwrap();
        assert!(!outcome.used_random_draw);
    }

    #[test]
    fn separating_pair_keeps_velocities() {
        // Overlapping but already separating: position is corrected, the
        // impulse branch must not fire
        let mut a = body_at(0.0, 1.0, -5.0);
        let mut b = body_at(1.5, 1.0, 5.0);
        let mut rng = Pcg32::seed_from_u64(0);

        collide_bodies(
            &mut a,
            ROBOT_PROPS,
            &mut b,
            ROBOT_PROPS,
            Restitution::Fixed(MAX_HIT_E),
            false,
            &mut rng,
        )
        .unwrap();

        assert_approx_eq!(a.velocity.x, -5.0);
        assert_approx_eq!(b.velocity.x, 5.0);
        assert_approx_eq!(b.position.x - a.position.x, 2.0);
    }

    #[test]
    fn non_overlapping_pair_is_untouched() {
        let mut a = body_at(0.0, 1.0, 0.0);
        let mut b = body_at(5.0, 1.0, 0.0);
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(
            collide_bodies(
                &mut a,
                ROBOT_PROPS,
                &mut b,
                ROBOT_PROPS,
                Restitution::Fixed(MAX_HIT_E),
                false,
                &mut rng,
            )
            .is_none()
        );
    }

    #[test]
    fn ball_bounces_off_the_floor_with_damping() {
        let mut ball = Body {
            position: DVec3::new(0.0, 1.5, 0.0),
            velocity: DVec3::new(0.0, -10.0, 0.0),
            radius: BALL_RADIUS,
            radius_change_speed: 0.0,
        };
        let normal = collide_with_arena(&mut ball, BALL_ARENA_E).unwrap();
        assert_eq!(normal, DVec3::Y);
        assert_approx_eq!(ball.position.y, BALL_RADIUS);
        assert_approx_eq!(ball.velocity.y, BALL_ARENA_E * 10.0);
    }

    #[test]
    fn robot_arena_contact_is_inelastic() {
        let mut robot = Body {
            position: DVec3::new(0.0, 0.8, 0.0),
            velocity: DVec3::new(3.0, -2.0, 0.0),
            radius: 1.0,
            radius_change_speed: 0.0,
        };
        let normal = collide_with_arena(&mut robot, ROBOT_ARENA_E).unwrap();
        assert_eq!(normal, DVec3::Y);
        assert_approx_eq!(robot.position.y, 1.0);
        // Normal component killed, tangential preserved
        assert_approx_eq!(robot.velocity.y, 0.0);
        assert_approx_eq!(robot.velocity.x, 3.0);
    }

    #[test]
    fn clear_body_reports_no_arena_contact() {
        let mut body = body_at(0.0, 1.0, 0.0);
        assert!(collide_with_arena(&mut body, BALL_ARENA_E).is_none());
        assert_approx_eq!(body.position.y, 5.0);
    }
}
