//! Match state and core entity types
//!
//! Everything a rollout needs lives here by value: ball, robots, nitro packs,
//! counters, the seeded RNG. Copying a `MatchState` yields a fully isolated
//! rollout.

use glam::DVec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionEvent;
use super::error::SimError;
use crate::consts::*;

/// Team membership from the controlled player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Own,
    Opposing,
}

/// Shared kinematic state of every sphere-like moving object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: DVec3,
    pub velocity: DVec3,
    pub radius: f64,
    /// How fast the radius is growing (nonzero only for jumping robots)
    pub radius_change_speed: f64,
}

impl Body {
    /// Advance by one microtick: clamp speed, integrate position, apply
    /// gravity. Collisions and arena contact are resolved separately.
    pub fn advance(&mut self, dt: f64) {
        self.velocity = self.velocity.clamp_length_max(MAX_ENTITY_SPEED);
        self.position += self.velocity * dt;
        self.position.y -= GRAVITY * dt * dt / 2.0;
        self.velocity.y -= GRAVITY * dt;
    }

    pub fn distance_squared_to(&self, other: &Body) -> f64 {
        self.position.distance_squared(other.position)
    }
}

/// The match ball: constant radius, fixed mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub body: Body,
}

impl Ball {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self {
            body: Body {
                position,
                velocity,
                radius: BALL_RADIUS,
                radius_change_speed: 0.0,
            },
        }
    }
}

/// Commanded action for one robot, populated by the strategy layer before
/// each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    pub target_velocity: DVec3,
    /// Jump intensity in [0, ROBOT_MAX_JUMP_SPEED]; also the radius growth
    /// rate while it is held
    pub jump_speed: f64,
    pub use_nitro: bool,
}

/// A mobile spherical robot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: i32,
    pub team: Team,
    pub body: Body,
    /// Contact normal of the surface the robot is touching, if grounded
    pub touch_normal: Option<DVec3>,
    /// Nitro charge in [0, MAX_NITRO_AMOUNT]
    pub nitro: f64,
    pub action: Action,
}

impl Robot {
    pub fn new(id: i32, team: Team, position: DVec3) -> Self {
        Self {
            id,
            team,
            body: Body {
                position,
                velocity: DVec3::ZERO,
                radius: ROBOT_MIN_RADIUS,
                radius_change_speed: 0.0,
            },
            touch_normal: Some(DVec3::Y),
            nitro: START_NITRO_AMOUNT,
            action: Action::default(),
        }
    }

    /// Robot radius as a function of commanded jump intensity. This coupling
    /// of shape to action is what makes jumps push off the ground.
    pub fn radius_for_jump_speed(jump_speed: f64) -> f64 {
        ROBOT_MIN_RADIUS + (ROBOT_MAX_RADIUS - ROBOT_MIN_RADIUS) * jump_speed / ROBOT_MAX_JUMP_SPEED
    }

    pub fn grounded(&self) -> bool {
        self.touch_normal.is_some()
    }
}

/// A nitro resource pack: Available when `respawn_ticks == 0`, otherwise
/// cooling down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NitroPack {
    pub position: DVec3,
    pub radius: f64,
    pub respawn_ticks: u32,
}

impl NitroPack {
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            radius: NITRO_PACK_RADIUS,
            respawn_ticks: 0,
        }
    }

    pub fn available(&self) -> bool {
        self.respawn_ticks == 0
    }
}

/// Complete rollout state: one value-copy per rollout, no sharing
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Global tick counter
    pub tick: u32,
    /// Tick counter within the current round
    pub round_tick: u32,
    /// Rollout horizon: no physics past this tick
    pub max_tick: u32,
    /// Id of the controlled robot
    pub me_id: i32,
    pub ball: Ball,
    /// All robots, kept sorted by id for reproducible iteration
    pub(crate) robots: Vec<Robot>,
    pub nitro_packs: Vec<NitroPack>,

    /// Which side conceded a goal: -1 (negative z), 0 (none), +1 (positive z)
    scored: i32,

    seed: u64,
    pub(crate) rng: Pcg32,
    /// When set, the bounded restitution draw uses its maximum instead of
    /// the RNG, making rollouts bit-reproducible
    pub(crate) deterministic: bool,
    /// When set, opposing robots without externally supplied commands get a
    /// synthesized default action each tick
    pub(crate) deduce_opponent_actions: bool,

    pub(crate) robot_ball_collisions: Vec<CollisionEvent>,
    pub(crate) robot_collisions: Vec<CollisionEvent>,
    pub(crate) had_random_collision: bool,
}

impl MatchState {
    pub fn new(
        ball: Ball,
        mut robots: Vec<Robot>,
        nitro_packs: Vec<NitroPack>,
        me_id: i32,
        seed: u64,
    ) -> Self {
        robots.sort_by_key(|r| r.id);
        let mut state = Self {
            tick: 0,
            round_tick: 0,
            max_tick: MAX_TICK_COUNT,
            me_id,
            ball,
            robots,
            nitro_packs,
            scored: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            deterministic: false,
            deduce_opponent_actions: false,
            robot_ball_collisions: Vec::new(),
            robot_collisions: Vec::new(),
            had_random_collision: false,
        };
        state.check_goal();
        state
    }

    /// The controlled robot.
    pub fn me(&self) -> Result<&Robot, SimError> {
        self.robot(self.me_id)
    }

    pub fn me_mut(&mut self) -> Result<&mut Robot, SimError> {
        self.robot_mut(self.me_id)
    }

    /// The other own-team robot, if the team has one.
    pub fn teammate(&self) -> Option<&Robot> {
        self.robots
            .iter()
            .find(|r| r.team == Team::Own && r.id != self.me_id)
    }

    pub fn robot(&self, id: i32) -> Result<&Robot, SimError> {
        self.robots
            .iter()
            .find(|r| r.id == id)
            .ok_or(SimError::UnknownRobot(id))
    }

    pub fn robot_mut(&mut self, id: i32) -> Result<&mut Robot, SimError> {
        self.robots
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SimError::UnknownRobot(id))
    }

    /// Own-team robots excluding the given id.
    pub fn teammates_except(&self, exclude_id: i32) -> impl Iterator<Item = &Robot> {
        self.robots
            .iter()
            .filter(move |r| r.team == Team::Own && r.id != exclude_id)
    }

    /// All robots in id order.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Robot-ball collisions resolved during the last completed tick.
    pub fn robot_ball_collisions(&self) -> &[CollisionEvent] {
        &self.robot_ball_collisions
    }

    /// Robot-robot collisions resolved during the last completed tick.
    pub fn robot_collisions(&self) -> &[CollisionEvent] {
        &self.robot_collisions
    }

    /// Whether the last tick resolved any collision with a randomized
    /// restitution draw.
    pub fn had_random_collision(&self) -> bool {
        self.had_random_collision
    }

    /// Terminal goal indicator: -1 / 0 / +1 for which half conceded.
    pub fn scored(&self) -> i32 {
        self.scored
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reseed the restitution RNG; rollouts with equal seeds and equal
    /// inputs replay identically.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Replace the bounded restitution draw by its maximum.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    /// Synthesize default actions for opposing robots each tick.
    pub fn set_deduce_opponent_actions(&mut self, enabled: bool) {
        self.deduce_opponent_actions = enabled;
    }

    /// Latch the terminal flag when the ball has fully crossed a goal line.
    pub(crate) fn check_goal(&mut self) {
        if self.scored == 0
            && self.ball.body.position.z.abs() > ARENA_DEPTH / 2.0 + self.ball.body.radius
        {
            self.scored = if self.ball.body.position.z < 0.0 { -1 } else { 1 };
            log::debug!(
                "goal on side {} at tick {}",
                self.scored,
                self.tick
            );
        }
    }
}
