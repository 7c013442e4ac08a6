//! Roboball - deterministic physics core for a 3D robot-soccer simulation
//!
//! Two teams of spherical robots and a ball move inside a rigid arena with
//! rounded edges and a goal cavity cut into each end wall. The crate advances
//! a hypothetical match state tick by tick so that a strategy layer can score
//! candidate actions by rollout before committing to a real move.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena geometry, collisions, match state)
//! - `consts`: Arena and rules constants

pub mod sim;

pub use sim::{MatchState, SimError, Snapshot};

/// Arena geometry and game rules constants
///
/// The arena is a box with rounded floor/ceiling/wall edges, a rounded
/// vertical corner pillar where three faces meet, and a goal cavity in each
/// end wall (|z| = DEPTH/2). All lengths are in world units, all speeds in
/// units per second.
pub mod consts {
    /// Simulation rate: one tick is 1/60 s, integrated in microticks
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Full-resolution microtick count per tick
    pub const MICROTICKS_PER_TICK: usize = 100;
    /// Rollout horizon: ticks in a full match
    pub const MAX_TICK_COUNT: u32 = 18_000;

    /// Arena extents
    pub const ARENA_WIDTH: f64 = 60.0;
    pub const ARENA_HEIGHT: f64 = 20.0;
    pub const ARENA_DEPTH: f64 = 80.0;
    /// Rounding radius of floor-wall edges
    pub const ARENA_BOTTOM_RADIUS: f64 = 3.0;
    /// Rounding radius of ceiling-wall edges
    pub const ARENA_TOP_RADIUS: f64 = 7.0;
    /// Rounding radius of the vertical corner pillar
    pub const ARENA_CORNER_RADIUS: f64 = 13.0;

    /// Goal cavity dimensions (cut into the z = ±DEPTH/2 walls)
    pub const ARENA_GOAL_WIDTH: f64 = 30.0;
    pub const ARENA_GOAL_HEIGHT: f64 = 10.0;
    pub const ARENA_GOAL_DEPTH: f64 = 10.0;
    /// Rounding radius of the goal's inner top edges
    pub const ARENA_GOAL_TOP_RADIUS: f64 = 3.0;
    /// Rounding radius of the goal mouth frame
    pub const ARENA_GOAL_SIDE_RADIUS: f64 = 1.0;

    /// Downward acceleration applied to every entity
    pub const GRAVITY: f64 = 30.0;
    /// Hard cap on any entity's speed
    pub const MAX_ENTITY_SPEED: f64 = 100.0;

    /// Ball
    pub const BALL_RADIUS: f64 = 2.0;
    pub const BALL_MASS: f64 = 1.0;
    /// Ball-arena restitution
    pub const BALL_ARENA_E: f64 = 0.7;

    /// Robot
    pub const ROBOT_MASS: f64 = 2.0;
    pub const ROBOT_MIN_RADIUS: f64 = 1.0;
    pub const ROBOT_MAX_RADIUS: f64 = 1.05;
    pub const ROBOT_MAX_JUMP_SPEED: f64 = 15.0;
    pub const ROBOT_ACCELERATION: f64 = 100.0;
    pub const ROBOT_NITRO_ACCELERATION: f64 = 100.0;
    pub const ROBOT_MAX_GROUND_SPEED: f64 = 30.0;
    /// Robot-arena restitution: fully inelastic along the normal
    pub const ROBOT_ARENA_E: f64 = 0.0;

    /// Entity-entity restitution range; the maximum is used for robot-robot
    /// contact and for every contact in deterministic mode
    pub const MIN_HIT_E: f64 = 0.4;
    pub const MAX_HIT_E: f64 = 0.5;

    /// Nitro
    pub const MAX_NITRO_AMOUNT: f64 = 100.0;
    pub const START_NITRO_AMOUNT: f64 = 50.0;
    /// Units of velocity change bought by one unit of charge
    pub const NITRO_POINT_VELOCITY_CHANGE: f64 = 0.6;
    pub const NITRO_PACK_RADIUS: f64 = 0.5;
    pub const NITRO_PACK_RESPAWN_TICKS: u32 = 600;

    /// Threshold for "is this radius about to change" and near-zero vectors
    pub const EPS: f64 = 1e-7;
}
