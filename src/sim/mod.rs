//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick = a fixed number of microticks)
//! - Seeded RNG only, and only for the bounded restitution draw
//! - Stable iteration order (robots sorted by id)
//! - No rendering or platform dependencies
//!
//! A rollout owns its value-copy of the match state, so independent rollouts
//! may run in parallel without sharing anything mutable.

pub mod arena;
pub mod collision;
pub mod debug;
pub mod error;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use arena::{ArenaContact, collide_sphere_with_arena};
pub use collision::CollisionEvent;
pub use debug::{Color, DebugCollector, Figure};
pub use error::SimError;
pub use snapshot::{BallSnapshot, PackSnapshot, RobotSnapshot, Snapshot};
pub use state::{Action, Ball, Body, MatchState, NitroPack, Robot, Team};
