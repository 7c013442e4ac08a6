//! Simulation error types
//!
//! The engine is a closed numerical system; the only failures are
//! programming-invariant violations by the caller. Numerical edge cases are
//! handled by epsilon thresholds, not errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// A lookup referenced a robot id that is not part of the match.
    #[error("unknown robot id {0}")]
    UnknownRobot(i32),
}
