//! External match snapshot
//!
//! The feed that drives a live match hands the strategy layer a plain
//! description of the world once per tick. A rollout starts by converting
//! that snapshot into an owned [`MatchState`]; nothing here is touched again
//! until the next rollout.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Body, MatchState, NitroPack, Robot, Team};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub id: i32,
    pub is_teammate: bool,
    pub position: DVec3,
    pub velocity: DVec3,
    pub radius: f64,
    /// Contact normal when the robot is touching a surface
    pub touch_normal: Option<DVec3>,
    pub nitro: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: DVec3,
    pub velocity: DVec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSnapshot {
    pub position: DVec3,
    /// Remaining cooldown; absent or zero means available
    #[serde(default)]
    pub respawn_ticks: u32,
}

/// One complete observation of the live match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_tick: u32,
    /// Id of the controlled robot
    pub me_id: i32,
    pub robots: Vec<RobotSnapshot>,
    pub ball: BallSnapshot,
    #[serde(default)]
    pub nitro_packs: Vec<PackSnapshot>,
}

impl MatchState {
    /// Build a rollout state from a live match snapshot. Robots end up
    /// sorted by id and the goal condition is evaluated immediately, so a
    /// snapshot taken after a score produces an already-terminal state.
    pub fn from_snapshot(snapshot: &Snapshot, seed: u64) -> Self {
        let robots = snapshot
            .robots
            .iter()
            .map(|r| Robot {
                id: r.id,
                team: if r.is_teammate {
                    Team::Own
                } else {
                    Team::Opposing
                },
                body: Body {
                    position: r.position,
                    velocity: r.velocity,
                    radius: r.radius,
                    radius_change_speed: 0.0,
                },
                touch_normal: r.touch_normal,
                nitro: r.nitro,
                action: Default::default(),
            })
            .collect();

        let packs = snapshot
            .nitro_packs
            .iter()
            .map(|p| NitroPack {
                position: p.position,
                radius: NITRO_PACK_RADIUS,
                respawn_ticks: p.respawn_ticks,
            })
            .collect();

        let mut state = MatchState::new(
            Ball::new(snapshot.ball.position, snapshot.ball.velocity),
            robots,
            packs,
            snapshot.me_id,
            seed,
        );
        state.tick = snapshot.current_tick;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            current_tick: 17,
            me_id: 2,
            robots: vec![
                RobotSnapshot {
                    id: 3,
                    is_teammate: false,
                    position: DVec3::new(5.0, 1.0, 10.0),
                    velocity: DVec3::ZERO,
                    radius: ROBOT_MIN_RADIUS,
                    touch_normal: Some(DVec3::Y),
                    nitro: 0.0,
                },
                RobotSnapshot {
                    id: 2,
                    is_teammate: true,
                    position: DVec3::new(-5.0, 1.0, -10.0),
                    velocity: DVec3::new(1.0, 0.0, 0.0),
                    radius: ROBOT_MIN_RADIUS,
                    touch_normal: Some(DVec3::Y),
                    nitro: START_NITRO_AMOUNT,
                },
            ],
            ball: BallSnapshot {
                position: DVec3::new(0.0, 5.0, 0.0),
                velocity: DVec3::ZERO,
            },
            nitro_packs: vec![PackSnapshot {
                position: DVec3::new(20.0, 1.0, 30.0),
                respawn_ticks: 0,
            }],
        }
    }

    #[test]
    fn builds_sorted_match_state() {
        let state = MatchState::from_snapshot(&sample(), 5);
        assert_eq!(state.tick, 17);
        assert_eq!(state.me().unwrap().id, 2);
        let ids: Vec<i32> = state.robots().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(state.robot(3).unwrap().team, Team::Opposing);
        assert!(state.nitro_packs[0].available());
        assert_eq!(state.scored(), 0);
    }

    #[test]
    fn json_round_trip() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn missing_packs_default_to_empty() {
        let json = r#"{
            "current_tick": 0,
            "me_id": 1,
            "robots": [],
            "ball": { "position": [0.0, 5.0, 0.0], "velocity": [0.0, 0.0, 0.0] }
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.nitro_packs.is_empty());
        let state = MatchState::from_snapshot(&snapshot, 0);
        assert!(state.robots().is_empty());
    }

    #[test]
    fn terminal_snapshot_stays_terminal() {
        let mut snapshot = sample();
        snapshot.ball.position = DVec3::new(0.0, 5.0, -43.0);
        let state = MatchState::from_snapshot(&snapshot, 0);
        assert_eq!(state.scored(), -1);
    }
}
