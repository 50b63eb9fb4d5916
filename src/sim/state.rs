//! Game state and the run-modifier record
//!
//! A `GameState` is one tick's complete snapshot: the shared level, the
//! live actor list, the outcome status, the run-local sim clock, and the
//! power-up expiry record. Ticks never mutate a state in place; `tick`
//! builds the successor from scratch.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::actor::{Actor, Player};
use super::level::Level;
use crate::tuning::Tuning;

/// Level outcome state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Simulation live; collisions resolve
    Playing,
    /// Last goal actor collected
    Won,
    /// Lethal contact
    Lost,
}

/// Things a tick's collision handlers did, for the run controller to drain.
/// Transient: each tick starts with an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    LifeCollected,
    ShieldActivated,
    SpeedBoost,
    JumpBoost,
    StarCollected,
    MonsterStomped,
}

/// Power-up windows as expiry instants on the sim clock.
///
/// This replaces wall-clock timers entirely: a window is active while
/// `now < until`, and a fresh state (new level attempt) resets everything,
/// so no stale boost can leak into the next attempt.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunModifiers {
    pub shield_until: f32,
    pub speed_until: f32,
    pub jump_until: f32,
}

impl RunModifiers {
    #[inline]
    pub fn shield_active(&self, now: f32) -> bool {
        now < self.shield_until
    }

    #[inline]
    pub fn speed_boosted(&self, now: f32) -> bool {
        now < self.speed_until
    }

    #[inline]
    pub fn jump_boosted(&self, now: f32) -> bool {
        now < self.jump_until
    }
}

/// One tick's complete simulation snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Shared, read-only level geometry
    pub level: Arc<Level>,
    /// Shared balance constants
    pub tuning: Arc<Tuning>,
    /// Plan order; also z-order and find-first-player order
    pub actors: Vec<Actor>,
    pub status: Status,
    /// Seconds of simulated time in this attempt
    pub time: f32,
    pub modifiers: RunModifiers,
    /// Collision events from the tick that produced this state
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state at the start of a level attempt. The seed drives the
    /// initial wobble phases and nothing else.
    pub fn start(level: Arc<Level>, tuning: Arc<Tuning>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let actors = level
            .start_actors
            .iter()
            .map(|s| Actor::spawn(s, &mut rng))
            .collect();
        Self {
            level,
            tuning,
            actors,
            status: Status::Playing,
            time: 0.0,
            modifiers: RunModifiers::default(),
            events: Vec::new(),
        }
    }

    /// First player in actor order. Present whenever the status is
    /// `Playing`; a linear scan is fine at these actor counts.
    pub fn player(&self) -> Option<&Player> {
        self.actors.iter().find_map(|a| match a {
            Actor::Player(p) => Some(p),
            _ => None,
        })
    }

    #[inline]
    pub fn shield_active(&self) -> bool {
        self.modifiers.shield_active(self.time)
    }

    /// Any coin or star left to collect?
    pub fn goal_remaining(&self) -> bool {
        self.actors.iter().any(Actor::is_goal)
    }
}
