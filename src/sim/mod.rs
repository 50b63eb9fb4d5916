//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as the `dt` argument
//! - Seeded RNG only, and only at level start
//! - Stable actor order (plan order)
//! - No rendering, input, or platform dependencies

pub mod actor;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorKind, LavaMotion};
pub use collision::overlap;
pub use level::{ActorSeed, LavaStyle, Level, LevelError, SeedKind, TileKind};
pub use state::{GameEvent, GameState, RunModifiers, Status};
pub use tick::{Intent, tick};
