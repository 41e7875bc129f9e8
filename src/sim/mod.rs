//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod entities;
pub mod problem;
pub mod state;
pub mod tick;

pub use entities::{Boss, Enemy, Projectile, Target, TickOutcome, World};
pub use problem::{Problem, generate};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
