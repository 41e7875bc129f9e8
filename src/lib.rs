//! Mathstorm - a theme-skinnable arcade math-defense game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session state machine, entities, problems)
//! - `driver`: Host-agnostic fixed-timestep frame driver
//! - `config`: Numeric tuning table, overridable per theme
//! - `theme`: Theme data and the entity visual variant table
//!
//! Rendering, audio synthesis, and narrative playback are external
//! collaborators: the core exposes state reads and discrete [`sim::GameEvent`]
//! notifications, never draws or plays anything itself.

pub mod config;
pub mod driver;
pub mod sim;
pub mod theme;

pub use config::Tuning;
pub use theme::Theme;

/// Fixed engine constants (not theme-tunable)
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Enemy wobble spring stiffness (per tick)
    pub const WOBBLE_SPRING: f32 = 0.03;
    /// Enemy wobble damping (per tick, < 1 so the spring never diverges)
    pub const WOBBLE_DAMP: f32 = 0.92;
    /// Angular kick range applied when a projectile connects
    pub const HIT_KICK: f32 = 0.25;

    /// Spawn band in normalized screen space: wide in x, mid-field in y
    pub const SPAWN_X_MIN: f32 = 0.1;
    pub const SPAWN_X_MAX: f32 = 0.9;
    pub const SPAWN_Y_MIN: f32 = 0.35;
    pub const SPAWN_Y_MAX: f32 = 0.6;

    /// Tier-3 problem resample cap before falling back to an addition problem
    pub const PROBLEM_RETRY_CAP: u32 = 32;
}
