//! Numeric game balance, overridable wholesale by the active theme.
//!
//! The tuning table is read-only after a game is constructed; a theme switch
//! rebuilds the session rather than mutating tuning in place. Values are
//! deserialized with per-field defaults so a theme file only needs to list
//! what it changes.
//!
//! Precondition (not checked defensively): all rates and durations are
//! positive, and the toughness chance stays below 1 for reachable levels.

use serde::{Deserialize, Serialize};

/// The tuning table consumed by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Live enemy cap; spawn attempts beyond it are rejected
    pub max_enemies: usize,
    /// Score at which the boss fight begins (latched, once per game)
    pub boss_trigger_score: u32,
    /// Boss hit points (one per boss-shot arrival)
    pub boss_hp: i32,
    /// Seconds for the boss to reach the player if undefeated
    pub boss_approach_duration: f32,
    /// Seconds between spawn attempts at level 1
    pub spawn_interval_base: f32,
    /// Per-level multiplier on the spawn interval (< 1 tightens cadence)
    pub spawn_level_scalar: f32,
    /// Depth units per second for a normal enemy at level 1
    pub enemy_base_speed: f32,
    /// Speed multiplier for tough enemies (< 1: big and slow)
    pub enemy_tough_speed_modifier: f32,
    /// Per-level speed growth: speed *= 1 + (level-1) * (scalar - 1)
    pub enemy_level_speed_scalar: f32,
    /// Hit points for a normal enemy at level 1
    pub enemy_base_hp: i32,
    /// Extra hit points for tough enemies
    pub enemy_tough_hp_bonus: i32,
    /// Extra hit points per level (floored)
    pub enemy_level_hp_scalar: f32,
    /// Base probability a spawn is tough
    pub tough_chance_base: f32,
    /// Toughness probability added per level
    pub tough_chance_level_scalar: f32,
    /// Projectile progress per second (1.0 = full flight)
    pub projectile_speed: f32,
    /// Score for answering a problem correctly
    pub score_per_correct_answer: u32,
    /// Score for destroying a normal enemy
    pub score_per_kill: u32,
    /// Score for destroying a tough enemy
    pub score_per_tough_kill: u32,
    /// Score per level: level = score / score_to_level_up + 1
    pub score_to_level_up: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_enemies: 6,
            boss_trigger_score: 2000,
            boss_hp: 10,
            boss_approach_duration: 30.0,
            spawn_interval_base: 3.0,
            spawn_level_scalar: 0.9,
            enemy_base_speed: 0.025,
            enemy_tough_speed_modifier: 0.7,
            enemy_level_speed_scalar: 1.15,
            enemy_base_hp: 1,
            enemy_tough_hp_bonus: 2,
            enemy_level_hp_scalar: 0.34,
            tough_chance_base: 0.1,
            tough_chance_level_scalar: 0.03,
            projectile_speed: 2.5,
            score_per_correct_answer: 10,
            score_per_kill: 50,
            score_per_tough_kill: 100,
            score_to_level_up: 500,
        }
    }
}

impl Tuning {
    /// Spawn interval in seconds for a level (cadence tightens each level)
    pub fn spawn_interval(&self, level: u32) -> f32 {
        self.spawn_interval_base * self.spawn_level_scalar.powi(level as i32 - 1)
    }

    /// Enemy depth speed for a level and toughness
    pub fn enemy_speed(&self, level: u32, tough: bool) -> f32 {
        let base = if tough {
            self.enemy_base_speed * self.enemy_tough_speed_modifier
        } else {
            self.enemy_base_speed
        };
        base * (1.0 + (level - 1) as f32 * (self.enemy_level_speed_scalar - 1.0))
    }

    /// Enemy hit points for a level and toughness
    pub fn enemy_hp(&self, level: u32, tough: bool) -> i32 {
        let bonus = if tough { self.enemy_tough_hp_bonus } else { 0 };
        self.enemy_base_hp + bonus + ((level - 1) as f32 * self.enemy_level_hp_scalar).floor() as i32
    }

    /// Probability a spawn at this level is tough
    pub fn tough_chance(&self, level: u32) -> f32 {
        self.tough_chance_base + level as f32 * self.tough_chance_level_scalar
    }

    /// Level implied by a score (monotonic in score)
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.score_to_level_up + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_score_boundaries() {
        let t = Tuning::default();
        assert_eq!(t.level_for_score(0), 1);
        assert_eq!(t.level_for_score(499), 1);
        assert_eq!(t.level_for_score(500), 2);
        assert_eq!(t.level_for_score(999), 2);
        assert_eq!(t.level_for_score(1000), 3);
    }

    #[test]
    fn test_spawn_interval_tightens() {
        let t = Tuning::default();
        assert!((t.spawn_interval(1) - t.spawn_interval_base).abs() < 1e-6);
        assert!(t.spawn_interval(2) < t.spawn_interval(1));
        assert!(t.spawn_interval(5) < t.spawn_interval(2));
    }

    #[test]
    fn test_tough_enemies_slower_and_tougher() {
        let t = Tuning::default();
        assert!(t.enemy_speed(1, true) < t.enemy_speed(1, false));
        assert!(t.enemy_hp(1, true) > t.enemy_hp(1, false));
    }

    #[test]
    fn test_enemy_scaling_with_level() {
        let t = Tuning::default();
        assert!(t.enemy_speed(4, false) > t.enemy_speed(1, false));
        // hp bonus floors: level 4 adds floor(3 * 0.34) = 1
        assert_eq!(t.enemy_hp(4, false), t.enemy_base_hp + 1);
    }

    #[test]
    fn test_partial_override_from_json() {
        let t: Tuning = serde_json::from_str(r#"{"max_enemies": 3, "boss_hp": 1}"#).unwrap();
        assert_eq!(t.max_enemies, 3);
        assert_eq!(t.boss_hp, 1);
        assert_eq!(t.score_to_level_up, Tuning::default().score_to_level_up);
    }
}
