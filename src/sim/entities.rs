//! Enemy, projectile, and boss simulation.
//!
//! The `World` exclusively owns the entity collections. It reports per-tick
//! outcomes (defeat, victory, score awarded) back to the session state
//! machine instead of mutating session state itself.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::GameEvent;
use crate::config::Tuning;
use crate::consts::*;
use crate::theme::EntityView;

/// Where boss-shot projectiles converge, in normalized screen space.
pub const BOSS_CENTER: Vec2 = Vec2::new(0.5, 0.3);

/// Where the player fires from.
pub const PLAYER_ORIGIN: Vec2 = Vec2::new(0.5, 1.0);

/// An approaching enemy. Position is fixed at spawn; only depth advances.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Depth in (0, 1]; reaching 0 means the enemy got through
    pub z: f32,
    pub speed: f32,
    pub hp: i32,
    pub spawn_hp: i32,
    pub tough: bool,
    /// Damped-spring wobble, purely visual
    pub angle: f32,
    pub angular_vel: f32,
}

impl Enemy {
    /// Advance depth and wobble for one tick
    fn advance(&mut self, dt: f32) {
        self.z -= self.speed * dt;
        self.angular_vel -= self.angle * WOBBLE_SPRING;
        self.angular_vel *= WOBBLE_DAMP;
        self.angle += self.angular_vel;
    }

    /// Fields the theme variant table may gate on
    pub fn view(&self) -> EntityView {
        EntityView {
            tough: self.tough,
            hp_frac: self.hp as f32 / self.spawn_hp.max(1) as f32,
            z: self.z,
        }
    }
}

/// What a projectile is flying at.
///
/// Enemy targets are held by id, never by reference: if the enemy dies to
/// another projectile first, arrival resolves as a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Enemy(u32),
    Boss,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub origin: Vec2,
    pub target: Target,
    /// Flight completion in [0, 1); arrival at 1 resolves damage
    pub progress: f32,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub hp: i32,
    spawn_hp: i32,
    elapsed: f32,
}

impl Boss {
    /// Time-based approach in [0, 1]; 1 means the boss arrived
    pub fn approach(&self, duration: f32) -> f32 {
        (self.elapsed / duration).min(1.0)
    }

    pub fn view(&self) -> EntityView {
        EntityView {
            tough: true,
            hp_frac: self.hp as f32 / self.spawn_hp.max(1) as f32,
            z: 1.0,
        }
    }
}

/// What one tick of entity simulation produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    /// An enemy reached depth 0 or the boss arrived
    pub defeat: bool,
    /// The boss was destroyed
    pub victory: bool,
    /// Score earned from kills this tick
    pub score: u32,
}

/// Owns all live entities for one game instance.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub boss: Option<Boss>,
    /// Seconds since the last successful spawn
    spawn_timer: f32,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_entity_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Attempt one spawn. Rejected (collection untouched) at capacity.
    pub fn try_spawn(&mut self, level: u32, tuning: &Tuning, rng: &mut Pcg32) -> bool {
        if self.enemies.len() >= tuning.max_enemies {
            return false;
        }
        let tough = rng.random::<f32>() < tuning.tough_chance(level);
        let hp = tuning.enemy_hp(level, tough);
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(
                rng.random_range(SPAWN_X_MIN..SPAWN_X_MAX),
                rng.random_range(SPAWN_Y_MIN..SPAWN_Y_MAX),
            ),
            z: 1.0,
            speed: tuning.enemy_speed(level, tough),
            hp,
            spawn_hp: hp,
            tough,
            angle: 0.0,
            angular_vel: rng.random_range(-HIT_KICK..HIT_KICK),
        });
        log::debug!("spawned enemy {id} (tough: {tough}, hp: {hp})");
        true
    }

    /// Advance the world by one tick.
    ///
    /// Defeat short-circuits: once an enemy reaches the player (or the boss
    /// arrives), the rest of this tick's simulation is skipped so nothing
    /// runs against an already-ended game.
    pub fn update(
        &mut self,
        dt: f32,
        level: u32,
        tuning: &Tuning,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        // Spawn cadence; suspended for the boss fight
        if self.boss.is_none() {
            self.spawn_timer += dt;
            if self.spawn_timer >= tuning.spawn_interval(level) && self.try_spawn(level, tuning, rng)
            {
                self.spawn_timer = 0.0;
            }
        }

        for enemy in &mut self.enemies {
            enemy.advance(dt);
            if enemy.z <= 0.0 {
                outcome.defeat = true;
            }
        }
        if outcome.defeat {
            return outcome;
        }

        if let Some(boss) = &mut self.boss {
            boss.elapsed += dt;
            if boss.approach(tuning.boss_approach_duration) >= 1.0 {
                outcome.defeat = true;
                return outcome;
            }
        }

        // Advance projectiles and resolve arrivals
        let mut arrived = Vec::new();
        for (i, proj) in self.projectiles.iter_mut().enumerate() {
            proj.progress += tuning.projectile_speed * dt;
            if proj.progress >= 1.0 {
                arrived.push(i);
            }
        }
        for &i in arrived.iter().rev() {
            let proj = self.projectiles.remove(i);
            self.resolve_arrival(proj.target, tuning, rng, events, &mut outcome);
        }

        outcome
    }

    /// At-most-once damage per projectile; a dead target is a silent no-op.
    fn resolve_arrival(
        &mut self,
        target: Target,
        tuning: &Tuning,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
        outcome: &mut TickOutcome,
    ) {
        match target {
            Target::Boss => {
                if let Some(boss) = &mut self.boss {
                    boss.hp -= 1;
                    events.push(GameEvent::EnemyHit);
                    if boss.hp <= 0 {
                        self.boss = None;
                        outcome.victory = true;
                    }
                }
            }
            Target::Enemy(id) => {
                let Some(idx) = self.enemies.iter().position(|e| e.id == id) else {
                    return; // already destroyed by another projectile
                };
                let enemy = &mut self.enemies[idx];
                enemy.hp -= 1;
                enemy.angular_vel += rng.random_range(-HIT_KICK..HIT_KICK);
                events.push(GameEvent::EnemyHit);
                if enemy.hp <= 0 {
                    outcome.score += if enemy.tough {
                        tuning.score_per_tough_kill
                    } else {
                        tuning.score_per_kill
                    };
                    self.enemies.remove(idx);
                }
            }
        }
    }

    /// Fire at the boss if engaged, else at the nearest enemy by depth.
    /// Returns whether a projectile was actually launched.
    pub fn fire(&mut self) -> bool {
        let target = if self.boss.is_some() {
            Target::Boss
        } else {
            match self
                .enemies
                .iter()
                .min_by(|a, b| a.z.total_cmp(&b.z))
                .map(|e| e.id)
            {
                Some(id) => Target::Enemy(id),
                None => return false,
            }
        };
        self.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target,
            progress: 0.0,
        });
        true
    }

    /// Enter boss mode: the field is cleared and the boss starts its approach.
    pub fn engage_boss(&mut self, tuning: &Tuning) {
        self.enemies.clear();
        self.projectiles.clear();
        self.boss = Some(Boss {
            hp: tuning.boss_hp,
            spawn_hp: tuning.boss_hp,
            elapsed: 0.0,
        });
        log::info!("boss engaged (hp: {})", tuning.boss_hp);
    }

    /// Screen-space point a projectile is heading for (for the renderer).
    pub fn target_point(&self, proj: &Projectile) -> Vec2 {
        match proj.target {
            Target::Boss => BOSS_CENTER,
            Target::Enemy(id) => self
                .enemies
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.pos)
                .unwrap_or(BOSS_CENTER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn world_with_enemy(z: f32, hp: i32) -> (World, u32) {
        let mut world = World::new();
        let id = world.next_entity_id();
        world.enemies.push(Enemy {
            id,
            pos: Vec2::new(0.5, 0.4),
            z,
            speed: 0.0,
            hp,
            spawn_hp: hp,
            tough: false,
            angle: 0.0,
            angular_vel: 0.0,
        });
        (world, id)
    }

    #[test]
    fn test_spawn_rejected_at_capacity() {
        let tuning = Tuning {
            max_enemies: 3,
            ..Default::default()
        };
        let mut world = World::new();
        let mut rng = rng();
        for _ in 0..3 {
            assert!(world.try_spawn(1, &tuning, &mut rng));
        }
        assert!(!world.try_spawn(1, &tuning, &mut rng));
        assert_eq!(world.enemies.len(), 3);
    }

    #[test]
    fn test_enemy_reaching_player_short_circuits_tick() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.001, 1);
        world.enemies[0].speed = 1.0;
        // A projectile about to arrive must not resolve on the defeat tick
        world.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target: Target::Enemy(id),
            progress: 0.99,
        });
        let mut events = Vec::new();
        let outcome = world.update(0.1, 1, &tuning, &mut rng(), &mut events);
        assert!(outcome.defeat);
        assert_eq!(outcome.score, 0);
        assert_eq!(world.projectiles.len(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_kill_awards_score_once() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.5, 1);
        world.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target: Target::Enemy(id),
            progress: 0.99,
        });
        let mut events = Vec::new();
        let outcome = world.update(0.1, 1, &tuning, &mut rng(), &mut events);
        assert_eq!(outcome.score, tuning.score_per_kill);
        assert!(world.enemies.is_empty());
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::EnemyHit).count(),
            1
        );
    }

    #[test]
    fn test_tough_kill_awards_tough_score() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.5, 1);
        world.enemies[0].tough = true;
        world.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target: Target::Enemy(id),
            progress: 0.99,
        });
        let mut events = Vec::new();
        let outcome = world.update(0.1, 1, &tuning, &mut rng(), &mut events);
        assert_eq!(outcome.score, tuning.score_per_tough_kill);
    }

    #[test]
    fn test_stale_target_is_silent_noop() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.5, 1);
        // Two projectiles race to the same enemy
        for _ in 0..2 {
            world.projectiles.push(Projectile {
                origin: PLAYER_ORIGIN,
                target: Target::Enemy(id),
                progress: 0.99,
            });
        }
        let mut events = Vec::new();
        let outcome = world.update(0.1, 1, &tuning, &mut rng(), &mut events);
        // Exactly one kill's worth of score, one hit notification
        assert_eq!(outcome.score, tuning.score_per_kill);
        assert_eq!(events.len(), 1);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_surviving_hit_applies_kick() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.5, 3);
        world.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target: Target::Enemy(id),
            progress: 0.99,
        });
        let mut events = Vec::new();
        world.update(0.1, 1, &tuning, &mut rng(), &mut events);
        assert_eq!(world.enemies[0].hp, 2);
        assert!(world.enemies[0].angular_vel != 0.0);
    }

    #[test]
    fn test_engage_boss_clears_field() {
        let tuning = Tuning::default();
        let (mut world, id) = world_with_enemy(0.5, 1);
        world.projectiles.push(Projectile {
            origin: PLAYER_ORIGIN,
            target: Target::Enemy(id),
            progress: 0.5,
        });
        world.engage_boss(&tuning);
        assert!(world.enemies.is_empty());
        assert!(world.projectiles.is_empty());
        assert_eq!(world.boss.as_ref().unwrap().hp, tuning.boss_hp);
    }

    #[test]
    fn test_boss_arrival_is_defeat() {
        let tuning = Tuning {
            boss_approach_duration: 1.0,
            ..Default::default()
        };
        let mut world = World::new();
        world.engage_boss(&tuning);
        let mut events = Vec::new();
        let outcome = world.update(1.5, 1, &tuning, &mut rng(), &mut events);
        assert!(outcome.defeat);
        assert!(!outcome.victory);
    }

    #[test]
    fn test_boss_shot_to_zero_is_victory() {
        let tuning = Tuning {
            boss_hp: 1,
            ..Default::default()
        };
        let mut world = World::new();
        world.engage_boss(&tuning);
        assert!(world.fire());
        assert_eq!(world.projectiles[0].target, Target::Boss);
        let mut events = Vec::new();
        let mut outcome = TickOutcome::default();
        // Let the projectile fly home
        for _ in 0..200 {
            outcome = world.update(crate::consts::SIM_DT, 1, &tuning, &mut rng(), &mut events);
            if outcome.victory {
                break;
            }
        }
        assert!(outcome.victory);
        assert!(!outcome.defeat);
        assert!(world.boss.is_none());
    }

    #[test]
    fn test_fire_targets_nearest_by_depth() {
        let (mut world, _) = world_with_enemy(0.8, 1);
        let near_id = world.next_entity_id();
        world.enemies.push(Enemy {
            id: near_id,
            pos: Vec2::new(0.2, 0.4),
            z: 0.3,
            speed: 0.0,
            hp: 1,
            spawn_hp: 1,
            tough: false,
            angle: 0.0,
            angular_vel: 0.0,
        });
        assert!(world.fire());
        assert_eq!(world.projectiles[0].target, Target::Enemy(near_id));
    }

    #[test]
    fn test_fire_with_empty_field_declines() {
        let mut world = World::new();
        assert!(!world.fire());
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_wobble_spring_converges() {
        let (mut world, _) = world_with_enemy(0.9, 1);
        world.enemies[0].angular_vel = 1.0;
        for _ in 0..2000 {
            world.enemies[0].advance(crate::consts::SIM_DT);
            assert!(world.enemies[0].angle.is_finite());
        }
        assert!(world.enemies[0].angle.abs() < 0.01);
    }

    #[test]
    fn test_enemy_view_feeds_variant_gates() {
        let (mut world, _) = world_with_enemy(0.2, 4);
        world.enemies[0].hp = 1;
        world.enemies[0].tough = true;
        let view = world.enemies[0].view();
        assert!(view.tough);
        assert!(view.hp_frac < 0.5);
        assert!(view.z < 0.25);
    }

    #[test]
    fn test_spawn_cadence_respects_interval() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let mut rng = rng();
        let mut events = Vec::new();
        // Half the base interval: no spawn yet
        world.update(tuning.spawn_interval_base / 2.0, 1, &tuning, &mut rng, &mut events);
        assert!(world.enemies.is_empty());
        // Crossing the interval spawns exactly one
        world.update(tuning.spawn_interval_base, 1, &tuning, &mut rng, &mut events);
        assert_eq!(world.enemies.len(), 1);
    }
}
