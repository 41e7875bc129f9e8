//! Session state machine: phase, score, level, and the displayed problem.
//!
//! One `GameState` per game instance; restart replaces it rather than
//! resuming. All phase transitions live here and the terminal transitions
//! are idempotent, so end-of-game side effects fire at most once.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::World;
use super::problem;
use crate::config::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for input
    Menu,
    /// Narrative intro playing (driven by the external timeline player)
    Opening,
    /// Active gameplay
    Playing,
    /// Suspended; elapsed time while paused never reaches the simulation
    Paused,
    /// Run ended, by defeat or victory
    GameOver,
}

/// Discrete notifications for the external audio/visual layer.
///
/// The core never calls rendering or audio APIs; hosts drain these once per
/// frame and dispatch them to the active theme's cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Correct,
    Incorrect,
    EnemyHit,
    LevelUp,
    BossSpawn,
    GameOver,
    Victory,
}

impl GameEvent {
    /// Stable key used for theme cue lookup and DOM event dispatch
    pub fn as_str(self) -> &'static str {
        match self {
            GameEvent::Correct => "correct",
            GameEvent::Incorrect => "incorrect",
            GameEvent::EnemyHit => "enemyHit",
            GameEvent::LevelUp => "levelUp",
            GameEvent::BossSpawn => "bossSpawn",
            GameEvent::GameOver => "gameOver",
            GameEvent::Victory => "victory",
        }
    }
}

/// Complete session state for one game instance.
pub struct GameState {
    /// Run seed, for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Derived from score, recomputed on every score change, never decremented
    pub level: u32,
    /// Expected keypad answer; absent outside Playing or before the first problem
    pub current_answer: Option<u8>,
    /// Text of the displayed problem, read by the UI layer each frame
    pub problem_text: String,
    /// Latched true when the boss fight begins; never reset within a game
    pub boss_active: bool,
    pub world: World,
    pub tuning: Tuning,
    /// Simulation tick counter (animation clocks, logging)
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            current_answer: None,
            problem_text: String::new(),
            boss_active: false,
            world: World::new(),
            tuning,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Menu → Opening. The external narrative player takes over; the host
    /// reports completion through `TickInput::opening_complete`.
    pub fn start_opening(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::Opening;
        }
    }

    /// (Menu | Opening | GameOver) → Playing, from scratch.
    ///
    /// Fires the seed shot: the first problem appears even before the first
    /// enemy spawns.
    pub fn start_game(&mut self) {
        match self.phase {
            GamePhase::Menu | GamePhase::Opening | GamePhase::GameOver => {}
            _ => return,
        }
        self.score = 0;
        self.level = 1;
        self.boss_active = false;
        self.world = World::new();
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.fire(true);
        log::info!("game started (seed: {})", self.seed);
    }

    /// Playing ⇄ Paused. The driver excludes paused wall time from Δt.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Playing → GameOver (defeat). Idempotent: a second call is a no-op.
    pub fn trigger_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.current_answer = None;
        self.events.push(GameEvent::GameOver);
        log::info!("game over at score {} (level {})", self.score, self.level);
    }

    /// Playing → GameOver (boss defeated). Idempotent, mutually exclusive
    /// with `trigger_game_over` through the shared phase guard.
    pub fn trigger_victory(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.current_answer = None;
        self.events.push(GameEvent::Victory);
        log::info!("victory at score {}", self.score);
    }

    /// Discard everything and begin a fresh run with a new seed.
    pub fn restart(&mut self, seed: u64) {
        *self = GameState::new(seed, self.tuning.clone());
        self.start_game();
    }

    /// Add score and recompute level. Emits `LevelUp` exactly once per
    /// threshold crossing; score never decreases, so recompute is monotonic.
    pub fn award_score(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.score += amount;
        let level = self.tuning.level_for_score(self.score);
        if level > self.level {
            self.level = level;
            self.events.push(GameEvent::LevelUp);
            log::info!("level up: {level}");
        }
    }

    /// Handle a keypad press during Playing.
    pub fn submit_answer(&mut self, digit: u8) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(answer) = self.current_answer else {
            return;
        };
        if digit == answer {
            self.events.push(GameEvent::Correct);
            self.award_score(self.tuning.score_per_correct_answer);
            self.fire(false);
        } else {
            self.events.push(GameEvent::Incorrect);
        }
    }

    /// Fire at the current target and roll the next problem.
    ///
    /// The seed shot at game start regenerates the problem even when there is
    /// nothing to shoot yet; afterwards the problem only advances when a
    /// projectile actually launches.
    fn fire(&mut self, seed_shot: bool) {
        let fired = self.world.fire();
        if fired || seed_shot {
            let problem = problem::generate(self.level, &mut self.rng);
            self.current_answer = Some(problem.answer);
            self.problem_text = problem.text;
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<GameEvent> {
        &mut self.events
    }

    /// Take this frame's notifications for dispatch to the theme layer.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
