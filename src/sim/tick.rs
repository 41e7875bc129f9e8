//! Fixed timestep session tick.
//!
//! One call advances the whole game by `dt`: input handling, phase
//! transitions, entity simulation, score/level bookkeeping, and the boss
//! trigger. Hosts call this through the [`crate::driver`] accumulator.

use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Begin the opening narrative from the menu
    pub start: bool,
    /// The external narrative player finished; begin gameplay
    pub opening_complete: bool,
    /// Pause toggle
    pub pause: bool,
    /// Keypad press, 1-9
    pub digit: Option<u8>,
    /// Restart from game over with a fresh seed
    pub restart: Option<u64>,
    /// Attract mode: answer the displayed problem automatically
    pub auto_answer: bool,
}

/// Advance the session by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_opening();
            }
        }
        GamePhase::Opening => {
            // The narrative timeline runs outside the core; we only act on
            // its completion signal.
            if input.opening_complete {
                state.start_game();
            }
        }
        GamePhase::Paused => {}
        GamePhase::GameOver => {
            if let Some(seed) = input.restart {
                state.restart(seed);
            }
        }
        GamePhase::Playing => playing_tick(state, input, dt),
    }
}

fn playing_tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    let digit = if input.auto_answer {
        state.current_answer
    } else {
        input.digit
    };
    if let Some(d) = digit {
        state.submit_answer(d);
    }

    // Entity simulation. Defeat detected inside the world update has already
    // short-circuited boss/projectile work for this tick.
    let mut events = std::mem::take(state.events_mut());
    let outcome = state
        .world
        .update(dt, state.level, &state.tuning, &mut state.rng, &mut events);
    *state.events_mut() = events;

    state.award_score(outcome.score);

    if outcome.defeat {
        state.trigger_game_over();
        return;
    }
    if outcome.victory {
        state.trigger_victory();
        return;
    }

    // Boss trigger: latched, at most once per game
    if !state.boss_active && state.score >= state.tuning.boss_trigger_score {
        state.boss_active = true;
        state.world.engage_boss(&state.tuning);
        state.push_event(GameEvent::BossSpawn);
    }
}
