//! Host-agnostic frame driver.
//!
//! The host (browser `requestAnimationFrame`, a native timer, or a test)
//! reports wall-clock frames; the driver converts them into fixed-timestep
//! simulation ticks through an accumulator with a substep cap. Paused wall
//! time is discarded, so resuming never produces a Δt spike.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{GamePhase, GameState, TickInput, tick};

/// Longest frame gap fed into the accumulator (tab switches, debugger stops)
const MAX_FRAME_DT: f32 = 0.1;

/// Converts host frame callbacks into simulation ticks.
#[derive(Debug, Default)]
pub struct GameLoop {
    accumulator: f32,
    last_time: Option<f64>,
    /// Inputs staged by the host for the next tick; one-shot fields are
    /// cleared once a tick has consumed them
    pub input: TickInput,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one host frame at `now_secs` (wall clock, seconds).
    /// Returns the number of simulation ticks run.
    pub fn frame(&mut self, state: &mut GameState, now_secs: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((now_secs - last) as f32).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(now_secs);

        if state.phase == GamePhase::Paused {
            // Wall time spent paused never reaches the simulation; run a
            // zero-dt tick so the unpause input is still seen promptly.
            self.accumulator = 0.0;
            tick(state, &self.input, 0.0);
            self.clear_one_shot();
            return 0;
        }

        self.accumulator += dt.min(MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.input, SIM_DT);
            self.clear_one_shot();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Spiral-of-death guard: drop time we could not simulate
            self.accumulator = 0.0;
        }
        substeps
    }

    fn clear_one_shot(&mut self) {
        self.input.start = false;
        self.input.opening_complete = false;
        self.input.pause = false;
        self.input.digit = None;
        self.input.restart = None;
        // auto_answer is a mode, not a one-shot
    }
}
