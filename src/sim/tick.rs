//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use glam::Vec2;

use super::state::GameState;
use super::{behavior, effects, resolve, spawner};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Normalized hand point for this tick (None = no detection, hold)
    pub point: Option<Vec2>,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;
    state.time_ms += TICK_MS as f64;

    let adapter = state.input.clone();
    adapter.apply(&mut state.player, input.point, state.viewport);

    if state.is_playing() {
        behavior::update(state);
        spawner::update(state);
        resolve::update(state);
        resolve::update_timers(state, TICK_MS);
    }

    effects::update(state);
}
