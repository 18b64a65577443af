//! Enemy spawning with density-maintaining interval control

use glam::Vec2;
use rand::Rng;

use super::state::{Fish, GameState};
use crate::tuning::{
    PREDATOR_CHANCE, PREY_MAX_SIZE, PREY_MIN_SIZE, Variant, predator_for_roll,
};

/// Interval floor/ceiling from score scaling (ms)
pub const MIN_SPAWN_INTERVAL_MS: f64 = 600.0;
pub const BASE_SPAWN_INTERVAL_MS: f64 = 1500.0;
/// Interval shrinks by this much per point of score
pub const SPAWN_INTERVAL_PER_POINT: f64 = 5.0;

/// Below this many live enemies the interval drops to `SPARSE_INTERVAL_MS`
pub const SPARSE_ENEMY_COUNT: usize = 8;
pub const SPARSE_INTERVAL_MS: f64 = 300.0;
/// Below this many the interval is capped at `THIN_INTERVAL_CAP_MS`
pub const THIN_ENEMY_COUNT: usize = 15;
pub const THIN_INTERVAL_CAP_MS: f64 = 800.0;

/// Vertical spawn margin (before scaling)
pub const SPAWN_MARGIN_Y: f32 = 50.0;

/// Milliseconds between spawns for the given score and live enemy count
pub fn spawn_interval_ms(score: u64, live_enemies: usize) -> f64 {
    let base = (BASE_SPAWN_INTERVAL_MS - SPAWN_INTERVAL_PER_POINT * score as f64)
        .max(MIN_SPAWN_INTERVAL_MS);
    if live_enemies < SPARSE_ENEMY_COUNT {
        SPARSE_INTERVAL_MS
    } else if live_enemies < THIN_ENEMY_COUNT {
        base.min(THIN_INTERVAL_CAP_MS)
    } else {
        base
    }
}

/// Called once per tick; adds at most one enemy
pub fn update(state: &mut GameState) -> bool {
    let interval = spawn_interval_ms(state.score, state.enemies.len());
    if state.time_ms - state.last_spawn_ms <= interval {
        return false;
    }
    state.last_spawn_ms = state.time_ms;
    let fish = spawn_enemy(state);
    state.enemies.push(fish);
    true
}

/// Pick a variant: predator branch first, then the predator bands
pub fn roll_variant(rng: &mut impl Rng) -> Variant {
    if rng.random::<f32>() < PREDATOR_CHANCE {
        predator_for_roll(rng.random::<f32>())
    } else {
        Variant::Prey
    }
}

/// Build a new enemy just off the left or right edge
pub fn spawn_enemy(state: &mut GameState) -> Fish {
    let id = state.next_entity_id();
    let scale = state.scale;
    let viewport = state.viewport;
    let player_size = state.player.size;
    let rng = &mut state.rng;

    let variant = roll_variant(rng);
    let config = variant.config();

    let (lo, hi) = config.size_range;
    let mut size = player_size * rng.random_range(lo..=hi);
    if variant == Variant::Prey {
        size = size.clamp(PREY_MIN_SIZE * scale, PREY_MAX_SIZE * scale);
    }

    let (slo, shi) = config.speed_range;
    let speed = rng.random_range(slo..=shi) * scale;

    let margin = SPAWN_MARGIN_Y * scale;
    let y = if viewport.height > 2.0 * margin {
        rng.random_range(margin..viewport.height - margin)
    } else {
        viewport.height * 0.5
    };

    let from_left = rng.random_bool(0.5);
    let (x, dir) = if from_left {
        (-2.0 * size, 1.0)
    } else {
        (viewport.width + 2.0 * size, -1.0)
    };

    Fish {
        id,
        pos: Vec2::new(x, y),
        vel: Vec2::new(dir * speed, 0.0),
        size,
        color: config.color,
        speed,
        phase: rng.random_range(0.0..1000.0),
        variant,
    }
}
