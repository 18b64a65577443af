//! Collision & progression: eat or be eaten
//!
//! Owns every mutation of health, score and player size.

use super::effects::{emit_particles, emit_shockwave};
use super::state::{Fish, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Burst sizes
const EAT_PARTICLES: usize = 14;
const HURT_PARTICLES: usize = 18;
const HURT_COLOR: [u8; 3] = [235, 40, 40];

/// Hit shake: `min(cap, size_k·size/scale + speed_k·speed/scale)·scale`
const HIT_SHAKE_SIZE: f32 = 0.12;
const HIT_SHAKE_SPEED: f32 = 2.0;
const HIT_SHAKE_MAX: f32 = 24.0;

/// Eat shockwave reach beyond the fish (before scaling)
const SHOCKWAVE_REACH: f32 = 40.0;

/// Points for eating a fish of `size`
pub fn score_for(size: f32, scale: f32) -> u64 {
    (size / scale).floor().max(0.0) as u64
}

/// Centers closer than 0.6 × summed sizes
pub fn overlaps(player: &Fish, enemy: &Fish) -> bool {
    player.pos.distance(enemy.pos) < COLLISION_FACTOR * (player.size + enemy.size)
}

/// Shake caused by being hit by `attacker`
pub fn hit_shake(attacker: &Fish, scale: f32) -> f32 {
    let raw = HIT_SHAKE_SIZE * attacker.size / scale + HIT_SHAKE_SPEED * attacker.speed / scale;
    raw.min(HIT_SHAKE_MAX) * scale
}

/// Drop enemies that left the playfield by more than the cull margin.
/// Fish still swimming inward are kept, since big spawns start past it.
pub fn cull_offscreen(state: &mut GameState) {
    let margin = CULL_MARGIN * state.scale;
    let right = state.viewport.width + margin;
    state.enemies.retain(|e| {
        let gone_left = e.pos.x < -margin && e.vel.x <= 0.0;
        let gone_right = e.pos.x > right && e.vel.x >= 0.0;
        !(gone_left || gone_right)
    });
}

/// Player eats `enemy` (already removed from the active set)
pub fn consume_enemy(state: &mut GameState, enemy: Fish) {
    state.player.size += GROWTH_FACTOR * enemy.size;
    state.score += score_for(enemy.size, state.scale);
    if state.invulnerable_ms <= 0.0 {
        state.health = (state.health + EAT_HEAL).min(MAX_HEALTH);
    }

    emit_particles(state, enemy.pos, EAT_PARTICLES, enemy.size * 0.5, Some(enemy.color));
    let max_radius = enemy.size * 3.0 + SHOCKWAVE_REACH * state.scale;
    emit_shockwave(state, enemy.pos, enemy.size, max_radius, enemy.color);

    state.events.push(GameEvent::Eat {
        score: state.score,
        size: state.player.size,
        variant: enemy.variant,
    });
}

/// Apply a hit from `attacker`; returns false while invulnerable
pub fn damage_player(state: &mut GameState, attacker: &Fish) -> bool {
    if state.invulnerable_ms > 0.0 || state.phase != GamePhase::Playing {
        return false;
    }

    let damage = attacker.variant.config().damage;
    state.health = (state.health - damage).max(0.0);
    state.damage_flash = 1.0;
    state.screen_shake = state.screen_shake.max(hit_shake(attacker, state.scale));
    state.invulnerable_ms = INVULNERABILITY_MS;
    state.last_attacker = Some(attacker.variant);

    let at = state.player.pos;
    let spread = state.player.size;
    emit_particles(state, at, HURT_PARTICLES, spread, Some(HURT_COLOR));

    state.events.push(GameEvent::Hurt {
        variant: attacker.variant,
        health: state.health,
    });

    if state.health <= 0.0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            final_score: state.score,
            final_size: state.player.size,
            cause: attacker.variant,
        });
    }
    true
}

/// Resolve every player/enemy contact for this tick
pub fn update(state: &mut GameState) {
    cull_offscreen(state);

    let mut i = 0;
    while i < state.enemies.len() && state.phase == GamePhase::Playing {
        if !overlaps(&state.player, &state.enemies[i]) {
            i += 1;
            continue;
        }
        // Ties favor the player
        if state.player.size >= state.enemies[i].size {
            let eaten = state.enemies.remove(i);
            consume_enemy(state, eaten);
        } else {
            let attacker = state.enemies[i].clone();
            damage_player(state, &attacker);
            i += 1;
        }
    }
}

/// Count down invulnerability; regenerate only once it has expired
pub fn update_timers(state: &mut GameState, dt_ms: f32) {
    if state.invulnerable_ms > 0.0 {
        state.invulnerable_ms = (state.invulnerable_ms - dt_ms).max(0.0);
    } else if state.phase == GamePhase::Playing {
        state.health = (state.health + HEALTH_REGEN_PER_SEC * dt_ms / 1000.0).min(MAX_HEALTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::tuning::Variant;
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup(w: f32) -> GameState {
        let mut state = GameState::new(Viewport::new(w, w), 9);
        state.player.pos = Vec2::new(w / 2.0, w / 2.0);
        state
    }

    fn fish_at(state: &mut GameState, variant: Variant, offset: f32, size: f32) -> Fish {
        Fish {
            id: state.next_entity_id(),
            pos: state.player.pos + Vec2::new(offset, 0.0),
            vel: Vec2::ZERO,
            size,
            color: variant.config().color,
            speed: 2.0,
            phase: 0.0,
            variant,
        }
    }

    #[test]
    fn test_consume_grows_and_scores() {
        // scale 0.5 so the score divides by scale
        let mut state = setup(400.0);
        state.health = 50.0;
        let start = state.player.size;
        let prey = fish_at(&mut state, Variant::Prey, 1.0, 7.3);
        state.enemies.push(prey);

        update(&mut state);

        assert!(state.enemies.is_empty());
        assert!((state.player.size - (start + 0.73)).abs() < 1e-5);
        assert_eq!(state.score, 14); // floor(7.3 / 0.5)
        assert_eq!(state.health, 60.0);
        assert_eq!(state.shockwaves.len(), 1);
        assert!(!state.particles.is_empty());
        assert!(matches!(state.events[0], GameEvent::Eat { score: 14, .. }));
    }

    #[test]
    fn test_tie_goes_to_player() {
        let mut state = setup(800.0);
        let size = state.player.size;
        let twin = fish_at(&mut state, Variant::Hunter, 1.0, size);
        state.enemies.push(twin);
        update(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.health, 100.0);
    }

    #[test]
    fn test_heal_is_capped() {
        let mut state = setup(800.0);
        let prey = fish_at(&mut state, Variant::Prey, 0.0, 10.0);
        state.enemies.push(prey);
        update(&mut state);
        assert_eq!(state.health, 100.0);
    }

    #[test]
    fn test_no_collision_outside_range() {
        let mut state = setup(800.0);
        let reach = 0.6 * (state.player.size + 10.0);
        let prey = fish_at(&mut state, Variant::Prey, reach + 0.01, 10.0);
        state.enemies.push(prey);
        update(&mut state);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_damage_sets_window_and_flash() {
        let mut state = setup(800.0);
        let hunter = fish_at(&mut state, Variant::Hunter, 1.0, 50.0);
        state.enemies.push(hunter);

        update(&mut state);
        assert_eq!(state.health, 65.0);
        assert_eq!(state.invulnerable_ms, 1500.0);
        assert_eq!(state.damage_flash, 1.0);
        assert!(state.screen_shake > 0.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_attacker, Some(Variant::Hunter));

        // Still overlapping but invulnerable
        update(&mut state);
        assert_eq!(state.health, 65.0);
    }

    #[test]
    fn test_titan_hits_harder() {
        let mut state = setup(800.0);
        let titan = fish_at(&mut state, Variant::Titan, 1.0, 80.0);
        damage_player(&mut state, &titan);
        assert_eq!(state.health, 40.0);
    }

    #[test]
    fn test_hit_shake_is_clamped() {
        let mut state = setup(800.0);
        let mut huge = fish_at(&mut state, Variant::Titan, 0.0, 5000.0);
        huge.speed = 100.0;
        assert_eq!(hit_shake(&huge, 1.0), 24.0);
        assert_eq!(hit_shake(&huge, 0.5), 12.0);
    }

    #[test]
    fn test_game_over_exactly_once_with_cause() {
        let mut state = setup(800.0);
        let hunter = fish_at(&mut state, Variant::Hunter, 1.0, 50.0);
        let titan = fish_at(&mut state, Variant::Titan, 2.0, 90.0);
        assert!(damage_player(&mut state, &hunter));
        state.invulnerable_ms = 0.0;
        assert!(damage_player(&mut state, &titan));
        assert_eq!(state.health, 5.0);
        state.invulnerable_ms = 0.0;
        assert!(damage_player(&mut state, &hunter));
        assert_eq!(state.health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.invulnerable_ms = 0.0;
        assert!(!damage_player(&mut state, &titan));

        let overs: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect();
        assert_eq!(overs, vec![Variant::Hunter]);
    }

    #[test]
    fn test_offscreen_enemies_are_culled_before_collision() {
        let mut state = setup(800.0);
        let mut far = fish_at(&mut state, Variant::Prey, 0.0, 10.0);
        far.pos.x = -301.0;
        let mut edge = far.clone();
        edge.pos.x = 1099.0;
        state.enemies.push(far);
        state.enemies.push(edge);
        update(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos.x, 1099.0);
    }

    #[test]
    fn test_inbound_giants_survive_cull() {
        let mut state = setup(800.0);
        state.player.size = 100.0;
        let mut titans = 0;
        for _ in 0..2000 {
            let fish = crate::sim::spawner::spawn_enemy(&mut state);
            let variant = fish.variant;
            state.enemies.clear();
            state.enemies.push(fish);
            update(&mut state);
            assert_eq!(state.enemies.len(), 1, "{variant:?} culled on spawn");
            if variant == Variant::Titan {
                titans += 1;
            }
        }
        assert!(titans > 0);

        // Same position, swimming away: gone
        let mut leaving = fish_at(&mut state, Variant::Titan, 0.0, 300.0);
        leaving.pos.x = -700.0;
        leaving.vel.x = -1.0;
        state.enemies = vec![leaving];
        update(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_no_regen_while_invulnerable() {
        let mut state = setup(800.0);
        state.health = 50.0;
        state.invulnerable_ms = 1500.0;
        let mut last = state.invulnerable_ms;
        while state.invulnerable_ms > 0.0 {
            update_timers(&mut state, TICK_MS);
            assert!(state.invulnerable_ms < last);
            assert_eq!(state.health, 50.0);
            last = state.invulnerable_ms;
        }
        assert_eq!(state.invulnerable_ms, 0.0);
        update_timers(&mut state, 1000.0);
        assert!((state.health - 53.0).abs() < 1e-4);
    }

    #[test]
    fn test_eating_while_invulnerable_does_not_heal() {
        let mut state = setup(800.0);
        state.health = 40.0;
        state.invulnerable_ms = 500.0;
        let prey = fish_at(&mut state, Variant::Prey, 0.0, 10.0);
        state.enemies.push(prey);
        update(&mut state);
        assert_eq!(state.health, 40.0);
        assert_eq!(state.score, 10);
    }

    proptest! {
        #[test]
        fn sizes_stay_positive(sizes in proptest::collection::vec(0.5f32..200.0, 1..20)) {
            let mut state = setup(800.0);
            for s in sizes {
                let e = fish_at(&mut state, Variant::Hunter, 0.0, s);
                state.enemies.push(e);
                update(&mut state);
                update_timers(&mut state, 2000.0);
                prop_assert!(state.player.size > 0.0);
                prop_assert!(state.enemies.iter().all(|e| e.size > 0.0));
                prop_assert!((0.0..=100.0).contains(&state.health));
            }
        }
    }
}
