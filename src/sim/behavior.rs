//! Per-enemy steering: predator pursuit or ambient wander
//!
//! Predation is re-evaluated every tick (`size > player.size`), so an enemy
//! turns harmless the moment the player outgrows it.

use glam::Vec2;

use super::noise::{noise1, signed_noise1};
use super::state::{Fish, GameState};
use crate::consts::*;
use crate::tuning::{
    DANGER_INNER_RADIUS, TITAN_PULL_RADIUS, TITAN_PULL_STRENGTH, TITAN_SHAKE,
    TITAN_WANDER_FACTOR, VIPER_WEAVE_AMPLITUDE, VIPER_WEAVE_FREQUENCY, Variant,
};
use crate::{lerp, lerp_vec};

/// Wander noise rates (per ms of session time)
const WANDER_DRIFT_RATE: f32 = 0.0008;
const WANDER_SPEED_RATE: f32 = 0.0005;
/// Offset separating the two noise channels of one fish
const SPEED_CHANNEL_OFFSET: f32 = 517.0;
/// Vertical drift as a fraction of cruising speed
const WANDER_DRIFT: f32 = 0.5;

/// What an enemy does this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    Chase,
    Wander,
}

/// Chase iff strictly bigger than the player and inside detection range
pub fn classify(enemy: &Fish, player: &Fish, scale: f32) -> Steering {
    let detect = enemy.variant.config().detection_radius * scale;
    if enemy.is_predatory_to(player) && enemy.pos.distance(player.pos) < detect {
        Steering::Chase
    } else {
        Steering::Wander
    }
}

/// 1.0 at the inner radius, 0.0 at the detection radius
pub fn closeness(enemy: &Fish, player: &Fish, scale: f32) -> f32 {
    let detect = enemy.variant.config().detection_radius * scale;
    let inner = DANGER_INNER_RADIUS * scale + enemy.size + player.size;
    if detect <= inner {
        return 1.0;
    }
    let dist = enemy.pos.distance(player.pos);
    ((detect - dist) / (detect - inner)).clamp(0.0, 1.0)
}

/// Per-tick pursuit side effects that land on the player/session
#[derive(Debug, Default)]
struct Pursuit {
    pull: Vec2,
    shake_floor: f32,
    danger: f32,
}

fn chase(enemy: &mut Fish, player: &Fish, time_ms: f32, scale: f32, dashing: bool, out: &mut Pursuit) {
    let config = enemy.variant.config();
    let to_player = player.pos - enemy.pos;
    let dist = to_player.length();
    let dir = to_player.normalize_or_zero();

    let mut desired = dir * enemy.speed * config.chase_multiplier;
    if enemy.variant == Variant::Viper {
        let perp = dir.perp();
        let weave = (time_ms * VIPER_WEAVE_FREQUENCY + enemy.phase).sin();
        desired += perp * weave * VIPER_WEAVE_AMPLITUDE * enemy.speed;
    }

    let steering = if dashing {
        DASH_EVADE_STEERING
    } else {
        config.steering
    };
    enemy.vel = lerp_vec(enemy.vel, desired, steering);

    if enemy.variant == Variant::Titan {
        if dist < TITAN_PULL_RADIUS * scale {
            out.pull -= dir * TITAN_PULL_STRENGTH * scale;
        }
        if dist < 1.5 * (enemy.size + player.size) {
            out.shake_floor = out.shake_floor.max(TITAN_SHAKE * scale);
        }
    }

    out.danger = out.danger.max(closeness(enemy, player, scale));
}

fn wander(enemy: &mut Fish, time_ms: f32) {
    let drift = signed_noise1(enemy.phase + time_ms * WANDER_DRIFT_RATE);
    let pace = noise1(enemy.phase + SPEED_CHANNEL_OFFSET + time_ms * WANDER_SPEED_RATE);

    let heading = if enemy.vel.x < 0.0 { -1.0 } else { 1.0 };
    let mut cruise = enemy.speed * (0.5 + pace);
    if enemy.variant == Variant::Titan {
        cruise *= TITAN_WANDER_FACTOR;
    }
    let desired = Vec2::new(heading * cruise, drift * enemy.speed * WANDER_DRIFT);
    enemy.vel = lerp_vec(enemy.vel, desired, WANDER_STEERING);
}

/// Steer and move every enemy, apply titan suction, update danger
pub fn update(state: &mut GameState) {
    let scale = state.scale;
    let time_ms = state.time_ms as f32;
    let player = state.player.clone();
    let dashing = player.current_speed() > DASH_SPEED * scale;
    let height = state.viewport.height;

    let mut pursuit = Pursuit::default();
    for enemy in &mut state.enemies {
        match classify(enemy, &player, scale) {
            Steering::Chase => chase(enemy, &player, time_ms, scale, dashing, &mut pursuit),
            Steering::Wander => wander(enemy, time_ms),
        }

        enemy.pos += enemy.vel;
        // Stay in the water column
        if enemy.pos.y < enemy.size {
            enemy.pos.y = enemy.size;
            enemy.vel.y = enemy.vel.y.abs();
        } else if enemy.pos.y > height - enemy.size {
            enemy.pos.y = (height - enemy.size).max(enemy.size);
            enemy.vel.y = -enemy.vel.y.abs();
        }
    }

    if pursuit.pull != Vec2::ZERO {
        let p = state.player.pos + pursuit.pull;
        state.player.pos = p.clamp(Vec2::ZERO, Vec2::new(state.viewport.width, height));
    }
    state.screen_shake = state.screen_shake.max(pursuit.shake_floor);
    state.danger = lerp(state.danger, pursuit.danger, DANGER_SMOOTHING);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    fn setup() -> GameState {
        let mut state = GameState::new(Viewport::new(800.0, 800.0), 11);
        state.player.pos = Vec2::new(400.0, 400.0);
        state
    }

    fn enemy(state: &mut GameState, variant: Variant, pos: Vec2, size: f32) -> Fish {
        Fish {
            id: state.next_entity_id(),
            pos,
            vel: Vec2::ZERO,
            size,
            color: variant.config().color,
            speed: 2.0,
            phase: 3.0,
            variant,
        }
    }

    #[test]
    fn test_predator_boundary() {
        let mut state = setup();
        let p = state.player.size;
        let mut e = enemy(&mut state, Variant::Hunter, Vec2::new(300.0, 400.0), p - 1e-3);
        assert_eq!(classify(&e, &state.player, 1.0), Steering::Wander);
        e.size = p + 1e-3;
        assert_eq!(classify(&e, &state.player, 1.0), Steering::Chase);
        // Out of range never chases
        e.pos = Vec2::new(-1000.0, 400.0);
        assert_eq!(classify(&e, &state.player, 1.0), Steering::Wander);
    }

    #[test]
    fn test_enemy_flips_when_player_grows() {
        let mut state = setup();
        let e = enemy(&mut state, Variant::Hunter, Vec2::new(300.0, 400.0), 25.0);
        assert_eq!(classify(&e, &state.player, 1.0), Steering::Chase);
        state.player.size = 26.0;
        assert_eq!(classify(&e, &state.player, 1.0), Steering::Wander);
    }

    #[test]
    fn test_chase_blends_toward_player() {
        let mut state = setup();
        let e = enemy(&mut state, Variant::Hunter, Vec2::new(300.0, 400.0), 40.0);
        state.enemies.push(e);
        update(&mut state);
        // steering 0.06 toward (+2, 0)
        let vel = state.enemies[0].vel;
        assert!((vel.x - 0.12).abs() < 1e-4, "{vel:?}");
        assert!(vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_dashing_player_evades_lock_on() {
        let mut state = setup();
        let e = enemy(&mut state, Variant::Hunter, Vec2::new(300.0, 400.0), 40.0);
        state.enemies.push(e);
        state.player.vel = Vec2::new(16.0, 0.0);
        update(&mut state);
        let vel = state.enemies[0].vel;
        assert!((vel.x - 2.0 * DASH_EVADE_STEERING).abs() < 1e-4, "{vel:?}");
    }

    #[test]
    fn test_viper_weaves() {
        let mut state = setup();
        let e = enemy(&mut state, Variant::Viper, Vec2::new(300.0, 400.0), 40.0);
        state.enemies.push(e);
        state.time_ms = 250.0;
        update(&mut state);
        // Pursuit is along +x, so any y velocity comes from the weave
        assert!(state.enemies[0].vel.y.abs() > 1e-3);
    }

    #[test]
    fn test_titan_pulls_player_and_shakes() {
        let mut state = setup();
        let start = state.player.pos;
        let e = enemy(&mut state, Variant::Titan, Vec2::new(360.0, 400.0), 60.0);
        state.enemies.push(e);
        update(&mut state);
        assert!(state.player.pos.x < start.x);
        assert!((start.x - state.player.pos.x - TITAN_PULL_STRENGTH).abs() < 1e-4);
        assert!(state.screen_shake >= TITAN_SHAKE);
    }

    #[test]
    fn test_danger_is_smoothed() {
        let mut state = setup();
        let p = state.player.size;
        let e = enemy(&mut state, Variant::Hunter, Vec2::new(400.0 - p - 50.0, 400.0), 50.0);
        state.enemies.push(e);
        update(&mut state);
        assert!((state.danger - 0.1).abs() < 1e-4);
        update(&mut state);
        assert!((state.danger - 0.19).abs() < 1e-3);
    }

    #[test]
    fn test_no_threats_relaxes_danger() {
        let mut state = setup();
        state.danger = 1.0;
        update(&mut state);
        assert!((state.danger - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_titan_wander_is_halved() {
        let mut state = setup();
        let hunter = enemy(&mut state, Variant::Hunter, Vec2::new(100.0, 100.0), 5.0);
        let titan = enemy(&mut state, Variant::Titan, Vec2::new(100.0, 100.0), 5.0);
        state.enemies.push(hunter);
        state.enemies.push(titan);
        update(&mut state);
        let (h, t) = (state.enemies[0].vel, state.enemies[1].vel);
        assert!((t.x - h.x * 0.5).abs() < 1e-5);
        assert!((t.y - h.y).abs() < 1e-5);
    }
}
