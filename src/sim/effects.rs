//! Transient visuals: particles, shockwaves, shake and damage flash
//!
//! None of this affects gameplay; it lives on the session so a reset
//! clears it together with everything else.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle, Shockwave};

/// Shake multiplier per tick and the level below which it snaps to zero
pub const SHAKE_DECAY: f32 = 0.9;
pub const SHAKE_SNAP: f32 = 0.1;
/// Damage flash lost per tick
pub const FLASH_DECAY: f32 = 0.04;

/// Chance per tick of a bubble rising from the seabed
pub const AMBIENT_BUBBLE_CHANCE: f64 = 0.04;

/// Shockwave easing toward its max radius
const SHOCKWAVE_EASE: f32 = 0.12;
const SHOCKWAVE_EXPANSION: f32 = 0.4;
const SHOCKWAVE_FADE: f32 = 0.03;
const SHOCKWAVE_THINNING: f32 = 0.94;
pub const SHOCKWAVE_MIN_WIDTH: f32 = 0.25;
const SHOCKWAVE_START_WIDTH: f32 = 4.0;

/// Sideways drift of rising particles
const DRIFT_RATE: f32 = 0.003;
const DRIFT_AMPLITUDE: f32 = 0.4;

/// Emit a burst of debris around `origin`
pub fn emit_particles(state: &mut GameState, origin: Vec2, count: usize, spread: f32, color: Option<[u8; 3]>) {
    let scale = state.scale;
    for _ in 0..count {
        let rng = &mut state.rng;
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let dist = rng.random_range(0.0..=spread.max(0.0));
        state.particles.push(Particle {
            pos: origin + Vec2::from_angle(angle) * dist,
            vel_y: -rng.random_range(0.5..2.5) * scale,
            size: rng.random_range(2.0..5.0) * scale,
            alpha: 1.0,
            fade: rng.random_range(0.015..0.03),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            color,
        });
    }
    enforce_particle_cap(state);
}

/// Emit an expanding ring
pub fn emit_shockwave(state: &mut GameState, origin: Vec2, radius: f32, max_radius: f32, color: [u8; 3]) {
    state.shockwaves.push(Shockwave {
        pos: origin,
        radius,
        max_radius: max_radius.max(radius),
        alpha: 1.0,
        line_width: SHOCKWAVE_START_WIDTH * state.scale,
        color,
    });
}

/// Drop oldest particles beyond the quality cap
fn enforce_particle_cap(state: &mut GameState) {
    if state.particles.len() > state.max_particles {
        let excess = state.particles.len() - state.max_particles;
        state.particles.drain(..excess);
    }
}

fn emit_ambient_bubble(state: &mut GameState) {
    let scale = state.scale;
    let viewport = state.viewport;
    let rng = &mut state.rng;
    if !rng.random_bool(AMBIENT_BUBBLE_CHANCE) {
        return;
    }
    state.particles.push(Particle {
        pos: Vec2::new(rng.random_range(0.0..=viewport.width), viewport.height + 5.0 * scale),
        vel_y: -rng.random_range(0.5..1.5) * scale,
        size: rng.random_range(1.5..4.0) * scale,
        alpha: rng.random_range(0.5..0.8),
        fade: 0.002,
        phase: rng.random_range(0.0..std::f32::consts::TAU),
        color: None,
    });
    enforce_particle_cap(state);
}

/// Advance a single shockwave; false once it should be removed
pub fn advance_shockwave(wave: &mut Shockwave, scale: f32) -> bool {
    let step = (wave.max_radius - wave.radius) * SHOCKWAVE_EASE + SHOCKWAVE_EXPANSION * scale;
    wave.radius = (wave.radius + step).min(wave.max_radius);
    wave.alpha -= SHOCKWAVE_FADE;
    wave.line_width *= SHOCKWAVE_THINNING;
    wave.alpha > 0.0 && wave.line_width >= SHOCKWAVE_MIN_WIDTH
}

/// Geometric decay, snapped to exactly zero
pub fn decay_shake(shake: f32) -> f32 {
    let next = shake.max(0.0) * SHAKE_DECAY;
    if next < SHAKE_SNAP { 0.0 } else { next }
}

/// Advance every transient effect by one tick
pub fn update(state: &mut GameState) {
    let scale = state.scale;
    let time = state.time_ms as f32;

    for p in state.particles.iter_mut() {
        p.pos.y += p.vel_y;
        p.pos.x += (time * DRIFT_RATE + p.phase).sin() * DRIFT_AMPLITUDE * scale;
        p.alpha -= p.fade;
        p.size *= 0.995;
    }
    state.particles.retain(|p| p.alpha > 0.0 && p.pos.y > -p.size);

    emit_ambient_bubble(state);

    state.shockwaves.retain_mut(|w| advance_shockwave(w, scale));

    state.screen_shake = decay_shake(state.screen_shake);
    state.damage_flash = (state.damage_flash - FLASH_DECAY).max(0.0);
}

/// Random per-axis frame offset for the current shake level
pub fn shake_offset(shake: f32, rng: &mut impl Rng) -> Vec2 {
    if shake <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-1.0..=1.0) * shake,
        rng.random_range(-1.0..=1.0) * shake,
    )
}
