//! Reef Hunt - a hand-tracked "eat or be eaten" arcade game
//!
//! Core modules:
//! - `app`: Host-agnostic driver (fixed timestep, session lifecycle)
//! - `sim`: Deterministic simulation (spawning, steering, collisions, effects)
//! - `renderer`: Procedural fish + WebGPU rendering pipeline
//! - `platform`: Browser glue for the camera hand-pose provider
//! - `audio`: Procedural sound effects and speed-driven dynamics
//! - `tuning`: Data-driven per-variant balance table

pub mod app;
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate; per-tick factors are tuned for this
    pub const SIM_HZ: f32 = 60.0;
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Milliseconds advanced by one tick
    pub const TICK_MS: f32 = 1000.0 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport dimension at which `scale == 1.0`
    pub const REFERENCE_DIMENSION: f32 = 800.0;

    /// Player defaults (before scaling)
    pub const PLAYER_START_SIZE: f32 = 20.0;
    pub const MAX_HEALTH: f32 = 100.0;
    /// Health regenerated per second while not invulnerable
    pub const HEALTH_REGEN_PER_SEC: f32 = 3.0;
    /// Health restored by eating a fish
    pub const EAT_HEAL: f32 = 10.0;
    /// Fraction of the eaten fish's size the player gains
    pub const GROWTH_FACTOR: f32 = 0.1;

    /// Invulnerability window after a hit (ms)
    pub const INVULNERABILITY_MS: f32 = 1500.0;
    /// Flat damage per hit
    pub const TITAN_DAMAGE: f32 = 60.0;
    pub const BASE_DAMAGE: f32 = 35.0;

    /// Centers closer than this fraction of the summed sizes collide
    pub const COLLISION_FACTOR: f32 = 0.6;
    /// Enemies beyond the viewport by more than this are discarded
    pub const CULL_MARGIN: f32 = 300.0;

    /// Player speed (px/tick, before scaling) above which predators lose lock
    pub const DASH_SPEED: f32 = 15.0;
    /// Predator steering strength while the player is dashing
    pub const DASH_EVADE_STEERING: f32 = 0.015;
    /// Steering strength of ambient wander
    pub const WANDER_STEERING: f32 = 0.05;
    /// Danger overlay smoothing per tick
    pub const DANGER_SMOOTHING: f32 = 0.1;
}

/// Host viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Responsive scale factor every gameplay constant is multiplied by
    pub fn scale(&self) -> f32 {
        scale_for(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// `min(width, height) / REFERENCE_DIMENSION`, never zero
#[inline]
pub fn scale_for(width: f32, height: f32) -> f32 {
    (width.min(height) / consts::REFERENCE_DIMENSION).max(f32::EPSILON)
}

/// Linear interpolation from `a` toward `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation for vectors
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_uses_smaller_dimension() {
        assert!((scale_for(1600.0, 800.0) - 1.0).abs() < 1e-6);
        assert!((scale_for(400.0, 1200.0) - 0.5).abs() < 1e-6);
        assert!((Viewport::new(1920.0, 1080.0).scale() - 1.35).abs() < 1e-5);
    }

    #[test]
    fn test_scale_never_zero() {
        assert!(scale_for(0.0, 600.0) > 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.2), 2.0);
        assert_eq!(lerp_vec(Vec2::ZERO, Vec2::new(10.0, -10.0), 0.5), Vec2::new(5.0, -5.0));
    }
}
