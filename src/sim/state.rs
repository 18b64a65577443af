//! Game state and core simulation types
//!
//! The session owns every entity and effect container. Outside code only
//! reaches them through the resolver/effects entry points.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::InputAdapter;
use crate::Viewport;
use crate::consts::*;
use crate::tuning::Variant;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player was eaten; terminal until reset
    GameOver,
}

/// Player or enemy fish
#[derive(Debug, Clone)]
pub struct Fish {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius-equivalent body size, always > 0
    pub size: f32,
    pub color: [u8; 3],
    /// Nominal cruising speed (px/tick)
    pub speed: f32,
    /// Decorrelates wander noise and animation between fish
    pub phase: f32,
    pub variant: Variant,
}

impl Fish {
    pub fn player(pos: Vec2, scale: f32) -> Self {
        Self {
            id: 0,
            pos,
            vel: Vec2::ZERO,
            size: PLAYER_START_SIZE * scale,
            color: Variant::Player.config().color,
            speed: 0.0,
            phase: 0.0,
            variant: Variant::Player,
        }
    }

    /// Instantaneous speed (px/tick)
    pub fn current_speed(&self) -> f32 {
        self.vel.length()
    }

    /// Predatory toward the player iff strictly bigger
    pub fn is_predatory_to(&self, player: &Fish) -> bool {
        self.size > player.size
    }
}

/// Rising bubble or burst debris
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Negative = rising
    pub vel_y: f32,
    pub size: f32,
    /// 0-1, decreases every tick
    pub alpha: f32,
    /// Alpha lost per tick
    pub fade: f32,
    /// Sideways drift phase
    pub phase: f32,
    /// None draws as a pale bubble
    pub color: Option<[u8; 3]>,
}

/// Expanding ring marking a kill
#[derive(Debug, Clone)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub line_width: f32,
    pub color: [u8; 3],
}

/// Notifications for the surrounding application (audio, HUD, leaderboard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player ate a fish; carries the running score
    Eat { score: u64, size: f32, variant: Variant },
    /// Player took damage
    Hurt { variant: Variant, health: f32 },
    /// Emitted exactly once per session
    GameOver {
        final_score: u64,
        final_size: f32,
        cause: Variant,
    },
}

/// Complete session state, passed explicitly through `tick`
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub viewport: Viewport,
    /// Cached `viewport.scale()`
    pub scale: f32,
    pub phase: GamePhase,
    pub player: Fish,
    pub enemies: Vec<Fish>,
    pub particles: Vec<Particle>,
    pub shockwaves: Vec<Shockwave>,
    /// Never decreases during a session
    pub score: u64,
    /// In [0, MAX_HEALTH]
    pub health: f32,
    /// Remaining invulnerability (ms)
    pub invulnerable_ms: f32,
    /// Shake magnitude in px, decays geometrically
    pub screen_shake: f32,
    /// 0-1, decays linearly
    pub damage_flash: f32,
    /// Smoothed 0-1 closeness of the nearest threat
    pub danger: f32,
    /// Last variant that damaged the player
    pub last_attacker: Option<Variant>,
    /// Elapsed session time (ms)
    pub time_ms: f64,
    pub last_spawn_ms: f64,
    pub time_ticks: u64,
    /// Particle cap (quality preset)
    pub max_particles: usize,
    pub input: InputAdapter,
    /// Pending notifications, drained by the host
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session for the given viewport
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        let scale = viewport.scale();
        Self {
            seed,
            viewport,
            scale,
            phase: GamePhase::Playing,
            player: Fish::player(viewport.center(), scale),
            enemies: Vec::new(),
            particles: Vec::new(),
            shockwaves: Vec::new(),
            score: 0,
            health: MAX_HEALTH,
            invulnerable_ms: 0.0,
            screen_shake: 0.0,
            damage_flash: 0.0,
            danger: 0.0,
            last_attacker: None,
            time_ms: 0.0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            max_particles: crate::QualityPreset::default().max_particles(),
            input: InputAdapter::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Start over with a new seed, keeping viewport and preferences
    pub fn reset(&mut self, seed: u64) {
        let max_particles = self.max_particles;
        let input = self.input.clone();
        *self = Self::new(self.viewport, seed);
        self.max_particles = max_particles;
        self.input = input;
    }

    /// Host resize notification
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = viewport.scale();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
