//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod ambient;
pub mod behavior;
pub mod effects;
pub mod input;
pub mod noise;
pub mod resolve;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ambient::Atmosphere;
pub use input::{
    HandPoseProvider, HandTracker, InputAdapter, InputError, InputSource, PointerInput,
    ScriptedInput,
};
pub use state::{Fish, GameEvent, GamePhase, GameState, Particle, Shockwave};
pub use tick::{TickInput, tick};
