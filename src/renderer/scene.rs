//! Frame composition
//!
//! Builds one triangle list per frame in a fixed layer order. The session is
//! optional: menus and the title screen draw the water and atmosphere only.

use std::ops::Range;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::fish::{self, FishPaint};
use super::shapes;
use super::vertex::colors;
use super::vertex::{Vertex, rgba, with_alpha};
use crate::consts::{INVULNERABILITY_MS, MAX_HEALTH};
use crate::settings::Settings;
use crate::sim::{Atmosphere, GamePhase, GameState, effects};

/// Invulnerability time left above which the screen flashes red
/// The full-screen flash marks the hit itself: the first 200 ms of the
/// invulnerability window.
pub const FLASH_THRESHOLD_MS: f32 = INVULNERABILITY_MS - 200.0;
/// Health below which the bar turns red
pub const LOW_HEALTH: f32 = 30.0;
/// Danger below this is not drawn
const DANGER_VISIBLE: f32 = 0.01;

/// Compositing layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Background,
    LightShafts,
    Plankton,
    Bubbles,
    Particles,
    Shockwaves,
    Enemies,
    Player,
    Danger,
    Flash,
    Hud,
}

pub struct Scene {
    vertices: Vec<Vertex>,
    layers: Vec<(Layer, Range<usize>)>,
    /// Only drives the shake jitter, never gameplay
    rng: Pcg32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(16 * 1024),
            layers: Vec::with_capacity(11),
            rng: Pcg32::seed_from_u64(0x5eed),
        }
    }

    /// Layers drawn by the last `build`, with their vertex spans
    pub fn layers(&self) -> &[(Layer, Range<usize>)] {
        &self.layers
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn span(&self, layer: Layer) -> Option<&[Vertex]> {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, r)| &self.vertices[r.clone()])
    }

    /// Frame translation for the current shake level
    pub fn world_offset(&mut self, state: &GameState, settings: &Settings) -> Vec2 {
        if settings.effective_screen_shake() {
            effects::shake_offset(state.screen_shake, &mut self.rng)
        } else {
            Vec2::ZERO
        }
    }

    /// Build the whole frame
    pub fn build(
        &mut self,
        session: Option<&GameState>,
        atmosphere: &Atmosphere,
        settings: &Settings,
        time_ms: f64,
    ) -> &[Vertex] {
        self.vertices.clear();
        self.layers.clear();

        // Decorations keep their layout mid-session; the water follows resizes
        let viewport = session.map_or(atmosphere.viewport, |s| s.viewport);
        let size = Vec2::new(viewport.width, viewport.height);
        self.layer(Layer::Background, |out| background(out, size));
        if settings.quality.light_shafts_enabled() {
            self.layer(Layer::LightShafts, |out| light_shafts(out, atmosphere, time_ms));
        }
        self.layer(Layer::Plankton, |out| plankton(out, atmosphere, time_ms));
        self.layer(Layer::Bubbles, |out| bubbles(out, atmosphere));

        if let Some(state) = session {
            let samples = settings.quality.spine_samples();
            let offset = self.world_offset(state, settings);
            let world_start = self.vertices.len();

            self.layer(Layer::Particles, |out| particles(out, state));
            self.layer(Layer::Shockwaves, |out| shockwaves(out, state));
            self.layer(Layer::Enemies, |out| {
                for enemy in &state.enemies {
                    fish::draw(out, enemy, &FishPaint::for_fish(enemy, samples), time_ms);
                }
            });
            self.layer(Layer::Player, |out| player(out, state, samples, time_ms));

            if offset != Vec2::ZERO {
                for v in &mut self.vertices[world_start..] {
                    v.position[0] += offset.x;
                    v.position[1] += offset.y;
                }
            }

            if settings.danger_vignette && state.danger > DANGER_VISIBLE {
                self.layer(Layer::Danger, |out| danger(out, size, state.danger, time_ms));
            }
            if settings.effective_flash() && state.invulnerable_ms > FLASH_THRESHOLD_MS {
                self.layer(Layer::Flash, |out| flash(out, size, state.invulnerable_ms));
            }
            if state.phase == GamePhase::Playing {
                self.layer(Layer::Hud, |out| hud(out, state));
            }
        }

        &self.vertices
    }

    fn layer(&mut self, layer: Layer, draw: impl FnOnce(&mut Vec<Vertex>)) {
        let start = self.vertices.len();
        draw(&mut self.vertices);
        self.layers.push((layer, start..self.vertices.len()));
    }
}

fn background(out: &mut Vec<Vertex>, size: Vec2) {
    let split = size.y * 0.45;
    shapes::vertical_gradient(
        out,
        Vec2::ZERO,
        Vec2::new(size.x, split),
        colors::SURFACE_WATER,
        colors::MID_WATER,
    );
    shapes::vertical_gradient(
        out,
        Vec2::new(0.0, split),
        Vec2::new(size.x, size.y - split),
        colors::MID_WATER,
        colors::DEEP_WATER,
    );
}

fn light_shafts(out: &mut Vec<Vertex>, atmosphere: &Atmosphere, time_ms: f64) {
    let height = atmosphere.viewport.height;
    let t = time_ms as f32 * 0.001;
    for shaft in &atmosphere.shafts {
        let shimmer = 0.7 + 0.3 * (t + shaft.x * 0.01).sin();
        let top = with_alpha(colors::LIGHT_SHAFT, shaft.alpha * shimmer);
        let bottom = with_alpha(colors::LIGHT_SHAFT, 0.0);
        let half = shaft.width * 0.5;
        let foot = shaft.x + shaft.slant;
        shapes::quad(
            out,
            [
                Vec2::new(shaft.x - half, 0.0),
                Vec2::new(shaft.x + half, 0.0),
                Vec2::new(foot + half * 1.8, height),
                Vec2::new(foot - half * 1.8, height),
            ],
            [top, top, bottom, bottom],
        );
    }
}

fn plankton(out: &mut Vec<Vertex>, atmosphere: &Atmosphere, time_ms: f64) {
    let t = time_ms as f32 * 0.002;
    for speck in &atmosphere.plankton {
        let alpha = 0.35 + 0.25 * (t + speck.phase).sin();
        // Specks stretch along their drift
        shapes::ellipse(
            out,
            speck.pos,
            Vec2::new(speck.size * 1.6, speck.size * 0.8),
            speck.vel.to_angle(),
            with_alpha(colors::PLANKTON, alpha),
        );
    }
}

fn bubbles(out: &mut Vec<Vertex>, atmosphere: &Atmosphere) {
    for bubble in &atmosphere.bubbles {
        let width = (bubble.size * 0.2).max(0.75);
        shapes::circle_outline(out, bubble.pos, bubble.size, width, with_alpha(colors::BUBBLE, 0.45));
        shapes::circle(
            out,
            bubble.pos + Vec2::new(-0.35, -0.35) * bubble.size,
            bubble.size * 0.25,
            with_alpha(colors::BUBBLE, 0.6),
        );
    }
}

fn particles(out: &mut Vec<Vertex>, state: &GameState) {
    for p in &state.particles {
        let color = match p.color {
            Some(rgb) => rgba(rgb, p.alpha),
            None => with_alpha(colors::PARTICLE, p.alpha * 0.7),
        };
        shapes::circle(out, p.pos, p.size.max(0.5), color);
    }
}

fn shockwaves(out: &mut Vec<Vertex>, state: &GameState) {
    for wave in &state.shockwaves {
        shapes::circle_outline(out, wave.pos, wave.radius, wave.line_width, rgba(wave.color, wave.alpha));
    }
}

/// Invulnerability blink: alternate every 100 ms
pub fn player_alpha(invulnerable_ms: f32) -> f32 {
    if invulnerable_ms > 0.0 && (invulnerable_ms / 100.0) as u32 % 2 == 0 {
        0.4
    } else {
        1.0
    }
}

fn player(out: &mut Vec<Vertex>, state: &GameState, samples: usize, time_ms: f64) {
    let fish = &state.player;
    let mut paint = FishPaint::for_fish(fish, samples);
    let radius = fish::body_radius(&paint.shape, fish.size);

    if state.damage_flash > 0.0 {
        let flash = state.damage_flash.min(1.0);
        shapes::radial_gradient(
            out,
            fish.pos,
            radius * 1.6,
            with_alpha(colors::DAMAGE, flash * 0.6),
            with_alpha(colors::DAMAGE, 0.0),
        );
        let ring_radius = radius * (1.0 + (1.0 - flash) * 1.5);
        shapes::circle_outline(
            out,
            fish.pos,
            ring_radius,
            (3.0 * state.scale).max(1.0),
            with_alpha(colors::DAMAGE, flash),
        );
    }

    paint.alpha = player_alpha(state.invulnerable_ms);
    fish::draw(out, fish, &paint, time_ms);
}

/// Vignette inner radius and peak opacity for a danger level
pub fn danger_vignette(size: Vec2, danger: f32, time_ms: f64) -> (f32, f32) {
    let danger = danger.clamp(0.0, 1.0);
    let pulse = 0.5 + 0.5 * (time_ms as f32 * 0.008).sin();
    let inner = size.min_element() * 0.5 * (1.0 - 0.55 * danger);
    let opacity = danger * (0.35 + 0.2 * pulse);
    (inner, opacity)
}

fn danger(out: &mut Vec<Vertex>, size: Vec2, danger: f32, time_ms: f64) {
    let (inner, opacity) = danger_vignette(size, danger, time_ms);
    shapes::vignette(out, size, inner, with_alpha(colors::DAMAGE, opacity));
}

fn flash(out: &mut Vec<Vertex>, size: Vec2, invulnerable_ms: f32) {
    let strength = ((invulnerable_ms - FLASH_THRESHOLD_MS) / (INVULNERABILITY_MS - FLASH_THRESHOLD_MS))
        .clamp(0.0, 1.0);
    shapes::rect(out, Vec2::ZERO, size, with_alpha(colors::DAMAGE, 0.3 * strength));
}

/// Health bar fill color
pub fn health_color(health: f32) -> [f32; 4] {
    if health < LOW_HEALTH {
        colors::HEALTH_LOW
    } else {
        colors::HEALTH_OK
    }
}

fn hud(out: &mut Vec<Vertex>, state: &GameState) {
    let s = state.scale.max(0.25);
    let origin = Vec2::new(20.0, 20.0) * s;
    let bar = Vec2::new(200.0, 14.0) * s;
    let fill = (state.health / MAX_HEALTH).clamp(0.0, 1.0);

    shapes::rect(out, origin, bar, colors::HUD_TRACK);
    if fill > 0.0 {
        shapes::rect(out, origin, Vec2::new(bar.x * fill, bar.y), health_color(state.health));
    }

    let border = (1.5 * s).max(1.0);
    let max = origin + bar;
    let corners = [origin, Vec2::new(max.x, origin.y), max, Vec2::new(origin.x, max.y)];
    for i in 0..4 {
        shapes::line(out, corners[i], corners[(i + 1) % 4], border, colors::HUD_FRAME);
    }
}
