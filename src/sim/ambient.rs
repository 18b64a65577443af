//! Ambient decorations: drifting plankton, background bubbles, light shafts
//!
//! Purely atmospheric. Lives outside `GameState` so it keeps animating on
//! the menu and is rebuilt on resize while no session is active.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;

#[derive(Debug, Clone)]
pub struct Drifter {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub phase: f32,
}

/// A slanted beam of surface light
#[derive(Debug, Clone, Copy)]
pub struct LightShaft {
    /// Horizontal position at the surface
    pub x: f32,
    pub width: f32,
    /// Horizontal offset at the bottom of the beam
    pub slant: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Atmosphere {
    pub viewport: Viewport,
    pub plankton: Vec<Drifter>,
    pub bubbles: Vec<Drifter>,
    pub shafts: Vec<LightShaft>,
    rng: Pcg32,
}

const SHAFT_COUNT: usize = 5;

impl Atmosphere {
    pub fn new(viewport: Viewport, plankton: usize, bubbles: usize, seed: u64) -> Self {
        let mut atmosphere = Self {
            viewport,
            plankton: Vec::with_capacity(plankton),
            bubbles: Vec::with_capacity(bubbles),
            shafts: Vec::with_capacity(SHAFT_COUNT),
            rng: Pcg32::seed_from_u64(seed),
        };
        atmosphere.populate(plankton, bubbles);
        atmosphere
    }

    /// Rebuild for a new viewport
    pub fn reinitialize(&mut self, viewport: Viewport) {
        let (plankton, bubbles) = (self.plankton.len(), self.bubbles.len());
        self.viewport = viewport;
        self.populate(plankton, bubbles);
    }

    fn populate(&mut self, plankton: usize, bubbles: usize) {
        let Viewport { width, height } = self.viewport;
        let scale = self.viewport.scale();
        let rng = &mut self.rng;

        self.plankton = (0..plankton)
            .map(|_| Drifter {
                pos: Vec2::new(rng.random_range(0.0..=width), rng.random_range(0.0..=height)),
                vel: Vec2::new(
                    rng.random_range(-0.15..0.15) * scale,
                    rng.random_range(-0.08..0.08) * scale,
                ),
                size: rng.random_range(0.8..2.2) * scale,
                phase: rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();

        self.bubbles = (0..bubbles)
            .map(|_| Drifter {
                pos: Vec2::new(rng.random_range(0.0..=width), rng.random_range(0.0..=height)),
                vel: Vec2::new(0.0, -rng.random_range(0.2..0.7) * scale),
                size: rng.random_range(1.0..3.5) * scale,
                phase: rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();

        self.shafts = (0..SHAFT_COUNT)
            .map(|i| LightShaft {
                x: width * (i as f32 + 0.5) / SHAFT_COUNT as f32 + rng.random_range(-40.0..40.0) * scale,
                width: rng.random_range(40.0..110.0) * scale,
                slant: rng.random_range(60.0..160.0) * scale,
                alpha: rng.random_range(0.03..0.08),
            })
            .collect();
    }

    /// Advance one tick, wrapping everything around the viewport
    pub fn update(&mut self, time_ms: f64) {
        let Viewport { width, height } = self.viewport;
        let t = time_ms as f32;

        for p in &mut self.plankton {
            p.pos += p.vel + Vec2::new(0.0, (t * 0.001 + p.phase).sin() * 0.05);
            p.pos.x = wrap(p.pos.x, -p.size, width + p.size);
            p.pos.y = wrap(p.pos.y, -p.size, height + p.size);
        }

        for b in &mut self.bubbles {
            b.pos.y += b.vel.y;
            b.pos.x += (t * 0.002 + b.phase).sin() * 0.2;
            if b.pos.y < -b.size {
                b.pos.y = height + b.size;
                b.pos.x = self.rng.random_range(0.0..=width);
            }
            b.pos.x = wrap(b.pos.x, -b.size, width + b.size);
        }
    }
}

/// Wrap `v` into [lo, hi)
fn wrap(v: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span <= 0.0 {
        return lo;
    }
    lo + (v - lo).rem_euclid(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(105.0, 0.0, 100.0), 5.0);
        assert_eq!(wrap(-5.0, 0.0, 100.0), 95.0);
        assert_eq!(wrap(50.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn test_decorations_stay_in_view() {
        let view = Viewport::new(640.0, 480.0);
        let mut atmosphere = Atmosphere::new(view, 40, 20, 1);
        for i in 0..5000 {
            atmosphere.update(i as f64 * 16.0);
        }
        for d in atmosphere.plankton.iter().chain(atmosphere.bubbles.iter()) {
            assert!(d.pos.x >= -d.size && d.pos.x <= 640.0 + d.size);
            assert!(d.pos.y >= -d.size && d.pos.y <= 480.0 + d.size);
        }
    }

    #[test]
    fn test_reinitialize_keeps_counts() {
        let mut atmosphere = Atmosphere::new(Viewport::new(640.0, 480.0), 30, 12, 2);
        atmosphere.reinitialize(Viewport::new(1920.0, 1080.0));
        assert_eq!(atmosphere.plankton.len(), 30);
        assert_eq!(atmosphere.bubbles.len(), 12);
        assert!(atmosphere.plankton.iter().any(|p| p.pos.x > 640.0));
    }
}
