//! Procedural fish generator
//!
//! Every variant goes through the same routine: sample a spine from nose to
//! tail root, bend it with a traveling wave, inflate it with the variant's
//! width profile, then attach fins, tail and eye. Geometry is built in a
//! local frame (nose toward +x, dorsal toward -y) and mapped to the screen
//! at the end, which is where mirroring and tilt happen.

use glam::Vec2;

use super::shapes;
use super::vertex::colors::{EYE_WHITE, PUPIL};
use super::vertex::{Vertex, mix, rgba, with_alpha};
use crate::sim::Fish;
use crate::tuning::{BodyShape, TailShape};

/// Largest nose-up/nose-down rotation (radians)
pub const MAX_TILT: f32 = 0.45;
/// Blink cycle length and closed-eye duration (ms)
pub const BLINK_PERIOD_MS: f64 = 3600.0;
pub const BLINK_DURATION_MS: f64 = 140.0;

/// One sample along the spine
#[derive(Debug, Clone, Copy)]
pub struct SpinePoint {
    /// 0 at the nose, 1 at the tail root
    pub t: f32,
    pub center: Vec2,
    /// Unit normal pointing to the dorsal side
    pub normal: Vec2,
    pub half_width: f32,
}

/// Lateral wave displacement at spine position `t`. Damped toward the head.
pub fn wave_offset(shape: &BodyShape, size: f32, t: f32, time_ms: f64, phase: f32) -> f32 {
    let damping = t.clamp(0.0, 1.0).powf(1.5);
    let arg = (time_ms as f32 * shape.wave_frequency) + phase - t * shape.wave_length;
    shape.wave_amplitude * size * damping * arg.sin()
}

/// Sample `samples + 1` spine points in the local frame
pub fn spine(shape: &BodyShape, size: f32, time_ms: f64, phase: f32, samples: usize) -> Vec<SpinePoint> {
    let samples = samples.max(2);
    let length = shape.length * size;

    let centers: Vec<Vec2> = (0..=samples)
        .map(|i| {
            let t = i as f32 / samples as f32;
            Vec2::new(length * (0.5 - t), wave_offset(shape, size, t, time_ms, phase))
        })
        .collect();

    (0..=samples)
        .map(|i| {
            let t = i as f32 / samples as f32;
            let prev = centers[i.saturating_sub(1)];
            let next = centers[(i + 1).min(samples)];
            // Tangent runs nose → tail (toward -x)
            let tangent = (next - prev).normalize_or(Vec2::NEG_X);
            SpinePoint {
                t,
                center: centers[i],
                normal: Vec2::new(-tangent.y, tangent.x),
                half_width: shape.profile.half_width(t) * size,
            }
        })
        .collect()
}

/// Horizontal facing (+1 right, -1 left) and tilt angle for a velocity
pub fn orientation(vel: Vec2) -> (f32, f32) {
    let facing = if vel.x < 0.0 { -1.0 } else { 1.0 };
    let speed = vel.length();
    let ratio = if speed > f32::EPSILON {
        (vel.y / speed).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    (facing, ratio * MAX_TILT * facing)
}

/// Whether the eye is shut at this moment
pub fn is_blinking(time_ms: f64, phase: f32) -> bool {
    let offset = phase.abs() as f64 * 997.0;
    (time_ms + offset).rem_euclid(BLINK_PERIOD_MS) < BLINK_DURATION_MS
}

/// Per-draw parameters
#[derive(Debug, Clone, Copy)]
pub struct FishPaint {
    pub shape: BodyShape,
    pub color: [u8; 3],
    pub belly: [u8; 3],
    pub alpha: f32,
    pub samples: usize,
}

impl FishPaint {
    /// Palette and shape from the variant table, color from the entity
    pub fn for_fish(fish: &Fish, samples: usize) -> Self {
        let config = fish.variant.config();
        Self {
            shape: config.shape,
            color: fish.color,
            belly: config.belly_color,
            alpha: 1.0,
            samples,
        }
    }
}

/// Draw one fish into `out`
pub fn draw(out: &mut Vec<Vertex>, fish: &Fish, paint: &FishPaint, time_ms: f64) {
    let start = out.len();
    let size = fish.size;
    let shape = &paint.shape;
    let points = spine(shape, size, time_ms, fish.phase, paint.samples);

    let base = rgba(paint.color, paint.alpha);
    let dorsal = mix(base, [0.0, 0.0, 0.0, paint.alpha], 0.35);
    let belly = rgba(paint.belly, paint.alpha);
    let fin = with_alpha(dorsal, paint.alpha * 0.85);

    draw_fins_behind(out, &points, shape, size, time_ms, fish.phase, fin);
    draw_tail(out, &points, shape.tail, size, fin);
    draw_body(out, &points, dorsal, base, belly);
    draw_pectoral(out, &points, shape, size, time_ms, fish.phase, with_alpha(belly, paint.alpha * 0.8));
    draw_eye(out, &points, size, time_ms, fish.phase, dorsal, paint.alpha);

    let (facing, tilt) = orientation(fish.vel);
    let rot = Vec2::from_angle(tilt);
    for v in &mut out[start..] {
        let local = Vec2::new(v.position[0] * facing, v.position[1]);
        let world = fish.pos + rot.rotate(local);
        v.position = world.into();
    }
}

/// Counter-shaded body: dark back, base color along the spine, light belly
fn draw_body(out: &mut Vec<Vertex>, points: &[SpinePoint], dorsal: [f32; 4], base: [f32; 4], belly: [f32; 4]) {
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let a_top = a.center + a.normal * a.half_width;
        let b_top = b.center + b.normal * b.half_width;
        let a_bottom = a.center - a.normal * a.half_width;
        let b_bottom = b.center - b.normal * b.half_width;

        shapes::quad(out, [a_top, b_top, b.center, a.center], [dorsal, dorsal, base, base]);
        shapes::quad(out, [a.center, b.center, b_bottom, a_bottom], [base, base, belly, belly]);
    }
}

fn sample_at(points: &[SpinePoint], t: f32) -> SpinePoint {
    let idx = ((points.len() - 1) as f32 * t).round() as usize;
    points[idx.min(points.len() - 1)]
}

fn draw_tail(out: &mut Vec<Vertex>, points: &[SpinePoint], tail: TailShape, size: f32, color: [f32; 4]) {
    let Some(root) = points.last().copied() else { return };
    // Backward direction at the tail root
    let dir = Vec2::new(root.normal.y, -root.normal.x);
    let top = root.center + root.normal * root.half_width;
    let bottom = root.center - root.normal * root.half_width;

    match tail {
        TailShape::Forked => {
            let len = size * 0.75;
            let spread = size * 0.6;
            let tip_top = root.center + dir * len + root.normal * spread;
            let tip_bottom = root.center + dir * len - root.normal * spread;
            let notch = root.center + dir * (len * 0.4);
            shapes::triangle(out, top, tip_top, notch, color);
            shapes::triangle(out, bottom, notch, tip_bottom, color);
            shapes::triangle(out, top, notch, bottom, color);
        }
        TailShape::Pointed => {
            let tip = root.center + dir * (size * 0.9);
            shapes::triangle(out, top, tip, bottom, color);
        }
        TailShape::Fan => {
            let radius = size * 0.8;
            let base_angle = dir.to_angle();
            let steps = 8;
            for i in 0..steps {
                let a1 = base_angle - 0.75 + 1.5 * (i as f32 / steps as f32);
                let a2 = base_angle - 0.75 + 1.5 * ((i + 1) as f32 / steps as f32);
                shapes::triangle(
                    out,
                    root.center,
                    root.center + Vec2::from_angle(a1) * radius,
                    root.center + Vec2::from_angle(a2) * radius,
                    color,
                );
            }
        }
    }
}

/// Dorsal fin, drawn before the body so the body overlaps its base
fn draw_fins_behind(
    out: &mut Vec<Vertex>,
    points: &[SpinePoint],
    shape: &BodyShape,
    size: f32,
    time_ms: f64,
    phase: f32,
    color: [f32; 4],
) {
    if shape.dorsal_fin <= 0.0 {
        return;
    }
    let front = sample_at(points, 0.3);
    let back = sample_at(points, 0.62);
    let peak = sample_at(points, 0.42);
    let ripple = 1.0 + 0.08 * (time_ms as f32 * shape.wave_frequency * 0.5 + phase).sin();
    let apex = peak.center
        + peak.normal * (peak.half_width + shape.dorsal_fin * size * ripple)
        + (back.center - front.center).normalize_or_zero() * (size * 0.25);

    let base_front = front.center + front.normal * front.half_width * 0.8;
    let base_back = back.center + back.normal * back.half_width * 0.8;
    // Trailing edge curls in toward the body
    let notch = base_back.lerp(apex, 0.45) - (back.center - front.center).normalize_or_zero() * (size * 0.08);

    shapes::polygon_fan(out, &[base_front, apex, notch, base_back], color);
}

fn draw_pectoral(
    out: &mut Vec<Vertex>,
    points: &[SpinePoint],
    shape: &BodyShape,
    size: f32,
    time_ms: f64,
    phase: f32,
    color: [f32; 4],
) {
    if shape.pectoral_fin <= 0.0 {
        return;
    }
    let anchor = sample_at(points, 0.32);
    let root = anchor.center - anchor.normal * anchor.half_width * 0.3;
    let back = Vec2::new(anchor.normal.y, -anchor.normal.x);
    let flap = 0.35 * (time_ms as f32 * shape.wave_frequency * 0.7 + phase).sin();
    let reach = shape.pectoral_fin * size;
    let tip_dir = Vec2::from_angle(flap).rotate((back - anchor.normal * 0.6).normalize_or(back));

    shapes::triangle(
        out,
        root + back * (reach * -0.15),
        root + tip_dir * reach,
        root + back * (reach * 0.35),
        color,
    );
}

fn draw_eye(out: &mut Vec<Vertex>, points: &[SpinePoint], size: f32, time_ms: f64, phase: f32, lid: [f32; 4], alpha: f32) {
    let anchor = sample_at(points, 0.14);
    let center = anchor.center + anchor.normal * anchor.half_width * 0.3;
    let radius = (size * 0.13).max(1.0);

    if is_blinking(time_ms, phase) {
        shapes::line(
            out,
            center - Vec2::X * radius,
            center + Vec2::X * radius,
            (radius * 0.35).max(0.75),
            lid,
        );
        return;
    }

    shapes::circle(out, center, radius, with_alpha(EYE_WHITE, alpha));
    // Pupil looks forward
    shapes::circle(
        out,
        center + Vec2::X * radius * 0.3,
        radius * 0.55,
        with_alpha(PUPIL, alpha),
    );
    let glint = center + Vec2::new(radius * 0.45, -radius * 0.3);
    shapes::half_disc(out, glint, radius * 0.18, Vec2::NEG_Y, with_alpha(EYE_WHITE, alpha));
}

/// Rough screen-space extent of a drawn fish, for culling
pub fn bounding_radius(shape: &BodyShape, size: f32) -> f32 {
    size * (shape.length * 0.5 + 1.0) + shape.dorsal_fin * size
}

/// Radius of the glow drawn around a hurt fish
pub fn body_radius(shape: &BodyShape, size: f32) -> f32 {
    (shape.length * 0.5 * size).max(size) * 0.9
}
