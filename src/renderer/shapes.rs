//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen pixels (y down).

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

#[allow(clippy::too_many_arguments)]
fn push_tri(out: &mut Vec<Vertex>, a: Vec2, ca: [f32; 4], b: Vec2, cb: [f32; 4], c: Vec2, cc: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, ca));
    out.push(Vertex::new(b.x, b.y, cb));
    out.push(Vertex::new(c.x, c.y, cc));
}

/// Single flat triangle
pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    push_tri(out, a, color, b, color, c, color);
}

/// Quad with per-corner colors (a-b-c-d in winding order)
pub fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    let [a, b, c, d] = corners;
    push_tri(out, a, colors[0], b, colors[1], c, colors[2]);
    push_tri(out, a, colors[0], c, colors[2], d, colors[3]);
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, color: [f32; 4]) {
    vertical_gradient(out, min, size, color, color);
}

/// Rectangle fading from `top` to `bottom`
pub fn vertical_gradient(out: &mut Vec<Vertex>, min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    let max = min + size;
    quad(
        out,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        [top, top, bottom, bottom],
    );
}

/// Number of segments for a circle of this radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 0.6) as u32).clamp(8, 64)
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4]) {
    radial_gradient(out, center, radius, color, color);
}

/// Filled ellipse rotated by `angle`
pub fn ellipse(out: &mut Vec<Vertex>, center: Vec2, radii: Vec2, angle: f32, color: [f32; 4]) {
    let segments = segments_for(radii.x.max(radii.y));
    let rot = Vec2::from_angle(angle);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let p1 = center + rot.rotate(Vec2::new(radii.x * theta1.cos(), radii.y * theta1.sin()));
        let p2 = center + rot.rotate(Vec2::new(radii.x * theta2.cos(), radii.y * theta2.sin()));
        triangle(out, center, p1, p2, color);
    }
}

/// Fan from `inner` color at the center to `outer` color at the rim
pub fn radial_gradient(out: &mut Vec<Vertex>, center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4]) {
    let segments = segments_for(radius);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        push_tri(
            out,
            center,
            inner,
            center + Vec2::from_angle(theta1) * radius,
            outer,
            center + Vec2::from_angle(theta2) * radius,
            outer,
        );
    }
}

/// Ring (hollow circle); colors may differ between inner and outer edge
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    inner_color: [f32; 4],
    outer_color: [f32; 4],
) {
    let segments = segments_for(outer_radius);
    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * TAU);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * TAU);

        quad(
            out,
            [
                center + d1 * inner_radius,
                center + d1 * outer_radius,
                center + d2 * outer_radius,
                center + d2 * inner_radius,
            ],
            [inner_color, outer_color, outer_color, inner_color],
        );
    }
}

/// Stroke of constant width centered on a circle
pub fn circle_outline(out: &mut Vec<Vertex>, center: Vec2, radius: f32, width: f32, color: [f32; 4]) {
    let half = width * 0.5;
    ring(out, center, (radius - half).max(0.0), radius + half, color, color);
}

/// Screen-wide vignette: clear inside `inner_radius`, `edge` color at the
/// corners. Covers the whole rectangle.
pub fn vignette(out: &mut Vec<Vertex>, size: Vec2, inner_radius: f32, edge: [f32; 4]) {
    let center = size * 0.5;
    let outer = center.length().max(inner_radius + 1.0);
    let clear = [edge[0], edge[1], edge[2], 0.0];
    ring(out, center, inner_radius, outer, clear, edge);

    // Fill the corners beyond the ring
    let corners = [
        Vec2::ZERO,
        Vec2::new(size.x, 0.0),
        size,
        Vec2::new(0.0, size.y),
    ];
    let segments = segments_for(outer);
    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * TAU);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * TAU);
        let a = center + d1 * outer;
        let b = center + d2 * outer;
        let mid = (d1 + d2).normalize_or_zero();
        let corner = corners
            .iter()
            .copied()
            .max_by(|p, q| (*p - center).dot(mid).total_cmp(&(*q - center).dot(mid)))
            .unwrap_or(center);
        triangle(out, a, b, corner, edge);
    }
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    quad(
        out,
        [from + perp, to + perp, to - perp, from - perp],
        [color; 4],
    );
}

/// Triangulate a simple polygon as a fan around its centroid
pub fn polygon_fan(out: &mut Vec<Vertex>, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    for i in 0..points.len() {
        let next = points[(i + 1) % points.len()];
        triangle(out, centroid, points[i], next, color);
    }
}

/// Half disc on the side `facing` points to
pub fn half_disc(out: &mut Vec<Vertex>, center: Vec2, radius: f32, facing: Vec2, color: [f32; 4]) {
    let base = facing.to_angle() - PI * 0.5;
    let segments = (segments_for(radius) / 2).max(4);
    for i in 0..segments {
        let theta1 = base + (i as f32 / segments as f32) * PI;
        let theta2 = base + ((i + 1) as f32 / segments as f32) * PI;
        triangle(
            out,
            center,
            center + Vec2::from_angle(theta1) * radius,
            center + Vec2::from_angle(theta2) * radius,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_is_triangle_list() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(10.0, 10.0), 40.0, [1.0; 4]);
        assert_eq!(out.len() % 3, 0);
        assert_eq!(out.len() as u32, segments_for(40.0) * 3);
        // Every vertex within the radius
        for v in &out {
            let d = Vec2::from(v.position) - Vec2::new(10.0, 10.0);
            assert!(d.length() <= 40.0 + 1e-3);
        }
    }

    #[test]
    fn test_gradient_corner_colors() {
        let mut out = Vec::new();
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        vertical_gradient(&mut out, Vec2::ZERO, Vec2::new(100.0, 50.0), top, bottom);
        assert_eq!(out.len(), 6);
        for v in &out {
            if v.position[1] == 0.0 {
                assert_eq!(v.color, top);
            } else {
                assert_eq!(v.color, bottom);
            }
        }
    }

    #[test]
    fn test_segment_count_bounds() {
        assert_eq!(segments_for(0.5), 8);
        assert_eq!(segments_for(10_000.0), 64);
    }

    #[test]
    fn test_vignette_clear_center() {
        let mut out = Vec::new();
        vignette(&mut out, Vec2::new(800.0, 600.0), 200.0, [1.0, 0.0, 0.0, 0.5]);
        let center = Vec2::new(400.0, 300.0);
        for v in &out {
            let d = (Vec2::from(v.position) - center).length();
            if d < 200.5 {
                assert_eq!(v.color[3], 0.0);
            }
        }
    }

    #[test]
    fn test_degenerate_polygon_skipped() {
        let mut out = Vec::new();
        polygon_fan(&mut out, &[Vec2::ZERO, Vec2::X], [1.0; 4]);
        assert!(out.is_empty());
    }
}
