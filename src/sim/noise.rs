//! Smoothed 1D value noise for organic wander

/// Hash an integer lattice point to [0, 1)
#[inline]
fn lattice(i: i32) -> f32 {
    let mut h = (i as u32).wrapping_mul(0x9E37_79B9) ^ 0x85EB_CA6B;
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

/// Continuous noise in [0, 1): smoothstep between hashed lattice values
pub fn noise1(x: f32) -> f32 {
    let i = x.floor();
    let f = x - i;
    let u = f * f * (3.0 - 2.0 * f);
    let a = lattice(i as i32);
    let b = lattice(i as i32 + 1);
    a + (b - a) * u
}

/// Noise remapped to [-1, 1)
pub fn signed_noise1(x: f32) -> f32 {
    noise1(x) * 2.0 - 1.0
}
