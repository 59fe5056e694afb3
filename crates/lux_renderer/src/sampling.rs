//! Random sampling helpers.
//!
//! Every routine takes the caller's generator explicitly. Nothing here
//! touches a global RNG, so workers never share random state.

use lux_math::Direction;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::f32::consts::PI;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed direction on the unit sphere.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Direction {
    let z = 1.0 - 2.0 * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    Direction::new(r * phi.cos(), r * phi.sin(), z)
}

/// Cosine-weighted direction on the hemisphere around `normal`.
///
/// `normal` must be unit length. The pdf is `cos(theta) / pi`.
pub fn cosine_hemisphere(normal: Direction, rng: &mut dyn RngCore) -> Direction {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let r = r1.sqrt();
    let phi = 2.0 * PI * r2;
    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - r1).max(0.0).sqrt();

    let (u, v) = normal.orthonormal_basis();
    u * x + v * y + normal * z
}

/// Generator for pixel `(x, y)` of a render seeded with `seed`.
///
/// The stream depends only on its inputs, which is what makes sequential
/// and parallel renders produce identical pixels.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    stream_rng(seed, x as u64, y as u64)
}

/// Independent generator for stream `(a, b)` under `seed`.
pub(crate) fn stream_rng(seed: u64, a: u64, b: u64) -> StdRng {
    let key = mix64(mix64(seed ^ 0x9E37_79B9_7F4A_7C15) ^ a.rotate_left(32) ^ b);
    StdRng::seed_from_u64(key)
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
