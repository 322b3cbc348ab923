//! Random sampling helpers shared by materials and the camera.

use std::f32::consts::PI;

use rand::{Rng, RngCore};
use rtw_math::Vec3;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Cosine-weighted direction on the +Z hemisphere from two uniform numbers.
#[inline]
pub fn cosine_weighted_sample(s: f32, t: f32) -> Vec3 {
    let phi = 2.0 * PI * s;
    let r = (1.0 - t).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), t.sqrt())
}

/// Orthonormal tangent/bitangent pair for a unit normal (Frisvad).
///
/// The `1 + n.z` term is clamped so `n = -Z` does not divide by zero.
#[inline]
pub fn frisvad_onb(n: Vec3) -> (Vec3, Vec3) {
    let k = 1.0 / (1.0 + n.z).max(1e-5);
    let a = n.y * k;
    let b = n.y * a;
    let c = -n.x * a;
    (Vec3::new(n.z + b, c, -n.x), Vec3::new(c, 1.0 - b, -n.y))
}

/// Uniformly distributed point on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = gen_f32(rng) * 2.0 - 1.0;
    let a = gen_f32(rng) * 2.0 * PI;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Uniformly distributed point in the unit disk (polar mapping), z = 0.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    let r = gen_f32(rng).sqrt();
    let a = gen_f32(rng) * 2.0 * PI;
    Vec3::new(r * a.cos(), r * a.sin(), 0.0)
}
