//! Material trait for surface shading.
//!
//! Each material runs once per closest hit and decides whether to continue
//! the path: it either terminates it (depth cap) or traces one new ray back
//! through the [`Tracer`] and folds the result into the payload.

use std::sync::Arc;

use crate::sampling::{cosine_weighted_sample, frisvad_onb, gen_f32, random_unit_vector};
use crate::texture::{Checker, SolidColor, Texture};
use crate::{HitRecord, RayDesc, RayPayload, Tracer};
use rtw_math::{Ray, Vec3};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Shade the closest hit of `ray`.
    ///
    /// `payload.color` holds white on entry and must hold the path's
    /// radiance on return. `ray.ray.direction` is unit length.
    fn closest_hit(
        &self,
        tracer: &mut Tracer<'_>,
        ray: &RayDesc,
        hit: &HitRecord<'_>,
        payload: &mut RayPayload,
    );
}

/// Trace one bounce from `origin` and return the child path's color.
fn trace_bounce(tracer: &mut Tracer<'_>, origin: Vec3, direction: Vec3, payload: &RayPayload) -> Color {
    let bounce = RayDesc::new(Ray::new(origin, direction));
    let mut child = payload.child();
    tracer.trace_ray(&bounce, &mut child);
    child.color
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)))
    }

    /// Lambertian whose albedo is looked up in a texture.
    pub fn textured(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Lambertian with a 3D checker albedo alternating between two textures.
    pub fn checker(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self::textured(Arc::new(Checker::new(odd, even)))
    }
}

impl Material for Lambertian {
    fn closest_hit(
        &self,
        tracer: &mut Tracer<'_>,
        _ray: &RayDesc,
        hit: &HitRecord<'_>,
        payload: &mut RayPayload,
    ) {
        if payload.depth >= tracer.limits().solid {
            payload.color = Color::ZERO;
            return;
        }

        let s = gen_f32(tracer.rng());
        let t = gen_f32(tracer.rng());
        let local = cosine_weighted_sample(s, t);
        let (tangent, bitangent) = frisvad_onb(hit.normal);
        let direction = local.x * tangent + local.y * bitangent + local.z * hit.normal;

        let incoming = trace_bounce(tracer, hit.p, direction, payload);
        payload.color *= self.albedo.sample(hit.u, hit.v, hit.p) * incoming;
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    roughness: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `roughness`: 0.0 = perfect mirror, clamped to at most 0.99
    pub fn new(albedo: Color, roughness: f32) -> Self {
        Self {
            albedo,
            roughness: roughness.clamp(0.0, 0.99),
        }
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }
}

impl Material for Metal {
    fn closest_hit(
        &self,
        tracer: &mut Tracer<'_>,
        ray: &RayDesc,
        hit: &HitRecord<'_>,
        payload: &mut RayPayload,
    ) {
        if payload.depth >= tracer.limits().solid {
            payload.color = Color::ZERO;
            return;
        }

        let fuzz = self.roughness * random_unit_vector(tracer.rng());
        let direction = (reflect(ray.ray.direction, hit.normal) + fuzz).normalize();

        let incoming = trace_bounce(tracer, hit.p, direction, payload);
        payload.color *= self.albedo * incoming;
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
    inv_ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material surrounded by air.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self {
            ior,
            inv_ior: 1.0 / ior,
        }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f32, ior_ratio: f32) -> f32 {
        let r0 = (1.0 - ior_ratio) / (1.0 + ior_ratio);
        let r0 = r0 * r0;
        let one_minus_cos = 1.0 - cosine;
        let one_minus_cos2 = one_minus_cos * one_minus_cos;
        r0 + (1.0 - r0) * one_minus_cos2 * one_minus_cos2 * one_minus_cos
    }

    /// Ratio of indices for a ray crossing the surface from the hit side.
    fn ior_ratio(&self, front_face: bool) -> f32 {
        if front_face {
            self.inv_ior
        } else {
            self.ior
        }
    }
}

impl Material for Dielectric {
    fn closest_hit(
        &self,
        tracer: &mut Tracer<'_>,
        ray: &RayDesc,
        hit: &HitRecord<'_>,
        payload: &mut RayPayload,
    ) {
        if payload.depth >= tracer.limits().transparent {
            payload.color = Color::ZERO;
            return;
        }

        let unit_direction = ray.ray.direction;
        let ior_ratio = self.ior_ratio(hit.front_face);
        let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let total_internal_reflection = ior_ratio * sin_theta > 1.0;
        let direction = if total_internal_reflection
            || Self::reflectance(cos_theta, ior_ratio) > gen_f32(tracer.rng())
        {
            reflect(unit_direction, hit.normal)
        } else {
            refract(unit_direction, hit.normal, ior_ratio)
        };

        // No absorption: glass only redirects.
        payload.color *= trace_bounce(tracer, hit.p, direction, payload);
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with normal `n` facing it.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
