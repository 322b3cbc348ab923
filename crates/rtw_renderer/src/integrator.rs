//! Path tracing integrator.
//!
//! [`Tracer`] is the recursion context: it owns nothing global, it borrows the
//! scene and a per-worker RNG, and counts every ray it traces so the caller
//! can fold the count into shared counters once per work unit.

use crate::sampling::gen_f32;
use crate::{Color, RayDesc, RayGenerator, RayPayload, Scene};
use rand::RngCore;
use rtw_math::Vec3;
use serde::{Deserialize, Serialize};

/// Bounce caps per material class.
///
/// A depth of 1 means only primary rays may hit geometry and run a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLimits {
    /// Lambertian and Metal
    pub solid: u32,
    /// Dielectric
    pub transparent: u32,
}

impl Default for DepthLimits {
    fn default() -> Self {
        Self {
            solid: 6,
            transparent: 10,
        }
    }
}

/// Background for rays that escape the scene.
///
/// Linear blend from `horizon` (direction.y = -1) to `zenith` (direction.y = 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyGradient {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl SkyGradient {
    /// Background color seen along `direction`.
    #[inline]
    pub fn sample(&self, direction: Vec3) -> Color {
        let unit = direction.normalize();
        let a = 0.5 * (unit.y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

/// Recursion context for one worker.
pub struct Tracer<'a> {
    scene: &'a Scene,
    rng: &'a mut dyn RngCore,
    limits: DepthLimits,
    sky: SkyGradient,
    rays_traced: u64,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, rng: &'a mut dyn RngCore, limits: DepthLimits, sky: SkyGradient) -> Self {
        Self {
            scene,
            rng,
            limits,
            sky,
            rays_traced: 0,
        }
    }

    /// Trace `ray` and write the path's radiance into `payload.color`.
    ///
    /// On a hit the material shades (and possibly recurses); on a miss the
    /// sky gradient is returned. No NaN sanitizing happens here.
    pub fn trace_ray(&mut self, ray: &RayDesc, payload: &mut RayPayload) {
        self.rays_traced += 1;

        let scene = self.scene;
        match scene.hit(ray) {
            Some(hit) => {
                let shading_ray = RayDesc::with_interval(ray.ray.normalized(), ray.t);
                hit.material.closest_hit(self, &shading_ray, &hit, payload);
            }
            None => payload.color = self.sky.sample(ray.ray.direction),
        }
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub fn limits(&self) -> DepthLimits {
        self.limits
    }

    /// Rays traced since creation.
    pub fn rays_traced(&self) -> u64 {
        self.rays_traced
    }
}

/// Average `samples` jittered camera paths through pixel `(i, j)`.
///
/// `j` counts scanlines from the bottom of the image, matching the camera's
/// `t` coordinate.
pub fn render_pixel(
    tracer: &mut Tracer<'_>,
    camera: &dyn RayGenerator,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    samples: u32,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let s = (i as f32 + gen_f32(tracer.rng())) / width as f32;
        let t = (j as f32 + gen_f32(tracer.rng())) / height as f32;
        let ray = camera.get_ray(s, t, tracer.rng());

        let mut payload = RayPayload::primary();
        tracer.trace_ray(&RayDesc::new(ray), &mut payload);
        pixel_color += payload.color;
    }

    pixel_color / samples as f32
}
