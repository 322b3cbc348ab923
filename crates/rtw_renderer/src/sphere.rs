//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    geometry::{Geometry, HitRecord},
    Material, RayDesc,
};
use rtw_math::{Aabb, Vec3};

/// A sphere primitive.
///
/// Materials are shared: many spheres may point at the same instance.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    radius2: f32,
    inv_radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// A negative radius keeps the same surface but turns its outward normal
    /// inward, which makes a hollow bubble inside a glass sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            radius2: radius * radius,
            inv_radius: 1.0 / radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Geometry for Sphere {
    fn hit<'a>(&'a self, ray_desc: &RayDesc) -> Option<HitRecord<'a>> {
        if self.radius == 0.0 {
            return None;
        }

        let ray = &ray_desc.ray;
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius2;

        let discriminant = half_b * half_b - a * c;
        if !(discriminant >= 0.0) {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let accept = |root: f32| root.is_finite() && ray_desc.t.contains(root);
        let mut root = (-half_b - sqrtd) / a;
        if !accept(root) {
            root = (-half_b + sqrtd) / a;
            if !accept(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) * self.inv_radius;
        let (u, v) = Self::get_sphere_uv(outward_normal);
        let mut rec = HitRecord {
            t: root,
            p,
            normal: outward_normal,
            u,
            v,
            front_face: true,
            material: self.material.as_ref(),
        };
        rec.set_face_normal(ray, outward_normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius.abs());
        Aabb::new(self.center - rvec, self.center + rvec)
    }
}
