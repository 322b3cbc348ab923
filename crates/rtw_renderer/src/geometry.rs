//! Geometry trait and HitRecord for ray-object intersection.

use crate::{Material, RayDesc};
use rtw_math::{Aabb, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Only produced for a successful hit; borrows the material from the
/// primitive that was hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// UV surface coordinates
    pub u: f32,
    pub v: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material responsible for shading this point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("t", &self.t)
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("u", &self.u)
            .field("v", &self.v)
            .field("front_face", &self.front_face)
            .finish_non_exhaustive()
    }
}

/// Anything a ray can hit.
pub trait Geometry: Send + Sync {
    /// Intersect `ray` within its interval, returning the nearest hit.
    ///
    /// Roots that are non-finite or outside `[ray.t.min, ray.t.max]` are misses.
    fn hit<'a>(&'a self, ray: &RayDesc) -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
