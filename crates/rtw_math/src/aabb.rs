use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as two corners. Boxes only ever grow through [`Aabb::encapsulate`];
/// degenerate (zero-volume) boxes are kept as-is, the slab test handles them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its minimum and maximum corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow this box so it also encloses `other`.
    #[inline]
    pub fn encapsulate(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        let mut out = *box0;
        out.encapsulate(box1);
        out
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Vectorized slab method. A zero direction component yields an infinite
    /// reciprocal on purpose; the min/max reductions absorb it.
    #[inline]
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        let inv_dir = r.direction.recip();
        let t0 = (self.min - r.origin) * inv_dir;
        let t1 = (self.max - r.origin) * inv_dir;

        let tmin = t0.min(t1).max_element().max(ray_t.min);
        let tmax = t0.max(t1).min_element().min(ray_t.max);
        tmin <= tmax
    }

    /// Minimum coordinate along an axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis_min(&self, axis: usize) -> f32 {
        self.min[axis]
    }

    /// True when every axis satisfies `min <= max` and no corner is NaN.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// True if `p` lies inside the box or on its boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// True if `other` is fully inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Identity for [`Aabb::encapsulate`]: contains nothing.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_box(rng: &mut StdRng) -> Aabb {
        let a = Vec3::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let b = Vec3::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        Aabb::from_points(a, b)
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Vec3::ZERO);
        assert_eq!(surrounding.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_encapsulate_bounds_both_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_box(&mut rng);
            let b = random_box(&mut rng);
            let mut u = a;
            u.encapsulate(&b);

            assert!(u.is_valid());
            assert!(u.contains(&a));
            assert!(u.contains(&b));
        }
    }

    #[test]
    fn test_encapsulate_empty_is_identity() {
        let b = Aabb::from_points(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let mut e = Aabb::EMPTY;
        assert!(!e.is_valid());
        e.encapsulate(&b);
        assert_eq!(e, b);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_from_inside() {
        let mut rng = StdRng::seed_from_u64(11);
        let aabb = Aabb::from_points(Vec3::splat(-2.0), Vec3::splat(3.0));
        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-1.9..2.9),
                rng.gen_range(-1.9..2.9),
                rng.gen_range(-1.9..2.9),
            );
            let dir = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let ray = Ray::new(origin, dir);
            assert!(aabb.hit(&ray, Interval::new(-0.5, 0.5)));
            assert!(aabb.hit(&ray, Interval::new(0.0, 1e5)));
        }
    }

    #[test]
    fn test_aabb_hit_axis_aligned_direction() {
        // Zero direction components produce infinite reciprocals.
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.5, 0.5, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.001, 1e5)));

        let ray = Ray::new(Vec3::new(1.5, 0.5, -5.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.001, 1e5)));
    }

    #[test]
    fn test_aabb_hit_degenerate_box() {
        // A flat box (zero thickness on Y) is still hit by a ray crossing it.
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(0.2, 5.0, 0.3), Vec3::new(0.0, -1.0, 0.0));
        assert!(aabb.hit(&ray, Interval::new(0.001, 1e5)));
    }

    #[test]
    fn test_aabb_axis_min() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.axis_min(1), 0.0);
    }
}
