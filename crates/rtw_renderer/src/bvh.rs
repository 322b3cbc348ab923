//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree with exactly one primitive per leaf. Construction splits at the
//! median along a randomly chosen axis; pass a seeded RNG for a reproducible tree.

use std::sync::Arc;

use crate::{Geometry, HitRecord, RayDesc};
use rand::Rng;
use rtw_math::Aabb;

/// BVH node - either a branch with two children or a leaf with one primitive.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a shared handle to a single primitive.
    Leaf {
        geometry: Arc<dyn Geometry>,
        bbox: Aabb,
    },
    /// Root of a tree built over zero primitives.
    Empty,
}

/// Shape summary of a built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhStats {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
}

impl BvhNode {
    /// Build a BVH over `geometries`.
    ///
    /// The slice is reordered in place; the caller's primitive list is
    /// usually cloned into a scratch vector first.
    pub fn build<R: Rng + ?Sized>(geometries: &mut [Arc<dyn Geometry>], rng: &mut R) -> Self {
        if geometries.is_empty() {
            return BvhNode::Empty;
        }
        Self::build_range(geometries, rng)
    }

    fn build_range<R: Rng + ?Sized>(geometries: &mut [Arc<dyn Geometry>], rng: &mut R) -> Self {
        let axis = rng.gen_range(0..3usize);
        let key = |g: &Arc<dyn Geometry>| g.bounding_box().axis_min(axis);

        let (left, right) = match geometries.len() {
            1 => {
                let geometry = Arc::clone(&geometries[0]);
                let bbox = geometry.bounding_box();
                return BvhNode::Leaf { geometry, bbox };
            }
            2 => {
                let (a, b) = geometries.split_at_mut(1);
                if key(&a[0]).total_cmp(&key(&b[0])).is_lt() {
                    (Self::build_range(a, rng), Self::build_range(b, rng))
                } else {
                    (Self::build_range(b, rng), Self::build_range(a, rng))
                }
            }
            n => {
                geometries.sort_by(|a, b| key(a).total_cmp(&key(b)));
                let (lo, hi) = geometries.split_at_mut(n / 2);
                (Self::build_range(lo, rng), Self::build_range(hi, rng))
            }
        };

        let mut bbox = left.bounding_box();
        bbox.encapsulate(&right.bounding_box());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Find the closest hit beneath this node.
    ///
    /// Every hit tightens `ray.t.max` to its distance, so anything visited
    /// afterwards can only report something closer.
    pub fn hit<'a>(&'a self, ray: &mut RayDesc) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { geometry, bbox } => {
                if !bbox.hit(&ray.ray, ray.t) {
                    return None;
                }
                let rec = geometry.hit(ray)?;
                ray.t.max = rec.t;
                Some(rec)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(&ray.ray, ray.t) {
                    return None;
                }
                let hit_left = left.hit(ray);
                // Right may still hold something closer than the left hit.
                let hit_right = right.hit(ray);
                hit_right.or(hit_left)
            }
        }
    }

    /// Bounding box enclosing everything beneath this node.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn stats(&self) -> BvhStats {
        BvhStats {
            nodes: self.node_count(),
            leaves: self.leaf_count(),
            depth: self.depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rtw_math::{Interval, Ray, Vec3};

    fn random_spheres(n: usize, rng: &mut StdRng) -> Vec<Arc<dyn Geometry>> {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        (0..n)
            .map(|_| {
                let center = Vec3::new(
                    rng.gen_range(-20.0..20.0),
                    rng.gen_range(-20.0..20.0),
                    rng.gen_range(-20.0..20.0),
                );
                let radius = rng.gen_range(0.1..2.0);
                Arc::new(Sphere::new(center, radius, Arc::clone(&material))) as Arc<dyn Geometry>
            })
            .collect()
    }

    /// Recursively check box containment; returns the leaves' primitives.
    fn check_node(node: &BvhNode, leaves: &mut Vec<*const ()>) {
        match node {
            BvhNode::Empty => panic!("empty node inside a non-empty tree"),
            BvhNode::Leaf { geometry, bbox } => {
                assert_eq!(*bbox, geometry.bounding_box());
                leaves.push(Arc::as_ptr(geometry) as *const ());
            }
            BvhNode::Branch { left, right, bbox } => {
                let union = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
                assert_eq!(*bbox, union);
                assert!(bbox.is_valid());
                check_node(left, leaves);
                check_node(right, leaves);
            }
        }
    }

    #[test]
    fn test_bvh_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let bvh = BvhNode::build(&mut [], &mut rng);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.leaf_count(), 0);

        let mut ray = RayDesc::new(Ray::new(Vec3::ZERO, Vec3::X));
        assert!(bvh.hit(&mut ray).is_none());
    }

    #[test]
    fn test_bvh_single_sphere() {
        let mut rng = StdRng::seed_from_u64(1);
        let sphere: Arc<dyn Geometry> = Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ));
        let bvh = BvhNode::build(&mut [sphere], &mut rng);
        assert!(bvh.is_leaf());

        let mut ray = RayDesc::new(Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)));
        let rec = bvh.hit(&mut ray).expect("hit");
        assert!((rec.t - 0.5).abs() < 1e-4);
        assert_eq!(ray.t.max, rec.t);
    }

    #[test]
    fn test_bvh_structure_invariants() {
        let mut rng = StdRng::seed_from_u64(0xB0B);
        for n in 1..=50 {
            let spheres = random_spheres(n, &mut rng);
            let mut scratch = spheres.clone();
            let bvh = BvhNode::build(&mut scratch, &mut rng);

            let mut leaves = Vec::new();
            check_node(&bvh, &mut leaves);
            assert_eq!(bvh.leaf_count(), n);
            assert_eq!(bvh.node_count(), 2 * n - 1);

            // Every primitive appears in exactly one leaf.
            let mut expected: Vec<_> = spheres.iter().map(|g| Arc::as_ptr(g) as *const ()).collect();
            expected.sort();
            leaves.sort();
            assert_eq!(leaves, expected);
        }
    }

    #[test]
    fn test_bvh_two_primitives_ordered_on_axis() {
        let mut rng = StdRng::seed_from_u64(3);
        let m: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        for _ in 0..20 {
            let a: Arc<dyn Geometry> = Arc::new(Sphere::new(Vec3::splat(5.0), 1.0, Arc::clone(&m)));
            let b: Arc<dyn Geometry> = Arc::new(Sphere::new(Vec3::splat(-5.0), 1.0, Arc::clone(&m)));
            let bvh = BvhNode::build(&mut [a, b], &mut rng);
            match bvh {
                BvhNode::Branch { left, right, .. } => {
                    // b is smaller on every axis, so it always lands left.
                    assert_eq!(left.bounding_box().min, Vec3::splat(-6.0));
                    assert_eq!(right.bounding_box().min, Vec3::splat(4.0));
                }
                _ => panic!("two primitives must produce a branch"),
            }
        }
    }

    #[test]
    fn test_bvh_duplicate_and_degenerate_boxes() {
        let mut rng = StdRng::seed_from_u64(5);
        let m: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let mut geometries: Vec<Arc<dyn Geometry>> = (0..9)
            .map(|i| {
                let radius = if i % 3 == 0 { 0.0 } else { 1.0 };
                Arc::new(Sphere::new(Vec3::ZERO, radius, Arc::clone(&m))) as Arc<dyn Geometry>
            })
            .collect();
        let bvh = BvhNode::build(&mut geometries, &mut rng);
        assert_eq!(bvh.leaf_count(), 9);
        assert!(bvh.bounding_box().is_valid());
        assert_eq!(bvh.bounding_box(), Aabb::new(Vec3::splat(-1.0), Vec3::ONE));
    }

    #[test]
    fn test_bvh_returns_closest_hit() {
        let m: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let mut spheres: Vec<Arc<dyn Geometry>> = (0..10)
            .map(|i| {
                Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0 * i as f32 - 3.0), 1.0, Arc::clone(&m)))
                    as Arc<dyn Geometry>
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(9);
        let bvh = BvhNode::build(&mut spheres, &mut rng);

        let mut ray = RayDesc::with_interval(
            Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)),
            Interval::new(0.001, f32::INFINITY),
        );
        let rec = bvh.hit(&mut ray).expect("hit");
        assert!((rec.p.z - (-2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_build_is_deterministic_for_seed() {
        let mut rng = StdRng::seed_from_u64(77);
        let spheres = random_spheres(30, &mut rng);

        let order = |seed: u64| {
            let mut scratch = spheres.clone();
            let bvh = BvhNode::build(&mut scratch, &mut StdRng::seed_from_u64(seed));
            let mut leaves = Vec::new();
            check_node(&bvh, &mut leaves);
            leaves
        };
        assert_eq!(order(42), order(42));
    }
}
