//! Scene: the primitive list plus the BVH built over it.

use std::sync::Arc;

use crate::{BvhNode, Geometry, HitRecord, RayDesc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Primitives and their acceleration structure.
///
/// Build the BVH once all primitives are added, then query it as many times
/// as needed. BVH leaves share ownership of the primitives with the list.
#[derive(Default)]
pub struct Scene {
    geometries: Vec<Arc<dyn Geometry>>,
    root: Option<BvhNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive. Invalidates any previously built BVH.
    pub fn add<G: Geometry + 'static>(&mut self, geometry: G) {
        self.add_shared(Arc::new(geometry));
    }

    /// Add an already shared primitive. Invalidates any previously built BVH.
    pub fn add_shared(&mut self, geometry: Arc<dyn Geometry>) {
        self.root = None;
        self.geometries.push(geometry);
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Remove every primitive and tear down the BVH.
    pub fn clear(&mut self) {
        self.root = None;
        self.geometries.clear();
    }

    /// (Re)build the BVH from the current primitive list.
    pub fn build_acceleration_structure<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut scratch = self.geometries.clone();
        let root = BvhNode::build(&mut scratch, rng);
        let stats = root.stats();
        log::debug!(
            "built BVH over {} primitives: {} nodes, {} leaves, depth {}",
            self.geometries.len(),
            stats.nodes,
            stats.leaves,
            stats.depth
        );
        self.root = Some(root);
    }

    /// Build the BVH with a dedicated RNG so the tree is reproducible.
    pub fn build_acceleration_structure_seeded(&mut self, seed: u64) {
        self.build_acceleration_structure(&mut StdRng::seed_from_u64(seed));
    }

    /// True once a BVH matching the current primitive list exists.
    ///
    /// An empty scene never needs one.
    pub fn is_built(&self) -> bool {
        self.geometries.is_empty() || self.root.is_some()
    }

    pub fn bvh(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Closest hit along `ray` using the BVH.
    ///
    /// The caller's interval is never modified; traversal works on a copy.
    ///
    /// # Panics
    ///
    /// Panics if the scene has primitives but no BVH has been built since the
    /// last change. [`crate::Renderer::render`] checks this before dispatching.
    pub fn hit(&self, ray: &RayDesc) -> Option<HitRecord<'_>> {
        if self.geometries.is_empty() {
            return None;
        }
        let Some(root) = self.root.as_ref() else {
            panic!(
                "Scene::hit called on {} primitives before build_acceleration_structure",
                self.geometries.len()
            );
        };
        let mut local = *ray;
        root.hit(&mut local)
    }

    /// Closest hit by testing every primitive in turn, no BVH.
    pub fn hit_linear(&self, ray: &RayDesc) -> Option<HitRecord<'_>> {
        let mut local = *ray;
        let mut closest = None;
        for geometry in &self.geometries {
            if let Some(rec) = geometry.hit(&local) {
                local.t.max = rec.t;
                closest = Some(rec);
            }
        }
        closest
    }
}
