use glam::Vec3;
use crate::core::scene::{NodeId, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

/// A mesh hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest non-negative distance to a sphere, if the ray touches it.
    /// An origin inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// Test `ray` against the sphere meshes of `roots` and all their descendants.
/// Hidden nodes are skipped. Results are sorted nearest first.
pub fn raycast(scene: &SceneGraph, ray: &Ray, roots: &[NodeId]) -> Vec<RayHit> {
    let mut hits = Vec::new();
    let mut stack: Vec<NodeId> = roots.to_vec();
    while let Some(id) = stack.pop() {
        let Some(node) = scene.get(id) else { continue };
        if !scene.is_visible(id) {
            continue;
        }
        if let Some(radius) = node.mesh().and_then(|m| m.sphere_radius()) {
            let center = scene.world_position(id);
            let world_radius = radius * scene.world_max_scale(id);
            if let Some(distance) = ray.intersect_sphere(center, world_radius) {
                hits.push(RayHit { node: id, distance, point: ray.at(distance) });
            }
        }
        stack.extend(node.children.iter().copied());
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
