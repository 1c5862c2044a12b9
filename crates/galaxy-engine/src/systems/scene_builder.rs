//! Builds the galaxy scene once per mount.

use glam::Vec3;
use log::info;
use crate::api::config::GalaxyConfig;
use crate::api::types::BodyId;
use crate::components::body::CelestialBody;
use crate::components::mesh::{Color, Geometry, Material, MeshComponent};
use crate::core::rng::Rng;
use crate::core::scene::{Node, NodeId, NodeKind, SceneGraph};
use crate::systems::autoscale::AutoscaleProfile;
use crate::systems::galaxy::{self, PointCloud};

/// The star sits among the arms, off the galactic center.
pub const STAR_POSITION: Vec3 = Vec3::new(1.6, 0.0, 1.6);

const RING_HALF_WIDTH: f32 = 0.001;
const RING_SEGMENTS: u32 = 64;

/// DOM overlay description for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSpec {
    pub body: BodyId,
    pub text: &'static str,
    pub color: Color,
}

struct OrbiterSpec {
    id: BodyId,
    color: u32,
    orbit_radius: f32,
    inclination_deg: f32,
    base_speed: f32,
    ring_opacity: f32,
    zoom_distance: f32,
}

const ORBITERS: [OrbiterSpec; 2] = [
    OrbiterSpec {
        id: BodyId::Octavia,
        color: 0x22c55e,
        orbit_radius: 0.8,
        inclination_deg: 8.0,
        base_speed: 0.25,
        ring_opacity: 0.35,
        zoom_distance: 1.0,
    },
    OrbiterSpec {
        id: BodyId::Zythera,
        color: 0xef4444,
        orbit_radius: 1.1,
        inclination_deg: 15.0,
        base_speed: 0.2,
        ring_opacity: 0.3,
        zoom_distance: 1.2,
    },
];

const STAR_ZOOM_DISTANCE: f32 = 1.0;

pub const LABELS: [LabelSpec; 3] = [
    LabelSpec { body: BodyId::Star, text: "Sarakt Star", color: Color::from_hex(0xa78bfa) },
    LabelSpec { body: BodyId::Octavia, text: "Sarakt Prime", color: Color::from_hex(0x22c55e) },
    LabelSpec { body: BodyId::Zythera, text: "Zythera", color: Color::from_hex(0xef4444) },
];

/// Everything later systems need a handle to.
#[derive(Debug)]
pub struct GalaxyScene {
    pub graph: SceneGraph,
    /// Points node carrying the galaxy's rotation.
    pub galaxy: NodeId,
    pub points: PointCloud,
    /// Indexed by `BodyId::index`.
    pub bodies: [CelestialBody; 3],
    /// Preferred camera distance when zooming to each body, by `BodyId::index`.
    pub zoom_distances: [f32; 3],
    pub rings: [NodeId; 2],
    pub star_position: Vec3,
}

impl GalaxyScene {
    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut CelestialBody {
        &mut self.bodies[id.index()]
    }

    /// Live world position of a body's mesh.
    pub fn body_position(&self, id: BodyId) -> Vec3 {
        self.graph.world_position(self.body(id).mesh)
    }

    pub fn zoom_distance(&self, id: BodyId) -> f32 {
        self.zoom_distances[id.index()]
    }

    /// Resolve the body owning `node`: the body mesh itself or a direct child of it.
    pub fn body_for_node(&self, node: NodeId) -> Option<BodyId> {
        let parent = self.graph.parent(node);
        self.bodies
            .iter()
            .find(|b| b.mesh == node || parent == Some(b.mesh))
            .map(|b| b.id)
    }
}

/// Spawn an inclined pivot at the star, the body on it and its guide ring.
fn spawn_orbiter(graph: &mut SceneGraph, spec: &OrbiterSpec) -> (CelestialBody, NodeId) {
    let inclination = spec.inclination_deg.to_radians();
    let tag = spec.id.tag();
    let pivot = graph.spawn(
        Node::new(NodeKind::Group)
            .with_tag(format!("{tag}.pivot"))
            .with_position(STAR_POSITION)
            .with_rotation(Vec3::new(inclination, 0.0, 0.0)),
    );
    let mesh = graph.spawn_child(
        pivot,
        Node::new(NodeKind::Mesh(MeshComponent::new(
            Geometry::Sphere { radius: 0.04, segments: 12 },
            Material::standard(Color::from_hex(spec.color)).with_surface(0.6, 0.05),
        )))
        .with_tag(tag)
        .with_position(Vec3::new(spec.orbit_radius, 0.0, 0.0)),
    );
    // Same inclined plane as the orbit
    let ring = graph.spawn(
        Node::new(NodeKind::Mesh(MeshComponent::new(
            Geometry::Ring {
                inner: spec.orbit_radius - RING_HALF_WIDTH,
                outer: spec.orbit_radius + RING_HALF_WIDTH,
                segments: RING_SEGMENTS,
            },
            Material::basic(Color::from_hex(spec.color), spec.ring_opacity),
        )))
        .with_tag(format!("{tag}.ring"))
        .with_position(STAR_POSITION)
        .with_rotation(Vec3::new(inclination, 0.0, 0.0)),
    );
    let body = CelestialBody::orbiting(spec.id, mesh, pivot, spec.orbit_radius, inclination, spec.base_speed);
    (body, ring)
}

pub struct SceneBuilder<'a> {
    config: &'a GalaxyConfig,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a GalaxyConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, profile: &AutoscaleProfile) -> GalaxyScene {
        let params = &self.config.galaxy;
        let mut graph = SceneGraph::new();

        let count = galaxy::particle_count(params.base_count, profile.particle_multiplier);
        let size = if profile.is_mobile() { params.mobile_point_size } else { params.point_size };
        let points = galaxy::generate(params, count, size, &mut Rng::new(self.config.seed));
        let galaxy = graph.spawn(Node::new(NodeKind::Points).with_tag("galaxy"));

        graph.spawn(
            Node::new(NodeKind::AmbientLight { color: Color::WHITE, intensity: 0.25 }).with_tag("ambient"),
        );

        // Dark void at the galactic center
        graph.spawn(
            Node::new(NodeKind::Mesh(MeshComponent::new(
                Geometry::Sphere { radius: 0.12, segments: 16 },
                Material::standard(Color::BLACK).with_surface(1.0, 0.0),
            )))
            .with_tag("void"),
        );

        let star_mesh = graph.spawn(
            Node::new(NodeKind::Mesh(MeshComponent::new(
                Geometry::Sphere { radius: 0.10, segments: 16 },
                Material::standard(Color::from_hex(0x9333ea))
                    .with_emissive(Color::from_hex(0x6d28d9), 1.1)
                    .with_surface(0.3, 0.1)
                    .with_opacity(0.95),
            )))
            .with_tag(BodyId::Star.tag())
            .with_position(STAR_POSITION),
        );
        graph.spawn_child(
            star_mesh,
            Node::new(NodeKind::Mesh(MeshComponent::new(
                Geometry::Sphere { radius: 0.18, segments: 16 },
                Material::basic(Color::from_hex(0x9333ea), 0.3),
            )))
            .with_tag("star.glow"),
        );
        graph.spawn(
            Node::new(NodeKind::PointLight {
                color: Color::from_hex(0x9f7aea),
                intensity: 1.2,
                range: 10.0,
                decay: 2.0,
            })
            .with_tag("star.light")
            .with_position(STAR_POSITION),
        );

        let (octavia, octavia_ring) = spawn_orbiter(&mut graph, &ORBITERS[0]);
        let (zythera, zythera_ring) = spawn_orbiter(&mut graph, &ORBITERS[1]);

        info!(
            "galaxy scene built: {} particles, tier {:?}, {} nodes",
            count,
            profile.tier,
            graph.len()
        );

        GalaxyScene {
            graph,
            galaxy,
            points,
            bodies: [CelestialBody::star(BodyId::Star, star_mesh), octavia, zythera],
            zoom_distances: [STAR_ZOOM_DISTANCE, ORBITERS[0].zoom_distance, ORBITERS[1].zoom_distance],
            rings: [octavia_ring, zythera_ring],
            star_position: STAR_POSITION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::AutoscaleConfig;
    use crate::systems::autoscale::{DeviceTier, Orientation};

    fn build(tier: DeviceTier) -> GalaxyScene {
        let mut config = GalaxyConfig::default();
        config.galaxy.base_count = 1_000;
        let profile = AutoscaleProfile::for_tier(tier, Orientation::Landscape, &AutoscaleConfig::default());
        SceneBuilder::new(&config).build(&profile)
    }

    #[test]
    fn particle_count_scales_with_tier() {
        assert_eq!(build(DeviceTier::Desktop).points.len(), 1_000);
        assert_eq!(build(DeviceTier::Tablet).points.len(), 1_000);
        assert_eq!(build(DeviceTier::Mobile).points.len(), 500);
        assert_eq!(build(DeviceTier::Mobile).points.size, 0.015);
    }

    #[test]
    fn rebuild_is_identical() {
        let a = build(DeviceTier::Desktop);
        let b = build(DeviceTier::Desktop);
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn bodies_start_where_expected() {
        let scene = build(DeviceTier::Desktop);
        assert!((scene.body_position(BodyId::Star) - STAR_POSITION).length() < 1e-5);

        // Octavia sits at +X of its pivot, tilted about X which leaves +X fixed
        let octavia = scene.body_position(BodyId::Octavia);
        assert!((octavia - (STAR_POSITION + Vec3::new(0.8, 0.0, 0.0))).length() < 1e-5);
        assert_eq!(scene.body(BodyId::Zythera).orbit_radius(), Some(1.1));
        assert_eq!(scene.zoom_distance(BodyId::Zythera), 1.2);
    }

    #[test]
    fn glow_child_resolves_to_star() {
        let scene = build(DeviceTier::Desktop);
        let glow = scene.graph.find_by_tag("star.glow").unwrap();
        assert_eq!(scene.body_for_node(glow), Some(BodyId::Star));
        let ring = scene.rings[0];
        assert_eq!(scene.body_for_node(ring), None);
    }

    #[test]
    fn ring_lies_in_orbit_plane() {
        let scene = build(DeviceTier::Desktop);
        let pivot = scene.body(BodyId::Zythera).pivot().unwrap();
        let pivot_normal = scene.graph.world_matrix(pivot).transform_vector3(Vec3::Y);
        let ring_normal = scene.graph.world_matrix(scene.rings[1]).transform_vector3(Vec3::Y);
        assert!((pivot_normal - ring_normal).length() < 1e-6);
    }
}
