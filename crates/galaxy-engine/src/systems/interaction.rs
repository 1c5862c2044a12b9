//! Pointer picking against the selectable bodies.

use glam::{Vec2, Vec3};
use log::debug;
use crate::api::types::{BodyId, SelectionInfo};
use crate::core::scene::NodeId;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::ray::raycast;
use crate::systems::scene_builder::GalaxyScene;

/// Lookup entry for one selectable body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectableTarget {
    pub body: BodyId,
    /// Raycast root: the star mesh, or the pivot carrying an orbiting body.
    pub node: NodeId,
    /// Camera distance at the end of a zoom, before the tier multiplier.
    pub zoom_distance: f32,
    /// Passed through in the selection payload.
    pub radius: Option<f32>,
}

impl SelectableTarget {
    /// Where the camera should look right now. Orbiting bodies move every
    /// frame, so this is read at selection time.
    pub fn target_point(&self, scene: &GalaxyScene) -> Vec3 {
        scene.body_position(self.body)
    }

    pub fn selection(&self, scene: &GalaxyScene) -> SelectionInfo {
        SelectionInfo { position: self.target_point(scene), radius: self.radius }
    }
}

/// Convert a container-relative pointer position to normalized device
/// coordinates. `None` for a zero-size container.
pub fn pointer_to_ndc(pointer: Vec2, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new(pointer.x / width * 2.0 - 1.0, -(pointer.y / height) * 2.0 + 1.0))
}

#[derive(Debug)]
pub struct InteractionController {
    targets: [SelectableTarget; 3],
    roots: [NodeId; 3],
}

impl InteractionController {
    pub fn new(scene: &GalaxyScene) -> Self {
        let targets = BodyId::ALL.map(|body| {
            let b = scene.body(body);
            SelectableTarget {
                body,
                node: b.pivot().unwrap_or(b.mesh),
                zoom_distance: scene.zoom_distance(body),
                radius: b.orbit_radius(),
            }
        });
        let roots = targets.map(|t| t.node);
        Self { targets, roots }
    }

    pub fn target(&self, body: BodyId) -> &SelectableTarget {
        &self.targets[body.index()]
    }

    /// Body under the pointer, nearest first. A miss is `None`.
    pub fn pick(
        &self,
        scene: &GalaxyScene,
        camera: &PerspectiveCamera,
        pointer: Vec2,
        width: f32,
        height: f32,
    ) -> Option<BodyId> {
        let ndc = pointer_to_ndc(pointer, width, height)?;
        let ray = camera.ray_from_ndc(ndc.x, ndc.y);
        let hit = raycast(&scene.graph, &ray, &self.roots).into_iter().next()?;
        let body = scene.body_for_node(hit.node);
        debug!("pick at ({:.3}, {:.3}): {:?}", ndc.x, ndc.y, body);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{AutoscaleConfig, GalaxyConfig};
    use crate::systems::autoscale::{AutoscaleProfile, DeviceTier, Orientation};
    use crate::systems::labels::project_to_screen;
    use crate::systems::scene_builder::SceneBuilder;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn scene() -> GalaxyScene {
        let mut config = GalaxyConfig::default();
        config.galaxy.base_count = 10;
        let profile =
            AutoscaleProfile::for_tier(DeviceTier::Desktop, Orientation::Landscape, &AutoscaleConfig::default());
        SceneBuilder::new(&config).build(&profile)
    }

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, W / H, 0.1, 100.0);
        camera.position = Vec3::new(3.0, 3.0, 3.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn screen_of(scene: &GalaxyScene, camera: &PerspectiveCamera, body: BodyId) -> Vec2 {
        let p = project_to_screen(camera, scene.body_position(body), W, H);
        Vec2::new(p.x, p.y)
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(pointer_to_ndc(Vec2::ZERO, W, H), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(Vec2::new(W, H), W, H), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(pointer_to_ndc(Vec2::new(W / 2.0, H / 2.0), W, H), Some(Vec2::ZERO));
        assert_eq!(pointer_to_ndc(Vec2::ZERO, 0.0, H), None);
    }

    #[test]
    fn picks_each_body_at_its_screen_position() {
        let scene = scene();
        let camera = camera();
        let controller = InteractionController::new(&scene);
        for body in BodyId::ALL {
            let pointer = screen_of(&scene, &camera, body);
            assert_eq!(controller.pick(&scene, &camera, pointer, W, H), Some(body), "{:?}", body);
        }
    }

    #[test]
    fn empty_space_is_a_miss() {
        let scene = scene();
        let controller = InteractionController::new(&scene);
        assert_eq!(controller.pick(&scene, &camera(), Vec2::new(5.0, 5.0), W, H), None);
        assert_eq!(controller.pick(&scene, &camera(), Vec2::new(5.0, 5.0), 0.0, 0.0), None);
    }

    #[test]
    fn glow_edge_still_selects_star() {
        let scene = scene();
        let camera = camera();
        let controller = InteractionController::new(&scene);
        // Just outside the star core (0.10) but inside the glow (0.18)
        let right = camera.orientation * Vec3::X;
        let edge = scene.body_position(BodyId::Star) + right * 0.15;
        let p = project_to_screen(&camera, edge, W, H);
        assert_eq!(controller.pick(&scene, &camera, Vec2::new(p.x, p.y), W, H), Some(BodyId::Star));
    }

    #[test]
    fn payload_carries_live_position_and_orbit_radius() {
        let scene = scene();
        let controller = InteractionController::new(&scene);
        let star = controller.target(BodyId::Star).selection(&scene);
        assert_eq!(star.radius, None);
        let zythera = controller.target(BodyId::Zythera).selection(&scene);
        assert_eq!(zythera.radius, Some(1.1));
        assert!((zythera.position - scene.body_position(BodyId::Zythera)).length() < 1e-6);
        assert_eq!(controller.target(BodyId::Octavia).zoom_distance, 1.0);
    }
}
