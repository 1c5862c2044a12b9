//! Per-frame scene motion: galaxy spin, star pulse, orbital revolution.

use glam::Vec3;
use crate::components::body::BodyKind;
use crate::core::time::FrameTime;
use crate::systems::scene_builder::GalaxyScene;

/// Advance every animated node. Call once per render tick.
///
/// Galaxy rotation and the star pulse are functions of elapsed time.
/// Orbits integrate angular speed over `delta`, so revolution speed does not
/// depend on frame rate.
pub fn tick_scene(scene: &mut GalaxyScene, time: FrameTime, rotation_speed: f32) {
    if let Some(galaxy) = scene.graph.get_mut(scene.galaxy) {
        galaxy.rotation.y = time.elapsed * rotation_speed;
    }

    for body in &scene.bodies {
        match body.kind {
            BodyKind::Star => {
                let scale = body.pulse_scale(time.elapsed);
                if let Some(node) = scene.graph.get_mut(body.mesh) {
                    node.scale = Vec3::splat(scale);
                }
            }
            BodyKind::Orbiting { pivot, .. } => {
                let step = body.angular_speed() * time.delta;
                if let Some(node) = scene.graph.get_mut(pivot) {
                    node.rotation.y += step;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{AutoscaleConfig, GalaxyConfig};
    use crate::api::types::BodyId;
    use crate::systems::autoscale::{AutoscaleProfile, DeviceTier, Orientation};
    use crate::systems::scene_builder::SceneBuilder;

    fn scene() -> GalaxyScene {
        let mut config = GalaxyConfig::default();
        config.galaxy.base_count = 10;
        let profile = AutoscaleProfile::for_tier(
            DeviceTier::Desktop,
            Orientation::Landscape,
            &AutoscaleConfig::default(),
        );
        SceneBuilder::new(&config).build(&profile)
    }

    #[test]
    fn galaxy_rotation_tracks_elapsed() {
        let mut scene = scene();
        tick_scene(&mut scene, FrameTime { elapsed: 10.0, delta: 0.016 }, 0.05);
        assert!((scene.graph.get(scene.galaxy).unwrap().rotation.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn star_pulse_uses_progress() {
        let mut scene = scene();
        scene.body_mut(BodyId::Star).progress = 1.0;
        tick_scene(&mut scene, FrameTime { elapsed: 0.0, delta: 0.0 }, 0.05);
        let mesh = scene.body(BodyId::Star).mesh;
        assert!((scene.graph.get(mesh).unwrap().scale.x - 1.35).abs() < 1e-6);
    }

    #[test]
    fn orbit_advance_is_frame_rate_independent() {
        let mut fast = scene();
        let mut slow = scene();
        for _ in 0..60 {
            tick_scene(&mut fast, FrameTime { elapsed: 0.0, delta: 1.0 / 60.0 }, 0.05);
        }
        for _ in 0..30 {
            tick_scene(&mut slow, FrameTime { elapsed: 0.0, delta: 1.0 / 30.0 }, 0.05);
        }
        let pivot = fast.body(BodyId::Octavia).pivot().unwrap();
        let a = fast.graph.get(pivot).unwrap().rotation.y;
        let b = slow.graph.get(pivot).unwrap().rotation.y;
        // One second at zero progress: 0.25 * 0.8 rad
        assert!((a - 0.2).abs() < 1e-5);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn orbiting_body_moves_along_its_orbit() {
        let mut scene = scene();
        let before = scene.body_position(BodyId::Zythera);
        tick_scene(&mut scene, FrameTime { elapsed: 0.0, delta: 0.25 }, 0.05);
        let after = scene.body_position(BodyId::Zythera);
        assert!((after - before).length() > 1e-3);
        let star = scene.star_position;
        assert!(((after - star).length() - 1.1).abs() < 1e-4);
    }
}
