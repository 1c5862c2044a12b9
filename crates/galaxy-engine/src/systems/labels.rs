//! Screen-space placement of the body labels.

use glam::Vec3;
use crate::api::config::LabelConfig;
use crate::api::types::BodyId;
use crate::renderer::camera::PerspectiveCamera;

/// Screen position of one label, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl LabelPlacement {
    pub const HIDDEN: LabelPlacement = LabelPlacement { x: 0.0, y: 0.0, visible: false };
}

/// Receives label style writes. The web bridge moves DOM elements.
pub trait LabelSink {
    fn place(&mut self, body: BodyId, placement: LabelPlacement);
}

/// Last placement written for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBinding {
    pub body: BodyId,
    pub last: LabelPlacement,
}

/// Project a world point to container pixels. Visible iff the projected
/// depth is in front of the far plane, which also rejects points behind
/// the camera.
pub fn project_to_screen(camera: &PerspectiveCamera, world: Vec3, width: f32, height: f32) -> LabelPlacement {
    let ndc = camera.project(world);
    LabelPlacement {
        x: (ndc.x * 0.5 + 0.5) * width,
        y: (-ndc.y * 0.5 + 0.5) * height,
        visible: ndc.z < 1.0,
    }
}

#[derive(Debug)]
pub struct LabelProjector {
    bindings: [LabelBinding; 3],
    every_n_ticks: u64,
    min_pixel_delta: f32,
    writes: u64,
}

impl LabelProjector {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            bindings: BodyId::ALL.map(|body| LabelBinding { body, last: LabelPlacement::HIDDEN }),
            every_n_ticks: u64::from(config.every_n_ticks.max(1)),
            min_pixel_delta: config.min_pixel_delta,
            writes: 0,
        }
    }

    /// Whether render tick `frame` is a projection tick.
    pub fn is_due(&self, frame: u64) -> bool {
        frame % self.every_n_ticks == 0
    }

    /// Project every body and write the ones that moved or changed
    /// visibility. Returns the number of writes made.
    pub fn project(
        &mut self,
        camera: &PerspectiveCamera,
        positions: &[Vec3; 3],
        width: f32,
        height: f32,
        sink: &mut dyn LabelSink,
    ) -> usize {
        let mut written = 0;
        for binding in &mut self.bindings {
            let next = project_to_screen(camera, positions[binding.body.index()], width, height);
            let last = binding.last;
            let moved = (next.x - last.x).abs() > self.min_pixel_delta
                || (next.y - last.y).abs() > self.min_pixel_delta;
            if !moved && next.visible == last.visible {
                continue;
            }
            sink.place(binding.body, next);
            binding.last = next;
            written += 1;
        }
        self.writes += written as u64;
        written
    }

    pub fn binding(&self, body: BodyId) -> &LabelBinding {
        &self.bindings[body.index()]
    }

    /// Total style writes since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

/// Label sink for tests.
#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingLabels {
        pub writes: Vec<(BodyId, LabelPlacement)>,
    }

    impl LabelSink for RecordingLabels {
        fn place(&mut self, body: BodyId, placement: LabelPlacement) {
            self.writes.push((body, placement));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingLabels;
    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, 5.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn center_projects_to_middle_of_container() {
        let p = project_to_screen(&camera(), Vec3::ZERO, 800.0, 400.0);
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 200.0).abs() < 1e-3);
        assert!(p.visible);
    }

    #[test]
    fn behind_camera_is_hidden() {
        let p = project_to_screen(&camera(), Vec3::new(0.0, 0.0, 10.0), 800.0, 400.0);
        assert!(!p.visible);
    }

    #[test]
    fn up_in_world_is_up_on_screen() {
        let p = project_to_screen(&camera(), Vec3::new(0.0, 1.0, 0.0), 800.0, 400.0);
        assert!(p.y < 200.0);
    }

    #[test]
    fn throttle_runs_every_third_tick() {
        let projector = LabelProjector::new(&LabelConfig::default());
        let due: Vec<u64> = (1..=9).filter(|f| projector.is_due(*f)).collect();
        assert_eq!(due, vec![3, 6, 9]);
    }

    #[test]
    fn sub_pixel_motion_is_suppressed() {
        let mut projector = LabelProjector::new(&LabelConfig::default());
        let mut sink = RecordingLabels::default();
        let cam = camera();
        let mut positions = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.5, 0.0)];

        assert_eq!(projector.project(&cam, &positions, 800.0, 400.0, &mut sink), 3);

        // A hair of world motion is well under a pixel
        positions[1].x += 1e-4;
        assert_eq!(projector.project(&cam, &positions, 800.0, 400.0, &mut sink), 0);
        assert_eq!(projector.writes(), 3);

        positions[1].x += 0.5;
        assert_eq!(projector.project(&cam, &positions, 800.0, 400.0, &mut sink), 1);
        assert_eq!(sink.writes.last().map(|w| w.0), Some(BodyId::Octavia));
    }

    #[test]
    fn visibility_flip_writes_even_without_motion() {
        let mut projector = LabelProjector::new(&LabelConfig::default());
        let mut sink = RecordingLabels::default();
        let cam = camera();
        let positions = [Vec3::ZERO; 3];
        projector.project(&cam, &positions, 800.0, 400.0, &mut sink);

        let behind = [Vec3::ZERO, Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)];
        assert_eq!(projector.project(&cam, &behind, 800.0, 400.0, &mut sink), 1);
        assert!(!projector.binding(BodyId::Zythera).last.visible);
    }
}
