//! Damped orbit controller.
//!
//! Pointer input accumulates impulses (spherical rotation, pan offset, dolly
//! scale); `update` applies a `damping_factor` fraction of them to the camera
//! each frame and decays the rest, so motion eases out over several frames.
//! One pointer rotates, two pointers pinch (dolly plus pan), the wheel dollies.

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::api::config::CameraConfig;
use crate::renderer::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;
/// Smallest camera displacement reported as movement.
const MOVE_EPS: f32 = 1e-4;
/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLE_MARGIN: f32 = 1e-3;

/// Interaction boundaries reported to the auto-orbit scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Start,
    End,
}

#[derive(Debug, Clone, Copy)]
struct Pointer {
    id: i32,
    pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    pub enabled: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth / polar impulses in radians.
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
    pointers: Vec<Pointer>,
    /// Container height in CSS pixels; rotation is relative to it.
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(config: &CameraConfig, target: Vec3) -> Self {
        Self {
            target,
            enabled: true,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            pointers: Vec::with_capacity(2),
            viewport_height: 1.0,
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    /// Number of pointers currently held down.
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `Start` when the first pointer goes down.
    pub fn pointer_down(&mut self, id: i32, pos: Vec2) -> Option<ControlEvent> {
        if !self.enabled || self.pointers.len() >= 2 || self.pointers.iter().any(|p| p.id == id) {
            return None;
        }
        self.pointers.push(Pointer { id, pos });
        (self.pointers.len() == 1).then_some(ControlEvent::Start)
    }

    pub fn pointer_move(&mut self, id: i32, pos: Vec2, camera: &PerspectiveCamera) {
        let Some(idx) = self.pointers.iter().position(|p| p.id == id) else { return };
        match self.pointers.len() {
            1 => {
                let delta = pos - self.pointers[idx].pos;
                self.pointers[idx].pos = pos;
                self.rotate(delta);
            }
            2 => {
                let other = self.pointers[1 - idx].pos;
                let before = self.pointers[idx].pos;
                self.pointers[idx].pos = pos;

                let old_distance = before.distance(other);
                let new_distance = pos.distance(other);
                if old_distance > EPS && new_distance > EPS {
                    // Spreading the fingers zooms in.
                    self.scale /= (new_distance / old_distance).powf(self.zoom_speed);
                }

                let center_before = (before + other) * 0.5;
                let center_now = (pos + other) * 0.5;
                self.pan(center_now - center_before, camera);
            }
            _ => {}
        }
    }

    /// Returns `End` when the last pointer lifts.
    pub fn pointer_up(&mut self, id: i32) -> Option<ControlEvent> {
        let idx = self.pointers.iter().position(|p| p.id == id)?;
        self.pointers.remove(idx);
        self.pointers.is_empty().then_some(ControlEvent::End)
    }

    /// Dolly by one wheel notch. A wheel gesture is a complete interaction.
    pub fn wheel(&mut self, delta_y: f32) -> [ControlEvent; 2] {
        if self.enabled {
            let step = 0.95f32.powf(self.zoom_speed);
            if delta_y > 0.0 {
                self.scale /= step;
            } else if delta_y < 0.0 {
                self.scale *= step;
            }
        }
        [ControlEvent::Start, ControlEvent::End]
    }

    fn rotate(&mut self, delta: Vec2) {
        let h = self.viewport_height;
        self.delta_theta -= 2.0 * PI * delta.x / h * self.rotate_speed;
        self.delta_phi -= 2.0 * PI * delta.y / h * self.rotate_speed;
    }

    /// Move the target in the camera's screen plane, scaled so the
    /// point under the cursor tracks it at the target's depth.
    fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera) {
        let distance = (camera.position - self.target).length();
        let world_per_px = 2.0 * distance * (camera.fov.to_radians() * 0.5).tan() / self.viewport_height;
        let right = camera.orientation * Vec3::X;
        let up = camera.orientation * Vec3::Y;
        self.pan_offset += (-right * delta.x + up * delta.y) * world_per_px * self.pan_speed;
    }

    /// Drop any pending impulses. Held pointers stay tracked.
    pub fn halt(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    /// Apply pending impulses to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.length().max(EPS);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let damping = self.damping_factor.clamp(0.0, 1.0);
        theta += self.delta_theta * damping;
        phi = (phi + self.delta_phi * damping).clamp(POLE_MARGIN, PI - POLE_MARGIN);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * damping;

        let before = camera.position;
        let sin_phi = phi.sin();
        camera.position = self.target
            + Vec3::new(radius * sin_phi * theta.sin(), radius * phi.cos(), radius * sin_phi * theta.cos());
        camera.look_at(self.target);

        let decay = 1.0 - damping;
        self.delta_theta *= decay;
        self.delta_phi *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;

        (camera.position - before).length_squared() > MOVE_EPS * MOVE_EPS
    }
}
