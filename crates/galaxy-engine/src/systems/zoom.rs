//! Eased camera transitions toward a selected body.
//!
//! At most one transition is live. Starting a new one reads the live camera
//! first, then cancels the old step handle and requests a fresh one, so the
//! camera is never left without a driver and two transitions never blend.

use glam::Vec3;
use log::debug;
use crate::core::scheduler::{FrameScheduler, Task, TaskHandle};
use crate::extensions::easing::{ease_vec3, Easing};
use crate::input::orbit_controls::OrbitControls;
use crate::renderer::camera::PerspectiveCamera;

/// Start and end state of one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub start_position: Vec3,
    pub start_target: Vec3,
    pub end_position: Vec3,
    pub end_target: Vec3,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl ZoomAnimation {
    /// Linear progress in [0, 1] at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }
}

/// Outcome of one zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomProgress {
    Running,
    Finished,
}

#[derive(Debug, Default)]
pub struct ZoomAnimator {
    current: Option<ZoomAnimation>,
    handle: Option<TaskHandle>,
    easing: Easing,
}

impl ZoomAnimator {
    pub fn new(easing: Easing) -> Self {
        Self { current: None, handle: None, easing }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Begin a transition to `target`, ending `distance` away along the
    /// current viewing direction. Replaces any transition in flight.
    pub fn zoom_to(
        &mut self,
        camera: &PerspectiveCamera,
        controls_target: Vec3,
        target: Vec3,
        distance: f32,
        duration_ms: f64,
        now_ms: f64,
        scheduler: &mut FrameScheduler,
    ) -> ZoomAnimation {
        let start_position = camera.position;
        let start_target = controls_target;
        let direction = (start_position - start_target).try_normalize().unwrap_or(Vec3::Z);
        let animation = ZoomAnimation {
            start_position,
            start_target,
            end_position: target + direction * distance,
            end_target: target,
            start_ms: now_ms,
            duration_ms,
        };

        if let Some(old) = self.handle.take() {
            scheduler.cancel(old);
        }
        self.handle = Some(scheduler.request_frame(Task::ZoomStep));
        self.current = Some(animation);
        debug!("zoom to {:?} at distance {:.2} over {}ms", target, distance, duration_ms);
        animation
    }

    /// Run the step scheduled under `handle`. Stale handles return `None`.
    /// Reschedules itself until progress reaches 1.
    pub fn step(
        &mut self,
        handle: TaskHandle,
        now_ms: f64,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
        scheduler: &mut FrameScheduler,
    ) -> Option<ZoomProgress> {
        if self.handle != Some(handle) {
            return None;
        }
        let animation = self.current?;
        let k = animation.progress(now_ms);

        camera.position = ease_vec3(animation.start_position, animation.end_position, k, self.easing);
        controls.target = ease_vec3(animation.start_target, animation.end_target, k, self.easing);
        controls.halt();
        controls.update(camera);

        if k < 1.0 {
            self.handle = Some(scheduler.request_frame(Task::ZoomStep));
            Some(ZoomProgress::Running)
        } else {
            self.handle = None;
            self.current = None;
            debug!("zoom finished");
            Some(ZoomProgress::Finished)
        }
    }

    /// Stop the transition in place. Returns whether one was running.
    pub fn cancel(&mut self, scheduler: &mut FrameScheduler) -> bool {
        self.current = None;
        match self.handle.take() {
            Some(handle) => {
                scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ZoomAnimation> {
        self.current.as_ref()
    }

    pub fn handle(&self) -> Option<TaskHandle> {
        self.handle
    }
}
