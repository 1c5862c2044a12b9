//! Debounced viewport resize.
//!
//! Every resize event replaces the pending viewport and restarts the quiet
//! period timer. Only the last viewport of a burst is applied.

use log::{debug, warn};
use crate::api::config::AutoscaleConfig;
use crate::api::types::Viewport;
use crate::core::scheduler::{FrameScheduler, Task, TaskHandle};
use crate::input::orbit_controls::OrbitControls;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::traits::Renderer;
use crate::systems::autoscale::AutoscaleProfile;

#[derive(Debug)]
pub struct ResizeHandler {
    debounce_ms: f64,
    pending: Option<Viewport>,
    timer: Option<TaskHandle>,
    applied: u64,
}

impl ResizeHandler {
    pub fn new(debounce_ms: f64) -> Self {
        Self { debounce_ms, pending: None, timer: None, applied: 0 }
    }

    /// Record a resize and restart the quiet period.
    pub fn on_resize(&mut self, viewport: Viewport, now_ms: f64, scheduler: &mut FrameScheduler) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        self.pending = Some(viewport);
        self.timer = Some(scheduler.set_timeout(Task::ResizeSettle, self.debounce_ms, now_ms));
    }

    /// Take the settled viewport if `handle` is the live timer.
    pub fn settle(&mut self, handle: TaskHandle) -> Option<Viewport> {
        if self.timer != Some(handle) {
            return None;
        }
        self.timer = None;
        self.pending.take()
    }

    /// Apply a settled viewport. A zero-size viewport is skipped and leaves
    /// every parameter untouched. Returns the new profile when applied.
    pub fn apply(
        &mut self,
        viewport: &Viewport,
        config: &AutoscaleConfig,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
        renderer: &mut dyn Renderer,
    ) -> Option<AutoscaleProfile> {
        let Some(aspect) = viewport.aspect() else {
            warn!("resize skipped: zero-size viewport {}x{}", viewport.width, viewport.height);
            return None;
        };
        let profile = AutoscaleProfile::from_viewport(viewport, config);
        camera.fov = profile.fov;
        camera.set_aspect(aspect);
        controls.set_viewport_height(viewport.height);
        let pixel_ratio = profile.pixel_ratio(viewport.device_pixel_ratio);
        renderer.resize(viewport.width as u32, viewport.height as u32, pixel_ratio);
        self.applied += 1;
        debug!(
            "resize applied: {}x{} tier {:?} fov {} pixel ratio {}",
            viewport.width, viewport.height, profile.tier, profile.fov, pixel_ratio
        );
        Some(profile)
    }

    /// Drop the pending resize and its timer.
    pub fn cancel(&mut self, scheduler: &mut FrameScheduler) -> bool {
        self.pending = None;
        match self.timer.take() {
            Some(timer) => scheduler.cancel(timer),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of resizes actually applied.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}
