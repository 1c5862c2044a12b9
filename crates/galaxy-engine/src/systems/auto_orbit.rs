//! Idle detection and the automatic orbit around the star.
//!
//! `InteractionState` is the only record of user activity. Once per frame the
//! view asks `AutoOrbitScheduler::authority` who may write the camera, and only
//! the `AutoOrbit` authority lets `apply` run.

use glam::Vec3;
use log::debug;
use crate::api::config::OrbitConfig;
use crate::extensions::easing::lerp;
use crate::input::orbit_controls::{ControlEvent, OrbitControls};
use crate::renderer::camera::PerspectiveCamera;

/// Who may write the camera this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAuthority {
    /// Orbit controls driven by the user.
    UserDrag,
    /// Idle blend onto the automatic orbit.
    AutoOrbit,
    /// A zoom transition is in flight.
    ZoomTransition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub user_interacting: bool,
    pub last_interaction_ms: f64,
    /// A pointer gesture is still held down.
    pub gesture_active: bool,
}

impl InteractionState {
    /// Fresh state at mount. The mount time counts as the last interaction.
    pub fn new(now_ms: f64) -> Self {
        Self { user_interacting: false, last_interaction_ms: now_ms, gesture_active: false }
    }

    pub fn on_control(&mut self, event: ControlEvent, now_ms: f64) {
        match event {
            ControlEvent::Start => {
                self.user_interacting = true;
                self.gesture_active = true;
                self.last_interaction_ms = now_ms;
            }
            ControlEvent::End => {
                self.gesture_active = false;
                self.last_interaction_ms = now_ms;
            }
        }
    }

    /// Count a programmatic camera move (zoom start or finish) as interaction.
    pub fn touch(&mut self, now_ms: f64) {
        self.user_interacting = true;
        self.last_interaction_ms = now_ms;
    }

    pub fn idle_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.last_interaction_ms).max(0.0)
    }
}

#[derive(Debug)]
pub struct AutoOrbitScheduler {
    config: OrbitConfig,
    /// Auto-orbit radius and similar distances scale with the device tier.
    distance_multiplier: f32,
    writes: u64,
    last_authority: Option<CameraAuthority>,
}

impl AutoOrbitScheduler {
    pub fn new(config: OrbitConfig, distance_multiplier: f32) -> Self {
        Self { config, distance_multiplier, writes: 0, last_authority: None }
    }

    pub fn set_distance_multiplier(&mut self, multiplier: f32) {
        self.distance_multiplier = multiplier;
    }

    /// Decide the camera authority for this frame. Clears `user_interacting`
    /// once the idle threshold has passed.
    pub fn authority(
        &mut self,
        interaction: &mut InteractionState,
        zoom_active: bool,
        now_ms: f64,
    ) -> CameraAuthority {
        let idle = interaction.idle_ms(now_ms) >= self.config.idle_threshold_ms;
        if idle && !interaction.gesture_active {
            interaction.user_interacting = false;
        }

        let authority = if zoom_active {
            CameraAuthority::ZoomTransition
        } else if interaction.gesture_active || interaction.user_interacting {
            CameraAuthority::UserDrag
        } else {
            CameraAuthority::AutoOrbit
        };

        if self.last_authority != Some(authority) {
            debug!("camera authority: {:?}", authority);
            self.last_authority = Some(authority);
        }
        authority
    }

    /// Blend factor in [0, 1]. Grows with idle time and saturates at the
    /// idle threshold, so a resumed orbit re-aims on its first frame.
    pub fn ramp(&self, interaction: &InteractionState, now_ms: f64) -> f32 {
        let threshold = self.config.idle_threshold_ms;
        if threshold <= 0.0 {
            return 1.0;
        }
        (interaction.idle_ms(now_ms) / threshold).min(1.0) as f32
    }

    /// Point on the automatic orbit at `elapsed` seconds (XZ only).
    pub fn orbit_point(&self, star: Vec3, elapsed: f32) -> Vec3 {
        let radius = self.config.radius * self.distance_multiplier;
        let angle = elapsed * self.config.angular_speed;
        Vec3::new(star.x + angle.cos() * radius, 0.0, star.z + angle.sin() * radius)
    }

    /// Pull the camera toward the orbit path. Must only be called under the
    /// `AutoOrbit` authority.
    pub fn apply(
        &mut self,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
        interaction: &InteractionState,
        star: Vec3,
        elapsed: f32,
        now_ms: f64,
    ) {
        let ramp = self.ramp(interaction, now_ms);
        let factor = ramp * self.config.blend_step;
        let goal = self.orbit_point(star, elapsed);
        camera.position.x = lerp(camera.position.x, goal.x, factor);
        camera.position.z = lerp(camera.position.z, goal.z, factor);
        if ramp > self.config.reaim_threshold {
            controls.target = star;
            camera.look_at(star);
        }
        self.writes += 1;
    }

    /// Number of frames in which the scheduler wrote camera state.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraConfig;

    const STAR: Vec3 = Vec3::new(1.6, 0.0, 1.6);

    fn scheduler() -> AutoOrbitScheduler {
        AutoOrbitScheduler::new(OrbitConfig::default(), 1.0)
    }

    #[test]
    fn idle_at_mount_is_auto_orbit() {
        let mut s = scheduler();
        let mut state = InteractionState::new(0.0);
        assert_eq!(s.authority(&mut state, false, 16.0), CameraAuthority::AutoOrbit);
        assert!(s.ramp(&state, 16.0) < 0.01);
    }

    #[test]
    fn resumes_exactly_at_threshold() {
        let mut s = scheduler();
        let mut state = InteractionState::new(0.0);
        state.on_control(ControlEvent::Start, 1000.0);
        state.on_control(ControlEvent::End, 1500.0);
        assert_eq!(s.authority(&mut state, false, 3499.0), CameraAuthority::UserDrag);
        assert!(state.user_interacting);
        assert_eq!(s.authority(&mut state, false, 3500.0), CameraAuthority::AutoOrbit);
        assert!(!state.user_interacting);
    }

    #[test]
    fn held_gesture_keeps_user_authority() {
        let mut s = scheduler();
        let mut state = InteractionState::new(0.0);
        state.on_control(ControlEvent::Start, 0.0);
        assert_eq!(s.authority(&mut state, false, 10_000.0), CameraAuthority::UserDrag);
    }

    #[test]
    fn zoom_outranks_everything() {
        let mut s = scheduler();
        let mut state = InteractionState::new(0.0);
        assert_eq!(s.authority(&mut state, true, 50_000.0), CameraAuthority::ZoomTransition);
        state.on_control(ControlEvent::Start, 50_000.0);
        assert_eq!(s.authority(&mut state, true, 50_001.0), CameraAuthority::ZoomTransition);
    }

    #[test]
    fn ramp_saturates_at_threshold() {
        let s = scheduler();
        let state = InteractionState::new(0.0);
        assert!((s.ramp(&state, 1500.0) - 0.75).abs() < 1e-6);
        assert_eq!(s.ramp(&state, 2000.0), 1.0);
        assert_eq!(s.ramp(&state, 9000.0), 1.0);
    }

    #[test]
    fn zero_threshold_ramp_is_saturated() {
        let config = OrbitConfig { idle_threshold_ms: 0.0, ..OrbitConfig::default() };
        let s = AutoOrbitScheduler::new(config, 1.0);
        assert_eq!(s.ramp(&InteractionState::new(0.0), 0.0), 1.0);
    }

    #[test]
    fn apply_blends_and_reaims_after_half() {
        let mut s = scheduler();
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(3.0, 3.0, 3.0);
        camera.look_at(Vec3::ZERO);
        let mut controls = OrbitControls::new(&CameraConfig::default(), Vec3::ZERO);
        let state = InteractionState::new(0.0);

        // ramp 0.25: position moves, aim untouched
        s.apply(&mut camera, &mut controls, &state, STAR, 0.0, 500.0);
        let goal = s.orbit_point(STAR, 0.0);
        let expected_x = 3.0 + (goal.x - 3.0) * 0.25 * 0.02;
        assert!((camera.position.x - expected_x).abs() < 1e-5);
        assert_eq!(camera.position.y, 3.0);
        assert_eq!(controls.target, Vec3::ZERO);

        // ramp 0.75: re-aims at the star
        s.apply(&mut camera, &mut controls, &state, STAR, 0.0, 1500.0);
        assert_eq!(controls.target, STAR);
        let forward = (STAR - camera.position).normalize();
        assert!((camera.forward() - forward).length() < 1e-5);
        assert_eq!(s.writes(), 2);
    }

    #[test]
    fn orbit_radius_scales_with_tier() {
        let mut s = scheduler();
        s.set_distance_multiplier(1.2);
        let p = s.orbit_point(STAR, 0.0);
        assert!((p.x - (1.6 + 4.8)).abs() < 1e-5);
        assert!((p.z - 1.6).abs() < 1e-5);
    }
}
