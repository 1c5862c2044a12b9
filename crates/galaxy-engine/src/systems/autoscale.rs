use crate::api::config::AutoscaleConfig;
use crate::api::types::Viewport;

/// Device class derived from screen width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Tier-dependent rendering parameters. Pure data, recomputed on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoscaleProfile {
    pub tier: DeviceTier,
    pub orientation: Orientation,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Multiplier applied to every camera distance.
    pub distance_multiplier: f32,
    /// Cap on the device pixel ratio.
    pub max_pixel_ratio: f32,
    pub particle_multiplier: f32,
    /// Disables antialiasing when the renderer is created.
    pub reduce_quality: bool,
}

impl DeviceTier {
    pub fn classify(screen_width: f32, config: &AutoscaleConfig) -> Self {
        if screen_width < config.mobile_breakpoint {
            DeviceTier::Mobile
        } else if screen_width < config.tablet_breakpoint {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        }
    }
}

impl AutoscaleProfile {
    pub fn from_viewport(viewport: &Viewport, config: &AutoscaleConfig) -> Self {
        let orientation = if viewport.screen_height > viewport.screen_width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };
        Self::for_tier(DeviceTier::classify(viewport.screen_width, config), orientation, config)
    }

    pub fn for_tier(tier: DeviceTier, orientation: Orientation, config: &AutoscaleConfig) -> Self {
        let (fov, distance_multiplier) = match tier {
            DeviceTier::Mobile => (config.mobile_fov, config.mobile_distance),
            DeviceTier::Tablet => (config.tablet_fov, config.tablet_distance),
            DeviceTier::Desktop => (config.desktop_fov, config.desktop_distance),
        };
        let is_mobile = tier == DeviceTier::Mobile;
        let particle_multiplier = if is_mobile && config.reduce_particles_on_mobile {
            config.particle_reduction_factor
        } else {
            1.0
        };
        Self {
            tier,
            orientation,
            fov,
            distance_multiplier,
            max_pixel_ratio: if is_mobile { config.mobile_pixel_ratio } else { config.max_pixel_ratio },
            particle_multiplier,
            reduce_quality: is_mobile
                || (tier == DeviceTier::Tablet && orientation == Orientation::Portrait),
        }
    }

    /// Effective pixel ratio for a device ratio. Unusable ratios count as 1.
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        dpr.min(self.max_pixel_ratio)
    }

    pub fn is_mobile(&self) -> bool {
        self.tier == DeviceTier::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(width: f32, height: f32) -> AutoscaleProfile {
        AutoscaleProfile::from_viewport(&Viewport::new(width, height, 3.0), &AutoscaleConfig::default())
    }

    #[test]
    fn classifies_by_breakpoints() {
        let config = AutoscaleConfig::default();
        assert_eq!(DeviceTier::classify(375.0, &config), DeviceTier::Mobile);
        assert_eq!(DeviceTier::classify(767.9, &config), DeviceTier::Mobile);
        assert_eq!(DeviceTier::classify(768.0, &config), DeviceTier::Tablet);
        assert_eq!(DeviceTier::classify(1023.0, &config), DeviceTier::Tablet);
        assert_eq!(DeviceTier::classify(1024.0, &config), DeviceTier::Desktop);
    }

    #[test]
    fn mobile_profile() {
        let p = profile(390.0, 844.0);
        assert_eq!(p.fov, 70.0);
        assert_eq!(p.distance_multiplier, 1.2);
        assert_eq!(p.particle_multiplier, 0.5);
        assert!(p.reduce_quality);
        assert_eq!(p.pixel_ratio(3.0), 1.5);
    }

    #[test]
    fn tablet_quality_depends_on_orientation() {
        let landscape = profile(1000.0, 700.0);
        assert_eq!(landscape.tier, DeviceTier::Tablet);
        assert!(!landscape.reduce_quality);
        assert_eq!(landscape.fov, 72.0);

        let portrait = AutoscaleProfile::for_tier(
            DeviceTier::Tablet,
            Orientation::Portrait,
            &AutoscaleConfig::default(),
        );
        assert!(portrait.reduce_quality);
        assert_eq!(portrait.particle_multiplier, 1.0);
    }

    #[test]
    fn desktop_profile() {
        let p = profile(1920.0, 1080.0);
        assert_eq!(p.fov, 75.0);
        assert_eq!(p.distance_multiplier, 1.0);
        assert_eq!(p.particle_multiplier, 1.0);
        assert_eq!(p.pixel_ratio(3.0), 2.0);
        assert_eq!(p.pixel_ratio(0.5), 0.5);
        assert_eq!(p.pixel_ratio(0.0), 1.0);
    }

    #[test]
    fn particle_reduction_can_be_disabled() {
        let config = AutoscaleConfig { reduce_particles_on_mobile: false, ..AutoscaleConfig::default() };
        let p = AutoscaleProfile::for_tier(DeviceTier::Mobile, Orientation::Portrait, &config);
        assert_eq!(p.particle_multiplier, 1.0);
    }
}
