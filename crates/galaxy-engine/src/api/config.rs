use serde::{Deserialize, Serialize};
use crate::components::mesh::Color;
use crate::extensions::easing::Easing;

/// Configuration for a mounted galaxy view.
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Seed for the galaxy point generator (same seed, same galaxy).
    pub seed: u64,
    pub galaxy: GalaxyParams,
    pub autoscale: AutoscaleConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub zoom: ZoomConfig,
    pub labels: LabelConfig,
    pub resize: ResizeConfig,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            galaxy: GalaxyParams::default(),
            autoscale: AutoscaleConfig::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            zoom: ZoomConfig::default(),
            labels: LabelConfig::default(),
            resize: ResizeConfig::default(),
        }
    }
}

impl GalaxyConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Spiral galaxy point-cloud parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    /// Point count before the autoscale particle multiplier.
    pub base_count: u32,
    /// Exponent ceiling for the radial distribution.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Arm twist per unit radius.
    pub spin: f32,
    /// Base of the radial distribution.
    pub randomness: f32,
    /// Jitter falloff; higher keeps points closer to the arm.
    pub randomness_power: f32,
    pub inside_color: Color,
    pub outside_color: Color,
    pub point_size: f32,
    pub mobile_point_size: f32,
    /// Galaxy spin in radians per second.
    pub rotation_speed: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            base_count: 40_000,
            radius: 2.15,
            branches: 3,
            spin: 3.0,
            randomness: 5.0,
            randomness_power: 4.0,
            inside_color: Color::from_hex(0xc084fc),
            outside_color: Color::from_hex(0x7c3aed),
            point_size: 0.012,
            mobile_point_size: 0.015,
            rotation_speed: 0.05,
        }
    }
}

/// Device-tier tuning table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscaleConfig {
    /// Screens narrower than this are mobile.
    pub mobile_breakpoint: f32,
    /// Screens narrower than this (and not mobile) are tablets.
    pub tablet_breakpoint: f32,
    pub mobile_fov: f32,
    pub tablet_fov: f32,
    pub desktop_fov: f32,
    pub mobile_distance: f32,
    pub tablet_distance: f32,
    pub desktop_distance: f32,
    pub max_pixel_ratio: f32,
    pub mobile_pixel_ratio: f32,
    pub reduce_particles_on_mobile: bool,
    pub particle_reduction_factor: f32,
}

impl Default for AutoscaleConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            tablet_breakpoint: 1024.0,
            mobile_fov: 70.0,
            tablet_fov: 72.0,
            desktop_fov: 75.0,
            mobile_distance: 1.2,
            tablet_distance: 1.0,
            desktop_distance: 1.0,
            max_pixel_ratio: 2.0,
            mobile_pixel_ratio: 1.5,
            reduce_particles_on_mobile: true,
            particle_reduction_factor: 0.5,
        }
    }
}

/// Perspective camera and orbit-controller tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub near: f32,
    pub far: f32,
    /// Starting position before the distance multiplier is applied.
    pub initial_position: [f32; 3],
    /// Fraction of a pending impulse applied each frame.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            initial_position: [3.0, 3.0, 3.0],
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.3,
            max_distance: 12.0,
        }
    }
}

/// Idle auto-orbit behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Inactivity before the automatic orbit takes over.
    pub idle_threshold_ms: f64,
    /// Orbit radius around the star, before the distance multiplier.
    pub radius: f32,
    /// Radians per second along the orbit path.
    pub angular_speed: f32,
    /// Largest per-frame lerp step toward the orbit path.
    pub blend_step: f32,
    /// Blend level above which the camera re-aims at the star.
    pub reaim_threshold: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            idle_threshold_ms: 2000.0,
            radius: 4.0,
            angular_speed: 0.05,
            blend_step: 0.02,
            reaim_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self { duration_ms: 900.0, easing: Easing::QuadInOut }
    }
}

/// DOM label update throttling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Project labels on every Nth render tick.
    pub every_n_ticks: u32,
    /// Minimum movement (px, either axis) that triggers a style write.
    pub min_pixel_delta: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            every_n_ticks: 3,
            min_pixel_delta: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Quiet period before a resize burst is applied.
    pub debounce_ms: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { debounce_ms: 150.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config = GalaxyConfig::from_json("{}").unwrap();
        assert_eq!(config.galaxy.base_count, 40_000);
        assert_eq!(config.orbit.idle_threshold_ms, 2000.0);
        assert_eq!(config.labels.every_n_ticks, 3);
        assert_eq!(config.resize.debounce_ms, 150.0);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let json = r##"{
            "seed": 7,
            "galaxy": { "branches": 5, "inside_color": "#ffffff" },
            "zoom": { "duration_ms": 300 }
        }"##;
        let config = GalaxyConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.galaxy.branches, 5);
        assert_eq!(config.galaxy.inside_color, Color::WHITE);
        // Untouched siblings keep their defaults
        assert_eq!(config.galaxy.spin, 3.0);
        assert_eq!(config.zoom.duration_ms, 300.0);
    }

    #[test]
    fn zoom_easing_is_named_in_snake_case() {
        let config = GalaxyConfig::from_json(r#"{ "zoom": { "easing": "cubic_in_out" } }"#).unwrap();
        assert_eq!(config.zoom.easing, Easing::CubicInOut);
        assert_eq!(config.zoom.duration_ms, 900.0);
        assert_eq!(GalaxyConfig::default().zoom.easing, Easing::QuadInOut);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let json = r#"{ "galaxy": { "outside_color": "violet" } }"#;
        assert!(GalaxyConfig::from_json(json).is_err());
    }
}
