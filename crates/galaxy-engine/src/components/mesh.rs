use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::core::resources::ResourceId;

/// sRGB color with components in [0, 1].
/// Serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Convert to linear working space (what the renderer blends in).
    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    pub fn to_hex_string(self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("invalid color '{}', expected #rrggbb", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex_string()
    }
}

/// Mesh shape. Spheres are hit-testable, rings are visual guides only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Sphere { radius: f32, segments: u32 },
    /// Flat annulus in the node's local XZ plane.
    Ring { inner: f32, outer: f32, segments: u32 },
}

/// Surface description handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
    /// Unlit materials ignore scene lights.
    pub unlit: bool,
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            unlit: false,
        }
    }

    pub fn basic(color: Color, opacity: f32) -> Self {
        Self {
            opacity,
            unlit: true,
            ..Self::standard(color)
        }
    }

    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_surface(mut self, roughness: f32, metalness: f32) -> Self {
        self.roughness = roughness;
        self.metalness = metalness;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Renderable mesh attached to a scene node.
#[derive(Debug, Clone)]
pub struct MeshComponent {
    pub geometry: Geometry,
    pub material: Material,
    /// GPU handles, assigned when the view uploads the scene.
    pub geometry_handle: Option<ResourceId>,
    pub material_handle: Option<ResourceId>,
}

impl MeshComponent {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            geometry_handle: None,
            material_handle: None,
        }
    }

    /// Sphere radius, if this mesh can be hit-tested.
    pub fn sphere_radius(&self) -> Option<f32> {
        match self.geometry {
            Geometry::Sphere { radius, .. } => Some(radius),
            Geometry::Ring { .. } => None,
        }
    }
}
