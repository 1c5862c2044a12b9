//! Spiral galaxy point-cloud generation.

use std::f32::consts::TAU;
use crate::api::config::GalaxyParams;
use crate::core::rng::Rng;
use crate::renderer::instance::PointVertex;

/// Generated galaxy buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub vertices: Vec<PointVertex>,
    /// On-screen point size in world units (size attenuated).
    pub size: f32,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// `floor(base_count * multiplier)`, computed in f64 so the product is exact.
pub fn particle_count(base_count: u32, multiplier: f32) -> usize {
    (base_count as f64 * multiplier.max(0.0) as f64).floor() as usize
}

/// Generate `count` points. Same params, count and seed give the same buffer.
///
/// Radial distance is `(u * randomness)^(v * radius)`, which piles points
/// near the core with sparse outliers. The angle is the point's arm
/// (`i mod branches`) plus `distance * spin`. Each axis gets a
/// `u^randomness_power` jitter with a random sign, and the color blends
/// inside to outside by `u * distance / radius` in linear space.
pub fn generate(params: &GalaxyParams, count: usize, size: f32, rng: &mut Rng) -> PointCloud {
    let branches = params.branches.max(1) as usize;
    let inside = params.inside_color.to_linear();
    let outside = params.outside_color.to_linear();

    let mut vertices = Vec::with_capacity(count);
    for i in 0..count {
        let distance = (rng.next_f32() * params.randomness).powf(rng.next_f32() * params.radius);
        let spin_angle = distance * params.spin;
        let branch_angle = (i % branches) as f32 / branches as f32 * TAU;

        let mut jitter = || rng.next_f32().powf(params.randomness_power) * rng.next_sign();
        let (jx, jy, jz) = (jitter(), jitter(), jitter());

        let angle = branch_angle + spin_angle;
        let position = [angle.cos() * distance + jx, jy, angle.sin() * distance + jz];

        let mix = rng.next_f32() * distance / params.radius;
        let color = inside + (outside - inside) * mix;

        vertices.push(PointVertex { position, color: color.to_array() });
    }

    PointCloud { vertices, size }
}
