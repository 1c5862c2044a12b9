use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use crate::components::mesh::Material;

/// One galaxy point: position in the point cloud's local space and linear RGB.
/// 6 floats = 24 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Per-mesh draw record.
/// Must match the host-side layout: 28 floats = 112 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct MeshInstance {
    /// World matrix, column-major.
    pub model: [f32; 16],
    /// Linear base color plus opacity.
    pub color: [f32; 4],
    /// Linear emissive color times intensity, w unused.
    pub emissive: [f32; 4],
    /// Geometry resource id.
    pub geometry: f32,
    /// Material resource id.
    pub material: f32,
    pub roughness: f32,
    /// 1.0 for unlit materials.
    pub unlit: f32,
}

impl MeshInstance {
    pub const FLOATS: usize = 28;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(model: Mat4, material: &Material, geometry_id: u32, material_id: u32) -> Self {
        let color = material.color.to_linear();
        let emissive = material.emissive.to_linear() * material.emissive_intensity;
        Self {
            model: model.to_cols_array(),
            color: [color.x, color.y, color.z, material.opacity],
            emissive: [emissive.x, emissive.y, emissive.z, 0.0],
            geometry: geometry_id as f32,
            material: material_id as f32,
            roughness: material.roughness,
            unlit: if material.unlit { 1.0 } else { 0.0 },
        }
    }
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// Camera world position, w = 1.
    pub eye: [f32; 4],
}

/// Light record: 8 floats.
/// Ambient lights use `kind = 0` and ignore position, range and decay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightInstance {
    pub position: [f32; 3],
    pub kind: f32,
    /// Linear color times intensity.
    pub color: [f32; 3],
    pub range: f32,
}

impl LightInstance {
    pub const FLOATS: usize = 8;

    pub fn ambient(color: Vec3) -> Self {
        Self { position: [0.0; 3], kind: 0.0, color: color.to_array(), range: 0.0 }
    }

    pub fn point(position: Vec3, color: Vec3, range: f32) -> Self {
        Self { position: position.to_array(), kind: 1.0, color: color.to_array(), range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::Color;

    #[test]
    fn strides_match_float_counts() {
        assert_eq!(std::mem::size_of::<PointVertex>(), PointVertex::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<MeshInstance>(), MeshInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<LightInstance>(), LightInstance::FLOATS * 4);
    }

    #[test]
    fn mesh_instance_packs_material() {
        let material = Material::basic(Color::WHITE, 0.3)
            .with_emissive(Color::WHITE, 2.0);
        let inst = MeshInstance::new(Mat4::from_translation(Vec3::X), &material, 4, 5);
        assert_eq!(inst.model[12], 1.0);
        assert!((inst.color[3] - 0.3).abs() < 1e-6);
        assert!((inst.emissive[0] - 2.0).abs() < 1e-3);
        assert_eq!(inst.geometry, 4.0);
        assert_eq!(inst.material, 5.0);
        assert_eq!(inst.unlit, 1.0);
    }

    #[test]
    fn instances_cast_to_flat_floats() {
        let points = [PointVertex::default(); 3];
        let floats: &[f32] = bytemuck::cast_slice(&points);
        assert_eq!(floats.len(), 3 * PointVertex::FLOATS);
    }
}
