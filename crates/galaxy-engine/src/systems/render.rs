use crate::core::scene::{NodeKind, SceneGraph};
use crate::renderer::instance::{LightInstance, MeshInstance};

/// Per-frame draw lists, reused across frames.
#[derive(Debug, Default)]
pub struct FrameBuffers {
    /// Opaque meshes first, then transparent ones.
    pub meshes: Vec<MeshInstance>,
    /// Index of the first transparent mesh.
    pub transparent_start: usize,
    pub lights: Vec<LightInstance>,
}

/// Collect visible meshes and lights from the scene graph.
/// Meshes without uploaded GPU handles are skipped.
pub fn build_frame_buffers(graph: &SceneGraph, buffers: &mut FrameBuffers) {
    buffers.meshes.clear();
    buffers.lights.clear();

    let mut transparent = Vec::new();
    for node in graph.iter() {
        if !graph.is_visible(node.id) {
            continue;
        }
        match &node.kind {
            NodeKind::Mesh(mesh) => {
                let (Some(geometry), Some(material)) = (mesh.geometry_handle, mesh.material_handle) else {
                    continue;
                };
                let instance = MeshInstance::new(graph.world_matrix(node.id), &mesh.material, geometry.0, material.0);
                if mesh.material.is_transparent() {
                    transparent.push(instance);
                } else {
                    buffers.meshes.push(instance);
                }
            }
            NodeKind::AmbientLight { color, intensity } => {
                buffers.lights.push(LightInstance::ambient(color.to_linear() * *intensity));
            }
            NodeKind::PointLight { color, intensity, range, .. } => {
                buffers.lights.push(LightInstance::point(
                    graph.world_position(node.id),
                    color.to_linear() * *intensity,
                    *range,
                ));
            }
            NodeKind::Group | NodeKind::Points => {}
        }
    }

    buffers.transparent_start = buffers.meshes.len();
    buffers.meshes.extend(transparent);
}
