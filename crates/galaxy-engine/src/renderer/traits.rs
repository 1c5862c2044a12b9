//! Renderer seam between the headless engine and a drawing backend.
//!
//! The engine never touches a GPU API. It uploads resource descriptors once
//! at mount, hands a `FrameData` to `draw` every frame, and releases every
//! resource on unmount. The web bridge implements this by packing flat
//! buffers for a JavaScript draw callback.

use glam::Mat4;
use super::instance::{CameraUniform, LightInstance, MeshInstance, PointVertex};
use crate::components::mesh::{Geometry, Material};
use crate::core::resources::ResourceId;

/// Context options fixed when the renderer is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    /// Cannot change after construction.
    pub antialias: bool,
    pub pixel_ratio: f32,
    /// Clear color is fully transparent so the page shows through.
    pub transparent: bool,
}

/// Something the renderer must allocate.
#[derive(Debug, Clone, Copy)]
pub enum ResourceDescriptor<'a> {
    Geometry(&'a Geometry),
    Material(&'a Material),
    /// Point cloud buffer plus the on-screen point size.
    Points { vertices: &'a [PointVertex], size: f32 },
}

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    pub camera: CameraUniform,
    /// World matrix of the galaxy point cloud.
    pub galaxy_model: Mat4,
    /// Resource holding the point buffer.
    pub galaxy_points: Option<ResourceId>,
    /// One record per visible mesh, opaque before transparent.
    pub meshes: &'a [MeshInstance],
    pub lights: &'a [LightInstance],
}

/// Drawing backend.
pub trait Renderer {
    /// Backend identifier (e.g. "webgl", "recording").
    fn backend(&self) -> &'static str;

    /// Apply context settings. Called once at mount.
    fn configure(&mut self, settings: RendererSettings);

    /// Allocate a resource under `id`.
    fn upload(&mut self, id: ResourceId, resource: ResourceDescriptor<'_>);

    /// Free a resource. Unknown ids are ignored.
    fn release(&mut self, id: ResourceId);

    /// Resize the drawing surface, in CSS pixels.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Draw one frame.
    fn draw(&mut self, frame: &FrameData<'_>);

    /// Drop the drawing context. Called last during unmount.
    fn dispose(&mut self) {}
}

/// Recording renderer for tests.
#[cfg(test)]
pub mod recording {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub settings: Option<RendererSettings>,
        pub live: HashSet<ResourceId>,
        pub uploads: usize,
        pub releases: usize,
        pub resizes: Vec<(u32, u32, f32)>,
        pub draws: usize,
        pub last_mesh_count: usize,
        pub last_camera: Option<CameraUniform>,
        pub point_count: usize,
        pub disposed: bool,
    }

    impl Renderer for RecordingRenderer {
        fn backend(&self) -> &'static str {
            "recording"
        }

        fn configure(&mut self, settings: RendererSettings) {
            self.settings = Some(settings);
        }

        fn upload(&mut self, id: ResourceId, resource: ResourceDescriptor<'_>) {
            if let ResourceDescriptor::Points { vertices, .. } = resource {
                self.point_count = vertices.len();
            }
            self.live.insert(id);
            self.uploads += 1;
        }

        fn release(&mut self, id: ResourceId) {
            if self.live.remove(&id) {
                self.releases += 1;
            }
        }

        fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
            self.resizes.push((width, height, pixel_ratio));
        }

        fn draw(&mut self, frame: &FrameData<'_>) {
            self.draws += 1;
            self.last_mesh_count = frame.meshes.len();
            self.last_camera = Some(frame.camera);
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }
    }
}
