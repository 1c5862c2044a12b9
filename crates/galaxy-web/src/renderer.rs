//! Renderer backed by JavaScript hooks.
//!
//! The engine side packs every frame into flat `f32` buffers. JavaScript
//! owns the actual WebGL context and receives:
//! - `configure(canvas, options)` once at mount, before any upload (`options`
//!   is JSON for `getContext`; antialias cannot change afterwards)
//! - `upload(id, kind, payload)` once per resource at mount (`payload` is
//!   JSON for geometries and materials, a `Float32Array` for points)
//! - `release(id)` once per resource at unmount
//! - `draw(frame)` after every rendered frame

use galaxy_engine::{
    FrameData, LightInstance, MeshInstance, PointVertex, Renderer, RendererSettings, ResourceDescriptor,
    ResourceId,
};
use js_sys::{Float32Array, Function, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

/// Flat view of one frame, ready to hand to JavaScript.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PackedFrame {
    /// View-projection matrix (16) followed by the eye position (4).
    pub camera: Vec<f32>,
    pub galaxy_model: [f32; 16],
    pub galaxy_points: Option<u32>,
    /// `MeshInstance::FLOATS` per mesh, opaque first.
    pub meshes: Vec<f32>,
    /// `LightInstance::FLOATS` per light.
    pub lights: Vec<f32>,
}

impl PackedFrame {
    pub fn pack(&mut self, frame: &FrameData<'_>) {
        self.camera.clear();
        self.camera.extend_from_slice(bytemuck::cast_slice(&[frame.camera]));
        self.galaxy_model = frame.galaxy_model.to_cols_array();
        self.galaxy_points = frame.galaxy_points.map(|id| id.0);
        self.meshes.clear();
        self.meshes.extend_from_slice(bytemuck::cast_slice(frame.meshes));
        self.lights.clear();
        self.lights.extend_from_slice(bytemuck::cast_slice(frame.lights));
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len() / MeshInstance::FLOATS
    }

    pub fn light_count(&self) -> usize {
        self.lights.len() / LightInstance::FLOATS
    }
}

/// WebGL context attributes for the host's `getContext` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub antialias: bool,
    pub alpha: bool,
    pub premultiplied_alpha: bool,
    pub pixel_ratio: f32,
}

impl From<RendererSettings> for ContextOptions {
    fn from(settings: RendererSettings) -> Self {
        Self {
            antialias: settings.antialias,
            alpha: settings.transparent,
            premultiplied_alpha: settings.transparent,
            pixel_ratio: settings.pixel_ratio,
        }
    }
}

/// JavaScript side of the renderer.
pub struct RendererHooks {
    pub configure: Option<Function>,
    pub upload: Option<Function>,
    pub release: Option<Function>,
    pub draw: Function,
}

impl RendererHooks {
    /// Read `configure`, `upload`, `release` and `draw` from a JS object.
    /// `draw` is required.
    pub fn from_object(hooks: &JsValue) -> Result<Self, JsValue> {
        let get = |name: &str| -> Result<Option<Function>, JsValue> {
            Ok(Reflect::get(hooks, &JsValue::from_str(name))?.dyn_into::<Function>().ok())
        };
        let draw = get("draw")?.ok_or_else(|| JsValue::from_str("renderer hooks need a draw function"))?;
        Ok(Self { configure: get("configure")?, upload: get("upload")?, release: get("release")?, draw })
    }
}

pub struct JsRenderer {
    canvas: HtmlCanvasElement,
    hooks: RendererHooks,
    settings: Option<RendererSettings>,
    frame: PackedFrame,
    dirty: bool,
}

impl JsRenderer {
    pub fn new(canvas: HtmlCanvasElement, hooks: RendererHooks) -> Self {
        Self { canvas, hooks, settings: None, frame: PackedFrame::default(), dirty: false }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn settings(&self) -> Option<RendererSettings> {
        self.settings
    }

    /// Build the JS payload for the last drawn frame, if one is waiting.
    /// The caller invokes the returned function after releasing its borrows.
    pub fn take_draw(&mut self) -> Result<Option<(Function, Object)>, JsValue> {
        if !std::mem::take(&mut self.dirty) {
            return Ok(None);
        }
        let frame = &self.frame;
        let payload = Object::new();
        Reflect::set(&payload, &"camera".into(), &Float32Array::from(frame.camera.as_slice()))?;
        Reflect::set(&payload, &"galaxyModel".into(), &Float32Array::from(&frame.galaxy_model[..]))?;
        let points = frame.galaxy_points.map_or(JsValue::NULL, JsValue::from);
        Reflect::set(&payload, &"points".into(), &points)?;
        Reflect::set(&payload, &"meshes".into(), &Float32Array::from(frame.meshes.as_slice()))?;
        Reflect::set(&payload, &"meshCount".into(), &JsValue::from(frame.mesh_count() as u32))?;
        Reflect::set(&payload, &"lights".into(), &Float32Array::from(frame.lights.as_slice()))?;
        Reflect::set(&payload, &"lightCount".into(), &JsValue::from(frame.light_count() as u32))?;
        Ok(Some((self.hooks.draw.clone(), payload)))
    }

    fn call_upload(&self, id: ResourceId, kind: &str, payload: &JsValue) {
        let Some(upload) = &self.hooks.upload else { return };
        if let Err(err) = upload.call3(&JsValue::NULL, &JsValue::from(id.0), &JsValue::from_str(kind), payload) {
            log::warn!("upload hook failed for {} {}: {:?}", kind, id.0, err);
        }
    }
}

fn json_payload(value: &impl serde::Serialize) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json) => JsValue::from_str(&json),
        Err(err) => {
            log::warn!("resource serialization failed: {}", err);
            JsValue::NULL
        }
    }
}

/// Interleaved position and color, `PointVertex::FLOATS` per point.
pub fn pack_points(vertices: &[PointVertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

impl Renderer for JsRenderer {
    fn backend(&self) -> &'static str {
        "webgl"
    }

    fn configure(&mut self, settings: RendererSettings) {
        self.settings = Some(settings);
        let Some(configure) = &self.hooks.configure else { return };
        let options = json_payload(&ContextOptions::from(settings));
        if let Err(err) = configure.call2(&JsValue::NULL, &self.canvas, &options) {
            log::warn!("configure hook failed: {:?}", err);
        }
    }

    fn upload(&mut self, id: ResourceId, resource: ResourceDescriptor<'_>) {
        match resource {
            ResourceDescriptor::Geometry(geometry) => self.call_upload(id, "geometry", &json_payload(geometry)),
            ResourceDescriptor::Material(material) => self.call_upload(id, "material", &json_payload(material)),
            ResourceDescriptor::Points { vertices, size } => {
                let data = Float32Array::from(pack_points(vertices));
                if let Err(err) = Reflect::set(&data, &"pointSize".into(), &JsValue::from(size)) {
                    log::warn!("tagging point buffer failed: {:?}", err);
                }
                self.call_upload(id, "points", &data);
            }
        }
    }

    fn release(&mut self, id: ResourceId) {
        let Some(release) = &self.hooks.release else { return };
        if let Err(err) = release.call1(&JsValue::NULL, &JsValue::from(id.0)) {
            log::warn!("release hook failed for {}: {:?}", id.0, err);
        }
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.canvas.set_width((width as f32 * pixel_ratio).round() as u32);
        self.canvas.set_height((height as f32 * pixel_ratio).round() as u32);
        let style = self.canvas.style();
        let sized = style
            .set_property("width", &format!("{width}px"))
            .and_then(|_| style.set_property("height", &format!("{height}px")));
        if let Err(err) = sized {
            log::warn!("canvas style update failed: {:?}", err);
        }
    }

    fn draw(&mut self, frame: &FrameData<'_>) {
        self.frame.pack(frame);
        self.dirty = true;
    }

    fn dispose(&mut self) {
        self.dirty = false;
        if self.canvas.parent_node().is_some() {
            self.canvas.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_engine::{CameraUniform, Color, Material};
    use glam::{Mat4, Vec3};

    #[test]
    fn pack_copies_every_record() {
        let camera = CameraUniform { view_projection: Mat4::IDENTITY.to_cols_array_2d(), eye: [1.0, 2.0, 3.0, 1.0] };
        let meshes = [
            MeshInstance::new(Mat4::from_translation(Vec3::X), &Material::standard(Color::WHITE), 1, 2),
            MeshInstance::new(Mat4::IDENTITY, &Material::basic(Color::BLACK, 0.3), 3, 4),
        ];
        let lights = [LightInstance::ambient(Vec3::splat(0.25))];
        let frame = FrameData {
            camera,
            galaxy_model: Mat4::IDENTITY,
            galaxy_points: Some(ResourceId(7)),
            meshes: &meshes,
            lights: &lights,
        };

        let mut packed = PackedFrame::default();
        packed.pack(&frame);
        assert_eq!(packed.camera.len(), 20);
        assert_eq!(&packed.camera[16..19], &[1.0, 2.0, 3.0]);
        assert_eq!(packed.mesh_count(), 2);
        assert_eq!(packed.meshes[12], 1.0);
        assert_eq!(packed.light_count(), 1);
        assert_eq!(packed.galaxy_points, Some(7));

        // Repacking replaces rather than appends
        packed.pack(&FrameData { meshes: &meshes[..1], ..frame });
        assert_eq!(packed.mesh_count(), 1);
    }

    #[test]
    fn context_options_carry_quality_tier() {
        let reduced = ContextOptions::from(RendererSettings { antialias: false, pixel_ratio: 1.5, transparent: true });
        let json = serde_json::to_string(&reduced).unwrap();
        assert!(json.contains("\"antialias\":false"));
        assert!(json.contains("\"alpha\":true"));
        assert!(json.contains("\"premultipliedAlpha\":true"));
        assert!(json.contains("\"pixelRatio\":1.5"));

        let full = ContextOptions::from(RendererSettings { antialias: true, pixel_ratio: 2.0, transparent: true });
        assert!(full.antialias);
    }

    #[test]
    fn points_interleave_position_and_color() {
        let vertices = [
            PointVertex { position: [1.0, 2.0, 3.0], color: [0.1, 0.2, 0.3] },
            PointVertex { position: [4.0, 5.0, 6.0], color: [0.4, 0.5, 0.6] },
        ];
        let flat = pack_points(&vertices);
        assert_eq!(flat.len(), 2 * PointVertex::FLOATS);
        assert_eq!(flat[3], 0.1);
        assert_eq!(flat[6], 4.0);
    }
}
