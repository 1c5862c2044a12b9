pub mod dom;
pub mod host;
pub mod listeners;
pub mod renderer;

use std::rc::Rc;

use galaxy_engine::{AutoscaleProfile, BodyId, GalaxyConfig, GalaxyView, ResourceKind, LABELS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::dom::{apply_style, container_style, DomLabels};
use crate::host::{measure, Mounted, Shared};
use crate::renderer::{JsRenderer, RendererHooks};

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Handle to a mounted galaxy, returned to JavaScript.
#[wasm_bindgen]
pub struct GalaxyMount {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl GalaxyMount {
    /// Progress scalars for the star and the two orbiting bodies. Applied on
    /// the next frame, unclamped.
    pub fn set_progress(&self, star: f32, octavia: f32, zythera: f32) {
        self.shared.set_progress([star, octavia, zythera]);
    }

    /// `callback(tag, { position: {x, y, z}, radius? })`, once per selection.
    pub fn set_on_select(&self, callback: Option<js_sys::Function>) {
        self.shared.set_on_select(callback);
    }

    /// Select a body by tag as if its label were clicked. Unknown tags are
    /// ignored and return false.
    pub fn select(&self, tag: &str) -> bool {
        match BodyId::from_tag(tag) {
            Some(body) if self.shared.is_mounted() => {
                self.shared.push_input(galaxy_engine::InputEvent::LabelClick(body));
                true
            }
            _ => false,
        }
    }

    /// Stop the frame loop and release everything. Idempotent.
    pub fn unmount(&self) -> bool {
        self.shared.unmount()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }
}

/// Mount a galaxy into the element with id `container_id`.
///
/// `hooks` is an object with a required `draw(frame)` function and optional
/// `configure(canvas, options)`, `upload(id, kind, payload)` and
/// `release(id)` functions. `config_json` is a partial `GalaxyConfig`. A
/// missing container skips the mount and returns `undefined`.
#[wasm_bindgen]
pub fn mount_galaxy(
    container_id: &str,
    hooks: JsValue,
    config_json: Option<String>,
) -> Result<Option<GalaxyMount>, JsValue> {
    init_logging();

    let Some(window) = web_sys::window() else {
        log::warn!("no window; galaxy mount skipped");
        return Ok(None);
    };
    let Some(document) = window.document() else {
        log::warn!("no document; galaxy mount skipped");
        return Ok(None);
    };
    let Some(element) = document.get_element_by_id(container_id) else {
        log::warn!("container '{}' not found; galaxy mount skipped", container_id);
        return Ok(None);
    };
    let container: HtmlElement = element.dyn_into()?;

    let config = match config_json {
        Some(json) => GalaxyConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => GalaxyConfig::default(),
    };
    let hooks = RendererHooks::from_object(&hooks)?;

    // Size the container for its tier before the measurement the view mounts with
    let tier = AutoscaleProfile::from_viewport(&measure(&window, &container), &config.autoscale).tier;
    apply_style(&container, container_style(tier))?;
    let viewport = measure(&window, &container);

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    apply_style(&canvas, [("display", "block"), ("touch-action", "none")])?;
    container.append_child(&canvas)?;

    let now = window.performance().map_or(0.0, |p| p.now());
    let mut renderer = JsRenderer::new(canvas, hooks);
    let mut view = GalaxyView::mount(config, viewport, now, &mut renderer);
    let surface = view.ledger_mut().acquire(ResourceKind::Surface, "canvas");

    let mobile = view.profile().is_mobile();
    let labels = match DomLabels::create(&document, &container, &LABELS, mobile) {
        Ok(labels) => labels,
        Err(err) => {
            view.unmount(&mut renderer);
            return Err(err);
        }
    };
    let label_resources = LABELS
        .iter()
        .map(|spec| view.ledger_mut().acquire(ResourceKind::Label, format!("label.{}", spec.body.tag())))
        .collect();

    let mut mounted = Mounted { view, renderer, labels, listeners: Vec::new(), surface, label_resources };
    let shared = Shared::new(window, container);
    let bound = shared.bind_events(&mut mounted);
    shared.install(mounted);
    if let Err(err) = bound.and_then(|_| shared.start()) {
        shared.unmount();
        return Err(err);
    }

    log::info!(
        "galaxy mounted into '{}' ({}x{}, {:?})",
        container_id,
        viewport.width,
        viewport.height,
        tier
    );
    Ok(Some(GalaxyMount { shared }))
}
