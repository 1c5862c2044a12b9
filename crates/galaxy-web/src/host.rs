//! Browser host for one mounted view: animation frames, DOM events and
//! JavaScript callbacks.
//!
//! Everything the browser calls back into holds a `Weak<Shared>`, so a
//! dropped mount cannot be revived by a late event. JavaScript callbacks
//! (draw, selection) run only after the view borrow is released, so they
//! may call back into the mount.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use galaxy_engine::{
    BodyId, GalaxyView, InputEvent, ResourceId, ResourceKind, SelectionInfo, Viewport,
};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent, PointerEvent, WheelEvent, Window};

use crate::dom::DomLabels;
use crate::listeners::EventBinding;
use crate::renderer::JsRenderer;

/// Container pointer events and the gesture phase each one feeds. Losing
/// capture ends the gesture like a release does.
const POINTER_EVENTS: [(&str, PointerKind); 5] = [
    ("pointerdown", PointerKind::Down),
    ("pointermove", PointerKind::Move),
    ("pointerup", PointerKind::Up),
    ("pointercancel", PointerKind::Up),
    ("lostpointercapture", PointerKind::Up),
];

/// Window events after which the viewport is measured again.
const VIEWPORT_EVENTS: [&str; 2] = ["resize", "orientationchange"];

/// Measure the container and window.
pub fn measure(window: &Window, container: &HtmlElement) -> Viewport {
    let screen_width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    let screen_height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(
        container.client_width() as f32,
        container.client_height() as f32,
        window.device_pixel_ratio() as f32,
    )
    .with_screen(screen_width, screen_height)
}

/// Selection payload as a plain JS object: `{ position: {x, y, z}, radius? }`.
fn selection_object(info: &SelectionInfo) -> Result<Object, JsValue> {
    let position = Object::new();
    Reflect::set(&position, &"x".into(), &JsValue::from(info.position.x))?;
    Reflect::set(&position, &"y".into(), &JsValue::from(info.position.y))?;
    Reflect::set(&position, &"z".into(), &JsValue::from(info.position.z))?;
    let payload = Object::new();
    Reflect::set(&payload, &"position".into(), &position)?;
    if let Some(radius) = info.radius {
        Reflect::set(&payload, &"radius".into(), &JsValue::from(radius))?;
    }
    Ok(payload)
}

/// Everything torn down together on unmount.
pub struct Mounted {
    pub view: GalaxyView,
    pub renderer: JsRenderer,
    pub labels: DomLabels,
    pub listeners: Vec<EventBinding>,
    pub surface: ResourceId,
    pub label_resources: Vec<ResourceId>,
}

pub struct Shared {
    window: Window,
    container: HtmlElement,
    mounted: RefCell<Option<Mounted>>,
    /// Input gathered by listeners, moved into the view at frame start.
    pending_input: RefCell<Vec<InputEvent>>,
    /// Selections reported by the view, delivered to JS after the frame.
    selections: Rc<RefCell<Vec<(BodyId, SelectionInfo)>>>,
    on_select: RefCell<Option<Function>>,
    progress: Cell<[f32; 3]>,
    raf: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    raf_id: Cell<Option<i32>>,
}

impl Shared {
    pub fn new(window: Window, container: HtmlElement) -> Rc<Self> {
        Rc::new(Self {
            window,
            container,
            mounted: RefCell::new(None),
            pending_input: RefCell::new(Vec::new()),
            selections: Rc::new(RefCell::new(Vec::new())),
            on_select: RefCell::new(None),
            progress: Cell::new([0.0; 3]),
            raf: RefCell::new(None),
            raf_id: Cell::new(None),
        })
    }

    /// Hand the built view to the host and route its selections to the outbox.
    pub fn install(&self, mut mounted: Mounted) {
        let outbox = Rc::clone(&self.selections);
        mounted.view.set_on_select(Some(Box::new(move |body, info: &SelectionInfo| {
            outbox.borrow_mut().push((body, *info));
        })));
        *self.mounted.borrow_mut() = Some(mounted);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some()
    }

    pub fn push_input(&self, event: InputEvent) {
        self.pending_input.borrow_mut().push(event);
    }

    pub fn set_progress(&self, progress: [f32; 3]) {
        self.progress.set(progress);
    }

    pub fn set_on_select(&self, callback: Option<Function>) {
        *self.on_select.borrow_mut() = callback;
    }

    /// Attach pointer, wheel, resize and label-click listeners. Listeners
    /// attached before a failure stay recorded so unmount detaches them.
    pub fn bind_events(self: &Rc<Self>, mounted: &mut Mounted) -> Result<(), JsValue> {
        let ledger = mounted.view.ledger_mut();
        let container: &web_sys::EventTarget = self.container.as_ref();

        for (event, kind) in POINTER_EVENTS {
            let weak = Rc::downgrade(self);
            mounted.listeners.push(EventBinding::attach(container, event, true, ledger, move |e: Event| {
                let Some(shared) = weak.upgrade() else { return };
                let Some(pointer) = e.dyn_ref::<PointerEvent>() else { return };
                let (x, y) = shared.local_coords(pointer);
                let pointer_id = pointer.pointer_id();
                shared.push_input(match kind {
                    PointerKind::Down => {
                        // Releases outside the container must still end the gesture
                        if let Err(err) = shared.container.set_pointer_capture(pointer_id) {
                            log::debug!("pointer capture failed for {}: {:?}", pointer_id, err);
                        }
                        InputEvent::PointerDown { x, y, pointer_id }
                    }
                    PointerKind::Move => InputEvent::PointerMove { x, y, pointer_id },
                    PointerKind::Up => InputEvent::PointerUp { x, y, pointer_id },
                });
            })?);
        }

        let weak = Rc::downgrade(self);
        mounted.listeners.push(EventBinding::attach(container, "wheel", false, ledger, move |e: Event| {
            let Some(shared) = weak.upgrade() else { return };
            let Some(wheel) = e.dyn_ref::<WheelEvent>() else { return };
            e.prevent_default();
            shared.push_input(InputEvent::Wheel { delta_y: wheel.delta_y() as f32 });
        })?);

        for event in VIEWPORT_EVENTS {
            let weak = Rc::downgrade(self);
            mounted.listeners.push(EventBinding::attach(self.window.as_ref(), event, true, ledger, move |_e: Event| {
                let Some(shared) = weak.upgrade() else { return };
                let viewport = measure(&shared.window, &shared.container);
                shared.push_input(InputEvent::Resize(viewport));
            })?);
        }

        for (body, element) in mounted.labels.iter() {
            let weak = Rc::downgrade(self);
            let body = *body;
            mounted.listeners.push(EventBinding::attach(element.as_ref(), "pointerdown", true, ledger, move |e: Event| {
                // Keep the container from treating a label click as a drag or pick
                e.stop_propagation();
                if let Some(shared) = weak.upgrade() {
                    shared.push_input(InputEvent::LabelClick(body));
                }
            })?);
        }

        Ok(())
    }

    fn local_coords(&self, event: &MouseEvent) -> (f32, f32) {
        let rect = self.container.get_bounding_client_rect();
        ((event.client_x() as f64 - rect.left()) as f32, (event.client_y() as f64 - rect.top()) as f32)
    }

    /// Start the animation frame loop.
    pub fn start(self: &Rc<Self>) -> Result<(), JsValue> {
        let weak: Weak<Self> = Rc::downgrade(self);
        let closure = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(now);
            }
        });
        *self.raf.borrow_mut() = Some(closure);
        self.request_frame()
    }

    fn request_frame(&self) -> Result<(), JsValue> {
        let raf = self.raf.borrow();
        let Some(closure) = raf.as_ref() else { return Ok(()) };
        let id = self.window.request_animation_frame(closure.as_ref().unchecked_ref())?;
        self.raf_id.set(Some(id));
        Ok(())
    }

    fn on_frame(&self, now: f64) {
        self.raf_id.set(None);

        let draw = {
            let mut slot = self.mounted.borrow_mut();
            let Some(mounted) = slot.as_mut() else { return };
            let [star, octavia, zythera] = self.progress.get();
            mounted.view.set_progress(BodyId::Star, star);
            mounted.view.set_progress(BodyId::Octavia, octavia);
            mounted.view.set_progress(BodyId::Zythera, zythera);
            for event in self.pending_input.borrow_mut().drain(..) {
                mounted.view.push_input(event);
            }
            mounted.view.run_frame(now, &mut mounted.renderer, &mut mounted.labels);
            mounted.renderer.take_draw()
        };

        match draw {
            Ok(Some((draw, frame))) => {
                if let Err(err) = draw.call1(&JsValue::NULL, &frame) {
                    log::warn!("draw callback failed: {:?}", err);
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("packing frame failed: {:?}", err),
        }
        self.deliver_selections();

        let wants_frame = self.mounted.borrow().as_ref().is_some_and(|m| m.view.wants_frame());
        if wants_frame {
            if let Err(err) = self.request_frame() {
                log::warn!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }

    fn deliver_selections(&self) {
        let selections: Vec<_> = self.selections.borrow_mut().drain(..).collect();
        if selections.is_empty() {
            return;
        }
        let callback = self.on_select.borrow().clone();
        let Some(callback) = callback else { return };
        for (body, info) in selections {
            let delivered = selection_object(&info)
                .and_then(|payload| callback.call2(&JsValue::NULL, &JsValue::from_str(body.tag()), &payload));
            if let Err(err) = delivered {
                log::warn!("selection callback failed for {}: {:?}", body.tag(), err);
            }
        }
    }

    /// Tear down in reverse order of setup. Safe to call more than once and
    /// from inside a JS callback.
    pub fn unmount(&self) -> bool {
        if let Some(id) = self.raf_id.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", err);
            }
        }
        let taken = self.mounted.borrow_mut().take();
        let Some(mut mounted) = taken else { return false };

        let ledger = mounted.view.ledger_mut();
        for binding in mounted.listeners.drain(..) {
            binding.detach(ledger);
        }
        mounted.labels.remove_all();
        for id in mounted.label_resources.drain(..) {
            ledger.release(id);
        }
        ledger.release(mounted.surface);
        debug_assert_eq!(ledger.live_of(ResourceKind::Listener), 0);

        mounted.view.unmount(&mut mounted.renderer);
        self.pending_input.borrow_mut().clear();
        self.selections.borrow_mut().clear();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerKind {
    Down,
    Move,
    Up,
}
