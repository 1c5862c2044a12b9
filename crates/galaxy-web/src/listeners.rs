//! DOM event listeners owned by a mount.

use galaxy_engine::{ResourceId, ResourceKind, ResourceLedger};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// One attached listener. Keeps the closure alive until `detach`.
pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
    resource: ResourceId,
}

impl EventBinding {
    /// Attach `handler` for `event` and register it in the ledger.
    /// Non-passive listeners may call `prevent_default`.
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        ledger: &mut ResourceLedger,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        let resource = ledger.acquire(ResourceKind::Listener, event);
        Ok(Self { target: target.clone(), event, closure, resource })
    }

    /// Remove the listener and release its ledger entry. Failures are logged;
    /// teardown never throws.
    pub fn detach(self, ledger: &mut ResourceLedger) {
        let removed = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        if let Err(err) = removed {
            log::warn!("removing '{}' listener failed: {:?}", self.event, err);
        }
        ledger.release(self.resource);
    }

    pub fn event(&self) -> &'static str {
        self.event
    }
}
