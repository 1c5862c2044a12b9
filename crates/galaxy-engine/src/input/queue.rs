use crate::api::types::{BodyId, Viewport};

/// Input events the view understands.
/// Pointer coordinates are CSS pixels relative to the container's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32, pointer_id: i32 },
    /// A touch/cursor moved.
    PointerMove { x: f32, y: f32, pointer_id: i32 },
    /// A touch/click ended or was cancelled.
    PointerUp { x: f32, y: f32, pointer_id: i32 },
    /// Wheel scroll. Positive `delta_y` zooms out.
    Wheel { delta_y: f32 },
    /// The window or container changed size.
    Resize(Viewport),
    /// A DOM label was clicked; selects without raycasting.
    LabelClick(BodyId),
}

/// A queue of input events.
/// The host pushes events as they arrive; the view drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
