pub mod queue;
pub mod orbit_controls;

pub use queue::{InputEvent, InputQueue};
pub use orbit_controls::{OrbitControls, ControlEvent};
