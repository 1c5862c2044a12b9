// extensions/mod.rs
//
// Optional helpers layered on top of the core scene.
// Nothing in core depends on these.

pub mod easing;

pub use easing::{Easing, lerp, lerp_vec3, ease_vec3};
