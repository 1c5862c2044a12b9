pub mod autoscale;
pub mod galaxy;
pub mod scene_builder;
pub mod animation;
pub mod render;
pub mod zoom;
pub mod auto_orbit;
pub mod labels;
pub mod resize;
pub mod interaction;
