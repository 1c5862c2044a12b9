pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{
    GalaxyConfig, GalaxyParams, AutoscaleConfig, CameraConfig,
    OrbitConfig, ZoomConfig, LabelConfig, ResizeConfig,
};
pub use api::types::{BodyId, SelectionInfo, SelectCallback, Viewport};
pub use api::view::GalaxyView;
pub use components::body::{CelestialBody, BodyKind};
pub use components::mesh::{Color, Geometry, Material, MeshComponent};
pub use crate::core::resources::{ResourceId, ResourceKind, ResourceLedger};
pub use crate::core::scene::{SceneGraph, Node, NodeId, NodeKind};
pub use crate::core::scheduler::{FrameScheduler, Task, TaskHandle};
pub use crate::core::time::{FrameClock, FrameTime};
pub use renderer::instance::{PointVertex, MeshInstance, CameraUniform, LightInstance};
pub use renderer::{Renderer, RendererSettings, ResourceDescriptor, FrameData, PerspectiveCamera};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::autoscale::{AutoscaleProfile, DeviceTier, Orientation};
pub use systems::auto_orbit::{CameraAuthority, InteractionState};
pub use systems::labels::{LabelSink, LabelPlacement};
pub use systems::scene_builder::{LabelSpec, LABELS, STAR_POSITION};

// Extensions: decoupled helpers
pub use extensions::{Easing, lerp, lerp_vec3, ease_vec3};
