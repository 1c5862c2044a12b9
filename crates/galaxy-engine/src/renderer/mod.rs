pub mod instance;
pub mod camera;
pub mod ray;
pub mod traits;

// Re-export key types for convenient access
pub use traits::{Renderer, RendererSettings, ResourceDescriptor, FrameData};
pub use camera::PerspectiveCamera;
pub use ray::{Ray, RayHit, raycast};
