pub mod rng;
pub mod time;
pub mod scene;
pub mod scheduler;
pub mod resources;
