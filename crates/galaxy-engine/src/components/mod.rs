pub mod mesh;
pub mod body;
