pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod mesh;
pub mod renderer;
pub mod rotator;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod utilities;
