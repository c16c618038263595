//! A small OpenGL framework for an introductory computer graphics course.
//!
//! It opens a window with `glutin`, uploads meshes to vertex array objects,
//! compiles GLSL programs, and renders textured meshes with transforms built
//! by the column-major matrix library in [`engine::math`].

pub mod engine;

pub use engine::config::Config;
pub use engine::error::EngineError;
pub use engine::math::Mat4;
