use std::fmt;

use glutin::{ContextError, CreationError};

use crate::engine::geometry::GeometryError;
use crate::engine::math::MathError;
use crate::engine::mesh::MeshError;
use crate::engine::shader::ShaderError;
use crate::engine::texture::TextureError;

#[derive(Debug)]
pub enum EngineError {
    Window(CreationError),
    Context(ContextError),
    Shader(ShaderError),
    Texture(TextureError),
    Geometry(GeometryError),
    Mesh(MeshError),
    Math(MathError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Window(error) => write!(f, "unable to open window: {error}"),
            EngineError::Context(error) => write!(f, "OpenGL context error: {error}"),
            EngineError::Shader(error) => write!(f, "{error}"),
            EngineError::Texture(error) => write!(f, "{error}"),
            EngineError::Geometry(error) => write!(f, "{error}"),
            EngineError::Mesh(error) => write!(f, "{error}"),
            EngineError::Math(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Window(error) => Some(error),
            EngineError::Context(error) => Some(error),
            EngineError::Shader(error) => Some(error),
            EngineError::Texture(error) => Some(error),
            EngineError::Geometry(error) => Some(error),
            EngineError::Mesh(error) => Some(error),
            EngineError::Math(error) => Some(error),
        }
    }
}

impl From<CreationError> for EngineError {
    fn from(error: CreationError) -> Self {
        EngineError::Window(error)
    }
}

impl From<ContextError> for EngineError {
    fn from(error: ContextError) -> Self {
        EngineError::Context(error)
    }
}

impl From<ShaderError> for EngineError {
    fn from(error: ShaderError) -> Self {
        EngineError::Shader(error)
    }
}

impl From<TextureError> for EngineError {
    fn from(error: TextureError) -> Self {
        EngineError::Texture(error)
    }
}

impl From<GeometryError> for EngineError {
    fn from(error: GeometryError) -> Self {
        EngineError::Geometry(error)
    }
}

impl From<MeshError> for EngineError {
    fn from(error: MeshError) -> Self {
        EngineError::Mesh(error)
    }
}

impl From<MathError> for EngineError {
    fn from(error: MathError) -> Self {
        EngineError::Math(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn wraps_module_errors_transparently() {
        let error = EngineError::from(MeshError::NoAttributes);
        assert_eq!(error.to_string(), "a mesh needs at least one attribute");
        assert!(error.source().is_some());
    }

    #[test]
    fn geometry_errors_convert() {
        let error: EngineError = GeometryError::TooFewSegments(1).into();
        assert!(matches!(error, EngineError::Geometry(GeometryError::TooFewSegments(1))));
    }
}
