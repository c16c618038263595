use std::collections::HashSet;
use std::fmt;

use gl::{self, types::*};
use log::debug;

use crate::engine::geometry::{AttributeData, Geometry};

#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    InvalidDimensions { location: u32, dimensions: usize },
    RaggedAttribute { location: u32, len: usize, dimensions: usize },
    VertexCountMismatch { location: u32, expected: usize, found: usize },
    DuplicateLocation(u32),
    IndexOutOfRange { index: u32, vertex_count: usize },
    NoAttributes,
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::InvalidDimensions {
                location,
                dimensions,
            } => write!(f, "attribute {location} has {dimensions} components, expected 1 to 4"),
            MeshError::RaggedAttribute {
                location,
                len,
                dimensions,
            } => write!(f, "attribute {location} has {len} floats, not a multiple of {dimensions}"),
            MeshError::VertexCountMismatch {
                location,
                expected,
                found,
            } => write!(f, "attribute {location} has {found} vertices, expected {expected}"),
            MeshError::DuplicateLocation(location) => {
                write!(f, "attribute location {location} bound twice")
            }
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
            MeshError::NoAttributes => write!(f, "a mesh needs at least one attribute"),
        }
    }
}

impl std::error::Error for MeshError {}

/// Checks an attribute layout before upload and returns its vertex count.
pub fn validate_layout(attributes: &[AttributeData], indices: &[u32]) -> Result<usize, MeshError> {
    if attributes.is_empty() {
        return Err(MeshError::NoAttributes);
    }
    let mut seen = HashSet::new();
    let mut vertex_count = None;

    for attribute in attributes {
        let (location, dimensions, data) =
            (attribute.location, attribute.dimensions, &attribute.data);
        if !(1..=4).contains(&dimensions) {
            return Err(MeshError::InvalidDimensions {
                location,
                dimensions,
            });
        }
        if data.len() % dimensions != 0 {
            return Err(MeshError::RaggedAttribute {
                location,
                len: data.len(),
                dimensions,
            });
        }
        if !seen.insert(location) {
            return Err(MeshError::DuplicateLocation(location));
        }

        let count = data.len() / dimensions;
        let expected = *vertex_count.get_or_insert(count);
        if count != expected {
            return Err(MeshError::VertexCountMismatch {
                location,
                expected,
                found: count,
            });
        }
    }

    let vertex_count = vertex_count.unwrap_or(0);
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MeshError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(vertex_count)
}

/// A vertex array object with its attribute buffers and index buffer.
///
/// The GL objects are released when the mesh is dropped, so a `GLMesh`
/// must not outlive the context that created it.
#[derive(Debug)]
pub struct GLMesh {
    pub vao: GLuint,
    pub vbos: Vec<GLuint>,
    pub ibo: GLuint,
    pub index_count: usize,
}

impl GLMesh {
    /// Uploads static vertex and index data and records the attribute layout
    /// in a new vertex array object. Requires a current GL context.
    pub fn upload(attributes: &[AttributeData], indices: &[u32]) -> Result<Self, MeshError> {
        let vertex_count = validate_layout(attributes, indices)?;

        let mut vao = 0;
        let mut vbos = Vec::with_capacity(attributes.len());
        let ibo = unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);

            for attribute in attributes {
                vbos.push(create_vertex_buffer(attribute));
            }
            let ibo = create_index_buffer(indices);

            // The element buffer binding is part of the VAO state; unbind the VAO first.
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
            ibo
        };

        debug!(
            "uploaded mesh vao={vao}: {vertex_count} vertices, {} attributes, {} indices",
            attributes.len(),
            indices.len()
        );
        Ok(Self {
            vao,
            vbos,
            ibo,
            index_count: indices.len(),
        })
    }

    pub fn from_geometry(geometry: &Geometry) -> Result<Self, MeshError> {
        Self::upload(&geometry.attributes(), &geometry.indices)
    }

    /// Draws the whole index buffer as triangles.
    pub fn render(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count as GLsizei,
                gl::UNSIGNED_INT,
                std::ptr::null(),
            );
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for GLMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(self.vbos.len() as GLsizei, self.vbos.as_ptr());
            gl::DeleteBuffers(1, &self.ibo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

/// Creates a buffer for one attribute and enables it in the bound VAO.
unsafe fn create_vertex_buffer(attribute: &AttributeData) -> GLuint {
    let mut buffer = 0;
    unsafe {
        gl::GenBuffers(1, &mut buffer);
        gl::BindBuffer(gl::ARRAY_BUFFER, buffer);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            std::mem::size_of_val(attribute.data.as_slice()) as GLsizeiptr,
            attribute.data.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        // Tightly packed floats, not normalized, starting at offset 0.
        gl::VertexAttribPointer(
            attribute.location,
            attribute.dimensions as GLint,
            gl::FLOAT,
            gl::FALSE,
            0,
            std::ptr::null(),
        );
        gl::EnableVertexAttribArray(attribute.location);
    }
    buffer
}

unsafe fn create_index_buffer(indices: &[u32]) -> GLuint {
    let mut buffer = 0;
    unsafe {
        gl::GenBuffers(1, &mut buffer);
        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, buffer);
        gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            std::mem::size_of_val(indices) as GLsizeiptr,
            indices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(location: u32, dimensions: usize, len: usize) -> AttributeData {
        AttributeData {
            location,
            dimensions,
            data: vec![0.0; len],
        }
    }

    #[test]
    fn accepts_geometry_layout() {
        let geometry = Geometry::cuboid(1.0, 1.0, 1.0);
        assert_eq!(validate_layout(&geometry.attributes(), &geometry.indices), Ok(24));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            validate_layout(&[attribute(0, 5, 10)], &[]),
            Err(MeshError::InvalidDimensions {
                location: 0,
                dimensions: 5
            })
        );
        assert_eq!(
            validate_layout(&[attribute(0, 3, 10)], &[]),
            Err(MeshError::RaggedAttribute {
                location: 0,
                len: 10,
                dimensions: 3
            })
        );
    }

    #[test]
    fn rejects_mismatched_vertex_counts() {
        let layout = [attribute(0, 3, 9), attribute(2, 2, 8)];
        assert_eq!(
            validate_layout(&layout, &[0, 1, 2]),
            Err(MeshError::VertexCountMismatch {
                location: 2,
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn rejects_duplicate_locations_and_bad_indices() {
        let layout = [attribute(1, 3, 9), attribute(1, 3, 9)];
        assert_eq!(validate_layout(&layout, &[]), Err(MeshError::DuplicateLocation(1)));

        assert_eq!(
            validate_layout(&[attribute(0, 3, 9)], &[0, 1, 3]),
            Err(MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
        assert_eq!(validate_layout(&[], &[]), Err(MeshError::NoAttributes));
    }
}
