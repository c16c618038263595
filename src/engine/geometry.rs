//! CPU-side triangle meshes: procedural shapes and Wavefront OBJ import.

use std::f32::consts::PI;
use std::fmt;
use std::path::Path;

use log::{debug, info};

/// Attribute location of the vertex position (`layout(location = 0)`).
pub const POSITION_LOCATION: u32 = 0;
/// Attribute location of the vertex normal.
pub const NORMAL_LOCATION: u32 = 1;
/// Attribute location of the texture coordinates.
pub const TEXCOORD_LOCATION: u32 = 2;

/// Vertex format storing position, normal, and uv texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3], // x, y, z
    pub normal: [f32; 3],   // nx, ny, nz (for lighting)
    pub uv: [f32; 2],       // texture coordinates u, v
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// One vertex attribute as a flat float array, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeData {
    /// Must match the `layout(location = #)` in the vertex shader.
    pub location: u32,
    /// Components per vertex (3 -> vec3, 2 -> vec2).
    pub dimensions: usize,
    pub data: Vec<f32>,
}

#[derive(Debug)]
pub enum GeometryError {
    Obj(tobj::LoadError),
    EmptyObj,
    TooFewSegments(u32),
    IndexOutOfRange { index: u32, vertex_count: usize },
    IncompleteTriangle(usize),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Obj(error) => write!(f, "unable to load OBJ file: {error}"),
            GeometryError::EmptyObj => write!(f, "OBJ file contains no models"),
            GeometryError::TooFewSegments(segments) => {
                write!(f, "a sphere needs at least 3 segments, got {segments}")
            }
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(f, "index {index} out of range for {vertex_count} vertices"),
            GeometryError::IncompleteTriangle(count) => {
                write!(f, "index count {count} is not a multiple of 3")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

impl From<tobj::LoadError> for GeometryError {
    fn from(error: tobj::LoadError) -> Self {
        GeometryError::Obj(error)
    }
}

/// An indexed triangle soup.
///
/// Holds CPU-side data only; [`GLMesh`](crate::engine::mesh::GLMesh) uploads it.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    /// Every three indices form one counter-clockwise triangle.
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Creates a UV sphere of `radius` centered at the origin.
    ///
    /// `segments` is the number of divisions around the equator; the sphere
    /// gets half as many (at least two) from pole to pole. The seam column is
    /// duplicated so texture coordinates wrap cleanly.
    pub fn sphere(radius: f32, segments: u32) -> Result<Self, GeometryError> {
        if segments < 3 {
            return Err(GeometryError::TooFewSegments(segments));
        }
        let rings = (segments / 2).max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let theta = PI * ring as f32 / rings as f32;
            let y = theta.cos();
            let ring_radius = theta.sin();

            for seg in 0..=segments {
                let phi = 2.0 * PI * seg as f32 / segments as f32;
                let x = ring_radius * phi.sin();
                let z = ring_radius * phi.cos();

                vertices.push(Vertex::new(
                    [x * radius, y * radius, z * radius],
                    [x, y, z],
                    [seg as f32 / segments as f32, 1.0 - ring as f32 / rings as f32],
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let below = current + segments + 1;

                indices.extend_from_slice(&[current, below, below + 1]);
                indices.extend_from_slice(&[current, below + 1, current + 1]);
            }
        }

        debug!(
            "generated sphere: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );
        Ok(Self { vertices, indices })
    }

    /// Creates an axis-aligned box centered at the origin.
    ///
    /// Each face has its own four vertices so normals stay flat.
    pub fn cuboid(x_size: f32, y_size: f32, z_size: f32) -> Self {
        let (x, y, z) = (x_size / 2.0, y_size / 2.0, z_size / 2.0);

        // (normal, u axis, v axis) per face
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let corners = [
            ([-1.0, -1.0], [0.0, 0.0]),
            ([1.0, -1.0], [1.0, 0.0]),
            ([1.0, 1.0], [1.0, 1.0]),
            ([-1.0, 1.0], [0.0, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u_axis, v_axis) in faces {
            let base = vertices.len() as u32;
            for ([su, sv], uv) in corners {
                let unit = [
                    normal[0] + su * u_axis[0] + sv * v_axis[0],
                    normal[1] + su * u_axis[1] + sv * v_axis[1],
                    normal[2] + su * u_axis[2] + sv * v_axis[2],
                ];
                vertices.push(Vertex::new([unit[0] * x, unit[1] * y, unit[2] * z], normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Loads the first model of a Wavefront OBJ file.
    ///
    /// Faces are triangulated and positions, normals and texture coordinates
    /// share one index. Missing normals or texture coordinates are zero.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mesh = models
            .into_iter()
            .next()
            .map(|model| model.mesh)
            .ok_or(GeometryError::EmptyObj)?;

        let vertex_count = mesh.positions.len() / 3;
        let vertices = (0..vertex_count)
            .map(|i| {
                let position = [
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                ];
                let normal = mesh
                    .normals
                    .get(3 * i..3 * i + 3)
                    .map_or([0.0; 3], |n| [n[0], n[1], n[2]]);
                let uv = mesh
                    .texcoords
                    .get(2 * i..2 * i + 2)
                    .map_or([0.0; 2], |t| [t[0], t[1]]);
                Vertex::new(position, normal, uv)
            })
            .collect();

        let geometry = Self {
            vertices,
            indices: mesh.indices,
        };
        geometry.validate()?;

        info!(
            "loaded {}: {} vertices, {} triangles",
            path.display(),
            geometry.vertices.len(),
            geometry.triangle_count()
        );
        Ok(geometry)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the indices describe whole triangles over existing vertices.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }
        let vertex_count = self.vertices.len();
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&index) => Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Splits the vertices into one float array per shader attribute.
    pub fn attributes(&self) -> Vec<AttributeData> {
        let mut positions = Vec::with_capacity(self.vertices.len() * 3);
        let mut normals = Vec::with_capacity(self.vertices.len() * 3);
        let mut texcoords = Vec::with_capacity(self.vertices.len() * 2);
        for vertex in &self.vertices {
            positions.extend_from_slice(&vertex.position);
            normals.extend_from_slice(&vertex.normal);
            texcoords.extend_from_slice(&vertex.uv);
        }

        vec![
            AttributeData {
                location: POSITION_LOCATION,
                dimensions: 3,
                data: positions,
            },
            AttributeData {
                location: NORMAL_LOCATION,
                dimensions: 3,
                data: normals,
            },
            AttributeData {
                location: TEXCOORD_LOCATION,
                dimensions: 2,
                data: texcoords,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = Geometry::sphere(0.25, 20).unwrap();
        assert_eq!(sphere.vertices.len(), 21 * 11);
        assert_eq!(sphere.triangle_count(), 20 * 10 * 2);
        for vertex in &sphere.vertices {
            assert_abs_diff_eq!(length(vertex.position), 0.25, epsilon = 1e-5);
            assert_abs_diff_eq!(length(vertex.normal), 1.0, epsilon = 1e-5);
        }
        sphere.validate().unwrap();
    }

    #[test]
    fn sphere_triangles_face_outwards() {
        let sphere = Geometry::sphere(1.0, 8).unwrap();
        for tri in sphere.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| sphere.vertices[i as usize].position);
            let n = cross(sub(b, a), sub(c, a));
            // Degenerate triangles at the poles have no orientation.
            if length(n) < 1e-6 {
                continue;
            }
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let dot = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(dot > 0.0, "inward-facing triangle {tri:?}");
        }
    }

    #[test]
    fn sphere_rejects_too_few_segments() {
        assert!(matches!(
            Geometry::sphere(1.0, 2),
            Err(GeometryError::TooFewSegments(2))
        ));
    }

    #[test]
    fn cuboid_has_flat_outward_faces() {
        let cuboid = Geometry::cuboid(1.0, 2.0, 3.0);
        assert_eq!(cuboid.vertices.len(), 24);
        assert_eq!(cuboid.indices.len(), 36);
        cuboid.validate().unwrap();

        for vertex in &cuboid.vertices {
            assert_abs_diff_eq!(vertex.position[0].abs(), 0.5);
            assert_abs_diff_eq!(vertex.position[1].abs(), 1.0);
            assert_abs_diff_eq!(vertex.position[2].abs(), 1.5);
        }
        for tri in cuboid.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| cuboid.vertices[i as usize]);
            let n = cross(sub(b.position, a.position), sub(c.position, a.position));
            let dot = n[0] * a.normal[0] + n[1] * a.normal[1] + n[2] * a.normal[2];
            assert!(dot > 0.0, "triangle {tri:?} winds against its normal");
        }
    }

    #[test]
    fn attributes_split_per_location() {
        let attributes = Geometry::cuboid(1.0, 1.0, 1.0).attributes();
        let layout: Vec<_> = attributes
            .iter()
            .map(|a| (a.location, a.dimensions, a.data.len()))
            .collect();
        assert_eq!(layout, vec![(0, 3, 72), (1, 3, 72), (2, 2, 48)]);
    }

    #[test]
    fn validate_reports_bad_indices() {
        let mut geometry = Geometry::cuboid(1.0, 1.0, 1.0);
        geometry.indices.push(0);
        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::IncompleteTriangle(37))
        ));

        geometry.indices.extend_from_slice(&[1, 99]);
        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 99,
                vertex_count: 24
            })
        ));
    }

    #[test]
    fn loads_quad_from_obj() {
        let path = std::env::temp_dir().join(format!("glprimer-quad-{}.obj", std::process::id()));
        fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1 4/4/1\n",
        )
        .unwrap();

        let quad = Geometry::from_obj(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.triangle_count(), 2);
        let top_right = quad
            .vertices
            .iter()
            .find(|v| v.position == [1.0, 1.0, 0.0])
            .unwrap();
        assert_eq!(top_right.uv, [1.0, 1.0]);
        assert_eq!(top_right.normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_obj_is_an_error() {
        let result = Geometry::from_obj("/nonexistent/glprimer/missing.obj");
        assert!(matches!(result, Err(GeometryError::Obj(_))));
    }
}
