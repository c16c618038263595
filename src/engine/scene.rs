//! The lab scene: a textured T-rex turned by the arrow keys, an earth
//! orbiting it, and a light direction turned by mouse drags.

use gl::types::GLint;
use log::info;

use crate::engine::camera::Camera;
use crate::engine::config::Config;
use crate::engine::error::EngineError;
use crate::engine::geometry::Geometry;
use crate::engine::math::{Mat4, MathError};
use crate::engine::mesh::GLMesh;
use crate::engine::shader::GLShaderProgram;
use crate::engine::texture::Texture;

/// Texture unit the `tex` sampler reads from.
const TEXTURE_UNIT: u32 = 0;

/// Per-frame values sampled from the clock and the rotators.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since the program started.
    pub time: f32,
    /// Arrow-key angles `(phi, theta)`.
    pub key: (f32, f32),
    /// Mouse-drag angles `(phi, theta)`.
    pub mouse: (f32, f32),
}

/// Matrices uploaded as uniforms for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    /// Light-view rotation (`LV`).
    pub light_view: Mat4,
    /// Model-view of the T-rex.
    pub dino_model_view: Mat4,
    /// Model-view of the orbiting earth.
    pub earth_model_view: Mat4,
    /// Projection (`P`).
    pub projection: Mat4,
}

/// Builds every matrix of a frame. Pure; no GL calls.
pub fn compute_frame_matrices(
    input: &FrameInput,
    camera: &Camera,
    orbit_radius: f32,
) -> Result<FrameMatrices, MathError> {
    let view = camera.view_matrix();

    let light_view = Mat4::rotation_z(input.mouse.0) * Mat4::rotation_x(input.mouse.1);

    let mut dino_model_view = Mat4::rotation_y(input.key.0) * Mat4::rotation_x(input.key.1);
    dino_model_view.pre_multiply(&view);

    let mut earth_model_view = Mat4::translation(0.0, 0.0, -orbit_radius);
    earth_model_view.pre_multiply(&Mat4::rotation_y(input.time));
    earth_model_view.pre_multiply(&view);

    Ok(FrameMatrices {
        light_view,
        dino_model_view,
        earth_model_view,
        projection: camera.projection_matrix()?,
    })
}

/// Shader uniform locations, resolved once when the program is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UniformLocations {
    pub model_view: Option<GLint>,
    pub projection: Option<GLint>,
    pub light_view: Option<GLint>,
    pub time: Option<GLint>,
    pub texture: Option<GLint>,
}

impl UniformLocations {
    pub fn resolve(program: &GLShaderProgram) -> Self {
        Self {
            model_view: program.uniform_location("MV"),
            projection: program.uniform_location("P"),
            light_view: program.uniform_location("LV"),
            time: program.uniform_location("time"),
            texture: program.uniform_location("tex"),
        }
    }
}

/// A mesh drawn with one texture.
#[derive(Debug)]
pub struct Renderable {
    pub mesh: GLMesh,
    pub texture: Texture,
}

impl Renderable {
    fn draw(&self, program: &GLShaderProgram, uniforms: &UniformLocations, model_view: &Mat4) {
        program.set_uniform_matrix4(uniforms.model_view, model_view);
        self.texture.bind(TEXTURE_UNIT);
        program.set_uniform_i32(uniforms.texture, TEXTURE_UNIT as i32);
        self.mesh.render();
    }
}

/// All GPU state the frame loop needs, passed explicitly instead of living
/// in globals.
#[derive(Debug)]
pub struct RenderContext {
    pub program: GLShaderProgram,
    pub uniforms: UniformLocations,
    pub dino: Renderable,
    pub earth: Renderable,
    pub camera: Camera,
    pub orbit_radius: f32,
}

impl RenderContext {
    /// Loads shaders, meshes and textures named by `config`. Requires a
    /// current GL context. A camera that cannot project fails here, before
    /// the first frame.
    pub fn load(config: &Config) -> Result<Self, EngineError> {
        config.validate()?;

        let program =
            GLShaderProgram::from_files(&config.vertex_shader, &config.fragment_shader)?;
        let uniforms = UniformLocations::resolve(&program);

        let dino = Renderable {
            mesh: GLMesh::from_geometry(&Geometry::from_obj(&config.dino_mesh)?)?,
            texture: Texture::from_file(&config.dino_texture)?,
        };
        let earth = Renderable {
            mesh: GLMesh::from_geometry(&Geometry::sphere(
                config.earth_radius,
                config.earth_segments,
            )?)?,
            texture: Texture::from_file(&config.earth_texture)?,
        };
        info!("scene loaded");

        Ok(Self {
            program,
            uniforms,
            dino,
            earth,
            camera: config.camera.clone(),
            orbit_radius: config.orbit_radius,
        })
    }

    pub fn frame_matrices(&self, input: &FrameInput) -> Result<FrameMatrices, MathError> {
        compute_frame_matrices(input, &self.camera, self.orbit_radius)
    }

    /// Uploads the frame's uniforms and draws the T-rex, then the earth.
    pub fn draw(&self, input: &FrameInput, matrices: &FrameMatrices) {
        let program = &self.program;
        let uniforms = &self.uniforms;

        program.use_program();
        program.set_uniform_f32(uniforms.time, input.time);
        program.set_uniform_matrix4(uniforms.light_view, &matrices.light_view);
        program.set_uniform_matrix4(uniforms.projection, &matrices.projection);

        self.dino.draw(program, uniforms, &matrices.dino_model_view);
        self.earth.draw(program, uniforms, &matrices.earth_model_view);

        Texture::unbind();
        unsafe { gl::UseProgram(0) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_point_eq(a: [f32; 4], b: [f32; 4]) {
        for i in 0..4 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn idle_frame_places_dino_in_front_of_camera() {
        let m =
            compute_frame_matrices(&FrameInput::default(), &Camera::default(), 1.2).unwrap();
        assert_eq!(m.light_view, Mat4::IDENTITY);
        assert_point_eq(m.dino_model_view * [0.0, 0.0, 0.0, 1.0], [0.0, 0.0, -5.0, 1.0]);
        assert_point_eq(m.earth_model_view * [0.0, 0.0, 0.0, 1.0], [0.0, 0.0, -6.2, 1.0]);
    }

    #[test]
    fn earth_orbits_around_dino() {
        let input = FrameInput {
            time: FRAC_PI_2,
            ..FrameInput::default()
        };
        let m = compute_frame_matrices(&input, &Camera::default(), 1.2).unwrap();
        // A quarter turn about Y carries (0, 0, -1.2) to (-1.2, 0, 0).
        assert_point_eq(m.earth_model_view * [0.0, 0.0, 0.0, 1.0], [-1.2, 0.0, -5.0, 1.0]);
    }

    #[test]
    fn key_rotation_turns_dino_about_its_origin() {
        let input = FrameInput {
            key: (PI, 0.0),
            ..FrameInput::default()
        };
        let m = compute_frame_matrices(&input, &Camera::default(), 1.2).unwrap();
        // Half a turn about Y flips +X, and the origin stays 5 units away.
        assert_point_eq(m.dino_model_view * [1.0, 0.0, 0.0, 1.0], [-1.0, 0.0, -5.0, 1.0]);
    }

    #[test]
    fn light_view_is_rz_then_rx() {
        let input = FrameInput {
            mouse: (0.4, -0.9),
            ..FrameInput::default()
        };
        let m = compute_frame_matrices(&input, &Camera::default(), 1.2).unwrap();
        let expected = Mat4::rotation_z(0.4) * Mat4::rotation_x(-0.9);
        assert_eq!(m.light_view, expected);
    }

    #[test]
    fn degenerate_camera_fails_the_frame() {
        let mut camera = Camera::default();
        camera.set_near_far(2.0, 2.0);
        assert!(compute_frame_matrices(&FrameInput::default(), &camera, 1.2).is_err());
    }
}
