use std::ffi::{CString, NulError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gl::types::{GLchar, GLenum, GLint, GLuint};
use log::{info, warn};

use crate::engine::math::Mat4;

#[derive(Debug)]
pub enum ShaderError {
    Io { path: PathBuf, error: io::Error },
    Nul(NulError),
    Compile { stage: &'static str, log: String },
    Link { log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, error } => {
                write!(f, "unable to read shader {}: {error}", path.display())
            }
            ShaderError::Nul(error) => write!(f, "shader source contains a nul byte: {error}"),
            ShaderError::Compile { stage, log } => {
                write!(f, "{stage} shader compile error: {}", log.trim_end())
            }
            ShaderError::Link { log } => write!(f, "shader program link error: {}", log.trim_end()),
        }
    }
}

impl std::error::Error for ShaderError {}

impl From<NulError> for ShaderError {
    fn from(error: NulError) -> Self {
        ShaderError::Nul(error)
    }
}

fn stage_name(kind: GLenum) -> &'static str {
    match kind {
        gl::VERTEX_SHADER => "vertex",
        gl::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}

/// Turns a raw info log buffer into text, dropping the trailing nul.
fn info_log_to_string(mut buf: Vec<u8>) -> String {
    if let Some(end) = buf.iter().position(|&b| b == 0) {
        buf.truncate(end);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn compile_shader(src: &str, kind: GLenum) -> Result<GLuint, ShaderError> {
    let source = CString::new(src)?;
    unsafe {
        let shader = gl::CreateShader(kind);
        gl::ShaderSource(shader, 1, &source.as_ptr(), std::ptr::null());
        gl::CompileShader(shader);

        // Check compile status
        let mut status = 0;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status == 0 {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                len,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
            gl::DeleteShader(shader);
            return Err(ShaderError::Compile {
                stage: stage_name(kind),
                log: info_log_to_string(buf),
            });
        }

        Ok(shader)
    }
}

pub fn create_shader_program(vs_src: &str, fs_src: &str) -> Result<GLuint, ShaderError> {
    let vs = compile_shader(vs_src, gl::VERTEX_SHADER)?;
    let fs = match compile_shader(fs_src, gl::FRAGMENT_SHADER) {
        Ok(fs) => fs,
        Err(error) => {
            unsafe { gl::DeleteShader(vs) };
            return Err(error);
        }
    };

    unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vs);
        gl::AttachShader(program, fs);
        gl::LinkProgram(program);

        gl::DeleteShader(vs);
        gl::DeleteShader(fs);

        // Check link status
        let mut status = 0;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status == 0 {
            let mut len = 0;
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetProgramInfoLog(
                program,
                len,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );
            gl::DeleteProgram(program);
            return Err(ShaderError::Link {
                log: info_log_to_string(buf),
            });
        }

        Ok(program)
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|error| ShaderError::Io {
        path: path.to_path_buf(),
        error,
    })
}

/// A linked vertex + fragment shader program.
#[derive(Debug)]
pub struct GLShaderProgram {
    id: GLuint,
}

impl GLShaderProgram {
    pub fn from_sources(vs_src: &str, fs_src: &str) -> Result<Self, ShaderError> {
        let id = create_shader_program(vs_src, fs_src)?;
        Ok(Self { id })
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        vertex: P,
        fragment: Q,
    ) -> Result<Self, ShaderError> {
        let (vertex, fragment) = (vertex.as_ref(), fragment.as_ref());
        let program = Self::from_sources(&read_source(vertex)?, &read_source(fragment)?)?;
        info!(
            "linked shader program {} from {} and {}",
            program.id,
            vertex.display(),
            fragment.display()
        );
        Ok(program)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn use_program(&self) {
        unsafe { gl::UseProgram(self.id) };
    }

    /// Looks up a uniform by name. Uniforms the linker optimized away (or
    /// that never existed) resolve to `None` and are logged.
    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        let location = CString::new(name)
            .ok()
            .map(|c_name| unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) })
            .filter(|&location| location != -1);
        if location.is_none() {
            warn!("unable to locate uniform '{name}' in shader program {}", self.id);
        }
        location
    }

    // The setters below act on the program currently in use; a `None`
    // location is silently skipped, like GL does for -1.

    /// Uploads a column-major matrix without transposing it.
    pub fn set_uniform_matrix4(&self, location: Option<GLint>, matrix: &Mat4) {
        if let Some(location) = location {
            unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr()) };
        }
    }

    pub fn set_uniform_f32(&self, location: Option<GLint>, value: f32) {
        if let Some(location) = location {
            unsafe { gl::Uniform1f(location, value) };
        }
    }

    pub fn set_uniform_i32(&self, location: Option<GLint>, value: i32) {
        if let Some(location) = location {
            unsafe { gl::Uniform1i(location, value) };
        }
    }
}

impl Drop for GLShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}
