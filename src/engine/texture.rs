use std::fmt;
use std::path::Path;

use gl::types::{GLint, GLsizei, GLuint};
use log::info;

#[derive(Debug)]
pub enum TextureError {
    Image(image::ImageError),
    TooLarge { width: u32, height: u32 },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Image(error) => write!(f, "unable to load texture: {error}"),
            TextureError::TooLarge { width, height } => {
                write!(f, "texture of {width}x{height} pixels is too large")
            }
        }
    }
}

impl std::error::Error for TextureError {}

impl From<image::ImageError> for TextureError {
    fn from(error: image::ImageError) -> Self {
        TextureError::Image(error)
    }
}

/// Decoded RGBA8 pixels with the first row at the bottom, as GL expects.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        // `image` decodes with a top-left origin; flip to GL's bottom-left.
        let rgba = image::open(path)?.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        if GLsizei::try_from(width).is_err() || GLsizei::try_from(height).is_err() {
            return Err(TextureError::TooLarge { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// A mipmapped 2D texture object.
#[derive(Debug)]
pub struct Texture {
    id: GLuint,
    width: u32,
    height: u32,
}

impl Texture {
    /// Loads an image file (TGA, PNG, ...) and uploads it. Requires a current GL context.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = TextureImage::open(path)?;
        let texture = Self::from_image(&image);
        info!(
            "loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    pub fn from_image(image: &TextureImage) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );

            // Rows are tightly packed RGBA, so 4-byte alignment always holds.
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.pixels.as_ptr() as *const _,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }

        Self {
            id,
            width: image.width,
            height: image.height,
        }
    }

    /// Binds the texture to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }

    pub fn unbind() {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, 0) };
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe { gl::DeleteTextures(1, &self.id) };
    }
}
