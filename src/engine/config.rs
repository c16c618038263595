use std::path::PathBuf;

use crate::engine::camera::Camera;
use crate::engine::math::MathError;

/// Everything the demo scene needs to start: window, assets, camera.
///
/// The defaults reproduce the lab setup: a square window as tall as the
/// desktop, a textured T-rex at the origin and an earth orbiting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    /// `None` opens a square window with the primary monitor's height.
    pub window_size: Option<(u32, u32)>,
    pub clear_color: [f32; 4],
    /// Wait for vertical sync when swapping buffers.
    pub vsync: bool,

    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub dino_mesh: PathBuf,
    pub dino_texture: PathBuf,
    pub earth_texture: PathBuf,

    pub earth_radius: f32,
    pub earth_segments: u32,
    /// Distance of the earth from the scene origin.
    pub orbit_radius: f32,

    pub camera: Camera,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "GLprimer".to_owned(),
            window_size: None,
            clear_color: [0.3, 0.3, 0.3, 0.0],
            vsync: false,
            vertex_shader: PathBuf::from("shaders/vertex.glsl"),
            fragment_shader: PathBuf::from("shaders/fragment.glsl"),
            dino_mesh: PathBuf::from("meshes/trex.obj"),
            dino_texture: PathBuf::from("textures/trex.tga"),
            earth_texture: PathBuf::from("textures/earth.tga"),
            earth_radius: 0.25,
            earth_segments: 20,
            orbit_radius: 1.2,
            camera: Camera::default(),
        }
    }
}

impl Config {
    /// Size of the window to open, given the primary monitor's size if known.
    pub fn resolve_window_size(&self, monitor: Option<(u32, u32)>) -> (u32, u32) {
        match (self.window_size, monitor) {
            (Some(size), _) => size,
            (None, Some((_, height))) if height > 0 => (height, height),
            (None, _) => (800, 800),
        }
    }

    /// Rejects a camera whose lens cannot produce a projection, so a bad
    /// configuration fails before any asset is loaded.
    pub fn validate(&self) -> Result<(), MathError> {
        self.camera.projection_matrix().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_square_monitor_height() {
        let config = Config::default();
        assert_eq!(config.resolve_window_size(Some((1920, 1080))), (1080, 1080));
        assert_eq!(config.resolve_window_size(None), (800, 800));
    }

    #[test]
    fn explicit_window_size_wins() {
        let config = Config {
            window_size: Some((640, 480)),
            ..Config::default()
        };
        assert_eq!(config.resolve_window_size(Some((1920, 1080))), (640, 480));
    }

    #[test]
    fn defaults_disable_vsync() {
        let config = Config::default();
        assert!(!config.vsync);
        assert_eq!(config.camera.distance, 5.0);
        assert_eq!(config.orbit_radius, 1.2);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn degenerate_camera_is_rejected() {
        let mut config = Config::default();
        config.camera.set_near_far(3.0, 3.0);
        assert!(matches!(
            config.validate(),
            Err(MathError::DegenerateProjection { .. })
        ));

        let mut config = Config::default();
        config.camera.set_fov(270.0);
        assert!(config.validate().is_err());
    }
}
