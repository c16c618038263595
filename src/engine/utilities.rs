use std::ffi::CStr;

use gl::types::GLenum;

/// Counts frames and reports the rate about once per second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<f64>,
    frames: u32,
}

impl FpsCounter {
    /// Report interval in seconds.
    const INTERVAL: f64 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one frame at time `now` (seconds). Returns the average frame
    /// rate once at least a second has passed since the last report.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        let elapsed = now - start;
        if elapsed < Self::INTERVAL {
            return None;
        }
        let fps = self.frames as f64 / elapsed;
        self.window_start = Some(now);
        self.frames = 0;
        Some(fps)
    }
}

/// Window title with the frame rate appended.
pub fn fps_title(title: &str, fps: f64) -> String {
    format!("{title} ({fps:.1} FPS)")
}

/// Reads a `glGetString` value, or an empty string if the driver returns null.
pub fn gl_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return String::new();
        }
        CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned()
    }
}
