//! Interactive rotation angles driven by the arrow keys or a mouse drag.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glutin::event::VirtualKeyCode;

use crate::engine::input::InputState;

/// Radians per second while an arrow key is held.
const KEY_SPEED: f64 = FRAC_PI_2;

fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Arrow keys rotate at a fixed angular speed: left/right change `phi`,
/// up/down change `theta`. Both angles stay in `[0, 2π)`.
#[derive(Debug, Clone, Default)]
pub struct KeyRotator {
    pub phi: f64,
    pub theta: f64,
    last_time: Option<f64>,
}

impl KeyRotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the angles by the time elapsed since the previous poll.
    /// The first poll only records the time.
    pub fn poll(&mut self, input: &InputState, now: f64) {
        let elapsed = self.last_time.map_or(0.0, |last| (now - last).max(0.0));
        self.last_time = Some(now);
        let step = elapsed * KEY_SPEED;

        if input.is_pressed(VirtualKeyCode::Right) {
            self.phi += step;
        }
        if input.is_pressed(VirtualKeyCode::Left) {
            self.phi -= step;
        }
        if input.is_pressed(VirtualKeyCode::Up) {
            self.theta += step;
        }
        if input.is_pressed(VirtualKeyCode::Down) {
            self.theta -= step;
        }

        self.phi = wrap_angle(self.phi);
        self.theta = wrap_angle(self.theta);
    }
}

/// Dragging with the left button rotates: a drag across the full window
/// width turns `phi` by π, across the full height turns `theta` by π.
/// `theta` is clamped to `[-π/2, π/2]`.
#[derive(Debug, Clone, Default)]
pub struct MouseRotator {
    pub phi: f64,
    pub theta: f64,
    last_cursor: (f64, f64),
    last_left: bool,
}

impl MouseRotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, input: &InputState) {
        let (x, y) = input.cursor();
        let (width, height) = input.window_size();
        let left = input.left_button();

        if left && self.last_left && width > 0 && height > 0 {
            let (dx, dy) = (x - self.last_cursor.0, y - self.last_cursor.1);
            self.phi = wrap_angle(self.phi + PI * dx / width as f64);
            self.theta = (self.theta + PI * dy / height as f64).clamp(-FRAC_PI_2, FRAC_PI_2);
        }

        self.last_left = left;
        self.last_cursor = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_poll_does_not_rotate() {
        let mut input = InputState::new(100, 100);
        input.set_key(VirtualKeyCode::Right, true);

        let mut rotator = KeyRotator::new();
        rotator.poll(&input, 10.0);
        assert_eq!(rotator.phi, 0.0);

        rotator.poll(&input, 11.0);
        assert_relative_eq!(rotator.phi, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn key_angles_wrap_into_full_turn() {
        let mut input = InputState::new(100, 100);
        input.set_key(VirtualKeyCode::Left, true);
        input.set_key(VirtualKeyCode::Up, true);

        let mut rotator = KeyRotator::new();
        rotator.poll(&input, 0.0);
        rotator.poll(&input, 1.0);

        assert_relative_eq!(rotator.phi, TAU - FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(rotator.theta, FRAC_PI_2, epsilon = 1e-12);

        rotator.poll(&input, 5.0);
        assert!(rotator.theta >= 0.0 && rotator.theta < TAU);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = InputState::new(100, 100);
        input.set_key(VirtualKeyCode::Up, true);
        input.set_key(VirtualKeyCode::Down, true);

        let mut rotator = KeyRotator::new();
        rotator.poll(&input, 0.0);
        rotator.poll(&input, 0.5);
        assert_relative_eq!(rotator.theta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mouse_drag_rotates_proportionally() {
        let mut input = InputState::new(200, 100);
        let mut rotator = MouseRotator::new();

        input.set_cursor(50.0, 50.0);
        input.set_left_button(true);
        rotator.poll(&input);
        // The press itself does not rotate.
        assert_eq!((rotator.phi, rotator.theta), (0.0, 0.0));

        input.set_cursor(100.0, 75.0);
        rotator.poll(&input);
        assert_relative_eq!(rotator.phi, PI / 4.0, epsilon = 1e-12);
        assert_relative_eq!(rotator.theta, PI / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn mouse_ignores_motion_without_button() {
        let mut input = InputState::new(200, 100);
        let mut rotator = MouseRotator::new();

        input.set_cursor(0.0, 0.0);
        rotator.poll(&input);
        input.set_cursor(150.0, 80.0);
        rotator.poll(&input);
        assert_eq!((rotator.phi, rotator.theta), (0.0, 0.0));
    }

    #[test]
    fn mouse_theta_is_clamped() {
        let mut input = InputState::new(100, 100);
        let mut rotator = MouseRotator::new();

        input.set_left_button(true);
        rotator.poll(&input);
        input.set_cursor(0.0, 400.0);
        rotator.poll(&input);
        assert_eq!(rotator.theta, FRAC_PI_2);

        input.set_cursor(0.0, -400.0);
        rotator.poll(&input);
        assert_eq!(rotator.theta, -FRAC_PI_2);
    }
}
