//! Keyboard and mouse state accumulated from window events.

use std::collections::HashSet;

use glutin::event::{ElementState, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<VirtualKeyCode>,
    cursor: (f64, f64),
    left_button: bool,
    window_size: (u32, u32),
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
            ..Default::default()
        }
    }

    /// Folds one window event into the current state.
    pub fn handle_window_event(&mut self, event: &WindowEvent<'_>) {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => self.set_cursor(position.x, position.y),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.set_left_button(*state == ElementState::Pressed),
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            // Releases are not delivered to an unfocused window.
            WindowEvent::Focused(false) => {
                self.pressed.clear();
                self.left_button = false;
            }
            _ => {}
        }
    }

    pub fn set_key(&mut self, key: VirtualKeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    pub fn set_left_button(&mut self, pressed: bool) {
        self.left_button = pressed;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn left_button(&self) -> bool {
        self.left_button
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }
}

/// True for events that end the frame loop: closing the window or pressing
/// Escape.
pub fn requests_exit(event: &WindowEvent<'_>) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                input: KeyboardInput {
                    state: ElementState::Pressed,
                    virtual_keycode: Some(VirtualKeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glutin::dpi::PhysicalSize;
    use glutin::event::{DeviceId, ModifiersState};

    fn key_event(key: VirtualKeyCode, state: ElementState) -> WindowEvent<'static> {
        #[allow(deprecated)]
        let input = KeyboardInput {
            scancode: 0,
            state,
            virtual_keycode: Some(key),
            modifiers: ModifiersState::empty(),
        };
        WindowEvent::KeyboardInput {
            device_id: unsafe { DeviceId::dummy() },
            input,
            is_synthetic: false,
        }
    }

    #[test]
    fn tracks_key_presses_and_releases() {
        let mut input = InputState::new(640, 480);
        input.set_key(VirtualKeyCode::Left, true);
        input.set_key(VirtualKeyCode::Up, true);
        input.set_key(VirtualKeyCode::Left, false);

        assert!(!input.is_pressed(VirtualKeyCode::Left));
        assert!(input.is_pressed(VirtualKeyCode::Up));
        assert_eq!(input.window_size(), (640, 480));
    }

    #[test]
    fn losing_focus_releases_everything() {
        let mut input = InputState::new(100, 100);
        input.set_key(VirtualKeyCode::Right, true);
        input.set_left_button(true);

        input.handle_window_event(&WindowEvent::Focused(false));
        assert!(!input.is_pressed(VirtualKeyCode::Right));
        assert!(!input.left_button());
    }

    #[test]
    fn resize_updates_window_size() {
        let mut input = InputState::new(100, 100);
        input.handle_window_event(&WindowEvent::Resized(PhysicalSize::new(300, 200)));
        assert_eq!(input.window_size(), (300, 200));
    }

    #[test]
    fn key_events_update_pressed_set() {
        let mut input = InputState::new(100, 100);
        input.handle_window_event(&key_event(VirtualKeyCode::Down, ElementState::Pressed));
        assert!(input.is_pressed(VirtualKeyCode::Down));

        input.handle_window_event(&key_event(VirtualKeyCode::Down, ElementState::Released));
        assert!(!input.is_pressed(VirtualKeyCode::Down));
    }

    #[test]
    fn close_request_exits() {
        assert!(requests_exit(&WindowEvent::CloseRequested));
    }

    #[test]
    fn escape_press_exits() {
        assert!(requests_exit(&key_event(VirtualKeyCode::Escape, ElementState::Pressed)));
    }

    #[test]
    fn escape_release_does_not_exit() {
        assert!(!requests_exit(&key_event(VirtualKeyCode::Escape, ElementState::Released)));
    }

    #[test]
    fn other_keys_do_not_exit() {
        assert!(!requests_exit(&key_event(VirtualKeyCode::Left, ElementState::Pressed)));
        assert!(!requests_exit(&WindowEvent::Focused(false)));
    }
}
