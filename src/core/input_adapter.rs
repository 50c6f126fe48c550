use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Pixels per wheel line
    line_height: f32,
}

impl WinitController {
    pub fn new(line_height: f32) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_position: None,
            mouse_delta: (0.0, 0.0),
            line_height,
        }
    }

    /// Process a Winit WindowEvent and update internal state.
    /// Returns the vertical scroll in pixels for wheel events.
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<f32> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                    self.set_button(Button::Escape, event.state);
                }
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_button(btn, *state);
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if let Some(old_pos) = self.mouse_position {
                    self.mouse_delta.0 += new_pos.0 - old_pos.0;
                    self.mouse_delta.1 += new_pos.1 - old_pos.1;
                }
                self.mouse_position = Some(new_pos);
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => Some(scroll_delta_px(delta, self.line_height)),
            _ => None,
        }
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    /// Reset per-frame state (mouse delta)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }

    /// Get accumulated mouse delta since last reset
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            MouseButton::Middle => Some(Button::MouseMiddle),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new(crate::config::ScrollConfig::default().line_height)
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}

/// Vertical wheel motion in pixels; positive scrolls toward the top
pub fn scroll_delta_px(delta: &MouseScrollDelta, line_height: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y * line_height,
        MouseScrollDelta::PixelDelta(position) => position.y as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    // Note: Winit event construction requires internal fields that are not publicly accessible
    // These tests verify the Controller trait implementation and the wheel conversion

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new(40.0);
        assert!(!controller.is_down(Button::MouseLeft));
        assert!(controller.pressed_keys.is_empty());
        assert_eq!(controller.mouse_position, None);
        assert_eq!(controller.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn test_button_press_and_release() {
        let mut controller = WinitController::default();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        assert!(controller.is_down(Button::MouseLeft));
        assert_eq!(controller.pressed_keys.len(), 1);

        controller.set_button(Button::MouseLeft, ElementState::Released);
        assert!(!controller.is_down(Button::MouseLeft));
        assert!(controller.pressed_keys.is_empty());
    }

    #[test]
    fn test_pan_buttons_are_mapped() {
        assert_eq!(
            WinitController::mouse_button_to_button(MouseButton::Middle),
            Some(Button::MouseMiddle)
        );
        assert_eq!(
            WinitController::mouse_button_to_button(MouseButton::Right),
            Some(Button::MouseRight)
        );
        assert_eq!(WinitController::mouse_button_to_button(MouseButton::Back), None);
    }

    #[test]
    fn test_middle_drag_counts_as_pan() {
        let mut controller = WinitController::default();
        controller.set_button(Button::MouseMiddle, ElementState::Pressed);
        assert!(controller.any_down(&[Button::MouseRight, Button::MouseMiddle]));
        controller.set_button(Button::MouseMiddle, ElementState::Released);
        assert!(!controller.any_down(&[Button::MouseRight, Button::MouseMiddle]));
    }

    #[test]
    fn test_delta_reset() {
        let mut controller = WinitController::default();
        controller.mouse_delta = (10.0, 5.0);
        controller.mouse_position = Some((100.0, 200.0));

        controller.reset_deltas();
        assert_eq!(controller.mouse_delta(), (0.0, 0.0));
        // Position should remain
        assert_eq!(controller.mouse_position, Some((100.0, 200.0)));
    }

    #[test]
    fn test_line_delta_scales_by_line_height() {
        let down_three_lines = MouseScrollDelta::LineDelta(0.0, -3.0);
        assert_eq!(scroll_delta_px(&down_three_lines, 40.0), -120.0);
    }

    #[test]
    fn test_pixel_delta_is_used_as_is() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.5));
        assert_eq!(scroll_delta_px(&delta, 40.0), 12.5);
    }
}
