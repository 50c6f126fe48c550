//! Scroll-driven camera mapping.
//!
//! `top` is the document top measured from the viewport top: 0 at rest,
//! negative once the user scrolls down. The camera position is a pure
//! linear function of it, with no clamping.

use glam::Vec3;

use crate::context::SceneContext;

/// Camera Z per unit of `top`
pub const DEPTH_FACTOR: f32 = -0.01;
/// Camera X and Y per unit of `top`
pub const DRIFT_FACTOR: f32 = -0.0002;

/// Sphere spin per scroll event
pub const SPHERE_SPIN: Vec3 = Vec3::new(0.05, 0.075, 0.05);
/// Cube spin per scroll event
pub const CUBE_SPIN: Vec3 = Vec3::new(0.0, 0.01, 0.01);

pub fn camera_position_for_scroll(top: f32) -> Vec3 {
    Vec3::new(top * DRIFT_FACTOR, top * DRIFT_FACTOR, top * DEPTH_FACTOR)
}

/// Virtual document scroll offset fed by wheel events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    top: f32,
}

impl ScrollState {
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Apply a wheel delta in pixels (positive scrolls toward the top).
    /// The document cannot move below its own top edge. Returns the new
    /// offset, or `None` when the offset did not change.
    pub fn scroll_by(&mut self, delta_px: f32) -> Option<f32> {
        let top = (self.top + delta_px).min(0.0);
        if top == self.top {
            return None;
        }
        self.top = top;
        Some(top)
    }
}

/// Scroll handler: spin the sphere and cube, then place the camera for `top`
pub fn move_camera(ctx: &mut SceneContext, top: f32) {
    let sphere = ctx.handles.sphere;
    if let Some(mesh) = ctx.mesh_mut(sphere) {
        mesh.transform.rotate_by(SPHERE_SPIN);
    }

    let cube = ctx.handles.cube;
    if let Some(mesh) = ctx.mesh_mut(cube) {
        mesh.transform.rotate_by(CUBE_SPIN);
    }

    ctx.camera.position = camera_position_for_scroll(top);
}

/// Feed a wheel delta through the scroll state and run the handler.
/// Wheel input that leaves the offset where it was is ignored.
pub fn on_scroll(ctx: &mut SceneContext, delta_px: f32) -> Option<f32> {
    let top = ctx.scroll.scroll_by(delta_px)?;
    move_camera(ctx, top);
    log::trace!("Scrolled to {:.1}, camera at {:?}", top, ctx.camera.position);
    Some(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_state_starts_at_top() {
        assert_eq!(ScrollState::default().top(), 0.0);
    }

    #[test]
    fn test_scrolling_down_goes_negative() {
        let mut scroll = ScrollState::default();
        assert_eq!(scroll.scroll_by(-120.0), Some(-120.0));
        assert_eq!(scroll.scroll_by(-80.0), Some(-200.0));
        assert_eq!(scroll.scroll_by(50.0), Some(-150.0));
    }

    #[test]
    fn test_cannot_scroll_above_top() {
        let mut scroll = ScrollState::default();
        scroll.scroll_by(-40.0);
        assert_eq!(scroll.scroll_by(500.0), Some(0.0));
        assert_eq!(scroll.scroll_by(500.0), None);
        assert_eq!(scroll.top(), 0.0);
    }

    #[test]
    fn test_zero_delta_is_not_a_change() {
        let mut scroll = ScrollState::default();
        scroll.scroll_by(-60.0);
        assert_eq!(scroll.scroll_by(0.0), None);
        assert_eq!(scroll.top(), -60.0);
    }

    #[test]
    fn test_no_lower_bound() {
        let mut scroll = ScrollState::default();
        assert_eq!(scroll.scroll_by(-1.0e7), Some(-1.0e7));
    }

    #[test]
    fn test_rest_position_is_origin() {
        assert_eq!(camera_position_for_scroll(0.0), Vec3::ZERO);
    }
}
