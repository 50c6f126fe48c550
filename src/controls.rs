//! Mouse orbit controls.
//!
//! Drag deltas accumulate between frames; [`OrbitControls::update`] applies
//! them to the camera in spherical coordinates around the target and aims the
//! camera at the target. Without pending input the camera keeps its position,
//! so positions written by the scroll handler survive the per-frame update.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::camera::Camera;

const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn has_pending_input(&self) -> bool {
        self.theta_delta != 0.0 || self.phi_delta != 0.0 || self.pan_offset != Vec3::ZERO
    }

    /// Queue an orbit from a drag of `dx`, `dy` pixels. A drag across the
    /// full viewport height turns a full circle.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        self.theta_delta -= TAU * dx / viewport_height * self.rotate_speed;
        self.phi_delta -= TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Queue a screen-space pan so the point under the cursor follows it
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &Camera, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        let distance = (camera.position - self.target).length();
        let visible_half_height = distance * (camera.fov.to_radians() * 0.5).tan();
        let scale = 2.0 * visible_half_height / viewport_height * self.pan_speed;

        self.pan_offset += camera.right() * (-dx * scale) + camera.up() * (dy * scale);
    }

    /// Apply queued input to the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let moved = self.has_pending_input();

        let offset = camera.position - self.target;
        let radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, 0.0)
        };

        theta += self.theta_delta;
        phi = (phi + self.phi_delta)
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        self.target += self.pan_offset;

        if moved {
            let ring = radius * phi.sin();
            let offset = Vec3::new(ring * theta.sin(), radius * phi.cos(), ring * theta.cos());
            camera.position = self.target + offset;
        }
        camera.look_at(self.target);

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_offset = Vec3::ZERO;

        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera_at(position: Vec3) -> Camera {
        let mut camera = Camera::from_config(&CameraConfig::default(), 800, 600);
        camera.position = position;
        camera
    }

    #[test]
    fn test_update_without_input_keeps_position() {
        let mut controls = OrbitControls::default();
        let position = Vec3::new(0.2, 0.2, 10.0);
        let mut camera = camera_at(position);

        assert!(!controls.update(&mut camera));
        assert_eq!(camera.position, position);
        let expected = (-position).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn test_update_at_target_is_stable() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(Vec3::ZERO);
        controls.update(&mut camera);
        assert_eq!(camera.position, Vec3::ZERO);
        assert!(camera.forward().is_finite());
    }

    #[test]
    fn test_rotate_preserves_distance() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 30.0));

        controls.rotate(150.0, 0.0, 600.0);
        assert!(controls.update(&mut camera));

        assert!((camera.position.length() - 30.0).abs() < 1e-3);
        // Quarter of a turn to the left around +Y
        assert!((camera.position - Vec3::new(-30.0, 0.0, 0.0)).length() < 1e-2);
    }

    #[test]
    fn test_input_is_consumed_by_update() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 30.0));
        controls.rotate(10.0, 10.0, 600.0);
        assert!(controls.has_pending_input());

        controls.update(&mut camera);
        assert!(!controls.has_pending_input());

        let after_first = camera.position;
        controls.update(&mut camera);
        assert!((camera.position - after_first).length() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 30.0));

        // Drag far past the top pole
        controls.rotate(0.0, 10_000.0, 600.0);
        controls.update(&mut camera);

        assert!(camera.position.is_finite());
        assert!((camera.position.length() - 30.0).abs() < 1e-2);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::default();
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 30.0));
        camera.look_at(Vec3::ZERO);

        controls.pan(100.0, 0.0, &camera, 600.0);
        controls.update(&mut camera);

        assert!(controls.target.x < 0.0);
        let offset = camera.position - controls.target;
        assert!((offset - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-3);
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let mut controls = OrbitControls::default();
        controls.enabled = false;
        controls.rotate(100.0, 100.0, 600.0);
        assert!(!controls.has_pending_input());
    }
}
