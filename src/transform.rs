//! Object transforms.
//!
//! Rotation is stored as Euler angles in radians, applied in XYZ order,
//! so animation code can bump individual axes the way the scene's
//! update callbacks do (`rotation.x += 0.01`).

use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, XYZ order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Add per-axis angle increments to the rotation
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-world matrix (scale, then rotate, then translate)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Transform::new().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translation_moves_origin() {
        let t = Transform::at(Vec3::new(-10.0, 0.0, 30.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(-10.0, 0.0, 30.0));
    }

    #[test]
    fn test_rotate_by_accumulates() {
        let mut t = Transform::new();
        t.rotate_by(Vec3::new(0.05, 0.075, 0.05));
        t.rotate_by(Vec3::new(0.05, 0.075, 0.05));
        assert!((t.rotation - Vec3::new(0.1, 0.15, 0.1)).length() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_about_y() {
        let t = Transform::new().with_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_xyz_order_applies_z_first() {
        // Intrinsic XYZ: the Z rotation acts on the point before X
        let t = Transform::new().with_rotation(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let p = t.matrix().transform_point3(Vec3::X);
        // Z quarter turn: X -> Y, then X quarter turn: Y -> Z
        assert!((p - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let t = Transform::at(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));
    }
}
