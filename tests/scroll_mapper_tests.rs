use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scroll_scene::config::SceneConfig;
use scroll_scene::scenes::create_space_scene;
use scroll_scene::scroll::{camera_position_for_scroll, move_camera, on_scroll};
use scroll_scene::SceneContext;

fn build() -> SceneContext {
    let mut rng = StdRng::seed_from_u64(11);
    create_space_scene(&SceneConfig::default(), &mut rng, 1280, 720)
}

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[cfg(test)]
mod camera_mapping_tests {
    use super::*;

    #[test]
    fn test_linear_mapping() {
        for d in [0.0_f32, -100.0, -500.0, -1000.0] {
            let expected = Vec3::new(-0.0002 * d, -0.0002 * d, -0.01 * d);
            assert_close(camera_position_for_scroll(d), expected);
        }
    }

    #[test]
    fn test_known_values() {
        assert_close(camera_position_for_scroll(-1000.0), Vec3::new(0.2, 0.2, 10.0));
        assert_close(camera_position_for_scroll(-500.0), Vec3::new(0.1, 0.1, 5.0));
    }

    #[test]
    fn test_extreme_offsets_are_not_clamped() {
        let p = camera_position_for_scroll(-1.0e6);
        assert_close(p, Vec3::new(200.0, 200.0, 10_000.0));
    }

    #[test]
    fn test_move_camera_sets_position() {
        let mut ctx = build();
        move_camera(&mut ctx, -500.0);
        assert_close(ctx.camera.position, Vec3::new(0.1, 0.1, 5.0));
    }
}

#[cfg(test)]
mod scroll_handler_tests {
    use super::*;

    fn rotations(ctx: &SceneContext) -> (Vec3, Vec3) {
        let sphere = ctx.scene.mesh(ctx.handles.sphere).map(|m| m.transform.rotation);
        let cube = ctx.scene.mesh(ctx.handles.cube).map(|m| m.transform.rotation);
        (sphere.unwrap_or(Vec3::NAN), cube.unwrap_or(Vec3::NAN))
    }

    #[test]
    fn test_each_call_spins_sphere_and_cube() {
        let mut ctx = build();
        move_camera(&mut ctx, -10.0);
        let (sphere, cube) = rotations(&ctx);
        assert_close(sphere, Vec3::new(0.05, 0.075, 0.05));
        assert_close(cube, Vec3::new(0.0, 0.01, 0.01));
    }

    #[test]
    fn test_spin_is_independent_of_scroll_magnitude() {
        let mut small = build();
        let mut large = build();
        for _ in 0..4 {
            move_camera(&mut small, -1.0);
            move_camera(&mut large, -100_000.0);
        }
        assert_eq!(rotations(&small), rotations(&large));
        let (sphere, cube) = rotations(&small);
        assert_close(sphere, Vec3::new(0.2, 0.3, 0.2));
        assert_close(cube, Vec3::new(0.0, 0.04, 0.04));
    }

    #[test]
    fn test_on_scroll_accumulates_wheel_deltas() {
        let mut ctx = build();
        on_scroll(&mut ctx, -300.0);
        on_scroll(&mut ctx, -200.0);
        assert_eq!(ctx.scroll.top(), -500.0);
        assert_close(ctx.camera.position, Vec3::new(0.1, 0.1, 5.0));
    }

    #[test]
    fn test_scrolling_back_to_top_returns_to_origin() {
        let mut ctx = build();
        on_scroll(&mut ctx, -800.0);
        on_scroll(&mut ctx, 5_000.0);
        assert_eq!(ctx.scroll.top(), 0.0);
        assert_close(ctx.camera.position, Vec3::ZERO);
    }

    #[test]
    fn test_scrolling_up_at_rest_does_nothing() {
        let mut ctx = build();
        for _ in 0..5 {
            assert_eq!(on_scroll(&mut ctx, 120.0), None);
        }
        assert_eq!(ctx.scroll.top(), 0.0);
        assert_close(ctx.camera.position, Vec3::new(0.0, 0.0, 30.0));
        assert_eq!(rotations(&ctx), (Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_only_offset_changes_run_the_handler() {
        let mut ctx = build();
        assert_eq!(on_scroll(&mut ctx, -100.0), Some(-100.0));
        assert_eq!(on_scroll(&mut ctx, 0.0), None);
        assert_eq!(on_scroll(&mut ctx, 400.0), Some(0.0));
        assert_eq!(on_scroll(&mut ctx, 400.0), None);

        let (sphere, cube) = rotations(&ctx);
        assert_close(sphere, Vec3::new(0.1, 0.15, 0.1));
        assert_close(cube, Vec3::new(0.0, 0.02, 0.02));
    }

    #[test]
    fn test_scroll_leaves_ring_alone() {
        let mut ctx = build();
        move_camera(&mut ctx, -100.0);
        let ring = ctx.scene.mesh(ctx.handles.ring).map(|m| m.transform.rotation);
        assert_eq!(ring, Some(Vec3::ZERO));
    }
}
