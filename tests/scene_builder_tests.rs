use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scroll_scene::config::SceneConfig;
use scroll_scene::scene::SceneObject;
use scroll_scene::scenes::{create_space_scene, star_positions};
use scroll_scene::SceneContext;

fn build(seed: u64) -> SceneContext {
    let mut rng = StdRng::seed_from_u64(seed);
    create_space_scene(&SceneConfig::default(), &mut rng, 1280, 720)
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn test_scene_has_207_objects() {
        let ctx = build(1);
        // ring + 200 stars + cube + sphere + 2 lights + 2 helpers
        assert_eq!(ctx.scene.len(), 207);
    }

    #[test]
    fn test_object_kinds() {
        let ctx = build(1);
        let mut meshes = 0;
        let mut lights = 0;
        let mut helpers = 0;
        for (_, object) in ctx.scene.objects() {
            match object {
                SceneObject::Mesh(_) => meshes += 1,
                SceneObject::PointLight(_) | SceneObject::AmbientLight(_) => lights += 1,
                SceneObject::Helper(_) => helpers += 1,
            }
        }
        assert_eq!(meshes, 203);
        assert_eq!(lights, 2);
        assert_eq!(helpers, 2);
    }

    #[test]
    fn test_exactly_200_stars_in_bounds() {
        let ctx = build(99);
        assert_eq!(ctx.handles.stars.len(), 200);
        for &id in &ctx.handles.stars {
            let Some(star) = ctx.scene.mesh(id) else {
                panic!("star {:?} is not a mesh", id);
            };
            let p = star.transform.position;
            for c in [p.x, p.y, p.z] {
                assert!((-50.0..=50.0).contains(&c), "coordinate {} out of range", c);
            }
        }
    }

    #[test]
    fn test_star_bounds_over_many_seeds() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for p in star_positions(&mut rng, 200, 100.0) {
                assert!(p.abs().max_element() <= 50.0);
            }
        }
    }

    #[test]
    fn test_stars_are_spread_out() {
        let mut rng = StdRng::seed_from_u64(5);
        let stars = star_positions(&mut rng, 200, 100.0);
        let mean = stars.iter().copied().sum::<Vec3>() / stars.len() as f32;
        // Uniform over [-50, 50]: the mean stays near the origin
        assert!(mean.abs().max_element() < 10.0, "mean {:?}", mean);
        assert!(stars.iter().any(|p| p.x > 25.0));
        assert!(stars.iter().any(|p| p.x < -25.0));
    }

    #[test]
    fn test_ring_at_origin_unrotated() {
        let ctx = build(1);
        let ring = ctx.scene.mesh(ctx.handles.ring).map(|m| m.transform);
        assert_eq!(ring.map(|t| t.position), Some(Vec3::ZERO));
        assert_eq!(ring.map(|t| t.rotation), Some(Vec3::ZERO));
    }

    #[test]
    fn test_point_light() {
        let ctx = build(1);
        let Some(light) = ctx.scene.point_light() else {
            panic!("no point light");
        };
        assert_eq!(light.position, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(light.intensity, 1000.0);
        assert_eq!(ctx.scene.ambient(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_config_overrides_star_count() {
        let config = SceneConfig::from_json(r#"{ "stars": { "count": 10 } }"#)
            .unwrap_or_else(|e| panic!("{e:#}"));
        let mut rng = StdRng::seed_from_u64(1);
        let ctx = create_space_scene(&config, &mut rng, 800, 600);
        assert_eq!(ctx.handles.stars.len(), 10);
        assert_eq!(ctx.scene.len(), 17);
    }
}
