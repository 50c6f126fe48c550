use glam::Vec3;
use rand::Rng;

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::context::{SceneContext, SceneHandles};
use crate::geometry::{LineGeometry, MeshGeometry};
use crate::material::Material;
use crate::math::{hex_to_linear_rgb, rand_float_spread};
use crate::scene::{AmbientLight, Helper, Mesh, PointLight, Scene, SceneObject, TextureKind};
use crate::transform::Transform;

const RING_COLOR: u32 = 0xff6347;
const STAR_COLOR: u32 = 0xffffff;
const LIGHT_COLOR: u32 = 0xffffff;

const POINT_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
const POINT_LIGHT_INTENSITY: f32 = 1000.0;
const AMBIENT_INTENSITY: f32 = 1.0;

const GRID_SIZE: f32 = 200.0;
const GRID_DIVISIONS: u32 = 50;
const GRID_CENTER_COLOR: u32 = 0x444444;
const GRID_LINE_COLOR: u32 = 0x888888;

const MOON_POSITION: Vec3 = Vec3::new(-10.0, 0.0, 30.0);

/// Uniformly scattered star positions inside a cube of side `spread`
pub fn star_positions<R: Rng + ?Sized>(rng: &mut R, count: usize, spread: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rand_float_spread(rng, spread),
                rand_float_spread(rng, spread),
                rand_float_spread(rng, spread),
            )
        })
        .collect()
}

/// Builds the space scene: torus ring, lights and helpers, a star field, the
/// textured cube and the normal-mapped moon.
///
/// Textures are registered as `Loading` slots; call
/// [`SceneContext::request_textures`] to start loading them.
pub fn create_space_scene<R: Rng + ?Sized>(
    config: &SceneConfig,
    rng: &mut R,
    width: u32,
    height: u32,
) -> SceneContext {
    let mut scene = Scene::new();
    let assets = &config.assets;

    let background = scene.add_texture(&assets.background, TextureKind::Color);
    scene.set_background(background);

    // Ring
    let torus = scene.add_geometry(MeshGeometry::torus(10.0, 3.0, 16, 100));
    let ring = scene.add_mesh(Mesh::new(torus, Material::standard(RING_COLOR)));

    // Lights
    let light_color = hex_to_linear_rgb(LIGHT_COLOR);
    let point_light = scene.add(SceneObject::PointLight(PointLight {
        position: POINT_LIGHT_POSITION,
        color: light_color,
        intensity: POINT_LIGHT_INTENSITY,
    }));
    let ambient_light = scene.add(SceneObject::AmbientLight(AmbientLight {
        color: light_color,
        intensity: AMBIENT_INTENSITY,
    }));

    // Helpers
    let light_helper = scene.add(SceneObject::Helper(Helper {
        lines: LineGeometry::light_marker(1.0, light_color),
        transform: Transform::at(POINT_LIGHT_POSITION),
    }));
    let grid_helper = scene.add(SceneObject::Helper(Helper {
        lines: LineGeometry::grid(GRID_SIZE, GRID_DIVISIONS, GRID_CENTER_COLOR, GRID_LINE_COLOR),
        transform: Transform::new(),
    }));

    // Stars share one geometry
    let star = scene.add_geometry(MeshGeometry::sphere(0.25, 24, 24));
    let stars = star_positions(rng, config.stars.count, config.stars.spread)
        .into_iter()
        .map(|position| scene.add_mesh(Mesh::new(star, Material::standard(STAR_COLOR)).at(position)))
        .collect();

    // Cube
    let cube_map = scene.add_texture(&assets.cube_map, TextureKind::Color);
    let cuboid = scene.add_geometry(MeshGeometry::cuboid(3.0, 3.0, 3.0));
    let cube = scene.add_mesh(Mesh::new(cuboid, Material::basic_textured(cube_map)));

    // Moon
    let moon_map = scene.add_texture(&assets.sphere_map, TextureKind::Color);
    let moon_normal = scene.add_texture(&assets.sphere_normal_map, TextureKind::Normal);
    let mut moon_geometry = MeshGeometry::sphere(3.0, 32, 32);
    moon_geometry.compute_tangents();
    let moon_geometry = scene.add_geometry(moon_geometry);
    let sphere = scene.add_mesh(
        Mesh::new(moon_geometry, Material::standard_textured(moon_map, Some(moon_normal)))
            .at(MOON_POSITION),
    );

    log::info!(
        "Built space scene: {} objects, {} geometries",
        scene.len(),
        scene.geometries().len()
    );

    let camera = Camera::from_config(&config.camera, width, height);
    let handles = SceneHandles {
        ring,
        point_light,
        ambient_light,
        light_helper,
        grid_helper,
        stars,
        cube,
        sphere,
    };

    SceneContext::new(scene, camera, handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build() -> SceneContext {
        let mut rng = StdRng::seed_from_u64(7);
        create_space_scene(&SceneConfig::default(), &mut rng, 1280, 720)
    }

    #[test]
    fn test_star_positions_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let stars = star_positions(&mut rng, 200, 100.0);
        assert_eq!(stars.len(), 200);
        for star in stars {
            assert!(star.abs().max_element() <= 50.0, "{:?}", star);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = star_positions(&mut StdRng::seed_from_u64(3), 10, 100.0);
        let b = star_positions(&mut StdRng::seed_from_u64(3), 10, 100.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_insertion_order() {
        let ctx = build();
        let h = &ctx.handles;
        assert_eq!(h.ring.0, 0);
        assert_eq!(h.point_light.0, 1);
        assert_eq!(h.ambient_light.0, 2);
        assert_eq!(h.light_helper.0, 3);
        assert_eq!(h.grid_helper.0, 4);
        assert_eq!(h.stars.first().map(|s| s.0), Some(5));
        assert_eq!(h.stars.last().map(|s| s.0), Some(204));
        assert_eq!(h.cube.0, 205);
        assert_eq!(h.sphere.0, 206);
    }

    #[test]
    fn test_moon_placement_and_material() {
        let ctx = build();
        let moon = ctx.scene.mesh(ctx.handles.sphere).map(|m| (m.transform.position, m.material));
        let Some((position, material)) = moon else {
            panic!("moon is not a mesh");
        };
        assert_eq!(position, MOON_POSITION);
        assert!(material.is_lit());
        assert!(material.map().is_some());
        assert!(material.normal_map().is_some());
    }

    #[test]
    fn test_cube_is_unlit() {
        let ctx = build();
        let cube = ctx.scene.mesh(ctx.handles.cube).map(|m| m.material);
        assert!(matches!(cube, Some(m) if !m.is_lit() && m.map().is_some()));
    }

    #[test]
    fn test_camera_starts_at_initial_z() {
        let ctx = build();
        assert_eq!(ctx.camera.position, Vec3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_four_texture_slots() {
        let ctx = build();
        let kinds: Vec<TextureKind> = ctx.scene.textures().map(|(_, slot)| slot.kind).collect();
        assert_eq!(
            kinds,
            vec![TextureKind::Color, TextureKind::Color, TextureKind::Color, TextureKind::Normal]
        );
        assert!(ctx.scene.background().is_some());
    }
}
