//! Scene container: an ordered list of renderable objects plus the shared
//! geometry and texture tables they refer to.

use glam::Vec3;
use std::sync::Arc;

use crate::geometry::{LineGeometry, MeshGeometry};
use crate::loaders::TextureData;
use crate::material::Material;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// How texels are interpreted on the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// sRGB-encoded color
    Color,
    /// Linear tangent-space normals
    Normal,
}

#[derive(Debug, Clone)]
pub enum TextureStatus {
    Loading,
    Ready(Arc<TextureData>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TextureSlot {
    pub name: String,
    pub kind: TextureKind,
    pub status: TextureStatus,
}

impl TextureSlot {
    pub fn data(&self) -> Option<&Arc<TextureData>> {
        match &self.status {
            TextureStatus::Ready(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    pub fn new(geometry: GeometryId, material: Material) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::new(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Non-shaded line overlay (grid, light marker)
#[derive(Debug, Clone)]
pub struct Helper {
    pub lines: LineGeometry,
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub enum SceneObject {
    Mesh(Mesh),
    PointLight(PointLight),
    AmbientLight(AmbientLight),
    Helper(Helper),
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    geometries: Vec<MeshGeometry>,
    textures: Vec<TextureSlot>,
    background: Option<TextureId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> ObjectId {
        self.add(SceneObject::Mesh(mesh))
    }

    pub fn add_geometry(&mut self, geometry: MeshGeometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    /// Register a texture slot; it stays `Loading` until a result is stored
    pub fn add_texture(&mut self, name: impl Into<String>, kind: TextureKind) -> TextureId {
        self.textures.push(TextureSlot {
            name: name.into(),
            kind,
            status: TextureStatus::Loading,
        });
        TextureId(self.textures.len() - 1)
    }

    pub fn set_texture_status(&mut self, id: TextureId, status: TextureStatus) {
        if let Some(slot) = self.textures.get_mut(id.0) {
            slot.status = status;
        }
    }

    pub fn set_background(&mut self, texture: TextureId) {
        self.background = Some(texture);
    }

    pub fn background(&self) -> Option<TextureId> {
        self.background
    }

    /// Number of objects, lights and helpers included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        match self.objects.get(id.0) {
            Some(SceneObject::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        match self.objects.get_mut(id.0) {
            Some(SceneObject::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn meshes(&self) -> impl Iterator<Item = (ObjectId, &Mesh)> {
        self.objects().filter_map(|(id, o)| match o {
            SceneObject::Mesh(mesh) => Some((id, mesh)),
            _ => None,
        })
    }

    pub fn helpers(&self) -> impl Iterator<Item = (ObjectId, &Helper)> {
        self.objects().filter_map(|(id, o)| match o {
            SceneObject::Helper(helper) => Some((id, helper)),
            _ => None,
        })
    }

    /// First point light in insertion order
    pub fn point_light(&self) -> Option<&PointLight> {
        self.objects.iter().find_map(|o| match o {
            SceneObject::PointLight(light) => Some(light),
            _ => None,
        })
    }

    /// Sum of all ambient lights, pre-multiplied by intensity
    pub fn ambient(&self) -> [f32; 3] {
        self.objects.iter().fold([0.0; 3], |acc, o| match o {
            SceneObject::AmbientLight(light) => [
                acc[0] + light.color[0] * light.intensity,
                acc[1] + light.color[1] * light.intensity,
                acc[2] + light.color[2] * light.intensity,
            ],
            _ => acc,
        })
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&MeshGeometry> {
        self.geometries.get(id.0)
    }

    pub fn geometries(&self) -> &[MeshGeometry] {
        &self.geometries
    }

    pub fn texture(&self, id: TextureId) -> Option<&TextureSlot> {
        self.textures.get(id.0)
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &TextureSlot)> {
        self.textures.iter().enumerate().map(|(i, t)| (TextureId(i), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_light() -> PointLight {
        PointLight {
            position: Vec3::splat(5.0),
            color: [1.0; 3],
            intensity: 1000.0,
        }
    }

    #[test]
    fn test_add_returns_sequential_ids() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(MeshGeometry::cuboid(1.0, 1.0, 1.0));
        let a = scene.add_mesh(Mesh::new(geometry, Material::standard(0xffffff)));
        let b = scene.add(SceneObject::PointLight(white_light()));
        assert_eq!(a, ObjectId(0));
        assert_eq!(b, ObjectId(1));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_mesh_lookup_rejects_non_meshes() {
        let mut scene = Scene::new();
        let light = scene.add(SceneObject::PointLight(white_light()));
        assert!(scene.mesh(light).is_none());
        assert!(scene.mesh_mut(ObjectId(99)).is_none());
    }

    #[test]
    fn test_mesh_mut_updates_transform() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(MeshGeometry::cuboid(1.0, 1.0, 1.0));
        let id = scene.add_mesh(Mesh::new(geometry, Material::standard(0xffffff)));

        if let Some(mesh) = scene.mesh_mut(id) {
            mesh.transform.rotation.y += 0.01;
        }
        assert_eq!(scene.mesh(id).map(|m| m.transform.rotation.y), Some(0.01));
    }

    #[test]
    fn test_ambient_sums_lights() {
        let mut scene = Scene::new();
        scene.add(SceneObject::AmbientLight(AmbientLight {
            color: [1.0, 0.5, 0.0],
            intensity: 1.0,
        }));
        scene.add(SceneObject::AmbientLight(AmbientLight {
            color: [1.0, 1.0, 1.0],
            intensity: 0.5,
        }));
        assert_eq!(scene.ambient(), [1.5, 1.0, 0.5]);
    }

    #[test]
    fn test_texture_slots_start_loading() {
        let mut scene = Scene::new();
        let id = scene.add_texture("moon.jpg", TextureKind::Color);
        let slot = scene.texture(id).map(|s| s.status.clone());
        assert!(matches!(slot, Some(TextureStatus::Loading)));

        scene.set_texture_status(id, TextureStatus::Failed("missing".into()));
        assert!(matches!(
            scene.texture(id).map(|s| &s.status),
            Some(TextureStatus::Failed(_))
        ));
        assert!(scene.texture(id).and_then(|s| s.data()).is_none());
    }
}
