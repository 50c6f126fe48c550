//! Explicit scene context handed to the frame and scroll handlers.

use std::sync::Arc;

use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::loaders::{PendingTexture, TextureLoader};
use crate::scene::{Mesh, ObjectId, Scene, TextureId, TextureStatus};
use crate::scroll::ScrollState;

/// Ids of the objects the handlers animate or inspect
#[derive(Debug, Clone)]
pub struct SceneHandles {
    pub ring: ObjectId,
    pub point_light: ObjectId,
    pub ambient_light: ObjectId,
    pub light_helper: ObjectId,
    pub grid_helper: ObjectId,
    pub stars: Vec<ObjectId>,
    pub cube: ObjectId,
    pub sphere: ObjectId,
}

pub struct SceneContext {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub scroll: ScrollState,
    pub handles: SceneHandles,
    pending: Vec<(TextureId, PendingTexture)>,
}

impl SceneContext {
    pub fn new(scene: Scene, camera: Camera, handles: SceneHandles) -> Self {
        Self {
            scene,
            camera,
            controls: OrbitControls::default(),
            scroll: ScrollState::default(),
            handles,
            pending: Vec::new(),
        }
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        self.scene.mesh_mut(id)
    }

    /// Start loading every texture slot that is still `Loading`
    pub fn request_textures(&mut self, loader: &TextureLoader) {
        let waiting: Vec<(TextureId, String)> = self
            .scene
            .textures()
            .filter(|(id, slot)| {
                matches!(slot.status, TextureStatus::Loading)
                    && !self.pending.iter().any(|(pending_id, _)| pending_id == id)
            })
            .map(|(id, slot)| (id, slot.name.clone()))
            .collect();

        for (id, name) in waiting {
            log::debug!("Requesting texture {}", name);
            self.pending.push((id, loader.load(&name)));
        }
    }

    pub fn has_pending_textures(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_texture_count(&self) -> usize {
        self.pending.len()
    }

    /// Move finished loads into the scene. Returns the textures that became
    /// ready; failures are logged and leave the slot untextured.
    pub fn poll_textures(&mut self) -> Vec<TextureId> {
        let mut ready = Vec::new();
        let mut resolved = Vec::new();

        for (index, (id, pending)) in self.pending.iter_mut().enumerate() {
            let Some(result) = pending.try_take() else {
                continue;
            };
            resolved.push(index);

            match result {
                Ok(data) => {
                    log::info!(
                        "Loaded texture {:?} ({}x{})",
                        pending.path(),
                        data.width,
                        data.height
                    );
                    self.scene.set_texture_status(*id, TextureStatus::Ready(Arc::new(data)));
                    ready.push(*id);
                }
                Err(e) => {
                    log::warn!("{}; rendering without it", e);
                    self.scene.set_texture_status(*id, TextureStatus::Failed(e.to_string()));
                }
            }
        }

        for index in resolved.into_iter().rev() {
            self.pending.swap_remove(index);
        }

        ready
    }

    /// Per-frame orbit-controls step
    pub fn update_controls(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }
}
