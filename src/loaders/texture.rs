//! Texture loading.
//!
//! Decoding runs on a worker thread per file. The result travels back over a
//! oneshot channel and is picked up on the main thread, so a missing or
//! corrupt image surfaces as a [`TextureError`] instead of silently
//! rendering untextured.

use futures::channel::oneshot;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("texture file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read texture '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The worker went away without sending a result
    #[error("texture load for '{0}' was abandoned")]
    Abandoned(PathBuf),
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Single-pixel texture
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Blocking load and decode of an image file into RGBA8
pub fn load_texture_file(path: impl AsRef<Path>) -> Result<TextureData, TextureError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TextureError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Decoded {:?}: {}x{}", path, width, height);

    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Resolves asset names against a base directory and loads them off-thread
#[derive(Debug, Clone)]
pub struct TextureLoader {
    base_dir: PathBuf,
}

impl TextureLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Start loading `name`; the returned handle yields the result once
    pub fn load(&self, name: &str) -> PendingTexture {
        let path = self.resolve(name);
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name(format!("texture:{}", name))
            .spawn(move || {
                let result = load_texture_file(&worker_path);
                // Receiver may be gone if the app already shut down
                sender.send(result).ok();
            });

        if let Err(e) = spawned {
            // The sender was dropped with the closure; the handle reports Abandoned
            log::warn!("Failed to spawn loader thread for {:?}: {}", path, e);
        }

        PendingTexture { path, receiver }
    }
}

/// In-flight texture load
#[derive(Debug)]
pub struct PendingTexture {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<TextureData, TextureError>>,
}

impl PendingTexture {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking poll; `None` while the worker is still decoding
    pub fn try_take(&mut self) -> Option<Result<TextureData, TextureError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(TextureError::Abandoned(self.path.clone()))),
        }
    }

    /// Wait for the result
    pub async fn wait(self) -> Result<TextureData, TextureError> {
        let path = self.path;
        self.receiver
            .await
            .unwrap_or_else(|_| Err(TextureError::Abandoned(path)))
    }
}
