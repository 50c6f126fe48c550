mod texture;

pub use texture::{load_texture_file, PendingTexture, TextureData, TextureError, TextureLoader};
