pub mod camera;
pub mod cli;
pub mod config;
pub mod context;
pub mod controls;
pub mod core;
pub mod frame;
pub mod geometry;
pub mod loaders;
pub mod material;
pub mod math;
pub mod render_loop;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod scroll;
pub mod transform;
pub mod types;
pub mod window;

pub use context::{SceneContext, SceneHandles};
pub use render_loop::{LoopState, RenderLoop};
pub use scenes::create_space_scene;
