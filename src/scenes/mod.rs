mod space;

pub use space::{create_space_scene, star_positions};
