mod color;
mod random;

pub use color::{hex_to_linear_rgb, hex_to_rgb, srgb_to_linear};
pub use random::rand_float_spread;
