pub mod controller;
pub mod fps;
pub mod input_adapter;

pub use controller::{Button, Controller};
pub use fps::FpsCounter;
pub use input_adapter::{scroll_delta_px, WinitController};
