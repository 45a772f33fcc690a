mod controls;
mod overlay;
mod viewport;

pub use controls::{draw_controls, draw_status};
pub use overlay::draw_overlays;
pub use viewport::GameView;
