//! Window for HWT: keyboard in, presented frame and overlays out

mod app;
mod config;
mod state;
mod theme;
pub mod input;
pub mod widgets;

pub use app::HwtApp;
pub use config::{Config, ConfigError};
pub use state::{GuiState, MessageType};
pub use theme::BoilerTheme;
