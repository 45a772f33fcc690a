mod keyboard;

pub use keyboard::{handle_keyboard, map_keys, KeySnapshot, VOLUME_STEP};

/// Requests from the keyboard and the control bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    SetPlaying(bool),
    SetVolume(f32),
    ToggleDebug,
    Quit,
}
