//! Boolean world switches flipped by interactables

use crate::layout::TORCH_COUNT;

/// All runtime switches of the boiler room
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggles {
    pub steam_enabled: bool,
    pub gate_open: bool,
    pub overhead_lights: bool,
    pub alarm_enabled: bool,
    pub console_armed: bool,
    pub torches_lit: [bool; TORCH_COUNT],
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            steam_enabled: false,
            gate_open: false,
            overhead_lights: true,
            alarm_enabled: false,
            console_armed: false,
            torches_lit: [true; TORCH_COUNT],
        }
    }
}

impl Toggles {
    pub fn torch_lit(&self, index: usize) -> bool {
        self.torches_lit.get(index).copied().unwrap_or(false)
    }
}
