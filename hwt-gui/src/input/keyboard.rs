use egui::{InputState, Key};

use hwt_world::{MoveIntent, TickInput};

use crate::input::UiCommand;
use crate::state::GuiState;

/// Volume change per key press
pub const VOLUME_STEP: f32 = 0.05;

/// Keys sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held state; the edge is derived against the previous frame
    pub interact: bool,
    pub toggle_playback: bool,
    pub toggle_debug: bool,
    pub volume_up: bool,
    pub volume_down: bool,
    pub quit: bool,
}

impl KeySnapshot {
    pub fn capture(input: &InputState) -> Self {
        Self {
            up: input.key_down(Key::W),
            down: input.key_down(Key::S),
            left: input.key_down(Key::A),
            right: input.key_down(Key::D),
            interact: input.key_down(Key::E),
            toggle_playback: input.key_pressed(Key::Space),
            toggle_debug: input.key_pressed(Key::F3),
            volume_up: input.key_pressed(Key::Plus) || input.key_pressed(Key::Equals),
            volume_down: input.key_pressed(Key::Minus),
            quit: input.modifiers.command && input.key_pressed(Key::Q),
        }
    }
}

/// Turn this frame's keys into simulation input and UI commands
pub fn map_keys(keys: &KeySnapshot, state: &mut GuiState) -> (TickInput, Vec<UiCommand>) {
    let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
    let intent = MoveIntent::new(axis(keys.left, keys.right), axis(keys.up, keys.down));

    let interact = keys.interact && !state.interact_held;
    state.interact_held = keys.interact;

    let mut commands = Vec::new();
    if keys.quit {
        commands.push(UiCommand::Quit);
        return (TickInput { intent, interact }, commands);
    }
    if keys.toggle_playback {
        commands.push(UiCommand::SetPlaying(!state.is_playing()));
    }
    if keys.toggle_debug {
        commands.push(UiCommand::ToggleDebug);
    }
    if keys.volume_up {
        commands.push(UiCommand::SetVolume((state.volume + VOLUME_STEP).min(1.0)));
    }
    if keys.volume_down {
        commands.push(UiCommand::SetVolume((state.volume - VOLUME_STEP).max(0.0)));
    }

    (TickInput { intent, interact }, commands)
}

/// Sample the keyboard and map it
pub fn handle_keyboard(ctx: &egui::Context, state: &mut GuiState) -> (TickInput, Vec<UiCommand>) {
    let keys = ctx.input(KeySnapshot::capture);
    map_keys(&keys, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasd_intent() {
        let mut state = GuiState::default();
        let keys = KeySnapshot {
            up: true,
            right: true,
            ..KeySnapshot::default()
        };
        let (input, commands) = map_keys(&keys, &mut state);
        assert_eq!(input.intent, MoveIntent::new(1.0, -1.0));
        assert!(commands.is_empty());

        // Opposite keys cancel
        let keys = KeySnapshot {
            left: true,
            right: true,
            ..KeySnapshot::default()
        };
        assert_eq!(map_keys(&keys, &mut state).0.intent, MoveIntent::new(0.0, 0.0));
    }

    #[test]
    fn test_interact_fires_on_press_only() {
        let mut state = GuiState::default();
        let held = KeySnapshot {
            interact: true,
            ..KeySnapshot::default()
        };
        assert!(map_keys(&held, &mut state).0.interact);
        assert!(!map_keys(&held, &mut state).0.interact);
        assert!(!map_keys(&KeySnapshot::default(), &mut state).0.interact);
        assert!(map_keys(&held, &mut state).0.interact);
    }

    #[test]
    fn test_space_toggles_playback() {
        let mut state = GuiState::default();
        let keys = KeySnapshot {
            toggle_playback: true,
            ..KeySnapshot::default()
        };
        let (_, commands) = map_keys(&keys, &mut state);
        assert_eq!(commands, vec![UiCommand::SetPlaying(true)]);
    }

    #[test]
    fn test_volume_keys_step_and_clamp() {
        let mut state = GuiState::default();
        state.volume = 0.98;
        let keys = KeySnapshot {
            volume_up: true,
            ..KeySnapshot::default()
        };
        assert_eq!(map_keys(&keys, &mut state).1, vec![UiCommand::SetVolume(1.0)]);

        state.volume = 0.5;
        let keys = KeySnapshot {
            volume_down: true,
            ..KeySnapshot::default()
        };
        match map_keys(&keys, &mut state).1.as_slice() {
            [UiCommand::SetVolume(v)] => assert!((v - 0.45).abs() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_quit_short_circuits() {
        let mut state = GuiState::default();
        let keys = KeySnapshot {
            quit: true,
            toggle_debug: true,
            ..KeySnapshot::default()
        };
        assert_eq!(map_keys(&keys, &mut state).1, vec![UiCommand::Quit]);
    }
}
