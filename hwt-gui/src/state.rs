use hwt_audio::{AudioEvent, PlaybackState, TransportState};
use hwt_world::WorldEvent;
use tracing::{debug, warn};

use crate::config::Config;

pub const READY_MESSAGE: &str = "Ready. Press Play (or Space) to start the beat-reactive boiler room.";
pub const PLAYING_MESSAGE: &str = "Playing. (WASD to move, E to interact)";
pub const PAUSED_MESSAGE: &str = "Paused.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the window shows besides the rendered frame
#[derive(Debug, Clone)]
pub struct GuiState {
    pub transport: TransportState,
    /// A decoded track sits in the audio engine
    pub audio_ready: bool,
    /// Play was pressed before the track finished loading
    pub play_pending: bool,
    /// Volume slider position, 0.0 - 1.0
    pub volume: f32,

    pub message: String,
    pub message_type: MessageType,
    /// Context prompt for the nearest fixture
    pub prompt: Option<&'static str>,
    pub show_debug: bool,
    pub debug_text: String,

    /// Interact key was down last frame (edge detection)
    pub interact_held: bool,
    pub should_quit: bool,
    pub frame_count: u64,
}

impl Default for GuiState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GuiState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            transport: TransportState {
                volume: config.volume,
                ..TransportState::default()
            },
            audio_ready: false,
            play_pending: false,
            volume: config.volume,
            message: READY_MESSAGE.to_string(),
            message_type: MessageType::Info,
            prompt: None,
            show_debug: config.debug,
            debug_text: String::new(),
            interact_held: false,
            should_quit: false,
            frame_count: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport.playback == PlaybackState::Playing
    }

    /// Fold an audio event into the visible state
    ///
    /// Returns true when a deferred play should now be sent.
    pub fn handle_audio_event(&mut self, event: AudioEvent) -> bool {
        match event {
            AudioEvent::Ready { sample_rate } => {
                debug!("Audio output running at {} Hz", sample_rate);
                false
            }
            AudioEvent::TrackLoaded { name, .. } => {
                self.audio_ready = true;
                self.set_success(format!("Loaded audio: {}", name));
                std::mem::take(&mut self.play_pending)
            }
            AudioEvent::StateUpdate(transport) => {
                self.transport = transport;
                false
            }
            AudioEvent::Error(err) => {
                warn!("Audio error: {}", err);
                self.audio_ready = false;
                self.play_pending = false;
                self.set_error(format!(
                    "Audio failed to load ({}). Put an .mp3 at assets/hot-water-tank.mp3 or pass a file path.",
                    err
                ));
                false
            }
        }
    }

    /// Record a play/pause request
    ///
    /// Returns true when the request can go to the engine right away.
    pub fn request_playing(&mut self, playing: bool) -> bool {
        if playing && !self.audio_ready {
            self.play_pending = true;
            self.set_warning("Loading audio...");
            return false;
        }
        self.play_pending = false;
        self.transport.playback = if playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        if playing {
            self.set_message(PLAYING_MESSAGE);
        } else {
            self.set_message(PAUSED_MESSAGE);
        }
        true
    }

    pub fn handle_world_event(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::Toggled { message, .. } => self.set_message(*message),
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.message_type = MessageType::Info;
    }

    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.message_type = MessageType::Success;
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.message_type = MessageType::Warning;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.message_type = MessageType::Error;
    }

    pub fn toggle_debug(&mut self) {
        self.show_debug = !self.show_debug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwt_world::Target;

    #[test]
    fn test_starts_ready() {
        let state = GuiState::default();
        assert_eq!(state.message, READY_MESSAGE);
        assert!(!state.audio_ready);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_play_before_load_is_deferred() {
        let mut state = GuiState::default();
        assert!(!state.request_playing(true));
        assert!(state.play_pending);
        assert_eq!(state.message_type, MessageType::Warning);

        let send_play = state.handle_audio_event(AudioEvent::TrackLoaded {
            name: "tank".into(),
            duration: 200.0,
        });
        assert!(send_play);
        assert!(!state.play_pending);
        assert_eq!(state.message, "Loaded audio: tank");
    }

    #[test]
    fn test_play_pause_messages() {
        let mut state = GuiState::default();
        state.handle_audio_event(AudioEvent::TrackLoaded {
            name: "tank".into(),
            duration: 1.0,
        });
        assert!(state.request_playing(true));
        assert_eq!(state.message, PLAYING_MESSAGE);
        assert!(state.is_playing());
        assert!(state.request_playing(false));
        assert_eq!(state.message, PAUSED_MESSAGE);
    }

    #[test]
    fn test_audio_error_clears_pending_play() {
        let mut state = GuiState::default();
        state.request_playing(true);
        let send_play = state.handle_audio_event(AudioEvent::Error("No such file".into()));
        assert!(!send_play);
        assert!(!state.play_pending);
        assert_eq!(state.message_type, MessageType::Error);
        assert!(state.message.contains("No such file"));
    }

    #[test]
    fn test_world_event_sets_status() {
        let mut state = GuiState::default();
        state.handle_world_event(&WorldEvent::Toggled {
            target: Target::Valve,
            message: "Valve opened: steam online.",
        });
        assert_eq!(state.message, "Valve opened: steam online.");
    }

    #[test]
    fn test_config_seeds_volume_and_debug() {
        let config = Config {
            volume: 0.3,
            debug: true,
            ..Config::default()
        };
        let state = GuiState::from_config(&config);
        assert_eq!(state.volume, 0.3);
        assert!(state.show_debug);
    }
}
