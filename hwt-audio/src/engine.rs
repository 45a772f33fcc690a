//! Audio engine - transport commands, state events, output processing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, info};

use crate::playback::{Playback, PlaybackState};
use crate::tap::TapWriter;

/// Output gain before the user touches the volume control
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Largest callback buffer handled without reallocating
const MAX_BUFFER_SIZE: usize = 16384;

/// Commands sent to the audio engine
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Interleaved stereo samples, sample rate, display name
    Load(Arc<Vec<f32>>, u32, Option<String>),
    Play,
    Pause,
    Toggle,
    Stop,
    SetVolume(f32),
    AdjustVolume(f32),
    Shutdown,
}

/// Snapshot of the transport for the UI
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransportState {
    pub playback: PlaybackState,
    /// seconds
    pub position: f64,
    /// seconds
    pub duration: f64,
    pub volume: f32,
    pub track_name: Option<String>,
}

/// Events sent from the audio engine
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Output device is running at this rate
    Ready { sample_rate: u32 },
    TrackLoaded { name: String, duration: f64 },
    StateUpdate(TransportState),
    Error(String),
}

/// State owned by the output callback
pub struct EngineState {
    playback: Playback,
    volume: f32,
    sample_rate: u32,
    tap: Option<TapWriter>,
    /// Pre-allocated mono mixdown for the tap (avoids allocation in the callback)
    mono: Vec<f32>,
}

impl EngineState {
    pub fn new(sample_rate: u32, tap: Option<TapWriter>) -> Self {
        if let Some(tap) = &tap {
            tap.set_sample_rate(sample_rate);
        }
        Self {
            playback: Playback::new(),
            volume: DEFAULT_VOLUME,
            sample_rate,
            tap,
            mono: vec![0.0; MAX_BUFFER_SIZE / 2],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Process a command; returns an event worth forwarding, if any
    pub fn handle_command(&mut self, cmd: AudioCommand) -> Option<AudioEvent> {
        match cmd {
            AudioCommand::Load(samples, sample_rate, name) => {
                if sample_rate != self.sample_rate {
                    debug!(
                        "Track rate {} Hz differs from device rate {} Hz",
                        sample_rate, self.sample_rate
                    );
                }
                self.playback.load(samples, sample_rate, name);
                let loaded = self.playback.is_loaded();
                if let Some(tap) = &self.tap {
                    tap.set_loaded(loaded);
                }
                if !loaded {
                    return Some(AudioEvent::Error("Track contains no audio".into()));
                }
                let name = self.playback.track_name().unwrap_or("Unknown").to_string();
                info!("Track ready: {}", name);
                return Some(AudioEvent::TrackLoaded {
                    name,
                    duration: self.playback.duration(),
                });
            }
            AudioCommand::Play => self.playback.play(),
            AudioCommand::Pause => self.playback.pause(),
            AudioCommand::Toggle => self.playback.toggle(),
            AudioCommand::Stop => self.playback.stop(),
            AudioCommand::SetVolume(volume) => self.set_volume(volume),
            AudioCommand::AdjustVolume(delta) => self.set_volume(self.volume + delta),
            AudioCommand::Shutdown => {} // Handled at higher level
        }
        None
    }

    fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Generate current state for UI
    pub fn get_state(&self) -> AudioEvent {
        AudioEvent::StateUpdate(TransportState {
            playback: self.playback.state(),
            position: self.playback.position_secs(),
            duration: self.playback.duration(),
            volume: self.volume,
            track_name: self.playback.track_name().map(str::to_string),
        })
    }

    /// Process audio for an interleaved stereo output buffer
    ///
    /// The tap sees the signal before the volume stage, so turning the
    /// volume down never starves the visuals.
    pub fn process(&mut self, output: &mut [f32]) {
        self.playback.process(output);

        if let Some(tap) = &mut self.tap {
            let frames = output.len() / 2;
            if frames > self.mono.len() {
                self.mono.resize(frames, 0.0);
            }
            for (m, frame) in self.mono.iter_mut().zip(output.chunks_exact(2)) {
                *m = (frame[0] + frame[1]) * 0.5;
            }
            tap.push(&self.mono[..frames]);
        }

        if self.volume != 1.0 {
            for sample in output.iter_mut() {
                *sample *= self.volume;
            }
        }
    }
}

/// Handle to communicate with the audio engine
pub struct AudioEngine {
    /// Send commands to audio thread
    pub command_tx: Sender<AudioCommand>,
    /// Receive events from audio thread
    pub event_rx: Receiver<AudioEvent>,
    /// Shutdown flag
    shutdown: Arc<AtomicBool>,
}

impl AudioEngine {
    /// Create channels for engine communication
    pub fn create_channels() -> (
        Sender<AudioCommand>,
        Receiver<AudioCommand>,
        Sender<AudioEvent>,
        Receiver<AudioEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    /// Create a new engine handle
    pub fn new(command_tx: Sender<AudioCommand>, event_rx: Receiver<AudioEvent>) -> Self {
        Self {
            command_tx,
            event_rx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send a command to the audio engine
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    /// Pending events, oldest first, without blocking
    pub fn poll_events(&self) -> Vec<AudioEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.command_tx.try_send(AudioCommand::Shutdown);
    }
}
