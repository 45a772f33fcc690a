//! Audio playback for HWT
//!
//! - Loader: decode a file to interleaved stereo at the device rate
//! - Playback: looping single-track transport
//! - Engine: command/event plumbing around the output callback
//! - Tap: lock-free hand-off of played samples to the spectral analyser

mod engine;
mod loader;
mod playback;
mod tap;

pub use engine::{AudioCommand, AudioEngine, AudioEvent, EngineState, TransportState, DEFAULT_VOLUME};
pub use loader::{LoadError, LoadedTrack, TrackLoader};
pub use playback::{Playback, PlaybackState};
pub use tap::{analysis_tap, AnalyserSource, TapWriter, TAP_CAPACITY};
