//! Audio analysis module for HWT
//!
//! Turns streaming PCM into byte spectral frames and derives the
//! bass/beat signals that drive the boiler room visuals.

mod beat;
mod frame;
mod spectrum;

pub use beat::{BeatDetector, BeatSignal, DetectorConfig};
pub use frame::{SilentSource, SpectralFrame, SpectralFrameSource, MAX_MAGNITUDE};
pub use spectrum::{Analyser, FFT_SIZE, FREQUENCY_BIN_COUNT};

/// Linear interpolation from `a` toward `b` by factor `t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
