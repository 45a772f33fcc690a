//! Spectral frames and the sources that produce them

/// Largest magnitude a bin can hold
pub const MAX_MAGNITUDE: u8 = u8::MAX;

/// One tick worth of frequency-domain magnitudes (one byte per bin)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpectralFrame {
    bins: Vec<u8>,
}

impl SpectralFrame {
    /// Create a frame from raw byte magnitudes
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    /// Create an all-zero frame with `len` bins
    pub fn silent(len: usize) -> Self {
        Self { bins: vec![0; len] }
    }

    /// Build a frame from normalized levels (0.0 - 1.0)
    ///
    /// Levels that are not finite or fall outside 0..=1 carry no energy.
    pub fn from_levels(levels: &[f32]) -> Self {
        let bins = levels
            .iter()
            .map(|&level| {
                if level.is_finite() && (0.0..=1.0).contains(&level) {
                    (level * MAX_MAGNITUDE as f32).round() as u8
                } else {
                    0
                }
            })
            .collect();
        Self { bins }
    }

    /// Raw byte magnitudes
    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Mutable access for producers that refill a frame in place
    pub fn bins_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Normalized magnitude (0.0 - 1.0) of bin `index`; missing bins are zero
    #[inline]
    pub fn level(&self, index: usize) -> f32 {
        self.bins
            .get(index)
            .map(|&b| b as f32 / MAX_MAGNITUDE as f32)
            .unwrap_or(0.0)
    }
}

/// Periodic, non-blocking supplier of spectral frames
///
/// Called once per simulation tick. `None` means the source is not ready
/// (no track loaded, playback paused, device missing) and the detector
/// should let its signals settle.
pub trait SpectralFrameSource {
    /// Sample rate of the audio the frames were computed from
    fn sample_rate(&self) -> u32;

    /// Latest available frame, or `None` when unavailable
    fn read_frame(&mut self) -> Option<&SpectralFrame>;
}

/// A source that never has audio
#[derive(Debug, Clone, Copy)]
pub struct SilentSource {
    sample_rate: u32,
}

impl SilentSource {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Default for SilentSource {
    fn default() -> Self {
        Self::new(48000)
    }
}

impl SpectralFrameSource for SilentSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_frame(&mut self) -> Option<&SpectralFrame> {
        None
    }
}
