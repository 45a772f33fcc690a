//! Adaptive bass beat detection
//!
//! A fast follower smooths the bass band energy, a slow follower tracks the
//! long-run loudness, and a beat fires when the fast follower jumps clearly
//! above the slow one. The slow follower runs an order of magnitude slower
//! so it tracks the song, not individual kicks.

use tracing::trace;

use crate::frame::SpectralFrame;
use crate::lerp;

/// Tuning for [`BeatDetector`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Lower edge of the bass band (Hz)
    pub band_low_hz: f32,
    /// Upper edge of the bass band (Hz)
    pub band_high_hz: f32,
    /// Per-tick lerp factor of the fast follower
    pub smoothing: f32,
    /// Per-tick lerp factor of the running average
    pub average_rate: f32,
    /// Starting value of the running average
    pub initial_average: f32,
    /// Smoothed bass must exceed `average * onset_ratio`
    pub onset_ratio: f32,
    /// Smoothed bass below this never fires
    pub silence_floor: f32,
    /// Minimum time between beats (ms)
    pub refractory_ms: f64,
    /// Number of bins a well-formed frame carries
    pub bin_count: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            band_low_hz: 20.0,
            band_high_hz: 150.0,
            smoothing: 0.12,
            average_rate: 0.02,
            initial_average: 0.08,
            onset_ratio: 1.35,
            silence_floor: 0.12,
            refractory_ms: 170.0,
            bin_count: crate::FREQUENCY_BIN_COUNT,
        }
    }
}

/// Per-tick detector output
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeatSignal {
    /// RMS of all bins (0.0 - 1.0)
    pub amplitude: f32,
    /// Bass band energy of this tick (0.0 - 1.0)
    pub bass_instant: f32,
    /// Fast exponential follower of `bass_instant`
    pub bass_smoothed: f32,
    /// Slow exponential follower of `bass_smoothed`
    pub bass_running_avg: f32,
    /// True on exactly the tick a beat was detected
    pub beat_fired: bool,
}

/// Bass onset detector with an adaptive threshold
pub struct BeatDetector {
    config: DetectorConfig,
    amplitude: f32,
    bass_instant: f32,
    bass_smoothed: f32,
    bass_running_avg: f32,
    /// Detector clock, summed from tick durations
    clock_ms: f64,
    last_beat_ms: Option<f64>,
    /// Cleared on a fire, set again once the onset test fails
    armed: bool,
    beat_count: u64,
    last_signal: BeatSignal,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatDetector {
    /// Create a detector with default tuning
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    /// Create a detector with custom tuning
    pub fn with_config(config: DetectorConfig) -> Self {
        let bass_running_avg = config.initial_average;
        Self {
            config,
            amplitude: 0.0,
            bass_instant: 0.0,
            bass_smoothed: 0.0,
            bass_running_avg,
            clock_ms: 0.0,
            last_beat_ms: None,
            armed: true,
            beat_count: 0,
            last_signal: BeatSignal {
                bass_running_avg,
                ..BeatSignal::default()
            },
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Advance one tick
    ///
    /// `frame` is `None` when the audio source is unavailable, in which case
    /// every signal eases toward zero instead of snapping.
    pub fn update(&mut self, frame: Option<&SpectralFrame>, sample_rate: u32, dt: f32) -> BeatSignal {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock_ms += dt as f64 * 1000.0;

        let beat_fired = match frame {
            Some(frame) => self.process_frame(frame, sample_rate),
            None => {
                self.settle();
                false
            }
        };

        self.last_signal = BeatSignal {
            amplitude: self.amplitude,
            bass_instant: self.bass_instant,
            bass_smoothed: self.bass_smoothed,
            bass_running_avg: self.bass_running_avg,
            beat_fired,
        };
        self.last_signal
    }

    fn process_frame(&mut self, frame: &SpectralFrame, sample_rate: u32) -> bool {
        let bins = self.config.bin_count;
        self.amplitude = unit(Self::rms(frame, bins));
        self.bass_instant = unit(Self::band_energy(
            frame,
            bins,
            sample_rate,
            self.config.band_low_hz,
            self.config.band_high_hz,
        ));
        self.bass_smoothed = follow(self.bass_smoothed, self.bass_instant, self.config.smoothing);
        self.bass_running_avg = follow(self.bass_running_avg, self.bass_smoothed, self.config.average_rate);

        let onset = self.bass_smoothed > self.config.silence_floor
            && self.bass_smoothed > self.bass_running_avg * self.config.onset_ratio;
        if !onset {
            self.armed = true;
            return false;
        }

        let cooled = self
            .last_beat_ms
            .map_or(true, |last| self.clock_ms - last > self.config.refractory_ms);
        if !(self.armed && cooled) {
            return false;
        }

        self.last_beat_ms = Some(self.clock_ms);
        self.armed = false;
        self.beat_count += 1;
        trace!(
            beat = self.beat_count,
            bass = self.bass_smoothed,
            average = self.bass_running_avg,
            "beat"
        );
        true
    }

    fn settle(&mut self) {
        self.bass_instant = 0.0;
        self.amplitude = follow(self.amplitude, 0.0, self.config.smoothing);
        self.bass_smoothed = follow(self.bass_smoothed, 0.0, self.config.smoothing);
        self.bass_running_avg = follow(self.bass_running_avg, 0.0, self.config.average_rate);
        self.armed = true;
    }

    /// Output of the most recent update
    pub fn signal(&self) -> BeatSignal {
        self.last_signal
    }

    /// Beats detected since creation or reset
    pub fn beat_count(&self) -> u64 {
        self.beat_count
    }

    /// Reset to the freshly constructed state
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    /// Root-mean-square of the first `bin_count` normalized bins
    pub fn rms(frame: &SpectralFrame, bin_count: usize) -> f32 {
        if bin_count == 0 {
            return 0.0;
        }
        let sum: f32 = (0..bin_count).map(|i| frame.level(i).powi(2)).sum();
        (sum / bin_count as f32).sqrt()
    }

    /// Average normalized magnitude over the bins covering `low_hz..=high_hz`
    ///
    /// Returns 0 when the band collapses to a single bin or less.
    pub fn band_energy(
        frame: &SpectralFrame,
        bin_count: usize,
        sample_rate: u32,
        low_hz: f32,
        high_hz: f32,
    ) -> f32 {
        if bin_count == 0 || sample_rate == 0 {
            return 0.0;
        }
        let nyquist = sample_rate as f32 / 2.0;
        let last = bin_count - 1;
        let to_bin = |hz: f32| -> usize {
            let bin = (hz / nyquist * bin_count as f32).floor();
            if bin.is_finite() {
                (bin.max(0.0) as usize).min(last)
            } else {
                0
            }
        };
        let lo = to_bin(low_hz);
        let hi = to_bin(high_hz);
        if hi <= lo {
            return 0.0;
        }
        let sum: f32 = (lo..=hi).map(|i| frame.level(i)).sum();
        sum / (hi - lo + 1) as f32
    }
}

/// Clamp a per-tick measurement into 0..=1, mapping garbage to silence
#[inline]
fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Exponential follower step that never stores a non-finite value
#[inline]
fn follow(current: f32, target: f32, rate: f32) -> f32 {
    let next = lerp(current, target, rate);
    if next.is_finite() {
        next.max(0.0)
    } else {
        current
    }
}
