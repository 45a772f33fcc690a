//! FFT analyser producing byte spectral frames from streaming PCM
//!
//! Mirrors the behaviour of a browser `AnalyserNode`: a Blackman-windowed
//! FFT over the most recent `FFT_SIZE` samples, temporal smoothing of the
//! linear magnitudes, and a decibel range mapped onto 0..=255.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::frame::{SpectralFrame, MAX_MAGNITUDE};

/// FFT window length in samples
pub const FFT_SIZE: usize = 2048;

/// Number of bins in each produced frame
pub const FREQUENCY_BIN_COUNT: usize = FFT_SIZE / 2;

const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;
const SMOOTHING_TIME_CONSTANT: f32 = 0.75;

/// Real-time spectral analyser
pub struct Analyser {
    sample_rate: u32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Circular buffer holding the latest FFT_SIZE mono samples
    history: Vec<f32>,
    write_pos: usize,
    smoothed: Vec<f32>,
    /// Pre-allocated FFT buffer to avoid allocation in analyse()
    fft_buffer: Vec<Complex<f32>>,
}

impl Analyser {
    /// Create a new analyser
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Pre-compute Blackman window
        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| {
                let x = 2.0 * PI * i as f32 / FFT_SIZE as f32;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })
            .collect();

        Self {
            sample_rate,
            fft,
            window,
            history: vec![0.0; FFT_SIZE],
            write_pos: 0,
            smoothed: vec![0.0; FREQUENCY_BIN_COUNT],
            fft_buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Append mono samples; only the newest FFT_SIZE are retained
    pub fn push_samples(&mut self, samples: &[f32]) {
        let start = samples.len().saturating_sub(FFT_SIZE);
        for &sample in &samples[start..] {
            self.history[self.write_pos] = if sample.is_finite() { sample } else { 0.0 };
            self.write_pos = (self.write_pos + 1) % FFT_SIZE;
        }
    }

    /// Analyse the current window into `frame` (resized to FREQUENCY_BIN_COUNT)
    pub fn analyse(&mut self, frame: &mut SpectralFrame) {
        // Oldest sample first, windowed
        for i in 0..FFT_SIZE {
            let sample = self.history[(self.write_pos + i) % FFT_SIZE];
            self.fft_buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        let scale = 1.0 / FFT_SIZE as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        let bins = frame.bins_mut();
        bins.clear();
        bins.reserve(FREQUENCY_BIN_COUNT);

        for (k, prev) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.fft_buffer[k].norm() * scale;
            let mut value = SMOOTHING_TIME_CONSTANT * *prev + (1.0 - SMOOTHING_TIME_CONSTANT) * magnitude;
            if !value.is_finite() {
                value = 0.0;
            }
            *prev = value;

            let byte = if value > 0.0 {
                let db = 20.0 * value.log10();
                let scaled = (db - MIN_DECIBELS) / range * MAX_MAGNITUDE as f32;
                scaled.clamp(0.0, MAX_MAGNITUDE as f32) as u8
            } else {
                0
            };
            bins.push(byte);
        }
    }

    /// Forget buffered audio and smoothing history
    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_silence_yields_zero_frame() {
        let mut analyser = Analyser::new(48000);
        analyser.push_samples(&vec![0.0; FFT_SIZE]);
        let mut frame = SpectralFrame::default();
        analyser.analyse(&mut frame);
        assert_eq!(frame.len(), FREQUENCY_BIN_COUNT);
        assert!(frame.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bass_tone_lands_in_low_bins() {
        let sample_rate = 48000;
        let mut analyser = Analyser::new(sample_rate);
        analyser.push_samples(&sine(100.0, sample_rate, FFT_SIZE, 0.8));
        let mut frame = SpectralFrame::default();
        analyser.analyse(&mut frame);

        // 100 Hz sits near bin 4 at 48 kHz / 2048
        let peak = frame.bins()[3..6].iter().copied().max().unwrap_or(0);
        assert!(peak > 200, "expected strong bass bin, got {}", peak);
        assert!(frame.bins()[500] < 40, "high bin leaked: {}", frame.bins()[500]);
    }

    #[test]
    fn test_non_finite_samples_are_dropped() {
        let mut analyser = Analyser::new(44100);
        analyser.push_samples(&[f32::NAN, f32::INFINITY, 0.0]);
        let mut frame = SpectralFrame::default();
        analyser.analyse(&mut frame);
        assert!(frame.bins().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut analyser = Analyser::new(48000);
        analyser.push_samples(&sine(80.0, 48000, FFT_SIZE, 0.9));
        let mut frame = SpectralFrame::default();
        analyser.analyse(&mut frame);
        analyser.reset();
        analyser.analyse(&mut frame);
        assert!(frame.bins().iter().all(|&b| b == 0));
    }
}
