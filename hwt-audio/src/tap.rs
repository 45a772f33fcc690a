//! Analysis tap: played samples cross from the audio thread to the tick loop
//!
//! The output callback pushes mono samples into a single-producer ring; the
//! tick drains it without blocking and runs the spectral analyser, the same
//! place a browser would put an `AnalyserNode` between source and gain.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use hwt_analysis::{Analyser, SpectralFrame, SpectralFrameSource, FREQUENCY_BIN_COUNT};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};

/// Ring size in mono samples (about 0.7 s at 48 kHz)
pub const TAP_CAPACITY: usize = 32768;

/// Drain chunk size when emptying the ring
const DRAIN_CHUNK: usize = 1024;

#[derive(Debug)]
struct TapShared {
    loaded: AtomicBool,
    sample_rate: AtomicU32,
}

/// Audio-thread end of the tap
pub struct TapWriter {
    prod: HeapProd<f32>,
    shared: Arc<TapShared>,
}

impl TapWriter {
    /// Push mono samples; whatever does not fit is dropped
    pub fn push(&mut self, samples: &[f32]) -> usize {
        self.prod.push_slice(samples)
    }

    /// Mark whether a track is ready; frames are only produced when it is
    pub fn set_loaded(&self, loaded: bool) {
        self.shared.loaded.store(loaded, Ordering::Release);
    }

    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.shared.sample_rate.store(sample_rate, Ordering::Release);
    }
}

/// Live spectral source fed by a [`TapWriter`]
pub struct AnalyserSource {
    cons: HeapCons<f32>,
    shared: Arc<TapShared>,
    analyser: Analyser,
    frame: SpectralFrame,
    scratch: Vec<f32>,
}

/// Create a connected writer/source pair
pub fn analysis_tap(capacity: usize, sample_rate: u32) -> (TapWriter, AnalyserSource) {
    let rb = HeapRb::<f32>::new(capacity.max(DRAIN_CHUNK));
    let (prod, cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();
    let shared = Arc::new(TapShared {
        loaded: AtomicBool::new(false),
        sample_rate: AtomicU32::new(sample_rate),
    });
    (
        TapWriter {
            prod,
            shared: shared.clone(),
        },
        AnalyserSource {
            cons,
            shared,
            analyser: Analyser::new(sample_rate),
            frame: SpectralFrame::silent(FREQUENCY_BIN_COUNT),
            scratch: vec![0.0; DRAIN_CHUNK],
        },
    )
}

impl AnalyserSource {
    pub fn is_loaded(&self) -> bool {
        self.shared.loaded.load(Ordering::Acquire)
    }

    /// Move everything buffered into the analyser window
    fn drain(&mut self) -> usize {
        let mut total = 0;
        loop {
            let n = self.cons.pop_slice(&mut self.scratch);
            if n == 0 {
                break;
            }
            self.analyser.push_samples(&self.scratch[..n]);
            total += n;
        }
        total
    }
}

impl SpectralFrameSource for AnalyserSource {
    fn sample_rate(&self) -> u32 {
        self.shared.sample_rate.load(Ordering::Acquire)
    }

    fn read_frame(&mut self) -> Option<&SpectralFrame> {
        self.drain();
        if !self.is_loaded() {
            return None;
        }
        self.analyser.analyse(&mut self.frame);
        Some(&self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwt_analysis::FFT_SIZE;
    use std::f32::consts::PI;

    fn bass_tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.8 * (2.0 * PI * 60.0 * i as f32 / 48000.0).sin())
            .collect()
    }

    #[test]
    fn test_unavailable_until_loaded() {
        let (mut writer, mut source) = analysis_tap(TAP_CAPACITY, 48000);
        writer.push(&bass_tone(FFT_SIZE));
        assert!(source.read_frame().is_none());
        writer.set_loaded(true);
        assert!(source.read_frame().is_some());
    }

    #[test]
    fn test_bass_tone_shows_in_low_bins() {
        let (mut writer, mut source) = analysis_tap(TAP_CAPACITY, 48000);
        writer.set_loaded(true);
        // Several reads so the smoothing settles
        let mut low = 0.0;
        let mut high = 0.0;
        for _ in 0..8 {
            writer.push(&bass_tone(FFT_SIZE));
            let frame = source.read_frame().unwrap();
            low = frame.level(2);
            high = frame.level(400);
        }
        assert!(low > 0.5, "low bin {low}");
        assert!(high < low);
    }

    #[test]
    fn test_overflow_drops_and_drains() {
        let (mut writer, mut source) = analysis_tap(DRAIN_CHUNK, 44100);
        let pushed = writer.push(&vec![0.1; DRAIN_CHUNK * 3]);
        assert_eq!(pushed, DRAIN_CHUNK);
        assert_eq!(source.drain(), DRAIN_CHUNK);
        assert_eq!(source.drain(), 0);
        assert_eq!(source.sample_rate(), 44100);
        writer.set_sample_rate(48000);
        assert_eq!(source.sample_rate(), 48000);
    }
}
