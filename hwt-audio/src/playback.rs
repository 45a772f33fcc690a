//! Looping single-track transport

use std::sync::Arc;

/// Playback state of the loaded track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// One looping track, played back at its native rate
pub struct Playback {
    /// Interleaved stereo; Arc so loading never copies through channels
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    /// Current frame index
    position: usize,
    state: PlaybackState,
    track_name: Option<String>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            samples: Arc::new(Vec::new()),
            sample_rate: 48000,
            position: 0,
            state: PlaybackState::Stopped,
            track_name: None,
        }
    }

    /// Replace the track; playback stops at the start
    pub fn load(&mut self, samples: Arc<Vec<f32>>, sample_rate: u32, name: Option<String>) {
        self.samples = samples;
        self.sample_rate = sample_rate.max(1);
        self.position = 0;
        self.state = PlaybackState::Stopped;
        self.track_name = name;
    }

    pub fn is_loaded(&self) -> bool {
        self.frames() > 0
    }

    pub fn play(&mut self) {
        if self.is_loaded() {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = 0;
    }

    pub fn toggle(&mut self) {
        if self.state == PlaybackState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn track_name(&self) -> Option<&str> {
        self.track_name.as_deref()
    }

    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn position_secs(&self) -> f64 {
        self.position as f64 / self.sample_rate as f64
    }

    fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Fill interleaved stereo `output`, wrapping to the start at the end
    pub fn process(&mut self, output: &mut [f32]) {
        let frames = self.frames();
        if self.state != PlaybackState::Playing || frames == 0 {
            output.fill(0.0);
            return;
        }

        for frame in output.chunks_mut(2) {
            let i = self.position * 2;
            frame[0] = self.samples[i];
            if let Some(right) = frame.get_mut(1) {
                *right = self.samples[i + 1];
            }
            self.position += 1;
            if self.position >= frames {
                self.position = 0;
            }
        }
    }
}
