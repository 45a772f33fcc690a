//! Audio file loading and decoding

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, StandardTagKey};
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during track loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No audio track found in file")]
    NoAudioTrack,
    #[error("File contains no audio samples")]
    Empty,
    #[error("Decode error: {0}")]
    Decode(String),
}

/// A decoded track, ready for playback
#[derive(Debug, Clone)]
pub struct LoadedTrack {
    /// Interleaved stereo samples (f32, normalized to -1.0 to 1.0)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count of the source file
    pub source_channels: u16,
    /// Title tag, or the file stem
    pub name: String,
}

impl LoadedTrack {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.samples.len() / 2) as f64 / self.sample_rate as f64
    }
}

/// Audio file loader using Symphonia
pub struct TrackLoader {
    target_sample_rate: u32,
}

impl Default for TrackLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackLoader {
    /// Create a new track loader with default 48kHz sample rate
    pub fn new() -> Self {
        Self::with_sample_rate(48000)
    }

    /// Create a track loader that resamples to the output device rate
    pub fn with_sample_rate(target_sample_rate: u32) -> Self {
        Self {
            target_sample_rate: target_sample_rate.max(1),
        }
    }

    pub fn target_sample_rate(&self) -> u32 {
        self.target_sample_rate
    }

    /// Load and decode an audio file to interleaved stereo
    pub fn load(&self, path: &Path) -> Result<LoadedTrack, LoadError> {
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(LoadError::NoAudioTrack)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let source_sample_rate = codec_params.sample_rate.unwrap_or(44100);
        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        let name = extract_title(&mut format).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown")
                .to_string()
        });

        let mut samples: Vec<f32> = Vec::new();
        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    debug!("Stopping decode of {:?}: {}", path, e);
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(_) => continue,
            };

            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
            sample_buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(sample_buf.samples());
        }

        let stereo = to_stereo(&samples, channels);
        if stereo.is_empty() {
            return Err(LoadError::Empty);
        }

        let (samples, sample_rate) = if source_sample_rate != self.target_sample_rate {
            (
                self.resample(&stereo, source_sample_rate)?,
                self.target_sample_rate,
            )
        } else {
            (stereo, source_sample_rate)
        };

        let track = LoadedTrack {
            samples,
            sample_rate,
            source_channels: channels,
            name,
        };
        info!(
            "Loaded {:?} ({:.1}s, {} Hz -> {} Hz)",
            path,
            track.duration_secs(),
            source_sample_rate,
            sample_rate
        );
        Ok(track)
    }

    /// Resample interleaved stereo to the target rate
    fn resample(&self, samples: &[f32], source_rate: u32) -> Result<Vec<f32>, LoadError> {
        use rubato::{FftFixedInOut, Resampler};

        const CHANNELS: usize = 2;
        let frames = samples.len() / CHANNELS;

        let mut resampler = FftFixedInOut::<f32>::new(
            source_rate as usize,
            self.target_sample_rate as usize,
            1024,
            CHANNELS,
        )
        .map_err(|e| LoadError::Decode(e.to_string()))?;

        let deinterleaved: Vec<Vec<f32>> = (0..CHANNELS)
            .map(|ch| (0..frames).map(|f| samples[f * CHANNELS + ch]).collect())
            .collect();

        let chunk_size = resampler.input_frames_next();
        let mut output: Vec<Vec<f32>> = vec![Vec::new(); CHANNELS];

        let mut pos = 0;
        while pos + chunk_size <= frames {
            let input_refs: Vec<&[f32]> = deinterleaved
                .iter()
                .map(|ch| &ch[pos..pos + chunk_size])
                .collect();

            let resampled = resampler
                .process(&input_refs, None)
                .map_err(|e| LoadError::Decode(e.to_string()))?;

            for (ch, data) in resampled.into_iter().enumerate() {
                output[ch].extend(data);
            }

            pos += chunk_size;
        }

        // Tail: pad with zeros, keep the proportional share of the output
        if pos < frames {
            let remaining = frames - pos;
            let padded: Vec<Vec<f32>> = deinterleaved
                .iter()
                .map(|ch| {
                    let mut v = ch[pos..].to_vec();
                    v.resize(chunk_size, 0.0);
                    v
                })
                .collect();

            let input_refs: Vec<&[f32]> = padded.iter().map(|v| v.as_slice()).collect();

            if let Ok(resampled) = resampler.process(&input_refs, None) {
                let output_frames =
                    (remaining * self.target_sample_rate as usize) / source_rate as usize;
                for (ch, data) in resampled.into_iter().enumerate() {
                    output[ch].extend(&data[..output_frames.min(data.len())]);
                }
            }
        }

        let output_frames = output[0].len().min(output[1].len());
        let mut interleaved = Vec::with_capacity(output_frames * CHANNELS);
        for frame_idx in 0..output_frames {
            for channel in &output {
                interleaved.push(channel[frame_idx]);
            }
        }

        Ok(interleaved)
    }
}

/// Fold any channel layout to interleaved stereo
///
/// Mono is duplicated; beyond two channels only the front pair is kept.
fn to_stereo(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => samples[..samples.len() - samples.len() % 2].to_vec(),
        n => samples
            .chunks_exact(n as usize)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}

fn extract_title(format: &mut Box<dyn FormatReader>) -> Option<String> {
    let meta = format.metadata();
    let current = meta.current()?;
    let title = current
        .tags()
        .iter()
        .find(|tag| matches!(tag.std_key, Some(StandardTagKey::TrackTitle)))
        .map(|tag| tag.value.to_string());
    title
}
