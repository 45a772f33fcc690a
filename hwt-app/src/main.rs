//! HWT - Hot Water Tank
//!
//! Beat-reactive pixel-art boiler room: the bass drives the lights, the
//! steam and the camera while you walk around pulling levers.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hwt_analysis::{SilentSource, SpectralFrameSource};
use hwt_audio::{
    analysis_tap, AudioCommand, AudioEngine, AudioEvent, EngineState, TapWriter, TrackLoader,
    TAP_CAPACITY,
};
use hwt_gui::{Config, HwtApp};
use hwt_render::Engine;

/// Tried in order when no track is named on the command line or in the config
const AUDIO_CANDIDATES: [&str; 2] = ["assets/hot-water-tank.mp3", "assets/hot_water_tank.mp3"];

/// Transport state is pushed to the UI at about 30 fps
const STATE_UPDATE_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    let cli_path = std::env::args_os().nth(1).map(PathBuf::from);
    let audio_path = resolve_audio_path(cli_path, config.audio_path.clone(), |p| p.exists());
    info!("Audio track: {}", audio_path.display());

    // Create audio channels and the analysis tap
    let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();
    let (tap, source) = analysis_tap(TAP_CAPACITY, 48000);

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_audio = shutdown.clone();
    let loader_tx = cmd_tx.clone();

    // Spawn audio thread
    let audio_handle = thread::Builder::new()
        .name("hwt-audio".into())
        .spawn(move || {
            run_audio_thread(cmd_rx, loader_tx, evt_tx, shutdown_audio, tap, audio_path);
        });

    let audio = match &audio_handle {
        Ok(_) => {
            let engine = AudioEngine::new(cmd_tx, evt_rx);
            engine.send(AudioCommand::SetVolume(config.volume));
            Some(engine)
        }
        Err(e) => {
            warn!("Could not start the audio thread: {}", e);
            None
        }
    };

    let engine = match config.seed {
        Some(seed) => Engine::with_seed(seed),
        None => Engine::new(),
    }
    .context("creating render targets")?;

    let source: Box<dyn SpectralFrameSource> = match &audio {
        Some(_) => Box::new(source),
        None => Box::new(SilentSource::default()),
    };
    let app = HwtApp::new(engine, source, audio, &config);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([400.0, 260.0])
            .with_title("Hot Water Tank"),
        ..Default::default()
    };
    let result = eframe::run_native("Hot Water Tank", options, Box::new(move |_cc| Ok(Box::new(app))));

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    if let Ok(handle) = audio_handle {
        let _ = handle.join();
    }

    result.map_err(|e| anyhow::anyhow!("window closed with an error: {}", e))
}

/// Command line first, then the config file, then the first bundled
/// candidate that exists (or the first candidate, so the error names it)
fn resolve_audio_path(
    cli: Option<PathBuf>,
    configured: Option<PathBuf>,
    exists: impl Fn(&Path) -> bool,
) -> PathBuf {
    cli.or(configured).unwrap_or_else(|| {
        AUDIO_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| exists(p.as_path()))
            .unwrap_or_else(|| PathBuf::from(AUDIO_CANDIDATES[0]))
    })
}

fn run_audio_thread(
    cmd_rx: Receiver<AudioCommand>,
    loader_tx: Sender<AudioCommand>,
    evt_tx: Sender<AudioEvent>,
    shutdown: Arc<AtomicBool>,
    tap: TapWriter,
    audio_path: PathBuf,
) {
    // Get audio host and device
    let host = cpal::default_host();
    let device = match host.default_output_device() {
        Some(d) => d,
        None => {
            let _ = evt_tx.send(AudioEvent::Error("No audio output device found".into()));
            return;
        }
    };

    let config = match device.default_output_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = evt_tx.send(AudioEvent::Error(format!("Failed to get audio config: {}", e)));
            return;
        }
    };

    let sample_rate = config.sample_rate().0;
    let channels = (config.channels() as usize).max(1);
    info!("Audio output: {} Hz, {} channels", sample_rate, channels);

    let engine_state = Arc::new(Mutex::new(EngineState::new(sample_rate, Some(tap))));
    let engine_for_callback = engine_state.clone();

    // Pre-allocated stereo render buffer for devices that are not stereo
    let mut stereo_buffer = vec![0.0f32; 16384];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // Use try_lock to avoid blocking the real-time audio thread
            let Ok(mut state) = engine_for_callback.try_lock() else {
                data.fill(0.0);
                return;
            };
            if channels == 2 {
                state.process(data);
                return;
            }
            let frames = data.len() / channels;
            if frames * 2 > stereo_buffer.len() {
                stereo_buffer.resize(frames * 2, 0.0);
            }
            let stereo = &mut stereo_buffer[..frames * 2];
            state.process(stereo);
            for (out, lr) in data.chunks_mut(channels).zip(stereo.chunks_exact(2)) {
                if channels == 1 {
                    out[0] = (lr[0] + lr[1]) * 0.5;
                } else {
                    out[0] = lr[0];
                    out[1] = lr[1];
                    out[2..].fill(0.0);
                }
            }
        },
        |err| {
            error!("Audio stream error: {}", err);
        },
        None,
    );

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = evt_tx.send(AudioEvent::Error(format!("Failed to create audio stream: {}", e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = evt_tx.send(AudioEvent::Error(format!("Failed to start audio: {}", e)));
        return;
    }
    let _ = evt_tx.send(AudioEvent::Ready { sample_rate });

    // Decode off the command loop so transport stays responsive
    let decode_evt_tx = evt_tx.clone();
    let _ = thread::Builder::new()
        .name("hwt-decode".into())
        .spawn(move || {
            let loader = TrackLoader::with_sample_rate(sample_rate);
            match loader.load(&audio_path) {
                Ok(track) => {
                    let _ = loader_tx.send(AudioCommand::Load(
                        Arc::new(track.samples),
                        track.sample_rate,
                        Some(track.name),
                    ));
                }
                Err(e) => {
                    let _ = decode_evt_tx.send(AudioEvent::Error(format!(
                        "{}: {}",
                        audio_path.display(),
                        e
                    )));
                }
            }
        });

    let mut last_state_update = Instant::now();

    // Command processing loop
    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(AudioCommand::Shutdown) => break,
            Ok(cmd) => {
                if let Ok(mut state) = engine_state.lock() {
                    if let Some(event) = state.handle_command(cmd) {
                        let _ = evt_tx.try_send(event);
                    }
                }
            }
            Err(_) => {}
        }

        // Send state updates periodically
        if last_state_update.elapsed() >= STATE_UPDATE_INTERVAL {
            if let Ok(state) = engine_state.lock() {
                let _ = evt_tx.try_send(state.get_state());
            }
            last_state_update = Instant::now();
        }
    }
    info!("Audio thread stopped");
}
