use std::time::Instant;

use eframe::egui;
use tracing::{debug, info};

use hwt_analysis::SpectralFrameSource;
use hwt_audio::{AudioCommand, AudioEngine};
use hwt_render::Engine;
use hwt_world::TickInput;

use crate::config::Config;
use crate::input::{handle_keyboard, UiCommand};
use crate::state::GuiState;
use crate::theme::BoilerTheme;
use crate::widgets::{self, GameView};

pub struct HwtApp {
    engine: Engine,
    source: Box<dyn SpectralFrameSource>,
    /// None when no output device could be opened
    audio: Option<AudioEngine>,
    state: GuiState,
    view: GameView,
    clock: Instant,
    theme_applied: bool,
}

impl HwtApp {
    pub fn new(
        engine: Engine,
        source: Box<dyn SpectralFrameSource>,
        audio: Option<AudioEngine>,
        config: &Config,
    ) -> Self {
        let mut state = GuiState::from_config(config);
        if audio.is_none() {
            state.set_warning("No audio output. The boiler room idles without sound.");
        }
        Self {
            engine,
            source,
            audio,
            state,
            view: GameView::default(),
            clock: Instant::now(),
            theme_applied: false,
        }
    }

    fn send_audio(&self, cmd: AudioCommand) {
        if let Some(audio) = &self.audio {
            audio.send(cmd);
        }
    }

    fn drain_audio_events(&mut self) {
        let events = match &self.audio {
            Some(audio) => audio.poll_events(),
            None => return,
        };
        for event in events {
            if self.state.handle_audio_event(event) {
                self.start_playback(true);
            }
        }
    }

    fn start_playback(&mut self, playing: bool) {
        if self.state.request_playing(playing) {
            self.send_audio(if playing {
                AudioCommand::Play
            } else {
                AudioCommand::Pause
            });
        }
    }

    fn handle_command(&mut self, ctx: &egui::Context, cmd: UiCommand) {
        match cmd {
            UiCommand::SetPlaying(playing) => self.start_playback(playing),
            UiCommand::SetVolume(volume) => {
                self.state.volume = volume;
                self.send_audio(AudioCommand::SetVolume(volume));
            }
            UiCommand::ToggleDebug => self.state.toggle_debug(),
            UiCommand::Quit => {
                info!("Quit requested");
                self.state.should_quit = true;
                if let Some(audio) = &self.audio {
                    audio.shutdown();
                }
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// One simulation + render step at the current wall-clock time
    fn tick(&mut self, input: TickInput) {
        let elapsed = self.clock.elapsed().as_secs_f64();
        let outcome = self.engine.tick(self.source.as_mut(), &input, elapsed);
        for event in &outcome.events {
            debug!("{:?}", event);
            self.state.handle_world_event(event);
        }
        self.state.prompt = self.engine.world().prompt();
        if self.state.show_debug {
            self.state.debug_text = self.engine.debug_text();
        }
        self.state.frame_count += 1;
    }
}

impl eframe::App for HwtApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            BoilerTheme::apply(ctx);
            self.theme_applied = true;
        }

        self.drain_audio_events();

        let (input, commands) = handle_keyboard(ctx, &mut self.state);
        for cmd in commands {
            self.handle_command(ctx, cmd);
        }
        if self.state.should_quit {
            return;
        }

        self.tick(input);

        let mut widget_cmds = Vec::new();
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            widget_cmds = widgets::draw_controls(ui, &self.state);
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            widgets::draw_status(ui, &self.state);
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let rect = self.view.show(ui, &self.engine);
                widgets::draw_overlays(ui.painter(), rect, &self.state);
            });
        for cmd in widget_cmds {
            self.handle_command(ctx, cmd);
        }

        // The simulation advances once per repaint
        ctx.request_repaint();
    }
}
