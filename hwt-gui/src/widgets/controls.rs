use egui::{RichText, Ui};

use crate::input::UiCommand;
use crate::state::GuiState;
use crate::theme::{self, BoilerTheme};

/// Top bar: title, transport buttons, volume, debug switch
pub fn draw_controls(ui: &mut Ui, state: &GuiState) -> Vec<UiCommand> {
    let mut commands = Vec::new();
    ui.horizontal(|ui| {
        ui.label(RichText::new("HOT WATER TANK").color(theme::BRASS).strong().monospace());
        ui.separator();

        let playing = state.is_playing();
        if ui.add_enabled(!playing, egui::Button::new("Play")).clicked() {
            commands.push(UiCommand::SetPlaying(true));
        }
        if ui.add_enabled(playing, egui::Button::new("Pause")).clicked() {
            commands.push(UiCommand::SetPlaying(false));
        }

        let mut volume = state.volume;
        let slider = egui::Slider::new(&mut volume, 0.0..=1.0)
            .text("vol")
            .show_value(false);
        if ui.add(slider).changed() {
            commands.push(UiCommand::SetVolume(volume));
        }

        let mut debug = state.show_debug;
        if ui.checkbox(&mut debug, "debug").changed() {
            commands.push(UiCommand::ToggleDebug);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let t = &state.transport;
            ui.label(
                RichText::new(format!("{}/{}", clock(t.position), clock(t.duration)))
                    .color(theme::TEXT_DIM)
                    .monospace(),
            );
        });
    });
    commands
}

/// Bottom bar: the status line
pub fn draw_status(ui: &mut Ui, state: &GuiState) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(&state.message)
                .color(BoilerTheme::message_color(state.message_type))
                .monospace(),
        );
    });
}

fn clock(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    format!("{}:{:02}", (secs / 60.0) as u32, (secs % 60.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_format() {
        assert_eq!(clock(0.0), "0:00");
        assert_eq!(clock(61.9), "1:01");
        assert_eq!(clock(f64::NAN), "0:00");
        assert_eq!(clock(-3.0), "0:00");
    }
}
