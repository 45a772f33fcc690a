use egui::{Color32, FontFamily, FontId, Stroke, TextStyle, Visuals};

use crate::state::MessageType;

pub struct BoilerTheme;

// Soot, brass and furnace light
pub const BG: Color32 = Color32::from_rgb(0x07, 0x06, 0x0a);
pub const BG_PANEL: Color32 = Color32::from_rgb(0x14, 0x11, 0x16);
pub const BRASS: Color32 = Color32::from_rgb(0xd8, 0xa2, 0x4a);
pub const EMBER: Color32 = Color32::from_rgb(0xff, 0x7a, 0x2e);
pub const STEAM: Color32 = Color32::from_rgb(0x9f, 0xd6, 0xd2);
pub const TEXT: Color32 = Color32::from_rgb(0xe8, 0xdc, 0xc4);
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x7d, 0x70, 0x62);
pub const DIM: Color32 = Color32::from_rgb(0x2a, 0x24, 0x26);
pub const WARNING: Color32 = Color32::from_rgb(0xff, 0xd1, 0x4a);
pub const DANGER: Color32 = Color32::from_rgb(0xff, 0x3a, 0x2e);

impl BoilerTheme {
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style.text_styles = [
            (TextStyle::Small, FontId::new(10.0, FontFamily::Monospace)),
            (TextStyle::Body, FontId::new(13.0, FontFamily::Monospace)),
            (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(13.0, FontFamily::Monospace)),
            (TextStyle::Heading, FontId::new(18.0, FontFamily::Monospace)),
        ]
        .into();

        style.spacing.item_spacing = egui::vec2(6.0, 2.0);
        style.spacing.window_margin = egui::Margin::same(6.0);
        style.spacing.button_padding = egui::vec2(8.0, 2.0);

        let mut visuals = Visuals::dark();
        visuals.panel_fill = BG;
        visuals.window_fill = BG_PANEL;
        visuals.extreme_bg_color = BG;
        visuals.faint_bg_color = DIM;

        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT);
        visuals.widgets.noninteractive.bg_fill = BG_PANEL;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, DIM);

        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT);
        visuals.widgets.inactive.bg_fill = BG_PANEL;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, DIM);

        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, BRASS);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(0x2a, 0x1e, 0x12);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, BRASS);

        visuals.widgets.active.fg_stroke = Stroke::new(1.0, EMBER);
        visuals.widgets.active.bg_fill = Color32::from_rgb(0x3a, 0x1c, 0x0c);
        visuals.widgets.active.bg_stroke = Stroke::new(1.5, EMBER);

        visuals.selection.bg_fill = Color32::from_rgba_unmultiplied(0xd8, 0xa2, 0x4a, 0x40);
        visuals.selection.stroke = Stroke::new(1.0, BRASS);

        visuals.window_stroke = Stroke::new(1.0, DIM);
        visuals.window_shadow = egui::epaint::Shadow::NONE;

        style.visuals = visuals;
        ctx.set_style(style);
    }

    pub fn message_color(kind: MessageType) -> Color32 {
        match kind {
            MessageType::Info => TEXT,
            MessageType::Success => STEAM,
            MessageType::Warning => WARNING,
            MessageType::Error => DANGER,
        }
    }
}
