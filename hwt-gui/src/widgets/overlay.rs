use egui::{Align2, Color32, FontId, Painter, Pos2, Rect};

use crate::state::GuiState;
use crate::theme;

const PAD: f32 = 6.0;

/// Interaction prompt (bottom centre) and debug readout (top left) over the frame
pub fn draw_overlays(painter: &Painter, rect: Rect, state: &GuiState) {
    if let Some(prompt) = state.prompt {
        let pos = Pos2::new(rect.center().x, rect.bottom() - 24.0);
        boxed_text(painter, pos, Align2::CENTER_BOTTOM, prompt, theme::BRASS, 14.0);
    }
    if state.show_debug && !state.debug_text.is_empty() {
        let pos = rect.left_top() + egui::vec2(12.0, 12.0);
        boxed_text(painter, pos, Align2::LEFT_TOP, &state.debug_text, theme::STEAM, 12.0);
    }
}

fn boxed_text(painter: &Painter, pos: Pos2, anchor: Align2, text: &str, color: Color32, size: f32) {
    let galley = painter.layout_no_wrap(text.to_string(), FontId::monospace(size), color);
    let text_rect = anchor.anchor_size(pos, galley.size());
    painter.rect_filled(
        text_rect.expand(PAD),
        3.0,
        Color32::from_rgba_unmultiplied(0, 0, 0, 170),
    );
    painter.galley(text_rect.min, galley, color);
}
