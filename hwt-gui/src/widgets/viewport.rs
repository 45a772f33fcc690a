use egui::{Color32, ColorImage, Rect, TextureHandle, TextureOptions, Ui};

use hwt_render::{Engine, Surface};
use tracing::warn;

/// The presented frame, uploaded as a texture every repaint
#[derive(Default)]
pub struct GameView {
    surface: Option<Surface>,
    texture: Option<TextureHandle>,
}

impl GameView {
    /// Fill the remaining space with the scaled frame; returns its screen rect
    pub fn show(&mut self, ui: &mut Ui, engine: &Engine) -> Rect {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let ppp = ui.ctx().pixels_per_point();
        let width = (rect.width() * ppp).round() as u32;
        let height = (rect.height() * ppp).round() as u32;
        if width == 0 || height == 0 {
            return rect;
        }

        if self.surface.is_none() {
            match Surface::new(width, height) {
                Ok(surface) => self.surface = Some(surface),
                Err(e) => {
                    warn!("Surface allocation failed: {}", e);
                    return rect;
                }
            }
        }
        let Some(surface) = self.surface.as_mut() else {
            return rect;
        };
        if let Err(e) = surface.resize(width, height) {
            warn!("Surface resize failed: {}", e);
            return rect;
        }

        engine.present(surface);
        let image = ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            surface.pixels(),
        );
        match self.texture.as_mut() {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ui.ctx().load_texture("hwt-frame", image, TextureOptions::NEAREST));
            }
        }

        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
        }
        rect
    }
}
