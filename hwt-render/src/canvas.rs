//! Fixed-size raster target with the few primitives the compositor needs

use thiserror::Error;
use tiny_skia::{
    BlendMode, Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient,
    Rect, SpreadMode, Transform,
};

use crate::palette::Rgb;

/// Errors that can occur while creating render targets
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// RGBA raster backed by a tiny-skia pixmap
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_mut()
    }

    /// RGBA of pixel (x, y); out of range reads transparent black
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixmap
            .pixel(x, y)
            .map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
            .unwrap_or([0; 4])
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(color.with_alpha(1.0));
    }

    pub fn clear_transparent(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Source-over rectangle fill in pixel units
    ///
    /// Empty rectangles and transparent colours are skipped.
    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f32) {
        self.fill_blend(x as f32, y as f32, w as f32, h as f32, color, alpha, BlendMode::SourceOver);
    }

    /// Opaque rectangle fill
    pub fn fill_solid(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        self.fill(x, y, w, h, color, 1.0);
    }

    /// Additive wash over the whole canvas
    pub fn wash(&mut self, color: Rgb, alpha: f32) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.fill_blend(0.0, 0.0, w, h, color, alpha, BlendMode::Plus);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_blend(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32, blend: BlendMode) {
        if alpha.is_nan() || alpha <= 0.0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        // None when the rect is degenerate or not finite
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.with_alpha(alpha));
        paint.anti_alias = false;
        paint.blend_mode = blend;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Additive radial glow centred on (cx, cy), fading to nothing at `radius`
    pub fn glow(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if alpha.is_nan() || alpha <= 0.0 || radius.is_nan() || radius <= 2.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        // Skip glows entirely off-canvas
        let (w, h) = (self.width() as f32, self.height() as f32);
        if cx + radius < 0.0 || cy + radius < 0.0 || cx - radius > w || cy - radius > h {
            return;
        }

        let center = Point::from_xy(cx, cy);
        let stops = vec![
            GradientStop::new(0.0, color.with_alpha(alpha)),
            GradientStop::new(1.0, Color::TRANSPARENT),
        ];
        let Some(shader) = RadialGradient::new(
            center,
            center,
            radius,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };

        let Some(rect) = Rect::from_xywh(cx - radius, cy - radius, radius * 2.0, radius * 2.0) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let paint = Paint {
            shader,
            blend_mode: BlendMode::Plus,
            anti_alias: false,
            ..Paint::default()
        };
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLACK, RED, VOID, WHITE};

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(
            Canvas::new(0, 10).err(),
            Some(RenderError::InvalidSize { width: 0, height: 10 })
        );
    }

    #[test]
    fn test_fill_and_clear() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        canvas.clear(VOID);
        assert_eq!(canvas.pixel(0, 0), [0x07, 0x0a, 0x10, 255]);
        canvas.fill_solid(2, 2, 2, 2, WHITE);
        assert_eq!(canvas.pixel(2, 3), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(4, 4), [0x07, 0x0a, 0x10, 255]);
    }

    #[test]
    fn test_degenerate_fills_are_skipped() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.clear(BLACK);
        let before = canvas.data().to_vec();
        canvas.fill(0, 0, 0, 3, WHITE, 1.0);
        canvas.fill(0, 0, 3, -1, WHITE, 1.0);
        canvas.fill(0, 0, 3, 3, WHITE, 0.0);
        canvas.fill(0, 0, 3, 3, WHITE, f32::NAN);
        canvas.fill(-20, -20, 4, 4, WHITE, 1.0);
        canvas.glow(2.0, 2.0, 10.0, WHITE, f32::NAN);
        canvas.glow(f32::INFINITY, 2.0, 10.0, WHITE, 1.0);
        canvas.glow(500.0, 500.0, 10.0, WHITE, 1.0);
        assert_eq!(canvas.data(), &before[..]);
    }

    #[test]
    fn test_wash_is_additive() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.clear(Rgb::new(100, 0, 0));
        canvas.wash(Rgb::new(200, 40, 0), 1.0);
        let px = canvas.pixel(1, 1);
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 40);
    }

    #[test]
    fn test_glow_brightens_centre_more_than_edge() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        canvas.clear(BLACK);
        canvas.glow(32.0, 32.0, 30.0, RED, 0.8);
        let centre = canvas.pixel(32, 32)[0];
        let edge = canvas.pixel(32, 60)[0];
        assert!(centre > edge, "centre {} edge {}", centre, edge);
        assert_eq!(canvas.pixel(0, 0)[0], 0);
    }
}
