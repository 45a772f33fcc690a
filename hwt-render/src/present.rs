//! Integer-scaled presentation onto an output surface

use crate::canvas::{Canvas, RenderError};

/// Straight RGBA output buffer, e.g. a window-sized texture
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Reallocate for a new size; no-op when unchanged
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

/// Where and how large the internal frame lands on a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentLayout {
    pub scale: u32,
    pub x: i64,
    pub y: i64,
}

impl PresentLayout {
    /// Largest integer scale that fits (at least 1), centred
    pub fn fit(frame_w: u32, frame_h: u32, surface_w: u32, surface_h: u32) -> Self {
        let sx = surface_w / frame_w.max(1);
        let sy = surface_h / frame_h.max(1);
        let scale = sx.min(sy).max(1);
        let x = (surface_w as i64 - (frame_w * scale) as i64).div_euclid(2);
        let y = (surface_h as i64 - (frame_h * scale) as i64).div_euclid(2);
        Self { scale, x, y }
    }
}

/// Letterbox black, then blit `frame` with nearest-neighbour integer scaling
pub fn present(frame: &Canvas, surface: &mut Surface) -> PresentLayout {
    let layout = PresentLayout::fit(frame.width(), frame.height(), surface.width, surface.height);
    for px in surface.pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&[0, 0, 0, 255]);
    }

    let scale = layout.scale as i64;
    let fw = frame.width() as usize;
    let src = frame.data();
    let (sw, sh) = (surface.width as i64, surface.height as i64);

    // Clip the scaled frame to the surface
    let x_start = layout.x.max(0);
    let x_end = (layout.x + frame.width() as i64 * scale).min(sw);
    let y_start = layout.y.max(0);
    let y_end = (layout.y + frame.height() as i64 * scale).min(sh);
    if x_start >= x_end || y_start >= y_end {
        return layout;
    }

    for y in y_start..y_end {
        let fy = ((y - layout.y) / scale) as usize;
        let row = (y * sw) as usize * 4;
        for x in x_start..x_end {
            let fx = ((x - layout.x) / scale) as usize;
            let i = (fy * fw + fx) * 4;
            let o = row + x as usize * 4;
            surface.pixels[o..o + 3].copy_from_slice(&src[i..i + 3]);
            surface.pixels[o + 3] = 255;
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;

    #[test]
    fn test_fit_scales_and_centres() {
        let layout = PresentLayout::fit(400, 224, 1280, 720);
        assert_eq!(layout.scale, 3);
        assert_eq!(layout.x, 40);
        assert_eq!(layout.y, 24);
    }

    #[test]
    fn test_fit_never_below_one() {
        let layout = PresentLayout::fit(400, 224, 300, 100);
        assert_eq!(layout.scale, 1);
        assert_eq!(layout.x, -50);
        assert_eq!(layout.y, -62);
    }

    #[test]
    fn test_zero_surface_is_rejected() {
        assert!(Surface::new(0, 5).is_err());
        let mut s = Surface::new(2, 2).unwrap();
        assert!(s.resize(4, 0).is_err());
    }

    #[test]
    fn test_present_letterboxes_and_scales() {
        let mut frame = Canvas::new(4, 2).unwrap();
        frame.clear(WHITE);
        frame.fill_solid(0, 0, 1, 1, crate::palette::RED);
        let mut surface = Surface::new(10, 6).unwrap();
        let layout = present(&frame, &mut surface);
        assert_eq!(layout, PresentLayout { scale: 2, x: 1, y: 1 });

        // Letterbox
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(9, 5), [0, 0, 0, 255]);
        // Top-left source pixel covers a 2x2 block
        assert_eq!(surface.pixel(1, 1), [0xff, 0x3a, 0x2e, 255]);
        assert_eq!(surface.pixel(2, 2), [0xff, 0x3a, 0x2e, 255]);
        assert_eq!(surface.pixel(3, 1), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(8, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn test_present_clips_small_surface() {
        let mut frame = Canvas::new(8, 8).unwrap();
        frame.clear(WHITE);
        let mut surface = Surface::new(4, 4).unwrap();
        present(&frame, &mut surface);
        assert!(surface.pixels().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
    }
}
