//! Heat-haze scanline warp and the punch-zoom crop

use crate::canvas::Canvas;

/// Rows shifted together
pub const WARP_BAND: usize = 3;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Horizontal offset of the band starting at row `y`
pub fn band_offset(y: usize, strength: f32, phase: f32) -> i32 {
    let y = y as f32;
    let wobble = (y * 0.075 + phase).sin() + 0.6 * (y * 0.13 - phase * 1.2).sin();
    let dx = (wobble * strength).round();
    if dx.is_finite() {
        dx as i32
    } else {
        0
    }
}

/// Copy `src` into `dst` with each band of rows shifted sideways
///
/// Pixels uncovered by the shift are black. Both canvases must share a size;
/// a mismatch leaves `dst` untouched.
pub fn scanline_warp(src: &Canvas, dst: &mut Canvas, strength: f32, phase: f32) {
    if src.width() != dst.width() || src.height() != dst.height() {
        return;
    }
    let width = src.width() as usize;
    let height = src.height() as usize;
    let stride = width * 4;
    let from = src.data();
    let to = dst.data_mut();

    for band_start in (0..height).step_by(WARP_BAND) {
        let dx = band_offset(band_start, strength, phase);
        for y in band_start..(band_start + WARP_BAND).min(height) {
            let row_in = &from[y * stride..(y + 1) * stride];
            let row_out = &mut to[y * stride..(y + 1) * stride];
            shift_row(row_in, row_out, width, dx);
        }
    }
}

fn shift_row(row_in: &[u8], row_out: &mut [u8], width: usize, dx: i32) {
    let shift = dx.unsigned_abs() as usize;
    if shift >= width {
        for px in row_out.chunks_exact_mut(4) {
            px.copy_from_slice(&OPAQUE_BLACK);
        }
        return;
    }
    let keep = (width - shift) * 4;
    let gap = shift * 4;
    if dx >= 0 {
        row_out[gap..].copy_from_slice(&row_in[..keep]);
        for px in row_out[..gap].chunks_exact_mut(4) {
            px.copy_from_slice(&OPAQUE_BLACK);
        }
    } else {
        row_out[..keep].copy_from_slice(&row_in[gap..]);
        for px in row_out[keep..].chunks_exact_mut(4) {
            px.copy_from_slice(&OPAQUE_BLACK);
        }
    }
}

/// Centred crop of size `width / zoom` scaled back up with nearest neighbour
///
/// `zoom` below 1 or non-finite is treated as 1.
pub fn punch_zoom(src: &Canvas, dst: &mut Canvas, zoom: f32) {
    if src.width() != dst.width() || src.height() != dst.height() {
        return;
    }
    let zoom = if zoom.is_finite() { zoom.max(1.0) } else { 1.0 };
    let width = src.width() as usize;
    let height = src.height() as usize;
    let crop_w = width as f32 / zoom;
    let crop_h = height as f32 / zoom;
    let x0 = (width as f32 - crop_w) / 2.0;
    let y0 = (height as f32 - crop_h) / 2.0;

    let columns: Vec<usize> = (0..width)
        .map(|x| sample_index(x0, crop_w / width as f32, x, width))
        .collect();

    let from = src.data();
    let to = dst.data_mut();
    for y in 0..height {
        let sy = sample_index(y0, crop_h / height as f32, y, height);
        let row_in = &from[sy * width * 4..(sy + 1) * width * 4];
        let row_out = &mut to[y * width * 4..(y + 1) * width * 4];
        for (x, &sx) in columns.iter().enumerate() {
            row_out[x * 4..x * 4 + 4].copy_from_slice(&row_in[sx * 4..sx * 4 + 4]);
        }
    }
}

/// Source index sampled at the centre of destination pixel `i`
fn sample_index(origin: f32, step: f32, i: usize, len: usize) -> usize {
    let s = (origin + (i as f32 + 0.5) * step).floor();
    (s.max(0.0) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Rgb, BLACK, WHITE};

    fn stripes(w: u32, h: u32) -> Canvas {
        let mut c = Canvas::new(w, h).unwrap();
        c.clear(BLACK);
        for x in 0..w as i32 {
            let v = (x * 8) as u8;
            c.fill_solid(x, 0, 1, h as i32, Rgb::new(v, v, v));
        }
        c
    }

    #[test]
    fn test_zero_strength_is_identity() {
        let src = stripes(40, 12);
        let mut dst = Canvas::new(40, 12).unwrap();
        scanline_warp(&src, &mut dst, 0.0, 1.7);
        assert_eq!(src.data(), dst.data());
    }

    #[test]
    fn test_shift_exposes_black() {
        let mut src = Canvas::new(10, 3).unwrap();
        src.clear(WHITE);
        let mut dst = Canvas::new(10, 3).unwrap();
        let mut out = vec![0u8; 40];
        shift_row(&src.data()[..40], &mut out, 10, 3);
        assert_eq!(&out[..4], &OPAQUE_BLACK);
        assert_eq!(&out[12..16], &[255, 255, 255, 255]);

        // Whole-canvas shift wider than the row
        scanline_warp(&src, &mut dst, 1000.0, 0.3);
        assert!(dst.data().chunks_exact(4).all(|px| px == OPAQUE_BLACK || px == [255, 255, 255, 255]));
    }

    #[test]
    fn test_bands_share_an_offset() {
        for band_start in (0..224).step_by(WARP_BAND) {
            let a = band_offset(band_start, 6.0, 2.0);
            assert!(a.abs() <= 10);
        }
        assert_eq!(band_offset(5, f32::NAN, 0.0), 0);
    }

    #[test]
    fn test_unit_zoom_is_identity() {
        let src = stripes(40, 12);
        let mut dst = Canvas::new(40, 12).unwrap();
        punch_zoom(&src, &mut dst, 1.0);
        assert_eq!(src.data(), dst.data());
        punch_zoom(&src, &mut dst, f32::NAN);
        assert_eq!(src.data(), dst.data());
    }

    #[test]
    fn test_zoom_crops_the_centre() {
        let src = stripes(32, 8);
        let mut dst = Canvas::new(32, 8).unwrap();
        punch_zoom(&src, &mut dst, 2.0);
        // Left edge now samples from column 8
        assert_eq!(dst.pixel(0, 4), src.pixel(8, 4));
        assert_eq!(dst.pixel(31, 4), src.pixel(23, 4));
    }
}
