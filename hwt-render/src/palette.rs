//! Boiler room palette

use tiny_skia::Color;

/// Opaque sRGB colour, combined with an alpha at draw time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// tiny-skia colour with `alpha` clamped into 0..=1 (non-finite is transparent)
    pub fn with_alpha(self, alpha: f32) -> Color {
        let a = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 0.0 };
        Color::from_rgba8(self.r, self.g, self.b, (a * 255.0).round() as u8)
    }
}

pub const VOID: Rgb = Rgb::new(0x07, 0x0a, 0x10);
pub const NAVY: Rgb = Rgb::new(0x0b, 0x14, 0x24);
pub const STEEL0: Rgb = Rgb::new(0x15, 0x22, 0x35);
pub const STEEL1: Rgb = Rgb::new(0x1d, 0x2d, 0x44);
pub const STEEL2: Rgb = Rgb::new(0x2a, 0x41, 0x60);
pub const STEEL3: Rgb = Rgb::new(0x35, 0x52, 0x75);
pub const GROUT: Rgb = Rgb::new(0x10, 0x18, 0x27);
pub const RED: Rgb = Rgb::new(0xff, 0x3a, 0x2e);
pub const AMBER: Rgb = Rgb::new(0xff, 0xb0, 0x00);
pub const EMBER: Rgb = Rgb::new(0xff, 0x6a, 0x2a);
pub const STEAM: Rgb = Rgb::new(0xc8, 0xd5, 0xe6);

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Cool overhead lamp light
pub const LAMP: Rgb = Rgb::new(190, 220, 255);
/// Blue ambient lift
pub const AMBIENT: Rgb = Rgb::new(70, 110, 160);

// Player sprite
pub const ARMOR0: Rgb = Rgb::new(0x0f, 0x1a, 0x2d);
pub const ARMOR1: Rgb = Rgb::new(0x22, 0x39, 0x5a);
pub const ARMOR_HI: Rgb = Rgb::new(0x5c, 0x87, 0xb7);
pub const CAPE0: Rgb = Rgb::new(0x2a, 0x0f, 0x14);
pub const CAPE1: Rgb = Rgb::new(0x8a, 0x23, 0x24);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(RED.with_alpha(2.0).alpha(), 1.0);
        assert_eq!(RED.with_alpha(-1.0).alpha(), 0.0);
        assert_eq!(RED.with_alpha(f32::NAN).alpha(), 0.0);
    }
}
