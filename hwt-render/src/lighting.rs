//! Additive light pools: lamps, torches, furnace, tank and warning lights

use hwt_world::{Toggles, TILE_SIZE, TORCHES};

use crate::canvas::Canvas;
use crate::modulation::FrameParams;
use crate::palette::{Rgb, AMBER, EMBER, LAMP, RED};
use crate::sprites::{torch_flicker, View};

/// Overhead lamps: tile centre, radius, alpha gain
const LAMPS: [(f32, f32, f32, f32); 4] = [
    (20.0, 14.0, 110.0, 0.08),
    (66.0, 16.0, 150.0, 0.08),
    (26.0, 44.0, 140.0, 0.07),
    (70.0, 46.0, 160.0, 0.07),
];

const FURNACE: (f32, f32) = (20.0, 38.0);
const TANK: (f32, f32) = (68.0, 43.0);
const WARNING_A: (f32, f32) = (30.0, 10.0);
const WARNING_B: (f32, f32) = (86.0, 34.0);
const ALARM_LIGHT: (f32, f32) = (60.0, 26.0);

/// Warning light intensity; punchier with the alarm or an armed console
pub fn warning_level(toggles: &Toggles, glow: f32, time: f32) -> f32 {
    if toggles.alarm_enabled {
        0.35 + 0.65 * glow
    } else if toggles.console_armed {
        0.25 + 0.75 * glow
    } else {
        0.12 + 0.08 * (time * 2.0).sin()
    }
}

struct Lights<'a> {
    canvas: &'a mut Canvas,
    view: View,
}

impl Lights<'_> {
    fn world(&mut self, wx: f32, wy: f32, radius: f32, color: Rgb, alpha: f32) {
        let sx = wx - self.view.x as f32;
        let sy = wy - self.view.y as f32;
        self.canvas.glow(sx, sy, radius, color, alpha);
    }

    fn tile(&mut self, at: (f32, f32), radius: f32, color: Rgb, alpha: f32) {
        self.world(at.0 * TILE_SIZE, at.1 * TILE_SIZE, radius, color, alpha);
    }
}

/// Add every light pool for this frame
pub fn draw_lighting(canvas: &mut Canvas, toggles: &Toggles, view: View, p: &FrameParams) {
    let glow = p.glow;
    let mut lights = Lights { canvas, view };

    if toggles.overhead_lights {
        let cool = 0.35 + 0.65 * (0.2 + 0.8 * glow);
        for &(tx, ty, radius, gain) in &LAMPS {
            lights.tile((tx, ty), radius, LAMP, 0.02 + gain * cool);
        }
    }

    let hot = 0.25 + 0.75 * glow;
    for (i, &(wx, wy)) in TORCHES.iter().enumerate() {
        if !toggles.torch_lit(i) {
            continue;
        }
        let flick = torch_flicker(p.time, wx);
        let (cx, cy) = (wx + 6.0, wy + 8.0);
        lights.world(cx, cy, 78.0, EMBER, 0.03 + 0.10 * flick * hot);
        lights.world(cx, cy, 44.0, AMBER, 0.02 + 0.08 * flick * hot);
    }

    let furnace = 0.35 + 0.65 * glow;
    lights.tile(FURNACE, 90.0, EMBER, 0.05 + 0.16 * furnace);
    lights.tile(FURNACE, 52.0, AMBER, 0.03 + 0.12 * furnace);

    let tank = 0.2 + 0.8 * glow;
    lights.tile(TANK, 120.0, RED, 0.02 + 0.12 * tank);
    lights.tile(TANK, 70.0, AMBER, 0.02 + 0.06 * tank);

    let warn = warning_level(toggles, glow, p.time);
    lights.tile(WARNING_A, 48.0, RED, 0.02 + 0.12 * warn);
    lights.tile(WARNING_B, 48.0, RED, 0.02 + 0.10 * warn);
    if toggles.alarm_enabled {
        lights.tile(ALARM_LIGHT, 60.0, RED, 0.01 + 0.10 * warn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::BLACK;

    fn brightness(c: &Canvas) -> u64 {
        c.data().iter().map(|&b| b as u64).sum()
    }

    fn lit(toggles: &Toggles, view: View) -> u64 {
        let mut c = Canvas::new(400, 224).unwrap();
        c.clear(BLACK);
        draw_lighting(&mut c, toggles, view, &FrameParams::derive(0.3, 0.5, 1.0));
        brightness(&c)
    }

    #[test]
    fn test_warning_levels() {
        let mut toggles = Toggles::default();
        assert!(warning_level(&toggles, 1.0, 0.0) < 0.2);
        toggles.console_armed = true;
        assert!((warning_level(&toggles, 1.0, 0.0) - 1.0).abs() < 1e-6);
        toggles.alarm_enabled = true;
        assert!((warning_level(&toggles, 0.0, 0.0) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_overhead_lights_add_light() {
        // Entry room, under the first lamp
        let view = View { x: 120, y: 112 };
        let on = Toggles::default();
        let off = Toggles {
            overhead_lights: false,
            ..Toggles::default()
        };
        assert!(lit(&on, view) > lit(&off, view));
    }

    #[test]
    fn test_extinguished_torch_drops_its_pool() {
        let (wx, wy) = TORCHES[1];
        let view = View {
            x: wx as i32 - 200,
            y: wy as i32 - 112,
        };
        let lit_all = Toggles::default();
        let mut dark = Toggles::default();
        dark.torches_lit[1] = false;
        assert!(lit(&lit_all, view) > lit(&dark, view));
    }
}
