//! Tile painters, one per tile kind
//!
//! The table is indexed by `Tile::index()` so adding a kind means adding a
//! row here; the scene pass never matches on tile kinds itself.

use hwt_world::{Tile, Toggles};

use crate::canvas::Canvas;
use crate::palette::{AMBER, BLACK, EMBER, GROUT, NAVY, RED, STEEL0, STEEL1, STEEL2, STEEL3, WHITE};

const T: i32 = 16;

/// Everything a painter may look at
pub struct TileCtx<'a> {
    /// Screen position of the tile's top-left corner
    pub sx: i32,
    pub sy: i32,
    /// Tile coordinates, for pattern variation
    pub tx: i32,
    pub ty: i32,
    pub glow: f32,
    pub toggles: &'a Toggles,
}

impl TileCtx<'_> {
    fn pattern(&self, modulus: i32) -> bool {
        (self.tx + self.ty).rem_euclid(modulus) == 0
    }
}

pub type TilePainter = fn(&mut Canvas, &TileCtx);

/// Painters indexed by tile kind
pub const PAINTERS: [TilePainter; Tile::COUNT] = [
    paint_floor, // Floor
    paint_wall,  // Wall
    paint_grate, // Grate
    paint_tank,  // Tank
    paint_pipe,  // Pipe
    paint_panel, // Panel
    paint_vent,  // Vent
    paint_gate,  // Gate
];

/// Draw one tile through the table
pub fn paint_tile(canvas: &mut Canvas, tile: Tile, ctx: &TileCtx) {
    PAINTERS[tile.index()](canvas, ctx);
}

fn paint_deck(c: &mut Canvas, ctx: &TileCtx, grate: bool) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, if grate { STEEL0 } else { STEEL1 });
    c.fill_solid(sx, sy + T - 2, T, 2, GROUT);
    if grate {
        for x in (2..T).step_by(5) {
            c.fill_solid(sx + x, sy + 3, 1, T - 6, STEEL2);
        }
        c.fill_solid(sx + 2, sy + 3, T - 4, 1, STEEL1);
        c.fill_solid(sx + 2, sy + T - 4, T - 4, 1, STEEL1);
    }
    if ctx.pattern(7) {
        c.fill(sx + 2, sy + 2, 1, 1, WHITE, 0.05);
    }
}

fn paint_floor(c: &mut Canvas, ctx: &TileCtx) {
    paint_deck(c, ctx, false);
}

fn paint_grate(c: &mut Canvas, ctx: &TileCtx) {
    paint_deck(c, ctx, true);
}

fn paint_wall(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, NAVY);
    c.fill_solid(sx, sy, T, 3, STEEL2);
    c.fill_solid(sx, sy + 3, T, T - 3, STEEL1);
    if (ctx.tx * 13 + ctx.ty * 7).rem_euclid(11) == 0 {
        c.fill(sx + 3, sy + 6, 1, 3, WHITE, 0.05);
    }
}

fn paint_pipe(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, STEEL1);
    c.fill_solid(sx + 3, sy + 6, T - 6, 4, STEEL3);
    c.fill(sx + 4, sy + 7, T - 8, 1, WHITE, 0.12);
    if ctx.pattern(5) {
        let p = 0.4 + 0.6 * ctx.glow;
        c.fill(sx + 3, sy + 5, T - 6, 6, RED, 0.08 * p);
    }
}

fn paint_panel(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, STEEL0);
    c.fill_solid(sx + 2, sy + 2, T - 4, T - 4, STEEL2);
    let pulse = if ctx.toggles.console_armed { 0.35 + 0.65 * ctx.glow } else { 0.12 };
    let led = 0.12 + 0.22 * pulse;
    if ctx.pattern(2) {
        c.fill(sx + 4, sy + 5, 2, 2, AMBER, led);
    }
    if ctx.pattern(3) {
        c.fill(sx + 9, sy + 8, 2, 2, AMBER, led);
    }
    if ctx.pattern(4) {
        c.fill(sx + 6, sy + 10, 3, 1, RED, 0.08 + 0.16 * ctx.glow);
    }
}

fn paint_vent(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, STEEL1);
    c.fill_solid(sx + 3, sy + 3, T - 6, T - 6, STEEL2);
    for x in (4..T - 4).step_by(2) {
        c.fill(sx + x, sy + 5, 1, T - 10, BLACK, 0.35);
    }
    let p = if ctx.toggles.steam_enabled { 0.2 + 0.8 * ctx.glow } else { 0.1 };
    c.fill(sx + 3, sy + 3, T - 6, 1, RED, 0.08 * p);
}

fn paint_gate(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, STEEL0);
    c.fill_solid(sx + 4, sy + 2, T - 8, T - 4, STEEL2);
    c.fill(sx + 7, sy + 3, 2, T - 6, BLACK, 0.4);
    let warn = 0.2 + 0.8 * ctx.glow;
    c.fill(sx + 4, sy + 2, T - 8, 2, RED, 0.12 * warn);
}

fn paint_tank(c: &mut Canvas, ctx: &TileCtx) {
    let (sx, sy) = (ctx.sx, ctx.sy);
    c.fill_solid(sx, sy, T, T, STEEL1);
    c.fill_solid(sx + 1, sy + 1, T - 2, T - 2, STEEL2);
    c.fill(sx + 3, sy + 3, 1, T - 6, WHITE, 0.08);
    c.fill(sx + 6, sy + 3, 1, T - 6, WHITE, 0.08);
    if ctx.pattern(6) {
        let hot = 0.2 + 0.8 * ctx.glow;
        c.fill(sx + 9, sy + 10, 4, 2, EMBER, 0.06 + 0.18 * hot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(toggles: &Toggles) -> TileCtx<'_> {
        TileCtx {
            sx: 0,
            sy: 0,
            tx: 0,
            ty: 0,
            glow: 0.5,
            toggles,
        }
    }

    #[test]
    fn test_every_kind_paints_its_cell() {
        let toggles = Toggles::default();
        for tile in Tile::ALL {
            let mut canvas = Canvas::new(16, 16).unwrap();
            paint_tile(&mut canvas, tile, &ctx(&toggles));
            // Every painter lays an opaque base
            assert_eq!(canvas.pixel(0, 0)[3], 255, "{:?}", tile);
            assert_eq!(canvas.pixel(15, 15)[3], 255, "{:?}", tile);
        }
    }

    #[test]
    fn test_grate_differs_from_floor() {
        let toggles = Toggles::default();
        let mut floor = Canvas::new(16, 16).unwrap();
        let mut grate = Canvas::new(16, 16).unwrap();
        paint_tile(&mut floor, Tile::Floor, &ctx(&toggles));
        paint_tile(&mut grate, Tile::Grate, &ctx(&toggles));
        assert_ne!(floor.data(), grate.data());
    }

    #[test]
    fn test_armed_console_lights_panels() {
        let idle = Toggles::default();
        let armed = Toggles {
            console_armed: true,
            ..Toggles::default()
        };
        let mut a = Canvas::new(16, 16).unwrap();
        let mut b = Canvas::new(16, 16).unwrap();
        paint_tile(&mut a, Tile::Panel, &ctx(&idle));
        paint_tile(&mut b, Tile::Panel, &ctx(&armed));
        assert!(b.pixel(4, 5)[0] > a.pixel(4, 5)[0]);
    }
}
