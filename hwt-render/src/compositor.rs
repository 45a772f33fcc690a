//! Multi-pass compositor
//!
//! Passes run in a fixed order every frame:
//!
//! 1. scene (tiles, props, dust, steam, sparkles, player) on a shaken camera
//! 2. additive lighting
//! 3. ambient lift
//! 4. alarm wash (alarm armed only)
//! 5. scanline warp into the second buffer
//! 6. punch zoom into the third buffer
//!
//! Presentation onto an output surface is separate, see [`crate::present`].

use hwt_world::World;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{Canvas, RenderError};
use crate::lighting::draw_lighting;
use crate::modulation::FrameParams;
use crate::palette::{AMBIENT, RED, VOID};
use crate::present::{present, PresentLayout, Surface};
use crate::sprites::{draw_dust, draw_player, draw_props, draw_sparkles, draw_steam, View};
use crate::tiles::{paint_tile, TileCtx};
use crate::warp::{punch_zoom, scanline_warp};
use crate::{INTERNAL_HEIGHT, INTERNAL_WIDTH};

const TILE: i32 = hwt_world::TILE_SIZE as i32;

/// Owns the three internal render targets
pub struct Compositor {
    scene: Canvas,
    warped: Canvas,
    zoomed: Canvas,
    rng: SmallRng,
    view: View,
}

impl Compositor {
    pub fn new() -> Result<Self, RenderError> {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Reproducible shake and sparkle jitter
    pub fn with_seed(seed: u64) -> Result<Self, RenderError> {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Result<Self, RenderError> {
        Ok(Self {
            scene: Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT)?,
            warped: Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT)?,
            zoomed: Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT)?,
            rng,
            view: View::default(),
        })
    }

    /// Run every pass and return the finished internal frame
    pub fn render(&mut self, world: &World, p: &FrameParams) -> &Canvas {
        self.view = self.shaken_view(world);
        self.draw_scene(world, p);
        draw_lighting(&mut self.scene, world.toggles(), self.view, p);
        self.scene.wash(AMBIENT, p.lift(world.toggles().overhead_lights));
        if world.toggles().alarm_enabled {
            self.scene.wash(RED, p.alarm_flash());
        }
        scanline_warp(&self.scene, &mut self.warped, p.warp_strength, p.warp_phase);
        punch_zoom(&self.warped, &mut self.zoomed, p.zoom);
        &self.zoomed
    }

    /// Camera origin for this frame with a random shake offset
    fn shaken_view(&mut self, world: &World) -> View {
        let cam = world.camera();
        let shake = cam.shake.max(0.0);
        let jitter_x = (self.rng.random_range(-1.0f32..1.0) * shake).round() as i32;
        let jitter_y = (self.rng.random_range(-1.0f32..1.0) * shake).round() as i32;
        View {
            x: cam.x.round() as i32 + jitter_x,
            y: cam.y.round() as i32 + jitter_y,
        }
    }

    fn draw_scene(&mut self, world: &World, p: &FrameParams) {
        let view = self.view;
        let canvas = &mut self.scene;
        canvas.clear(VOID);

        let tx0 = view.x.div_euclid(TILE);
        let ty0 = view.y.div_euclid(TILE);
        let tx1 = (view.x + INTERNAL_WIDTH as i32 + TILE - 1).div_euclid(TILE);
        let ty1 = (view.y + INTERNAL_HEIGHT as i32 + TILE - 1).div_euclid(TILE);
        let map = world.map();
        for ty in ty0..=ty1 {
            for tx in tx0..=tx1 {
                let ctx = TileCtx {
                    sx: tx * TILE - view.x,
                    sy: ty * TILE - view.y,
                    tx,
                    ty,
                    glow: p.glow,
                    toggles: world.toggles(),
                };
                paint_tile(canvas, map.get(tx, ty), &ctx);
            }
        }

        draw_props(canvas, world, view, p);
        draw_dust(canvas, world.dust(), view, p, &mut self.rng);
        draw_steam(canvas, world.steam(), view);
        draw_sparkles(canvas, world, view, p.glow);
        draw_player(canvas, world.player(), view, p.glow);
    }

    /// Last finished frame
    pub fn frame(&self) -> &Canvas {
        &self.zoomed
    }

    /// Scene after lighting and washes, before warp and zoom
    pub fn scene(&self) -> &Canvas {
        &self.scene
    }

    pub fn present(&self, surface: &mut Surface) -> PresentLayout {
        present(&self.zoomed, surface)
    }
}
