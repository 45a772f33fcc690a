//! HWT Render - the audio-reactive compositor
//!
//! [`Modulation`] turns the beat detector's output into per-frame
//! parameters, [`Compositor`] runs the raster passes over the world, and
//! [`Engine`] ties source, detector, world and compositor into one tick.

mod canvas;
mod compositor;
mod debug;
mod engine;
mod lighting;
mod modulation;
mod palette;
mod present;
mod sprites;
mod tiles;
mod warp;

pub use canvas::{Canvas, RenderError};
pub use compositor::Compositor;
pub use debug::readout;
pub use engine::{Engine, TickOutcome, MAX_DT};
pub use modulation::{FrameParams, Modulation};
pub use palette::Rgb;
pub use present::{present, PresentLayout, Surface};
pub use tiles::{paint_tile, TileCtx, TilePainter, PAINTERS};
pub use warp::{band_offset, punch_zoom, scanline_warp, WARP_BAND};

/// Internal render resolution
pub const INTERNAL_WIDTH: u32 = hwt_world::VIEW_WIDTH;
pub const INTERNAL_HEIGHT: u32 = hwt_world::VIEW_HEIGHT;
