//! HWT World - the boiler room simulation
//!
//! Tile grid and layout, the player with tile collision, interactable
//! fixtures and their toggles, dust and steam particles, and the follow
//! camera. Everything advances through [`World::tick`], driven by the
//! beat detector's [`hwt_analysis::BeatSignal`].

mod camera;
mod interact;
mod layout;
mod particles;
mod player;
mod tile;
mod toggles;
mod world;

pub use camera::Camera;
pub use interact::{Interactable, Target, INTERACT_RADIUS};
pub use layout::{vent_center, GATE, TORCHES, TORCH_COUNT, VENTS};
pub use particles::{gust, Dust, DustField, SteamPuff, SteamSystem, DUST_COUNT};
pub use player::{Body, Facing, MoveIntent, Player, PLAYER_SPEED};
pub use tile::{Tile, TileMap, TileRect};
pub use toggles::Toggles;
pub use world::{TickInput, World, WorldEvent};

/// Edge length of a tile in world pixels
pub const TILE_SIZE: f32 = 16.0;

/// Map size in tiles
pub const MAP_WIDTH: usize = 96;
pub const MAP_HEIGHT: usize = 64;

/// World size in pixels
pub const WORLD_WIDTH: f32 = MAP_WIDTH as f32 * TILE_SIZE;
pub const WORLD_HEIGHT: f32 = MAP_HEIGHT as f32 * TILE_SIZE;

/// Internal render resolution, which is also the camera viewport
pub const VIEW_WIDTH: u32 = 400;
pub const VIEW_HEIGHT: u32 = 224;
