//! Player body, movement intent and tile collision

use crate::tile::TileMap;
use crate::{TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH};

/// Movement speed in world pixels per second
pub const PLAYER_SPEED: f32 = 78.0;

/// Seconds per walk animation frame
const ANIM_FRAME_TIME: f32 = 0.12;
const ANIM_FRAMES: u8 = 2;

/// Direction the player sprite faces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Requested movement direction for one tick (e.g. from WASD)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    pub x: f32,
    pub y: f32,
}

impl MoveIntent {
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit direction; zero and non-finite intents yield no movement
    pub fn normalized(self) -> (f32, f32) {
        if !self.x.is_finite() || !self.y.is_finite() {
            return (0.0, 0.0);
        }
        let mag = self.x.hypot(self.y);
        if mag == 0.0 || !mag.is_finite() {
            return (0.0, 0.0);
        }
        (self.x / mag, self.y / mag)
    }
}

/// Axis-aligned box in world pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    fn tile_span(&self) -> (i32, i32, i32, i32) {
        let left = (self.x / TILE_SIZE).floor() as i32;
        let right = ((self.x + self.w - 1.0) / TILE_SIZE).floor() as i32;
        let top = (self.y / TILE_SIZE).floor() as i32;
        let bottom = ((self.y + self.h - 1.0) / TILE_SIZE).floor() as i32;
        (left, right, top, bottom)
    }

    /// Displace by (dx, dy), resolving X fully before Y
    ///
    /// Overlap with a solid tile snaps the box to the tile edge on the
    /// approach side. The box always ends one tile inside the world border.
    pub fn move_and_collide(&mut self, map: &TileMap, dx: f32, dy: f32) {
        if dx != 0.0 && dx.is_finite() {
            self.x += dx;
            let (left, right, top, bottom) = self.tile_span();
            for ty in top..=bottom {
                for tx in left..=right {
                    if !map.is_solid_at(tx, ty) {
                        continue;
                    }
                    let tile_x = tx as f32 * TILE_SIZE;
                    self.x = if dx > 0.0 { tile_x - self.w } else { tile_x + TILE_SIZE };
                }
            }
        }

        if dy != 0.0 && dy.is_finite() {
            self.y += dy;
            let (left, right, top, bottom) = self.tile_span();
            for ty in top..=bottom {
                for tx in left..=right {
                    if !map.is_solid_at(tx, ty) {
                        continue;
                    }
                    let tile_y = ty as f32 * TILE_SIZE;
                    self.y = if dy > 0.0 { tile_y - self.h } else { tile_y + TILE_SIZE };
                }
            }
        }

        self.x = self.x.clamp(TILE_SIZE, WORLD_WIDTH - TILE_SIZE - self.w);
        self.y = self.y.clamp(TILE_SIZE, WORLD_HEIGHT - TILE_SIZE - self.h);
    }
}

/// The controllable maintenance robot
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    anim_time: f32,
    anim_frame: u8,
}

impl Player {
    /// Spawn in the entry room
    pub fn spawn() -> Self {
        Self::at(8.0 * TILE_SIZE + 3.0, 10.0 * TILE_SIZE + 2.0)
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, 12.0, 12.0),
            facing: Facing::Down,
            anim_time: 0.0,
            anim_frame: 0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        self.body.center()
    }

    /// Current walk frame (0 or 1)
    pub fn anim_frame(&self) -> u8 {
        self.anim_frame
    }

    /// Apply one tick of movement
    pub fn step(&mut self, map: &TileMap, intent: MoveIntent, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let (mx, my) = intent.normalized();
        let dx = mx * PLAYER_SPEED * dt;
        let dy = my * PLAYER_SPEED * dt;

        if dx.abs() > 0.001 || dy.abs() > 0.001 {
            self.facing = if mx.abs() > my.abs() {
                if mx < 0.0 {
                    Facing::Left
                } else {
                    Facing::Right
                }
            } else if my < 0.0 {
                Facing::Up
            } else {
                Facing::Down
            };
            self.anim_time += dt;
            if self.anim_time > ANIM_FRAME_TIME {
                self.anim_time = 0.0;
                self.anim_frame = (self.anim_frame + 1) % ANIM_FRAMES;
            }
        } else {
            self.anim_time = 0.0;
            self.anim_frame = 0;
        }

        self.body.move_and_collide(map, dx, 0.0);
        self.body.move_and_collide(map, 0.0, dy);
    }
}
