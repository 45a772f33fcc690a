//! Boiler room layout: chambers, tank hall, gate and fixture positions

use crate::tile::{Tile, TileMap, TileRect};
use crate::{MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};

/// Narrow corridor between the main hall and the tank hall
pub const GATE: TileRect = TileRect::new(61, 28, 2, 4);

/// Steam vents (tile coordinates)
pub const VENTS: [(i32, i32); 4] = [(52, 36), (78, 34), (24, 44), (12, 48)];

/// Wall torches (world pixels, top-left of the 16x16 fixture)
pub const TORCHES: [(f32, f32); 5] = [
    (6.0 * TILE_SIZE + 4.0, 6.0 * TILE_SIZE + 2.0),
    (33.0 * TILE_SIZE + 4.0, 8.0 * TILE_SIZE + 2.0),
    (44.0 * TILE_SIZE + 4.0, 6.0 * TILE_SIZE + 2.0),
    (58.0 * TILE_SIZE + 4.0, 24.0 * TILE_SIZE + 2.0),
    (52.0 * TILE_SIZE + 4.0, 40.0 * TILE_SIZE + 2.0),
];

pub const TORCH_COUNT: usize = TORCHES.len();

/// World-space centre of a vent
pub fn vent_center(vent: (i32, i32)) -> (f32, f32) {
    (
        (vent.0 as f32 + 0.5) * TILE_SIZE,
        (vent.1 as f32 + 0.5) * TILE_SIZE,
    )
}

/// Build the boiler room: four connected chambers around a hot water tank
pub fn boiler_room() -> TileMap {
    let w = MAP_WIDTH as i32;
    let h = MAP_HEIGHT as i32;
    let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT, Tile::Grate);

    map.fill_rect(TileRect::new(0, 0, w, 1), Tile::Wall);
    map.fill_rect(TileRect::new(0, h - 1, w, 1), Tile::Wall);
    map.fill_rect(TileRect::new(0, 0, 1, h), Tile::Wall);
    map.fill_rect(TileRect::new(w - 1, 0, 1, h), Tile::Wall);

    map.carve_room(TileRect::new(3, 3, 34, 22)); // entry / panels
    map.carve_room(TileRect::new(37, 3, 56, 26)); // main hall
    map.carve_room(TileRect::new(8, 25, 40, 30)); // furnace wing
    map.carve_room(TileRect::new(48, 30, 42, 28)); // tank hall

    // Doorways
    map.fill_rect(TileRect::new(36, 12, 2, 4), Tile::Floor);
    map.fill_rect(TileRect::new(22, 24, 4, 2), Tile::Floor);
    map.fill_rect(GATE, Tile::Gate);

    // Pipes along walls
    for x in (5..34).step_by(3) {
        map.set(x, 5, Tile::Pipe);
    }
    for x in (40..90).step_by(4) {
        map.set(x, 6, Tile::Pipe);
    }
    for y in (8..24).step_by(3) {
        map.set(5, y, Tile::Pipe);
    }
    for y in (34..56).step_by(4) {
        map.set(89, y, Tile::Pipe);
    }

    // Control panels
    map.fill_rect(TileRect::new(10, 8, 6, 2), Tile::Panel);
    map.fill_rect(TileRect::new(14, 16, 4, 2), Tile::Panel);
    map.fill_rect(TileRect::new(28, 10, 6, 2), Tile::Panel);

    // Furnace block
    map.fill_rect(TileRect::new(15, 34, 10, 8), Tile::Wall);
    map.fill_rect(TileRect::new(18, 36, 4, 4), Tile::Panel);

    // Hot water tank with its pipework
    map.fill_rect(TileRect::new(62, 38, 12, 10), Tile::Tank);
    map.fill_rect(TileRect::new(64, 36, 8, 2), Tile::Pipe);
    map.fill_rect(TileRect::new(60, 49, 16, 2), Tile::Pipe);

    for &(tx, ty) in &VENTS {
        map.set(tx, ty, Tile::Vent);
    }

    map
}

/// Write the gate region open (floor) or closed (gate)
pub fn set_gate(map: &mut TileMap, open: bool) {
    map.fill_rect(GATE, if open { Tile::Floor } else { Tile::Gate });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_solid() {
        let map = boiler_room();
        for x in 0..MAP_WIDTH as i32 {
            assert!(map.is_solid_at(x, 0));
            assert!(map.is_solid_at(x, MAP_HEIGHT as i32 - 1));
        }
        for y in 0..MAP_HEIGHT as i32 {
            assert!(map.is_solid_at(0, y));
            assert!(map.is_solid_at(MAP_WIDTH as i32 - 1, y));
        }
    }

    #[test]
    fn test_gate_starts_closed() {
        let map = boiler_room();
        assert!(map.region(GATE).iter().all(|&t| t == Tile::Gate));
    }

    #[test]
    fn test_gate_round_trip_restores_tiles() {
        let mut map = boiler_room();
        let original = map.clone();
        set_gate(&mut map, true);
        assert!(map.region(GATE).iter().all(|&t| t == Tile::Floor));
        set_gate(&mut map, false);
        assert_eq!(map, original);
    }

    #[test]
    fn test_vents_are_placed() {
        let map = boiler_room();
        for &(tx, ty) in &VENTS {
            assert_eq!(map.get(tx, ty), Tile::Vent);
        }
    }

    #[test]
    fn test_spawn_is_walkable() {
        let map = boiler_room();
        // Player spawns around tile (8, 10)
        assert!(!map.is_solid_at(8, 10));
        assert!(!map.is_solid_at(8, 11));
        assert!(!map.is_solid_at(9, 10));
    }
}
