//! Tile kinds and the tile grid

/// Kind of a single map cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Floor = 0,
    Wall = 1,
    Grate = 2,
    Tank = 3,
    Pipe = 4,
    Panel = 5,
    Vent = 6,
    Gate = 7,
}

impl Tile {
    pub const COUNT: usize = 8;

    pub const ALL: [Tile; Self::COUNT] = [
        Tile::Floor,
        Tile::Wall,
        Tile::Grate,
        Tile::Tank,
        Tile::Pipe,
        Tile::Panel,
        Tile::Vent,
        Tile::Gate,
    ];

    /// Whether bodies collide with this tile
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall | Tile::Tank | Tile::Pipe | Tile::Panel | Tile::Gate)
    }

    /// Dense index, usable for per-kind lookup tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Rectangle in tile coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl TileRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Tile coordinates covered by the rectangle, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let Self { x, y, w, h } = *self;
        (y..y + h).flat_map(move |ty| (x..x + w).map(move |tx| (tx, ty)))
    }
}

/// Fixed-size grid of tiles
///
/// Reads outside the grid report `Tile::Wall`, writes outside are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map filled with `fill`
    pub fn new(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return None;
        }
        Some(ty as usize * self.width + tx as usize)
    }

    pub fn get(&self, tx: i32, ty: i32) -> Tile {
        self.index(tx, ty).map_or(Tile::Wall, |i| self.tiles[i])
    }

    pub fn set(&mut self, tx: i32, ty: i32, tile: Tile) {
        if let Some(i) = self.index(tx, ty) {
            self.tiles[i] = tile;
        }
    }

    pub fn is_solid_at(&self, tx: i32, ty: i32) -> bool {
        self.get(tx, ty).is_solid()
    }

    pub fn fill_rect(&mut self, rect: TileRect, tile: Tile) {
        for (tx, ty) in rect.cells() {
            self.set(tx, ty, tile);
        }
    }

    /// Floor the rectangle and ring it with walls
    pub fn carve_room(&mut self, rect: TileRect) {
        self.fill_rect(rect, Tile::Floor);
        let TileRect { x, y, w, h } = rect;
        for tx in x..x + w {
            self.set(tx, y, Tile::Wall);
            self.set(tx, y + h - 1, Tile::Wall);
        }
        for ty in y..y + h {
            self.set(x, ty, Tile::Wall);
            self.set(x + w - 1, ty, Tile::Wall);
        }
    }

    /// Copy of the tiles inside `rect`, row by row
    pub fn region(&self, rect: TileRect) -> Vec<Tile> {
        rect.cells().map(|(tx, ty)| self.get(tx, ty)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_as_wall() {
        let map = TileMap::new(4, 3, Tile::Floor);
        assert_eq!(map.get(-1, 0), Tile::Wall);
        assert_eq!(map.get(0, 3), Tile::Wall);
        assert_eq!(map.get(3, 2), Tile::Floor);
        assert!(map.is_solid_at(4, 0));
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut map = TileMap::new(2, 2, Tile::Grate);
        let before = map.clone();
        map.set(5, 5, Tile::Tank);
        map.set(-1, 0, Tile::Tank);
        assert_eq!(map, before);
    }

    #[test]
    fn test_carve_room_rings_walls() {
        let mut map = TileMap::new(6, 5, Tile::Grate);
        map.carve_room(TileRect::new(1, 1, 4, 3));
        assert_eq!(map.get(1, 1), Tile::Wall);
        assert_eq!(map.get(4, 3), Tile::Wall);
        assert_eq!(map.get(2, 2), Tile::Floor);
        assert_eq!(map.get(0, 0), Tile::Grate);
    }

    #[test]
    fn test_solid_kinds() {
        let solid: Vec<Tile> = Tile::ALL.iter().copied().filter(|t| t.is_solid()).collect();
        assert_eq!(solid, vec![Tile::Wall, Tile::Tank, Tile::Pipe, Tile::Panel, Tile::Gate]);
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, tile) in Tile::ALL.iter().enumerate() {
            assert_eq!(tile.index(), i);
        }
    }
}
