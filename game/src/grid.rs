use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::position::Position;

/// Static terrain. Anything dynamic (bricks, bombs, actors) lives in the
/// world's occupancy index, not in the tile array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Wall,
}

bitflags! {
    /// Occupant categories an obstruction mask can select.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CategorySet: u8 {
        const WALL = 1;
        const BRICK = 1 << 1;
        const BOMB = 1 << 2;
    }
}

// Masks serialize as flag names ("WALL | BRICK") so config files stay
// readable and reject unknown categories on load.
impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut repr = String::new();
        bitflags::parser::to_writer(self, &mut repr).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&repr)
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = String::deserialize(deserializer)?;
        bitflags::parser::from_str(&repr).map_err(serde::de::Error::custom)
    }
}

/// Three-way answer of an occupancy query under a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    Clear,
    /// A masked occupant that stops propagation cold (walls, pending bombs).
    Obstacle,
    /// A masked occupant that absorbs the blast (bricks).
    Destructible,
}

#[derive(Clone)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map(|r| r.len()).unwrap_or(0);
        for row in &tiles {
            assert_eq!(row.len(), width);
        }
        Self {
            tiles,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Out-of-bounds cells read as walls so nothing ever escapes the level.
    pub fn at(&self, pos: Position) -> Tile {
        if pos.in_bounds(self.bounds()) {
            self.tiles[pos.y as usize][pos.x as usize]
        } else {
            Tile::Wall
        }
    }
}
