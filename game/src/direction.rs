use crate::position::PositionDelta;

/// Cardinal directions on the cell grid. `+y` points down (row order).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir4 {
    North,
    South,
    East,
    West,
}

impl Dir4 {
    pub fn delta(self) -> PositionDelta {
        match self {
            Dir4::North => PositionDelta::new(0, -1),
            Dir4::South => PositionDelta::new(0, 1),
            Dir4::East => PositionDelta::new(1, 0),
            Dir4::West => PositionDelta::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Dir4 {
        match self {
            Dir4::North => Dir4::South,
            Dir4::South => Dir4::North,
            Dir4::East => Dir4::West,
            Dir4::West => Dir4::East,
        }
    }

    pub fn all() -> [Self; 4] {
        [Dir4::North, Dir4::South, Dir4::East, Dir4::West]
    }
}
