use csv::ReaderBuilder;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::direction::Dir4;
use crate::grid::{Grid, Tile};
use crate::position::Position;

const MIN_SIDE: usize = 5;

/// A playable stage: static terrain plus the initial dynamic placements.
#[derive(Clone)]
pub struct Level {
    pub name: String,
    pub grid: Grid,
    pub bricks: Vec<Position>,
    pub player_spawn: Position,
    pub enemy_spawns: Vec<Position>,
}

/// Knobs for [`generate`]. Loadable from JSON alongside [`crate::config::GameConfig`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Chance of a brick on each eligible floor cell.
    pub brick_chance: f64,
    pub player_spawn: Position,
    /// Empty means: the three corners away from the player spawn.
    pub enemy_spawns: Vec<Position>,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            name: "stage 1".to_string(),
            width: 15,
            height: 13,
            brick_chance: 0.3,
            player_spawn: Position::new(1, 1),
            enemy_spawns: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid layout: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown layout symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: String, x: usize, y: usize },
    #[error("layout has no player spawn")]
    MissingPlayerSpawn,
    #[error("level must be at least {MIN_SIDE}x{MIN_SIDE} cells")]
    TooSmall,
    #[error("brick_chance must be within 0.0..=1.0, got {0}")]
    BadBrickChance(f64),
}

/// Build a classic layout: perimeter walls, pillar walls on even/even
/// cells, bricks scattered over the remaining floor. Spawn cells and their
/// orthogonal neighbors are kept brick-free so nobody starts walled in.
pub fn generate(params: &LevelParams, rng: &mut impl Rng) -> Result<Level, LevelError> {
    if params.width < MIN_SIDE || params.height < MIN_SIDE {
        return Err(LevelError::TooSmall);
    }
    if !(0.0..=1.0).contains(&params.brick_chance) {
        return Err(LevelError::BadBrickChance(params.brick_chance));
    }
    let (width, height) = (params.width, params.height);

    let enemy_spawns = if params.enemy_spawns.is_empty() {
        vec![
            Position::new(width as i32 - 2, 1),
            Position::new(1, height as i32 - 2),
            Position::new(width as i32 - 2, height as i32 - 2),
        ]
    } else {
        params.enemy_spawns.clone()
    };

    let tiles: Vec<Vec<Tile>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
                    let pillar = x % 2 == 0 && y % 2 == 0;
                    if border || pillar { Tile::Wall } else { Tile::Floor }
                })
                .collect()
        })
        .collect();
    let grid = Grid::new(tiles);

    let mut safe: HashSet<Position> = HashSet::new();
    for &spawn in std::iter::once(&params.player_spawn).chain(&enemy_spawns) {
        safe.insert(spawn);
        for dir in Dir4::all() {
            safe.insert(spawn + dir.delta());
        }
    }

    let mut bricks = Vec::new();
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let pos = Position::new(x, y);
            if grid.at(pos) == Tile::Floor && !safe.contains(&pos) && rng.gen_bool(params.brick_chance)
            {
                bricks.push(pos);
            }
        }
    }

    log::debug!(
        "generated {:?}: {width}x{height}, {} bricks, {} enemy spawns",
        params.name,
        bricks.len(),
        enemy_spawns.len()
    );
    Ok(Level {
        name: params.name.clone(),
        grid,
        bricks,
        player_spawn: params.player_spawn,
        enemy_spawns,
    })
}

impl Level {
    /// Parse a handcrafted layout from CSV text.
    ///
    /// Symbols: `.` floor, `#` wall, `+` brick, `P` player spawn, `E` enemy
    /// spawn. Rows must all have the same length.
    pub fn from_csv(name: &str, csv_str: &str) -> Result<Self, LevelError> {
        let mut tiles: Vec<Vec<Tile>> = Vec::new();
        let mut bricks = Vec::new();
        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(csv_str.as_bytes());

        for (y, result) in reader.records().enumerate() {
            let record = result?;
            let mut row = Vec::new();
            for (x, field) in record.iter().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let tile = match field.trim() {
                    "." => Tile::Floor,
                    "#" => Tile::Wall,
                    "+" => {
                        bricks.push(pos);
                        Tile::Floor
                    }
                    "P" => {
                        player_spawn = Some(pos);
                        Tile::Floor
                    }
                    "E" => {
                        enemy_spawns.push(pos);
                        Tile::Floor
                    }
                    other => {
                        return Err(LevelError::UnknownSymbol {
                            symbol: other.to_string(),
                            x,
                            y,
                        });
                    }
                };
                row.push(tile);
            }
            tiles.push(row);
        }

        Ok(Self {
            name: name.to_string(),
            grid: Grid::new(tiles),
            bricks,
            player_spawn: player_spawn.ok_or(LevelError::MissingPlayerSpawn)?,
            enemy_spawns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_all_symbols() {
        let level = Level::from_csv("t", "#,#,#\nP,+,E\n#,.,#").unwrap();
        assert_eq!(level.player_spawn, Position::new(0, 1));
        assert_eq!(level.enemy_spawns, vec![Position::new(2, 1)]);
        assert_eq!(level.bricks, vec![Position::new(1, 1)]);
        assert_eq!(level.grid.at(Position::new(1, 0)), Tile::Wall);
        assert_eq!(level.grid.at(Position::new(1, 2)), Tile::Floor);
    }

    #[test]
    fn layout_without_player_is_rejected() {
        assert!(matches!(
            Level::from_csv("t", ".,.\n.,."),
            Err(LevelError::MissingPlayerSpawn)
        ));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert!(matches!(
            Level::from_csv("t", "P,?"),
            Err(LevelError::UnknownSymbol { x: 1, y: 0, .. })
        ));
    }

    #[test]
    fn generated_layout_has_walls_and_safe_spawns() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = LevelParams {
            brick_chance: 1.0,
            ..LevelParams::default()
        };
        let level = generate(&params, &mut rng).unwrap();

        // Perimeter and pillars.
        assert_eq!(level.grid.at(Position::new(0, 0)), Tile::Wall);
        assert_eq!(level.grid.at(Position::new(14, 12)), Tile::Wall);
        assert_eq!(level.grid.at(Position::new(2, 2)), Tile::Wall);
        assert_eq!(level.grid.at(Position::new(1, 2)), Tile::Floor);

        // Even at 100% brick chance the spawn zones stay clear.
        for spawn in std::iter::once(level.player_spawn).chain(level.enemy_spawns.iter().copied())
        {
            assert!(!level.bricks.contains(&spawn));
            for dir in Dir4::all() {
                assert!(!level.bricks.contains(&(spawn + dir.delta())));
            }
        }

        // And everything else is bricked over.
        assert!(!level.bricks.is_empty());
    }

    #[test]
    fn undersized_level_is_rejected() {
        let params = LevelParams {
            width: 3,
            ..LevelParams::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(generate(&params, &mut rng), Err(LevelError::TooSmall)));
    }
}
