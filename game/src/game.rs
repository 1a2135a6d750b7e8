use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, GameConfig, Timing};
use crate::direction::Dir4;
use crate::events::{EventBus, GameEvent};
use crate::grid::{CategorySet, Grid, Occupancy, Tile};
use crate::levels::Level;
use crate::position::Position;

mod bomb;
mod enemy;
mod flame;
mod lifecycle;
mod player;

pub use bomb::BombId;
pub use enemy::EnemyId;
pub use flame::FlameKind;

use bomb::Bomb;
use enemy::Enemy;
use flame::Flame;
use lifecycle::Lifecycle;
use player::Player;

/// Categories that block an actor trying to step into a cell.
pub(crate) const MOVE_BLOCKERS: CategorySet = CategorySet::WALL
    .union(CategorySet::BRICK)
    .union(CategorySet::BOMB);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayState {
    Playing,
    Won,
    GameOver,
}

/// Player commands. How these are produced (keyboard, gamepad, a bot) is
/// the caller's business.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Move(Dir4),
    PlaceBomb,
}

/// Full simulation state for one stage. Everything advances on
/// [`World::tick`]; nothing here knows about rendering or input devices.
pub struct World {
    grid: Grid,
    bricks: HashMap<Position, Lifecycle>,
    bombs: Vec<Bomb>,
    flames: Vec<Flame>,
    player: Player,
    enemies: Vec<Enemy>,
    config: GameConfig,
    timing: Timing,
    rng: StdRng,
    score: u32,
    had_enemies: bool,
    announced: Option<PlayState>,
    next_bomb_id: u32,
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(level: &Level, config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let timing = config.timing();
        let mut rng = StdRng::seed_from_u64(seed);

        let bricks: HashMap<Position, Lifecycle> = level
            .bricks
            .iter()
            .map(|&pos| (pos, Lifecycle::Alive))
            .collect();
        let player = Player {
            pos: level.player_spawn,
            facing: Dir4::South,
            life: Lifecycle::Alive,
        };

        let mut events = vec![
            GameEvent::GameStarted,
            GameEvent::PlayerSpawned(level.player_spawn),
        ];
        let enemies: Vec<Enemy> = level
            .enemy_spawns
            .iter()
            .enumerate()
            .map(|(i, &pos)| {
                let id = EnemyId(i as u32);
                events.push(GameEvent::EnemySpawned(id, pos));
                Enemy::spawn(id, pos, &timing, &mut rng)
            })
            .collect();

        log::info!(
            "starting {:?}: {}x{}, {} bricks, {} enemies",
            level.name,
            level.grid.width(),
            level.grid.height(),
            bricks.len(),
            enemies.len()
        );

        Ok(Self {
            grid: level.grid.clone(),
            bricks,
            bombs: Vec::new(),
            flames: Vec::new(),
            player,
            had_enemies: !enemies.is_empty(),
            enemies,
            config,
            timing,
            rng,
            score: 0,
            announced: None,
            next_bomb_id: 0,
            events,
        })
    }

    /// Classify a cell under an obstruction mask.
    ///
    /// The answer is derived from the wall grid, the brick map and the bomb
    /// list at the instant of the call; nothing is cached. A dying brick
    /// still blocks until its removal frees the cell.
    pub fn classify(&self, pos: Position, mask: CategorySet) -> Occupancy {
        if !pos.in_bounds(self.grid.bounds()) {
            return Occupancy::Obstacle;
        }
        if mask.contains(CategorySet::WALL) && self.grid.at(pos) == Tile::Wall {
            return Occupancy::Obstacle;
        }
        if mask.contains(CategorySet::BRICK) && self.bricks.contains_key(&pos) {
            return Occupancy::Destructible;
        }
        if mask.contains(CategorySet::BOMB) && self.bombs.iter().any(|b| b.pos == pos) {
            return Occupancy::Obstacle;
        }
        Occupancy::Clear
    }

    /// Apply a player command immediately. Ignored once the player is no
    /// longer alive.
    pub fn apply_action(&mut self, action: Action) {
        self.do_player_action(action);
    }

    /// Advance one fixed simulation step. Order matters: detonations (with
    /// their full cascades) land before actors move, overlaps resolve
    /// before flame lifetimes count down, and removals happen last.
    pub fn tick(&mut self) {
        self.tick_fuses();
        self.tick_enemies();
        self.resolve_overlaps();
        self.tick_flames();
        self.sweep_bombs();
        self.tick_lifecycles();
        self.update_play_state();
    }

    /// Take all events buffered since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play_state(&self) -> PlayState {
        if !self.player.life.is_alive() {
            return PlayState::GameOver;
        }
        if self.had_enemies && self.enemies.is_empty() {
            return PlayState::Won;
        }
        PlayState::Playing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn player_position(&self) -> Position {
        self.player.pos
    }

    /// Live flame segments, for renderers and debugging overlays.
    pub fn flames(&self) -> impl Iterator<Item = (Position, FlameKind)> + '_ {
        self.flames.iter().map(|f| (f.pos, f.kind))
    }

    fn tick_lifecycles(&mut self) {
        let mut freed = Vec::new();
        for (&pos, life) in self.bricks.iter_mut() {
            if life.advance() {
                freed.push(pos);
            }
        }
        for pos in freed {
            self.bricks.remove(&pos);
        }

        for enemy in &mut self.enemies {
            enemy.life.advance();
        }
        self.enemies.retain(|e| !e.life.is_removed());

        self.player.life.advance();
    }

    /// Latch the terminal state and announce it exactly once.
    fn update_play_state(&mut self) {
        let state = self.play_state();
        if state == PlayState::Playing || self.announced.is_some() {
            return;
        }
        self.announced = Some(state);
        match state {
            PlayState::Won => {
                log::info!("stage cleared with score {}", self.score);
                self.events.push(GameEvent::StageCleared);
            }
            PlayState::GameOver => {
                log::info!("game over with score {}", self.score);
                self.events.push(GameEvent::GameOver);
            }
            PlayState::Playing => unreachable!(),
        }
    }
}

/// A session: the world plus the bus its notifications fan out on.
pub struct Game {
    pub world: World,
    pub bus: EventBus,
}

impl Game {
    pub fn new(level: &Level, config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            world: World::new(level, config, seed)?,
            bus: EventBus::new(),
        })
    }

    pub fn apply(&mut self, action: Action) {
        self.world.apply_action(action);
    }

    /// One fixed step: advance the world, then fan its events out to
    /// listeners. Spawn events buffered at construction go out on the
    /// first tick, after callers have had a chance to subscribe.
    pub fn tick(&mut self) {
        self.world.tick();
        for event in self.world.drain_events() {
            self.bus.dispatch(&event);
        }
    }

    pub fn play_state(&self) -> PlayState {
        self.world.play_state()
    }
}
