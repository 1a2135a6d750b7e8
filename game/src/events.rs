use signal_bus::Channel;

use crate::game::{BombId, EnemyId, FlameKind};
use crate::position::Position;

/// Everything the simulation announces to the outside world. The world
/// buffers these during a tick; [`crate::game::Game`] drains them into the
/// bus. Nothing in the simulation depends on whether anyone listens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    GameStarted,
    StageCleared,
    GameOver,
    PlayerSpawned(Position),
    PlayerMoved(Position),
    PlayerDied(Position),
    BombPlaced(BombId, Position),
    BombExploded(BombId, Position),
    FlameSpawned(Position, FlameKind),
    BrickDestroyed(Position),
    EnemySpawned(EnemyId, Position),
    EnemyMoved(EnemyId, Position),
    EnemyDied(EnemyId, Position),
    ScoreChanged(u32),
}

/// The session's notification fan-out: one typed channel per event kind,
/// fixed at compile time. Constructed explicitly and passed by reference —
/// two sessions never share listeners.
#[derive(Default)]
pub struct EventBus {
    pub game_started: Channel<()>,
    pub stage_cleared: Channel<()>,
    pub game_over: Channel<()>,
    pub player_spawned: Channel<Position>,
    pub player_moved: Channel<Position>,
    pub player_died: Channel<Position>,
    pub bomb_placed: Channel<(BombId, Position)>,
    pub bomb_exploded: Channel<(BombId, Position)>,
    pub flame_spawned: Channel<(Position, FlameKind)>,
    pub brick_destroyed: Channel<Position>,
    pub enemy_spawned: Channel<(EnemyId, Position)>,
    pub enemy_moved: Channel<(EnemyId, Position)>,
    pub enemy_died: Channel<(EnemyId, Position)>,
    pub score_changed: Channel<u32>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one event to its channel's listeners, in attachment order.
    pub fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => self.game_started.publish(&()),
            GameEvent::StageCleared => self.stage_cleared.publish(&()),
            GameEvent::GameOver => self.game_over.publish(&()),
            GameEvent::PlayerSpawned(pos) => self.player_spawned.publish(pos),
            GameEvent::PlayerMoved(pos) => self.player_moved.publish(pos),
            GameEvent::PlayerDied(pos) => self.player_died.publish(pos),
            GameEvent::BombPlaced(id, pos) => self.bomb_placed.publish(&(*id, *pos)),
            GameEvent::BombExploded(id, pos) => self.bomb_exploded.publish(&(*id, *pos)),
            GameEvent::FlameSpawned(pos, kind) => self.flame_spawned.publish(&(*pos, *kind)),
            GameEvent::BrickDestroyed(pos) => self.brick_destroyed.publish(pos),
            GameEvent::EnemySpawned(id, pos) => self.enemy_spawned.publish(&(*id, *pos)),
            GameEvent::EnemyMoved(id, pos) => self.enemy_moved.publish(&(*id, *pos)),
            GameEvent::EnemyDied(id, pos) => self.enemy_died.publish(&(*id, *pos)),
            GameEvent::ScoreChanged(score) => self.score_changed.publish(score),
        }
    }

    /// Detach every listener from every channel. Reserved for full session
    /// teardown, never called mid-game.
    pub fn reset_all(&mut self) {
        self.game_started.clear();
        self.stage_cleared.clear();
        self.game_over.clear();
        self.player_spawned.clear();
        self.player_moved.clear();
        self.player_died.clear();
        self.bomb_placed.clear();
        self.bomb_exploded.clear();
        self.flame_spawned.clear();
        self.brick_destroyed.clear();
        self.enemy_spawned.clear();
        self.enemy_moved.clear();
        self.enemy_died.clear();
        self.score_changed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn dispatch_routes_to_the_matching_channel() {
        let mut bus = EventBus::new();
        let bricks = Rc::new(Cell::new(0));
        let scores = Rc::new(Cell::new(0));
        let seen_bricks = Rc::clone(&bricks);
        bus.brick_destroyed
            .subscribe(move |_| seen_bricks.set(seen_bricks.get() + 1));
        let seen_scores = Rc::clone(&scores);
        bus.score_changed
            .subscribe(move |s| seen_scores.set(*s));

        bus.dispatch(&GameEvent::BrickDestroyed(Position::new(3, 4)));
        bus.dispatch(&GameEvent::ScoreChanged(200));

        assert_eq!(bricks.get(), 1);
        assert_eq!(scores.get(), 200);
    }

    #[test]
    fn reset_all_silences_every_channel() {
        let mut bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        bus.game_over.subscribe(move |_| seen.set(seen.get() + 1));

        bus.dispatch(&GameEvent::GameOver);
        bus.reset_all();
        bus.dispatch(&GameEvent::GameOver);

        assert_eq!(count.get(), 1);
    }
}
