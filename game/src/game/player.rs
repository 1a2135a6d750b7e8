use crate::direction::Dir4;
use crate::events::GameEvent;
use crate::grid::Occupancy;
use crate::position::Position;

use super::{Action, Lifecycle, MOVE_BLOCKERS, World};

pub(crate) struct Player {
    pub(crate) pos: Position,
    pub(crate) facing: Dir4,
    pub(crate) life: Lifecycle,
}

impl World {
    pub(crate) fn do_player_action(&mut self, action: Action) {
        if !self.player.life.is_alive() {
            return;
        }
        match action {
            Action::Move(dir) => self.move_player(dir),
            Action::PlaceBomb => self.place_bomb(),
        }
    }

    fn move_player(&mut self, dir: Dir4) {
        self.player.facing = dir;
        let candidate = self.player.pos + dir.delta();
        if self.classify(candidate, MOVE_BLOCKERS) != Occupancy::Clear {
            return;
        }
        self.player.pos = candidate;
        self.events.push(GameEvent::PlayerMoved(candidate));

        // Walking into a burning cell or an enemy is immediately fatal.
        if self.flame_at(candidate) {
            self.hit_player();
            return;
        }
        if self
            .enemies
            .iter()
            .any(|e| e.life.is_alive() && e.pos == candidate)
        {
            self.hit_player();
        }
    }

    /// Drop a bomb at the player's cell, subject to the simultaneous-bomb
    /// allowance. The player stands on it until they step off; the bomb
    /// then blocks re-entry like any other solid occupant.
    fn place_bomb(&mut self) {
        if self.armed_bomb_count() >= self.config.max_bombs as usize {
            return;
        }
        if self.bombs.iter().any(|b| b.pos == self.player.pos) {
            return;
        }
        self.spawn_bomb(self.player.pos);
    }

    pub(crate) fn hit_player(&mut self) {
        if self.player.life.hit(self.timing.dying) {
            self.events.push(GameEvent::PlayerDied(self.player.pos));
            log::info!(
                "player down at ({}, {})",
                self.player.pos.x,
                self.player.pos.y
            );
        }
    }
}
