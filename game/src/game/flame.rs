use crate::direction::Dir4;
use crate::events::GameEvent;
use crate::position::Position;

use super::{BombId, World};

/// Visual variant of a flame segment. Orientation data for renderers only;
/// propagation never reads it back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlameKind {
    Center,
    Arm(Dir4),
    ArmEnd(Dir4),
}

/// An ephemeral hit volume at one cell. No state beyond position, variant
/// and remaining lifetime; it removes itself when the lifetime elapses.
pub(crate) struct Flame {
    pub(crate) pos: Position,
    pub(crate) kind: FlameKind,
    pub(crate) remaining: u32,
}

impl World {
    /// Place a flame segment and queue any armed bomb under it for the
    /// current detonation pass — the chain-reaction trigger.
    pub(crate) fn spawn_flame(&mut self, pos: Position, kind: FlameKind, chain: &mut Vec<BombId>) {
        self.flames.push(Flame {
            pos,
            kind,
            remaining: self.timing.flame,
        });
        self.events.push(GameEvent::FlameSpawned(pos, kind));
        if let Some(bomb) = self.bombs.iter().find(|b| b.pos == pos && b.is_armed()) {
            chain.push(bomb.id);
        }
    }

    pub(crate) fn flame_at(&self, pos: Position) -> bool {
        self.flames.iter().any(|f| f.pos == pos)
    }

    /// Resolve everything currently sharing a cell with a live flame:
    /// armed bombs detonate (covers a bomb placed into a burning cell),
    /// the player and enemies take their one hit.
    pub(crate) fn resolve_overlaps(&mut self) {
        let due: Vec<BombId> = self
            .bombs
            .iter()
            .filter(|b| b.is_armed() && self.flame_at(b.pos))
            .map(|b| b.id)
            .collect();
        self.detonate_all(due);

        if self.player.life.is_alive() && self.flame_at(self.player.pos) {
            self.hit_player();
        }
        let burned: Vec<usize> = (0..self.enemies.len())
            .filter(|&i| self.enemies[i].life.is_alive() && self.flame_at(self.enemies[i].pos))
            .collect();
        for idx in burned {
            self.hit_enemy(idx);
        }
    }

    pub(crate) fn tick_flames(&mut self) {
        for flame in &mut self.flames {
            flame.remaining = flame.remaining.saturating_sub(1);
        }
        self.flames.retain(|f| f.remaining > 0);
    }
}
