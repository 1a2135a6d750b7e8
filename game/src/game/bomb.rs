use crate::direction::Dir4;
use crate::events::GameEvent;
use crate::grid::{CategorySet, Occupancy};
use crate::position::Position;

use super::{FlameKind, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BombId(pub(crate) u32);

/// Armed bombs count down; the transition to `Detonated` is one-way and
/// doubles as the fuse cancellation, so a bomb can never explode twice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Fuse {
    Armed { remaining: u32 },
    Detonated,
}

pub(crate) struct Bomb {
    pub(crate) id: BombId,
    pub(crate) pos: Position,
    pub(crate) range: u32,
    pub(crate) obstructs: CategorySet,
    pub(crate) fuse: Fuse,
}

impl Bomb {
    pub(crate) fn is_armed(&self) -> bool {
        matches!(self.fuse, Fuse::Armed { .. })
    }
}

impl World {
    pub(crate) fn spawn_bomb(&mut self, pos: Position) -> BombId {
        let id = BombId(self.next_bomb_id);
        self.next_bomb_id += 1;
        self.bombs.push(Bomb {
            id,
            pos,
            range: self.config.blast_range,
            obstructs: self.config.obstructs,
            fuse: Fuse::Armed {
                remaining: self.timing.fuse,
            },
        });
        self.events.push(GameEvent::BombPlaced(id, pos));
        log::debug!("bomb {id:?} placed at ({}, {})", pos.x, pos.y);
        id
    }

    pub(crate) fn tick_fuses(&mut self) {
        let mut due = Vec::new();
        for bomb in &mut self.bombs {
            if let Fuse::Armed { remaining } = &mut bomb.fuse {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    due.push(bomb.id);
                }
            }
        }
        self.detonate_all(due);
    }

    /// Drain a detonation worklist, including every chain reaction it
    /// uncovers, synchronously. Detonation is idempotent, so a bomb queued
    /// twice (say, caught by two arms) goes off once and the cascade always
    /// terminates.
    pub(crate) fn detonate_all(&mut self, mut due: Vec<BombId>) {
        while let Some(id) = due.pop() {
            self.detonate(id, &mut due);
        }
    }

    /// Run the blast for one bomb: a center flame, then four independent
    /// bounded arm scans. Per arm, per step outward: a clear cell gets a
    /// flame (arm-end on the last step); a brick gets an arm-end flame and
    /// absorbs the blast; a wall stops the arm with no flame at its cell.
    fn detonate(&mut self, id: BombId, chain: &mut Vec<BombId>) {
        let Some(bomb) = self.bombs.iter_mut().find(|b| b.id == id) else {
            return;
        };
        if !bomb.is_armed() {
            return;
        }
        bomb.fuse = Fuse::Detonated;
        let (pos, range, obstructs) = (bomb.pos, bomb.range, bomb.obstructs);

        self.events.push(GameEvent::BombExploded(id, pos));
        log::debug!("bomb {id:?} exploded at ({}, {})", pos.x, pos.y);

        self.spawn_flame(pos, FlameKind::Center, chain);
        for dir in Dir4::all() {
            for i in 1..=range {
                let cell = pos + dir.delta() * i as i32;
                match self.classify(cell, obstructs) {
                    Occupancy::Clear => {
                        let kind = if i == range {
                            FlameKind::ArmEnd(dir)
                        } else {
                            FlameKind::Arm(dir)
                        };
                        self.spawn_flame(cell, kind, chain);
                    }
                    Occupancy::Destructible => {
                        // The arm always terminates visually on the brick.
                        self.spawn_flame(cell, FlameKind::ArmEnd(dir), chain);
                        self.hit_brick(cell);
                        break;
                    }
                    Occupancy::Obstacle => break,
                }
            }
        }
    }

    pub(crate) fn hit_brick(&mut self, pos: Position) {
        let dying = self.timing.dying;
        if let Some(life) = self.bricks.get_mut(&pos) {
            if life.hit(dying) {
                self.events.push(GameEvent::BrickDestroyed(pos));
                log::debug!("brick destroyed at ({}, {})", pos.x, pos.y);
            }
        }
    }

    /// Detonated bombs linger until end of tick so in-flight worklists keep
    /// seeing them; this drops them from the world.
    pub(crate) fn sweep_bombs(&mut self) {
        self.bombs.retain(|b| b.is_armed());
    }

    pub(crate) fn armed_bomb_count(&self) -> usize {
        self.bombs.iter().filter(|b| b.is_armed()).count()
    }
}
