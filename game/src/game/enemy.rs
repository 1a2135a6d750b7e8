use rand::Rng;

use crate::config::Timing;
use crate::direction::Dir4;
use crate::events::GameEvent;
use crate::grid::Occupancy;
use crate::position::Position;

use super::{Lifecycle, MOVE_BLOCKERS, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemyId(pub(crate) u32);

/// A balloon: drifts one cell at a time in its heading, bounces off
/// anything solid, and re-rolls its heading on a fixed interval.
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) pos: Position,
    pub(crate) dir: Dir4,
    pub(crate) step_left: u32,
    pub(crate) turn_left: u32,
    pub(crate) life: Lifecycle,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, pos: Position, timing: &Timing, rng: &mut impl Rng) -> Self {
        Self {
            id,
            pos,
            dir: random_dir(rng),
            step_left: timing.enemy_step,
            turn_left: timing.enemy_turn,
            life: Lifecycle::Alive,
        }
    }
}

fn random_dir(rng: &mut impl Rng) -> Dir4 {
    Dir4::all()[rng.gen_range(0..4)]
}

impl World {
    pub(crate) fn tick_enemies(&mut self) {
        for idx in 0..self.enemies.len() {
            if !self.enemies[idx].life.is_alive() {
                continue;
            }

            let turn_due = {
                let enemy = &mut self.enemies[idx];
                enemy.turn_left = enemy.turn_left.saturating_sub(1);
                enemy.turn_left == 0
            };
            if turn_due {
                let dir = random_dir(&mut self.rng);
                let enemy = &mut self.enemies[idx];
                enemy.dir = dir;
                enemy.turn_left = self.timing.enemy_turn;
            }

            let step_due = {
                let enemy = &mut self.enemies[idx];
                enemy.step_left = enemy.step_left.saturating_sub(1);
                enemy.step_left == 0
            };
            if !step_due {
                continue;
            }
            self.enemies[idx].step_left = self.timing.enemy_step;

            let (pos, dir) = (self.enemies[idx].pos, self.enemies[idx].dir);
            let target = pos + dir.delta();
            if self.classify(target, MOVE_BLOCKERS) != Occupancy::Clear {
                // Bounce; the reversed heading gets its try next step.
                self.enemies[idx].dir = dir.opposite();
                continue;
            }

            self.enemies[idx].pos = target;
            let id = self.enemies[idx].id;
            self.events.push(GameEvent::EnemyMoved(id, target));

            if self.player.life.is_alive() && self.player.pos == target {
                self.hit_player();
            }
            if self.flame_at(target) {
                self.hit_enemy(idx);
            }
        }
    }

    pub(crate) fn hit_enemy(&mut self, idx: usize) {
        let dying = self.timing.dying;
        let enemy = &mut self.enemies[idx];
        if enemy.life.hit(dying) {
            let (id, pos) = (enemy.id, enemy.pos);
            self.events.push(GameEvent::EnemyDied(id, pos));
            self.score += self.config.enemy_score;
            self.events.push(GameEvent::ScoreChanged(self.score));
            log::debug!("enemy {id:?} down at ({}, {})", pos.x, pos.y);
        }
    }
}
