//! Turn scheduling
//!
//! Rotates the active character, skipping the dead, and resolves the
//! start-of-turn effects of whoever becomes active. Batch mode resolves
//! every living character's start-of-turn once per pass.
//!
//! Start-of-turn order:
//! 1. Moral heals its holder by its stack count
//! 2. Every other effect with a tick rule fires (bleed, burn, poison, regen)
//! 3. Timed effects count down and expire; Injury pauses bleed's countdown
//! 4. Goddess Form counts down; on expiry Moral turns into Mark of Sin on
//!    the nearest living enemy

use super::engine::CombatEngine;
use super::events::CombatEvent;
use super::StatusKind;

impl CombatEngine {
    /// Pass the turn to the next living character and resolve its start-of-turn.
    ///
    /// Returns the new active index, or `None` for an empty roster.
    pub fn advance_turn(&mut self) -> Option<usize> {
        if self.roster.is_empty() {
            self.active = None;
            return None;
        }

        let len = self.roster.len();
        let mut next = match self.active {
            Some(current) => (current + 1) % len,
            None => 0,
        };

        // At most one lap when everyone is down
        let mut stepped = 0;
        while self.roster[next].dead && stepped < len {
            next = (next + 1) % len;
            stepped += 1;
        }

        self.active = Some(next);
        self.turn += 1;

        if self.roster[next].dead {
            self.log.push(CombatEvent::NoLivingCharacters);
            return Some(next);
        }

        self.log.push(CombatEvent::TurnAdvanced {
            turn: self.turn,
            name: self.roster[next].name.clone(),
        });
        self.resolve_turn_start(next);
        Some(next)
    }

    /// Run `turns` passes of start-of-turn resolution over every living character.
    ///
    /// The active selection is left untouched. Returns the number of
    /// individual start-of-turn resolutions performed.
    pub fn simulate_batch(&mut self, turns: u32) -> usize {
        let mut resolved = 0;
        for pass in 1..=turns {
            self.log.push(CombatEvent::BatchPass { pass });
            for idx in 0..self.roster.len() {
                if self.roster[idx].is_alive() {
                    self.resolve_turn_start(idx);
                    resolved += 1;
                }
            }
        }
        resolved
    }

    pub(super) fn resolve_turn_start(&mut self, idx: usize) {
        if self.roster[idx].dead {
            return;
        }

        let moral = self.roster[idx].stacks(StatusKind::Moral);
        if moral > 0 {
            self.heal_at(idx, moral.min(i32::MAX as u32) as i32, "moral heal");
        }

        self.tick_effects(idx);
        self.decay_effects(idx);
        self.resolve_goddess_form(idx);
    }

    fn tick_effects(&mut self, idx: usize) {
        let ticks: Vec<(StatusKind, u32)> = self.roster[idx]
            .effects
            .iter()
            .filter(|e| e.kind != StatusKind::Moral)
            .map(|e| (e.kind, e.stacks))
            .collect();

        for (kind, stacks) in ticks {
            if self.roster[idx].dead {
                break;
            }
            let Some(rule) = kind.definition().tick else {
                continue;
            };
            let change = rule.amount(stacks, self.roster[idx].hp);
            if change < 0 {
                self.damage_at(idx, -change, kind.key());
            } else {
                self.heal_at(idx, change, kind.key());
            }
        }
    }

    fn decay_effects(&mut self, idx: usize) {
        let character = &mut self.roster[idx];
        let bleed_paused = character
            .effects
            .iter()
            .any(|e| e.kind == StatusKind::Injury && e.duration > 0);

        let mut expired = Vec::new();
        for effect in character.effects.iter_mut() {
            // Goddess Form has its own countdown
            if effect.kind == StatusKind::GoddessForm || effect.duration == 0 {
                continue;
            }
            if effect.kind == StatusKind::Bleed && bleed_paused {
                continue;
            }
            effect.duration -= 1;
            if effect.duration == 0 {
                expired.push((effect.id, effect.kind));
            }
        }

        character
            .effects
            .retain(|e| !expired.iter().any(|(id, _)| *id == e.id));

        for (_, kind) in expired {
            self.log.push(CombatEvent::StatusExpired {
                name: self.roster[idx].name.clone(),
                kind,
            });
        }
    }

    fn resolve_goddess_form(&mut self, idx: usize) {
        let Some(form) = self.roster[idx].effect_mut(StatusKind::GoddessForm) else {
            return;
        };
        form.duration = form.duration.saturating_sub(1);
        if form.duration > 0 {
            return;
        }

        let name = self.roster[idx].name.clone();
        self.log.push(CombatEvent::GoddessFormEnded { name: name.clone() });

        let moral = self.roster[idx].stacks(StatusKind::Moral);
        if moral > 0 {
            if let Some(target) = self.nearest_enemy(idx) {
                self.apply_at(target, StatusKind::MarkOfSin, moral, Some(0));
                self.log.push(CombatEvent::SinTransferred {
                    from: name,
                    to: self.roster[target].name.clone(),
                    stacks: moral,
                });
            }
        }

        for kind in [StatusKind::GoddessForm, StatusKind::Moral] {
            if self.roster[idx].clear_kind(kind) {
                self.log.push(CombatEvent::StatusExpired {
                    name: self.roster[idx].name.clone(),
                    kind,
                });
            }
        }
    }

    /// Closest living enemy by Manhattan distance, first in roster order on ties
    pub(super) fn nearest_enemy(&self, idx: usize) -> Option<usize> {
        let origin = &self.roster[idx];
        self.roster
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != idx && c.is_alive() && origin.is_enemy_of(c))
            .min_by_key(|(_, c)| origin.position.distance(c.position))
            .map(|(i, _)| i)
    }
}
