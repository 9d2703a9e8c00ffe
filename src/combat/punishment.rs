//! Heaven's Punishment
//!
//! Strikes the two non-caster characters carrying the most Mark of Sin.
//! Allies caught by it take half, and the other half is shared among
//! marked enemies. Enemies take amplified damage, and a heavily marked
//! enemy bursts, splashing its neighbours and losing its marks.

use std::cmp::Reverse;

use super::character::CharacterId;
use super::damage::DamageResult;
use super::engine::CombatEngine;
use super::events::CombatEvent;
use super::{CombatError, CombatResult, StatusKind};

/// Number of characters the ability strikes
pub const PUNISHMENT_TARGETS: usize = 2;

/// Mark of Sin stacks at which an enemy's hit splashes
pub const SPLASH_THRESHOLD: u32 = 3;

/// Mark of Sin stacks at which damage is amplified
pub const AMPLIFY_THRESHOLD: u32 = 5;

/// How one selected target was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunishmentHit {
    pub target: CharacterId,
    /// Damage routed at the target
    pub damage: i32,
    pub result: DamageResult,
    /// Same team as the caster
    pub ally: bool,
    /// Characters hit by the ally split, with the share each took
    pub split: Vec<(CharacterId, i32)>,
    /// Splash damage per neighbour (0 when no splash happened)
    pub splash: i32,
    /// Characters caught in the splash
    pub splashed: Vec<CharacterId>,
}

/// Full outcome of one Heaven's Punishment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PunishmentReport {
    pub hits: Vec<PunishmentHit>,
}

impl PunishmentReport {
    pub fn hit_on(&self, target: CharacterId) -> Option<&PunishmentHit> {
        self.hits.iter().find(|h| h.target == target)
    }
}

/// Integer multiply by `num / 10`, rounding up, saturating at `i32::MAX`
fn scale_tenths_ceil(value: i64, num: i64) -> i64 {
    (value.saturating_mul(num).saturating_add(9) / 10).min(i32::MAX as i64)
}

impl CombatEngine {
    /// Heaven's Punishment cast by the active character
    pub fn heavens_punishment(&mut self, base_damage: i32) -> CombatResult<PunishmentReport> {
        let caster = self.active_living().ok_or(CombatError::NoActiveCharacter)?;
        self.resolve_punishment(caster, base_damage)
    }

    /// Heaven's Punishment cast by a specific character
    pub fn heavens_punishment_from(
        &mut self,
        caster: CharacterId,
        base_damage: i32,
    ) -> CombatResult<PunishmentReport> {
        let caster = self
            .living_index(caster)
            .ok_or(CombatError::NoActiveCharacter)?;
        self.resolve_punishment(caster, base_damage)
    }

    /// Living non-caster characters ordered by Mark of Sin, roster order on ties
    fn punishment_targets(&self, caster: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..self.roster.len())
            .filter(|&i| i != caster && self.roster[i].is_alive())
            .collect();
        // Stable sort keeps roster order among equals
        candidates.sort_by_key(|&i| Reverse(self.roster[i].stacks(StatusKind::MarkOfSin)));
        candidates.truncate(PUNISHMENT_TARGETS);
        candidates
    }

    fn resolve_punishment(&mut self, caster: usize, base_damage: i32) -> CombatResult<PunishmentReport> {
        let targets = self.punishment_targets(caster);
        if targets.is_empty() {
            return Err(CombatError::NoValidTargets);
        }

        let base = base_damage.max(0);
        self.log.push(CombatEvent::HeavensPunishment {
            caster: self.roster[caster].name.clone(),
            targets: targets.iter().map(|&i| self.roster[i].name.clone()).collect(),
        });

        let mut report = PunishmentReport::default();
        for idx in targets {
            // An earlier split or splash may have finished this one off
            if self.roster[idx].dead {
                continue;
            }
            let hit = if self.roster[idx].team == self.roster[caster].team {
                self.punish_ally(caster, idx, base)
            } else {
                self.punish_enemy(idx, base)
            };
            report.hits.push(hit);
        }
        Ok(report)
    }

    fn punish_ally(&mut self, caster: usize, idx: usize, base: i32) -> PunishmentHit {
        let half = base / 2;
        let result = self.damage_at(idx, half, "heaven's punishment");

        let caster_team = self.roster[caster].team;
        let marked: Vec<usize> = (0..self.roster.len())
            .filter(|&i| {
                let c = &self.roster[i];
                c.is_alive() && c.team != caster_team && c.stacks(StatusKind::MarkOfSin) > 0
            })
            .collect();

        let mut split = Vec::new();
        if !marked.is_empty() {
            let share = (base - half) / marked.len() as i32;
            self.log.push(CombatEvent::DamageSplit {
                target: self.roster[idx].name.clone(),
                share,
                recipients: marked.len(),
            });
            for i in marked {
                self.damage_at(i, share, "punishment split");
                split.push((self.roster[i].id, share));
            }
        }

        PunishmentHit {
            target: self.roster[idx].id,
            damage: half,
            result,
            ally: true,
            split,
            splash: 0,
            splashed: Vec::new(),
        }
    }

    fn punish_enemy(&mut self, idx: usize, base: i32) -> PunishmentHit {
        let target = &self.roster[idx];
        let marks = target.stacks(StatusKind::MarkOfSin);

        let mut damage = base as i64;
        if target.has(StatusKind::Injury) {
            damage = scale_tenths_ceil(damage, 12);
        }
        if marks >= AMPLIFY_THRESHOLD {
            damage = scale_tenths_ceil(damage, 10 + marks as i64);
        }
        let damage = damage as i32;

        let result = self.damage_at(idx, damage, "heaven's punishment");

        let mut hit = PunishmentHit {
            target: self.roster[idx].id,
            damage,
            result,
            ally: false,
            split: Vec::new(),
            splash: 0,
            splashed: Vec::new(),
        };

        if marks >= SPLASH_THRESHOLD {
            let splash = damage / 2;
            let center = self.roster[idx].position;
            let nearby: Vec<usize> = (0..self.roster.len())
                .filter(|&i| {
                    let c = &self.roster[i];
                    i != idx && c.is_alive() && c.position.distance(center) <= 1
                })
                .collect();

            self.log.push(CombatEvent::Splash {
                target: self.roster[idx].name.clone(),
                amount: splash,
            });
            for i in nearby {
                self.damage_at(i, splash, "punishment splash");
                hit.splashed.push(self.roster[i].id);
            }
            hit.splash = splash;

            if self.roster[idx].clear_kind(StatusKind::MarkOfSin) {
                self.log.push(CombatEvent::StatusRemoved {
                    name: self.roster[idx].name.clone(),
                    kind: StatusKind::MarkOfSin,
                });
            }
        }

        hit
    }
}
