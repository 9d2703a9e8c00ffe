//! Attack resolution
//!
//! A base hit goes through the damage pipeline, then the attacker's
//! weapon may add a combo: Mark of Sin, bonus dice or Moral. Any target
//! still holding Moral after the hit gains one more stack.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::character::CharacterId;
use super::damage::DamageResult;
use super::dice::{DiceMode, DiceOutcome};
use super::engine::CombatEngine;
use super::{CombatError, CombatResult, StatusKind};

/// Weapon used for an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weapon {
    /// Plain hit, no combo
    #[default]
    None,
    /// Brands the target with the attacker's Moral as Mark of Sin
    Longsword,
    /// Bonus d4 per Moral stack of the attacker
    Spear,
    /// Attacker gains 2 Moral
    Dagger,
    /// Bonus d4 per Mark of Sin stack on the target
    Shortgun,
}

impl FromStr for Weapon {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "unarmed" => Ok(Weapon::None),
            "longsword" => Ok(Weapon::Longsword),
            "spear" => Ok(Weapon::Spear),
            "dagger" => Ok(Weapon::Dagger),
            "shortgun" | "shotgun" => Ok(Weapon::Shortgun),
            _ => Err(CombatError::UnknownWeapon(s.to_string())),
        }
    }
}

impl std::fmt::Display for Weapon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weapon::None => "attack",
            Weapon::Longsword => "longsword",
            Weapon::Spear => "spear",
            Weapon::Dagger => "dagger",
            Weapon::Shortgun => "shortgun",
        };
        write!(f, "{}", s)
    }
}

/// What an attack did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttackReport {
    /// The base hit
    pub hit: DamageResult,
    /// Bonus dice, when the weapon combo rolled any
    pub bonus_roll: Option<DiceOutcome>,
    /// Bonus damage applied
    pub bonus: Option<DamageResult>,
    /// Mark of Sin stacks put on the target
    pub marks_applied: u32,
    /// Moral stacks the attacker gained
    pub attacker_moral: u32,
    /// Whether the target's Moral grew from being hit
    pub target_moral: bool,
}

impl AttackReport {
    /// Total damage routed at the target
    pub fn total_damage(&self) -> i32 {
        self.hit.amount + self.bonus.map_or(0, |b| b.amount)
    }

    pub fn killed(&self) -> bool {
        self.hit.killed || self.bonus.is_some_and(|b| b.killed)
    }
}

impl CombatEngine {
    /// Attack with the active character
    pub fn attack(
        &mut self,
        target: CharacterId,
        base_damage: i32,
        weapon: Weapon,
        dice: DiceMode,
    ) -> CombatResult<AttackReport> {
        let attacker = self.active_living().ok_or(CombatError::NoActiveCharacter)?;
        self.resolve_attack(attacker, target, base_damage, weapon, dice)
    }

    /// Attack with a specific character
    pub fn attack_from(
        &mut self,
        attacker: CharacterId,
        target: CharacterId,
        base_damage: i32,
        weapon: Weapon,
        dice: DiceMode,
    ) -> CombatResult<AttackReport> {
        let attacker = self
            .living_index(attacker)
            .ok_or(CombatError::NoActiveCharacter)?;
        self.resolve_attack(attacker, target, base_damage, weapon, dice)
    }

    fn resolve_attack(
        &mut self,
        attacker: usize,
        target: CharacterId,
        base_damage: i32,
        weapon: Weapon,
        dice: DiceMode,
    ) -> CombatResult<AttackReport> {
        let target = self
            .living_index(target)
            .filter(|&t| t != attacker)
            .ok_or(CombatError::InvalidTarget)?;

        let mut report = AttackReport {
            hit: self.damage_at(target, base_damage.max(0), &weapon.to_string()),
            ..AttackReport::default()
        };

        let moral = self.roster[attacker].stacks(StatusKind::Moral);
        let target_alive = self.roster[target].is_alive();

        match weapon {
            Weapon::Longsword if moral > 0 && target_alive => {
                self.apply_at(target, StatusKind::MarkOfSin, moral, Some(0));
                report.marks_applied = moral;
            }
            Weapon::Spear if moral > 0 && target_alive => {
                self.bonus_hit(&mut report, target, moral, dice, "spear bonus");
            }
            Weapon::Dagger => {
                self.apply_at(attacker, StatusKind::Moral, 2, Some(0));
                report.attacker_moral = 2;
            }
            Weapon::Shortgun => {
                let marks = self.roster[target].stacks(StatusKind::MarkOfSin);
                if marks > 0 {
                    self.bonus_hit(&mut report, target, marks, dice, "shortgun bonus");
                }
            }
            _ => {}
        }

        if self.roster[target].stacks(StatusKind::Moral) > 0 {
            self.apply_at(target, StatusKind::Moral, 1, Some(0));
            report.target_moral = true;
        }

        Ok(report)
    }

    fn bonus_hit(&mut self, report: &mut AttackReport, target: usize, count: u32, dice: DiceMode, reason: &str) {
        let outcome = self.roll_bonus(count, dice);
        report.bonus = Some(self.damage_at(target, outcome.total, reason));
        report.bonus_roll = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::character::Team;
    use crate::combat::dice::FixedDice;
    use crate::combat::input::ScriptedInput;

    fn duel() -> (CombatEngine, CharacterId, CharacterId) {
        let mut engine = CombatEngine::default().with_dice(FixedDice::new(&[3]));
        let hero = engine.add_character("Hero", 50, Team::Ally);
        let foe = engine.add_character("Foe", 100, Team::Enemy);
        (engine, hero, foe)
    }

    #[test]
    fn test_weapon_parsing() {
        assert_eq!("Longsword".parse::<Weapon>(), Ok(Weapon::Longsword));
        assert_eq!("".parse::<Weapon>(), Ok(Weapon::None));
        assert_eq!(
            "bow".parse::<Weapon>(),
            Err(CombatError::UnknownWeapon("bow".to_string()))
        );
    }

    #[test]
    fn test_plain_attack() {
        let (mut engine, _, foe) = duel();
        let report = engine.attack(foe, 12, Weapon::None, DiceMode::Auto).unwrap();
        assert_eq!(report.hit.hp_lost, 12);
        assert_eq!(engine.character(foe).unwrap().hp, 88);
    }

    #[test]
    fn test_attack_errors() {
        let mut engine = CombatEngine::default();
        let ghost = CharacterId::new();
        assert_eq!(
            engine.attack(ghost, 5, Weapon::None, DiceMode::Auto),
            Err(CombatError::NoActiveCharacter)
        );

        let hero = engine.add_character("Hero", 10, Team::Ally);
        let foe = engine.add_character("Foe", 10, Team::Enemy);
        assert_eq!(
            engine.attack(ghost, 5, Weapon::None, DiceMode::Auto),
            Err(CombatError::InvalidTarget)
        );
        assert_eq!(
            engine.attack(hero, 5, Weapon::None, DiceMode::Auto),
            Err(CombatError::InvalidTarget)
        );

        engine.attack(foe, 10, Weapon::None, DiceMode::Auto).unwrap();
        assert_eq!(
            engine.attack(foe, 5, Weapon::None, DiceMode::Auto),
            Err(CombatError::InvalidTarget)
        );
    }

    #[test]
    fn test_longsword_marks_without_consuming_moral() {
        let (mut engine, hero, foe) = duel();
        engine.add_status_kind(hero, StatusKind::Moral, Some(3), None).unwrap();

        let report = engine.attack(foe, 5, Weapon::Longsword, DiceMode::Auto).unwrap();
        assert_eq!(report.marks_applied, 3);

        let target = engine.character(foe).unwrap();
        assert_eq!(target.stacks(StatusKind::MarkOfSin), 3);
        assert_eq!(target.effect(StatusKind::MarkOfSin).unwrap().duration, 0);
        assert_eq!(engine.character(hero).unwrap().stacks(StatusKind::Moral), 3);
    }

    #[test]
    fn test_longsword_without_moral() {
        let (mut engine, _, foe) = duel();
        let report = engine.attack(foe, 5, Weapon::Longsword, DiceMode::Auto).unwrap();
        assert_eq!(report.marks_applied, 0);
        assert!(!engine.character(foe).unwrap().has(StatusKind::MarkOfSin));
    }

    #[test]
    fn test_spear_bonus_dice() {
        let (mut engine, hero, foe) = duel();
        engine.add_status_kind(hero, StatusKind::Moral, Some(2), None).unwrap();

        let report = engine.attack(foe, 10, Weapon::Spear, DiceMode::Auto).unwrap();
        let roll = report.bonus_roll.clone().unwrap();
        assert_eq!(roll.faces, vec![3, 3]);
        assert_eq!(report.bonus.unwrap().amount, 6);
        assert_eq!(report.total_damage(), 16);
        assert_eq!(engine.character(foe).unwrap().hp, 84);
    }

    #[test]
    fn test_spear_manual_total() {
        let mut engine = CombatEngine::default().with_input(ScriptedInput::new().answer("7"));
        let hero = engine.add_character("Hero", 50, Team::Ally);
        let foe = engine.add_character("Foe", 100, Team::Enemy);
        engine.add_status_kind(hero, StatusKind::Moral, Some(2), None).unwrap();

        let report = engine.attack(foe, 10, Weapon::Spear, DiceMode::Manual).unwrap();
        assert!(report.bonus_roll.unwrap().manual);
        assert_eq!(engine.character(foe).unwrap().hp, 83);
    }

    #[test]
    fn test_dagger_grants_moral() {
        let (mut engine, hero, foe) = duel();
        engine.attack(foe, 1, Weapon::Dagger, DiceMode::Auto).unwrap();
        engine.attack(foe, 1, Weapon::Dagger, DiceMode::Auto).unwrap();

        let attacker = engine.character(hero).unwrap();
        assert_eq!(attacker.stacks(StatusKind::Moral), 4);
        assert_eq!(attacker.effect(StatusKind::Moral).unwrap().duration, 0);
    }

    #[test]
    fn test_shortgun_needs_marks() {
        let (mut engine, _, foe) = duel();
        let report = engine.attack(foe, 10, Weapon::Shortgun, DiceMode::Auto).unwrap();
        assert!(report.bonus.is_none());

        engine.add_status_kind(foe, StatusKind::MarkOfSin, Some(4), None).unwrap();
        let report = engine.attack(foe, 10, Weapon::Shortgun, DiceMode::Auto).unwrap();
        assert_eq!(report.bonus.unwrap().amount, 12);
        assert_eq!(engine.character(foe).unwrap().hp, 100 - 10 - 10 - 12);
    }

    #[test]
    fn test_prideful_target_gains_moral() {
        let (mut engine, _, foe) = duel();
        engine.add_status_kind(foe, StatusKind::Moral, Some(1), None).unwrap();

        let report = engine.attack(foe, 5, Weapon::None, DiceMode::Auto).unwrap();
        assert!(report.target_moral);
        assert_eq!(engine.character(foe).unwrap().stacks(StatusKind::Moral), 2);
    }

    #[test]
    fn test_killing_blow_skips_combo() {
        let (mut engine, hero, foe) = duel();
        engine.add_status_kind(hero, StatusKind::Moral, Some(2), None).unwrap();

        let report = engine.attack(foe, 150, Weapon::Longsword, DiceMode::Auto).unwrap();
        assert!(report.killed());
        assert_eq!(report.marks_applied, 0);
        assert!(engine.character(foe).unwrap().effects.is_empty());
    }
}
