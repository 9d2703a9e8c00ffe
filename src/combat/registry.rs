//! Status registry
//!
//! The fixed catalog of effect kinds with their stacking, duration and
//! start-of-turn policy.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::CombatError;

/// Kinds of status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Bleed - loses 1 HP per stack each turn
    Bleed,
    /// Burn - loses 2 HP per stack each turn
    Burn,
    /// Poison - loses 1% of current HP per stack each turn
    Poison,
    /// Regen - heals 3 HP per stack each turn
    Regen,
    /// Shield - instantaneous gain to the shield pool
    Shield,
    /// Mark of Sin - amplifies Heaven's Punishment
    MarkOfSin,
    /// Moral - heals each turn, converts on Goddess Form expiry
    Moral,
    /// Fear - registered, inert
    Fear,
    /// Injury - pauses bleed countdown
    Injury,
    /// Broken - registered, inert
    Broken,
    /// Goddess Form - expiry converts Moral into Mark of Sin
    GoddessForm,
}

/// When an effect resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    /// Resolved at the start of the holder's turn
    TurnStart,
    /// Resolved once on application, never stored
    Instant,
}

/// Numeric start-of-turn rule, scaled by stack count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickRule {
    /// Flat damage per stack
    Damage(i32),
    /// Percent of current HP per stack, rounded down, minimum 1
    PercentDamage(i32),
    /// Flat healing per stack
    Heal(i32),
}

impl TickRule {
    /// Signed HP change for the given stacks and current HP (negative = damage).
    ///
    /// The magnitude saturates at `i32::MAX`.
    pub fn amount(&self, stacks: u32, current_hp: i32) -> i32 {
        let stacks = stacks as i64;
        let magnitude = match *self {
            TickRule::Damage(per) | TickRule::Heal(per) => (per as i64).saturating_mul(stacks),
            TickRule::PercentDamage(pct) => {
                let scaled = (current_hp.max(0) as i64)
                    .saturating_mul(pct as i64)
                    .saturating_mul(stacks);
                (scaled / 100).max(1)
            }
        };
        let magnitude = magnitude.clamp(0, i32::MAX as i64) as i32;
        match self {
            TickRule::Heal(_) => magnitude,
            _ => -magnitude,
        }
    }
}

/// Immutable definition of a status kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDefinition {
    pub kind: StatusKind,
    pub key: &'static str,
    pub name: &'static str,
    pub stackable: bool,
    /// 0 = persists until cleared, otherwise turn-starts before expiry
    pub default_duration: u32,
    pub trigger: TriggerPhase,
    /// Rule applied during the generic start-of-turn pass
    pub tick: Option<TickRule>,
    pub description: &'static str,
}

const fn def(
    kind: StatusKind,
    key: &'static str,
    name: &'static str,
    stackable: bool,
    default_duration: u32,
    tick: Option<TickRule>,
    description: &'static str,
) -> StatusDefinition {
    StatusDefinition {
        kind,
        key,
        name,
        stackable,
        default_duration,
        trigger: TriggerPhase::TurnStart,
        tick,
        description,
    }
}

static DEFINITIONS: [StatusDefinition; 11] = [
    def(StatusKind::Bleed, "bleed", "Bleed", true, 2, Some(TickRule::Damage(1)), "-1 HP/turn per stack"),
    def(StatusKind::Burn, "burn", "Burn", true, 1, Some(TickRule::Damage(2)), "-2 HP/turn per stack"),
    def(StatusKind::Poison, "poison", "Poison", true, 2, Some(TickRule::PercentDamage(1)), "-1% HP/turn per stack"),
    def(StatusKind::Regen, "regen", "Regen", true, 1, Some(TickRule::Heal(3)), "+3 HP/turn per stack"),
    StatusDefinition {
        kind: StatusKind::Shield,
        key: "shield",
        name: "Shield",
        stackable: false,
        default_duration: 0,
        trigger: TriggerPhase::Instant,
        tick: None,
        description: "Absorb damage",
    },
    def(StatusKind::MarkOfSin, "mark_of_sin", "Mark of Sin", true, 0, None, "-1 HP/turn per stack; amplifies Heaven's Punishment"),
    def(StatusKind::Moral, "moral", "Moral", true, 0, Some(TickRule::Heal(1)), "Heal on turn start"),
    def(StatusKind::Fear, "fear", "Fear", false, 2, None, "+5% damage taken, -10% damage dealt"),
    def(StatusKind::Injury, "injury", "Injury", false, 2, None, "Bleed does not wear off; +20% from Heaven's Punishment"),
    def(StatusKind::Broken, "broken", "Broken", true, 2, None, "-1 dice per stack"),
    def(StatusKind::GoddessForm, "goddess_form", "Goddess Form", false, 3, None, "On expiry, Moral becomes Mark of Sin on the nearest enemy"),
];

impl StatusKind {
    /// Every registered kind, in registry order
    pub fn all() -> impl Iterator<Item = StatusKind> {
        DEFINITIONS.iter().map(|d| d.kind)
    }

    /// Registry definition for this kind
    pub fn definition(self) -> &'static StatusDefinition {
        // Table order matches declaration order
        &DEFINITIONS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.definition().key
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

impl FromStr for StatusKind {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        DEFINITIONS
            .iter()
            .find(|d| d.key == wanted)
            .map(|d| d.kind)
            .ok_or_else(|| CombatError::UnknownEffectKind(s.to_string()))
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
