//! Combat engine
//!
//! Turn-based combat tracking for a tabletop game:
//! - Status registry (bleed, burn, poison, regen, Moral, Mark of Sin, ...)
//! - Status effect application, stacking and expiry
//! - Shield-first damage and overflow healing
//! - Turn rotation with start-of-turn resolution and batch simulation
//! - Weapon combos and Heaven's Punishment

mod actions;
mod character;
mod damage;
mod dice;
mod effects;
mod engine;
mod error;
mod events;
mod input;
mod punishment;
mod registry;
mod turn;

pub use actions::{AttackReport, Weapon};
pub use character::{Character, CharacterId, Position, Team};
pub use damage::{apply_damage, apply_heal, DamageResult, HealResult};
pub use dice::{DiceMode, DiceOutcome, DiceRoll, DiceRoller, FixedDice, RngDice, MAX_POOL};
pub use effects::{Applied, EffectId, StatusEffect};
pub use engine::CombatEngine;
pub use error::{CombatError, CombatResult};
pub use events::{CombatEvent, CombatLog};
pub use input::{parse_amount, DefaultInput, InputProvider, Prompt, ScriptedInput};
pub use punishment::{PunishmentHit, PunishmentReport};
pub use registry::{StatusDefinition, StatusKind, TickRule, TriggerPhase};
