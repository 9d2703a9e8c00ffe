//! Damage and healing
//!
//! Damage drains the shield pool before hit points. Healing beyond the
//! maximum is kept as shield rather than discarded.

use super::character::Character;
use super::effects::clear_all;
use super::events::{CombatEvent, CombatLog};

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageResult {
    /// Incoming amount after clamping
    pub amount: i32,
    /// Portion soaked up by the shield
    pub absorbed: i32,
    /// Hit points actually removed
    pub hp_lost: i32,
    /// Whether this hit killed the target
    pub killed: bool,
}

/// Result of applying healing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealResult {
    /// Hit points restored
    pub healed: i32,
    /// Excess moved into the shield pool
    pub overflow: i32,
}

/// Apply damage to a character
pub fn apply_damage(target: &mut Character, amount: i32, reason: &str, log: &mut CombatLog) -> DamageResult {
    if amount <= 0 || target.dead {
        return DamageResult::default();
    }

    let absorbed = amount.min(target.shield);
    target.shield -= absorbed;
    let remaining = amount - absorbed;

    let before = target.hp;
    target.hp = target.hp.saturating_sub(remaining);

    let killed = target.hp <= 0;
    if killed {
        target.hp = 0;
    }

    let result = DamageResult {
        amount,
        absorbed,
        hp_lost: before - target.hp,
        killed,
    };

    log.push(CombatEvent::Damaged {
        name: target.name.clone(),
        amount,
        absorbed,
        hp_lost: result.hp_lost,
        hp: target.hp,
        reason: reason.to_string(),
    });

    if killed {
        target.dead = true;
        clear_all(target);
        log.push(CombatEvent::Defeated {
            name: target.name.clone(),
        });
    }

    result
}

/// Heal a character, spilling excess over max HP into the shield pool
pub fn apply_heal(target: &mut Character, amount: i32, reason: &str, log: &mut CombatLog) -> HealResult {
    if amount <= 0 || target.dead {
        return HealResult::default();
    }

    let (healed, overflow) = match target.max_hp {
        Some(max_hp) => {
            let room = (max_hp - target.hp).max(0);
            let healed = amount.min(room);
            (healed, amount - healed)
        }
        None => (amount, 0),
    };

    target.hp = target.hp.saturating_add(healed);
    target.shield = target.shield.saturating_add(overflow);

    log.push(CombatEvent::Healed {
        name: target.name.clone(),
        healed,
        overflow,
        hp: target.hp,
        reason: reason.to_string(),
    });

    HealResult { healed, overflow }
}
