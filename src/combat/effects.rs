//! Status effects
//!
//! Applying, merging, replacing, editing and removing timed effects on a
//! character. Stackable kinds merge into their existing instance;
//! non-stackable kinds replace it. Shield never becomes an instance and
//! goes straight to the shield pool.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::character::Character;
use super::events::{CombatEvent, CombatLog};
use super::input::{request_amount, request_optional, InputProvider, Prompt};
use super::StatusKind;

/// Identifier of a single effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(Uuid);

impl EffectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEffect {
    pub id: EffectId,
    pub kind: StatusKind,
    /// Stack count, at least 1
    pub stacks: u32,
    /// Remaining turn-starts before expiry (0 = non-decaying)
    pub duration: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, stacks: u32, duration: u32) -> Self {
        Self {
            id: EffectId::new(),
            kind,
            stacks: stacks.max(1),
            duration,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.duration > 0
    }
}

/// What an application did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A new instance was created
    Added(EffectId),
    /// Stacks were merged into an existing instance
    Stacked(EffectId),
    /// A non-stackable instance was swapped for a new one
    Replaced(EffectId),
    /// Shield pool grew by this amount
    Shield(i32),
}

impl Applied {
    pub fn effect_id(&self) -> Option<EffectId> {
        match *self {
            Applied::Added(id) | Applied::Stacked(id) | Applied::Replaced(id) => Some(id),
            Applied::Shield(_) => None,
        }
    }
}

/// Apply `stacks` of `kind` to a character.
///
/// `duration` of `None` uses the registry default. When merging into an
/// existing stackable instance the duration only ever grows, and an
/// explicit `Some(0)` adds stacks without extending it. Shield asks the
/// input provider for the amount instead of creating an instance.
pub fn apply(
    character: &mut Character,
    kind: StatusKind,
    stacks: u32,
    duration: Option<u32>,
    input: &mut dyn InputProvider,
    suggested_shield: i32,
    log: &mut CombatLog,
) -> Applied {
    let def = kind.definition();

    if kind == StatusKind::Shield {
        let prompt = Prompt::ShieldAmount {
            suggested: suggested_shield,
        };
        let amount = request_amount(input, &prompt).min(i32::MAX as u32) as i32;
        gain_shield(character, amount, log);
        return Applied::Shield(amount);
    }

    let stacks = stacks.max(1);

    if def.stackable {
        if let Some(existing) = character.effect_mut(kind) {
            existing.stacks = existing.stacks.saturating_add(stacks);
            if existing.duration != 0 && duration != Some(0) {
                let wanted = duration.unwrap_or(def.default_duration);
                existing.duration = existing.duration.max(wanted);
            }
            let (id, stacks, duration) = (existing.id, existing.stacks, existing.duration);
            log.push(CombatEvent::StatusStacked {
                name: character.name.clone(),
                kind,
                stacks,
                duration,
            });
            return Applied::Stacked(id);
        }
    }

    let replaced = !def.stackable && character.clear_kind(kind);

    let effect = StatusEffect::new(kind, stacks, duration.unwrap_or(def.default_duration));
    let id = effect.id;
    log.push(CombatEvent::StatusGained {
        name: character.name.clone(),
        kind,
        stacks: effect.stacks,
        duration: effect.duration,
    });
    character.effects.push(effect);

    if replaced {
        Applied::Replaced(id)
    } else {
        Applied::Added(id)
    }
}

/// Add to the shield pool, clamping negative amounts to zero
pub fn gain_shield(character: &mut Character, amount: i32, log: &mut CombatLog) {
    let amount = amount.max(0);
    character.shield = character.shield.saturating_add(amount);
    log.push(CombatEvent::ShieldGained {
        name: character.name.clone(),
        amount,
    });
}

/// Remove an instance by id. Returns the removed effect, if any.
pub fn remove(character: &mut Character, id: EffectId, log: &mut CombatLog) -> Option<StatusEffect> {
    let pos = character.effects.iter().position(|e| e.id == id)?;
    let effect = character.effects.remove(pos);
    log.push(CombatEvent::StatusRemoved {
        name: character.name.clone(),
        kind: effect.kind,
    });
    Some(effect)
}

/// Override stacks and/or duration on an instance.
///
/// Only provided values are applied. Editing stacks to 0 removes the
/// instance. Returns false when the instance does not exist.
pub fn edit(
    character: &mut Character,
    id: EffectId,
    stacks: Option<u32>,
    duration: Option<u32>,
    log: &mut CombatLog,
) -> bool {
    if stacks == Some(0) {
        return remove(character, id, log).is_some();
    }

    let Some(effect) = character.effects.iter_mut().find(|e| e.id == id) else {
        return false;
    };

    if let Some(stacks) = stacks {
        effect.stacks = stacks;
    }
    if let Some(duration) = duration {
        effect.duration = duration;
    }

    let (kind, stacks, duration) = (effect.kind, effect.stacks, effect.duration);
    log.push(CombatEvent::StatusEdited {
        name: character.name.clone(),
        kind,
        stacks,
        duration,
    });
    true
}

/// Edit an instance with values obtained from the input provider.
///
/// Cancelled or non-numeric answers leave that field unchanged.
pub fn edit_with_prompt(
    character: &mut Character,
    id: EffectId,
    input: &mut dyn InputProvider,
    log: &mut CombatLog,
) -> bool {
    let Some(effect) = character.effects.iter().find(|e| e.id == id) else {
        return false;
    };
    let (current_stacks, current_duration) = (effect.stacks, effect.duration);

    let stacks = request_optional(input, &Prompt::EditStacks { current: current_stacks });
    let duration = request_optional(
        input,
        &Prompt::EditDuration {
            current: current_duration,
        },
    );

    if stacks.is_none() && duration.is_none() {
        return true;
    }
    edit(character, id, stacks, duration, log)
}

/// Drop every effect (used on death)
pub fn clear_all(character: &mut Character) {
    character.effects.clear();
}
