//! Combat log
//!
//! Every state change the engine makes is recorded as a `CombatEvent`.
//! The presentation layer owns formatting; `Display` gives the plain
//! log line.

use serde::Serialize;
use tracing::{debug, info};

use super::StatusKind;

/// A single logged state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    CharacterAdded { name: String, hp: i32, x: i32, y: i32 },
    CharacterRemoved { name: String },
    ActiveChanged { name: String },
    Moved { name: String, x: i32, y: i32 },
    Damaged {
        name: String,
        amount: i32,
        absorbed: i32,
        hp_lost: i32,
        hp: i32,
        reason: String,
    },
    Healed {
        name: String,
        healed: i32,
        overflow: i32,
        hp: i32,
        reason: String,
    },
    Defeated { name: String },
    ShieldGained { name: String, amount: i32 },
    StatusGained { name: String, kind: StatusKind, stacks: u32, duration: u32 },
    StatusStacked { name: String, kind: StatusKind, stacks: u32, duration: u32 },
    StatusEdited { name: String, kind: StatusKind, stacks: u32, duration: u32 },
    StatusRemoved { name: String, kind: StatusKind },
    StatusExpired { name: String, kind: StatusKind },
    TurnAdvanced { turn: u64, name: String },
    NoLivingCharacters,
    DiceRolled { count: u32, sides: u32, total: i32, manual: bool },
    GoddessFormEnded { name: String },
    SinTransferred { from: String, to: String, stacks: u32 },
    HeavensPunishment { caster: String, targets: Vec<String> },
    DamageSplit { target: String, share: i32, recipients: usize },
    Splash { target: String, amount: i32 },
    BatchPass { pass: u32 },
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatEvent::CharacterAdded { name, hp, x, y } => {
                write!(f, "{} joins with {} HP at ({}, {})", name, hp, x, y)
            }
            CombatEvent::CharacterRemoved { name } => write!(f, "{} removed", name),
            CombatEvent::ActiveChanged { name } => write!(f, "Active -> {}", name),
            CombatEvent::Moved { name, x, y } => write!(f, "{} moved to ({}, {})", name, x, y),
            CombatEvent::Damaged { name, amount, absorbed, hp_lost, hp, reason } => {
                if *absorbed > 0 {
                    write!(
                        f,
                        "{} took {} dmg ({}; shield absorbed {}, {} HP lost, {} HP left)",
                        name, amount, reason, absorbed, hp_lost, hp
                    )
                } else {
                    write!(f, "{} took {} dmg ({}; {} HP left)", name, amount, reason, hp)
                }
            }
            CombatEvent::Healed { name, healed, overflow, hp, reason } => {
                if *overflow > 0 {
                    write!(
                        f,
                        "{} healed {} ({}; {} overflow to shield, {} HP)",
                        name, healed, reason, overflow, hp
                    )
                } else {
                    write!(f, "{} healed {} ({}; {} HP)", name, healed, reason, hp)
                }
            }
            CombatEvent::Defeated { name } => write!(f, "{} defeated", name),
            CombatEvent::ShieldGained { name, amount } => {
                write!(f, "{} gained shield {}", name, amount)
            }
            CombatEvent::StatusGained { name, kind, stacks, duration } => {
                write!(f, "{} gained {} x{} ({})", name, kind, stacks, Duration(*duration))
            }
            CombatEvent::StatusStacked { name, kind, stacks, duration } => {
                write!(f, "{} {} now x{} ({})", name, kind, stacks, Duration(*duration))
            }
            CombatEvent::StatusEdited { name, kind, stacks, duration } => {
                write!(f, "{} {} set to x{} ({})", name, kind, stacks, Duration(*duration))
            }
            CombatEvent::StatusRemoved { name, kind } => write!(f, "{} lost {}", name, kind),
            CombatEvent::StatusExpired { name, kind } => write!(f, "{} on {} expired", kind, name),
            CombatEvent::TurnAdvanced { turn, name } => write!(f, "Turn {} -> {}", turn, name),
            CombatEvent::NoLivingCharacters => write!(f, "No living characters"),
            CombatEvent::DiceRolled { count, sides, total, manual } => {
                let source = if *manual { "manual" } else { "rolled" };
                write!(f, "{}d{} = {} ({})", count, sides, total, source)
            }
            CombatEvent::GoddessFormEnded { name } => write!(f, "{}'s Goddess Form ends", name),
            CombatEvent::SinTransferred { from, to, stacks } => {
                write!(f, "{}'s Moral becomes {} Mark of Sin on {}", from, stacks, to)
            }
            CombatEvent::HeavensPunishment { caster, targets } => {
                write!(f, "{} calls Heaven's Punishment on {}", caster, targets.join(", "))
            }
            CombatEvent::DamageSplit { target, share, recipients } => write!(
                f,
                "Half of the blow on {} splits {} to each of {} marked enemies",
                target, share, recipients
            ),
            CombatEvent::Splash { target, amount } => {
                write!(f, "Punishment splashes {} around {}", amount, target)
            }
            CombatEvent::BatchPass { pass } => write!(f, "Batch pass {}", pass),
        }
    }
}

struct Duration(u32);

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "permanent"),
            1 => write!(f, "1 turn"),
            n => write!(f, "{} turns", n),
        }
    }
}

/// Ordered record of events produced by the engine
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and trace it
    pub fn push(&mut self, event: CombatEvent) {
        match &event {
            CombatEvent::Defeated { .. }
            | CombatEvent::TurnAdvanced { .. }
            | CombatEvent::HeavensPunishment { .. }
            | CombatEvent::SinTransferred { .. } => info!("{}", event),
            _ => debug!("{}", event),
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Plain log lines
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
