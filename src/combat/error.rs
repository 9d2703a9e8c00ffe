//! Combat errors
//!
//! Every variant is a local, recoverable condition. Operations that fail
//! leave the roster untouched.

use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("unknown effect kind: {0}")]
    UnknownEffectKind(String),

    #[error("no active character")]
    NoActiveCharacter,

    #[error("invalid target")]
    InvalidTarget,

    #[error("no valid targets")]
    NoValidTargets,

    #[error("unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("position ({0}, {1}) is outside the grid")]
    OutOfBounds(i32, i32),
}

pub type CombatResult<T> = Result<T, CombatError>;
