//! skirmish - turn-based tabletop combat tracker
//!
//! Tracks hit points, shields, grid positions and timed status effects
//! for a roster of characters, and resolves the rules that fire when
//! turns advance or attacks land.

pub mod combat;
pub mod config;

pub use combat::{CombatEngine, CombatError, CombatEvent};
pub use config::{EngineConfig, Scenario};
