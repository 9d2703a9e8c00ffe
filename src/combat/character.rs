//! Character state
//!
//! The mutable record every engine operation works on: hit points,
//! shield pool, grid position and the active status effects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::effects::StatusEffect;
use super::StatusKind;

/// Opaque unique character identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side a character fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Ally,
    Enemy,
}

impl FromStr for Team {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ally" | "allies" | "party" | "player" => Ok(Team::Ally),
            "enemy" | "enemies" | "foe" | "monster" => Ok(Team::Enemy),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Team::Ally => "ally",
            Team::Enemy => "enemy",
        };
        write!(f, "{}", s)
    }
}

/// Grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell
    pub fn distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// A combatant on the roster
#[derive(Debug, Clone)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub team: Team,
    /// Current hit points, kept in `[0, max_hp]`
    pub hp: i32,
    /// Maximum hit points (None = unbounded healing)
    pub max_hp: Option<i32>,
    /// Damage absorption pool, never negative
    pub shield: i32,
    pub position: Position,
    pub dead: bool,
    /// Active effects in insertion order
    pub effects: Vec<StatusEffect>,
}

impl Character {
    /// Create a character at full health
    pub fn new(name: &str, hp: i32, team: Team) -> Self {
        let hp = hp.max(0);
        Self {
            id: CharacterId::new(),
            name: name.to_string(),
            team,
            hp,
            max_hp: Some(hp),
            shield: 0,
            position: Position::default(),
            dead: hp == 0,
            effects: Vec::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Whether `other` fights on the opposing side
    pub fn is_enemy_of(&self, other: &Character) -> bool {
        self.team != other.team
    }

    /// Find the instance of a kind, if present
    pub fn effect(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn effect_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effect(kind).is_some()
    }

    /// Stack count of a kind (0 when absent)
    pub fn stacks(&self, kind: StatusKind) -> u32 {
        self.effect(kind).map_or(0, |e| e.stacks)
    }

    /// Remove every instance of a kind, returning whether anything was removed
    pub fn clear_kind(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }
}
