//! Dice rolling
//!
//! Bonus damage is a pool of small dice. Rolls go through `DiceRoller`
//! so tests can seed or script them, and a table can enter its own total
//! instead of rolling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::input::{request_amount, InputProvider, Prompt};

/// Source of single die results
pub trait DiceRoller {
    /// Roll one die, returning a value in `1..=sides`
    fn roll(&mut self, sides: u32) -> u32;
}

/// Random dice backed by a standard RNG
#[derive(Debug, Clone)]
pub struct RngDice {
    rng: StdRng,
}

impl RngDice {
    /// Seeded dice for reproducible runs, or OS entropy without a seed
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl DiceRoller for RngDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Cycles through a fixed list of faces
#[derive(Debug, Clone)]
pub struct FixedDice {
    faces: Vec<u32>,
    next: usize,
}

impl FixedDice {
    pub fn new(faces: &[u32]) -> Self {
        Self {
            faces: faces.to_vec(),
            next: 0,
        }
    }
}

impl DiceRoller for FixedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face.clamp(1, sides.max(1))
    }
}

/// How bonus dice are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiceMode {
    /// Roll with the engine's dice
    #[default]
    Auto,
    /// Ask the input provider for the total
    Manual,
}

/// Largest pool rolled at once; bigger pools are capped
pub const MAX_POOL: u32 = 1_000;

/// A pool of identical dice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
}

/// Result of resolving a dice pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceOutcome {
    /// Individual faces (empty for manual totals)
    pub faces: Vec<u32>,
    pub total: i32,
    pub manual: bool,
}

impl DiceRoll {
    /// Pool of `count` dice, capped at `MAX_POOL`
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count: count.min(MAX_POOL),
            sides,
        }
    }

    /// Roll every die and sum the faces
    pub fn roll_with(&self, dice: &mut dyn DiceRoller) -> DiceOutcome {
        let faces: Vec<u32> = (0..self.count).map(|_| dice.roll(self.sides)).collect();
        let total = faces.iter().map(|&f| f as i64).sum::<i64>().min(i32::MAX as i64) as i32;
        DiceOutcome {
            faces,
            total,
            manual: false,
        }
    }

    /// Resolve the pool either by rolling or by asking for a total
    pub fn resolve(
        &self,
        mode: DiceMode,
        dice: &mut dyn DiceRoller,
        input: &mut dyn InputProvider,
    ) -> DiceOutcome {
        match mode {
            DiceMode::Auto => self.roll_with(dice),
            DiceMode::Manual => {
                let prompt = Prompt::DiceTotal {
                    count: self.count,
                    sides: self.sides,
                };
                let total = request_amount(input, &prompt).min(i32::MAX as u32) as i32;
                DiceOutcome {
                    faces: Vec::new(),
                    total,
                    manual: true,
                }
            }
        }
    }

    pub fn min(&self) -> i32 {
        self.count.min(i32::MAX as u32) as i32
    }

    pub fn max(&self) -> i32 {
        (self.count as i64 * self.sides as i64).min(i32::MAX as i64) as i32
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
