//! Combat session
//!
//! Owns the roster, the active selection and the collaborators (dice,
//! numeric input, log). Every public operation runs to completion before
//! returning and validates its arguments before mutating anything.

use super::character::{Character, CharacterId, Position, Team};
use super::damage::{apply_damage, apply_heal, DamageResult, HealResult};
use super::dice::{DiceMode, DiceOutcome, DiceRoll, DiceRoller, RngDice};
use super::effects::{self, Applied, EffectId, StatusEffect};
use super::events::{CombatEvent, CombatLog};
use super::input::{DefaultInput, InputProvider};
use super::{CombatError, CombatResult, StatusKind};
use crate::config::EngineConfig;

/// The combat engine for one encounter
pub struct CombatEngine {
    pub(super) config: EngineConfig,
    pub(super) roster: Vec<Character>,
    pub(super) active: Option<usize>,
    pub(super) turn: u64,
    pub(super) dice: Box<dyn DiceRoller>,
    pub(super) input: Box<dyn InputProvider>,
    pub(super) log: CombatLog,
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CombatEngine {
    /// Create an engine with random dice and default prompt answers
    pub fn new(config: EngineConfig) -> Self {
        let dice = RngDice::new(config.seed);
        Self {
            config,
            roster: Vec::new(),
            active: None,
            turn: 0,
            dice: Box::new(dice),
            input: Box::new(DefaultInput),
            log: CombatLog::new(),
        }
    }

    /// Replace the dice source
    pub fn with_dice(mut self, dice: impl DiceRoller + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Replace the numeric input provider
    pub fn with_input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Character> {
        self.active.and_then(|i| self.roster.get(i))
    }

    /// Number of turn advances so far
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    /// Take the recorded events
    pub fn drain_log(&mut self) -> Vec<CombatEvent> {
        self.log.drain()
    }

    pub fn index_of(&self, id: CharacterId) -> Option<usize> {
        self.roster.iter().position(|c| c.id == id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.roster.iter_mut().find(|c| c.id == id)
    }

    /// Living characters in roster order
    pub fn living(&self) -> impl Iterator<Item = &Character> {
        self.roster.iter().filter(|c| c.is_alive())
    }

    /// Living occupant of a grid cell
    pub fn character_at(&self, x: i32, y: i32) -> Option<&Character> {
        let cell = Position::new(x, y);
        self.living().find(|c| c.position == cell)
    }

    /// Add a character at the next open grid slot
    pub fn add_character(&mut self, name: &str, hp: i32, team: Team) -> CharacterId {
        let count = self.roster.len() as i32;
        let grid = self.config.grid_size.max(1);
        let position = Position::new(count % grid, count / grid);
        let character = Character::new(name, hp, team).at(position);
        let id = character.id;

        self.log.push(CombatEvent::CharacterAdded {
            name: character.name.clone(),
            hp: character.hp,
            x: position.x,
            y: position.y,
        });
        self.roster.push(character);

        if self.active.is_none() {
            self.active = Some(0);
        }
        id
    }

    /// Select the active character by roster index
    pub fn set_active(&mut self, index: usize) -> CombatResult<()> {
        let character = self
            .roster
            .get(index)
            .filter(|c| c.is_alive())
            .ok_or(CombatError::InvalidTarget)?;
        self.log.push(CombatEvent::ActiveChanged {
            name: character.name.clone(),
        });
        self.active = Some(index);
        Ok(())
    }

    /// Remove a character by roster index, keeping the active selection valid
    pub fn remove_character(&mut self, index: usize) -> CombatResult<Character> {
        if index >= self.roster.len() {
            return Err(CombatError::InvalidTarget);
        }
        let removed = self.roster.remove(index);
        self.log.push(CombatEvent::CharacterRemoved {
            name: removed.name.clone(),
        });

        self.active = match self.active {
            _ if self.roster.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) => Some(active.min(self.roster.len() - 1)),
            None => None,
        };
        Ok(removed)
    }

    /// Move a living character to a grid cell
    pub fn move_character(&mut self, id: CharacterId, x: i32, y: i32) -> CombatResult<()> {
        let grid = self.config.grid_size;
        if x < 0 || y < 0 || x >= grid || y >= grid {
            return Err(CombatError::OutOfBounds(x, y));
        }
        let idx = self.living_index(id).ok_or(CombatError::InvalidTarget)?;
        let character = &mut self.roster[idx];
        character.position = Position::new(x, y);
        self.log.push(CombatEvent::Moved {
            name: character.name.clone(),
            x,
            y,
        });
        Ok(())
    }

    /// Apply a status by registry key
    pub fn add_status(
        &mut self,
        id: CharacterId,
        kind: &str,
        stacks: Option<u32>,
        duration: Option<u32>,
    ) -> CombatResult<Applied> {
        let kind: StatusKind = kind.parse()?;
        self.add_status_kind(id, kind, stacks, duration)
    }

    /// Apply a status by kind
    pub fn add_status_kind(
        &mut self,
        id: CharacterId,
        kind: StatusKind,
        stacks: Option<u32>,
        duration: Option<u32>,
    ) -> CombatResult<Applied> {
        let idx = self.living_index(id).ok_or(CombatError::InvalidTarget)?;
        Ok(self.apply_at(idx, kind, stacks.unwrap_or(1), duration))
    }

    /// Remove a status instance; absent instances are a no-op
    pub fn remove_status(&mut self, id: CharacterId, effect: EffectId) -> CombatResult<Option<StatusEffect>> {
        let idx = self.index_of(id).ok_or(CombatError::InvalidTarget)?;
        Ok(effects::remove(&mut self.roster[idx], effect, &mut self.log))
    }

    /// Override stacks and/or duration of a status instance
    pub fn edit_status(
        &mut self,
        id: CharacterId,
        effect: EffectId,
        stacks: Option<u32>,
        duration: Option<u32>,
    ) -> CombatResult<bool> {
        let idx = self.index_of(id).ok_or(CombatError::InvalidTarget)?;
        Ok(effects::edit(&mut self.roster[idx], effect, stacks, duration, &mut self.log))
    }

    /// Edit a status instance with values asked from the input provider
    pub fn edit_status_with_prompt(&mut self, id: CharacterId, effect: EffectId) -> CombatResult<bool> {
        let idx = self.index_of(id).ok_or(CombatError::InvalidTarget)?;
        Ok(effects::edit_with_prompt(
            &mut self.roster[idx],
            effect,
            self.input.as_mut(),
            &mut self.log,
        ))
    }

    pub(super) fn living_index(&self, id: CharacterId) -> Option<usize> {
        self.index_of(id).filter(|&i| self.roster[i].is_alive())
    }

    /// Active character, if it is still standing
    pub(super) fn active_living(&self) -> Option<usize> {
        self.active
            .filter(|&i| self.roster.get(i).is_some_and(|c| c.is_alive()))
    }

    pub(super) fn apply_at(&mut self, idx: usize, kind: StatusKind, stacks: u32, duration: Option<u32>) -> Applied {
        effects::apply(
            &mut self.roster[idx],
            kind,
            stacks,
            duration,
            self.input.as_mut(),
            self.config.default_shield,
            &mut self.log,
        )
    }

    pub(super) fn damage_at(&mut self, idx: usize, amount: i32, reason: &str) -> DamageResult {
        apply_damage(&mut self.roster[idx], amount, reason, &mut self.log)
    }

    pub(super) fn heal_at(&mut self, idx: usize, amount: i32, reason: &str) -> HealResult {
        apply_heal(&mut self.roster[idx], amount, reason, &mut self.log)
    }

    /// Resolve a pool of the configured bonus die
    pub(super) fn roll_bonus(&mut self, count: u32, mode: DiceMode) -> DiceOutcome {
        let roll = DiceRoll::new(count, self.config.die_sides);
        let outcome = roll.resolve(mode, self.dice.as_mut(), self.input.as_mut());
        self.log.push(CombatEvent::DiceRolled {
            count: roll.count,
            sides: roll.sides,
            total: outcome.total,
            manual: outcome.manual,
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::input::ScriptedInput;

    #[test]
    fn test_add_character_layout() {
        let mut engine = CombatEngine::new(EngineConfig {
            grid_size: 3,
            ..EngineConfig::default()
        });
        for i in 0..5 {
            engine.add_character(&format!("C{i}"), 10, Team::Ally);
        }

        let positions: Vec<Position> = engine.roster().iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ]
        );
        assert_eq!(engine.active_index(), Some(0));
    }

    #[test]
    fn test_remove_character_reclamps_active() {
        let mut engine = CombatEngine::default();
        engine.add_character("A", 10, Team::Ally);
        engine.add_character("B", 10, Team::Ally);
        engine.add_character("C", 10, Team::Enemy);

        engine.set_active(2).unwrap();
        engine.remove_character(2).unwrap();
        assert_eq!(engine.active().unwrap().name, "B");

        engine.remove_character(0).unwrap();
        assert_eq!(engine.active().unwrap().name, "B");
        assert_eq!(engine.active_index(), Some(0));

        engine.remove_character(0).unwrap();
        assert_eq!(engine.active_index(), None);
        assert_eq!(engine.remove_character(0).unwrap_err(), CombatError::InvalidTarget);
    }

    #[test]
    fn test_set_active_rejects_dead_and_missing() {
        let mut engine = CombatEngine::default();
        engine.add_character("A", 10, Team::Ally);
        let b = engine.add_character("B", 10, Team::Enemy);
        engine.character_mut(b).unwrap().dead = true;

        assert_eq!(engine.set_active(1), Err(CombatError::InvalidTarget));
        assert_eq!(engine.set_active(9), Err(CombatError::InvalidTarget));
        assert_eq!(engine.active_index(), Some(0));
    }

    #[test]
    fn test_move_character() {
        let mut engine = CombatEngine::default();
        let a = engine.add_character("A", 10, Team::Ally);

        engine.move_character(a, 4, 5).unwrap();
        assert_eq!(engine.character(a).unwrap().position, Position::new(4, 5));
        assert_eq!(engine.character_at(4, 5).unwrap().id, a);

        assert_eq!(engine.move_character(a, 8, 0), Err(CombatError::OutOfBounds(8, 0)));
        assert_eq!(engine.move_character(a, -1, 0), Err(CombatError::OutOfBounds(-1, 0)));
    }

    #[test]
    fn test_add_status_surface() {
        let mut engine = CombatEngine::default().with_input(ScriptedInput::new().answer("12"));
        let a = engine.add_character("A", 10, Team::Ally);

        assert_eq!(
            engine.add_status(a, "frostbite", None, None),
            Err(CombatError::UnknownEffectKind("frostbite".to_string()))
        );
        assert!(engine.character(a).unwrap().effects.is_empty());

        engine.add_status(a, "shield", None, None).unwrap();
        assert_eq!(engine.character(a).unwrap().shield, 12);

        let applied = engine.add_status(a, "burn", Some(2), None).unwrap();
        let id = applied.effect_id().unwrap();
        assert!(engine.edit_status(a, id, None, Some(4)).unwrap());
        assert_eq!(engine.character(a).unwrap().effect(StatusKind::Burn).unwrap().duration, 4);

        assert!(engine.remove_status(a, id).unwrap().is_some());
        assert!(engine.remove_status(a, id).unwrap().is_none());
    }

    #[test]
    fn test_dead_characters_cannot_gain_status() {
        let mut engine = CombatEngine::default();
        let a = engine.add_character("A", 10, Team::Ally);
        engine.character_mut(a).unwrap().dead = true;

        assert_eq!(
            engine.add_status(a, "bleed", None, None),
            Err(CombatError::InvalidTarget)
        );
    }
}
