//! Common test utilities - roster builders for engine tests

#![allow(dead_code)]

use skirmish::combat::{CharacterId, CombatEngine, FixedDice, ScriptedInput, Team};
use skirmish::EngineConfig;

/// Engine with dice that always show `face` and a scripted input queue
pub fn engine(face: u32, input: ScriptedInput) -> CombatEngine {
    CombatEngine::new(EngineConfig::default())
        .with_dice(FixedDice::new(&[face]))
        .with_input(input)
}

/// Add characters and place them on explicit cells
pub fn place(engine: &mut CombatEngine, roster: &[(&str, i32, Team, (i32, i32))]) -> Vec<CharacterId> {
    roster
        .iter()
        .map(|(name, hp, team, (x, y))| {
            let id = engine.add_character(name, *hp, *team);
            engine
                .move_character(id, *x, *y)
                .expect("position inside the grid");
            id
        })
        .collect()
}

pub fn hp(engine: &CombatEngine, id: CharacterId) -> i32 {
    engine.character(id).expect("character exists").hp
}
