//! Configuration
//!
//! Engine settings and scenario files are layered with figment:
//! built-in defaults, then an optional TOML file, then `SKIRMISH_`
//! environment variables (nested keys split on `__`, e.g.
//! `SKIRMISH_ENGINE__SEED=7`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::combat::{CombatEngine, CombatResult, Position, Team};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SKIRMISH_";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width and height of the square grid
    pub grid_size: i32,
    /// Value suggested when asking for a shield amount
    pub default_shield: i32,
    /// Sides of the bonus damage die
    pub die_sides: u32,
    /// RNG seed for reproducible dice (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            default_shield: 20,
            die_sides: 4,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load engine settings from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        layered(Self::default(), path).extract()
    }
}

/// A status a scenario character starts with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSpec {
    pub kind: String,
    #[serde(default)]
    pub stacks: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
}

/// A scenario roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSpec {
    pub name: String,
    pub hp: i32,
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub statuses: Vec<StatusSpec>,
}

/// An encounter ready to simulate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub engine: EngineConfig,
    /// Batch passes to run
    pub turns: u32,
    pub characters: Vec<CharacterSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            turns: 1,
            characters: Vec::new(),
        }
    }
}

impl Scenario {
    /// Load a scenario from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        layered(Self::default(), path).extract()
    }

    /// Build an engine holding this scenario's roster
    pub fn build(&self) -> CombatResult<CombatEngine> {
        let mut engine = CombatEngine::new(self.engine.clone());
        for spec in &self.characters {
            let id = engine.add_character(&spec.name, spec.hp, spec.team);
            if let Some(pos) = spec.position {
                engine.move_character(id, pos.x, pos.y)?;
            }
            for status in &spec.statuses {
                engine.add_status(id, &status.kind, status.stacks, status.duration)?;
            }
        }
        Ok(engine)
    }
}

fn layered<T: Serialize>(defaults: T, path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(defaults));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::StatusKind;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.default_shield, 20);
        assert_eq!(config.die_sides, 4);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_load_engine_config_file() {
        let file = write_toml("grid_size = 10\nseed = 99\n");
        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.seed, Some(99));
        // Unset keys keep their defaults
        assert_eq!(config.default_shield, 20);
    }

    #[test]
    fn test_load_scenario() {
        let file = write_toml(
            r#"
turns = 3

[engine]
seed = 5

[[characters]]
name = "Aria"
hp = 40
team = "ally"
position = { x = 2, y = 3 }
statuses = [{ kind = "moral", stacks = 2 }]

[[characters]]
name = "Goblin"
hp = 25
team = "enemy"
statuses = [{ kind = "bleed", stacks = 1, duration = 0 }]
"#,
        );

        let scenario = Scenario::load(Some(file.path())).unwrap();
        assert_eq!(scenario.turns, 3);
        assert_eq!(scenario.engine.seed, Some(5));
        assert_eq!(scenario.characters.len(), 2);

        let engine = scenario.build().unwrap();
        let aria = &engine.roster()[0];
        assert_eq!(aria.position, Position::new(2, 3));
        assert_eq!(aria.stacks(StatusKind::Moral), 2);

        let goblin = &engine.roster()[1];
        assert_eq!(goblin.team, Team::Enemy);
        assert_eq!(goblin.effect(StatusKind::Bleed).unwrap().duration, 0);
    }

    #[test]
    fn test_build_rejects_unknown_status() {
        let scenario = Scenario {
            characters: vec![CharacterSpec {
                name: "Aria".into(),
                hp: 10,
                team: Team::Ally,
                position: None,
                statuses: vec![StatusSpec {
                    kind: "frostbite".into(),
                    stacks: None,
                    duration: None,
                }],
            }],
            ..Scenario::default()
        };
        assert!(scenario.build().is_err());
    }
}
