use bevy::prelude::*;
use serde::Deserialize;

const LEVEL0: &str = include_str!("../assets/levels/level0.ron");

#[derive(Debug, Deserialize, Clone)]
pub struct Physics {
    pub gravity: f32,           // vertical acceleration (units/s²), negative is down
    pub dry_mass: f32,          // mass of the lander
    pub moment_of_inertia: f32, // resistance to spin
    pub main_thrust_power: f32, // force of the bottom thruster
    pub side_thrust_power: f32, // force of each side thruster
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThrusterOffsets {
    pub bottom: (f32, f32), // local to the lander center
    pub left: (f32, f32),
    pub right: (f32, f32),
}

#[derive(Debug, Deserialize, Clone)]
pub struct LanderSetup {
    pub x0: f32,
    pub y0: f32,
    pub initial_fuel: f32,
    pub allow_thrust: bool,
    pub feet_anchor: f32, // starting anchor offset of the folded feet
    pub thrusters: ThrusterOffsets,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObjectiveSetup {
    pub x: f32, // pad center
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTag {
    Fuel,
    Untagged,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TriggerSetup {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub tag: TriggerTag,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelConfig {
    pub name: String,
    pub description: String,
    pub physics: Physics,
    pub lander: LanderSetup,
    pub objective: ObjectiveSetup,
    pub triggers: Vec<TriggerSetup>,
}

impl LevelConfig {
    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::de::from_str::<LevelConfig>(content)
    }
}

#[derive(Resource, Clone)]
pub struct CurrentLevel {
    pub config: LevelConfig,
}

impl CurrentLevel {
    /// Parses the level compiled into the binary.
    pub fn load() -> Result<Self, ron::error::SpannedError> {
        LevelConfig::from_ron(LEVEL0).map(|config| Self { config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_level_parses() {
        let level = CurrentLevel::load().expect("level0.ron should parse");
        let config = level.config;

        assert!(config.lander.initial_fuel > 0.0);
        assert!(config.lander.allow_thrust);
        assert!(config.physics.gravity < 0.0);
        assert!(config.objective.width > 0.0);
        assert!(config
            .triggers
            .iter()
            .any(|trigger| trigger.tag == TriggerTag::Fuel));
    }

    #[test]
    fn bottom_thruster_sits_below_center() {
        let config = CurrentLevel::load().unwrap().config;
        let (x, y) = config.lander.thrusters.bottom;
        assert_eq!(x, 0.0);
        assert!(y < 0.0);
    }

    #[test]
    fn malformed_level_is_an_error() {
        assert!(LevelConfig::from_ron("(name: \"broken\")").is_err());
        assert!(LevelConfig::from_ron("not ron at all").is_err());
    }
}
