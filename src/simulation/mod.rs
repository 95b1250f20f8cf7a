// simulation/mod.rs
use bevy::prelude::*;

use crate::levels::CurrentLevel;

pub mod lander;
pub mod objective;
pub mod systems;

pub use lander::{LanderState, ThrustAxes};
pub use objective::ObjectiveZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thruster {
    Main,
    Left,
    Right,
}

impl Thruster {
    pub const ALL: [Thruster; 3] = [Thruster::Main, Thruster::Left, Thruster::Right];
}

/// Requests from the lander and pad logic to the rest of the game.
///
/// The tick functions only ever push these; `apply_lander_commands` turns them
/// into forces, sprites, sounds and UI changes.
#[derive(Debug, Clone, PartialEq)]
pub enum LanderCommand {
    ApplyForce { force: Vec2, position: Vec2 },
    SetFuelText(String),
    SetThrusterActive { thruster: Thruster, active: bool },
    PlayThrustAudio,
    PauseThrustAudio,
    SpawnExplosion { position: Vec2, lifetime: f32 },
    DespawnLander,
    SetRestartVisible(bool),
    RemoveTrigger(Entity),
    ReloadScene,
}

#[derive(Resource, Default, Debug)]
pub struct CommandOutbox(pub Vec<LanderCommand>);

impl CommandOutbox {
    pub fn push(&mut self, command: LanderCommand) {
        self.0.push(command);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, LanderCommand> {
        self.0.drain(..)
    }
}

/// Position and heading of a body in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyPose {
    pub position: Vec2,
    pub rotation: f32, // radians, counter-clockwise
}

impl BodyPose {
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation).rotate(local)
    }
}

/// Halves round to the even neighbour.
pub fn fuel_text(fuel: f32) -> String {
    format!("Fuel {}", fuel.round_ties_even())
}

/// Builds fresh state holders from the level, with the pad wired to the lander.
pub fn reset_simulation(
    level: &CurrentLevel,
    lander_entity: Option<Entity>,
    outbox: &mut CommandOutbox,
) -> (LanderState, ObjectiveZone) {
    let lander = LanderState::from_level(&level.config);
    let zone = ObjectiveZone::new(&level.config.objective, lander_entity);
    outbox.push(LanderCommand::SetFuelText(fuel_text(lander.fuel)));
    outbox.push(LanderCommand::SetRestartVisible(false));
    (lander, zone)
}
