use bevy::prelude::*;

use crate::simulation::Thruster;

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
pub struct Lander;

#[derive(Component)]
pub struct LanderFeet;

#[derive(Component)]
pub struct ThrusterFlame {
    pub thruster: Thruster,
    pub active: bool,
}

#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct LandingPad;

/// Everything despawned when the level reloads.
#[derive(Component)]
pub struct LevelSpecific;
