use std::time::Duration;

use bevy::prelude::*;

use crate::{
    constants::{PAD_RETRACT_DELAY, PAD_RETRACT_RATE},
    levels::ObjectiveSetup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadPhase {
    #[default]
    Idle,
    Retracting,
    Landed,
}

/// Emitted by [`ObjectiveZone::tick`] on the tick the retraction delay runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingConfirmed {
    pub lander: Option<Entity>,
}

/// The landing pad. Once the lander touches down it sinks for a short while and
/// then locks the lander's thrusters.
#[derive(Resource, Debug, Clone)]
pub struct ObjectiveZone {
    pub phase: PadPhase,
    pub contact_confirmed: bool,
    pub x: f32,
    pub vertical_position: f32,
    pub half_extents: Vec2,
    pub lander: Option<Entity>,
    retract_timer: Timer,
}

impl ObjectiveZone {
    pub fn new(setup: &ObjectiveSetup, lander: Option<Entity>) -> Self {
        if lander.is_none() {
            error!("Cannot find the lander; landing confirmation will have nothing to lock out");
        }

        Self {
            phase: PadPhase::Idle,
            contact_confirmed: false,
            x: setup.x,
            vertical_position: setup.y,
            half_extents: Vec2::new(setup.width, setup.height) / 2.0,
            lander,
            retract_timer: Timer::from_seconds(PAD_RETRACT_DELAY, TimerMode::Once),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.vertical_position)
    }

    pub fn top(&self) -> f32 {
        self.vertical_position + self.half_extents.y
    }

    pub fn covers(&self, x: f32) -> bool {
        (x - self.x).abs() <= self.half_extents.x
    }

    /// Starts the retraction sequence. Only the first call in the pad's
    /// lifetime does anything; returns whether this call started it.
    pub fn activate_landing_pad(&mut self) -> bool {
        if self.phase != PadPhase::Idle || self.contact_confirmed {
            return false;
        }

        info!("Activated landing pad");
        self.phase = PadPhase::Retracting;
        self.contact_confirmed = true;
        self.retract_timer.reset();
        true
    }

    /// Sinks the pad while retracting and reports when the delay has elapsed.
    pub fn tick(&mut self, delta: Duration) -> Option<LandingConfirmed> {
        if self.phase != PadPhase::Retracting {
            return None;
        }

        self.vertical_position -= delta.as_secs_f32() * PAD_RETRACT_RATE;

        self.retract_timer.tick(delta);
        if !self.retract_timer.finished() {
            return None;
        }

        self.phase = PadPhase::Landed;
        Some(LandingConfirmed {
            lander: self.lander,
        })
    }
}
