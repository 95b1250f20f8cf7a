use bevy::prelude::*;

use crate::{
    constants::{LANDER_BASE_OFFSET, LANDER_WIDTH},
    levels::{Physics, TriggerTag},
    simulation::{BodyPose, ObjectiveZone},
};

const GROUND_Y: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ground,
    Pad,
}

/// Raised on the tick the lander first touches a surface.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LanderCollision {
    pub relative_speed: f32,
    pub surface: Surface,
    pub position: Vec2,
}

/// Raised on the tick the lander first overlaps a trigger.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TriggerEntered {
    pub trigger: Entity,
    pub tag: TriggerTag,
}

#[derive(Component, Debug, Clone)]
pub struct RigidBody2d {
    pub position: Vec2, // world units
    pub velocity: Vec2,
    pub rotation: f32, // radians
    pub angular_velocity: f32,
    pub mass: f32,
    pub inertia: f32,
    pub in_contact: bool,
    force: Vec2,
    torque: f32,
}

impl RigidBody2d {
    pub fn new(position: Vec2, physics: &Physics) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            mass: physics.dry_mass,
            inertia: physics.moment_of_inertia,
            in_contact: false,
            force: Vec2::ZERO,
            torque: 0.0,
        }
    }

    pub fn pose(&self) -> BodyPose {
        BodyPose {
            position: self.position,
            rotation: self.rotation,
        }
    }

    /// Queues a force for the next step. Off-center forces also spin the body.
    pub fn apply_force_at_position(&mut self, force: Vec2, at: Vec2) {
        self.force += force;
        self.torque += (at - self.position).perp_dot(force);
    }

    /// Semi-implicit Euler step; clears the accumulated force and torque.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        let acceleration = self.force / self.mass + Vec2::new(0.0, gravity);
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        self.angular_velocity += self.torque / self.inertia * dt;
        self.rotation += self.angular_velocity * dt;

        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// The two lowest hull corners, lowered by the feet.
    pub fn footprint(&self, feet_offset: f32) -> [Vec2; 2] {
        let pose = self.pose();
        let base = -(LANDER_BASE_OFFSET + feet_offset);
        [
            pose.to_world(Vec2::new(-LANDER_WIDTH / 2.0, base)),
            pose.to_world(Vec2::new(LANDER_WIDTH / 2.0, base)),
        ]
    }

    /// Pushes the body out of the ground or pad. Returns the collision only on
    /// the step contact begins, with the speed the body hit at.
    pub fn resolve_contact(
        &mut self,
        feet_offset: f32,
        pad: &ObjectiveZone,
    ) -> Option<LanderCollision> {
        let (penetration, surface) = self
            .footprint(feet_offset)
            .into_iter()
            .map(|corner| {
                let (height, surface) = surface_below(corner.x, pad);
                (height - corner.y, surface)
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))?;

        if penetration < 0.0 {
            self.in_contact = false;
            return None;
        }

        let impact_speed = self.velocity.length();
        self.position.y += penetration;
        if self.velocity.y < 0.0 {
            self.velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }

        if self.in_contact {
            return None;
        }
        self.in_contact = true;
        Some(LanderCollision {
            relative_speed: impact_speed,
            surface,
            position: self.position,
        })
    }

    /// What the body is standing on this step, if anything. The highest
    /// surface under the footprint is the one carrying it.
    pub fn supporting_surface(&self, feet_offset: f32, pad: &ObjectiveZone) -> Option<Surface> {
        if !self.in_contact {
            return None;
        }

        self.footprint(feet_offset)
            .into_iter()
            .map(|corner| surface_below(corner.x, pad))
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, surface)| surface)
    }
}

/// Height of whatever is under `x`: the pad top if it covers `x` and stands
/// above the ground, otherwise the ground.
pub fn surface_below(x: f32, pad: &ObjectiveZone) -> (f32, Surface) {
    if pad.covers(x) && pad.top() > GROUND_Y {
        (pad.top(), Surface::Pad)
    } else {
        (GROUND_Y, Surface::Ground)
    }
}

#[derive(Component, Debug, Clone)]
pub struct TriggerZone {
    pub position: Vec2,
    pub radius: f32,
    pub tag: TriggerTag,
    pub overlapping: bool,
}

impl TriggerZone {
    /// Tracks overlap with a circle around the lander; true only on enter.
    pub fn update_overlap(&mut self, lander: Vec2, lander_radius: f32) -> bool {
        let now = self.position.distance(lander) <= self.radius + lander_radius;
        let entered = now && !self.overlapping;
        self.overlapping = now;
        entered
    }
}
