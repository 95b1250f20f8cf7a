use bevy::prelude::*;

use crate::{
    constants::{
        CRASH_SPEED, EXPLOSION_LIFETIME, FEET_ANCHOR_MAX, FEET_DEPLOY_RANGE, FEET_DEPLOY_RATE,
        FUEL_PER_BURN, FUEL_PICKUP_AMOUNT,
    },
    levels::{LevelConfig, TriggerTag},
};

use super::{fuel_text, BodyPose, CommandOutbox, LanderCommand, Thruster};

/// Signed axis readings for one physics tick, each in -1.0..=1.0.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrustAxes {
    pub vertical: f32,
    pub horizontal: f32,
}

impl ThrustAxes {
    /// Whether the axis feeding `thruster` asks it to fire.
    ///
    /// Pushing right fires the left thruster and vice versa.
    pub fn wants(&self, thruster: Thruster) -> bool {
        match thruster {
            Thruster::Main => self.vertical > 0.0,
            Thruster::Left => self.horizontal > 0.0,
            Thruster::Right => self.horizontal < 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrusterMount {
    pub offset: Vec2, // local to the lander center
    pub power: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrusterLayout {
    pub main: ThrusterMount,
    pub left: ThrusterMount,
    pub right: ThrusterMount,
}

impl ThrusterLayout {
    pub fn mount(&self, thruster: Thruster) -> ThrusterMount {
        match thruster {
            Thruster::Main => self.main,
            Thruster::Left => self.left,
            Thruster::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeetDeployment {
    pub deploying: bool,
    pub anchor_offset: f32,
}

impl FeetDeployment {
    /// Latches deployment once the lander is close enough to the objective.
    pub fn check_range(&mut self, lander: Vec2, objective: Vec2) {
        if !self.deploying && lander.distance(objective) <= FEET_DEPLOY_RANGE {
            self.deploying = true;
        }
    }

    /// Moves the anchor out; the step that would reach the bound releases the
    /// latch and leaves the anchor where it is.
    pub fn advance(&mut self, dt: f32) {
        if !self.deploying {
            return;
        }

        let next = self.anchor_offset + dt * FEET_DEPLOY_RATE;
        if next < FEET_ANCHOR_MAX {
            self.anchor_offset = next;
        } else {
            self.deploying = false;
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct LanderState {
    pub fuel: f32,
    pub thrust_allowed: bool,
    pub feet: FeetDeployment,
    pub destroyed: bool,
    pub thrusters: ThrusterLayout,
    pub firing: [bool; 3], // indexed like Thruster::ALL
    thrust_sfx_requested: bool,
    thrust_sfx_playing: bool,
}

impl LanderState {
    pub fn from_level(config: &LevelConfig) -> Self {
        let offsets = &config.lander.thrusters;
        let physics = &config.physics;
        Self {
            fuel: config.lander.initial_fuel,
            thrust_allowed: config.lander.allow_thrust,
            feet: FeetDeployment {
                deploying: false,
                anchor_offset: config.lander.feet_anchor,
            },
            destroyed: false,
            thrusters: ThrusterLayout {
                main: ThrusterMount {
                    offset: Vec2::from(offsets.bottom),
                    power: physics.main_thrust_power,
                },
                left: ThrusterMount {
                    offset: Vec2::from(offsets.left),
                    power: physics.side_thrust_power,
                },
                right: ThrusterMount {
                    offset: Vec2::from(offsets.right),
                    power: physics.side_thrust_power,
                },
            },
            firing: [false; 3],
            thrust_sfx_requested: false,
            thrust_sfx_playing: false,
        }
    }

    pub fn can_thrust(&self) -> bool {
        !self.destroyed && self.thrust_allowed && self.fuel > 0.0
    }

    pub fn is_firing(&self, thruster: Thruster) -> bool {
        self.firing[thruster as usize]
    }

    /// Fixed-step part: reads the axes and fires whichever thrusters they ask for.
    ///
    /// Flames and sound follow the input alone; only the force and the fuel
    /// drain need fuel and permission to thrust.
    pub fn physics_tick(&mut self, pose: BodyPose, axes: ThrustAxes, outbox: &mut CommandOutbox) {
        if self.destroyed {
            return;
        }

        let mut any_fired = false;
        for thruster in Thruster::ALL {
            let fired = axes.wants(thruster);
            if fired {
                self.fire(thruster, pose, outbox);
            }
            self.firing[thruster as usize] = fired;
            outbox.push(LanderCommand::SetThrusterActive {
                thruster,
                active: fired,
            });
            any_fired |= fired;
        }
        self.thrust_sfx_requested = any_fired;
    }

    fn fire(&mut self, thruster: Thruster, pose: BodyPose, outbox: &mut CommandOutbox) {
        if !self.can_thrust() {
            return;
        }

        let mount = self.thrusters.mount(thruster);
        let at = pose.to_world(mount.offset);
        let direction = (pose.position - at).normalize_or_zero();
        outbox.push(LanderCommand::ApplyForce {
            force: direction * mount.power,
            position: at,
        });

        self.fuel = (self.fuel - FUEL_PER_BURN).max(0.0);
        outbox.push(LanderCommand::SetFuelText(fuel_text(self.fuel)));
    }

    /// Per-frame part: feet deployment and the thruster sound.
    pub fn frame_tick(
        &mut self,
        lander_position: Vec2,
        objective_position: Vec2,
        dt: f32,
        outbox: &mut CommandOutbox,
    ) {
        if self.destroyed {
            return;
        }

        self.feet.check_range(lander_position, objective_position);
        self.feet.advance(dt);

        // Paused rather than stopped, so the loop picks up where it left off.
        if self.thrust_sfx_requested != self.thrust_sfx_playing {
            self.thrust_sfx_playing = self.thrust_sfx_requested;
            outbox.push(if self.thrust_sfx_playing {
                LanderCommand::PlayThrustAudio
            } else {
                LanderCommand::PauseThrustAudio
            });
        }
    }

    pub fn on_collision(&mut self, relative_speed: f32, position: Vec2, outbox: &mut CommandOutbox) {
        if self.destroyed || relative_speed <= CRASH_SPEED {
            return;
        }

        info!("Lander destroyed on impact at {:.2} units/s", relative_speed);
        self.destroyed = true;
        self.firing = [false; 3];
        self.thrust_sfx_requested = false;
        outbox.push(LanderCommand::SpawnExplosion {
            position,
            lifetime: EXPLOSION_LIFETIME,
        });
        outbox.push(LanderCommand::DespawnLander);
        if self.thrust_sfx_playing {
            self.thrust_sfx_playing = false;
            outbox.push(LanderCommand::PauseThrustAudio);
        }
        outbox.push(LanderCommand::SetRestartVisible(true));
    }

    pub fn on_trigger_enter(&mut self, tag: TriggerTag, trigger: Entity, outbox: &mut CommandOutbox) {
        if self.destroyed || tag != TriggerTag::Fuel {
            return;
        }

        self.fuel += FUEL_PICKUP_AMOUNT;
        info!("Picked up fuel, now {:.2}", self.fuel);
        outbox.push(LanderCommand::RemoveTrigger(trigger));
        outbox.push(LanderCommand::SetFuelText(fuel_text(self.fuel)));
    }

    /// Called once the pad finishes retracting. Thrust stays off from here on.
    pub fn confirm_landing(&mut self, outbox: &mut CommandOutbox) {
        info!("Landing confirmed, thrusters locked out");
        self.thrust_allowed = false;
        self.show_restart(outbox);
    }

    pub fn show_restart(&self, outbox: &mut CommandOutbox) {
        outbox.push(LanderCommand::SetRestartVisible(true));
    }

    pub fn restart(&self, outbox: &mut CommandOutbox) {
        info!("Restarting level");
        outbox.push(LanderCommand::ReloadScene);
        outbox.push(LanderCommand::SetRestartVisible(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::CurrentLevel;

    fn lander() -> LanderState {
        LanderState::from_level(&CurrentLevel::load().unwrap().config)
    }

    fn pose() -> BodyPose {
        BodyPose {
            position: Vec2::new(1.0, 5.0),
            rotation: 0.0,
        }
    }

    const UP: ThrustAxes = ThrustAxes {
        vertical: 1.0,
        horizontal: 0.0,
    };

    fn forces(outbox: &CommandOutbox) -> Vec<(Vec2, Vec2)> {
        outbox
            .0
            .iter()
            .filter_map(|command| match command {
                LanderCommand::ApplyForce { force, position } => Some((*force, *position)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn fifty_ticks_of_main_thrust() {
        let mut state = lander();
        state.fuel = 100.0;
        let mut outbox = CommandOutbox::default();

        for _ in 0..50 {
            state.physics_tick(pose(), UP, &mut outbox);
        }

        assert!((state.fuel - 99.5).abs() < 1e-3);
        let applied = forces(&outbox);
        assert_eq!(applied.len(), 50);
        let power = state.thrusters.main.power;
        for (force, position) in applied {
            assert!((force - Vec2::new(0.0, power)).length() < 1e-5);
            assert!((position - Vec2::new(1.0, 4.5)).length() < 1e-5);
        }
    }

    #[test]
    fn each_active_thruster_drains_its_own_quantum() {
        let mut state = lander();
        state.fuel = 10.0;
        let mut outbox = CommandOutbox::default();

        let axes = ThrustAxes {
            vertical: 1.0,
            horizontal: 0.5,
        };
        state.physics_tick(pose(), axes, &mut outbox);

        assert!((state.fuel - 9.98).abs() < 1e-4);
        assert!(state.is_firing(Thruster::Main));
        assert!(state.is_firing(Thruster::Left));
        assert!(!state.is_firing(Thruster::Right));

        // Left thruster sits on the left and pushes towards the center.
        let side = forces(&outbox)[1].0;
        assert!(side.x > 0.0);
        assert!(side.y.abs() < 1e-5);
    }

    #[test]
    fn no_force_once_fuel_is_gone() {
        let mut state = lander();
        state.fuel = 0.025;
        let mut outbox = CommandOutbox::default();

        for _ in 0..10 {
            state.physics_tick(pose(), UP, &mut outbox);
        }

        assert_eq!(forces(&outbox).len(), 3);
        assert_eq!(state.fuel, 0.0);
        // The flame still shows while the player holds the key.
        assert!(state.is_firing(Thruster::Main));
        assert!(outbox.0.ends_with(&[
            LanderCommand::SetThrusterActive {
                thruster: Thruster::Main,
                active: true
            },
            LanderCommand::SetThrusterActive {
                thruster: Thruster::Left,
                active: false
            },
            LanderCommand::SetThrusterActive {
                thruster: Thruster::Right,
                active: false
            },
        ]));
    }

    #[test]
    fn empty_tank_still_plays_thrust_sound() {
        let mut state = lander();
        state.fuel = 0.0;
        let mut outbox = CommandOutbox::default();

        state.physics_tick(pose(), UP, &mut outbox);
        assert!(forces(&outbox).is_empty());
        outbox.0.clear();
        state.frame_tick(Vec2::new(0.0, 10.0), Vec2::ZERO, 0.016, &mut outbox);

        assert_eq!(outbox.0, vec![LanderCommand::PlayThrustAudio]);
    }

    #[test]
    fn lockout_blocks_thrust_with_fuel_left() {
        let mut state = lander();
        state.thrust_allowed = false;
        let mut outbox = CommandOutbox::default();

        state.physics_tick(pose(), UP, &mut outbox);

        assert!(forces(&outbox).is_empty());
        assert_eq!(state.fuel, 100.0);
        assert!(state.is_firing(Thruster::Main));
    }

    #[test]
    fn downward_axis_fires_nothing() {
        let mut state = lander();
        let mut outbox = CommandOutbox::default();
        let axes = ThrustAxes {
            vertical: -1.0,
            horizontal: 0.0,
        };

        state.physics_tick(pose(), axes, &mut outbox);

        assert!(forces(&outbox).is_empty());
        assert_eq!(outbox.0.len(), 3);
    }

    #[test]
    fn thrust_sound_pauses_and_resumes() {
        let mut state = lander();
        let mut outbox = CommandOutbox::default();
        let here = Vec2::new(0.0, 10.0);
        let pad = Vec2::ZERO;

        state.physics_tick(pose(), UP, &mut outbox);
        outbox.0.clear();
        state.frame_tick(here, pad, 0.016, &mut outbox);
        state.frame_tick(here, pad, 0.016, &mut outbox);
        assert_eq!(outbox.0, vec![LanderCommand::PlayThrustAudio]);

        outbox.0.clear();
        state.physics_tick(pose(), ThrustAxes::default(), &mut outbox);
        outbox.0.clear();
        state.frame_tick(here, pad, 0.016, &mut outbox);
        assert_eq!(outbox.0, vec![LanderCommand::PauseThrustAudio]);
    }

    #[test]
    fn feet_deploy_only_in_range() {
        let mut state = lander();
        let mut outbox = CommandOutbox::default();

        state.frame_tick(Vec2::new(0.0, 1.5), Vec2::ZERO, 0.1, &mut outbox);
        assert!(!state.feet.deploying);
        assert_eq!(state.feet.anchor_offset, 0.0);

        state.frame_tick(Vec2::new(0.0, 1.0), Vec2::ZERO, 0.3, &mut outbox);
        assert!(state.feet.deploying);
        assert!((state.feet.anchor_offset - 0.1).abs() < 1e-6);
    }

    #[test]
    fn feet_stop_below_bound_and_hold() {
        let mut feet = FeetDeployment::default();
        feet.check_range(Vec2::ZERO, Vec2::new(0.5, 0.0));

        let mut last = feet.anchor_offset;
        let mut ticks = 0;
        while feet.deploying {
            feet.advance(0.1);
            assert!(feet.anchor_offset >= last);
            assert!(feet.anchor_offset < FEET_ANCHOR_MAX);
            last = feet.anchor_offset;
            ticks += 1;
            assert!(ticks < 100);
        }

        let held = feet.anchor_offset;
        feet.advance(0.1);
        assert_eq!(feet.anchor_offset, held);

        // Re-latching in range does not push past the bound.
        feet.check_range(Vec2::ZERO, Vec2::new(0.5, 0.0));
        assert!(feet.deploying);
        feet.advance(0.1);
        assert_eq!(feet.anchor_offset, held);
        assert!(!feet.deploying);
    }

    #[test]
    fn hard_collision_destroys_lander() {
        let mut state = lander();
        let mut outbox = CommandOutbox::default();
        let at = Vec2::new(3.0, 0.5);

        state.on_collision(2.0, at, &mut outbox);

        assert!(state.destroyed);
        assert_eq!(
            outbox.0,
            vec![
                LanderCommand::SpawnExplosion {
                    position: at,
                    lifetime: EXPLOSION_LIFETIME
                },
                LanderCommand::DespawnLander,
                LanderCommand::SetRestartVisible(true),
            ]
        );

        // Nothing more happens to a wreck.
        outbox.0.clear();
        state.on_collision(5.0, at, &mut outbox);
        state.physics_tick(pose(), UP, &mut outbox);
        assert!(outbox.0.is_empty());
    }

    #[test]
    fn gentle_contact_is_harmless() {
        let mut state = lander();
        let mut outbox = CommandOutbox::default();

        state.on_collision(1.0, Vec2::ZERO, &mut outbox);
        state.on_collision(0.3, Vec2::ZERO, &mut outbox);

        assert!(!state.destroyed);
        assert!(outbox.0.is_empty());
    }

    #[test]
    fn fuel_pickup_adds_ten() {
        let mut state = lander();
        state.fuel = 5.0;
        let mut outbox = CommandOutbox::default();
        let pickup = Entity::from_raw(7);

        state.on_trigger_enter(TriggerTag::Fuel, pickup, &mut outbox);

        assert_eq!(state.fuel, 15.0);
        assert_eq!(outbox.0[0], LanderCommand::RemoveTrigger(pickup));
        assert_eq!(outbox.0[1], LanderCommand::SetFuelText("Fuel 15".into()));
    }

    #[test]
    fn untagged_trigger_is_ignored() {
        let mut state = lander();
        state.fuel = 5.0;
        let mut outbox = CommandOutbox::default();

        state.on_trigger_enter(TriggerTag::Untagged, Entity::from_raw(7), &mut outbox);

        assert_eq!(state.fuel, 5.0);
        assert!(outbox.0.is_empty());
    }

    #[test]
    fn restart_reloads_and_hides_button() {
        let state = lander();
        let mut outbox = CommandOutbox::default();

        state.restart(&mut outbox);

        assert_eq!(
            outbox.0,
            vec![
                LanderCommand::ReloadScene,
                LanderCommand::SetRestartVisible(false)
            ]
        );
    }
}
