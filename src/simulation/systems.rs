use bevy::prelude::*;

use crate::{
    audio::ThrusterAudio,
    constants::LANDER_BASE_OFFSET,
    levels::CurrentLevel,
    particles::kaboom,
    physics::{LanderCollision, RigidBody2d, Surface, TriggerEntered, TriggerZone},
    ui::HudState,
    visualization::{cleanup_level, spawn_level, Lander, LevelSpecific, ThrusterFlame},
};

use super::{
    reset_simulation, CommandOutbox, LanderCommand, LanderState, ObjectiveZone, ThrustAxes,
};

#[derive(Event, Debug, Clone, Copy)]
pub struct SceneReload;

pub fn level_loaded(level: Option<Res<CurrentLevel>>) -> bool {
    level.is_some()
}

pub fn setup(mut commands: Commands, asset_server: Res<AssetServer>, mut exit: EventWriter<AppExit>) {
    let level = match CurrentLevel::load() {
        Ok(level) => level,
        Err(e) => {
            error!("Failed to parse level: {}", e);
            exit.send(AppExit::error());
            return;
        }
    };

    info!("Loaded level \"{}\": {}", level.config.name, level.config.description);
    let (lander, zone, outbox) = build_level(&mut commands, &asset_server, &level);
    commands.insert_resource(lander);
    commands.insert_resource(zone);
    commands.insert_resource(outbox);
    commands.insert_resource(level);
}

fn build_level(
    commands: &mut Commands,
    asset_server: &AssetServer,
    level: &CurrentLevel,
) -> (LanderState, ObjectiveZone, CommandOutbox) {
    let entity = spawn_level(commands, asset_server, &level.config);

    let mut outbox = CommandOutbox::default();
    let (lander, zone) = reset_simulation(level, Some(entity), &mut outbox);
    (lander, zone, outbox)
}

pub fn thrust_system(
    axes: Res<ThrustAxes>,
    mut lander: ResMut<LanderState>,
    bodies: Query<&RigidBody2d, With<Lander>>,
    mut outbox: ResMut<CommandOutbox>,
) {
    if let Ok(body) = bodies.get_single() {
        lander.physics_tick(body.pose(), *axes, &mut outbox);
    }
}

pub fn integrate_bodies(
    time: Res<Time>,
    level: Res<CurrentLevel>,
    mut bodies: Query<&mut RigidBody2d>,
) {
    let dt = time.delta_secs();
    for mut body in bodies.iter_mut() {
        body.integrate(dt, level.config.physics.gravity);
    }
}

pub fn detect_contacts(
    lander: Res<LanderState>,
    zone: Res<ObjectiveZone>,
    mut bodies: Query<&mut RigidBody2d, With<Lander>>,
    mut collisions: EventWriter<LanderCollision>,
) {
    for mut body in bodies.iter_mut() {
        if let Some(collision) = body.resolve_contact(lander.feet.anchor_offset, &zone) {
            collisions.send(collision);
        }
    }
}

pub fn detect_triggers(
    bodies: Query<&RigidBody2d, With<Lander>>,
    mut triggers: Query<(Entity, &mut TriggerZone)>,
    mut entered: EventWriter<TriggerEntered>,
) {
    let Ok(body) = bodies.get_single() else {
        return;
    };

    for (entity, mut trigger) in triggers.iter_mut() {
        if trigger.update_overlap(body.position, LANDER_BASE_OFFSET) {
            entered.send(TriggerEntered {
                trigger: entity,
                tag: trigger.tag,
            });
        }
    }
}

// A touchdown on the pad that the hull survives arms it straight away.
pub fn handle_collisions(
    mut collisions: EventReader<LanderCollision>,
    mut lander: ResMut<LanderState>,
    mut zone: ResMut<ObjectiveZone>,
    mut outbox: ResMut<CommandOutbox>,
) {
    for collision in collisions.read() {
        lander.on_collision(collision.relative_speed, collision.position, &mut outbox);
        if !lander.destroyed && collision.surface == Surface::Pad {
            zone.activate_landing_pad();
        }
    }
}

/// Contact sensor on the pad. Arms it every tick an intact lander stands on it,
/// so sliding onto the pad counts as well as touching down on it.
pub fn pad_contact_sensor(
    lander: Res<LanderState>,
    mut zone: ResMut<ObjectiveZone>,
    bodies: Query<&RigidBody2d, With<Lander>>,
) {
    if lander.destroyed {
        return;
    }

    for body in bodies.iter() {
        if body.supporting_surface(lander.feet.anchor_offset, &zone) == Some(Surface::Pad) {
            zone.activate_landing_pad();
        }
    }
}

pub fn handle_triggers(
    mut entered: EventReader<TriggerEntered>,
    mut lander: ResMut<LanderState>,
    mut outbox: ResMut<CommandOutbox>,
) {
    for event in entered.read() {
        lander.on_trigger_enter(event.tag, event.trigger, &mut outbox);
    }
}

pub fn frame_tick_system(
    time: Res<Time>,
    mut lander: ResMut<LanderState>,
    zone: Res<ObjectiveZone>,
    bodies: Query<&RigidBody2d, With<Lander>>,
    mut outbox: ResMut<CommandOutbox>,
) {
    if let Ok(body) = bodies.get_single() {
        lander.frame_tick(body.position, zone.position(), time.delta_secs(), &mut outbox);
    }
}

pub fn objective_system(
    time: Res<Time>,
    mut zone: ResMut<ObjectiveZone>,
    mut lander: ResMut<LanderState>,
    landers: Query<(), With<Lander>>,
    mut outbox: ResMut<CommandOutbox>,
) {
    let Some(confirmed) = zone.tick(time.delta()) else {
        return;
    };

    match confirmed.lander {
        Some(entity) if landers.contains(entity) => lander.confirm_landing(&mut outbox),
        _ => warn!("Landing confirmed but there is no lander to lock out"),
    }
}

/// Carries out everything the lander and pad asked for this tick.
pub fn apply_lander_commands(
    mut commands: Commands,
    mut outbox: ResMut<CommandOutbox>,
    mut bodies: Query<(Entity, &mut RigidBody2d), With<Lander>>,
    mut flames: Query<&mut ThrusterFlame>,
    mut hud: ResMut<HudState>,
    mut audio: ResMut<ThrusterAudio>,
    mut reload: EventWriter<SceneReload>,
) {
    for command in outbox.drain() {
        match command {
            LanderCommand::ApplyForce { force, position } => {
                for (_, mut body) in bodies.iter_mut() {
                    body.apply_force_at_position(force, position);
                }
            }
            LanderCommand::SetFuelText(text) => hud.fuel_text = text,
            LanderCommand::SetThrusterActive { thruster, active } => {
                for mut flame in flames.iter_mut().filter(|flame| flame.thruster == thruster) {
                    flame.active = active;
                }
            }
            LanderCommand::PlayThrustAudio => audio.playing = true,
            LanderCommand::PauseThrustAudio => audio.playing = false,
            LanderCommand::SpawnExplosion { position, lifetime } => {
                let velocity = bodies
                    .get_single()
                    .map(|(_, body)| body.velocity)
                    .unwrap_or_default();
                kaboom(&mut commands, position, velocity, lifetime);
            }
            LanderCommand::DespawnLander => {
                for (entity, _) in bodies.iter() {
                    commands.entity(entity).despawn_recursive();
                }
            }
            LanderCommand::SetRestartVisible(visible) => hud.restart_visible = visible,
            LanderCommand::RemoveTrigger(entity) => {
                if let Some(mut entity_commands) = commands.get_entity(entity) {
                    entity_commands.despawn();
                }
            }
            LanderCommand::ReloadScene => {
                reload.send(SceneReload);
            }
        }
    }
}

pub fn reload_level(
    mut commands: Commands,
    mut reloads: EventReader<SceneReload>,
    asset_server: Res<AssetServer>,
    level: Res<CurrentLevel>,
    entities: Query<Entity, With<LevelSpecific>>,
    mut lander: ResMut<LanderState>,
    mut zone: ResMut<ObjectiveZone>,
    mut outbox: ResMut<CommandOutbox>,
    mut audio: ResMut<ThrusterAudio>,
) {
    if reloads.read().count() == 0 {
        return;
    }

    cleanup_level(&mut commands, &entities);
    let (new_lander, new_zone, mut new_outbox) = build_level(&mut commands, &asset_server, &level);
    *lander = new_lander;
    *zone = new_zone;
    outbox.0.append(&mut new_outbox.0);
    audio.playing = false;
    info!("Level \"{}\" reloaded", level.config.name);
}
