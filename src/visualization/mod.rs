mod common;
mod components;

pub use common::*;
pub use components::*;

use bevy::prelude::*;

use crate::{
    audio::spawn_thruster_sound,
    constants::{LANDER_BASE_OFFSET, LANDER_HEIGHT, LANDER_WIDTH},
    levels::{LevelConfig, TriggerTag},
    physics::{RigidBody2d, TriggerZone},
    simulation::{LanderState, ObjectiveZone, Thruster},
};

const FEET_HEIGHT: f32 = 0.15;
const FLAME_LENGTH: f32 = 0.35;
const FLAME_WIDTH: f32 = 0.15;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera));
}

fn flame(thruster: Thruster, lander: &LanderState) -> impl Bundle {
    let mount = lander.thrusters.mount(thruster);
    // Flames point away from the hull, opposite to the thrust they give.
    let outward = mount.offset.normalize_or_zero();
    let center = mount.offset + outward * FLAME_LENGTH / 2.0;
    // Sprites are drawn pointing down (-Y), so turn from there.
    let angle = outward.y.atan2(outward.x) + std::f32::consts::FRAC_PI_2;

    (
        Sprite {
            color: Color::srgb(1.0, 0.6, 0.1),
            custom_size: Some(Vec2::new(FLAME_WIDTH, FLAME_LENGTH) * WORLD_TO_SCREEN_SCALE),
            ..default()
        },
        Transform::from_translation((center * WORLD_TO_SCREEN_SCALE).extend(-0.1))
            .with_rotation(Quat::from_rotation_z(angle)),
        Visibility::Hidden,
        ThrusterFlame {
            thruster,
            active: false,
        },
    )
}

/// Builds the whole level and returns the lander entity.
pub fn spawn_level(
    commands: &mut Commands,
    asset_server: &AssetServer,
    config: &LevelConfig,
) -> Entity {
    let lander = LanderState::from_level(config);
    let ground_height = 400.0;
    commands.spawn((
        Sprite {
            color: Color::srgb(0.35, 0.35, 0.38),
            custom_size: Some(Vec2::new(4000.0, ground_height)),
            ..default()
        },
        Transform::from_xyz(0.0, GROUND_OFFSET - ground_height / 2.0, Z_GROUND),
        Ground,
        LevelSpecific,
    ));

    let pad = &config.objective;
    let pad_screen = world_to_screen(Vec2::new(pad.x, pad.y));
    commands.spawn((
        Sprite {
            color: Color::srgb(0.2, 0.8, 0.3),
            custom_size: Some(Vec2::new(pad.width, pad.height) * WORLD_TO_SCREEN_SCALE),
            ..default()
        },
        Transform::from_xyz(pad_screen.x, pad_screen.y, Z_PROPS),
        LandingPad,
        LevelSpecific,
    ));

    for setup in &config.triggers {
        let position = Vec2::new(setup.x, setup.y);
        let screen = world_to_screen(position);
        let color = match setup.tag {
            TriggerTag::Fuel => Color::srgb(0.9, 0.8, 0.1),
            TriggerTag::Untagged => Color::srgba(0.6, 0.6, 0.6, 0.5),
        };
        commands.spawn((
            Sprite {
                color,
                custom_size: Some(Vec2::splat(setup.radius * 2.0 * WORLD_TO_SCREEN_SCALE)),
                ..default()
            },
            Transform::from_xyz(screen.x, screen.y, Z_PROPS),
            TriggerZone {
                position,
                radius: setup.radius,
                tag: setup.tag,
                overlapping: false,
            },
            LevelSpecific,
        ));
    }

    spawn_thruster_sound(commands, asset_server);

    let start = Vec2::new(config.lander.x0, config.lander.y0);
    let screen = world_to_screen(start);
    commands
        .spawn((
            Sprite {
                color: Color::srgb(0.85, 0.85, 0.9),
                custom_size: Some(Vec2::new(LANDER_WIDTH, LANDER_HEIGHT) * WORLD_TO_SCREEN_SCALE),
                ..default()
            },
            Transform::from_xyz(screen.x, screen.y, Z_LANDER),
            RigidBody2d::new(start, &config.physics),
            Lander,
            LevelSpecific,
        ))
        .with_children(|parent| {
            parent.spawn((
                Sprite {
                    color: Color::srgb(0.6, 0.6, 0.65),
                    custom_size: Some(
                        Vec2::new(LANDER_WIDTH * 1.2, FEET_HEIGHT) * WORLD_TO_SCREEN_SCALE,
                    ),
                    ..default()
                },
                Transform::from_translation(
                    (feet_center(lander.feet.anchor_offset) * WORLD_TO_SCREEN_SCALE).extend(-0.2),
                ),
                LanderFeet,
            ));
            for thruster in Thruster::ALL {
                parent.spawn(flame(thruster, &lander));
            }
        })
        .id()
}

// Folded feet tuck just under the hull and slide down by the anchor offset.
fn feet_center(anchor_offset: f32) -> Vec2 {
    Vec2::new(0.0, -LANDER_BASE_OFFSET - anchor_offset + FEET_HEIGHT / 2.0)
}

pub fn sync_lander_visuals(
    lander: Res<LanderState>,
    mut bodies: Query<(&RigidBody2d, &mut Transform), With<Lander>>,
    mut feet: Query<&mut Transform, (With<LanderFeet>, Without<Lander>)>,
    mut flames: Query<(&ThrusterFlame, &mut Visibility)>,
) {
    for (body, mut transform) in bodies.iter_mut() {
        let screen = world_to_screen(body.position);
        transform.translation.x = screen.x;
        transform.translation.y = screen.y;
        transform.rotation = Quat::from_rotation_z(body.rotation);
    }

    for mut transform in feet.iter_mut() {
        let center = feet_center(lander.feet.anchor_offset) * WORLD_TO_SCREEN_SCALE;
        transform.translation.y = center.y;
    }

    for (flame, mut visibility) in flames.iter_mut() {
        *visibility = if flame.active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

pub fn sync_pad_visual(zone: Res<ObjectiveZone>, mut pads: Query<&mut Transform, With<LandingPad>>) {
    let screen = world_to_screen(zone.position());
    for mut transform in pads.iter_mut() {
        transform.translation.x = screen.x;
        transform.translation.y = screen.y;
    }
}

pub fn cleanup_level(commands: &mut Commands, entities: &Query<Entity, With<LevelSpecific>>) {
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
