use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod audio;
mod constants;
mod input;
mod levels;
mod particles;
mod physics;
mod simulation;
mod ui;
mod visualization;

use audio::{sync_thruster_audio, ThrusterAudio};
use constants::FIXED_TIMESTEP_HZ;
use input::sample_thrust_axes;
use particles::{particle_system, ParticleSpawnTimer};
use physics::{LanderCollision, TriggerEntered};
use simulation::systems::{
    apply_lander_commands, detect_contacts, detect_triggers, frame_tick_system, handle_collisions,
    handle_triggers, integrate_bodies, level_loaded, objective_system, pad_contact_sensor,
    reload_level, setup, thrust_system, SceneReload,
};
use simulation::ThrustAxes;
use ui::{hud_system, HudState};
use visualization::{spawn_camera, sync_lander_visuals, sync_pad_visual};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Pad Lander".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.06)))
        .init_resource::<ThrustAxes>()
        .init_resource::<HudState>()
        .init_resource::<ThrusterAudio>()
        .insert_resource(ParticleSpawnTimer(Timer::from_seconds(
            0.05,
            TimerMode::Repeating,
        )))
        .add_event::<LanderCollision>()
        .add_event::<TriggerEntered>()
        .add_event::<SceneReload>()
        .add_systems(Startup, (spawn_camera, setup))
        // Physics tick: input, integration, contacts, then thrust for the next step.
        .add_systems(
            FixedUpdate,
            (
                sample_thrust_axes,
                integrate_bodies,
                detect_contacts,
                detect_triggers,
                handle_collisions,
                pad_contact_sensor,
                handle_triggers,
                thrust_system,
                apply_lander_commands,
            )
                .chain()
                .run_if(level_loaded),
        )
        // Frame tick: feet, pad retraction, sound and everything drawn.
        .add_systems(
            Update,
            (
                frame_tick_system,
                objective_system,
                apply_lander_commands,
                reload_level,
                sync_lander_visuals,
                sync_pad_visual,
                sync_thruster_audio,
                particle_system,
                hud_system,
            )
                .chain()
                .run_if(level_loaded),
        )
        .run();
}
