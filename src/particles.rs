use bevy::prelude::*;
use rand::Rng;

use crate::physics::RigidBody2d;
use crate::simulation::{LanderState, Thruster};
use crate::visualization::{world_to_screen, Lander, LevelSpecific, Z_PARTICLES};

// Constants for particle system
const PARTICLE_LIFETIME: f32 = 0.5;
const PARTICLE_SIZE: f32 = 3.0;
const PARTICLE_BASE_SPEED: f32 = 3.0; // world units per second
const PARTICLE_SPREAD: f32 = 0.30; // Spread angle (in radians)
const PARTICLE_COUNT_PER_SPAWN: usize = 4;
const PARTICLE_BOUNCE_DAMPING: f32 = 0.1;
const PARTICLE_GROUND_Y: f32 = 0.0;

const EXPLOSION_PARTICLE_COUNT_MIN: usize = 100;
const EXPLOSION_PARTICLE_COUNT_MAX: usize = 200;
const EXPLOSION_PARTICLE_SPEED: f32 = 3.5;
const EXPLOSION_PARTICLE_SPREAD: f32 = 0.25;

#[derive(Component)]
pub struct ExhaustParticle {
    lifetime: Timer,
    velocity: Vec2, // world units per second
    world_pos: Vec2,
}

#[derive(Resource)]
pub struct ParticleSpawnTimer(pub Timer);

fn rotate(direction: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(direction)
}

fn spawn_particle(commands: &mut Commands, origin: Vec2, direction: Vec2, inherited: Vec2) {
    let mut rng = rand::thread_rng();
    let angle_offset = rng.gen_range(-PARTICLE_SPREAD..PARTICLE_SPREAD);
    let speed = PARTICLE_BASE_SPEED * rng.gen_range(0.8..1.2);
    let screen_pos = world_to_screen(origin);

    commands.spawn((
        Sprite {
            color: Color::srgba(0.8, 0.3, 0.2, 0.8),
            custom_size: Some(Vec2::new(PARTICLE_SIZE, PARTICLE_SIZE)),
            ..default()
        },
        Transform::from_xyz(screen_pos.x, screen_pos.y, Z_PARTICLES),
        ExhaustParticle {
            lifetime: Timer::from_seconds(PARTICLE_LIFETIME, TimerMode::Once),
            velocity: rotate(direction, angle_offset) * speed + inherited,
            world_pos: origin,
        },
        LevelSpecific,
    ));
}

// Make something Rico would appreciate
pub fn kaboom(commands: &mut Commands, position: Vec2, velocity: Vec2, lifetime: f32) {
    let mut rng = rand::thread_rng();
    let screen_pos = world_to_screen(position);

    let particle_count = rng.gen_range(EXPLOSION_PARTICLE_COUNT_MIN..EXPLOSION_PARTICLE_COUNT_MAX);
    for i in 0..particle_count {
        let angle = (i as f32 / particle_count as f32) * std::f32::consts::TAU;
        let angle_offset = rng.gen_range(-EXPLOSION_PARTICLE_SPREAD..EXPLOSION_PARTICLE_SPREAD);
        let direction = rotate(Vec2::from_angle(angle), angle_offset);
        let speed = EXPLOSION_PARTICLE_SPEED * rng.gen_range(0.8..1.2);

        commands.spawn((
            Sprite {
                color: Color::srgb(1.0, 0.5, 0.0),
                custom_size: Some(Vec2::new(4.0, 4.0)),
                ..default()
            },
            Transform::from_xyz(screen_pos.x, screen_pos.y, Z_PARTICLES),
            ExhaustParticle {
                lifetime: Timer::from_seconds(lifetime, TimerMode::Once),
                velocity: direction * speed + velocity,
                world_pos: position,
            },
            LevelSpecific,
        ));
    }
}

pub fn particle_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<ParticleSpawnTimer>,
    mut particles: Query<(Entity, &mut Transform, &mut ExhaustParticle)>,
    bodies: Query<&RigidBody2d, With<Lander>>,
    lander: Res<LanderState>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in particles.iter_mut() {
        particle.lifetime.tick(time.delta());
        if particle.lifetime.finished() {
            commands.entity(entity).despawn();
            continue;
        }

        let delta = particle.velocity * dt;
        particle.world_pos += delta;

        if particle.world_pos.y <= PARTICLE_GROUND_Y {
            particle.world_pos.y = PARTICLE_GROUND_Y;
            particle.velocity.y = -particle.velocity.y * PARTICLE_BOUNCE_DAMPING;
            particle.velocity.x *= 0.9;

            if particle.velocity.length() < 0.3 {
                commands.entity(entity).despawn();
                continue;
            }
        }

        let screen = world_to_screen(particle.world_pos);
        transform.translation.x = screen.x;
        transform.translation.y = screen.y;
    }

    let Ok(body) = bodies.get_single() else {
        return;
    };

    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let pose = body.pose();
    for thruster in Thruster::ALL {
        if !lander.is_firing(thruster) {
            continue;
        }
        let nozzle = pose.to_world(lander.thrusters.mount(thruster).offset);
        let exhaust_direction = (nozzle - pose.position).normalize_or_zero();
        for _ in 0..PARTICLE_COUNT_PER_SPAWN {
            spawn_particle(&mut commands, nozzle, exhaust_direction, body.velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::constants::EXPLOSION_LIFETIME;
    use crate::levels::CurrentLevel;

    fn particle_count(app: &mut App) -> usize {
        let mut particles = app.world_mut().query::<&ExhaustParticle>();
        particles.iter(app.world()).count()
    }

    #[test]
    fn explosion_clears_after_its_lifetime() {
        let level = CurrentLevel::load().unwrap();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(LanderState::from_level(&level.config))
            .insert_resource(ParticleSpawnTimer(Timer::from_seconds(
                0.05,
                TimerMode::Repeating,
            )))
            .add_systems(Startup, |mut commands: Commands| {
                // High enough that no debris reaches the ground within the lifetime.
                kaboom(&mut commands, Vec2::new(0.0, 5.0), Vec2::ZERO, EXPLOSION_LIFETIME);
            })
            .add_systems(Update, particle_system);

        // The first frame has no elapsed time; five more make half a second.
        for _ in 0..6 {
            app.update();
        }
        let spawned = particle_count(&mut app);
        assert!(spawned >= EXPLOSION_PARTICLE_COUNT_MIN);

        for _ in 0..5 {
            app.update();
        }
        assert_eq!(particle_count(&mut app), 0);
    }
}
