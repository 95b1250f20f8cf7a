use bevy::prelude::*;

use crate::simulation::ThrustAxes;

/// Collapses a positive/negative key pair into one axis value.
fn axis(keys: &ButtonInput<KeyCode>, positive: [KeyCode; 2], negative: [KeyCode; 2]) -> f32 {
    let mut value = 0.0;
    if keys.any_pressed(positive) {
        value += 1.0;
    }
    if keys.any_pressed(negative) {
        value -= 1.0;
    }
    value
}

pub fn read_axes(keys: &ButtonInput<KeyCode>) -> ThrustAxes {
    ThrustAxes {
        vertical: axis(
            keys,
            [KeyCode::ArrowUp, KeyCode::KeyW],
            [KeyCode::ArrowDown, KeyCode::KeyS],
        ),
        horizontal: axis(
            keys,
            [KeyCode::ArrowRight, KeyCode::KeyD],
            [KeyCode::ArrowLeft, KeyCode::KeyA],
        ),
    }
}

// Sampled once per physics tick
pub fn sample_thrust_axes(keys: Res<ButtonInput<KeyCode>>, mut axes: ResMut<ThrustAxes>) {
    *axes = read_axes(&keys);
}
