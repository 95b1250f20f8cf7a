use bevy::prelude::*;

pub const WORLD_TO_SCREEN_SCALE: f32 = 60.0; // pixels per world unit
pub const GROUND_OFFSET: f32 = -250.0; // Pixels from center of screen to ground

// Draw order
pub const Z_GROUND: f32 = 0.0;
pub const Z_PROPS: f32 = 1.0;
pub const Z_LANDER: f32 = 2.0;
pub const Z_PARTICLES: f32 = 3.0;

pub fn world_to_screen(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x * WORLD_TO_SCREEN_SCALE,
        pos.y * WORLD_TO_SCREEN_SCALE + GROUND_OFFSET,
    )
}
