// Physical dimensions in world units
pub const LANDER_HEIGHT: f32 = 1.0; // Hull height, feet excluded
pub const LANDER_WIDTH: f32 = 0.8; // Hull width
pub const LANDER_BASE_OFFSET: f32 = LANDER_HEIGHT / 2.0; // Distance from center to hull base

// Landing feet
pub const FEET_DEPLOY_RANGE: f32 = 1.0; // Distance to the objective that starts deployment
pub const FEET_ANCHOR_MAX: f32 = 0.38; // Anchor offset the feet never reach
pub const FEET_DEPLOY_RATE: f32 = 1.0 / 3.0; // Anchor offset per second

// Fuel
pub const FUEL_PER_BURN: f32 = 0.01; // Drained per thruster per physics tick
pub const FUEL_PICKUP_AMOUNT: f32 = 10.0;

// Hull gives out above this relative speed
pub const CRASH_SPEED: f32 = 1.0;

// Landing pad
pub const PAD_RETRACT_DELAY: f32 = 0.5; // seconds from activation until landing is confirmed
pub const PAD_RETRACT_RATE: f32 = 1.0 / 3.0; // units per second

pub const EXPLOSION_LIFETIME: f32 = 1.0; // seconds

// Physics tick, 50 Hz
pub const FIXED_TIMESTEP_HZ: f64 = 50.0;
