//! Gameplay and scene constants shared across systems.
//!
//! Timings are defaults only; [`crate::settings::GameSettings`] carries the
//! values actually used by a session.

/// Length of a round in milliseconds.
pub const ROUND_MS: u64 = 30_000;
/// Points awarded for each honoured hit.
pub const HIT_REWARD: u32 = 5;
/// Base animation unit. The idle bob lasts three of these, the death spin one.
pub const ANIMATION_MS: u64 = 1_000;
/// Delay between a hit and the robot leaving the scene.
pub const DYING_MS: u64 = 1_500;
/// Delay between a robot leaving the scene and its return.
pub const RESPAWN_DELAY_MS: u64 = 5_000;
/// Lower bound (inclusive) of the initial spawn delay.
pub const SPAWN_DELAY_MIN_MS: u64 = 2_000;
/// Upper bound (exclusive) of the initial spawn delay.
pub const SPAWN_DELAY_MAX_MS: u64 = 12_000;

/// Idle bob height keys, sampled at 0, 0.5 and 1 of the loop.
pub const IDLE_BOB_LOW: f32 = -40.0;
/// Peak of the idle bob.
pub const IDLE_BOB_HIGH: f32 = 5.0;
/// Final pitch of the death spin, in radians.
pub const DEATH_PITCH: f32 = -std::f32::consts::PI;

/// Uniform scale applied to the robot model.
pub const ROBOT_SCALE: f32 = 0.02;
/// Radius of the sphere used to pick a robot.
pub const HIT_RADIUS: f32 = 4.0;
/// Height of the pick sphere centre above the robot origin.
pub const HIT_CENTRE_HEIGHT: f32 = 4.0;

/// Height of the ground plane.
pub const GROUND_HEIGHT: f32 = -4.02;
/// Edge length of the square ground plane.
pub const GROUND_SIZE: f32 = 200.0;

/// Camera position in world space.
pub const CAMERA_POSITION: [f32; 3] = [0.0, 50.0, 40.0];
/// Camera pitch in radians (looking down at the grid).
pub const CAMERA_PITCH: f32 = -std::f32::consts::FRAC_PI_3;
/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 70.0;

/// Home slots for the nine robots, laid out on a 3x3 grid.
pub const SPAWN_LAYOUT: [[f32; 3]; 9] = [
    [-30.0, 0.0, -20.0],
    [-30.0, 0.0, 0.0],
    [-30.0, 0.0, 20.0],
    [0.0, 0.0, -20.0],
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 20.0],
    [30.0, 0.0, -20.0],
    [30.0, 0.0, 0.0],
    [30.0, 0.0, 20.0],
];
