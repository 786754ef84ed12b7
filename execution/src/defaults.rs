//! Default wheel physics.
//!
//! Velocities and accelerations are per reference frame ([`FRAME_NANOS`]); radii
//! share one arbitrary length unit.

/// Length of one reference frame (60 Hz).
pub const FRAME_NANOS: u64 = 16_666_667;

// Geometry
pub const DEFAULT_TRACK_RADIUS: f64 = 142.0;
pub const DEFAULT_DEFLECTOR_RADIUS: f64 = 125.0;
pub const DEFAULT_DEFLECTOR_BAND: f64 = 3.0;
pub const DEFAULT_DEFLECTOR_COUNT: u32 = 8;
/// Fraction of the deflector spacing on either side of a deflector that counts as a hit.
pub const DEFAULT_DEFLECTOR_TOLERANCE: f64 = 0.25;
pub const DEFAULT_POCKET_OUTER_RADIUS: f64 = 115.0;
pub const DEFAULT_POCKET_INNER_RADIUS: f64 = 100.0;

// Friction (multiplicative, per frame)
pub const DEFAULT_WHEEL_DECAY: f64 = 0.99;
pub const DEFAULT_BALL_DECAY: f64 = 0.995;
pub const DEFAULT_SETTLED_WHEEL_DECAY: f64 = 0.995;

// Launch bands (rad/frame, magnitudes)
pub const DEFAULT_WHEEL_SPEED_MIN: f64 = 0.10;
pub const DEFAULT_WHEEL_SPEED_MAX: f64 = 0.15;
pub const DEFAULT_BALL_SPEED_MIN: f64 = 0.15;
pub const DEFAULT_BALL_SPEED_MAX: f64 = 0.23;

// Descent
pub const DEFAULT_DESCENT_MARGIN: f64 = 0.05;
pub const DEFAULT_WHEEL_STALL_SPEED: f64 = 0.01;
pub const DEFAULT_BALL_STALL_SPEED: f64 = 0.05;
pub const DEFAULT_DESCENT_KICK: f64 = 0.1;
pub const DEFAULT_GRAVITY: f64 = 0.05;

// Collisions
pub const DEFAULT_DEFLECTOR_RESTITUTION: f64 = 0.5;
pub const DEFAULT_INNER_RIM_RESTITUTION: f64 = 0.3;
pub const DEFAULT_DEFLECTOR_JITTER: f64 = 0.02;

// Termination
pub const DEFAULT_WHEEL_STOP_SPEED: f64 = 0.0001;
/// One minute of simulated time.
pub const DEFAULT_SETTLE_DEADLINE_FRAMES: u64 = 3_600;
