//! Wheelhouse execution layer.
//!
//! This crate contains the spin simulator (`SpinSimulator`) that turns wheel and ball
//! kinematics into a winning pocket, and the bet resolver (`resolve`) that scores a
//! bet slip against that pocket.
//!
//! ## Outcome invariants
//! - The winning number is decided once, at the tick the ball enters the pocket
//!   annulus. Anything after that (wheel coast-down, ball riding with the wheel) is
//!   presentation only.
//! - The angle-to-pocket mapping is `(POCKET_COUNT - raw) % POCKET_COUNT` over the
//!   wheel sequence; see [`spin::pocket_slot`].
//! - Randomness is only drawn at spin start and on deflector collisions.
//! - `resolve` is pure: same number and slip, same outcome.
//!
//! ## Driving a spin (example)
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use wheelhouse_execution::{resolve, PhysicsConfig, SpinSimulator, Tick};
//! use wheelhouse_types::{BetSlip, Selector};
//!
//! let physics = PhysicsConfig::default().validate().expect("default physics are valid");
//! let frame = physics.frame;
//! let mut simulator = SpinSimulator::with_rng(physics, StdRng::seed_from_u64(7));
//!
//! let mut slip = BetSlip::new();
//! slip.place(Selector::Red, 10).unwrap();
//!
//! simulator.start_spin().unwrap();
//! let winning_number = loop {
//!     if let Tick::Finished { winning_number } = simulator.tick(frame) {
//!         break winning_number;
//!     }
//! };
//! let outcome = resolve(winning_number, &slip);
//! assert!(outcome.total_payout == 0 || outcome.total_payout == 20);
//! ```

pub mod defaults;
pub mod physics;
pub mod resolver;
pub mod spin;

pub use physics::{ConfigError, DeflectorFrame, PhysicsConfig, WheelPhysics};
pub use resolver::{bet_wins, payout_multiplier, resolve};
pub use spin::{
    normalize_angle, pocket_slot, Settlement, SpinError, SpinSimulator, SpinState, SpinSummary,
    Tick, VisualState,
};
