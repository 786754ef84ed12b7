//! Wheel and ball simulation.
//!
//! A [`SpinSimulator`] owns at most one [`SpinState`]. The caller starts a spin and
//! then drives it with [`SpinSimulator::tick`] until it reports [`Tick::Finished`].
//! There is no internal scheduling: abandoning a spin is just dropping its state.
//!
//! ## Phases
//! 1. **Track** - wheel and ball spin in opposite directions under friction.
//! 2. **Descent** - once the ball has slowed towards the wheel's speed it falls
//!    inwards, bouncing off the deflector ring and the inner rim.
//! 3. **Settled** - the first tick the ball is strictly inside the pocket annulus
//!    commits the winning pocket. The ball then rides with the wheel while the wheel
//!    coasts to a stop.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{f64::consts::TAU, time::Duration};
use thiserror::Error;
use tracing::{debug, trace, warn};
use wheelhouse_types::{POCKET_COUNT, WHEEL_SEQUENCE};

use crate::physics::{DeflectorFrame, WheelPhysics};


/// Angular width of one pocket.
pub const POCKET_WIDTH: f64 = TAU / POCKET_COUNT as f64;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinError {
    #[error("spin already in progress")]
    SpinInProgress,
    #[error("tick duration must be > 0")]
    ZeroStep,
}

/// Normalize an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs.
    if normalized >= TAU {
        0.0
    } else {
        normalized
    }
}

/// Map a ball angle measured relative to the wheel onto a wheel slot.
///
/// Pockets are closed-open intervals of [`POCKET_WIDTH`]. The raw interval index is
/// inverted with `(POCKET_COUNT - raw) % POCKET_COUNT` because the pockets are laid
/// out against the wheel's direction of rotation. An angle on a boundary belongs to
/// the interval it opens, which is the lower wheel slot everywhere except between
/// slots 0 and 36.
pub fn pocket_slot(relative_angle: f64) -> usize {
    let angle = normalize_angle(relative_angle);
    let raw = ((angle / POCKET_WIDTH).floor() as usize).min(POCKET_COUNT - 1);
    (POCKET_COUNT - raw) % POCKET_COUNT
}

/// Committed pocket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settlement {
    pub slot: usize,
    pub number: u8,
    /// Ball angle relative to the wheel at the moment of commitment, in `[0, 2π)`.
    pub relative_angle: f64,
    /// Set when the settle deadline dropped the ball into the pockets.
    pub forced: bool,
}

/// Kinematic state of one spin.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinState {
    pub wheel_angle: f64,
    pub wheel_velocity: f64,
    pub ball_angle: f64,
    pub ball_velocity: f64,
    pub ball_radius: f64,
    pub ball_radial_velocity: f64,
    pub descending: bool,
    pub settlement: Option<Settlement>,
    /// Wheel has coasted to a stop after settlement.
    pub finished: bool,
    pub ticks: u64,
    /// Simulated time in reference frames.
    pub frames: f64,
    pub deflector_hits: u32,
}

/// Read-only view handed to a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub wheel_angle: f64,
    pub ball_angle: f64,
    pub ball_radius: f64,
    pub settled: bool,
}

/// Result of one [`SpinSimulator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No spin has been started (or it was abandoned).
    Idle,
    Continuing,
    Finished { winning_number: u8 },
}

/// Summary of a spin driven to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinSummary {
    pub winning_number: u8,
    pub slot: usize,
    pub ticks: u64,
    pub deflector_hits: u32,
    pub forced: bool,
}

impl SpinState {
    fn launch<R: Rng>(physics: &WheelPhysics, rng: &mut R) -> Self {
        Self {
            wheel_angle: rng.gen_range(0.0..TAU),
            wheel_velocity: rng.gen_range(physics.wheel_speed_min..physics.wheel_speed_max),
            ball_angle: rng.gen_range(0.0..TAU),
            ball_velocity: -rng.gen_range(physics.ball_speed_min..physics.ball_speed_max),
            ball_radius: physics.track_radius,
            ball_radial_velocity: 0.0,
            descending: false,
            settlement: None,
            finished: false,
            ticks: 0,
            frames: 0.0,
            deflector_hits: 0,
        }
    }

    fn visual(&self) -> VisualState {
        VisualState {
            wheel_angle: normalize_angle(self.wheel_angle),
            ball_angle: normalize_angle(self.ball_angle),
            ball_radius: self.ball_radius,
            settled: self.settlement.is_some(),
        }
    }

    fn status(&self) -> Tick {
        match self.settlement {
            Some(settlement) if self.finished => Tick::Finished {
                winning_number: settlement.number,
            },
            _ => Tick::Continuing,
        }
    }

    fn advance<R: Rng>(&mut self, physics: &WheelPhysics, rng: &mut R, steps: f64) -> Tick {
        self.ticks += 1;
        self.frames += steps;

        if let Some(settlement) = self.settlement {
            self.coast(physics, settlement, steps);
            return self.status();
        }

        self.wheel_velocity *= physics.wheel_decay.powf(steps);
        self.ball_velocity *= physics.ball_decay.powf(steps);
        self.wheel_angle += self.wheel_velocity * steps;
        self.ball_angle += self.ball_velocity * steps;

        if self.descending {
            self.ball_radial_velocity -= physics.gravity * steps;
            self.ball_radius += self.ball_radial_velocity * steps;
            self.deflect(physics, rng);

            if self.ball_radius < physics.pocket_outer_radius
                && self.ball_radius > physics.pocket_inner_radius
            {
                self.settle(false);
                return Tick::Continuing;
            }

            if self.ball_radius < physics.pocket_inner_radius {
                self.ball_radius = physics.pocket_inner_radius;
                self.ball_radial_velocity *= -physics.inner_rim_restitution;
                trace!(
                    radial_velocity = self.ball_radial_velocity,
                    "ball bounced off inner rim"
                );
            }
        } else if self.should_descend(physics) {
            self.descending = true;
            self.ball_radial_velocity = -physics.descent_kick;
            debug!(
                tick = self.ticks,
                ball_velocity = self.ball_velocity,
                wheel_velocity = self.wheel_velocity,
                "ball leaving track"
            );
        }

        if self.frames >= physics.settle_deadline_frames as f64 {
            warn!(
                tick = self.ticks,
                radius = self.ball_radius,
                "settle deadline passed; dropping ball into pockets"
            );
            self.descending = true;
            self.ball_radius = physics.pocket_mid_radius();
            self.settle(true);
        }
        Tick::Continuing
    }

    fn should_descend(&self, physics: &WheelPhysics) -> bool {
        let ball = self.ball_velocity.abs();
        let wheel = self.wheel_velocity.abs();
        let caught_up = ball < wheel + physics.descent_margin && wheel > physics.wheel_stall_speed;
        let stalled = wheel <= physics.wheel_stall_speed && ball < physics.ball_stall_speed;
        caught_up || stalled
    }

    /// Bounce off at most one deflector.
    fn deflect<R: Rng>(&mut self, physics: &WheelPhysics, rng: &mut R) {
        if (self.ball_radius - physics.deflector_radius).abs() > physics.deflector_band {
            return;
        }
        let angle = match physics.deflector_frame {
            DeflectorFrame::Bowl => normalize_angle(self.ball_angle),
            DeflectorFrame::Wheel => normalize_angle(self.ball_angle - self.wheel_angle),
        };
        let hit = (0..physics.deflector_count).find(|&index| {
            let distance = (angle - f64::from(index) * physics.deflector_spacing).abs();
            distance.min(TAU - distance) < physics.deflector_tolerance
        });
        let Some(index) = hit else {
            return;
        };

        self.ball_radial_velocity *= -physics.deflector_restitution;
        self.ball_velocity += (rng.gen::<f64>() - 0.5) * physics.deflector_jitter;
        self.ball_radius = if self.ball_radial_velocity > 0.0 {
            physics.deflector_radius + physics.deflector_band
        } else {
            physics.deflector_radius - physics.deflector_band
        };
        self.deflector_hits += 1;
        trace!(
            deflector = index,
            radial_velocity = self.ball_radial_velocity,
            "ball hit deflector"
        );
    }

    fn settle(&mut self, forced: bool) {
        let relative_angle = normalize_angle(self.ball_angle - self.wheel_angle);
        let slot = pocket_slot(relative_angle);
        let number = WHEEL_SEQUENCE[slot];
        self.ball_velocity = 0.0;
        self.ball_radial_velocity = 0.0;
        self.settlement = Some(Settlement {
            slot,
            number,
            relative_angle,
            forced,
        });
        debug!(
            tick = self.ticks,
            slot,
            number,
            forced,
            deflector_hits = self.deflector_hits,
            "ball settled"
        );
    }

    fn coast(&mut self, physics: &WheelPhysics, settlement: Settlement, steps: f64) {
        self.wheel_velocity *= physics.settled_wheel_decay.powf(steps);
        self.wheel_angle += self.wheel_velocity * steps;
        self.ball_angle = self.wheel_angle + settlement.relative_angle;
        if self.wheel_velocity.abs() < physics.wheel_stop_speed {
            self.wheel_velocity = 0.0;
            self.finished = true;
            debug!(tick = self.ticks, number = settlement.number, "wheel stopped");
        }
    }
}

/// Drives one spin at a time.
pub struct SpinSimulator<R = StdRng> {
    physics: WheelPhysics,
    rng: R,
    state: Option<SpinState>,
}

impl SpinSimulator<StdRng> {
    /// Simulator seeded from system entropy.
    pub fn new(physics: WheelPhysics) -> Self {
        Self::with_rng(physics, StdRng::from_entropy())
    }
}

impl<R: Rng> SpinSimulator<R> {
    pub fn with_rng(physics: WheelPhysics, rng: R) -> Self {
        Self {
            physics,
            rng,
            state: None,
        }
    }

    pub fn physics(&self) -> &WheelPhysics {
        &self.physics
    }

    /// Launch a new spin with random angles and velocities.
    ///
    /// Fails while a previous spin has not yet committed a pocket.
    pub fn start_spin(&mut self) -> Result<(), SpinError> {
        if self
            .state
            .as_ref()
            .is_some_and(|state| state.settlement.is_none())
        {
            return Err(SpinError::SpinInProgress);
        }
        let state = SpinState::launch(&self.physics, &mut self.rng);
        debug!(
            wheel_velocity = state.wheel_velocity,
            ball_velocity = state.ball_velocity,
            "spin started"
        );
        self.state = Some(state);
        Ok(())
    }

    /// Advance the spin by `dt`.
    ///
    /// Ticking a finished spin is a no-op that keeps reporting its result.
    ///
    /// Motion is integrated once per tick, scaled by the number of frames in `dt`.
    /// Ticks spanning more than a few frames step the ball over the deflector band
    /// and the pocket annulus, so the ball keeps bouncing off the inner rim and the
    /// settle deadline picks the pocket instead of the collisions.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        let Some(state) = self.state.as_mut() else {
            return Tick::Idle;
        };
        if state.finished {
            return state.status();
        }
        let steps = self.physics.frames_in(dt);
        if steps <= 0.0 {
            return state.status();
        }
        state.advance(&self.physics, &mut self.rng, steps)
    }

    pub fn is_settled(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.settlement.is_some())
    }

    /// Committed number, available from the settling tick onwards.
    pub fn winning_number(&self) -> Option<u8> {
        self.state
            .as_ref()
            .and_then(|state| state.settlement)
            .map(|settlement| settlement.number)
    }

    pub fn visual_state(&self) -> Option<VisualState> {
        self.state.as_ref().map(SpinState::visual)
    }

    pub fn state(&self) -> Option<&SpinState> {
        self.state.as_ref()
    }

    /// Drop the in-flight spin, if any.
    pub fn abandon(&mut self) {
        if self.state.take().is_some() {
            debug!("spin abandoned");
        }
    }

    /// Start a spin and tick it with a fixed `dt` until the wheel stops.
    pub fn run_to_completion(&mut self, dt: Duration) -> Result<SpinSummary, SpinError> {
        if self.physics.frames_in(dt) <= 0.0 {
            return Err(SpinError::ZeroStep);
        }
        self.start_spin()?;
        loop {
            if let Tick::Finished { .. } = self.tick(dt) {
                if let Some(summary) = self.summary() {
                    return Ok(summary);
                }
            }
        }
    }

    /// Summary of the current spin once a pocket has been committed.
    pub fn summary(&self) -> Option<SpinSummary> {
        let state = self.state.as_ref()?;
        let settlement = state.settlement?;
        Some(SpinSummary {
            winning_number: settlement.number,
            slot: settlement.slot,
            ticks: state.ticks,
            deflector_hits: state.deflector_hits,
            forced: settlement.forced,
        })
    }
}
