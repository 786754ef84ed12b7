//! Headless wheelhouse sessions.
//!
//! A [`Session`] plays the renderer and settlement roles around a
//! [`SpinSimulator`]: it drives each spin to completion at a fixed tick length,
//! resolves the bet slip against the winning number and accumulates a
//! [`SessionReport`].

use rand::{rngs::StdRng, Rng};
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};
use wheelhouse_execution::{resolve, SpinError, SpinSimulator, SpinSummary};
use wheelhouse_types::{BetSlip, Outcome};

mod report;
pub use report::{chi_square, SessionReport};
use report::Tally;

/// Ticks longer than this many physics frames skip over collisions.
pub const COARSE_TICK_FRAMES: f64 = 4.0;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("tick length must be > 0")]
    ZeroTick,
    #[error("spin failed: {0}")]
    Spin(#[from] SpinError),
}

/// Result of one spin within a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub summary: SpinSummary,
    pub outcome: Outcome,
}

pub struct Session<R = StdRng> {
    simulator: SpinSimulator<R>,
    slip: BetSlip,
    tick: Duration,
    tally: Tally,
}

impl<R: Rng> Session<R> {
    pub fn new(simulator: SpinSimulator<R>, slip: BetSlip, tick: Duration) -> Result<Self, SessionError> {
        if tick.is_zero() {
            return Err(SessionError::ZeroTick);
        }
        let frames = simulator.physics().frames_in(tick);
        if frames > COARSE_TICK_FRAMES {
            warn!(
                frames,
                "tick spans several physics frames; results will lean on the settle deadline"
            );
        }
        Ok(Self {
            simulator,
            slip,
            tick,
            tally: Tally::default(),
        })
    }

    pub fn slip(&self) -> &BetSlip {
        &self.slip
    }

    pub fn simulator(&self) -> &SpinSimulator<R> {
        &self.simulator
    }

    /// Returns `true` when each tick covers more than [`COARSE_TICK_FRAMES`] frames.
    pub fn is_coarse(&self) -> bool {
        self.simulator.physics().frames_in(self.tick) > COARSE_TICK_FRAMES
    }

    /// Spin once, settle the slip and record the result.
    pub fn play_round(&mut self) -> Result<Round, SessionError> {
        let summary = self.simulator.run_to_completion(self.tick)?;
        let outcome = resolve(summary.winning_number, &self.slip);
        debug!(
            winning_number = summary.winning_number,
            ticks = summary.ticks,
            deflector_hits = summary.deflector_hits,
            payout = outcome.total_payout,
            "round complete"
        );
        self.tally.record(&summary, &outcome);
        Ok(Round { summary, outcome })
    }

    /// Play `spins` rounds and return the report so far.
    pub fn run(&mut self, spins: u64) -> Result<SessionReport, SessionError> {
        for _ in 0..spins {
            self.play_round()?;
        }
        let report = self.report();
        info!(
            spins = report.spins,
            chi_square = report.chi_square,
            staked = report.total_staked,
            paid = report.total_paid,
            "session finished"
        );
        Ok(report)
    }

    pub fn report(&self) -> SessionReport {
        self.tally.snapshot()
    }
}
