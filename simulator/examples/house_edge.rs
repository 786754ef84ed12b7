//! Estimate the house edge of every selector from simulated spins.
//!
//! Winning numbers come from the full physics model, so the estimates reflect any
//! bias in the wheel as well as the payout table. Set `HOUSE_EDGE_TRIALS` to change
//! the number of spins.

use rand::{rngs::StdRng, SeedableRng};
use wheelhouse_execution::{payout_multiplier, resolve, PhysicsConfig, SpinSimulator};
use wheelhouse_types::{BetSlip, Outcome, Selector};

const TRIALS: usize = 50_000; // full run for stable estimates
const BASE_BET: u64 = 100;
const SEED: u64 = 0x5eed;

/// Running totals for one selector, folded from resolved outcomes.
#[derive(Default)]
struct EdgeEstimate {
    rounds: u64,
    staked: u128,
    net: i128,
    net_sq: f64,
}

impl EdgeEstimate {
    fn record(&mut self, outcome: &Outcome) {
        let net = outcome.net();
        self.rounds += 1;
        self.staked += u128::from(outcome.total_stake());
        self.net += net;
        self.net_sq += (net as f64).powi(2);
    }

    /// Share of the stake the house keeps, with the standard error of that share.
    fn edge(&self) -> (f64, f64) {
        if self.rounds == 0 || self.staked == 0 {
            return (0.0, 0.0);
        }
        let rounds = self.rounds as f64;
        let stake = self.staked as f64 / rounds;
        let mean = self.net as f64 / rounds;
        let var = (self.net_sq / rounds - mean * mean).max(0.0);
        (-mean / stake, (var / rounds).sqrt() / stake)
    }
}

fn main() -> anyhow::Result<()> {
    let trials = std::env::var("HOUSE_EDGE_TRIALS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(TRIALS);

    let physics = PhysicsConfig::default().validate()?;
    let frame = physics.frame;
    let mut simulator = SpinSimulator::with_rng(physics, StdRng::seed_from_u64(SEED));
    let mut numbers = Vec::with_capacity(trials);
    for _ in 0..trials {
        numbers.push(simulator.run_to_completion(frame)?.winning_number);
    }

    // Print CSV
    println!("selector,multiplier,rounds,house_edge,stderr");
    for selector in Selector::all() {
        let mut slip = BetSlip::new();
        slip.place(selector, BASE_BET)?;
        let mut estimate = EdgeEstimate::default();
        for &number in &numbers {
            estimate.record(&resolve(number, &slip));
        }
        let (edge, stderr) = estimate.edge();
        println!(
            "{},{},{},{:.6},{:.6}",
            selector,
            payout_multiplier(selector),
            estimate.rounds,
            edge,
            stderr
        );
    }
    Ok(())
}
