use serde::Serialize;
use std::fmt;
use wheelhouse_execution::SpinSummary;
use wheelhouse_types::{color_of, Outcome, POCKET_COUNT};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    pub spins: u64,
    /// Hits per winning number, indexed by number.
    pub histogram: Vec<u64>,
    /// Pearson chi-square statistic against a uniform wheel (36 degrees of freedom).
    pub chi_square: f64,
    pub forced_settles: u64,
    pub avg_ticks: f64,
    pub avg_deflector_hits: f64,
    pub total_staked: u64,
    pub total_paid: u64,
    pub net: i128,
    /// Paid divided by staked, `None` when nothing was staked.
    pub rtp: Option<f64>,
}

impl SessionReport {
    /// Most frequent winning number (lowest on ties), `None` before any spin.
    pub fn hottest(&self) -> Option<u8> {
        if self.spins == 0 {
            return None;
        }
        self.histogram
            .iter()
            .enumerate()
            .max_by(|(a_num, a), (b_num, b)| a.cmp(b).then(b_num.cmp(a_num)))
            .map(|(number, _)| number as u8)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Tally {
    spins: u64,
    histogram: [u64; POCKET_COUNT],
    forced_settles: u64,
    ticks: u64,
    deflector_hits: u64,
    total_staked: u64,
    total_paid: u64,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            spins: 0,
            histogram: [0; POCKET_COUNT],
            forced_settles: 0,
            ticks: 0,
            deflector_hits: 0,
            total_staked: 0,
            total_paid: 0,
        }
    }
}

impl Tally {
    pub(crate) fn record(&mut self, summary: &SpinSummary, outcome: &Outcome) {
        self.spins += 1;
        self.histogram[summary.winning_number as usize] += 1;
        if summary.forced {
            self.forced_settles += 1;
        }
        self.ticks = self.ticks.saturating_add(summary.ticks);
        self.deflector_hits = self
            .deflector_hits
            .saturating_add(u64::from(summary.deflector_hits));
        self.total_staked = self.total_staked.saturating_add(outcome.total_stake());
        self.total_paid = self.total_paid.saturating_add(outcome.total_payout);
    }

    pub(crate) fn snapshot(&self) -> SessionReport {
        let per_spin = |total: u64| {
            if self.spins == 0 {
                0.0
            } else {
                total as f64 / self.spins as f64
            }
        };
        let rtp = if self.total_staked == 0 {
            None
        } else {
            Some(self.total_paid as f64 / self.total_staked as f64)
        };

        SessionReport {
            spins: self.spins,
            histogram: self.histogram.to_vec(),
            chi_square: chi_square(&self.histogram),
            forced_settles: self.forced_settles,
            avg_ticks: per_spin(self.ticks),
            avg_deflector_hits: per_spin(self.deflector_hits),
            total_staked: self.total_staked,
            total_paid: self.total_paid,
            net: i128::from(self.total_paid) - i128::from(self.total_staked),
            rtp,
        }
    }
}

/// Pearson chi-square of `counts` against equal expected frequencies.
pub fn chi_square(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 || counts.is_empty() {
        return 0.0;
    }
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spins: {}", self.spins)?;
        writeln!(
            f,
            "avg ticks: {:.1}  avg deflector hits: {:.2}  forced settles: {}",
            self.avg_ticks, self.avg_deflector_hits, self.forced_settles
        )?;
        writeln!(f, "chi-square (36 dof): {:.2}", self.chi_square)?;
        if let Some(number) = self.hottest() {
            writeln!(f, "hottest number: {number}")?;
        }
        writeln!(f)?;
        writeln!(f, "{:<6} {:<6} {:>8} {:>8}", "number", "color", "hits", "share")?;
        for (number, &hits) in self.histogram.iter().enumerate() {
            let color = color_of(number as u8)
                .map(|color| format!("{color:?}").to_lowercase())
                .unwrap_or_default();
            let share = if self.spins == 0 {
                0.0
            } else {
                hits as f64 / self.spins as f64 * 100.0
            };
            writeln!(f, "{number:<6} {color:<6} {hits:>8} {share:>7.2}%")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "staked: {}  paid: {}  net: {}",
            self.total_staked, self.total_paid, self.net
        )?;
        match self.rtp {
            Some(rtp) => write!(f, "rtp: {:.4}%", rtp * 100.0),
            None => write!(f, "rtp: n/a (no bets)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi_square() {
        assert_eq!(chi_square(&[]), 0.0);
        assert_eq!(chi_square(&[0, 0, 0]), 0.0);
        assert_eq!(chi_square(&[10, 10, 10]), 0.0);
        // expected 10 each: (10^2 + 10^2) / 10
        assert!((chi_square(&[20, 0, 10]) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_snapshot() {
        let report = Tally::default().snapshot();
        assert_eq!(report.spins, 0);
        assert_eq!(report.histogram.len(), POCKET_COUNT);
        assert_eq!(report.rtp, None);
        assert_eq!(report.avg_ticks, 0.0);
        assert_eq!(report.hottest(), None);
        assert!(report.to_string().contains("rtp: n/a"));
    }

    #[test]
    fn test_hottest_prefers_lowest_number_on_ties() {
        let mut histogram = vec![0; POCKET_COUNT];
        histogram[5] = 3;
        histogram[9] = 3;
        let report = SessionReport {
            spins: 6,
            histogram,
            chi_square: 0.0,
            forced_settles: 0,
            avg_ticks: 0.0,
            avg_deflector_hits: 0.0,
            total_staked: 0,
            total_paid: 0,
            net: 0,
            rtp: None,
        };
        assert_eq!(report.hottest(), Some(5));
    }
}
