use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error as ThisError;

use crate::wheel::MAX_NUMBER;

#[cfg(test)]
mod tests;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum BetError {
    #[error("stake must be positive")]
    ZeroStake,
    #[error("number out of range (got={got}, max={max})")]
    NumberOutOfRange { got: u8, max: u8 },
    #[error("unknown selector: {0}")]
    UnknownSelector(String),
    #[error("stake overflow on {selector} (current={current}, added={added})")]
    StakeOverflow {
        selector: Selector,
        current: u64,
        added: u64,
    },
}

/// One of the three dozens on the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dozen {
    First,  // 1-12
    Second, // 13-24
    Third,  // 25-36
}

impl Dozen {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Dozen containing `number`, `None` for zero and numbers off the wheel.
    pub fn of(number: u8) -> Option<Self> {
        match number {
            1..=12 => Some(Self::First),
            13..=24 => Some(Self::Second),
            25..=36 => Some(Self::Third),
            _ => None,
        }
    }
}

/// The wager category a stake is placed on.
///
/// Text form (used by `FromStr`, `Display` and serde) matches the cells on the
/// betting layout: `"0"`..`"36"`, `"odd"`, `"even"`, `"red"`, `"black"`, `"1-12"`,
/// `"13-24"`, `"25-36"`, `"1-18"` and `"19-36"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    Number(u8),
    Odd,
    Even,
    Red,
    Black,
    Dozen(Dozen),
    Low,  // 1-18
    High, // 19-36
}

impl Selector {
    /// Every selector a player can place a stake on.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_NUMBER)
            .map(Self::Number)
            .chain([Self::Odd, Self::Even, Self::Red, Self::Black])
            .chain(Dozen::ALL.into_iter().map(Self::Dozen))
            .chain([Self::Low, Self::High])
    }

    /// Exact-number selector, rejecting numbers off the wheel.
    pub fn number(number: u8) -> Result<Self, BetError> {
        if number > MAX_NUMBER {
            return Err(BetError::NumberOutOfRange {
                got: number,
                max: MAX_NUMBER,
            });
        }
        Ok(Self::Number(number))
    }

    /// Returns `true` when the selector names a cell on the layout.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Number(n) => *n <= MAX_NUMBER,
            _ => true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Odd => f.write_str("odd"),
            Self::Even => f.write_str("even"),
            Self::Red => f.write_str("red"),
            Self::Black => f.write_str("black"),
            Self::Dozen(Dozen::First) => f.write_str("1-12"),
            Self::Dozen(Dozen::Second) => f.write_str("13-24"),
            Self::Dozen(Dozen::Third) => f.write_str("25-36"),
            Self::Low => f.write_str("1-18"),
            Self::High => f.write_str("19-36"),
        }
    }
}

impl FromStr for Selector {
    type Err = BetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let selector = match trimmed.to_ascii_lowercase().as_str() {
            "odd" => Self::Odd,
            "even" => Self::Even,
            "red" => Self::Red,
            "black" => Self::Black,
            "1-12" => Self::Dozen(Dozen::First),
            "13-24" => Self::Dozen(Dozen::Second),
            "25-36" => Self::Dozen(Dozen::Third),
            "1-18" => Self::Low,
            "19-36" => Self::High,
            other => {
                let number = other
                    .parse::<u8>()
                    .map_err(|_| BetError::UnknownSelector(trimmed.to_string()))?;
                return Self::number(number);
            }
        };
        Ok(selector)
    }
}

impl TryFrom<String> for Selector {
    type Error = BetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

/// A player's accumulated stake on one selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bet {
    pub selector: Selector,
    pub stake_total: u64,
}

/// Stakes keyed by selector, as recorded by the betting layout.
///
/// Chips placed on the same selector accumulate into one stake. The slip only
/// ever holds positive stakes on valid selectors.
///
/// Placement order is kept so the last chip can be taken back with [`BetSlip::undo`].
/// It is not part of the serialized form or of equality.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Selector, u64>", into = "BTreeMap<Selector, u64>")]
pub struct BetSlip {
    stakes: BTreeMap<Selector, u64>,
    chips: Vec<(Selector, u64)>,
}

impl PartialEq for BetSlip {
    fn eq(&self, other: &Self) -> bool {
        self.stakes == other.stakes
    }
}

impl Eq for BetSlip {}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chip of value `chip` to `selector`.
    ///
    /// Returns the selector's new stake total.
    pub fn place(&mut self, selector: Selector, chip: u64) -> Result<u64, BetError> {
        if chip == 0 {
            return Err(BetError::ZeroStake);
        }
        if let Selector::Number(n) = selector {
            Selector::number(n)?;
        }
        let current = self.stakes.get(&selector).copied().unwrap_or(0);
        let total = current
            .checked_add(chip)
            .ok_or(BetError::StakeOverflow {
                selector,
                current,
                added: chip,
            })?;
        self.stakes.insert(selector, total);
        self.chips.push((selector, chip));
        Ok(total)
    }

    /// Take back the most recently placed chip.
    ///
    /// Returns the selector and chip value, or `None` when no chips remain.
    pub fn undo(&mut self) -> Option<(Selector, u64)> {
        let (selector, chip) = self.chips.pop()?;
        if let Some(stake) = self.stakes.get_mut(&selector) {
            *stake -= chip;
            if *stake == 0 {
                self.stakes.remove(&selector);
            }
        }
        Some((selector, chip))
    }

    /// Stake total on `selector`, if any.
    pub fn stake(&self, selector: &Selector) -> Option<u64> {
        self.stakes.get(selector).copied()
    }

    /// Remove all stakes from `selector`, returning what was there.
    pub fn remove(&mut self, selector: &Selector) -> Option<u64> {
        self.chips.retain(|(placed, _)| placed != selector);
        self.stakes.remove(selector)
    }

    pub fn clear(&mut self) {
        self.stakes.clear();
        self.chips.clear();
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    /// Sum of all stakes (saturating).
    pub fn total_stake(&self) -> u64 {
        self.stakes
            .values()
            .fold(0u64, |acc, stake| acc.saturating_add(*stake))
    }

    /// Bets ordered by selector.
    pub fn iter(&self) -> impl Iterator<Item = Bet> + '_ {
        self.stakes.iter().map(|(&selector, &stake_total)| Bet {
            selector,
            stake_total,
        })
    }
}

impl TryFrom<BTreeMap<Selector, u64>> for BetSlip {
    type Error = BetError;

    fn try_from(stakes: BTreeMap<Selector, u64>) -> Result<Self, Self::Error> {
        let mut slip = BetSlip::new();
        for (selector, stake) in stakes {
            slip.place(selector, stake)?;
        }
        Ok(slip)
    }
}

impl From<BetSlip> for BTreeMap<Selector, u64> {
    fn from(slip: BetSlip) -> Self {
        slip.stakes
    }
}

/// Result of one bet against the winning number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetOutcome {
    pub selector: Selector,
    pub stake: u64,
    pub won: bool,
    /// `stake * multiplier` when won, otherwise zero.
    pub payout: u64,
}

/// Resolution of a whole bet slip for one spin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winning_number: u8,
    pub bets: Vec<BetOutcome>,
    pub total_payout: u64,
}

impl Outcome {
    /// Returns `true` if any bet won.
    pub fn has_won(&self) -> bool {
        self.bets.iter().any(|bet| bet.won)
    }

    pub fn total_stake(&self) -> u64 {
        self.bets
            .iter()
            .fold(0u64, |acc, bet| acc.saturating_add(bet.stake))
    }

    /// Payout minus stake.
    pub fn net(&self) -> i128 {
        i128::from(self.total_payout) - i128::from(self.total_stake())
    }

    pub fn winners(&self) -> impl Iterator<Item = &BetOutcome> {
        self.bets.iter().filter(|bet| bet.won)
    }
}
