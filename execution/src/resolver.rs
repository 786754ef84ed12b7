//! Bet resolution.
//!
//! Scores a [`BetSlip`] against a winning number. Multipliers include the returned
//! stake: an even-money bet of 10 that wins pays 20.

use wheelhouse_types::{is_red, BetOutcome, BetSlip, Dozen, Outcome, Selector, MAX_NUMBER};

/// Check if a selector wins against `result`.
pub fn bet_wins(selector: Selector, result: u8) -> bool {
    if result > MAX_NUMBER {
        return false;
    }

    // Zero loses all except an exact bet on 0
    if result == 0 {
        return selector == Selector::Number(0);
    }

    match selector {
        Selector::Number(n) => n == result,
        Selector::Red => is_red(result),
        Selector::Black => !is_red(result),
        Selector::Even => result % 2 == 0,
        Selector::Odd => result % 2 == 1,
        Selector::Low => result <= 18,
        Selector::High => result >= 19,
        Selector::Dozen(dozen) => Dozen::of(result) == Some(dozen),
    }
}

/// Get payout multiplier for a selector (total return per unit staked).
pub fn payout_multiplier(selector: Selector) -> u64 {
    match selector {
        Selector::Number(_) => 36,
        Selector::Dozen(_) => 3,
        Selector::Red
        | Selector::Black
        | Selector::Even
        | Selector::Odd
        | Selector::Low
        | Selector::High => 2,
    }
}

/// Resolve every bet on `slip` against `winning_number`.
///
/// Selectors that match no layout cell (an exact number above 36) never win.
pub fn resolve(winning_number: u8, slip: &BetSlip) -> Outcome {
    let mut total_payout = 0u64;
    let bets = slip
        .iter()
        .map(|bet| {
            let won = bet.selector.is_valid() && bet_wins(bet.selector, winning_number);
            let payout = if won {
                bet.stake_total
                    .saturating_mul(payout_multiplier(bet.selector))
            } else {
                0
            };
            total_payout = total_payout.saturating_add(payout);
            BetOutcome {
                selector: bet.selector,
                stake: bet.stake_total,
                won,
                payout,
            }
        })
        .collect();

    Outcome {
        winning_number,
        bets,
        total_payout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wheelhouse_types::RED_NUMBERS;

    fn slip(bets: &[(Selector, u64)]) -> BetSlip {
        let mut slip = BetSlip::new();
        for &(selector, stake) in bets {
            slip.place(selector, stake).unwrap();
        }
        slip
    }

    #[test]
    fn test_bet_wins_number() {
        assert!(bet_wins(Selector::Number(17), 17));
        assert!(!bet_wins(Selector::Number(17), 18));
        assert!(bet_wins(Selector::Number(0), 0));
        assert!(!bet_wins(Selector::Number(1), 0)); // 0 loses non-zero number
    }

    #[test]
    fn test_bet_wins_colors() {
        for &n in RED_NUMBERS.iter() {
            assert!(bet_wins(Selector::Red, n));
            assert!(!bet_wins(Selector::Black, n));
        }
        assert!(bet_wins(Selector::Black, 2));
        assert!(bet_wins(Selector::Black, 4));
        assert!(!bet_wins(Selector::Red, 0)); // Zero loses
        assert!(!bet_wins(Selector::Black, 0));
    }

    #[test]
    fn test_bet_wins_even_odd() {
        assert!(bet_wins(Selector::Even, 2));
        assert!(bet_wins(Selector::Even, 36));
        assert!(!bet_wins(Selector::Even, 1));
        assert!(!bet_wins(Selector::Even, 0)); // Zero loses

        assert!(bet_wins(Selector::Odd, 1));
        assert!(bet_wins(Selector::Odd, 35));
        assert!(!bet_wins(Selector::Odd, 2));
        assert!(!bet_wins(Selector::Odd, 0));
    }

    #[test]
    fn test_bet_wins_low_high() {
        assert!(bet_wins(Selector::Low, 1));
        assert!(bet_wins(Selector::Low, 18));
        assert!(!bet_wins(Selector::Low, 19));
        assert!(!bet_wins(Selector::Low, 0));

        assert!(bet_wins(Selector::High, 19));
        assert!(bet_wins(Selector::High, 36));
        assert!(!bet_wins(Selector::High, 18));
        assert!(!bet_wins(Selector::High, 0));
    }

    #[test]
    fn test_bet_wins_dozen() {
        assert!(bet_wins(Selector::Dozen(Dozen::First), 1));
        assert!(bet_wins(Selector::Dozen(Dozen::First), 12));
        assert!(!bet_wins(Selector::Dozen(Dozen::First), 13));

        assert!(bet_wins(Selector::Dozen(Dozen::Second), 13));
        assert!(bet_wins(Selector::Dozen(Dozen::Second), 24));
        assert!(!bet_wins(Selector::Dozen(Dozen::Second), 12));

        assert!(bet_wins(Selector::Dozen(Dozen::Third), 25));
        assert!(bet_wins(Selector::Dozen(Dozen::Third), 36));
        assert!(!bet_wins(Selector::Dozen(Dozen::Third), 0));
    }

    #[test]
    fn test_zero_only_pays_number_zero() {
        for selector in Selector::all() {
            assert_eq!(bet_wins(selector, 0), selector == Selector::Number(0));
        }
    }

    #[test]
    fn test_off_wheel_values_never_win() {
        for selector in Selector::all() {
            assert!(!bet_wins(selector, 37));
        }
        assert!(!bet_wins(Selector::Number(40), 40));
    }

    #[test]
    fn test_payout_multipliers() {
        assert_eq!(payout_multiplier(Selector::Number(17)), 36);
        assert_eq!(payout_multiplier(Selector::Red), 2);
        assert_eq!(payout_multiplier(Selector::Black), 2);
        assert_eq!(payout_multiplier(Selector::Low), 2);
        assert_eq!(payout_multiplier(Selector::High), 2);
        assert_eq!(payout_multiplier(Selector::Dozen(Dozen::Second)), 3);
    }

    #[test]
    fn test_red_stake_ten() {
        let slip = slip(&[(Selector::Red, 10)]);
        assert_eq!(resolve(7, &slip).total_payout, 20);
        assert_eq!(resolve(10, &slip).total_payout, 0);
    }

    #[test]
    fn test_first_dozen_stake_five() {
        let slip = slip(&[(Selector::Dozen(Dozen::First), 5)]);
        assert_eq!(resolve(12, &slip).total_payout, 15);
        assert_eq!(resolve(13, &slip).total_payout, 0);
    }

    #[test]
    fn test_mixed_slip_breakdown() {
        let slip = slip(&[
            (Selector::Number(0), 2),
            (Selector::Red, 10),
            (Selector::Odd, 4),
            (Selector::High, 3),
        ]);
        // 19 is red, odd and high.
        let outcome = resolve(19, &slip);
        assert_eq!(outcome.winning_number, 19);
        assert_eq!(outcome.bets.len(), 4);
        assert_eq!(outcome.total_payout, 20 + 8 + 6);
        assert_eq!(outcome.total_stake(), 19);
        assert_eq!(outcome.net(), 15);
        let losers: Vec<_> = outcome.bets.iter().filter(|b| !b.won).collect();
        assert_eq!(losers.len(), 1);
        assert_eq!(losers[0].selector, Selector::Number(0));
        assert_eq!(losers[0].payout, 0);

        let zero = resolve(0, &slip);
        assert_eq!(zero.total_payout, 72);
        assert_eq!(zero.winners().count(), 1);
    }

    #[test]
    fn test_empty_slip() {
        let outcome = resolve(5, &BetSlip::new());
        assert!(outcome.bets.is_empty());
        assert_eq!(outcome.total_payout, 0);
        assert!(!outcome.has_won());
    }

    #[test]
    fn test_payout_saturates() {
        let slip = slip(&[(Selector::Number(7), u64::MAX), (Selector::Red, u64::MAX)]);
        let outcome = resolve(7, &slip);
        assert_eq!(outcome.total_payout, u64::MAX);
        assert!(outcome.bets.iter().all(|b| b.payout == u64::MAX));
    }

    fn selector_strategy() -> impl Strategy<Value = Selector> {
        let all: Vec<Selector> = Selector::all().collect();
        proptest::sample::select(all)
    }

    proptest! {
        #[test]
        fn prop_exact_number_pays_36_iff_hit(
            n in 0u8..=MAX_NUMBER,
            winning in 0u8..=MAX_NUMBER,
            stake in 1u64..1_000_000,
        ) {
            let slip = slip(&[(Selector::Number(n), stake)]);
            let outcome = resolve(winning, &slip);
            if n == winning {
                prop_assert_eq!(outcome.total_payout, stake * 36);
            } else {
                prop_assert_eq!(outcome.total_payout, 0);
            }
        }

        #[test]
        fn prop_resolve_is_idempotent(
            bets in proptest::collection::vec((selector_strategy(), 1u64..10_000), 0..12),
            winning in 0u8..=MAX_NUMBER,
        ) {
            let slip = slip(&bets);
            let first = resolve(winning, &slip);
            let second = resolve(winning, &slip);
            prop_assert_eq!(&first, &second);
            let sum = first.bets.iter().map(|b| b.payout).sum::<u64>();
            prop_assert_eq!(first.total_payout, sum);
            for bet in &first.bets {
                let expected = if bet.won { bet.stake * payout_multiplier(bet.selector) } else { 0 };
                prop_assert_eq!(bet.payout, expected);
            }
        }
    }
}
