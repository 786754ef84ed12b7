use super::*;
use proptest::prelude::*;

#[test]
fn test_selector_text_roundtrip() {
    for selector in Selector::all() {
        let text = selector.to_string();
        let parsed: Selector = text.parse().expect("canonical text parses");
        assert_eq!(selector, parsed);
    }
    assert_eq!(Selector::all().count(), 37 + 4 + 3 + 2);
}

#[test]
fn test_selector_parse_named_groups() {
    assert_eq!("RED".parse::<Selector>(), Ok(Selector::Red));
    assert_eq!(" odd ".parse::<Selector>(), Ok(Selector::Odd));
    assert_eq!("13-24".parse::<Selector>(), Ok(Selector::Dozen(Dozen::Second)));
    assert_eq!("19-36".parse::<Selector>(), Ok(Selector::High));
    assert_eq!("0".parse::<Selector>(), Ok(Selector::Number(0)));
}

#[test]
fn test_selector_parse_rejects_unknown() {
    assert_eq!(
        "37".parse::<Selector>(),
        Err(BetError::NumberOutOfRange { got: 37, max: 36 })
    );
    assert!(matches!(
        "split-1-2".parse::<Selector>(),
        Err(BetError::UnknownSelector(_))
    ));
    assert!(matches!(
        "-1".parse::<Selector>(),
        Err(BetError::UnknownSelector(_))
    ));
}

#[test]
fn test_dozen_of() {
    assert_eq!(Dozen::of(0), None);
    assert_eq!(Dozen::of(1), Some(Dozen::First));
    assert_eq!(Dozen::of(12), Some(Dozen::First));
    assert_eq!(Dozen::of(13), Some(Dozen::Second));
    assert_eq!(Dozen::of(36), Some(Dozen::Third));
    assert_eq!(Dozen::of(37), None);
}

#[test]
fn test_slip_accumulates_chips() {
    let mut slip = BetSlip::new();
    assert_eq!(slip.place(Selector::Red, 5), Ok(5));
    assert_eq!(slip.place(Selector::Red, 10), Ok(15));
    assert_eq!(slip.place(Selector::Number(17), 1), Ok(1));

    assert_eq!(slip.len(), 2);
    assert_eq!(slip.stake(&Selector::Red), Some(15));
    assert_eq!(slip.total_stake(), 16);

    let bets: Vec<Bet> = slip.iter().collect();
    assert_eq!(
        bets,
        vec![
            Bet {
                selector: Selector::Number(17),
                stake_total: 1
            },
            Bet {
                selector: Selector::Red,
                stake_total: 15
            },
        ]
    );

    assert_eq!(slip.remove(&Selector::Red), Some(15));
    slip.clear();
    assert!(slip.is_empty());
}

#[test]
fn test_slip_undo_takes_back_last_chip() {
    let mut slip = BetSlip::new();
    slip.place(Selector::Red, 5).unwrap();
    slip.place(Selector::Number(17), 1).unwrap();
    slip.place(Selector::Red, 10).unwrap();

    assert_eq!(slip.undo(), Some((Selector::Red, 10)));
    assert_eq!(slip.stake(&Selector::Red), Some(5));
    assert_eq!(slip.undo(), Some((Selector::Number(17), 1)));
    assert_eq!(slip.stake(&Selector::Number(17)), None);
    assert_eq!(slip.len(), 1);
    assert_eq!(slip.undo(), Some((Selector::Red, 5)));
    assert!(slip.is_empty());
    assert_eq!(slip.undo(), None);
}

#[test]
fn test_slip_undo_skips_removed_selectors() {
    let mut slip = BetSlip::new();
    slip.place(Selector::Odd, 3).unwrap();
    slip.place(Selector::High, 4).unwrap();
    slip.place(Selector::Odd, 2).unwrap();
    // A rejected chip leaves no history behind.
    assert!(slip.place(Selector::High, 0).is_err());

    assert_eq!(slip.remove(&Selector::Odd), Some(5));
    assert_eq!(slip.undo(), Some((Selector::High, 4)));
    assert_eq!(slip.undo(), None);
    assert_eq!(slip.total_stake(), 0);
}

#[test]
fn test_slip_equality_ignores_placement_order() {
    let mut a = BetSlip::new();
    a.place(Selector::Red, 5).unwrap();
    a.place(Selector::Even, 1).unwrap();
    let mut b = BetSlip::new();
    b.place(Selector::Even, 1).unwrap();
    b.place(Selector::Red, 2).unwrap();
    b.place(Selector::Red, 3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_slip_rejects_invalid_chips() {
    let mut slip = BetSlip::new();
    assert_eq!(slip.place(Selector::Black, 0), Err(BetError::ZeroStake));
    assert_eq!(
        slip.place(Selector::Number(40), 1),
        Err(BetError::NumberOutOfRange { got: 40, max: 36 })
    );

    slip.place(Selector::Even, u64::MAX).expect("fits");
    assert!(matches!(
        slip.place(Selector::Even, 1),
        Err(BetError::StakeOverflow { .. })
    ));
    assert_eq!(slip.stake(&Selector::Even), Some(u64::MAX));
    assert!(slip.stake(&Selector::Number(40)).is_none());
}

#[test]
fn test_slip_json_uses_selector_text() {
    let mut slip = BetSlip::new();
    slip.place(Selector::Dozen(Dozen::First), 5).unwrap();
    slip.place(Selector::Number(0), 2).unwrap();

    let json = serde_json::to_string(&slip).unwrap();
    assert_eq!(json, r#"{"0":2,"1-12":5}"#);

    let decoded: BetSlip = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, slip);
}

#[test]
fn test_slip_json_rejects_zero_stake() {
    let err = serde_json::from_str::<BetSlip>(r#"{"red":0}"#).unwrap_err();
    assert!(err.to_string().contains("stake must be positive"), "{err}");

    let err = serde_json::from_str::<BetSlip>(r#"{"corner":3}"#).unwrap_err();
    assert!(err.to_string().contains("unknown selector"), "{err}");
}

#[test]
fn test_outcome_helpers() {
    let outcome = Outcome {
        winning_number: 7,
        bets: vec![
            BetOutcome {
                selector: Selector::Red,
                stake: 10,
                won: true,
                payout: 20,
            },
            BetOutcome {
                selector: Selector::Even,
                stake: 30,
                won: false,
                payout: 0,
            },
        ],
        total_payout: 20,
    };
    assert!(outcome.has_won());
    assert_eq!(outcome.total_stake(), 40);
    assert_eq!(outcome.net(), -20);
    assert_eq!(outcome.winners().count(), 1);
}

proptest! {
    #[test]
    fn prop_total_stake_is_sum_of_chips(chips in prop::collection::vec((0u8..=36, 1u64..1_000), 1..40)) {
        let mut slip = BetSlip::new();
        let mut expected = 0u64;
        for (number, chip) in &chips {
            slip.place(Selector::Number(*number), *chip).unwrap();
            expected += chip;
        }
        prop_assert_eq!(slip.total_stake(), expected);
        prop_assert!(slip.iter().all(|bet| bet.stake_total > 0));
    }
}
