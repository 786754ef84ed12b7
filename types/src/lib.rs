//! Common types used throughout wheelhouse.
//!
//! [`wheel`] holds the fixed single-zero layout (pocket order and colors), [`bet`]
//! the wager surface handed to the resolver and the [`Outcome`] it produces.

pub mod bet;
pub mod wheel;

pub use bet::{Bet, BetError, BetOutcome, BetSlip, Dozen, Outcome, Selector};
pub use wheel::{
    color_of, is_red, pockets, slot_of, Color, Pocket, MAX_NUMBER, POCKET_COUNT, RED_NUMBERS,
    WHEEL_SEQUENCE,
};
