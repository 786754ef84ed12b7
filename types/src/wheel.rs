use serde::{Deserialize, Serialize};

/// Number of pockets on a single-zero wheel.
pub const POCKET_COUNT: usize = 37;

/// Highest pocket number.
pub const MAX_NUMBER: u8 = 36;

/// Pocket numbers in physical wheel order, starting at the zero pocket.
///
/// Adjacency on the wheel follows this order, not numeric order.
pub const WHEEL_SEQUENCE: [u8; POCKET_COUNT] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

/// Red numbers on a roulette wheel.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

/// Check if a number is red.
pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

/// Color of a pocket number, `None` when the number is not on the wheel.
pub fn color_of(number: u8) -> Option<Color> {
    (number <= MAX_NUMBER).then(|| classify(number))
}

fn classify(number: u8) -> Color {
    if number == 0 {
        Color::Green
    } else if is_red(number) {
        Color::Red
    } else {
        Color::Black
    }
}

/// Wheel slot holding `number`.
pub fn slot_of(number: u8) -> Option<usize> {
    WHEEL_SEQUENCE.iter().position(|&n| n == number)
}

/// A single pocket: its number, color and fixed position on the wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pocket {
    pub number: u8,
    pub color: Color,
    pub wheel_slot: usize,
}

impl Pocket {
    /// Pocket at a wheel slot (taken modulo [`POCKET_COUNT`]).
    pub fn at_slot(slot: usize) -> Self {
        let wheel_slot = slot % POCKET_COUNT;
        let number = WHEEL_SEQUENCE[wheel_slot];
        Self {
            number,
            color: classify(number),
            wheel_slot,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        slot_of(number).map(Self::at_slot)
    }
}

/// All pockets in wheel order.
pub fn pockets() -> impl Iterator<Item = Pocket> {
    (0..POCKET_COUNT).map(Pocket::at_slot)
}
