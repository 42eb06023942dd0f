use std::fmt::{Display, Formatter};

use crate::shape::{Direction, Turn};

/// A symbol on the puzzle grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cell {
    /// The origin of a thermometer.
    Bulb {
        /// The first step of the tube.
        direction: Direction,
    },
    /// A straight piece of tube.
    Segment {
        /// Pointing away from the bulb.
        direction: Direction,
    },
    /// A corner piece of tube.
    Turn {
        /// Which corner.
        turn: Turn,
    },
    /// Not part of any thermometer.
    #[default]
    Empty,
}

impl Cell {
    /// Whether this symbol must belong to some thermometer.
    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// The character this symbol is written as in puzzle text.
    pub fn glyph(&self) -> char {
        match self {
            Self::Bulb { direction } => match direction {
                Direction::Up => 'U',
                Direction::Down => 'D',
                Direction::Left => 'L',
                Direction::Right => 'R',
            },
            Self::Segment { direction } => match direction {
                Direction::Up => '^',
                Direction::Down => 'v',
                Direction::Left => '<',
                Direction::Right => '>',
            },
            Self::Turn { turn } => match turn {
                Turn::Zero => '0',
                Turn::One => '1',
                Turn::Two => '2',
                Turn::Three => '3',
            },
            Self::Empty => '.',
        }
    }
}

impl From<char> for Cell {
    /// Read a symbol from puzzle text; characters with no meaning read as [`Cell::Empty`].
    fn from(value: char) -> Self {
        match value {
            'U' => Self::Bulb { direction: Direction::Up },
            'D' => Self::Bulb { direction: Direction::Down },
            'L' => Self::Bulb { direction: Direction::Left },
            'R' => Self::Bulb { direction: Direction::Right },
            '^' => Self::Segment { direction: Direction::Up },
            'v' => Self::Segment { direction: Direction::Down },
            '<' => Self::Segment { direction: Direction::Left },
            '>' => Self::Segment { direction: Direction::Right },
            '0' => Self::Turn { turn: Turn::Zero },
            '1' => Self::Turn { turn: Turn::One },
            '2' => Self::Turn { turn: Turn::Two },
            '3' => Self::Turn { turn: Turn::Three },
            _ => Self::Empty,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
