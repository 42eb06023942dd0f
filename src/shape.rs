use strum::VariantArray;

use crate::location::Location;

/// A direction of travel along a thermometer tube, also used for bulb orientation.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// The result may lie outside the board; callers check it with the board size.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((-1, 0)),
            Self::Down => location.offset_by((1, 0)),
            Self::Left => location.offset_by((0, -1)),
            Self::Right => location.offset_by((0, 1)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Determine the direction from `a` to `b` by calling [`attempt_from`](Self::attempt_from) until one works.
    ///
    /// Returns [`None`] unless the two locations are orthogonally adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|dir| dir.attempt_from(a) == b)
    }
}

/// A corner piece of a curved thermometer, named after the digit that marks it in puzzle text.
///
/// Each corner accepts exactly two entry directions (the direction of travel when entering the cell).
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Turn {
    /// `└`, digit `0`.
    Zero,
    /// `┏`, digit `1`.
    One,
    /// `┐`, digit `2`.
    Two,
    /// `┘`, digit `3`.
    Three,
}

impl Turn {
    /// Entry to exit directions for this corner.
    fn mappings(&self) -> [(Direction, Direction); 2] {
        use Direction::*;

        match self {
            Self::Zero => [(Down, Right), (Left, Up)],
            Self::One => [(Up, Right), (Left, Down)],
            Self::Two => [(Up, Left), (Right, Down)],
            Self::Three => [(Down, Left), (Right, Up)],
        }
    }

    /// The direction of travel after passing through this corner, entering while travelling `entry`.
    ///
    /// Returns [`None`] if the corner cannot be entered that way.
    pub fn exit_for(&self, entry: Direction) -> Option<Direction> {
        self.mappings().into_iter()
            .find(|(from, _)| *from == entry)
            .map(|(_, to)| to)
    }

    /// The corner that bends travel from `entry` to `exit`, if one exists.
    pub fn between(entry: Direction, exit: Direction) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|turn| turn.exit_for(entry) == Some(exit))
    }
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use crate::location::Location;
    use crate::shape::{Direction, Turn};

    #[test]
    fn steps_and_inverts() {
        for dir in Direction::VARIANTS {
            let origin = Location(3, 3);
            assert_eq!(dir.invert().attempt_from(dir.attempt_from(origin)), origin);
            assert_eq!(Direction::direction_to(origin, dir.attempt_from(origin)), Some(*dir));
        }
        assert_eq!(Direction::direction_to(Location(0, 0), Location(1, 1)), None);
    }

    #[test]
    fn every_turn_is_a_right_angle() {
        for turn in Turn::VARIANTS {
            let entries = Direction::VARIANTS.iter()
                .filter(|entry| turn.exit_for(**entry).is_some())
                .count();
            assert_eq!(entries, 2);

            for entry in Direction::VARIANTS {
                if let Some(exit) = turn.exit_for(*entry) {
                    assert_ne!(exit, *entry);
                    assert_ne!(exit, entry.invert());
                    assert_eq!(Turn::between(*entry, exit), Some(*turn));
                }
            }
        }
    }

    #[test]
    fn corner_zero() {
        assert_eq!(Turn::Zero.exit_for(Direction::Down), Some(Direction::Right));
        assert_eq!(Turn::Zero.exit_for(Direction::Left), Some(Direction::Up));
        assert_eq!(Turn::Zero.exit_for(Direction::Up), None);
        assert_eq!(Turn::Zero.exit_for(Direction::Right), None);
    }
}
