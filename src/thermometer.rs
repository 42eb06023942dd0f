use crate::location::Location;
use crate::shape::Direction;

/// Why tracing a thermometer from its bulb stopped.
///
/// None of these are errors by themselves; a symbol left behind by an early stop is caught later as a
/// [`DisconnectedSymbol`](crate::builder::BuildError::DisconnectedSymbol).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TraceEnd {
    /// The next step would leave the board.
    Edge,
    /// The next cell is empty.
    Gap,
    /// The next cell is another bulb.
    Bulb,
    /// The next cell is a straight segment pointing another way.
    InconsistentSegment(Location),
    /// The next cell is a corner that cannot be entered in the current direction.
    IncompatibleTurn(Location),
    /// The next cell is already part of this thermometer.
    Loop(Location),
}

/// A single thermometer: an ordered run of cells, bulb first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Thermometer {
    pub(crate) cells: Vec<Location>,
    pub(crate) direction: Option<Direction>,
    pub(crate) end: Option<TraceEnd>,
}

impl Thermometer {
    /// The cells of this thermometer, starting at the bulb.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// The number of cells, i.e. the largest possible fill count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether this thermometer has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The bulb, if any.
    pub fn bulb(&self) -> Option<Location> {
        self.cells.first().copied()
    }

    /// The direction the bulb faces, i.e. the direction of the first step of the tube.
    ///
    /// Single-cell thermometers given as explicit paths have no direction.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// How tracing stopped, for thermometers traced from a symbol grid.
    pub fn end(&self) -> Option<TraceEnd> {
        self.end
    }

    /// The position of `location` along this thermometer, counted from the bulb.
    pub fn position_of(&self, location: Location) -> Option<usize> {
        self.cells.iter().position(|cell| *cell == location)
    }

    /// Whether `location` is filled when this thermometer holds `fill` cells.
    pub fn is_filled(&self, location: Location, fill: usize) -> bool {
        self.position_of(location).is_some_and(|index| index < fill)
    }
}
