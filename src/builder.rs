use std::fmt::{Display, Formatter};
use std::ops::IndexMut;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use thiserror::Error;
use tracing::{debug, trace};
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::cell::Cell;
use crate::location::{Dimension, Location};
use crate::profile::Line;
use crate::shape::{Direction, Turn};
use crate::thermometer::{Thermometer, TraceEnd};

/// The part of a puzzle whose length did not match the grid size.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Extent {
    /// The number of grid rows.
    GridRows,
    /// The length of one grid row.
    GridRow(usize),
    /// The number of row targets.
    RowTargets,
    /// The number of column targets.
    ColTargets,
}

impl Display for Extent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GridRows => write!(f, "number of grid rows"),
            Self::GridRow(row) => write!(f, "length of grid row {row}"),
            Self::RowTargets => write!(f, "number of row targets"),
            Self::ColTargets => write!(f, "number of column targets"),
        }
    }
}

/// Reasons a board cannot be built.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BuildError {
    /// A grid row or target vector does not match the grid size, or there are no column targets at all.
    #[error("{extent} is {found}, expected {expected}")]
    SizeMismatch {
        /// What was measured.
        extent: Extent,
        /// The grid size.
        expected: usize,
        /// What was found instead.
        found: usize,
    },
    /// A target asks for more cells than its line has.
    #[error("target {target} for {line} exceeds the grid size {size}")]
    TargetOutOfRange {
        /// The offending line.
        line: Line,
        /// Its target.
        target: usize,
        /// The grid size.
        size: usize,
    },
    /// A feature was placed outside the grid.
    #[error("{location} lies outside the grid")]
    OutOfBounds {
        /// The offending location.
        location: Location,
    },
    /// Two thermometers claim the same cell.
    #[error("thermometers {} and {} overlap at {location}", .thermometers.0, .thermometers.1)]
    OverlappingThermometers {
        /// The indices of both thermometers.
        thermometers: UnorderedPair<usize>,
        /// The first shared cell found.
        location: Location,
    },
    /// A symbol is not reachable from any bulb.
    #[error("symbol '{cell}' at {location} is not connected to any bulb")]
    DisconnectedSymbol {
        /// The first such symbol in row-major order.
        location: Location,
        /// The symbol found there.
        cell: Cell,
    },
    /// An explicit path jumps between non-adjacent cells, revisits a cell or turns back on itself.
    #[error("thermometer {thermometer} cannot continue to {location}")]
    BrokenPath {
        /// The index of the thermometer.
        thermometer: usize,
        /// The cell the path cannot reach.
        location: Location,
    },
}

/// A builder for boards from a grid of [`Cell`] symbols.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Row and column targets start out as all zeroes.
#[derive(Clone)]
pub struct BoardBuilder {
    size: Dimension,
    cells: Array2<Cell>,
    row_targets: Vec<usize>,
    col_targets: Vec<usize>,
    invalid_reason: Option<BuildError>,
}

impl BoardBuilder {
    /// Construct a new [`Self`] for a `size` by `size` grid.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            size,
            cells: Array2::from_shape_simple_fn((size.get(), size.get()), Cell::default),
            row_targets: vec![0; size.get()],
            col_targets: vec![0; size.get()],
            invalid_reason: None,
        }
    }

    /// Place `cell` at `location`, replacing whatever was there.
    ///
    /// May cause the builder to enter an [`OutOfBounds`](BuildError::OutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn place(&mut self, location: Location, cell: Cell) -> &mut Self {
        if self.invalid_reason.is_some() {
            return self;
        }

        if !location.within(self.size) {
            self.invalid_reason = Some(BuildError::OutOfBounds { location });
            return self;
        }

        self.cells.index_mut(location.as_index()).assign_elem(cell);
        self
    }

    /// Shorthand for [`Self::place`] on every cell of a row, with the same conditions.
    pub fn place_row(&mut self, row: usize, cells: impl IntoIterator<Item = Cell>) -> &mut Self {
        for (col, cell) in cells.into_iter().enumerate() {
            self.place(Location(row, col), cell);
        }

        self
    }

    /// Set the row targets, top to bottom. Their number is checked by [`Self::build`].
    pub fn row_targets(&mut self, targets: impl Into<Vec<usize>>) -> &mut Self {
        self.row_targets = targets.into();
        self
    }

    /// Set the column targets, left to right. Their number is checked by [`Self::build`].
    pub fn col_targets(&mut self, targets: impl Into<Vec<usize>>) -> &mut Self {
        self.col_targets = targets.into();
        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&BuildError)` otherwise.
    /// Structural problems in the grid itself only surface in [`Self::build`].
    pub fn is_valid(&self) -> Option<&BuildError> {
        self.invalid_reason.as_ref()
    }

    /// Trace every thermometer and convert the state of this builder into a [`Board`].
    ///
    /// Bulbs are visited in row-major order, which fixes the order of thermometers on the board.
    pub fn build(&self) -> Result<Board, BuildError> {
        if let Some(reason) = &self.invalid_reason {
            return Err(reason.clone());
        }

        check_targets(self.size, &self.row_targets, &self.col_targets)?;

        let mut owners: Array2<Option<usize>> = Array2::from_elem(self.cells.raw_dim(), None);
        let mut thermometers = Vec::new();

        for (index, cell) in self.cells.indexed_iter() {
            let Cell::Bulb { direction } = cell else {
                continue;
            };

            let number = thermometers.len();
            let thermometer = self.trace(Location::from(index), *direction);

            for location in thermometer.cells() {
                let owner = owners.index_mut(location.as_index());
                if let Some(other) = *owner {
                    return Err(BuildError::OverlappingThermometers {
                        thermometers: UnorderedPair(other, number),
                        location: *location,
                    });
                }
                owner.assign_elem(Some(number));
            }

            debug!(thermometer = number, bulb = %Location::from(index), length = thermometer.len(), end = ?thermometer.end(), "traced thermometer");
            thermometers.push(thermometer);
        }

        if let Some((index, cell)) = self.cells.indexed_iter()
            .find(|(index, cell)| cell.is_symbolic() && owners[*index].is_none()) {
            return Err(BuildError::DisconnectedSymbol { location: Location::from(index), cell: *cell });
        }

        Ok(Board::new(self.size, self.cells.clone(), owners, thermometers, self.row_targets.clone(), self.col_targets.clone()))
    }

    /// Follow the tube from `bulb`, starting out towards `direction`, until it can go no further.
    fn trace(&self, bulb: Location, direction: Direction) -> Thermometer {
        let mut cells = vec![bulb];
        let mut heading = direction;
        let mut at = bulb;

        let end = loop {
            let next = heading.attempt_from(at);
            if !next.within(self.size) {
                break TraceEnd::Edge;
            }
            if cells.contains(&next) {
                break TraceEnd::Loop(next);
            }

            match self.cells[next.as_index()] {
                Cell::Segment { direction } if direction == heading => {}
                Cell::Segment { .. } => break TraceEnd::InconsistentSegment(next),
                Cell::Turn { turn } => match turn.exit_for(heading) {
                    Some(exit) => heading = exit,
                    None => break TraceEnd::IncompatibleTurn(next),
                },
                Cell::Bulb { .. } => break TraceEnd::Bulb,
                Cell::Empty => break TraceEnd::Gap,
            }

            trace!(%next, ?heading, "stepped");
            cells.push(next);
            at = next;
        };

        Thermometer { cells, direction: Some(direction), end: Some(end) }
    }
}

fn check_targets(size: Dimension, row_targets: &[usize], col_targets: &[usize]) -> Result<(), BuildError> {
    for (extent, targets) in [(Extent::RowTargets, row_targets), (Extent::ColTargets, col_targets)] {
        if targets.len() != size.get() {
            return Err(BuildError::SizeMismatch { extent, expected: size.get(), found: targets.len() });
        }
    }

    let lines = row_targets.iter().enumerate().map(|(row, target)| (Line::Row(row), *target))
        .chain(col_targets.iter().enumerate().map(|(col, target)| (Line::Col(col), *target)));
    for (line, target) in lines {
        if target > size.get() {
            return Err(BuildError::TargetOutOfRange { line, target, size: size.get() });
        }
    }

    Ok(())
}

impl Board {
    /// Build a board from rows of symbols and the targets for each row and column.
    ///
    /// The grid size is taken from the number of column targets; every other extent must agree with it.
    /// With no column targets at all this is a [`SizeMismatch`](BuildError::SizeMismatch) on them.
    pub fn from_symbols(rows: &[Vec<Cell>], row_targets: Vec<usize>, col_targets: Vec<usize>) -> Result<Self, BuildError> {
        // the smallest board is 1×1
        let size = Dimension::new(col_targets.len())
            .ok_or(BuildError::SizeMismatch { extent: Extent::ColTargets, expected: 1, found: 0 })?;

        if rows.len() != size.get() {
            return Err(BuildError::SizeMismatch { extent: Extent::GridRows, expected: size.get(), found: rows.len() });
        }
        if let Some((row, cells)) = rows.iter().find_position(|cells| cells.len() != size.get()) {
            return Err(BuildError::SizeMismatch { extent: Extent::GridRow(row), expected: size.get(), found: cells.len() });
        }

        let mut builder = BoardBuilder::with_size(size);
        for (row, cells) in rows.iter().enumerate() {
            builder.place_row(row, cells.iter().copied());
        }

        builder
            .row_targets(row_targets)
            .col_targets(col_targets)
            .build()
    }

    /// Build a board from explicit thermometer paths, each listed bulb first.
    ///
    /// Consecutive cells must be orthogonally adjacent. Empty paths are allowed and never hold any fill.
    /// Symbols for display are derived from the shape of each path.
    pub fn from_paths(size: Dimension, paths: Vec<Vec<Location>>, row_targets: Vec<usize>, col_targets: Vec<usize>) -> Result<Self, BuildError> {
        check_targets(size, &row_targets, &col_targets)?;

        let mut cells = Array2::from_shape_simple_fn((size.get(), size.get()), Cell::default);
        let mut owners: Array2<Option<usize>> = Array2::from_elem((size.get(), size.get()), None);
        let mut thermometers = Vec::with_capacity(paths.len());

        for (number, path) in paths.into_iter().enumerate() {
            if let Some(location) = path.iter().find(|location| !location.within(size)) {
                return Err(BuildError::OutOfBounds { location: *location });
            }

            let steps = path.iter()
                .tuple_windows()
                .map(|(from, to)| Direction::direction_to(*from, *to).ok_or(BuildError::BrokenPath { thermometer: number, location: *to }))
                .collect::<Result<Vec<_>, _>>()?;

            for (position, location) in path.iter().enumerate() {
                let owner = owners.index_mut(location.as_index());
                match *owner {
                    Some(other) if other == number => return Err(BuildError::BrokenPath { thermometer: number, location: *location }),
                    Some(other) => return Err(BuildError::OverlappingThermometers {
                        thermometers: UnorderedPair(other, number),
                        location: *location,
                    }),
                    None => *owner = Some(number),
                }

                let cell = if position == 0 {
                    // a lone bulb has no tube to face; any orientation renders the same board
                    Cell::Bulb { direction: steps.first().copied().unwrap_or(Direction::Right) }
                } else {
                    let entry = steps[position - 1];
                    let exit = steps.get(position).copied().unwrap_or(entry);
                    if entry == exit {
                        Cell::Segment { direction: entry }
                    } else {
                        match Turn::between(entry, exit) {
                            Some(turn) => Cell::Turn { turn },
                            None => return Err(BuildError::BrokenPath { thermometer: number, location: path[position + 1] }),
                        }
                    }
                };
                cells.index_mut(location.as_index()).assign_elem(cell);
            }

            thermometers.push(Thermometer { cells: path, direction: steps.first().copied(), end: None });
        }

        Ok(Board::new(size, cells, owners, thermometers, row_targets, col_targets))
    }
}
