use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;

use crate::cell::Cell;
use crate::config::SolverConfig;
use crate::location::{Dimension, Location};
use crate::profile::LineProfile;
use crate::solver::{Assignment, SearchAborted, Solver, Verdict};
use crate::thermometer::Thermometer;

/// A structurally valid puzzle: a square grid of disjoint thermometers with a fill target for every row and column.
///
/// [`Board`]s are built with a [`BoardBuilder`](crate::builder::BoardBuilder), [`Board::from_symbols`],
/// [`Board::from_paths`] or by parsing puzzle text. Once built they never change.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) size: Dimension,
    pub(crate) cells: Array2<Cell>,
    pub(crate) owners: Array2<Option<usize>>,
    pub(crate) thermometers: Vec<Thermometer>,
    pub(crate) row_targets: Vec<usize>,
    pub(crate) col_targets: Vec<usize>,
    pub(crate) profile: LineProfile,
}

impl Board {
    pub(crate) fn new(
        size: Dimension,
        cells: Array2<Cell>,
        owners: Array2<Option<usize>>,
        thermometers: Vec<Thermometer>,
        row_targets: Vec<usize>,
        col_targets: Vec<usize>,
    ) -> Self {
        let profile = LineProfile::new(size, &thermometers);

        Self {
            size,
            cells,
            owners,
            thermometers,
            row_targets,
            col_targets,
            profile,
        }
    }

    /// The side length of the grid.
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// All thermometers, ordered by the position of their bulbs (row-major) when traced from symbols.
    pub fn thermometers(&self) -> &[Thermometer] {
        &self.thermometers
    }

    /// The number of filled cells required in each row, top to bottom.
    pub fn row_targets(&self) -> &[usize] {
        &self.row_targets
    }

    /// The number of filled cells required in each column, left to right.
    pub fn col_targets(&self) -> &[usize] {
        &self.col_targets
    }

    /// The symbol at `location`, or [`None`] outside the grid.
    pub fn cell(&self, location: Location) -> Option<Cell> {
        self.cells.get(location.as_index()).copied()
    }

    /// The index of the thermometer covering `location`, if any.
    pub fn owner(&self, location: Location) -> Option<usize> {
        self.owners.get(location.as_index()).copied().flatten()
    }

    /// The per-line contribution tables used by the solver.
    pub fn line_profile(&self) -> &LineProfile {
        &self.profile
    }

    /// Whether `location` is filled under `assignment`.
    ///
    /// A cell is filled exactly when its position along its thermometer is below that thermometer's fill count.
    pub fn is_filled(&self, assignment: &Assignment, location: Location) -> bool {
        self.owner(location).is_some_and(|index| {
            self.thermometers[index].is_filled(location, assignment.fill(index))
        })
    }

    /// Expand `assignment` into a grid of filled cells.
    pub fn filled_grid(&self, assignment: &Assignment) -> FilledGrid {
        let mut filled = Array2::from_elem(self.cells.raw_dim(), false);

        for (index, thermometer) in self.thermometers.iter().enumerate() {
            for location in thermometer.cells().iter().take(assignment.fill(index)) {
                filled[location.as_index()] = true;
            }
        }

        FilledGrid(filled)
    }

    /// Check `assignment` against every row and column target from scratch.
    ///
    /// Assignments of the wrong length or with a fill count beyond a thermometer's length never satisfy a board.
    pub fn satisfies(&self, assignment: &Assignment) -> bool {
        if assignment.fills().len() != self.thermometers.len()
            || self.thermometers.iter().zip(assignment.fills()).any(|(thermometer, fill)| *fill > thermometer.len()) {
            return false;
        }

        let filled = self.filled_grid(assignment).0;
        filled.rows().into_iter().map(|row| row.iter().filter(|cell| **cell).count()).eq(self.row_targets.iter().copied())
            && filled.columns().into_iter().map(|col| col.iter().filter(|cell| **cell).count()).eq(self.col_targets.iter().copied())
    }

    /// Solves this board with the default [`SolverConfig`], deferring to a [`Solver`].
    ///
    /// Returns according to the result of [`Solver::solve`].
    pub fn solve(&self) -> Result<Verdict, SearchAborted> {
        self.solve_with(SolverConfig::default())
    }

    /// Solves this board with an explicit [`SolverConfig`].
    pub fn solve_with(&self, config: SolverConfig) -> Result<Verdict, SearchAborted> {
        Solver::new(self, config).solve()
    }
}

/// Writes the board in puzzle text form: the symbol grid, then the column targets, then the row targets.
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().map(Cell::glyph).collect::<String>())?;
        }
        writeln!(f, "{}", self.col_targets.iter().join(" "))?;
        writeln!(f, "{}", self.row_targets.iter().join(" "))
    }
}

/// The filled and empty cells of a board under some [`Assignment`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilledGrid(pub(crate) Array2<bool>);

impl FilledGrid {
    /// Whether `location` is filled. Locations outside the grid are never filled.
    pub fn is_filled(&self, location: Location) -> bool {
        self.0.get(location.as_index()).copied().unwrap_or(false)
    }

    /// The number of filled cells.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|cell| **cell).count()
    }
}

/// Writes one line per row, `x` for a filled cell and `.` for an empty one.
impl Display for FilledGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.0.rows() {
            writeln!(f, "{}", row.iter().map(|cell| if *cell { 'x' } else { '.' }).collect::<String>())?;
        }

        Ok(())
    }
}
