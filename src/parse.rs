use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

use crate::board::Board;
use crate::builder::BuildError;
use crate::cell::Cell;

/// Reasons puzzle text cannot be read.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    /// Fewer than two lines, so there is no room for both target lines.
    #[error("expected the grid followed by a column target line and a row target line")]
    MissingTargets,
    /// A target is not a non-negative integer.
    #[error("line {line}: '{token}' is not a valid target")]
    BadTarget {
        /// The 1-based line number.
        line: usize,
        /// The offending text.
        token: String,
    },
    /// The text was read but does not describe a valid board.
    #[error(transparent)]
    Build(#[from] BuildError),
}

fn parse_targets(text: &str, line: usize) -> Result<Vec<usize>, ParseError> {
    text.split_whitespace()
        .map(|token| token.parse().map_err(|_| ParseError::BadTarget { line, token: token.to_string() }))
        .collect()
}

/// Reads the text format: one line per grid row, then the column targets, then the row targets.
///
/// Bulbs are `U`, `D`, `L` and `R`, straight segments `^`, `v`, `<` and `>`, corners `0` to `3`;
/// anything else is an empty cell. Trailing whitespace and trailing blank lines are ignored.
impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s.lines().map(str::trim_end).collect_vec();
        let used = lines.iter().rposition(|line| !line.is_empty()).map_or(0, |last| last + 1);

        let [grid @ .., col_line, row_line] = &lines[..used] else {
            return Err(ParseError::MissingTargets);
        };

        let col_targets = parse_targets(col_line, grid.len() + 1)?;
        let row_targets = parse_targets(row_line, grid.len() + 2)?;
        let rows = grid.iter()
            .map(|line| line.chars().map(Cell::from).collect_vec())
            .collect_vec();

        Ok(Board::from_symbols(&rows, row_targets, col_targets)?)
    }
}
