#![warn(missing_docs)]

//! # `mercury`
//!
//! A solver for Thermometers puzzles.
//! An n×n grid is partitioned into thermometers, each a tube of cells running from a bulb, straight or around corners.
//! Every row and column carries a target, and the puzzle asks how far to fill each thermometer (always from the bulb
//! outwards) so that every row and column holds exactly its target of filled cells.
//!
//! Begin by building a [`Board`]: parse puzzle text with [`str::parse`], place symbols with a [`BoardBuilder`],
//! or give explicit cell paths to [`Board::from_paths`]. Then call [`solve()`](crate::Board::solve) to get a
//! [`Verdict`]: no solution, exactly one, or more than one.
//!
//! # Internals
//! A board with L-cell thermometers has a search space of Π(L + 1) fill choices, far too many to enumerate.
//! Instead, each thermometer's contribution to every row and column it touches is tabulated once per board
//! (see [`LineProfile`]) and the [`Solver`] runs a depth-first search over fill counts, keeping a running sum and a
//! remaining capacity per line.
//!
//! A high level overview is as follows:
//!
//! 1. Thermometers sharing a row or column are linked in a conflict graph; the most connected are decided first.
//! 2. A fill count is kept only if no touched line exceeds its target and every touched line can still reach it.
//! 3. The search continues past the first solution and stops at the second, which settles uniqueness.
//!
//! The first decision may be split across threads; see [`SolverConfig`].

pub use board::{Board, FilledGrid};
pub use builder::{BoardBuilder, BuildError, Extent};
pub use cell::Cell;
pub use config::SolverConfig;
pub use location::{Dimension, Location};
pub use parse::ParseError;
pub use profile::{Line, LineProfile, Span};
pub use shape::{Direction, Turn};
pub use solver::{AbortReason, Assignment, SearchAborted, Solver, Verdict};
pub use thermometer::{Thermometer, TraceEnd};

pub(crate) mod board;
mod tests;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod config;
pub(crate) mod location;
pub(crate) mod parse;
pub(crate) mod profile;
pub(crate) mod shape;
pub mod solver;
pub(crate) mod thermometer;
#[cfg(feature = "wasm")]
pub mod wasm;
