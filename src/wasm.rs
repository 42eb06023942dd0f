use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::solver::Verdict;

/// Solve a puzzle given as text, returning the solved grid as an array of row strings (`x` filled, `.` empty).
///
/// Puzzles without exactly one solution are reported as errors.
#[wasm_bindgen(js_name = solveText)]
pub fn solve_text(text: &str) -> Result<Array, JsError> {
    let board: Board = text.parse()?;

    match board.solve()? {
        Verdict::Unique(assignment) => Ok(board.filled_grid(&assignment)
            .to_string()
            .lines()
            .map(JsValue::from_str)
            .collect()),
        Verdict::Unsatisfiable => Err(JsError::new("the puzzle has no solution")),
        Verdict::Ambiguous { .. } => Err(JsError::new("the puzzle has more than one solution")),
    }
}
