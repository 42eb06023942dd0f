use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::location::Dimension;
use crate::thermometer::Thermometer;

/// A row or a column of the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Line {
    /// A row, by index.
    Row(usize),
    /// A column, by index.
    Col(usize),
}

impl Line {
    /// Rows occupy slots `0..n` and columns `n..2n`.
    pub(crate) fn slot(&self, size: Dimension) -> usize {
        match self {
            Self::Row(row) => *row,
            Self::Col(col) => size.get() + col,
        }
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row(row) => write!(f, "row {row}"),
            Self::Col(col) => write!(f, "column {col}"),
        }
    }
}

/// How one thermometer meets one line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    pub(crate) thermometer: usize,
    pub(crate) line: Line,
    pub(crate) slot: usize,
    // counts[fill] = how many of the first `fill` cells lie on the line
    pub(crate) counts: Vec<usize>,
}

impl Span {
    /// The index of the thermometer on its board.
    pub fn thermometer(&self) -> usize {
        self.thermometer
    }

    /// The line this span lies on.
    pub fn line(&self) -> Line {
        self.line
    }

    /// Cells on this line that are filled when the thermometer holds `fill` cells.
    ///
    /// Fills beyond the thermometer's length count as full.
    pub fn count(&self, fill: usize) -> usize {
        self.counts[fill.min(self.counts.len() - 1)]
    }

    /// Cells on this line when the thermometer is full.
    pub fn capacity(&self) -> usize {
        self.counts.last().copied().unwrap_or(0)
    }
}

/// Per-line contribution tables for a board, computed once and never changed.
///
/// Spans are stored once and indexed both by line and by thermometer.
#[derive(Clone, Debug)]
pub struct LineProfile {
    size: Dimension,
    spans: Vec<Span>,
    by_slot: Vec<Vec<usize>>,
    by_thermometer: Vec<Vec<usize>>,
    capacities: Vec<usize>,
}

impl LineProfile {
    pub(crate) fn new(size: Dimension, thermometers: &[Thermometer]) -> Self {
        let mut spans = Vec::new();
        let mut by_slot = vec![Vec::new(); 2 * size.get()];
        let mut by_thermometer = Vec::with_capacity(thermometers.len());
        let mut capacities = vec![0; 2 * size.get()];

        for (index, thermometer) in thermometers.iter().enumerate() {
            // positions along the tube, grouped by line
            let mut positions: BTreeMap<Line, Vec<usize>> = BTreeMap::new();
            for (position, location) in thermometer.cells().iter().enumerate() {
                positions.entry(Line::Row(location.row())).or_default().push(position);
                positions.entry(Line::Col(location.col())).or_default().push(position);
            }

            let mut own = Vec::with_capacity(positions.len());
            for (line, on_line) in positions {
                let mut counts = vec![0; thermometer.len() + 1];
                for position in on_line {
                    counts[position + 1..].iter_mut().for_each(|count| *count += 1);
                }

                let slot = line.slot(size);
                let span = Span { thermometer: index, line, slot, counts };
                capacities[slot] += span.capacity();
                by_slot[slot].push(spans.len());
                own.push(spans.len());
                spans.push(span);
            }
            by_thermometer.push(own);
        }

        Self { size, spans, by_slot, by_thermometer, capacities }
    }

    /// Every line of the board, rows first.
    pub fn lines(&self) -> impl Iterator<Item = Line> {
        let n = self.size.get();
        (0..n).map(Line::Row).chain((0..n).map(Line::Col))
    }

    /// The spans lying on `line`, in thermometer order.
    pub fn spans_on(&self, line: Line) -> impl Iterator<Item = &Span> + '_ {
        self.by_slot[line.slot(self.size)].iter().map(|span| &self.spans[*span])
    }

    /// The spans of the thermometer at `index`, in line order.
    pub fn spans_of(&self, index: usize) -> impl Iterator<Item = &Span> + '_ {
        self.by_thermometer[index].iter().map(|span| &self.spans[*span])
    }

    /// The most cells `line` can ever have filled.
    pub fn capacity(&self, line: Line) -> usize {
        self.capacities[line.slot(self.size)]
    }

    pub(crate) fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub(crate) fn span(&self, index: usize) -> &Span {
        &self.spans[index]
    }

    pub(crate) fn span_indices_of(&self, thermometer: usize) -> &[usize] {
        &self.by_thermometer[thermometer]
    }
}
