use std::cmp::Reverse;
use std::fmt::{Display, Formatter};
use std::panic;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::board::Board;
use crate::config::SolverConfig;
use crate::profile::LineProfile;

// the only distinction that matters is one solution versus more than one
const SOLUTION_CAP: usize = 2;
const TIME_CHECK_INTERVAL: u64 = 1024;

/// A fill count for every thermometer on a board, in board order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Assignment(pub(crate) Vec<usize>);

impl Assignment {
    /// The fill count of the thermometer at `index`; thermometers past the end hold nothing.
    pub fn fill(&self, index: usize) -> usize {
        self.0.get(index).copied().unwrap_or(0)
    }

    /// All fill counts, in board order.
    pub fn fills(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Assignment {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

/// The outcome of a completed search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// No assignment meets every row and column target.
    Unsatisfiable,
    /// Exactly one assignment meets every target.
    Unique(Assignment),
    /// At least two assignments meet every target; two of them are given, in sorted order.
    Ambiguous {
        /// The smaller witness.
        first: Assignment,
        /// The larger witness.
        second: Assignment,
    },
}

impl Verdict {
    /// The solution, if it is unique.
    pub fn solution(&self) -> Option<&Assignment> {
        match self {
            Self::Unique(assignment) => Some(assignment),
            _ => None,
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsatisfiable => write!(f, "unsatisfiable"),
            Self::Unique(_) => write!(f, "unique"),
            Self::Ambiguous { .. } => write!(f, "ambiguous"),
        }
    }
}

/// The budget that ran out.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum AbortReason {
    /// More search nodes were needed than allowed.
    #[error("node limit of {0} reached")]
    NodeLimit(u64),
    /// The search ran for longer than allowed.
    #[error("time limit of {0:?} reached")]
    TimeLimit(Duration),
}

/// A search stopped by its budget before it could reach a verdict.
///
/// This says nothing about whether the board has a solution.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("search aborted after {nodes} nodes and {elapsed:?}: {reason}")]
pub struct SearchAborted {
    /// Which budget ran out.
    pub reason: AbortReason,
    /// Nodes expanded before stopping.
    pub nodes: u64,
    /// Time spent before stopping.
    pub elapsed: Duration,
}

/// A depth-first search for fill counts, with running row and column sums pruned against their targets.
///
/// Use [`Self::solve`] to reach a [`Verdict`].
pub struct Solver<'a> {
    board: &'a Board,
    config: SolverConfig,
    order: Vec<usize>,
}

impl<'a> From<&'a Board> for Solver<'a> {
    fn from(board: &'a Board) -> Self {
        Self::new(board, SolverConfig::default())
    }
}

impl<'a> Solver<'a> {
    /// Prepare a search over `board`, fixing the order in which thermometers are decided.
    pub fn new(board: &'a Board, config: SolverConfig) -> Self {
        let graph = conflict_graph(board);

        // the most entangled thermometers first, longer ones breaking ties; empty ones are never decided
        let order = graph.nodes()
            .sorted_by_key(|index| (Reverse(graph.neighbors(*index).count()), Reverse(board.thermometers[*index].len()), *index))
            .collect_vec();
        debug!(decided = order.len(), fixed = board.thermometers.len() - order.len(), edges = graph.edge_count(), "ordered thermometers");

        Self { board, config, order }
    }

    /// The order in which thermometers are decided, as board indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Search for every way to fill the board, stopping at the second solution.
    ///
    /// # Search
    /// Thermometers are decided one at a time in [`Self::order`], trying fill counts from empty to full.
    /// Each line tracks the sum of its decided cells and the capacity left in its undecided thermometers.
    /// A fill is rejected as soon as any line it touches overshoots its target, or can no longer reach it.
    /// Overshooting only gets worse with more fill, so it also ends the loop over fills.
    ///
    /// When `threads` is above one, the fill counts of the first thermometer are dealt out round-robin to
    /// that many workers, each with private sums. A worker gives up on a fill of the first thermometer once
    /// two solutions are known under smaller fills, so the witnesses of an [`Verdict::Ambiguous`] board are
    /// always the first two a single worker would find, whatever the thread count.
    ///
    /// # Errors
    /// [`SearchAborted`] if a budget in the [`SolverConfig`] runs out first, unless two solutions were already found.
    pub fn solve(&self) -> Result<Verdict, SearchAborted> {
        let board = self.board;
        let profile = board.line_profile();
        let targets = board.row_targets.iter().chain(&board.col_targets).copied().collect_vec();
        let roots = self.order.first().map_or(1, |root| board.thermometers[*root].len() + 1);
        let shared = Shared::new(&self.config, roots);

        if let Some(line) = profile.lines().find(|line| targets[line.slot(board.size)] > profile.capacity(*line)) {
            debug!(%line, "target exceeds what the line can hold");
            info!(verdict = %Verdict::Unsatisfiable, nodes = 0, "search finished");
            return Ok(Verdict::Unsatisfiable);
        }

        let workers = self.config.threads.get().min(roots);

        let found = if workers <= 1 {
            Search::new(board, &self.order, &targets, &shared).run(Stride::ALL)
        } else {
            debug!(workers, root = self.order[0], "splitting search");
            thread::scope(|scope| {
                let handles = (0..workers)
                    .map(|offset| {
                        let (order, targets, shared) = (&self.order, &targets, &shared);
                        scope.spawn(move || Search::new(board, order, targets, shared).run(Stride { offset, step: workers }))
                    })
                    .collect_vec();

                handles.into_iter()
                    .flat_map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                    .collect_vec()
            })
        };

        let nodes = shared.nodes.load(Ordering::Relaxed);
        let elapsed = shared.started.elapsed();
        // each root fill belongs to one worker, which finds its solutions in search order
        let mut found = found.into_iter()
            .sorted_by_key(|(root, _)| *root)
            .map(|(_, assignment)| assignment)
            .take(SOLUTION_CAP)
            .sorted()
            .collect_vec();

        if found.len() < SOLUTION_CAP {
            if let Some(reason) = shared.abort.get() {
                info!(%reason, nodes, ?elapsed, "search aborted");
                return Err(SearchAborted { reason: *reason, nodes, elapsed });
            }
        }

        let verdict = match found.len() {
            0 => Verdict::Unsatisfiable,
            1 => Verdict::Unique(found.remove(0)),
            _ => {
                let second = found.swap_remove(1);
                let first = found.swap_remove(0);
                Verdict::Ambiguous { first, second }
            }
        };

        info!(%verdict, nodes, ?elapsed, "search finished");
        Ok(verdict)
    }
}

/// Thermometers are adjacent when they share a row or a column. Empty thermometers are left out.
fn conflict_graph(board: &Board) -> UnGraphMap<usize, ()> {
    let profile = board.line_profile();
    let mut graph = UnGraphMap::with_capacity(board.thermometers.len(), 0);

    for (index, thermometer) in board.thermometers.iter().enumerate() {
        if !thermometer.is_empty() {
            graph.add_node(index);
        }
    }

    for line in profile.lines() {
        let on_line = profile.spans_on(line).map(|span| span.thermometer()).collect_vec();
        for (a, b) in on_line.into_iter().tuple_combinations() {
            graph.add_edge(a, b, ());
        }
    }

    graph
}

/// State shared by every worker of one search.
struct Shared {
    started: Instant,
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    nodes: AtomicU64,
    // solutions found so far, by fill of the first thermometer
    solutions: Vec<AtomicUsize>,
    cancelled: AtomicBool,
    abort: OnceLock<AbortReason>,
}

impl Shared {
    fn new(config: &SolverConfig, roots: usize) -> Self {
        Self {
            started: Instant::now(),
            node_limit: config.node_limit,
            time_limit: config.time_limit,
            nodes: AtomicU64::new(0),
            solutions: (0..roots).map(|_| AtomicUsize::new(0)).collect(),
            cancelled: AtomicBool::new(false),
            abort: OnceLock::new(),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn abort(&self, reason: AbortReason) {
        // the first budget to run out is the one reported
        let _ = self.abort.set(reason);
        self.cancel();
    }

    fn record_solution(&self, root: usize) {
        self.solutions[root].fetch_add(1, Ordering::AcqRel);
    }

    /// Whether enough solutions are known under fills of the first thermometer below `root`
    /// that nothing found from `root` on can be among the first two.
    fn settled_before(&self, root: usize) -> bool {
        let mut known = 0;
        for count in &self.solutions[..root] {
            known += count.load(Ordering::Acquire);
            if known >= SOLUTION_CAP {
                return true;
            }
        }

        false
    }
}

/// Which fill counts of the first thermometer a worker owns: `offset`, `offset + step`, and so on.
#[derive(Clone, Copy)]
struct Stride {
    offset: usize,
    step: usize,
}

impl Stride {
    const ALL: Self = Self { offset: 0, step: 1 };
}

enum Fit {
    Fits,
    // some line cannot reach its target with this fill, but more fill might help
    Short,
    // some line is past its target, and more fill only makes it worse
    Over,
}

/// One worker's private search state.
struct Search<'s> {
    board: &'s Board,
    profile: &'s LineProfile,
    order: &'s [usize],
    targets: &'s [usize],
    shared: &'s Shared,
    sums: Vec<usize>,
    remaining: Vec<usize>,
    fills: Vec<usize>,
    root: usize,
    found: Vec<(usize, Assignment)>,
}

impl<'s> Search<'s> {
    fn new(board: &'s Board, order: &'s [usize], targets: &'s [usize], shared: &'s Shared) -> Self {
        let profile = board.line_profile();

        Self {
            board,
            profile,
            order,
            targets,
            shared,
            sums: vec![0; targets.len()],
            remaining: profile.capacities().to_vec(),
            fills: vec![0; board.thermometers.len()],
            root: 0,
            found: Vec::with_capacity(SOLUTION_CAP),
        }
    }

    fn run(mut self, stride: Stride) -> Vec<(usize, Assignment)> {
        self.branch(0, stride);
        self.found
    }

    fn branch(&mut self, depth: usize, stride: Stride) {
        if !self.tick() {
            return;
        }

        let Some(&thermometer) = self.order.get(depth) else {
            self.record();
            return;
        };

        let profile = self.profile;
        let spans = profile.span_indices_of(thermometer);
        for span in spans.iter().map(|span| profile.span(*span)) {
            self.remaining[span.slot] -= span.capacity();
        }

        let length = self.board.thermometers[thermometer].len();
        for fill in (stride.offset..=length).step_by(stride.step) {
            match self.fit(spans, fill) {
                Fit::Over => break,
                Fit::Short => continue,
                Fit::Fits => {}
            }

            for span in spans.iter().map(|span| profile.span(*span)) {
                self.sums[span.slot] += span.count(fill);
            }
            self.fills[thermometer] = fill;
            if depth == 0 {
                self.root = fill;
            }

            self.branch(depth + 1, Stride::ALL);

            self.fills[thermometer] = 0;
            for span in spans.iter().map(|span| profile.span(*span)) {
                self.sums[span.slot] -= span.count(fill);
            }

            if self.stopped() {
                break;
            }
        }

        for span in spans.iter().map(|span| profile.span(*span)) {
            self.remaining[span.slot] += span.capacity();
        }
    }

    fn fit(&self, spans: &[usize], fill: usize) -> Fit {
        let mut fit = Fit::Fits;

        for span in spans.iter().map(|span| self.profile.span(*span)) {
            let sum = self.sums[span.slot] + span.count(fill);
            let target = self.targets[span.slot];

            if sum > target {
                return Fit::Over;
            }
            if sum + self.remaining[span.slot] < target {
                fit = Fit::Short;
            }
        }

        fit
    }

    /// Whether this worker has nothing left to contribute: a budget ran out, it holds two solutions of its
    /// own, or two earlier ones are known elsewhere.
    fn stopped(&self) -> bool {
        self.shared.is_cancelled() || self.found.len() >= SOLUTION_CAP || self.shared.settled_before(self.root)
    }

    /// Count a node against the budget. Returns `false` once the search should stop.
    fn tick(&mut self) -> bool {
        if self.stopped() {
            return false;
        }

        let nodes = self.shared.nodes.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(limit) = self.shared.node_limit {
            if nodes > limit {
                self.shared.abort(AbortReason::NodeLimit(limit));
                return false;
            }
        }

        if let Some(limit) = self.shared.time_limit {
            if nodes % TIME_CHECK_INTERVAL == 0 && self.shared.started.elapsed() > limit {
                self.shared.abort(AbortReason::TimeLimit(limit));
                return false;
            }
        }

        true
    }

    fn record(&mut self) {
        if self.sums != self.targets {
            return;
        }

        let assignment = Assignment(self.fills.clone());
        debug_assert!(self.board.satisfies(&assignment));
        debug!(fills = ?assignment.fills(), "found solution");

        self.found.push((self.root, assignment));
        self.shared.record_solution(self.root);
    }
}
