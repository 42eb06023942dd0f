use std::num::NonZero;
use std::time::Duration;

/// Knobs for a [`Solver`](crate::solver::Solver) run.
///
/// The default is a single worker with no budget, which always runs the search to completion.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// Worker threads sharing the first branching decision.
    pub threads: NonZero<usize>,
    /// Abort once this many search nodes have been expanded across all workers.
    pub node_limit: Option<u64>,
    /// Abort once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: NonZero::<usize>::MIN,
            node_limit: None,
            time_limit: None,
        }
    }
}

impl SolverConfig {
    /// Split the search across `threads` workers.
    pub fn with_threads(mut self, threads: NonZero<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Abort after expanding `nodes` search nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    /// Abort after `limit` has elapsed.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}
