use std::fs;
use std::num::NonZero;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use mercury::{Board, SearchAborted, SolverConfig, Verdict};
use tracing::{error, Level};

/// Solve a Thermometers puzzle and report whether its solution is unique.
///
/// Exits with 0 for a unique solution, 1 for none, 2 for several, 3 when a budget ran out and 4 on any
/// other error.
#[derive(Parser, Debug)]
#[command(name = "mercury-solve", version)]
struct Cli {
    /// Puzzle file: one line per grid row, then the column targets, then the row targets.
    puzzle: PathBuf,
    /// Worker threads sharing the first branching decision.
    #[arg(long, default_value_t = NonZero::<usize>::MIN)]
    threads: NonZero<usize>,
    /// Give up after expanding this many search nodes.
    #[arg(long)]
    node_limit: Option<u64>,
    /// Give up after this many milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// Log more; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::default().with_threads(self.threads);
        if let Some(nodes) = self.node_limit {
            config = config.with_node_limit(nodes);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        config
    }

    fn level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.level())
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(4)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let text = fs::read_to_string(&cli.puzzle)
        .with_context(|| format!("failed to read {}", cli.puzzle.display()))?;
    let board: Board = text.parse()
        .with_context(|| format!("failed to load puzzle from {}", cli.puzzle.display()))?;

    let verdict = match board.solve_with(cli.config()) {
        Ok(verdict) => verdict,
        Err(SearchAborted { reason, nodes, elapsed }) => {
            println!("aborted: {reason} after {nodes} nodes in {elapsed:?}");
            return Ok(ExitCode::from(3));
        }
    };

    println!("{verdict}");
    Ok(match verdict {
        Verdict::Unique(assignment) => {
            print!("{}", board.filled_grid(&assignment));
            ExitCode::SUCCESS
        }
        Verdict::Unsatisfiable => ExitCode::from(1),
        Verdict::Ambiguous { first, second } => {
            print!("{}\n{}", board.filled_grid(&first), board.filled_grid(&second));
            ExitCode::from(2)
        }
    })
}
