#[cfg(test)]
mod tests {
    use std::num::NonZero;
    use std::time::Duration;

    use unordered_pair::UnorderedPair;

    use crate::board::Board;
    use crate::builder::{BoardBuilder, BuildError, Extent};
    use crate::cell::Cell;
    use crate::config::SolverConfig;
    use crate::location::Location;
    use crate::parse::ParseError;
    use crate::profile::Line;
    use crate::shape::{Direction, Turn};
    use crate::solver::{AbortReason, Assignment, Verdict};
    use crate::thermometer::TraceEnd;

    const CURVED: &str = "R>>2D
U.Lvv
^D.3v
Uv<<L
Rv...
3 3 1 3 3
5 2 2 4 0
";

    const AMBIGUOUS: &str = "R>R>
.D.D
....
....
1 1 1 1
3 1 0 0
";

    // seven solutions; the longest thermometer is decided first
    const CROWDED: &str = "R>R>
RR>R
R>>R
R>RR
3 2 2 2
2 2 2 3
";

    // nine lone cells, one per row and column of a 3×3 lattice: six solutions
    const PERMUTATIONS: &str = "R.R.R
.....
R.R.R
.....
R.R.R
1 0 1 0 1
1 0 1 0 1
";

    #[test]
    fn single_cell() {
        let board: Board = "R\n1\n1\n".parse().unwrap();

        assert_eq!(board.thermometers().len(), 1);
        assert_eq!(board.thermometers()[0].end(), Some(TraceEnd::Edge));

        let verdict = board.solve().unwrap();
        assert_eq!(verdict, Verdict::Unique(Assignment::from(vec![1])));
        assert_eq!(format!("{}", board.filled_grid(verdict.solution().unwrap())), "x\n");
    }

    #[test]
    fn trace_curved() {
        let board: Board = CURVED.parse().unwrap();

        let traced = board.thermometers().iter()
            .map(|thermometer| (thermometer.cells().to_vec(), thermometer.end().unwrap()))
            .collect::<Vec<_>>();

        assert_eq!(traced, vec![
            (vec![Location(0, 0), Location(0, 1), Location(0, 2), Location(0, 3), Location(1, 3), Location(2, 3)], TraceEnd::Gap),
            (vec![Location(0, 4), Location(1, 4), Location(2, 4)], TraceEnd::Bulb),
            (vec![Location(1, 0)], TraceEnd::Bulb),
            (vec![Location(1, 2)], TraceEnd::Gap),
            (vec![Location(2, 1), Location(3, 1), Location(4, 1)], TraceEnd::Edge),
            (vec![Location(3, 0), Location(2, 0)], TraceEnd::Bulb),
            (vec![Location(3, 4), Location(3, 3), Location(3, 2)], TraceEnd::InconsistentSegment(Location(3, 1))),
            (vec![Location(4, 0)], TraceEnd::InconsistentSegment(Location(4, 1))),
        ]);

        assert_eq!(board.owner(Location(1, 3)), Some(0));
        assert_eq!(board.owner(Location(4, 4)), None);
        assert_eq!(board.cell(Location(0, 3)), Some(Cell::Turn { turn: Turn::Two }));
        assert_eq!(board.cell(Location(3, 2)), Some(Cell::Segment { direction: Direction::Left }));
        assert_eq!(board.cell(Location(5, 0)), None);
        assert_eq!(board.thermometers()[4].bulb(), Some(Location(2, 1)));
        assert_eq!(board.thermometers()[6].direction(), Some(Direction::Left));
    }

    #[test]
    fn solve_curved() {
        let board: Board = CURVED.parse().unwrap();

        let verdict = board.solve().unwrap();
        let solution = verdict.solution().unwrap();
        assert_eq!(solution.fills(), &[5, 2, 0, 0, 2, 2, 2, 0]);
        assert!(board.satisfies(solution));

        let grid = board.filled_grid(solution);
        assert_eq!(grid.count(), 13);
        assert!(grid.is_filled(Location(1, 3)));
        assert!(!grid.is_filled(Location(2, 3)));
        assert!(!grid.is_filled(Location(5, 5)));
        assert_eq!(format!("{}", grid), "xxxxx
...xx
xx...
xx.xx
.....
");
    }

    #[test]
    fn solve_around_corner() {
        let board: Board = "R2.
.v.
.v.
1 2 0
2 1 0
".parse().unwrap();

        assert_eq!(board.thermometers()[0].cells(), &[Location(0, 0), Location(0, 1), Location(1, 1), Location(2, 1)]);

        let verdict = board.solve().unwrap();
        assert_eq!(format!("{}", board.filled_grid(verdict.solution().unwrap())), "xx.
.x.
...
");
    }

    #[test]
    fn tube_closing_on_itself() {
        let board: Board = "R2
03
1 1
2 0
".parse().unwrap();

        let thermometer = &board.thermometers()[0];
        assert_eq!(thermometer.cells(), &[Location(0, 0), Location(0, 1), Location(1, 1), Location(1, 0)]);
        assert_eq!(thermometer.end(), Some(TraceEnd::Loop(Location(0, 0))));

        let verdict = board.solve().unwrap();
        assert_eq!(verdict, Verdict::Unique(Assignment::from(vec![2])));
        assert_eq!(format!("{}", board.filled_grid(verdict.solution().unwrap())), "xx\n..\n");
    }

    #[test]
    fn stops_at_incompatible_turn() {
        let board: Board = "R0L
...
...
1 0 1
2 0 0
".parse().unwrap();

        assert_eq!(board.thermometers()[0].cells(), &[Location(0, 0)]);
        assert_eq!(board.thermometers()[0].end(), Some(TraceEnd::IncompatibleTurn(Location(0, 1))));
        assert_eq!(board.thermometers()[1].cells(), &[Location(0, 2), Location(0, 1)]);
        assert_eq!(board.thermometers()[1].end(), Some(TraceEnd::Edge));

        assert_eq!(board.solve().unwrap(), Verdict::Unique(Assignment::from(vec![1, 1])));
    }

    #[test]
    fn stops_at_inconsistent_segment() {
        let board: Board = "R<L
...
...
1 1 1
3 0 0
".parse().unwrap();

        assert_eq!(board.thermometers()[0].end(), Some(TraceEnd::InconsistentSegment(Location(0, 1))));
        assert_eq!(board.thermometers()[1].end(), Some(TraceEnd::Bulb));

        assert_eq!(board.solve().unwrap(), Verdict::Unique(Assignment::from(vec![1, 2])));
    }

    #[test]
    fn unsatisfiable() {
        let board: Board = "R>>
...
...
1 1 0
1 0 0
".parse().unwrap();

        assert_eq!(board.solve().unwrap(), Verdict::Unsatisfiable);
    }

    #[test]
    fn target_beyond_capacity() {
        // nothing touches row 1, so its target cannot be met before any search
        let board: Board = "R>
..
1 1
0 1
".parse().unwrap();

        assert_eq!(board.solve().unwrap(), Verdict::Unsatisfiable);
    }

    #[test]
    fn ambiguous() {
        let board: Board = AMBIGUOUS.parse().unwrap();

        assert_eq!(board.solve().unwrap(), Verdict::Ambiguous {
            first: Assignment::from(vec![1, 2, 1, 0]),
            second: Assignment::from(vec![2, 1, 0, 1]),
        });
    }

    #[test]
    fn filled_from_the_bulb() {
        let board: Board = AMBIGUOUS.parse().unwrap();
        let Verdict::Ambiguous { first, second } = board.solve().unwrap() else {
            panic!("expected two solutions");
        };

        for assignment in [first, second] {
            assert!(board.satisfies(&assignment));
            for thermometer in board.thermometers() {
                let filled = thermometer.cells().iter()
                    .map(|location| board.is_filled(&assignment, *location))
                    .collect::<Vec<_>>();
                assert!(filled.windows(2).all(|pair| pair[0] || !pair[1]));
            }
        }
    }

    #[test]
    fn first_two_witnesses() {
        let board: Board = CROWDED.parse().unwrap();
        assert_eq!(crate::solver::Solver::from(&board).order(), &[5, 1, 3, 7, 0, 2, 4, 8, 9, 6]);
        assert_eq!(board.solve().unwrap(), Verdict::Ambiguous {
            first: Assignment::from(vec![1, 1, 0, 1, 1, 1, 1, 2, 1, 0]),
            second: Assignment::from(vec![2, 0, 0, 2, 0, 1, 1, 1, 1, 1]),
        });

        let board: Board = PERMUTATIONS.parse().unwrap();
        assert_eq!(board.solve().unwrap(), Verdict::Ambiguous {
            first: Assignment::from(vec![0, 0, 1, 0, 1, 0, 1, 0, 0]),
            second: Assignment::from(vec![0, 0, 1, 1, 0, 0, 0, 1, 0]),
        });
    }

    #[test]
    fn threads_agree() {
        for text in [CURVED, AMBIGUOUS, CROWDED, PERMUTATIONS] {
            let board: Board = text.parse().unwrap();
            let single = board.solve().unwrap();

            for threads in 2..=4 {
                let config = SolverConfig::default().with_threads(NonZero::new(threads).unwrap());
                for _ in 0..16 {
                    assert_eq!(board.solve_with(config).unwrap(), single);
                }
            }
        }
    }

    #[test]
    fn deterministic() {
        let board: Board = CROWDED.parse().unwrap();
        let first = board.solve().unwrap();

        for _ in 0..8 {
            assert_eq!(board.solve().unwrap(), first);
        }
    }

    #[test]
    fn node_limit() {
        let board: Board = "R\n1\n1\n".parse().unwrap();

        let aborted = board.solve_with(SolverConfig::default().with_node_limit(1)).unwrap_err();
        assert_eq!(aborted.reason, AbortReason::NodeLimit(1));

        assert!(board.solve_with(SolverConfig::default().with_node_limit(2)).is_ok());
    }

    #[test]
    fn generous_time_limit() {
        let board: Board = CURVED.parse().unwrap();
        let config = SolverConfig::default().with_time_limit(Duration::from_secs(60));

        assert_eq!(board.solve_with(config).unwrap().solution().unwrap().fills(), &[5, 2, 0, 0, 2, 2, 2, 0]);
    }

    #[test]
    fn satisfies() {
        let board: Board = CURVED.parse().unwrap();

        assert!(board.satisfies(&Assignment::from(vec![5, 2, 0, 0, 2, 2, 2, 0])));
        assert!(!board.satisfies(&Assignment::from(vec![5, 2, 0, 0, 2, 2, 2, 1])));
        assert!(!board.satisfies(&Assignment::from(vec![5, 2, 0, 0, 2, 2, 2])));
        assert!(!board.satisfies(&Assignment::from(vec![7, 2, 0, 0, 2, 2, 2, 0])));
    }

    #[test]
    fn display_round_trip() {
        let board: Board = CURVED.parse().unwrap();
        assert_eq!(format!("{}", board), CURVED);

        let again: Board = format!("{}", board).parse().unwrap();
        assert_eq!(again.thermometers(), board.thermometers());
    }

    #[test]
    fn parse_ignores_trailing_space() {
        let board: Board = "R  \n1\n1 \n\n\n".parse().unwrap();
        assert_eq!(board.size().get(), 1);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("R\n".parse::<Board>().unwrap_err(), ParseError::MissingTargets);
        assert_eq!("".parse::<Board>().unwrap_err(), ParseError::MissingTargets);
        assert_eq!("R\n1\nx\n".parse::<Board>().unwrap_err(), ParseError::BadTarget { line: 3, token: "x".to_string() });
        assert_eq!("\n\n".parse::<Board>().unwrap_err(), ParseError::MissingTargets);
    }

    #[test]
    fn size_mismatch() {
        assert_eq!("R.\n..\n1 1\n1\n".parse::<Board>().unwrap_err(), ParseError::Build(BuildError::SizeMismatch {
            extent: Extent::RowTargets,
            expected: 2,
            found: 1,
        }));
        assert_eq!("R.\n.\n1 1\n1 1\n".parse::<Board>().unwrap_err(), ParseError::Build(BuildError::SizeMismatch {
            extent: Extent::GridRow(1),
            expected: 2,
            found: 1,
        }));
        assert_eq!("R.\n1 1\n1 1\n".parse::<Board>().unwrap_err(), ParseError::Build(BuildError::SizeMismatch {
            extent: Extent::GridRows,
            expected: 2,
            found: 1,
        }));
        assert_eq!(Board::from_symbols(&[], vec![], vec![]).unwrap_err(), BuildError::SizeMismatch {
            extent: Extent::ColTargets,
            expected: 1,
            found: 0,
        });
        assert_eq!("\n\n1\n".parse::<Board>().unwrap_err(), ParseError::Build(BuildError::SizeMismatch {
            extent: Extent::ColTargets,
            expected: 1,
            found: 0,
        }));
    }

    #[test]
    fn target_out_of_range() {
        let error = "R\n2\n1\n".parse::<Board>().unwrap_err();

        assert_eq!(error, ParseError::Build(BuildError::TargetOutOfRange { line: Line::Col(0), target: 2, size: 1 }));
        assert_eq!(format!("{}", error), "target 2 for column 0 exceeds the grid size 1");
    }

    #[test]
    fn overlapping() {
        let error = ".D.
.0L
...
0 0 0
0 0 0
".parse::<Board>().unwrap_err();

        assert_eq!(error, ParseError::Build(BuildError::OverlappingThermometers {
            thermometers: UnorderedPair(0, 1),
            location: Location(1, 1),
        }));
    }

    #[test]
    fn disconnected() {
        let error = "R0v
..v
...
0 0 0
0 0 0
".parse::<Board>().unwrap_err();

        assert_eq!(error, ParseError::Build(BuildError::DisconnectedSymbol {
            location: Location(0, 1),
            cell: Cell::Turn { turn: Turn::Zero },
        }));
    }

    #[test]
    fn builder() {
        let board = BoardBuilder::with_size(NonZero::new(2).unwrap())
            .place(Location(0, 1), Cell::Bulb { direction: Direction::Down })
            .place(Location(1, 1), Cell::Segment { direction: Direction::Down })
            .row_targets([1, 1])
            .col_targets([0, 2])
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), ".D
.v
0 2
1 1
");
        assert_eq!(board.solve().unwrap(), Verdict::Unique(Assignment::from(vec![2])));
    }

    #[test]
    fn builder_out_of_bounds() {
        let mut builder = BoardBuilder::with_size(NonZero::new(2).unwrap());
        builder
            .place(Location(2, 0), Cell::Bulb { direction: Direction::Up })
            .place(Location(0, 0), Cell::Bulb { direction: Direction::Right });

        assert_eq!(builder.is_valid(), Some(&BuildError::OutOfBounds { location: Location(2, 0) }));
        assert_eq!(builder.build().unwrap_err(), BuildError::OutOfBounds { location: Location(2, 0) });
    }

    #[test]
    fn from_paths() {
        let board = Board::from_paths(
            NonZero::new(2).unwrap(),
            vec![vec![Location(0, 0), Location(0, 1), Location(1, 1)], vec![Location(1, 0)]],
            vec![2, 1],
            vec![1, 2],
        ).unwrap();

        assert_eq!(format!("{}", board), "R2
Rv
1 2
2 1
");
        assert_eq!(board.thermometers()[1].direction(), None);
        assert_eq!(board.solve().unwrap(), Verdict::Unique(Assignment::from(vec![3, 0])));
    }

    #[test]
    fn from_paths_with_empty_thermometer() {
        let board = Board::from_paths(NonZero::<usize>::MIN, vec![vec![], vec![Location(0, 0)]], vec![1], vec![1]).unwrap();

        assert!(board.thermometers()[0].is_empty());
        assert_eq!(crate::solver::Solver::from(&board).order(), &[1]);
        assert_eq!(board.solve().unwrap(), Verdict::Unique(Assignment::from(vec![0, 1])));
    }

    #[test]
    fn from_paths_errors() {
        let size = NonZero::new(2).unwrap();

        assert_eq!(
            Board::from_paths(size, vec![vec![Location(0, 0), Location(0, 1)], vec![Location(0, 1)]], vec![0, 0], vec![0, 0]).unwrap_err(),
            BuildError::OverlappingThermometers { thermometers: UnorderedPair(0, 1), location: Location(0, 1) },
        );
        assert_eq!(
            Board::from_paths(size, vec![vec![Location(0, 0), Location(1, 1)]], vec![0, 0], vec![0, 0]).unwrap_err(),
            BuildError::BrokenPath { thermometer: 0, location: Location(1, 1) },
        );
        assert_eq!(
            Board::from_paths(size, vec![vec![Location(0, 0), Location(0, 1), Location(0, 0)]], vec![0, 0], vec![0, 0]).unwrap_err(),
            BuildError::BrokenPath { thermometer: 0, location: Location(0, 0) },
        );
        assert_eq!(
            Board::from_paths(size, vec![vec![Location(0, 2)]], vec![0, 0], vec![0, 0]).unwrap_err(),
            BuildError::OutOfBounds { location: Location(0, 2) },
        );
    }

    #[test]
    fn verdict_display() {
        assert_eq!(format!("{}", Verdict::Unsatisfiable), "unsatisfiable");
        assert_eq!(format!("{}", Verdict::Unique(Assignment::default())), "unique");
    }
}
