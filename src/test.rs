#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};

    use crate::board::{AllowedColumns, Board, Cell, Player};
    use crate::config::{Config, SearchConfig};
    use crate::error::{ConfigurationError, InvalidMoveError};
    use crate::evaluate::{evaluate, outcome, Outcome};
    use crate::solver::{Engine, SearchResult, Solver};
    use crate::state::GameState;
    use crate::trace::{NodeId, TraceCollector, Window};

    fn config_with(rows: &[&str], allowed: &[usize], max_depth: usize) -> Result<SearchConfig> {
        let config = Config {
            rows: rows.len(),
            columns: rows[0].len(),
            allowed_columns: allowed.to_vec(),
            max_depth,
            initial_board: Some(rows.iter().map(|r| r.to_string()).collect()),
            ..Config::default()
        };
        Ok(config.validate()?)
    }

    fn both(config: &SearchConfig) -> (SearchResult, SearchResult) {
        let mut solver = Solver::new(config);
        (solver.solve(Engine::Minimax), solver.solve(Engine::AlphaBeta))
    }

    #[test]
    pub fn empty_board_is_a_draw_at_depth_three() -> Result<()> {
        let config = Config::default().validate()?;
        let (minimax, alphabeta) = both(&config);

        assert_eq!(minimax.decision(), (0, Some(0)));
        assert_eq!(alphabeta.decision(), (0, Some(0)));
        assert_eq!(minimax.terminal_evaluations, 27);
        assert_eq!(minimax.prune_events, 0);
        assert_eq!(alphabeta.terminal_evaluations, 11);
        assert_eq!(alphabeta.prune_events, 4);
        Ok(())
    }

    #[test]
    pub fn completes_a_vertical_four() -> Result<()> {
        let config = config_with(
            &[
                ".......",
                ".......",
                ".......",
                "X......",
                "X....O.",
                "X....OO",
            ],
            &[0, 1, 2],
            1,
        )?;
        let (minimax, alphabeta) = both(&config);

        assert_eq!(minimax.decision(), (1, Some(0)));
        assert_eq!(alphabeta.decision(), (1, Some(0)));
        assert_eq!(minimax.terminal_evaluations, 3);
        assert_eq!(alphabeta.terminal_evaluations, 3);
        Ok(())
    }

    #[test]
    pub fn full_column_is_not_playable() -> Result<()> {
        let board = Board::from_rows(
            6,
            7,
            &[".O.....", ".X.....", ".O.....", ".X.....", ".O.....", ".X....."],
        )?;
        let allowed = AllowedColumns::default();

        assert_eq!(board.legal_moves(&allowed), vec![0, 2]);
        assert_eq!(
            board.apply_move(1, Player::Max, &allowed),
            Err(InvalidMoveError::ColumnFull { column: 1 })
        );
        assert_eq!(
            board.apply_move(4, Player::Max, &allowed),
            Err(InvalidMoveError::ColumnNotAllowed { column: 4 })
        );
        assert_eq!(
            board.apply_move(9, Player::Min, &allowed),
            Err(InvalidMoveError::OutOfBounds {
                column: 9,
                columns: 7
            })
        );
        Ok(())
    }

    #[test]
    pub fn apply_move_leaves_the_original_untouched() -> Result<()> {
        let board = Board::new(6, 7);
        let allowed = AllowedColumns::default();

        let next = board.apply_move(2, Player::Min, &allowed)?;
        let next = next.apply_move(2, Player::Max, &allowed)?;

        assert_eq!(board, Board::new(6, 7));
        assert_eq!(next.get(0, 2), Cell::MinMark);
        assert_eq!(next.get(1, 2), Cell::MaxMark);
        assert_eq!(next.height(2), 2);
        assert_eq!(next.count(Cell::Empty), 40);
        Ok(())
    }

    #[test]
    pub fn zero_depth_scores_the_root() -> Result<()> {
        let config = Config::sample_position().validate()?;
        let root = config.initial_state();
        let mut solver = Solver::new(&config);

        for &engine in [Engine::Minimax, Engine::AlphaBeta].iter() {
            let result = solver.solve_from(engine, &root, 0);
            assert_eq!(result.best_move, None);
            assert_eq!(result.value, evaluate(&root, config.allowed_columns()));
            assert_eq!(result.terminal_evaluations, 1);
            assert_eq!(result.prune_events, 0);
        }
        Ok(())
    }

    #[test]
    pub fn already_won_root_reports_no_move() -> Result<()> {
        let config = config_with(
            &[
                ".......",
                ".......",
                ".......",
                ".......",
                "...XXXX",
                "..OOXOO",
            ],
            &[0, 1, 2],
            3,
        )?;
        let (minimax, alphabeta) = both(&config);

        assert_eq!(minimax.decision(), (1, None));
        assert_eq!(alphabeta.decision(), (1, None));
        assert_eq!(minimax.terminal_evaluations, 1);
        Ok(())
    }

    #[test]
    pub fn evaluation_matches_win_detection() -> Result<()> {
        let allowed = AllowedColumns::default();
        let cases: [(&[&str], i32); 5] = [
            (&["....", "....", "....", "XXXX"], 1),
            (&["...O", "..OX", ".OXX", "OXXX"], -1),
            (&["X...", "OX..", "OOX.", "OOOX"], 1),
            (&["....", "....", "OXOX", "XOXO"], 0),
            (&["OOXX", "XXOO", "OOXX", "XXOO"], 0),
        ];

        for (rows, expected) in cases.iter() {
            let board = Board::from_rows(4, 4, *rows)?;
            let state = GameState::new(board.clone(), Player::Max);
            assert_eq!(evaluate(&state, &allowed), *expected, "{}", board);
            assert_eq!(board.is_win(Player::Max), *expected == 1);
            assert_eq!(board.is_win(Player::Min), *expected == -1);
        }
        Ok(())
    }

    #[test]
    pub fn wins_outside_the_play_area_count() -> Result<()> {
        // the four sits entirely in columns 3-6, none of which are open
        let board = Board::from_rows(
            6,
            7,
            &[".......", ".......", ".......", ".......", ".......", "....OOO"],
        )?;
        let board = board.apply_move(3, Player::Min, &AllowedColumns::new(vec![3], 7)?)?;
        let state = GameState::new(board.clone(), Player::Max);
        let allowed = AllowedColumns::default();

        assert!(board.is_win(Player::Min));
        assert!(board.is_terminal(&allowed));
        assert_eq!(outcome(&state, &allowed), Outcome::MinWin);
        assert_eq!(evaluate(&state, &allowed), -1);
        Ok(())
    }

    #[test]
    pub fn blocked_board_is_terminal_draw() -> Result<()> {
        let board = Board::from_rows(2, 3, &["XOX", "OXO"])?;
        let state = GameState::new(board.clone(), Player::Max);
        let allowed = AllowedColumns::first(3);

        assert!(board.legal_moves(&allowed).is_empty());
        assert!(board.is_terminal(&allowed));
        assert_eq!(outcome(&state, &allowed), Outcome::Blocked);
        assert_eq!(evaluate(&state, &allowed), 0);
        Ok(())
    }

    #[test]
    pub fn lowest_column_wins_ties() -> Result<()> {
        // both column 0 and column 2 complete a four for Max
        let config = config_with(
            &[
                ".......",
                ".......",
                ".......",
                "X.X..O.",
                "X.X..O.",
                "X.X.OOO",
            ],
            &[0, 1, 2],
            1,
        )?;
        let (minimax, alphabeta) = both(&config);
        assert_eq!(minimax.decision(), (1, Some(0)));
        assert_eq!(alphabeta.decision(), (1, Some(0)));

        // Min to move: columns 1 and 2 both win for Min, column 0 does not
        let config = Config {
            allowed_columns: vec![2, 0, 1],
            max_depth: 1,
            starting_player: Player::Min,
            initial_board: Some(
                [
                    ".......",
                    ".......",
                    ".......",
                    ".OO....",
                    ".OO..X.",
                    "XOO.XXX",
                ]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            ),
            ..Config::default()
        }
        .validate()?;
        let (minimax, alphabeta) = both(&config);
        assert_eq!(minimax.decision(), (-1, Some(1)));
        assert_eq!(alphabeta.decision(), (-1, Some(1)));
        Ok(())
    }

    #[test]
    pub fn sample_position_is_a_forced_win() -> Result<()> {
        let config = Config::sample_position().validate()?;
        let comparison = Solver::new(&config).compare();

        assert!(comparison.agree());
        assert_eq!(comparison.minimax.decision(), (1, Some(0)));
        assert_eq!(comparison.minimax.terminal_evaluations, 19);
        assert_eq!(comparison.alphabeta.terminal_evaluations, 9);
        assert_eq!(comparison.alphabeta.prune_events, 3);
        assert_eq!(comparison.theoretical_leaves, 27);
        Ok(())
    }

    // every position reachable within `plies` moves over `allowed`
    fn positions(start: Player, allowed: &AllowedColumns, plies: usize) -> Vec<GameState> {
        let mut frontier = vec![GameState::new(Board::new(6, 7), start)];
        let mut all = frontier.clone();
        for _ in 0..plies {
            let mut next = Vec::new();
            for state in frontier.iter() {
                if state.board.is_terminal(allowed) {
                    continue;
                }
                for column in state.board.legal_moves(allowed) {
                    if let Ok(child) = state.play(column, allowed) {
                        next.push(child);
                    }
                }
            }
            all.extend(next.iter().cloned());
            frontier = next;
        }
        all
    }

    #[test]
    pub fn engines_agree_everywhere() -> Result<()> {
        let setups = [
            (vec![0, 1, 2], Player::Max, 4),
            (vec![1, 3, 5], Player::Min, 4),
            (vec![0, 1, 2, 3], Player::Max, 3),
        ];

        let mut pruned_runs = 0;
        for (columns, start, max_limit) in setups.iter() {
            let allowed = AllowedColumns::new(columns.iter().copied(), 7)?;
            let config = Config {
                allowed_columns: columns.clone(),
                starting_player: *start,
                ..Config::default()
            }
            .validate()?;
            let mut solver = Solver::new(&config);

            for state in positions(*start, &allowed, 5) {
                // search from each position as a fresh root
                let root = GameState::new(state.board.clone(), state.to_move);
                for limit in 0..=*max_limit {
                    let minimax = solver.solve_from(Engine::Minimax, &root, limit);
                    let alphabeta = solver.solve_from(Engine::AlphaBeta, &root, limit);

                    assert_eq!(minimax.decision(), alphabeta.decision(), "{}", root.board);
                    assert!(alphabeta.terminal_evaluations <= minimax.terminal_evaluations);
                    if alphabeta.prune_events > 0 {
                        pruned_runs += 1;
                        assert!(alphabeta.terminal_evaluations < minimax.terminal_evaluations);
                    }
                }
            }
        }
        assert!(pruned_runs > 0);
        Ok(())
    }

    #[test]
    pub fn repeated_runs_are_identical() -> Result<()> {
        let config = Config::sample_position().validate()?;
        for &engine in [Engine::Minimax, Engine::AlphaBeta].iter() {
            let mut solver = Solver::new(&config);
            let first = solver.solve(engine);
            let second = solver.solve(engine);
            let fresh = Solver::new(&config).solve(engine);
            assert_eq!(first, second);
            assert_eq!(first, fresh);
            assert_eq!(solver.telemetry().terminal_evaluations(), first.terminal_evaluations);
        }
        Ok(())
    }

    #[test]
    pub fn tracing_does_not_change_results() -> Result<()> {
        let config = Config::sample_position().validate()?;

        for &engine in [Engine::Minimax, Engine::AlphaBeta].iter() {
            let untraced = Solver::new(&config).solve(engine);
            let mut trace = TraceCollector::new();
            let traced = Solver::new(&config)
                .with_trace_sink(&mut trace)
                .solve(engine);

            assert_eq!(traced, untraced);
            assert_eq!(trace.leaves().count() as u64, traced.terminal_evaluations);
            assert_eq!(trace.pruned().count() as u64, traced.prune_events);
            assert!(trace.nodes().iter().all(|n| n.value.is_some()));
        }
        Ok(())
    }

    #[test]
    pub fn trace_reconstructs_the_tree() -> Result<()> {
        let config = Config::default().validate()?;
        let mut trace = TraceCollector::new();
        let result = Solver::new(&config)
            .with_trace_sink(&mut trace)
            .solve(Engine::Minimax);

        // 1 + 3 + 9 + 27 nodes on an empty board
        assert_eq!(trace.len(), 40);
        for (i, node) in trace.nodes().iter().enumerate() {
            assert_eq!(node.id, NodeId(i));
            if let Some(parent) = node.parent {
                assert!(parent < node.id);
                assert_eq!(trace.get(parent).map(|p| p.depth + 1), Some(node.depth));
            }
        }

        let root = trace.root().ok_or_else(|| anyhow!("empty trace"))?.id;
        assert_eq!(trace.label(root), "Root");
        assert_eq!(trace.get(root).and_then(|r| r.value), Some(result.value));
        assert_eq!(trace.get(root).and_then(|r| r.best_move), result.best_move);

        let chosen: Vec<_> = trace.children(root).filter(|c| c.chosen).collect();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].column, result.best_move);

        let deepest = trace.nodes().last().ok_or_else(|| anyhow!("empty trace"))?.id;
        assert_eq!(trace.path(deepest), vec![2, 2, 2]);
        assert_eq!(trace.label(deepest), "2-2-2");
        Ok(())
    }

    #[test]
    pub fn collector_keeps_only_the_latest_run() -> Result<()> {
        let config = Config::default().validate()?;
        let mut trace = TraceCollector::new();
        Solver::new(&config)
            .with_trace_sink(&mut trace)
            .solve(Engine::Minimax);
        let result = Solver::new(&config)
            .with_trace_sink(&mut trace)
            .solve(Engine::AlphaBeta);

        assert_eq!(trace.leaves().count() as u64, result.terminal_evaluations);
        assert!(trace.nodes().iter().all(|n| n.entry_window.is_some()));
        Ok(())
    }

    #[test]
    pub fn trace_records_exit_windows_and_best_moves() -> Result<()> {
        let config = Config::default().validate()?;
        let mut trace = TraceCollector::new();
        let result = Solver::new(&config)
            .with_trace_sink(&mut trace)
            .solve(Engine::AlphaBeta);

        let root = trace.root().ok_or_else(|| anyhow!("empty trace"))?;
        assert_eq!(root.best_move, result.best_move);
        assert_eq!(root.entry_window, Some(Window::open()));
        assert_eq!(
            root.exit_window,
            Some(Window {
                alpha: 0,
                beta: Window::INFINITY
            })
        );
        for node in trace.nodes() {
            assert!(node.exit_window.is_some());
            assert_eq!(node.is_leaf(), node.best_move.is_none());
        }

        // the second Min reply is cut after one grandchild
        let second = trace
            .children(root.id)
            .find(|c| c.column == Some(1))
            .ok_or_else(|| anyhow!("column 1 not searched"))?;
        assert!(second.pruned);
        assert_eq!(second.best_move, Some(0));
        assert!(second.exit_window.map_or(false, |w| w.is_closed()));

        Solver::new(&config)
            .with_trace_sink(&mut trace)
            .solve(Engine::Minimax);
        assert!(trace.nodes().iter().all(|n| n.exit_window.is_none()));
        Ok(())
    }

    #[test]
    pub fn unbounded_depth_limit_stops_at_the_board() -> Result<()> {
        let config = config_with(&["...", "..."], &[0, 1, 2], 1)?;
        let root = config.initial_state().play(0, config.allowed_columns())?;
        assert_eq!(root.ply, 1);

        let mut solver = Solver::new(&config);
        let minimax = solver.solve_from(Engine::Minimax, &root, usize::MAX);
        let alphabeta = solver.solve_from(Engine::AlphaBeta, &root, usize::MAX);

        // no line of four fits, so every leaf is a full board
        assert_eq!(minimax.decision(), (0, Some(0)));
        assert_eq!(minimax.decision(), alphabeta.decision());
        assert_eq!(minimax.terminal_evaluations, 30);
        Ok(())
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    pub fn theoretical_leaves_saturate_for_huge_depths() -> Result<()> {
        let config = config_with(&[".."], &[0, 1], 1 << 32)?;
        let comparison = Solver::new(&config).compare();

        assert!(comparison.agree());
        assert_eq!(comparison.minimax.terminal_evaluations, 2);
        assert_eq!(comparison.theoretical_leaves, u64::MAX);

        let shallow = Solver::new(&Config::default().validate()?).compare();
        assert_eq!(shallow.theoretical_leaves, 27);
        Ok(())
    }

    #[test]
    pub fn config_parses_toml() -> Result<()> {
        let config = Config::from_toml_str(
            r#"
            rows = 4
            columns = 5
            allowed_columns = [3, 1, 1]
            max_depth = 2
            starting_player = "min"
            initial_board = [
                ".....",
                ".....",
                ".X...",
                ".O.X.",
            ]
            "#,
        )?;
        let search = config.validate()?;

        assert_eq!(search.allowed_columns().as_slice(), &[1, 3]);
        assert_eq!(search.max_depth(), 2);
        assert_eq!(search.starting_player(), Player::Min);
        assert_eq!(search.board().height(1), 2);
        assert_eq!(search.initial_state().ply, 0);

        let defaults = Config::from_toml_str("")?;
        assert_eq!(defaults, Config::default());
        Ok(())
    }

    #[test]
    pub fn config_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml_str("depth = 3"),
            Err(ConfigurationError::Parse(_))
        ));
    }

    #[test]
    pub fn config_rejects_bad_values() {
        let base = Config::default();
        let board = |rows: &[&str]| Config {
            initial_board: Some(rows.iter().map(|r| r.to_string()).collect()),
            ..Config::default()
        };

        let zero_depth = Config {
            max_depth: 0,
            ..base.clone()
        };
        assert!(matches!(
            zero_depth.validate(),
            Err(ConfigurationError::NonPositiveDepth)
        ));

        let zero_rows = Config {
            rows: 0,
            ..base.clone()
        };
        assert!(matches!(
            zero_rows.validate(),
            Err(ConfigurationError::NonPositiveDimension { rows: 0, .. })
        ));

        let no_columns = Config {
            allowed_columns: vec![],
            ..base.clone()
        };
        assert!(matches!(
            no_columns.validate(),
            Err(ConfigurationError::NoAllowedColumns)
        ));

        let wide = Config {
            allowed_columns: vec![0, 7],
            ..base
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigurationError::ColumnOutOfRange { column: 7, .. })
        ));

        assert!(matches!(
            board(&["......."]).validate(),
            Err(ConfigurationError::RowCount {
                expected: 6,
                found: 1
            })
        ));
        assert!(matches!(
            board(&[".......", ".......", ".......", ".......", ".......", "XO"]).validate(),
            Err(ConfigurationError::RowLength { row: 5, .. })
        ));
        assert!(matches!(
            board(&[".......", ".......", ".......", ".......", ".......", "X?....."]).validate(),
            Err(ConfigurationError::UnknownCell { symbol: '?', .. })
        ));
        assert!(matches!(
            board(&[".......", ".......", ".......", "..X....", ".......", "..O...."]).validate(),
            Err(ConfigurationError::FloatingPiece {
                column: 2,
                height: 2
            })
        ));
        assert!(matches!(
            board(&[".......", ".......", ".......", ".......", "X......", "X.X...."]).validate(),
            Err(ConfigurationError::UnreachableMarkCounts { max: 3, min: 0 })
        ));
    }

    #[test]
    pub fn board_display_is_top_row_first() -> Result<()> {
        let board = Board::from_rows(2, 3, &["X . .", "O X ."])?;
        assert_eq!(board.to_string(), "X . .\nO X .\n");
        Ok(())
    }

    #[test]
    pub fn error_messages() {
        assert_eq!(
            InvalidMoveError::ColumnFull { column: 1 }.to_string(),
            "Invalid move, column 1 full"
        );
        assert_eq!(
            ConfigurationError::NonPositiveDepth.to_string(),
            "max_depth must be positive"
        );
    }
}
