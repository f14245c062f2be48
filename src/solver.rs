//! The two search engines
//!
//! Both engines enumerate moves in ascending column order and only replace
//! their best move on a strict improvement, so among equally valued moves the
//! lowest column always wins. Alpha-Beta walks the same tree but stops at a
//! node as soon as its window closes.

use log::debug;

use std::convert::TryFrom;
use std::fmt;

use crate::board::Player;
use crate::config::SearchConfig;
use crate::evaluate;
use crate::state::GameState;
use crate::telemetry::Telemetry;
use crate::trace::{NodeId, TraceEvent, TraceSink, Window};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Engine {
    Minimax,
    AlphaBeta,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Minimax => write!(f, "Minimax"),
            Engine::AlphaBeta => write!(f, "Alpha-Beta"),
        }
    }
}

/// The outcome of one top-level search
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SearchResult {
    /// `None` when the root itself was a leaf
    pub best_move: Option<usize>,
    pub value: i32,
    pub terminal_evaluations: u64,
    pub prune_events: u64,
}

impl SearchResult {
    /// The part of the result both engines must agree on
    pub fn decision(&self) -> (i32, Option<usize>) {
        (self.value, self.best_move)
    }
}

/// Both engines run over the same root
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Comparison {
    pub minimax: SearchResult,
    pub alphabeta: SearchResult,
    /// allowed columns raised to the depth limit, saturating
    pub theoretical_leaves: u64,
}

impl Comparison {
    /// Pairs two results obtained from the same configured root
    pub fn new(minimax: SearchResult, alphabeta: SearchResult, config: &SearchConfig) -> Self {
        let branching = config.allowed_columns().len() as u64;
        let theoretical_leaves = u32::try_from(config.max_depth())
            .ok()
            .and_then(|depth| branching.checked_pow(depth))
            .unwrap_or(u64::MAX);
        Self {
            minimax,
            alphabeta,
            theoretical_leaves,
        }
    }

    pub fn agree(&self) -> bool {
        self.minimax.decision() == self.alphabeta.decision()
    }
}

// where a node hangs in the tree, only needed for tracing
#[derive(Copy, Clone)]
struct Origin {
    parent: Option<NodeId>,
    column: Option<usize>,
}

impl Origin {
    const ROOT: Origin = Origin {
        parent: None,
        column: None,
    };
}

/// Runs either engine against a validated configuration
///
/// Each call to [`Solver::solve`] or [`Solver::solve_from`] starts from
/// fresh counters, so repeated runs over the same input report identical
/// results.
pub struct Solver<'a> {
    config: &'a SearchConfig,
    telemetry: Telemetry,
    sink: Option<&'a mut dyn TraceSink>,
    next_id: usize,
}

impl<'a> Solver<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self {
            config,
            telemetry: Telemetry::new(),
            sink: None,
            next_id: 0,
        }
    }

    /// Reports every visited node to `sink`
    pub fn with_trace_sink(mut self, sink: &'a mut dyn TraceSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Counters of the most recent run
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Searches the configured initial state to the configured depth
    pub fn solve(&mut self, engine: Engine) -> SearchResult {
        let root = self.config.initial_state();
        self.solve_from(engine, &root, self.config.max_depth())
    }

    /// Searches from an arbitrary root with an explicit depth limit
    ///
    /// A limit of 0 scores the root directly and reports no move.
    pub fn solve_from(
        &mut self,
        engine: Engine,
        root: &GameState,
        depth_limit: usize,
    ) -> SearchResult {
        self.telemetry = Telemetry::new();
        self.next_id = 0;
        debug!(
            "{} search: {} to move, depth limit {}",
            engine, root.to_move, depth_limit
        );

        let limit = root.ply.saturating_add(depth_limit);
        let (value, best_move) = match engine {
            Engine::Minimax => self.minimax(root, limit, Origin::ROOT),
            Engine::AlphaBeta => self.alphabeta(root, limit, Window::open(), Origin::ROOT),
        };

        let result = SearchResult {
            best_move,
            value,
            terminal_evaluations: self.telemetry.terminal_evaluations(),
            prune_events: self.telemetry.prune_events(),
        };
        debug!(
            "{} search finished: value {}, move {:?}, {} terminal evaluations, {} prunes",
            engine, result.value, result.best_move, result.terminal_evaluations, result.prune_events
        );
        result
    }

    /// Runs Minimax then Alpha-Beta over the configured root
    pub fn compare(&mut self) -> Comparison {
        let minimax = self.solve(Engine::Minimax);
        let alphabeta = self.solve(Engine::AlphaBeta);
        Comparison::new(minimax, alphabeta, self.config)
    }

    /// Exhaustive search, `depth_limit` is an absolute ply
    fn minimax(
        &mut self,
        state: &GameState,
        depth_limit: usize,
        origin: Origin,
    ) -> (i32, Option<usize>) {
        let id = self.enter(state, origin, None);
        if let Some(value) = self.leaf(id, state, depth_limit, None) {
            return (value, None);
        }

        let config = self.config;
        let mut best = (worst_value(state.to_move), None);
        for column in state.board.legal_moves(config.allowed_columns()) {
            let child = state.child(column);
            let (value, _) = self.minimax(
                &child,
                depth_limit,
                Origin {
                    parent: id,
                    column: Some(column),
                },
            );
            if improves(state.to_move, value, best.0) {
                best = (value, Some(column));
            }
        }

        self.exit(id, best, false, None);
        best
    }

    /// Minimax with a `[alpha, beta]` window; returns as soon as it closes
    fn alphabeta(
        &mut self,
        state: &GameState,
        depth_limit: usize,
        mut window: Window,
        origin: Origin,
    ) -> (i32, Option<usize>) {
        let id = self.enter(state, origin, Some(window));
        if let Some(value) = self.leaf(id, state, depth_limit, Some(window)) {
            return (value, None);
        }

        let config = self.config;
        let moves = state.board.legal_moves(config.allowed_columns());
        let mut best = (worst_value(state.to_move), None);
        let mut pruned = false;
        for (i, &column) in moves.iter().enumerate() {
            let child = state.child(column);
            let (value, _) = self.alphabeta(
                &child,
                depth_limit,
                window,
                Origin {
                    parent: id,
                    column: Some(column),
                },
            );
            if improves(state.to_move, value, best.0) {
                best = (value, Some(column));
            }
            match state.to_move {
                Player::Max => window.alpha = window.alpha.max(value),
                Player::Min => window.beta = window.beta.min(value),
            }
            if window.is_closed() {
                // a cut on the last child skips nothing
                if i + 1 < moves.len() {
                    self.telemetry.record_prune();
                    pruned = true;
                }
                break;
            }
        }

        self.exit(id, best, pruned, Some(window));
        best
    }

    /// Scores `state` if it is a base case: decided, blocked or at the limit
    fn leaf(
        &mut self,
        id: Option<NodeId>,
        state: &GameState,
        depth_limit: usize,
        window: Option<Window>,
    ) -> Option<i32> {
        let outcome = evaluate::outcome(state, self.config.allowed_columns());
        if !outcome.is_terminal() && state.ply < depth_limit {
            return None;
        }

        self.telemetry.record_terminal();
        let value = outcome.value();
        if let (Some(id), Some(sink)) = (id, self.sink.as_deref_mut()) {
            sink.record(TraceEvent::Exit {
                id,
                value,
                best_move: None,
                outcome: Some(outcome),
                pruned: false,
                window,
            });
        }
        Some(value)
    }

    fn enter(
        &mut self,
        state: &GameState,
        origin: Origin,
        window: Option<Window>,
    ) -> Option<NodeId> {
        let sink = self.sink.as_deref_mut()?;
        let id = NodeId(self.next_id);
        self.next_id += 1;
        sink.record(TraceEvent::Enter {
            id,
            parent: origin.parent,
            column: origin.column,
            state,
            window,
        });
        Some(id)
    }

    fn exit(
        &mut self,
        id: Option<NodeId>,
        (value, best_move): (i32, Option<usize>),
        pruned: bool,
        window: Option<Window>,
    ) {
        if let (Some(id), Some(sink)) = (id, self.sink.as_deref_mut()) {
            sink.record(TraceEvent::Exit {
                id,
                value,
                best_move,
                outcome: None,
                pruned,
                window,
            });
        }
    }
}

// the starting point any real child value improves on
fn worst_value(player: Player) -> i32 {
    match player {
        Player::Max => Window::NEG_INFINITY,
        Player::Min => Window::INFINITY,
    }
}

fn improves(player: Player, value: i32, best: i32) -> bool {
    match player {
        Player::Max => value > best,
        Player::Min => value < best,
    }
}
