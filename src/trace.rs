//! Optional observation of a search as it walks the tree
//!
//! An engine run can be handed a [`TraceSink`]. It receives an event when a
//! node is entered and another when its value is known. Nothing a sink does
//! can reach back into the search, so results are identical with or without
//! one attached.

use std::fmt;

use crate::evaluate::Outcome;
use crate::state::GameState;

/// Identifier of a node within one run, assigned in visiting order
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The alpha-beta search window `[alpha, beta]`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Window {
    pub alpha: i32,
    pub beta: i32,
}

impl Window {
    pub const NEG_INFINITY: i32 = i32::MIN;
    pub const INFINITY: i32 = i32::MAX;

    /// The initial window, (-inf, +inf)
    pub fn open() -> Self {
        Self {
            alpha: Self::NEG_INFINITY,
            beta: Self::INFINITY,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.alpha >= self.beta
    }
}

fn bound(f: &mut fmt::Formatter<'_>, value: i32) -> fmt::Result {
    match value {
        Window::NEG_INFINITY => write!(f, "-inf"),
        Window::INFINITY => write!(f, "+inf"),
        _ => write!(f, "{}", value),
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "α=")?;
        bound(f, self.alpha)?;
        write!(f, ", β=")?;
        bound(f, self.beta)
    }
}

#[derive(Clone, Debug)]
pub enum TraceEvent<'s> {
    /// A node is about to be searched
    Enter {
        id: NodeId,
        parent: Option<NodeId>,
        /// the move that led here from the parent
        column: Option<usize>,
        state: &'s GameState,
        /// window on entry, alpha-beta only
        window: Option<Window>,
    },
    /// A node's value is settled
    Exit {
        id: NodeId,
        value: i32,
        best_move: Option<usize>,
        /// set for base-case nodes
        outcome: Option<Outcome>,
        pruned: bool,
        /// window on exit, alpha-beta only
        window: Option<Window>,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent<'_>);
}

/// One visited node, as reconstructed by a [`TraceCollector`]
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub column: Option<usize>,
    pub state: GameState,
    pub depth: usize,
    /// `None` until the node's subtree has been searched
    pub value: Option<i32>,
    pub best_move: Option<usize>,
    pub outcome: Option<Outcome>,
    /// this node is the move its parent settled on
    pub chosen: bool,
    pub pruned: bool,
    pub entry_window: Option<Window>,
    pub exit_window: Option<Window>,
}

impl SearchNode {
    /// True for nodes scored directly by the evaluator
    pub fn is_leaf(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Collects the full trace of the most recent run
///
/// Nodes are kept in an append-only list indexed by [`NodeId`]; each node
/// points back at its parent by id.
#[derive(Clone, Debug, Default)]
pub struct TraceCollector {
    nodes: Vec<SearchNode>,
}

impl TraceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> Option<&SearchNode> {
        self.nodes.first()
    }

    /// Children of `id` in the order they were searched
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes.iter().filter(move |n| n.parent == Some(id))
    }

    /// The moves played from the root to reach `id`
    pub fn path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            if let Some(column) = node.column {
                path.push(column);
            }
            current = node.parent.and_then(|p| self.get(p));
        }
        path.reverse();
        path
    }

    /// `Root` for the root, otherwise the move path joined by dashes
    pub fn label(&self, id: NodeId) -> String {
        let path = self.path(id);
        if path.is_empty() {
            "Root".to_string()
        } else {
            path.iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("-")
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Nodes whose remaining children were cut off
    pub fn pruned(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes.iter().filter(|n| n.pruned)
    }
}

impl TraceSink for TraceCollector {
    fn record(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Enter {
                id,
                parent,
                column,
                state,
                window,
            } => {
                // a new root starts a new run
                if parent.is_none() {
                    self.nodes.clear();
                }
                debug_assert_eq!(id.0, self.nodes.len(), "node ids must be sequential");
                self.nodes.push(SearchNode {
                    id,
                    parent,
                    column,
                    state: state.clone(),
                    depth: state.ply,
                    value: None,
                    best_move: None,
                    outcome: None,
                    chosen: false,
                    pruned: false,
                    entry_window: window,
                    exit_window: None,
                });
            }
            TraceEvent::Exit {
                id,
                value,
                best_move,
                outcome,
                pruned,
                window,
            } => {
                if let Some(node) = self.nodes.get_mut(id.0) {
                    node.value = Some(value);
                    node.best_move = best_move;
                    node.outcome = outcome;
                    node.pruned = pruned;
                    node.exit_window = window;
                }
                if let Some(column) = best_move {
                    if let Some(child) = self
                        .nodes
                        .iter_mut()
                        .skip(id.0 + 1)
                        .find(|n| n.parent == Some(id) && n.column == Some(column))
                    {
                        child.chosen = true;
                    }
                }
            }
        }
    }
}
