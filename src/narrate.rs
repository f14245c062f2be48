use log::info;

use connect4_search::board::Player;
use connect4_search::trace::{TraceEvent, TraceSink};

/// Logs each step of a search as it happens
#[derive(Default)]
pub struct Narrator {
    // (move path, side to move) per node id
    nodes: Vec<(Vec<usize>, Player)>,
}

impl Narrator {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(&self, id: usize) -> String {
        match self.nodes.get(id) {
            Some((path, _)) if !path.is_empty() => path
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("-"),
            _ => "Root".to_string(),
        }
    }

    fn indent(&self, id: usize) -> String {
        let depth = self.nodes.get(id).map_or(0, |(path, _)| path.len());
        "  ".repeat(depth)
    }
}

impl TraceSink for Narrator {
    fn record(&mut self, event: TraceEvent<'_>) {
        match event {
            TraceEvent::Enter {
                id,
                parent,
                column,
                state,
                window,
            } => {
                if parent.is_none() {
                    self.nodes.clear();
                }
                let mut path = parent
                    .and_then(|p| self.nodes.get(p.0))
                    .map(|(path, _)| path.clone())
                    .unwrap_or_default();
                path.extend(column);
                self.nodes.push((path, state.to_move));

                let indent = self.indent(id.0);
                let label = self.label(id.0);
                info!("{}{}", indent, "=".repeat(50));
                info!("{}Node [{}] - Current board:", indent, label);
                for line in state.board.to_string().lines() {
                    info!("{}  {}", indent, line);
                }
                info!("{}{}", indent, "=".repeat(50));
                if let Some(window) = window {
                    info!("{}{} Node [{}] ({})", indent, state.to_move, label, window);
                }
            }
            TraceEvent::Exit {
                id,
                value,
                best_move,
                outcome,
                pruned,
                window,
            } => {
                let indent = self.indent(id.0);
                let label = self.label(id.0);
                let side = self.nodes.get(id.0).map_or(Player::Max, |(_, p)| *p);
                if outcome.is_some() {
                    info!("{}Terminal [{}], eval = {}", indent, label, value);
                    return;
                }
                if pruned {
                    if let Some(window) = window {
                        info!("{}  Prune at {} Node [{}] ({})", indent, side, label, window);
                    }
                }
                match best_move {
                    Some(column) => info!(
                        "{}{} Node [{}] returns {} via column {}",
                        indent, side, label, value, column
                    ),
                    None => info!("{}{} Node [{}] returns {}", indent, side, label, value),
                }
            }
        }
    }
}

/// Forwards every event to each of its sinks in turn
#[derive(Default)]
pub struct Fanout<'a> {
    sinks: Vec<&'a mut dyn TraceSink>,
}

impl<'a> Fanout<'a> {
    pub fn push(&mut self, sink: &'a mut dyn TraceSink) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TraceSink for Fanout<'_> {
    fn record(&mut self, event: TraceEvent<'_>) {
        for sink in self.sinks.iter_mut() {
            sink.record(event.clone());
        }
    }
}
