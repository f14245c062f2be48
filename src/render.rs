use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::collections::BTreeMap;
use std::io::{stdout, Write};

use connect4_search::board::{AllowedColumns, Board, Cell, Player};
use connect4_search::evaluate::Outcome;
use connect4_search::trace::{SearchNode, TraceCollector};

const RULE: usize = 80;

/// Draws the board in colour, top row first, with column numbers above
pub fn display_board(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (0..board.columns()).map(|x| format!("{} ", x % 10)).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in (0..board.rows()).rev() {
        for column in 0..board.columns() {
            let cell = board.get(row, column);
            stdout.queue(PrintStyledContent(
                style(cell.symbol())
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match cell {
                        Cell::MaxMark => Color::Red,
                        Cell::MinMark => Color::Yellow,
                        Cell::Empty => Color::Grey,
                    }),
            ))?;
            stdout.queue(PrintStyledContent(style(" ").on(Color::DarkBlue)))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}

pub fn banner(title: &str) {
    println!("\n{}", "=".repeat(RULE));
    println!("{:^width$}", title, width = RULE);
    println!("{}", "=".repeat(RULE));
}

fn kind(node: &SearchNode) -> String {
    if node.is_leaf() {
        "Terminal".to_string()
    } else {
        node.state.to_move.to_string()
    }
}

fn show(value: Option<i32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

pub fn show_column(column: Option<usize>) -> String {
    column.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Prints every node of a trace grouped by depth
pub fn draw_tree(trace: &TraceCollector, allowed: &AllowedColumns, title: &str) {
    banner(title);

    let mut levels: BTreeMap<usize, Vec<&SearchNode>> = BTreeMap::new();
    for node in trace.nodes() {
        levels.entry(node.depth).or_default().push(node);
    }

    for (depth, nodes) in levels {
        let side = nodes
            .first()
            .map_or_else(String::new, |n| n.state.to_move.to_string());
        println!("\nLevel {} ({}):", depth, side);
        println!("{}", "-".repeat(60));

        for node in nodes {
            let label = trace.label(node.id);
            let marker = if node.chosen { " *" } else { "" };
            if node.is_leaf() {
                println!("  Terminal [{}] = {}{}", label, show(node.value), marker);
                continue;
            }

            let children: Vec<&SearchNode> = trace.children(node.id).collect();
            let explored: Vec<usize> = children.iter().filter_map(|c| c.column).collect();
            let values: Vec<String> = children.iter().map(|c| show(c.value)).collect();
            let possible = node.state.board.legal_moves(allowed);

            match node.entry_window {
                Some(window) => {
                    println!(
                        "  {} [{}] ({}) = {}{}",
                        kind(node),
                        label,
                        window,
                        show(node.value),
                        marker
                    );
                    println!("    Possible moves: {:?}", possible);
                    println!("    Explored moves: {:?}", explored);
                    println!("    Children values: [{}]", values.join(", "));
                    if let Some(exit) = node.exit_window {
                        println!("    Final window: ({})", exit);
                    }
                    println!("    Best move: {}", show_column(node.best_move));
                    if node.pruned {
                        println!("    >>> PRUNING PERFORMED <<<");
                    }
                }
                None => {
                    println!("  {} [{}] = {}{}", kind(node), label, show(node.value), marker);
                    println!("    Moves: {:?}", explored);
                    println!("    Children values: [{}]", values.join(", "));
                    println!("    Best move: {}", show_column(node.best_move));
                }
            }
        }
    }
    println!();
}

/// Lists every leaf of a trace grouped by value, best for Max first
pub fn terminal_summary(trace: &TraceCollector) {
    banner("TERMINAL STATES SUMMARY");

    let mut by_value: BTreeMap<i32, Vec<&SearchNode>> = BTreeMap::new();
    for leaf in trace.leaves() {
        by_value.entry(leaf.value.unwrap_or(0)).or_default().push(leaf);
    }
    println!("Total terminal states: {}\n", trace.leaves().count());

    for (value, leaves) in by_value.iter().rev() {
        let interpretation = match value {
            v if *v > 0 => format!("{} wins", Player::Max),
            v if *v < 0 => format!("{} wins", Player::Min),
            _ => "Draw".to_string(),
        };
        println!("Value {} ({}): {} states", value, interpretation, leaves.len());
        for leaf in leaves {
            let reason = match leaf.outcome {
                Some(Outcome::Blocked) => " (no moves left)",
                Some(Outcome::Open) => " (depth cutoff)",
                _ => "",
            };
            println!("  - Path: {}{}", trace.label(leaf.id), reason);
        }
        println!();
    }
}
