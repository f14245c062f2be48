use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};

use std::path::PathBuf;

use connect4_search::*;

mod narrate;
use narrate::*;

mod render;
use render::*;

#[derive(Parser)]
#[command(
    name = "connect4_cli",
    about = "Compare Minimax and Alpha-Beta on a Connect-Four position"
)]
struct Cli {
    /// TOML configuration; the built-in sample position is used if omitted
    config: Option<PathBuf>,

    /// Log every node as the searches visit it
    #[arg(long)]
    narrate: bool,

    /// Print the full search tree of each engine
    #[arg(long)]
    tree: bool,
}

fn run(config: &SearchConfig, engine: Engine, cli: &Cli) -> SearchResult {
    let mut narrator = Narrator::new();
    let mut trace = TraceCollector::new();

    let result = {
        let mut sinks = Fanout::default();
        if cli.narrate {
            sinks.push(&mut narrator);
        }
        if cli.tree {
            sinks.push(&mut trace);
        }

        // narration already shows progress
        let spinner = if cli.narrate {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}"));
            spinner.set_message(&format!("{} is searching...", engine));
            spinner.enable_steady_tick(100);
            spinner
        };
        let result = if sinks.is_empty() {
            Solver::new(config).solve(engine)
        } else {
            Solver::new(config).with_trace_sink(&mut sinks).solve(engine)
        };
        spinner.finish_and_clear();
        result
    };

    if cli.tree {
        let title = match engine {
            Engine::Minimax => "COMPLETE MINIMAX TREE",
            Engine::AlphaBeta => "ALPHA-BETA TREE WITH PRUNING",
        };
        draw_tree(
            &trace,
            config.allowed_columns(),
            &format!("{} (DEPTH {})", title, config.max_depth()),
        );
        terminal_summary(&trace);
        if engine == Engine::AlphaBeta {
            println!("Nodes with pruning: {}", trace.pruned().count());
        }
    }
    result
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("could not load {}", path.display()))?,
        None => Config::sample_position(),
    };
    let config = config.validate().context("invalid configuration")?;
    let depth = config.max_depth();

    banner("CONFIGURATION");
    println!("Maximum depth: {}", depth);
    println!(
        "Board dimensions: {}x{}",
        config.board().rows(),
        config.board().columns()
    );
    println!("Allowed columns: {}", config.allowed_columns());
    println!("Starting player: {}", config.starting_player());

    println!("\nInitial board (X = MAX, O = MIN):\n");
    display_board(config.board())?;

    let mut results = Vec::with_capacity(2);
    for &engine in [Engine::Minimax, Engine::AlphaBeta].iter() {
        println!("\n--- Running {} (depth {}) ---\n", engine, depth);
        let result = run(&config, engine, &cli);
        println!(
            "{} root decision value: {}, move: {}",
            engine,
            result.value,
            show_column(result.best_move)
        );
        results.push(result);
    }
    let comparison = Comparison::new(results[0], results[1], &config);

    banner(&format!("FINAL COMPARISON (DEPTH {})", depth));
    println!(
        "Minimax value: {}, move: {}",
        comparison.minimax.value,
        show_column(comparison.minimax.best_move)
    );
    println!(
        "Alpha-Beta value: {}, move: {}",
        comparison.alphabeta.value,
        show_column(comparison.alphabeta.best_move)
    );
    println!(
        "Minimax terminal states: {}",
        comparison.minimax.terminal_evaluations
    );
    println!(
        "Alpha-Beta terminal states: {}",
        comparison.alphabeta.terminal_evaluations
    );
    println!("Prune events: {}", comparison.alphabeta.prune_events);
    println!("Theoretical terminal nodes: {}", comparison.theoretical_leaves);
    println!("{}", "=".repeat(80));

    if !comparison.agree() {
        bail!(
            "engines disagree: minimax {:?} vs alpha-beta {:?}",
            comparison.minimax.decision(),
            comparison.alphabeta.decision()
        );
    }
    Ok(())
}
