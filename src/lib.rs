//! Exhaustive adversarial search for a column-restricted 'Connect 4'
//!
//! Two engines are provided: plain Minimax and Alpha-Beta. Both walk the
//! game tree in the same order and always agree on the chosen move and its
//! value; Alpha-Beta just gets there with fewer terminal evaluations.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{config::Config, solver::{Engine, Solver}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let config = Config::default().validate()?;
//! let result = Solver::new(&config).solve(Engine::AlphaBeta);
//!
//! assert_eq!((result.value, result.best_move), (0, Some(0)));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod state;

pub mod evaluate;

pub mod telemetry;

pub mod trace;

pub mod solver;

pub mod config;

mod test;

pub use board::{AllowedColumns, Board, Cell, Player};
pub use config::{Config, SearchConfig};
pub use error::{ConfigurationError, InvalidMoveError};
pub use solver::{Comparison, Engine, SearchResult, Solver};
pub use state::GameState;
pub use trace::{SearchNode, TraceCollector, TraceEvent, TraceSink};

/// The number of aligned marks needed to win
pub const WIN_LENGTH: usize = 4;

/// The default width of the game board in tiles
pub const DEFAULT_COLUMNS: usize = 7;

/// The default height of the game board in tiles
pub const DEFAULT_ROWS: usize = 6;

/// The number of leftmost columns open for play by default
pub const DEFAULT_ALLOWED_COLUMNS: usize = 3;

/// The default search depth in plies
pub const DEFAULT_MAX_DEPTH: usize = 3;

// the default board must be able to hold a win in every direction
const_assert!(DEFAULT_ROWS >= WIN_LENGTH);
const_assert!(DEFAULT_COLUMNS >= WIN_LENGTH);
const_assert!(DEFAULT_ALLOWED_COLUMNS > 0 && DEFAULT_ALLOWED_COLUMNS <= DEFAULT_COLUMNS);
