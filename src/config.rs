use log::debug;
use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::board::{AllowedColumns, Board, Cell, Player};
use crate::error::ConfigurationError;
use crate::state::GameState;
use crate::{DEFAULT_ALLOWED_COLUMNS, DEFAULT_COLUMNS, DEFAULT_MAX_DEPTH, DEFAULT_ROWS};

/// Run configuration as written in a TOML file
///
/// Every key is optional; missing keys fall back to a 6x7 board with the
/// first three columns open, depth 3 and Max moving first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rows: usize,
    pub columns: usize,
    pub allowed_columns: Vec<usize>,
    pub max_depth: usize,
    pub starting_player: Player,
    /// top row first, `.` empty, `X` Max, `O` Min
    pub initial_board: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            allowed_columns: (0..DEFAULT_ALLOWED_COLUMNS).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            starting_player: Player::Max,
            initial_board: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigurationError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(content)?)
    }

    /// The partially filled demonstration position: columns 0-2 hold three
    /// marks each, with a few Min marks scattered outside the play area
    pub fn sample_position() -> Self {
        let rows = [
            ".......",
            ".......",
            ".......",
            "XXX....",
            "XOX...O",
            "OXXO.OO",
        ];
        Config {
            initial_board: Some(rows.iter().map(|r| r.to_string()).collect()),
            ..Config::default()
        }
    }

    /// Checks every option and freezes the result for the search
    pub fn validate(&self) -> Result<SearchConfig, ConfigurationError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigurationError::NonPositiveDimension {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigurationError::NonPositiveDepth);
        }

        let allowed = AllowedColumns::new(self.allowed_columns.iter().copied(), self.columns)?;
        let board = match &self.initial_board {
            Some(rows) => Board::from_rows(self.rows, self.columns, rows)?,
            None => Board::new(self.rows, self.columns),
        };

        // alternating play never puts one side more than a mark ahead
        let max = board.count(Cell::MaxMark);
        let min = board.count(Cell::MinMark);
        if (max as isize - min as isize).abs() > 1 {
            return Err(ConfigurationError::UnreachableMarkCounts { max, min });
        }

        Ok(SearchConfig {
            board,
            allowed,
            max_depth: self.max_depth,
            starting_player: self.starting_player,
        })
    }
}

/// A validated configuration, fixed for the lifetime of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    board: Board,
    allowed: AllowedColumns,
    max_depth: usize,
    starting_player: Player,
}

impl SearchConfig {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn allowed_columns(&self) -> &AllowedColumns {
        &self.allowed
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    /// The search root: the initial board at ply 0
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.board.clone(), self.starting_player)
    }
}
