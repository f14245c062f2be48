use std::path::PathBuf;

/// Errors raised when a move cannot be applied to a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMoveError {
    #[error("Invalid move, column {column} is not open for play")]
    ColumnNotAllowed { column: usize },

    #[error("Invalid move, column {column} full")]
    ColumnFull { column: usize },

    #[error("Invalid move, column {column} out of range. Columns must be below {columns}")]
    OutOfBounds { column: usize, columns: usize },
}

/// Errors raised while building a search configuration, before any search runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("board dimensions must be positive, got {rows}x{columns}")]
    NonPositiveDimension { rows: usize, columns: usize },

    #[error("max_depth must be positive")]
    NonPositiveDepth,

    #[error("at least one column must be open for play")]
    NoAllowedColumns,

    #[error("allowed column {column} is outside a board of {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("initial board has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },

    #[error("initial board row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("could not parse '{symbol}' as a cell in initial board row {row}")]
    UnknownCell { row: usize, symbol: char },

    #[error("floating piece in column {column}: cell at height {height} has a gap below it")]
    FloatingPiece { column: usize, height: usize },

    #[error("mark counts cannot arise from alternating play: {max} X against {min} O")]
    UnreachableMarkCounts { max: usize, min: usize },

    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
