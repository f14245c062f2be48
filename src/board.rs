use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::{ConfigurationError, InvalidMoveError};
use crate::{DEFAULT_ALLOWED_COLUMNS, WIN_LENGTH};

// (row step, column step) for horizontal, vertical and both diagonals
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    MaxMark,
    MinMark,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::MaxMark => 'X',
            Cell::MinMark => 'O',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::MaxMark),
            'O' | 'o' => Some(Cell::MinMark),
            _ => None,
        }
    }
}

/// One of the two sides. Max always scores positive, Min negative.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Max,
    Min,
}

impl Player {
    /// +1 for Max, -1 for Min; doubles as the evaluation sign
    pub fn value(&self) -> i32 {
        match self {
            Player::Max => 1,
            Player::Min => -1,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Player::Max => Player::Min,
            Player::Min => Player::Max,
        }
    }

    pub fn mark(&self) -> Cell {
        match self {
            Player::Max => Cell::MaxMark,
            Player::Min => Cell::MinMark,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::Max
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Max => write!(f, "MAX"),
            Player::Min => write!(f, "MIN"),
        }
    }
}

/// The set of columns that may receive a move, kept in ascending order
///
/// Iteration order is the move enumeration order used by every engine, so
/// among equally valued moves the lowest column is the one reported.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct AllowedColumns(Vec<usize>);

impl AllowedColumns {
    /// Builds the set from any column list, sorting and removing duplicates
    pub fn new<I: IntoIterator<Item = usize>>(
        columns: I,
        board_columns: usize,
    ) -> Result<Self, ConfigurationError> {
        let mut columns: Vec<usize> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();

        if columns.is_empty() {
            return Err(ConfigurationError::NoAllowedColumns);
        }
        if let Some(&column) = columns.iter().find(|&&c| c >= board_columns) {
            return Err(ConfigurationError::ColumnOutOfRange {
                column,
                columns: board_columns,
            });
        }
        Ok(Self(columns))
    }

    /// The leftmost `count` columns
    pub fn first(count: usize) -> Self {
        Self((0..count).collect())
    }

    pub fn contains(&self, column: usize) -> bool {
        self.0.binary_search(&column).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Default for AllowedColumns {
    fn default() -> Self {
        Self::first(DEFAULT_ALLOWED_COLUMNS)
    }
}

impl fmt::Display for AllowedColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A gravity-drop grid of arbitrary size
///
/// A board is never mutated once handed out: every move produces a new
/// board, which keeps each column's marks contiguous from the bottom.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
}

impl Board {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
        }
    }

    /// Parses a board from text rows, top row first
    ///
    /// `.` is empty, `X` a Max mark and `O` a Min mark; whitespace is ignored
    /// so both `"X.O"` and `"X . O"` are accepted.
    pub fn from_rows<S: AsRef<str>>(
        rows: usize,
        columns: usize,
        text: &[S],
    ) -> Result<Self, ConfigurationError> {
        if text.len() != rows {
            return Err(ConfigurationError::RowCount {
                expected: rows,
                found: text.len(),
            });
        }

        let mut board = Self::new(rows, columns);
        for (row_from_top, line) in text.iter().enumerate() {
            let cells = line
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|symbol| {
                    Cell::from_symbol(symbol).ok_or_else(|| ConfigurationError::UnknownCell {
                        row: row_from_top,
                        symbol,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if cells.len() != columns {
                return Err(ConfigurationError::RowLength {
                    row: row_from_top,
                    expected: columns,
                    found: cells.len(),
                });
            }
            let row = rows - 1 - row_from_top;
            for (column, cell) in cells.into_iter().enumerate() {
                board.cells[column + columns * row] = cell;
            }
        }

        // every column must be filled contiguously from the bottom
        for column in 0..columns {
            let height = (0..rows)
                .take_while(|&row| !board.get(row, column).is_empty())
                .count();
            if let Some(floating) = (height..rows).find(|&row| !board.get(row, column).is_empty()) {
                return Err(ConfigurationError::FloatingPiece {
                    column,
                    height: floating,
                });
            }
            board.heights[column] = height;
        }

        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The cell at `row` (0 is the bottom) and `column`
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[column + self.columns * row]
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.columns && self.heights[column] < self.rows
    }

    /// Columns of `allowed` that still have room, in ascending order
    pub fn legal_moves(&self, allowed: &AllowedColumns) -> Vec<usize> {
        allowed.iter().filter(|&c| self.playable(c)).collect()
    }

    /// Drops `player`'s mark into `column`, returning the new board
    pub fn apply_move(
        &self,
        column: usize,
        player: Player,
        allowed: &AllowedColumns,
    ) -> Result<Self, InvalidMoveError> {
        if column >= self.columns {
            return Err(InvalidMoveError::OutOfBounds {
                column,
                columns: self.columns,
            });
        }
        if !allowed.contains(column) {
            return Err(InvalidMoveError::ColumnNotAllowed { column });
        }
        if !self.playable(column) {
            return Err(InvalidMoveError::ColumnFull { column });
        }
        Ok(self.with_move(column, player))
    }

    // callers must have checked `playable`
    pub(crate) fn with_move(&self, column: usize, player: Player) -> Self {
        let mut next = self.clone();
        next.cells[column + self.columns * self.heights[column]] = player.mark();
        next.heights[column] += 1;
        next
    }

    /// True if `player` has `WIN_LENGTH` marks in a line anywhere on the board
    pub fn is_win(&self, player: Player) -> bool {
        let mark = player.mark();
        (0..self.rows).any(|row| {
            (0..self.columns).any(|column| {
                DIRECTIONS
                    .iter()
                    .any(|&(dr, dc)| self.line_from(row, column, dr, dc, mark))
            })
        })
    }

    fn line_from(&self, row: usize, column: usize, dr: isize, dc: isize, mark: Cell) -> bool {
        (0..WIN_LENGTH as isize).all(|i| {
            let r = row as isize + i * dr;
            let c = column as isize + i * dc;
            r >= 0
                && c >= 0
                && (r as usize) < self.rows
                && (c as usize) < self.columns
                && self.get(r as usize, c as usize) == mark
        })
    }

    /// True if either side has won or no allowed column has room left
    pub fn is_terminal(&self, allowed: &AllowedColumns) -> bool {
        self.is_win(Player::Max)
            || self.is_win(Player::Min)
            || self.legal_moves(allowed).is_empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            let line: Vec<String> = (0..self.columns)
                .map(|column| self.get(row, column).symbol().to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
