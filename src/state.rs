use crate::board::{AllowedColumns, Board, Player};
use crate::error::InvalidMoveError;

/// A node of the game tree: the board, whose turn it is and how deep we are
///
/// States are never changed in place. Playing a move yields a fresh state
/// one ply deeper with the other player to move.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GameState {
    pub board: Board,
    pub to_move: Player,
    pub ply: usize,
}

impl GameState {
    /// A search root at ply 0
    pub fn new(board: Board, to_move: Player) -> Self {
        Self {
            board,
            to_move,
            ply: 0,
        }
    }

    pub fn play(&self, column: usize, allowed: &AllowedColumns) -> Result<Self, InvalidMoveError> {
        let board = self.board.apply_move(column, self.to_move, allowed)?;
        Ok(self.successor(board))
    }

    // only for columns produced by `legal_moves`
    pub(crate) fn child(&self, column: usize) -> Self {
        self.successor(self.board.with_move(column, self.to_move))
    }

    fn successor(&self, board: Board) -> Self {
        Self {
            board,
            to_move: self.to_move.other(),
            ply: self.ply + 1,
        }
    }
}
