//! Exact scoring of leaf states
//!
//! Only decided outcomes carry a value. There is no heuristic for open
//! positions, which is what lets both engines agree move for move.

use crate::board::{AllowedColumns, Player};
use crate::state::GameState;

/// Score of a position won by Max; a Min win is its negation
pub const WIN_VALUE: i32 = 1;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Outcome {
    MaxWin,
    MinWin,
    /// no allowed column has room left
    Blocked,
    /// nobody has won and play could continue
    Open,
}

impl Outcome {
    pub fn value(&self) -> i32 {
        match self {
            Outcome::MaxWin => Player::Max.value() * WIN_VALUE,
            Outcome::MinWin => Player::Min.value() * WIN_VALUE,
            Outcome::Blocked | Outcome::Open => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Open)
    }
}

/// Classifies a state. Max is checked first if both sides own a line.
pub fn outcome(state: &GameState, allowed: &AllowedColumns) -> Outcome {
    if state.board.is_win(Player::Max) {
        Outcome::MaxWin
    } else if state.board.is_win(Player::Min) {
        Outcome::MinWin
    } else if state.board.legal_moves(allowed).is_empty() {
        Outcome::Blocked
    } else {
        Outcome::Open
    }
}

/// +1 if Max has won, -1 if Min has won, otherwise 0
///
/// Depth cutoffs and blocked boards both score 0.
pub fn evaluate(state: &GameState, allowed: &AllowedColumns) -> i32 {
    outcome(state, allowed).value()
}
