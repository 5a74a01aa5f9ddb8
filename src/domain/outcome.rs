//! Terminal position classification.

use std::fmt;

use crate::domain::chess::Side;
use crate::domain::move_log::Actor;
use crate::domain::rules::BoardState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    InProgress,
    Win(Side),
    Draw,
}

impl Outcome {
    /// Classify `board`. Checkmate is tested first, so a mate delivered on
    /// the 150th quiet half-move still counts as a win.
    pub fn detect<B: BoardState>(board: &B) -> Self {
        if board.is_checkmate() {
            // the side to move is the one that got mated
            Outcome::Win(board.side_to_move().opposite())
        } else if board.is_stalemate()
            || board.is_insufficient_material()
            || board.is_seventyfive_moves()
        {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }

    /// Who won, from the point of view of a human playing `human`
    pub fn winner(self, human: Side) -> Option<Actor> {
        match self {
            Outcome::Win(side) if side == human => Some(Actor::Human),
            Outcome::Win(_) => Some(Actor::Opponent),
            _ => None,
        }
    }

    /// Banner text shown when the game ends
    pub fn banner(self, human: Side) -> Option<String> {
        match (self, self.winner(human)) {
            (Outcome::InProgress, _) => None,
            (_, Some(actor)) => Some(format!("{} Wins!", actor)),
            (_, None) => Some("No one Wins! (Draw)".to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => f.write_str("in progress"),
            Outcome::Win(side) => write!(f, "{} wins", side),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}
