//! Click-to-move selection state machine.
//!
//! First click arms a square holding one of the human's pieces, second click
//! either commits a legal move or silently clears the selection.

use tracing::debug;

use crate::domain::chess::{Move, PieceKind, Side, Square};
use crate::domain::rules::BoardState;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Selection {
    #[default]
    Idle,
    Armed(Square),
}

impl Selection {
    pub fn square(self) -> Option<Square> {
        match self {
            Selection::Idle => None,
            Selection::Armed(square) => Some(square),
        }
    }

    /// Feed a pointer-down on `clicked`. Returns the next state and, when a
    /// legal destination was clicked, the move to play.
    pub fn on_pointer_down<B: BoardState>(
        self,
        clicked: Square,
        board: &B,
        human: Side,
    ) -> (Selection, Option<Move>) {
        match self {
            Selection::Idle => match board.piece_at(clicked) {
                Some(piece) if piece.side == human => {
                    debug!(square = %clicked, "Armed selection");
                    (Selection::Armed(clicked), None)
                }
                _ => (Selection::Idle, None),
            },
            Selection::Armed(from) => {
                if board.legal_destinations(from).contains(&clicked) {
                    let mv = with_auto_queen(Move::new(from, clicked), board);
                    debug!(%mv, "Move committed");
                    (Selection::Idle, Some(mv))
                } else {
                    debug!(from = %from, to = %clicked, "Selection cleared");
                    (Selection::Idle, None)
                }
            }
        }
    }
}

/// A pawn reaching the last rank always promotes to a queen
fn with_auto_queen<B: BoardState>(mv: Move, board: &B) -> Move {
    let is_pawn = board
        .piece_at(mv.from)
        .is_some_and(|p| p.kind == PieceKind::Pawn);
    if is_pawn && (mv.to.rank() == 0 || mv.to.rank() == 7) {
        mv.with_promotion(PieceKind::Queen)
    } else {
        mv
    }
}
