//! Turn sequencing between the human and the move source.

use tracing::{debug, info, instrument};

use crate::domain::uci::SearchLimit;
use crate::domain::{Actor, BoardState, Move, MoveLog, Outcome, Side};
use crate::error::{EngineError, SessionError};
use crate::models::engine::MoveSource;

/// Applies half-moves to the board and log and asks the move source for
/// replies. Holds the move source for the lifetime of the session.
pub struct TurnCoordinator<S: MoveSource> {
    source: Option<S>,
    limit: SearchLimit,
    human: Side,
}

impl<S: MoveSource> TurnCoordinator<S> {
    pub fn new(source: S, limit: SearchLimit, human: Side) -> Self {
        Self {
            source: Some(source),
            limit,
            human,
        }
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Called once when play starts: if the opponent moves first it moves now.
    pub fn open_game<B: BoardState>(
        &mut self,
        board: &mut B,
        log: &mut MoveLog,
    ) -> Result<Outcome, SessionError> {
        let outcome = Outcome::detect(board);
        if outcome.is_terminal() || board.side_to_move() == self.human {
            return Ok(outcome);
        }
        self.play_opponent(board, log)
    }

    /// Apply a committed human move, then the opponent's reply unless the
    /// game is over.
    #[instrument(skip(self, board, log))]
    pub fn play_human<B: BoardState>(
        &mut self,
        board: &mut B,
        log: &mut MoveLog,
        mv: Move,
    ) -> Result<Outcome, SessionError> {
        let outcome = apply(board, log, Actor::Human, &mv)?;
        if outcome.is_terminal() {
            info!(%outcome, "Game over after human move");
            return Ok(outcome);
        }
        self.play_opponent(board, log)
    }

    /// Ask the move source for a move and apply it. Blocks until it answers.
    pub fn play_opponent<B: BoardState>(
        &mut self,
        board: &mut B,
        log: &mut MoveLog,
    ) -> Result<Outcome, SessionError> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| EngineError::new("Move source already closed"))?;
        debug!(limit = ?self.limit, "Requesting opponent move");
        let mv = source.best_move(board, self.limit)?;
        let outcome = apply(board, log, Actor::Opponent, &mv)?;
        if outcome.is_terminal() {
            info!(%outcome, "Game over after opponent move");
        }
        Ok(outcome)
    }

    /// Release the move source. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}

impl<S: MoveSource> Drop for TurnCoordinator<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn apply<B: BoardState>(
    board: &mut B,
    log: &mut MoveLog,
    actor: Actor,
    mv: &Move,
) -> Result<Outcome, SessionError> {
    let text = board.describe_move(mv);
    *board = board.apply_move(mv)?;
    let entry = log.append(actor, text);
    debug!(%entry, "Half-move applied");
    Ok(Outcome::detect(board))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::domain::ChessBoard;

    #[derive(Default)]
    struct Scripted {
        replies: VecDeque<&'static str>,
        requests: usize,
    }

    impl MoveSource for Scripted {
        fn best_move<B: BoardState>(
            &mut self,
            _board: &B,
            _limit: SearchLimit,
        ) -> Result<Move, EngineError> {
            self.requests += 1;
            let reply = self
                .replies
                .pop_front()
                .ok_or_else(|| EngineError::new("out of moves"))?;
            reply.parse().map_err(|_| EngineError::new("bad script"))
        }
    }

    fn coordinator(replies: &[&'static str], human: Side) -> TurnCoordinator<Scripted> {
        let source = Scripted {
            replies: replies.iter().copied().collect(),
            requests: 0,
        };
        TurnCoordinator::new(source, SearchLimit::Depth(1), human)
    }

    fn requests(turns: &TurnCoordinator<Scripted>) -> usize {
        turns.source.as_ref().map_or(0, |s| s.requests)
    }

    #[test]
    fn test_human_move_then_reply() {
        let mut turns = coordinator(&["e7e5"], Side::White);
        let mut board = ChessBoard::new();
        let mut log = MoveLog::new(30, 800);
        turns.open_game(&mut board, &mut log).unwrap();
        assert!(log.is_empty());

        let outcome = turns
            .play_human(&mut board, &mut log, "e2e4".parse().unwrap())
            .unwrap();
        assert_eq!(outcome, Outcome::InProgress);
        assert_eq!(requests(&turns), 1);
        let actors: Vec<_> = log.entries().iter().map(|e| e.actor()).collect();
        assert_eq!(actors, vec![Actor::Human, Actor::Opponent]);
        assert_eq!(log.entries()[0].text(), "e4");
        assert_eq!(log.entries()[1].text(), "e5");
        assert_eq!(board.side_to_move(), Side::White);
    }

    #[test]
    fn test_opponent_opens_when_human_is_black() {
        let mut turns = coordinator(&["d2d4"], Side::Black);
        let mut board = ChessBoard::new();
        let mut log = MoveLog::new(30, 800);
        turns.open_game(&mut board, &mut log).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].actor(), Actor::Opponent);
        assert_eq!(board.side_to_move(), Side::Black);
    }

    #[test]
    fn test_no_reply_requested_after_mate() {
        // 1. f3 e5 2. g4 and black mates with Qh4
        let mut turns = coordinator(&[], Side::Black);
        let mut board = ChessBoard::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
        )
        .unwrap();
        let mut log = MoveLog::new(30, 800);
        let outcome = turns
            .play_human(&mut board, &mut log, "d8h4".parse().unwrap())
            .unwrap();
        assert_eq!(outcome, Outcome::Win(Side::Black));
        assert_eq!(requests(&turns), 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_engine_failure_is_fatal() {
        let mut turns = coordinator(&[], Side::White);
        let mut board = ChessBoard::new();
        let mut log = MoveLog::new(30, 800);
        let err = turns
            .play_human(&mut board, &mut log, "e2e4".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, SessionError::Engine(_)));
        // the human move stays applied and logged
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_illegal_engine_move_is_fatal() {
        let mut turns = coordinator(&["e2e4"], Side::White);
        let mut board = ChessBoard::new();
        let mut log = MoveLog::new(30, 800);
        let err = turns
            .play_human(&mut board, &mut log, "d2d4".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, SessionError::Rules(_)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_close_releases_source() {
        let mut turns = coordinator(&["e7e5"], Side::White);
        turns.close();
        assert!(!turns.is_open());
        let mut board = ChessBoard::new();
        let mut log = MoveLog::new(30, 800);
        assert!(turns.play_opponent(&mut board, &mut log).is_err());
    }
}
