//! UCI (Universal Chess Interface) wire format.
//!
//! Only builds command lines and classifies output lines; the engine
//! process itself lives in `models::engine`.

use std::fmt;

use crate::domain::chess::Move;
use crate::domain::rules::PositionRecord;

/// How long the engine may think about one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    Depth(u32),
    MoveTimeMs(u64),
}

/// Lines the session sends to the engine
#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    SetOption { name: String, value: String },
    /// Start position (or `fen`) followed by the moves played since
    Position { fen: Option<String>, moves: Vec<String> },
    Go(SearchLimit),
    Quit,
}

impl UciCommand {
    pub fn position(record: &PositionRecord) -> Self {
        UciCommand::Position {
            fen: record.start_fen.clone(),
            moves: record.moves.iter().map(Move::to_string).collect(),
        }
    }
}

impl fmt::Display for UciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciCommand::Uci => f.write_str("uci"),
            UciCommand::IsReady => f.write_str("isready"),
            UciCommand::UciNewGame => f.write_str("ucinewgame"),
            UciCommand::SetOption { name, value } => {
                write!(f, "setoption name {} value {}", name, value)
            }
            UciCommand::Position { fen, moves } => {
                match fen {
                    Some(fen) => write!(f, "position fen {}", fen)?,
                    None => f.write_str("position startpos")?,
                }
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            }
            UciCommand::Go(SearchLimit::Depth(depth)) => write!(f, "go depth {}", depth),
            UciCommand::Go(SearchLimit::MoveTimeMs(ms)) => write!(f, "go movetime {}", ms),
            UciCommand::Quit => f.write_str("quit"),
        }
    }
}

/// One engine output line, keyed by its first word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOutputKind {
    UciOk,
    ReadyOk,
    /// `id` payload, e.g. `name Stockfish 16`
    Id(String),
    Info(String),
    /// `bestmove` payload; empty when the engine sent a bare `bestmove`
    BestMove(String),
    Other(String),
}

impl UciOutputKind {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim_start().to_string();
        match keyword {
            "uciok" => UciOutputKind::UciOk,
            "readyok" => UciOutputKind::ReadyOk,
            "id" => UciOutputKind::Id(rest),
            "info" => UciOutputKind::Info(rest),
            "bestmove" => UciOutputKind::BestMove(rest),
            _ => UciOutputKind::Other(line.to_string()),
        }
    }
}

/// The move token of a `bestmove` payload (`e2e4 ponder e7e5` -> `e2e4`).
/// `(none)` and the null move `0000` mean the engine has nothing to play.
pub fn best_move_token(payload: &str) -> Option<&str> {
    payload
        .split_whitespace()
        .next()
        .filter(|token| *token != "(none)" && *token != "0000")
}
