//! Chess domain layer: value types, rules adapter, and the pure state
//! machines the session is built from.

pub mod chess;
pub mod move_log;
pub mod outcome;
pub mod perspective;
pub mod rules;
pub mod selection;
pub mod uci;

pub use chess::{Move, Piece, PieceKind, Side, Square};
pub use move_log::{Actor, MoveLog, MoveLogEntry};
pub use outcome::Outcome;
pub use rules::{BoardState, ChessBoard, PositionRecord};
pub use selection::Selection;
