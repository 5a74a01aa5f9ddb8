//! Rules-engine capability and its shakmaty adapter.
//!
//! The session only talks to [`BoardState`]; [`ChessBoard`] is the one place
//! that knows about shakmaty.

use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, Color as SColor, File, Position, Rank, Role};
use tracing::{debug, instrument};

use crate::domain::chess::{Move, Piece, PieceKind, Side, Square};
use crate::error::RulesError;

/// Position description handed to the search engine: an optional starting
/// FEN (start position when `None`) plus the moves played since.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    pub start_fen: Option<String>,
    pub moves: Vec<Move>,
}

/// What the session needs from a rules engine.
pub trait BoardState: Clone + fmt::Debug {
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// Destination squares of all legal moves starting at `from`
    fn legal_destinations(&self, from: Square) -> Vec<Square>;

    fn side_to_move(&self) -> Side;

    /// Play `mv`. Fails if the move is not legal in this position.
    fn apply_move(&self, mv: &Move) -> Result<Self, RulesError>;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_insufficient_material(&self) -> bool {
        false
    }

    /// 75 moves by each side without a capture or pawn move
    fn is_seventyfive_moves(&self) -> bool {
        false
    }

    /// Human-readable text for `mv`, computed before it is played
    fn describe_move(&self, mv: &Move) -> String {
        mv.to_string()
    }

    fn position_record(&self) -> PositionRecord;
}

/// Standard chess via shakmaty.
#[derive(Clone, Debug)]
pub struct ChessBoard {
    position: Chess,
    start_fen: Option<String>,
    played: Vec<Move>,
}

impl ChessBoard {
    /// The standard starting position
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            start_fen: None,
            played: Vec::new(),
        }
    }

    #[instrument]
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|e| RulesError::new(format!("invalid FEN '{}': {}", fen, e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| RulesError::new(format!("illegal position '{}'", fen)))?;
        debug!("Board loaded from FEN");
        Ok(Self {
            position,
            start_fen: Some(fen.to_string()),
            played: Vec::new(),
        })
    }

    /// Find the shakmaty move matching `mv`, treating a king move to the
    /// g/c file as castling.
    fn find_legal(&self, mv: &Move) -> Option<shakmaty::Move> {
        let from = to_shakmaty_square(mv.from);
        let to = to_shakmaty_square(mv.to);
        let promotion = mv.promotion.map(to_role);
        self.position
            .legal_moves()
            .into_iter()
            .find(|m| endpoints(m) == Some((from, to)) && m.promotion() == promotion)
    }
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState for ChessBoard {
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_shakmaty_square(square))
            .map(shakmaty_to_piece)
    }

    fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let from = to_shakmaty_square(from);
        let mut destinations: Vec<Square> = self
            .position
            .legal_moves()
            .iter()
            .filter_map(endpoints)
            .filter(|(f, _)| *f == from)
            .map(|(_, to)| from_shakmaty_square(to))
            .collect();
        // promotions produce one move per piece kind
        destinations.sort();
        destinations.dedup();
        destinations
    }

    fn side_to_move(&self) -> Side {
        from_color(self.position.turn())
    }

    fn apply_move(&self, mv: &Move) -> Result<Self, RulesError> {
        let m = self
            .find_legal(mv)
            .ok_or_else(|| RulesError::new(format!("illegal move {}", mv)))?;
        let position = self
            .position
            .clone()
            .play(m)
            .map_err(|_| RulesError::new(format!("rules engine rejected {}", mv)))?;
        let mut played = self.played.clone();
        played.push(*mv);
        Ok(Self {
            position,
            start_fen: self.start_fen.clone(),
            played,
        })
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_seventyfive_moves(&self) -> bool {
        self.position.halfmoves() >= 150
    }

    fn describe_move(&self, mv: &Move) -> String {
        match self.find_legal(mv) {
            Some(m) => San::from_move(&self.position, m).to_string(),
            None => mv.to_string(),
        }
    }

    fn position_record(&self) -> PositionRecord {
        PositionRecord {
            start_fen: self.start_fen.clone(),
            moves: self.played.clone(),
        }
    }
}

/// From/to squares as the user sees them. Castling is the king moving two
/// files (g1/g8 or c1/c8), not king-takes-rook.
fn endpoints(m: &shakmaty::Move) -> Option<(shakmaty::Square, shakmaty::Square)> {
    match m {
        shakmaty::Move::Normal { from, to, .. } => Some((*from, *to)),
        shakmaty::Move::EnPassant { from, to, .. } => Some((*from, *to)),
        shakmaty::Move::Castle { king, rook, .. } => {
            let king_dest = if rook.file() == File::H {
                shakmaty::Square::from_coords(File::G, rook.rank())
            } else {
                shakmaty::Square::from_coords(File::C, rook.rank())
            };
            Some((*king, king_dest))
        }
        shakmaty::Move::Put { .. } => None,
    }
}

fn to_shakmaty_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(u32::from(square.file())),
        Rank::new(u32::from(square.rank())),
    )
}

fn from_shakmaty_square(square: shakmaty::Square) -> Square {
    let index = square as u8;
    Square::new(index % 8, index / 8).unwrap_or_else(|| unreachable!("square index {}", index))
}

fn to_role(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

fn from_color(color: SColor) -> Side {
    match color {
        SColor::White => Side::White,
        SColor::Black => Side::Black,
    }
}

/// Convert shakmaty piece to our domain Piece
fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    };
    Piece::new(from_color(piece.color), kind)
}
