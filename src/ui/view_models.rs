//! View models for rendering the board and move log.
//!
//! These types are DTOs that prepare session state for display. They live
//! in the UI layer, not the domain layer.

use crate::domain::{Actor, Piece, Side, Square};
use crate::models::session::Phase;

/// One screen cell of the board
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellView {
    pub col: usize,
    pub row: usize,
    pub square: Square,
    pub piece: Option<Piece>,
    pub light: bool,
    pub selected: bool,
    /// Destination of the selected piece
    pub legal_target: bool,
}

/// A move log line inside the log viewport
#[derive(Clone, Debug, PartialEq)]
pub struct LogLineView {
    /// Top of the line relative to the viewport, in pixels
    pub y: i64,
    pub sequence: usize,
    pub actor: Actor,
    pub text: String,
}

/// Everything a frame needs
#[derive(Clone, Debug, Default)]
pub struct RenderSnapshot {
    pub phase: Phase,
    pub human: Option<Side>,
    /// Row-major, top-left first; empty until a side is chosen
    pub cells: Vec<CellView>,
    pub log_lines: Vec<LogLineView>,
    pub prompt: Option<String>,
    pub banner: Option<String>,
}

impl RenderSnapshot {
    pub fn cell(&self, col: usize, row: usize) -> Option<&CellView> {
        self.cells.get(row * 8 + col).filter(|c| c.col == col && c.row == row)
    }
}
