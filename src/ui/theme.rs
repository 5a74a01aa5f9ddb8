//! Theme colors for the board and move log.

use crossterm::style::Color;

// Board colors
pub const LIGHT_SQUARE: Color = Color::Rgb { r: 0xFF, g: 0xFF, b: 0xFF };
pub const DARK_SQUARE: Color = Color::Rgb { r: 0x9A, g: 0xCD, b: 0x32 };
pub const SELECTED_SQUARE: Color = Color::Rgb { r: 0x00, g: 0xFF, b: 0x00 };
pub const LEGAL_TARGET: Color = Color::Rgb { r: 0xFF, g: 0xEF, b: 0xB8 };
pub const PIECE: Color = Color::Black;

// Move log colors, one per actor
pub const HUMAN_MOVE: Color = Color::Rgb { r: 0x8B, g: 0x45, b: 0x13 };
pub const OPPONENT_MOVE: Color = Color::Rgb { r: 0x87, g: 0xCE, b: 0xFA };

pub const BANNER: Color = Color::Rgb { r: 0xFF, g: 0x00, b: 0x00 };
