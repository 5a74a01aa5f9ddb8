//! Screen grid <-> board square mapping for the human's point of view.
//!
//! Screen cells are `(col, row)` with row 0 at the top. Playing white the
//! screen grid is the white-oriented board grid; playing black both axes are
//! mirrored so the human's pieces are always at the bottom.

use crate::domain::chess::{Side, Square};

/// Square shown at screen cell `(col, row)`. Callers pass in-range cells.
pub fn to_logical(col: usize, row: usize, human: Side) -> Square {
    let (col, row) = mirror(col, row, human);
    Square::from_grid(col, row)
}

/// Screen cell `(col, row)` where `square` is drawn.
pub fn to_screen(square: Square, human: Side) -> (usize, usize) {
    let (col, row) = square.grid();
    mirror(col, row, human)
}

fn mirror(col: usize, row: usize, human: Side) -> (usize, usize) {
    match human {
        Side::White => (col, row),
        Side::Black => (7 - col, 7 - row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells() -> impl Iterator<Item = (usize, usize)> {
        (0..8).flat_map(|row| (0..8).map(move |col| (col, row)))
    }

    #[test]
    fn test_white_is_identity_on_grid() {
        for (col, row) in cells() {
            assert_eq!(to_logical(col, row, Side::White), Square::from_grid(col, row));
        }
        assert_eq!(to_logical(0, 0, Side::White).to_string(), "a8");
        assert_eq!(to_logical(4, 6, Side::White).to_string(), "e2");
    }

    #[test]
    fn test_black_mirrors_both_axes() {
        assert_eq!(to_logical(0, 0, Side::Black).to_string(), "h1");
        assert_eq!(to_logical(7, 7, Side::Black).to_string(), "a8");
        assert_eq!(to_logical(3, 1, Side::Black).to_string(), "e2");
        for (col, row) in cells() {
            assert_eq!(
                to_logical(col, row, Side::Black),
                Square::from_grid(7 - col, 7 - row)
            );
        }
    }

    #[test]
    fn test_round_trip_all_cells_both_sides() {
        for side in [Side::White, Side::Black] {
            for (col, row) in cells() {
                assert_eq!(to_screen(to_logical(col, row, side), side), (col, row));
            }
            for sq in Square::all() {
                let (col, row) = to_screen(sq, side);
                assert_eq!(to_logical(col, row, side), sq);
            }
        }
    }
}
