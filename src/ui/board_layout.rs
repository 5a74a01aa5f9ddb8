//! Board layout calculations - pixel <-> screen cell conversion.

use crate::config::LayoutConfig;

/// Where the board sits in the window
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub square_size: f32,
}

impl BoardLayout {
    pub fn new(origin_x: f32, origin_y: f32, square_size: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            square_size: square_size.max(1.0),
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.board_x, config.board_y, config.square_size)
    }

    /// Get the total size of the board (8 squares)
    pub fn board_total_size(&self) -> f32 {
        self.square_size * 8.0
    }

    /// Convert a window position to a screen cell `(col, row)`, if it is on the board
    pub fn pos_to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let board_x = x - self.origin_x;
        let board_y = y - self.origin_y;

        let size = self.board_total_size();
        if !(board_x >= 0.0 && board_x < size && board_y >= 0.0 && board_y < size) {
            return None;
        }

        let col = (board_x / self.square_size) as usize;
        let row = (board_y / self.square_size) as usize;
        Some((col.min(7), row.min(7)))
    }

    /// Window position of the centre of a screen cell
    pub fn cell_center(&self, col: usize, row: usize) -> (f32, f32) {
        let half = self.square_size / 2.0;
        (
            self.origin_x + col as f32 * self.square_size + half,
            self.origin_y + row as f32 * self.square_size + half,
        )
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_to_cell_default_layout() {
        let layout = BoardLayout::default();
        assert_eq!(layout.board_total_size(), 600.0);
        assert_eq!(layout.pos_to_cell(0.0, 100.0), Some((0, 0)));
        assert_eq!(layout.pos_to_cell(599.0, 699.0), Some((7, 7)));
        assert_eq!(layout.pos_to_cell(80.0, 180.0), Some((1, 1)));
        // margins and the move log panel are off-board
        assert_eq!(layout.pos_to_cell(10.0, 50.0), None);
        assert_eq!(layout.pos_to_cell(10.0, 750.0), None);
        assert_eq!(layout.pos_to_cell(650.0, 300.0), None);
        assert_eq!(layout.pos_to_cell(-1.0, 300.0), None);
        assert_eq!(layout.pos_to_cell(f32::NAN, 300.0), None);
        // the far edges belong to the margin
        assert_eq!(layout.pos_to_cell(600.0, 300.0), None);
        assert_eq!(layout.pos_to_cell(300.0, 700.0), None);
        assert_eq!(layout.pos_to_cell(599.9, 699.9), Some((7, 7)));
    }

    #[test]
    fn test_cell_center_round_trips() {
        let layout = BoardLayout::new(20.0, 20.0, 50.0);
        for row in 0..8 {
            for col in 0..8 {
                let (x, y) = layout.cell_center(col, row);
                assert_eq!(layout.pos_to_cell(x, y), Some((col, row)));
            }
        }
    }
}
