//! Screen geometry for click executors.

use crate::types::Cell;
use serde::Serialize;

/// Pixel rectangle covering the board on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenRegion {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRegion {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pixel at the center of `cell` on a `rows x cols` board, truncated toward zero.
    pub fn cell_center(&self, rows: usize, cols: usize, cell: Cell) -> (i32, i32) {
        let cell_w = self.width as f64 / cols as f64;
        let cell_h = self.height as f64 / rows as f64;
        let x = self.left as f64 + (cell.col as f64 + 0.5) * cell_w;
        let y = self.top as f64 + (cell.row as f64 + 0.5) * cell_h;
        (x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center() {
        // 10 columns x 8 rows over 450 x 360 pixels: 45 x 45 cells.
        let region = ScreenRegion::new(735, 427, 450, 360);
        assert_eq!(region.cell_center(8, 10, Cell::new(0, 0)), (757, 449));
        assert_eq!(region.cell_center(8, 10, Cell::new(7, 9)), (1162, 764));
    }

    #[test]
    fn test_cell_center_truncates() {
        let region = ScreenRegion::new(0, 0, 10, 10);
        // 3 columns: 3.33.. px wide, center of column 1 is 5.0; row 0 of 4 is 1.25
        assert_eq!(region.cell_center(4, 3, Cell::new(0, 1)), (5, 1));
    }

    #[test]
    fn test_small_preset_center_click() {
        let preset = crate::options::Difficulty::Small.preset();
        let center = Cell::new(preset.rows / 2, preset.cols / 2);
        assert_eq!(preset.region.cell_center(preset.rows, preset.cols, center), (982, 629));
    }
}
