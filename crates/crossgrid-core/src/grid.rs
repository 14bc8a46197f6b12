use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::document::GridDocument;
use crate::state::CellPosition;

/// Default number of rows in a new grid
pub const DEFAULT_HEIGHT: usize = 10;
/// Default number of columns in a new grid
pub const DEFAULT_WIDTH: usize = 10;

/// Rectangular, row-major matrix of cells.
///
/// Every row has the same length and the grid is never smaller than 1x1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDocument", into = "GridDocument")]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT, DEFAULT_WIDTH)
    }
}

impl Grid {
    /// Create a grid of empty cells; dimensions are clamped to at least 1
    pub fn new(height: usize, width: usize) -> Self {
        let height = height.max(1);
        let width = width.max(1);
        Self {
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    /// Build from rows that the caller has already checked to be rectangular
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(!rows.is_empty() && rows.iter().all(|r| r.len() == rows[0].len()));
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn cell_count(&self) -> usize {
        self.height() * self.width()
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        pos.row < self.height() && pos.col < self.width()
    }

    pub fn get(&self, pos: CellPosition) -> Option<&Cell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub(crate) fn get_mut(&mut self, pos: CellPosition) -> Option<&mut Cell> {
        self.rows.get_mut(pos.row).and_then(|row| row.get_mut(pos.col))
    }

    /// Raw value at a coordinate; out-of-range coordinates read as empty
    pub fn value_at(&self, row: usize, col: usize) -> String {
        self.get(CellPosition::new(row, col))
            .map(Cell::raw_value)
            .unwrap_or_default()
    }

    /// Canonical single-character entry at a coordinate
    pub fn entry_at(&self, row: usize, col: usize) -> char {
        self.get(CellPosition::new(row, col))
            .map(Cell::entry)
            .unwrap_or(crate::cell::PLACEHOLDER)
    }

    /// Replace a cell; returns false when the coordinate is outside the grid
    pub fn set(&mut self, pos: CellPosition, cell: Cell) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// All coordinates in row-major order
    pub fn positions(&self) -> impl Iterator<Item = CellPosition> + '_ {
        let width = self.width();
        (0..self.cell_count()).map(move |i| CellPosition::new(i / width, i % width))
    }

    /// Row-major linear index of a coordinate
    pub fn linear_index(&self, pos: CellPosition) -> usize {
        pos.row * self.width() + pos.col
    }

    /// Coordinate for a signed row-major index, if it lies inside the grid
    pub fn position_at(&self, index: isize) -> Option<CellPosition> {
        if index < 0 || index as usize >= self.cell_count() {
            return None;
        }
        let index = index as usize;
        Some(CellPosition::new(index / self.width(), index % self.width()))
    }

    pub fn add_row(&mut self) {
        let width = self.width();
        self.rows.push(vec![Cell::Empty; width]);
    }

    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.push(Cell::Empty);
        }
    }

    /// Drop the last row; no-op (returns false) at height 1
    pub fn remove_row(&mut self) -> bool {
        if self.height() > 1 {
            self.rows.pop();
            true
        } else {
            false
        }
    }

    /// Drop the last column; no-op (returns false) at width 1
    pub fn remove_column(&mut self) -> bool {
        if self.width() > 1 {
            for row in &mut self.rows {
                row.pop();
            }
            true
        } else {
            false
        }
    }

    /// Rotate every row one step left; the first column wraps to the end
    pub fn shift_left(&mut self) {
        for row in &mut self.rows {
            row.rotate_left(1);
        }
    }

    pub fn shift_right(&mut self) {
        for row in &mut self.rows {
            row.rotate_right(1);
        }
    }

    /// Rotate rows one step up; the first row wraps to the bottom
    pub fn shift_up(&mut self) {
        self.rows.rotate_left(1);
    }

    pub fn shift_down(&mut self) {
        self.rows.rotate_right(1);
    }

    /// Grow or shrink to the given size, keeping the top-left content
    pub fn resize(&mut self, height: usize, width: usize) {
        let height = height.max(1);
        let width = width.max(1);
        self.rows.resize_with(height, Vec::new);
        for row in &mut self.rows {
            row.resize(width, Cell::Empty);
        }
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::Empty);
        }
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.rows.iter().all(|row| row.len() == width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lettered(height: usize, width: usize) -> Grid {
        let mut grid = Grid::new(height, width);
        for pos in grid.positions().collect::<Vec<_>>() {
            let c = char::from(b'A' + (grid.linear_index(pos) % 26) as u8);
            grid.set(pos, Cell::Letter(c));
        }
        grid
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert_eq!(grid.height(), DEFAULT_HEIGHT);
        assert_eq!(grid.width(), DEFAULT_WIDTH);
        assert!(grid.rows().iter().flatten().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_new_clamps_to_minimum() {
        let grid = Grid::new(0, 0);
        assert_eq!((grid.height(), grid.width()), (1, 1));
    }

    #[test]
    fn test_value_and_entry_at() {
        let mut grid = Grid::new(2, 2);
        grid.set(CellPosition::new(0, 1), Cell::parse("X"));
        grid.set(CellPosition::new(1, 0), Cell::parse("#"));
        assert_eq!(grid.value_at(0, 1), "X");
        assert_eq!(grid.entry_at(0, 1), 'X');
        assert_eq!(grid.value_at(1, 0), "#");
        assert_eq!(grid.entry_at(1, 0), '_');
        assert_eq!(grid.value_at(9, 9), "");
    }

    #[test]
    fn test_add_and_remove_keep_rectangle() {
        let mut grid = lettered(3, 4);

        grid.add_row();
        assert_eq!((grid.height(), grid.width()), (4, 4));
        assert!(grid.is_rectangular());

        grid.add_column();
        assert_eq!((grid.height(), grid.width()), (4, 5));
        assert!(grid.is_rectangular());

        assert!(grid.remove_row());
        assert_eq!((grid.height(), grid.width()), (3, 5));

        assert!(grid.remove_column());
        assert_eq!((grid.height(), grid.width()), (3, 4));
        assert!(grid.is_rectangular());
    }

    #[test]
    fn test_remove_at_minimum_is_noop() {
        let mut grid = Grid::new(1, 1);
        assert!(!grid.remove_row());
        assert!(!grid.remove_column());
        assert_eq!((grid.height(), grid.width()), (1, 1));

        let mut tall = Grid::new(3, 1);
        assert!(!tall.remove_column());
        assert!(tall.remove_row());
        assert_eq!((tall.height(), tall.width()), (2, 1));
    }

    #[test]
    fn test_shift_round_trips() {
        let original = lettered(3, 4);

        let mut grid = original.clone();
        grid.shift_left();
        assert_ne!(grid, original);
        grid.shift_right();
        assert_eq!(grid, original);

        grid.shift_up();
        assert_ne!(grid, original);
        grid.shift_down();
        assert_eq!(grid, original);
    }

    #[test]
    fn test_shift_left_wraps_first_column() {
        let mut grid = lettered(2, 3);
        grid.shift_left();
        assert_eq!(grid.entry_at(0, 0), 'B');
        assert_eq!(grid.entry_at(0, 2), 'A');
    }

    #[test]
    fn test_shift_down_wraps_last_row() {
        let mut grid = lettered(3, 2);
        grid.shift_down();
        assert_eq!(grid.entry_at(0, 0), 'E');
        assert_eq!(grid.entry_at(1, 0), 'A');
    }

    #[test]
    fn test_position_at_bounds() {
        let grid = Grid::new(2, 3);
        assert_eq!(grid.position_at(-1), None);
        assert_eq!(grid.position_at(6), None);
        assert_eq!(grid.position_at(4), Some(CellPosition::new(1, 1)));
        assert_eq!(grid.linear_index(CellPosition::new(1, 2)), 5);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut grid = lettered(2, 2);
        grid.resize(3, 1);
        assert_eq!((grid.height(), grid.width()), (3, 1));
        assert_eq!(grid.entry_at(1, 0), 'C');
        assert_eq!(grid.value_at(2, 0), "");

        grid.clear();
        assert!(grid.rows().iter().flatten().all(|c| *c == Cell::Empty));
    }
}
