//! The 10x10 numeric grid
//!
//! Cells hold values 1-9; value 0 means empty/cleared. Cells are never
//! removed - "clearing" is a value reset, so cleared cells keep their
//! coordinates and keep counting toward rectangle areas.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Tile value, 0 = empty
    pub value: u8,
    /// Highlight flag for the presentation layer; never affects sums
    pub selected: bool,
    pub x: u8,
    pub y: u8,
}

/// An axis-aligned inclusive rectangle of grid coordinates
///
/// Always normalized: `x0 <= x1` and `y0 <= y1` regardless of the order
/// the corners were supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: u8,
    pub y0: u8,
    pub x1: u8,
    pub y1: u8,
}

impl Rect {
    /// Build a normalized rectangle from two corner points in any order
    pub fn from_points(start: (u8, u8), end: (u8, u8)) -> Self {
        Self {
            x0: start.0.min(end.0),
            y0: start.1.min(end.1),
            x1: start.0.max(end.0),
            y1: start.1.max(end.1),
        }
    }

    /// Single-cell rectangle
    pub fn single(x: u8, y: u8) -> Self {
        Self::from_points((x, y), (x, y))
    }

    /// Number of cells covered (inclusive on both axes)
    pub fn area(&self) -> u32 {
        u32::from(self.x1 - self.x0 + 1) * u32::from(self.y1 - self.y0 + 1)
    }

    /// Iterate covered coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

/// Result of a rectangular range-sum query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSum {
    /// Sum of non-zero values in the rectangle
    pub sum: u32,
    /// Count of non-zero cells
    pub tiles_with_value: u32,
    /// Count of zero (cleared) cells
    pub empty_tiles: u32,
}

/// The game grid: a fixed 10x10 row-major array of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    /// Fill all cells with values drawn uniformly from 1..=9, unselected
    pub fn generate(rng: &mut impl Rng) -> Self {
        let mut cells = Vec::with_capacity(usize::from(GRID_SIZE) * usize::from(GRID_SIZE));
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                cells.push(Cell {
                    value: rng.random_range(1..=9),
                    selected: false,
                    x,
                    y,
                });
            }
        }
        Self { cells }
    }

    /// Whether a coordinate pair is on the grid
    pub fn in_bounds(x: u8, y: u8) -> bool {
        x < GRID_SIZE && y < GRID_SIZE
    }

    fn index(x: u8, y: u8) -> usize {
        usize::from(y) * usize::from(GRID_SIZE) + usize::from(x)
    }

    /// Cell at (x, y); None if out of range
    pub fn cell(&self, x: u8, y: u8) -> Option<&Cell> {
        if Self::in_bounds(x, y) {
            self.cells.get(Self::index(x, y))
        } else {
            None
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access for the shuffle engine (same-module family only)
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Sum and tile counts over an inclusive rectangle
    pub fn range_sum(&self, rect: Rect) -> RangeSum {
        let mut result = RangeSum::default();
        for (x, y) in rect.coords() {
            let value = self.cells[Self::index(x, y)].value;
            if value == 0 {
                result.empty_tiles += 1;
            } else {
                result.sum += u32::from(value);
                result.tiles_with_value += 1;
            }
        }
        result
    }

    /// Zero every cell value in the rectangle
    pub fn clear(&mut self, rect: Rect) {
        for (x, y) in rect.coords() {
            self.cells[Self::index(x, y)].value = 0;
        }
    }

    /// Set the selected flag over the rectangle (presentation only)
    pub fn select(&mut self, rect: Rect) {
        for (x, y) in rect.coords() {
            self.cells[Self::index(x, y)].selected = true;
        }
    }

    /// Clear the selected flag on every cell
    pub fn deselect_all(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
        }
    }

    /// Count of non-zero cells on the whole board
    pub fn non_zero_count(&self) -> usize {
        self.cells.iter().filter(|c| c.value != 0).count()
    }

    /// Sorted non-zero values, for multiset comparisons
    pub fn non_zero_values_sorted(&self) -> Vec<u8> {
        let mut values: Vec<u8> = self
            .cells
            .iter()
            .map(|c| c.value)
            .filter(|&v| v != 0)
            .collect();
        values.sort_unstable();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_grid(seed: u64) -> Grid {
        Grid::generate(&mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_generate_fills_one_to_nine() {
        let grid = test_grid(7);
        assert_eq!(grid.cells().len(), 100);
        for cell in grid.cells() {
            assert!((1..=9).contains(&cell.value));
            assert!(!cell.selected);
        }
    }

    #[test]
    fn test_generate_unique_coords() {
        let grid = test_grid(7);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(Grid::index(cell.x, cell.y), i);
        }
    }

    #[test]
    fn test_rect_normalizes_reversed_corners() {
        let rect = Rect::from_points((7, 2), (3, 5));
        assert_eq!(rect, Rect { x0: 3, y0: 2, x1: 7, y1: 5 });
        assert_eq!(rect.area(), 20);
    }

    #[test]
    fn test_range_sum_single_cell() {
        let mut grid = test_grid(1);
        let rect = Rect::single(4, 4);
        let value = grid.cell(4, 4).map(|c| c.value).unwrap_or(0);
        let result = grid.range_sum(rect);
        assert_eq!(result.sum, u32::from(value));
        assert_eq!(result.tiles_with_value, 1);
        assert_eq!(result.empty_tiles, 0);

        grid.clear(rect);
        let result = grid.range_sum(rect);
        assert_eq!(result, RangeSum { sum: 0, tiles_with_value: 0, empty_tiles: 1 });
    }

    #[test]
    fn test_range_sum_full_grid() {
        let grid = test_grid(2);
        let rect = Rect::from_points((0, 0), (9, 9));
        let result = grid.range_sum(rect);
        assert_eq!(result.tiles_with_value, 100);
        assert_eq!(result.empty_tiles, 0);
        let manual: u32 = grid.cells().iter().map(|c| u32::from(c.value)).sum();
        assert_eq!(result.sum, manual);
    }

    #[test]
    fn test_range_sum_over_cleared_region() {
        let mut grid = test_grid(3);
        let rect = Rect::from_points((2, 2), (4, 6));
        grid.clear(rect);
        let result = grid.range_sum(rect);
        assert_eq!(result.sum, 0);
        assert_eq!(result.tiles_with_value, 0);
        assert_eq!(result.empty_tiles, rect.area());
    }

    #[test]
    fn test_deselect_all_idempotent() {
        let mut grid = test_grid(4);
        grid.select(Rect::from_points((1, 1), (3, 3)));
        grid.deselect_all();
        let once = grid.clone();
        grid.deselect_all();
        assert_eq!(grid.cells(), once.cells());
    }

    #[test]
    fn test_select_does_not_touch_values() {
        let mut grid = test_grid(5);
        let before: Vec<u8> = grid.cells().iter().map(|c| c.value).collect();
        grid.select(Rect::from_points((0, 0), (9, 9)));
        let after: Vec<u8> = grid.cells().iter().map(|c| c.value).collect();
        assert_eq!(before, after);
        assert_eq!(grid.range_sum(Rect::single(0, 0)).sum, u32::from(before[0]));
    }

    proptest! {
        #[test]
        fn prop_clear_then_range_sum_is_empty(
            seed in any::<u64>(),
            ax in 0u8..10, ay in 0u8..10,
            bx in 0u8..10, by in 0u8..10,
        ) {
            let mut grid = test_grid(seed);
            let rect = Rect::from_points((ax, ay), (bx, by));
            grid.clear(rect);
            let result = grid.range_sum(rect);
            prop_assert_eq!(result.sum, 0);
            prop_assert_eq!(result.tiles_with_value, 0);
            prop_assert_eq!(result.empty_tiles, rect.area());
        }
    }
}
