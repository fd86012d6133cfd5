//! Scramble: random reassignment of non-zero cell values
//!
//! Fisher-Yates over the positions that currently hold a value. Empty cells
//! take no part: they receive nothing and their count is unchanged. The
//! multiset of non-zero values on the board is preserved exactly; a value
//! landing back on its own cell is possible and allowed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// One relocated value: where it was, where it ends up
///
/// The presentation layer interpolates `from -> to` over the scramble
/// animation window; the grid itself is already in the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub from: (u8, u8),
    pub to: (u8, u8),
    pub value: u8,
}

/// Scramble the grid in place, returning one relocation per non-zero cell
pub fn scramble(grid: &mut Grid, rng: &mut impl Rng) -> Vec<Relocation> {
    // Pool of occupied positions with their values, row-major
    let pool: Vec<((u8, u8), u8)> = grid
        .cells()
        .iter()
        .filter(|c| c.value != 0)
        .map(|c| ((c.x, c.y), c.value))
        .collect();
    let n = pool.len();

    // Fisher-Yates permutation of [0..n)
    let mut permutation: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        permutation.swap(i, j);
    }

    // Walk occupied positions in row-major order; the k-th receives the
    // value of pool[permutation[k]].
    let mut relocations = Vec::with_capacity(n);
    let mut k = 0;
    for cell in grid.cells_mut() {
        if cell.value == 0 {
            continue;
        }
        let (source, value) = pool[permutation[k]];
        cell.value = value;
        relocations.push(Relocation {
            from: source,
            to: (cell.x, cell.y),
            value,
        });
        k += 1;
    }
    relocations
}
