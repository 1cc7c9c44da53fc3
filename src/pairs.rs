//! Candidate pair enumeration.
//!
//! Two policies are supported. The strict policy only pairs neighboring
//! cells and is the one used by the greedy solver and the search. The
//! extended policy additionally lets any two white cells pair at a distance.
use crate::grid::{Cell, Color, Grid, Pair};

/// Selects which pairing rule an enumeration or solver follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Policy {
    /// Adjacent, color-compatible cells only.
    #[default]
    Strict,
    /// Strict pairs plus every pair of white cells regardless of distance.
    Extended,
}

/// Enumerates the candidate pairs of `grid` under `policy`.
pub fn enumerate(grid: &Grid, policy: Policy) -> Vec<Pair> {
    match policy {
        Policy::Strict => enumerate_adjacent(grid),
        Policy::Extended => enumerate_extended(grid),
    }
}

/// Returns every adjacent, color-compatible pair of non-forbidden cells.
///
/// Cells are visited in row-major order; for each one the right neighbor is
/// considered before the bottom neighbor. Each pair appears once.
///
/// # Examples
/// ```
/// use pairgrid_solver::grid::{Grid, Pair};
/// use pairgrid_solver::pairs::enumerate_adjacent;
/// let grid = Grid::uniform(1, 3);
/// assert_eq!(
///     enumerate_adjacent(&grid),
///     vec![Pair::new((0, 0), (0, 1)), Pair::new((0, 1), (0, 2))]
/// );
/// ```
pub fn enumerate_adjacent(grid: &Grid) -> Vec<Pair> {
    adjacent_pairs(grid, |a, b| grid.color_compatible(a, b))
}

/// Returns the strict pairs plus every combination of two white cells.
///
/// Adjacent pairs come first, in the same order as [`enumerate_adjacent`],
/// followed by the non-adjacent white pairs in row-major order. A white pair
/// that is also adjacent is listed once.
pub fn enumerate_extended(grid: &Grid) -> Vec<Pair> {
    let mut pairs = adjacent_pairs(grid, |a, b| grid.valid_pair_extended(a, b));

    let whites: Vec<Cell> = grid
        .cells()
        .filter(|&cell| grid.color(cell) == Color::White)
        .collect();
    for (i, &a) in whites.iter().enumerate() {
        for &b in &whites[i + 1..] {
            if !grid.adjacent(a, b) {
                pairs.push(Pair::new(a, b));
            }
        }
    }
    pairs
}

fn adjacent_pairs(grid: &Grid, accept: impl Fn(Cell, Cell) -> bool) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for cell in grid.cells() {
        if grid.is_forbidden(cell) {
            continue;
        }
        let (r, c) = cell;
        let right = (c + 1 < grid.cols()).then_some((r, c + 1));
        let below = (r + 1 < grid.rows()).then_some((r + 1, c));
        for neighbor in [right, below].into_iter().flatten() {
            if !grid.is_forbidden(neighbor) && accept(cell, neighbor) {
                pairs.push(Pair::new(cell, neighbor));
            }
        }
    }
    pairs
}
