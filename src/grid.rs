//! Grid model for the pairing game.
//!
//! This module defines the fundamental components every solver builds on:
//! - `Color`: the fixed five-color palette, black being the forbidden color.
//! - `Cell` and `Pair`: coordinates and canonical unordered cell pairs.
//! - `Grid`: the immutable color and value grids, with the compatibility
//!   predicates and cost evaluation used by enumeration, solvers and search.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// A `(row, column)` coordinate, 0-indexed.
pub type Cell = (usize, usize);

/// Largest absolute cell value a grid accepts.
///
/// A pair costs at most `2 * MAX_CELL_VALUE`, which leaves room to sum the
/// costs of any pairing without overflowing `i64`.
pub const MAX_CELL_VALUE: i64 = 1 << 48;

/// Represents the color of a grid cell.
///
/// The numeric codes are those used by grid files: `0` white, `1` red,
/// `2` blue, `3` green, `4` black.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Wildcard color, pairs with any non-black cell.
    White,
    Red,
    Blue,
    Green,
    /// Forbidden color. Black cells never take part in a pair.
    Black,
}

impl Color {
    /// Maps a numeric color code to a palette color.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairgrid_solver::grid::Color;
    /// assert_eq!(Color::from_code(2), Some(Color::Blue));
    /// assert_eq!(Color::from_code(5), None);
    /// ```
    pub fn from_code(code: i64) -> Option<Color> {
        match code {
            0 => Some(Color::White),
            1 => Some(Color::Red),
            2 => Some(Color::Blue),
            3 => Some(Color::Green),
            4 => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns the numeric code of the color.
    pub fn code(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Red => 1,
            Color::Blue => 2,
            Color::Green => 3,
            Color::Black => 4,
        }
    }

    /// Converts the color to its single-letter representation (`w r b g k`).
    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Red => 'r',
            Color::Blue => 'b',
            Color::Green => 'g',
            Color::Black => 'k',
        }
    }
}

/// An unordered pair of two distinct cells.
///
/// The cells are always stored in row-major order (`first < second`), so two
/// pairs built from the same cells in either order compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    first: Cell,
    second: Cell,
}

impl Pair {
    /// Builds a pair in canonical order.
    ///
    /// ```
    /// use pairgrid_solver::grid::Pair;
    /// assert_eq!(Pair::new((1, 0), (0, 0)), Pair::new((0, 0), (1, 0)));
    /// assert_eq!(Pair::new((1, 0), (0, 0)).cells(), ((0, 0), (1, 0)));
    /// ```
    pub fn new(a: Cell, b: Cell) -> Self {
        if a <= b {
            Pair { first: a, second: b }
        } else {
            Pair { first: b, second: a }
        }
    }

    pub fn first(&self) -> Cell {
        self.first
    }

    pub fn second(&self) -> Cell {
        self.second
    }

    pub fn cells(&self) -> (Cell, Cell) {
        (self.first, self.second)
    }

    /// Returns true if `cell` is one of the two endpoints.
    pub fn touches(&self, cell: Cell) -> bool {
        self.first == cell || self.second == cell
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.first.0, self.first.1, self.second.0, self.second.1
        )
    }
}

/// Raised when raw color/value arrays do not describe a valid grid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{what}: expected {expected} rows, found {found}")]
    RowCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{what}: row {row} has {found} entries, expected {expected}")]
    RowLength {
        what: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid color code {code} at ({row}, {col})")]
    InvalidColor { row: usize, col: usize, code: i64 },
    #[error("value {value} at ({row}, {col}) is outside -{max}..={max}", max = MAX_CELL_VALUE)]
    ValueOutOfRange { row: usize, col: usize, value: i64 },
}

/// The colored, valued grid.
///
/// A grid is read-only once built; every solver and the search borrow it
/// immutably. Colors and values are stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    n: usize,
    m: usize,
    colors: Vec<Color>,
    values: Vec<i64>,
}

impl Grid {
    /// Builds a grid from color codes and values.
    ///
    /// Both arrays must have exactly `n` rows of `m` entries, every color
    /// code must be in the palette (`0..=4`) and every value must lie in
    /// `-MAX_CELL_VALUE..=MAX_CELL_VALUE`.
    ///
    /// # Examples
    /// ```
    /// use pairgrid_solver::grid::Grid;
    /// let grid = Grid::new(1, 2, &[vec![0, 4]], &[vec![3, 7]]).unwrap();
    /// assert!(grid.is_forbidden((0, 1)));
    /// assert!(Grid::new(1, 2, &[vec![0, 9]], &[vec![3, 7]]).is_err());
    /// ```
    pub fn new(
        n: usize,
        m: usize,
        colors: &[Vec<i64>],
        values: &[Vec<i64>],
    ) -> Result<Self, FormatError> {
        check_shape("colors", n, m, colors)?;
        check_shape("values", n, m, values)?;

        let mut palette = Vec::with_capacity(n * m);
        for (r, row) in colors.iter().enumerate() {
            for (c, &code) in row.iter().enumerate() {
                let color = Color::from_code(code)
                    .ok_or(FormatError::InvalidColor { row: r, col: c, code })?;
                palette.push(color);
            }
        }

        for (r, row) in values.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if !(-MAX_CELL_VALUE..=MAX_CELL_VALUE).contains(&value) {
                    return Err(FormatError::ValueOutOfRange { row: r, col: c, value });
                }
            }
        }

        Ok(Grid {
            n,
            m,
            colors: palette,
            values: values.iter().flatten().copied().collect(),
        })
    }

    /// Builds a grid from color codes only; every cell gets the value `1`.
    pub fn with_colors(n: usize, m: usize, colors: &[Vec<i64>]) -> Result<Self, FormatError> {
        let values = vec![vec![1; m]; n];
        Self::new(n, m, colors, &values)
    }

    /// An all-white grid where every value is `1`.
    pub fn uniform(n: usize, m: usize) -> Self {
        Grid {
            n,
            m,
            colors: vec![Color::White; n * m],
            values: vec![1; n * m],
        }
    }

    /// Creates a reproducible random grid.
    ///
    /// Roughly one cell in ten is black; the others are drawn uniformly from
    /// the four pairable colors. Values are drawn from `1..=max_value`, with
    /// `max_value` clamped to `1..=MAX_CELL_VALUE`.
    /// The same seed always yields the same grid.
    pub fn random_with_seed(n: usize, m: usize, seed: u64, max_value: i64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let max_value = max_value.clamp(1, MAX_CELL_VALUE);
        let mut colors = Vec::with_capacity(n * m);
        let mut values = Vec::with_capacity(n * m);
        for _ in 0..n * m {
            colors.push(generate_random_color(&mut rng));
            values.push(rng.gen_range(1..=max_value));
        }
        Grid { n, m, colors, values }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.n
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.m
    }

    /// Returns true if the cell lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.n && cell.1 < self.m
    }

    /// Row-major index of a cell, used for flat per-cell tables.
    ///
    /// # Panics
    /// Panics if the cell is outside the grid.
    pub fn index(&self, cell: Cell) -> usize {
        assert!(
            self.contains(cell),
            "cell {:?} outside {}x{} grid",
            cell,
            self.n,
            self.m
        );
        cell.0 * self.m + cell.1
    }

    /// Inverse of [`Grid::index`].
    pub fn cell_at(&self, index: usize) -> Cell {
        (index / self.m, index % self.m)
    }

    pub fn color(&self, cell: Cell) -> Color {
        self.colors[self.index(cell)]
    }

    pub fn value(&self, cell: Cell) -> i64 {
        self.values[self.index(cell)]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.n).flat_map(move |r| (0..self.m).map(move |c| (r, c)))
    }

    /// Returns true if the cell is black.
    pub fn is_forbidden(&self, cell: Cell) -> bool {
        self.color(cell) == Color::Black
    }

    /// Returns the cost of a pair: the absolute difference of its values.
    ///
    /// Values are bounded by [`MAX_CELL_VALUE`], so the cost never exceeds
    /// `2 * MAX_CELL_VALUE`.
    pub fn cost(&self, pair: &Pair) -> i64 {
        self.value(pair.first).abs_diff(self.value(pair.second)) as i64
    }

    /// Sum of the pair costs of a pairing.
    ///
    /// Works for any pairing, including ones assembled by a human player.
    ///
    /// ```
    /// use pairgrid_solver::grid::{Grid, Pair};
    /// let grid = Grid::new(1, 4, &[vec![0; 4]], &[vec![1, 5, 2, 2]]).unwrap();
    /// let pairing = [Pair::new((0, 0), (0, 1)), Pair::new((0, 2), (0, 3))];
    /// assert_eq!(grid.score(&pairing), 4);
    /// ```
    pub fn score(&self, pairs: &[Pair]) -> i64 {
        pairs.iter().map(|p| self.cost(p)).sum()
    }

    /// Color compatibility of two cells, regardless of their positions.
    ///
    /// Black never pairs. White pairs with every other color, equal colors
    /// pair, and red pairs with blue.
    pub fn color_compatible(&self, a: Cell, b: Cell) -> bool {
        colors_compatible(self.color(a), self.color(b))
    }

    /// Returns true if the cells are at Manhattan distance exactly 1.
    pub fn adjacent(&self, a: Cell, b: Cell) -> bool {
        a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
    }

    /// The strict pairing rule: adjacent, non-forbidden and color-compatible.
    pub fn valid_pair(&self, a: Cell, b: Cell) -> bool {
        self.adjacent(a, b) && self.color_compatible(a, b)
    }

    /// The extended pairing rule.
    ///
    /// Two white cells form a valid pair at any distance. Any other pair must
    /// satisfy the strict rule.
    pub fn valid_pair_extended(&self, a: Cell, b: Cell) -> bool {
        if a == b {
            return false;
        }
        if self.color(a) == Color::White && self.color(b) == Color::White {
            return true;
        }
        self.valid_pair(a, b)
    }
}

fn colors_compatible(c1: Color, c2: Color) -> bool {
    match (c1, c2) {
        (Color::Black, _) | (_, Color::Black) => false,
        (Color::White, _) | (_, Color::White) => true,
        (Color::Red, Color::Blue) | (Color::Blue, Color::Red) => true,
        (a, b) => a == b,
    }
}

fn check_shape(
    what: &'static str,
    n: usize,
    m: usize,
    rows: &[Vec<i64>],
) -> Result<(), FormatError> {
    if rows.len() != n {
        return Err(FormatError::RowCount {
            what,
            expected: n,
            found: rows.len(),
        });
    }
    for (r, row) in rows.iter().enumerate() {
        if row.len() != m {
            return Err(FormatError::RowLength {
                what,
                row: r,
                expected: m,
                found: row.len(),
            });
        }
    }
    Ok(())
}

fn generate_random_color(rng: &mut impl Rng) -> Color {
    if rng.gen_bool(0.1) {
        return Color::Black;
    }
    match rng.gen_range(0..4u8) {
        0 => Color::White,
        1 => Color::Red,
        2 => Color::Blue,
        3 => Color::Green,
        _ => unreachable!("Generated value out of range"),
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The grid is {} x {}. It has the following colors:", self.n, self.m)?;
        for r in 0..self.n {
            let row: Vec<String> = (0..self.m)
                .map(|c| self.color((r, c)).to_char().to_string())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        writeln!(f, "and the following values:")?;
        for r in 0..self.n {
            let row: Vec<String> = (0..self.m).map(|c| self.value((r, c)).to_string()).collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid00() -> Grid {
        Grid::new(2, 3, &[vec![0, 0, 0], vec![0, 0, 0]], &[vec![5, 8, 4], vec![11, 1, 3]]).unwrap()
    }

    fn grid01() -> Grid {
        Grid::new(2, 3, &[vec![0, 4, 3], vec![2, 1, 0]], &[vec![5, 8, 4], vec![11, 1, 3]]).unwrap()
    }

    #[test]
    fn test_color_codes() {
        for code in 0..5 {
            let color = Color::from_code(code).unwrap();
            assert_eq!(color.code() as i64, code);
        }
        assert_eq!(Color::from_code(-1), None);
        assert_eq!(Color::Black.to_char(), 'k');
    }

    #[test]
    fn test_is_forbidden() {
        assert!(!Grid::uniform(2, 3).is_forbidden((0, 1)));
        assert!(grid01().is_forbidden((0, 1)));
        assert!(!grid01().is_forbidden((1, 2)));
    }

    #[test]
    fn test_cost() {
        assert_eq!(Grid::uniform(2, 3).cost(&Pair::new((0, 0), (0, 1))), 0);
        assert_eq!(grid00().cost(&Pair::new((0, 0), (0, 1))), 3);
        assert_eq!(grid01().cost(&Pair::new((0, 0), (0, 1))), 3);
        assert_eq!(grid00().cost(&Pair::new((1, 0), (1, 1))), 10);
    }

    #[test]
    fn test_cost_is_symmetric() {
        let grid = grid00();
        for a in grid.cells() {
            for b in grid.cells() {
                if a != b {
                    assert_eq!(grid.cost(&Pair::new(a, b)), grid.cost(&Pair::new(b, a)));
                }
            }
        }
    }

    #[test]
    fn test_score_sums_costs() {
        let grid = grid00();
        let pairs = vec![
            Pair::new((0, 2), (1, 2)),
            Pair::new((0, 0), (0, 1)),
            Pair::new((1, 0), (1, 1)),
        ];
        assert_eq!(grid.score(&pairs), 1 + 3 + 10);
        assert_eq!(grid.score(&[]), 0);
    }

    #[test]
    fn test_color_compatible_table() {
        use Color::*;
        let all = [White, Red, Blue, Green, Black];
        for &a in &all {
            for &b in &all {
                let expected = match (a, b) {
                    (Black, _) | (_, Black) => false,
                    (White, _) | (_, White) => true,
                    (Red, Blue) | (Blue, Red) => true,
                    _ => a == b,
                };
                assert_eq!(colors_compatible(a, b), expected, "{:?} / {:?}", a, b);
                assert_eq!(colors_compatible(a, b), colors_compatible(b, a));
            }
        }
        assert!(!colors_compatible(Green, Red));
        assert!(!colors_compatible(Black, Black));
    }

    #[test]
    fn test_adjacent() {
        let grid = Grid::uniform(3, 3);
        assert!(grid.adjacent((1, 1), (0, 1)));
        assert!(grid.adjacent((1, 1), (1, 2)));
        assert!(!grid.adjacent((1, 1), (0, 0)));
        assert!(!grid.adjacent((1, 1), (1, 1)));
        assert!(!grid.adjacent((0, 0), (0, 2)));
    }

    #[test]
    fn test_valid_pair_extended_white_wildcard() {
        let grid = grid01();
        // (0, 0) and (1, 2) are both white but far apart.
        assert!(!grid.valid_pair((0, 0), (1, 2)));
        assert!(grid.valid_pair_extended((0, 0), (1, 2)));
        // Green and red are never compatible.
        assert!(!grid.valid_pair_extended((0, 2), (1, 1)));
        assert!(grid.valid_pair_extended((1, 0), (1, 1)));
        assert!(!grid.valid_pair_extended((0, 0), (0, 1)));
    }

    #[test]
    fn test_new_rejects_bad_rows() {
        let err = Grid::new(2, 3, &[vec![0, 0, 0]], &[vec![1, 1, 1], vec![1, 1, 1]]).unwrap_err();
        assert_eq!(
            err,
            FormatError::RowCount { what: "colors", expected: 2, found: 1 }
        );

        let err = Grid::new(1, 3, &[vec![0, 0, 0]], &[vec![1, 1]]).unwrap_err();
        assert_eq!(
            err,
            FormatError::RowLength { what: "values", row: 0, expected: 3, found: 2 }
        );
    }

    #[test]
    fn test_new_rejects_invalid_color() {
        let err = Grid::with_colors(1, 3, &[vec![0, 5, 0]]).unwrap_err();
        assert_eq!(err, FormatError::InvalidColor { row: 0, col: 1, code: 5 });
        assert!(err.to_string().contains("invalid color code 5"));
    }

    #[test]
    fn test_new_rejects_values_out_of_range() {
        let err = Grid::new(1, 2, &[vec![0, 0]], &[vec![i64::MIN, 1]]).unwrap_err();
        assert_eq!(err, FormatError::ValueOutOfRange { row: 0, col: 0, value: i64::MIN });

        let too_big = MAX_CELL_VALUE + 1;
        let err = Grid::new(1, 2, &[vec![0, 0]], &[vec![0, too_big]]).unwrap_err();
        assert_eq!(err, FormatError::ValueOutOfRange { row: 0, col: 1, value: too_big });
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn test_cost_at_value_limits() {
        let grid = Grid::new(
            1,
            3,
            &[vec![0, 0, 0]],
            &[vec![-MAX_CELL_VALUE, MAX_CELL_VALUE, -MAX_CELL_VALUE]],
        )
        .unwrap();
        let left = Pair::new((0, 0), (0, 1));
        let right = Pair::new((0, 1), (0, 2));
        assert_eq!(grid.cost(&left), 2 * MAX_CELL_VALUE);
        assert_eq!(grid.score(&[left, right]), 4 * MAX_CELL_VALUE);
    }

    #[test]
    fn test_index_and_cell_at_are_inverse() {
        let grid = Grid::uniform(3, 4);
        for (i, cell) in grid.cells().enumerate() {
            assert_eq!(grid.index(cell), i);
            assert_eq!(grid.cell_at(i), cell);
        }
        assert!(grid.contains((2, 3)));
        assert!(!grid.contains((3, 0)));
        assert!(!grid.contains((0, 4)));
    }

    #[test]
    fn test_with_colors_defaults_values_to_one() {
        let grid = Grid::with_colors(2, 2, &[vec![1, 2], vec![3, 0]]).unwrap();
        assert!(grid.cells().all(|cell| grid.value(cell) == 1));
        assert_eq!(grid.color((1, 0)), Color::Green);
    }

    #[test]
    fn test_random_with_seed_determinism() {
        let a = Grid::random_with_seed(4, 5, 42, 20);
        let b = Grid::random_with_seed(4, 5, 42, 20);
        assert_eq!(a, b);
        assert!(a.cells().all(|cell| (1..=20).contains(&a.value(cell))));
        let c = Grid::random_with_seed(4, 5, 43, 20);
        assert_ne!(a, c);
    }

    #[test]
    fn test_random_with_seed_clamps_max_value() {
        let grid = Grid::random_with_seed(3, 3, 9, i64::MAX);
        assert!(grid.cells().all(|cell| (1..=MAX_CELL_VALUE).contains(&grid.value(cell))));
    }

    #[test]
    fn test_display_grid() {
        let text = grid01().to_string();
        assert!(text.starts_with("The grid is 2 x 3."));
        assert!(text.contains("w k g\nb r w\n"));
        assert!(text.contains("5 8 4\n11 1 3\n"));
    }

    #[test]
    fn test_pair_canonical_order() {
        let p = Pair::new((1, 2), (0, 2));
        assert_eq!(p.first(), (0, 2));
        assert_eq!(p.second(), (1, 2));
        assert!(p.touches((1, 2)));
        assert!(!p.touches((1, 1)));
        assert_eq!(p.to_string(), "((0, 2), (1, 2))");
    }
}
