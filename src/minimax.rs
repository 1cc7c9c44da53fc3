//! Two-player minimax search over the pairing game.
//!
//! Players alternately claim an unused strict pair. Each player's score is
//! the total cost of the pairs they claimed, and lower is better. From the
//! point of view of the searching player (the maximizer), the utility of a
//! position is `opponent score - own score`.
use crate::grid::{Cell, Grid, Pair};
use crate::pairs::enumerate_adjacent;
use std::collections::HashSet;

/// Default bound on the recursion depth of [`Minimax`].
pub const MAXIMUM_RECURSION_DEPTH: usize = 100;

/// Tuning knobs of the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Nodes deeper than this are evaluated as leaves, and the search is
    /// reported as truncated.
    pub max_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: MAXIMUM_RECURSION_DEPTH,
        }
    }
}

/// Result of a full move search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// First move achieving the best value, `None` when no move is legal.
    pub best_move: Option<Pair>,
    /// Minimax value of `best_move`.
    pub value: Option<i64>,
    /// True if some node was cut off by the depth bound, in which case
    /// `value` may not be exact.
    pub truncated: bool,
    /// Number of nodes visited below the root.
    pub nodes: u64,
}

#[derive(Default)]
struct SearchStats {
    nodes: u64,
    truncated: bool,
}

/// Search state of a single branch. Children get their own copy.
#[derive(Clone)]
struct Branch {
    used: Vec<bool>,
    own_score: i64,
    opponent_score: i64,
}

impl Branch {
    fn utility(&self) -> i64 {
        self.opponent_score - self.own_score
    }

    fn play(&self, grid: &Grid, pair: &Pair, maximizing: bool) -> Branch {
        let mut next = self.clone();
        next.used[grid.index(pair.first())] = true;
        next.used[grid.index(pair.second())] = true;
        if maximizing {
            next.own_score += grid.cost(pair);
        } else {
            next.opponent_score += grid.cost(pair);
        }
        next
    }
}

/// Depth-bounded minimax player.
///
/// Holds only the grid and its configuration; every call receives the game
/// state explicitly.
///
/// # Examples
/// ```
/// use pairgrid_solver::grid::{Grid, Pair};
/// use pairgrid_solver::minimax::Minimax;
/// use std::collections::HashSet;
///
/// let grid = Grid::new(1, 4, &[vec![0; 4]], &[vec![1, 10, 11, 20]]).unwrap();
/// let ai = Minimax::new(&grid);
/// // Taking the cheap middle pair would leave the opponent nothing, but
/// // taking an end pair forces the opponent into an equally costly one.
/// let best = ai.choose_move(&HashSet::new(), &[], &[]);
/// assert_eq!(best, Some(Pair::new((0, 0), (0, 1))));
/// ```
pub struct Minimax<'g> {
    grid: &'g Grid,
    config: SearchConfig,
}

impl<'g> Minimax<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Self::with_config(grid, SearchConfig::default())
    }

    pub fn with_config(grid: &'g Grid, config: SearchConfig) -> Self {
        Minimax { grid, config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Strict pairs that touch no used cell, in enumeration order. Used cells
    /// outside the grid are ignored.
    pub fn legal_moves(&self, used: &HashSet<Cell>) -> Vec<Pair> {
        enumerate_adjacent(self.grid)
            .into_iter()
            .filter(|p| !used.contains(&p.first()) && !used.contains(&p.second()))
            .collect()
    }

    /// Opponent score minus own score.
    pub fn utility(&self, own_pairs: &[Pair], opponent_pairs: &[Pair]) -> i64 {
        self.grid.score(opponent_pairs) - self.grid.score(own_pairs)
    }

    /// Picks the move maximizing the minimax value for the side to move.
    ///
    /// Ties go to the first move in enumeration order. Returns `None` iff
    /// [`Minimax::legal_moves`] is empty.
    pub fn choose_move(
        &self,
        used: &HashSet<Cell>,
        own_pairs: &[Pair],
        opponent_pairs: &[Pair],
    ) -> Option<Pair> {
        self.search(used, own_pairs, opponent_pairs).best_move
    }

    /// Like [`Minimax::choose_move`], also reporting the value and whether
    /// the depth bound cut the search short.
    ///
    /// Used cells outside the grid are ignored, as in
    /// [`Minimax::legal_moves`].
    ///
    /// # Panics
    /// Panics if a pair of `own_pairs` or `opponent_pairs` leaves the grid.
    pub fn search(
        &self,
        used: &HashSet<Cell>,
        own_pairs: &[Pair],
        opponent_pairs: &[Pair],
    ) -> SearchOutcome {
        let mut root = Branch {
            used: vec![false; self.grid.rows() * self.grid.cols()],
            own_score: self.grid.score(own_pairs),
            opponent_score: self.grid.score(opponent_pairs),
        };
        for &cell in used.iter().filter(|&&cell| self.grid.contains(cell)) {
            root.used[self.grid.index(cell)] = true;
        }

        let mut stats = SearchStats::default();
        let mut best: Option<(Pair, i64)> = None;
        for mv in self.moves(&root) {
            let child = root.play(self.grid, &mv, true);
            let value = self.minimax(&child, false, 0, &mut stats);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((mv, value));
            }
        }

        if stats.truncated {
            log::warn!(
                "maximum recursion depth {} exceeded, evaluation truncated",
                self.config.max_depth
            );
        }
        log::debug!(
            "minimax: best {:?} after {} nodes",
            best.map(|(mv, value)| (mv.to_string(), value)),
            stats.nodes
        );

        SearchOutcome {
            best_move: best.map(|(mv, _)| mv),
            value: best.map(|(_, value)| value),
            truncated: stats.truncated,
            nodes: stats.nodes,
        }
    }

    fn moves(&self, branch: &Branch) -> Vec<Pair> {
        enumerate_adjacent(self.grid)
            .into_iter()
            .filter(|p| {
                !branch.used[self.grid.index(p.first())] && !branch.used[self.grid.index(p.second())]
            })
            .collect()
    }

    fn minimax(&self, branch: &Branch, maximizing: bool, depth: usize, stats: &mut SearchStats) -> i64 {
        stats.nodes += 1;

        let moves = self.moves(branch);
        if moves.is_empty() {
            return branch.utility();
        }
        if depth > self.config.max_depth {
            stats.truncated = true;
            return branch.utility();
        }

        let values = moves
            .iter()
            .map(|mv| self.minimax(&branch.play(self.grid, mv, maximizing), !maximizing, depth + 1, stats));
        // Non-empty, so the fold always replaces the sentinel.
        if maximizing {
            values.fold(i64::MIN, i64::max)
        } else {
            values.fold(i64::MAX, i64::min)
        }
    }
}
