//! Two-player session state for the pairing game.
//!
//! A `Duel` owns the per-game state (side to move, used cells, each side's
//! pairs, and the move history for undo) and hands it explicitly to the
//! search when an AI move is requested.
use crate::grid::{Cell, Grid, Pair};
use crate::minimax::Minimax;
use std::collections::HashSet;
use std::fmt;

/// One of the two sides of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    fn slot(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "player 1"),
            Player::Second => write!(f, "player 2"),
        }
    }
}

/// Why a move was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("{0} is not a valid pair")]
    InvalidPair(Pair),
    #[error("cell {0:?} is already taken")]
    CellTaken(Cell),
}

/// Manages the state of a pairing duel.
///
/// # Examples
/// ```
/// use pairgrid_solver::game::{Duel, Player};
/// use pairgrid_solver::grid::{Grid, Pair};
/// use pairgrid_solver::minimax::Minimax;
///
/// let grid = Grid::new(1, 4, &[vec![0; 4]], &[vec![1, 10, 11, 20]]).unwrap();
/// let mut duel = Duel::new(&grid, Player::First);
/// duel.play(Pair::new((0, 1), (0, 2))).unwrap();
/// assert!(duel.is_over());
/// assert_eq!(duel.score(Player::First), 1);
///
/// duel.undo();
/// let ai = Minimax::new(&grid);
/// assert_eq!(duel.play_ai(&ai), Some(Pair::new((0, 0), (0, 1))));
/// assert_eq!(duel.to_move(), Player::Second);
/// ```
#[derive(Clone, Debug)]
pub struct Duel<'g> {
    grid: &'g Grid,
    to_move: Player,
    used: HashSet<Cell>,
    pairs: [Vec<Pair>; 2],
    history: Vec<Player>,
}

impl<'g> Duel<'g> {
    /// Starts a duel on `grid` with `first` to move.
    pub fn new(grid: &'g Grid, first: Player) -> Self {
        Duel {
            grid,
            to_move: first,
            used: HashSet::new(),
            pairs: [Vec::new(), Vec::new()],
            history: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Cells claimed by either side.
    pub fn used(&self) -> &HashSet<Cell> {
        &self.used
    }

    /// Pairs claimed so far by `player`, in play order.
    pub fn pairs(&self, player: Player) -> &[Pair] {
        &self.pairs[player.slot()]
    }

    /// Total cost of the pairs claimed by `player`.
    pub fn score(&self, player: Player) -> i64 {
        self.grid.score(self.pairs(player))
    }

    /// Number of moves played so far.
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    /// Claims `pair` for the side to move and passes the turn.
    ///
    /// The pair must satisfy the strict pairing rule and both of its cells
    /// must be free.
    pub fn play(&mut self, pair: Pair) -> Result<(), MoveError> {
        let (a, b) = pair.cells();
        if !self.grid.contains(a) || !self.grid.contains(b) || !self.grid.valid_pair(a, b) {
            return Err(MoveError::InvalidPair(pair));
        }
        if let Some(&taken) = [a, b].iter().find(|c| self.used.contains(*c)) {
            return Err(MoveError::CellTaken(taken));
        }

        self.used.insert(a);
        self.used.insert(b);
        self.pairs[self.to_move.slot()].push(pair);
        self.history.push(self.to_move);
        self.to_move = self.to_move.other();
        Ok(())
    }

    /// Lets the search pick and play a move for the side to move.
    ///
    /// Returns the pair played, or `None` if the side to move has no legal
    /// move.
    pub fn play_ai(&mut self, ai: &Minimax<'_>) -> Option<Pair> {
        let me = self.to_move;
        let choice = ai.choose_move(&self.used, self.pairs(me), self.pairs(me.other()))?;
        match self.play(choice) {
            Ok(()) => Some(choice),
            Err(err) => {
                log::error!("search proposed an illegal move: {}", err);
                None
            }
        }
    }

    /// Undoes the last move and gives the turn back to whoever played it.
    ///
    /// Returns `false` if no move has been played yet.
    pub fn undo(&mut self) -> bool {
        let Some(player) = self.history.pop() else {
            return false;
        };
        if let Some(pair) = self.pairs[player.slot()].pop() {
            self.used.remove(&pair.first());
            self.used.remove(&pair.second());
        }
        self.to_move = player;
        true
    }

    /// True when no strict pair of free cells remains.
    pub fn is_over(&self) -> bool {
        crate::pairs::enumerate_adjacent(self.grid)
            .iter()
            .all(|p| self.used.contains(&p.first()) || self.used.contains(&p.second()))
    }

    /// The side with the lower score, or `None` on a tie.
    pub fn winner(&self) -> Option<Player> {
        let (first, second) = (self.score(Player::First), self.score(Player::Second));
        match first.cmp(&second) {
            std::cmp::Ordering::Less => Some(Player::First),
            std::cmp::Ordering::Greater => Some(Player::Second),
            std::cmp::Ordering::Equal => None,
        }
    }
}
