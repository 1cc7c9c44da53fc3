//! # Pairgrid Solver Library
//!
//! This library provides the core logic of the colored-grid pairing game:
//! cells of a grid are paired under adjacency and color rules, and a pairing
//! costs the sum of the absolute value differences inside its pairs.
//!
//! It is used by three binaries:
//! - `pair_solver`: loads a grid file and prints greedy and optimal pairings.
//! - `ai_duel`: lets the minimax AI play the pairing game against an opponent.
//! - `solver_evaluator`: compares the solvers over random grids.
//!
//! ## Modules
//! - `grid`: the grid model (`Grid`, `Color`, `Pair`), compatibility predicates
//!   and cost evaluation.
//! - `pairs`: strict and extended candidate pair enumeration.
//! - `solver`: the greedy solver and the optimal matching solver.
//! - `matching`: maximum-weight matching on general graphs.
//! - `minimax`: depth-bounded adversarial search.
//! - `game`: two-player session state (`Duel`) built on the search.
//! - `utils`: parsing grids from their text format.

pub mod game;
pub mod grid;
pub mod matching;
pub mod minimax;
pub mod pairs;
pub mod solver;
pub mod utils;

pub use crate::grid::{Cell, Color, FormatError, Grid, Pair, MAX_CELL_VALUE};
pub use crate::solver::{GreedySolver, MatchingSolver, PairingSolver, Solution};
