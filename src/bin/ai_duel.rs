use anyhow::Context;
use clap::{Parser, ValueEnum};
use pairgrid_solver::game::{Duel, Player};
use pairgrid_solver::grid::{Grid, Pair};
use pairgrid_solver::minimax::{Minimax, SearchConfig, MAXIMUM_RECURSION_DEPTH};
use pairgrid_solver::utils::grid_from_file;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Opponent {
    /// Another minimax player
    Minimax,
    /// Always takes the cheapest legal pair
    Greedy,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Let the minimax AI play the pairing game", long_about = None)]
struct Args {
    /// Grid file to play on; a random grid is generated when omitted
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// Only read the colors from the grid file
    #[clap(long)]
    no_values: bool,

    /// Seed of the random grid
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Rows of the random grid
    #[clap(long, default_value_t = 3)]
    rows: usize,

    /// Columns of the random grid
    #[clap(long, default_value_t = 4)]
    cols: usize,

    /// Largest cell value of the random grid
    #[clap(long, default_value_t = 20)]
    max_value: i64,

    /// Recursion depth bound of the search
    #[clap(short = 'd', long, default_value_t = MAXIMUM_RECURSION_DEPTH)]
    max_depth: usize,

    /// Who the AI plays against
    #[clap(long, value_enum, default_value_t = Opponent::Greedy)]
    opponent: Opponent,

    /// Let the opponent move first
    #[clap(long)]
    opponent_first: bool,
}

fn greedy_move(ai: &Minimax<'_>, duel: &Duel<'_>) -> Option<Pair> {
    ai.legal_moves(duel.used())
        .into_iter()
        .min_by_key(|pair| duel.grid().cost(pair))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let grid = match &args.file {
        Some(path) => grid_from_file(path, !args.no_values)
            .with_context(|| format!("Failed to read grid from file: {}", path.display()))?,
        None => Grid::random_with_seed(args.rows, args.cols, args.seed, args.max_value),
    };
    println!("Initial grid:\n{}", grid);

    let ai = Minimax::with_config(&grid, SearchConfig { max_depth: args.max_depth });
    let ai_side = if args.opponent_first { Player::Second } else { Player::First };
    let mut duel = Duel::new(&grid, Player::First);

    while !duel.is_over() {
        let mover = duel.to_move();
        let played = if mover == ai_side || args.opponent == Opponent::Minimax {
            duel.play_ai(&ai)
        } else {
            match greedy_move(&ai, &duel) {
                Some(pair) => duel.play(pair).ok().map(|_| pair),
                None => None,
            }
        };
        let Some(pair) = played else {
            break;
        };
        let who = if mover == ai_side { "AI" } else { "opponent" };
        println!(
            "Move {:<3} {:<8} {} cost {}",
            duel.moves_played(),
            who,
            pair,
            grid.cost(&pair)
        );
    }

    let ai_score = duel.score(ai_side);
    let opponent_score = duel.score(ai_side.other());
    println!("\nAI score:       {}", ai_score);
    println!("Opponent score: {}", opponent_score);
    match duel.winner() {
        Some(side) if side == ai_side => println!("The AI wins."),
        Some(_) => println!("The opponent wins."),
        None => println!("Draw."),
    }
    Ok(())
}
