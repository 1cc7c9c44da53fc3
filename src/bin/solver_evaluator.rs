use clap::Parser;
use pairgrid_solver::grid::Grid;
use pairgrid_solver::solver::{GreedySolver, MatchingSolver, PairingSolver};
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare the pairing solvers on random grids", long_about = None)]
struct Args {
    /// Number of random grids to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first grid; grid `i` uses `seed + i`
    #[clap(long, default_value_t = 0)]
    seed: u64,

    #[clap(long, default_value_t = 8)]
    rows: usize,

    #[clap(long, default_value_t = 8)]
    cols: usize,

    /// Largest cell value
    #[clap(long, default_value_t = 50)]
    max_value: i64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let greedy = GreedySolver;
    let optimal = MatchingSolver::new();
    let extended = MatchingSolver::extended();
    let solvers: Vec<&dyn PairingSolver> = vec![&greedy, &optimal, &extended];

    // name -> (total score, total pairs)
    let mut totals: HashMap<&str, (i64, usize)> = HashMap::new();

    println!(
        "Starting solver evaluation for {} {}x{} grids...",
        args.boards, args.rows, args.cols
    );

    for board_idx in 0..args.boards {
        let seed = args.seed + board_idx as u64;
        let grid = Grid::random_with_seed(args.rows, args.cols, seed, args.max_value);
        println!("\nEvaluating Grid {} (Seed: {})", board_idx, seed);

        for solver in &solvers {
            let solution = solver.run(&grid);
            println!(
                "  Solver: {:<18} Pairs: {:<4} Score: {}",
                solver.name(),
                solution.pairs.len(),
                solution.score
            );
            let entry = totals.entry(solver.name()).or_insert((0, 0));
            entry.0 += solution.score;
            entry.1 += solution.pairs.len();
        }
    }

    if args.boards == 0 {
        println!("No grids evaluated.");
        return;
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Averages per grid ---");
    for solver in &solvers {
        let (score, pairs) = totals.get(solver.name()).copied().unwrap_or((0, 0));
        println!(
            "Solver {:<18}: Average Pairs = {:.2}, Average Score = {:.2}",
            solver.name(),
            pairs as f64 / args.boards as f64,
            score as f64 / args.boards as f64
        );
    }
}
