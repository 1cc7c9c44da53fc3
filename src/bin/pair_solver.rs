use anyhow::Context;
use clap::{Parser, ValueEnum};
use pairgrid_solver::solver::{GreedySolver, MatchingSolver, PairingSolver};
use pairgrid_solver::utils::grid_from_file;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    Greedy,
    Optimal,
    Extended,
    All,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Pair the cells of a grid file", long_about = None)]
struct Args {
    /// Which solver(s) to run
    #[clap(short, long, value_enum, default_value_t = Method::All)]
    method: Method,

    /// Only read the colors; every cell gets the value 1
    #[clap(long)]
    no_values: bool,

    /// Print the chosen pairs, not just the scores
    #[clap(short, long)]
    verbose: bool,

    /// Path to the grid file (`n m` header, color lines, value lines)
    grid_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let grid = grid_from_file(&args.grid_file, !args.no_values)
        .with_context(|| format!("Failed to read grid from file: {}", args.grid_file.display()))?;
    println!("Loaded grid from {}\n", args.grid_file.display());
    println!("{}", grid);

    let greedy = GreedySolver;
    let optimal = MatchingSolver::new();
    let extended = MatchingSolver::extended();
    let solvers: Vec<&dyn PairingSolver> = match args.method {
        Method::Greedy => vec![&greedy],
        Method::Optimal => vec![&optimal],
        Method::Extended => vec![&extended],
        Method::All => vec![&greedy, &optimal, &extended],
    };

    for solver in solvers {
        let solution = solver.run(&grid);
        println!(
            "{:<18} pairs: {:<4} score: {}",
            solver.name(),
            solution.pairs.len(),
            solution.score
        );
        if args.verbose {
            for pair in &solution.pairs {
                println!("  {} cost {}", pair, grid.cost(pair));
            }
        }
    }
    Ok(())
}
