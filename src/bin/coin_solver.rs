use anyhow::{Context, Result};
use clap::Parser;
use coin_sorter::engine::{create_initial_state, replay, State};
use coin_sorter::solver::{solve_with_stats, Strategy};
use coin_sorter::utils::state_from_str;
use tracing::Level;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of coins on the relay peg (4, 6, 8 or 10)
    #[clap(short = 'n', long, default_value_t = 4)]
    coins: usize,

    /// Search strategy
    #[clap(short, long, value_enum, default_value_t = Strategy::AStar)]
    algorithm: Strategy,

    /// Start from this state instead, e.g. "A: [1] | E: [4, 3, 2]"
    #[clap(long, conflicts_with = "scramble")]
    state: Option<String>,

    /// Start from a random walk of this many valid moves
    #[clap(long)]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[clap(long, default_value_t = 514514)]
    seed: u64,

    /// Print only the summary, not every intermediate state
    #[clap(short, long)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[clap(short, long)]
    verbose: bool,
}

fn initial_state(args: &Args) -> Result<State> {
    if let Some(text) = &args.state {
        return state_from_str(text).with_context(|| format!("Invalid --state '{}'", text));
    }
    let initial = create_initial_state(args.coins)?;
    Ok(match args.scramble {
        // Supported counts fit in a u8.
        Some(steps) => State::scrambled(args.coins as u8, steps, args.seed),
        None => initial,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let initial = initial_state(&args)?;

    println!("Solving with {}...", args.algorithm);
    let report = solve_with_stats(args.algorithm, &initial);

    let Some(moves) = report.moves else {
        println!("No solution found");
        println!("Expanded {} states", report.stats.expanded);
        return Ok(());
    };

    println!("\nSolution found in {} moves:", moves.len());
    println!("Initial state: {}", initial);
    if !args.quiet {
        for (i, (mv, state)) in moves.iter().zip(replay(&initial, &moves)).enumerate() {
            println!("Move {}: {}", i + 1, mv);
            println!("State: {}", state);
        }
    }
    println!(
        "\nExpanded {} states, generated {}, peak frontier {}",
        report.stats.expanded, report.stats.generated, report.stats.peak_frontier
    );
    Ok(())
}
