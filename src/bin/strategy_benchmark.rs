use anyhow::Result;
use clap::Parser;
use coin_sorter::engine::{create_initial_state, replay};
use coin_sorter::solver::{solve_with_stats, Strategy};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{warn, Level};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare every search strategy across coin counts", long_about = None)]
struct Args {
    /// Coin counts to evaluate
    #[clap(short = 'n', long, num_args = 1.., default_values_t = [4, 6, 8, 10])]
    coins: Vec<usize>,

    /// Enable debug logging on stderr
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut expansions: HashMap<Strategy, Vec<usize>> = HashMap::new();

    println!("Starting strategy comparison for coin counts {:?}...", args.coins);

    for &coins in &args.coins {
        let initial = create_initial_state(coins)?;
        println!("\nCoins: {}", coins);

        for strategy in Strategy::ALL {
            let started = Instant::now();
            let report = solve_with_stats(strategy, &initial);
            let elapsed = started.elapsed();

            let moves = match &report.moves {
                Some(moves) => {
                    let reaches_goal = replay(&initial, moves)
                        .last()
                        .map_or(initial.is_goal(), |end| end.is_goal());
                    if !reaches_goal {
                        warn!(strategy = strategy.name(), coins, "path does not end in a goal state");
                    }
                    moves.len().to_string()
                }
                None => "none".to_string(),
            };
            println!(
                "  Strategy: {:<26} Moves: {:<6} Expanded: {:<8} Peak frontier: {:<8} Time: {:?}",
                strategy.to_string(),
                moves,
                report.stats.expanded,
                report.stats.peak_frontier,
                elapsed
            );
            expansions
                .entry(strategy)
                .or_default()
                .push(report.stats.expanded);
        }
    }

    println!("\n--- Comparison Complete ---");
    println!("\n--- Average Expanded States ---");

    let mut averages: Vec<(Strategy, f64)> = expansions
        .iter()
        .filter(|(_, counts)| !counts.is_empty())
        .map(|(&strategy, counts)| {
            let total: usize = counts.iter().sum();
            (strategy, total as f64 / counts.len() as f64)
        })
        .collect();

    // Fewest expansions first
    averages.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (strategy, average) in averages {
        println!("Strategy {:<26}: Average Expanded = {:.2}", strategy.to_string(), average);
    }
    Ok(())
}
