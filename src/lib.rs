//! # Coin Sorter Library
//!
//! This library provides the puzzle logic for the coin-sorting puzzle and a
//! generic state-space search engine with four strategies to solve it.
//!
//! N coins of distinct ranks start on the relay peg `E`, largest at the
//! bottom. They must end up with every odd coin on `A` or `C`, every even coin
//! on `B` or `D`, and `E` empty. A coin may only be placed on a larger coin,
//! and target pegs only accept coins of their parity.
//!
//! It is used by two binaries:
//! - `coin_solver`: Solves one puzzle with a chosen strategy and replays the
//!   moves step by step.
//! - `strategy_benchmark`: Runs every strategy across coin counts and compares
//!   path lengths and search effort.
//!
//! ## Modules
//! - `engine`: Pegs, moves and the immutable puzzle `State`, with move
//!   validation, move generation, the goal predicate and replay.
//! - `heuristics`: The misplaced-coin estimate used by informed strategies.
//! - `search`: The `SearchProblem` trait, frontier disciplines and the shared
//!   graph-search loop.
//! - `solver`: The `Strategy` enum and the `solve` entry points.
//! - `utils`: Parsing states from their text form.
//! - `error`: The library error type.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod search;
pub mod solver;
pub mod utils;
