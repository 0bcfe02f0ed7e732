use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::engine::{valid_moves, Move, State, StateKey};
use crate::error::SolverError;
use crate::heuristics::misplaced_coins;
use crate::search::{
    graph_search, FifoFrontier, LifoFrontier, PriorityFrontier, PriorityKey, SearchOutcome,
    SearchProblem, SearchStats,
};

/// The coin-sorting puzzle as a [`SearchProblem`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CoinPuzzle;

impl SearchProblem for CoinPuzzle {
    type State = State;
    type Key = StateKey;
    type Move = Move;

    fn key(&self, state: &State) -> StateKey {
        state.key()
    }

    fn successors(&self, state: &State) -> Vec<(Move, State)> {
        valid_moves(state)
            .into_iter()
            .map(|mv| (mv, state.apply_move(mv.from, mv.to)))
            .collect()
    }

    fn is_goal(&self, state: &State) -> bool {
        state.is_goal()
    }

    fn heuristic(&self, state: &State) -> u32 {
        misplaced_coins(state)
    }
}

/// The four search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Depth-first search (LIFO frontier).
    #[value(name = "dfs")]
    Dfs,
    /// Breadth-first search (FIFO frontier); returns a shortest path.
    #[value(name = "bfs")]
    Bfs,
    /// Greedy best-first search ordered by the misplaced-coin count.
    #[value(name = "greedy")]
    Greedy,
    /// A* ordered by moves so far plus the misplaced-coin count; returns a
    /// shortest path.
    #[value(name = "astar")]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Dfs,
        Strategy::Bfs,
        Strategy::Greedy,
        Strategy::AStar,
    ];

    /// Short name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
        }
    }

    /// Runs this strategy on any [`SearchProblem`].
    pub fn run<P: SearchProblem>(self, problem: &P, start: P::State) -> SearchOutcome<P::Move> {
        match self {
            Strategy::Dfs => {
                graph_search(problem, start, LifoFrontier::default(), PriorityKey::Arrival)
            }
            Strategy::Bfs => {
                graph_search(problem, start, FifoFrontier::default(), PriorityKey::Arrival)
            }
            Strategy::Greedy => graph_search(
                problem,
                start,
                PriorityFrontier::default(),
                PriorityKey::Heuristic,
            ),
            Strategy::AStar => graph_search(
                problem,
                start,
                PriorityFrontier::default(),
                PriorityKey::HeuristicPlusCost,
            ),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strategy::Dfs => "Depth-first search",
            Strategy::Bfs => "Breadth-first search",
            Strategy::Greedy => "Greedy best-first search",
            Strategy::AStar => "A* search",
        };
        f.write_str(label)
    }
}

impl FromStr for Strategy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == lowered)
            .ok_or_else(|| SolverError::UnknownStrategy(s.to_string()))
    }
}

/// A solver run: the moves found (if any) and the search counters.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub strategy: Strategy,
    pub moves: Option<Vec<Move>>,
    pub stats: SearchStats,
}

/// Solves the puzzle from `initial` and keeps the search counters.
pub fn solve_with_stats(strategy: Strategy, initial: &State) -> SearchReport {
    let outcome = strategy.run(&CoinPuzzle, initial.clone());
    match &outcome.path {
        Some(path) => info!(
            strategy = strategy.name(),
            moves = path.len(),
            expanded = outcome.stats.expanded,
            "solution found"
        ),
        None => info!(
            strategy = strategy.name(),
            expanded = outcome.stats.expanded,
            "no solution"
        ),
    }
    SearchReport {
        strategy,
        moves: outcome.path,
        stats: outcome.stats,
    }
}

/// Solves the puzzle from `initial`, returning the move sequence or `None`
/// when no goal state is reachable.
///
/// # Examples
/// ```
/// use coin_sorter::engine::{create_initial_state, replay};
/// use coin_sorter::solver::{solve, Strategy};
/// let initial = create_initial_state(4).unwrap();
/// let moves = solve(Strategy::Bfs, &initial).unwrap();
/// assert_eq!(moves.len(), 4);
/// assert!(replay(&initial, &moves).last().unwrap().is_goal());
/// ```
pub fn solve(strategy: Strategy, initial: &State) -> Option<Vec<Move>> {
    solve_with_stats(strategy, initial).moves
}

/// Like [`solve`], selecting the strategy by name (`dfs`, `bfs`, `greedy`, `astar`).
///
/// # Errors
/// Returns [`SolverError::UnknownStrategy`] for any other name.
pub fn solve_by_name(name: &str, initial: &State) -> Result<Option<Vec<Move>>, SolverError> {
    let strategy: Strategy = name.parse()?;
    Ok(solve(strategy, initial))
}
