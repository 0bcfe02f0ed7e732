//! Generic graph search over any [`SearchProblem`].
//!
//! One search loop serves every strategy; strategies differ only in the
//! frontier discipline and in how a node's priority is computed:
//! - [`LifoFrontier`]: last in, first out (depth-first).
//! - [`FifoFrontier`]: first in, first out (breadth-first).
//! - [`PriorityFrontier`]: smallest priority first, ties broken by insertion
//!   order (greedy best-first and A*).
//!
//! States are marked visited when expanded, not when enqueued. Duplicate
//! entries for the same state are normal and are dropped when popped.
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::hash::Hash;

use tracing::{debug, trace};

/// A state graph that can be searched.
pub trait SearchProblem {
    type State: Clone;
    /// Canonical identity used by the visited set.
    type Key: Eq + Hash;
    type Move: Clone;

    fn key(&self, state: &Self::State) -> Self::Key;

    /// Returns every `(move, successor)` pair of `state`, in a deterministic order.
    fn successors(&self, state: &Self::State) -> Vec<(Self::Move, Self::State)>;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Estimated number of moves left. Only consulted by informed orderings.
    fn heuristic(&self, state: &Self::State) -> u32;
}

/// A pending entry: a state plus the moves that reached it.
#[derive(Clone, Debug)]
pub struct Node<S, M> {
    pub state: S,
    pub path: Vec<M>,
}

impl<S, M> Node<S, M> {
    /// Path cost so far; every move costs 1.
    pub fn cost(&self) -> u32 {
        self.path.len() as u32
    }
}

/// Container of pending nodes. `priority` is ignored by the uninformed
/// disciplines.
pub trait Frontier<T> {
    fn push(&mut self, item: T, priority: u32);
    fn pop(&mut self) -> Option<T>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct LifoFrontier<T> {
    items: Vec<T>,
}

impl<T> Default for LifoFrontier<T> {
    fn default() -> Self {
        LifoFrontier { items: Vec::new() }
    }
}

impl<T> Frontier<T> for LifoFrontier<T> {
    fn push(&mut self, item: T, _priority: u32) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug)]
pub struct FifoFrontier<T> {
    items: VecDeque<T>,
}

impl<T> Default for FifoFrontier<T> {
    fn default() -> Self {
        FifoFrontier {
            items: VecDeque::new(),
        }
    }
}

impl<T> Frontier<T> for FifoFrontier<T> {
    fn push(&mut self, item: T, _priority: u32) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Heap entry ordered by `(priority, seq)` only; the payload never takes part
/// in comparisons.
#[derive(Debug)]
struct PriorityEntry<T> {
    priority: u32,
    seq: u64,
    item: T,
}

impl<T> PartialEq for PriorityEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for PriorityEntry<T> {}

impl<T> Ord for PriorityEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<T> PartialOrd for PriorityEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority frontier. Among equal priorities the earliest pushed entry
/// is popped first.
#[derive(Debug)]
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<Reverse<PriorityEntry<T>>>,
    next_seq: u64,
}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Frontier<T> for PriorityFrontier<T> {
    fn push(&mut self, item: T, priority: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(PriorityEntry {
            priority,
            seq,
            item,
        }));
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|Reverse(entry)| entry.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// How a node's frontier priority is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityKey {
    /// No priority; the frontier's own discipline decides.
    Arrival,
    /// `h(state)`.
    Heuristic,
    /// `h(state) + cost so far`.
    HeuristicPlusCost,
}

impl PriorityKey {
    fn score<P: SearchProblem>(self, problem: &P, node: &Node<P::State, P::Move>) -> u32 {
        match self {
            PriorityKey::Arrival => 0,
            PriorityKey::Heuristic => problem.heuristic(&node.state),
            PriorityKey::HeuristicPlusCost => problem.heuristic(&node.state) + node.cost(),
        }
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped and expanded (each distinct state at most once).
    pub expanded: usize,
    /// Successor nodes pushed onto the frontier.
    pub generated: usize,
    /// Popped nodes dropped because their state was already expanded.
    pub duplicates: usize,
    /// Largest frontier size observed.
    pub peak_frontier: usize,
}

/// Result of a search: the path to the first goal popped, if any.
#[derive(Clone, Debug)]
pub struct SearchOutcome<M> {
    pub path: Option<Vec<M>>,
    pub stats: SearchStats,
}

/// Runs graph search from `start` using `frontier` and `key`.
///
/// The frontier and visited set live only for this call. The search ends when
/// a goal node is popped (its path is returned) or when the frontier runs dry
/// (`path` is `None`). Termination on finite graphs follows from expanding
/// each state at most once.
pub fn graph_search<P, F>(
    problem: &P,
    start: P::State,
    mut frontier: F,
    key: PriorityKey,
) -> SearchOutcome<P::Move>
where
    P: SearchProblem,
    F: Frontier<Node<P::State, P::Move>>,
{
    let mut visited: HashSet<P::Key> = HashSet::new();
    let mut stats = SearchStats::default();

    let root = Node {
        state: start,
        path: Vec::new(),
    };
    let priority = key.score(problem, &root);
    frontier.push(root, priority);
    stats.peak_frontier = 1;

    while let Some(node) = frontier.pop() {
        if problem.is_goal(&node.state) {
            debug!(
                moves = node.path.len(),
                expanded = stats.expanded,
                generated = stats.generated,
                "goal reached"
            );
            return SearchOutcome {
                path: Some(node.path),
                stats,
            };
        }

        if !visited.insert(problem.key(&node.state)) {
            stats.duplicates += 1;
            continue;
        }
        stats.expanded += 1;
        trace!(depth = node.path.len(), frontier = frontier.len(), "expanding");

        for (mv, next) in problem.successors(&node.state) {
            let mut path = node.path.clone();
            path.push(mv);
            let child = Node { state: next, path };
            let priority = key.score(problem, &child);
            frontier.push(child, priority);
            stats.generated += 1;
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    debug!(
        expanded = stats.expanded,
        generated = stats.generated,
        "frontier exhausted without reaching a goal"
    );
    SearchOutcome { path: None, stats }
}
