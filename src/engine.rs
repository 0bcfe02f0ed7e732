//! Core puzzle engine for the coin-sorting puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Peg`: The five stack positions and their static classification.
//! - `Move`: A single coin transfer between two pegs.
//! - `State`: An immutable snapshot of all five stacks, with move validation,
//!   move application, the goal predicate and a canonical key for hashing.
//! - `valid_moves` / `replay`: Move generation and path replay helpers.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

use crate::error::SolverError;

/// A coin's rank. Ranks start at 1; the rank is also the coin's parity class
/// and its stacking-order key.
pub type Coin = u8;

/// Number of pegs in the fixed puzzle layout.
pub const PEG_COUNT: usize = 5;

/// Coin counts accepted by [`create_initial_state`].
pub const SUPPORTED_COIN_COUNTS: [usize; 4] = [4, 6, 8, 10];

/// Static role of a peg in the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PegKind {
    /// Must hold only odd coins in the goal state.
    Odd,
    /// Must hold only even coins in the goal state.
    Even,
    /// Holds every coin initially and accepts any parity as a relay.
    Relay,
}

/// One of the five labeled stack positions.
///
/// `A` and `C` are odd targets, `B` and `D` are even targets and `E` is the
/// source/relay peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Peg {
    A,
    B,
    C,
    D,
    E,
}

impl Peg {
    /// All pegs in label order. Move generation enumerates in this order.
    pub const ALL: [Peg; PEG_COUNT] = [Peg::A, Peg::B, Peg::C, Peg::D, Peg::E];

    /// The peg reserved as source and relay.
    pub const RELAY: Peg = Peg::E;

    /// Returns the static classification of this peg.
    pub fn kind(self) -> PegKind {
        match self {
            Peg::A | Peg::C => PegKind::Odd,
            Peg::B | Peg::D => PegKind::Even,
            Peg::E => PegKind::Relay,
        }
    }

    /// Returns whether a coin of this rank's parity may be placed here.
    ///
    /// # Examples
    ///
    /// ```
    /// use coin_sorter::engine::Peg;
    /// assert!(Peg::A.accepts_parity_of(3));
    /// assert!(!Peg::A.accepts_parity_of(2));
    /// assert!(Peg::E.accepts_parity_of(2));
    /// ```
    pub fn accepts_parity_of(self, coin: Coin) -> bool {
        match self.kind() {
            PegKind::Odd => is_odd(coin),
            PegKind::Even => !is_odd(coin),
            PegKind::Relay => true,
        }
    }

    /// Converts the peg to its character label.
    pub fn to_char(self) -> char {
        match self {
            Peg::A => 'A',
            Peg::B => 'B',
            Peg::C => 'C',
            Peg::D => 'D',
            Peg::E => 'E',
        }
    }

    /// Parses a peg label, case-insensitively.
    pub fn from_char(c: char) -> Option<Peg> {
        match c.to_ascii_uppercase() {
            'A' => Some(Peg::A),
            'B' => Some(Peg::B),
            'C' => Some(Peg::C),
            'D' => Some(Peg::D),
            'E' => Some(Peg::E),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Peg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

fn is_odd(coin: Coin) -> bool {
    coin % 2 == 1
}

/// Moves the top coin of `from` onto `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Peg,
    pub to: Peg,
}

impl Move {
    pub fn new(from: Peg, to: Peg) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Canonical identity of a [`State`] for visited sets.
///
/// Each stack's ranks are written bottom-to-top followed by a `0` separator,
/// pegs in label order. Ranks are never zero, so the encoding is unambiguous
/// and two keys are equal iff the states are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Vec<u8>);

impl StateKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A snapshot of the five peg stacks.
///
/// Stacks are stored bottom-to-top; the last element is the top coin. States
/// are never mutated once built: [`State::apply_move`] returns a new state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct State {
    stacks: [Vec<Coin>; PEG_COUNT],
}

impl State {
    /// Creates the initial layout for `coins` coins: ranks `coins..=1` on the
    /// relay peg from bottom to top, every other peg empty.
    ///
    /// No validation is performed on the count; see [`create_initial_state`]
    /// for the checked constructor.
    ///
    /// # Examples
    /// ```
    /// use coin_sorter::engine::{Peg, State};
    /// let state = State::new(4);
    /// assert_eq!(state.stack(Peg::E), &[4, 3, 2, 1]);
    /// assert_eq!(state.top(Peg::E), Some(1));
    /// assert!(state.stack(Peg::A).is_empty());
    /// ```
    pub fn new(coins: u8) -> Self {
        let mut stacks: [Vec<Coin>; PEG_COUNT] = Default::default();
        stacks[Peg::RELAY.index()] = (1..=coins).rev().collect();
        State { stacks }
    }

    /// Builds a state from explicit stacks, indexed in [`Peg::ALL`] order.
    ///
    /// The caller is responsible for the layout; nothing is checked here.
    /// [`crate::utils::state_from_str`] is the validating alternative.
    pub fn from_stacks(stacks: [Vec<Coin>; PEG_COUNT]) -> Self {
        State { stacks }
    }

    /// Creates a reproducible scrambled start: `steps` uniformly chosen valid
    /// moves applied to the initial layout, seeded with `seed`.
    ///
    /// The walk stops early only if a state has no valid moves, which cannot
    /// happen with at least one coin.
    pub fn scrambled(coins: u8, steps: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = State::new(coins);
        for _ in 0..steps {
            let moves = valid_moves(&state);
            match moves.choose(&mut rng) {
                Some(mv) => state = state.apply_move(mv.from, mv.to),
                None => break,
            }
        }
        state
    }

    /// Returns the stack on `peg`, bottom first.
    pub fn stack(&self, peg: Peg) -> &[Coin] {
        &self.stacks[peg.index()]
    }

    /// Returns the top coin on `peg`, if any.
    pub fn top(&self, peg: Peg) -> Option<Coin> {
        self.stacks[peg.index()].last().copied()
    }

    /// Total number of coins across all pegs.
    pub fn coin_count(&self) -> usize {
        self.stacks.iter().map(Vec::len).sum()
    }

    /// Checks whether moving the top coin of `from` onto `to` is legal.
    ///
    /// A move is rejected when:
    /// - `from` and `to` are the same peg, or `from` is empty;
    /// - the coin's parity does not match a target peg (the relay accepts both);
    /// - the destination top is smaller than the moving coin;
    /// - the destination top has a different parity and `to` is not the relay.
    ///
    /// # Examples
    /// ```
    /// use coin_sorter::engine::{Peg, State};
    /// let state = State::new(4);
    /// assert!(state.is_valid_move(Peg::E, Peg::A)); // coin 1 is odd
    /// assert!(!state.is_valid_move(Peg::E, Peg::B));
    /// assert!(!state.is_valid_move(Peg::A, Peg::E)); // A is empty
    /// ```
    pub fn is_valid_move(&self, from: Peg, to: Peg) -> bool {
        if from == to {
            return false;
        }
        let Some(coin) = self.top(from) else {
            return false;
        };
        if !to.accepts_parity_of(coin) {
            return false;
        }
        match self.top(to) {
            None => true,
            Some(top) if coin > top => false,
            Some(top) => is_odd(top) == is_odd(coin) || to == Peg::RELAY,
        }
    }

    /// Applies a move and returns the resulting state.
    ///
    /// The move must satisfy [`State::is_valid_move`]; debug builds assert it.
    /// Use [`State::try_move`] when the move comes from an untrusted source.
    pub fn apply_move(&self, from: Peg, to: Peg) -> State {
        debug_assert!(
            self.is_valid_move(from, to),
            "apply_move called with illegal move {} -> {} on {}",
            from,
            to,
            self
        );
        let mut next = self.clone();
        if let Some(coin) = next.stacks[from.index()].pop() {
            next.stacks[to.index()].push(coin);
        }
        next
    }

    /// Checked variant of [`State::apply_move`].
    ///
    /// # Errors
    /// Returns [`SolverError::IllegalMove`] with `step` 0 if the move is not legal.
    pub fn try_move(&self, from: Peg, to: Peg) -> Result<State, SolverError> {
        if !self.is_valid_move(from, to) {
            return Err(SolverError::IllegalMove {
                step: 0,
                mv: Move::new(from, to),
            });
        }
        Ok(self.apply_move(from, to))
    }

    /// Returns true when the relay peg is empty, odd targets hold only odd
    /// coins and even targets hold only even coins.
    pub fn is_goal(&self) -> bool {
        Peg::ALL.iter().all(|&peg| match peg.kind() {
            PegKind::Relay => self.stack(peg).is_empty(),
            _ => self.stack(peg).iter().all(|&coin| peg.accepts_parity_of(coin)),
        })
    }

    /// Returns the canonical key of this state.
    pub fn key(&self) -> StateKey {
        let mut bytes = Vec::with_capacity(self.coin_count() + PEG_COUNT);
        for stack in &self.stacks {
            bytes.extend_from_slice(stack);
            bytes.push(0);
        }
        StateKey(bytes)
    }
}

impl fmt::Display for State {
    /// Formats the state as `A: [..] | B: [..] | C: [..] | D: [..] | E: [..]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, peg) in Peg::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}: {:?}", peg, self.stack(*peg))?;
        }
        Ok(())
    }
}

/// Creates the initial state for a supported coin count.
///
/// # Errors
/// Returns [`SolverError::InvalidCoinCount`] unless `coin_count` is one of
/// [`SUPPORTED_COIN_COUNTS`].
pub fn create_initial_state(coin_count: usize) -> Result<State, SolverError> {
    if !SUPPORTED_COIN_COUNTS.contains(&coin_count) {
        return Err(SolverError::InvalidCoinCount(coin_count));
    }
    // Every supported count fits in a u8.
    Ok(State::new(coin_count as u8))
}

/// Enumerates every legal move from `state`.
///
/// Pairs are visited in label order (`A -> B`, `A -> C`, ..., `E -> D`), so the
/// result is deterministic for a given state.
pub fn valid_moves(state: &State) -> Vec<Move> {
    let mut moves = Vec::new();
    for &from in &Peg::ALL {
        for &to in &Peg::ALL {
            if state.is_valid_move(from, to) {
                moves.push(Move::new(from, to));
            }
        }
    }
    moves
}

/// Replays `moves` from `initial`, returning one state per move.
///
/// The moves must be legal in sequence, as produced by a solver.
pub fn replay(initial: &State, moves: &[Move]) -> Vec<State> {
    let mut states = Vec::with_capacity(moves.len());
    let mut current = initial.clone();
    for mv in moves {
        current = current.apply_move(mv.from, mv.to);
        states.push(current.clone());
    }
    states
}

/// Replays `moves` from `initial`, validating every move.
///
/// # Errors
/// Returns [`SolverError::IllegalMove`] carrying the 1-based step of the first
/// illegal move.
pub fn replay_checked(initial: &State, moves: &[Move]) -> Result<Vec<State>, SolverError> {
    let mut states = Vec::with_capacity(moves.len());
    let mut current = initial.clone();
    for (i, mv) in moves.iter().enumerate() {
        if !current.is_valid_move(mv.from, mv.to) {
            return Err(SolverError::IllegalMove {
                step: i + 1,
                mv: *mv,
            });
        }
        current = current.apply_move(mv.from, mv.to);
        states.push(current.clone());
    }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn stacks(a: &[Coin], b: &[Coin], c: &[Coin], d: &[Coin], e: &[Coin]) -> State {
        State::from_stacks([a.to_vec(), b.to_vec(), c.to_vec(), d.to_vec(), e.to_vec()])
    }

    fn sorted_coins(state: &State) -> Vec<Coin> {
        let mut all: Vec<Coin> = Peg::ALL
            .iter()
            .flat_map(|&p| state.stack(p).iter().copied())
            .collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn test_initial_state_layout() {
        for n in SUPPORTED_COIN_COUNTS {
            let state = create_initial_state(n).unwrap();
            let expected: Vec<Coin> = (1..=n as Coin).rev().collect();
            assert_eq!(state.stack(Peg::E), expected.as_slice());
            assert_eq!(state.top(Peg::E), Some(1));
            for peg in [Peg::A, Peg::B, Peg::C, Peg::D] {
                assert!(state.stack(peg).is_empty(), "peg {} should be empty", peg);
            }
            assert_eq!(state.coin_count(), n);
        }
    }

    #[test]
    fn test_create_initial_state_rejects_unsupported_counts() {
        for n in [0, 1, 3, 5, 7, 12] {
            assert!(matches!(
                create_initial_state(n),
                Err(SolverError::InvalidCoinCount(c)) if c == n
            ));
        }
    }

    #[test]
    fn test_peg_kinds() {
        assert_eq!(Peg::A.kind(), PegKind::Odd);
        assert_eq!(Peg::C.kind(), PegKind::Odd);
        assert_eq!(Peg::B.kind(), PegKind::Even);
        assert_eq!(Peg::D.kind(), PegKind::Even);
        assert_eq!(Peg::E.kind(), PegKind::Relay);
        for peg in Peg::ALL {
            assert_eq!(Peg::from_char(peg.to_char()), Some(peg));
        }
        assert_eq!(Peg::from_char('c'), Some(Peg::C));
        assert_eq!(Peg::from_char('F'), None);
    }

    #[test]
    fn test_move_to_same_peg_or_from_empty_is_invalid() {
        let state = State::new(4);
        for peg in Peg::ALL {
            assert!(!state.is_valid_move(peg, peg));
        }
        assert!(!state.is_valid_move(Peg::B, Peg::E));
    }

    #[test]
    fn test_parity_restricts_target_pegs() {
        let state = State::new(4); // top coin 1
        assert!(state.is_valid_move(Peg::E, Peg::A));
        assert!(state.is_valid_move(Peg::E, Peg::C));
        assert!(!state.is_valid_move(Peg::E, Peg::B));
        assert!(!state.is_valid_move(Peg::E, Peg::D));

        let even_top = stacks(&[1], &[], &[], &[], &[4, 3, 2]);
        assert!(even_top.is_valid_move(Peg::E, Peg::B));
        assert!(even_top.is_valid_move(Peg::E, Peg::D));
        assert!(!even_top.is_valid_move(Peg::E, Peg::C));
    }

    #[test]
    fn test_cannot_place_on_smaller_coin() {
        let state = stacks(&[1], &[], &[3], &[], &[4, 2]);
        // 3 onto 1 is rejected, 1 onto 3 is fine.
        assert!(!state.is_valid_move(Peg::C, Peg::A));
        assert!(state.is_valid_move(Peg::A, Peg::C));
        // 2 cannot go onto 1 on the relay either.
        let relay = stacks(&[], &[2], &[], &[], &[1]);
        assert!(!relay.is_valid_move(Peg::B, Peg::E));
    }

    #[test]
    fn test_equal_rank_top_is_accepted() {
        // Ranks are unique in real play, but the comparison is inclusive.
        let state = stacks(&[3], &[], &[3], &[], &[]);
        assert!(state.is_valid_move(Peg::A, Peg::C));
    }

    #[test]
    fn test_mismatched_parity_on_target_top_is_rejected() {
        // Coin 2 sitting on even peg B; odd coin 1 may not land on it even
        // though the rank order would allow it.
        let state = stacks(&[], &[2], &[], &[], &[1]);
        assert!(!state.is_valid_move(Peg::E, Peg::B));
        // A malformed layout with odd coin 3 on even peg D: even coin 2 is
        // rejected by the top-parity rule alone.
        let malformed = stacks(&[], &[], &[], &[3], &[2]);
        assert!(!malformed.is_valid_move(Peg::E, Peg::D));
    }

    #[test]
    fn test_relay_accepts_any_parity_on_top() {
        let state = stacks(&[1], &[], &[], &[], &[4]);
        assert!(state.is_valid_move(Peg::A, Peg::E));
        let state = stacks(&[], &[2], &[], &[], &[3]);
        assert!(state.is_valid_move(Peg::B, Peg::E));
    }

    #[test]
    fn test_apply_move_returns_new_state() {
        let state = State::new(4);
        let next = state.apply_move(Peg::E, Peg::A);
        assert_eq!(state.stack(Peg::E), &[4, 3, 2, 1]);
        assert!(state.stack(Peg::A).is_empty());
        assert_eq!(next.stack(Peg::E), &[4, 3, 2]);
        assert_eq!(next.stack(Peg::A), &[1]);
        assert_ne!(state, next);
    }

    #[test]
    fn test_try_move_rejects_illegal_move() {
        let state = State::new(4);
        let err = state.try_move(Peg::E, Peg::B).unwrap_err();
        assert!(matches!(
            err,
            SolverError::IllegalMove { mv, .. } if mv == Move::new(Peg::E, Peg::B)
        ));
        assert!(state.try_move(Peg::E, Peg::C).is_ok());
    }

    #[test]
    fn test_is_goal() {
        assert!(!State::new(4).is_goal());
        assert!(stacks(&[1], &[2], &[3], &[4], &[]).is_goal());
        assert!(stacks(&[3, 1], &[4, 2], &[], &[], &[]).is_goal());
        // Relay not empty.
        assert!(!stacks(&[1], &[2], &[3], &[], &[4]).is_goal());
        assert!(stacks(&[1], &[], &[3], &[4, 2], &[]).is_goal());
        // Even coin on an odd target.
        assert!(!stacks(&[2], &[4], &[3, 1], &[], &[]).is_goal());
        // Odd coin on an even target.
        assert!(!stacks(&[], &[3], &[1], &[4, 2], &[]).is_goal());
        // Empty puzzle trivially satisfies the predicate.
        assert!(stacks(&[], &[], &[], &[], &[]).is_goal());
    }

    #[test]
    fn test_key_is_structural() {
        let a = stacks(&[1], &[], &[], &[], &[2]);
        let b = stacks(&[], &[], &[], &[], &[2, 1]);
        let c = stacks(&[], &[1], &[], &[], &[2]);
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(a.key(), a.clone().key());
        assert_eq!(a.key().as_bytes(), &[1, 0, 0, 0, 0, 2, 0]);

        let built = State::new(2).apply_move(Peg::E, Peg::A);
        assert_eq!(built.key(), a.key());
    }

    #[test]
    fn test_valid_moves_order_is_lexicographic() {
        let state = stacks(&[1], &[], &[], &[], &[4, 3, 2]);
        let moves = valid_moves(&state);
        assert_eq!(
            moves,
            vec![
                Move::new(Peg::A, Peg::C),
                Move::new(Peg::A, Peg::E),
                Move::new(Peg::E, Peg::B),
                Move::new(Peg::E, Peg::D),
            ]
        );
    }

    #[test]
    fn test_valid_moves_of_initial_state() {
        let moves = valid_moves(&State::new(6));
        assert_eq!(
            moves,
            vec![Move::new(Peg::E, Peg::A), Move::new(Peg::E, Peg::C)]
        );
    }

    #[test]
    fn test_valid_moves_never_break_parity_or_order() {
        for seed in 0..20 {
            let state = State::scrambled(8, 30, seed);
            for mv in valid_moves(&state) {
                let coin = state.top(mv.from).unwrap();
                assert!(mv.to.accepts_parity_of(coin));
                if let Some(top) = state.top(mv.to) {
                    assert!(coin <= top);
                    if mv.to != Peg::RELAY {
                        assert_eq!(coin % 2, top % 2);
                    }
                }
            }
        }
    }

    #[test]
    fn test_coin_conservation_over_random_walks() {
        for n in SUPPORTED_COIN_COUNTS {
            let expected: Vec<Coin> = (1..=n as Coin).collect();
            assert_eq!(sorted_coins(&create_initial_state(n).unwrap()), expected);
            for seed in 0..10u64 {
                let state = State::scrambled(n as Coin, 25, seed * 31 + n as u64);
                assert_eq!(state.coin_count(), n);
                assert_eq!(sorted_coins(&state), expected);
            }
        }
    }

    #[test]
    fn test_stacks_stay_descending() {
        for seed in 0..10 {
            let state = State::scrambled(10, 50, seed);
            for peg in Peg::ALL {
                let stack = state.stack(peg);
                assert!(
                    stack.windows(2).all(|w| w[0] > w[1]),
                    "peg {} not descending: {:?}",
                    peg,
                    stack
                );
            }
        }
    }

    #[test]
    fn test_scrambled_is_deterministic() {
        assert_eq!(State::scrambled(8, 40, 7), State::scrambled(8, 40, 7));
        assert_eq!(State::scrambled(8, 0, 7), State::new(8));
        let distinct: HashSet<StateKey> = (0..10).map(|s| State::scrambled(8, 40, s).key()).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_replay_produces_one_state_per_move() {
        let initial = State::new(4);
        let moves = [
            Move::new(Peg::E, Peg::A),
            Move::new(Peg::E, Peg::B),
            Move::new(Peg::E, Peg::C),
            Move::new(Peg::E, Peg::D),
        ];
        let states = replay(&initial, &moves);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].stack(Peg::A), &[1]);
        assert!(states[3].is_goal());
        assert_eq!(replay_checked(&initial, &moves).unwrap(), states);
    }

    #[test]
    fn test_replay_checked_reports_step() {
        let initial = State::new(4);
        let moves = [Move::new(Peg::E, Peg::A), Move::new(Peg::E, Peg::C)];
        let err = replay_checked(&initial, &moves).unwrap_err();
        // Coin 2 is even and cannot go to C.
        assert!(matches!(
            err,
            SolverError::IllegalMove { step: 2, mv } if mv == Move::new(Peg::E, Peg::C)
        ));
    }

    #[test]
    fn test_display_format() {
        let state = State::new(4);
        assert_eq!(
            state.to_string(),
            "A: [] | B: [] | C: [] | D: [] | E: [4, 3, 2, 1]"
        );
        assert_eq!(Move::new(Peg::A, Peg::E).to_string(), "A -> E");
    }
}
