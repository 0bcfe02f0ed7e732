use crate::engine::{Peg, PegKind, State};

/// Counts the coins that still have to move before the puzzle is solved.
///
/// A coin is misplaced when it sits on the relay peg, or on a target peg whose
/// parity it does not share. The count is zero exactly at goal states.
///
/// Each misplaced coin needs at least one more move and one move relocates a
/// single coin, so the value never exceeds the remaining path length
/// (admissible). A move also changes the count by at most one (consistent),
/// which keeps A* with first-expansion-wins pruning optimal.
///
/// # Examples
/// ```
/// use coin_sorter::engine::State;
/// use coin_sorter::heuristics::misplaced_coins;
/// assert_eq!(misplaced_coins(&State::new(6)), 6);
/// ```
pub fn misplaced_coins(state: &State) -> u32 {
    let mut misplaced = 0;
    for peg in Peg::ALL {
        let stack = state.stack(peg);
        misplaced += match peg.kind() {
            PegKind::Relay => stack.len(),
            PegKind::Odd | PegKind::Even => stack
                .iter()
                .filter(|&&coin| !peg.accepts_parity_of(coin))
                .count(),
        };
    }
    misplaced as u32
}
