use crate::engine::{Coin, Peg, State, PEG_COUNT};
use crate::error::SolverError;

/// Parses a state written in the `Display` format of [`State`].
///
/// The input is a `|`-separated list of segments of the form `X: [c1, c2, ...]`,
/// where `X` is a peg label (`A` to `E`, any case) and the coins are listed
/// bottom to top. Pegs that are not mentioned are empty.
///
/// # Returns
/// * `Ok(State)` if parsing succeeds and the coins are exactly `1..=N` for
///   some `N`, each appearing once.
/// * `Err(SolverError::Parse)` naming the 1-based segment otherwise:
///     - an unknown or repeated peg label,
///     - a missing `:` or unbalanced brackets,
///     - a coin that is not an integer in `1..=255`,
///     - a duplicate coin, or ranks with a gap (segment `0` for layout-wide
///       problems).
///
/// # Examples
/// ```
/// use coin_sorter::engine::Peg;
/// use coin_sorter::utils::state_from_str;
///
/// let state = state_from_str("A: [1] | E: [4, 3, 2]").unwrap();
/// assert_eq!(state.stack(Peg::A), &[1]);
/// assert_eq!(state.stack(Peg::E), &[4, 3, 2]);
/// assert!(state.stack(Peg::B).is_empty());
///
/// assert!(state_from_str("F: [1]").is_err());
/// assert!(state_from_str("A: [1] | B: [1]").is_err());
/// ```
pub fn state_from_str(s: &str) -> Result<State, SolverError> {
    let mut stacks: [Vec<Coin>; PEG_COUNT] = Default::default();
    let mut seen_pegs = [false; PEG_COUNT];
    let mut seen_coins: Vec<Coin> = Vec::new();

    for (i, segment) in s.split('|').enumerate() {
        let segment_no = i + 1;
        let err = |reason: String| SolverError::Parse {
            segment: segment_no,
            reason,
        };

        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (label, body) = segment
            .split_once(':')
            .ok_or_else(|| err(format!("expected 'PEG: [coins]', found '{}'", segment)))?;

        let label = label.trim();
        let mut chars = label.chars();
        let peg = match (chars.next(), chars.next()) {
            (Some(c), None) => Peg::from_char(c),
            _ => None,
        }
        .ok_or_else(|| err(format!("unknown peg '{}'", label)))?;

        let slot = peg.index();
        if seen_pegs[slot] {
            return Err(err(format!("peg {} listed twice", peg)));
        }
        seen_pegs[slot] = true;

        let inner = body
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| err(format!("coins for peg {} must be in brackets", peg)))?;

        for token in inner.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let coin: Coin = token
                .parse()
                .map_err(|_| err(format!("invalid coin '{}'", token)))?;
            if coin == 0 {
                return Err(err("coin ranks start at 1".to_string()));
            }
            if seen_coins.contains(&coin) {
                return Err(err(format!("duplicate coin {}", coin)));
            }
            seen_coins.push(coin);
            stacks[slot].push(coin);
        }
    }

    let total = seen_coins.len();
    if let Some(&largest) = seen_coins.iter().max() {
        if largest as usize != total {
            return Err(SolverError::Parse {
                segment: 0,
                reason: format!(
                    "expected coins 1..={} but the largest coin is {}",
                    total, largest
                ),
            });
        }
    }

    Ok(State::from_stacks(stacks))
}
