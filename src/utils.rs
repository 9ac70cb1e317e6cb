//! Utility functions for the MCTS algorithm
//!
//! Scoring and credit helpers shared by both search engines.

/// Value reported by a node that has not been visited yet
pub const UNVISITED_VALUE: f64 = f64::NEG_INFINITY;

/// Calculates the exploration term for UCT
///
/// `total_visits` is the exploration baseline. Both engines pass the root's visit count,
/// so every level of the tree shares the same baseline.
pub fn exploration_term(total_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((total_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCT score of a child
///
/// Unvisited children score positive infinity so that each one is tried before
/// exploitation takes over.
pub fn uct_value(
    child_value: f64,
    child_visits: u64,
    total_visits: u64,
    exploration_constant: f64,
) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    child_value + exploration_term(total_visits, child_visits, exploration_constant)
}

/// Reward credited to `player` for a game won by `winner`
///
/// +1 for a win, -1 for a loss, 0 for a draw.
pub fn credit<P: PartialEq>(player: &P, winner: Option<&P>) -> f64 {
    match winner {
        Some(winner) if winner == player => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

/// Index of the first maximum in `scores`, or `None` when empty
///
/// Later entries replace the current best only when strictly greater, which keeps
/// tie-breaking deterministic.
pub fn first_max_index<I: IntoIterator<Item = f64>>(scores: I) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
