//! Tie-broken maximum scans
//!
//! The first candidate seeds the running maximum. A later candidate with an
//! equal score joins the tie set, a strictly greater one replaces it. The
//! winner is drawn uniformly from the tie set with a single random draw.

use rand::RngCore;

use crate::core::rng::random_index;
use crate::core::types::{BattlerId, MoveId, MAX_MON_MOVES};

/// All candidates sharing the highest score, in scan order, and that score
pub fn best_candidates<T: Copy>(candidates: &[(T, i32)]) -> (Vec<T>, i32) {
    let Some(&(first, first_score)) = candidates.first() else {
        return (Vec::new(), 0);
    };

    let mut best = first_score;
    let mut tied = vec![first];
    for &(candidate, score) in &candidates[1..] {
        if score == best {
            tied.push(candidate);
        }
        if score > best {
            best = score;
            tied.clear();
            tied.push(candidate);
        }
    }
    (tied, best)
}

/// Draw one of the top-scoring candidates; `None` only for an empty list
pub fn pick_best<T: Copy>(candidates: &[(T, i32)], rng: &mut dyn RngCore) -> Option<(T, i32)> {
    let (tied, best) = best_candidates(candidates);
    if tied.is_empty() {
        return None;
    }
    let pick = tied[random_index(rng, tied.len())];
    Some((pick, best))
}

/// Best move slot and its score
///
/// Slot 0 is always a candidate; later slots only when they hold a move.
pub fn best_move_slot(
    scores: &[i32; MAX_MON_MOVES],
    moves: &[MoveId; MAX_MON_MOVES],
    rng: &mut dyn RngCore,
) -> (usize, i32) {
    let candidates: Vec<(usize, i32)> = (0..MAX_MON_MOVES)
        .filter(|&slot| slot == 0 || !moves[slot].is_none())
        .map(|slot| (slot, scores[slot]))
        .collect();
    pick_best(&candidates, rng).unwrap_or((0, scores[0]))
}

/// Most attractive target among `(battler, best points)` pairs
pub fn best_target(candidates: &[(BattlerId, i32)], rng: &mut dyn RngCore) -> Option<BattlerId> {
    pick_best(candidates, rng).map(|(target, _)| target)
}
