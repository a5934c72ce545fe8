use crate::game::{legal_moves, GameState, MoveError};

use super::table::ValueStore;

/// Default lookahead in half-moves.
pub const DEFAULT_DEPTH: u32 = 4;

/// Estimate of what playing `action` in `state` is worth to the mover,
/// looking `depth` half-moves ahead.
///
/// The successor is scored from the opponent's side: each of their replies
/// is looked up, and unvisited ones (stored value exactly zero) are estimated
/// recursively one level shallower. Non-zero estimates are written back with
/// reward zero. The negated best reply is returned. A successor with no
/// replies (the game ended) scores zero.
///
/// At depth zero the stored value of `(state, action)` is returned as is.
pub fn best_future<S: ValueStore + ?Sized>(
    store: &mut S,
    state: &GameState,
    action: usize,
    depth: u32,
    alpha: f64,
) -> Result<f64, MoveError> {
    if depth == 0 {
        return Ok(store.value(&state.key(), action));
    }

    let next = state.after(action)?;
    let key = next.key();
    let mut best: Option<f64> = None;

    for reply in legal_moves(&next) {
        let mut value = store.value(&key, reply);
        if value == 0.0 {
            value = best_future(store, &next, reply, depth - 1, alpha)?;
            if value != 0.0 {
                store.record(&key, reply, 0.0, value, alpha);
            }
        }
        best = Some(best.map_or(value, |b| b.max(value)));
    }

    Ok(best.map_or(0.0, |b| -b))
}
