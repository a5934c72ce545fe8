use super::state::GameState;

/// Candidate columns for the player to move.
pub type LegalActions = Vec<usize>;

/// Open columns narrowed by two tactical rules.
///
/// 1. If the mover can win immediately, only the first such column is
///    returned.
/// 2. Otherwise, if the opponent could win immediately somewhere, every such
///    column is returned. With two or more of them the mover cannot cover
///    all threats; the list is returned as is.
/// 3. Otherwise all open columns.
///
/// Empty only for a terminal state.
pub fn legal_moves(state: &GameState) -> LegalActions {
    let open = state.open_columns();
    let mover = state.current_player();

    if let Some(&winning) = open.iter().find(|&&col| state.would_win(col, mover)) {
        return vec![winning];
    }

    let blocking: LegalActions = open
        .iter()
        .copied()
        .filter(|&col| state.would_win(col, mover.other()))
        .collect();
    if !blocking.is_empty() {
        return blocking;
    }

    open
}
