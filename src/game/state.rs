use rand::Rng;

use super::board::{Board, Cell, COLS, ROWS};
use super::encoding::{StateKey, Symbol, TargetMap};
use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Rejected moves. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,
}

/// A game in progress, stored from the point of view of the player to move.
///
/// The mover's own discs are always [`Symbol::One`]; after every ply the
/// whole board is complemented and the target map reversed so that this
/// holds for the next mover too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    target_map: TargetMap,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create initial game state with Red to move.
    pub fn initial() -> Self {
        Self::with_first_player(Player::Red)
    }

    pub fn with_first_player(first: Player) -> Self {
        GameState {
            board: Board::new(),
            current_player: first,
            target_map: TargetMap::for_mover(first),
            outcome: None,
        }
    }

    /// Fresh game with a coin-flip first mover.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first = if rng.random_bool(0.5) {
            Player::Red
        } else {
            Player::Yellow
        };
        Self::with_first_player(first)
    }

    /// Build a state from absolute discs, listed bottom to top per column.
    ///
    /// The position is assumed to contain no four-in-a-row. A full board is
    /// recorded as a draw.
    pub fn from_position(columns: &[&[Player]], to_move: Player) -> Result<Self, MoveError> {
        if columns.len() > COLS {
            return Err(MoveError::InvalidColumn(columns.len() - 1));
        }
        let own = Symbol::One;
        let mut board = Board::new();
        for (col, discs) in columns.iter().enumerate() {
            if discs.len() > ROWS {
                return Err(MoveError::ColumnFull(col));
            }
            for &owner in discs.iter() {
                let symbol = if owner == to_move { own } else { own.flip() };
                board.push(col, symbol);
            }
        }
        let outcome = board.is_full().then_some(GameOutcome::Draw);
        Ok(GameState {
            board,
            current_player: to_move,
            target_map: TargetMap::for_mover(to_move),
            outcome,
        })
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn target_map(&self) -> TargetMap {
        self.target_map
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Canonical encoding used as the value-table state key.
    pub fn key(&self) -> StateKey {
        self.board.key()
    }

    /// Columns that can still take a disc.
    pub fn open_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.open_columns()
    }

    /// Absolute color at display depth `depth` (1 = top row, 6 = bottom).
    pub fn cell(&self, col: usize, depth: usize) -> Cell {
        match self.board.get_cell(col, depth) {
            Some(symbol) => self.target_map.owner_of(symbol).to_cell(),
            None => Cell::Empty,
        }
    }

    /// Whether `player` dropping into `col` would connect four, checked at the
    /// column's landing row without touching the board.
    pub fn would_win(&self, col: usize, player: Player) -> bool {
        if self.board.is_column_full(col) {
            return false;
        }
        let row = self.board.landing_row(col);
        self.board
            .connects_four(col, row, self.target_map.symbol_of(player))
    }

    fn check_move(&self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if column >= COLS {
            return Err(MoveError::InvalidColumn(column));
        }
        if self.board.is_column_full(column) {
            return Err(MoveError::ColumnFull(column));
        }
        Ok(())
    }

    /// Apply a move in place and hand the turn to the other player.
    pub fn apply(&mut self, column: usize) -> Result<(), MoveError> {
        self.check_move(column)?;

        let symbol = self.target_map.symbol_of(self.current_player);
        self.board.push(column, symbol);

        if self
            .board
            .connects_four(column, self.board.top_row(column), symbol)
        {
            self.outcome = Some(GameOutcome::Winner(self.current_player));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }

        self.pass_turn();
        Ok(())
    }

    /// Copy of this state with `column` played, for lookahead.
    pub fn after(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = *self;
        next.apply(column)?;
        Ok(next)
    }

    /// Re-encode the board for the next mover.
    fn pass_turn(&mut self) {
        self.current_player = self.current_player.other();
        self.board.complement();
        self.target_map = self.target_map.reversed();
    }
}
