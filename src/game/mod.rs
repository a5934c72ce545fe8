//! Core Connect Four game logic: perspective-relative board encoding,
//! incremental win detection, the move engine, and the legal-move filter.

mod board;
mod encoding;
mod filter;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS};
pub use encoding::{Column, StateKey, Symbol, TargetMap};
pub use filter::{legal_moves, LegalActions};
pub use player::Player;
pub use state::{GameOutcome, GameState, MoveError};
