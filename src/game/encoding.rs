//! Perspective-relative board encoding.
//!
//! Every disc is stored as a single bit. The bit pattern is rewritten after
//! every ply so that the player about to move always sees their own discs as
//! [`Symbol::One`]. Two physical positions that differ only by swapped colors
//! and swapped turn therefore share one [`StateKey`].

use std::fmt;
use std::str::FromStr;

use crate::error::TableError;

use super::board::{COLS, ROWS};
use super::player::Player;

/// A single encoded disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Zero,
    One,
}

impl Symbol {
    pub fn flip(self) -> Symbol {
        match self {
            Symbol::Zero => Symbol::One,
            Symbol::One => Symbol::Zero,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            _ => None,
        }
    }

    fn from_bit(bit: u8) -> Symbol {
        if bit & 1 == 1 {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }

    fn bit(self) -> u8 {
        match self {
            Symbol::Zero => 0,
            Symbol::One => 1,
        }
    }
}

/// One column of discs. Index 0 is the most recently placed (top) disc, the
/// bottom disc sits at index `len - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Column {
    bits: u8,
    len: u8,
}

impl Column {
    pub fn new() -> Self {
        Column::default()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= ROWS
    }

    /// Place a disc on top of the column. Callers check `is_full` first.
    pub fn push_top(&mut self, symbol: Symbol) {
        debug_assert!(!self.is_full(), "push onto full column");
        self.bits = (self.bits << 1) | symbol.bit();
        self.len += 1;
    }

    /// Symbol at `index` counted from the top disc.
    pub fn get(&self, index: usize) -> Option<Symbol> {
        if index >= self.len() {
            return None;
        }
        Some(Symbol::from_bit(self.bits >> index))
    }

    /// Bitwise complement, preserving length and order.
    pub fn complement(self) -> Column {
        let mask = ((1u16 << self.len) - 1) as u8;
        Column {
            bits: !self.bits & mask,
            len: self.len,
        }
    }

    /// Length of the run of `symbol` starting at `start` and moving toward
    /// the bottom of the column.
    pub fn run_from(&self, start: usize, symbol: Symbol) -> usize {
        if start >= self.len() {
            return 0;
        }
        let pattern = match symbol {
            Symbol::One => self.bits,
            Symbol::Zero => !self.bits,
        } >> start;
        (pattern.trailing_ones() as usize).min(self.len() - start)
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.symbols() {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Column {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() > ROWS {
            return Err(TableError::BadColumn(s.to_string()));
        }
        // Text is top-first, so build from the bottom up.
        let mut column = Column::new();
        for c in s.chars().rev() {
            let symbol = Symbol::from_char(c).ok_or_else(|| TableError::BadColumn(s.to_string()))?;
            column.push_top(symbol);
        }
        Ok(column)
    }
}

/// Seat-to-symbol lookup. `symbol_of(mover)` is the mover's own disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetMap([Symbol; 2]);

impl TargetMap {
    /// Map in which `mover` owns [`Symbol::One`].
    pub fn for_mover(mover: Player) -> Self {
        let mut symbols = [Symbol::Zero; 2];
        symbols[mover.seat()] = Symbol::One;
        TargetMap(symbols)
    }

    pub fn symbol_of(&self, player: Player) -> Symbol {
        self.0[player.seat()]
    }

    /// Seat owning `symbol` under this map.
    pub fn owner_of(&self, symbol: Symbol) -> Player {
        if self.0[0] == symbol {
            Player::Red
        } else {
            Player::Yellow
        }
    }

    pub fn reversed(self) -> Self {
        TargetMap([self.0[1], self.0[0]])
    }
}

impl fmt::Display for TargetMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0].as_char(), self.0[1].as_char())
    }
}

/// Canonical board encoding: the seven columns as seen by the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey(pub [Column; COLS]);

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}

impl FromStr for StateKey {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != COLS {
            return Err(TableError::ColumnCount(parts.len()));
        }
        let mut columns = [Column::new(); COLS];
        for (slot, part) in columns.iter_mut().zip(parts) {
            *slot = part.parse()?;
        }
        Ok(StateKey(columns))
    }
}
