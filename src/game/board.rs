use super::encoding::{Column, StateKey, Symbol};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Discs needed in a line to win.
const CONNECT: usize = 4;

/// Non-vertical axes as (Δcolumn, Δrow). Each is walked in both directions.
const AXES: [(i32, i32); 3] = [(1, -1), (1, 0), (1, 1)];

/// Absolute cell contents, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Seven column stacks in perspective-relative encoding.
///
/// Rows used by the win detector are bottom-relative: the bottom disc of a
/// column sits at row 1 and its top disc at row `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    columns: [Column; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            columns: [Column::new(); COLS],
        }
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.columns.get(col).map_or(true, Column::is_full)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.columns.iter().all(Column::is_full)
    }

    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Row a disc dropped into `col` would occupy.
    pub fn landing_row(&self, col: usize) -> usize {
        self.columns[col].len() + 1
    }

    /// Row of the top disc in `col` (0 when the column is empty).
    pub fn top_row(&self, col: usize) -> usize {
        self.columns[col].len()
    }

    /// Symbol at display depth `depth` (1 = top row, 6 = bottom row).
    /// Returns `None` for an empty cell or an out-of-range coordinate.
    pub fn get_cell(&self, col: usize, depth: usize) -> Option<Symbol> {
        if !(1..=ROWS).contains(&depth) || col >= COLS {
            return None;
        }
        self.cell_at(col as i32, (ROWS + 1 - depth) as i32)
    }

    /// Symbol at bottom-relative `(col, row)`, bounds-checked.
    fn cell_at(&self, col: i32, row: i32) -> Option<Symbol> {
        if !(0..COLS as i32).contains(&col) || !(1..=ROWS as i32).contains(&row) {
            return None;
        }
        let column = &self.columns[col as usize];
        let row = row as usize;
        if row > column.len() {
            return None;
        }
        column.get(column.len() - row)
    }

    pub(crate) fn push(&mut self, col: usize, symbol: Symbol) {
        self.columns[col].push_top(symbol);
    }

    /// Complement every disc on the board.
    pub(crate) fn complement(&mut self) {
        for column in &mut self.columns {
            *column = column.complement();
        }
    }

    pub fn key(&self) -> StateKey {
        StateKey(self.columns)
    }

    pub fn from_key(key: StateKey) -> Self {
        Board { columns: key.0 }
    }

    /// Whether a `symbol` disc anchored at `(col, row)` completes a line of
    /// four. Only lines through the anchor are inspected, so the board must
    /// hold no four-in-a-row before the disc is considered.
    ///
    /// The anchor may be the disc just placed (`row == top_row(col)`) or a
    /// hypothetical one (`row == landing_row(col)`); neighbors on the
    /// non-vertical axes never lie in the anchor's own column.
    pub fn connects_four(&self, col: usize, row: usize, symbol: Symbol) -> bool {
        let (c, r) = (col as i32, row as i32);

        for (dc, dr) in AXES {
            let mut count = 1;
            let mut open = [true, true];
            let mut step = 1;
            while open[0] || open[1] {
                for (side, sign) in [(0, 1), (1, -1)] {
                    if !open[side] {
                        continue;
                    }
                    let cell = self.cell_at(c + sign * dc * step, r + sign * dr * step);
                    if cell == Some(symbol) {
                        count += 1;
                        if count >= CONNECT {
                            return true;
                        }
                    } else {
                        open[side] = false;
                    }
                }
                step += 1;
            }
        }

        // Vertical: discs below the anchor start at this index from the top.
        let column = &self.columns[col];
        let below = (column.len() + 1).saturating_sub(row);
        1 + column.run_from(below, symbol) >= CONNECT
    }
}
