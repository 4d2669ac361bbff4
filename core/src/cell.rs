use serde::{Deserialize, Serialize};

/// State of a single grid position as tracked by the engine.
///
/// A cell is never revealed and flagged at the same time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) adjacent: u8,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.mine
    }

    /// Mines among the 8 neighbors, only meaningful once the first click resolved the layout.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent
    }

    /// The digit to draw for this cell, `None` for mines.
    pub const fn number(self) -> Option<u8> {
        if self.mine { None } else { Some(self.adjacent) }
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_unrevealed(self) -> bool {
        !self.revealed
    }
}
