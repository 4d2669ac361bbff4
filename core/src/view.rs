use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a renderer should draw for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// The mine that ended the game.
    TriggeredMine,
    /// Unflagged mine, shown once the game is lost.
    Mine,
    /// Flag on a safe cell, shown once the game is lost.
    Misflagged,
}

impl CellView {
    pub fn of(state: &BoardState, index: CellIndex) -> Result<Self> {
        let cell = state.cell_at(index)?;
        Ok(Self::decorate(state, index, cell))
    }

    fn decorate(state: &BoardState, index: CellIndex, cell: Cell) -> Self {
        use EngineState::*;

        match state.state() {
            Ready | Active => Self::during_play(cell),
            Won if cell.is_mine() => Self::Flagged,
            Won => Self::during_play(cell),
            Lost if state.triggered_mine() == Some(index) => Self::TriggeredMine,
            Lost => match (cell.is_mine(), cell.is_flagged()) {
                (true, true) => Self::Flagged,
                (true, false) => Self::Mine,
                (false, true) => Self::Misflagged,
                (false, false) => Self::during_play(cell),
            },
        }
    }

    fn during_play(cell: Cell) -> Self {
        if cell.is_flagged() {
            Self::Flagged
        } else if cell.is_revealed() {
            Self::Revealed(cell.adjacent_mines())
        } else {
            Self::Hidden
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Misflagged)
    }
}

/// Snapshot of everything a renderer needs, taken after each action that reported an update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: Coord,
    pub height: Coord,
    pub cells: Array2<CellView>,
    pub flags_left: CellCount,
    pub elapsed_secs: u32,
    pub state: EngineState,
}

impl BoardView {
    pub fn from_state(state: &BoardState, now: Millis) -> Self {
        let config = state.config();
        let (_, width) = config.shape();
        let cells = Array2::from_shape_fn(config.shape(), |(row, col)| {
            let index = row * width + col;
            CellView::decorate(state, index, state.cell(index))
        });

        Self {
            width: config.width,
            height: config.height,
            cells,
            flags_left: state.displayed_flags_left(),
            elapsed_secs: state.elapsed_secs(now),
            state: state.state(),
        }
    }

    pub fn cell(&self, index: CellIndex) -> Option<CellView> {
        if index >= self.cells.len() {
            return None;
        }
        Some(self.cells[index.to_nd_index(self.cells.ncols())])
    }

    pub fn rows(&self) -> impl Iterator<Item = ndarray::ArrayView1<'_, CellView>> {
        self.cells.rows().into_iter()
    }
}
