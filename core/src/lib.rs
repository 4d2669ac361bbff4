#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use types::*;
pub use view::*;

mod cell;
mod clock;
mod engine;
mod error;
mod generator;
mod input;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    /// Requires a non-empty board with at least one mine and at least one safe cell.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::EmptyBoard);
        }
        if self.mines == 0 {
            return Err(GameError::NoMines);
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < CellIndex::from(self.total_cells()) {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// `(rows, columns)`, the shape of the board arrays.
    pub const fn shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::intermediate()
    }
}

/// Mine positions of one game, before any player interaction.
///
/// Deserialized layouts go through the same checks as [`MineLayout::from_mine_indices`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineLayoutData")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct MineLayoutData {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<MineLayoutData> for MineLayout {
    type Error = GameError;

    fn try_from(data: MineLayoutData) -> Result<Self> {
        let (rows, cols) = data.mine_mask.dim();
        if rows > usize::from(Coord::MAX) || cols > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }
        let mines = data.mine_mask.iter().filter(|&&is_mine| is_mine).count();
        if mines != usize::from(data.mine_count) {
            return Err(GameError::InconsistentBoard);
        }

        let layout = Self {
            mine_mask: data.mine_mask,
            mine_count: data.mine_count,
        };
        layout.game_config().validate()?;
        Ok(layout)
    }
}

impl MineLayout {
    /// Layout without any mines, filled in by a generator.
    pub(crate) fn empty(width: Coord, height: Coord) -> Self {
        Self {
            mine_mask: Array2::default((usize::from(height), usize::from(width))),
            mine_count: 0,
        }
    }

    /// Builds a layout from explicit positions, duplicates count once.
    pub fn from_mine_indices(width: Coord, height: Coord, mines: &[CellIndex]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut layout = Self::empty(width, height);
        for &index in mines {
            if index >= layout.mine_mask.len() {
                return Err(GameError::InvalidIndex);
            }
            layout.place_mine(index);
        }

        layout.game_config().validate()?;
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        let (width, height) = self.size();
        GameConfig::new_unchecked(width, height, self.mine_count)
    }

    /// `(width, height)`
    pub fn size(&self) -> (Coord, Coord) {
        let (rows, cols) = self.mine_mask.dim();
        // dimensions always come from `Coord` values
        (cols as Coord, rows as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self[index]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.mine_mask
            .iter()
            .enumerate()
            .filter_map(|(index, &is_mine)| is_mine.then_some(index))
    }

    /// Returns whether a new mine was added.
    pub(crate) fn place_mine(&mut self, index: CellIndex) -> bool {
        if self[index] {
            return false;
        }
        self[index] = true;
        self.mine_count += 1;
        true
    }
}

impl Index<CellIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mine_mask[index.to_nd_index(self.mine_mask.ncols())]
    }
}

impl IndexMut<CellIndex> for MineLayout {
    fn index_mut(&mut self, index: CellIndex) -> &mut Self::Output {
        let width = self.mine_mask.ncols();
        &mut self.mine_mask[index.to_nd_index(width)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// First click of the game on a cell that stayed closed, the clock is running now.
    Started,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Started => true,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Result of [`BoardState::apply`], whichever action kind was dispatched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Reveal(RevealOutcome),
    Mark(MarkOutcome),
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Mark(outcome) => outcome.has_update(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn config_rejects_degenerate_boards() {
        assert_eq!(GameConfig::new(0, 3, 1), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new(3, 0, 1), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new(3, 3, 0), Err(GameError::NoMines));
        assert_eq!(GameConfig::new(3, 3, 9), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new(3, 3, 8).unwrap().safe_cells(), 1);
    }

    #[test]
    fn presets_are_valid() {
        for config in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
            GameConfig::default(),
        ] {
            assert_eq!(config.validate(), Ok(()));
        }
        assert_eq!(GameConfig::expert().total_cells(), 480);
        assert_eq!(GameConfig::expert().shape(), (16, 30));
    }

    #[test]
    fn validate_index_checks_upper_bound() {
        let config = GameConfig::beginner();
        assert_eq!(config.validate_index(80), Ok(80));
        assert_eq!(config.validate_index(81), Err(GameError::InvalidIndex));
    }

    #[test]
    fn layout_from_indices_uses_row_major_addressing() {
        let layout = MineLayout::from_mine_indices(4, 2, &[1, 6, 6]).unwrap();

        assert_eq!(layout.size(), (4, 2));
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 6);
        assert!(layout.contains_mine(6));
        assert!(layout.mine_mask[[1, 2]]);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), [1, 6]);
    }

    #[test]
    fn layout_from_indices_rejects_bad_input() {
        assert_eq!(
            MineLayout::from_mine_indices(3, 3, &[9]),
            Err(GameError::InvalidIndex)
        );
        assert_eq!(
            MineLayout::from_mine_indices(2, 1, &[0, 1]),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            MineLayout::from_mine_indices(2, 2, &[]),
            Err(GameError::NoMines)
        );
    }

    #[test]
    fn deserialized_layout_is_checked() {
        let layout = MineLayout::from_mine_indices(3, 2, &[0, 4]).unwrap();
        let json = serde_json::to_value(&layout).unwrap();
        let back: MineLayout = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, layout);

        let mut wrong_count = json.clone();
        wrong_count["mine_count"] = 5.into();
        let err = serde_json::from_value::<MineLayout>(wrong_count).unwrap_err();
        assert!(err.to_string().contains("counters"));

        let mut no_mines = json;
        no_mines["mine_count"] = 0.into();
        no_mines["mine_mask"]["data"] = alloc::vec![false; 6].into();
        assert!(serde_json::from_value::<MineLayout>(no_mines).is_err());
    }
}
