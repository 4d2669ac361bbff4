use alloc::collections::VecDeque;
use core::time::Duration;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for the first click, mine counts are not computed yet.
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Starts a new game with `config.mines` mines placed uniformly at random.
///
/// This is also how a game is reset, see [`BoardState::reset`].
pub fn init_board<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<BoardState> {
    let layout = RandomMinefieldGenerator::new(rng).generate(config)?;
    Ok(BoardState::new(layout))
}

/// [`init_board`] seeded from the thread-local generator.
#[cfg(feature = "std")]
pub fn init_board_from_entropy(config: GameConfig) -> Result<BoardState> {
    init_board(config, &mut rand::rng())
}

/// The authoritative board of one game, only mutated through the player actions.
///
/// A deserialized board must agree with its config: shape, mine count, and the revealed and
/// flag counters are checked against the cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardStateData")]
pub struct BoardState {
    config: GameConfig,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: EngineState,
    started_at: Option<Millis>,
    ended_at: Option<Millis>,
    triggered_mine: Option<CellIndex>,
}

#[derive(Deserialize)]
struct BoardStateData {
    config: GameConfig,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: EngineState,
    started_at: Option<Millis>,
    ended_at: Option<Millis>,
    triggered_mine: Option<CellIndex>,
}

impl TryFrom<BoardStateData> for BoardState {
    type Error = GameError;

    fn try_from(data: BoardStateData) -> Result<Self> {
        data.config.validate()?;
        if data.cells.dim() != data.config.shape() {
            return Err(GameError::InvalidBoardShape);
        }

        let count = |pred: fn(&Cell) -> bool| data.cells.iter().filter(|cell| pred(cell)).count();
        let consistent = count(|cell| cell.mine) == usize::from(data.config.mines)
            && count(|cell| cell.revealed && !cell.mine) == usize::from(data.revealed_count)
            && count(|cell| cell.flagged) == usize::from(data.flagged_count)
            && count(|cell| cell.revealed && cell.flagged) == 0
            && (!data.state.is_ready() || data.revealed_count == 0);
        if !consistent {
            return Err(GameError::InconsistentBoard);
        }
        if let Some(index) = data.triggered_mine {
            let index = data.config.validate_index(index)?;
            if !data.cells[index.to_nd_index(data.cells.ncols())].mine {
                return Err(GameError::InconsistentBoard);
            }
        }

        Ok(Self {
            config: data.config,
            cells: data.cells,
            revealed_count: data.revealed_count,
            flagged_count: data.flagged_count,
            state: data.state,
            started_at: data.started_at,
            ended_at: data.ended_at,
            triggered_mine: data.triggered_mine,
        })
    }
}

impl BoardState {
    pub fn new(layout: MineLayout) -> Self {
        let config = layout.game_config();
        let (_, width) = config.shape();
        let cells = Array2::from_shape_fn(config.shape(), |(row, col)| Cell {
            mine: layout.contains_mine(row * width + col),
            ..Default::default()
        });
        Self {
            config,
            cells,
            revealed_count: 0,
            flagged_count: 0,
            state: Default::default(),
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// Replaces this game with a fresh board of the same configuration.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        *self = init_board(self.config, rng)?;
        log::debug!("Board reset");
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_first_click(&self) -> bool {
        self.state.is_ready()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, EngineState::Won)
    }

    pub fn started_at(&self) -> Option<Millis> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Millis> {
        self.ended_at
    }

    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mines minus flags, negative when the player placed more flags than there are mines.
    pub fn flags_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    /// [`Self::flags_left`] clamped at zero, for counters that cannot show a sign.
    pub fn displayed_flags_left(&self) -> CellCount {
        self.config.mines.saturating_sub(self.flagged_count)
    }

    pub fn cell_at(&self, index: CellIndex) -> Result<Cell> {
        let index = self.config.validate_index(index)?;
        Ok(self.cell(index))
    }

    /// All cells in row-major order, the position in the iterator is the cell index.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Time played, from the first click until the end of the game or `now`.
    pub fn elapsed_millis(&self, now: Millis) -> Millis {
        match self.started_at {
            Some(started_at) => self.ended_at.unwrap_or(now).saturating_sub(started_at),
            None => 0,
        }
    }

    pub fn elapsed_secs(&self, now: Millis) -> u32 {
        (self.elapsed_millis(now) / 1000).try_into().unwrap_or(u32::MAX)
    }

    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        Duration::from_millis(self.elapsed_millis(clock.now()))
    }

    pub fn apply<R, C>(&mut self, action: Action, rng: &mut R, clock: &C) -> Result<ActionOutcome>
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        Ok(match action.kind {
            ActionKind::Primary => {
                ActionOutcome::Reveal(self.primary_action(action.index, rng, clock)?)
            }
            ActionKind::Flag => ActionOutcome::Mark(self.toggle_flag(action.index)?),
        })
    }

    /// Reveals a cell, flood filling through zero cells.
    ///
    /// The first call of a game never hits a mine: a mine under the clicked cell is moved
    /// elsewhere before the mine counts are computed. Finished games are left untouched.
    pub fn primary_action<R, C>(
        &mut self,
        index: CellIndex,
        rng: &mut R,
        clock: &C,
    ) -> Result<RevealOutcome>
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        use RevealOutcome::*;

        let index = self.config.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        let first_click = self.state.is_ready();
        if first_click {
            self.resolve_first_click(index, rng);
            self.mark_started(clock.now());
        }

        let outcome = match self.reveal(index) {
            NoChange if first_click => Started,
            outcome => outcome,
        };
        match outcome {
            HitMine => {
                self.triggered_mine = Some(index);
                self.end_game(false, clock.now());
            }
            Won => self.end_game(true, clock.now()),
            NoChange | Started | Revealed => {}
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let index = self.config.validate_index(index)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        let cell = self.cell_mut(index);
        if cell.revealed {
            return Ok(NoChange);
        }
        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(Changed)
    }

    /// Moves a mine away from `index` if needed, then computes every mine count from scratch.
    fn resolve_first_click<R: Rng + ?Sized>(&mut self, index: CellIndex, rng: &mut R) {
        if self.cell(index).mine {
            let total_cells = self.cells.len();
            // at least one safe cell exists, so this terminates
            let target = loop {
                let candidate = rng.random_range(0..total_cells);
                if !self.cell(candidate).mine {
                    break candidate;
                }
            };
            self.cell_mut(index).mine = false;
            self.cell_mut(target).mine = true;
            log::debug!("Moved mine from first click at {} to {}", index, target);
        }

        for pos in 0..self.cells.len() {
            if !self.cell(pos).mine {
                let adjacent = self.adjacent_mine_count(pos);
                self.cell_mut(pos).adjacent = adjacent;
            }
        }
    }

    /// Reveals `index` and, for a zero cell, the connected zero region plus its border.
    fn reveal(&mut self, index: CellIndex) -> RevealOutcome {
        use RevealOutcome::*;

        let cell = self.cell(index);
        if cell.revealed || cell.flagged {
            return NoChange;
        }

        self.cell_mut(index).revealed = true;
        if cell.mine {
            return HitMine;
        }
        self.revealed_count += 1;
        log::debug!("Revealed cell {}, mine count: {}", index, cell.adjacent);

        if cell.adjacent == 0 {
            let mut to_visit: VecDeque<_> = self.unrevealed_neighbors(index).collect();
            log::trace!(
                "Starting flood-fill from {}, initial neighbors: {:?}",
                index,
                to_visit
            );

            while let Some(visit) = to_visit.pop_front() {
                let visit_cell = self.cell(visit);
                // mines are never queued by a zero cell, revealed_count only counts safe cells
                if visit_cell.revealed || visit_cell.flagged || visit_cell.mine {
                    continue;
                }

                self.cell_mut(visit).revealed = true;
                self.revealed_count += 1;
                log::trace!(
                    "Flood revealed cell {}, mine count: {}",
                    visit,
                    visit_cell.adjacent
                );

                if visit_cell.adjacent == 0 {
                    to_visit.extend(self.unrevealed_neighbors(visit));
                }
            }
        }

        if self.revealed_count == self.config.safe_cells() {
            Won
        } else {
            Revealed
        }
    }

    fn mark_started(&mut self, now: Millis) {
        if self.state.is_ready() {
            self.state = EngineState::Active;
            self.started_at.get_or_insert(now);
            log::debug!("started at {}", now);
        }
    }

    fn end_game(&mut self, won: bool, now: Millis) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        self.ended_at = Some(now);
        log::debug!("{:?} at {}", self.state, now);
    }

    fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        self.cells
            .iter_neighbor_cells(index)
            .filter(|cell| cell.mine)
            .count() as u8
    }

    fn unrevealed_neighbors(&self, index: CellIndex) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells
            .iter_neighbors(index)
            .filter(|&pos| self.cell(pos).is_unrevealed())
    }

    pub(crate) fn cell(&self, index: CellIndex) -> Cell {
        self.cells[index.to_nd_index(self.cells.ncols())]
    }

    fn cell_mut(&mut self, index: CellIndex) -> &mut Cell {
        let width = self.cells.ncols();
        &mut self.cells[index.to_nd_index(width)]
    }
}
