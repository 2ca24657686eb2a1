use super::DraftError;
use super::LogPick;
use super::Outcome;
use super::neg_mod;
use df_cards::CardId;
use df_core::Seat;

/// Lifecycle of one minesweeper cell. Picking an unlocked cell reveals
/// its card to everyone and unlocks (without revealing) the orthogonal
/// neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Hidden,
    Unlocked,
    Picked,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub card: CardId,
}

/// One rectangular grid of concealed cells, row-major.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MinesweeperGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MinesweeperGrid {
    fn new(cards: Vec<CardId>, width: usize, height: usize) -> Self {
        let cells = cards
            .into_iter()
            .take(width * height)
            .map(|card| Cell {
                state: CellState::Hidden,
                card,
            })
            .collect();
        let mut grid = Self {
            width,
            height,
            cells,
        };
        grid.unlock_center();
        grid
    }
    /// The middle cell(s) start unlocked; on odd-by-odd grids their
    /// orthogonal neighbours do too, so the first actor has a real choice.
    fn unlock_center(&mut self) {
        let mut row_start = self.height / 2;
        let row_end = row_start + 1;
        if self.height % 2 == 0 && row_start > 0 {
            row_start -= 1;
        }
        let mut col_start = self.width / 2;
        let col_end = col_start + 1;
        if self.width % 2 == 0 && col_start > 0 {
            col_start -= 1;
        }
        for row in row_start..row_end {
            for col in col_start..col_end {
                self.unlock(row as i64, col as i64);
            }
        }
        if self.height % 2 == 1 && self.width % 2 == 1 {
            let (r, c) = (row_start as i64, col_start as i64);
            self.unlock(r - 1, c);
            self.unlock(r + 1, c);
            self.unlock(r, c - 1);
            self.unlock(r, c + 1);
        }
    }
    fn index(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row as i64, col as i64).map(|i| &self.cells[i])
    }
    fn unlock(&mut self, row: i64, col: i64) {
        if let Some(i) = self.index(row, col) {
            if self.cells[i].state == CellState::Hidden {
                self.cells[i].state = CellState::Unlocked;
            }
        }
    }
    fn pick(&mut self, row: usize, col: usize) -> Result<CardId, DraftError> {
        let i = self
            .index(row as i64, col as i64)
            .ok_or_else(|| DraftError::invalid("cell out of bounds"))?;
        match self.cells[i].state {
            CellState::Picked => return Err(DraftError::AlreadyTaken),
            CellState::Hidden => return Err(DraftError::invalid("cell is locked")),
            CellState::Unlocked => self.cells[i].state = CellState::Picked,
        }
        let (r, c) = (row as i64, col as i64);
        self.unlock(r - 1, c);
        self.unlock(r + 1, c);
        self.unlock(r, c - 1);
        self.unlock(r, c + 1);
        Ok(self.cells[i].card)
    }
    /// Card ids concealed for every cell not yet picked.
    fn stripped(&self) -> Vec<Vec<(CellState, Option<CardId>)>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| {
                        let cell = &self.cells[row * self.width + col];
                        match cell.state {
                            CellState::Picked => (cell.state, Some(cell.card)),
                            _ => (cell.state, None),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Turn-based reveal draft over a sequence of concealed grids.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MinesweeperState {
    seats: usize,
    grids: Vec<MinesweeperGrid>,
    picks_per_grid: usize,
    pick_number: usize,
    grid_number: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MinesweeperSync {
    pub grid: Vec<Vec<(CellState, Option<CardId>)>>,
    pub grid_count: usize,
    pub grid_number: usize,
    pub picks_per_grid: usize,
    pub pick_number: usize,
    pub current_actor: Option<Seat>,
}

impl MinesweeperState {
    pub fn new(
        packs: Vec<Vec<CardId>>,
        seats: usize,
        width: usize,
        height: usize,
        picks_per_grid: usize,
    ) -> Self {
        Self {
            seats,
            grids: packs
                .into_iter()
                .map(|p| MinesweeperGrid::new(p, width, height))
                .collect(),
            picks_per_grid: picks_per_grid.max(1),
            pick_number: 0,
            grid_number: 0,
        }
    }
    pub fn is_complete(&self) -> bool {
        self.grid_number >= self.grids.len()
    }
    /// Same rotated-snake arithmetic as the shared-pack draft, with the
    /// rotation sign flipped; preserved exactly.
    pub fn current_actor(&self) -> Option<Seat> {
        if self.is_complete() {
            return None;
        }
        let starting_direction = (self.grid_number / self.seats) % 2 == 1;
        let direction = (self.pick_number / self.seats) % 2 == 1;
        let offset = if direction {
            self.seats - 1 - (self.pick_number % self.seats)
        } else {
            self.pick_number % self.seats
        };
        let sign: i64 = if starting_direction { -1 } else { 1 };
        Some(neg_mod(
            self.grid_number as i64 + sign * offset as i64,
            self.seats,
        ))
    }
    /// First unlocked cell of the current grid, for forced picks.
    pub fn auto_cell(&self) -> Option<(usize, usize)> {
        let grid = self.grids.get(self.grid_number)?;
        (0..grid.height)
            .flat_map(|row| (0..grid.width).map(move |col| (row, col)))
            .find(|(row, col)| {
                grid.cells[row * grid.width + col].state == CellState::Unlocked
            })
    }
    pub fn pick_cell(&mut self, seat: Seat, row: usize, col: usize) -> Result<Outcome, DraftError> {
        if self.is_complete() {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        let grid_number = self.grid_number;
        let card = self.grids[grid_number].pick(row, col)?;
        let width = self.grids[grid_number].width;
        let record = LogPick::new(seat, vec![Some(card)], vec![row * width + col]);
        self.pick_number += 1;
        let mut outcome = Outcome::credit(seat, vec![card]).with_record(record);
        if self.pick_number == self.picks_per_grid {
            self.pick_number = 0;
            self.grid_number += 1;
            outcome = outcome.advanced();
        }
        Ok(outcome)
    }
    pub fn sync(&self) -> MinesweeperSync {
        MinesweeperSync {
            grid: self
                .grids
                .get(self.grid_number)
                .map(|g| g.stripped())
                .unwrap_or_default(),
            grid_count: self.grids.len(),
            grid_number: self.grid_number,
            picks_per_grid: self.picks_per_grid,
            pick_number: self.pick_number,
            current_actor: self.current_actor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(n: usize) -> Vec<CardId> {
        (0..n).map(|_| CardId::default()).collect()
    }

    #[test]
    fn center_plus_cross_unlocked_on_odd_grids() {
        let grid = MinesweeperGrid::new(cards(25), 5, 5);
        let unlocked: Vec<(usize, usize)> = (0..5)
            .flat_map(|r| (0..5).map(move |c| (r, c)))
            .filter(|(r, c)| grid.cell(*r, *c).unwrap().state == CellState::Unlocked)
            .collect();
        assert_eq!(unlocked, vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]);
    }
    #[test]
    fn pick_unlocks_neighbours_without_revealing() {
        let mut state = MinesweeperState::new(vec![cards(25)], 2, 5, 5, 10);
        state.pick_cell(0, 2, 2).unwrap();
        let sync = state.sync();
        // Picked cell is revealed, the newly unlocked ones are not.
        assert!(sync.grid[2][2].1.is_some());
        assert_eq!(sync.grid[1][2], (CellState::Unlocked, None));
        assert_eq!(sync.grid[0][2], (CellState::Hidden, None));
    }
    #[test]
    fn locked_and_picked_cells_rejected() {
        let mut state = MinesweeperState::new(vec![cards(25)], 2, 5, 5, 10);
        assert!(matches!(
            state.pick_cell(0, 0, 0),
            Err(DraftError::InvalidAction { .. })
        ));
        state.pick_cell(0, 2, 2).unwrap();
        assert_eq!(state.pick_cell(1, 2, 2), Err(DraftError::AlreadyTaken));
    }
    #[test]
    fn grid_advances_after_configured_picks() {
        let mut state = MinesweeperState::new(vec![cards(9), cards(9)], 2, 3, 3, 2);
        state.pick_cell(0, 1, 1).unwrap();
        let seat = state.current_actor().unwrap();
        let outcome = state.pick_cell(seat, 0, 1).unwrap();
        assert!(outcome.advanced);
        assert_eq!(state.sync().grid_number, 1);
        // Fresh grid: only its own center area is unlocked again.
        assert_eq!(
            state.sync().grid[1][1],
            (CellState::Unlocked, None)
        );
    }
}
