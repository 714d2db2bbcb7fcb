use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Both end states are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardStatus {
    InProgress,
    Won,
    Lost,
}

impl BoardStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for BoardStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Result of a reveal call, sized for incremental rendering: only the
/// positions whose observable state changed are listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub changed: Vec<Pos>,
    pub status: BoardStatus,
    /// The clicked mine, set when the reveal lost the game.
    pub detonated: Option<Pos>,
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// A single game board: fixed mine layout plus the player-visible grid.
///
/// Mines are placed when the board is generated, before any reveal, and
/// are never relocated; unlike implementations that guarantee a safe
/// first move, the very first reveal here can hit a mine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    grid: Array2<Cell>,
    revealed_safe: CellCount,
    flagged_count: CellCount,
    status: BoardStatus,
    detonated: Option<Pos>,
}

impl Board {
    /// Generates a fresh board for `mode`, seeding the mine placement.
    pub fn generate(mode: GameMode, seed: u64) -> Result<Self> {
        let layout = RandomLayoutGenerator::new(seed).generate(mode)?;
        Ok(Self::with_layout(layout))
    }

    /// Builds a board over a known mine layout.
    pub fn with_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            grid: Array2::default(size.to_nd_index()),
            revealed_safe: 0,
            flagged_count: 0,
            status: Default::default(),
            detonated: None,
        }
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Board size as `(rows, cols)`.
    pub fn size(&self) -> Pos {
        self.layout.size()
    }

    pub fn mode(&self) -> GameMode {
        let (rows, cols) = self.layout.size();
        GameMode::new(rows, cols, self.layout.mine_count())
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// How many mines have not been flagged yet; negative when overflagged.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.grid[pos.to_nd_index()]
    }

    pub fn detonated(&self) -> Option<Pos> {
        self.detonated
    }

    /// Reveals a cell.
    ///
    /// Revealing an already revealed or flagged cell, or any cell once the
    /// game is over, changes nothing and reports an empty change-set. A
    /// zero-adjacency reveal cascades through the connected blank region.
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.layout.validate_pos(pos)?;

        if self.status.is_finished() || !matches!(self.grid[pos.to_nd_index()], Cell::Hidden) {
            return Ok(self.no_change());
        }

        let mut changed = Vec::new();
        if self.layout.is_mine(pos) {
            self.detonated = Some(pos);
            self.status = BoardStatus::Lost;
            self.show_all_mines(pos, &mut changed);
            log::debug!("mine hit at {:?}", pos);
        } else {
            self.reveal_safe(pos, &mut changed);
            if self.revealed_safe == self.layout.safe_cell_count() {
                self.status = BoardStatus::Won;
                log::debug!("all safe cells revealed");
            }
        }

        Ok(RevealOutcome {
            changed,
            status: self.status,
            detonated: self.detonated,
        })
    }

    /// Flips the flag on a hidden cell, returning the new flagged state.
    ///
    /// Revealed cells and finished boards are left untouched; the current
    /// state is returned unchanged.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<bool> {
        let pos = self.layout.validate_pos(pos)?;

        if self.status.is_finished() {
            return Ok(self.grid[pos.to_nd_index()].is_flagged());
        }

        Ok(match self.grid[pos.to_nd_index()] {
            Cell::Hidden => {
                self.grid[pos.to_nd_index()] = Cell::Flagged;
                self.flagged_count += 1;
                true
            }
            Cell::Flagged => {
                self.grid[pos.to_nd_index()] = Cell::Hidden;
                self.flagged_count -= 1;
                false
            }
            cell => cell.is_flagged(),
        })
    }

    fn no_change(&self) -> RevealOutcome {
        RevealOutcome {
            changed: Vec::new(),
            status: self.status,
            detonated: self.detonated,
        }
    }

    fn reveal_safe(&mut self, pos: Pos, changed: &mut Vec<Pos>) {
        let count = self.layout.adjacent_count(pos);
        self.grid[pos.to_nd_index()] = Cell::Revealed(count);
        self.revealed_safe += 1;
        changed.push(pos);
        log::debug!("revealed {:?}, adjacent mines: {}", pos, count);

        if count == 0 {
            let mut visited = HashSet::from([pos]);
            let mut to_visit: VecDeque<_> = self
                .layout
                .iter_neighbors(pos)
                .filter(|&p| matches!(self.grid[p.to_nd_index()], Cell::Hidden))
                .collect();

            while let Some(visit_pos) = to_visit.pop_front() {
                if !visited.insert(visit_pos) {
                    continue;
                }

                // skip flagged cells and anything a previous step revealed
                if !matches!(self.grid[visit_pos.to_nd_index()], Cell::Hidden) {
                    continue;
                }

                let visit_count = self.layout.adjacent_count(visit_pos);
                self.grid[visit_pos.to_nd_index()] = Cell::Revealed(visit_count);
                self.revealed_safe += 1;
                changed.push(visit_pos);
                log::trace!("cascade revealed {:?}, adjacent mines: {}", visit_pos, visit_count);

                // only blank cells keep the cascade going
                if visit_count == 0 {
                    to_visit.extend(
                        self.layout
                            .iter_neighbors(visit_pos)
                            .filter(|&p| matches!(self.grid[p.to_nd_index()], Cell::Hidden))
                            .filter(|p| !visited.contains(p)),
                    );
                }
            }
        }
    }

    fn show_all_mines(&mut self, clicked: Pos, changed: &mut Vec<Pos>) {
        let (rows, cols) = self.layout.size();
        for row in 0..rows {
            for col in 0..cols {
                let pos = (row, col);
                if !self.layout.is_mine(pos) {
                    continue;
                }
                let shown = if pos == clicked {
                    Cell::Detonated
                } else {
                    Cell::Mine
                };
                if self.grid[pos.to_nd_index()] != shown {
                    self.grid[pos.to_nd_index()] = shown;
                    changed.push(pos);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Pos, mines: &[Pos]) -> Board {
        Board::with_layout(MineLayout::from_mine_positions(size, mines).unwrap())
    }

    #[test]
    fn reveal_mine_loses_and_shows_every_mine() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome.status, BoardStatus::Lost);
        assert_eq!(outcome.detonated, Some((0, 0)));
        assert_eq!(board.cell_at((0, 0)), Cell::Detonated);
        assert_eq!(board.cell_at((2, 2)), Cell::Mine);
        assert!(outcome.changed.contains(&(0, 0)));
        assert!(outcome.changed.contains(&(2, 2)));
    }

    #[test]
    fn loss_reveals_flagged_mines_too() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);
        assert!(board.toggle_flag((2, 2)).unwrap());

        board.reveal((0, 0)).unwrap();

        assert_eq!(board.cell_at((2, 2)), Cell::Mine);
    }

    #[test]
    fn blank_reveal_cascades_and_wins() {
        // mine in a corner: every other cell is connected through blanks
        let mut board = board((3, 3), &[(0, 0)]);

        let outcome = board.reveal((2, 2)).unwrap();

        assert_eq!(outcome.status, BoardStatus::Won);
        assert_eq!(outcome.changed.len(), 8);
        assert_eq!(board.cell_at((0, 0)), Cell::Hidden);
        assert_eq!(board.cell_at((1, 1)), Cell::Revealed(1));
        assert_eq!(board.cell_at((0, 1)), Cell::Revealed(1));
        assert_eq!(board.cell_at((1, 0)), Cell::Revealed(1));
        assert_eq!(board.cell_at((2, 2)), Cell::Revealed(0));
    }

    #[test]
    fn cascade_stops_at_numbered_boundary() {
        // mine at the middle of the right edge of a 3x4 grid
        let mut board = board((3, 4), &[(1, 3)]);

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome.status, BoardStatus::Won);
        for &pos in &outcome.changed {
            match board.cell_at(pos) {
                Cell::Revealed(count) => {
                    if count == 0 {
                        assert!(pos.1 < 2, "blank cell {:?} should sit left of the mine", pos);
                    }
                }
                cell => panic!("unexpected cell {:?} at {:?}", cell, pos),
            }
        }
        assert_eq!(board.cell_at((1, 3)), Cell::Hidden);
    }

    #[test]
    fn numbered_reveal_opens_exactly_one_cell() {
        let mut board = board((3, 3), &[(0, 0)]);

        let outcome = board.reveal((1, 1)).unwrap();

        assert_eq!(outcome.changed, vec![(1, 1)]);
        assert_eq!(outcome.status, BoardStatus::InProgress);
        assert_eq!(board.cell_at((1, 1)), Cell::Revealed(1));
    }

    #[test]
    fn reveal_is_a_noop_on_flagged_and_revealed_cells() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.toggle_flag((0, 1)).unwrap();
        board.reveal((1, 1)).unwrap();
        let before = board.clone();

        for pos in [(0, 1), (1, 1)] {
            let outcome = board.reveal(pos).unwrap();
            assert!(!outcome.has_update());
        }
        assert_eq!(board, before);
    }

    #[test]
    fn flagged_cell_blocks_the_cascade() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.toggle_flag((2, 0)).unwrap();

        let outcome = board.reveal((2, 2)).unwrap();

        assert_eq!(board.cell_at((2, 0)), Cell::Flagged);
        assert!(!outcome.changed.contains(&(2, 0)));
        // one safe cell is still covered by the flag
        assert_eq!(outcome.status, BoardStatus::InProgress);
    }

    #[test]
    fn win_requires_every_safe_cell() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(
            board.reveal((0, 1)).unwrap().status,
            BoardStatus::InProgress
        );
        assert_eq!(
            board.reveal((1, 0)).unwrap().status,
            BoardStatus::InProgress
        );
        let outcome = board.reveal((1, 1)).unwrap();
        assert_eq!(outcome.status, BoardStatus::Won);
        assert_eq!(outcome.detonated, None);
    }

    #[test]
    fn finished_board_ignores_further_moves() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.reveal((0, 0)).unwrap();
        assert_eq!(board.status(), BoardStatus::Lost);

        let outcome = board.reveal((1, 1)).unwrap();
        assert!(!outcome.has_update());
        assert_eq!(outcome.status, BoardStatus::Lost);
        assert!(!board.toggle_flag((1, 1)).unwrap());
        assert_eq!(board.cell_at((1, 1)), Cell::Hidden);
    }

    #[test]
    fn toggle_flag_flips_hidden_cells_only() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert!(board.toggle_flag((1, 1)).unwrap());
        assert_eq!(board.mines_left(), 0);
        assert!(!board.toggle_flag((1, 1)).unwrap());
        assert_eq!(board.mines_left(), 1);

        board.reveal((1, 1)).unwrap();
        assert!(!board.toggle_flag((1, 1)).unwrap());
        assert_eq!(board.cell_at((1, 1)), Cell::Revealed(1));
    }

    #[test]
    fn out_of_bounds_moves_are_errors() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoordinate));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoordinate));
    }
}
