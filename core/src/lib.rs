use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod types;

/// Grid size and mine count for a game.
///
/// Three canonical presets plus arbitrary triples; degenerate
/// configurations are rejected at generation time, never clamped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameMode {
    pub const fn new(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    pub const fn beginner() -> Self {
        Self::new(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new(16, 30, 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        if self.mines == 0 || self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(())
    }

    /// Identifier used to bucket leaderboards per mode.
    pub fn key(&self) -> String {
        match *self {
            mode if mode == Self::beginner() => "beginner".to_owned(),
            mode if mode == Self::intermediate() => "intermediate".to_owned(),
            mode if mode == Self::expert() => "expert".to_owned(),
            Self { rows, cols, mines } => format!("{rows}x{cols}m{mines}"),
        }
    }
}

/// Final mine placement for a board, fixed at generation time.
///
/// The adjacency table is computed once from the finished mask and never
/// changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let mut adjacent: Array2<u8> = Array2::default(mine_mask.raw_dim());
        for ((row, col), count) in adjacent.indexed_iter_mut() {
            let pos = (row.try_into().unwrap(), col.try_into().unwrap());
            *count = mine_mask
                .iter_neighbors(pos)
                .filter(|&neighbor| mine_mask[neighbor.to_nd_index()])
                .count()
                .try_into()
                .unwrap();
        }

        Self {
            mine_mask,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_positions(size: Pos, mine_positions: &[Pos]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &pos in mine_positions {
            if pos.0 >= size.0 || pos.1 >= size.1 {
                return Err(GameError::InvalidCoordinate);
            }
            mine_mask[pos.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn validate_pos(&self, pos: Pos) -> Result<Pos> {
        let size = self.size();
        if pos.0 < size.0 && pos.1 < size.1 {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoordinate)
        }
    }

    /// Board size as `(rows, cols)`.
    pub fn size(&self) -> Pos {
        let dim = self.mine_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn is_mine(&self, pos: Pos) -> bool {
        self.mine_mask[pos.to_nd_index()]
    }

    pub fn adjacent_count(&self, pos: Pos) -> u8 {
        self.adjacent[pos.to_nd_index()]
    }

    pub(crate) fn iter_neighbors(&self, pos: Pos) -> NeighborIter {
        self.mine_mask.iter_neighbors(pos)
    }
}
