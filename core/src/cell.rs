use serde::{Deserialize, Serialize};

/// Player-visible state of a single grid cell.
///
/// A cell is either flagged or revealed, never both; the flag has to be
/// removed before the cell can be revealed. `Mine` and `Detonated` only
/// appear once the game is lost, when the whole mine layout is shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Revealed(u8),
    Flagged,
    /// A mine shown at game end.
    Mine,
    /// The mine that was actually clicked.
    Detonated,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Mine | Self::Detonated)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
