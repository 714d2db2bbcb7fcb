use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// A game from start to finish: the board plus wall-clock bookkeeping.
///
/// The session never ticks on its own; `elapsed_secs` reads the clock when
/// asked and freezes once the game ends. A display timer belongs to the
/// caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    move_count: u32,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            started_at: None,
            ended_at: None,
            move_count: 0,
        }
    }

    /// Generates a board for `mode` and wraps it in a fresh session.
    pub fn start(mode: GameMode, seed: u64) -> Result<Self> {
        Ok(Self::new(Board::generate(mode, seed)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }

    pub fn is_finished(&self) -> bool {
        self.board.is_finished()
    }

    /// Revealed safe cells so far, one point each.
    pub fn score(&self) -> CellCount {
        self.board.revealed_safe_count()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Seconds since the first reveal, 0 before it, frozen at game end.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let outcome = self.board.reveal(pos)?;
        if outcome.has_update() {
            self.move_count += 1;
            self.mark_started();
            if self.board.is_finished() {
                self.mark_ended();
            }
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<bool> {
        self.board.toggle_flag(pos)
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            let now = Utc::now();
            log::debug!("session started at {}", now);
            self.started_at = Some(now);
        }
    }

    fn mark_ended(&mut self) {
        if self.ended_at.is_none() {
            let now = Utc::now();
            log::debug!("session ended at {}", now);
            self.ended_at = Some(now);
        }
    }
}
