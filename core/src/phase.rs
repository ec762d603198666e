use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Active
/// - Active -> Won
/// - Active -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Active,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_not_started(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Lost)
    }

    /// Indicates the game has ended and its outcome can no longer change
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Phase and counters of a game, only ever updated together through the transition methods.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStatus {
    phase: GamePhase,
    opened_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
}

impl GameStatus {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Mines minus flags, negative when more flags than mines were placed.
    pub fn flags_left(&self, mine_count: CellCount) -> isize {
        (mine_count as isize) - (self.flagged_count.0 as isize)
    }

    /// Moves out of `NotStarted`, returns whether the transition happened.
    pub(crate) fn start(&mut self) -> bool {
        if self.phase.is_not_started() {
            self.phase = GamePhase::Active;
            true
        } else {
            false
        }
    }

    pub(crate) fn record_flag(&mut self, flagged: bool) {
        if self.phase.is_lost() {
            return;
        }
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
    }

    /// Adds safely opened squares and wins when exactly `safe_cells` squares are open, never when it is `None`.
    /// Returns whether the game was won.
    pub(crate) fn record_opened(
        &mut self,
        newly_opened: CellCount,
        safe_cells: Option<CellCount>,
    ) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.opened_count += newly_opened;
        if Some(self.opened_count.0) == safe_cells {
            self.phase = GamePhase::Won;
            true
        } else {
            false
        }
    }

    /// Returns whether the game was lost by this call.
    pub(crate) fn record_detonation(&mut self) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.phase = GamePhase::Lost;
        true
    }
}
