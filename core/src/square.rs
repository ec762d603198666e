use serde::{Deserialize, Serialize};

/// Player-visible state of a single square stored by [`crate::Minefield`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareState {
    Hidden,
    Flagged,
    /// Opened safe square with its adjacent mine count.
    Opened(u8),
    /// Opened square that held a mine.
    Detonated,
}

impl SquareState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened(_) | Self::Detonated)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for SquareState {
    fn default() -> Self {
        Self::Hidden
    }
}
