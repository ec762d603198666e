use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps both axes to at least one square and the mine count to the board area.
    ///
    /// A board completely filled with mines is still accepted, see [`GameConfig::validate`].
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.max(1);
        let size_y = size_y.max(1);
        let mines = mines.min(mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), mines)
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Checks that the game leaves at least one safe square to open.
    pub fn validate(&self) -> Result<()> {
        if self.mines >= self.total_cells() {
            Err(GameError::TooManyMines)
        } else {
            Ok(())
        }
    }
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.config()
    }
}

/// Classic board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40),
            Self::Expert => GameConfig::new_unchecked((30, 16), 99),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}
