use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Produces the mine layout of a game once the first square to open is known.
pub trait MineGenerator {
    /// `safe` is the first square the player opens; generators keep it clear when they can.
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout;
}

/// A fixed layout replays the same mines regardless of the first square.
impl MineGenerator for MineLayout {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout {
        if self.mine_count() != config.mines {
            log::warn!(
                "Fixed layout has {} mines but {} were requested",
                self.mine_count(),
                config.mines
            );
        }
        if self.contains_mine(safe) {
            log::warn!("Fixed layout has a mine on the first square {:?}", safe);
        }
        self.clone()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartTile {
    /// No guarantee, the first square may hold a mine.
    Random,
    /// The first square never holds a mine.
    SimpleSafe,
    /// Neither the first square nor any of its neighbors hold a mine.
    AlwaysZero,
}

impl Default for StartTile {
    fn default() -> Self {
        Self::SimpleSafe
    }
}
