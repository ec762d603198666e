use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::*;

/// Generation strategy that can optionally keep the first square safe, or safe with no adjacent mines, but other than
/// that is purely random.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomMineGenerator {
    seed: u64,
    start_tile: StartTile,
}

impl RandomMineGenerator {
    pub fn new(seed: u64, start_tile: StartTile) -> Self {
        Self { seed, start_tile }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn start_tile(&self) -> StartTile {
        self.start_tile
    }

    /// Downgrades the requested start policy when the board is too crowded for it or `safe` is off the board.
    fn effective_start_tile(&self, config: GameConfig, safe: Coord2) -> StartTile {
        use StartTile::*;

        let total_cells = config.total_cells();
        match self.start_tile {
            Random => Random,
            SimpleSafe | AlwaysZero if safe.0 >= config.size.0 || safe.1 >= config.size.1 => {
                log::warn!("Start tile {:?} is outside the board, fallback to random", safe);
                Random
            }
            SimpleSafe | AlwaysZero if config.mines + 1 > total_cells => {
                log::warn!("Cannot make start tile safe, fallback to random");
                Random
            }
            SimpleSafe => SimpleSafe,
            AlwaysZero if config.mines + 9 > total_cells => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                SimpleSafe
            }
            AlwaysZero => AlwaysZero,
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> MineLayout {
        use StartTile::*;

        let total_cells = config.total_cells();

        // optimize for full boards
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(config.size.to_nd_index(), true));
        }

        let start_tile = self.effective_start_tile(config, safe);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        // reserve the protected squares as if they were mines
        let reserved: Vec<Coord2> = match start_tile {
            Random => Vec::new(),
            SimpleSafe => alloc::vec![safe],
            AlwaysZero => core::iter::once(safe)
                .chain(mines.iter_neighbors(safe))
                .collect(),
        };
        for &coords in &reserved {
            mines[coords.to_nd_index()] = true;
        }
        let mut free_cells = total_cells - reserved.len() as CellCount;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        while mines_placed < config.mines && free_cells > 0 {
            // pick the n-th free square, skipping the occupied ones
            let mut place: CellCount = rng.random_range(0..free_cells);
            for (i, cell) in mines.iter_mut().enumerate() {
                let i = i as CellCount;
                if *cell {
                    place += 1;
                }
                if i == place {
                    *cell = true;
                    mines_placed += 1;
                    free_cells -= 1;
                    break;
                }
            }
        }

        // undo the reservation
        for &coords in &reserved {
            mines[coords.to_nd_index()] = false;
        }

        let layout = MineLayout::from_mine_mask(mines);
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        log::debug!(
            "Generated {} mines on {:?} around start {:?} ({:?})",
            layout.mine_count(),
            config.size,
            safe,
            start_tile
        );
        layout
    }
}
