use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Reference [`Grid`] backed by a 2D board, with mines generated on first use.
///
/// Mutations outside the board fail with [`GameError::InvalidCoords`], queries outside the board report `false`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield<G = RandomMineGenerator> {
    generator: G,
    mine_layout: Option<MineLayout>,
    board: Array2<SquareState>,
}

impl Minefield {
    /// Randomly mined field that keeps the first opened square safe.
    pub fn random(size: Coord2, seed: u64) -> Self {
        Self::new(size, RandomMineGenerator::new(seed, StartTile::SimpleSafe))
    }
}

impl Minefield<MineLayout> {
    /// Field that will use exactly `mine_layout` once mines are placed.
    pub fn with_layout(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self::new(size, mine_layout)
    }
}

impl<G: MineGenerator> Minefield<G> {
    pub fn new(size: Coord2, generator: G) -> Self {
        Self {
            generator,
            mine_layout: None,
            board: Array2::default(size.to_nd_index()),
        }
    }

    pub fn mine_layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn mines_placed(&self) -> bool {
        self.mine_layout.is_some()
    }

    pub fn square_at(&self, coords: Coord2) -> Option<SquareState> {
        self.board.get(coords.to_nd_index()).copied()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.is_out_of_bounds(coords) {
            Err(GameError::InvalidCoords)
        } else {
            Ok(coords)
        }
    }

    fn flood_open(&mut self, mine_layout: &MineLayout, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .board
            .iter_neighbors(start)
            .filter(|&pos| self.board[pos.to_nd_index()] == SquareState::Hidden)
            .collect();
        log::trace!("Starting flood-open from {:?}, initial neighbors: {:?}", start, to_visit);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // flags stop the cascade
            if self.board[visit_coords.to_nd_index()] != SquareState::Hidden {
                continue;
            }

            let visit_adjacent_mines = mine_layout.adjacent_mine_count(visit_coords);
            self.board[visit_coords.to_nd_index()] = SquareState::Opened(visit_adjacent_mines);
            opened += 1;
            log::trace!(
                "Flood opened square at {:?}, adjacent mines: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()] == SquareState::Hidden)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        opened
    }
}

impl<G: MineGenerator> Grid for Minefield<G> {
    fn width(&self) -> Coord {
        array_size(&self.board).0
    }

    fn height(&self) -> Coord {
        array_size(&self.board).1
    }

    fn has_mine(&self, coords: Coord2) -> bool {
        self.mine_layout
            .as_ref()
            .is_some_and(|mine_layout| mine_layout.contains_mine(coords))
    }

    fn place_mines(&mut self, count: CellCount, safe: Coord2) -> Result<()> {
        if self.mine_layout.is_some() {
            return Err(GameError::MinesAlreadyPlaced);
        }

        let config = GameConfig::new_unchecked(self.size(), count);
        let mine_layout = self.generator.generate(config, safe);
        if mine_layout.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }

        log::debug!(
            "Placed {} mines on {:?}, first square {:?}",
            mine_layout.mine_count(),
            self.size(),
            safe
        );
        self.mine_layout = Some(mine_layout);
        Ok(())
    }

    fn open_square(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.validate_coords(coords)?;
        // taken out while the board is mutated, restored below
        let mine_layout = self.mine_layout.take().ok_or(GameError::MinesNotPlaced)?;

        let opened = match self.board[coords.to_nd_index()] {
            SquareState::Hidden if mine_layout.contains_mine(coords) => {
                log::trace!("Opened mine at {:?}", coords);
                self.board[coords.to_nd_index()] = SquareState::Detonated;
                1
            }
            SquareState::Hidden => {
                let adjacent_mines = mine_layout.adjacent_mine_count(coords);
                self.board[coords.to_nd_index()] = SquareState::Opened(adjacent_mines);
                log::trace!("Opened square at {:?}, adjacent mines: {}", coords, adjacent_mines);

                if adjacent_mines == 0 {
                    1 + self.flood_open(&mine_layout, coords)
                } else {
                    1
                }
            }
            _ => 0,
        };

        self.mine_layout = Some(mine_layout);
        Ok(opened)
    }

    fn is_opened(&self, coords: Coord2) -> bool {
        self.square_at(coords).is_some_and(SquareState::is_opened)
    }

    fn toggle_flag(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let square = &mut self.board[coords.to_nd_index()];
        *square = match *square {
            SquareState::Hidden => SquareState::Flagged,
            SquareState::Flagged => SquareState::Hidden,
            opened => opened,
        };
        Ok(())
    }

    fn is_flagged(&self, coords: Coord2) -> bool {
        self.square_at(coords).is_some_and(SquareState::is_flagged)
    }
}
