use crate::*;

/// Storage of per-square mine, open and flag state consumed by [`Minesweeper`].
///
/// Implementations own mine placement and the cascade that opens zero-adjacency regions. They also decide what
/// happens outside the board. Queries should report `false` there, while mutations may either reject the coordinates
/// or ignore them, as long as they do so consistently.
pub trait Grid {
    fn width(&self) -> Coord;

    fn height(&self) -> Coord;

    fn size(&self) -> Coord2 {
        (self.width(), self.height())
    }

    fn is_out_of_bounds(&self, (x, y): Coord2) -> bool {
        x >= self.width() || y >= self.height()
    }

    /// In-bounds squares around `coords`, row by row from the top-left.
    fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// `false` before mines are placed.
    fn has_mine(&self, coords: Coord2) -> bool;

    /// Places `count` mines keeping `safe` clear, called once per game.
    fn place_mines(&mut self, count: CellCount, safe: Coord2) -> Result<()>;

    /// Opens a hidden square, possibly cascading, and returns how many squares were newly opened.
    ///
    /// Flagged and already opened squares are left untouched and report zero.
    fn open_square(&mut self, coords: Coord2) -> Result<CellCount>;

    fn is_opened(&self, coords: Coord2) -> bool;

    /// Flips the flag of an unopened square.
    fn toggle_flag(&mut self, coords: Coord2) -> Result<()>;

    fn is_flagged(&self, coords: Coord2) -> bool;
}
