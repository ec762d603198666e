//! Rules engine for a grid-based mine-clearing puzzle.
//!
//! [`Minesweeper`] owns the game phase, the opened and flagged counters and the start/win/loss observers, and
//! delegates per-square state to a [`Grid`]. [`Minefield`] is the bundled grid: mines are generated on the first open
//! so that the first square is safe, and opening a square with no adjacent mines cascades over its zero region.
//!
//! ```
//! use minesweeper_rules::*;
//!
//! let layout = MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap();
//! let mut game = Minesweeper::with_grid(Minefield::with_layout(layout), 1);
//!
//! assert_eq!(game.open_square((1, 1)).unwrap(), OpenOutcome::Opened);
//! game.toggle_flag((2, 2)).unwrap();
//! assert_eq!(game.deducible_safe_squares((1, 1)).len(), 7);
//! assert_eq!(game.chord_open((1, 1)).unwrap(), OpenOutcome::Won);
//! ```

#![no_std]

extern crate alloc;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use grid::*;
pub use layout::*;
pub use minefield::*;
pub use phase::*;
pub use square::*;
pub use types::*;

mod config;
mod engine;
mod error;
mod events;
mod generator;
mod grid;
mod layout;
mod minefield;
mod phase;
mod square;
mod types;
