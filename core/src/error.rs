use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Mine layout does not match the board size")]
    InvalidBoardShape,
    #[error("Mines have not been placed yet")]
    MinesNotPlaced,
    #[error("Mines were already placed for this game")]
    MinesAlreadyPlaced,
}

pub type Result<T> = core::result::Result<T, GameError>;
