use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size {0} is outside the supported range 4..=255")]
    InvalidSize(usize),
    #[error("Mine fraction must be a finite number in [0, 1)")]
    InvalidMineFraction,
    #[error("Random source kept repeating coordinates, cannot place mines")]
    InvalidRng,
    #[error("Coordinates {0:?} are outside the board")]
    OutOfBounds(Coord2),
    #[error("Mine layout does not match the board")]
    InvalidMineLayout,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game is still in progress")]
    StillInProgress,
    #[error("Session state does not match its board")]
    InvalidSessionState,
}

pub type Result<T> = core::result::Result<T, GameError>;
