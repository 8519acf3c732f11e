#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod tile;
mod types;

pub const MIN_BOARD_SIZE: Coord = 4;

pub const DEFAULT_MINE_FRACTION: f64 = 0.2;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mine_fraction: f64,
}

impl GameConfig {
    pub fn new(size: usize, mine_fraction: f64) -> Result<Self> {
        let config = Self {
            size: checked_size(size)?,
            mine_fraction,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_size(size: usize) -> Result<Self> {
        Self::new(size, DEFAULT_MINE_FRACTION)
    }

    pub fn validate(&self) -> Result<()> {
        checked_size(self.size.into())?;
        if !self.mine_fraction.is_finite() || !(0.0..1.0).contains(&self.mine_fraction) {
            return Err(GameError::InvalidMineFraction);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    /// `max(1, floor(size² × mine_fraction))`.
    pub fn mine_count(&self) -> CellCount {
        let scaled = f64::from(self.total_cells()) * self.mine_fraction;
        // float to int casts truncate, which is floor for the non-negative range
        (scaled as CellCount).max(1)
    }
}

pub(crate) fn checked_size(size: usize) -> Result<Coord> {
    match Coord::try_from(size) {
        Ok(size) if size >= MIN_BOARD_SIZE => Ok(size),
        _ => Err(GameError::InvalidSize(size)),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoOp,
    Continue,
    Won,
    Lost,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    NoOp,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineMarking {
    Exploded,
    Defused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineReveal {
    pub coords: Coord2,
    pub marking: MineMarking,
    pub triggered: bool,
}
