use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Consecutive repeated draws allowed per board cell before the random source
/// is considered stuck.
const MAX_MISSES_PER_CELL: u32 = 64;

/// Places `config.mine_count()` mines uniformly at random and computes the
/// adjacency counts of the resulting board.
///
/// Coordinates are drawn independently and duplicates are redrawn. The mine
/// fraction stays below one, so some cell is always free and the expected
/// number of redraws is small for usual densities.
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<(Board, MineSet)> {
    config.validate()?;

    let size = config.size;
    let target = config.mine_count();
    let max_misses = u32::from(config.total_cells()) * MAX_MISSES_PER_CELL;

    let mut mines = MineSet::new();
    let mut misses = 0;
    while mines.len() < target {
        let coords = (rng.random_range(0..size), rng.random_range(0..size));
        if mines.insert(coords) {
            log::trace!("Placed mine {} of {} at {:?}", mines.len(), target, coords);
            misses = 0;
        } else {
            misses += 1;
            if misses >= max_misses {
                log::warn!(
                    "Random source repeated {} draws in a row after placing {} of {} mines",
                    misses,
                    mines.len(),
                    target
                );
                return Err(GameError::InvalidRng);
            }
        }
    }

    let board = Board::from_mine_set(size.into(), &mines)?;
    log::debug!(
        "Generated {}x{} board with {} mines",
        size,
        size,
        board.mine_count()
    );
    Ok((board, mines))
}

/// Purely random placement driven by any [`Rng`].
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator<R> {
    rng: R,
}

impl<R: Rng> RandomBoardGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomBoardGenerator<SmallRng> {
    /// The same seed always produces the same board for a given config.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<R> {
    fn generate(mut self, config: &GameConfig) -> Result<(Board, MineSet)> {
        generate(config, &mut self.rng)
    }
}
