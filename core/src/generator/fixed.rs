use alloc::vec::Vec;

use super::*;

/// Places mines at explicit coordinates, for hand-designed layouts or for
/// reproducing a board that was reported elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator {
    mines: Vec<Coord2>,
}

impl FixedBoardGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl BoardGenerator for FixedBoardGenerator {
    /// Uses only the size of `config`; the mine fraction is ignored.
    fn generate(self, config: &GameConfig) -> Result<(Board, MineSet)> {
        let mines: MineSet = self.mines.into_iter().collect();
        let board = Board::from_mine_set(config.size.into(), &mines)?;
        log::debug!(
            "Built {}x{} board from {} fixed mines",
            config.size,
            config.size,
            board.mine_count()
        );
        Ok((board, mines))
    }
}
