use alloc::collections::BTreeSet;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Mine coordinates of a board, iterated in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineSet(BTreeSet<Coord2>);

impl MineSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> CellCount {
        self.0.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.0.contains(&coords)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.0.iter().copied()
    }

    /// Returns `false` when the coordinates were already taken.
    pub(crate) fn insert(&mut self, coords: Coord2) -> bool {
        self.0.insert(coords)
    }
}

impl FromIterator<Coord2> for MineSet {
    fn from_iter<I: IntoIterator<Item = Coord2>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Immutable square grid of mines and precomputed adjacency counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    cells: Array2<CellContent>,
    mine_count: CellCount,
}

/// Wire shape of [`Board`], checked before it becomes one.
#[derive(Deserialize)]
struct BoardRepr {
    cells: Array2<CellContent>,
    mine_count: CellCount,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self> {
        let (rows, cols) = repr.cells.dim();
        if rows != cols {
            return Err(GameError::InvalidMineLayout);
        }

        let mines: MineSet = repr
            .cells
            .indexed_iter()
            .filter(|(_, content)| content.is_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect();
        let board = Self::from_mine_set(rows, &mines)?;
        if board.mine_count != repr.mine_count || board.cells != repr.cells {
            return Err(GameError::InvalidMineLayout);
        }
        Ok(board)
    }
}

impl Board {
    /// Builds the board for `mines`, counting adjacency by walking the
    /// neighbours of every mine.
    pub fn from_mine_set(size: usize, mines: &MineSet) -> Result<Self> {
        let size = checked_size(size)?;
        let total_cells = square(size);
        if mines.is_empty() || mines.len() >= total_cells {
            return Err(GameError::InvalidMineLayout);
        }

        let shape = (usize::from(size), usize::from(size));
        let mut counts: Array2<u8> = Array2::from_elem(shape, 0);
        for mine in mines.iter() {
            if mine.0 >= size || mine.1 >= size {
                return Err(GameError::OutOfBounds(mine));
            }
            for neighbor in counts.iter_neighbors(mine) {
                counts[neighbor.to_nd_index()] += 1;
            }
        }

        let cells = Array2::from_shape_fn(shape, |(row, col)| {
            if mines.contains((row as Coord, col as Coord)) {
                CellContent::Mine
            } else {
                CellContent::Clear(counts[[row, col]])
            }
        });

        Ok(Self {
            cells,
            mine_count: mines.len(),
        })
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds(coords))
        }
    }

    pub fn content(&self, coords: Coord2) -> Option<CellContent> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.content(coords).is_some_and(CellContent::is_mine)
    }

    /// Counts mines around `coords` by querying its neighbours directly.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Every cell with its coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, CellContent)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &content)| ((row as Coord, col as Coord), content))
    }
}

impl Index<Coord2> for Board {
    type Output = CellContent;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
