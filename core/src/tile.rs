use serde::{Deserialize, Serialize};

/// What a cell holds, fixed at generation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    Mine,
    /// Safe cell with the number of mines among its neighbours (0..=8).
    Clear(u8),
}

impl CellContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Clear(0))
    }
}

/// Player-side status of a cell, mutated during play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// What a display adapter is allowed to show for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Clear(u8),
    Mine,
}

impl CellView {
    pub(crate) const fn from_parts(status: CellStatus, content: CellContent) -> Self {
        match (status, content) {
            (CellStatus::Hidden, _) => Self::Hidden,
            (CellStatus::Flagged, _) => Self::Flagged,
            (CellStatus::Revealed, CellContent::Mine) => Self::Mine,
            (CellStatus::Revealed, CellContent::Clear(count)) => Self::Clear(count),
        }
    }
}
