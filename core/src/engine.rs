use alloc::collections::VecDeque;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game, from a freshly generated board to a win or a loss.
///
/// All play goes through [`reveal`](Self::reveal) and [`flag`](Self::flag);
/// once the phase is terminal both reject further moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRepr")]
pub struct GameSession {
    board: Board,
    mines: MineSet,
    status: Array2<CellStatus>,
    revealed_count: CellCount,
    target_reveal_count: CellCount,
    flagged_count: CellCount,
    phase: GamePhase,
    triggered_mine: Option<Coord2>,
    touched: Vec<Coord2>,
}

/// Wire shape of [`GameSession`]. Counters and phase are recomputed from the
/// status grid and must agree with the stored ones.
#[derive(Deserialize)]
struct SessionRepr {
    board: Board,
    mines: MineSet,
    status: Array2<CellStatus>,
    revealed_count: CellCount,
    target_reveal_count: CellCount,
    flagged_count: CellCount,
    phase: GamePhase,
    triggered_mine: Option<Coord2>,
    touched: Vec<Coord2>,
}

impl TryFrom<SessionRepr> for GameSession {
    type Error = GameError;

    fn try_from(repr: SessionRepr) -> Result<Self> {
        let mut session = Self::new(repr.board, repr.mines)?;
        if repr.status.dim() != session.status.dim() {
            return Err(GameError::InvalidSessionState);
        }
        session.status = repr.status;

        let triggered_mine = {
            let mut revealed_mines = session
                .mines
                .iter()
                .filter(|pos| session.status[pos.to_nd_index()] == CellStatus::Revealed);
            let triggered_mine = revealed_mines.next();
            if revealed_mines.next().is_some() {
                return Err(GameError::InvalidSessionState);
            }
            triggered_mine
        };

        session.revealed_count = count_status(&session.status, CellStatus::Revealed);
        session.flagged_count = count_status(&session.status, CellStatus::Flagged);
        session.triggered_mine = triggered_mine;
        session.phase = if triggered_mine.is_some() {
            GamePhase::Lost
        } else if session.revealed_count >= session.target_reveal_count {
            GamePhase::Won
        } else {
            GamePhase::InProgress
        };

        let consistent = session.revealed_count == repr.revealed_count
            && session.flagged_count == repr.flagged_count
            && session.target_reveal_count == repr.target_reveal_count
            && session.phase == repr.phase
            && session.triggered_mine == repr.triggered_mine;
        if !consistent {
            return Err(GameError::InvalidSessionState);
        }

        for &coords in &repr.touched {
            session.board.validate_coords(coords)?;
        }
        session.touched = repr.touched;
        Ok(session)
    }
}

fn count_status(status: &Array2<CellStatus>, wanted: CellStatus) -> CellCount {
    let count = status.iter().filter(|&&cell| cell == wanted).count();
    count.try_into().unwrap_or(CellCount::MAX)
}

impl GameSession {
    pub fn new(board: Board, mines: MineSet) -> Result<Self> {
        if mines.len() != board.mine_count() || !mines.iter().all(|pos| board.contains_mine(pos)) {
            return Err(GameError::InvalidMineLayout);
        }

        let size = board.size();
        log::debug!(
            "New {}x{} session, {} safe cells to reveal",
            size,
            size,
            board.safe_cell_count()
        );
        Ok(Self {
            status: Array2::default((usize::from(size), usize::from(size))),
            revealed_count: 0,
            target_reveal_count: board.safe_cell_count(),
            flagged_count: 0,
            phase: GamePhase::InProgress,
            triggered_mine: None,
            touched: Vec::new(),
            board,
            mines,
        })
    }

    /// Generates a board with `generator` and starts a session on it.
    pub fn start(generator: impl BoardGenerator, config: &GameConfig) -> Result<Self> {
        let (board, mines) = generator.generate(config)?;
        Self::new(board, mines)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mines(&self) -> &MineSet {
        &self.mines
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn target_reveal_count(&self) -> CellCount {
        self.target_reveal_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines not yet accounted for by a flag; negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.mines.len() as isize) - (self.flagged_count as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn status_at(&self, coords: Coord2) -> Result<CellStatus> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.status[coords.to_nd_index()])
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        Ok(CellView::from_parts(
            self.status[coords.to_nd_index()],
            self.board[coords],
        ))
    }

    /// Cells whose status changed during the last accepted move.
    pub fn touched_cells(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        self.touched.iter().map(|&coords| {
            let view = CellView::from_parts(self.status[coords.to_nd_index()], self.board[coords]);
            (coords, view)
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_in_progress()?;
        self.touched.clear();

        if self.status[coords.to_nd_index()] != CellStatus::Hidden {
            return Ok(RevealOutcome::NoOp);
        }

        self.mark_revealed(coords);
        match self.board[coords] {
            CellContent::Mine => {
                self.triggered_mine = Some(coords);
                self.phase = GamePhase::Lost;
                log::debug!("Mine hit at {:?}, game lost", coords);
                return Ok(RevealOutcome::Lost);
            }
            CellContent::Clear(0) => {
                let opened = self.flood_fill(coords);
                log::trace!("Flood fill from {:?} opened {} cells", coords, opened);
            }
            CellContent::Clear(_) => {}
        }

        if self.revealed_count >= self.target_reveal_count {
            self.phase = GamePhase::Won;
            log::debug!("All {} safe cells revealed, game won", self.revealed_count);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Continue)
        }
    }

    pub fn flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_in_progress()?;
        self.touched.clear();

        let cell = &mut self.status[coords.to_nd_index()];
        let outcome = match *cell {
            CellStatus::Hidden => {
                *cell = CellStatus::Flagged;
                self.flagged_count = self.flagged_count.saturating_add(1);
                FlagOutcome::Flagged
            }
            CellStatus::Flagged => {
                *cell = CellStatus::Hidden;
                self.flagged_count = self.flagged_count.saturating_sub(1);
                FlagOutcome::Unflagged
            }
            CellStatus::Revealed => return Ok(FlagOutcome::NoOp),
        };
        self.touched.push(coords);
        Ok(outcome)
    }

    /// Display instructions for every mine, in row-major order, once the game
    /// is over.
    pub fn reveal_all_mines(&self) -> Result<Vec<MineReveal>> {
        let marking = match self.phase {
            GamePhase::InProgress => return Err(GameError::StillInProgress),
            GamePhase::Won => MineMarking::Defused,
            GamePhase::Lost => MineMarking::Exploded,
        };
        Ok(self
            .mines
            .iter()
            .map(|coords| MineReveal {
                coords,
                marking,
                triggered: self.triggered_mine == Some(coords),
            })
            .collect())
    }

    /// Opens the zero region around an already revealed zero cell, plus its
    /// non-zero border. Flagged cells and mines are never opened. Returns the
    /// number of cells opened besides `seed`.
    fn flood_fill(&mut self, seed: Coord2) -> CellCount {
        let mut opened = 0;
        let mut queue = VecDeque::from([seed]);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.board.iter_neighbors(current) {
                if self.status[neighbor.to_nd_index()] != CellStatus::Hidden {
                    continue;
                }
                let content = self.board[neighbor];
                if content.is_mine() {
                    continue;
                }

                self.mark_revealed(neighbor);
                opened += 1;
                if content.is_zero() {
                    queue.push_back(neighbor);
                }
            }
        }

        opened
    }

    fn mark_revealed(&mut self, coords: Coord2) {
        self.status[coords.to_nd_index()] = CellStatus::Revealed;
        self.revealed_count += 1;
        self.touched.push(coords);
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.phase.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(mines: &[Coord2]) -> GameSession {
        let config = GameConfig::with_size(4).unwrap();
        GameSession::start(FixedBoardGenerator::new(mines.iter().copied()), &config).unwrap()
    }

    #[test]
    fn revealing_mine_loses() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.reveal((0, 0)), Ok(RevealOutcome::Lost));
        assert_eq!(game.phase(), GamePhase::Lost);
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert_eq!(game.cell_view((0, 0)), Ok(CellView::Mine));
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.reveal((3, 3)), Ok(RevealOutcome::Continue));
        assert_eq!(game.revealed_count(), 12);
        assert_eq!(game.touched_cells().count(), 12);
        assert_eq!(game.cell_view((2, 2)), Ok(CellView::Clear(1)));
        assert_eq!(game.cell_view((0, 3)), Ok(CellView::Clear(0)));
        assert_eq!(game.cell_view((0, 1)), Ok(CellView::Hidden));
        assert_eq!(game.cell_view((1, 0)), Ok(CellView::Hidden));
        assert_eq!(game.cell_view((1, 1)), Ok(CellView::Hidden));
    }

    #[test]
    fn flood_fill_leaves_flags_alone() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.flag((0, 3)), Ok(FlagOutcome::Flagged));
        assert_eq!(game.reveal((3, 3)), Ok(RevealOutcome::Continue));
        assert_eq!(game.revealed_count(), 11);
        assert_eq!(game.status_at((0, 3)), Ok(CellStatus::Flagged));
        assert_eq!(game.status_at((0, 2)), Ok(CellStatus::Revealed));
    }

    #[test]
    fn nonzero_cell_does_not_propagate() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.reveal((2, 2)), Ok(RevealOutcome::Continue));
        assert_eq!(game.revealed_count(), 1);
        assert_eq!(
            game.touched_cells().collect::<Vec<_>>(),
            [((2, 2), CellView::Clear(1))]
        );
    }

    #[test]
    fn clearing_last_safe_cells_wins() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.reveal((3, 3)), Ok(RevealOutcome::Continue));
        assert_eq!(game.reveal((0, 1)), Ok(RevealOutcome::Continue));
        assert_eq!(game.reveal((1, 0)), Ok(RevealOutcome::Won));
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(game.revealed_count(), game.target_reveal_count());
    }

    #[test]
    fn flagged_cell_cannot_be_revealed_until_unflagged() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.flag((2, 2)), Ok(FlagOutcome::Flagged));
        assert_eq!(game.reveal((2, 2)), Ok(RevealOutcome::NoOp));
        assert_eq!(game.touched_cells().count(), 0);
        assert_eq!(game.flag((2, 2)), Ok(FlagOutcome::Unflagged));
        assert_eq!(game.reveal((2, 2)), Ok(RevealOutcome::Continue));
        assert_eq!(game.status_at((2, 2)), Ok(CellStatus::Revealed));
    }

    #[test]
    fn revealed_cell_ignores_flag_and_reveal() {
        let mut game = session(&[(0, 0), (1, 1)]);

        game.reveal((2, 2)).unwrap();
        assert_eq!(game.flag((2, 2)), Ok(FlagOutcome::NoOp));
        assert_eq!(game.reveal((2, 2)), Ok(RevealOutcome::NoOp));
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut game = session(&[(0, 0)]);

        assert_eq!(game.reveal((4, 0)), Err(GameError::OutOfBounds((4, 0))));
        assert_eq!(game.flag((0, 9)), Err(GameError::OutOfBounds((0, 9))));
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn moves_after_game_over_are_rejected() {
        let mut game = session(&[(0, 0), (1, 1)]);

        game.reveal((1, 1)).unwrap();
        assert_eq!(game.reveal((3, 3)), Err(GameError::AlreadyEnded));
        assert_eq!(game.flag((3, 3)), Err(GameError::AlreadyEnded));
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn mines_left_tracks_flags() {
        let mut game = session(&[(0, 0), (1, 1)]);

        game.flag((0, 0)).unwrap();
        game.flag((3, 3)).unwrap();
        game.flag((3, 2)).unwrap();
        assert_eq!(game.flagged_count(), 3);
        assert_eq!(game.mines_left(), -1);
        game.flag((3, 2)).unwrap();
        assert_eq!(game.mines_left(), 0);
    }

    #[test]
    fn all_mines_explode_on_loss() {
        let mut game = session(&[(0, 0), (1, 1)]);

        assert_eq!(game.reveal_all_mines(), Err(GameError::StillInProgress));
        game.reveal((1, 1)).unwrap();
        let revealed = game.reveal_all_mines().unwrap();
        assert_eq!(
            revealed,
            [
                MineReveal {
                    coords: (0, 0),
                    marking: MineMarking::Exploded,
                    triggered: false,
                },
                MineReveal {
                    coords: (1, 1),
                    marking: MineMarking::Exploded,
                    triggered: true,
                },
            ]
        );
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn all_mines_defused_on_win() {
        let mut game = session(&[(0, 0), (1, 1)]);

        game.reveal((3, 3)).unwrap();
        game.reveal((0, 1)).unwrap();
        game.reveal((1, 0)).unwrap();
        let revealed = game.reveal_all_mines().unwrap();
        assert!(
            revealed
                .iter()
                .all(|mine| mine.marking == MineMarking::Defused && !mine.triggered)
        );
        assert_eq!(revealed.len(), 2);
    }

    #[test]
    fn mismatched_mine_set_is_rejected() {
        let config = GameConfig::with_size(4).unwrap();
        let (board, _) = FixedBoardGenerator::new([(0, 0)]).generate(&config).unwrap();
        let other: MineSet = [(2, 2)].into_iter().collect();
        assert_eq!(
            GameSession::new(board, other),
            Err(GameError::InvalidMineLayout)
        );
    }
}
