//! Text rendering of a session, row and column labels included.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use buscaminas_core::{CellView, Coord2, GameSession, MineMarking, MineReveal};

const CELL_WIDTH: usize = 3;

fn glyph(view: CellView, mine: Option<&MineReveal>) -> char {
    match (mine, view) {
        (Some(mine), _) if mine.triggered => 'X',
        (Some(mine), _) if mine.marking == MineMarking::Exploded => '*',
        (Some(_), _) => '+',
        (None, CellView::Hidden) => '.',
        (None, CellView::Flagged) => 'F',
        (None, CellView::Clear(0)) => ' ',
        (None, CellView::Clear(count)) => char::from_digit(count.into(), 10).unwrap_or('?'),
        (None, CellView::Mine) => '*',
    }
}

/// Renders the board as the player sees it. Once the game is over every mine
/// is drawn with its final marking.
pub fn render_board(game: &GameSession) -> Result<String> {
    let size = game.size();
    let mines: BTreeMap<Coord2, MineReveal> = if game.is_finished() {
        game.reveal_all_mines()?
            .into_iter()
            .map(|mine| (mine.coords, mine))
            .collect()
    } else {
        BTreeMap::new()
    };

    let mut out = String::new();
    out.push_str("    ");
    for col in 0..size {
        write!(out, "{col:>CELL_WIDTH$}")?;
    }
    out.push('\n');
    out.push_str("    ");
    out.push_str(&"-".repeat(usize::from(size) * CELL_WIDTH));
    out.push('\n');

    for row in 0..size {
        write!(out, "{row:>CELL_WIDTH$} |")?;
        for col in 0..size {
            let view = game.cell_view((row, col))?;
            let cell = glyph(view, mines.get(&(row, col)));
            write!(out, "{cell:>CELL_WIDTH$}")?;
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buscaminas_core::{FixedBoardGenerator, GameConfig};

    fn game() -> GameSession {
        let config = GameConfig::with_size(4).unwrap();
        GameSession::start(FixedBoardGenerator::new([(0, 0), (1, 1)]), &config).unwrap()
    }

    #[test]
    fn hidden_board_has_labels() {
        let text = render_board(&game()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "      0  1  2  3");
        assert_eq!(lines[1], "    ------------");
        assert_eq!(lines[2], "  0 |  .  .  .  .");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn revealed_counts_and_flags_are_drawn() {
        let mut game = game();
        game.flag((0, 1)).unwrap();
        game.reveal((3, 3)).unwrap();
        let text = render_board(&game).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[2].trim_end(), "  0 |  .  F  1");
        assert_eq!(lines[4].trim_end(), "  2 |  1  1  1");
    }

    #[test]
    fn lost_game_shows_every_mine() {
        let mut game = game();
        game.reveal((1, 1)).unwrap();
        let text = render_board(&game).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[2], "  0 |  *  .  .  .");
        assert_eq!(lines[3], "  1 |  .  X  .  .");
    }

    #[test]
    fn won_game_shows_defused_mines() {
        let mut game = game();
        for coords in [(3, 3), (0, 1), (1, 0)] {
            game.reveal(coords).unwrap();
        }
        let text = render_board(&game).unwrap();
        assert_eq!(text.lines().nth(2), Some("  0 |  +  2  1   "));
    }
}
