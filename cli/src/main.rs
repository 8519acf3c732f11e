use std::io::{self, BufRead, Write};

use anyhow::Result;
use buscaminas_core::{
    CellView, DEFAULT_MINE_FRACTION, FlagOutcome, GameConfig, GamePhase, GameSession,
    RandomBoardGenerator, RevealOutcome,
};
use clap::Parser;

use input::Command;

mod input;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper on a square board", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Side length of the board
    #[arg(short = 'n', long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(4..))]
    size: u8,

    /// Share of cells that hold a mine
    #[arg(short, long, default_value_t = DEFAULT_MINE_FRACTION)]
    mine_fraction: f64,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let config = GameConfig::new(args.size.into(), args.mine_fraction)?;
    let mines = config.mine_count();
    println!(
        "Creating a {size}x{size} board with {mines} {noun}.",
        size = config.size,
        noun = if mines == 1 { "mine" } else { "mines" },
    );

    let mut game = GameSession::start(RandomBoardGenerator::from_seed(seed), &config)?;
    play(&mut game, io::stdin().lock(), io::stdout().lock())
}

/// Reads commands until the game ends or input runs out.
fn play(game: &mut GameSession, reader: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "{}", input::HELP)?;
    writeln!(out, "\n{}", render::render_board(game)?)?;

    let mut lines = reader.lines();
    while !game.is_finished() {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match input::parse_command(line, game.size()) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{}", input::HELP)?;
                continue;
            }
            Command::Reveal(coords) => match game.reveal(coords)? {
                RevealOutcome::NoOp => {
                    writeln!(out, "That cell is flagged or already revealed.")?;
                    continue;
                }
                RevealOutcome::Continue
                    if matches!(game.cell_view(coords), Ok(CellView::Clear(count)) if count > 0) =>
                {
                    writeln!(out, "A mine is close...")?;
                }
                _ => {}
            },
            Command::Flag(coords) => {
                if game.flag(coords)? == FlagOutcome::NoOp {
                    writeln!(out, "Revealed cells cannot be flagged.")?;
                    continue;
                }
            }
        }

        log::debug!(
            "{} cells changed, {} of {} revealed",
            game.touched_cells().count(),
            game.revealed_count(),
            game.target_reveal_count()
        );
        writeln!(out, "\n{}", render::render_board(game)?)?;
    }

    match game.phase() {
        GamePhase::Won => writeln!(out, "Congratulations! You cleared the board!")?,
        GamePhase::Lost => writeln!(out, "Boom! You hit a mine. Game over.")?,
        GamePhase::InProgress => writeln!(out, "Bye. {} mines left.", game.mines_left())?,
    }
    Ok(())
}
