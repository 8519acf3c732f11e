//! Turns typed lines into engine moves with in-bounds coordinates.

use buscaminas_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown command '{0}', type 'h' for help")]
    Unknown(String),
    #[error("Usage: {0} <row> <col>")]
    MissingCoords(&'static str),
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("Row and column must be between 0 and {max}")]
    OutOfRange { max: usize },
}

pub const HELP: &str = "\
Commands (rows and columns start at 0):
  r <row> <col>  reveal a cell
  f <row> <col>  toggle a flag
  h              show this help
  q              quit";

/// Parses a non-empty input line for a board of side `size`.
pub fn parse_command(line: &str, size: Coord) -> Result<Command, InputError> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_lowercase();

    match verb.as_str() {
        "r" | "reveal" => parse_coords(parts, size, "r").map(Command::Reveal),
        "f" | "flag" => parse_coords(parts, size, "f").map(Command::Flag),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(InputError::Unknown(verb)),
    }
}

fn parse_coords<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    size: Coord,
    verb: &'static str,
) -> Result<Coord2, InputError> {
    let (Some(row), Some(col)) = (parts.next(), parts.next()) else {
        return Err(InputError::MissingCoords(verb));
    };
    Ok((parse_axis(row, size)?, parse_axis(col, size)?))
}

fn parse_axis(text: &str, size: Coord) -> Result<Coord, InputError> {
    let value: usize = text
        .parse()
        .map_err(|_| InputError::NotANumber(text.to_string()))?;
    if value < usize::from(size) {
        Ok(value as Coord)
    } else {
        Err(InputError::OutOfRange {
            max: usize::from(size) - 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!(parse_command("r 2 3", 8), Ok(Command::Reveal((2, 3))));
        assert_eq!(parse_command("  FLAG 0 7 ", 8), Ok(Command::Flag((0, 7))));
        assert_eq!(parse_command("q", 8), Ok(Command::Quit));
        assert_eq!(parse_command("help", 8), Ok(Command::Help));
    }

    #[test]
    fn rejects_coordinates_outside_board() {
        assert_eq!(
            parse_command("r 8 0", 8),
            Err(InputError::OutOfRange { max: 7 })
        );
        assert_eq!(
            parse_command("f 1 -1", 8),
            Err(InputError::NotANumber("-1".to_string()))
        );
    }

    #[test]
    fn reports_missing_and_unknown_input() {
        assert_eq!(parse_command("r 1", 8), Err(InputError::MissingCoords("r")));
        assert_eq!(
            parse_command("dig 1 1", 8),
            Err(InputError::Unknown("dig".to_string()))
        );
    }
}
