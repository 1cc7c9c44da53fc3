use crate::grid::{FormatError, Grid};
use std::fs;
use std::io;
use std::path::Path;

/// Raised when grid text cannot be turned into a `Grid`.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("missing `n m` header line")]
    MissingHeader,
    #[error("malformed header {0:?}, expected `n m`")]
    BadHeader(String),
    #[error("line {line}: expected {expected} more grid lines")]
    MissingLine { line: usize, expected: usize },
    #[error("line {line}: {token:?} is not an integer")]
    InvalidInteger { line: usize, token: String },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Parses a grid from its text form.
///
/// The text must be laid out as:
/// - a first line `n m`,
/// - `n` lines of `m` color codes (`0` white, `1` red, `2` blue, `3` green,
///   `4` black),
/// - if `read_values` is set, `n` lines of `m` integer values.
///
/// Blank lines are ignored. Without values every cell gets the value `1`.
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(ParseError)` if a line is missing, a token is not an integer, a row
///   has the wrong length, or a color code is out of the palette.
///
/// # Examples
/// ```
/// use pairgrid_solver::utils::grid_from_str;
///
/// let text = "2 3\n0 4 3\n2 1 0\n5 8 4\n11 1 3\n";
/// let grid = grid_from_str(text, true).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert!(grid.is_forbidden((0, 1)));
/// assert_eq!(grid.value((1, 0)), 11);
///
/// let plain = grid_from_str(text, false).unwrap();
/// assert_eq!(plain.value((1, 0)), 1);
///
/// assert!(grid_from_str("1 2\n0 7\n", false).is_err());
/// ```
pub fn grid_from_str(text: &str, read_values: bool) -> Result<Grid, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let dims = parse_integers(header_line, header)?;
    let (n, m) = match dims.as_slice() {
        &[n, m] if n >= 0 && m >= 0 => (n as usize, m as usize),
        _ => return Err(ParseError::BadHeader(header.to_string())),
    };

    let mut last_line = header_line;
    let mut read_block = || -> Result<Vec<Vec<i64>>, ParseError> {
        let mut rows = Vec::with_capacity(n);
        for remaining in (1..=n).rev() {
            let (line_no, line) = lines.next().ok_or(ParseError::MissingLine {
                line: last_line + 1,
                expected: remaining,
            })?;
            rows.push(parse_integers(line_no, line)?);
            last_line = line_no;
        }
        Ok(rows)
    };

    let colors = read_block()?;
    if read_values {
        let values = read_block()?;
        Ok(Grid::new(n, m, &colors, &values)?)
    } else {
        Ok(Grid::with_colors(n, m, &colors)?)
    }
}

/// Reads a grid file in the format accepted by [`grid_from_str`].
pub fn grid_from_file(path: impl AsRef<Path>, read_values: bool) -> Result<Grid, ParseError> {
    let content = fs::read_to_string(path)?;
    grid_from_str(&content, read_values)
}

fn parse_integers(line_no: usize, line: &str) -> Result<Vec<i64>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|_| ParseError::InvalidInteger {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Color;

    const GRID00: &str = "2 3\n0 0 0\n0 0 0\n5 8 4\n11 1 3\n";
    const GRID01: &str = "2 3\n0 4 3\n2 1 0\n5 8 4\n11 1 3\n";

    #[test]
    fn test_grid_from_str_with_values() {
        let grid = grid_from_str(GRID00, true).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert!(grid.cells().all(|c| grid.color(c) == Color::White));
        assert_eq!(grid.value((0, 1)), 8);
        assert_eq!(grid.value((1, 2)), 3);
    }

    #[test]
    fn test_grid_from_str_without_values() {
        let grid = grid_from_str(GRID00, false).unwrap();
        assert!(grid.cells().all(|c| grid.value(c) == 1));
    }

    #[test]
    fn test_grid_from_str_colors() {
        let grid = grid_from_str(GRID01, true).unwrap();
        assert_eq!(grid.color((0, 1)), Color::Black);
        assert_eq!(grid.color((0, 2)), Color::Green);
        assert_eq!(grid.color((1, 0)), Color::Blue);
        assert_eq!(grid.color((1, 1)), Color::Red);
    }

    #[test]
    fn test_grid_from_str_ignores_blank_lines() {
        let text = "\n2 3\n\n0 0 0\n0 0 0\n\n5 8 4\n11 1 3\n\n";
        assert_eq!(grid_from_str(text, true).unwrap(), grid_from_str(GRID00, true).unwrap());
    }

    #[test]
    fn test_grid_from_str_invalid_color() {
        let err = grid_from_str("1 3\n0 5 0\n", false).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Format(FormatError::InvalidColor { row: 0, col: 1, code: 5 })
        ));
        assert_eq!(err.to_string(), "invalid color code 5 at (0, 1)");
    }

    #[test]
    fn test_grid_from_str_value_out_of_range() {
        let err = grid_from_str("1 2\n0 0\n1 -9223372036854775808\n", true).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Format(FormatError::ValueOutOfRange { row: 0, col: 1, value: i64::MIN })
        ));
    }

    #[test]
    fn test_grid_from_str_short_row() {
        let err = grid_from_str("2 3\n0 0 0\n0 0\n", false).unwrap_err();
        assert!(matches!(err, ParseError::Format(FormatError::RowLength { row: 1, .. })));
    }

    #[test]
    fn test_grid_from_str_missing_lines() {
        let err = grid_from_str("2 3\n0 0 0\n0 0 0\n5 8 4\n", true).unwrap_err();
        assert!(matches!(err, ParseError::MissingLine { expected: 1, .. }));
        assert!(matches!(grid_from_str("", true), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn test_grid_from_str_bad_tokens() {
        assert!(matches!(grid_from_str("2\n", false), Err(ParseError::BadHeader(_))));
        let err = grid_from_str("1 2\n0 x\n", false).unwrap_err();
        assert!(matches!(err, ParseError::InvalidInteger { line: 2, .. }));
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn test_grid_from_file_missing() {
        let err = grid_from_file("/nonexistent/grid.in", true).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
