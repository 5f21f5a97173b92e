#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wireworld electron flow over conductor tracks.
//!
//! Circuits are described as text rows where `.` is empty space, `#` a
//! conductor, `H` an electron head and `t` an electron tail.

use cellsim_core::{CellUpdate, Color, Glyph, Position, Renderable};
use cellsim_engine::Rule;
use cellsim_grid::{Grid, GridError};
use thiserror::Error;

/// Status line reported after every tick.
pub const STATUS: &str = "WireWorld";

/// Pair of clock loops feeding a shared output track.
pub const REFERENCE_CIRCUIT: [&str; 9] = [
    ".##tH####.............",
    "#........######.......",
    ".#Ht#####......#......",
    "..............####....",
    "..............#..#####",
    "..............####....",
    ".########......#......",
    "#........t#####.......",
    ".#Ht####H.............",
];

/// State of a single wireworld square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WireCell {
    /// Insulating background.
    #[default]
    Empty,
    /// Track that electrons can travel along.
    Conductor,
    /// Leading edge of an electron.
    Head,
    /// Trailing edge of an electron.
    Tail,
}

impl WireCell {
    /// Parses the circuit text symbol of a square.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Conductor),
            'H' => Some(Self::Head),
            't' => Some(Self::Tail),
            _ => None,
        }
    }

    /// State after one tick given the number of neighboring heads.
    #[must_use]
    pub const fn next(self, neighboring_heads: usize) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Head => Self::Tail,
            Self::Tail => Self::Conductor,
            Self::Conductor if matches!(neighboring_heads, 1 | 2) => Self::Head,
            Self::Conductor => Self::Conductor,
        }
    }
}

impl Renderable for WireCell {
    fn glyph(&self) -> Glyph {
        match self {
            Self::Empty => Glyph::BLANK,
            Self::Conductor => Glyph::plain('█', Color::Yellow),
            Self::Head => Glyph::plain('█', Color::Blue),
            Self::Tail => Glyph::plain('█', Color::Red),
        }
    }
}

/// The four-state wireworld transition rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wireworld;

impl Rule for Wireworld {
    type Cell = WireCell;

    fn update_cell(&self, grid: &Grid<WireCell>, position: Position) -> Vec<CellUpdate<WireCell>> {
        let Some(&cell) = grid.try_get(position) else {
            return Vec::new();
        };
        let heads = match cell {
            WireCell::Conductor => grid
                .neighbors(position)
                .into_iter()
                .filter(|neighbor| **neighbor == WireCell::Head)
                .count(),
            _ => 0,
        };
        let next = cell.next(heads);
        if next == cell {
            Vec::new()
        } else {
            vec![CellUpdate::new(position, next)]
        }
    }

    fn describe(&self, _grid: &Grid<WireCell>) -> Option<String> {
        Some(STATUS.to_owned())
    }
}

/// Failure to lay out a circuit description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CircuitError {
    /// The description contains a character with no cell meaning.
    #[error("unknown circuit symbol {symbol:?} at {position}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Location of the character relative to the circuit origin.
        position: Position,
    },
    /// The board could not be created.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Writes `rows` onto the grid with the first character at `origin`.
///
/// Squares falling outside the grid, or past the coordinate range, are skipped.
pub fn place(
    grid: &mut Grid<WireCell>,
    origin: Position,
    rows: &[&str],
) -> Result<(), CircuitError> {
    for (y, row) in (0..).zip(rows) {
        for (x, symbol) in (0..).zip(row.chars()) {
            let offset = Position::new(x, y);
            let cell = WireCell::from_symbol(symbol).ok_or(CircuitError::UnknownSymbol {
                symbol,
                position: offset,
            })?;
            let target = origin
                .x()
                .checked_add(x)
                .zip(origin.y().checked_add(y))
                .map(|(x, y)| Position::new(x, y));
            if let Some(target) = target {
                let _ = grid.try_set(target, cell);
            }
        }
    }
    Ok(())
}

/// Creates an empty board holding the [`REFERENCE_CIRCUIT`] at the origin.
pub fn reference_board(width: u32, height: u32) -> Result<Grid<WireCell>, CircuitError> {
    let mut grid = Grid::new(width, height, WireCell::Empty)?;
    place(&mut grid, Position::new(0, 0), &REFERENCE_CIRCUIT)?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_four_state_table() {
        assert_eq!(WireCell::Empty.next(2), WireCell::Empty);
        assert_eq!(WireCell::Head.next(0), WireCell::Tail);
        assert_eq!(WireCell::Tail.next(5), WireCell::Conductor);
        assert_eq!(WireCell::Conductor.next(0), WireCell::Conductor);
        assert_eq!(WireCell::Conductor.next(1), WireCell::Head);
        assert_eq!(WireCell::Conductor.next(2), WireCell::Head);
        assert_eq!(WireCell::Conductor.next(3), WireCell::Conductor);
    }

    #[test]
    fn reference_circuit_rows_have_equal_width() {
        assert!(REFERENCE_CIRCUIT.iter().all(|row| row.len() == 22));
    }

    #[test]
    fn placement_past_the_coordinate_range_is_skipped() {
        let mut grid = Grid::new(3, 3, WireCell::Empty).expect("valid board");

        place(&mut grid, Position::new(i32::MAX, 0), &["##"]).expect("valid circuit");
        place(&mut grid, Position::new(-1, i32::MAX), &["##"]).expect("valid circuit");
        place(&mut grid, Position::new(-1, -1), &["HH", "Ht"]).expect("valid circuit");

        assert_eq!(*grid.get(Position::new(0, 0)), WireCell::Tail);
        assert_eq!(
            grid.cells().iter().filter(|cell| **cell != WireCell::Empty).count(),
            1,
            "only the overlapping square may be written"
        );
    }

    #[test]
    fn unknown_symbols_are_reported_with_their_offset() {
        let mut grid = Grid::new(4, 4, WireCell::Empty).expect("valid board");
        let error =
            place(&mut grid, Position::new(0, 0), &["..", ".x"]).expect_err("x is not a cell");
        assert_eq!(
            error,
            CircuitError::UnknownSymbol {
                symbol: 'x',
                position: Position::new(1, 1),
            }
        );
    }
}
