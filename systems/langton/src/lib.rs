#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Langton's ant walking over a board of black and white squares.

use cellsim_core::{CellUpdate, Color, Glyph, Orientation, Position, Renderable};
use cellsim_engine::Rule;
use cellsim_grid::{Grid, GridError};

/// Status line reported after every tick.
pub const STATUS: &str = "Langton's Ants";

/// Square the ant occupies when a board is created.
pub const ANT_START: Position = Position::new(20, 20);

/// Ant walking the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ant {
    orientation: Orientation,
}

impl Ant {
    /// Creates an ant facing the provided direction.
    #[must_use]
    pub const fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// Direction the ant faces.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}

/// Board square, optionally carrying the ant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Square {
    white: bool,
    ant: Option<Ant>,
}

impl Square {
    /// Black square without an ant.
    pub const BLACK: Self = Self {
        white: false,
        ant: None,
    };

    /// Creates a square with the provided color and occupant.
    #[must_use]
    pub const fn new(white: bool, ant: Option<Ant>) -> Self {
        Self { white, ant }
    }

    /// Reports whether the square is white.
    #[must_use]
    pub const fn is_white(&self) -> bool {
        self.white
    }

    /// Ant standing on the square, if any.
    #[must_use]
    pub const fn ant(&self) -> Option<Ant> {
        self.ant
    }
}

impl Renderable for Square {
    fn glyph(&self) -> Glyph {
        let background = if self.white {
            Color::White
        } else {
            Color::Default
        };
        match self.ant {
            Some(ant) => {
                let symbol = match ant.orientation {
                    Orientation::Up => '^',
                    Orientation::Right => '>',
                    Orientation::Down => 'v',
                    Orientation::Left => '<',
                };
                Glyph::new(symbol, Color::Blue, background)
            }
            None if self.white => Glyph::new('█', Color::White, background),
            None => Glyph::BLANK,
        }
    }
}

/// Turn, flip and step rule of Langton's ant.
#[derive(Clone, Copy, Debug, Default)]
pub struct LangtonsAnt;

impl Rule for LangtonsAnt {
    type Cell = Square;

    fn update_cell(&self, grid: &Grid<Square>, position: Position) -> Vec<CellUpdate<Square>> {
        let Some(square) = grid.try_get(position) else {
            return Vec::new();
        };
        let Some(ant) = square.ant else {
            return Vec::new();
        };

        let turn = if square.white { 1 } else { -1 };
        let orientation = ant.orientation.rotate(turn);
        let destination = position.translate(orientation, 1);
        let Some(ahead) = grid.try_get(destination) else {
            tracing::trace!(%position, "ant blocked by the board edge");
            return Vec::new();
        };

        vec![
            CellUpdate::new(position, Square::new(!square.white, None)),
            CellUpdate::new(
                destination,
                Square::new(ahead.white, Some(Ant::new(orientation))),
            ),
        ]
    }

    fn describe(&self, _grid: &Grid<Square>) -> Option<String> {
        Some(STATUS.to_owned())
    }
}

/// Creates a black board with a single ant at [`ANT_START`] facing up.
///
/// The ant is omitted when the board is too small to hold it.
pub fn board(width: u32, height: u32) -> Result<Grid<Square>, GridError> {
    let mut grid = Grid::new(width, height, Square::BLACK)?;
    let ant = Square::new(false, Some(Ant::new(Orientation::Up)));
    if grid.try_set(ANT_START, ant).is_err() {
        tracing::warn!(width, height, "board too small for the ant start square");
    }
    Ok(grid)
}
