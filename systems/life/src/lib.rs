#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Conway's game of life expressed as an engine rule.

use cellsim_core::{CellUpdate, Color, Glyph, Position, Renderable};
use cellsim_engine::Rule;
use cellsim_grid::{Grid, GridError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Status line reported after every tick.
pub const STATUS: &str = "Conway's game of life";

/// Live cells of the glider placed near the top-left corner.
pub const GLIDER: [Position; 5] = [
    Position::new(2, 3),
    Position::new(3, 4),
    Position::new(4, 2),
    Position::new(4, 3),
    Position::new(4, 4),
];

/// Single square of the life board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LifeCell {
    alive: bool,
}

impl LifeCell {
    /// Dead square.
    pub const DEAD: Self = Self { alive: false };
    /// Live square.
    pub const ALIVE: Self = Self { alive: true };

    /// Reports whether the square holds a live cell.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Square with the opposite liveness.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self { alive: !self.alive }
    }
}

impl Renderable for LifeCell {
    fn glyph(&self) -> Glyph {
        if self.alive {
            Glyph::plain('█', Color::Blue)
        } else {
            Glyph::BLANK
        }
    }
}

/// Birth and survival rule of the classic automaton.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameOfLife;

impl Rule for GameOfLife {
    type Cell = LifeCell;

    fn update_cell(&self, grid: &Grid<LifeCell>, position: Position) -> Vec<CellUpdate<LifeCell>> {
        let Some(cell) = grid.try_get(position) else {
            return Vec::new();
        };
        let live_neighbors = grid
            .neighbors(position)
            .into_iter()
            .filter(|neighbor| neighbor.is_alive())
            .count();
        let next = match (cell.is_alive(), live_neighbors) {
            (true, 2 | 3) | (false, 3) => LifeCell::ALIVE,
            _ => LifeCell::DEAD,
        };
        if next == *cell {
            Vec::new()
        } else {
            vec![CellUpdate::new(position, next)]
        }
    }

    fn describe(&self, _grid: &Grid<LifeCell>) -> Option<String> {
        Some(STATUS.to_owned())
    }

    fn clicked(&self, cell: &LifeCell) -> Option<LifeCell> {
        Some(cell.toggled())
    }
}

/// Builds a board where only the listed positions are alive.
///
/// Positions outside the board are ignored.
pub fn seeded<I>(width: u32, height: u32, live: I) -> Result<Grid<LifeCell>, GridError>
where
    I: IntoIterator<Item = Position>,
{
    let mut grid = Grid::new(width, height, LifeCell::DEAD)?;
    for position in live {
        let _ = grid.try_set(position, LifeCell::ALIVE);
    }
    Ok(grid)
}

/// Random starting population reproducible from its seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Soup {
    density: f64,
    seed: u64,
}

impl Soup {
    /// Creates a soup where each square is alive with probability `density`.
    ///
    /// The density is clamped to `[0, 1]`; `NaN` is treated as empty.
    #[must_use]
    pub fn new(density: f64, seed: u64) -> Self {
        let density = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        Self { density, seed }
    }

    /// Probability of a square starting alive.
    #[must_use]
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Seed of the generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Fills a fresh board, visiting squares in scan order.
    pub fn populate(&self, width: u32, height: u32) -> Result<Grid<LifeCell>, GridError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut grid = Grid::new(width, height, LifeCell::DEAD)?;
        for position in grid.bounds().positions() {
            if rng.gen_bool(self.density) {
                grid.set(position, LifeCell::ALIVE);
            }
        }
        Ok(grid)
    }
}
