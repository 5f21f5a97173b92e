#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded two-dimensional cell storage used by every simulation.

use cellsim_core::{Position, Rectangle, ORIGIN};
use thiserror::Error;

/// Dense rectangular grid storing one cell value per position.
///
/// Cells are stored in row-major order. Every position inside
/// [`Grid::bounds`] always holds exactly one value; reading or writing outside
/// the bounds through [`Grid::get`] or [`Grid::set`] is a caller bug and
/// panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<C> {
    width: u32,
    height: u32,
    cells: Vec<C>,
}

impl<C: Clone> Grid<C> {
    /// Creates a grid where every cell starts as a copy of `fill`.
    pub fn new(width: u32, height: u32, fill: C) -> Result<Self, GridError> {
        let cell_count = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![fill; cell_count],
        })
    }

    /// Overwrites every cell with a copy of `cell`.
    pub fn fill(&mut self, cell: C) {
        self.cells.fill(cell);
    }
}

impl<C> Grid<C> {
    /// Creates a grid by evaluating `cell_at` for every position.
    pub fn from_fn<F>(width: u32, height: u32, mut cell_at: F) -> Result<Self, GridError>
    where
        F: FnMut(Position) -> C,
    {
        let cell_count = cell_count(width, height)?;
        let mut cells = Vec::with_capacity(cell_count);
        for y in 0..height {
            for x in 0..width {
                cells.push(cell_at(Position::new(x as i32, y as i32)));
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Inclusive rectangle spanning `(0, 0)` to `(width - 1, height - 1)`.
    #[must_use]
    pub const fn bounds(&self) -> Rectangle {
        Rectangle::new(
            ORIGIN,
            Position::new(self.width as i32 - 1, self.height as i32 - 1),
        )
    }

    /// Reports whether the position addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        self.bounds().contains(position)
    }

    /// Returns the cell stored at `position`.
    ///
    /// # Panics
    ///
    /// Panics when the position lies outside the grid bounds.
    #[must_use]
    pub fn get(&self, position: Position) -> &C {
        match self.index(position) {
            Some(index) => &self.cells[index],
            None => panic!("{}", self.out_of_bounds(position)),
        }
    }

    /// Returns the cell stored at `position`, if it lies inside the grid.
    #[must_use]
    pub fn try_get(&self, position: Position) -> Option<&C> {
        self.index(position).map(|index| &self.cells[index])
    }

    /// Replaces the cell stored at `position`.
    ///
    /// # Panics
    ///
    /// Panics when the position lies outside the grid bounds.
    pub fn set(&mut self, position: Position, cell: C) {
        match self.index(position) {
            Some(index) => self.cells[index] = cell,
            None => panic!("{}", self.out_of_bounds(position)),
        }
    }

    /// Replaces the cell stored at `position`, returning the previous value.
    pub fn try_set(&mut self, position: Position, cell: C) -> Result<C, GridError> {
        let index = self
            .index(position)
            .ok_or_else(|| self.out_of_bounds(position))?;
        Ok(std::mem::replace(&mut self.cells[index], cell))
    }

    /// Moore neighborhood of `position`, clipped to the grid bounds.
    ///
    /// Positions are produced by scanning columns `x - 1..=x + 1` in the outer
    /// loop and rows `y - 1..=y + 1` in the inner loop, skipping `position`
    /// itself.
    #[must_use]
    pub fn neighbor_positions(&self, position: Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(8);
        let (x, y) = (position.x(), position.y());
        for i in x.saturating_sub(1)..=x.saturating_add(1) {
            for j in y.saturating_sub(1)..=y.saturating_add(1) {
                let candidate = Position::new(i, j);
                if candidate != position && self.contains(candidate) {
                    neighbors.push(candidate);
                }
            }
        }
        neighbors
    }

    /// Cells of the Moore neighborhood in [`Grid::neighbor_positions`] order.
    #[must_use]
    pub fn neighbors(&self, position: Position) -> Vec<&C> {
        self.neighbor_positions(position)
            .into_iter()
            .map(|neighbor| self.get(neighbor))
            .collect()
    }

    /// Iterates over every position and its cell in row-major storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &C)> {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            (Position::new(x, y), cell)
        })
    }

    /// Dense cell storage in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let column = usize::try_from(position.x()).ok()?;
        let row = usize::try_from(position.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn out_of_bounds(&self, position: Position) -> GridError {
        GridError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }
}

fn cell_count(width: u32, height: u32) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::EmptyDimensions { width, height });
    }
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(GridError::TooLarge { width, height });
    }
    let width_usize = usize::try_from(width).map_err(|_| GridError::TooLarge { width, height })?;
    let height_usize =
        usize::try_from(height).map_err(|_| GridError::TooLarge { width, height })?;
    width_usize
        .checked_mul(height_usize)
        .ok_or(GridError::TooLarge { width, height })
}

/// Errors reported by fallible grid operations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// A grid needs at least one row and one column.
    #[error("grid dimensions must be positive (received {width}x{height})")]
    EmptyDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// The requested dimensions cannot be addressed with signed positions.
    #[error("grid dimensions {width}x{height} exceed the addressable range")]
    TooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// The position does not address a cell of the grid.
    #[error("position {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 3, 0u8),
            Err(GridError::EmptyDimensions {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn bounds_cover_every_cell() {
        let grid = Grid::new(5, 4, 0u8).expect("valid grid");
        let bounds = grid.bounds();
        assert_eq!(bounds.corner1(), Position::new(0, 0));
        assert_eq!(bounds.corner2(), Position::new(4, 3));
        assert_eq!(bounds.positions().count(), grid.cells().len());
    }

    #[test]
    fn from_fn_stores_row_major() {
        let grid = Grid::from_fn(3, 2, |position| position.x() + 10 * position.y())
            .expect("valid grid");
        assert_eq!(grid.cells(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(*grid.get(Position::new(2, 1)), 12);
    }

    #[test]
    fn neighbor_positions_follow_scan_order() {
        let grid = Grid::new(3, 3, ()).expect("valid grid");
        assert_eq!(
            grid.neighbor_positions(Position::new(1, 1)),
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
    }

    #[test]
    fn neighbor_positions_clip_at_corner() {
        let grid = Grid::new(3, 3, ()).expect("valid grid");
        assert_eq!(
            grid.neighbor_positions(Position::new(0, 0)),
            vec![Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn try_set_returns_previous_value() {
        let mut grid = Grid::new(2, 2, 'a').expect("valid grid");
        assert_eq!(grid.try_set(Position::new(1, 1), 'b'), Ok('a'));
        assert_eq!(*grid.get(Position::new(1, 1)), 'b');
        assert!(matches!(
            grid.try_set(Position::new(2, 0), 'c'),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn set_outside_bounds_panics() {
        let mut grid = Grid::new(2, 2, 0u8).expect("valid grid");
        grid.set(Position::new(-1, 0), 1);
    }
}
