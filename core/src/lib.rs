#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the cellsim toolkit.
//!
//! This crate defines the vocabulary that connects the grid, the simulation
//! engine, the per-simulation rules and the adapters. Rules read an immutable
//! grid snapshot and answer with [`CellUpdate`] batches, the engine applies
//! those batches and forwards the resulting [`Glyph`] values to a
//! [`Renderer`], and adapters translate user interaction into [`InputEvent`]
//! values for the surrounding application loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as signed column and row
/// coordinates.
///
/// Coordinates are signed so neighbor arithmetic around the grid edge never
/// wraps; containment is decided by [`Rectangle::contains`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i32,
    y: i32,
}

/// Position of the upper-left cell of every grid.
pub const ORIGIN: Position = Position::new(0, 0);

impl Position {
    /// Creates a new position from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column coordinate of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row coordinate of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Moves the position `distance` cells in the provided orientation.
    ///
    /// `Up` decreases the row coordinate, `Down` increases it.
    #[must_use]
    pub const fn translate(self, orientation: Orientation, distance: i32) -> Self {
        match orientation {
            Orientation::Up => Self::new(self.x, self.y.saturating_sub(distance)),
            Orientation::Down => Self::new(self.x, self.y.saturating_add(distance)),
            Orientation::Left => Self::new(self.x.saturating_sub(distance), self.y),
            Orientation::Right => Self::new(self.x.saturating_add(distance), self.y),
        }
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }

    /// Returns `true` when both positions lie on the same row or column.
    #[must_use]
    pub const fn is_axis_aligned_with(self, other: Position) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing used by units that walk the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Facing toward decreasing row indices.
    #[default]
    Up,
    /// Facing toward increasing column indices.
    Right,
    /// Facing toward increasing row indices.
    Down,
    /// Facing toward decreasing column indices.
    Left,
}

impl Orientation {
    const CLOCKWISE: [Orientation; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Rotates clockwise by the provided number of quarter turns.
    ///
    /// Negative values rotate counter-clockwise.
    #[must_use]
    pub const fn rotate(self, quarter_turns: i32) -> Self {
        let current = match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        };
        let applied = (current + quarter_turns).rem_euclid(4);
        Self::CLOCKWISE[applied as usize]
    }
}

/// Axis-aligned rectangle with inclusive corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    corner1: Position,
    corner2: Position,
}

impl Rectangle {
    /// Creates a rectangle spanning both corners inclusively.
    #[must_use]
    pub const fn new(corner1: Position, corner2: Position) -> Self {
        Self { corner1, corner2 }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn corner1(&self) -> Position {
        self.corner1
    }

    /// Lower-right corner of the rectangle.
    #[must_use]
    pub const fn corner2(&self) -> Position {
        self.corner2
    }

    /// Reports whether the position lies within both inclusive corners.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x >= self.corner1.x
            && position.x <= self.corner2.x
            && position.y >= self.corner1.y
            && position.y <= self.corner2.y
    }

    /// Enumerates every contained position in scan order.
    ///
    /// The column is the outer loop and the row the inner loop, matching the
    /// order used for neighbor enumeration.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (x1, x2) = (self.corner1.x, self.corner2.x);
        let (y1, y2) = (self.corner1.y, self.corner2.y);
        (x1..=x2).flat_map(move |x| (y1..=y2).map(move |y| Position::new(x, y)))
    }
}

/// Pending write produced by a rule for a single tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellUpdate<C> {
    position: Position,
    cell: C,
}

impl<C> CellUpdate<C> {
    /// Creates an update that replaces the cell at `position`.
    #[must_use]
    pub const fn new(position: Position, cell: C) -> Self {
        Self { position, cell }
    }

    /// Target position of the update.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Cell value that will be written.
    #[must_use]
    pub const fn cell(&self) -> &C {
        &self.cell
    }

    /// Splits the update into its target and value.
    #[must_use]
    pub fn into_parts(self) -> (Position, C) {
        (self.position, self.cell)
    }
}

/// Palette understood by every renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Renderer-defined default color.
    #[default]
    Default,
    /// Black.
    Black,
    /// White.
    White,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Yellow.
    Yellow,
}

/// Visual descriptor of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// Character drawn for the cell.
    pub symbol: char,
    /// Color of the symbol.
    pub foreground: Color,
    /// Color behind the symbol.
    pub background: Color,
}

impl Glyph {
    /// Blank glyph drawn with default colors.
    pub const BLANK: Glyph = Glyph::new(' ', Color::Default, Color::Default);

    /// Creates a glyph from a symbol and both colors.
    #[must_use]
    pub const fn new(symbol: char, foreground: Color, background: Color) -> Self {
        Self {
            symbol,
            foreground,
            background,
        }
    }

    /// Creates a glyph drawn over the default background.
    #[must_use]
    pub const fn plain(symbol: char, foreground: Color) -> Self {
        Self::new(symbol, foreground, Color::Default)
    }
}

/// Capability shared by every cell type: it can describe how it looks.
pub trait Renderable {
    /// Glyph presenting the cell.
    fn glyph(&self) -> Glyph;
}

/// Render surface collaborator fed by the engine.
///
/// Implementations must not block the caller for long; the engine invokes
/// these methods while holding its tick lock.
pub trait Renderer {
    /// Records the new appearance of a cell.
    fn set(&mut self, position: Position, glyph: Glyph);

    /// Presents every change recorded since the previous draw.
    fn draw(&mut self);

    /// Replaces the human-readable status line.
    fn set_status(&mut self, status: &str);
}

/// Discrete interaction produced by an input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The user selected the cell at the provided position.
    Click {
        /// Grid position that was selected.
        position: Position,
    },
    /// The user toggled between running and paused.
    Pause,
    /// The user requested the application to exit.
    Quit,
    /// The user requested the current board to be persisted.
    Save,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_moves_along_orientation() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.translate(Orientation::Up, 1), Position::new(3, 2));
        assert_eq!(origin.translate(Orientation::Down, 2), Position::new(3, 5));
        assert_eq!(origin.translate(Orientation::Left, 1), Position::new(2, 3));
        assert_eq!(origin.translate(Orientation::Right, 3), Position::new(6, 3));
    }

    #[test]
    fn rotate_wraps_in_both_directions() {
        assert_eq!(Orientation::Up.rotate(1), Orientation::Right);
        assert_eq!(Orientation::Left.rotate(1), Orientation::Up);
        assert_eq!(Orientation::Up.rotate(-1), Orientation::Left);
        assert_eq!(Orientation::Right.rotate(-6), Orientation::Left);
        assert_eq!(Orientation::Down.rotate(4), Orientation::Down);
    }

    #[test]
    fn distance_to_is_euclidean() {
        let distance = Position::new(0, 0).distance_to(Position::new(3, 4));
        assert!((distance - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rectangle_contains_inclusive_corners() {
        let bounds = Rectangle::new(ORIGIN, Position::new(4, 3));
        assert!(bounds.contains(ORIGIN));
        assert!(bounds.contains(Position::new(4, 3)));
        assert!(!bounds.contains(Position::new(5, 3)));
        assert!(!bounds.contains(Position::new(-1, 0)));
        assert!(!bounds.contains(Position::new(0, 4)));
    }

    #[test]
    fn rectangle_positions_scan_columns_then_rows() {
        let bounds = Rectangle::new(ORIGIN, Position::new(1, 2));
        let scanned: Vec<_> = bounds.positions().collect();
        assert_eq!(
            scanned,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 2),
            ]
        );
    }
}
