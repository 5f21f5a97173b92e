use cellsim_core::Position;
use cellsim_grid::{Grid, GridError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Guard, GuardCell, Patrol};

/// Portable description of a guard duty board.
///
/// Waypoints are listed starting at the guard's current target, so a
/// restored guard resumes its patrol where it left off. Routes are not
/// captured and are planned afresh after a restore.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardLayout {
    /// Number of board columns.
    pub width: u32,
    /// Number of board rows.
    pub height: u32,
    /// Squares holding a barrier, in row-major order.
    pub barriers: Vec<Position>,
    /// Square the guard stands on.
    pub guard: Position,
    /// Patrol cycle beginning with the guard's current target.
    pub waypoints: Vec<Position>,
}

impl GuardLayout {
    /// Rectangular patrol around a cross-shaped wall in the middle of the
    /// board.
    #[must_use]
    pub fn demo(width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        let (left, right) = (w / 8, (w - 1 - w / 8).max(0));
        let (top, bottom) = (h / 8, (h - 1 - h / 8).max(0));
        let guard = Position::new(left, top);
        let waypoints = vec![
            Position::new(right, top),
            Position::new(right, bottom),
            Position::new(left, bottom),
            guard,
        ];

        let (center_x, center_y) = (w / 2, h / 2);
        let vertical = (h / 4..h - h / 4).map(|y| Position::new(center_x, y));
        let horizontal = (w / 4..w - w / 4).map(|x| Position::new(x, center_y));
        let mut barriers: Vec<_> = vertical
            .chain(horizontal)
            .filter(|position| *position != guard && !waypoints.contains(position))
            .collect();
        barriers.sort_by_key(|position| (position.y(), position.x()));
        barriers.dedup();

        Self {
            width,
            height,
            barriers,
            guard,
            waypoints,
        }
    }

    /// Captures the board and the guard's progress through `patrol`.
    pub fn capture(grid: &Grid<GuardCell>, patrol: &Patrol) -> Result<Self, LayoutError> {
        let mut barriers = Vec::new();
        let mut guards = Vec::new();
        for (position, cell) in grid.iter() {
            if cell.is_barrier() {
                barriers.push(position);
            }
            if let Some(guard) = cell.guard() {
                guards.push((position, guard.waypoint()));
            }
        }

        let (guard, waypoint) = match guards.as_slice() {
            [single] => *single,
            [] => return Err(LayoutError::MissingGuard),
            many => return Err(LayoutError::MultipleGuards { count: many.len() }),
        };

        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            barriers,
            guard,
            waypoints: patrol.starting_at(waypoint).collect(),
        })
    }

    /// Builds the board and patrol described by the layout.
    pub fn build(&self) -> Result<(Grid<GuardCell>, Patrol), LayoutError> {
        let mut grid = Grid::new(self.width, self.height, GuardCell::EMPTY)?;
        for barrier in &self.barriers {
            if grid.try_set(*barrier, GuardCell::BARRIER).is_err() {
                return Err(LayoutError::BarrierOutOfBounds {
                    position: *barrier,
                });
            }
        }
        if let Some(waypoint) = self
            .waypoints
            .iter()
            .find(|waypoint| !grid.contains(**waypoint))
        {
            return Err(LayoutError::WaypointOutOfBounds {
                position: *waypoint,
            });
        }
        match grid.try_get(self.guard) {
            None => {
                return Err(LayoutError::GuardOutOfBounds {
                    position: self.guard,
                })
            }
            Some(cell) if cell.is_barrier() => {
                return Err(LayoutError::GuardOnBarrier {
                    position: self.guard,
                })
            }
            Some(_) => {}
        }
        grid.set(self.guard, GuardCell::guarded(Guard::new(0)));

        tracing::debug!(
            width = self.width,
            height = self.height,
            barriers = self.barriers.len(),
            waypoints = self.waypoints.len(),
            "guard layout built"
        );
        Ok((grid, Patrol::new(self.waypoints.clone())))
    }
}

/// Reasons a guard layout cannot be captured or built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The board dimensions are invalid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// No square holds a guard.
    #[error("the board has no guard")]
    MissingGuard,
    /// More than one square holds a guard.
    #[error("the board has {count} guards but layouts describe exactly one")]
    MultipleGuards {
        /// Number of guards found.
        count: usize,
    },
    /// A barrier lies outside the board.
    #[error("barrier at {position} lies outside the board")]
    BarrierOutOfBounds {
        /// Offending barrier square.
        position: Position,
    },
    /// A waypoint lies outside the board.
    #[error("waypoint at {position} lies outside the board")]
    WaypointOutOfBounds {
        /// Offending waypoint.
        position: Position,
    },
    /// The guard lies outside the board.
    #[error("guard at {position} lies outside the board")]
    GuardOutOfBounds {
        /// Offending guard square.
        position: Position,
    },
    /// The guard stands on a barrier.
    #[error("guard at {position} stands on a barrier")]
    GuardOnBarrier {
        /// Offending guard square.
        position: Position,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_layout_builds_on_the_default_board() {
        let layout = GuardLayout::demo(40, 40);
        let (grid, patrol) = layout.build().expect("demo layout is valid");

        assert_eq!(layout.guard, Position::new(5, 5));
        assert_eq!(patrol.get(0), Some(Position::new(34, 5)));
        assert!(grid.get(Position::new(20, 20)).is_barrier());
        assert!(grid.get(layout.guard).guard().is_some());
    }

    #[test]
    fn demo_layout_builds_on_tiny_boards() {
        for (width, height) in [(1, 1), (2, 3), (5, 2)] {
            let layout = GuardLayout::demo(width, height);
            assert!(layout.build().is_ok(), "{width}x{height} demo should build");
        }
    }

    #[test]
    fn guard_on_barrier_is_rejected() {
        let layout = GuardLayout {
            width: 3,
            height: 3,
            barriers: vec![Position::new(1, 1)],
            guard: Position::new(1, 1),
            waypoints: Vec::new(),
        };
        assert_eq!(
            layout.build(),
            Err(LayoutError::GuardOnBarrier {
                position: Position::new(1, 1)
            })
        );
    }
}
