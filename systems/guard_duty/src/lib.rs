#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Guard patrolling a cycle of waypoints around player-placed barriers.
//!
//! The guard state lives inside the cell it occupies. Every tick the guard
//! either plans a route to its current waypoint, takes one step along the
//! route, or moves on to the next waypoint once the route is exhausted.

mod layout;
mod patrol;

use cellsim_core::{CellUpdate, Color, Glyph, Position, Renderable};
use cellsim_engine::Rule;
use cellsim_grid::Grid;
use cellsim_navigation::{AStar, Neighbor, Node, Path};

pub use layout::{GuardLayout, LayoutError};
pub use patrol::Patrol;

/// Static contents of a square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Walkable floor.
    #[default]
    Empty,
    /// Obstacle the guard must route around.
    Barrier,
}

/// Guard walking the patrol.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Guard {
    waypoint: usize,
    route: Option<Path<Position>>,
}

impl Guard {
    /// Creates a guard heading for the waypoint at `waypoint` in the patrol.
    #[must_use]
    pub const fn new(waypoint: usize) -> Self {
        Self {
            waypoint,
            route: None,
        }
    }

    /// Index of the waypoint the guard is heading for.
    #[must_use]
    pub const fn waypoint(&self) -> usize {
        self.waypoint
    }

    /// Remaining route towards the current waypoint, if one was planned.
    #[must_use]
    pub const fn route(&self) -> Option<&Path<Position>> {
        self.route.as_ref()
    }
}

/// Square of the guard duty board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuardCell {
    terrain: Terrain,
    guard: Option<Guard>,
}

impl GuardCell {
    /// Walkable square without an occupant.
    pub const EMPTY: Self = Self {
        terrain: Terrain::Empty,
        guard: None,
    };
    /// Barrier square.
    pub const BARRIER: Self = Self {
        terrain: Terrain::Barrier,
        guard: None,
    };

    /// Walkable square holding the provided guard.
    #[must_use]
    pub const fn guarded(guard: Guard) -> Self {
        Self {
            terrain: Terrain::Empty,
            guard: Some(guard),
        }
    }

    /// Static contents of the square.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Guard standing on the square, if any.
    #[must_use]
    pub const fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    /// Reports whether the square blocks movement.
    #[must_use]
    pub fn is_barrier(&self) -> bool {
        self.terrain == Terrain::Barrier
    }

    fn with_guard(&self, guard: Option<Guard>) -> Self {
        Self {
            terrain: self.terrain,
            guard,
        }
    }
}

impl Renderable for GuardCell {
    fn glyph(&self) -> Glyph {
        if self.guard.is_some() {
            return Glyph::plain('@', Color::Red);
        }
        match self.terrain {
            Terrain::Empty => Glyph::BLANK,
            Terrain::Barrier => Glyph::plain('█', Color::Blue),
        }
    }
}

/// Search node wrapping a board square.
///
/// Neighbors are the walkable squares sharing a row or column with the node,
/// each one step away.
#[derive(Clone, Copy, Debug)]
pub struct GuardNode<'a> {
    grid: &'a Grid<GuardCell>,
    position: Position,
}

impl<'a> GuardNode<'a> {
    /// Creates a node for the square at `position`.
    #[must_use]
    pub const fn new(grid: &'a Grid<GuardCell>, position: Position) -> Self {
        Self { grid, position }
    }

    /// Location of the square.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

impl Node for GuardNode<'_> {
    type Id = Position;

    fn id(&self) -> Position {
        self.position
    }

    fn neighbors(&self) -> Vec<Neighbor<Self>> {
        self.grid
            .neighbor_positions(self.position)
            .into_iter()
            .filter(|candidate| candidate.is_axis_aligned_with(self.position))
            .filter(|candidate| !self.grid.get(*candidate).is_barrier())
            .map(|candidate| Neighbor::new(Self::new(self.grid, candidate), 1.0))
            .collect()
    }
}

fn straight_line(from: &GuardNode<'_>, to: &GuardNode<'_>) -> f64 {
    from.position.distance_to(to.position)
}

/// Patrol rule moving every guard one step per tick.
#[derive(Clone, Debug)]
pub struct GuardDuty {
    patrol: Patrol,
    max_expansions: Option<usize>,
}

impl GuardDuty {
    /// Creates the rule for guards walking the provided patrol.
    #[must_use]
    pub const fn new(patrol: Patrol) -> Self {
        Self {
            patrol,
            max_expansions: None,
        }
    }

    /// Bounds the number of squares a single route search may expand.
    #[must_use]
    pub const fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    /// Waypoint cycle walked by the guards.
    #[must_use]
    pub const fn patrol(&self) -> &Patrol {
        &self.patrol
    }

    /// Plans a walkable route from `from` to `to`.
    ///
    /// The returned route excludes `from`, so its first node is the first
    /// step to take. An empty route means the guard already stands on `to`.
    #[must_use]
    pub fn plan_route(
        &self,
        grid: &Grid<GuardCell>,
        from: Position,
        to: Position,
    ) -> Option<Path<Position>> {
        if !grid.contains(from) || !grid.contains(to) {
            return None;
        }
        let search = AStar::new(straight_line);
        let search = match self.max_expansions {
            Some(limit) => search.with_max_expansions(limit),
            None => search,
        };
        let mut route = search
            .find_path(GuardNode::new(grid, from), GuardNode::new(grid, to))?
            .map(|node| node.position);
        let _ = route.pop_next();
        Some(route)
    }

    fn step(
        &self,
        grid: &Grid<GuardCell>,
        position: Position,
        cell: &GuardCell,
        mut guard: Guard,
    ) -> Vec<CellUpdate<GuardCell>> {
        if guard.route.is_none() {
            if let Some(target) = self.patrol.get(guard.waypoint) {
                match self.plan_route(grid, position, target) {
                    Some(route) => {
                        tracing::debug!(
                            %position,
                            %target,
                            steps = route.len(),
                            "guard route planned"
                        );
                        guard.route = Some(route);
                    }
                    None => {
                        tracing::warn!(
                            %position,
                            %target,
                            "waypoint unreachable, retrying next tick"
                        );
                    }
                }
            }
        }

        let Some(route) = guard.route.as_mut() else {
            return Vec::new();
        };

        let Some(next) = route.pop_next() else {
            guard.route = None;
            guard.waypoint = self.patrol.next_index(guard.waypoint);
            return vec![CellUpdate::new(position, cell.with_guard(Some(guard)))];
        };

        match grid.try_get(next) {
            Some(ahead) if !ahead.is_barrier() => vec![
                CellUpdate::new(position, cell.with_guard(None)),
                CellUpdate::new(next, ahead.with_guard(Some(guard))),
            ],
            _ => {
                tracing::debug!(%position, blocked = %next, "guard route blocked");
                guard.route = None;
                vec![CellUpdate::new(position, cell.with_guard(Some(guard)))]
            }
        }
    }
}

impl Rule for GuardDuty {
    type Cell = GuardCell;

    fn update_cell(
        &self,
        grid: &Grid<GuardCell>,
        position: Position,
    ) -> Vec<CellUpdate<GuardCell>> {
        let Some(cell) = grid.try_get(position) else {
            return Vec::new();
        };
        match &cell.guard {
            Some(guard) => self.step(grid, position, cell, guard.clone()),
            None => Vec::new(),
        }
    }

    fn describe(&self, grid: &Grid<GuardCell>) -> Option<String> {
        let target = grid
            .cells()
            .iter()
            .find_map(|cell| cell.guard.as_ref())
            .and_then(|guard| self.patrol.get(guard.waypoint));
        Some(match target {
            Some(target) => format!("Next waypoint: {target}"),
            None => format!("GuardDuty ({}, {})", grid.width(), grid.height()),
        })
    }

    fn clicked(&self, cell: &GuardCell) -> Option<GuardCell> {
        if cell.guard.is_some() {
            return None;
        }
        let terrain = match cell.terrain {
            Terrain::Empty => Terrain::Barrier,
            Terrain::Barrier => Terrain::Empty,
        };
        Some(GuardCell {
            terrain,
            guard: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Grid<GuardCell> {
        let width = rows[0].len() as u32;
        let height = rows.len() as u32;
        Grid::from_fn(width, height, |position| {
            let symbol = rows[position.y() as usize].as_bytes()[position.x() as usize];
            if symbol == b'B' {
                GuardCell::BARRIER
            } else {
                GuardCell::EMPTY
            }
        })
        .expect("valid board")
    }

    #[test]
    fn nodes_only_expose_walkable_orthogonal_squares() {
        let grid = board(&["...", ".B.", "..."]);
        let node = GuardNode::new(&grid, Position::new(1, 0));

        let neighbors: Vec<_> = node
            .neighbors()
            .into_iter()
            .map(|neighbor| neighbor.node().position())
            .collect();

        assert_eq!(neighbors, vec![Position::new(0, 0), Position::new(2, 0)]);
    }

    #[test]
    fn planned_route_starts_with_the_first_step() {
        let grid = board(&["...."]);
        let rule = GuardDuty::new(Patrol::new(Vec::new()));

        let mut route = rule
            .plan_route(&grid, Position::new(0, 0), Position::new(3, 0))
            .expect("open row");

        assert_eq!(route.pop_next(), Some(Position::new(1, 0)));
        assert_eq!(route.goal(), Some(&Position::new(3, 0)));
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn route_to_own_square_is_empty() {
        let grid = board(&[".."]);
        let rule = GuardDuty::new(Patrol::new(Vec::new()));

        let route = rule
            .plan_route(&grid, Position::new(1, 0), Position::new(1, 0))
            .expect("trivially reachable");

        assert!(route.is_empty());
    }

    #[test]
    fn clicking_toggles_terrain_but_never_buries_the_guard() {
        let rule = GuardDuty::new(Patrol::new(Vec::new()));

        assert_eq!(rule.clicked(&GuardCell::EMPTY), Some(GuardCell::BARRIER));
        assert_eq!(rule.clicked(&GuardCell::BARRIER), Some(GuardCell::EMPTY));
        assert_eq!(rule.clicked(&GuardCell::guarded(Guard::new(0))), None);
    }
}
