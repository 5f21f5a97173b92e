use cellsim_core::Position;

/// Closed cycle of waypoints visited in order.
///
/// Guards refer to waypoints by index; after the last waypoint the cycle
/// wraps around to the first one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patrol {
    waypoints: Vec<Position>,
}

impl Patrol {
    /// Creates a patrol visiting `waypoints` in order.
    #[must_use]
    pub fn new(waypoints: Vec<Position>) -> Self {
        Self { waypoints }
    }

    /// Waypoints in visiting order.
    #[must_use]
    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Number of waypoints in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the patrol has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoint stored at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Position> {
        self.waypoints.get(index).copied()
    }

    /// Index of the waypoint visited after the one at `index`.
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }

    /// Every waypoint exactly once, beginning with the one at `index`.
    pub fn starting_at(&self, index: usize) -> impl Iterator<Item = Position> + '_ {
        let len = self.waypoints.len();
        let start = if len == 0 { 0 } else { index % len };
        self.waypoints[start..]
            .iter()
            .chain(&self.waypoints[..start])
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Patrol {
        Patrol::new(vec![
            Position::new(0, 0),
            Position::new(4, 0),
            Position::new(2, 3),
        ])
    }

    #[test]
    fn next_index_wraps_around() {
        let patrol = triangle();
        assert_eq!(patrol.next_index(0), 1);
        assert_eq!(patrol.next_index(1), 2);
        assert_eq!(patrol.next_index(2), 0);
        assert_eq!(Patrol::default().next_index(5), 0);
    }

    #[test]
    fn starting_at_rotates_the_cycle() {
        let rotated: Vec<_> = triangle().starting_at(2).collect();
        assert_eq!(
            rotated,
            vec![Position::new(2, 3), Position::new(0, 0), Position::new(4, 0)]
        );
        assert_eq!(Patrol::default().starting_at(3).count(), 0);
    }
}
