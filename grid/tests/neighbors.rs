use cellsim_core::Position;
use cellsim_grid::Grid;
use proptest::prelude::*;

proptest! {
    #[test]
    fn neighbors_stay_inside_bounds_and_adjacent(
        width in 1u32..12,
        height in 1u32..12,
        x in -2i32..14,
        y in -2i32..14,
    ) {
        let grid = Grid::new(width, height, ()).expect("valid grid");
        let origin = Position::new(x, y);
        let neighbors = grid.neighbor_positions(origin);

        prop_assert!(neighbors.len() <= 8);
        for neighbor in &neighbors {
            prop_assert!(grid.contains(*neighbor));
            prop_assert_ne!(*neighbor, origin);
            prop_assert!((neighbor.x() - x).abs() <= 1);
            prop_assert!((neighbor.y() - y).abs() <= 1);
        }
    }

    #[test]
    fn interior_positions_have_eight_neighbors(
        width in 3u32..12,
        height in 3u32..12,
        x_offset in 0u32..10,
        y_offset in 0u32..10,
    ) {
        let grid = Grid::new(width, height, ()).expect("valid grid");
        let x = 1 + (x_offset % (width - 2)) as i32;
        let y = 1 + (y_offset % (height - 2)) as i32;

        prop_assert_eq!(grid.neighbors(Position::new(x, y)).len(), 8);
    }

    #[test]
    fn try_get_agrees_with_contains(
        width in 1u32..8,
        height in 1u32..8,
        x in -3i32..10,
        y in -3i32..10,
    ) {
        let grid = Grid::from_fn(width, height, |position| position).expect("valid grid");
        let position = Position::new(x, y);

        match grid.try_get(position) {
            Some(stored) => {
                prop_assert!(grid.contains(position));
                prop_assert_eq!(*stored, position);
            }
            None => prop_assert!(!grid.contains(position)),
        }
    }
}

#[test]
fn iter_visits_every_cell_once() {
    let grid = Grid::from_fn(4, 3, |position| position).expect("valid grid");
    let visited: Vec<_> = grid.iter().collect();

    assert_eq!(visited.len(), 12);
    for (position, cell) in visited {
        assert_eq!(position, *cell, "iter must pair each cell with its position");
    }
}

#[test]
#[should_panic(expected = "outside the 4x3 grid")]
fn get_outside_bounds_fails_fast() {
    let grid = Grid::new(4, 3, 0u8).expect("valid grid");
    let _ = grid.get(Position::new(4, 0));
}
