use cellsim_core::{Glyph, Position, Renderer};
use cellsim_engine::Engine;
use cellsim_system_life::{seeded, GameOfLife, LifeCell, GLIDER, STATUS};

#[derive(Debug, Default)]
struct StatusOnly {
    status: Option<String>,
}

impl Renderer for StatusOnly {
    fn set(&mut self, _position: Position, _glyph: Glyph) {}

    fn draw(&mut self) {}

    fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_owned());
    }
}

fn engine(width: u32, height: u32, live: &[Position]) -> Engine<GameOfLife, StatusOnly> {
    let grid = seeded(width, height, live.iter().copied()).expect("valid board");
    Engine::new(grid, GameOfLife, StatusOnly::default())
}

fn live_cells(engine: &Engine<GameOfLife, StatusOnly>) -> Vec<Position> {
    let mut live: Vec<_> = engine
        .grid()
        .iter()
        .filter(|(_, cell)| cell.is_alive())
        .map(|(position, _)| position)
        .collect();
    live.sort();
    live
}

#[test]
fn blinker_oscillates_with_period_two() {
    let horizontal = [Position::new(1, 2), Position::new(2, 2), Position::new(3, 2)];
    let vertical = [Position::new(2, 1), Position::new(2, 2), Position::new(2, 3)];
    let mut engine = engine(5, 5, &horizontal);

    let _ = engine.tick();
    assert_eq!(live_cells(&engine), vertical.to_vec(), "blinker turns vertical");

    let _ = engine.tick();
    assert_eq!(live_cells(&engine), horizontal.to_vec(), "blinker returns after two ticks");
}

#[test]
fn isolated_cell_dies_after_one_tick() {
    let mut engine = engine(3, 3, &[Position::new(1, 1)]);

    let _ = engine.tick();

    assert!(live_cells(&engine).is_empty());
}

#[test]
fn block_is_stable() {
    let block = [
        Position::new(1, 1),
        Position::new(1, 2),
        Position::new(2, 1),
        Position::new(2, 2),
    ];
    let mut engine = engine(4, 4, &block);

    let report = engine.tick();

    assert_eq!(report.updates, 0, "a still life produces no updates");
    assert_eq!(live_cells(&engine), block.to_vec());
}

#[test]
fn glider_moves_one_diagonal_step_every_four_ticks() {
    let mut engine = engine(12, 12, &GLIDER);

    for _ in 0..4 {
        let _ = engine.tick();
    }

    let mut expected: Vec<_> = GLIDER
        .iter()
        .map(|position| Position::new(position.x() + 1, position.y() + 1))
        .collect();
    expected.sort();
    assert_eq!(live_cells(&engine), expected);
    assert_eq!(engine.renderer().status.as_deref(), Some(STATUS));
}

#[test]
fn clicking_toggles_a_square() {
    let mut engine = engine(3, 3, &[]);

    assert!(engine.click(Position::new(0, 2)));
    assert_eq!(*engine.grid().get(Position::new(0, 2)), LifeCell::ALIVE);

    assert!(engine.click(Position::new(0, 2)));
    assert_eq!(*engine.grid().get(Position::new(0, 2)), LifeCell::DEAD);
}
