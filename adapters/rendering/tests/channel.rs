use std::thread;

use cellsim_core::{CellUpdate, Color, Glyph, Position, Renderable, Renderer};
use cellsim_engine::{Engine, Rule};
use cellsim_grid::Grid;
use cellsim_rendering::{ChannelRenderer, RenderCommand, TextCanvas, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lamp(bool);

impl Renderable for Lamp {
    fn glyph(&self) -> Glyph {
        if self.0 {
            Glyph::plain('*', Color::Yellow)
        } else {
            Glyph::BLANK
        }
    }
}

/// Every lamp flips on each tick.
struct Flicker;

impl Rule for Flicker {
    type Cell = Lamp;

    fn update_cell(&self, grid: &Grid<Lamp>, position: Position) -> Vec<CellUpdate<Lamp>> {
        vec![CellUpdate::new(position, Lamp(!grid.get(position).0))]
    }

    fn describe(&self, _grid: &Grid<Lamp>) -> Option<String> {
        Some("flicker".to_owned())
    }
}

#[test]
fn commands_arrive_in_renderer_call_order() {
    let (mut renderer, commands) = ChannelRenderer::channel();

    renderer.set(Position::new(1, 2), Glyph::plain('a', Color::Red));
    renderer.set_status("status");
    renderer.draw();

    let received: Vec<_> = commands.try_iter().collect();
    assert_eq!(
        received,
        vec![
            RenderCommand::Set {
                position: Position::new(1, 2),
                glyph: Glyph::plain('a', Color::Red),
            },
            RenderCommand::Status("status".to_owned()),
            RenderCommand::Draw,
        ]
    );
}

#[test]
fn sending_after_the_presenter_hangs_up_is_harmless() {
    let (mut renderer, commands) = ChannelRenderer::channel();
    drop(commands);

    renderer.set(Position::new(0, 0), Glyph::BLANK);
    renderer.draw();
}

#[test]
fn canvas_replays_engine_ticks_from_another_thread() {
    let (renderer, commands) = ChannelRenderer::channel();
    let grid = Grid::new(3, 2, Lamp(false)).expect("valid grid");
    let mut engine = Engine::new(grid, Flicker, renderer);

    let ticker = thread::spawn(move || {
        for _ in 0..3 {
            let _ = engine.tick();
        }
    });
    ticker.join().expect("ticker thread");

    let viewport = Viewport::new(Position::new(1, 0), 2, 2).expect("valid viewport");
    let mut canvas = TextCanvas::new(viewport);
    let frames = commands
        .try_iter()
        .filter(|command| canvas.apply(command.clone()))
        .count();

    assert_eq!(frames, 3, "one frame per tick");
    assert_eq!(canvas.to_plain_text(), "**\n**\nflicker\n");
}
