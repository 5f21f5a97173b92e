use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use cellsim_core::{InputEvent, Renderable, Renderer, ORIGIN};
use cellsim_engine::{Engine, Rule, Simulation};
use cellsim_grid::Grid;
use cellsim_rendering::{ChannelRenderer, RenderCommand, TextCanvas, Viewport};
use crossbeam_channel::{select, Receiver};

use crate::input;

/// Tick budget of a run without interactive input.
pub(crate) const DEFAULT_BATCH_TICKS: u64 = 100;

/// Persists the board when the user asks for it.
pub(crate) type SaveHook<R> = Box<dyn FnMut(&Engine<R, ChannelRenderer>) -> Result<()>>;

/// Presentation and lifetime options shared by every simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RunOptions {
    pub(crate) period: Duration,
    pub(crate) ticks: Option<u64>,
    pub(crate) interactive: bool,
    pub(crate) view_width: u32,
    pub(crate) view_height: u32,
}

impl RunOptions {
    fn tick_limit(&self) -> Option<u64> {
        match (self.ticks, self.interactive) {
            (Some(ticks), _) => Some(ticks),
            (None, false) => Some(DEFAULT_BATCH_TICKS),
            (None, true) => None,
        }
    }
}

/// Runs `rule` over `grid` until the tick budget is spent or the user quits.
///
/// Interactive runs repaint the terminal after every frame and accept
/// commands on stdin. Batch runs print the final frame as plain text.
pub(crate) fn run<R>(
    grid: Grid<R::Cell>,
    rule: R,
    options: RunOptions,
    mut save: Option<SaveHook<R>>,
) -> Result<()>
where
    R: Rule + Send + 'static,
    R::Cell: Send + 'static,
{
    let viewport = Viewport::new(
        ORIGIN,
        options.view_width.min(grid.width()),
        options.view_height.min(grid.height()),
    )
    .context("invalid viewport")?;
    let mut canvas = TextCanvas::new(viewport);
    for row in 0..viewport.height() {
        for column in 0..viewport.width() {
            let Some(position) = viewport.to_grid(column, row) else {
                continue;
            };
            if let Some(cell) = grid.try_get(position) {
                canvas.set(position, cell.glyph());
            }
        }
    }

    let (renderer, commands) = ChannelRenderer::channel();
    let mut engine = Engine::new(grid, rule, renderer);
    if let Some(status) = engine.rule().describe(engine.grid()) {
        engine.set_status(&status);
    }

    let inputs = if options.interactive {
        input::spawn_stdin_reader().context("failed to start the input reader")?
    } else {
        crossbeam_channel::never()
    };

    let mut simulation = Simulation::new(engine, options.period);
    let mut presenter = Presenter::new(canvas, options.interactive);
    presenter.begin()?;
    simulation.start_clock()?;

    let outcome = drive(
        &mut simulation,
        &mut presenter,
        &commands,
        &inputs,
        options.tick_limit(),
        &mut save,
    );

    let engine = simulation.stop()?;
    tracing::info!(ticks = engine.tick_index(), "simulation finished");
    outcome?;
    presenter.finish()
}

fn drive<R>(
    simulation: &mut Simulation<R, ChannelRenderer>,
    presenter: &mut Presenter,
    commands: &Receiver<RenderCommand>,
    inputs: &Receiver<InputEvent>,
    tick_limit: Option<u64>,
    save: &mut Option<SaveHook<R>>,
) -> Result<()>
where
    R: Rule + Send + 'static,
    R::Cell: Send + 'static,
{
    let mut edits: u64 = 0;
    loop {
        select! {
            recv(commands) -> command => {
                let Ok(command) = command else {
                    return Ok(());
                };
                if presenter.apply(command)? {
                    let ticks = presenter.canvas.frames().saturating_sub(edits);
                    if tick_limit.is_some_and(|limit| ticks >= limit) {
                        return Ok(());
                    }
                }
            }
            recv(inputs) -> event => {
                let Ok(event) = event else {
                    return Ok(());
                };
                match event {
                    InputEvent::Quit => return Ok(()),
                    InputEvent::Pause => {
                        let state = simulation.toggle_pause()?;
                        tracing::info!(?state, "pause toggled");
                    }
                    InputEvent::Click { position } => {
                        if simulation.click(position)? {
                            edits += 1;
                        }
                    }
                    InputEvent::Save => match save.as_mut() {
                        Some(hook) => {
                            if let Err(error) = simulation.with_engine(|engine| hook(&*engine))? {
                                tracing::error!(error = %format!("{error:#}"), "save failed");
                            }
                        }
                        None => tracing::warn!("this simulation cannot be saved"),
                    },
                }
            }
        }
    }
}

struct Presenter {
    canvas: TextCanvas,
    interactive: bool,
}

impl Presenter {
    fn new(canvas: TextCanvas, interactive: bool) -> Self {
        Self {
            canvas,
            interactive,
        }
    }

    fn begin(&mut self) -> Result<()> {
        if self.interactive {
            self.write("\x1b[2J")?;
            let frame = self.canvas.to_ansi();
            self.write(&frame)?;
        }
        Ok(())
    }

    fn apply(&mut self, command: RenderCommand) -> Result<bool> {
        let completed = self.canvas.apply(command);
        if completed && self.interactive {
            let frame = self.canvas.to_ansi();
            self.write(&frame)?;
        }
        Ok(completed)
    }

    fn finish(&mut self) -> Result<()> {
        if !self.interactive {
            let frame = self.canvas.to_plain_text();
            self.write(&frame)?;
        }
        Ok(())
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write frame to stdout")
    }
}
