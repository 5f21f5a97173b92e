#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Clocked, double-buffered update loop over a cell grid.
//!
//! The [`Engine`] owns the grid and evaluates a [`Rule`] for every position on
//! each tick. Rules only ever observe the grid as it was before the tick
//! started: their updates are collected into a batch and applied once the scan
//! has finished. The [`Simulation`] wrapper drives ticks from a background
//! clock and implements pause and resume by stopping and restarting it.

mod clock;

use std::fmt;

use cellsim_core::{CellUpdate, Position, Renderable, Renderer};
use cellsim_grid::Grid;

pub use clock::{ClockError, Simulation};

/// Per-simulation update rule evaluated once per cell and tick.
pub trait Rule {
    /// Closed set of cell states understood by the rule.
    type Cell: Clone + Renderable;

    /// Computes the updates caused by the cell at `position`.
    ///
    /// The grid is the snapshot taken before the current tick. Updates may
    /// target the evaluated cell or any other position.
    fn update_cell(
        &self,
        grid: &Grid<Self::Cell>,
        position: Position,
    ) -> Vec<CellUpdate<Self::Cell>>;

    /// Status line presented after each tick.
    fn describe(&self, _grid: &Grid<Self::Cell>) -> Option<String> {
        None
    }

    /// Replacement for a cell the user clicked, if the rule supports editing.
    fn clicked(&self, _cell: &Self::Cell) -> Option<Self::Cell> {
        None
    }
}

/// Lifecycle of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Constructed but the clock has never started.
    Idle,
    /// The clock is ticking.
    Running,
    /// The clock was stopped by a pause request; grid state is retained.
    Paused,
    /// The run has ended and the clock has been released.
    Stopped,
}

/// Summary of a completed tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Number of ticks completed so far, including this one.
    pub tick: u64,
    /// Number of updates applied during the tick.
    pub updates: usize,
}

/// Owner of the grid, the active rule and the render surface.
pub struct Engine<R: Rule, S> {
    grid: Grid<R::Cell>,
    rule: R,
    renderer: S,
    state: EngineState,
    tick_index: u64,
    batch: Vec<CellUpdate<R::Cell>>,
}

impl<R: Rule, S: Renderer> Engine<R, S> {
    /// Creates an idle engine around an already populated grid.
    #[must_use]
    pub fn new(grid: Grid<R::Cell>, rule: R, renderer: S) -> Self {
        Self {
            grid,
            rule,
            renderer,
            state: EngineState::Idle,
            tick_index: 0,
            batch: Vec::new(),
        }
    }

    /// Advances the simulation by one step.
    ///
    /// Every position is evaluated against the pre-tick grid, the collected
    /// updates are applied in the order they were produced (later writes to
    /// the same position win), and the renderer is asked to draw exactly once.
    pub fn tick(&mut self) -> TickReport {
        let bounds = self.grid.bounds();
        self.batch.clear();
        for position in bounds.positions() {
            self.batch
                .extend(self.rule.update_cell(&self.grid, position));
        }

        let mut applied = 0;
        for update in self.batch.drain(..) {
            let (position, cell) = update.into_parts();
            if !self.grid.contains(position) {
                tracing::warn!(%position, "dropping update outside the grid");
                continue;
            }
            let glyph = cell.glyph();
            self.grid.set(position, cell);
            self.renderer.set(position, glyph);
            applied += 1;
        }

        if let Some(status) = self.rule.describe(&self.grid) {
            self.renderer.set_status(&status);
        }
        self.renderer.draw();

        self.tick_index = self.tick_index.saturating_add(1);
        tracing::trace!(tick = self.tick_index, updates = applied, "tick applied");
        TickReport {
            tick: self.tick_index,
            updates: applied,
        }
    }

    /// Writes a single cell immediately, outside of the tick batch.
    ///
    /// Positions outside the grid are ignored. Returns whether the cell was
    /// written.
    pub fn set(&mut self, position: Position, cell: R::Cell) -> bool {
        if !self.grid.contains(position) {
            return false;
        }
        let glyph = cell.glyph();
        self.grid.set(position, cell);
        self.renderer.set(position, glyph);
        true
    }

    /// Applies the rule's click edit to the cell at `position` and redraws.
    ///
    /// Returns whether a cell was changed.
    pub fn click(&mut self, position: Position) -> bool {
        let Some(replacement) = self
            .grid
            .try_get(position)
            .and_then(|cell| self.rule.clicked(cell))
        else {
            return false;
        };
        let applied = self.set(position, replacement);
        if applied {
            self.renderer.draw();
        }
        applied
    }

    /// Replaces the renderer's status line.
    pub fn set_status(&mut self, status: &str) {
        self.renderer.set_status(status);
    }

    /// Asks the renderer to present pending changes.
    pub fn draw(&mut self) {
        self.renderer.draw();
    }
}

impl<R: Rule, S> Engine<R, S> {
    /// Read-only access to the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<R::Cell> {
        &self.grid
    }

    /// Rule evaluated on every tick.
    #[must_use]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Render surface receiving cell changes.
    #[must_use]
    pub fn renderer(&self) -> &S {
        &self.renderer
    }

    /// Mutable access to the render surface.
    #[must_use]
    pub fn renderer_mut(&mut self) -> &mut S {
        &mut self.renderer
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Reports whether the clock is currently ticking.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Number of ticks completed since construction.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Consumes the engine, returning the final grid.
    #[must_use]
    pub fn into_grid(self) -> Grid<R::Cell> {
        self.grid
    }

    pub(crate) fn set_state(&mut self, state: EngineState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "engine state changed");
        }
        self.state = state;
    }
}

impl<R: Rule, S> fmt::Debug for Engine<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("state", &self.state)
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}
