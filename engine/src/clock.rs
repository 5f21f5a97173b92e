//! Background clock driving engine ticks.

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

use cellsim_core::{Position, Renderer};
use crossbeam_channel::{select, Sender};
use thiserror::Error;

use crate::{Engine, EngineState, Rule};

/// Engine driven by a periodic clock running on a dedicated thread.
///
/// Ticks and direct edits share a single lock, so a tick always runs to
/// completion before another tick or edit observes the grid. Pausing stops and
/// joins the clock thread; resuming starts a fresh one.
pub struct Simulation<R: Rule, S> {
    engine: Arc<Mutex<Engine<R, S>>>,
    period: Duration,
    ticker: Option<Ticker>,
}

impl<R, S> Simulation<R, S>
where
    R: Rule + Send + 'static,
    R::Cell: Send + 'static,
    S: Renderer + Send + 'static,
{
    /// Wraps an engine that will tick once per `period` while running.
    #[must_use]
    pub fn new(engine: Engine<R, S>, period: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            period,
            ticker: None,
        }
    }

    /// Interval between two consecutive ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Reports whether the clock is currently ticking.
    ///
    /// A clock thread that exited on its own, for example after a panicking
    /// tick, no longer counts as playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_alive)
    }

    /// Lifecycle state recorded by the engine.
    pub fn state(&self) -> Result<EngineState, ClockError> {
        Ok(self.lock()?.state())
    }

    /// Starts ticking from the idle or paused state.
    pub fn start_clock(&mut self) -> Result<(), ClockError> {
        if self.is_playing() {
            return Err(ClockError::AlreadyRunning);
        }
        if let Some(exited) = self.ticker.take() {
            exited.stop()?;
        }

        let previous = {
            let mut engine = self.lock()?;
            let previous = engine.state();
            engine.set_state(EngineState::Running);
            previous
        };

        match Ticker::spawn(Arc::clone(&self.engine), self.period) {
            Ok(ticker) => {
                tracing::info!(period = ?self.period, "event clock started");
                self.ticker = Some(ticker);
                Ok(())
            }
            Err(error) => {
                self.lock()?.set_state(previous);
                Err(error)
            }
        }
    }

    /// Stops ticking, waiting for any in-flight tick to complete.
    ///
    /// The engine is marked paused even when the clock thread ended with a
    /// panic; the panic is reported afterwards.
    pub fn pause(&mut self) -> Result<(), ClockError> {
        let ticker = self.ticker.take().ok_or(ClockError::NotRunning)?;
        let joined = ticker.stop();
        self.engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_state(EngineState::Paused);
        joined?;
        tracing::info!("event clock paused");
        Ok(())
    }

    /// Pauses a running clock or resumes a paused one, returning the new state.
    pub fn toggle_pause(&mut self) -> Result<EngineState, ClockError> {
        if self.is_playing() {
            self.pause()?;
            Ok(EngineState::Paused)
        } else {
            self.start_clock()?;
            Ok(EngineState::Running)
        }
    }

    /// Runs `action` with exclusive access to the engine, between ticks.
    pub fn with_engine<T, F>(&self, action: F) -> Result<T, ClockError>
    where
        F: FnOnce(&mut Engine<R, S>) -> T,
    {
        let mut engine = self.lock()?;
        Ok(action(&mut engine))
    }

    /// Writes a cell immediately; positions outside the grid are ignored.
    pub fn set(&self, position: Position, cell: R::Cell) -> Result<bool, ClockError> {
        self.with_engine(|engine| engine.set(position, cell))
    }

    /// Applies the rule's click edit to the cell at `position`.
    pub fn click(&self, position: Position) -> Result<bool, ClockError> {
        self.with_engine(|engine| engine.click(position))
    }

    /// Ends the run, releasing the clock thread before returning the engine.
    pub fn stop(mut self) -> Result<Engine<R, S>, ClockError> {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop()?;
        }
        let Self { engine, .. } = self;
        let mutex = Arc::try_unwrap(engine).map_err(|_| ClockError::EngineShared)?;
        let mut engine = mutex.into_inner().map_err(|_| ClockError::Poisoned)?;
        engine.set_state(EngineState::Stopped);
        tracing::info!(ticks = engine.tick_index(), "event clock stopped");
        Ok(engine)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Engine<R, S>>, ClockError> {
        self.engine.lock().map_err(|_| ClockError::Poisoned)
    }
}

struct Ticker {
    stop_signal: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn<R, S>(engine: Arc<Mutex<Engine<R, S>>>, period: Duration) -> Result<Self, ClockError>
    where
        R: Rule + Send + 'static,
        R::Cell: Send + 'static,
        S: Renderer + Send + 'static,
    {
        let (stop_signal, stopped) = crossbeam_channel::bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("cellsim-clock".to_owned())
            .spawn(move || {
                let ticks = crossbeam_channel::tick(period);
                loop {
                    select! {
                        recv(stopped) -> _ => break,
                        recv(ticks) -> _ => {
                            let Ok(mut engine) = engine.lock() else {
                                tracing::error!("engine lock poisoned, stopping clock");
                                break;
                            };
                            let _ = engine.tick();
                        }
                    }
                }
            })?;
        Ok(Self {
            stop_signal,
            handle: Some(handle),
        })
    }

    fn is_alive(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn stop(mut self) -> Result<(), ClockError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), ClockError> {
        // The receiver is gone when the thread already exited.
        let _ = self.stop_signal.try_send(());
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ClockError::TickerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if self.shutdown().is_err() {
            tracing::error!("event clock thread panicked");
        }
    }
}

/// Errors reported while controlling the clock.
#[derive(Debug, Error)]
pub enum ClockError {
    /// The clock is already ticking.
    #[error("the clock is already running")]
    AlreadyRunning,
    /// Pause was requested while the clock was not ticking.
    #[error("the clock is not running")]
    NotRunning,
    /// The clock thread could not be created.
    #[error("failed to spawn the clock thread")]
    Spawn(#[from] io::Error),
    /// A tick panicked while holding the engine lock.
    #[error("the engine lock was poisoned by a panicking tick")]
    Poisoned,
    /// The clock thread panicked.
    #[error("the clock thread panicked")]
    TickerPanicked,
    /// The engine is still referenced by a live clock thread.
    #[error("the engine is still shared with the clock thread")]
    EngineShared,
}
