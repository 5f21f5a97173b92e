#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter running the cellsim automata in a terminal.

mod app;
mod config;
mod input;
mod layout_transfer;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cellsim_system_guard_duty::{GuardDuty, GuardLayout};
use cellsim_system_langton::LangtonsAnt;
use cellsim_system_life::{GameOfLife, Soup, GLIDER};
use cellsim_system_wireworld::Wireworld;

use crate::{
    app::{RunOptions, SaveHook},
    config::{Config, Settings},
};

const DEFAULT_SAVE_PATH: &str = "data/guard_duty/save.layout";

/// Clocked cellular automata rendered as text.
#[derive(Debug, Parser)]
#[command(name = "cellsim", version, about)]
struct Cli {
    /// TOML file with per-simulation defaults.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// File receiving log output.
    #[arg(long, global = true, value_name = "FILE", default_value = "logs/cellsim.log")]
    log_file: PathBuf,
    #[command(subcommand)]
    simulation: SimulationCommand,
}

#[derive(Debug, Subcommand)]
enum SimulationCommand {
    /// Conway's game of life.
    Life {
        #[command(flatten)]
        run: RunArgs,
        /// Start from a random soup with this share of live cells instead of a glider.
        #[arg(long)]
        density: Option<f64>,
        /// Seed of the random soup.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Langton's ant.
    Langton {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Wireworld electron circuits.
    Wireworld {
        #[command(flatten)]
        run: RunArgs,
    },
    /// A guard patrolling waypoints around barriers.
    GuardDuty {
        #[command(flatten)]
        run: RunArgs,
        /// Layout file to start from instead of the save file.
        #[arg(long, value_name = "FILE")]
        load: Option<PathBuf>,
        /// Destination of the `save` command, resumed on the next start.
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SAVE_PATH)]
        save: PathBuf,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Number of board columns.
    #[arg(long)]
    width: Option<u32>,
    /// Number of board rows.
    #[arg(long)]
    height: Option<u32>,
    /// Milliseconds between ticks.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    period_ms: Option<u64>,
    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,
    /// Repaint every frame and read commands from stdin.
    #[arg(long)]
    interactive: bool,
    /// Number of visible columns.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u32).range(1..))]
    view_width: u32,
    /// Number of visible rows.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..))]
    view_height: u32,
}

impl RunArgs {
    fn settings(&self, defaults: Settings) -> Settings {
        defaults.overridden(self.width, self.height, self.period_ms)
    }

    fn options(&self, settings: Settings) -> RunOptions {
        RunOptions {
            period: settings.period,
            ticks: self.ticks,
            interactive: self.interactive,
            view_width: self.view_width,
            view_height: self.view_height,
        }
    }
}

/// Entry point for the cellsim command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;
    let config = Config::load(cli.config.as_deref())?;

    match cli.simulation {
        SimulationCommand::Life { run, density, seed } => {
            let settings = run.settings(config.life);
            let grid = match density {
                Some(density) => {
                    let soup = Soup::new(density, seed);
                    tracing::info!(density = soup.density(), seed, "seeding random soup");
                    soup.populate(settings.width, settings.height)?
                }
                None => cellsim_system_life::seeded(settings.width, settings.height, GLIDER)?,
            };
            app::run(grid, GameOfLife, run.options(settings), None)
        }
        SimulationCommand::Langton { run } => {
            let settings = run.settings(config.langton);
            let grid = cellsim_system_langton::board(settings.width, settings.height)?;
            app::run(grid, LangtonsAnt, run.options(settings), None)
        }
        SimulationCommand::Wireworld { run } => {
            let settings = run.settings(config.wireworld);
            let grid = cellsim_system_wireworld::reference_board(settings.width, settings.height)?;
            app::run(grid, Wireworld, run.options(settings), None)
        }
        SimulationCommand::GuardDuty { run, load, save } => {
            let settings = run.settings(config.guard_duty);
            let layout = guard_layout(load.as_deref(), &save, settings)?;
            let (grid, patrol) = layout.build().context("invalid guard layout")?;
            let hook: SaveHook<GuardDuty> = Box::new(move |engine| {
                let layout = GuardLayout::capture(engine.grid(), engine.rule().patrol())?;
                layout_transfer::write(&save, &layout)
            });
            app::run(grid, GuardDuty::new(patrol), run.options(settings), Some(hook))
        }
    }
}

/// Board to start from: an explicit `--load` file, else the save file when one
/// exists, else the demo patrol.
fn guard_layout<'a>(
    load: Option<&'a Path>,
    save: &'a Path,
    settings: Settings,
) -> Result<GuardLayout> {
    let resume = load.or_else(|| save.is_file().then_some(save));
    match resume {
        Some(path) => {
            tracing::info!(path = %path.display(), "resuming guard layout");
            let layout = layout_transfer::read(path)?;
            if (layout.width, layout.height) != (settings.width, settings.height) {
                tracing::info!(
                    width = layout.width,
                    height = layout.height,
                    "board size taken from the layout file"
                );
            }
            Ok(layout)
        }
        None => Ok(GuardLayout::demo(settings.width, settings.height)),
    }
}
