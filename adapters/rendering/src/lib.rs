#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for cellsim adapters.
//!
//! Engines publish their changes through a [`ChannelRenderer`], which turns
//! every renderer call into a [`RenderCommand`]. Adapters drain the commands
//! into a [`TextCanvas`] covering a [`Viewport`] and present the canvas each
//! time a draw command arrives.

use std::fmt::Write as _;

use cellsim_core::{Color, Glyph, Position, Renderer};
use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

/// Renderer call captured for delivery to another thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    /// A cell changed its appearance.
    Set {
        /// Grid position of the cell.
        position: Position,
        /// New appearance of the cell.
        glyph: Glyph,
    },
    /// The status line changed.
    Status(String),
    /// Pending changes form a complete frame.
    Draw,
}

/// Renderer forwarding every call over an unbounded channel.
///
/// Sending never blocks, so ticks are not slowed down by presentation. Calls
/// made after the receiving side hung up are discarded.
#[derive(Clone, Debug)]
pub struct ChannelRenderer {
    commands: Sender<RenderCommand>,
}

impl ChannelRenderer {
    /// Creates a renderer together with the receiver draining its commands.
    #[must_use]
    pub fn channel() -> (Self, Receiver<RenderCommand>) {
        let (commands, receiver) = crossbeam_channel::unbounded();
        (Self { commands }, receiver)
    }

    fn send(&self, command: RenderCommand) {
        if self.commands.send(command).is_err() {
            tracing::trace!("render command dropped, presenter is gone");
        }
    }
}

impl Renderer for ChannelRenderer {
    fn set(&mut self, position: Position, glyph: Glyph) {
        self.send(RenderCommand::Set { position, glyph });
    }

    fn draw(&mut self) {
        self.send(RenderCommand::Draw);
    }

    fn set_status(&mut self, status: &str) {
        self.send(RenderCommand::Status(status.to_owned()));
    }
}

/// Rectangular window onto the grid presented by an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    offset: Position,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport whose top-left corner shows the cell at `offset`.
    pub fn new(offset: Position, width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyViewport { width, height });
        }
        Ok(Self {
            offset,
            width,
            height,
        })
    }

    /// Grid position shown in the top-left corner.
    #[must_use]
    pub const fn offset(&self) -> Position {
        self.offset
    }

    /// Number of visible columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of visible rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Converts a grid position into a row-major index into the visible area.
    #[must_use]
    pub fn index_of(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x().checked_sub(self.offset.x())?).ok()?;
        let row = u32::try_from(position.y().checked_sub(self.offset.y())?).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + column as usize)
    }

    /// Converts a screen cell relative to the viewport into a grid position.
    ///
    /// Returns `None` when the position is not representable.
    #[must_use]
    pub fn to_grid(&self, column: u32, row: u32) -> Option<Position> {
        let x = self.offset.x().checked_add(i32::try_from(column).ok()?)?;
        let y = self.offset.y().checked_add(i32::try_from(row).ok()?)?;
        Some(Position::new(x, y))
    }
}

/// Character surface mirroring the cells inside a viewport.
#[derive(Clone, Debug)]
pub struct TextCanvas {
    viewport: Viewport,
    glyphs: Vec<Glyph>,
    status: String,
    frames: u64,
}

impl TextCanvas {
    /// Creates a blank canvas covering the viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            glyphs: vec![Glyph::BLANK; viewport.width as usize * viewport.height as usize],
            status: String::new(),
            frames: 0,
        }
    }

    /// Window onto the grid covered by the canvas.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current status line.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Number of completed frames received so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Glyph shown for the grid position, if it is visible.
    #[must_use]
    pub fn glyph_at(&self, position: Position) -> Option<Glyph> {
        self.viewport
            .index_of(position)
            .map(|index| self.glyphs[index])
    }

    /// Applies a captured renderer call, returning whether a frame completed.
    pub fn apply(&mut self, command: RenderCommand) -> bool {
        match command {
            RenderCommand::Set { position, glyph } => {
                self.set(position, glyph);
                false
            }
            RenderCommand::Status(status) => {
                self.status = status;
                false
            }
            RenderCommand::Draw => {
                self.frames += 1;
                true
            }
        }
    }

    /// Plain text rendering: one line per row followed by the status line.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut text = String::with_capacity(self.glyphs.len() + self.status.len() + 8);
        for row in self.glyphs.chunks(self.viewport.width as usize) {
            text.extend(row.iter().map(|glyph| glyph.symbol));
            text.push('\n');
        }
        text.push_str(&self.status);
        text.push('\n');
        text
    }

    /// Terminal rendering with ANSI colors, homing the cursor first so that
    /// consecutive frames overwrite each other.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut text = String::from("\x1b[H");
        for row in self.glyphs.chunks(self.viewport.width as usize) {
            let mut current: Option<(Color, Color)> = None;
            for glyph in row {
                let colors = (glyph.foreground, glyph.background);
                if current != Some(colors) {
                    let _ = write!(
                        text,
                        "\x1b[{};{}m",
                        foreground_code(glyph.foreground),
                        background_code(glyph.background)
                    );
                    current = Some(colors);
                }
                text.push(glyph.symbol);
            }
            text.push_str("\x1b[0m\x1b[K\n");
        }
        text.push_str(&self.status);
        text.push_str("\x1b[K\n");
        text
    }
}

impl Renderer for TextCanvas {
    fn set(&mut self, position: Position, glyph: Glyph) {
        if let Some(index) = self.viewport.index_of(position) {
            self.glyphs[index] = glyph;
        }
    }

    fn draw(&mut self) {
        self.frames += 1;
    }

    fn set_status(&mut self, status: &str) {
        status.clone_into(&mut self.status);
    }
}

const fn foreground_code(color: Color) -> u8 {
    match color {
        Color::Default => 39,
        Color::Black => 30,
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
        Color::White => 37,
    }
}

const fn background_code(color: Color) -> u8 {
    match color {
        Color::Default => 49,
        Color::Black => 40,
        Color::Red => 41,
        Color::Green => 42,
        Color::Yellow => 43,
        Color::Blue => 44,
        Color::White => 47,
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// A viewport must show at least one cell.
    #[error("viewport dimensions must be positive (received {width}x{height})")]
    EmptyViewport {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}
