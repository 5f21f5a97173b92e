use std::{
    io::{self, BufRead},
    thread,
};

use cellsim_core::{InputEvent, Position};
use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

/// Parses one line of interactive input.
///
/// Blank lines carry no event. Click coordinates address grid positions.
pub(crate) fn parse_line(line: &str) -> Result<Option<InputEvent>, InputParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "c" | "click" => {
            let x = coordinate(words.next(), command)?;
            let y = coordinate(words.next(), command)?;
            InputEvent::Click {
                position: Position::new(x, y),
            }
        }
        "p" | "pause" => InputEvent::Pause,
        "q" | "quit" => InputEvent::Quit,
        "s" | "save" => InputEvent::Save,
        _ => return Err(InputParseError::UnknownCommand(command.to_owned())),
    };

    match words.next() {
        Some(extra) => Err(InputParseError::TrailingInput(extra.to_owned())),
        None => Ok(Some(event)),
    }
}

fn coordinate(word: Option<&str>, command: &str) -> Result<i32, InputParseError> {
    let word = word.ok_or_else(|| InputParseError::MissingCoordinate(command.to_owned()))?;
    word.parse()
        .map_err(|_| InputParseError::InvalidCoordinate(word.to_owned()))
}

/// Forwards parsed stdin events until the input ends or the receiver hangs up.
///
/// End of input is reported as a quit request.
pub(crate) fn spawn_stdin_reader() -> io::Result<Receiver<InputEvent>> {
    let (events, receiver) = crossbeam_channel::unbounded();
    let _ = thread::Builder::new()
        .name("cellsim-input".to_owned())
        .spawn(move || read_events(io::stdin().lock(), &events))?;
    Ok(receiver)
}

fn read_events(input: impl BufRead, events: &Sender<InputEvent>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::error!(%error, "failed to read input");
                break;
            }
        };
        match parse_line(&line) {
            Ok(Some(event)) => {
                if events.send(event).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "ignoring input line"),
        }
    }
    let _ = events.send(InputEvent::Quit);
}

/// Reasons an input line cannot be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum InputParseError {
    /// The first word is not a known command.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// A click lacks one of its coordinates.
    #[error("`{0}` expects two coordinates")]
    MissingCoordinate(String),
    /// A coordinate is not an integer.
    #[error("invalid coordinate `{0}`")]
    InvalidCoordinate(String),
    /// Unexpected words follow a complete command.
    #[error("unexpected trailing input `{0}`")]
    TrailingInput(String),
}
