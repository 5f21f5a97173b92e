use std::{fs, path::Path};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use cellsim_core::Position;
use cellsim_system_guard_duty::GuardLayout;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "guard";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "guard:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the layout into a single-line string suitable for a save file.
pub(crate) fn encode(layout: &GuardLayout) -> Result<String, LayoutTransferError> {
    let payload = SerializableLayout {
        barriers: layout.barriers.clone(),
        guard: layout.guard,
        waypoints: layout.waypoints.clone(),
    };
    let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{LAYOUT_HEADER}:{}x{}:{encoded}",
        layout.width, layout.height
    ))
}

/// Decodes a layout from its string representation.
pub(crate) fn decode(value: &str) -> Result<GuardLayout, LayoutTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LayoutTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

    if domain != LAYOUT_DOMAIN {
        return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != LAYOUT_VERSION {
        return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LayoutTransferError::InvalidEncoding)?;
    let decoded: SerializableLayout =
        serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

    Ok(GuardLayout {
        width,
        height,
        barriers: decoded.barriers,
        guard: decoded.guard,
        waypoints: decoded.waypoints,
    })
}

/// Reads and decodes the layout stored at `path`.
pub(crate) fn read(path: &Path) -> Result<GuardLayout> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    let layout =
        decode(&contents).with_context(|| format!("invalid layout in {}", path.display()))?;
    tracing::info!(path = %path.display(), guard = %layout.guard, "layout loaded");
    Ok(layout)
}

/// Encodes the layout and writes it to `path`, creating parent directories.
pub(crate) fn write(path: &Path, layout: &GuardLayout) -> Result<()> {
    let encoded = encode(layout).context("failed to encode layout")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, format!("{encoded}\n"))
        .with_context(|| format!("failed to write layout file {}", path.display()))?;
    tracing::info!(path = %path.display(), "layout saved");
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    barriers: Vec<Position>,
    guard: Position,
    waypoints: Vec<Position>,
}

/// Errors that can occur while decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include board dimensions.
    #[error("layout string is missing the board dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed.
    #[error("could not parse board dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse layout payload")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}
