//! Inbound client commands.
//!
//! The client reports interactions it has already performed (page flips,
//! zoom slider drags, rotations, render completion). Commands arrive as a
//! tag plus an opaque JSON payload and decode into a closed set of typed
//! commands; unrecognized tags fall through to the framework's generic
//! handling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command tag reported when the client finished rendering the document.
pub const ON_RENDER: &str = "render";
/// Command tag for a client-side page change.
pub const ON_PAGING: &str = "paging";
/// Command tag for a client-side zoom change.
pub const ON_ZOOM: &str = "zoom";
/// Command tag for a client-side rotation change.
pub const ON_ROTATE: &str = "rotate";

/// A raw command delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRequest {
    /// Command tag.
    pub command: String,

    /// Opaque payload; a JSON object for the commands the viewer handles.
    pub data: Value,
}

impl ClientRequest {
    pub fn new(command: impl Into<String>, data: Value) -> Self {
        Self { command: command.into(), data }
    }
}

/// Decoded client command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientCommand {
    /// Document parsed and rendered; carries the discovered page count.
    Render { page_count: i32 },

    /// The client moved to another page.
    Paging { active_page: i32 },

    /// The client changed the zoom level.
    Zoom { zoom: f64 },

    /// The client rotated the document.
    Rotate { rotation: i32 },
}

/// Failure to decode a recognized command's payload.
///
/// The offending event is dropped; state is never touched by a payload
/// that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing or malformed field `{field}` in `{command}` payload")]
pub struct DecodeError {
    pub command: &'static str,
    pub field: &'static str,
}

impl ClientCommand {
    /// Decode a raw request.
    ///
    /// Returns `None` for tags the viewer does not handle. A missing
    /// `pageCount` in a `render` payload defaults to 0; the other commands
    /// require their field and fail with [`DecodeError`] otherwise.
    pub fn decode(request: &ClientRequest) -> Option<Result<Self, DecodeError>> {
        match request.command.as_str() {
            ON_RENDER => {
                let page_count = request
                    .data
                    .get("pageCount")
                    .and_then(Value::as_i64)
                    .and_then(|value| i32::try_from(value).ok())
                    .unwrap_or(0);
                Some(Ok(Self::Render { page_count }))
            }
            ON_PAGING => Some(
                require_int(request, ON_PAGING, "activePage")
                    .map(|active_page| Self::Paging { active_page }),
            ),
            ON_ZOOM => {
                Some(require_float(request, ON_ZOOM, "zoom").map(|zoom| Self::Zoom { zoom }))
            }
            ON_ROTATE => Some(
                require_int(request, ON_ROTATE, "rotation")
                    .map(|rotation| Self::Rotate { rotation }),
            ),
            _ => None,
        }
    }
}

fn require_int(
    request: &ClientRequest,
    command: &'static str,
    field: &'static str,
) -> Result<i32, DecodeError> {
    request
        .data
        .get(field)
        .and_then(Value::as_i64)
        .and_then(|value| i32::try_from(value).ok())
        .ok_or(DecodeError { command, field })
}

fn require_float(
    request: &ClientRequest,
    command: &'static str,
    field: &'static str,
) -> Result<f64, DecodeError> {
    request
        .data
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(DecodeError { command, field })
}

/// Registration entry for a client event the transport should deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEventSpec {
    /// Command tag.
    pub tag: &'static str,

    /// Deliver promptly instead of waiting for the next batch.
    pub important: bool,

    /// Collapse consecutive duplicate reports into one.
    pub ignore_duplicates: bool,
}

/// The client events the viewer listens for, with their delivery flags.
pub fn client_events() -> &'static [ClientEventSpec] {
    static EVENTS: [ClientEventSpec; 4] = [
        ClientEventSpec { tag: ON_RENDER, important: true, ignore_duplicates: false },
        ClientEventSpec { tag: ON_PAGING, important: true, ignore_duplicates: true },
        ClientEventSpec { tag: ON_ZOOM, important: true, ignore_duplicates: true },
        ClientEventSpec { tag: ON_ROTATE, important: true, ignore_duplicates: true },
    ];
    &EVENTS
}
