//! Sync engine for the server-side PDF viewer widget.
//!
//! Keeps the server-authoritative [`pdfviewer_model::ViewerState`] and a
//! connected client renderer consistent: outbound mutations validate, then
//! queue coalescing partial updates; inbound client reports overwrite state
//! directly and notify listeners. Content swaps are cache-busted through a
//! versioned dynamic media URI whose resolution is deferred to flush time.

pub mod command;
pub mod event;
pub mod update;
pub mod uri;
pub mod widget;

pub use command::{client_events, ClientCommand, ClientEventSpec, ClientRequest, DecodeError};
pub use event::{EventSink, ViewerEvent};
pub use update::{PendingUpdates, PendingValue, UpdateField};
pub use uri::{dynamic_media_uri, resolve_src, ResolvedSrc, SessionContext};
pub use widget::{ChildKind, ChildRef, PdfViewer, ServiceOutcome, WireUpdate};
