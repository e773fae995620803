//! Viewer state model for the server-side PDF viewer widget.
//!
//! Holds the authoritative snapshot of what the connected client renderer
//! should be showing: content identity, page position, zoom and rotation.
//! Pure data and invariants; queueing and transport live in the sync crate.

pub mod content;
pub mod error;
pub mod state;

pub use content::ContentHandle;
pub use error::{ViewerError, ViewerResult};
pub use state::ViewerState;
