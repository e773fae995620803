//! Notification events posted to application listeners.

use serde::{Deserialize, Serialize};

/// Posted after a client report has been folded into server-side state.
///
/// These describe what already happened on the client; by the time a
/// listener sees one, the viewer state reflects the new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewerEvent {
    /// The client finished parsing and rendering the document.
    RenderComplete { page_count: i32 },

    /// The client moved to another page.
    PagingChanged { active_page: i32 },

    /// The client changed the zoom level.
    ZoomChanged { zoom: f64 },

    /// The client rotated the document.
    RotationChanged { rotation: i32 },
}

/// Event-notification bus supplied by the framework collaborator.
pub trait EventSink {
    fn emit(&mut self, event: ViewerEvent);
}

impl EventSink for Vec<ViewerEvent> {
    fn emit(&mut self, event: ViewerEvent) {
        self.push(event);
    }
}
