//! The server-side viewer widget.
//!
//! `PdfViewer` ties the state model to the sync protocol: validated setters
//! queue outbound partial updates, `service` folds inbound client reports
//! directly into state, and the flush/first-paint methods produce what goes
//! over the wire. The two directions are deliberately asymmetric: outbound
//! mutations validate and push, inbound reports trust the client and only
//! notify listeners.

use crate::command::{ClientCommand, ClientRequest, DecodeError};
use crate::event::{EventSink, ViewerEvent};
use crate::update::{PendingUpdates, PendingValue, UpdateField};
use crate::uri::{resolve_src, ResolvedSrc, SessionContext};
use pdfviewer_model::{ContentHandle, ViewerError, ViewerResult, ViewerState};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Kinds of children the framework may offer to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Toolbar,
    Other,
}

/// Reference to a child component in the surrounding component tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRef {
    pub id: Uuid,
    pub kind: ChildKind,
}

impl ChildRef {
    pub fn toolbar() -> Self {
        Self { id: Uuid::new_v4(), kind: ChildKind::Toolbar }
    }
}

/// One field update ready to be sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct WireUpdate {
    pub field: &'static str,
    pub value: Value,
}

/// Result of servicing an inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceOutcome {
    /// The viewer consumed the request.
    Handled,

    /// Not a viewer command; the framework's generic handling should run.
    Unhandled(ClientRequest),
}

/// Server-side model of the PDF viewer widget.
///
/// One instance per widget, owned by a single logical UI session; the
/// framework serializes all calls, so no internal locking exists.
#[derive(Debug)]
pub struct PdfViewer {
    id: Uuid,
    state: ViewerState,
    updates: PendingUpdates,
    toolbar: Option<ChildRef>,
}

impl Default for PdfViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfViewer {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ViewerState::new(),
            updates: PendingUpdates::new(),
            toolbar: None,
        }
    }

    /// Widget identity, embedded in the dynamic content URI.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The authoritative viewer state.
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// The source URI, if one is set.
    pub fn src(&self) -> Option<&str> {
        self.state.source()
    }

    /// The in-memory content, if any. The transport serves these bytes
    /// when the client fetches the dynamic media URI.
    pub fn content(&self) -> Option<&ContentHandle> {
        self.state.content()
    }

    pub fn active_page(&self) -> i32 {
        self.state.active_page()
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom()
    }

    pub fn rotation(&self) -> i32 {
        self.state.rotation()
    }

    /// Number of pages reported by the client. Default: 1.
    pub fn page_count(&self) -> i32 {
        self.state.page_count()
    }

    /// Items per page. Fixed at 1 for a PDF viewer.
    pub fn page_size(&self) -> i32 {
        1
    }

    /// The page size is fixed; this always fails.
    pub fn set_page_size(&mut self, _size: i32) -> ViewerResult<()> {
        Err(ViewerError::Unsupported { property: "pageSize" })
    }

    /// Set the source URI. Overrides any previous content.
    pub fn set_src(&mut self, src: Option<String>) {
        if self.state.set_source(src) {
            self.updates.request(UpdateField::Src, PendingValue::Deferred);
        }
    }

    /// Set in-memory content. Overrides any previous source URI.
    ///
    /// The outbound `src` is queued as a deferred value: the resolved URI
    /// depends on session context that may only become available later in
    /// the same processing cycle.
    pub fn set_content(&mut self, content: Option<ContentHandle>) {
        if self.state.set_content(content) {
            self.updates.request(UpdateField::Src, PendingValue::Deferred);
        }
    }

    /// Set the active page (zero-indexed). Rejects negative pages.
    pub fn set_active_page(&mut self, page: i32) -> ViewerResult<()> {
        if self.state.set_active_page(page)? {
            self.updates
                .request(UpdateField::ActivePage, PendingValue::Ready(json!(page)));
        }
        Ok(())
    }

    /// Set the zoom level. Rejects non-positive values.
    pub fn set_zoom(&mut self, zoom: f64) -> ViewerResult<()> {
        if self.state.set_zoom(zoom)? {
            self.updates
                .request(UpdateField::Zoom, PendingValue::Ready(json!(zoom)));
        }
        Ok(())
    }

    /// Set the rotation angle. Only 0, 90, 180 and 270 are accepted.
    pub fn set_rotation(&mut self, rotation: i32) -> ViewerResult<()> {
        if self.state.set_rotation(rotation)? {
            self.updates
                .request(UpdateField::Rotation, PendingValue::Ready(json!(rotation)));
        }
        Ok(())
    }

    /// Go to the first page.
    pub fn first_page(&mut self) -> bool {
        self.set_active_page(0).is_ok()
    }

    /// Go to the previous page. No-op on the first page.
    pub fn previous_page(&mut self) -> bool {
        let target = self.state.active_page() - 1;
        if target < 0 {
            return false;
        }
        self.set_active_page(target).is_ok()
    }

    /// Go to the next page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        let target = self.state.active_page() + 1;
        if target >= self.state.page_count() {
            return false;
        }
        self.set_active_page(target).is_ok()
    }

    /// Go to the last page.
    pub fn last_page(&mut self) -> bool {
        self.set_active_page(self.state.page_count() - 1).is_ok()
    }

    /// Zoom in by 10%.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.state.zoom() + 0.1).is_ok()
    }

    /// Zoom out by 10%. No-op if the result would not be positive.
    pub fn zoom_out(&mut self) -> bool {
        let target = self.state.zoom() - 0.1;
        if target <= 0.0 {
            return false;
        }
        self.set_zoom(target).is_ok()
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_clockwise(&mut self) -> bool {
        self.set_rotation((self.state.rotation() + 90) % 360).is_ok()
    }

    /// Rotate 90 degrees counterclockwise, wrapping 0 back to 270.
    pub fn rotate_counterclockwise(&mut self) -> bool {
        let mut target = self.state.rotation() - 90;
        if target < 0 {
            target = 270;
        }
        self.set_rotation(target).is_ok()
    }

    /// Fold an inbound client request into state.
    ///
    /// Reports overwrite the matching field directly and emit exactly one
    /// notification; no outbound echo is queued, since the client already
    /// shows the reported value. A request the viewer does not recognize
    /// comes back as [`ServiceOutcome::Unhandled`] for the framework's
    /// fallback. A malformed payload fails and drops that single event
    /// without touching state.
    pub fn service(
        &mut self,
        request: ClientRequest,
        events: &mut dyn EventSink,
    ) -> Result<ServiceOutcome, DecodeError> {
        let command = match ClientCommand::decode(&request) {
            Some(Ok(command)) => command,
            Some(Err(error)) => {
                log::warn!("dropping malformed `{}` event: {error}", request.command);
                return Err(error);
            }
            None => return Ok(ServiceOutcome::Unhandled(request)),
        };

        log::debug!("client report: {command:?}");
        match command {
            ClientCommand::Render { page_count } => {
                self.state.sync_page_count(page_count);
                events.emit(ViewerEvent::RenderComplete { page_count });
            }
            ClientCommand::Paging { active_page } => {
                self.state.sync_active_page(active_page);
                events.emit(ViewerEvent::PagingChanged { active_page });
            }
            ClientCommand::Zoom { zoom } => {
                self.state.sync_zoom(zoom);
                events.emit(ViewerEvent::ZoomChanged { zoom });
            }
            ClientCommand::Rotate { rotation } => {
                self.state.sync_rotation(rotation);
                events.emit(ViewerEvent::RotationChanged { rotation });
            }
        }
        Ok(ServiceOutcome::Handled)
    }

    /// Validate a child before the framework attaches it.
    ///
    /// Only a single toolbar is accepted.
    pub fn before_child_added(&self, child: &ChildRef) -> ViewerResult<()> {
        if child.kind != ChildKind::Toolbar {
            return Err(ViewerError::UnsupportedChild { kind: format!("{:?}", child.kind) });
        }
        if self.toolbar.is_some() {
            return Err(ViewerError::DuplicateChild);
        }
        Ok(())
    }

    /// Record a child the framework attached.
    pub fn on_child_added(&mut self, child: ChildRef) {
        if child.kind == ChildKind::Toolbar {
            self.toolbar = Some(child);
        }
    }

    /// Clear the toolbar slot when the attached toolbar is removed.
    /// Removing any other child leaves the slot alone.
    pub fn on_child_removed(&mut self, child: &ChildRef) {
        if self.toolbar.map(|toolbar| toolbar.id) == Some(child.id) {
            self.toolbar = None;
        }
    }

    /// Validate and attach a child in one step.
    pub fn attach_child(&mut self, child: ChildRef) -> ViewerResult<()> {
        self.before_child_added(&child)?;
        self.on_child_added(child);
        Ok(())
    }

    /// The attached toolbar, if any.
    pub fn toolbar(&self) -> Option<&ChildRef> {
        self.toolbar.as_ref()
    }

    /// Number of partial updates waiting for the next flush.
    pub fn pending_update_count(&self) -> usize {
        self.updates.len()
    }

    /// Drain pending partial updates into wire form.
    ///
    /// Deferred values resolve against current state and the session at
    /// this point. A cleared identity resolves to an explicit null so the
    /// client drops the old document; only the no-session case stays
    /// queued and is retried at the next flush.
    pub fn flush_updates(&mut self, session: Option<&dyn SessionContext>) -> Vec<WireUpdate> {
        let drained = self.updates.drain();
        let mut wire = Vec::with_capacity(drained.len());
        for (field, value) in drained {
            match value {
                PendingValue::Ready(value) => {
                    wire.push(WireUpdate { field: field.wire_name(), value });
                }
                PendingValue::Deferred => match resolve_src(&self.state, self.id, session) {
                    ResolvedSrc::Resolved(uri) => {
                        wire.push(WireUpdate {
                            field: field.wire_name(),
                            value: uri.map_or(Value::Null, Value::String),
                        });
                    }
                    ResolvedSrc::NoSession => {
                        log::debug!("src unresolved, keeping update queued");
                        self.updates.request(field, PendingValue::Deferred);
                    }
                },
            }
        }
        wire
    }

    /// Full-state serialization for the first paint.
    ///
    /// `src` is always present (JSON null when unresolved); the remaining
    /// fields are written only when they differ from their defaults. The
    /// snapshot supersedes any queued partial updates, so the pending
    /// queue is cleared.
    pub fn render_properties(&mut self, session: Option<&dyn SessionContext>) -> Map<String, Value> {
        self.updates.clear();

        let mut properties = Map::new();
        let src = match resolve_src(&self.state, self.id, session) {
            ResolvedSrc::Resolved(uri) => uri.map_or(Value::Null, Value::String),
            ResolvedSrc::NoSession => Value::Null,
        };
        properties.insert("src".to_owned(), src);
        if self.state.active_page() != 0 {
            properties.insert("activePage".to_owned(), json!(self.state.active_page()));
        }
        if self.state.zoom() != 1.0 {
            properties.insert("zoom".to_owned(), json!(self.state.zoom()));
        }
        if self.state.rotation() != 0 {
            properties.insert("rotation".to_owned(), json!(self.state.rotation()));
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ON_PAGING, ON_RENDER, ON_ROTATE, ON_ZOOM};
    use serde_json::json;

    struct PlainSession;

    impl SessionContext for PlainSession {
        fn encode_url(&self, uri: &str) -> String {
            format!("/app/{uri}")
        }
    }

    fn flushed(viewer: &mut PdfViewer) -> Vec<WireUpdate> {
        viewer.flush_updates(Some(&PlainSession))
    }

    #[test]
    fn changed_setter_queues_exactly_one_update() {
        let mut viewer = PdfViewer::new();
        viewer.set_active_page(2).unwrap();
        assert_eq!(viewer.pending_update_count(), 1);

        let updates = flushed(&mut viewer);
        assert_eq!(updates, vec![WireUpdate { field: "activePage", value: json!(2) }]);
    }

    #[test]
    fn equal_value_setter_queues_nothing() {
        let mut viewer = PdfViewer::new();
        viewer.set_active_page(2).unwrap();
        flushed(&mut viewer);

        viewer.set_active_page(2).unwrap();
        assert_eq!(viewer.pending_update_count(), 0);
    }

    #[test]
    fn rejected_setter_leaves_state_and_queue_alone() {
        let mut viewer = PdfViewer::new();
        assert!(viewer.set_zoom(-1.0).is_err());
        assert!(viewer.set_rotation(45).is_err());
        assert!(viewer.set_active_page(-3).is_err());

        assert_eq!(viewer.zoom(), 1.0);
        assert_eq!(viewer.rotation(), 0);
        assert_eq!(viewer.active_page(), 0);
        assert_eq!(viewer.pending_update_count(), 0);
    }

    #[test]
    fn page_size_is_fixed() {
        let mut viewer = PdfViewer::new();
        assert_eq!(viewer.page_size(), 1);
        assert!(matches!(
            viewer.set_page_size(10),
            Err(ViewerError::Unsupported { property: "pageSize" })
        ));
    }

    #[test]
    fn navigation_respects_page_count() {
        let mut viewer = PdfViewer::new();
        let mut events = Vec::new();
        viewer
            .service(ClientRequest::new(ON_RENDER, json!({ "pageCount": 3 })), &mut events)
            .unwrap();

        assert!(!viewer.previous_page());
        assert!(viewer.next_page());
        assert!(viewer.next_page());
        assert!(!viewer.next_page());
        assert_eq!(viewer.active_page(), 2);

        assert!(viewer.first_page());
        assert_eq!(viewer.active_page(), 0);
        assert!(viewer.last_page());
        assert_eq!(viewer.active_page(), 2);
    }

    #[test]
    fn zoom_out_refuses_to_cross_zero() {
        let mut viewer = PdfViewer::new();
        viewer.set_zoom(0.05).unwrap();
        assert!(!viewer.zoom_out());
        assert_eq!(viewer.zoom(), 0.05);

        assert!(viewer.zoom_in());
        assert!((viewer.zoom() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn rotate_clockwise_cycles_through_right_angles() {
        let mut viewer = PdfViewer::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert!(viewer.rotate_clockwise());
            seen.push(viewer.rotation());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn rotate_counterclockwise_wraps_to_270() {
        let mut viewer = PdfViewer::new();
        assert!(viewer.rotate_counterclockwise());
        assert_eq!(viewer.rotation(), 270);
    }

    #[test]
    fn inbound_paging_trusts_client_and_emits_once() {
        let mut viewer = PdfViewer::new();
        let mut events = Vec::new();

        // Page 3 with the default page_count of 1: out of range on the
        // server, accepted anyway because the client already moved.
        let outcome = viewer
            .service(ClientRequest::new(ON_PAGING, json!({ "activePage": 3 })), &mut events)
            .unwrap();

        assert_eq!(outcome, ServiceOutcome::Handled);
        assert_eq!(viewer.active_page(), 3);
        assert_eq!(events, vec![ViewerEvent::PagingChanged { active_page: 3 }]);
        assert_eq!(viewer.pending_update_count(), 0);
    }

    #[test]
    fn inbound_zoom_and_rotate_bypass_validation() {
        let mut viewer = PdfViewer::new();
        let mut events = Vec::new();

        viewer
            .service(ClientRequest::new(ON_ZOOM, json!({ "zoom": 0.25 })), &mut events)
            .unwrap();
        viewer
            .service(ClientRequest::new(ON_ROTATE, json!({ "rotation": 180 })), &mut events)
            .unwrap();

        assert_eq!(viewer.zoom(), 0.25);
        assert_eq!(viewer.rotation(), 180);
        assert_eq!(
            events,
            vec![
                ViewerEvent::ZoomChanged { zoom: 0.25 },
                ViewerEvent::RotationChanged { rotation: 180 },
            ]
        );
        assert_eq!(viewer.pending_update_count(), 0);
    }

    #[test]
    fn malformed_payload_drops_event_and_keeps_state() {
        let mut viewer = PdfViewer::new();
        let mut events = Vec::new();

        let result =
            viewer.service(ClientRequest::new(ON_ZOOM, json!({ "zoom": "big" })), &mut events);

        assert!(result.is_err());
        assert_eq!(viewer.zoom(), 1.0);
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_command_falls_through_to_framework() {
        let mut viewer = PdfViewer::new();
        let mut events = Vec::new();
        let request = ClientRequest::new("onClick", json!({}));

        let outcome = viewer.service(request.clone(), &mut events).unwrap();
        assert_eq!(outcome, ServiceOutcome::Unhandled(request));
        assert!(events.is_empty());
    }

    #[test]
    fn only_one_toolbar_may_attach() {
        let mut viewer = PdfViewer::new();

        let other = ChildRef { id: Uuid::new_v4(), kind: ChildKind::Other };
        assert!(matches!(
            viewer.attach_child(other),
            Err(ViewerError::UnsupportedChild { .. })
        ));

        let first = ChildRef::toolbar();
        let second = ChildRef::toolbar();
        assert!(viewer.attach_child(first).is_ok());
        assert!(matches!(viewer.attach_child(second), Err(ViewerError::DuplicateChild)));

        // Removing an unrelated child leaves the slot alone.
        viewer.on_child_removed(&second);
        assert_eq!(viewer.toolbar(), Some(&first));

        viewer.on_child_removed(&first);
        assert_eq!(viewer.toolbar(), None);
        assert!(viewer.attach_child(second).is_ok());
    }
}
