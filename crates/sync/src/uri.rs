//! Content-URI resolution.
//!
//! The `src` sent to the client is context-dependent and recomputed at send
//! time: in-memory content maps to an opaque dynamic media URI, a source
//! URI is encoded through the live session, and with neither available the
//! resolution stays unresolved until a later flush.

use pdfviewer_model::ViewerState;
use uuid::Uuid;

/// Transport-owned session context used to encode outbound URIs.
///
/// Implementations embed whatever session or auth token the transport
/// requires; the viewer treats the result as opaque.
pub trait SessionContext {
    /// Encode an application URI into its session-qualified form.
    fn encode_url(&self, uri: &str) -> String;
}

/// Build the dynamic media URI for in-memory content.
///
/// Shape: `media/{widget}/{version}/{name}.{format}`. The version segment
/// is the only part that changes when content is swapped on the same
/// widget, which is what busts the browser cache while keeping the path
/// shape stable.
pub fn dynamic_media_uri(widget_id: Uuid, version: u8, name: &str, format: &str) -> String {
    let name = sanitize_segment(name);
    if format.is_empty() || name.ends_with(&format!(".{format}")) {
        format!("media/{widget_id}/{version}/{name}")
    } else {
        format!("media/{widget_id}/{version}/{name}.{format}")
    }
}

/// Outcome of resolving the `src` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSrc {
    /// A concrete URI, or an explicit null that clears the client's
    /// document when the identity was reset to nothing.
    Resolved(Option<String>),

    /// No transport session yet; the caller keeps the update queued and
    /// retries at the next flush.
    NoSession,
}

/// Resolve the `src` field for the given state.
///
/// In-memory content resolves without a session. A source URI needs the
/// live session to encode it; with a session but neither source nor
/// content, the resolution is an explicit null so a cleared identity
/// still reaches the client.
pub fn resolve_src(
    state: &ViewerState,
    widget_id: Uuid,
    session: Option<&dyn SessionContext>,
) -> ResolvedSrc {
    if let Some(content) = state.content() {
        return ResolvedSrc::Resolved(Some(dynamic_media_uri(
            widget_id,
            state.content_version(),
            content.name(),
            content.format(),
        )));
    }
    match session {
        Some(session) => {
            ResolvedSrc::Resolved(state.source().map(|source| session.encode_url(source)))
        }
        None => ResolvedSrc::NoSession,
    }
}

fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "content".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfviewer_model::ContentHandle;

    struct PlainSession;

    impl SessionContext for PlainSession {
        fn encode_url(&self, uri: &str) -> String {
            format!("{uri};session=s1")
        }
    }

    #[test]
    fn media_uri_changes_only_with_version() {
        let id = Uuid::new_v4();
        let v1 = dynamic_media_uri(id, 1, "doc.pdf", "pdf");
        let v1_again = dynamic_media_uri(id, 1, "doc.pdf", "pdf");
        let v2 = dynamic_media_uri(id, 2, "doc.pdf", "pdf");

        assert_eq!(v1, v1_again);
        assert_ne!(v1, v2);
        assert_eq!(v1, format!("media/{id}/1/doc.pdf"));
    }

    #[test]
    fn media_uri_sanitizes_awkward_names() {
        let id = Uuid::new_v4();
        let uri = dynamic_media_uri(id, 0, "my report/2024", "pdf");
        assert_eq!(uri, format!("media/{id}/0/my-report-2024.pdf"));

        let unnamed = dynamic_media_uri(id, 0, "", "pdf");
        assert_eq!(unnamed, format!("media/{id}/0/content.pdf"));
    }

    #[test]
    fn content_wins_over_session_encoding() {
        let mut state = ViewerState::new();
        state.set_content(Some(ContentHandle::new("doc.pdf", "pdf", vec![1u8])));

        let id = Uuid::new_v4();
        let resolved = resolve_src(&state, id, Some(&PlainSession));
        assert_eq!(resolved, ResolvedSrc::Resolved(Some(format!("media/{id}/1/doc.pdf"))));
    }

    #[test]
    fn source_needs_a_live_session() {
        let mut state = ViewerState::new();
        state.set_source(Some("report.pdf".to_owned()));

        let id = Uuid::new_v4();
        assert_eq!(resolve_src(&state, id, None), ResolvedSrc::NoSession);
        assert_eq!(
            resolve_src(&state, id, Some(&PlainSession)),
            ResolvedSrc::Resolved(Some("report.pdf;session=s1".to_owned()))
        );
    }

    #[test]
    fn cleared_identity_resolves_to_explicit_null() {
        let state = ViewerState::new();
        assert_eq!(
            resolve_src(&state, Uuid::new_v4(), Some(&PlainSession)),
            ResolvedSrc::Resolved(None)
        );
        assert_eq!(resolve_src(&state, Uuid::new_v4(), None), ResolvedSrc::NoSession);
    }
}
