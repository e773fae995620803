//! Authoritative viewer state and its validated mutators.

use crate::content::ContentHandle;
use crate::error::{ViewerError, ViewerResult};

/// Server-held snapshot of the viewer.
///
/// Exactly one of `source` / `content` is meaningful at a time: setting one
/// always clears the other, and either reset moves the viewer back to page
/// zero. `page_count` is whatever the client last reported after parsing
/// the document; until then it stays at the default of 1.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Externally supplied URI to a PDF.
    source: Option<String>,

    /// Externally supplied in-memory content.
    content: Option<ContentHandle>,

    /// Bumped on every non-null content replacement so the derived content
    /// URI changes and the browser refetches. Wraps at 255.
    content_version: u8,

    /// Number of pages, as reported by the client renderer.
    page_count: i32,

    /// Current page, zero-indexed.
    active_page: i32,

    /// Zoom level, 1.0 = 100%.
    zoom: f64,

    /// Clockwise rotation in degrees, one of 0, 90, 180, 270.
    rotation: i32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            source: None,
            content: None,
            content_version: 0,
            page_count: 1,
            active_page: 0,
            zoom: 1.0,
            rotation: 0,
        }
    }
}

impl ViewerState {
    /// Create a state with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// The source URI, if one is set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The in-memory content, if any.
    pub fn content(&self) -> Option<&ContentHandle> {
        self.content.as_ref()
    }

    /// Current content version counter.
    pub fn content_version(&self) -> u8 {
        self.content_version
    }

    /// Number of pages reported by the client. Default: 1.
    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    /// Current page, zero-indexed.
    pub fn active_page(&self) -> i32 {
        self.active_page
    }

    /// Zoom level. Default: 1.0.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Rotation angle in degrees. Default: 0.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Set the source URI, clearing any in-memory content.
    ///
    /// The last of `set_source` / `set_content` wins. Returns whether the
    /// state changed; re-setting an equal URI while no content is attached
    /// is a no-op.
    pub fn set_source(&mut self, source: Option<String>) -> bool {
        if self.content.is_none() && self.source == source {
            return false;
        }
        self.source = source;
        self.content = None;
        self.active_page = 0;
        true
    }

    /// Set the in-memory content, clearing any source URI.
    ///
    /// Replacing with a non-null handle bumps the content version, which is
    /// what forces the client to refetch even though the URI path shape
    /// stays the same. Re-setting the very same handle while no source is
    /// attached is a no-op and does not bump the version.
    pub fn set_content(&mut self, content: Option<ContentHandle>) -> bool {
        let same = match (&self.content, &content) {
            (Some(current), Some(next)) => ContentHandle::same_handle(current, next),
            (None, None) => true,
            _ => false,
        };
        if self.source.is_none() && same {
            return false;
        }
        if content.is_some() {
            self.content_version = self.content_version.wrapping_add(1);
        }
        self.content = content;
        self.source = None;
        self.active_page = 0;
        true
    }

    /// Set the active page.
    ///
    /// Only the lower bound is validated here; the upper bound is enforced
    /// by the navigation helpers and by the client, so explicit callers
    /// (including inbound sync during transient states) may set a page at
    /// or beyond the current `page_count`.
    pub fn set_active_page(&mut self, page: i32) -> ViewerResult<bool> {
        if page < 0 {
            return Err(ViewerError::InvalidArgument {
                field: "activePage",
                reason: format!("page cannot be negative: {page}"),
            });
        }
        if self.active_page == page {
            return Ok(false);
        }
        self.active_page = page;
        Ok(true)
    }

    /// Set the zoom level. Must be positive.
    pub fn set_zoom(&mut self, zoom: f64) -> ViewerResult<bool> {
        if zoom <= 0.0 {
            return Err(ViewerError::InvalidArgument {
                field: "zoom",
                reason: format!("zoom should be positive: {zoom}"),
            });
        }
        if self.zoom == zoom {
            return Ok(false);
        }
        self.zoom = zoom;
        Ok(true)
    }

    /// Set the rotation angle. Only 0, 90, 180 and 270 are accepted.
    pub fn set_rotation(&mut self, rotation: i32) -> ViewerResult<bool> {
        if !(0..360).contains(&rotation) {
            return Err(ViewerError::InvalidArgument {
                field: "rotation",
                reason: format!("invalid degrees: {rotation}"),
            });
        }
        if rotation % 90 != 0 {
            return Err(ViewerError::InvalidArgument {
                field: "rotation",
                reason: format!("multiples of 90 degrees only: {rotation}"),
            });
        }
        if self.rotation == rotation {
            return Ok(false);
        }
        self.rotation = rotation;
        Ok(true)
    }

    /// Overwrite the page count with a client-reported value.
    ///
    /// Inbound reports describe what the client renderer already did, so
    /// they bypass validation entirely.
    pub fn sync_page_count(&mut self, page_count: i32) {
        self.page_count = page_count;
    }

    /// Overwrite the active page with a client-reported value.
    pub fn sync_active_page(&mut self, active_page: i32) {
        self.active_page = active_page;
    }

    /// Overwrite the zoom with a client-reported value.
    pub fn sync_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Overwrite the rotation with a client-reported value.
    pub fn sync_rotation(&mut self, rotation: i32) {
        self.rotation = rotation;
    }
}
