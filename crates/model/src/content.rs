//! Shared handle to externally owned binary content.

use std::fmt;
use std::sync::Arc;

/// In-memory document content handed to the viewer by the application.
///
/// The handle is a cheap-clone shared reference: the bytes stay owned by
/// whoever created them and the viewer never assumes exclusive ownership.
/// Equality is *identity*: two handles are equal only when they refer to
/// the same allocation. Re-setting the same handle is therefore a no-op,
/// while a freshly built handle with identical bytes counts as a swap.
#[derive(Clone)]
pub struct ContentHandle(Arc<ContentInner>);

struct ContentInner {
    /// Logical name of the content, e.g. `"report.pdf"`.
    name: String,

    /// Format shorthand used as the URI extension, e.g. `"pdf"`.
    format: String,

    /// The raw bytes.
    data: Arc<[u8]>,
}

impl ContentHandle {
    /// Create a handle over the given bytes.
    pub fn new(
        name: impl Into<String>,
        format: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self(Arc::new(ContentInner {
            name: name.into(),
            format: format.into(),
            data: data.into(),
        }))
    }

    /// Logical name of the content.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Format shorthand (file-extension-like).
    pub fn format(&self) -> &str {
        &self.0.format
    }

    /// The content bytes.
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.0.data.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.0.data.is_empty()
    }

    /// Whether two handles refer to the same content instance.
    pub fn same_handle(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for ContentHandle {
    fn eq(&self, other: &Self) -> bool {
        Self::same_handle(self, other)
    }
}

impl Eq for ContentHandle {}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentHandle")
            .field("name", &self.0.name)
            .field("format", &self.0.format)
            .field("len", &self.0.data.len())
            .finish()
    }
}
