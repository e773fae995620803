//! Error taxonomy for viewer state mutations and child attachment.

/// Errors surfaced synchronously by the viewer.
///
/// Every failure is atomic: when a mutation is rejected the state is left
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    /// Out-of-range numeric input to a validated setter.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },

    /// A child other than a toolbar was offered to the viewer.
    #[error("unsupported child: {kind}")]
    UnsupportedChild { kind: String },

    /// A second toolbar was offered while one is already attached.
    #[error("only one toolbar is allowed")]
    DuplicateChild,

    /// The property is fixed and can never be changed.
    #[error("{property} is read-only")]
    Unsupported { property: &'static str },
}

/// Result type for viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;
