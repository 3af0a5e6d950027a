//! Error types.
//!
//! Invalid positions are always reported, never clamped.

use thiserror::Error;

use crate::position::{TextPosition, TextRange};

/// Errors reported by a [`Document`](crate::Document) when an edit cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The position does not exist in the document.
    #[error("invalid position {position} (document has {line_count} lines)")]
    InvalidPosition {
        /// Rejected position.
        position: TextPosition,
        /// Line count of the document at the time of the call.
        line_count: usize,
    },
    /// One of the range endpoints does not exist in the document.
    #[error("invalid range {range}")]
    InvalidRange {
        /// Rejected range.
        range: TextRange,
    },
}

/// Errors reported by [`ViewProjection`](crate::ViewProjection) queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// A logical line index beyond the document's line count.
    #[error("logical line {line} out of range (line count {line_count})")]
    LineOutOfRange {
        /// Requested logical line.
        line: usize,
        /// Number of logical lines.
        line_count: usize,
    },
    /// A visible index beyond the visible line count (or the invalid sentinel).
    #[error("visible index {index} out of range (visible line count {visible_count})")]
    VisibleIndexOutOfRange {
        /// Requested visible index (raw value).
        index: usize,
        /// Number of visual lines.
        visible_count: usize,
    },
    /// The cache awaits reconstruction and cannot be built yet (document still loading).
    #[error("projection cache is pending reconstruction")]
    Pending,
}

/// Top-level error of [`EditSession`](crate::EditSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The document rejected an edit.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// A projection query failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
