#![warn(missing_docs)]
//! Editor View - Headless Line Projection and Edit History
//!
//! # Overview
//!
//! `editor-view` computes how the logical lines of a document map onto wrapped
//! visual rows and keeps that mapping up to date across edits, resizes and
//! font changes. It also records edits in a bounded undo/redo history that can
//! revert a burst of fast edits in one step.
//!
//! Nothing here renders. Glyph advances come from a [`FontMetrics`]
//! implementation supplied by the caller; text lives behind the [`Document`]
//! trait ([`TextBuffer`] is the bundled rope-backed implementation).
//!
//! # Core Features
//!
//! - **Line Wrapping**: word / letter / no wrap, tab stops, kerning, indented continuations
//! - **Projection Cache**: O(1) logical ↔ visual queries, incremental refresh after edits
//! - **Undo/Redo**: bounded queues with time-window cascading
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditSession                                │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  ViewProjection      │  HistoryStack        │  ← Caches & History
//! ├──────────────────────┴──────────────────────┤
//! │  Line Wrapping (compute_line_breaks)        │  ← Text Layout
//! ├─────────────────────────────────────────────┤
//! │  Document / TextBuffer (Rope-based)         │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use editor_view::{
//!     CellMetrics, EditSession, EditorConfig, FontStyle, TextPosition, VisibleIndex,
//!     WrapConfig, WrapMode,
//! };
//!
//! let style = FontStyle::new(Arc::new(CellMetrics::new(1.0)), 12);
//! let config = EditorConfig::default().with_wrap(WrapConfig::default().with_mode(WrapMode::Word));
//! let mut session = EditSession::new("hello world foo", style, config, 11.0);
//!
//! // "foo" moves to the second visual row
//! assert_eq!(session.visible_lines_count().unwrap(), 2);
//! assert_eq!(
//!     session.visible_index_position(VisibleIndex::new(1)).unwrap(),
//!     TextPosition::new(0, 12)
//! );
//!
//! session.insert_at(TextPosition::new(0, 15), " bar", Duration::ZERO).unwrap();
//! session.undo().unwrap();
//! assert_eq!(session.text(), "hello world foo");
//! ```
//!
//! # Module Description
//!
//! - [`wrap`] - line break computation
//! - [`metrics`] - glyph metrics provider and font style
//! - [`projection`] - logical ↔ visual line cache
//! - [`history`] - undo/redo queues
//! - [`buffer`] - rope based text buffer
//! - [`line_ending`] - LF normalization and CRLF round trip
//! - [`session`] - buffer + projection + history

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod line_ending;
pub mod metrics;
pub mod position;
pub mod projection;
pub mod session;
pub mod viewport;
pub mod visible_index;
pub mod wrap;

pub use buffer::TextBuffer;
pub use config::EditorConfig;
pub use document::Document;
pub use error::{DocumentError, EditorError, ProjectionError};
pub use history::{
    ChangeId, DEFAULT_MAX_STACK_SIZE, DEFAULT_MERGE_TIMEOUT, EditCommand, HistoryConfig,
    HistoryStack,
};
pub use line_ending::{LineEnding, normalize_newlines};
pub use metrics::{
    CellMetrics, FontMetrics, FontStyle, Glyph, GlyphRect, MonospaceMetrics, char_width,
};
pub use position::{TextPosition, TextRange, text_end_position};
pub use projection::{ViewProjection, VisibleLineInfo, VisibleLineRange};
pub use session::EditSession;
pub use viewport::Viewport;
pub use visible_index::VisibleIndex;
pub use wrap::{
    DEFAULT_TAB_WIDTH, LineWrapInfo, ParseWrapModeError, WrapConfig, WrapMode, WrapParams,
    compute_line_breaks, compute_line_breaks_with_config, effective_max_width,
    is_break_candidate, leading_indentation_width, tab_advance,
};
