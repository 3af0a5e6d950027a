//! Editor configuration.

use crate::history::HistoryConfig;
use crate::wrap::WrapConfig;

/// Settings of an [`EditSession`](crate::EditSession).
///
/// With the `serde` feature, missing fields fall back to their defaults:
///
/// ```json
/// { "wrap": { "mode": "word", "tab_width": 8 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditorConfig {
    /// Soft wrap settings.
    pub wrap: WrapConfig,
    /// Undo/redo bounds.
    pub history: HistoryConfig,
}

impl EditorConfig {
    /// Replace the wrap settings.
    pub fn with_wrap(mut self, wrap: WrapConfig) -> Self {
        self.wrap = wrap;
        self
    }

    /// Replace the history settings.
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }
}
