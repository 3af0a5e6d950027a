//! Undo/redo history
//!
//! Every command in [`HistoryStack`] describes an edit in the forward
//! direction. Undo applies its inverse through the [`Document`] and moves it to
//! the redo queue; redo applies it forward and moves it back. Commands keep
//! their id when they move between queues.
//!
//! Both queues are bounded: once a queue holds more than `max_stack_size`
//! commands the oldest ones are dropped.
//!
//! A single undo (or redo) keeps going while consecutive commands are closer
//! in time than `merge_timeout`, so a burst of typing is reverted in one step.

use std::collections::VecDeque;
use std::time::Duration;

use crate::document::Document;
use crate::error::DocumentError;
use crate::position::{TextPosition, TextRange, text_end_position};

/// Identifier issued to each recorded command. `0` means "no command".
pub type ChangeId = u64;

/// Default bound of each queue.
pub const DEFAULT_MAX_STACK_SIZE: usize = 10_000;

/// Default time window of cascading undo/redo.
pub const DEFAULT_MERGE_TIMEOUT: Duration = Duration::from_millis(300);

/// One recorded edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditCommand {
    /// `text` was inserted at `position`.
    Insert {
        /// Change id.
        id: ChangeId,
        /// Inserted text.
        text: String,
        /// Insertion point.
        position: TextPosition,
        /// When the edit happened.
        timestamp: Duration,
    },
    /// `text` was removed from `range`.
    Remove {
        /// Change id.
        id: ChangeId,
        /// Removed span.
        range: TextRange,
        /// Removed contents.
        text: String,
        /// When the edit happened.
        timestamp: Duration,
    },
    /// The selection was `range` before it changed.
    Selection {
        /// Change id.
        id: ChangeId,
        /// Selection to restore.
        range: TextRange,
        /// When the selection changed.
        timestamp: Duration,
    },
}

impl EditCommand {
    /// Change id of the command.
    pub fn id(&self) -> ChangeId {
        match self {
            EditCommand::Insert { id, .. }
            | EditCommand::Remove { id, .. }
            | EditCommand::Selection { id, .. } => *id,
        }
    }

    /// Time the command was recorded.
    pub fn timestamp(&self) -> Duration {
        match self {
            EditCommand::Insert { timestamp, .. }
            | EditCommand::Remove { timestamp, .. }
            | EditCommand::Selection { timestamp, .. } => *timestamp,
        }
    }

    /// Whether the command changes document text.
    pub fn is_text_edit(&self) -> bool {
        !matches!(self, EditCommand::Selection { .. })
    }

    /// Apply the inverse of the command; returns the command to put on the redo queue.
    fn revert<D: Document + ?Sized>(&self, doc: &mut D) -> Result<EditCommand, DocumentError> {
        match self {
            EditCommand::Insert {
                id,
                text,
                position,
                timestamp,
            } => {
                let end = text_end_position(*position, text);
                let removed = doc.remove(TextRange::new(*position, end))?;
                Ok(EditCommand::Insert {
                    id: *id,
                    text: removed,
                    position: *position,
                    timestamp: *timestamp,
                })
            }
            EditCommand::Remove {
                id,
                range,
                text,
                timestamp,
            } => {
                let span = doc.insert(range.normalized().start, text)?;
                Ok(EditCommand::Remove {
                    id: *id,
                    range: span,
                    text: text.clone(),
                    timestamp: *timestamp,
                })
            }
            EditCommand::Selection {
                id,
                range,
                timestamp,
            } => Ok(swap_selection(doc, *id, *range, *timestamp)),
        }
    }

    /// Apply the command forward; returns the command to put on the undo queue.
    fn reapply<D: Document + ?Sized>(&self, doc: &mut D) -> Result<EditCommand, DocumentError> {
        match self {
            EditCommand::Insert { text, position, .. } => {
                doc.insert(*position, text)?;
                Ok(self.clone())
            }
            EditCommand::Remove {
                id,
                range,
                timestamp,
                ..
            } => {
                let removed = doc.remove(*range)?;
                Ok(EditCommand::Remove {
                    id: *id,
                    range: range.normalized(),
                    text: removed,
                    timestamp: *timestamp,
                })
            }
            EditCommand::Selection {
                id,
                range,
                timestamp,
            } => Ok(swap_selection(doc, *id, *range, *timestamp)),
        }
    }
}

/// Set the selection to `range`; returns the command that restores the replaced one.
fn swap_selection<D: Document + ?Sized>(
    doc: &mut D,
    id: ChangeId,
    range: TextRange,
    timestamp: Duration,
) -> EditCommand {
    let previous = doc.selection();
    doc.set_selection(range);
    EditCommand::Selection {
        id,
        range: previous,
        timestamp,
    }
}

/// Bounds and cascade window of a [`HistoryStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of commands kept per queue.
    pub max_stack_size: usize,
    /// Consecutive commands closer than this are undone/redone together.
    pub merge_timeout: Duration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            merge_timeout: DEFAULT_MERGE_TIMEOUT,
        }
    }
}

impl HistoryConfig {
    /// Set the queue bound.
    pub fn with_max_stack_size(mut self, max_stack_size: usize) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    /// Set the cascade window.
    pub fn with_merge_timeout(mut self, merge_timeout: Duration) -> Self {
        self.merge_timeout = merge_timeout;
        self
    }
}

/// Bounded undo/redo queues.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    undo_stack: VecDeque<EditCommand>,
    redo_stack: VecDeque<EditCommand>,
    config: HistoryConfig,
    change_id_counter: ChangeId,
}

impl HistoryStack {
    /// Create an empty history.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
            change_id_counter: 0,
        }
    }

    /// Current bounds and cascade window.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Record an insertion of `text` at `position`.
    pub fn push_insert(
        &mut self,
        text: impl Into<String>,
        position: TextPosition,
        timestamp: Duration,
    ) -> ChangeId {
        let id = self.next_id();
        self.push(EditCommand::Insert {
            id,
            text: text.into(),
            position,
            timestamp,
        })
    }

    /// Record the removal of `removed_text` from `range`.
    pub fn push_remove(
        &mut self,
        range: TextRange,
        removed_text: impl Into<String>,
        timestamp: Duration,
    ) -> ChangeId {
        let id = self.next_id();
        self.push(EditCommand::Remove {
            id,
            range: range.normalized(),
            text: removed_text.into(),
            timestamp,
        })
    }

    /// Record a selection change; `range` is the selection before the change.
    pub fn push_selection(&mut self, range: TextRange, timestamp: Duration) -> ChangeId {
        let id = self.next_id();
        self.push(EditCommand::Selection {
            id,
            range,
            timestamp,
        })
    }

    /// Revert the most recent command and every command recorded within
    /// `merge_timeout` of the one before it.
    ///
    /// Returns how many commands were reverted (0 if there was nothing to undo).
    /// On a document error the cascade stops: commands already reverted stay on
    /// the redo queue and the failing one stays on the undo queue.
    pub fn undo<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<usize, DocumentError> {
        self.cascade(doc, Direction::Undo)
    }

    /// Reapply the most recently undone command and its temporal neighbours.
    pub fn redo<D: Document + ?Sized>(&mut self, doc: &mut D) -> Result<usize, DocumentError> {
        self.cascade(doc, Direction::Redo)
    }

    /// Empty both queues without touching the document.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop the redo future.
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Whether there is anything to undo.
    pub fn has_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands on the undo queue.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of commands on the redo queue.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Id of the most recent applied command, or 0 when the undo queue is empty.
    pub fn current_change_id(&self) -> ChangeId {
        self.undo_stack.back().map_or(0, EditCommand::id)
    }

    /// Queue bound.
    pub fn max_stack_size(&self) -> usize {
        self.config.max_stack_size
    }

    /// Change the queue bound, dropping the oldest commands that no longer fit.
    pub fn set_max_stack_size(&mut self, max_stack_size: usize) {
        self.config.max_stack_size = max_stack_size;
        Self::limit(&mut self.undo_stack, max_stack_size);
        Self::limit(&mut self.redo_stack, max_stack_size);
    }

    /// Cascade window.
    pub fn merge_timeout(&self) -> Duration {
        self.config.merge_timeout
    }

    /// Change the cascade window.
    pub fn set_merge_timeout(&mut self, merge_timeout: Duration) {
        self.config.merge_timeout = merge_timeout;
    }

    /// Undo queue, oldest first.
    pub fn undo_commands(&self) -> impl DoubleEndedIterator<Item = &EditCommand> {
        self.undo_stack.iter()
    }

    /// Redo queue, oldest first (the next redo is last).
    pub fn redo_commands(&self) -> impl DoubleEndedIterator<Item = &EditCommand> {
        self.redo_stack.iter()
    }

    fn next_id(&mut self) -> ChangeId {
        self.change_id_counter += 1;
        self.change_id_counter
    }

    fn push(&mut self, command: EditCommand) -> ChangeId {
        let id = command.id();
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        Self::limit(&mut self.undo_stack, self.config.max_stack_size);
        id
    }

    fn limit(queue: &mut VecDeque<EditCommand>, max_stack_size: usize) {
        if queue.len() <= max_stack_size {
            return;
        }
        let evicted = queue.len() - max_stack_size;
        queue.drain(..evicted);
        tracing::debug!(evicted, max_stack_size, "history queue trimmed");
    }

    fn cascade<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        direction: Direction,
    ) -> Result<usize, DocumentError> {
        let merge_timeout = self.config.merge_timeout;
        let max_stack_size = self.config.max_stack_size;
        let (source, target) = match direction {
            Direction::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            Direction::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };

        let mut applied = 0;
        while let Some(command) = source.pop_back() {
            let result = match direction {
                Direction::Undo => command.revert(&mut *doc),
                Direction::Redo => command.reapply(&mut *doc),
            };
            let moved = match result {
                Ok(moved) => moved,
                Err(err) => {
                    tracing::warn!(
                        id = command.id(),
                        ?direction,
                        error = %err,
                        "history command rejected by document"
                    );
                    source.push_back(command);
                    return Err(err);
                }
            };
            let timestamp = moved.timestamp();
            target.push_back(moved);
            Self::limit(target, max_stack_size);
            applied += 1;

            match source.back() {
                Some(next) if next.timestamp().abs_diff(timestamp) < merge_timeout => {}
                _ => break,
            }
        }

        if applied > 1 {
            tracing::trace!(applied, ?direction, "history cascade");
        }
        Ok(applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}
