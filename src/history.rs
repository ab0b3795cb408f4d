//! # Undo history
//!
//! Past and future are stacks of snapshots; the present is the live
//! [`EditorState`]. Consecutive edits of the same [`EditKind`] coalesce into the
//! entry recorded before the first of them.
use crate::error::EditorError;
use crate::model::{Doc, Selection};
use crate::state::EditorState;
use derive_new::new;
use displaydoc::Display;
use std::collections::VecDeque;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A snapshot of the document and selection
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Entry {
    pub doc: Doc,
    pub selection: Selection,
}

impl Entry {
    pub fn of(state: &EditorState) -> Self {
        Entry::new(state.doc.clone(), state.selection)
    }
}

/// The class of an edit, for coalescing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditKind {
    Typing,
    Deleting,
    Other,
}

/// When consecutive edits share one history entry
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoalescePolicy {
    /// Runs of typing or of deleting share an entry
    Typing,
    /// Every edit is its own entry
    Never,
}

impl Default for CoalescePolicy {
    fn default() -> Self {
        CoalescePolicy::Typing
    }
}

/// Error when parsing a coalesce policy
#[derive(Debug, Display, Error)]
pub enum ParsePolicyError {
    /// Unknown coalesce policy `{0}` (expected `typing` or `never`)
    Unknown(String),
}

impl FromStr for CoalescePolicy {
    type Err = ParsePolicyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typing" => Ok(Self::Typing),
            "never" => Ok(Self::Never),
            _ => Err(ParsePolicyError::Unknown(s.to_owned())),
        }
    }
}

/// Limits of the history
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept
    pub depth: usize,
    pub coalesce: CoalescePolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            depth: 100,
            coalesce: CoalescePolicy::Typing,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    past: VecDeque<Entry>,
    future: Vec<Entry>,
    /// The kind of the last recorded edit, while its burst is open
    last: Option<EditKind>,
    config: HistoryConfig,
}

impl History {
    pub fn new(config: HistoryConfig) -> Self {
        History {
            config,
            ..History::default()
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Record a committed edit, given the state from before it
    pub fn record(&mut self, before: Entry, kind: EditKind) {
        self.future.clear();
        let coalesce = self.config.coalesce == CoalescePolicy::Typing
            && kind != EditKind::Other
            && self.last == Some(kind)
            && !self.past.is_empty();
        if coalesce {
            debug!("Coalescing {:?} into the previous entry", kind);
        } else {
            self.past.push_back(before);
            while self.past.len() > self.config.depth {
                self.past.pop_front();
            }
        }
        self.last = Some(kind);
    }

    /// End the current typing burst
    pub fn break_burst(&mut self) {
        self.last = None;
    }

    /// Forget everything, e.g. when the document was replaced from outside
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.last = None;
    }

    pub fn undo(&mut self, state: &mut EditorState) -> Result<(), EditorError> {
        let entry = self.past.pop_back().ok_or(EditorError::NothingToUndo)?;
        self.future.push(Entry::of(state));
        restore(state, entry);
        self.last = None;
        debug!("Undo ({} left)", self.past.len());
        Ok(())
    }

    pub fn redo(&mut self, state: &mut EditorState) -> Result<(), EditorError> {
        let entry = self.future.pop().ok_or(EditorError::NothingToRedo)?;
        self.past.push_back(Entry::of(state));
        restore(state, entry);
        self.last = None;
        debug!("Redo ({} left)", self.future.len());
        Ok(())
    }
}

fn restore(state: &mut EditorState, entry: Entry) {
    state.doc = entry.doc;
    state.selection = entry.selection.clamp(state.doc.len());
    state.stored_marks = None;
}

#[cfg(test)]
mod tests {
    use super::{CoalescePolicy, EditKind, Entry, History, HistoryConfig};
    use crate::error::EditorError;
    use crate::model::{Block, Doc, Selection, Text};
    use crate::state::EditorState;

    fn state(text: &str) -> EditorState {
        let mut state = EditorState::new(Doc::new(vec![Block::paragraph(vec![Text::plain(text)])]));
        state.selection = Selection::cursor(text.chars().count());
        state
    }

    fn edit(history: &mut History, state: &mut EditorState, text: &str, kind: EditKind) {
        history.record(Entry::of(state), kind);
        *state = self::state(text);
    }

    #[test]
    fn test_empty() {
        let mut history = History::default();
        let mut s = state("a");
        assert_eq!(history.undo(&mut s), Err(EditorError::NothingToUndo));
        assert_eq!(history.redo(&mut s), Err(EditorError::NothingToRedo));
        assert_eq!(s, state("a"));
    }

    #[test]
    fn test_typing_coalesces() {
        let mut history = History::default();
        let mut s = state("");
        edit(&mut history, &mut s, "a", EditKind::Typing);
        edit(&mut history, &mut s, "ab", EditKind::Typing);
        edit(&mut history, &mut s, "ab.", EditKind::Other);
        edit(&mut history, &mut s, "ab.c", EditKind::Typing);
        history.break_burst();
        edit(&mut history, &mut s, "ab.cd", EditKind::Typing);
        assert_eq!(history.undo_depth(), 4);

        history.undo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "ab.c");
        history.undo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "ab.");
        history.undo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "ab");
        history.undo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "");
        assert!(!history.can_undo());

        history.redo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "ab");
        assert_eq!(s.selection, Selection::cursor(2));
    }

    #[test]
    fn test_no_coalescing() {
        let mut history = History::new(HistoryConfig {
            coalesce: CoalescePolicy::Never,
            ..HistoryConfig::default()
        });
        let mut s = state("");
        edit(&mut history, &mut s, "a", EditKind::Typing);
        edit(&mut history, &mut s, "ab", EditKind::Typing);
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_record_clears_future() {
        let mut history = History::default();
        let mut s = state("");
        edit(&mut history, &mut s, "a", EditKind::Other);
        history.undo(&mut s).unwrap();
        assert!(history.can_redo());
        edit(&mut history, &mut s, "b", EditKind::Other);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_bound() {
        let mut history = History::new(HistoryConfig {
            depth: 2,
            ..HistoryConfig::default()
        });
        let mut s = state("");
        for text in &["a", "b", "c"] {
            edit(&mut history, &mut s, text, EditKind::Other);
        }
        assert_eq!(history.undo_depth(), 2);
        history.undo(&mut s).unwrap();
        history.undo(&mut s).unwrap();
        assert_eq!(s.doc.text(), "a");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("never".parse::<CoalescePolicy>().ok(), Some(CoalescePolicy::Never));
        assert!("sometimes".parse::<CoalescePolicy>().is_err());
    }
}
