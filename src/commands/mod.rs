//! # Editor commands
//!
//! Every command answers [`Command::can_apply`] without side effects and only
//! mutates in [`Command::apply`]. Commands run on a copy of the state, so a
//! command that fails halfway leaves nothing behind.
mod blocks;
mod marks;

use crate::error::EditorError;
use crate::history::{EditKind, Entry, History};
use crate::model::{ListKind, Mark, MAX_HEADING_LEVEL};
use crate::state::EditorState;
use displaydoc::Display;
use tracing::{trace, warn};

/// A user action on the editor
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Command {
    /// insert text
    InsertText(String),
    /// delete backward
    DeleteBackward,
    /// split block
    SplitBlock,
    /// toggle bold
    ToggleBold,
    /// toggle italic
    ToggleItalic,
    /// toggle heading {0}
    ToggleHeading(u8),
    /// toggle bullet list
    ToggleBulletList,
    /// toggle ordered list
    ToggleOrderedList,
    /// toggle blockquote
    ToggleBlockquote,
    /// set link {0}
    SetLink(String),
    /// unset link
    UnsetLink,
    /// undo
    Undo,
    /// redo
    Redo,
}

/// What a command changed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing, the command did not apply
    None,
    /// Only the selection or the stored marks
    Selection,
    /// The document
    Document,
}

impl Command {
    /// Whether the command would do anything in this state
    pub fn can_apply(&self, state: &EditorState, history: &History) -> bool {
        match self {
            Command::InsertText(text) => !text.is_empty(),
            Command::DeleteBackward => blocks::can_delete_backward(state),
            Command::SplitBlock
            | Command::ToggleBold
            | Command::ToggleItalic
            | Command::ToggleBulletList
            | Command::ToggleOrderedList
            | Command::ToggleBlockquote => true,
            Command::ToggleHeading(level) => (1..=MAX_HEADING_LEVEL).contains(level),
            Command::SetLink(href) if href.trim().is_empty() => marks::can_unset_link(state),
            Command::SetLink(_) => marks::can_set_link(state),
            Command::UnsetLink => marks::can_unset_link(state),
            Command::Undo => history.can_undo(),
            Command::Redo => history.can_redo(),
        }
    }

    /// Whether the mark or block type of this command is active at the selection
    pub fn is_active(&self, state: &EditorState) -> bool {
        match self {
            Command::ToggleBold => marks::mark_active(state, Mark::Bold.kind()),
            Command::ToggleItalic => marks::mark_active(state, Mark::Italic.kind()),
            Command::ToggleHeading(level) => blocks::heading_active(state, *level),
            Command::ToggleBulletList => blocks::list_active(state, ListKind::Bullet),
            Command::ToggleOrderedList => blocks::list_active(state, ListKind::Ordered),
            Command::ToggleBlockquote => blocks::blockquote_active(state),
            Command::SetLink(_) | Command::UnsetLink => marks::link_active(state),
            _ => false,
        }
    }

    fn edit_kind(&self) -> EditKind {
        match self {
            Command::InsertText(text) if !text.contains('\n') => EditKind::Typing,
            Command::DeleteBackward => EditKind::Deleting,
            _ => EditKind::Other,
        }
    }

    fn run(&self, state: &mut EditorState) -> Result<(), EditorError> {
        match self {
            Command::InsertText(text) => {
                let marks = state.input_marks();
                state.stored_marks = None;
                state.selection = state.doc.insert_text(state.selection, text, &marks)?;
                Ok(())
            }
            Command::DeleteBackward => blocks::delete_backward(state),
            Command::SplitBlock => blocks::split_block(state),
            Command::ToggleBold => marks::toggle_mark(state, Mark::Bold),
            Command::ToggleItalic => marks::toggle_mark(state, Mark::Italic),
            Command::ToggleHeading(level) => blocks::toggle_heading(state, *level),
            Command::ToggleBulletList => blocks::toggle_list(state, ListKind::Bullet),
            Command::ToggleOrderedList => blocks::toggle_list(state, ListKind::Ordered),
            Command::ToggleBlockquote => blocks::toggle_blockquote(state),
            Command::SetLink(href) if href.trim().is_empty() => marks::unset_link(state),
            Command::SetLink(href) => marks::set_link(state, href.trim()),
            Command::UnsetLink => marks::unset_link(state),
            Command::Undo | Command::Redo => Ok(()),
        }
    }

    /// Apply the command. Does nothing unless [`Command::can_apply`] holds.
    pub fn apply(&self, state: &mut EditorState, history: &mut History) -> Effect {
        if !self.can_apply(state, history) {
            trace!("Skipping {}: not applicable", self);
            return Effect::None;
        }
        let result = match self {
            Command::Undo => history.undo(state),
            Command::Redo => history.redo(state),
            _ => return self.apply_edit(state, history),
        };
        match result {
            Ok(()) => Effect::Document,
            Err(err) => {
                warn!("{} failed: {}", self, err);
                Effect::None
            }
        }
    }

    fn apply_edit(&self, state: &mut EditorState, history: &mut History) -> Effect {
        let mut next = state.clone();
        if let Err(err) = self.run(&mut next) {
            warn!("{} not applied: {}", self, err);
            return Effect::None;
        }
        next.clamp_selection();
        if next.doc != state.doc {
            trace!("{} changed the document", self);
            if self.edit_kind() != EditKind::Typing {
                next.stored_marks = None;
            }
            history.record(Entry::of(state), self.edit_kind());
            *state = next;
            Effect::Document
        } else if next != *state {
            history.break_burst();
            *state = next;
            Effect::Selection
        } else {
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, Effect};
    use crate::history::History;
    use crate::markup::{deserialize, serialize};
    use crate::model::Selection;
    use crate::state::EditorState;

    fn state(html: &str, from: usize, to: usize) -> EditorState {
        let mut state = EditorState::new(deserialize(html).unwrap().doc);
        state.select(Selection::new(from, to));
        state
    }

    fn run(state: &mut EditorState, history: &mut History, cmd: Command) -> Effect {
        cmd.apply(state, history)
    }

    fn html(state: &EditorState) -> String {
        serialize(&state.doc)
    }

    #[test]
    fn test_toggle_bold_partial_to_full() {
        let mut h = History::default();
        let mut s = state("<p><strong>ab</strong>cd</p>", 0, 4);
        assert!(!Command::ToggleBold.is_active(&s));
        assert_eq!(run(&mut s, &mut h, Command::ToggleBold), Effect::Document);
        assert_eq!(html(&s), "<p><strong>abcd</strong></p>");
        assert!(Command::ToggleBold.is_active(&s));
        run(&mut s, &mut h, Command::ToggleBold);
        assert_eq!(html(&s), "<p>abcd</p>");
        assert_eq!(s.selection, Selection::new(0, 4));
    }

    #[test]
    fn test_stored_marks() {
        let mut h = History::default();
        let mut s = state("<p>ab</p>", 2, 2);
        assert_eq!(run(&mut s, &mut h, Command::ToggleBold), Effect::Selection);
        assert_eq!(html(&s), "<p>ab</p>");
        assert!(Command::ToggleBold.is_active(&s));
        run(&mut s, &mut h, Command::InsertText("c".into()));
        run(&mut s, &mut h, Command::InsertText("d".into()));
        assert_eq!(html(&s), "<p>ab<strong>cd</strong></p>");
        assert_eq!(s.stored_marks, None);
    }

    #[test]
    fn test_heading_switch() {
        let mut h = History::default();
        let mut s = state("<p>t</p>", 0, 0);
        run(&mut s, &mut h, Command::ToggleHeading(1));
        assert_eq!(html(&s), "<h1>t</h1>");
        run(&mut s, &mut h, Command::ToggleHeading(2));
        assert_eq!(html(&s), "<h2>t</h2>");
        assert!(Command::ToggleHeading(2).is_active(&s));
        assert!(!Command::ToggleHeading(1).is_active(&s));
        run(&mut s, &mut h, Command::ToggleHeading(2));
        assert_eq!(html(&s), "<p>t</p>");

        assert!(!Command::ToggleHeading(0).can_apply(&s, &h));
        assert!(!Command::ToggleHeading(4).can_apply(&s, &h));
        assert_eq!(run(&mut s, &mut h, Command::ToggleHeading(4)), Effect::None);
    }

    #[test]
    fn test_lists() {
        let mut h = History::default();
        let mut s = state("<p>a</p><p>b</p>", 0, 3);
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(html(&s), "<ul><li><p>a</p></li><li><p>b</p></li></ul>");
        assert!(Command::ToggleBulletList.is_active(&s));
        assert!(!Command::ToggleOrderedList.is_active(&s));

        run(&mut s, &mut h, Command::ToggleOrderedList);
        assert_eq!(html(&s), "<ol><li><p>a</p></li><li><p>b</p></li></ol>");
        run(&mut s, &mut h, Command::ToggleOrderedList);
        assert_eq!(html(&s), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_lift_single_item() {
        let mut h = History::default();
        let mut s = state("<ul><li><p>a</p></li><li><p>b</p></li><li><p>c</p></li></ul>", 2, 2);
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(
            html(&s),
            "<ul><li><p>a</p></li></ul><p>b</p><ul><li><p>c</p></li></ul>"
        );
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(
            html(&s),
            "<ul><li><p>a</p></li><li><p>b</p></li><li><p>c</p></li></ul>"
        );
    }

    #[test]
    fn test_blockquote() {
        let mut h = History::default();
        let mut s = state("<p>a</p><ul><li><p>b</p></li></ul>", 2, 2);
        run(&mut s, &mut h, Command::ToggleBlockquote);
        assert_eq!(
            html(&s),
            "<p>a</p><ul><li><blockquote><p>b</p></blockquote></li></ul>"
        );
        assert!(Command::ToggleBlockquote.is_active(&s));
        assert!(Command::ToggleBulletList.is_active(&s));
        run(&mut s, &mut h, Command::ToggleBlockquote);
        assert_eq!(html(&s), "<p>a</p><ul><li><p>b</p></li></ul>");
    }

    #[test]
    fn test_link_extension() {
        let mut h = History::default();
        let mut s = state("<p><a href=\"http://a\">hello</a> world</p>", 0, 11);
        assert!(Command::SetLink("http://b".into()).can_apply(&s, &h));
        run(&mut s, &mut h, Command::SetLink("http://b".into()));
        assert_eq!(html(&s), "<p><a href=\"http://b\">hello world</a></p>");

        let mut s = state("<p><a href=\"http://a\">hello</a> world</p>", 2, 2);
        run(&mut s, &mut h, Command::SetLink("http://c".into()));
        assert_eq!(html(&s), "<p><a href=\"http://c\">hello</a> world</p>");
        assert_eq!(s.selection, Selection::new(0, 5));
    }

    #[test]
    fn test_link_next_to_selection_is_kept() {
        let mut h = History::default();
        let mut s = state("<p>ab<a href=\"http://y\">cd</a></p>", 0, 2);
        run(&mut s, &mut h, Command::SetLink("http://x".into()));
        assert_eq!(
            html(&s),
            "<p><a href=\"http://x\">ab</a><a href=\"http://y\">cd</a></p>"
        );

        let mut s = state("<p><a href=\"http://y\">ab</a>cd</p>", 2, 4);
        run(&mut s, &mut h, Command::SetLink("http://x".into()));
        assert_eq!(
            html(&s),
            "<p><a href=\"http://y\">ab</a><a href=\"http://x\">cd</a></p>"
        );

        let mut s = state("<p>ab<a href=\"http://y\">cd</a></p>", 0, 3);
        run(&mut s, &mut h, Command::SetLink("http://x".into()));
        assert_eq!(html(&s), "<p><a href=\"http://x\">abcd</a></p>");
    }

    #[test]
    fn test_list_over_mixed_blocks() {
        let mut h = History::default();
        let mut s = state("<p>a</p><ul><li><p>b</p></li></ul>", 0, 3);
        assert!(!Command::ToggleBulletList.is_active(&s));
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(html(&s), "<ul><li><p>a</p></li><li><p>b</p></li></ul>");
        assert!(Command::ToggleBulletList.is_active(&s));
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(html(&s), "<p>a</p><p>b</p>");
        run(&mut s, &mut h, Command::ToggleBulletList);
        assert_eq!(html(&s), "<ul><li><p>a</p></li><li><p>b</p></li></ul>");

        let mut s = state("<p>a</p><ul><li><p>b</p></li></ul>", 0, 3);
        run(&mut s, &mut h, Command::ToggleOrderedList);
        assert_eq!(html(&s), "<ol><li><p>a</p></li><li><p>b</p></li></ol>");
        assert!(Command::ToggleOrderedList.is_active(&s));
        assert!(!Command::ToggleBulletList.is_active(&s));
        run(&mut s, &mut h, Command::ToggleOrderedList);
        assert_eq!(html(&s), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_unset_link() {
        let h = History::default();
        let s = state("<p><a href=\"http://a\">hello</a> world</p>", 8, 8);
        assert!(!Command::UnsetLink.can_apply(&s, &h));
        assert!(!Command::SetLink("http://b".into()).can_apply(&s, &h));
        assert!(!Command::SetLink("http://b".into()).is_active(&s));

        let mut h = History::default();
        let mut s = state("<p><a href=\"http://a\">hello</a> world</p>", 2, 2);
        assert!(Command::UnsetLink.is_active(&s));
        assert!(Command::UnsetLink.can_apply(&s, &h));
        run(&mut s, &mut h, Command::SetLink(String::new()));
        assert_eq!(html(&s), "<p>hello world</p>");
    }

    #[test]
    fn test_delete_backward() {
        let mut h = History::default();
        let mut s = state("<p>ab</p><p>cd</p>", 3, 3);
        run(&mut s, &mut h, Command::DeleteBackward);
        assert_eq!(html(&s), "<p>abcd</p>");
        assert_eq!(s.selection, Selection::cursor(2));

        let s = state("<p>ab</p>", 0, 0);
        assert!(!Command::DeleteBackward.can_apply(&s, &h));

        let mut s = state("<ul><li><p>a</p></li></ul>", 0, 0);
        assert!(Command::DeleteBackward.can_apply(&s, &h));
        run(&mut s, &mut h, Command::DeleteBackward);
        assert_eq!(html(&s), "<p>a</p>");
    }

    #[test]
    fn test_split_block() {
        let mut h = History::default();
        let mut s = state("<p>ab</p>", 1, 1);
        run(&mut s, &mut h, Command::SplitBlock);
        assert_eq!(html(&s), "<p>a</p><p>b</p>");
        assert_eq!(s.selection, Selection::cursor(2));

        let mut s = state("<ul><li><p>a</p></li></ul>", 1, 1);
        run(&mut s, &mut h, Command::SplitBlock);
        assert_eq!(html(&s), "<ul><li><p>a</p></li><li><p></p></li></ul>");
        run(&mut s, &mut h, Command::SplitBlock);
        assert_eq!(html(&s), "<ul><li><p>a</p></li></ul><p></p>");
    }

    #[test]
    fn test_inapplicable_is_noop() {
        let mut h = History::default();
        let mut s = state("<p>ab</p>", 1, 1);
        let before = s.clone();
        assert_eq!(run(&mut s, &mut h, Command::Undo), Effect::None);
        assert_eq!(run(&mut s, &mut h, Command::UnsetLink), Effect::None);
        assert_eq!(run(&mut s, &mut h, Command::InsertText(String::new())), Effect::None);
        assert_eq!(s, before);
        assert!(!h.can_undo());
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut h = History::default();
        let mut s = state("<p>ab</p>", 0, 2);
        run(&mut s, &mut h, Command::ToggleItalic);
        s.select(Selection::cursor(1));
        assert_eq!(run(&mut s, &mut h, Command::Undo), Effect::Document);
        assert_eq!(html(&s), "<p>ab</p>");
        assert_eq!(s.selection, Selection::new(0, 2));
        assert_eq!(run(&mut s, &mut h, Command::Redo), Effect::Document);
        assert_eq!(html(&s), "<p><em>ab</em></p>");
        assert_eq!(s.selection, Selection::cursor(1));
    }
}
