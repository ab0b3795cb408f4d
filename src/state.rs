//! # Editor state
use crate::model::{Doc, MarkSet, Selection};

/// A document together with the user's selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Doc,
    pub selection: Selection,
    /// Marks toggled on a collapsed selection, applied to the next inserted text
    pub stored_marks: Option<MarkSet>,
}

impl EditorState {
    pub fn new(doc: Doc) -> Self {
        EditorState {
            doc,
            selection: Selection::default(),
            stored_marks: None,
        }
    }

    /// Set the selection, clamped into the document. Drops stored marks if the cursor moved.
    pub fn select(&mut self, selection: Selection) {
        let selection = selection.clamp(self.doc.len());
        if selection != self.selection {
            self.stored_marks = None;
        }
        self.selection = selection;
    }

    /// Re-clamp the selection after the document changed
    pub fn clamp_selection(&mut self) {
        self.selection = self.selection.clamp(self.doc.len());
    }

    /// The marks the next inserted text will carry
    pub fn input_marks(&self) -> MarkSet {
        match &self.stored_marks {
            Some(marks) => marks.clone(),
            None => self
                .doc
                .marks_at(self.selection.from())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditorState;
    use crate::model::{Block, Doc, Mark, MarkSet, Selection, Text};

    #[test]
    fn test_select_clamps() {
        let mut state = EditorState::new(Doc::new(vec![Block::paragraph(vec![Text::plain(
            "abc",
        )])]));
        state.stored_marks = Some(MarkSet::new().with(Mark::Bold));
        state.select(Selection::new(1, 10));
        assert_eq!(state.selection, Selection::new(1, 3));
        assert_eq!(state.stored_marks, None);
    }

    #[test]
    fn test_input_marks() {
        let bold = MarkSet::new().with(Mark::Bold);
        let mut state = EditorState::new(Doc::new(vec![Block::paragraph(vec![Text::marked(
            "abc",
            bold.clone(),
        )])]));
        state.select(Selection::cursor(3));
        assert_eq!(state.input_marks(), bold);
        state.stored_marks = Some(MarkSet::new());
        assert_eq!(state.input_marks(), MarkSet::new());
    }
}
