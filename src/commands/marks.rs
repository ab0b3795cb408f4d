//! Mark toggles and links
use crate::error::EditorError;
use crate::model::ops::Coverage;
use crate::model::{Mark, MarkKind, Selection};
use crate::state::EditorState;

/// Whether `kind` is active at the selection
pub(super) fn mark_active(state: &EditorState, kind: MarkKind) -> bool {
    let sel = state.selection;
    if sel.is_collapsed() {
        state.input_marks().has_kind(kind)
    } else {
        state.doc.coverage(sel.from(), sel.to(), |m| m.has_kind(kind)) == Coverage::Full
    }
}

/// Remove the mark if it covers the whole selection, otherwise apply it everywhere.
/// On a collapsed selection only the stored marks change.
pub(super) fn toggle_mark(state: &mut EditorState, mark: Mark) -> Result<(), EditorError> {
    let kind = mark.kind();
    let sel = state.selection;
    if sel.is_collapsed() {
        let mut marks = state.input_marks();
        if marks.has_kind(kind) {
            marks.remove_kind(kind);
        } else {
            marks.add(mark);
        }
        state.stored_marks = Some(marks);
        return Ok(());
    }
    if mark_active(state, kind) {
        state.doc.remove_mark(sel, kind)?;
    } else {
        state.doc.add_mark(sel, &mark)?;
    }
    Ok(())
}

/// The selection widened to any link it starts or ends in. A cursor takes
/// the whole link next to it.
pub(super) fn link_range(state: &EditorState) -> Selection {
    let sel = state.selection;
    if sel.is_collapsed() {
        return match state.doc.mark_range(sel.head, MarkKind::Link) {
            Some((start, end, _)) => Selection::new(start, end),
            None => sel,
        };
    }
    let (mut from, mut to) = (sel.from(), sel.to());
    if let Some((start, _, _)) = state.doc.mark_range_after(from, MarkKind::Link) {
        from = from.min(start);
    }
    if let Some((_, end, _)) = state.doc.mark_range_before(to, MarkKind::Link) {
        to = to.max(end);
    }
    Selection::new(from, to)
}

pub(super) fn link_active(state: &EditorState) -> bool {
    let sel = state.selection;
    if sel.is_collapsed() {
        state.doc.mark_range(sel.head, MarkKind::Link).is_some()
    } else {
        mark_active(state, MarkKind::Link)
    }
}

pub(super) fn can_set_link(state: &EditorState) -> bool {
    !link_range(state).is_collapsed()
}

pub(super) fn can_unset_link(state: &EditorState) -> bool {
    let range = link_range(state);
    state
        .doc
        .coverage(range.from(), range.to(), |m| m.has_kind(MarkKind::Link))
        != Coverage::Absent
}

/// Link the selection, extended over any link it touches, to `href`
pub(super) fn set_link(state: &mut EditorState, href: &str) -> Result<(), EditorError> {
    let range = link_range(state);
    state.doc.add_mark(range, &Mark::link(href))?;
    state.selection = range;
    Ok(())
}

pub(super) fn unset_link(state: &mut EditorState) -> Result<(), EditorError> {
    let range = link_range(state);
    state.doc.remove_mark(range, MarkKind::Link)?;
    Ok(())
}
