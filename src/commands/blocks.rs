//! Block type toggles and the editing primitives
use crate::error::EditorError;
use crate::model::ops::Wrapper;
use crate::model::{Block, Container, ListKind, Selection, TextblockKind};
use crate::state::EditorState;

pub(super) fn heading_active(state: &EditorState, level: u8) -> bool {
    let sel = state.selection;
    let blocks = state.doc.textblocks_between(sel.from(), sel.to());
    !blocks.is_empty()
        && blocks
            .iter()
            .all(|tb| tb.kind == TextblockKind::Heading(level))
}

pub(super) fn toggle_heading(state: &mut EditorState, level: u8) -> Result<(), EditorError> {
    let kind = if heading_active(state, level) {
        TextblockKind::Paragraph
    } else {
        TextblockKind::Heading(level)
    };
    state.doc.set_textblock_kind(state.selection, kind)?;
    Ok(())
}

/// The innermost list holding the whole selection
fn enclosing_list(state: &EditorState) -> Option<(Vec<usize>, ListKind)> {
    let sel = state.selection;
    let path = state
        .doc
        .common_ancestor(sel.from(), sel.to(), |c| matches!(c, Container::List(_)))?;
    let kind = state.doc.block_at(&path).and_then(Block::list_kind)?;
    Some((path, kind))
}

pub(super) fn list_active(state: &EditorState, kind: ListKind) -> bool {
    matches!(enclosing_list(state), Some((_, k)) if k == kind)
}

/// Lift out of a list of this kind, convert a list of the other kind, or wrap
pub(super) fn toggle_list(state: &mut EditorState, kind: ListKind) -> Result<(), EditorError> {
    let sel = state.selection;
    match enclosing_list(state) {
        Some((_, k)) if k == kind => {
            state.doc.lift_list_items(sel.from(), sel.to())?;
        }
        Some((path, _)) => state.doc.set_list_kind(&path, kind)?,
        None => {
            state.doc.wrap(sel, Wrapper::List(kind))?;
        }
    }
    Ok(())
}

pub(super) fn blockquote_active(state: &EditorState) -> bool {
    let sel = state.selection;
    state
        .doc
        .common_ancestor(sel.from(), sel.to(), |c| c == Container::Blockquote)
        .is_some()
}

pub(super) fn toggle_blockquote(state: &mut EditorState) -> Result<(), EditorError> {
    let sel = state.selection;
    if !state.doc.lift_blockquote(sel)? {
        state.doc.wrap(sel, Wrapper::Blockquote)?;
    }
    Ok(())
}

/// Whether backspace at a collapsed cursor would lift its block instead of joining
fn lifts_at(state: &EditorState, pos: usize) -> Result<bool, EditorError> {
    let (tb, offset) = state.doc.resolve(pos)?;
    Ok(offset == 0 && tb.path.last() == Some(&0) && !tb.ancestors.is_empty())
}

pub(super) fn can_delete_backward(state: &EditorState) -> bool {
    let sel = state.selection;
    !sel.is_collapsed() || sel.head > 0 || lifts_at(state, sel.head).unwrap_or(false)
}

/// Backspace: delete the selection or the character before the cursor. At
/// the start of the first block in a list item or quote, lift that block out.
pub(super) fn delete_backward(state: &mut EditorState) -> Result<(), EditorError> {
    let sel = state.selection;
    if !sel.is_collapsed() {
        state.selection = state.doc.delete_range(sel)?;
        return Ok(());
    }
    let pos = sel.head;
    if lifts_at(state, pos)? {
        let (tb, _) = state.doc.resolve(pos)?;
        if tb.in_list_item() {
            state.doc.lift_list_items(pos, pos)?;
        } else {
            state.doc.lift_blockquote(sel)?;
        }
        return Ok(());
    }
    if pos > 0 {
        state.selection = state.doc.delete_range(Selection::new(pos - 1, pos))?;
    }
    Ok(())
}

/// Enter: replace the selection and split the block at the cursor
pub(super) fn split_block(state: &mut EditorState) -> Result<(), EditorError> {
    let pos = state.doc.delete_range(state.selection)?.head;
    state.selection = state.doc.split_block(pos)?;
    Ok(())
}
