//! # Content synchronization
//!
//! The host owns a content string, the editor owns a live document. Local
//! edits flow out through [`SyncController::emit`]; content pushed in goes
//! through [`SyncController::reconcile`], which ignores anything equal to the
//! serialization of the current document.
use crate::error::EditorError;
use crate::history::History;
use crate::markup::{deserialize, serialize};
use crate::state::EditorState;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

/// A callback receiving serialized content
pub type Listener = Box<dyn FnMut(&str)>;

/// The outcome of pushing content into the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconcile {
    /// The content matches the document; nothing changed
    Echo,
    /// The document was replaced
    Replaced {
        /// Tags that could not be represented
        unsupported: BTreeSet<String>,
    },
    /// The content could not be read; the document was kept
    Rejected(EditorError),
}

#[derive(Default)]
pub struct SyncController {
    listener: Option<Listener>,
    last_emitted: Option<String>,
}

impl fmt::Debug for SyncController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncController")
            .field("listener", &self.listener.is_some())
            .field("last_emitted", &self.last_emitted)
            .finish()
    }
}

impl SyncController {
    pub fn set_listener(&mut self, listener: Listener) {
        self.listener = Some(listener);
    }

    /// The last content sent to the listener
    pub fn last_emitted(&self) -> Option<&str> {
        self.last_emitted.as_deref()
    }

    /// Serialize the document and hand it to the listener, once
    pub fn emit(&mut self, state: &EditorState) -> String {
        let content = serialize(&state.doc);
        if let Some(listener) = &mut self.listener {
            listener(&content);
        }
        self.last_emitted = Some(content.clone());
        content
    }

    /// Take content from the host, replacing the document unless it is an echo.
    /// Never emits.
    pub fn reconcile(
        &mut self,
        state: &mut EditorState,
        history: &mut History,
        incoming: &str,
    ) -> Reconcile {
        if serialize(&state.doc) == incoming {
            debug!("Ignoring echo of the current content");
            return Reconcile::Echo;
        }
        match deserialize(incoming) {
            Ok(parsed) => {
                debug!("Replacing the document from external content");
                *state = EditorState::new(parsed.doc);
                history.clear();
                Reconcile::Replaced {
                    unsupported: parsed.unsupported,
                }
            }
            Err(err) => {
                warn!("Keeping the current document: {}", err);
                Reconcile::Rejected(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Reconcile, SyncController};
    use crate::history::History;
    use crate::markup::serialize;
    use crate::model::Selection;
    use crate::state::EditorState;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sync = SyncController::default();
        let sink = seen.clone();
        sync.set_listener(Box::new(move |s: &str| sink.borrow_mut().push(s.to_owned())));
        let state = EditorState::default();
        assert_eq!(sync.emit(&state), "<p></p>");
        assert_eq!(*seen.borrow(), vec!["<p></p>".to_owned()]);
        assert_eq!(sync.last_emitted(), Some("<p></p>"));
    }

    #[test]
    fn test_echo_is_ignored() {
        let mut sync = SyncController::default();
        let mut history = History::default();
        let mut state = EditorState::default();
        sync.reconcile(&mut state, &mut history, "<p>abc</p>");
        state.select(Selection::cursor(2));
        let content = serialize(&state.doc);
        assert_eq!(
            sync.reconcile(&mut state, &mut history, &content),
            Reconcile::Echo
        );
        assert_eq!(state.selection, Selection::cursor(2));
    }

    #[test]
    fn test_replace_resets() {
        let mut sync = SyncController::default();
        let mut history = History::default();
        let mut state = EditorState::default();
        sync.reconcile(&mut state, &mut history, "<p>abc</p>");
        state.select(Selection::cursor(3));
        let outcome = sync.reconcile(&mut state, &mut history, "<p>x</p><table></table>");
        match outcome {
            Reconcile::Replaced { unsupported } => assert!(unsupported.contains("table")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(serialize(&state.doc), "<p>x</p>");
        assert_eq!(state.selection, Selection::cursor(0));
    }

    #[test]
    fn test_rejected_keeps_document() {
        let mut sync = SyncController::default();
        let mut history = History::default();
        let mut state = EditorState::default();
        sync.reconcile(&mut state, &mut history, "<p>abc</p>");
        let outcome = sync.reconcile(&mut state, &mut history, "<a href='");
        assert!(matches!(outcome, Reconcile::Rejected(_)));
        assert_eq!(serialize(&state.doc), "<p>abc</p>");
    }
}
