//! # The editor
//!
//! [`Editor`] is what a host form talks to. It owns the document, the history
//! and the sync state, runs commands, reports changes through the `on_change`
//! listener and answers the toolbar queries.
use crate::commands::{Command, Effect};
use crate::config::EditorConfig;
use crate::error::{EditorError, Notice};
use crate::history::History;
use crate::markup::{deserialize, serialize};
use crate::model::{Doc, Mark, MarkKind, Selection};
use crate::state::EditorState;
use crate::sync::{Reconcile, SyncController};
use crate::toolbar::{button, Toolbar, ToolbarItem};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    history: History,
    sync: SyncController,
    disabled: bool,
    placeholder: Option<String>,
    notices: Vec<Notice>,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new(&EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Editor {
            state: EditorState::default(),
            history: History::new(config.history()),
            sync: SyncController::default(),
            disabled: false,
            placeholder: config.placeholder.clone(),
            notices: Vec::new(),
        }
    }

    /// Seed the document from content. Unreadable content leaves an empty document.
    pub fn initialize(&mut self, content: &str) {
        self.history.clear();
        match deserialize(content) {
            Ok(parsed) => {
                if !parsed.unsupported.is_empty() {
                    self.notice(Notice::FormattingDropped);
                }
                self.state = EditorState::new(parsed.doc);
            }
            Err(err) => {
                info!("Starting with an empty document: {}", err);
                self.notice_for(&err);
                self.state = EditorState::new(Doc::empty());
            }
        }
    }

    /// Register the listener for local changes
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.sync.set_listener(Box::new(listener));
    }

    /// Content pushed by the host. Echoes of the current document are ignored.
    pub fn set_external_content(&mut self, content: &str) -> Reconcile {
        let outcome = self
            .sync
            .reconcile(&mut self.state, &mut self.history, content);
        match &outcome {
            Reconcile::Echo => {}
            Reconcile::Replaced { unsupported } => {
                if !unsupported.is_empty() {
                    self.notice(Notice::FormattingDropped);
                }
            }
            Reconcile::Rejected(err) => self.notice_for(err),
        }
        outcome
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        debug!("Editor {}", if disabled { "disabled" } else { "enabled" });
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Run a command; `true` if it changed the document or the selection
    pub fn exec(&mut self, command: Command) -> bool {
        if self.disabled {
            debug!("Ignoring {} while disabled", command);
            return false;
        }
        match command.apply(&mut self.state, &mut self.history) {
            Effect::Document => {
                self.sync.emit(&self.state);
                true
            }
            Effect::Selection => true,
            Effect::None => false,
        }
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        self.exec(Command::InsertText(text.to_owned()))
    }

    /// Move the selection. This ends a typing burst in the history.
    pub fn set_selection(&mut self, selection: Selection) {
        let len = self.state.doc.len();
        if selection.anchor > len || selection.head > len {
            let err = EditorError::InvalidRange {
                pos: selection.anchor.max(selection.head),
                len,
            };
            warn!("Clamping selection: {}", err);
        }
        self.state.select(selection);
        self.history.break_burst();
    }

    pub fn select_all(&mut self) {
        self.set_selection(Selection::new(0, self.state.doc.len()));
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Doc {
        &self.state.doc
    }

    /// The current content, as the listener would receive it
    pub fn html(&self) -> String {
        serialize(&self.state.doc)
    }

    pub fn text(&self) -> String {
        self.state.doc.text()
    }

    /// The document as ProseMirror JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.state.doc)
    }

    pub fn toolbar(&self) -> Toolbar {
        Toolbar::project(&self.state, &self.history, self.disabled)
    }

    pub fn is_active(&self, item: ToolbarItem) -> bool {
        button(item, &self.state, &self.history, self.disabled).active
    }

    pub fn is_enabled(&self, item: ToolbarItem) -> bool {
        button(item, &self.state, &self.history, self.disabled).enabled
    }

    /// The target of the link at the selection
    pub fn link_href(&self) -> Option<String> {
        let (_, _, mark) = self
            .state
            .doc
            .mark_range(self.state.selection.from(), MarkKind::Link)?;
        match mark {
            Mark::Link { attrs } => Some(attrs.href),
            _ => None,
        }
    }

    /// The placeholder to show, while the document is empty
    pub fn placeholder(&self) -> Option<&str> {
        if self.state.doc.is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    /// Whether there is no visible text at all
    pub fn is_blank(&self) -> bool {
        self.state.doc.text().trim().is_empty()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notice(&mut self, notice: Notice) {
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    fn notice_for(&mut self, err: &EditorError) {
        if let Some(notice) = err.notice() {
            self.notice(notice);
        }
    }
}
