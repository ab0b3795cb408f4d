//! # Toolbar
//!
//! A read-only projection of the command state for rendering buttons.
use crate::commands::Command;
use crate::history::History;
use crate::state::EditorState;
use displaydoc::Display;
use std::fmt;

/// A toolbar button
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum ToolbarItem {
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// H{0}
    Heading(u8),
    /// Bullet list
    BulletList,
    /// Ordered list
    OrderedList,
    /// Quote
    Blockquote,
    /// Link
    Link,
    /// Undo
    Undo,
    /// Redo
    Redo,
}

impl ToolbarItem {
    /// All buttons, in display order
    pub const ALL: [ToolbarItem; 11] = [
        ToolbarItem::Bold,
        ToolbarItem::Italic,
        ToolbarItem::Heading(1),
        ToolbarItem::Heading(2),
        ToolbarItem::Heading(3),
        ToolbarItem::BulletList,
        ToolbarItem::OrderedList,
        ToolbarItem::Blockquote,
        ToolbarItem::Link,
        ToolbarItem::Undo,
        ToolbarItem::Redo,
    ];

    /// The command the button runs. The link button is checked as
    /// "unset link" when a link is active and as "set link" otherwise.
    pub fn command(self) -> Command {
        match self {
            ToolbarItem::Bold => Command::ToggleBold,
            ToolbarItem::Italic => Command::ToggleItalic,
            ToolbarItem::Heading(level) => Command::ToggleHeading(level),
            ToolbarItem::BulletList => Command::ToggleBulletList,
            ToolbarItem::OrderedList => Command::ToggleOrderedList,
            ToolbarItem::Blockquote => Command::ToggleBlockquote,
            ToolbarItem::Link => Command::SetLink(String::from("#")),
            ToolbarItem::Undo => Command::Undo,
            ToolbarItem::Redo => Command::Redo,
        }
    }
}

/// How one button is drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub item: ToolbarItem,
    pub active: bool,
    pub enabled: bool,
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.active, self.enabled) {
            (true, _) => write!(f, "[{}]", self.item),
            (false, true) => write!(f, "{}", self.item),
            (false, false) => write!(f, "({})", self.item),
        }
    }
}

/// The buttons for a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub buttons: Vec<ButtonState>,
}

impl Toolbar {
    pub fn project(state: &EditorState, history: &History, disabled: bool) -> Self {
        let buttons = ToolbarItem::ALL
            .iter()
            .map(|&item| button(item, state, history, disabled))
            .collect();
        Toolbar { buttons }
    }

    pub fn get(&self, item: ToolbarItem) -> Option<&ButtonState> {
        self.buttons.iter().find(|b| b.item == item)
    }
}

impl fmt::Display for Toolbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{}", button)?;
        }
        Ok(())
    }
}

pub(crate) fn button(
    item: ToolbarItem,
    state: &EditorState,
    history: &History,
    disabled: bool,
) -> ButtonState {
    let command = item.command();
    let active = command.is_active(state);
    let enabled = !disabled
        && match item {
            ToolbarItem::Link if active => Command::UnsetLink.can_apply(state, history),
            _ => command.can_apply(state, history),
        };
    ButtonState {
        item,
        active,
        enabled,
    }
}
