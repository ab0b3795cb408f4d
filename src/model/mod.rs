//! # The document model
//!
//! This module is derived from the ProseMirror basic schema (paragraph, heading,
//! blockquote, bullet/ordered lists, bold/italic/link marks) and the general JSON
//! serialization of nodes. The tree is typed so that list items can only ever
//! appear inside a list and headings never contain other blocks.
pub mod ops;
pub mod position;

pub use position::{BlockRange, Container, Selection, TextblockInfo};

use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;

/// The deepest heading level the editor offers
pub const MAX_HEADING_LEVEL: u8 = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct HeadingAttrs {
    pub level: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct OrderedListAttrs {
    #[serde(default = "default_order")]
    pub order: usize,
}

fn default_order() -> usize {
    1
}

impl Default for OrderedListAttrs {
    fn default() -> Self {
        Self { order: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct LinkAttrs {
    pub href: String,
}

/// A non-structural annotation on a run of text.
///
/// The variant order is the nesting order used by the serializer: links wrap
/// bold, bold wraps italic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    Link { attrs: LinkAttrs },
    Bold,
    Italic,
}

/// The kind of a mark, ignoring its attributes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Link,
    Bold,
    Italic,
}

impl Mark {
    pub fn link<S: Into<String>>(href: S) -> Self {
        Mark::Link {
            attrs: LinkAttrs { href: href.into() },
        }
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Link { .. } => MarkKind::Link,
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
        }
    }

    /// Whether text typed directly after this mark continues it
    pub fn is_inclusive(&self) -> bool {
        !matches!(self, Mark::Link { .. })
    }
}

/// A set of marks, at most one per [`MarkKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MarkSet(BTreeSet<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.contains(mark)
    }

    pub fn has_kind(&self, kind: MarkKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: MarkKind) -> Option<&Mark> {
        self.0.iter().find(|m| m.kind() == kind)
    }

    /// Add a mark, replacing any mark of the same kind (a run has one link at most)
    pub fn add(&mut self, mark: Mark) {
        self.remove_kind(mark.kind());
        self.0.insert(mark);
    }

    pub fn remove_kind(&mut self, kind: MarkKind) {
        self.0.retain(|m| m.kind() != kind);
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.add(mark);
        self
    }

    /// Iterate in nesting order (outermost first)
    pub fn iter(&self) -> btree_set::Iter<'_, Mark> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = btree_set::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::iter::FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.add(mark);
        }
        set
    }
}

/// A run of text carrying a set of marks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename = "text")]
pub struct Text {
    pub text: String,
    #[serde(default, skip_serializing_if = "MarkSet::is_empty")]
    pub marks: MarkSet,
}

impl Text {
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Text {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    pub fn marked<S: Into<String>>(text: S, marks: MarkSet) -> Self {
        Text {
            text: text.into(),
            marks,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub type Inline = Vec<Text>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        content: Inline,
    },
    Heading {
        attrs: HeadingAttrs,
        #[serde(default)]
        content: Inline,
    },
    Blockquote {
        #[serde(default)]
        content: Vec<Block>,
    },
    BulletList {
        #[serde(default)]
        content: Vec<ListItem>,
    },
    OrderedList {
        #[serde(default)]
        attrs: OrderedListAttrs,
        #[serde(default)]
        content: Vec<ListItem>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename = "list_item")]
pub struct ListItem {
    #[serde(default)]
    pub content: Vec<Block>,
}

/// The type of a block holding inline content
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextblockKind {
    Paragraph,
    Heading(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Ordered,
}

impl Block {
    pub fn paragraph(content: Inline) -> Self {
        Block::Paragraph { content }
    }

    pub fn heading(level: u8, content: Inline) -> Self {
        Block::Heading {
            attrs: HeadingAttrs { level },
            content,
        }
    }

    pub fn textblock(kind: TextblockKind, content: Inline) -> Self {
        match kind {
            TextblockKind::Paragraph => Block::paragraph(content),
            TextblockKind::Heading(level) => Block::heading(level, content),
        }
    }

    pub fn list(kind: ListKind, content: Vec<ListItem>) -> Self {
        match kind {
            ListKind::Bullet => Block::BulletList { content },
            ListKind::Ordered => Block::OrderedList {
                attrs: OrderedListAttrs::default(),
                content,
            },
        }
    }

    pub fn textblock_kind(&self) -> Option<TextblockKind> {
        match self {
            Block::Paragraph { .. } => Some(TextblockKind::Paragraph),
            Block::Heading { attrs, .. } => Some(TextblockKind::Heading(attrs.level)),
            _ => None,
        }
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Block::BulletList { .. } => Some(ListKind::Bullet),
            Block::OrderedList { .. } => Some(ListKind::Ordered),
            _ => None,
        }
    }

    pub fn inline(&self) -> Option<&Inline> {
        match self {
            Block::Paragraph { content } | Block::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn inline_mut(&mut self) -> Option<&mut Inline> {
        match self {
            Block::Paragraph { content } | Block::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Turn a textblock into another textblock type, keeping its content
    pub(crate) fn set_textblock_kind(&mut self, kind: TextblockKind) {
        if let Some(content) = self.inline_mut() {
            let content = std::mem::take(content);
            *self = Block::textblock(kind, content);
        }
    }

    /// The items of a list, empty for any other block
    pub fn into_items(self) -> Vec<ListItem> {
        match self {
            Block::BulletList { content } | Block::OrderedList { content, .. } => content,
            _ => Vec::new(),
        }
    }

    pub(crate) fn set_list_kind(&mut self, kind: ListKind) {
        let items = match self {
            Block::BulletList { content } | Block::OrderedList { content, .. } => {
                std::mem::take(content)
            }
            _ => return,
        };
        *self = Block::list(kind, items);
    }
}

impl ListItem {
    pub fn new(content: Vec<Block>) -> Self {
        ListItem { content }
    }
}

/// The root of a document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Doc {
    #[serde(default)]
    pub content: Vec<Block>,
}

impl Default for Doc {
    fn default() -> Self {
        Doc::empty()
    }
}

impl Doc {
    /// A document with a single empty paragraph
    pub fn empty() -> Self {
        Doc {
            content: vec![Block::paragraph(vec![])],
        }
    }

    pub fn new(content: Vec<Block>) -> Self {
        let mut doc = Doc { content };
        doc.normalize();
        doc
    }

    /// Whether the document is a single empty paragraph
    pub fn is_empty(&self) -> bool {
        match self.content.as_slice() {
            [Block::Paragraph { content }] => content.iter().all(Text::is_empty),
            _ => false,
        }
    }

    /// The flattened text, textblocks separated by `\n`
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, tb) in self.textblocks().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if let Some(inline) = self.inline_at(&tb.path) {
                for run in inline {
                    out.push_str(&run.text);
                }
            }
        }
        out
    }

    /// All text runs in document order, with their marks
    pub fn runs(&self) -> Vec<&Text> {
        self.textblocks()
            .iter()
            .filter_map(|tb| self.inline_at(&tb.path))
            .flat_map(|inline| inline.iter())
            .collect()
    }
}
