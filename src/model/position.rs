//! # Positions and selections
//!
//! A position is a running character offset into the flattened document: the
//! text of every textblock in document order, with one extra position between
//! two consecutive textblocks. The end of one block and the start of the next
//! are therefore distinct positions.
use super::{Block, Doc, Inline, ListItem, ListKind, TextblockKind};
use crate::error::EditorError;

/// An anchor/head pair of running offsets
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Selection { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Selection {
            anchor: pos,
            head: pos,
        }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Clamp both ends into `0..=len`
    pub fn clamp(self, len: usize) -> Self {
        Selection {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }
}

/// The kind of a node that contains blocks or list items
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Blockquote,
    List(ListKind),
    Item,
}

/// A textblock found while walking the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextblockInfo {
    /// Child indices from the root to this block
    pub path: Vec<usize>,
    /// `ancestors[k]` is the kind of the node at `path[..=k]`
    pub ancestors: Vec<Container>,
    pub kind: TextblockKind,
    /// Running offset of the first position inside this block
    pub start: usize,
    /// Length in characters
    pub len: usize,
}

impl TextblockInfo {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn parent(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Whether the direct parent of this textblock is a list item
    pub fn in_list_item(&self) -> bool {
        self.ancestors.last() == Some(&Container::Item)
    }
}

/// A run of sibling blocks `start..=end` inside the block container at `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub parent: Vec<usize>,
    pub start: usize,
    pub end: usize,
}

/// The children of a container, seen mutably
pub(crate) enum Children<'a> {
    Blocks(&'a mut Vec<Block>),
    Items(&'a mut Vec<ListItem>),
}

enum ChildrenRef<'a> {
    Blocks(&'a [Block]),
    Items(&'a [ListItem]),
}

fn blocks_at<'a>(blocks: &'a [Block], path: &[usize]) -> Option<ChildrenRef<'a>> {
    let (&first, rest) = match path.split_first() {
        Some(split) => split,
        None => return Some(ChildrenRef::Blocks(blocks)),
    };
    match blocks.get(first)? {
        Block::Blockquote { content } => blocks_at(content, rest),
        Block::BulletList { content } | Block::OrderedList { content, .. } => {
            items_at(content, rest)
        }
        _ => None,
    }
}

fn items_at<'a>(items: &'a [ListItem], path: &[usize]) -> Option<ChildrenRef<'a>> {
    let (&first, rest) = match path.split_first() {
        Some(split) => split,
        None => return Some(ChildrenRef::Items(items)),
    };
    blocks_at(&items.get(first)?.content, rest)
}

fn blocks_at_mut<'a>(blocks: &'a mut Vec<Block>, path: &[usize]) -> Option<Children<'a>> {
    let (&first, rest) = match path.split_first() {
        Some(split) => split,
        None => return Some(Children::Blocks(blocks)),
    };
    match blocks.get_mut(first)? {
        Block::Blockquote { content } => blocks_at_mut(content, rest),
        Block::BulletList { content } | Block::OrderedList { content, .. } => {
            items_at_mut(content, rest)
        }
        _ => None,
    }
}

fn items_at_mut<'a>(items: &'a mut Vec<ListItem>, path: &[usize]) -> Option<Children<'a>> {
    let (&first, rest) = match path.split_first() {
        Some(split) => split,
        None => return Some(Children::Items(items)),
    };
    blocks_at_mut(&mut items.get_mut(first)?.content, rest)
}

fn walk(
    blocks: &[Block],
    path: &mut Vec<usize>,
    ancestors: &mut Vec<Container>,
    offset: &mut usize,
    out: &mut Vec<TextblockInfo>,
) {
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        match block {
            Block::Paragraph { content } | Block::Heading { content, .. } => {
                if !out.is_empty() {
                    *offset += 1;
                }
                let len = content.iter().map(|t| t.len()).sum();
                out.push(TextblockInfo {
                    path: path.clone(),
                    ancestors: ancestors.clone(),
                    // both arms are textblocks
                    kind: block.textblock_kind().unwrap_or(TextblockKind::Paragraph),
                    start: *offset,
                    len,
                });
                *offset += len;
            }
            Block::Blockquote { content } => {
                ancestors.push(Container::Blockquote);
                walk(content, path, ancestors, offset, out);
                ancestors.pop();
            }
            Block::BulletList { content } | Block::OrderedList { content, .. } => {
                let kind = block.list_kind().unwrap_or(ListKind::Bullet);
                ancestors.push(Container::List(kind));
                for (j, item) in content.iter().enumerate() {
                    path.push(j);
                    ancestors.push(Container::Item);
                    walk(&item.content, path, ancestors, offset, out);
                    ancestors.pop();
                    path.pop();
                }
                ancestors.pop();
            }
        }
        path.pop();
    }
}

impl Doc {
    /// All textblocks in document order
    pub fn textblocks(&self) -> Vec<TextblockInfo> {
        let mut out = Vec::new();
        walk(
            &self.content,
            &mut Vec::new(),
            &mut Vec::new(),
            &mut 0,
            &mut out,
        );
        out
    }

    /// The largest valid position
    pub fn len(&self) -> usize {
        self.textblocks().last().map(TextblockInfo::end).unwrap_or(0)
    }

    /// Resolve a position to the index of its textblock and the offset inside it
    pub fn resolve(&self, pos: usize) -> Result<(TextblockInfo, usize), EditorError> {
        let len = self.len();
        self.textblocks()
            .into_iter()
            .find(|tb| pos <= tb.end())
            .map(|tb| {
                let offset = pos.saturating_sub(tb.start);
                (tb, offset)
            })
            .ok_or(EditorError::InvalidRange { pos, len })
    }

    /// Fail with `InvalidRange` unless both ends of the selection are in bounds
    pub fn check(&self, sel: Selection) -> Result<(), EditorError> {
        let len = self.len();
        for pos in [sel.anchor, sel.head].iter().copied() {
            if pos > len {
                return Err(EditorError::InvalidRange { pos, len });
            }
        }
        Ok(())
    }

    /// The textblocks touched by the range `from..=to`
    pub fn textblocks_between(&self, from: usize, to: usize) -> Vec<TextblockInfo> {
        self.textblocks()
            .into_iter()
            .filter(|tb| tb.end() >= from && tb.start <= to)
            .collect()
    }

    pub fn inline_at(&self, path: &[usize]) -> Option<&Inline> {
        self.block_at(path)?.inline()
    }

    pub fn block_at(&self, path: &[usize]) -> Option<&Block> {
        let (&last, parent) = path.split_last()?;
        match blocks_at(&self.content, parent)? {
            ChildrenRef::Blocks(blocks) => blocks.get(last),
            ChildrenRef::Items(_) => None,
        }
    }

    /// Number of children of the node at `path`
    pub fn child_count(&self, path: &[usize]) -> Option<usize> {
        match blocks_at(&self.content, path)? {
            ChildrenRef::Blocks(blocks) => Some(blocks.len()),
            ChildrenRef::Items(items) => Some(items.len()),
        }
    }

    pub(crate) fn block_at_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (&last, parent) = path.split_last()?;
        match self.children_mut(parent)? {
            Children::Blocks(blocks) => blocks.get_mut(last),
            Children::Items(_) => None,
        }
    }

    pub(crate) fn inline_at_mut(&mut self, path: &[usize]) -> Option<&mut Inline> {
        self.block_at_mut(path)?.inline_mut()
    }

    pub(crate) fn children_mut(&mut self, path: &[usize]) -> Option<Children<'_>> {
        blocks_at_mut(&mut self.content, path)
    }

    /// The block children of the container at `path` (the root, a blockquote or a list item)
    pub(crate) fn blocks_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Block>> {
        match self.children_mut(path)? {
            Children::Blocks(blocks) => Some(blocks),
            Children::Items(_) => None,
        }
    }

    pub(crate) fn items_mut(&mut self, path: &[usize]) -> Option<&mut Vec<ListItem>> {
        match self.children_mut(path)? {
            Children::Items(items) => Some(items),
            Children::Blocks(_) => None,
        }
    }

    /// The sibling blocks covering `from..=to`, inside a container that can hold blocks
    pub fn block_range(&self, from: usize, to: usize) -> Result<BlockRange, EditorError> {
        let (first, _) = self.resolve(from)?;
        let (last, _) = self.resolve(to)?;
        let common = common_prefix(&first.path, &last.path);
        let depth = common.min(first.path.len() - 1).min(last.path.len() - 1);
        let mut parent = first.path[..depth].to_vec();
        let mut start = first.path[depth];
        let mut end = last.path[depth];
        // siblings inside a list are items; widen to the whole list
        while depth_is_list(&first.ancestors, parent.len()) {
            let list = parent.pop().unwrap_or(0);
            start = list;
            end = list;
        }
        Ok(BlockRange { parent, start, end })
    }

    /// The deepest container of `kind` holding every textblock in `from..=to`,
    /// as the path to that container
    pub fn common_ancestor<F>(&self, from: usize, to: usize, mut pred: F) -> Option<Vec<usize>>
    where
        F: FnMut(Container) -> bool,
    {
        let (first, _) = self.resolve(from).ok()?;
        let (last, _) = self.resolve(to).ok()?;
        let common = common_prefix(&first.path, &last.path);
        // only proper ancestors of the textblocks
        let limit = common.min(first.path.len() - 1);
        (0..limit)
            .rev()
            .find(|&k| pred(first.ancestors[k]))
            .map(|k| first.path[..=k].to_vec())
    }
}

fn depth_is_list(ancestors: &[Container], len: usize) -> bool {
    len > 0 && matches!(ancestors.get(len - 1), Some(Container::List(_)))
}

fn common_prefix(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::{BlockRange, Container, Selection};
    use crate::error::EditorError;
    use crate::model::{Block, Doc, ListItem, ListKind, Text};

    fn p(text: &str) -> Block {
        Block::paragraph(vec![Text::plain(text)])
    }

    fn sample() -> Doc {
        Doc::new(vec![
            p("ab"),
            Block::BulletList {
                content: vec![
                    ListItem::new(vec![p("cd")]),
                    ListItem::new(vec![p("ef")]),
                ],
            },
            Block::Blockquote {
                content: vec![p("gh")],
            },
        ])
    }

    #[test]
    fn test_offsets() {
        let doc = sample();
        let starts: Vec<_> = doc.textblocks().iter().map(|tb| tb.start).collect();
        assert_eq!(starts, vec![0, 3, 6, 9]);
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.text().chars().count(), doc.len());

        let (tb, off) = doc.resolve(2).unwrap();
        assert_eq!((tb.path.clone(), off), (vec![0], 2));
        let (tb, off) = doc.resolve(3).unwrap();
        assert_eq!((tb.path.clone(), off), (vec![1, 0, 0], 0));
        assert_eq!(
            tb.ancestors,
            vec![Container::List(ListKind::Bullet), Container::Item]
        );
        assert_eq!(
            doc.resolve(12).unwrap_err(),
            EditorError::InvalidRange { pos: 12, len: 11 }
        );
    }

    #[test]
    fn test_block_range_widens_lists() {
        let doc = sample();
        assert_eq!(
            doc.block_range(4, 7).unwrap(),
            BlockRange {
                parent: vec![],
                start: 1,
                end: 1
            }
        );
        assert_eq!(
            doc.block_range(4, 4).unwrap(),
            BlockRange {
                parent: vec![1, 0],
                start: 0,
                end: 0
            }
        );
        assert_eq!(
            doc.block_range(0, 10).unwrap(),
            BlockRange {
                parent: vec![],
                start: 0,
                end: 2
            }
        );
    }

    #[test]
    fn test_common_ancestor() {
        let doc = sample();
        let is_list = |c| matches!(c, Container::List(_));
        assert_eq!(doc.common_ancestor(3, 7, is_list), Some(vec![1]));
        assert_eq!(doc.common_ancestor(0, 7, is_list), None);
        assert_eq!(
            doc.common_ancestor(9, 9, |c| c == Container::Blockquote),
            Some(vec![2])
        );
    }

    #[test]
    fn test_selection_clamp() {
        let sel = Selection::new(9, 2).clamp(4);
        assert_eq!(sel, Selection::new(4, 2));
        assert_eq!((sel.from(), sel.to()), (2, 4));
        assert!(!sel.is_collapsed());
    }
}
