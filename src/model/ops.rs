//! # Mutation primitives
//!
//! Every primitive validates its positions first and fails with
//! [`EditorError::InvalidRange`] without touching the document. After a
//! structural change the document is normalized: empty runs are dropped,
//! equal neighbours merged, empty containers removed and adjacent lists of the
//! same kind joined.
use super::position::Container;
use super::{
    Block, Doc, Inline, ListItem, ListKind, Mark, MarkKind, MarkSet, OrderedListAttrs,
    Selection, Text, TextblockKind, MAX_HEADING_LEVEL,
};
use crate::error::EditorError;

type Result<T> = std::result::Result<T, EditorError>;

/// A container a range of blocks can be wrapped in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Wrapper {
    Blockquote,
    List(ListKind),
}

/// How much of a range carries some mark
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coverage {
    Absent,
    Partial,
    Full,
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

/// Make sure a run boundary falls on `offset` and return the index of the
/// first run starting there
pub(crate) fn split_runs(runs: &mut Inline, offset: usize) -> usize {
    let mut acc = 0;
    for i in 0..runs.len() {
        if offset == acc {
            return i;
        }
        let len = runs[i].len();
        if offset < acc + len {
            let at = byte_index(&runs[i].text, offset - acc);
            let tail = runs[i].text.split_off(at);
            let marks = runs[i].marks.clone();
            runs.insert(i + 1, Text::marked(tail, marks));
            return i + 1;
        }
        acc += len;
    }
    runs.len()
}

/// Copy of the runs between two offsets
pub(crate) fn slice_runs(runs: &[Text], from: usize, to: usize) -> Inline {
    let mut copy = runs.to_vec();
    let end = split_runs(&mut copy, to);
    copy.truncate(end);
    let start = split_runs(&mut copy, from);
    copy.drain(..start);
    copy
}

pub(crate) fn normalize_runs(runs: &mut Inline) {
    let mut merged: Inline = Vec::with_capacity(runs.len());
    for run in runs.drain(..).filter(|t| !t.is_empty()) {
        match merged.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    *runs = merged;
}

/// The marks text inserted at `offset` picks up.
///
/// Inside a run these are the run's marks. At a boundary they are the marks
/// of the run before (or after, at the start of the block), minus the
/// non-inclusive marks that do not continue on the other side.
pub fn marks_at(runs: &[Text], offset: usize) -> MarkSet {
    let mut acc = 0;
    let mut before = None;
    let mut after = None;
    for run in runs.iter().filter(|r| !r.is_empty()) {
        let len = run.len();
        if offset > acc && offset < acc + len {
            return run.marks.clone();
        }
        if acc + len == offset {
            before = Some(run);
        }
        if acc == offset && after.is_none() {
            after = Some(run);
        }
        acc += len;
    }
    let (main, other) = match (before, after) {
        (Some(before), after) => (before, after),
        (None, Some(after)) => (after, None),
        (None, None) => return MarkSet::new(),
    };
    main.marks
        .iter()
        .filter(|m| m.is_inclusive() || other.map_or(false, |o| o.marks.contains(m)))
        .cloned()
        .collect()
}

fn normalize_blocks(blocks: &mut Vec<Block>) {
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph { content } => normalize_runs(content),
            Block::Heading { attrs, content } => {
                attrs.level = attrs.level.max(1).min(MAX_HEADING_LEVEL);
                normalize_runs(content);
            }
            Block::Blockquote { content } => normalize_blocks(content),
            Block::BulletList { content } | Block::OrderedList { content, .. } => {
                for item in content.iter_mut() {
                    normalize_blocks(&mut item.content);
                }
                content.retain(|item| !item.content.is_empty());
            }
        }
    }
    blocks.retain(|block| match block {
        Block::Blockquote { content } => !content.is_empty(),
        Block::BulletList { content } | Block::OrderedList { content, .. } => !content.is_empty(),
        _ => true,
    });

    let mut joined: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks.drain(..) {
        if let Some(prev) = joined.last_mut() {
            if prev.list_kind().is_some() && prev.list_kind() == block.list_kind() {
                if let Some(items) = list_items_mut(prev) {
                    items.extend(block.into_items());
                }
                continue;
            }
        }
        joined.push(block);
    }
    *blocks = joined;
}

fn list_items_mut(block: &mut Block) -> Option<&mut Vec<ListItem>> {
    match block {
        Block::BulletList { content } | Block::OrderedList { content, .. } => Some(content),
        _ => None,
    }
}

/// Replace the children `start..=end` by their unwrapped contents, keeping
/// the rest wrapped on either side
fn split_around<T, W, U>(
    mut children: Vec<T>,
    start: usize,
    end: usize,
    wrap: W,
    mut unwrap: U,
) -> Vec<Block>
where
    W: Fn(Vec<T>) -> Block,
    U: FnMut(T) -> Vec<Block>,
{
    let after = children.split_off(end + 1);
    let middle = children.split_off(start);
    let before = children;

    let mut out = Vec::new();
    if !before.is_empty() {
        out.push(wrap(before));
    }
    for child in middle {
        out.extend(unwrap(child));
    }
    if !after.is_empty() {
        out.push(wrap(after));
    }
    out
}

fn insert_all(blocks: &mut Vec<Block>, index: usize, new: Vec<Block>) {
    for (i, block) in new.into_iter().enumerate() {
        blocks.insert(index + i, block);
    }
}

impl Doc {
    pub fn normalize(&mut self) {
        normalize_blocks(&mut self.content);
        if self.content.is_empty() {
            self.content.push(Block::paragraph(vec![]));
        }
    }

    fn invalid(&self, pos: usize) -> EditorError {
        EditorError::InvalidRange {
            pos,
            len: self.len(),
        }
    }

    /// The marks text typed at `pos` would carry
    pub fn marks_at(&self, pos: usize) -> Result<MarkSet> {
        let (tb, offset) = self.resolve(pos)?;
        Ok(self
            .inline_at(&tb.path)
            .map(|runs| marks_at(runs, offset))
            .unwrap_or_default())
    }

    /// Insert text at the selection, replacing the selected range.
    /// A `\n` splits the block.
    pub fn insert_text(
        &mut self,
        sel: Selection,
        text: &str,
        marks: &MarkSet,
    ) -> Result<Selection> {
        self.check(sel)?;
        let mut pos = self.delete_range(sel)?.head;
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                pos = self.split_block(pos)?.head;
            }
            if segment.is_empty() {
                continue;
            }
            let (tb, offset) = self.resolve(pos)?;
            if let Some(inline) = self.inline_at_mut(&tb.path) {
                let at = split_runs(inline, offset);
                inline.insert(at, Text::marked(segment, marks.clone()));
                normalize_runs(inline);
            }
            pos += segment.chars().count();
        }
        Ok(Selection::cursor(pos))
    }

    /// Delete the selected range, joining the first and last textblock when
    /// the range crosses block boundaries
    pub fn delete_range(&mut self, sel: Selection) -> Result<Selection> {
        self.check(sel)?;
        let (from, to) = (sel.from(), sel.to());
        if from == to {
            return Ok(Selection::cursor(from));
        }
        let (first, from_offset) = self.resolve(from)?;
        let (last, to_offset) = self.resolve(to)?;

        if first.path == last.path {
            if let Some(inline) = self.inline_at_mut(&first.path) {
                let start = split_runs(inline, from_offset);
                let end = split_runs(inline, to_offset);
                inline.drain(start..end);
                normalize_runs(inline);
            }
            return Ok(Selection::cursor(from));
        }

        let tail = self
            .inline_at(&last.path)
            .map(|runs| slice_runs(runs, to_offset, last.len))
            .unwrap_or_default();
        let doomed: Vec<_> = self
            .textblocks()
            .into_iter()
            .filter(|tb| tb.start > first.start && tb.start <= last.start)
            .collect();
        if let Some(inline) = self.inline_at_mut(&first.path) {
            let start = split_runs(inline, from_offset);
            inline.truncate(start);
            inline.extend(tail);
            normalize_runs(inline);
        }
        for tb in doomed.iter().rev() {
            self.remove_block(&tb.path);
        }
        self.normalize();
        Ok(Selection::cursor(from))
    }

    pub(crate) fn remove_block(&mut self, path: &[usize]) -> Option<Block> {
        let (&index, parent) = path.split_last()?;
        let blocks = self.blocks_mut(parent)?;
        if index < blocks.len() {
            Some(blocks.remove(index))
        } else {
            None
        }
    }

    /// Split the textblock at `pos`. Inside a list item this starts a new
    /// item; an empty item is lifted out of its list instead.
    pub fn split_block(&mut self, pos: usize) -> Result<Selection> {
        let (tb, offset) = self.resolve(pos)?;
        let err = self.invalid(pos);
        let (&index, parent) = tb.path.split_last().ok_or_else(|| err.clone())?;

        if tb.in_list_item() && tb.len == 0 && self.child_count(parent) == Some(1) {
            self.lift_list_items(pos, pos)?;
            return Ok(Selection::cursor(pos));
        }

        let inline = self.inline_at_mut(&tb.path).ok_or_else(|| err.clone())?;
        let at = split_runs(inline, offset);
        let tail = inline.split_off(at);
        normalize_runs(inline);

        let kind = match tb.kind {
            TextblockKind::Heading(_) if offset == tb.len => TextblockKind::Paragraph,
            kind => kind,
        };
        let block = Block::textblock(kind, tail);

        if tb.in_list_item() {
            let (&item_index, list) = parent.split_last().ok_or_else(|| err.clone())?;
            let rest = self
                .blocks_mut(parent)
                .ok_or_else(|| err.clone())?
                .split_off(index + 1);
            let mut content = vec![block];
            content.extend(rest);
            self.items_mut(list)
                .ok_or(err)?
                .insert(item_index + 1, ListItem::new(content));
        } else {
            self.blocks_mut(parent)
                .ok_or(err)?
                .insert(index + 1, block);
        }
        Ok(Selection::cursor(pos + 1))
    }

    fn update_marks<F>(&mut self, sel: Selection, mut update: F) -> Result<Selection>
    where
        F: FnMut(&mut MarkSet),
    {
        self.check(sel)?;
        let (from, to) = (sel.from(), sel.to());
        for tb in self.textblocks_between(from, to) {
            let a = from.saturating_sub(tb.start).min(tb.len);
            let b = to.saturating_sub(tb.start).min(tb.len);
            if a >= b {
                continue;
            }
            if let Some(inline) = self.inline_at_mut(&tb.path) {
                let start = split_runs(inline, a);
                let end = split_runs(inline, b);
                for run in &mut inline[start..end] {
                    update(&mut run.marks);
                }
                normalize_runs(inline);
            }
        }
        Ok(sel)
    }

    /// Put `mark` on all text in the range, replacing marks of the same kind
    pub fn add_mark(&mut self, sel: Selection, mark: &Mark) -> Result<Selection> {
        self.update_marks(sel, |marks| marks.add(mark.clone()))
    }

    pub fn remove_mark(&mut self, sel: Selection, kind: MarkKind) -> Result<Selection> {
        self.update_marks(sel, |marks| marks.remove_kind(kind))
    }

    /// How much of the text in `from..to` satisfies `pred`
    pub fn coverage<P>(&self, from: usize, to: usize, pred: P) -> Coverage
    where
        P: Fn(&MarkSet) -> bool,
    {
        let (mut with, mut without) = (0, 0);
        for tb in self.textblocks_between(from, to) {
            let a = from.saturating_sub(tb.start).min(tb.len);
            let b = to.saturating_sub(tb.start).min(tb.len);
            if a >= b {
                continue;
            }
            let runs = match self.inline_at(&tb.path) {
                Some(runs) => slice_runs(runs, a, b),
                None => continue,
            };
            for run in runs {
                if pred(&run.marks) {
                    with += run.len();
                } else {
                    without += run.len();
                }
            }
        }
        match (with, without) {
            (0, _) => Coverage::Absent,
            (_, 0) => Coverage::Full,
            _ => Coverage::Partial,
        }
    }

    /// The contiguous range around `pos` carrying the same mark of `kind`.
    ///
    /// The character after `pos` is checked first, then the one before it, so a
    /// cursor right at the end of a link still finds it.
    pub fn mark_range(&self, pos: usize, kind: MarkKind) -> Option<(usize, usize, Mark)> {
        self.mark_range_after(pos, kind).or_else(|| self.mark_range_before(pos, kind))
    }

    /// The extent of the mark on the character right after `pos`
    pub fn mark_range_after(&self, pos: usize, kind: MarkKind) -> Option<(usize, usize, Mark)> {
        self.mark_span(pos, kind, |s, e, offset| s <= offset && offset < e)
    }

    /// The extent of the mark on the character right before `pos`
    pub fn mark_range_before(&self, pos: usize, kind: MarkKind) -> Option<(usize, usize, Mark)> {
        self.mark_span(pos, kind, |s, e, offset| s < offset && offset <= e)
    }

    fn mark_span<F>(&self, pos: usize, kind: MarkKind, hit: F) -> Option<(usize, usize, Mark)>
    where
        F: Fn(usize, usize, usize) -> bool,
    {
        let (tb, offset) = self.resolve(pos).ok()?;
        let runs = self.inline_at(&tb.path)?;
        let mut spans = Vec::with_capacity(runs.len());
        let mut acc = 0;
        for run in runs {
            spans.push((acc, acc + run.len(), run));
            acc += run.len();
        }
        let index = spans
            .iter()
            .position(|(s, e, r)| hit(*s, *e, offset) && r.marks.has_kind(kind))?;
        let mark = spans[index].2.marks.get(kind)?.clone();
        let mut first = index;
        while first > 0 && spans[first - 1].2.marks.contains(&mark) {
            first -= 1;
        }
        let mut last = index;
        while last + 1 < spans.len() && spans[last + 1].2.marks.contains(&mark) {
            last += 1;
        }
        Some((tb.start + spans[first].0, tb.start + spans[last].1, mark))
    }

    /// Change the type of every textblock touched by the range
    pub fn set_textblock_kind(&mut self, sel: Selection, kind: TextblockKind) -> Result<Selection> {
        self.check(sel)?;
        for tb in self.textblocks_between(sel.from(), sel.to()) {
            if let Some(block) = self.block_at_mut(&tb.path) {
                block.set_textblock_kind(kind);
            }
        }
        Ok(sel)
    }

    /// Wrap the sibling blocks covering the range. Lists get one item per
    /// block, and the items of lists in the range are taken over as they are.
    pub fn wrap(&mut self, sel: Selection, wrapper: Wrapper) -> Result<Selection> {
        self.check(sel)?;
        let range = self.block_range(sel.from(), sel.to())?;
        let err = self.invalid(sel.from());
        let blocks = self.blocks_mut(&range.parent).ok_or(err)?;
        let inner: Vec<Block> = blocks.drain(range.start..=range.end).collect();
        let wrapped = match wrapper {
            Wrapper::Blockquote => Block::Blockquote { content: inner },
            Wrapper::List(kind) => {
                let mut items = Vec::with_capacity(inner.len());
                for block in inner {
                    match block {
                        Block::BulletList { content } | Block::OrderedList { content, .. } => {
                            items.extend(content)
                        }
                        other => items.push(ListItem::new(vec![other])),
                    }
                }
                Block::list(kind, items)
            }
        };
        blocks.insert(range.start, wrapped);
        self.normalize();
        Ok(sel)
    }

    /// Lift the range out of its innermost common blockquote, splitting the
    /// quote around it. Returns `false` if there is no such blockquote.
    pub fn lift_blockquote(&mut self, sel: Selection) -> Result<bool> {
        self.check(sel)?;
        let (from, to) = (sel.from(), sel.to());
        let quote = match self.common_ancestor(from, to, |c| c == Container::Blockquote) {
            Some(path) => path,
            None => return Ok(false),
        };
        let (first, _) = self.resolve(from)?;
        let (last, _) = self.resolve(to)?;
        let depth = quote.len();
        let (start, end) = (first.path[depth], last.path[depth]);

        let err = self.invalid(from);
        let (&index, parent) = quote.split_last().ok_or_else(|| err.clone())?;
        let blocks = self.blocks_mut(parent).ok_or(err)?;
        let children = match blocks.remove(index) {
            Block::Blockquote { content } => content,
            other => {
                blocks.insert(index, other);
                return Ok(false);
            }
        };
        let lifted = split_around(
            children,
            start,
            end,
            |content| Block::Blockquote { content },
            |block| vec![block],
        );
        insert_all(blocks, index, lifted);
        self.normalize();
        Ok(true)
    }

    /// Lift the selected items out of their innermost common list, turning
    /// them back into plain blocks. Returns `false` if there is no such list.
    pub fn lift_list_items(&mut self, from: usize, to: usize) -> Result<bool> {
        let list = match self.common_ancestor(from, to, |c| matches!(c, Container::List(_))) {
            Some(path) => path,
            None => return Ok(false),
        };
        let (first, _) = self.resolve(from)?;
        let (last, _) = self.resolve(to)?;
        let depth = list.len();
        let (start, end) = (first.path[depth], last.path[depth]);

        let err = self.invalid(from);
        let (&index, parent) = list.split_last().ok_or_else(|| err.clone())?;
        let blocks = self.blocks_mut(parent).ok_or(err)?;
        let (kind, attrs, items) = match blocks.remove(index) {
            Block::BulletList { content } => {
                (ListKind::Bullet, OrderedListAttrs::default(), content)
            }
            Block::OrderedList { attrs, content } => (ListKind::Ordered, attrs, content),
            other => {
                blocks.insert(index, other);
                return Ok(false);
            }
        };
        let lifted = split_around(
            items,
            start,
            end,
            |content| match kind {
                ListKind::Bullet => Block::BulletList { content },
                ListKind::Ordered => Block::OrderedList { attrs, content },
            },
            |item| item.content,
        );
        insert_all(blocks, index, lifted);
        self.normalize();
        Ok(true)
    }

    /// Change the kind of the list at `path`, keeping its items
    pub fn set_list_kind(&mut self, path: &[usize], kind: ListKind) -> Result<()> {
        let err = self.invalid(0);
        let block = self.block_at_mut(path).ok_or(err)?;
        block.set_list_kind(kind);
        self.normalize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{marks_at, slice_runs, Coverage, Wrapper};
    use crate::error::EditorError;
    use crate::model::{Block, Doc, ListItem, ListKind, Mark, MarkKind, MarkSet, Selection, Text};

    fn p(text: &str) -> Block {
        Block::paragraph(vec![Text::plain(text)])
    }

    fn bold() -> MarkSet {
        MarkSet::new().with(Mark::Bold)
    }

    fn link(href: &str) -> MarkSet {
        MarkSet::new().with(Mark::link(href))
    }

    #[test]
    fn test_insert_and_merge() {
        let mut doc = Doc::empty();
        let sel = doc
            .insert_text(Selection::cursor(0), "Hello", &MarkSet::new())
            .unwrap();
        assert_eq!(sel, Selection::cursor(5));
        let sel = doc.insert_text(sel, " world", &MarkSet::new()).unwrap();
        assert_eq!(sel, Selection::cursor(11));
        assert_eq!(doc, Doc::new(vec![p("Hello world")]));
    }

    #[test]
    fn test_insert_newline_splits() {
        let mut doc = Doc::empty();
        let sel = doc
            .insert_text(Selection::cursor(0), "one\ntwo", &MarkSet::new())
            .unwrap();
        assert_eq!(doc, Doc::new(vec![p("one"), p("two")]));
        assert_eq!(sel, Selection::cursor(7));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut doc = Doc::new(vec![p("abc")]);
        let before = doc.clone();
        assert_eq!(
            doc.delete_range(Selection::new(1, 9)),
            Err(EditorError::InvalidRange { pos: 9, len: 3 })
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_delete_joins_blocks() {
        let mut doc = Doc::new(vec![
            p("abc"),
            Block::Blockquote {
                content: vec![p("def")],
            },
            p("ghi"),
        ]);
        let sel = doc.delete_range(Selection::new(2, 9)).unwrap();
        assert_eq!(sel, Selection::cursor(2));
        assert_eq!(doc, Doc::new(vec![p("abhi")]));
    }

    #[test]
    fn test_split_heading_at_end() {
        let mut doc = Doc::new(vec![Block::heading(1, vec![Text::plain("Title")])]);
        let sel = doc.split_block(5).unwrap();
        assert_eq!(sel, Selection::cursor(6));
        assert_eq!(
            doc,
            Doc::new(vec![
                Block::heading(1, vec![Text::plain("Title")]),
                Block::paragraph(vec![]),
            ])
        );
    }

    #[test]
    fn test_split_list_item() {
        let mut doc = Doc::new(vec![Block::list(
            ListKind::Bullet,
            vec![ListItem::new(vec![p("abcd")])],
        )]);
        doc.split_block(2).unwrap();
        assert_eq!(
            doc,
            Doc::new(vec![Block::list(
                ListKind::Bullet,
                vec![ListItem::new(vec![p("ab")]), ListItem::new(vec![p("cd")])],
            )])
        );
        // enter on an empty trailing item leaves the list
        doc.split_block(5).unwrap();
        doc.split_block(6).unwrap();
        assert_eq!(
            doc,
            Doc::new(vec![
                Block::list(
                    ListKind::Bullet,
                    vec![ListItem::new(vec![p("ab")]), ListItem::new(vec![p("cd")])],
                ),
                Block::paragraph(vec![]),
            ])
        );
    }

    #[test]
    fn test_marks() {
        let mut doc = Doc::new(vec![p("hello world")]);
        doc.add_mark(Selection::new(0, 5), &Mark::Bold).unwrap();
        assert_eq!(
            doc.content[0],
            Block::paragraph(vec![
                Text::marked("hello", bold()),
                Text::plain(" world"),
            ])
        );
        let is_bold = |m: &MarkSet| m.has_kind(MarkKind::Bold);
        assert_eq!(doc.coverage(0, 5, is_bold), Coverage::Full);
        assert_eq!(doc.coverage(0, 11, is_bold), Coverage::Partial);
        assert_eq!(doc.coverage(6, 11, is_bold), Coverage::Absent);

        doc.remove_mark(Selection::new(0, 11), MarkKind::Bold).unwrap();
        assert_eq!(doc, Doc::new(vec![p("hello world")]));
    }

    #[test]
    fn test_marks_at_boundaries() {
        let runs = vec![
            Text::marked("ab", link("http://a")),
            Text::marked("cd", bold()),
        ];
        assert_eq!(marks_at(&runs, 1), link("http://a"));
        // links are not inclusive
        assert_eq!(marks_at(&runs, 2), MarkSet::new());
        assert_eq!(marks_at(&runs, 4), bold());
        assert_eq!(marks_at(&runs, 0), MarkSet::new());
        assert_eq!(marks_at(&[], 0), MarkSet::new());
        assert_eq!(slice_runs(&runs, 1, 3), vec![
            Text::marked("b", link("http://a")),
            Text::marked("c", bold()),
        ]);
    }

    #[test]
    fn test_mark_range() {
        let doc = Doc::new(vec![Block::paragraph(vec![
            Text::plain("x"),
            Text::marked("hello", link("http://a")),
            Text::marked("!", link("http://a").with(Mark::Bold)),
            Text::plain(" world"),
        ])]);
        let (from, to, mark) = doc.mark_range(3, MarkKind::Link).unwrap();
        assert_eq!((from, to), (1, 7));
        assert_eq!(mark, Mark::link("http://a"));
        assert!(doc.mark_range(7, MarkKind::Link).is_some());
        assert!(doc.mark_range(9, MarkKind::Link).is_none());

        assert_eq!(doc.mark_range_after(1, MarkKind::Link).map(|r| r.1), Some(7));
        assert!(doc.mark_range_before(1, MarkKind::Link).is_none());
        assert!(doc.mark_range_after(7, MarkKind::Link).is_none());
        assert_eq!(doc.mark_range_before(7, MarkKind::Link).map(|r| r.0), Some(1));
    }

    #[test]
    fn test_wrap_and_lift_blockquote() {
        let original = Doc::new(vec![p("a"), p("b"), p("c")]);
        let mut doc = original.clone();
        doc.wrap(Selection::new(2, 2), Wrapper::Blockquote).unwrap();
        assert_eq!(
            doc,
            Doc::new(vec![
                p("a"),
                Block::Blockquote {
                    content: vec![p("b")]
                },
                p("c"),
            ])
        );
        assert!(doc.lift_blockquote(Selection::cursor(2)).unwrap());
        assert_eq!(doc, original);
        assert!(!doc.lift_blockquote(Selection::cursor(2)).unwrap());
    }

    #[test]
    fn test_lift_splits_list() {
        let items = vec![
            ListItem::new(vec![p("a")]),
            ListItem::new(vec![p("b")]),
            ListItem::new(vec![p("c")]),
        ];
        let mut doc = Doc::new(vec![Block::list(ListKind::Ordered, items)]);
        assert!(doc.lift_list_items(2, 2).unwrap());
        assert_eq!(
            doc,
            Doc::new(vec![
                Block::list(ListKind::Ordered, vec![ListItem::new(vec![p("a")])]),
                p("b"),
                Block::list(ListKind::Ordered, vec![ListItem::new(vec![p("c")])]),
            ])
        );
        // wrapping it again joins the lists back into one
        doc.wrap(Selection::cursor(2), Wrapper::List(ListKind::Ordered))
            .unwrap();
        assert_eq!(doc.content.len(), 1);
        assert_eq!(doc.text(), "a\nb\nc");
    }

    #[test]
    fn test_wrap_takes_over_list_items() {
        let quoted = Block::Blockquote {
            content: vec![Block::list(ListKind::Bullet, vec![ListItem::new(vec![p("c")])])],
        };
        let mut doc = Doc::new(vec![
            p("a"),
            Block::list(ListKind::Bullet, vec![ListItem::new(vec![p("b")])]),
            quoted.clone(),
        ]);
        doc.wrap(Selection::new(0, 5), Wrapper::List(ListKind::Ordered))
            .unwrap();
        assert_eq!(
            doc,
            Doc::new(vec![Block::list(
                ListKind::Ordered,
                vec![
                    ListItem::new(vec![p("a")]),
                    ListItem::new(vec![p("b")]),
                    ListItem::new(vec![quoted]),
                ]
            )])
        );
    }

    #[test]
    fn test_normalize_drops_empty_containers() {
        let doc = Doc::new(vec![
            Block::BulletList { content: vec![] },
            Block::Blockquote {
                content: vec![Block::list(ListKind::Bullet, vec![ListItem::default()])],
            },
        ]);
        assert_eq!(doc, Doc::empty());
    }
}
