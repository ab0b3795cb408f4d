//! # Portable markup
//!
//! The content string the host stores is a small dialect of HTML: `p`, `h1`-`h3`,
//! `ul`/`ol`/`li`, `blockquote`, `strong`, `em` and `a href`. The serializer is
//! deterministic and the deserializer never fails on anything it can recover
//! text from.
pub mod de;
pub mod ser;

pub use de::{deserialize, Parsed};
pub use ser::serialize;

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize};
    use crate::model::{Block, Doc, ListItem, ListKind, Mark, MarkSet, Text};

    fn roundtrip(doc: &Doc) {
        let html = serialize(doc);
        let parsed = deserialize(&html).unwrap();
        assert_eq!(&parsed.doc, doc, "structure of {}", html);
        assert!(parsed.unsupported.is_empty());
        assert_eq!(serialize(&parsed.doc), html);
    }

    #[test]
    fn test_roundtrip_blocks() {
        roundtrip(&Doc::empty());
        roundtrip(&Doc::new(vec![
            Block::heading(1, vec![Text::plain("Notes")]),
            Block::paragraph(vec![Text::plain("  two  spaces & <angles>  ")]),
            Block::Blockquote {
                content: vec![
                    Block::heading(3, vec![Text::plain("quoted")]),
                    Block::list(
                        ListKind::Ordered,
                        vec![ListItem::new(vec![
                            Block::paragraph(vec![Text::plain("first")]),
                            Block::list(
                                ListKind::Bullet,
                                vec![ListItem::new(vec![Block::paragraph(vec![])])],
                            ),
                        ])],
                    ),
                ],
            },
            Block::paragraph(vec![]),
        ]));
    }

    #[test]
    fn test_roundtrip_marks() {
        let link = MarkSet::new().with(Mark::link("http://a?x=1&y=\"2\""));
        roundtrip(&Doc::new(vec![Block::paragraph(vec![
            Text::marked("bold ", MarkSet::new().with(Mark::Bold)),
            Text::marked("both", MarkSet::new().with(Mark::Bold).with(Mark::Italic)),
            Text::marked(" linked", link.clone()),
            Text::marked(" all", link.with(Mark::Bold).with(Mark::Italic)),
            Text::plain(" — ünïcödé"),
        ])]));
    }
}
