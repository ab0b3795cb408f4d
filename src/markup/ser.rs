//! # Serializer
//!
//! One tag per block, one wrapping element per mark. Marks that continue from
//! one run to the next stay open, so a link spanning a bold word and plain text
//! is a single `<a>` element.
use crate::model::{Block, Doc, ListItem, Mark, Text};
use std::fmt::Write;

/// Serialize a document to markup
pub fn serialize(doc: &Doc) -> String {
    let mut out = String::new();
    for block in &doc.content {
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph { content } => {
            out.push_str("<p>");
            write_inline(out, content);
            out.push_str("</p>");
        }
        Block::Heading { attrs, content } => {
            let _ = write!(out, "<h{}>", attrs.level);
            write_inline(out, content);
            let _ = write!(out, "</h{}>", attrs.level);
        }
        Block::Blockquote { content } => {
            out.push_str("<blockquote>");
            for child in content {
                write_block(out, child);
            }
            out.push_str("</blockquote>");
        }
        Block::BulletList { content } => {
            out.push_str("<ul>");
            write_items(out, content);
            out.push_str("</ul>");
        }
        Block::OrderedList { attrs, content } => {
            if attrs.order == 1 {
                out.push_str("<ol>");
            } else {
                let _ = write!(out, "<ol start=\"{}\">", attrs.order);
            }
            write_items(out, content);
            out.push_str("</ol>");
        }
    }
}

fn write_items(out: &mut String, items: &[ListItem]) {
    for item in items {
        out.push_str("<li>");
        for child in &item.content {
            write_block(out, child);
        }
        out.push_str("</li>");
    }
}

fn write_inline(out: &mut String, runs: &[Text]) {
    let mut open: Vec<&Mark> = Vec::new();
    for run in runs {
        let marks: Vec<&Mark> = run.marks.iter().collect();
        let keep = open
            .iter()
            .zip(marks.iter())
            .take_while(|(a, b)| a == b)
            .count();
        while open.len() > keep {
            if let Some(mark) = open.pop() {
                close_mark(out, mark);
            }
        }
        for mark in &marks[keep..] {
            open_mark(out, mark);
            open.push(*mark);
        }
        escape_text(out, &run.text);
    }
    while let Some(mark) = open.pop() {
        close_mark(out, mark);
    }
}

fn open_mark(out: &mut String, mark: &Mark) {
    match mark {
        Mark::Link { attrs } => {
            out.push_str("<a href=\"");
            escape_attr(out, &attrs.href);
            out.push_str("\">");
        }
        Mark::Bold => out.push_str("<strong>"),
        Mark::Italic => out.push_str("<em>"),
    }
}

fn close_mark(out: &mut String, mark: &Mark) {
    match mark {
        Mark::Link { .. } => out.push_str("</a>"),
        Mark::Bold => out.push_str("</strong>"),
        Mark::Italic => out.push_str("</em>"),
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            c => escape_text(out, c.encode_utf8(&mut [0; 4])),
        }
    }
}
