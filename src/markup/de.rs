//! # Deserializer
//!
//! A forgiving tokenizer followed by a small tree builder. Unknown inline tags
//! are dropped and their text kept, unknown block tags end the current
//! paragraph, heading levels 4-6 become level 3 and the contents of
//! script-like elements are discarded. Every unsupported tag name is reported
//! in [`Parsed::unsupported`].
use crate::error::EditorError;
use crate::model::{
    Block, Doc, Inline, ListItem, ListKind, Mark, MarkSet, OrderedListAttrs, Text, TextblockKind,
    MAX_HEADING_LEVEL,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Elements whose content is never parsed as markup
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title", "xmp", "noembed", "noframes"];

/// Elements dropped together with everything inside them
const DROPPED: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "noembed", "noframes", "head", "template",
    "noscript", "iframe", "object", "svg", "math", "select",
];

/// Tags that are ignored without a notice
const TRANSPARENT: &[&str] = &["html", "body", "span", "meta", "link", "base"];

/// Unknown tags that still separate paragraphs
const BLOCKISH: &[&str] = &[
    "div", "section", "article", "aside", "header", "footer", "main", "nav", "pre", "table",
    "thead", "tbody", "tfoot", "tr", "td", "th", "dl", "dt", "dd", "figure", "figcaption",
    "address", "hr", "details", "summary", "caption",
];

/// The result of reading markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub doc: Doc,
    /// Names of the tags that were dropped or mapped to something else
    pub unsupported: BTreeSet<String>,
}

impl Parsed {
    pub fn warnings(&self) -> Vec<EditorError> {
        self.unsupported
            .iter()
            .cloned()
            .map(EditorError::UnsupportedMarkup)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(String),
}

struct Tokens {
    tokens: Vec<Token>,
    /// Input ended inside a tag or comment
    truncated: bool,
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            std::char::from_u32(code)
        }
    }
}

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/' || b == b'='
}

/// Parse a start tag at the beginning of `s`; returns the token and the
/// number of bytes consumed, or `None` if the input ends inside the tag
fn parse_start_tag(s: &str) -> Option<(Token, usize)> {
    let bytes = s.as_bytes();
    let mut i = 1;
    while i < bytes.len() && !is_name_end(bytes[i]) {
        i += 1;
    }
    let name = s[1..i].to_ascii_lowercase();
    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                let token = Token::Start {
                    name,
                    attrs,
                    self_closing: false,
                };
                return Some((token, i + 1));
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                let token = Token::Start {
                    name,
                    attrs,
                    self_closing: true,
                };
                return Some((token, i + 2));
            }
            b'/' | b'=' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let start = i;
        while i < bytes.len() && !is_name_end(bytes[i]) {
            i += 1;
        }
        let attr = s[start..i].to_ascii_lowercase();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match *bytes.get(i)? {
                quote @ b'"' | quote @ b'\'' => {
                    let len = s[i + 1..].find(quote as char)?;
                    value = decode_entities(&s[i + 1..i + 1 + len]);
                    i += len + 2;
                }
                _ => {
                    let start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&s[start..i]);
                }
            }
        }
        attrs.push((attr, value));
    }
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Text(decode_entities(text)));
    }
}

fn tokenize(src: &str) -> Tokens {
    let mut tokens = Vec::new();
    let mut truncated = false;
    let mut rest = src;

    while !rest.is_empty() {
        let lt = match rest.find('<') {
            Some(lt) => lt,
            None => {
                push_text(&mut tokens, rest);
                break;
            }
        };
        push_text(&mut tokens, &rest[..lt]);
        rest = &rest[lt..];

        match rest[1..].chars().next() {
            Some('!') | Some('?') => {
                let end = if rest.starts_with("<!--") {
                    rest[4..].find("-->").map(|i| i + 7)
                } else {
                    rest.find('>').map(|i| i + 1)
                };
                match end {
                    Some(end) => rest = &rest[end..],
                    None => {
                        truncated = true;
                        break;
                    }
                }
            }
            Some('/') => match rest.find('>') {
                Some(end) => {
                    let name = rest[2..end]
                        .split(|c: char| c.is_ascii_whitespace() || c == '/')
                        .next()
                        .unwrap_or("")
                        .to_ascii_lowercase();
                    if !name.is_empty() {
                        tokens.push(Token::End { name });
                    }
                    rest = &rest[end + 1..];
                }
                None => {
                    truncated = true;
                    break;
                }
            },
            Some(c) if c.is_ascii_alphabetic() => match parse_start_tag(rest) {
                Some((token, used)) => {
                    rest = &rest[used..];
                    let raw = match &token {
                        Token::Start {
                            name,
                            self_closing: false,
                            ..
                        } if RAW_TEXT.contains(&name.as_str()) => Some(name.clone()),
                        _ => None,
                    };
                    tokens.push(token);
                    if let Some(name) = raw {
                        let close = format!("</{}", name);
                        let end = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
                        if end > 0 {
                            tokens.push(Token::Text(rest[..end].to_owned()));
                        }
                        rest = &rest[end..];
                    }
                }
                None => {
                    truncated = true;
                    break;
                }
            },
            _ => {
                push_text(&mut tokens, "<");
                rest = &rest[1..];
            }
        }
    }
    Tokens { tokens, truncated }
}

enum Frame {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List {
        kind: ListKind,
        attrs: OrderedListAttrs,
        items: Vec<ListItem>,
    },
    Item(Vec<Block>),
    Textblock {
        kind: TextblockKind,
        runs: Inline,
    },
}

struct Builder {
    /// Open frames with the tag that opened them (`None` when implied)
    stack: Vec<(Frame, Option<String>)>,
    /// Open inline formatting tags
    marks: Vec<(String, Option<Mark>)>,
    /// Open element whose content is dropped, with its nesting depth
    skipping: Option<(String, usize)>,
    unsupported: BTreeSet<String>,
    /// Whether anything meaningful was read
    recovered: bool,
}

impl Builder {
    fn new() -> Self {
        Builder {
            stack: vec![(Frame::Root(Vec::new()), None)],
            marks: Vec::new(),
            skipping: None,
            unsupported: BTreeSet::new(),
            recovered: false,
        }
    }

    fn unsupported(&mut self, name: &str) {
        if self.unsupported.insert(name.to_owned()) {
            debug!("Unsupported markup <{}>", name);
        }
    }

    fn active_marks(&self) -> MarkSet {
        self.marks.iter().filter_map(|(_, m)| m.clone()).collect()
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some((Frame::Root(blocks), _))
            | Some((Frame::Quote(blocks), _))
            | Some((Frame::Item(blocks), _)) => blocks.push(block),
            Some((Frame::List { items, .. }, _)) => items.push(ListItem::new(vec![block])),
            Some((Frame::Textblock { .. }, _)) | None => {
                debug!("Dropping block without a container");
            }
        }
    }

    fn pop(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let (frame, _) = match self.stack.pop() {
            Some(frame) => frame,
            None => return,
        };
        match frame {
            Frame::Root(_) => {}
            Frame::Quote(content) => self.push_block(Block::Blockquote { content }),
            Frame::List { kind, attrs, items } => self.push_block(match kind {
                ListKind::Bullet => Block::BulletList { content: items },
                ListKind::Ordered => Block::OrderedList {
                    attrs,
                    content: items,
                },
            }),
            Frame::Item(content) => {
                if let Some((Frame::List { items, .. }, _)) = self.stack.last_mut() {
                    items.push(ListItem::new(content));
                    return;
                }
                for block in content {
                    self.push_block(block);
                }
            }
            Frame::Textblock { kind, runs } => self.push_block(Block::textblock(kind, runs)),
        }
    }

    fn close_textblock(&mut self) {
        if let Some((Frame::Textblock { .. }, _)) = self.stack.last() {
            self.pop();
        }
    }

    /// Make the top of the stack a container that accepts blocks
    fn ensure_block_container(&mut self) {
        self.close_textblock();
        if let Some((Frame::List { .. }, _)) = self.stack.last() {
            self.stack.push((Frame::Item(Vec::new()), None));
        }
    }

    fn open(&mut self, frame: Frame, name: &str) {
        self.close_textblock();
        while let Some((Frame::List { .. }, None)) = self.stack.last() {
            self.pop();
        }
        self.ensure_block_container();
        self.stack.push((frame, Some(name.to_owned())));
        self.recovered = true;
    }

    fn close(&mut self, name: &str) {
        let found = self
            .stack
            .iter()
            .rposition(|(_, tag)| tag.as_deref() == Some(name));
        if let Some(index) = found {
            while self.stack.len() > index {
                self.pop();
            }
        }
    }

    fn text(&mut self, text: String) {
        let in_textblock = matches!(self.stack.last(), Some((Frame::Textblock { .. }, _)));
        if !in_textblock {
            if text.trim().is_empty() {
                return;
            }
            self.ensure_block_container();
            self.stack.push((
                Frame::Textblock {
                    kind: TextblockKind::Paragraph,
                    runs: Vec::new(),
                },
                None,
            ));
        }
        let marks = self.active_marks();
        if let Some((Frame::Textblock { runs, .. }, _)) = self.stack.last_mut() {
            runs.push(Text::marked(text, marks));
        }
        self.recovered = true;
    }

    fn start(&mut self, name: String, attrs: Vec<(String, String)>, self_closing: bool) {
        if DROPPED.contains(&name.as_str()) {
            self.unsupported(&name);
            if !self_closing {
                self.skipping = Some((name, 1));
            }
            return;
        }
        match name.as_str() {
            "p" => self.open(
                Frame::Textblock {
                    kind: TextblockKind::Paragraph,
                    runs: Vec::new(),
                },
                "p",
            ),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level: u8 = name[1..].parse().unwrap_or(1);
                if level > MAX_HEADING_LEVEL {
                    self.unsupported(&name);
                }
                self.open(
                    Frame::Textblock {
                        kind: TextblockKind::Heading(level.min(MAX_HEADING_LEVEL)),
                        runs: Vec::new(),
                    },
                    &name,
                );
            }
            "blockquote" => self.open(Frame::Quote(Vec::new()), "blockquote"),
            "ul" | "ol" => {
                let kind = if name == "ul" {
                    ListKind::Bullet
                } else {
                    ListKind::Ordered
                };
                let order = attrs
                    .iter()
                    .find(|(k, _)| k == "start")
                    .and_then(|(_, v)| v.trim().parse().ok())
                    .unwrap_or(1);
                self.open(
                    Frame::List {
                        kind,
                        attrs: OrderedListAttrs { order },
                        items: Vec::new(),
                    },
                    &name,
                );
            }
            "li" => {
                self.close_textblock();
                if let Some((Frame::Item(_), _)) = self.stack.last() {
                    self.pop();
                }
                match self.stack.last() {
                    Some((Frame::List { .. }, _)) => {}
                    _ => self.stack.push((
                        Frame::List {
                            kind: ListKind::Bullet,
                            attrs: OrderedListAttrs::default(),
                            items: Vec::new(),
                        },
                        None,
                    )),
                }
                self.stack.push((Frame::Item(Vec::new()), Some(name)));
                self.recovered = true;
            }
            "strong" | "b" => self.marks.push((name, Some(Mark::Bold))),
            "em" | "i" => self.marks.push((name, Some(Mark::Italic))),
            "a" => {
                let href = attrs
                    .into_iter()
                    .find(|(k, _)| k == "href")
                    .map(|(_, v)| v.trim().to_owned())
                    .filter(|href| !href.is_empty());
                if !self_closing {
                    self.marks.push((name, href.map(Mark::link)));
                }
            }
            "br" => {
                self.unsupported(&name);
                self.text(" ".to_owned());
            }
            _ if TRANSPARENT.contains(&name.as_str()) => {}
            _ if BLOCKISH.contains(&name.as_str()) => {
                self.unsupported(&name);
                self.close_implied_textblock();
            }
            _ => self.unsupported(&name),
        }
    }

    fn close_implied_textblock(&mut self) {
        if let Some((Frame::Textblock { .. }, None)) = self.stack.last() {
            self.pop();
        }
    }

    fn end(&mut self, name: String) {
        match name.as_str() {
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "ul" | "ol" | "li" => {
                self.close(&name)
            }
            "strong" | "b" | "em" | "i" | "a" => {
                if let Some(index) = self.marks.iter().rposition(|(tag, _)| *tag == name) {
                    self.marks.remove(index);
                }
            }
            _ if BLOCKISH.contains(&name.as_str()) => self.close_implied_textblock(),
            _ => {}
        }
    }

    fn feed(&mut self, token: Token) {
        if let Some((skip, depth)) = &mut self.skipping {
            match &token {
                Token::Start {
                    name,
                    self_closing: false,
                    ..
                } if *name == *skip => *depth += 1,
                Token::End { name } if *name == *skip => {
                    *depth -= 1;
                    if *depth == 0 {
                        self.skipping = None;
                    }
                }
                _ => {}
            }
            return;
        }
        match token {
            Token::Start {
                name,
                attrs,
                self_closing,
            } => self.start(name, attrs, self_closing),
            Token::End { name } => self.end(name),
            Token::Text(text) => self.text(text),
        }
    }

    fn finish(mut self) -> (Doc, BTreeSet<String>, bool) {
        while self.stack.len() > 1 {
            self.pop();
        }
        let blocks = match self.stack.pop() {
            Some((Frame::Root(blocks), _)) => blocks,
            _ => Vec::new(),
        };
        (Doc::new(blocks), self.unsupported, self.recovered)
    }
}

/// Read markup into a document.
///
/// Fails with [`EditorError::DeserializeFailed`] only when the input is cut off
/// inside a tag or comment and nothing at all could be recovered from it.
pub fn deserialize(src: &str) -> Result<Parsed, EditorError> {
    let Tokens { tokens, truncated } = tokenize(src);
    let mut builder = Builder::new();
    for token in tokens {
        builder.feed(token);
    }
    let (doc, unsupported, recovered) = builder.finish();
    if truncated && !recovered && !src.trim().is_empty() {
        return Err(EditorError::DeserializeFailed(format!(
            "no content in {} bytes of markup",
            src.len()
        )));
    }
    Ok(Parsed { doc, unsupported })
}
