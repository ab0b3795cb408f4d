//! # Input lines
//!
//! The binary reads one command per line. Arguments follow the command name
//! after a `|`, e.g. `type|Hello`, `heading|2` or `select|0|5`.

use crate::commands::Command;
use crate::notes::NoteId;
use displaydoc::Display;
use std::str::FromStr;

/// Error when parsing an input line
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ParseInputError {
    /// The command expected an argument (e.g. `{0}|foo`)
    MissingArg(InputKind),
    /// The argument of `{0}` is not valid
    InvalidArg(InputKind),
    /// The command `{0}` is not known
    UnknownCommand(String),
}

/// A kind of input line
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum InputKind {
    /// type
    Type,
    /// enter
    Enter,
    /// backspace
    Backspace,
    /// select
    Select,
    /// all
    All,
    /// bold
    Bold,
    /// italic
    Italic,
    /// heading
    Heading,
    /// bullet
    Bullet,
    /// ordered
    Ordered,
    /// quote
    Quote,
    /// link
    Link,
    /// unlink
    Unlink,
    /// undo
    Undo,
    /// redo
    Redo,
    /// html
    Html,
    /// show
    Show,
    /// json
    Json,
    /// toolbar
    Toolbar,
    /// new
    New,
    /// load
    Load,
    /// save
    Save,
    /// list
    List,
    /// delete
    Delete,
    /// help
    Help,
    /// quit
    Quit,
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Run an editor command
    Edit(Command),
    /// Move the selection
    Select(usize, usize),
    /// Select the whole document
    SelectAll,
    /// Push content in from outside, as the host form would
    External(String),
    /// Print the content and selection
    Show,
    /// Print the document as JSON
    Json,
    /// Print the toolbar
    Toolbar,
    /// Start a new, unsaved note
    New,
    /// Load a note into the editor
    Load(NoteId),
    /// Save the editor content under a title
    Save(String),
    /// List all notes
    List,
    /// Delete a note
    Delete(NoteId),
    /// Print the available commands
    Help,
    /// Exit
    Quit,
}

impl FromStr for InputKind {
    type Err = ParseInputError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(Self::Type),
            "enter" => Ok(Self::Enter),
            "backspace" => Ok(Self::Backspace),
            "select" => Ok(Self::Select),
            "all" => Ok(Self::All),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "heading" => Ok(Self::Heading),
            "bullet" => Ok(Self::Bullet),
            "ordered" => Ok(Self::Ordered),
            "quote" => Ok(Self::Quote),
            "link" => Ok(Self::Link),
            "unlink" => Ok(Self::Unlink),
            "undo" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            "html" => Ok(Self::Html),
            "show" => Ok(Self::Show),
            "json" => Ok(Self::Json),
            "toolbar" => Ok(Self::Toolbar),
            "new" => Ok(Self::New),
            "load" => Ok(Self::Load),
            "save" => Ok(Self::Save),
            "list" => Ok(Self::List),
            "delete" => Ok(Self::Delete),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseInputError::UnknownCommand(s.to_owned())),
        }
    }
}

fn split_arg(input: &str) -> (&str, Option<&str>) {
    if let Some(cmd_len) = input.find('|') {
        let (cmd, r) = input.split_at(cmd_len);
        let (_, arg) = r.split_at(1);
        (cmd, Some(arg))
    } else {
        (input, None)
    }
}

fn parse_arg<T: FromStr>(kind: InputKind, arg: Option<&str>) -> Result<T, ParseInputError> {
    arg.ok_or(ParseInputError::MissingArg(kind))?
        .trim()
        .parse()
        .map_err(|_| ParseInputError::InvalidArg(kind))
}

impl FromStr for Input {
    type Err = ParseInputError;
    fn from_str(input: &str) -> Result<Input, ParseInputError> {
        let (cmd, arg) = split_arg(input);

        let kind: InputKind = cmd.trim().parse()?;
        let edit = |command| Ok(Input::Edit(command));
        match kind {
            InputKind::Type => {
                let text = arg.ok_or(ParseInputError::MissingArg(kind))?;
                edit(Command::InsertText(text.replace("\\n", "\n")))
            }
            InputKind::Enter => edit(Command::SplitBlock),
            InputKind::Backspace => edit(Command::DeleteBackward),
            InputKind::Select => {
                let text = arg.ok_or(ParseInputError::MissingArg(kind))?;
                let (anchor, head) = split_arg(text);
                let anchor = parse_arg(kind, Some(anchor))?;
                let head = match head {
                    Some(_) => parse_arg(kind, head)?,
                    None => anchor,
                };
                Ok(Input::Select(anchor, head))
            }
            InputKind::All => Ok(Input::SelectAll),
            InputKind::Bold => edit(Command::ToggleBold),
            InputKind::Italic => edit(Command::ToggleItalic),
            InputKind::Heading => edit(Command::ToggleHeading(parse_arg(kind, arg)?)),
            InputKind::Bullet => edit(Command::ToggleBulletList),
            InputKind::Ordered => edit(Command::ToggleOrderedList),
            InputKind::Quote => edit(Command::ToggleBlockquote),
            InputKind::Link => edit(Command::SetLink(arg.unwrap_or("").trim().to_owned())),
            InputKind::Unlink => edit(Command::UnsetLink),
            InputKind::Undo => edit(Command::Undo),
            InputKind::Redo => edit(Command::Redo),
            InputKind::Html => Ok(Input::External(arg.unwrap_or("").to_owned())),
            InputKind::Show => Ok(Input::Show),
            InputKind::Json => Ok(Input::Json),
            InputKind::Toolbar => Ok(Input::Toolbar),
            InputKind::New => Ok(Input::New),
            InputKind::Load => Ok(Input::Load(parse_arg(kind, arg)?)),
            InputKind::Save => {
                let title = arg.ok_or(ParseInputError::MissingArg(kind))?;
                Ok(Input::Save(title.to_owned()))
            }
            InputKind::List => Ok(Input::List),
            InputKind::Delete => Ok(Input::Delete(parse_arg(kind, arg)?)),
            InputKind::Help => Ok(Input::Help),
            InputKind::Quit => Ok(Input::Quit),
        }
    }
}

/// One line per command, for `help`
pub const HELP: &str = "\
type|<text>      insert text (\\n splits the block)
enter            split the block
backspace        delete backward
select|<a>[|<b>] move the selection
all              select everything
bold, italic     toggle a mark
heading|<1-3>    toggle a heading
bullet, ordered  toggle a list
quote            toggle a blockquote
link[|<href>]    set (or with no href, remove) a link
unlink           remove a link
undo, redo       walk the history
html|<markup>    replace the content from outside
show, json       print the content
toolbar          print the toolbar
new              start a new note
load|<id>        load a note
save|<title>     save the note
list             list the notes
delete|<id>      delete a note
quit             exit";
