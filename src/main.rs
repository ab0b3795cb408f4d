use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use noteworthy::config::Flags;
use noteworthy::editor::Editor;
use noteworthy::input::{Input, HELP};
use noteworthy::model::Selection;
use noteworthy::notes::{NoteError, NoteId, NoteRepository, ValidationError};
use noteworthy::util::LoopState;
use structopt::StructOpt;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(debug_assertions)]
const DEFAULT_FILTER: &str = "warn,noteworthy=debug";
#[cfg(not(debug_assertions))]
const DEFAULT_FILTER: &str = "warn,noteworthy=info";

/// The note form: one editor, the note it belongs to and the store
struct Host {
    editor: Editor,
    repo: Box<dyn NoteRepository>,
    current: Option<NoteId>,
}

impl Host {
    fn print_notices(&mut self) {
        for notice in self.editor.take_notices() {
            println!("notice: {}", notice);
        }
    }

    fn save(&mut self, title: &str) -> Result<NoteId, NoteError> {
        if self.editor.is_blank() {
            return Err(ValidationError::EmptyContent.into());
        }
        let content = self.editor.html();
        // no edits while the store is busy
        self.editor.set_disabled(true);
        let result = match self.current {
            Some(id) => self.repo.update(id, title, &content),
            None => self.repo.create(title, &content),
        };
        self.editor.set_disabled(false);
        let note = result?;
        self.current = Some(note.id);
        Ok(note.id)
    }

    fn handle(&mut self, input: Input) -> Result<LoopState<()>, NoteError> {
        match input {
            Input::Edit(command) => {
                if !self.editor.exec(command.clone()) {
                    println!("({} did nothing)", command);
                }
            }
            Input::Select(anchor, head) => {
                self.editor.set_selection(Selection::new(anchor, head));
                let sel = self.editor.selection();
                println!("selection: {}..{}", sel.anchor, sel.head);
            }
            Input::SelectAll => self.editor.select_all(),
            Input::External(content) => {
                let outcome = self.editor.set_external_content(&content);
                debug!("External content: {:?}", outcome);
            }
            Input::Show => {
                println!("{}", self.editor.html());
                if let Some(placeholder) = self.editor.placeholder() {
                    println!("placeholder: {}", placeholder);
                }
                let sel = self.editor.selection();
                println!("selection: {}..{}", sel.anchor, sel.head);
                if let Some(href) = self.editor.link_href() {
                    println!("link: {}", href);
                }
            }
            Input::Json => match self.editor.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Could not encode the document: {}", e),
            },
            Input::Toolbar => println!("{}", self.editor.toolbar()),
            Input::New => {
                self.current = None;
                self.editor.initialize("");
            }
            Input::Load(id) => {
                let note = self.repo.get(id)?;
                self.editor.set_external_content(&note.content);
                self.current = Some(note.id);
                println!("loaded {} ({})", note.id, note.title);
            }
            Input::Save(title) => {
                let id = self.save(&title)?;
                println!("saved {}", id);
            }
            Input::List => {
                for note in self.repo.list()? {
                    let marker = if Some(note.id) == self.current { "*" } else { " " };
                    println!(
                        "{}{} {} (updated {})",
                        marker,
                        note.id,
                        note.title,
                        note.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            Input::Delete(id) => {
                self.repo.delete(id)?;
                if self.current == Some(id) {
                    self.current = None;
                    self.editor.initialize("");
                }
                println!("deleted {}", id);
            }
            Input::Help => println!("{}", HELP),
            Input::Quit => return Ok(LoopState::Break(())),
        }
        self.print_notices();
        Ok(LoopState::Continue)
    }
}

fn install_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    install_tracing();
    color_eyre::install()?;

    let flags = Flags::from_args();
    let setup = flags.load_cfg().await?;
    let repo = setup
        .store
        .open()
        .wrap_err("Could not open the note store")?;

    let mut editor = Editor::new(&setup.editor);
    editor.initialize(setup.content.as_deref().unwrap_or(""));
    editor.on_change(|content| println!("change: {}", content));

    let mut host = Host {
        editor,
        repo,
        current: None,
    };
    host.print_notices();
    info!("Ready, type `help` for the commands");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Input>() {
            Ok(input) => match host.handle(input) {
                Ok(LoopState::Break(())) => break,
                Ok(LoopState::Continue) => {}
                Err(e) => println!("error: {}", e),
            },
            Err(e) => println!("error: {}", e),
        }
    }
    Ok(())
}
