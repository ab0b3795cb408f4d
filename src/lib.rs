//! # Noteworthy
//!
//! A rich-text note editor core: a typed document model, a markup
//! serializer, toggle commands with undo history and a sync controller that
//! keeps the document in step with content owned by a host form.
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod markup;
pub mod model;
pub mod notes;
pub mod state;
pub mod sync;
pub mod toolbar;
pub mod util;

pub use editor::Editor;
pub use error::{EditorError, Notice};
