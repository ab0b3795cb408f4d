//! # Configuration

mod folder;

pub use folder::Folder;

use crate::history::{CoalescePolicy, HistoryConfig};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing::instrument;

/// The commandline flags for the editor
#[derive(Debug, StructOpt)]
pub struct Flags {
    /// Which config file to use
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// A file with markup to load into the editor
    #[structopt(long = "content")]
    pub content: Option<PathBuf>,
}

/// The setup that we are actually using
#[derive(Debug, Default)]
pub struct Setup {
    pub editor: EditorConfig,
    /// Where notes are saved
    pub store: Folder,
    /// The initial content of the editor
    pub content: Option<String>,
}

impl Flags {
    #[instrument]
    /// Load the configuration and the initial content
    pub async fn load_cfg(&self) -> Result<Setup, Report> {
        let config = if let Some(cfg) = &self.cfg {
            let cfg_string: String = read_to_string(cfg)
                .await
                .wrap_err("Could not read config file")?;
            Config::parse(&cfg_string).wrap_err("Could not parse config file")?
        } else {
            Config::default()
        };
        let content = match &self.content {
            Some(path) => Some(
                read_to_string(path)
                    .await
                    .wrap_err("Could not read content file")?,
            ),
            None => None,
        };
        Ok(Setup {
            editor: config.editor,
            store: config.store,
            content,
        })
    }
}

/// The editor options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shown while the document is empty
    pub placeholder: Option<String>,
    /// How many undo steps are kept
    pub history_depth: usize,
    /// When typing is grouped into one undo step
    #[serde(deserialize_with = "deserialize_from_str")]
    pub coalesce: CoalescePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let history = HistoryConfig::default();
        EditorConfig {
            placeholder: None,
            history_depth: history.depth,
            coalesce: history.coalesce,
        }
    }
}

impl EditorConfig {
    pub fn history(&self) -> HistoryConfig {
        HistoryConfig {
            depth: self.history_depth,
            coalesce: self.coalesce,
        }
    }
}

/// A configuration for the system
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// The editor options
    #[serde(default)]
    pub editor: EditorConfig,
    /// The store options
    #[serde(default)]
    pub store: Folder,
}

impl Config {
    pub fn parse(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }
}

// You can use this deserializer for any type that implements FromStr
// and the FromStr::Err implements Display
fn deserialize_from_str<'de, S, D>(deserializer: D) -> Result<S, D::Error>
where
    S: FromStr,      // Required for S::from_str...
    S::Err: Display, // Required for .map_err(de::Error::custom)
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    S::from_str(&s).map_err(de::Error::custom)
}
