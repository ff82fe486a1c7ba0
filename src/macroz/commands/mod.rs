use crate::config::MacroConfig;
use crate::index::DisplayMacro;
use crate::model::MacroRecord;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod doctor;
pub mod find;
pub mod helpers;
pub mod list;
pub mod paths;
pub mod remove;
pub mod show;

/// Where the store and its config live.
#[derive(Debug, Clone)]
pub struct MacroPaths {
    pub home: PathBuf,
    pub store_file: PathBuf,
}

impl MacroPaths {
    pub const STORE_FILENAME: &'static str = "macros.json";

    pub fn new(home: PathBuf) -> Self {
        let store_file = home.join(Self::STORE_FILENAME);
        Self { home, store_file }
    }

    pub fn with_store_file(mut self, store_file: PathBuf) -> Self {
        self.store_file = store_file;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_macros: Vec<MacroRecord>,
    pub listed_macros: Vec<DisplayMacro>,
    /// Decoded capture for `show`.
    pub raw_bytes: Option<Vec<u8>>,
    pub paths: Vec<PathBuf>,
    pub config: Option<MacroConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_macros(mut self, macros: Vec<DisplayMacro>) -> Self {
        self.listed_macros = macros;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_config(mut self, config: MacroConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}
