//! # Storage Layer
//!
//! The backing store is a single JSON document:
//!
//! ```text
//! { "macros": [ { "name": "...", "content": "...", "raw": "<base64>" }, ... ] }
//! ```
//!
//! The file is the source of truth. Every operation loads the whole document,
//! mutates it in memory and writes the whole document back; nothing is cached
//! between operations and there is no partial write.
//!
//! ## Implementations
//!
//! - [`fs::FileBackend`]: production backend over [`fs::load_store`] and
//!   [`fs::save_store`], with the optional external formatter pass.
//! - [`memory::MemoryBackend`]: in-memory backend for command tests.
//!
//! ## Concurrency
//!
//! There is no locking. Two processes that both load, mutate and save race,
//! and the last save wins on the whole file: the earlier writer's change is
//! lost. Within one process, callers are expected to serialize operations.

use crate::error::Result;
use crate::formatter::{Formatter, FormatterError, DEFAULT_TIMEOUT};
use crate::model::MacroStore;
use std::path::PathBuf;
use std::time::Duration;

pub mod fs;
pub mod memory;

/// How the backing file is read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub formatter: Formatter,
    pub timeout: Duration,
    /// Write canonical bytes when the formatter fails on save instead of
    /// aborting the save.
    pub fallback_on_write_failure: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            formatter: Formatter::None,
            timeout: DEFAULT_TIMEOUT,
            fallback_on_write_failure: false,
        }
    }
}

impl StoreOptions {
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback_on_write_failure = fallback;
        self
    }
}

/// Result of a load.
///
/// A formatter problem on the read path does not fail the load: the file's
/// own bytes are parsed instead and the problem is reported here.
#[derive(Debug, Default)]
pub struct Loaded {
    pub store: MacroStore,
    pub formatter_error: Option<FormatterError>,
}

impl Loaded {
    pub fn new(store: MacroStore) -> Self {
        Self {
            store,
            formatter_error: None,
        }
    }
}

/// Result of a save.
#[derive(Debug, Default)]
pub struct Saved {
    /// Set only when the formatter failed and the fallback wrote canonical bytes.
    pub formatter_error: Option<FormatterError>,
}

/// Abstract interface for macro persistence.
pub trait MacroBackend {
    /// Materialize the full store from its backing medium.
    fn load(&self) -> Result<Loaded>;

    /// Replace the backing medium's content with `store`.
    fn save(&mut self, store: &MacroStore) -> Result<Saved>;

    /// Where the store lives (a real path for file backends).
    fn location(&self) -> PathBuf;

    /// The external formatter applied on load and save.
    fn formatter(&self) -> Formatter {
        Formatter::None
    }
}
