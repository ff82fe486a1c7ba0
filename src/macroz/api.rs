//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for
//! every macroz operation, whatever the client (the bundled CLI, an editor
//! plugin, a test).
//!
//! The facade:
//! - **Dispatches** to the matching command
//! - **Normalizes inputs** (user-facing 1-based indexes and names → selectors)
//! - **Returns structured types** (`Result<CmdResult>`), never strings to print
//!
//! `MacroApi<B: MacroBackend>` is generic over the backend:
//! - Production: `MacroApi<FileBackend>`
//! - Testing: `MacroApi<MemoryBackend>`

use crate::commands;
use crate::error::{MacroError, Result};
use crate::index::{parse_selectors, MacroSelector};
use crate::model::MacroRecord;
use crate::notation;
use crate::store::MacroBackend;

pub struct MacroApi<B: MacroBackend> {
    backend: B,
    paths: commands::MacroPaths,
}

impl<B: MacroBackend> MacroApi<B> {
    pub fn new(backend: B, paths: commands::MacroPaths) -> Self {
        Self { backend, paths }
    }

    /// Adds a capture. Without `content`, the printable notation of `raw` is used.
    pub fn add_macro(
        &mut self,
        name: String,
        content: Option<String>,
        raw: &[u8],
    ) -> Result<commands::CmdResult> {
        let content = content.unwrap_or_else(|| notation::render(raw));
        commands::add::run(&mut self.backend, MacroRecord::new(name, content, raw))
    }

    /// Adds a record whose payload is already encoded; the payload must decode.
    pub fn add_encoded(
        &mut self,
        name: String,
        content: String,
        raw: String,
    ) -> Result<commands::CmdResult> {
        let record = MacroRecord::from_encoded(name, content, raw);
        record.raw_bytes()?;
        commands::add::run(&mut self.backend, record)
    }

    pub fn remove_macros<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        if selectors.is_empty() {
            return Err(MacroError::Api("Nothing to remove".into()));
        }
        commands::remove::run(&mut self.backend, &selectors)
    }

    pub fn list_macros(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.backend)
    }

    pub fn find_macros(&self, query: FindQuery) -> Result<commands::CmdResult> {
        commands::find::run(&self.backend, &query)
    }

    pub fn show_macro(&self, input: &str) -> Result<commands::CmdResult> {
        let selector = MacroSelector::parse(input)?;
        commands::show::run(&self.backend, &selector)
    }

    pub fn doctor(&self) -> Result<commands::CmdResult> {
        commands::doctor::run(&self.backend)
    }

    pub fn store_path(&self) -> Result<commands::CmdResult> {
        commands::paths::run(&self.backend)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::find::FindQuery;
pub use commands::{CmdMessage, CmdResult, MacroPaths, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryBackend;
    use std::path::PathBuf;

    fn api() -> MacroApi<MemoryBackend> {
        MacroApi::new(
            MemoryBackend::new(),
            MacroPaths::new(PathBuf::from("/nonexistent")),
        )
    }

    #[test]
    fn add_renders_content_when_missing() {
        let mut api = api();
        let result = api.add_macro("greet".into(), None, b"ihello\x1b").unwrap();
        assert_eq!(result.affected_macros[0].content, "ihello<Esc>");
    }

    #[test]
    fn add_keeps_supplied_content() {
        let mut api = api();
        let result = api
            .add_macro("greet".into(), Some("custom".into()), b"x")
            .unwrap();
        assert_eq!(result.affected_macros[0].content, "custom");
    }

    #[test]
    fn add_encoded_rejects_bad_payload() {
        let mut api = api();
        let err = api
            .add_encoded("x".into(), "x".into(), "###".into())
            .unwrap_err();
        assert!(matches!(err, MacroError::Codec(_)));
        assert!(api.list_macros().unwrap().listed_macros.is_empty());
    }

    #[test]
    fn remove_dispatches_with_one_based_indexes() {
        let mut api = api();
        api.add_macro("a".into(), None, b"a").unwrap();
        api.add_macro("b".into(), None, b"b").unwrap();
        let result = api.remove_macros(&["1"]).unwrap();
        assert_eq!(result.affected_macros[0].name, "a");

        let listed = api.list_macros().unwrap().listed_macros;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.name, "b");
    }

    #[test]
    fn remove_requires_a_selector() {
        let mut api = api();
        let none: [&str; 0] = [];
        assert!(api.remove_macros(&none).is_err());
    }

    #[test]
    fn show_accepts_names() {
        let mut api = api();
        api.add_macro("esc".into(), None, b"\x1b").unwrap();
        let result = api.show_macro("esc").unwrap();
        assert_eq!(result.raw_bytes.unwrap(), b"\x1b".to_vec());
    }

    #[test]
    fn find_dispatches() {
        let mut api = api();
        api.add_macro("a".into(), None, b"ihi\x1b").unwrap();
        let result = api
            .find_macros(FindQuery::ContentPrefix("ihi".into()))
            .unwrap();
        assert_eq!(result.listed_macros.len(), 1);
    }
}
