use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::MacroSelector;
use crate::model::MacroStore;
use crate::store::MacroBackend;

/// Loads the store, turning a degraded formatter read into a warning.
pub fn load<B: MacroBackend>(backend: &B, result: &mut CmdResult) -> Result<MacroStore> {
    let loaded = backend.load()?;
    if let Some(e) = loaded.formatter_error {
        result.add_message(CmdMessage::warning(format!(
            "Read the store without formatting: {}",
            e
        )));
    }
    Ok(loaded.store)
}

/// Saves the store, reporting a formatter fallback as a warning.
pub fn save<B: MacroBackend>(
    backend: &mut B,
    store: &MacroStore,
    result: &mut CmdResult,
) -> Result<()> {
    let saved = backend.save(store)?;
    if let Some(e) = saved.formatter_error {
        result.add_message(CmdMessage::warning(format!(
            "Saved the store without formatting: {}",
            e
        )));
    }
    Ok(())
}

/// Resolves selectors to 0-based positions in `store`.
pub fn resolve_selectors(store: &MacroStore, selectors: &[MacroSelector]) -> Result<Vec<usize>> {
    selectors.iter().map(|s| s.resolve(store)).collect()
}
