use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::MacroSelector;
use crate::store::MacroBackend;

use super::helpers;

/// Removes the selected macros. Selectors are resolved against a fresh load;
/// if any of them does not resolve, nothing is removed or saved.
pub fn run<B: MacroBackend>(backend: &mut B, selectors: &[MacroSelector]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut store = helpers::load(backend, &mut result)?;

    let positions = helpers::resolve_selectors(&store, selectors)?;
    let removed = store.remove_many(&positions)?;
    if removed.is_empty() {
        return Ok(result);
    }

    helpers::save(backend, &store, &mut result)?;

    for record in &removed {
        result.add_message(CmdMessage::success(format!(
            "Macro removed: {}",
            record.name
        )));
    }
    result.affected_macros = removed;
    Ok(result)
}
