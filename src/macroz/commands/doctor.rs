use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::MacroBackend;

use super::helpers;

/// Checks every record for an empty name or an undecodable payload, and
/// whether the configured formatter is installed.
/// Reports only; the store is never rewritten.
pub fn run<B: MacroBackend>(backend: &B) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let store = helpers::load(backend, &mut result)?;

    let formatter = backend.formatter();
    if !formatter.is_available() {
        result.add_message(CmdMessage::warning(format!(
            "Formatter {} is not installed: reads skip it and saves fail unless fallback-on-write-failure is set",
            formatter
        )));
    }

    let mut problems = 0;
    for (p, record) in store.list().iter().enumerate() {
        if record.name.trim().is_empty() {
            problems += 1;
            result.add_message(CmdMessage::error(format!("Macro {} has no name", p + 1)));
        }
        if let Err(e) = record.raw_bytes() {
            problems += 1;
            result.add_message(CmdMessage::error(format!(
                "Macro {} ({}) has a damaged raw payload: {}",
                p + 1,
                record.name,
                e
            )));
        }
    }

    if problems == 0 {
        result.add_message(CmdMessage::success(format!(
            "All {} macros are healthy",
            store.len()
        )));
    }
    Ok(result)
}
