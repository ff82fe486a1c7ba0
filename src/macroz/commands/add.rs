use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MacroError, Result};
use crate::model::MacroRecord;
use crate::store::MacroBackend;

use super::helpers;

pub fn run<B: MacroBackend>(backend: &mut B, record: MacroRecord) -> Result<CmdResult> {
    if record.name.trim().is_empty() {
        return Err(MacroError::Api("Macro name cannot be empty".into()));
    }

    let mut result = CmdResult::default();
    let mut store = helpers::load(backend, &mut result)?;

    if store.find_by_name(&record.name).is_some() {
        result.add_message(CmdMessage::warning(format!(
            "Another macro is already named \"{}\"; lookups by name will pick the newest",
            record.name
        )));
    }

    store.add(record.clone());
    helpers::save(backend, &store, &mut result)?;

    result.add_message(CmdMessage::success(format!(
        "Macro added ({}): {}",
        store.len(),
        record.name
    )));
    result.affected_macros.push(record);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::BackendFixture;
    use crate::store::memory::MemoryBackend;

    #[test]
    fn appends_and_saves() {
        let mut backend = BackendFixture::new().with_macros(2).backend;
        let record = MacroRecord::new("greet", "ihello<Esc>", b"ihello\x1b");
        let result = run(&mut backend, record.clone()).unwrap();

        assert_eq!(backend.save_count(), 1);
        assert_eq!(backend.snapshot().len(), 3);
        assert_eq!(backend.snapshot().list()[2], record);
        assert_eq!(result.affected_macros, vec![record]);
        assert!(result.messages[0].content.contains("(3)"));
    }

    #[test]
    fn rejects_empty_name_without_saving() {
        let mut backend = MemoryBackend::new();
        let err = run(&mut backend, MacroRecord::new("  ", "x", b"x")).unwrap_err();
        assert!(matches!(err, MacroError::Api(_)));
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn duplicate_name_is_accepted_with_warning() {
        let mut backend = BackendFixture::new()
            .with_macro("dup", "a", b"a")
            .backend;
        let result = run(&mut backend, MacroRecord::new("dup", "b", b"b")).unwrap();
        assert_eq!(backend.snapshot().len(), 2);
        assert!(result.has_level(MessageLevel::Warning));
    }
}
