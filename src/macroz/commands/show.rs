use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::{DisplayMacro, MacroSelector};
use crate::store::MacroBackend;

use super::helpers;

/// Fetches one macro together with its decoded capture.
pub fn run<B: MacroBackend>(backend: &B, selector: &MacroSelector) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let store = helpers::load(backend, &mut result)?;

    let position = selector.resolve(&store)?;
    let record = store.get(position)?.clone();
    let raw = record.raw_bytes()?;

    result.raw_bytes = Some(raw);
    Ok(result.with_listed_macros(vec![DisplayMacro {
        index: position + 1,
        record,
    }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MacroError;
    use crate::store::memory::fixtures::BackendFixture;

    #[test]
    fn decodes_exact_bytes() {
        let backend = BackendFixture::new()
            .with_macro("ctl", "<Nul><Esc>", b"\x00\x1b\xff")
            .backend;
        let result = run(&backend, &MacroSelector::Position(0)).unwrap();
        assert_eq!(result.raw_bytes.unwrap(), b"\x00\x1b\xff".to_vec());
        assert_eq!(result.listed_macros[0].index, 1);
    }

    #[test]
    fn damaged_payload_is_codec_error() {
        let backend = BackendFixture::new().with_damaged_macro("bad").backend;
        let err = run(&backend, &MacroSelector::Name("bad".into())).unwrap_err();
        assert!(matches!(err, MacroError::Codec(_)));
    }

    #[test]
    fn out_of_range_is_reported() {
        let backend = BackendFixture::new().with_macros(1).backend;
        assert!(matches!(
            run(&backend, &MacroSelector::Position(5)),
            Err(MacroError::IndexOutOfRange { index: 6, len: 1 })
        ));
    }
}
