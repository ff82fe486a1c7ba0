use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::DisplayMacro;
use crate::store::MacroBackend;

use super::helpers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindQuery {
    /// Every macro whose content starts with the prefix.
    ContentPrefix(String),
    /// The macro with this exact name (newest wins on duplicates).
    Name(String),
}

pub fn run<B: MacroBackend>(backend: &B, query: &FindQuery) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let store = helpers::load(backend, &mut result)?;

    let hits: Vec<DisplayMacro> = match query {
        FindQuery::ContentPrefix(prefix) => store
            .find_by_content_prefix(prefix)
            .into_iter()
            .map(|(p, record)| DisplayMacro {
                index: p + 1,
                record: record.clone(),
            })
            .collect(),
        FindQuery::Name(name) => store
            .find_by_name(name)
            .map(|(p, record)| DisplayMacro {
                index: p + 1,
                record: record.clone(),
            })
            .into_iter()
            .collect(),
    };

    Ok(result.with_listed_macros(hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::BackendFixture;

    #[test]
    fn finds_by_content_prefix_with_display_indexes() {
        let backend = BackendFixture::new()
            .with_macro("a", "ihello<Esc>", b"ihello\x1b")
            .with_macro("b", "dd", b"dd")
            .with_macro("c", "ihi<Esc>", b"ihi\x1b")
            .backend;
        let result = run(&backend, &FindQuery::ContentPrefix("ih".into())).unwrap();
        let found: Vec<_> = result
            .listed_macros
            .iter()
            .map(|d| (d.index, d.record.name.as_str()))
            .collect();
        assert_eq!(found, vec![(1, "a"), (3, "c")]);
    }

    #[test]
    fn finds_newest_by_name() {
        let backend = BackendFixture::new()
            .with_macro("x", "old", b"old")
            .with_macro("x", "new", b"new")
            .backend;
        let result = run(&backend, &FindQuery::Name("x".into())).unwrap();
        assert_eq!(result.listed_macros.len(), 1);
        assert_eq!(result.listed_macros[0].index, 2);
        assert_eq!(result.listed_macros[0].record.content, "new");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let backend = BackendFixture::new().with_macros(2).backend;
        let result = run(&backend, &FindQuery::Name("nope".into())).unwrap();
        assert!(result.listed_macros.is_empty());
    }
}
