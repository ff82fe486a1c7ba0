//! # Display indexes
//!
//! Users address macros by a 1-based position as shown by `list`, or by name.
//! Internally the store is 0-based. Selectors are always resolved against a
//! freshly loaded store, never against a list the user saw earlier.

use crate::error::{MacroError, Result};
use crate::model::{MacroRecord, MacroStore};
use std::fmt;

const NAME_PREFIX: &str = "name:";

/// A macro as presented to the user, tagged with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMacro {
    pub index: usize,
    pub record: MacroRecord,
}

/// A user input selecting a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroSelector {
    /// 0-based store position.
    Position(usize),
    Name(String),
}

impl fmt::Display for MacroSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroSelector::Position(p) => write!(f, "{}", p + 1),
            MacroSelector::Name(n) => write!(f, "\"{}\"", n),
        }
    }
}

impl MacroSelector {
    /// Digits are a 1-based index, anything else is a name. A `name:` prefix
    /// forces a name, so a macro called `42` is selected with `name:42`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MacroError::Api("Empty macro selector".to_string()));
        }
        if let Some(name) = trimmed.strip_prefix(NAME_PREFIX) {
            if name.is_empty() {
                return Err(MacroError::Api("Empty macro name".to_string()));
            }
            return Ok(MacroSelector::Name(name.to_string()));
        }
        match trimmed.parse::<usize>() {
            Ok(0) => Err(MacroError::Api("Indexes start at 1".to_string())),
            Ok(n) => Ok(MacroSelector::Position(n - 1)),
            Err(_) => Ok(MacroSelector::Name(trimmed.to_string())),
        }
    }

    /// The 0-based position this selector refers to in `store`. An
    /// out-of-range error names the 1-based index the user typed.
    pub fn resolve(&self, store: &MacroStore) -> Result<usize> {
        match self {
            MacroSelector::Position(p) if *p < store.len() => Ok(*p),
            MacroSelector::Position(p) => Err(MacroError::IndexOutOfRange {
                index: p + 1,
                len: store.len(),
            }),
            MacroSelector::Name(name) => store
                .find_by_name(name)
                .map(|(p, _)| p)
                .ok_or_else(|| MacroError::Api(format!("No macro named \"{}\"", name))),
        }
    }
}

pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<MacroSelector>> {
    inputs
        .iter()
        .map(|s| MacroSelector::parse(s.as_ref()))
        .collect()
}

pub fn index_macros(store: &MacroStore) -> Vec<DisplayMacro> {
    store
        .list()
        .iter()
        .enumerate()
        .map(|(p, record)| DisplayMacro {
            index: p + 1,
            record: record.clone(),
        })
        .collect()
}
