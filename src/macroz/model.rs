use crate::codec::{self, CodecError};
use crate::error::{MacroError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named keystroke capture.
///
/// `content` is the printable rendering used for display, `raw` is the
/// codec-encoded original byte sequence used for exact replay. Both are
/// derived from the same capture and are never edited independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRecord {
    pub name: String,
    pub content: String,
    pub raw: String,
}

impl MacroRecord {
    pub fn new(name: impl Into<String>, content: impl Into<String>, raw_bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            raw: codec::encode(raw_bytes),
        }
    }

    /// Builds a record around a payload that is already encoded.
    pub fn from_encoded(
        name: impl Into<String>,
        content: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            raw: raw.into(),
        }
    }

    /// Decodes the exact captured bytes.
    pub fn raw_bytes(&self) -> std::result::Result<Vec<u8>, CodecError> {
        codec::decode(&self.raw)
    }
}

/// Ordered collection of records, exactly as held in the backing file.
///
/// Order is insertion order and doubles as the index space for removal.
/// Top-level keys other than `macros` are kept in `extra` so a load/save
/// cycle does not drop data written by other tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroStore {
    macros: Vec<MacroRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl MacroStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(macros: Vec<MacroRecord>) -> Self {
        Self {
            macros,
            extra: Map::new(),
        }
    }

    /// Appends a record. Duplicate names are accepted.
    pub fn add(&mut self, record: MacroRecord) {
        self.macros.push(record);
    }

    /// Removes the record at `index`, keeping the relative order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<MacroRecord> {
        self.check_index(index)?;
        Ok(self.macros.remove(index))
    }

    /// Removes several records at once.
    ///
    /// Every index is checked before anything is removed, so a bad index
    /// leaves the store untouched. Returned records follow store order.
    pub fn remove_many(&mut self, indexes: &[usize]) -> Result<Vec<MacroRecord>> {
        for &index in indexes {
            self.check_index(index)?;
        }

        let mut sorted = indexes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed: Vec<MacroRecord> = sorted
            .iter()
            .rev()
            .map(|&index| self.macros.remove(index))
            .collect();
        removed.reverse();
        Ok(removed)
    }

    pub fn list(&self) -> &[MacroRecord] {
        &self.macros
    }

    pub fn get(&self, index: usize) -> Result<&MacroRecord> {
        self.check_index(index)?;
        Ok(&self.macros[index])
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Looks a record up by name. When names collide the last one wins.
    pub fn find_by_name(&self, name: &str) -> Option<(usize, &MacroRecord)> {
        self.macros
            .iter()
            .enumerate()
            .rev()
            .find(|(_, record)| record.name == name)
    }

    /// All records whose `content` starts with `prefix`, in store order.
    pub fn find_by_content_prefix(&self, prefix: &str) -> Vec<(usize, &MacroRecord)> {
        self.macros
            .iter()
            .enumerate()
            .filter(|(_, record)| record.content.starts_with(prefix))
            .collect()
    }

    /// Top-level keys of the backing file that this crate does not interpret.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.macros.len() {
            return Err(MacroError::IndexOutOfRange {
                index,
                len: self.macros.len(),
            });
        }
        Ok(())
    }
}
