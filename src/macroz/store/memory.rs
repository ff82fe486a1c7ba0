use super::{Loaded, MacroBackend, Saved};
use crate::error::Result;
use crate::model::MacroStore;
use std::path::PathBuf;

/// In-memory backend for testing. Does NOT persist data.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: MacroStore,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: MacroStore) -> Self {
        Self { store, saves: 0 }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn snapshot(&self) -> &MacroStore {
        &self.store
    }
}

impl MacroBackend for MemoryBackend {
    fn load(&self) -> Result<Loaded> {
        Ok(Loaded::new(self.store.clone()))
    }

    fn save(&mut self, store: &MacroStore) -> Result<Saved> {
        self.store = store.clone();
        self.saves += 1;
        Ok(Saved::default())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::MacroRecord;

    pub struct BackendFixture {
        pub backend: MemoryBackend,
    }

    impl Default for BackendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BackendFixture {
        pub fn new() -> Self {
            Self {
                backend: MemoryBackend::new(),
            }
        }

        pub fn with_macros(mut self, count: usize) -> Self {
            for i in 0..count {
                let keys = format!("imacro {}\x1b", i + 1);
                let content = format!("imacro {}<Esc>", i + 1);
                self.backend
                    .store
                    .add(MacroRecord::new(format!("macro-{}", i + 1), content, keys.as_bytes()));
            }
            self
        }

        pub fn with_macro(mut self, name: &str, content: &str, raw: &[u8]) -> Self {
            self.backend.store.add(MacroRecord::new(name, content, raw));
            self
        }

        pub fn with_damaged_macro(mut self, name: &str) -> Self {
            self.backend
                .store
                .add(MacroRecord::from_encoded(name, "???", "%%%%"));
            self
        }
    }
}
