use super::{Loaded, MacroBackend, Saved, StoreOptions};
use crate::error::{MacroError, Result};
use crate::formatter::{Direction, Formatter, FormatterError};
use crate::model::MacroStore;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Reads the backing file into a [`MacroStore`].
///
/// A missing file is an empty store. A file that is not valid JSON, or lacks
/// the `macros` array, is [`MacroError::StoreCorrupt`]; the file is never
/// touched in that case.
pub fn load_store(path: &Path, options: &StoreOptions) -> Result<Loaded> {
    let raw = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file missing, starting empty");
            return Ok(Loaded::default());
        }
        Err(source) => {
            return Err(MacroError::StoreRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    debug!(path = %path.display(), bytes = raw.len(), "read store file");

    if options.formatter.is_none() {
        return parse(path, &raw).map(Loaded::new);
    }

    let formatter_error = match options
        .formatter
        .apply(Direction::Normalize, &raw, options.timeout)
    {
        Ok(normalized) => match read_normalized(options, &raw, &normalized) {
            Ok(store) => return Ok(Loaded::new(store)),
            Err(e) => e,
        },
        Err(e) => e,
    };

    warn!(error = %formatter_error, "formatter failed on read, parsing file bytes as is");
    let store = parse(path, &raw)?;
    Ok(Loaded {
        store,
        formatter_error: Some(formatter_error),
    })
}

/// Replaces the backing file with the serialized `store`.
///
/// The canonical form is compact JSON with records in store order. With a
/// formatter configured, the canonical bytes are piped through its
/// pretty-print invocation and the output must parse back to the same
/// document. A formatter failure aborts the save unless
/// `fallback_on_write_failure` is set. The file is replaced atomically.
pub fn save_store(path: &Path, options: &StoreOptions, store: &MacroStore) -> Result<Saved> {
    let canonical = serde_json::to_vec(store)?;

    let (bytes, formatter_error) = if options.formatter.is_none() {
        (canonical, None)
    } else {
        match pretty_print(options, &canonical) {
            Ok(pretty) => (pretty, None),
            Err(e) if options.fallback_on_write_failure => {
                warn!(error = %e, "formatter failed on write, saving canonical form");
                (canonical, Some(e))
            }
            Err(e) => return Err(e.into()),
        }
    };

    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), records = store.len(), "saved store");

    Ok(Saved { formatter_error })
}

fn parse(path: &Path, bytes: &[u8]) -> Result<MacroStore> {
    serde_json::from_slice(bytes).map_err(|e| MacroError::StoreCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parses the read filter's output. When the file's own bytes are JSON, the
/// output must be the same document; a filter may reformat, never rewrite.
fn read_normalized(
    options: &StoreOptions,
    raw: &[u8],
    normalized: &[u8],
) -> std::result::Result<MacroStore, FormatterError> {
    let actual: Value =
        serde_json::from_slice(normalized).map_err(|e| invalid_output(options, e.to_string()))?;
    if let Ok(expected) = serde_json::from_slice::<Value>(raw) {
        if expected != actual {
            return Err(invalid_output(options, NOT_SAME_DOCUMENT));
        }
    }
    serde_json::from_value(actual).map_err(|e| invalid_output(options, e.to_string()))
}

fn pretty_print(
    options: &StoreOptions,
    canonical: &[u8],
) -> std::result::Result<Vec<u8>, FormatterError> {
    let output = options
        .formatter
        .apply(Direction::Pretty, canonical, options.timeout)?;

    let expected: Value =
        serde_json::from_slice(canonical).map_err(|e| invalid_output(options, e.to_string()))?;
    let actual: Value =
        serde_json::from_slice(&output).map_err(|e| invalid_output(options, e.to_string()))?;
    if expected != actual {
        return Err(invalid_output(options, NOT_SAME_DOCUMENT));
    }

    Ok(output)
}

const NOT_SAME_DOCUMENT: &str = "output is not the same JSON document";

fn invalid_output(options: &StoreOptions, reason: impl Into<String>) -> FormatterError {
    FormatterError::InvalidOutput {
        program: options.formatter.to_string(),
        reason: reason.into(),
    }
}

/// Write to a sibling temp file, fsync, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source: io::Error| MacroError::StoreWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let file_name = path.file_name().ok_or_else(|| {
        write_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "store path has no file name",
        ))
    })?;
    let tmp_path = dir.join(format!(
        ".{}-{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4()
    ));

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }
    Ok(())
}

/// File-backed [`MacroBackend`].
pub struct FileBackend {
    path: PathBuf,
    options: StoreOptions,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: StoreOptions::default(),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }
}

impl MacroBackend for FileBackend {
    fn load(&self) -> Result<Loaded> {
        load_store(&self.path, &self.options)
    }

    fn save(&mut self, store: &MacroStore) -> Result<Saved> {
        save_store(&self.path, &self.options, store)
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn formatter(&self) -> Formatter {
        self.options.formatter.clone()
    }
}
