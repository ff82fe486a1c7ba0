use crate::codec::CodecError;
use crate::formatter::FormatterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacroError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Store file {} is corrupt: {reason}", .path.display())]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("Failed to read store file {}: {source}", .path.display())]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store file {}: {source}", .path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Formatter error: {0}")]
    Formatter(#[from] FormatterError),

    /// `index` is in the caller's numbering: 0-based from [`crate::model::MacroStore`],
    /// 1-based when it comes from a user selector.
    #[error("Index {index} is out of range (store holds {len} macros)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, MacroError>;
