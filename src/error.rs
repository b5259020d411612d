// src/error.rs

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode row at line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
