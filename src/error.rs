//! Error type shared by the engine, the driver and the CLI helpers.

use std::path::PathBuf;

/// Errors raised while locating, patching or persisting source files
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// A file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The candidate directory could not be enumerated
    #[error("failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Tree-sitter produced no tree for the buffer
    #[error("failed to parse {}", path.display())]
    Parse { path: PathBuf },

    /// The Rust grammar could not be loaded into the parser
    #[error("failed to initialize Rust grammar: {0}")]
    LanguageInit(String),

    /// The configuration file exists but is malformed
    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// A usage pattern built from configured names failed to compile
    #[error("invalid usage pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PatchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
