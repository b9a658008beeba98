//! Tree-sitter parser for Rust sources
//!
//! Every pass re-parses the buffer it is about to edit, so offsets always
//! refer to the current text rather than to an earlier pass's output.

use std::path::Path;

use tree_sitter::{Parser, Tree};

use crate::error::{PatchError, Result};

/// Owns a parser configured with the Rust grammar
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| PatchError::LanguageInit(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse a whole buffer. `path` is only used for error reporting.
    pub fn parse(&mut self, code: &str, path: &Path) -> Result<Tree> {
        self.parser.parse(code, None).ok_or_else(|| PatchError::Parse {
            path: path.to_path_buf(),
        })
    }
}
