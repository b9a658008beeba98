//! Tree-sitter integration
//!
//! Locates the structural shapes the patch passes edit: record declarations,
//! their field lists, and the struct literals built by `Default` impls.
//! Usage-site idioms are matched textually elsewhere; only block boundaries
//! come from the grammar.

mod parser;
mod structure;

pub use parser::SourceParser;
pub use structure::{
    declares_field, default_blocks, line_indent, record_named, records, DefaultBlock, FieldDecl,
    FieldInit, RecordDecl,
};
