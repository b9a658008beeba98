//! Trailing-separator repair for one record in one file

use std::path::Path;

use crate::config::SeparatorFix;
use crate::error::Result;
use crate::tree_sitter::{self, SourceParser};

use super::edit::apply_insert;
use super::pipeline::{PatchReport, Rule};

/// Append `,` after the record's last field when that field is the
/// configured one and no comma follows it yet.
pub fn fix_trailing_separator(
    content: &mut String,
    path: &Path,
    parser: &mut SourceParser,
    fix: &SeparatorFix,
    report: &mut PatchReport,
) -> Result<()> {
    let tree = parser.parse(content, path)?;
    let target = tree_sitter::record_named(&tree, content, &fix.record)
        .and_then(|record| record.fields.last().cloned())
        .filter(|last| last.name == fix.field && !last.has_trailing_comma);

    match target {
        Some(last) => {
            *content = apply_insert(content, last.end, ",");
            report.record(Rule::TrailingSeparator, 1);
        }
        None => report.record(Rule::TrailingSeparator, 0),
    }
    Ok(())
}
