//! Duplicate elimination
//!
//! Repeated or overlapping runs can leave the same declaration or initializer
//! behind more than once. All copies are identical, so the first one is kept.

use std::path::Path;

use crate::config::FieldSpec;
use crate::error::Result;
use crate::tree_sitter::{self, SourceParser};

use super::edit::{find_literal, remove_literal_in};
use super::pipeline::{PatchReport, Rule};

/// Keep the first `pub <field>: Option<T>,` in the buffer and delete every
/// later literal copy, wherever it appears.
pub fn dedup_declarations(content: &mut String, field: &FieldSpec, report: &mut PatchReport) {
    let declaration = field.declaration();
    let removed = match find_literal(content, 0, content.len(), &declaration) {
        Some(first) => {
            let keep_end = first + declaration.len();
            let (rewritten, removed) =
                remove_literal_in(content, keep_end..content.len(), &declaration);
            if removed > 0 {
                *content = rewritten;
            }
            removed
        }
        None => 0,
    };
    report.record(Rule::DedupDeclaration, removed);
}

/// Within each `Default` block of a record ending in `suffix`, keep the first
/// `<field>: None,` and delete the later copies inside that block only.
pub fn dedup_initializers(
    content: &mut String,
    path: &Path,
    parser: &mut SourceParser,
    field: &FieldSpec,
    suffix: &str,
    report: &mut PatchReport,
) -> Result<()> {
    let initializer = field.initializer();
    let tree = parser.parse(content, path)?;
    let mut blocks: Vec<_> = tree_sitter::default_blocks(&tree, content)
        .into_iter()
        .filter(|b| b.type_name.ends_with(suffix))
        .collect();

    // Last block first so earlier spans stay valid
    blocks.sort_by(|a, b| b.body_start.cmp(&a.body_start));

    let mut removed_total = 0;
    for block in blocks {
        let Some(first) = find_literal(content, block.body_start, block.body_end, &initializer)
        else {
            continue;
        };
        let keep_end = first + initializer.len();
        let (rewritten, removed) = remove_literal_in(content, keep_end..block.body_end, &initializer);
        if removed > 0 {
            *content = rewritten;
            removed_total += removed;
        }
    }

    report.record(Rule::DedupInitializer, removed_total);
    Ok(())
}
