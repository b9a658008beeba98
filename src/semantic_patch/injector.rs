//! Field injection
//!
//! Adds the migrated field as the first field of a record that lacks it, and
//! a matching `None` initializer as the first entry of that record's
//! `Default` struct literal.

use std::path::Path;

use crate::config::FieldSpec;
use crate::error::Result;
use crate::tree_sitter::{self, SourceParser};

use super::edit::apply_insert;
use super::pipeline::{PatchReport, Rule};

const DEFAULT_FIELD_INDENT: &str = "    ";
const DEFAULT_INIT_INDENT: &str = "            ";

/// Inject `field` into the first record ending in `suffix`.
///
/// Does nothing when any struct in the buffer already declares the field.
/// A missing `Default` block is not an error: the declaration is still added
/// and `InjectInitializer` is reported with zero matches.
pub fn inject_field(
    content: &mut String,
    path: &Path,
    parser: &mut SourceParser,
    field: &FieldSpec,
    suffix: &str,
    report: &mut PatchReport,
) -> Result<()> {
    let tree = parser.parse(content, path)?;
    if tree_sitter::declares_field(&tree, content, &field.name) {
        report.record(Rule::InjectDeclaration, 0);
        report.record(Rule::InjectInitializer, 0);
        return Ok(());
    }

    let Some(record) = tree_sitter::records(&tree, content, suffix).into_iter().next() else {
        tracing::debug!(path = %path.display(), suffix, "no record to inject into");
        report.record(Rule::InjectDeclaration, 0);
        report.record(Rule::InjectInitializer, 0);
        return Ok(());
    };

    let indent = record
        .fields
        .first()
        .map(|f| tree_sitter::line_indent(content, f.start))
        .unwrap_or(DEFAULT_FIELD_INDENT)
        .to_string();
    let declaration = format!("\n{}{}", indent, field.declaration());
    *content = apply_insert(content, record.body_start + 1, &declaration);
    report.record(Rule::InjectDeclaration, 1);

    // Offsets moved; find the constructor block in the new buffer
    let tree = parser.parse(content, path)?;
    let block = tree_sitter::default_blocks(&tree, content)
        .into_iter()
        .find(|b| b.type_name == record.name);

    match block {
        Some(block) => {
            let indent = block
                .initializers
                .first()
                .map(|i| tree_sitter::line_indent(content, i.start))
                .unwrap_or(DEFAULT_INIT_INDENT)
                .to_string();
            let initializer = format!("\n{}{}", indent, field.initializer());
            *content = apply_insert(content, block.body_start + 1, &initializer);
            report.record(Rule::InjectInitializer, 1);
        }
        None => {
            tracing::debug!(
                path = %path.display(),
                record = %record.name,
                "no Default block; declaration added without initializer"
            );
            report.record(Rule::InjectInitializer, 0);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_sitter::{default_blocks, records};

    fn inject(source: &str) -> (String, PatchReport) {
        let mut parser = SourceParser::new().unwrap();
        let mut content = source.to_string();
        let mut report = PatchReport::default();
        inject_field(
            &mut content,
            Path::new("sankey.rs"),
            &mut parser,
            &FieldSpec::default(),
            "Config",
            &mut report,
        )
        .unwrap();
        (content, report)
    }

    const SANKEY: &str = r#"/// Sankey diagram configuration
#[derive(Debug, Clone)]
pub struct SankeyConfig {
    pub source_column: String,
    pub target_column: String,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            source_column: String::new(),
            target_column: String::new(),
        }
    }
}
"#;

    #[test]
    fn test_injects_declaration_and_initializer_first() {
        let (content, report) = inject(SANKEY);

        assert!(content.contains(
            "pub struct SankeyConfig {\n    pub data_source_id: Option<String>,\n    pub source_column: String,"
        ));
        assert!(content.contains(
            "Self {\n            data_source_id: None,\n            source_column: String::new(),"
        ));
        assert!(report.matched(Rule::InjectDeclaration));
        assert!(report.matched(Rule::InjectInitializer));

        let tree = SourceParser::new()
            .unwrap()
            .parse(&content, Path::new("sankey.rs"))
            .unwrap();
        assert!(!tree.root_node().has_error());
        let record = &records(&tree, &content, "Config")[0];
        assert_eq!(record.fields[0].name, "data_source_id");
        let block = &default_blocks(&tree, &content)[0];
        assert_eq!(block.initializers[0].name, "data_source_id");
        assert_eq!(block.initializers[0].value, "None");
    }

    #[test]
    fn test_second_injection_is_a_no_op() {
        let (once, _) = inject(SANKEY);
        let (twice, report) = inject(&once);

        assert_eq!(once, twice);
        assert!(!report.matched(Rule::InjectDeclaration));
    }

    #[test]
    fn test_existing_bare_field_blocks_injection() {
        let source = "pub struct BarConfig {\n    pub data_source_id: String,\n}\n";
        let (content, report) = inject(source);

        assert_eq!(content, source);
        assert_eq!(report.matches(Rule::InjectDeclaration), 0);
    }

    #[test]
    fn test_missing_default_block_is_partial_success() {
        let source = "pub struct StreamConfig {\n    pub width: f32,\n}\n";
        let (content, report) = inject(source);

        assert_eq!(
            content,
            "pub struct StreamConfig {\n    pub data_source_id: Option<String>,\n    pub width: f32,\n}\n"
        );
        assert!(report.matched(Rule::InjectDeclaration));
        assert!(!report.matched(Rule::InjectInitializer));
    }

    #[test]
    fn test_initializer_goes_to_owning_record() {
        let source = r#"pub struct NodeStyle {
    pub radius: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self { radius: 4.0 }
    }
}

pub struct NetworkConfig {
    pub style: NodeStyle,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            style: NodeStyle::default(),
        }
    }
}
"#;
        let (content, _) = inject(source);

        assert!(content.contains("Self { radius: 4.0 }"));
        assert!(content.contains("Self {\n            data_source_id: None,\n            style:"));
    }

    #[test]
    fn test_empty_record_uses_default_indent() {
        let source = "pub struct TreemapConfig {}\n";
        let (content, _) = inject(source);

        assert_eq!(
            content,
            "pub struct TreemapConfig {\n    pub data_source_id: Option<String>,}\n"
        );
    }
}
