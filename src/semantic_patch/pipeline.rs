//! Per-file rewrite pipeline
//!
//! Runs the passes in order against one in-memory source unit:
//! inject, dedup, migrate, dedup sweep, separator repair. Each pass
//! re-derives its matches from the current buffer.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MigrationConfig;
use crate::error::{PatchError, Result};
use crate::tree_sitter::SourceParser;

use super::dedup::{dedup_declarations, dedup_initializers};
use super::injector::inject_field;
use super::migrator::migrate_types;
use super::patterns::UsagePatterns;
use super::special_case::fix_trailing_separator;

/// One rewrite rule of the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    InjectDeclaration,
    InjectInitializer,
    DedupDeclaration,
    DedupInitializer,
    DeclaredType,
    DefaultValue,
    GuardedLookup,
    PresenceCheck,
    ValueAssignment,
    StringAssignment,
    TrailingSeparator,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rule::InjectDeclaration => "inject_declaration",
            Rule::InjectInitializer => "inject_initializer",
            Rule::DedupDeclaration => "dedup_declaration",
            Rule::DedupInitializer => "dedup_initializer",
            Rule::DeclaredType => "declared_type",
            Rule::DefaultValue => "default_value",
            Rule::GuardedLookup => "guarded_lookup",
            Rule::PresenceCheck => "presence_check",
            Rule::ValueAssignment => "value_assignment",
            Rule::StringAssignment => "string_assignment",
            Rule::TrailingSeparator => "trailing_separator",
        };
        write!(f, "{}", s)
    }
}

/// How many times a rule fired during one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub matches: usize,
}

/// Matched / not-matched record for every rule a pipeline run attempted
#[derive(Debug, Clone, Default)]
pub struct PatchReport {
    outcomes: Vec<RuleOutcome>,
}

impl PatchReport {
    /// Record an attempt. Repeated attempts of the same rule accumulate.
    pub fn record(&mut self, rule: Rule, matches: usize) {
        match self.outcomes.iter_mut().find(|o| o.rule == rule) {
            Some(outcome) => outcome.matches += matches,
            None => self.outcomes.push(RuleOutcome { rule, matches }),
        }
    }

    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    pub fn matches(&self, rule: Rule) -> usize {
        self.outcomes
            .iter()
            .find(|o| o.rule == rule)
            .map(|o| o.matches)
            .unwrap_or(0)
    }

    pub fn matched(&self, rule: Rule) -> bool {
        self.matches(rule) > 0
    }

    pub fn attempted(&self, rule: Rule) -> bool {
        self.outcomes.iter().any(|o| o.rule == rule)
    }

    /// Rules that were attempted and found nothing
    pub fn unmatched(&self) -> impl Iterator<Item = Rule> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.matches == 0)
            .map(|o| o.rule)
    }
}

/// One file's text plus its identity
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub name: String,
    original: String,
    pub content: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            name,
            original: content.clone(),
            content,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;
        Ok(Self::new(path, content))
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_changed(&self) -> bool {
        self.content != self.original
    }

    /// Write the working text back. Returns whether a write happened.
    pub fn persist(&self) -> Result<bool> {
        if !self.is_changed() {
            return Ok(false);
        }
        fs::write(&self.path, &self.content).map_err(|e| PatchError::io(&self.path, e))?;
        Ok(true)
    }
}

/// The full pass pipeline for one configuration
pub struct MigrationEngine {
    config: MigrationConfig,
    parser: SourceParser,
    patterns: UsagePatterns,
}

impl MigrationEngine {
    pub fn new(config: MigrationConfig) -> Result<Self> {
        let patterns = UsagePatterns::new(&config.field, &config.usage)?;
        Ok(Self {
            config,
            parser: SourceParser::new()?,
            patterns,
        })
    }

    /// Run every pass over `unit.content`. Never touches the filesystem.
    pub fn apply(&mut self, unit: &mut SourceUnit) -> Result<PatchReport> {
        let cfg = &self.config;
        let mut report = PatchReport::default();
        let path = unit.path.clone();
        let content = &mut unit.content;

        if cfg.needs_injection(&unit.name) {
            inject_field(
                content,
                &path,
                &mut self.parser,
                &cfg.field,
                &cfg.record_suffix,
                &mut report,
            )?;
        }

        dedup_declarations(content, &cfg.field, &mut report);
        dedup_initializers(
            content,
            &path,
            &mut self.parser,
            &cfg.field,
            &cfg.record_suffix,
            &mut report,
        )?;

        let before_migration = content.clone();
        migrate_types(content, &self.patterns, &cfg.field, &cfg.usage, &mut report);

        // Migration can turn leftover bare copies into wrapped duplicates
        if *content != before_migration {
            dedup_declarations(content, &cfg.field, &mut report);
            dedup_initializers(
                content,
                &path,
                &mut self.parser,
                &cfg.field,
                &cfg.record_suffix,
                &mut report,
            )?;
        }

        if let Some(fix) = cfg.separator_fix.as_ref().filter(|f| f.file == unit.name) {
            fix_trailing_separator(content, &path, &mut self.parser, fix, &mut report)?;
        }

        for rule in report.unmatched() {
            tracing::debug!(file = %unit.name, %rule, "rule found nothing");
        }

        Ok(report)
    }
}
