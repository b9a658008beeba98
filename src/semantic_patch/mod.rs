//! Semantic Patch Engine
//!
//! Idempotent rewrites that migrate one struct field from a bare type to
//! `Option<T>` across a set of Rust source files.
//!
//! Passes, in pipeline order:
//! - Field injection into allow-listed records and their `Default` blocks
//! - Duplicate elimination for declarations and initializers
//! - Type migration of declarations, defaults and call-site idioms
//! - Trailing-separator repair for one named record
//!
//! Record and constructor boundaries come from tree-sitter; call-site idioms
//! are regex patterns. Every pass reports how often it fired.

mod dedup;
mod edit;
mod injector;
mod migrator;
mod patterns;
mod pipeline;
mod special_case;

pub use dedup::{dedup_declarations, dedup_initializers};
pub use edit::{apply_insert, apply_replace, find_literal, remove_literal_in};
pub use injector::inject_field;
pub use migrator::migrate_types;
pub use patterns::{fallback_assignment, substitute, UsagePatterns};
pub use pipeline::{MigrationEngine, PatchReport, Rule, RuleOutcome, SourceUnit};
pub use special_case::fix_trailing_separator;
